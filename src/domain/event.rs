use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// A single notification from the framework's event bus.
///
/// Tags keep their insertion order so iteration is deterministic; resolution
/// itself does not depend on that order.
#[derive(Debug, Clone, Default)]
pub struct LifecycleEvent {
    pub tags: Vec<String>,
    pub data: Option<Value>,
    pub error: Option<EventError>,
}

impl LifecycleEvent {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            data: None,
            error: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_error(mut self, error: EventError) -> Self {
        self.error = Some(error);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Error value carried by an event or attached to a response.
///
/// Cheap to clone; keeps the concrete type name for the `type` field of the
/// error snapshot.
#[derive(Clone)]
pub struct EventError {
    kind: &'static str,
    inner: Arc<dyn Error + Send + Sync>,
}

impl EventError {
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            kind: short_type_name(std::any::type_name::<E>()),
            inner: Arc::new(error),
        }
    }

    /// Wraps a plain message, e.g. one produced by a handler without an
    /// error type of its own.
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            kind: "Error",
            inner: Arc::new(MessageError(message.into())),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    pub fn inner(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    /// Messages of the `source()` chain, outermost first, excluding self.
    pub fn sources(&self) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = self.inner.source();
        while let Some(source) = current {
            chain.push(source.to_string());
            current = source.source();
        }
        chain
    }
}

impl fmt::Debug for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventError")
            .field("kind", &self.kind)
            .field("message", &self.inner.to_string())
            .finish()
    }
}

impl fmt::Display for EventError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

#[derive(Debug)]
struct MessageError(String);

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for MessageError {}

// `std::io::Error` -> `Error`; generic arguments are left intact.
fn short_type_name(full: &'static str) -> &'static str {
    let end = full.find('<').unwrap_or(full.len());
    match full[..end].rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}
