use crate::domain::{LifecycleEvent, SetupError};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

/// Lifecycle event kinds that can be switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Server started listening
    OnPostStart,
    /// Server stopped
    OnPostStop,
    /// Request completed
    Response,
    /// Request failed with an error
    RequestError,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::OnPostStart,
        EventKind::OnPostStop,
        EventKind::Response,
        EventKind::RequestError,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::OnPostStart => "onPostStart",
            EventKind::OnPostStop => "onPostStop",
            EventKind::Response => "response",
            EventKind::RequestError => "request-error",
        }
    }

    pub fn parse(name: &str) -> Result<Self, SetupError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| SetupError::UnsupportedEvent {
                name: name.to_string(),
                valid: Self::ALL.iter().map(|kind| kind.as_str()).collect(),
            })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of enabled event kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvents(HashSet<EventKind>);

impl LogEvents {
    pub fn parse<I, S>(names: I) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| EventKind::parse(name.as_ref()))
            .collect::<Result<HashSet<_>, _>>()
            .map(Self)
    }

    pub fn none() -> Self {
        Self(HashSet::new())
    }

    pub fn contains(&self, kind: EventKind) -> bool {
        self.0.contains(&kind)
    }
}

impl Default for LogEvents {
    fn default() -> Self {
        Self(EventKind::ALL.into_iter().collect())
    }
}

/// True when `event` carries every tag of at least one group.
pub fn matches_tag_group(groups: &[Vec<String>], event: &LifecycleEvent) -> bool {
    groups
        .iter()
        .any(|group| !group.is_empty() && group.iter().all(|tag| event.has_tag(tag)))
}

/// Server description logged with the start and stop records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    pub host: String,
    pub port: u16,
    pub protocol: &'static str,
    pub uri: String,
    /// Unix epoch milliseconds
    pub started: i64,
}

impl ServerInfo {
    pub fn new(addr: SocketAddr) -> Self {
        let host = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .unwrap_or_else(|| addr.ip().to_string());
        let port = addr.port();

        Self {
            uri: format!("http://{}:{port}", addr.ip()),
            host,
            port,
            protocol: "http",
            started: chrono::Utc::now().timestamp_millis(),
        }
    }
}
