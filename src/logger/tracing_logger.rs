use super::{Bindings, Logger};
use crate::domain::{LogRecord, Severity};
use serde_json::Value;
use std::sync::Arc;

/// Target used for every event emitted on behalf of the framework.
pub const LOG_TARGET: &str = "rask_request_logger";

/// `tracing` backed logger.
///
/// Each record becomes one event at the matching `tracing` level. The `msg`
/// key becomes the event message; the rest of the record and the bound
/// context are attached as JSON fields.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    bindings: Arc<Bindings>,
    // Rendered once per child instead of once per record.
    rendered_bindings: Arc<str>,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::with_bindings(Bindings::new())
    }

    pub fn with_bindings(bindings: Bindings) -> Self {
        let rendered_bindings: Arc<str> = Value::Object(bindings.clone()).to_string().into();
        Self {
            bindings: Arc::new(bindings),
            rendered_bindings,
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! emit {
    ($level:expr, $severity:expr, $msg:expr, $record:expr, $bindings:expr) => {
        tracing::event!(
            target: LOG_TARGET,
            $level,
            severity = $severity,
            record = %$record,
            bindings = %$bindings,
            "{}",
            $msg
        )
    };
}

impl Logger for TracingLogger {
    fn log(&self, severity: Severity, mut record: LogRecord) {
        let msg = match record.remove(LogRecord::MESSAGE_KEY) {
            Some(Value::String(msg)) => msg,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let record = record.into_value();
        let name = severity.name();
        let bindings = &*self.rendered_bindings;

        match severity {
            Severity::Trace => emit!(tracing::Level::TRACE, name, msg, record, bindings),
            Severity::Debug => emit!(tracing::Level::DEBUG, name, msg, record, bindings),
            Severity::Info => emit!(tracing::Level::INFO, name, msg, record, bindings),
            Severity::Warn => emit!(tracing::Level::WARN, name, msg, record, bindings),
            Severity::Error | Severity::Fatal => {
                emit!(tracing::Level::ERROR, name, msg, record, bindings);
            }
        }
    }

    fn child(&self, bindings: Bindings) -> Arc<dyn Logger> {
        let mut merged = (*self.bindings).clone();
        merged.extend(bindings);
        Arc::new(TracingLogger::with_bindings(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_emits_message_and_record() {
        let logger = TracingLogger::new();
        logger.warn(LogRecord::message("cache miss").with("tags", json!(["cache"])));

        assert!(logs_contain("cache miss"));
        assert!(logs_contain("severity=\"warn\""));
        assert!(logs_contain("cache"));
    }

    #[traced_test]
    #[test]
    fn test_child_carries_bindings() {
        let root = TracingLogger::new();
        let mut bindings = Bindings::new();
        bindings.insert("req".into(), json!({ "id": "req-42" }));

        let child = root.child(bindings);
        child.info(LogRecord::message("inside request"));

        assert!(logs_contain("inside request"));
        assert!(logs_contain("req-42"));
    }

    #[traced_test]
    #[test]
    fn test_fatal_is_emitted_at_error_level() {
        TracingLogger::new().fatal(LogRecord::message("going down"));
        assert!(logs_contain("ERROR"));
        assert!(logs_contain("severity=\"fatal\""));
    }

    #[traced_test]
    #[test]
    fn test_child_merges_parent_bindings() {
        let mut parent = Bindings::new();
        parent.insert("service".into(), json!("api"));
        let root = TracingLogger::with_bindings(parent);

        let mut extra = Bindings::new();
        extra.insert("req".into(), json!({ "id": "1" }));
        let child = root.child(extra);
        child.info(LogRecord::message("merged bindings"));

        assert_eq!(root.bindings().len(), 1);
        assert!(logs_contain("merged bindings"));
        assert!(logs_contain("api"));
        assert!(logs_contain("\"id\":\"1\""));
    }
}
