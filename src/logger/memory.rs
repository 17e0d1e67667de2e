//! In-memory logger for tests.
//!
//! Children share the parent's sink, so a test can hand the root logger to
//! the adapter and inspect every record written by request-scoped children.

use super::{Bindings, Logger};
use crate::domain::{LogRecord, Severity};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct CapturedLog {
    pub severity: Severity,
    pub bindings: Bindings,
    pub record: LogRecord,
}

impl CapturedLog {
    /// Bindings and record flattened into one object, record keys winning.
    pub fn merged(&self) -> Value {
        let mut merged = self.bindings.clone();
        merged.extend(self.record.as_map().clone());
        Value::Object(merged)
    }

    pub fn msg(&self) -> Option<&str> {
        self.record.msg()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    bindings: Bindings,
    sink: Arc<Mutex<Vec<CapturedLog>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<CapturedLog> {
        self.sink.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.sink.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sink.lock().is_empty()
    }

    pub fn clear(&self) {
        self.sink.lock().clear();
    }

    /// Records whose message equals `msg`.
    pub fn with_message(&self, msg: &str) -> Vec<CapturedLog> {
        self.sink
            .lock()
            .iter()
            .filter(|entry| entry.msg() == Some(msg))
            .cloned()
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, severity: Severity, record: LogRecord) {
        self.sink.lock().push(CapturedLog {
            severity,
            bindings: self.bindings.clone(),
            record,
        });
    }

    fn child(&self, bindings: Bindings) -> Arc<dyn Logger> {
        let mut merged = self.bindings.clone();
        merged.extend(bindings);
        Arc::new(MemoryLogger {
            bindings: merged,
            sink: Arc::clone(&self.sink),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_children_share_the_sink() {
        let root = MemoryLogger::new();
        let mut bindings = Bindings::new();
        bindings.insert("req".into(), json!({ "id": "abc" }));

        let child = root.child(bindings);
        child.info(LogRecord::message("hello"));
        root.debug(LogRecord::message("root"));

        let entries = root.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].severity, Severity::Info);
        assert_eq!(entries[0].merged()["req"]["id"], "abc");
        assert!(entries[1].bindings.is_empty());
        assert_eq!(root.with_message("root").len(), 1);
    }

    #[test]
    fn test_clear() {
        let logger = MemoryLogger::new();
        logger.warn(LogRecord::new());
        assert!(!logger.is_empty());
        logger.clear();
        assert!(logger.is_empty());
    }
}
