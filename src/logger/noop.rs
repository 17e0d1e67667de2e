use super::{Bindings, Logger};
use crate::domain::{LogRecord, Severity};
use std::sync::Arc;

/// Logger whose every method discards its input.
///
/// Used for ignored request paths: nothing is serialized, nothing is written.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl NoopLogger {
    pub fn shared() -> Arc<dyn Logger> {
        Arc::new(NoopLogger)
    }
}

impl Logger for NoopLogger {
    #[inline]
    fn log(&self, _severity: Severity, _record: LogRecord) {}

    fn child(&self, _bindings: Bindings) -> Arc<dyn Logger> {
        Arc::new(NoopLogger)
    }
}
