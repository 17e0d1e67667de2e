//! Logger interface consumed by the resolver and the request hooks.
//!
//! The adapter never formats or transports logs itself; it only picks a
//! severity and builds a record, then hands both to a `Logger`.

pub mod memory;
pub mod noop;
pub mod tracing_logger;

pub use memory::{CapturedLog, MemoryLogger};
pub use noop::NoopLogger;
pub use tracing_logger::TracingLogger;

use crate::domain::{LogRecord, Severity};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Context bound into a child logger, e.g. `{ "req": { ... } }`.
pub type Bindings = Map<String, Value>;

pub trait Logger: Send + Sync {
    fn log(&self, severity: Severity, record: LogRecord);

    /// Returns a logger that carries `bindings` on every record.
    fn child(&self, bindings: Bindings) -> Arc<dyn Logger>;

    fn trace(&self, record: LogRecord) {
        self.log(Severity::Trace, record);
    }

    fn debug(&self, record: LogRecord) {
        self.log(Severity::Debug, record);
    }

    fn info(&self, record: LogRecord) {
        self.log(Severity::Info, record);
    }

    fn warn(&self, record: LogRecord) {
        self.log(Severity::Warn, record);
    }

    fn error(&self, record: LogRecord) {
        self.log(Severity::Error, record);
    }

    fn fatal(&self, record: LogRecord) {
        self.log(Severity::Fatal, record);
    }
}
