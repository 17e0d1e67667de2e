//! Domain layer for rask-request-logger.
//!
//! Contains the canonical types shared across all modules:
//! - `Severity`: ordered log severity with numeric ranks 10 to 60
//! - `LifecycleEvent` / `EventError`: what the framework's event bus delivers
//! - `LogRecord`: the structured record handed to a logger
//! - `SetupError`: fatal configuration errors

pub mod error;
pub mod event;
pub mod record;
pub mod severity;

pub use error::SetupError;
pub use event::{EventError, LifecycleEvent};
pub use record::LogRecord;
pub use severity::{NO_MATCH, Severity};
