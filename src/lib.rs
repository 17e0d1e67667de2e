#![deny(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_lossless,            // Infallible casts are clear enough with `as`
    clippy::cast_possible_truncation, // Safe within realistic value bounds (durations, sizes)
    clippy::cast_possible_wrap,       // Safe in non-negative contexts
    clippy::cast_sign_loss,           // Safe where values are known non-negative
    clippy::missing_errors_doc,       // Internal API
    clippy::missing_panics_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. SnapshotFactory in snapshot module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Internal API
)]

//! Tag-driven request logging for axum services.
//!
//! Lifecycle events carry tags; a [`levels::LevelMap`] built once at setup
//! maps tags to severities and the [`levels::Resolver`] picks the most
//! severe one. Requests get a child logger bound to a read-only snapshot of
//! the request (see [`snapshot`]), unless their path is ignored.

pub mod app;
pub mod domain;
pub mod ignore;
pub mod levels;
pub mod logger;
pub mod serializer;
pub mod snapshot;

// Re-export main types for easy access
pub use app::{App, Config, RequestLogger, RequestLogging, RequestLoggingBuilder, ResponseError};
pub use domain::{EventError, LifecycleEvent, LogRecord, SetupError, Severity};
pub use ignore::IgnoreTable;
pub use levels::{LevelMap, Resolver};
pub use logger::{Logger, MemoryLogger, TracingLogger};
pub use serializer::{SerializerWrapper, Serializers};
pub use snapshot::SnapshotFactory;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
