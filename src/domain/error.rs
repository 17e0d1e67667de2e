use thiserror::Error;

/// Errors raised while assembling the logging adapter.
///
/// These are programmer or configuration mistakes; they surface before any
/// event is processed and must keep the server from starting.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Invalid tag level configuration: {}", offending.join(", "))]
    InvalidTagLevelConfig { offending: Vec<String> },

    #[error("Unsupported event '{name}'. Valid events: {valid:?}")]
    UnsupportedEvent {
        name: String,
        valid: Vec<&'static str>,
    },
}
