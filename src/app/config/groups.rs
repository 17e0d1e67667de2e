use serde::{Deserialize, Serialize};

/// Tag groups whose events are dropped before resolution.
///
/// An event is dropped when its tags include every tag of at least one
/// group. `log` applies to server-level events, `request` to events logged
/// through a request logger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoredEventTags {
    pub log: Vec<Vec<String>>,
    pub request: Vec<Vec<String>>,
}

/// Messages used for the records written by the request hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    pub request_start: String,
    pub request_complete: String,
    pub request_error: String,
    pub server_started: String,
    pub server_stopped: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            request_start: "request start".to_string(),
            request_complete: "request completed".to_string(),
            request_error: "request error".to_string(),
            server_started: "server started".to_string(),
            server_stopped: "server stopped".to_string(),
        }
    }
}
