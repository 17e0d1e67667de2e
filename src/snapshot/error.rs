use crate::domain::EventError;
use serde::Serialize;

pub const ERROR_FIELDS: [&str; 3] = ["type", "message", "sources"];

/// Fixed-shape view of an event error.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorSnapshot<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    message: String,
    sources: Vec<String>,
    #[serde(skip)]
    raw: &'a EventError,
}

impl<'a> ErrorSnapshot<'a> {
    pub(super) fn project(raw: &'a EventError) -> Self {
        Self {
            kind: raw.kind(),
            message: raw.message(),
            sources: raw.sources(),
            raw,
        }
    }

    pub fn kind(&self) -> &'a str {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn raw_handle(&self) -> &'a EventError {
        self.raw
    }
}
