mod cli;
pub mod groups;
pub mod serde_helpers;
mod validation;

use crate::domain::SetupError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
}

/// Output format of the process-wide tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line (default, production)
    #[default]
    Json,
    /// Human readable single-line output
    Compact,
}

/// One `tag=severity` pair as given on the command line.
///
/// The severity name is kept as written; it is checked when the level map is
/// built so every bad entry can be reported together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLevel {
    pub tag: String,
    pub level: String,
}

impl TagLevel {
    pub fn new(tag: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            level: level.into(),
        }
    }
}

impl FromStr for TagLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((tag, level)) = s.split_once('=') else {
            return Err(format!("Invalid tag mapping '{s}'. Expected: 'tag=level'"));
        };
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(format!("Empty tag in mapping '{s}'"));
        }
        Ok(Self::new(tag, level.trim()))
    }
}

impl fmt::Display for TagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.tag, self.level)
    }
}

// Re-export all public items for backward compatibility
pub use cli::{Config, DEFAULT_LOG_EVENTS};
pub use groups::{IgnoredEventTags, MessageConfig};
