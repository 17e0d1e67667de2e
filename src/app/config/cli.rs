use super::groups::{IgnoredEventTags, MessageConfig};
use super::serde_helpers::{load_env_list, load_env_path_opt, load_env_string, load_env_var};
use super::{ConfigError, LogFormat, TagLevel};
use crate::domain::Severity;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Event kinds logged when nothing else is configured.
pub const DEFAULT_LOG_EVENTS: [&str; 4] = ["onPostStart", "onPostStop", "response", "request-error"];

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Tag to severity mapping (repeatable), e.g. `--tag db=debug`
    #[arg(long = "tag", env = "TAGS", value_delimiter = ',')]
    #[serde(with = "super::serde_helpers::tag_map")]
    pub tags: Vec<TagLevel>,

    /// Severity for events none of whose tags is mapped
    #[arg(long, env = "ALL_TAGS", default_value = "info")]
    pub all_tags: String,

    /// Request paths that are never logged (exact match)
    #[arg(long = "ignore-path", env = "IGNORE_PATHS", value_delimiter = ',')]
    pub ignore_paths: Vec<String>,

    /// Flatten event data into the record instead of nesting it under `data`
    #[arg(long, env = "MERGE_LOG_DATA")]
    pub merge_log_data: bool,

    /// Event kinds to log; an empty list disables them all
    #[arg(
        long,
        env = "LOG_EVENTS",
        value_delimiter = ',',
        default_value = "onPostStart,onPostStop,response,request-error"
    )]
    pub log_events: Vec<String>,

    /// Log a record when a request arrives
    #[arg(long, env = "LOG_REQUEST_START")]
    pub log_request_start: bool,

    /// Log a record when a response has been produced
    #[arg(
        long,
        env = "LOG_REQUEST_COMPLETE",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub log_request_complete: bool,

    /// Minimum severity written by the process-wide subscriber
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: Severity,

    /// Subscriber output format
    #[arg(long, env = "LOG_FORMAT", default_value = "json")]
    pub log_format: LogFormat,

    /// Address the demo server listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:3000")]
    pub listen_addr: SocketAddr,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Ignored tag groups (file only)
    #[arg(skip)]
    pub ignored_event_tags: IgnoredEventTags,

    /// Hook messages (file only)
    #[arg(skip)]
    pub messages: MessageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            all_tags: Severity::Info.name().to_string(),
            ignore_paths: Vec::new(),
            merge_log_data: false,
            log_events: DEFAULT_LOG_EVENTS.iter().map(|e| e.to_string()).collect(),
            log_request_start: false,
            log_request_complete: true,
            log_level: Severity::Info,
            log_format: LogFormat::Json,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            config_file: None,
            ignored_event_tags: IgnoredEventTags::default(),
            messages: MessageConfig::default(),
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::parse_from(args);
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::from_args`], but returns clap errors instead of exiting.
    pub fn try_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config =
            Config::try_parse_from(args).map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        load_env_list("TAGS", &mut config.tags)?;
        load_env_string("ALL_TAGS", &mut config.all_tags);
        load_env_list("IGNORE_PATHS", &mut config.ignore_paths)?;
        load_env_var("MERGE_LOG_DATA", &mut config.merge_log_data)?;
        load_env_list("LOG_EVENTS", &mut config.log_events)?;
        load_env_var("LOG_REQUEST_START", &mut config.log_request_start)?;
        load_env_var("LOG_REQUEST_COMPLETE", &mut config.log_request_complete)?;

        // Severity names are lowercase; accept any casing from the environment
        if let Ok(log_level) = std::env::var("LOG_LEVEL") {
            config.log_level = Severity::from_name(&log_level.to_lowercase()).ok_or_else(|| {
                ConfigError::EnvError(format!("Invalid LOG_LEVEL: {log_level}"))
            })?;
        }

        if let Ok(log_format) = std::env::var("LOG_FORMAT") {
            config.log_format = match log_format.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "compact" => LogFormat::Compact,
                _ => {
                    return Err(ConfigError::EnvError(format!(
                        "Invalid LOG_FORMAT: {log_format}. Valid values: json, compact"
                    )));
                }
            };
        }

        load_env_var("LISTEN_ADDR", &mut config.listen_addr)?;
        load_env_path_opt("CONFIG_FILE", &mut config.config_file);

        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    /// Parses CLI args (env included via clap); a `--config-file` replaces
    /// everything else.
    pub fn from_args_and_env<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args(args)?;
        match &config.config_file {
            Some(path) => Config::from_file(path),
            None => Ok(config),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_file = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    /// Normalizes list inputs: trims entries and drops empty ones so that
    /// `LOG_EVENTS=""` means "no events".
    pub(super) fn post_process(&mut self) -> Result<(), ConfigError> {
        self.ignore_paths = self
            .ignore_paths
            .iter()
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .collect();

        self.log_events = self
            .log_events
            .iter()
            .flat_map(|event| event.split(','))
            .map(|event| event.trim().to_string())
            .filter(|event| !event.is_empty())
            .collect();

        self.all_tags = self.all_tags.trim().to_string();

        Ok(())
    }

    /// Tag overrides as `(tag, level)` pairs for the level map.
    pub fn tag_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags
            .iter()
            .map(|entry| (entry.tag.as_str(), entry.level.as_str()))
    }
}
