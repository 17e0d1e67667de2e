use super::{Config, ConfigError};
use crate::app::events::EventKind;
use crate::levels::LevelMap;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Every tag value and the fallback must name a severity
        LevelMap::build(self.tag_pairs(), &self.all_tags)?;

        for name in &self.log_events {
            EventKind::parse(name)?;
        }

        // Route paths always start with '/', anything else can never match
        if let Some(path) = self.ignore_paths.iter().find(|path| !path.starts_with('/')) {
            return Err(ConfigError::InvalidConfig(format!(
                "Ignored path must start with '/': {path}"
            )));
        }

        if let Some(group) = self
            .ignored_event_tags
            .log
            .iter()
            .chain(&self.ignored_event_tags.request)
            .find(|group| group.is_empty())
        {
            return Err(ConfigError::InvalidConfig(format!(
                "Ignored event tag group must not be empty: {group:?}"
            )));
        }

        Ok(())
    }
}
