use super::TagLevel;
use serde::{Deserialize, Deserializer, Serializer};
use std::collections::BTreeMap;

/// `tags` is written as a TOML table (`[tags] db = "debug"`) but held as a
/// list so CLI and file input share one type.
pub mod tag_map {
    use super::*;
    use serde::ser::SerializeMap;

    pub fn serialize<S>(tags: &[TagLevel], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(tags.len()))?;
        for entry in tags {
            map.serialize_entry(&entry.tag, &entry.level)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<TagLevel>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .map(|(tag, level)| TagLevel { tag, level })
            .collect())
    }
}

/// Helper function to load and parse an environment variable.
/// Returns Ok(()) if the variable doesn't exist (keeps default).
pub fn load_env_var<T>(name: &str, target: &mut T) -> Result<(), super::ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *target = value
            .parse()
            .map_err(|e| super::ConfigError::EnvError(format!("Invalid {name}: {e}")))?;
    }
    Ok(())
}

/// Helper function to load a string environment variable.
pub fn load_env_string(name: &str, target: &mut String) {
    if let Ok(value) = std::env::var(name) {
        *target = value;
    }
}

/// Helper function to load a comma separated list, parsing every item.
/// Empty items are skipped, so `NAME=""` yields an empty list.
pub fn load_env_list<T>(name: &str, target: &mut Vec<T>) -> Result<(), super::ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *target = value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| {
                item.parse()
                    .map_err(|e| super::ConfigError::EnvError(format!("Invalid {name}: {e}")))
            })
            .collect::<Result<_, _>>()?;
    }
    Ok(())
}

/// Helper function to load an optional PathBuf environment variable.
pub fn load_env_path_opt(name: &str, target: &mut Option<std::path::PathBuf>) {
    if let Ok(value) = std::env::var(name) {
        *target = Some(std::path::PathBuf::from(value));
    }
}
