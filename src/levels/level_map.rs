use crate::domain::{NO_MATCH, SetupError, Severity};
use std::collections::HashMap;

/// Tag → severity lookup, validated once at setup.
///
/// Starts from the builtin map (every severity name maps to itself) and
/// applies the caller's overrides on top. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMap {
    tags: HashMap<String, Severity>,
    fallback: Severity,
}

impl LevelMap {
    /// Builds the map, rejecting every value that is not a severity name.
    ///
    /// All offending entries are reported at once as `tag=value`; an invalid
    /// fallback is reported as `allTags=value`.
    pub fn build<I, K, V>(overrides: I, fallback_name: &str) -> Result<Self, SetupError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut tags: HashMap<String, Severity> = Severity::ALL
            .into_iter()
            .map(|severity| (severity.name().to_string(), severity))
            .collect();
        let mut offending = Vec::new();

        for (tag, name) in overrides {
            let tag = tag.into();
            let name = name.as_ref();
            match Severity::from_name(name) {
                Some(severity) => {
                    tags.insert(tag, severity);
                }
                None => offending.push(format!("{tag}={name}")),
            }
        }

        let fallback = Severity::from_name(fallback_name);
        if fallback.is_none() {
            offending.push(format!("allTags={fallback_name}"));
        }

        match fallback {
            Some(fallback) if offending.is_empty() => Ok(Self { tags, fallback }),
            _ => Err(SetupError::InvalidTagLevelConfig { offending }),
        }
    }

    /// Builtin map only, with `fallback` for unmatched events.
    pub fn with_fallback(fallback: Severity) -> Self {
        Self {
            tags: Severity::ALL
                .into_iter()
                .map(|severity| (severity.name().to_string(), severity))
                .collect(),
            fallback,
        }
    }

    /// Rank of the severity mapped to `tag`, or [`NO_MATCH`].
    pub fn rank_of(&self, tag: &str) -> u8 {
        self.tags.get(tag).map_or(NO_MATCH, |severity| severity.rank())
    }

    pub fn severity_of(&self, tag: &str) -> Option<Severity> {
        self.tags.get(tag).copied()
    }

    pub fn fallback(&self) -> Severity {
        self.fallback
    }

    pub fn fallback_rank(&self) -> u8 {
        self.fallback.rank()
    }

    /// Highest mapped severity among `tags`, or the fallback when none maps.
    ///
    /// Any match beats the fallback, even a lower one.
    pub fn resolve_tags<I, S>(&self, tags: I) -> Severity
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let highest = tags
            .into_iter()
            .map(|tag| self.rank_of(tag.as_ref()))
            .max()
            .unwrap_or(NO_MATCH);

        if highest > NO_MATCH {
            Severity::from_rank(highest).unwrap_or(self.fallback)
        } else {
            self.fallback
        }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for LevelMap {
    fn default() -> Self {
        Self::with_fallback(Severity::Info)
    }
}
