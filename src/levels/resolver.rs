use super::level_map::LevelMap;
use crate::domain::{EventError, LifecycleEvent, LogRecord, Severity};
use crate::logger::Logger;
use crate::serializer::{ErrorKind, Serializer, SnapshotKind};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Outcome of resolving one event: the level to log at and what to log.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEvent {
    pub severity: Severity,
    pub record: LogRecord,
}

/// Turns lifecycle events into `(severity, record)` pairs.
///
/// Holds no mutable state; one resolver is shared by every request.
#[derive(Clone)]
pub struct Resolver {
    levels: Arc<LevelMap>,
    merge_log_data: bool,
    err: Serializer<EventError>,
}

impl Resolver {
    pub fn new(levels: LevelMap, merge_log_data: bool) -> Self {
        Self {
            levels: Arc::new(levels),
            merge_log_data,
            err: ErrorKind::default_serializer(),
        }
    }

    pub fn with_error_serializer(mut self, err: Serializer<EventError>) -> Self {
        self.err = err;
        self
    }

    pub fn levels(&self) -> &LevelMap {
        &self.levels
    }

    pub fn merge_log_data(&self) -> bool {
        self.merge_log_data
    }

    pub fn resolve(&self, event: &LifecycleEvent) -> ResolvedEvent {
        self.resolve_with_mode(event, self.merge_log_data)
    }

    /// Resolves `event` with an explicit merge mode.
    ///
    /// Events carrying an error are logged at `warn` as `{ err }` and skip
    /// tag resolution.
    pub fn resolve_with_mode(&self, event: &LifecycleEvent, merge: bool) -> ResolvedEvent {
        if let Some(error) = &event.error {
            return ResolvedEvent {
                severity: Severity::Warn,
                record: LogRecord::new().with("err", (self.err)(error)),
            };
        }

        ResolvedEvent {
            severity: self.levels.resolve_tags(&event.tags),
            record: shape_record(&event.tags, event.data.as_ref(), merge),
        }
    }

    /// Resolves `event` and writes it to `logger`.
    pub fn emit(&self, logger: &dyn Logger, event: &LifecycleEvent) {
        let ResolvedEvent { severity, record } = self.resolve(event);
        logger.log(severity, record);
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("levels", &self.levels)
            .field("merge_log_data", &self.merge_log_data)
            .finish_non_exhaustive()
    }
}

/// Builds the record for a tagged event.
///
/// Merged: string data becomes `{ msg }`, object data is flattened next to
/// `tags` (data keys win), anything else stays under `data`. Nested:
/// `{ tags, data }`. Missing data leaves just `{ tags }`.
pub fn shape_record(tags: &[String], data: Option<&Value>, merge: bool) -> LogRecord {
    let mut record = LogRecord::new().with("tags", tags.to_vec());

    match (data, merge) {
        (None, _) => {}
        (Some(Value::String(msg)), true) => record.insert(LogRecord::MESSAGE_KEY, msg.clone()),
        (Some(Value::Object(fields)), true) => record.extend(fields.clone()),
        (Some(other), _) => record.insert("data", other.clone()),
    }

    record
}
