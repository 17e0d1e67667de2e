use super::config::{Config, IgnoredEventTags, MessageConfig};
use super::events::{EventKind, LogEvents, ServerInfo, matches_tag_group};
use crate::domain::{EventError, LifecycleEvent, LogRecord, SetupError};
use crate::ignore::IgnoreTable;
use crate::levels::{LevelMap, Resolver};
use crate::logger::{Bindings, Logger, NoopLogger, TracingLogger};
use crate::serializer::{
    ErrorSerializerFn, RequestSerializerFn, ResponseSerializerFn, Serializers,
};
use crate::snapshot::{ErrorSnapshot, RequestSnapshot, ResponseSnapshot, to_json};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Setup-time options for [`RequestLogging`].
pub struct RequestLoggingBuilder {
    logger: Option<Arc<dyn Logger>>,
    tags: Vec<(String, String)>,
    all_tags: String,
    ignore_paths: Vec<String>,
    merge_log_data: bool,
    log_events: Vec<String>,
    log_request_start: bool,
    log_request_complete: bool,
    ignored_event_tags: IgnoredEventTags,
    messages: MessageConfig,
    req: Option<Arc<RequestSerializerFn>>,
    res: Option<Arc<ResponseSerializerFn>>,
    err: Option<Arc<ErrorSerializerFn>>,
}

impl Default for RequestLoggingBuilder {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RequestLoggingBuilder {
    pub fn from_config(config: &Config) -> Self {
        Self {
            logger: None,
            tags: config
                .tag_pairs()
                .map(|(tag, level)| (tag.to_string(), level.to_string()))
                .collect(),
            all_tags: config.all_tags.clone(),
            ignore_paths: config.ignore_paths.clone(),
            merge_log_data: config.merge_log_data,
            log_events: config.log_events.clone(),
            log_request_start: config.log_request_start,
            log_request_complete: config.log_request_complete,
            ignored_event_tags: config.ignored_event_tags.clone(),
            messages: config.messages.clone(),
            req: None,
            res: None,
            err: None,
        }
    }

    /// Defaults to a [`TracingLogger`].
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>, level: impl Into<String>) -> Self {
        self.tags.push((tag.into(), level.into()));
        self
    }

    pub fn all_tags(mut self, level: impl Into<String>) -> Self {
        self.all_tags = level.into();
        self
    }

    pub fn ignore_path(mut self, path: impl Into<String>) -> Self {
        self.ignore_paths.push(path.into());
        self
    }

    pub fn merge_log_data(mut self, merge: bool) -> Self {
        self.merge_log_data = merge;
        self
    }

    pub fn log_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.log_events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn log_request_start(mut self, enabled: bool) -> Self {
        self.log_request_start = enabled;
        self
    }

    pub fn log_request_complete(mut self, enabled: bool) -> Self {
        self.log_request_complete = enabled;
        self
    }

    pub fn ignored_event_tags(mut self, groups: IgnoredEventTags) -> Self {
        self.ignored_event_tags = groups;
        self
    }

    pub fn messages(mut self, messages: MessageConfig) -> Self {
        self.messages = messages;
        self
    }

    pub fn request_serializer<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestSnapshot<'_>) -> Value + Send + Sync + 'static,
    {
        self.req = Some(Arc::new(f));
        self
    }

    pub fn response_serializer<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResponseSnapshot<'_>) -> Value + Send + Sync + 'static,
    {
        self.res = Some(Arc::new(f));
        self
    }

    pub fn error_serializer<F>(mut self, f: F) -> Self
    where
        F: Fn(&ErrorSnapshot<'_>) -> Value + Send + Sync + 'static,
    {
        self.err = Some(Arc::new(f));
        self
    }

    /// Validates the options and freezes them.
    pub fn build(self) -> Result<RequestLogging, SetupError> {
        let levels = LevelMap::build(self.tags, &self.all_tags)?;
        let events = LogEvents::parse(&self.log_events)?;
        let serializers = Serializers::new(self.req, self.res, self.err);
        let resolver =
            Resolver::new(levels, self.merge_log_data).with_error_serializer(serializers.err.clone());

        tracing::debug!(
            tags = resolver.levels().len(),
            ignored_paths = self.ignore_paths.len(),
            merge_log_data = self.merge_log_data,
            "request logging configured"
        );

        Ok(RequestLogging {
            logger: self.logger.unwrap_or_else(|| Arc::new(TracingLogger::new())),
            resolver,
            ignore: IgnoreTable::new(self.ignore_paths),
            serializers,
            events,
            ignored_event_tags: self.ignored_event_tags,
            messages: self.messages,
            log_request_start: self.log_request_start,
            log_request_complete: self.log_request_complete,
        })
    }
}

/// Server-wide request logging state, shared by every request.
pub struct RequestLogging {
    logger: Arc<dyn Logger>,
    resolver: Resolver,
    ignore: IgnoreTable,
    serializers: Serializers,
    events: LogEvents,
    ignored_event_tags: IgnoredEventTags,
    messages: MessageConfig,
    log_request_start: bool,
    log_request_complete: bool,
}

impl RequestLogging {
    pub fn builder() -> RequestLoggingBuilder {
        RequestLoggingBuilder::default()
    }

    pub fn from_config(config: &Config, logger: Arc<dyn Logger>) -> Result<Self, SetupError> {
        RequestLoggingBuilder::from_config(config).logger(logger).build()
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn serializers(&self) -> &Serializers {
        &self.serializers
    }

    pub fn is_enabled(&self, kind: EventKind) -> bool {
        self.events.contains(kind)
    }

    pub fn is_ignored_path(&self, path: &str) -> bool {
        self.ignore.contains(path)
    }

    /// Server-level event: tags resolve the severity.
    ///
    /// Ignored tag groups only drop error-free events; an event carrying an
    /// error is always logged at warn.
    pub fn log_event(&self, event: &LifecycleEvent) {
        if event.error.is_none() && matches_tag_group(&self.ignored_event_tags.log, event) {
            return;
        }
        self.resolver.emit(self.logger.as_ref(), event);
    }

    pub fn server_started(&self, info: &ServerInfo) {
        if self.is_enabled(EventKind::OnPostStart) {
            self.logger
                .info(server_record(info, &self.messages.server_started));
        }
    }

    pub fn server_stopped(&self, info: &ServerInfo) {
        if self.is_enabled(EventKind::OnPostStop) {
            self.logger
                .info(server_record(info, &self.messages.server_stopped));
        }
    }

    /// Logger for one request, with `req` bound.
    ///
    /// Ignored paths get a disabled logger; the request serializer is not
    /// invoked for them.
    pub fn request_logger(self: &Arc<Self>, parts: &http::request::Parts) -> RequestLogger {
        if self.is_ignored_path(parts.uri.path()) {
            return RequestLogger::disabled();
        }

        let mut bindings = Bindings::new();
        bindings.insert("req".to_string(), self.serializers.request(parts));

        RequestLogger {
            logger: self.logger.child(bindings),
            shared: Some(Arc::clone(self)),
        }
    }
}

impl fmt::Debug for RequestLogging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogging")
            .field("resolver", &self.resolver)
            .field("ignore", &self.ignore)
            .field("serializers", &self.serializers)
            .field("events", &self.events)
            .field("log_request_start", &self.log_request_start)
            .field("log_request_complete", &self.log_request_complete)
            .finish_non_exhaustive()
    }
}

fn server_record(info: &ServerInfo, msg: &str) -> LogRecord {
    let mut record = match to_json(info) {
        Value::Object(fields) => LogRecord::from(fields),
        _ => LogRecord::new(),
    };
    record.insert(LogRecord::MESSAGE_KEY, msg);
    record
}

/// Per-request logger, inserted into the request extensions.
#[derive(Clone)]
pub struct RequestLogger {
    logger: Arc<dyn Logger>,
    shared: Option<Arc<RequestLogging>>,
}

impl RequestLogger {
    /// Logger for an ignored request: every call is a no-op.
    pub fn disabled() -> Self {
        Self {
            logger: NoopLogger::shared(),
            shared: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.shared.is_some()
    }

    /// The child logger carrying `req`.
    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    /// Request-level event: tags resolve the severity. Error events skip the
    /// ignored tag groups.
    pub fn log(&self, event: &LifecycleEvent) {
        let Some(shared) = &self.shared else {
            return;
        };
        if event.error.is_none() && matches_tag_group(&shared.ignored_event_tags.request, event) {
            return;
        }
        shared.resolver.emit(self.logger.as_ref(), event);
    }

    pub(crate) fn request_start(&self) {
        if let Some(shared) = &self.shared
            && shared.log_request_start
        {
            self.logger
                .info(LogRecord::message(shared.messages.request_start.as_str()));
        }
    }

    /// Logs a failed request at `warn` as `{ err }`.
    pub fn request_error(&self, error: &EventError) {
        let Some(shared) = &self.shared else {
            return;
        };
        if !shared.is_enabled(EventKind::RequestError) {
            return;
        }
        self.logger.warn(
            LogRecord::message(shared.messages.request_error.as_str())
                .with("err", shared.serializers.error(error)),
        );
    }

    pub(crate) fn request_complete(&self, res: &http::response::Parts, elapsed: Duration) {
        let Some(shared) = &self.shared else {
            return;
        };
        if !shared.log_request_complete || !shared.is_enabled(EventKind::Response) {
            return;
        }
        let response_time = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.logger.info(
            LogRecord::message(shared.messages.request_complete.as_str())
                .with("res", shared.serializers.response(res))
                .with("responseTime", response_time),
        );
    }
}

impl fmt::Debug for RequestLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestLogger")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}
