use super::config::LogFormat;
use super::initialization::{FallbackStrategy, InitializationError, LogDirective};
use crate::domain::Severity;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Builds the EnvFilter for the process-wide subscriber.
pub struct LoggingSystem {
    directives: Arc<RwLock<Vec<LogDirective>>>,
    fallback_level: Severity,
}

impl LoggingSystem {
    pub fn new() -> Self {
        Self {
            directives: Arc::new(RwLock::new(Vec::new())),
            fallback_level: Severity::Info,
        }
    }

    pub fn add_directive(&self, directive_str: &str) -> Result<(), InitializationError> {
        match LogDirective::parse(directive_str) {
            Ok(directive) => {
                self.directives.write().push(directive);
                Ok(())
            }
            Err(e) => match e.fallback_strategy() {
                FallbackStrategy::UseDefaultLevel => {
                    eprintln!("Warning: {e}, using default level");
                    self.add_default_directive(directive_str);
                    Ok(())
                }
                FallbackStrategy::SkipDirective => {
                    eprintln!("Warning: {e}, skipping directive");
                    Ok(())
                }
                FallbackStrategy::AbortStartup => Err(e),
            },
        }
    }

    /// デフォルトレベルでのディレクティブ追加
    fn add_default_directive(&self, directive_str: &str) {
        let target = directive_str.split('=').next().unwrap_or("unknown").trim();
        self.directives
            .write()
            .push(LogDirective::new(target, self.fallback_level));
    }

    /// HTTP stack crates are only interesting at warn and above.
    pub fn add_default_directives(&self) {
        let mut directives = self.directives.write();
        for target in ["hyper", "tower", "axum", "h2"] {
            directives.push(LogDirective::new(target, Severity::Warn));
        }
    }

    pub fn initialize_tracing(
        &self,
        default_level: Severity,
        format: LogFormat,
    ) -> Result<(), InitializationError> {
        let filter_string = self.build_filter_string(default_level);

        let env_filter = EnvFilter::try_new(&filter_string).map_err(|e| {
            InitializationError::LoggingInitFailed {
                details: format!("Failed to create EnvFilter with '{filter_string}'"),
                source: Box::new(e),
            }
        })?;

        let result = match format {
            LogFormat::Json => tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .flatten_event(true)
                        .with_current_span(true),
                )
                .try_init(),
            LogFormat::Compact => tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_target(true).with_level(true).compact())
                .try_init(),
        };

        result.map_err(|e| InitializationError::LoggingInitFailed {
            details: "Failed to set global tracing subscriber".to_string(),
            source: Box::new(e),
        })
    }

    /// フィルタ文字列の構築
    pub fn build_filter_string(&self, default_level: Severity) -> String {
        let directives = self.directives.read();

        let mut filter_parts = Vec::with_capacity(directives.len() + 1);
        filter_parts.push(default_level.as_filter_str().to_string());
        filter_parts.extend(directives.iter().map(LogDirective::to_filter_string));

        filter_parts.join(",")
    }

    pub fn directive_count(&self) -> usize {
        self.directives.read().len()
    }

    pub fn clear_directives(&self) {
        self.directives.write().clear();
    }
}

impl Default for LoggingSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Installs the global subscriber once; later calls report the first outcome.
pub fn setup_logging_safe(level: Severity, format: LogFormat) -> Result<(), InitializationError> {
    use std::sync::OnceLock;

    static INIT: OnceLock<Result<(), String>> = OnceLock::new();

    let outcome = INIT.get_or_init(|| {
        let logging_system = LoggingSystem::new();
        logging_system.add_default_directives();
        if let Ok(extra) = std::env::var("RUST_LOG") {
            for directive in extra.split(',').filter(|d| !d.trim().is_empty()) {
                logging_system
                    .add_directive(directive)
                    .map_err(|e| e.to_string())?;
            }
        }
        logging_system
            .initialize_tracing(level, format)
            .map_err(|e| e.to_string())
    });

    outcome
        .clone()
        .map_err(|details| InitializationError::LoggingInitFailed {
            details,
            source: Box::new(std::io::Error::other("Logging initialization error")),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_logging_system_creation() {
        let logging_system = LoggingSystem::new();
        assert_eq!(logging_system.directive_count(), 0);
    }

    #[test]
    fn test_add_valid_directive() {
        let logging_system = LoggingSystem::new();

        assert!(logging_system.add_directive("hyper=warn").is_ok());
        assert!(logging_system.add_directive("rask_request_logger=trace").is_ok());
        assert_eq!(logging_system.directive_count(), 2);
    }

    #[test]
    fn test_fallback_strategies() {
        let logging_system = LoggingSystem::new();

        let test_cases = vec![
            ("hyper=warn", 1),           // Valid
            ("invalid_format", 1),       // Skip directive
            ("target=invalid_level", 2), // Use default level
            ("=empty", 2),               // Skip directive
            ("", 2),                     // Skip directive
        ];

        for (directive, expected_count) in test_cases {
            assert!(logging_system.add_directive(directive).is_ok(), "Directive: {directive}");
            assert_eq!(
                logging_system.directive_count(),
                expected_count,
                "Directive: {directive}"
            );
        }

        assert!(logging_system.build_filter_string(Severity::Info).ends_with("target=info"));
    }

    #[test]
    fn test_add_default_directives() {
        let logging_system = LoggingSystem::new();
        logging_system.add_default_directives();
        assert_eq!(logging_system.directive_count(), 4);
        assert_eq!(
            logging_system.build_filter_string(Severity::Debug),
            "debug,hyper=warn,tower=warn,axum=warn,h2=warn"
        );
    }

    #[test]
    fn test_build_filter_string_maps_fatal() {
        let logging_system = LoggingSystem::new();
        assert_eq!(logging_system.build_filter_string(Severity::Info), "info");
        assert_eq!(logging_system.build_filter_string(Severity::Fatal), "error");
    }

    #[test]
    fn test_concurrent_directive_modification() {
        let logging_system = Arc::new(LoggingSystem::new());

        let writers: Vec<_> = (0..50)
            .map(|i| {
                let logging_system = logging_system.clone();
                thread::spawn(move || logging_system.add_directive(&format!("target{i}=info")))
            })
            .collect();

        let readers: Vec<_> = (0..25)
            .map(|_| {
                let logging_system = logging_system.clone();
                thread::spawn(move || logging_system.build_filter_string(Severity::Info))
            })
            .collect();

        for handle in writers {
            assert!(handle.join().is_ok());
        }
        for handle in readers {
            assert!(handle.join().is_ok());
        }

        assert_eq!(logging_system.directive_count(), 50);
    }

    #[test]
    fn test_clear_directives() {
        let logging_system = LoggingSystem::new();
        logging_system.add_directive("hyper=warn").unwrap();
        logging_system.clear_directives();
        assert_eq!(logging_system.directive_count(), 0);
    }
}
