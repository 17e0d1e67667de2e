use super::config::ConfigError;
use crate::domain::{SetupError, Severity};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("Invalid log level '{input}'. Valid levels: {valid_levels:?}")]
    InvalidLogLevel {
        input: String,
        valid_levels: Vec<&'static str>,
    },

    #[error("Invalid directive format '{input}'. Expected: '{expected}'")]
    InvalidDirectiveFormat { input: String, expected: String },

    #[error("Empty target in directive '{input}'")]
    EmptyTarget { input: String },

    #[error("Logging system initialization failed: {details}")]
    LoggingInitFailed {
        details: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("Server error on {addr}: {source}")]
    Server {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

impl InitializationError {
    /// 回復可能性の判定
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InitializationError::InvalidLogLevel { .. }
                | InitializationError::InvalidDirectiveFormat { .. }
                | InitializationError::EmptyTarget { .. }
        )
    }

    /// フォールバック戦略
    pub fn fallback_strategy(&self) -> FallbackStrategy {
        match self {
            InitializationError::InvalidLogLevel { .. } => FallbackStrategy::UseDefaultLevel,
            InitializationError::InvalidDirectiveFormat { .. }
            | InitializationError::EmptyTarget { .. } => FallbackStrategy::SkipDirective,
            _ => FallbackStrategy::AbortStartup,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStrategy {
    UseDefaultLevel,
    SkipDirective,
    AbortStartup,
}

/// Parses a level name for a filter directive. Case-insensitive, accepts
/// `warning` for `warn`.
pub fn parse_level(input: &str) -> Result<Severity, InitializationError> {
    let lowered = input.to_lowercase();
    let name = if lowered == "warning" { "warn" } else { lowered.as_str() };

    Severity::from_name(name).ok_or_else(|| InitializationError::InvalidLogLevel {
        input: input.to_string(),
        valid_levels: Severity::ALL.iter().map(|severity| severity.name()).collect(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogDirective {
    pub target: String,
    pub level: Severity,
}

impl LogDirective {
    pub fn new(target: impl Into<String>, level: Severity) -> Self {
        Self {
            target: target.into(),
            level,
        }
    }

    pub fn parse(directive: &str) -> Result<Self, InitializationError> {
        let Some((target, level)) = directive.split_once('=') else {
            return Err(InitializationError::InvalidDirectiveFormat {
                input: directive.to_string(),
                expected: "target=level".to_string(),
            });
        };

        if level.contains('=') {
            return Err(InitializationError::InvalidDirectiveFormat {
                input: directive.to_string(),
                expected: "target=level".to_string(),
            });
        }

        let target = target.trim();
        if target.is_empty() {
            return Err(InitializationError::EmptyTarget {
                input: directive.to_string(),
            });
        }

        Ok(LogDirective::new(target, parse_level(level.trim())?))
    }

    /// tracing_subscriber::EnvFilter用の文字列変換
    pub fn to_filter_string(&self) -> String {
        format!("{}={}", self.target, self.level.as_filter_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("error").unwrap(), Severity::Error);
        assert_eq!(parse_level("WARN").unwrap(), Severity::Warn);
        assert_eq!(parse_level("warning").unwrap(), Severity::Warn);
        assert_eq!(parse_level("fatal").unwrap(), Severity::Fatal);
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn test_log_directive_parse() {
        let directive = LogDirective::parse("hyper=warn").unwrap();
        assert_eq!(directive.target, "hyper");
        assert_eq!(directive.level, Severity::Warn);

        let directive = LogDirective::parse("  tower = debug  ").unwrap();
        assert_eq!(directive.target, "tower");
        assert_eq!(directive.level, Severity::Debug);
    }

    #[test]
    fn test_log_directive_parse_errors() {
        assert!(matches!(
            LogDirective::parse("invalid"),
            Err(InitializationError::InvalidDirectiveFormat { .. })
        ));
        assert!(matches!(
            LogDirective::parse("a=b=c"),
            Err(InitializationError::InvalidDirectiveFormat { .. })
        ));
        assert!(matches!(
            LogDirective::parse("=info"),
            Err(InitializationError::EmptyTarget { .. })
        ));
        assert!(matches!(
            LogDirective::parse("hyper=loud"),
            Err(InitializationError::InvalidLogLevel { .. })
        ));
    }

    #[test]
    fn test_fatal_directive_maps_to_error_filter() {
        let directive = LogDirective::new("app", Severity::Fatal);
        assert_eq!(directive.to_filter_string(), "app=error");
    }

    #[test]
    fn test_fallback_strategy() {
        let err = LogDirective::parse("hyper=loud").unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(err.fallback_strategy(), FallbackStrategy::UseDefaultLevel);

        let err = LogDirective::parse("noequals").unwrap_err();
        assert_eq!(err.fallback_strategy(), FallbackStrategy::SkipDirective);

        let err = InitializationError::from(SetupError::InvalidTagLevelConfig {
            offending: vec!["db=x".to_string()],
        });
        assert!(!err.is_recoverable());
        assert_eq!(err.fallback_strategy(), FallbackStrategy::AbortStartup);
    }
}
