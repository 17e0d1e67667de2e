pub mod config;
pub mod events;
pub mod initialization;
pub mod logging_system;
pub mod middleware;
pub mod plugin;
pub mod router;
pub mod shutdown;

pub use config::{Config, ConfigError, LogFormat, TagLevel};
pub use events::{EventKind, ServerInfo};
pub use initialization::InitializationError;
pub use logging_system::{LoggingSystem, setup_logging_safe};
pub use middleware::{ResponseError, log_requests, with_request_logging};
pub use plugin::{RequestLogger, RequestLogging, RequestLoggingBuilder};
pub use router::create_router;
pub use shutdown::shutdown_signal;

use crate::logger::TracingLogger;
use clap::Parser;
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use tracing::{error, info};

pub struct App {
    config: Config,
    logging: Arc<RequestLogging>,
}

impl App {
    pub fn from_args<I, T>(args: I) -> Result<Self, InitializationError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args_and_env(args)?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, InitializationError> {
        setup_logging_safe(config.log_level, config.log_format)?;

        let logging = RequestLogging::from_config(&config, Arc::new(TracingLogger::new()))?;

        info!("Starting rask-request-logger v{}", env!("CARGO_PKG_VERSION"));
        info!(
            "Configuration: tags={}, ignored_paths={}, log_events={:?}",
            config.tags.len(),
            config.ignore_paths.len(),
            config.log_events
        );

        Ok(Self {
            config,
            logging: Arc::new(logging),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn logging(&self) -> &Arc<RequestLogging> {
        &self.logging
    }

    pub async fn run(self) -> Result<(), InitializationError> {
        let addr = self.config.listen_addr;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| InitializationError::Server {
                addr: addr.to_string(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| InitializationError::Server {
                addr: addr.to_string(),
                source,
            })?;

        let server_info = ServerInfo::new(local_addr);
        self.logging.server_started(&server_info);

        let app = create_router(Arc::clone(&self.logging));
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| InitializationError::Server {
            addr: local_addr.to_string(),
            source,
        })?;

        self.logging.server_stopped(&server_info);
        Ok(())
    }
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Main entry point for the application
pub async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args: Vec<String> = std::env::args().collect();

    // Handle version flag specially
    if args.len() > 1 && (args[1] == "--version" || args[1] == "-V") {
        println!("rask-request-logger {}", get_version());
        return Ok(());
    }

    // Handle help flag
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        Config::parse_from(["rask-request-logger", "--help"]);
        return Ok(());
    }

    match App::from_args(args) {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("Application error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    }

    Ok(())
}
