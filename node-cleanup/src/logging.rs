//! Logging configuration module
//!
//! Console logging on stderr, plus an optional JSON log file.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::non_blocking;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingSettings;

const LOG_FILE_NAME: &str = "node-cleanup.log";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,               // log level (trace, debug, info, warn, error)
    pub json_format: bool,           // use JSON formatting on the console
    pub directory: Option<PathBuf>,  // directory for the log file
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
            directory: None,
        }
    }
}

impl LoggingConfig {
    /// Build from file settings; `verbose` forces the debug level
    pub fn from_settings(settings: &LoggingSettings, verbose: bool) -> Self {
        let level = if verbose {
            "debug".to_string()
        } else {
            settings.level.to_lowercase()
        };

        Self {
            level,
            json_format: settings.json,
            directory: settings.directory.clone(),
        }
    }

    /// Initialize logging based on configuration.
    ///
    /// The returned guard flushes the log file when dropped and must be held
    /// until the process exits.
    pub fn init(&self) -> anyhow::Result<Option<WorkerGuard>> {
        // RUST_LOG wins over the configured level
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.level));

        let mut layers = Vec::new();

        let console_layer = if self.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_writer(io::stderr)
                .boxed()
        } else {
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_ansi(io::stderr().is_terminal())
                .with_writer(io::stderr)
                .boxed()
        };
        layers.push(console_layer);

        let guard = match &self.directory {
            Some(dir) => {
                let (writer, guard) = non_blocking(file_appender(dir)?);

                let file_layer = fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .json()
                    .with_writer(writer)
                    .boxed();
                layers.push(file_layer);

                Some(guard)
            }
            None => None,
        };

        tracing_subscriber::registry()
            .with(layers)
            .with(env_filter)
            .try_init()?;

        tracing::debug!("Logging initialized - level: {}", self.level);

        Ok(guard)
    }
}

/// Open the non-rotating log file, creating the directory if needed
fn file_appender(dir: &Path) -> anyhow::Result<RollingFileAppender> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE_NAME)
        .build(dir)?;
    Ok(appender)
}
