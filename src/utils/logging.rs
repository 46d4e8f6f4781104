//! Logging configuration and subscriber setup
//!
//! Console output always goes to stderr so that `inspect` can print its result on
//! stdout. A plain-text copy of the log can be written next to the scanned files.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::error::{VidchewError, VidchewResult};

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// One line per event
    Compact,
    /// JSON for structured logging
    Json,
}

/// Logging configuration options
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Directory receiving a timestamped log file, if any
    pub file_directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            file_directory: None,
        }
    }
}

/// Logging system manager
pub struct LoggingSystem {
    config: LoggingConfig,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

impl LoggingSystem {
    pub fn new(config: LoggingConfig) -> Self {
        Self { config }
    }

    /// Name of the log file for a run started at `started`
    pub fn log_file_name(started: DateTime<Local>) -> String {
        format!("vidchew-{}.log", started.format("%m%d%y%H%M%S"))
    }

    /// `RUST_LOG` wins over the configured level
    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_filter()))
    }

    fn console_layer(&self) -> BoxedLayer {
        let layer = fmt::layer().with_writer(io::stderr).with_target(false);
        match self.config.format {
            LogFormat::Json => layer.json().with_filter(self.filter()).boxed(),
            LogFormat::Pretty => layer.pretty().with_filter(self.filter()).boxed(),
            LogFormat::Compact => layer.compact().with_filter(self.filter()).boxed(),
        }
    }

    fn file_layer(&self, path: &Path) -> VidchewResult<BoxedLayer> {
        let file = File::create(path).map_err(|e| VidchewError::OutputError {
            message: format!("cannot create log file {}: {}", path.display(), e),
        })?;
        Ok(fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
            .with_filter(self.filter())
            .boxed())
    }

    /// Install the global subscriber; returns the log file path when one was created
    pub fn initialize(&self) -> VidchewResult<Option<PathBuf>> {
        let mut layers: Vec<BoxedLayer> = vec![self.console_layer()];

        let log_file = match &self.config.file_directory {
            Some(directory) => {
                let path = directory.join(Self::log_file_name(Local::now()));
                layers.push(self.file_layer(&path)?);
                Some(path)
            }
            None => None,
        };

        tracing_subscriber::registry()
            .with(layers)
            .try_init()
            .map_err(|e| VidchewError::OutputError {
                message: format!("logging already initialized: {}", e),
            })?;

        tracing::debug!("Logging initialized with level {:?}", self.config.level);
        Ok(log_file)
    }
}
