/// Structured logging for the field forecast view
///
/// Provides context-rich logging with an API source tag and an optional
/// field name on every line. Output goes through `tracing`: console on
/// stderr, plus an optional append-only log file.

use std::fmt;
use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt as tfmt};

use crate::model::ApiError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parses a config value (`debug`, `info`, `warn`/`warning`, `error`).
    pub fn parse(value: &str) -> Option<LogLevel> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warning),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    fn filter_directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Fields,
    Forecast,
    View,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Fields => write!(f, "FIELDS"),
            DataSource::Forecast => write!(f, "FORECAST"),
            DataSource::View => write!(f, "VIEW"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - e.g. the field was deleted on the server
    Expected,
    /// Unexpected failure - server error, unreachable API, or a changed response shape
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classify an API failure by error kind and status code
pub fn classify_api_failure(err: &ApiError) -> FailureType {
    match err {
        ApiError::Http(404) => FailureType::Expected,
        ApiError::Http(code) if *code >= 500 => FailureType::Unexpected,
        ApiError::Http(_) => FailureType::Unknown,
        ApiError::Transport(_) => FailureType::Unexpected,
        // A body we cannot parse means the API changed under us
        ApiError::Parse(_) => FailureType::Unexpected,
    }
}

// ---------------------------------------------------------------------------
// Logger Initialization
// ---------------------------------------------------------------------------

/// Initialize the global logger
///
/// `RUST_LOG`, when set, takes precedence over `min_level`. Calling this
/// more than once is harmless; later calls are ignored.
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(min_level.filter_directive()));

    let console: Box<dyn Layer<Registry> + Send + Sync> = if console_timestamps {
        Box::new(tfmt::layer().with_writer(std::io::stderr).with_target(false))
    } else {
        Box::new(
            tfmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
    };

    let file_layer = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(tfmt::layer().with_ansi(false).with_writer(Mutex::new(file))),
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", path, e);
                None
            }
        }
    });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .with(filter)
        .try_init();
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(source: DataSource, field: Option<&str>, message: &str) {
    tracing::info!(source = %source, field = field.unwrap_or("-"), "{}", message);
}

/// Log a warning message
pub fn warn(source: DataSource, field: Option<&str>, message: &str) {
    tracing::warn!(source = %source, field = field.unwrap_or("-"), "{}", message);
}

/// Log an error message
pub fn error(source: DataSource, field: Option<&str>, message: &str) {
    tracing::error!(source = %source, field = field.unwrap_or("-"), "{}", message);
}

/// Log a debug message
pub fn debug(source: DataSource, field: Option<&str>, message: &str) {
    tracing::debug!(source = %source, field = field.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log an API failure with automatic classification
pub fn log_api_failure(source: DataSource, field: Option<&str>, operation: &str, err: &ApiError) {
    let failure_type = classify_api_failure(err);
    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => debug(source, field, &message),
        FailureType::Unexpected => error(source, field, &message),
        FailureType::Unknown => warn(source, field, &message),
    }
}

// ---------------------------------------------------------------------------
// Verification Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a verification run
pub fn log_verification_summary(total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Verification complete: {}/{} successful, {} failed",
        successful, total, failed
    );

    if failed == 0 {
        info(DataSource::Forecast, None, &message);
    } else if successful == 0 {
        error(DataSource::Forecast, None, &message);
    } else {
        warn(DataSource::Forecast, None, &message);
    }
}
