//! Structured logging for the trading bot.
//!
//! Provides:
//! - Console output in pretty, compact or JSON format
//! - A per-run log file at DEBUG level
//! - Secret masking on every output

mod config;
mod writer;

pub use config::{FileOutput, LogConfig, LogFormat};
pub use writer::{MaskingMakeWriter, MaskingWriter};

use crate::masking::SensitiveDataMasker;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Keeps the file writer alive. Dropping it flushes pending log lines.
#[must_use = "dropping the handle stops file logging"]
pub struct LogHandle {
    _guards: Vec<WorkerGuard>,
    file_path: Option<PathBuf>,
}

impl LogHandle {
    /// Path of this run's log file, if file logging is enabled.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

/// Initialize the logging system with the given configuration.
///
/// # Example
///
/// ```no_run
/// use tradebot_telemetry::logging::{init_logging, LogConfig};
///
/// let handle = init_logging(&LogConfig::default()).expect("Failed to initialize logging");
/// ```
pub fn init_logging(config: &LogConfig) -> Result<LogHandle, LoggingError> {
    let masker = Arc::new(SensitiveDataMasker::new());
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guards = Vec::new();
    let mut file_path = None;

    if config.console {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => parse_filter(&config.level)?,
        };
        layers.push(create_console_layer(config, filter, Arc::clone(&masker)));
    }

    if let Some(file) = &config.file {
        let (layer, guard, path) = create_file_layer(config, file, Arc::clone(&masker))?;
        layers.push(layer);
        guards.push(guard);
        file_path = Some(path);
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(LogHandle {
        _guards: guards,
        file_path,
    })
}

fn parse_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level)
        .map_err(|e| LoggingError::InvalidConfig(format!("invalid level '{level}': {e}")))
}

fn create_console_layer(
    config: &LogConfig,
    filter: EnvFilter,
    masker: Arc<SensitiveDataMasker>,
) -> BoxedLayer {
    let base = fmt::layer()
        .with_writer(MaskingMakeWriter::new(std::io::stderr, masker))
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_target(false)
        .with_file(config.include_file_info)
        .with_line_number(config.include_file_info);

    match config.format {
        LogFormat::Pretty => base.with_filter(filter).boxed(),
        LogFormat::Compact => base.compact().with_filter(filter).boxed(),
        LogFormat::Json => base.json().flatten_event(true).with_filter(filter).boxed(),
    }
}

fn create_file_layer(
    config: &LogConfig,
    file: &FileOutput,
    masker: Arc<SensitiveDataMasker>,
) -> Result<(BoxedLayer, WorkerGuard, PathBuf), LoggingError> {
    std::fs::create_dir_all(&file.dir)?;
    let name = file.file_name(chrono::Local::now());
    let path = file.dir.join(&name);

    let appender = tracing_appender::rolling::never(&file.dir, &name);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer()
        .with_writer(MaskingMakeWriter::new(non_blocking, masker))
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .with_ansi(false)
        .with_target(true)
        .with_file(config.include_file_info)
        .with_line_number(config.include_file_info)
        .with_filter(parse_filter(&file.level)?)
        .boxed();

    Ok((layer, guard, path))
}

/// Errors that can occur during logging initialization.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory: {0}")]
    DirectoryCreation(#[from] std::io::Error),

    /// Invalid configuration
    #[error("Invalid logging configuration: {0}")]
    InvalidConfig(String),

    /// A global subscriber was already installed
    #[error("Failed to install logger: {0}")]
    Init(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_rejected() {
        assert!(matches!(
            parse_filter("loud=="),
            Err(LoggingError::InvalidConfig(_))
        ));
        assert!(parse_filter("debug").is_ok());
        assert!(parse_filter("info,tradebot_gateway=debug").is_ok());
    }

    #[test]
    fn test_file_logging_masks_secrets() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            console: false,
            file: Some(FileOutput::in_dir(dir.path())),
            ..LogConfig::default()
        };

        let handle = init_logging(&config).unwrap();
        let path = handle.file_path().unwrap().to_path_buf();
        tracing::debug!(
            api_key = "abcdefghijklmnop1234567890123456",
            "Credentials loaded"
        );
        drop(handle);

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("trading_bot_") && name.ends_with(".log"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("Credentials loaded"));
        assert!(contents.contains("abc***456"));
        assert!(!contents.contains("abcdefghijklmnop1234567890123456"));
        assert!(!contents.contains('\u{1b}'));
    }
}
