//! Logging configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Configuration for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Console log level (e.g., "info", "debug"). `RUST_LOG` overrides it.
    #[serde(default = "default_level")]
    pub level: String,

    /// Console output format
    #[serde(default)]
    pub format: LogFormat,

    /// Whether to write to the console
    #[serde(default = "default_console")]
    pub console: bool,

    /// Optional log file output
    #[serde(default)]
    pub file: Option<FileOutput>,

    /// Include file and line information
    #[serde(default)]
    pub include_file_info: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            console: default_console(),
            file: Some(FileOutput::default()),
            include_file_info: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_console() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `timestamp | LEVEL | message fields`
    #[default]
    Pretty,
    /// Single-line compact output
    Compact,
    /// JSON format for log aggregation systems
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown log format '{other}', expected pretty, compact or json"
            )),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        })
    }
}

/// A per-run log file.
///
/// Each process writes `{prefix}_{YYYYmmdd_HHMMSS}.log` under `dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileOutput {
    /// Log directory, created if missing
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// File name prefix
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// File log level, independent of the console level
    #[serde(default = "default_file_level")]
    pub level: String,
}

impl Default for FileOutput {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            prefix: default_prefix(),
            level: default_file_level(),
        }
    }
}

fn default_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_prefix() -> String {
    "trading_bot".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

impl FileOutput {
    /// Creates a file output in `dir` with the default prefix and level.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Returns the file name for a run started at `started`.
    #[must_use]
    pub fn file_name(&self, started: chrono::DateTime<chrono::Local>) -> String {
        format!("{}_{}.log", self.prefix, started.format("%Y%m%d_%H%M%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        let file = config.file.unwrap();
        assert_eq!(file.dir, PathBuf::from("logs"));
        assert_eq!(file.level, "debug");
    }

    #[test]
    fn test_file_name() {
        let started = chrono::Local
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
            .single()
            .unwrap();
        assert_eq!(
            FileOutput::default().file_name(started),
            "trading_bot_20240309_070501.log"
        );
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LogConfig = serde_json::from_str(r#"{"level": "debug", "format": "json"}"#)
            .unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.console);
        assert!(config.file.is_none());
    }
}
