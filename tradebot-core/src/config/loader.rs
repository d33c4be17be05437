//! Reads `tradebot.yaml` (or `.toml` / `.json`) into typed config.

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// File format, picked by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// `.yaml`, `.yml`
    #[default]
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl ConfigFormat {
    /// Case-insensitive; `None` for anything else.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "yaml" | "yml" => Some(Self::Yaml),
                "toml" => Some(Self::Toml),
                "json" => Some(Self::Json),
                _ => None,
            })
    }
}

/// Stateless front end over `serde_yaml`, `toml` and `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Returns the loader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reads and parses `path`.
    ///
    /// # Errors
    ///
    /// `InvalidFormat` for an unknown extension or a parse failure,
    /// `FileReadError` when the file cannot be read.
    pub fn load_file<T, P>(&self, path: P) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::InvalidFormat {
            path: path.display().to_string(),
            reason: "expected a .yaml, .yml, .toml or .json file".to_string(),
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::parse(&content, format, &path.display().to_string())
    }

    /// Parses inline content; errors name the origin `<string>`.
    pub fn load_str<T>(&self, content: &str, format: ConfigFormat) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        Self::parse(content, format, "<string>")
    }

    fn parse<T>(content: &str, format: ConfigFormat, origin: &str) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        let invalid = |reason: String| ConfigError::InvalidFormat {
            path: origin.to_string(),
            reason,
        };
        match format {
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| invalid(format!("YAML parse error: {e}")))
            }
            ConfigFormat::Toml => {
                toml::from_str(content).map_err(|e| invalid(format!("TOML parse error: {e}")))
            }
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| invalid(format!("JSON parse error: {e}")))
            }
        }
    }

    /// Renders `config` back to text. Fields marked `skip_serializing`,
    /// such as the API secret, are left out.
    pub fn serialize<T>(config: &T, format: ConfigFormat) -> Result<String, ConfigError>
    where
        T: serde::Serialize,
    {
        let invalid = |reason: String| ConfigError::InvalidFormat {
            path: "<output>".to_string(),
            reason,
        };
        match format {
            ConfigFormat::Yaml => serde_yaml::to_string(config)
                .map_err(|e| invalid(format!("YAML output error: {e}"))),
            ConfigFormat::Toml => toml::to_string_pretty(config)
                .map_err(|e| invalid(format!("TOML output error: {e}"))),
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| invalid(format!("JSON output error: {e}"))),
        }
    }
}
