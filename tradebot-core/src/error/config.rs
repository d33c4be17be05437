//! Errors raised while loading the bot configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ErrorSeverity;

/// A configuration file, environment override or credential problem.
///
/// All of these are reported before the gateway is built, so none of
/// them can leave state on the exchange.
///
/// # Examples
///
/// ```
/// use tradebot_core::error::ConfigError;
///
/// let error = ConfigError::invalid_value("exchange.recv_window_ms", "must be at most 60000");
/// assert!(error.to_string().contains("recv_window_ms"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigError {
    /// A required key is absent.
    #[error("[Config] Missing field '{field}'{}", section.as_ref().map(|s| format!(" in section '{s}'")).unwrap_or_default())]
    MissingField {
        /// Key name.
        field: String,
        /// Dotted section path, if nested.
        section: Option<String>,
    },

    /// A key is present but its value is rejected.
    #[error("[Config] Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted key path.
        field: String,
        /// Rule that failed.
        reason: String,
    },

    /// The config file could not be opened or read.
    #[error("[Config] Failed to read file '{path}': {reason}")]
    FileReadError {
        /// File path as given.
        path: String,
        /// I/O error text.
        reason: String,
    },

    /// The config file is not valid YAML, TOML or JSON, or has an
    /// unsupported extension.
    #[error("[Config] Invalid format in '{path}': {reason}")]
    InvalidFormat {
        /// File path, or `<string>` for inline content.
        path: String,
        /// Parser error text.
        reason: String,
    },

    /// API key or secret is empty after every source was applied.
    #[error(
        "[Config] Missing API credentials. Please set {key_var} and {secret_var} environment variables or create a .env file."
    )]
    MissingCredentials {
        /// Variable holding the API key.
        key_var: String,
        /// Variable holding the API secret.
        secret_var: String,
    },

    /// An override variable does not parse as its target type.
    #[error("[Config] Invalid environment variable '{name}': {reason}")]
    InvalidEnvVar {
        /// Variable name, e.g. `TRADEBOT_TESTNET`.
        name: String,
        /// Parse error text.
        reason: String,
    },

    /// Several checks failed; `reason` joins them with `; `.
    #[error("[Config] Validation failed: {reason}")]
    ValidationFailed {
        /// Every failed check.
        reason: String,
    },
}

impl ConfigError {
    /// The operator has to edit the config or environment; retrying
    /// the same command never helps.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        false
    }

    /// Missing pieces are fatal for startup; bad values are warnings.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingField { .. }
            | Self::InvalidFormat { .. }
            | Self::MissingCredentials { .. } => ErrorSeverity::Fatal,
            Self::InvalidValue { .. }
            | Self::FileReadError { .. }
            | Self::InvalidEnvVar { .. }
            | Self::ValidationFailed { .. } => ErrorSeverity::Warning,
        }
    }

    /// Shorthand for [`ConfigError::InvalidValue`].
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
