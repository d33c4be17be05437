//! Errors for order entry and account queries.
//!
//! [`TradeError`] is what every `OrderService` call returns. Its variants
//! follow where the failure happened:
//!
//! | variant | raised by | exchange touched |
//! |---|---|---|
//! | [`ValidationError`] | validator | no |
//! | [`GatewayError`] | gateway (wraps [`ExchangeError`] or [`NetworkError`]) | maybe |
//! | [`OcoError`] | OCO coordinator, nothing left open | yes |
//! | [`OrphanedOrderError`] | OCO coordinator, stop-loss still live | yes |
//! | [`ConfigError`] | startup | no |
//!
//! Messages carry a `[Category]` prefix so CLI output and log lines read
//! the same.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// How loudly a failure should be reported.
///
/// # Examples
///
/// ```
/// use tradebot_core::error::ErrorSeverity;
///
/// assert!(ErrorSeverity::Warning.is_recoverable());
/// assert!(ErrorSeverity::Fatal.is_fatal());
/// assert_eq!(ErrorSeverity::Info.to_string(), "INFO");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Stop and fix credentials, config or a live position.
    Fatal,

    /// Transient; the same request can be sent again.
    #[default]
    Recoverable,

    /// The command failed; change the input or the account first.
    Warning,

    /// Nothing to act on.
    Info,
}

impl ErrorSeverity {
    /// Anything short of [`ErrorSeverity::Fatal`].
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// Whether this is [`ErrorSeverity::Fatal`].
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }

    /// Upper-case label used in log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fatal => "FATAL",
            Self::Recoverable => "RECOVERABLE",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod config;
mod exchange;
mod gateway;
mod network;
mod oco;
mod validation;

pub use config::ConfigError;
pub use exchange::ExchangeError;
pub use gateway::GatewayError;
pub use network::NetworkError;
pub use oco::{OcoError, OrphanedOrderError};
pub use validation::{Field, ValidationError};

/// Failure of one order or account command.
///
/// None of these end the shell session. Only [`TradeError::Orphaned`]
/// changes the process exit code.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeError {
    /// Input rejected before any network call.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Gateway call failed.
    #[error("{0}")]
    Gateway(#[from] GatewayError),

    /// OCO failed cleanly.
    #[error("{0}")]
    Oco(#[from] OcoError),

    /// OCO rollback failed and left a live order.
    #[error("{0}")]
    Orphaned(#[from] OrphanedOrderError),

    /// Configuration error.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl From<ExchangeError> for TradeError {
    fn from(error: ExchangeError) -> Self {
        Self::Gateway(error.into())
    }
}

impl From<NetworkError> for TradeError {
    fn from(error: NetworkError) -> Self {
        Self::Gateway(error.into())
    }
}

impl TradeError {
    /// Severity of the underlying error.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation(e) => e.severity(),
            Self::Gateway(e) => e.severity(),
            Self::Oco(e) => e.severity(),
            Self::Orphaned(e) => e.severity(),
            Self::Config(e) => e.severity(),
        }
    }

    /// Only transient gateway failures qualify.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Gateway(e) => e.is_recoverable(),
            _ => false,
        }
    }

    /// A stop-loss leg is still open on the exchange.
    #[must_use]
    pub fn is_orphaned(&self) -> bool {
        matches!(self, Self::Orphaned(_))
    }

    /// Label for the `category` log field.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation",
            Self::Gateway(GatewayError::Exchange(_)) => "Exchange",
            Self::Gateway(GatewayError::Network(_)) => "Network",
            Self::Oco(_) | Self::Orphaned(_) => "OCO",
            Self::Config(_) => "Config",
        }
    }
}
