//! Errors surfaced by an [`ExchangeGateway`](crate::traits::ExchangeGateway).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ErrorSeverity, ExchangeError, NetworkError};

/// Failure of a single gateway call.
///
/// The engine treats these as opaque and displayable. It only inspects
/// them to decide the outcome of an OCO rollback.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GatewayError {
    /// The exchange answered with an error payload.
    #[error("{0}")]
    Exchange(#[from] ExchangeError),

    /// The request never got a usable answer.
    #[error("{0}")]
    Network(#[from] NetworkError),
}

impl GatewayError {
    /// Severity of the wrapped error.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Exchange(e) => e.severity(),
            Self::Network(e) => e.severity(),
        }
    }

    /// Whether an idempotent request may be sent again.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Exchange(e) => e.is_recoverable(),
            Self::Network(e) => e.is_recoverable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_transparent() {
        let error: GatewayError = NetworkError::Timeout { timeout_ms: 5000 }.into();
        assert_eq!(error.to_string(), "[Network] Connection timeout after 5000ms");
        assert!(error.is_recoverable());

        let error: GatewayError = ExchangeError::InsufficientBalance {
            reason: "Margin is insufficient.".to_string(),
        }
        .into();
        assert!(!error.is_recoverable());
        assert_eq!(error.severity(), ErrorSeverity::Warning);
    }
}
