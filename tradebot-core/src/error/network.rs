//! Transport failures: the request never produced a Binance error body.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ErrorSeverity;

/// A REST call that failed below the API layer.
///
/// A timeout on `POST /fapi/v1/order` leaves the order state unknown, so
/// the client never retries writes on these.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkError {
    /// DNS, connect or mid-body I/O failure.
    #[error("[Network] Connection failed: {reason}")]
    ConnectionFailed {
        /// reqwest error text.
        reason: String,
    },

    /// No response within the configured timeout.
    #[error("[Network] Connection timeout after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Handshake or certificate failure.
    #[error("[Network] TLS error: {reason}")]
    Tls {
        /// reqwest error text.
        reason: String,
    },

    /// Non-2xx status whose body is not a Binance error object.
    #[error("[Network] HTTP error: status {status_code} - {reason}")]
    Http {
        /// HTTP status.
        status_code: u16,
        /// Raw body.
        reason: String,
    },
}

impl NetworkError {
    /// Timeouts, dropped connections and 5xx are worth another attempt
    /// on idempotent requests.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectionFailed { .. } => true,
            Self::Http { status_code, .. } => *status_code >= 500,
            Self::Tls { .. } => false,
        }
    }

    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Tls { .. } => ErrorSeverity::Fatal,
            Self::Http { .. } if !self.is_recoverable() => ErrorSeverity::Warning,
            _ => ErrorSeverity::Recoverable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_is_recoverable() {
        let error = NetworkError::Timeout { timeout_ms: 10_000 };
        assert_eq!(
            error.to_string(),
            "[Network] Connection timeout after 10000ms"
        );
        assert!(error.is_recoverable());
        assert_eq!(error.severity(), ErrorSeverity::Recoverable);
    }

    #[test]
    fn test_gateway_errors_retry_client_errors_do_not() {
        let bad_gateway = NetworkError::Http {
            status_code: 502,
            reason: "<html>Bad Gateway</html>".to_string(),
        };
        let not_found = NetworkError::Http {
            status_code: 404,
            reason: "<html>Not Found</html>".to_string(),
        };
        assert!(bad_gateway.is_recoverable());
        assert!(!not_found.is_recoverable());
        assert_eq!(not_found.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_tls_is_fatal() {
        let error = NetworkError::Tls {
            reason: "invalid peer certificate".to_string(),
        };
        assert!(!error.is_recoverable());
        assert!(error.severity().is_fatal());
    }
}
