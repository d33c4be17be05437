//! Rejections reported by Binance itself.
//!
//! The gateway turns a `{"code": .., "msg": ..}` body into one of these.
//! Codes it has no specific mapping for land in [`ExchangeError::Unknown`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ErrorSeverity;

/// An error payload returned by the futures API.
///
/// # Examples
///
/// ```
/// use tradebot_core::error::ExchangeError;
///
/// let error = ExchangeError::OrderRejected {
///     reason: "Order would immediately trigger.".to_string(),
///     code: Some(-2021),
/// };
/// assert!(error.to_string().contains("immediately trigger"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeError {
    /// Bad key or missing permission (-1002, -2014, -2015, HTTP 401/403).
    #[error("[Exchange] Authentication failed: {reason}")]
    AuthenticationFailed {
        /// Exchange message.
        reason: String,
    },

    /// Request weight or order count exhausted (-1003, -1015, HTTP 418/429).
    #[error("[Exchange] Rate limited, retry after {retry_after_ms}ms")]
    RateLimited {
        /// Back-off before the next request.
        retry_after_ms: u64,
    },

    /// Not enough margin to open the order (-2010, -2019).
    #[error("[Exchange] Insufficient balance: {reason}")]
    InsufficientBalance {
        /// Exchange message.
        reason: String,
    },

    /// A field failed an exchange check: timestamp (-1021), precision
    /// (-1111), a symbol filter (-1013) or min notional (-4164).
    #[error("[Exchange] Invalid parameter: {param} - {reason}")]
    InvalidParameter {
        /// Offending request field.
        param: String,
        /// Exchange message.
        reason: String,
    },

    /// The order was well-formed but refused, e.g. a stop that would
    /// trigger immediately (-2021) or a reduce-only order with nothing to
    /// reduce (-2022).
    #[error("[Exchange] Order rejected: {reason}")]
    OrderRejected {
        /// Exchange message.
        reason: String,
        /// Binance error code, when the body carried one.
        code: Option<i32>,
    },

    /// Unknown order id on status or cancel (-2011, -2013).
    #[error("[Exchange] Order not found: {order_id}")]
    OrderNotFound {
        /// Id as sent.
        order_id: String,
    },

    /// Symbol is not a USDⓈ-M perpetual (-1121, or absent from
    /// exchangeInfo).
    #[error("[Exchange] Symbol {symbol} not found")]
    InvalidSymbol {
        /// Symbol as sent.
        symbol: String,
    },

    /// Leverage the exchange refused (-4028).
    #[error("[Exchange] Invalid leverage: {leverage} (max: {max_leverage})")]
    InvalidLeverage {
        /// Requested value.
        leverage: u8,
        /// Highest value the bracket allows.
        max_leverage: u8,
    },

    /// A 2xx body that does not decode into the expected shape.
    #[error("[Exchange] Malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        /// Request path.
        endpoint: String,
        /// serde error text.
        reason: String,
    },

    /// Any other code.
    #[error("[Exchange] Unknown error: code={code}, message={message}")]
    Unknown {
        /// Binance error code.
        code: i32,
        /// Exchange message.
        message: String,
    },
}

impl ExchangeError {
    /// Only rate limiting clears by itself.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AuthenticationFailed { .. } => ErrorSeverity::Fatal,
            Self::RateLimited { .. } => ErrorSeverity::Recoverable,
            Self::OrderNotFound { .. } => ErrorSeverity::Info,
            Self::InsufficientBalance { .. }
            | Self::OrderRejected { .. }
            | Self::InvalidParameter { .. }
            | Self::InvalidSymbol { .. }
            | Self::InvalidLeverage { .. }
            | Self::MalformedResponse { .. }
            | Self::Unknown { .. } => ErrorSeverity::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_signature_is_fatal() {
        let error = ExchangeError::AuthenticationFailed {
            reason: "Signature for this request is not valid.".to_string(),
        };
        assert!(!error.is_recoverable());
        assert_eq!(error.severity(), ErrorSeverity::Fatal);
    }

    #[test]
    fn test_rate_limit_is_only_recoverable_kind() {
        assert!(ExchangeError::RateLimited { retry_after_ms: 60_000 }.is_recoverable());
        assert!(
            !ExchangeError::OrderRejected {
                reason: "ReduceOnly Order is rejected.".to_string(),
                code: Some(-2022),
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_messages() {
        let error = ExchangeError::InvalidSymbol {
            symbol: "FOOUSDT".to_string(),
        };
        assert_eq!(error.to_string(), "[Exchange] Symbol FOOUSDT not found");

        let error = ExchangeError::InvalidLeverage {
            leverage: 100,
            max_leverage: 75,
        };
        assert_eq!(
            error.to_string(),
            "[Exchange] Invalid leverage: 100 (max: 75)"
        );
    }

    #[test]
    fn test_missing_order_is_info() {
        let error = ExchangeError::OrderNotFound {
            order_id: "8389765527".to_string(),
        };
        assert_eq!(error.severity(), ErrorSeverity::Info);
    }
}
