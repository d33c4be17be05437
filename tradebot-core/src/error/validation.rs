//! Order parameter validation errors.
//!
//! Raised before any network call. Each error names exactly one field
//! and the rule it broke.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Order parameter a [`ValidationError`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Contract symbol
    Symbol,
    /// Order side
    Side,
    /// Order quantity
    Quantity,
    /// Limit price
    Price,
    /// Trigger price
    StopPrice,
    /// OCO take-profit level
    TakeProfitPrice,
    /// OCO stop-loss trigger level
    StopLossPrice,
    /// OCO stop-loss limit price
    StopLossLimitPrice,
    /// Leverage multiplier
    Leverage,
    /// Time in force
    TimeInForce,
    /// Exchange order ID
    OrderId,
}

impl Field {
    /// Returns the snake_case field name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Side => "side",
            Self::Quantity => "quantity",
            Self::Price => "price",
            Self::StopPrice => "stop_price",
            Self::TakeProfitPrice => "take_profit_price",
            Self::StopLossPrice => "stop_loss_price",
            Self::StopLossLimitPrice => "stop_loss_limit_price",
            Self::Leverage => "leverage",
            Self::TimeInForce => "time_in_force",
            Self::OrderId => "order_id",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected order parameter.
///
/// # Examples
///
/// ```
/// use tradebot_core::error::{Field, ValidationError};
/// use rust_decimal::Decimal;
///
/// let error = ValidationError::NonPositive {
///     field: Field::Quantity,
///     value: Decimal::ZERO,
/// };
/// assert_eq!(error.field(), Field::Quantity);
/// assert!(error.to_string().contains("quantity"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationError {
    /// Required parameter is empty or absent.
    #[error("[Validation] {field} cannot be empty")]
    Missing {
        /// Offending field.
        field: Field,
    },

    /// Numeric parameter is zero or negative.
    #[error("[Validation] {field} must be positive, got: {value}")]
    NonPositive {
        /// Offending field.
        field: Field,
        /// Parsed value.
        value: Decimal,
    },

    /// Parameter is not a decimal number.
    #[error("[Validation] Invalid {field}: '{value}' is not a number")]
    NotANumber {
        /// Offending field.
        field: Field,
        /// Raw input.
        value: String,
    },

    /// Parameter is not one of the accepted values.
    #[error("[Validation] Invalid {field}: {value}. Valid options: {expected}")]
    InvalidEnum {
        /// Offending field.
        field: Field,
        /// Normalized input.
        value: String,
        /// Accepted values, comma separated.
        expected: String,
    },

    /// Symbol does not look like a futures contract.
    #[error("[Validation] Invalid symbol: {value}. {reason}")]
    MalformedSymbol {
        /// Normalized input.
        value: String,
        /// Rule that failed.
        reason: String,
    },

    /// Integer parameter outside its allowed range.
    #[error("[Validation] {field} must be between {min} and {max}, got: {value}")]
    OutOfRange {
        /// Offending field.
        field: Field,
        /// Raw input.
        value: String,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
}

impl ValidationError {
    /// Returns the field this error refers to.
    #[must_use]
    pub fn field(&self) -> Field {
        match self {
            Self::Missing { field }
            | Self::NonPositive { field, .. }
            | Self::NotANumber { field, .. }
            | Self::InvalidEnum { field, .. }
            | Self::OutOfRange { field, .. } => *field,
            Self::MalformedSymbol { .. } => Field::Symbol,
        }
    }

    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> super::ErrorSeverity {
        super::ErrorSeverity::Warning
    }

    /// Validation failures are corrected by the operator, not retried.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        false
    }
}
