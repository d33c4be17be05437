//! OCO submission failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ErrorSeverity, GatewayError};
use crate::types::{OrderId, Symbol};

/// An OCO submission that failed without leaving anything live.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OcoError {
    /// The stop-loss leg was rejected. Nothing was placed.
    #[error("[OCO] Stop-loss leg for {symbol} failed, nothing placed: {source}")]
    StopLossFailed {
        /// Contract symbol.
        symbol: Symbol,
        /// Gateway error from the stop-loss submission.
        source: GatewayError,
    },

    /// The take-profit leg was rejected and the stop-loss leg was canceled.
    #[error(
        "[OCO] Take-profit leg for {symbol} failed, stop-loss order {stop_loss_order_id} rolled back: {source}"
    )]
    RolledBack {
        /// Contract symbol.
        symbol: Symbol,
        /// The stop-loss order that was canceled.
        stop_loss_order_id: OrderId,
        /// Gateway error from the take-profit submission.
        source: GatewayError,
    },
}

impl OcoError {
    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Warning
    }
}

/// A stop-loss order left live on the exchange after its take-profit
/// partner failed and the rollback cancel failed too.
///
/// The operator has to cancel `order_id` by hand.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error(
    "[OCO] ORPHANED stop-loss order {order_id} on {symbol} is still live and must be canceled manually. \
     Take-profit failed: {take_profit_error}. Rollback cancel failed: {cancel_error}"
)]
pub struct OrphanedOrderError {
    /// Contract symbol.
    pub symbol: Symbol,
    /// The live stop-loss order.
    pub order_id: OrderId,
    /// Why the take-profit leg failed.
    #[source]
    pub take_profit_error: GatewayError,
    /// Why the rollback cancel failed.
    pub cancel_error: GatewayError,
}

impl OrphanedOrderError {
    /// Always [`ErrorSeverity::Fatal`]: an unmatched live order needs a human.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }
}
