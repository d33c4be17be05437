//! OCO coordination.
//!
//! The futures API has no atomic OCO primitive, so the pair is emulated:
//! the stop-loss leg goes first, then the take-profit leg, strictly in
//! sequence. If the take-profit leg fails the stop-loss leg is canceled.
//!
//! ```text
//! Pending ──SL ok──▶ StopPlaced ──TP ok──────────────▶ BothPlaced
//!    │                    │
//!    │                    └─TP err─▶ cancel SL ──ok──▶ RolledBack
//!    │                                         └─err─▶ Orphaned
//!    └──SL err──▶ FailedEarly
//! ```
//!
//! Placed legs are not monitored afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, warn};

use tradebot_core::data::OrderResult;
use tradebot_core::error::{OcoError, OrphanedOrderError, TradeError};
use tradebot_core::traits::ExchangeGateway;

use crate::builder::OcoPlan;

/// Phase of one OCO submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OcoPhase {
    /// Nothing submitted yet
    Pending,
    /// Stop-loss leg live, take-profit leg not yet placed
    StopPlaced,
    /// Both legs live
    BothPlaced,
    /// Take-profit failed, stop-loss canceled
    RolledBack,
    /// Take-profit failed and the stop-loss could not be canceled
    Orphaned,
    /// Stop-loss failed, nothing placed
    FailedEarly,
}

impl OcoPhase {
    /// Returns true for the four terminal phases.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::StopPlaced)
    }

    /// Returns the phase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::StopPlaced => "STOP_PLACED",
            Self::BothPlaced => "BOTH_PLACED",
            Self::RolledBack => "ROLLED_BACK",
            Self::Orphaned => "ORPHANED",
            Self::FailedEarly => "FAILED_EARLY",
        }
    }
}

impl fmt::Display for OcoPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both legs of a successful OCO submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcoPlacement {
    /// Group ID shared by both legs
    pub group_id: String,
    /// Stop-loss leg as placed
    pub stop_loss: OrderResult,
    /// Take-profit leg as placed
    pub take_profit: OrderResult,
}

/// Terminal result of one OCO submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcoOutcome {
    /// Both legs are live.
    BothPlaced(OcoPlacement),
    /// Stop-loss failed; nothing was placed.
    FailedEarly(OcoError),
    /// Take-profit failed; the stop-loss was canceled.
    RolledBack(OcoError),
    /// Take-profit failed and the stop-loss is still live.
    Orphaned(OrphanedOrderError),
}

impl OcoOutcome {
    /// Returns the terminal phase.
    #[must_use]
    pub fn phase(&self) -> OcoPhase {
        match self {
            Self::BothPlaced(_) => OcoPhase::BothPlaced,
            Self::FailedEarly(_) => OcoPhase::FailedEarly,
            Self::RolledBack(_) => OcoPhase::RolledBack,
            Self::Orphaned(_) => OcoPhase::Orphaned,
        }
    }

    /// Converts into a result, keeping `Orphaned` distinct from clean failures.
    pub fn into_result(self) -> Result<OcoPlacement, TradeError> {
        match self {
            Self::BothPlaced(placement) => Ok(placement),
            Self::FailedEarly(e) | Self::RolledBack(e) => Err(TradeError::Oco(e)),
            Self::Orphaned(e) => Err(TradeError::Orphaned(e)),
        }
    }
}

/// Internal state; the non-terminal phases carry what later steps need.
enum OcoState {
    Pending,
    StopPlaced { stop_loss: OrderResult },
    Done(OcoOutcome),
}

impl OcoState {
    fn phase(&self) -> OcoPhase {
        match self {
            Self::Pending => OcoPhase::Pending,
            Self::StopPlaced { .. } => OcoPhase::StopPlaced,
            Self::Done(outcome) => outcome.phase(),
        }
    }
}

/// Drives the two gateway submissions of an [`OcoPlan`].
pub struct OcoCoordinator<'a> {
    gateway: &'a dyn ExchangeGateway,
}

impl<'a> OcoCoordinator<'a> {
    /// Creates a coordinator over a gateway.
    #[must_use]
    pub fn new(gateway: &'a dyn ExchangeGateway) -> Self {
        Self { gateway }
    }

    /// Submits both legs and returns the terminal outcome.
    ///
    /// Never fails: every failure is a terminal [`OcoOutcome`].
    pub async fn execute(&self, plan: &OcoPlan) -> OcoOutcome {
        let mut state = OcoState::Pending;
        loop {
            debug!(group_id = %plan.group_id, phase = %state.phase(), "OCO state");
            state = match state {
                OcoState::Done(outcome) => return outcome,
                OcoState::Pending => self.place_stop_loss(plan).await,
                OcoState::StopPlaced { stop_loss } => self.place_take_profit(plan, stop_loss).await,
            };
        }
    }

    async fn place_stop_loss(&self, plan: &OcoPlan) -> OcoState {
        match self.gateway.submit_order(&plan.stop_loss).await {
            Ok(stop_loss) => {
                info!(
                    group_id = %plan.group_id,
                    order_id = %stop_loss.order_id,
                    symbol = %plan.symbol,
                    "OCO stop-loss leg placed"
                );
                OcoState::StopPlaced { stop_loss }
            }
            Err(source) => {
                warn!(
                    group_id = %plan.group_id,
                    symbol = %plan.symbol,
                    error = %source,
                    "OCO stop-loss leg failed, take-profit not attempted"
                );
                OcoState::Done(OcoOutcome::FailedEarly(OcoError::StopLossFailed {
                    symbol: plan.symbol.clone(),
                    source,
                }))
            }
        }
    }

    async fn place_take_profit(&self, plan: &OcoPlan, stop_loss: OrderResult) -> OcoState {
        let take_profit_error = match self.gateway.submit_order(&plan.take_profit).await {
            Ok(take_profit) => {
                info!(
                    group_id = %plan.group_id,
                    stop_loss_id = %stop_loss.order_id,
                    take_profit_id = %take_profit.order_id,
                    symbol = %plan.symbol,
                    "OCO both legs placed"
                );
                return OcoState::Done(OcoOutcome::BothPlaced(OcoPlacement {
                    group_id: plan.group_id.clone(),
                    stop_loss,
                    take_profit,
                }));
            }
            Err(e) => e,
        };

        warn!(
            group_id = %plan.group_id,
            order_id = %stop_loss.order_id,
            error = %take_profit_error,
            "OCO take-profit leg failed, rolling back stop-loss"
        );

        match self
            .gateway
            .cancel_order(&plan.symbol, &stop_loss.order_id)
            .await
        {
            Ok(_) => {
                info!(
                    group_id = %plan.group_id,
                    order_id = %stop_loss.order_id,
                    "OCO stop-loss rolled back"
                );
                OcoState::Done(OcoOutcome::RolledBack(OcoError::RolledBack {
                    symbol: plan.symbol.clone(),
                    stop_loss_order_id: stop_loss.order_id,
                    source: take_profit_error,
                }))
            }
            Err(cancel_error) => {
                error!(
                    group_id = %plan.group_id,
                    order_id = %stop_loss.order_id,
                    symbol = %plan.symbol,
                    error = %cancel_error,
                    "OCO rollback failed, stop-loss order is ORPHANED and must be canceled manually"
                );
                OcoState::Done(OcoOutcome::Orphaned(OrphanedOrderError {
                    symbol: plan.symbol.clone(),
                    order_id: stop_loss.order_id,
                    take_profit_error,
                    cancel_error,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_oco;
    use crate::testing::{Call, RecordingGateway};
    use crate::validator::validate_oco;
    use tradebot_core::data::OrderType;
    use tradebot_core::error::GatewayError;
    use tradebot_core::types::OrderId;

    fn plan() -> OcoPlan {
        let params =
            validate_oco("BTCUSDT", "SELL", "0.001", "110000", "95000", Some("94500")).unwrap();
        build_oco(&params, "oco-test")
    }

    #[tokio::test]
    async fn test_happy_path_places_stop_loss_first() {
        let gateway = RecordingGateway::new();
        let outcome = OcoCoordinator::new(&gateway).execute(&plan()).await;

        assert_eq!(outcome.phase(), OcoPhase::BothPlaced);
        assert_eq!(
            gateway.submits(),
            vec![OrderType::StopLimit, OrderType::TakeProfit]
        );
        assert!(gateway.cancels().is_empty());

        let placement = outcome.into_result().unwrap();
        assert_eq!(placement.group_id, "oco-test");
        assert_eq!(placement.stop_loss.order_id.as_str(), "1000");
        assert_eq!(placement.take_profit.order_id.as_str(), "1001");
        assert_eq!(
            placement.stop_loss.client_order_id.as_deref(),
            Some("oco-test-sl")
        );
    }

    #[tokio::test]
    async fn test_take_profit_failure_rolls_back() {
        let gateway = RecordingGateway::new().reject(OrderType::TakeProfit);
        let outcome = OcoCoordinator::new(&gateway).execute(&plan()).await;

        assert_eq!(outcome.phase(), OcoPhase::RolledBack);
        assert_eq!(gateway.cancels(), vec![OrderId::new("1000").unwrap()]);
        match outcome.into_result() {
            Err(TradeError::Oco(OcoError::RolledBack {
                stop_loss_order_id,
                source,
                ..
            })) => {
                assert_eq!(stop_loss_order_id.as_str(), "1000");
                assert!(matches!(source, GatewayError::Exchange(_)));
            }
            other => panic!("expected RolledBack, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_failed_rollback_is_orphaned() {
        let gateway = RecordingGateway::new()
            .reject(OrderType::TakeProfit)
            .failing_cancel();
        let outcome = OcoCoordinator::new(&gateway).execute(&plan()).await;

        assert_eq!(outcome.phase(), OcoPhase::Orphaned);
        assert_eq!(gateway.cancels().len(), 1);

        let err = outcome.into_result().unwrap_err();
        assert!(err.is_orphaned());
        assert!(err.severity().is_fatal());
        match err {
            TradeError::Orphaned(orphan) => {
                assert_eq!(orphan.order_id.as_str(), "1000");
                assert!(matches!(orphan.take_profit_error, GatewayError::Exchange(_)));
                assert!(matches!(orphan.cancel_error, GatewayError::Network(_)));
            }
            other => panic!("expected Orphaned, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stop_loss_failure_is_early() {
        let gateway = RecordingGateway::new().reject(OrderType::StopLimit);
        let outcome = OcoCoordinator::new(&gateway).execute(&plan()).await;

        assert_eq!(outcome.phase(), OcoPhase::FailedEarly);
        assert_eq!(gateway.calls(), vec![Call::Submit(OrderType::StopLimit)]);
        assert!(matches!(
            outcome.into_result(),
            Err(TradeError::Oco(OcoError::StopLossFailed { .. }))
        ));
    }

    #[test]
    fn test_phase_terminality() {
        assert!(!OcoPhase::Pending.is_terminal());
        assert!(!OcoPhase::StopPlaced.is_terminal());
        for phase in [
            OcoPhase::BothPlaced,
            OcoPhase::RolledBack,
            OcoPhase::Orphaned,
            OcoPhase::FailedEarly,
        ] {
            assert!(phase.is_terminal());
        }
        assert_eq!(OcoPhase::FailedEarly.to_string(), "FAILED_EARLY");
    }
}
