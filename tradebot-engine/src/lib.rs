//! # Tradebot Engine
//!
//! Order entry logic for the futures trading bot.
//!
//! This crate provides:
//! - Input validation for every order type ([`validator`])
//! - Order request construction ([`builder`])
//! - OCO emulation with rollback ([`oco`])
//! - The [`service::OrderService`] facade used by the CLI
//!
//! # OCO Orders
//!
//! The exchange has no native OCO for futures. [`oco::OcoCoordinator`]
//! submits the stop-loss leg, then the take-profit leg, and cancels the
//! stop-loss leg if the take-profit leg fails. A failed cancel ends in
//! [`oco::OcoPhase::Orphaned`], which is reported as a fatal error.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod oco;
pub mod service;
pub mod validator;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::{
        OcoPlan, build_limit, build_market, build_oco, build_stop_limit, build_take_profit,
    };
    pub use crate::oco::{OcoCoordinator, OcoOutcome, OcoPhase, OcoPlacement};
    pub use crate::service::OrderService;
    pub use crate::validator::{
        LimitParams, MarketParams, OcoParams, StopLimitParams, TakeProfitParams, validate_limit,
        validate_market, validate_oco, validate_stop_limit, validate_take_profit,
    };
}
