//! # Tradebot Core
//!
//! Shared vocabulary of the futures order tool. Nothing here performs I/O
//! apart from reading the config file.
//!
//! - [`types`]: validated price, quantity, symbol, order id and leverage
//! - [`data`]: order requests and results, positions, account balances
//! - [`error`]: [`error::TradeError`] and the per-layer errors it wraps
//! - [`traits`]: [`traits::ExchangeGateway`], the seam between engine and exchange
//! - [`config`]: [`config::BotConfig`] from file, `.env` and `TRADEBOT_*` variables

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Validated primitives
pub mod types;

/// Exchange records
pub mod data;

/// Error hierarchy
pub mod error;

/// Gateway capability trait
pub mod traits;

/// Bot configuration
pub mod config;

/// Everything the engine and CLI import
pub mod prelude {
    pub use crate::data::*;
    pub use crate::error::{
        ErrorSeverity, ExchangeError, Field, GatewayError, NetworkError, OcoError,
        OrphanedOrderError, TradeError, ValidationError,
    };
    pub use crate::traits::*;
    pub use crate::types::*;
}
