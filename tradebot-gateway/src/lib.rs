//! # Tradebot Gateway
//!
//! The only crate that talks HTTP. [`binance::BinanceFuturesGateway`]
//! implements [`tradebot_core::traits::ExchangeGateway`] on top of the
//! signed [`rest`] client: it fetches `exchangeInfo` once per symbol,
//! truncates quantities and prices to the symbol's precision, and maps
//! Binance error codes into [`tradebot_core::error::GatewayError`].
//!
//! ```ignore
//! use tradebot_core::traits::{Credentials, ExchangeGateway};
//! use tradebot_gateway::binance::BinanceFuturesGateway;
//!
//! let gateway = BinanceFuturesGateway::new(&Credentials::new(key, secret))?;
//! let last = gateway.price(&"BTCUSDT".parse()?).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

/// Signed request transport
pub mod rest;

/// USDⓈ-M futures adapter
#[cfg(feature = "binance")]
pub mod binance;

/// Common imports
pub mod prelude {
    pub use crate::rest::{RestClient, RestConfig, RestConfigBuilder};

    #[cfg(feature = "binance")]
    pub use crate::binance::{BinanceFuturesGateway, SymbolRules};
}
