//! Binance USDⓈ-M futures adapter.
//!
//! - [`BinanceFuturesGateway`] - order entry and account queries over REST
//! - Wire types for the futures endpoints
//!
//! Testnet (`https://testnet.binancefuture.com`) is used unless the
//! credentials say otherwise.

mod gateway;
mod types;

pub use gateway::{BinanceFuturesGateway, SymbolRules};
pub use types::*;
