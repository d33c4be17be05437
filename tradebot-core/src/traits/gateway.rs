//! Exchange gateway capability interface.
//!
//! The gateway is the only component that talks to the exchange. The
//! engine calls it through [`ExchangeGateway`] and never sees the wire
//! format. Implementations own signing, request weights, timeouts and
//! retries.
//!
//! # Example
//!
//! ```ignore
//! use tradebot_core::traits::ExchangeGateway;
//!
//! struct PaperGateway { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl ExchangeGateway for PaperGateway {
//!     async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, GatewayError> {
//!         // Fill locally
//!     }
//!     // ... other methods
//! }
//! ```

use async_trait::async_trait;
use std::fmt;

use crate::data::{AccountSummary, OrderRequest, OrderResult, Position};
use crate::error::GatewayError;
use crate::types::{Leverage, OrderId, Price, Symbol};

/// API credentials for the exchange.
///
/// The secret is private and never printed by `Debug`.
///
/// # Examples
///
/// ```
/// use tradebot_core::traits::Credentials;
///
/// let creds = Credentials::new("my_api_key", "my_api_secret").with_testnet(true);
/// assert!(!format!("{creds:?}").contains("my_api_secret"));
/// ```
#[derive(Clone)]
pub struct Credentials {
    /// API key sent with every private request.
    pub api_key: String,

    api_secret: String,

    /// Whether these are testnet credentials.
    pub testnet: bool,
}

impl Credentials {
    /// Creates new credentials with API key and secret.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            testnet: true,
        }
    }

    /// Sets whether these are testnet credentials.
    #[must_use]
    pub fn with_testnet(mut self, testnet: bool) -> Self {
        self.testnet = testnet;
        self
    }

    /// Returns the API secret. Only the request signer should call this.
    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Returns true if both key and secret are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("testnet", &self.testnet)
            .finish()
    }
}

/// Capability interface to a futures exchange.
///
/// Each call is one unit of work that either succeeds with a result or
/// fails with a [`GatewayError`]. Calls take `&self` so a gateway can be
/// shared behind an `Arc`.
#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// Returns the exchange name for logging.
    fn name(&self) -> &str;

    /// Submits an order.
    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, GatewayError>;

    /// Cancels an order.
    async fn cancel_order(
        &self,
        symbol: &Symbol,
        order_id: &OrderId,
    ) -> Result<OrderResult, GatewayError>;

    /// Cancels every open order on a symbol.
    async fn cancel_all_orders(&self, symbol: &Symbol) -> Result<(), GatewayError>;

    /// Queries a single order.
    async fn order_status(
        &self,
        symbol: &Symbol,
        order_id: &OrderId,
    ) -> Result<OrderResult, GatewayError>;

    /// Lists open orders, optionally for one symbol.
    async fn open_orders(&self, symbol: Option<&Symbol>) -> Result<Vec<OrderResult>, GatewayError>;

    /// Lists positions with a non-zero size, optionally for one symbol.
    async fn positions(&self, symbol: Option<&Symbol>) -> Result<Vec<Position>, GatewayError>;

    /// Fetches the futures account summary.
    async fn account(&self) -> Result<AccountSummary, GatewayError>;

    /// Fetches the latest traded price.
    async fn price(&self, symbol: &Symbol) -> Result<Price, GatewayError>;

    /// Sets the leverage for a symbol and returns what the exchange applied.
    async fn set_leverage(
        &self,
        symbol: &Symbol,
        leverage: Leverage,
    ) -> Result<Leverage, GatewayError>;
}
