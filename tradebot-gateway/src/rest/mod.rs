//! Signed REST transport for `/fapi` endpoints.
//!
//! [`RestClient`] owns the HTTP connection pool, the [`RequestSigner`] and
//! a [`RateLimiter`] that tracks the `x-mbx-used-weight-1m` header. A
//! [`RequestBuilder`] adds `recvWindow`, `timestamp` and `signature` at
//! send time, so a retried GET is always freshly stamped.
//!
//! ```ignore
//! use tradebot_gateway::rest::{RestClient, RestConfig};
//!
//! let client = RestClient::new(
//!     RestConfig::builder()
//!         .base_url("https://testnet.binancefuture.com")
//!         .api_key(key)
//!         .api_secret(secret)
//!         .build(),
//! )?;
//! let body = client
//!     .get("/fapi/v2/positionRisk")
//!     .signed()
//!     .weight(5)
//!     .send()
//!     .await?
//!     .text()
//!     .await?;
//! ```

mod client;
mod config;
mod rate_limiter;
mod signer;

pub use client::{RequestBuilder, RestClient};
pub use config::{RestConfig, RestConfigBuilder};
pub use rate_limiter::RateLimiter;
pub use signer::{RequestSigner, build_query_string};
