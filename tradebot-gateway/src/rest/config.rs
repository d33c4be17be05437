//! Connection settings for [`super::RestClient`].

use std::fmt;
use std::time::Duration;

/// USDⓈ-M futures allow 2400 request weight per IP per minute.
const FUTURES_WEIGHT_PER_MINUTE: u32 = 2_400;

/// Binance rejects a `recvWindow` above one minute.
const MAX_RECV_WINDOW_MS: u64 = 60_000;

/// Transport settings.
///
/// Built with [`RestConfig::builder`]. The secret never appears in `Debug`
/// output.
#[derive(Clone)]
pub struct RestConfig {
    /// Scheme and host, e.g. `https://testnet.binancefuture.com`.
    pub base_url: String,
    /// Sent as `X-MBX-APIKEY` on every request.
    pub api_key: Option<String>,
    /// HMAC key; signed requests go out unsigned without it.
    pub api_secret: Option<String>,
    /// Per-request timeout.
    pub timeout_ms: u64,
    /// At most one minute when set through the builder.
    pub recv_window_ms: u64,
    /// Local weight budget; 0 disables the limiter.
    pub weight_per_minute: u32,
    /// Extra attempts for GET and DELETE.
    pub max_retries: u32,
    /// First back-off step, doubled per attempt.
    pub retry_delay_ms: u64,
    /// Back-off ceiling.
    pub max_retry_delay_ms: u64,
    /// `User-Agent` header.
    pub user_agent: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: None,
            api_secret: None,
            timeout_ms: 10_000,
            recv_window_ms: 5_000,
            weight_per_minute: FUTURES_WEIGHT_PER_MINUTE,
            max_retries: 3,
            retry_delay_ms: 500,
            max_retry_delay_ms: 8_000,
            user_agent: format!("tradebot/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("timeout_ms", &self.timeout_ms)
            .field("recv_window_ms", &self.recv_window_ms)
            .field("weight_per_minute", &self.weight_per_minute)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl RestConfig {
    /// Starts from the defaults.
    #[must_use]
    pub fn builder() -> RestConfigBuilder {
        RestConfigBuilder::default()
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Delay before retry number `attempt + 1`: `retry_delay_ms * 2^attempt`,
    /// capped at `max_retry_delay_ms`.
    #[must_use]
    pub fn calculate_retry_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        let delay = self.retry_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_retry_delay_ms))
    }

    /// Whether attempt `attempt` (0-based) may be followed by another.
    #[must_use]
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Builder for [`RestConfig`].
#[derive(Debug, Default)]
pub struct RestConfigBuilder {
    config: RestConfig,
}

impl RestConfigBuilder {
    /// Scheme and host.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// API secret.
    #[must_use]
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.api_secret = Some(secret.into());
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    /// `recvWindow` for signed requests, clamped to one minute.
    #[must_use]
    pub fn recv_window_ms(mut self, recv_window_ms: u64) -> Self {
        self.config.recv_window_ms = recv_window_ms.min(MAX_RECV_WINDOW_MS);
        self
    }

    /// Local weight budget per minute.
    #[must_use]
    pub fn weight_per_minute(mut self, weight: u32) -> Self {
        self.config.weight_per_minute = weight;
        self
    }

    /// Extra attempts for idempotent requests.
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// First back-off step and ceiling.
    #[must_use]
    pub fn retry_delay_ms(mut self, initial: u64, max: u64) -> Self {
        self.config.retry_delay_ms = initial;
        self.config.max_retry_delay_ms = max;
        self
    }

    /// Finishes the config.
    #[must_use]
    pub fn build(self) -> RestConfig {
        self.config
    }
}
