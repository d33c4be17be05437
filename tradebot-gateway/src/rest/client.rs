//! REST client with request-weight limiting and request signing.

use reqwest::{Client, Method, Response, header};
use std::sync::Arc;
use tracing::{debug, warn};
use tradebot_core::error::NetworkError;

use super::config::RestConfig;
use super::rate_limiter::RateLimiter;
use super::signer::{RequestSigner, build_query_string};

/// Header carrying the request weight used in the current minute.
const USED_WEIGHT_HEADER: &str = "x-mbx-used-weight-1m";

/// REST client for the futures API.
///
/// GET and DELETE requests are retried on HTTP 429 and on recoverable
/// transport errors. POST requests are sent exactly once.
pub struct RestClient {
    config: RestConfig,
    http_client: Client,
    rate_limiter: Arc<RateLimiter>,
    signer: Option<RequestSigner>,
}

impl RestClient {
    /// Creates a new REST client.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HTTP client cannot be created.
    pub fn new(config: RestConfig) -> Result<Self, NetworkError> {
        let mut headers = header::HeaderMap::new();

        headers.insert(
            header::USER_AGENT,
            config
                .user_agent
                .parse()
                .map_err(|_| NetworkError::ConnectionFailed {
                    reason: "Invalid user agent".to_string(),
                })?,
        );

        if let Some(api_key) = &config.api_key {
            headers.insert(
                "X-MBX-APIKEY",
                api_key
                    .parse()
                    .map_err(|_| NetworkError::ConnectionFailed {
                        reason: "Invalid API key".to_string(),
                    })?,
            );
        }

        let http_client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| NetworkError::ConnectionFailed {
                reason: format!("Failed to create HTTP client: {e}"),
            })?;

        let rate_limiter = Arc::new(RateLimiter::per_minute(config.weight_per_minute));
        let signer = config.api_secret.as_ref().map(RequestSigner::new);

        Ok(Self {
            config,
            http_client,
            rate_limiter,
            signer,
        })
    }

    /// Creates a GET request builder.
    #[must_use]
    pub fn get(&self, path: &str) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::GET, path)
    }

    /// Creates a POST request builder.
    #[must_use]
    pub fn post(&self, path: &str) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::POST, path)
    }

    /// Creates a DELETE request builder.
    #[must_use]
    pub fn delete(&self, path: &str) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::DELETE, path)
    }

    /// Returns the rate limiter.
    #[must_use]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    /// Builds the full URL for a path.
    #[must_use]
    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn execute_request(
        &self,
        method: Method,
        url: &str,
        query: &str,
        weight: u32,
    ) -> Result<Response, NetworkError> {
        self.rate_limiter.acquire(weight).await;

        let full_url = if query.is_empty() {
            url.to_string()
        } else {
            format!("{url}?{query}")
        };

        debug!(method = %method, url = %url, weight = weight, "Sending request");

        let response = self
            .http_client
            .request(method, &full_url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NetworkError::Timeout {
                        timeout_ms: self.config.timeout_ms,
                    }
                } else if e.is_connect() {
                    NetworkError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    NetworkError::Http {
                        status_code: e.status().map_or(0, |s| s.as_u16()),
                        reason: e.to_string(),
                    }
                }
            })?;

        if let Some(used) = response
            .headers()
            .get(USED_WEIGHT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok())
        {
            debug!(used_weight = used, "Request weight used");
            self.rate_limiter.update_used_weight(used);
        }

        Ok(response)
    }
}

/// Request builder for REST API calls.
pub struct RequestBuilder<'a> {
    client: &'a RestClient,
    method: Method,
    path: String,
    query_params: Vec<(String, String)>,
    weight: u32,
    sign: bool,
}

impl<'a> RequestBuilder<'a> {
    fn new(client: &'a RestClient, method: Method, path: &str) -> Self {
        Self {
            client,
            method,
            path: path.to_string(),
            query_params: Vec::new(),
            weight: 1,
            sign: false,
        }
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_params.push((key.into(), value.to_string()));
        self
    }

    /// Adds a query parameter when `value` is present.
    #[must_use]
    pub fn query_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Adds multiple query parameters.
    #[must_use]
    pub fn queries(mut self, params: Vec<(String, String)>) -> Self {
        self.query_params.extend(params);
        self
    }

    /// Sets the request weight charged against the per-minute budget.
    #[must_use]
    pub fn weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Adds `timestamp`, `recvWindow` and `signature` when sent.
    #[must_use]
    pub fn signed(mut self) -> Self {
        self.sign = true;
        self
    }

    fn is_idempotent(&self) -> bool {
        matches!(self.method, Method::GET | Method::DELETE)
    }

    /// Builds the query string, stamping and signing it if requested.
    fn build_query(&self) -> Result<String, NetworkError> {
        if !self.sign {
            return Ok(build_query_string(&self.query_params));
        }

        let mut params = self.query_params.clone();
        params.push((
            "recvWindow".to_string(),
            self.client.config.recv_window_ms.to_string(),
        ));
        params.push((
            "timestamp".to_string(),
            chrono::Utc::now().timestamp_millis().to_string(),
        ));
        let query = build_query_string(&params);

        match &self.client.signer {
            Some(signer) => {
                let signature = signer.sign(&query)?;
                Ok(format!("{query}&signature={signature}"))
            }
            None => {
                warn!(path = %self.path, "Signed request without API secret");
                Ok(query)
            }
        }
    }

    /// Sends the request and returns the raw response.
    ///
    /// Each attempt is re-stamped and re-signed.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the request fails.
    pub async fn send(self) -> Result<Response, NetworkError> {
        let url = self.client.build_url(&self.path);
        let config = &self.client.config;
        let retryable = self.is_idempotent();

        let mut attempt = 0u32;
        loop {
            let query = self.build_query()?;
            let result = self
                .client
                .execute_request(self.method.clone(), &url, &query, self.weight)
                .await;

            match result {
                Ok(response) => {
                    if response.status().as_u16() == 429 && retryable && config.should_retry(attempt)
                    {
                        let delay = config.calculate_retry_delay(attempt);
                        warn!(
                            attempt = attempt + 1,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            path = %self.path,
                            "Rate limited, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if retryable && e.is_recoverable() && config.should_retry(attempt) {
                        let delay = config.calculate_retry_delay(attempt);
                        warn!(
                            attempt = attempt + 1,
                            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            path = %self.path,
                            error = %e,
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> RestClient {
        RestClient::new(
            RestConfig::builder()
                .base_url(base_url)
                .api_key("key")
                .api_secret("secret")
                .retry_delay_ms(1, 5)
                .build(),
        )
        .unwrap()
    }

    #[test]
    fn test_build_url() {
        let client = client("https://testnet.binancefuture.com/");
        assert_eq!(
            client.build_url("/fapi/v1/order"),
            "https://testnet.binancefuture.com/fapi/v1/order"
        );
    }

    #[test]
    fn test_signed_query_layout() {
        let client = client("http://localhost");
        let query = client
            .get("/fapi/v1/order")
            .query("symbol", "BTCUSDT")
            .query_opt("orderId", Some(42))
            .query_opt::<String>("origClientOrderId", None)
            .signed()
            .build_query()
            .unwrap();

        assert!(query.starts_with("symbol=BTCUSDT&orderId=42&recvWindow=5000&timestamp="));
        let (payload, signature) = query.rsplit_once("&signature=").unwrap();
        assert_eq!(signature, RequestSigner::new("secret").sign(payload).unwrap());
    }

    #[test]
    fn test_only_get_and_delete_are_idempotent() {
        let client = client("http://localhost");
        assert!(client.get("/").is_idempotent());
        assert!(client.delete("/").is_idempotent());
        assert!(!client.post("/").is_idempotent());
    }

    #[tokio::test]
    async fn test_get_retries_on_429() {
        let mut server = mockito::Server::new_async().await;
        let limited = server
            .mock("GET", "/fapi/v1/ping")
            .with_status(429)
            .expect(4)
            .create_async()
            .await;

        let client = client(&server.url());
        let response = client.get("/fapi/v1/ping").send().await.unwrap();

        assert_eq!(response.status().as_u16(), 429);
        limited.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_is_never_retried() {
        let mut server = mockito::Server::new_async().await;
        let limited = server
            .mock("POST", "/fapi/v1/order")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .expect(1)
            .create_async()
            .await;

        let client = client(&server.url());
        let response = client.post("/fapi/v1/order").signed().send().await.unwrap();

        assert_eq!(response.status().as_u16(), 429);
        limited.assert_async().await;
    }

    #[tokio::test]
    async fn test_used_weight_header_updates_limiter() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/fapi/v1/time")
            .with_status(200)
            .with_header("x-mbx-used-weight-1m", "1200")
            .with_body("{}")
            .create_async()
            .await;

        let client = client(&server.url());
        client.get("/fapi/v1/time").send().await.unwrap();

        assert_eq!(client.rate_limiter().used_weight(), 1200);
    }
}
