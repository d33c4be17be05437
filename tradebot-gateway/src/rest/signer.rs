//! Request signing.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tradebot_core::error::NetworkError;

type HmacSha256 = Hmac<Sha256>;

/// Signs query strings with HMAC-SHA256, hex-encoded.
#[derive(Clone)]
pub struct RequestSigner {
    secret: String,
}

impl RequestSigner {
    /// Creates a signer for the given API secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Signs `payload` exactly as given.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HMAC cannot be keyed.
    pub fn sign(&self, payload: &str) -> Result<String, NetworkError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes()).map_err(|e| {
            NetworkError::ConnectionFailed {
                reason: format!("Failed to create HMAC: {e}"),
            }
        })?;
        mac.update(payload.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestSigner")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Joins parameters into a query string, keeping their order.
///
/// The signature covers the exact string sent, so parameters are not
/// reordered.
#[must_use]
pub fn build_query_string(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
