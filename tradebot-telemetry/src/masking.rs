//! Redaction of Binance credentials in log text.
//!
//! Request logs carry query strings with `signature=...`, and a config
//! dump at DEBUG would carry the key and secret. Every formatted line is
//! passed through [`SensitiveDataMasker::mask_string`] on its way out.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// What to look for, and which capture group holds the secret.
const RULES: [(&str, usize); 4] = [
    // `api_key=...`, `"apiKey": "..."`, `X-MBX-APIKEY: ...`
    (
        r#"(?i)(api[_-]?key|apikey|x-mbx-apikey)["\s:=]+["']?([a-zA-Z0-9]{16,64})["']?"#,
        2,
    ),
    // `api_secret=...`, `secret: ...`
    (
        r#"(?i)(secret[_-]?key|api[_-]?secret|secret)["\s:=]+["']?([a-zA-Z0-9]{16,64})["']?"#,
        2,
    ),
    // HMAC-SHA256 hex digest appended to signed queries
    (r"signature=([a-fA-F0-9]{64})", 1),
    // Bare 64-character token: the shape of every Binance key and secret
    (r"\b[a-zA-Z0-9]{64}\b", 0),
];

static COMPILED: LazyLock<Vec<(Regex, usize)>> = LazyLock::new(|| {
    RULES
        .iter()
        .filter_map(|&(pattern, group)| Regex::new(pattern).ok().map(|re| (re, group)))
        .collect()
});

/// Replaces credentials with `abc***xyz`.
///
/// Keeping the first and last three characters lets an operator tell two
/// keys apart in a log without exposing either.
#[derive(Debug, Clone)]
pub struct SensitiveDataMasker {
    keep: usize,
    min_revealable: usize,
}

impl Default for SensitiveDataMasker {
    fn default() -> Self {
        Self::new()
    }
}

impl SensitiveDataMasker {
    /// Three characters kept on each side; anything under eight is fully
    /// starred.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keep: 3,
            min_revealable: 8,
        }
    }

    /// Masks one credential.
    ///
    /// ```
    /// use tradebot_telemetry::masking::SensitiveDataMasker;
    ///
    /// let masker = SensitiveDataMasker::new();
    /// assert_eq!(masker.mask_value("vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A"), "vmP***h8A");
    /// assert_eq!(masker.mask_value("abc12"), "*****");
    /// ```
    #[must_use]
    pub fn mask_value(&self, value: &str) -> String {
        let chars: Vec<char> = value.chars().collect();
        if chars.len() < self.min_revealable {
            return "*".repeat(chars.len().max(3));
        }
        let head: String = chars[..self.keep].iter().collect();
        let tail: String = chars[chars.len() - self.keep..].iter().collect();
        format!("{head}***{tail}")
    }

    /// Masks every credential found in `input`. Borrows when there is
    /// nothing to mask.
    #[must_use]
    pub fn mask_string<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let mut text = Cow::Borrowed(input);
        for (regex, group) in COMPILED.iter() {
            let found: Vec<String> = regex
                .captures_iter(&text)
                .filter_map(|c| c.get(*group).map(|m| m.as_str().to_string()))
                .collect();
            for secret in found {
                let masked = self.mask_value(&secret);
                text = Cow::Owned(text.replace(&secret, &masked));
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "vmPUZE6mv9SD5VNHk4HlWFsOr6aKE2zvsw0MuIgwCIPy6utIco14y7Ju91duEh8A";

    #[test]
    fn test_short_values_fully_starred() {
        let masker = SensitiveDataMasker::new();
        assert_eq!(masker.mask_value("abcdefgh"), "abc***fgh");
        assert_eq!(masker.mask_value("abc12"), "*****");
        assert_eq!(masker.mask_value(""), "***");
    }

    #[test]
    fn test_config_dump_masked() {
        let masker = SensitiveDataMasker::new();
        let line = r#"ExchangeConfig { "api_key": "abcdefghijklmnop1234567890123456", testnet: true }"#;
        let masked = masker.mask_string(line);
        assert!(masked.contains("abc***456"));
        assert!(masked.contains("testnet: true"));

        let line = r#"api_secret = "mysupersecretkey1234567890123456""#;
        assert!(!masker.mask_string(line).contains("mysupersecretkey"));
    }

    #[test]
    fn test_signed_query_masked() {
        let masker = SensitiveDataMasker::new();
        let query = "symbol=BTCUSDT&side=SELL&type=STOP_MARKET&stopPrice=95000&timestamp=1700000000000&signature=c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71";
        let masked = masker.mask_string(query);
        assert!(masked.starts_with("symbol=BTCUSDT&side=SELL&type=STOP_MARKET"));
        assert!(masked.ends_with("signature=c8d***b71"));
    }

    #[test]
    fn test_bare_key_masked() {
        let masker = SensitiveDataMasker::new();
        let input = format!("using key {KEY}");
        let masked = masker.mask_string(&input);
        assert_eq!(masked, "using key vmP***h8A");
    }

    #[test]
    fn test_order_log_untouched() {
        let masker = SensitiveDataMasker::new();
        let line = "Order placed order_id=283194212 symbol=BTCUSDT status=NEW";
        assert!(matches!(masker.mask_string(line), Cow::Borrowed(_)));
    }
}
