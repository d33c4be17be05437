//! Symbol type for futures contract identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TypeError;

/// Symbol type - identifies a futures contract such as `BTCUSDT`.
///
/// Symbols are normalized to upper case on construction. Whether the
/// contract actually exists is decided by the exchange, not here.
///
/// # Examples
///
/// ```
/// use tradebot_core::types::Symbol;
///
/// let symbol = Symbol::new("btcusdt").unwrap();
/// assert_eq!(symbol.as_str(), "BTCUSDT");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new `Symbol`, trimming whitespace and upper-casing.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::EmptySymbol` if the trimmed string is empty.
    /// Returns `TypeError::InvalidSymbol` if it contains anything other
    /// than ASCII letters and digits.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TypeError> {
        let s = value.as_ref().trim().to_ascii_uppercase();
        if s.is_empty() {
            return Err(TypeError::EmptySymbol);
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(TypeError::InvalidSymbol(s));
        }
        Ok(Self(s))
    }

    /// Creates a new `Symbol` without validation.
    ///
    /// Used for symbols echoed back by the exchange.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_normalizes_case() {
        let symbol = Symbol::new("  ethusdt ").unwrap();
        assert_eq!(symbol.as_str(), "ETHUSDT");
        assert_eq!(symbol.to_string(), "ETHUSDT");
    }

    #[test]
    fn test_symbol_empty() {
        assert_eq!(Symbol::new("   "), Err(TypeError::EmptySymbol));
    }

    #[test]
    fn test_symbol_rejects_separators() {
        assert!(matches!(
            Symbol::new("BTC-USDT"),
            Err(TypeError::InvalidSymbol(_))
        ));
    }
}
