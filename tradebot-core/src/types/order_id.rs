//! Exchange-assigned order ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TypeError;

/// The `orderId` Binance returns for a placed order.
///
/// Binance uses a 64-bit integer; it is kept as text so ids typed by the
/// operator need no numeric parsing.
///
/// # Examples
///
/// ```
/// use tradebot_core::types::OrderId;
///
/// let order_id = OrderId::new("4096532371").unwrap();
/// assert_eq!(order_id.as_str(), "4096532371");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Trims the input and rejects blanks with `TypeError::EmptyOrderId`.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TypeError> {
        let s = value.as_ref().trim();
        if s.is_empty() {
            return Err(TypeError::EmptyOrderId);
        }
        Ok(Self(s.to_string()))
    }

    /// Wraps an id taken from an exchange response.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Id as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<i64> for OrderId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_input_trimmed() {
        assert_eq!(OrderId::new(" 42 ").unwrap().as_str(), "42");
        assert_eq!(OrderId::new(""), Err(TypeError::EmptyOrderId));
    }

    #[test]
    fn test_from_wire_integer() {
        assert_eq!(OrderId::from(4_096_532_371_i64).as_str(), "4096532371");
    }
}
