//! Quote-asset prices.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TypeError;

/// A price in the quote asset (USDT for every supported contract).
///
/// Zero is allowed because the exchange reports `0` for fields that do not
/// apply, e.g. the limit price of a `STOP_MARKET` order.
///
/// # Examples
///
/// ```
/// use tradebot_core::types::Price;
/// use rust_decimal_macros::dec;
///
/// let price = Price::new(dec!(91000.5)).unwrap();
/// assert_eq!(price.as_decimal(), dec!(91000.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// `0`.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Rejects values below zero with `TypeError::NegativePrice`.
    pub fn new(value: Decimal) -> Result<Self, TypeError> {
        if value < Decimal::ZERO {
            return Err(TypeError::NegativePrice(value));
        }
        Ok(Self(value))
    }

    /// Wraps an exchange-reported value as is.
    #[must_use]
    pub const fn new_unchecked(value: Decimal) -> Self {
        Self(value)
    }

    /// The raw decimal.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Unset on the exchange side.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Usable as a limit or trigger price.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Cuts to `precision` decimals without rounding up, matching the
    /// symbol's `pricePrecision`.
    #[must_use]
    pub fn truncate(&self, precision: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(precision, RoundingStrategy::ToZero)
                .normalize(),
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|_| TypeError::NotADecimal(s.to_string()))?;
        Self::new(decimal)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_limit_price_accepted() {
        let price = Price::new(dec!(67250.50)).unwrap();
        assert_eq!(price.as_decimal(), dec!(67250.50));
        assert!(price.is_positive());
    }

    #[test]
    fn test_zero_is_unset_not_invalid() {
        let price = Price::new(dec!(0)).unwrap();
        assert!(price.is_zero());
        assert!(!price.is_positive());
    }

    #[test]
    fn test_negative_rejected() {
        let result = Price::new(dec!(-1.0));
        assert!(matches!(result, Err(TypeError::NegativePrice(_))));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let price: Price = " 94500.25 ".parse().unwrap();
        assert_eq!(price.as_decimal(), dec!(94500.25));
        assert!(matches!(
            "abc".parse::<Price>(),
            Err(TypeError::NotADecimal(_))
        ));
    }

    #[test]
    fn test_truncate_never_rounds_up() {
        let price = Price::new(dec!(91000.129)).unwrap();
        assert_eq!(price.truncate(2).as_decimal(), dec!(91000.12));
        assert_eq!(price.truncate(0).as_decimal(), dec!(91000));
    }
}
