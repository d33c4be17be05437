//! Base-asset amounts.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::TypeError;

/// An amount of the base asset, e.g. `0.001` BTC.
///
/// `positionAmt` comes back negative for shorts, so [`Quantity::new`] takes
/// any sign. Operator input goes through [`Quantity::new_unsigned`].
///
/// # Examples
///
/// ```
/// use tradebot_core::types::Quantity;
/// use rust_decimal_macros::dec;
///
/// let qty = Quantity::new_unsigned(dec!(0.001)).unwrap();
/// assert!(qty.is_positive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// `0`.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wraps a signed amount.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Rejects values below zero with `TypeError::NegativeQuantity`.
    pub fn new_unsigned(value: Decimal) -> Result<Self, TypeError> {
        if value < Decimal::ZERO {
            return Err(TypeError::NegativeQuantity(value));
        }
        Ok(Self(value))
    }

    /// The raw decimal.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Flat, or truncated away.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// A long position amount, or a usable order size.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Size without direction.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Cuts to the symbol's `quantityPrecision`. Can yield zero.
    #[must_use]
    pub fn truncate(&self, precision: u32) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(precision, RoundingStrategy::ToZero)
                .normalize(),
        )
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Quantity {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| TypeError::NotADecimal(s.to_string()))
    }
}

impl From<Quantity> for Decimal {
    fn from(qty: Quantity) -> Self {
        qty.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_short_position_amount() {
        let qty = Quantity::new(dec!(-0.5));
        assert!(!qty.is_positive());
        assert_eq!(qty.abs().as_decimal(), dec!(0.5));
    }

    #[test]
    fn test_order_path_rejects_negative() {
        assert!(matches!(
            Quantity::new_unsigned(dec!(-1)),
            Err(TypeError::NegativeQuantity(_))
        ));
        assert!(Quantity::new_unsigned(dec!(0)).unwrap().is_zero());
    }

    #[test]
    fn test_truncate_drops_excess_digits() {
        let qty = Quantity::new(dec!(0.0019));
        assert_eq!(qty.truncate(3).as_decimal(), dec!(0.001));
    }

    #[test]
    fn test_parse() {
        let qty: Quantity = "1.25".parse().unwrap();
        assert_eq!(qty.as_decimal(), dec!(1.25));
        assert!("1,25".parse::<Quantity>().is_err());
    }
}
