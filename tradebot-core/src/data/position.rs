//! Open futures positions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Leverage, Price, Quantity, Symbol, Timestamp};

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// Long position
    Long,
    /// Short position
    Short,
}

impl PositionSide {
    /// Derives the side from a signed position amount.
    #[must_use]
    pub fn from_amount(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Self::Long
        } else {
            Self::Short
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long => write!(f, "LONG"),
            Self::Short => write!(f, "SHORT"),
        }
    }
}

/// An open position as reported by the exchange.
///
/// `size` is always non-negative; direction lives in `side`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Trading symbol
    pub symbol: Symbol,
    /// Position direction
    pub side: PositionSide,
    /// Absolute position size
    pub size: Quantity,
    /// Average entry price
    pub entry_price: Price,
    /// Current mark price
    pub mark_price: Price,
    /// Liquidation price, if the exchange reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidation_price: Option<Price>,
    /// Unrealized profit and loss
    pub unrealized_pnl: Decimal,
    /// Leverage in effect for the symbol
    pub leverage: Leverage,
    /// Last update time
    pub update_time: Timestamp,
}

impl Position {
    /// Notional value at the mark price.
    #[must_use]
    pub fn notional(&self) -> Decimal {
        self.size.as_decimal() * self.mark_price.as_decimal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_from_amount() {
        assert_eq!(PositionSide::from_amount(dec!(0.5)), PositionSide::Long);
        assert_eq!(PositionSide::from_amount(dec!(-0.5)), PositionSide::Short);
    }

    #[test]
    fn test_notional() {
        let position = Position {
            symbol: Symbol::new("ETHUSDT").unwrap(),
            side: PositionSide::Short,
            size: Quantity::new(dec!(2)),
            entry_price: Price::new(dec!(3000)).unwrap(),
            mark_price: Price::new(dec!(3100)).unwrap(),
            liquidation_price: None,
            unrealized_pnl: dec!(-200),
            leverage: Leverage::new(5).unwrap(),
            update_time: Timestamp::ZERO,
        };
        assert_eq!(position.notional(), dec!(6200));
        assert_eq!(position.side.to_string(), "SHORT");
    }
}
