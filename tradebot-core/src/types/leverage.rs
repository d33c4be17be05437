//! Leverage multiplier type.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TypeError;

/// Leverage multiplier for a futures symbol, in the range `1..=125`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct Leverage(u8);

impl Leverage {
    /// Maximum leverage accepted by the futures venue.
    pub const MAX_LEVERAGE: u8 = 125;

    /// 1x leverage.
    pub const ONE: Self = Self(1);

    /// Creates a new `Leverage`.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::ZeroLeverage` for zero and
    /// `TypeError::LeverageExceedsMax` above [`Self::MAX_LEVERAGE`].
    pub fn new(value: u8) -> Result<Self, TypeError> {
        if value == 0 {
            return Err(TypeError::ZeroLeverage);
        }
        if value > Self::MAX_LEVERAGE {
            return Err(TypeError::LeverageExceedsMax(value, Self::MAX_LEVERAGE));
        }
        Ok(Self(value))
    }

    /// Returns the multiplier.
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl Default for Leverage {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Leverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leverage_bounds() {
        assert_eq!(Leverage::new(0), Err(TypeError::ZeroLeverage));
        assert_eq!(Leverage::new(125).unwrap().as_u8(), 125);
        assert_eq!(
            Leverage::new(126),
            Err(TypeError::LeverageExceedsMax(126, 125))
        );
    }

    #[test]
    fn test_leverage_display() {
        assert_eq!(Leverage::new(20).unwrap().to_string(), "20x");
    }
}
