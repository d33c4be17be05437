//! Validated primitives shared by every crate.
//!
//! Raw operator text becomes one of these in the validator; from then on
//! the engine and gateway cannot confuse a trigger price with a quantity.
//!
//! | type | holds | invariant |
//! |---|---|---|
//! | [`Price`] | limit, trigger, mark and entry prices | `>= 0` |
//! | [`Quantity`] | order size, or signed position amount | `>= 0` on the order path |
//! | [`Symbol`] | `BTCUSDT`-style contract name | upper-case alphanumeric |
//! | [`OrderId`] | exchange-assigned order id | non-empty |
//! | [`Leverage`] | margin multiplier | `1..=125` |
//! | [`Timestamp`] | exchange time in Unix milliseconds | `>= 0` |

mod leverage;
mod order_id;
mod price;
mod quantity;
mod symbol;
mod timestamp;

pub use leverage::Leverage;
pub use order_id::OrderId;
pub use price::Price;
pub use quantity::Quantity;
pub use symbol::Symbol;
pub use timestamp::Timestamp;

/// Construction of a primitive from a value outside its domain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// A price below zero.
    #[error("price must not be negative, got {0}")]
    NegativePrice(rust_decimal::Decimal),

    /// A size below zero.
    #[error("quantity must not be negative, got {0}")]
    NegativeQuantity(rust_decimal::Decimal),

    /// Text that `Decimal` cannot parse.
    #[error("'{0}' is not a decimal number")]
    NotADecimal(String),

    /// Symbol with characters other than `A-Z0-9`.
    #[error("symbol '{0}' must be letters and digits only")]
    InvalidSymbol(String),

    /// Blank symbol.
    #[error("symbol is empty")]
    EmptySymbol,

    /// Blank order id.
    #[error("order id is empty")]
    EmptyOrderId,

    /// Milliseconds before the epoch.
    #[error("timestamp {0} is before the Unix epoch")]
    InvalidTimestamp(i64),

    /// Leverage above the futures cap; `(requested, cap)`.
    #[error("leverage {0}x is above the {1}x cap")]
    LeverageExceedsMax(u8, u8),

    /// Leverage of zero.
    #[error("leverage must be at least 1x")]
    ZeroLeverage,

    /// Text that names no side, order type, status or time in force.
    #[error("unknown {kind}: {value}")]
    UnknownVariant {
        /// Enum being parsed, e.g. `order side`.
        kind: &'static str,
        /// Input after upper-casing.
        value: String,
    },
}
