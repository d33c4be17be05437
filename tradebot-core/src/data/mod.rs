//! Order, position and account records.
//!
//! All records are immutable values produced once per command and
//! discarded afterwards. Nothing here is persisted.

mod account;
mod order;
mod position;

pub use account::{AccountSummary, AssetBalance};
pub use order::{OrderRequest, OrderResult, OrderSide, OrderStatus, OrderType, TimeInForce};
pub use position::{Position, PositionSide};
