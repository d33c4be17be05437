//! Orders going to the exchange and coming back from it.
//!
//! An [`OrderRequest`] is built by the engine from validated input and is
//! the only thing a gateway submits. An [`OrderResult`] is the gateway's
//! translation of the exchange's reply.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{OrderId, Price, Quantity, Symbol, Timestamp, TypeError};

/// Direction; parsed case-insensitively from operator input.
///
/// ```
/// use tradebot_core::data::OrderSide;
///
/// assert_eq!("sell".parse::<OrderSide>().unwrap(), OrderSide::Sell);
/// assert_eq!(OrderSide::Buy.to_string(), "BUY");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// Long entry or short exit.
    Buy,
    /// Short entry or long exit.
    Sell,
}

impl OrderSide {
    /// `BUY` or `SELL`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderSide {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            other => Err(TypeError::UnknownVariant {
                kind: "side",
                value: other.to_string(),
            }),
        }
    }
}

/// Decides which price fields an [`OrderRequest`] carries.
///
/// OCO is not listed: it is a `StopLimit`/`StopMarket` leg plus a
/// `TakeProfit` leg, each submitted on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// `quantity` only.
    Market,
    /// `price` and `time_in_force`.
    Limit,
    /// `stop_price`, then rests at `price`. Sent to Binance as `STOP`.
    StopLimit,
    /// `stop_price`, then fills at market.
    StopMarket,
    /// Like `StopLimit`, armed from the profit side.
    TakeProfit,
    /// Like `StopMarket`, armed from the profit side.
    TakeProfitMarket,
}

impl OrderType {
    /// Carries `price` and `time_in_force`.
    #[must_use]
    pub const fn requires_price(&self) -> bool {
        matches!(self, Self::Limit | Self::StopLimit | Self::TakeProfit)
    }

    /// Upper-case name used in logs and tables.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
            Self::StopLimit => "STOP_LIMIT",
            Self::StopMarket => "STOP_MARKET",
            Self::TakeProfit => "TAKE_PROFIT",
            Self::TakeProfitMarket => "TAKE_PROFIT_MARKET",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state reported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Resting, or a conditional order waiting for its trigger.
    New,
    /// Some quantity executed.
    PartiallyFilled,
    /// Fully executed.
    Filled,
    /// Canceled by the operator or an OCO rollback.
    Canceled,
    /// Refused after acceptance.
    Rejected,
    /// IOC/FOK/GTX remainder removed.
    Expired,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "NEW"),
            Self::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            Self::Filled => write!(f, "FILLED"),
            Self::Canceled => write!(f, "CANCELED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}

/// How long a priced order rests. Operator input accepts the four
/// values in [`TimeInForce::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Until canceled.
    #[default]
    Gtc,
    /// Fill what crosses now, drop the rest.
    Ioc,
    /// All at once or nothing.
    Fok,
    /// Post-only; expires instead of taking.
    Gtx,
}

impl TimeInForce {
    /// Shell prompt order.
    pub const ALL: [Self; 4] = [Self::Gtc, Self::Ioc, Self::Fok, Self::Gtx];

    /// Upper-case code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gtc => "GTC",
            Self::Ioc => "IOC",
            Self::Fok => "FOK",
            Self::Gtx => "GTX",
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeInForce {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|tif| tif.as_str() == upper)
            .ok_or(TypeError::UnknownVariant {
                kind: "time in force",
                value: upper,
            })
    }
}

/// An order ready for submission.
///
/// Fields the [`OrderType`] does not use are `None`, never zero. Only the
/// engine's builders create these, and only from validated input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Contract.
    pub symbol: Symbol,
    /// Direction.
    pub side: OrderSide,
    /// Determines the populated fields.
    pub order_type: OrderType,
    /// Base-asset size, before exchange truncation.
    pub quantity: Quantity,
    /// Limit price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// Trigger.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Price>,
    /// Set only when `price` is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    /// True for both OCO legs.
    #[serde(default)]
    pub reduce_only: bool,
    /// `{group}-sl` / `{group}-tp` for OCO legs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    /// One-line summary used in log messages.
    ///
    /// ```
    /// use tradebot_core::data::{OrderRequest, OrderSide, OrderType};
    /// use tradebot_core::types::{Quantity, Symbol};
    /// use rust_decimal_macros::dec;
    ///
    /// let request = OrderRequest {
    ///     symbol: Symbol::new("BTCUSDT").unwrap(),
    ///     side: OrderSide::Buy,
    ///     order_type: OrderType::Market,
    ///     quantity: Quantity::new(dec!(0.001)),
    ///     price: None,
    ///     stop_price: None,
    ///     time_in_force: None,
    ///     reduce_only: false,
    ///     client_order_id: None,
    /// };
    /// assert_eq!(request.describe(), "MARKET BUY 0.001 BTCUSDT");
    /// ```
    #[must_use]
    pub fn describe(&self) -> String {
        let mut out = format!(
            "{} {} {} {}",
            self.order_type, self.side, self.quantity, self.symbol
        );
        if let Some(price) = self.price {
            out.push_str(&format!(" @ {price}"));
        }
        if let Some(stop) = self.stop_price {
            out.push_str(&format!(" stop {stop}"));
        }
        if let Some(tif) = self.time_in_force {
            out.push_str(&format!(" {tif}"));
        }
        if self.reduce_only {
            out.push_str(" reduce-only");
        }
        out
    }
}

/// The exchange's view of one order.
///
/// Only `order_id` drives behaviour (the OCO rollback cancels by it).
/// Everything else is shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    /// Id to cancel or query by.
    pub order_id: OrderId,
    /// Echo of the request's client id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// Contract.
    pub symbol: Symbol,
    /// Direction.
    pub side: OrderSide,
    /// Type as read back.
    pub order_type: OrderType,
    /// Lifecycle state.
    pub status: OrderStatus,
    /// Size after exchange truncation.
    pub quantity: Quantity,
    /// Filled so far.
    pub executed_quantity: Quantity,
    /// Limit price, `None` when the exchange reports zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    /// Trigger price, `None` when the exchange reports zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Price>,
    /// Average fill price, `None` until filled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<Price>,
    /// Only for priced types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    /// Echo of the request flag.
    #[serde(default)]
    pub reduce_only: bool,
    /// Last change on the exchange.
    pub update_time: Timestamp,
}
