//! Order request builders.
//!
//! One pure mapping per order type from validated parameters to the
//! canonical [`OrderRequest`]. Inputs are trusted; nothing is re-checked.
//! Fields a type does not use stay `None`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tradebot_core::data::{OrderRequest, OrderSide, OrderType, TimeInForce};
use tradebot_core::types::{Quantity, Symbol};

use crate::validator::{LimitParams, MarketParams, OcoParams, StopLimitParams, TakeProfitParams};

/// Builds a market order request.
#[must_use]
pub fn build_market(params: &MarketParams) -> OrderRequest {
    OrderRequest {
        symbol: params.symbol.clone(),
        side: params.side,
        order_type: OrderType::Market,
        quantity: params.quantity,
        price: None,
        stop_price: None,
        time_in_force: None,
        reduce_only: false,
        client_order_id: None,
    }
}

/// Builds a limit order request.
#[must_use]
pub fn build_limit(params: &LimitParams) -> OrderRequest {
    OrderRequest {
        symbol: params.symbol.clone(),
        side: params.side,
        order_type: OrderType::Limit,
        quantity: params.quantity,
        price: Some(params.price),
        stop_price: None,
        time_in_force: Some(params.time_in_force),
        reduce_only: false,
        client_order_id: None,
    }
}

/// Builds a stop-limit order request.
#[must_use]
pub fn build_stop_limit(params: &StopLimitParams) -> OrderRequest {
    OrderRequest {
        symbol: params.symbol.clone(),
        side: params.side,
        order_type: OrderType::StopLimit,
        quantity: params.quantity,
        price: Some(params.price),
        stop_price: Some(params.stop_price),
        time_in_force: Some(params.time_in_force),
        reduce_only: false,
        client_order_id: None,
    }
}

/// Builds a take-profit order request.
///
/// `TakeProfit` with a limit price, `TakeProfitMarket` without one.
#[must_use]
pub fn build_take_profit(params: &TakeProfitParams) -> OrderRequest {
    let (order_type, time_in_force) = match params.price {
        Some(_) => (OrderType::TakeProfit, Some(params.time_in_force)),
        None => (OrderType::TakeProfitMarket, None),
    };
    OrderRequest {
        symbol: params.symbol.clone(),
        side: params.side,
        order_type,
        quantity: params.quantity,
        price: params.price,
        stop_price: Some(params.stop_price),
        time_in_force,
        reduce_only: false,
        client_order_id: None,
    }
}

/// Two linked legs submitted as one logical OCO order.
///
/// Created per command and dropped once both legs are placed or rolled
/// back. Both legs share symbol, side and quantity and are reduce-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcoPlan {
    /// Links the two legs; also the prefix of their client order IDs.
    pub group_id: String,
    /// Contract symbol
    pub symbol: Symbol,
    /// Side of both legs
    pub side: OrderSide,
    /// Quantity of both legs
    pub quantity: Quantity,
    /// Risk-limiting leg, submitted first
    pub stop_loss: OrderRequest,
    /// Profit-taking leg, submitted second
    pub take_profit: OrderRequest,
}

impl OcoPlan {
    /// Generates a fresh group ID that fits the exchange's 36-character
    /// client order ID limit once a leg suffix is appended.
    #[must_use]
    pub fn new_group_id() -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!("oco-{}", &id[..16])
    }
}

/// Builds both OCO legs.
///
/// The stop-loss leg is `StopLimit` when a limit price was given and
/// `StopMarket` otherwise. The take-profit leg is `TakeProfit` with the
/// take-profit level as both trigger and limit price.
#[must_use]
pub fn build_oco(params: &OcoParams, group_id: &str) -> OcoPlan {
    let stop_loss = match params.stop_loss_limit {
        Some(limit) => OrderRequest {
            symbol: params.symbol.clone(),
            side: params.side,
            order_type: OrderType::StopLimit,
            quantity: params.quantity,
            price: Some(limit),
            stop_price: Some(params.stop_loss),
            time_in_force: Some(TimeInForce::Gtc),
            reduce_only: true,
            client_order_id: Some(format!("{group_id}-sl")),
        },
        None => OrderRequest {
            symbol: params.symbol.clone(),
            side: params.side,
            order_type: OrderType::StopMarket,
            quantity: params.quantity,
            price: None,
            stop_price: Some(params.stop_loss),
            time_in_force: None,
            reduce_only: true,
            client_order_id: Some(format!("{group_id}-sl")),
        },
    };

    let take_profit = OrderRequest {
        symbol: params.symbol.clone(),
        side: params.side,
        order_type: OrderType::TakeProfit,
        quantity: params.quantity,
        price: Some(params.take_profit),
        stop_price: Some(params.take_profit),
        time_in_force: Some(TimeInForce::Gtc),
        reduce_only: true,
        client_order_id: Some(format!("{group_id}-tp")),
    };

    OcoPlan {
        group_id: group_id.to_string(),
        symbol: params.symbol.clone(),
        side: params.side,
        quantity: params.quantity,
        stop_loss,
        take_profit,
    }
}
