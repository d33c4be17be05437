//! Request and response shapes of the `/fapi` REST API.
//!
//! Decimals arrive as JSON strings and are decoded by `rust_decimal`'s
//! serde support. Unknown fields are ignored, so only what the gateway
//! reads is declared.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Production futures host.
pub const MAINNET_REST_URL: &str = "https://fapi.binance.com";

/// Futures testnet host; keys come from the testnet site, not the main
/// account.
pub const TESTNET_REST_URL: &str = "https://testnet.binancefuture.com";

/// `side` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceOrderSide {
    /// `BUY`
    Buy,
    /// `SELL`
    Sell,
}

impl BinanceOrderSide {
    /// Value sent as `side=`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

/// `type` parameter. `STOP` is the futures name for a stop-limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceOrderType {
    /// `LIMIT`
    Limit,
    /// `MARKET`
    Market,
    /// `STOP`: limit order armed at `stopPrice`
    Stop,
    /// `STOP_MARKET`
    StopMarket,
    /// `TAKE_PROFIT`: limit order armed at `stopPrice`
    TakeProfit,
    /// `TAKE_PROFIT_MARKET`
    TakeProfitMarket,
    /// `TRAILING_STOP_MARKET`, only ever read back
    TrailingStopMarket,
}

impl BinanceOrderType {
    /// Value sent as `type=`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Limit => "LIMIT",
            Self::Market => "MARKET",
            Self::Stop => "STOP",
            Self::StopMarket => "STOP_MARKET",
            Self::TakeProfit => "TAKE_PROFIT",
            Self::TakeProfitMarket => "TAKE_PROFIT_MARKET",
            Self::TrailingStopMarket => "TRAILING_STOP_MARKET",
        }
    }
}

/// `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceOrderStatus {
    /// Resting, or a conditional order not yet triggered
    New,
    /// `PARTIALLY_FILLED`
    PartiallyFilled,
    /// `FILLED`
    Filled,
    /// `CANCELED`
    Canceled,
    /// `REJECTED`
    Rejected,
    /// IOC/FOK remainder, or GTX that would have taken
    Expired,
    /// Removed by self-trade prevention
    ExpiredInMatch,
}

/// `timeInForce` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BinanceTimeInForce {
    /// `GTC`
    Gtc,
    /// `IOC`
    Ioc,
    /// `FOK`
    Fok,
    /// `GTX`: post-only
    Gtx,
    /// `GTD`, only ever read back
    Gtd,
}

/// Body of `POST`, `GET` and `DELETE /fapi/v1/order`, and each entry of
/// `/fapi/v1/openOrders`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceOrderResponse {
    /// Contract.
    pub symbol: String,
    /// Exchange id.
    pub order_id: i64,
    /// `newClientOrderId` as sent; OCO legs use `{group}-sl` / `{group}-tp`.
    #[serde(default)]
    pub client_order_id: Option<String>,
    /// `"0"` for market and stop-market orders.
    #[serde(default)]
    pub price: Option<Decimal>,
    /// `"0"` unless conditional.
    #[serde(default)]
    pub stop_price: Option<Decimal>,
    /// `"0"` until something fills.
    #[serde(default)]
    pub avg_price: Option<Decimal>,
    /// Requested size.
    pub orig_qty: Decimal,
    /// Filled size.
    #[serde(default)]
    pub executed_qty: Option<Decimal>,
    /// Lifecycle state.
    pub status: BinanceOrderStatus,
    /// Absent on some market responses.
    #[serde(default)]
    pub time_in_force: Option<BinanceTimeInForce>,
    /// `type`.
    #[serde(rename = "type")]
    pub order_type: BinanceOrderType,
    /// Direction.
    pub side: BinanceOrderSide,
    /// Set on both OCO legs.
    #[serde(default)]
    pub reduce_only: bool,
    /// Last change, Unix ms.
    #[serde(default)]
    pub update_time: Option<i64>,
}

/// Position from `/fapi/v2/positionRisk`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinancePosition {
    /// Contract.
    pub symbol: String,
    /// Negative when short.
    pub position_amt: Decimal,
    /// Average entry.
    pub entry_price: Decimal,
    /// Current mark.
    pub mark_price: Decimal,
    /// Unrealized PnL; Binance spells it `unRealizedProfit`.
    pub un_realized_profit: Decimal,
    /// `"0"` when the position cannot be liquidated.
    pub liquidation_price: Decimal,
    /// Sent as a string, e.g. `"10"`.
    pub leverage: String,
    /// `cross` or `isolated`.
    #[serde(default)]
    pub margin_type: Option<String>,
    /// Last change, Unix ms.
    #[serde(default)]
    pub update_time: i64,
}

/// Asset entry of `/fapi/v2/account`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceAccountAsset {
    /// Margin asset, e.g. `USDT`.
    pub asset: String,
    /// Deposits plus realized PnL.
    pub wallet_balance: Decimal,
    /// Open PnL in this asset.
    pub unrealized_profit: Decimal,
    /// Free for new orders.
    pub available_balance: Decimal,
}

/// Body of `/fapi/v2/account`; totals are in USDT.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceFuturesAccount {
    /// Sum of wallet balances.
    pub total_wallet_balance: Decimal,
    /// Sum of open PnL.
    pub total_unrealized_profit: Decimal,
    /// Wallet plus open PnL.
    pub total_margin_balance: Decimal,
    /// Free margin.
    pub available_balance: Decimal,
    /// Per-asset breakdown; zero balances included.
    #[serde(default)]
    pub assets: Vec<BinanceAccountAsset>,
}

/// Latest price from `/fapi/v1/ticker/price`.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceTickerPrice {
    /// Contract.
    pub symbol: String,
    /// Last trade price.
    pub price: Decimal,
}

/// Response of `/fapi/v1/leverage`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceLeverageResponse {
    /// Contract.
    pub symbol: String,
    /// What the exchange actually set.
    pub leverage: u8,
}

/// Response of `/fapi/v1/exchangeInfo`, reduced to what order entry needs.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceExchangeInfo {
    /// One entry per listed contract.
    pub symbols: Vec<BinanceSymbolInfo>,
}

/// Precision rules for one contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceSymbolInfo {
    /// Contract.
    pub symbol: String,
    /// `TRADING` when orders are accepted.
    #[serde(default)]
    pub status: Option<String>,
    /// Decimal places allowed in prices
    pub price_precision: u32,
    /// Decimal places allowed in quantities
    pub quantity_precision: u32,
}

/// Error body: `{"code": -2021, "msg": "Order would immediately trigger."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BinanceApiError {
    /// Negative Binance code.
    pub code: i32,
    /// Human-readable text.
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_stop_loss_leg_response() {
        let json = r#"{
            "orderId": 4611875134427365377,
            "symbol": "BTCUSDT",
            "status": "NEW",
            "clientOrderId": "oco-1a2b3c4d5e6f7a8b-sl",
            "price": "94500.0",
            "avgPrice": "0.00",
            "origQty": "0.001",
            "executedQty": "0",
            "cumQuote": "0",
            "timeInForce": "GTC",
            "type": "STOP",
            "reduceOnly": true,
            "closePosition": false,
            "side": "SELL",
            "positionSide": "BOTH",
            "stopPrice": "95000.0",
            "workingType": "CONTRACT_PRICE",
            "updateTime": 1566818724722
        }"#;

        let order: BinanceOrderResponse = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_type, BinanceOrderType::Stop);
        assert_eq!(order.status, BinanceOrderStatus::New);
        assert_eq!(order.stop_price, Some(dec!(95000.0)));
        assert_eq!(order.orig_qty, dec!(0.001));
        assert!(order.reduce_only);
    }

    #[test]
    fn test_short_position_response() {
        let json = r#"{
            "entryPrice": "95000.0",
            "marginType": "cross",
            "isAutoAddMargin": "false",
            "isolatedMargin": "0.00000000",
            "leverage": "10",
            "liquidationPrice": "0",
            "markPrice": "96000.00000000",
            "maxNotionalValue": "1000000",
            "positionAmt": "-0.010",
            "notional": "-960.0",
            "symbol": "BTCUSDT",
            "unRealizedProfit": "-10.00000000",
            "positionSide": "BOTH",
            "updateTime": 1625474304765
        }"#;

        let position: BinancePosition = serde_json::from_str(json).unwrap();
        assert_eq!(position.position_amt, dec!(-0.010));
        assert_eq!(position.leverage, "10");
        assert!(position.liquidation_price.is_zero());
    }

    #[test]
    fn test_exchange_info_ignores_extra_fields() {
        let json = r#"{
            "timezone": "UTC",
            "symbols": [{
                "symbol": "BTCUSDT",
                "status": "TRADING",
                "pricePrecision": 2,
                "quantityPrecision": 3,
                "baseAsset": "BTC",
                "filters": []
            }]
        }"#;

        let info: BinanceExchangeInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.symbols[0].price_precision, 2);
        assert_eq!(info.symbols[0].quantity_precision, 3);
    }
}
