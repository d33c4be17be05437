//! Binance USDⓈ-M futures gateway.
//!
//! Implements [`ExchangeGateway`] over the futures REST API.

#![allow(clippy::disallowed_types)]

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use tradebot_core::data::{
    AccountSummary, AssetBalance, OrderRequest, OrderResult, OrderSide, OrderStatus, OrderType,
    Position, PositionSide, TimeInForce,
};
use tradebot_core::error::{ExchangeError, GatewayError, NetworkError};
use tradebot_core::traits::{Credentials, ExchangeGateway};
use tradebot_core::types::{Leverage, OrderId, Price, Quantity, Symbol, Timestamp};

use crate::rest::{RestClient, RestConfig, RestConfigBuilder};

use super::types::{
    BinanceApiError, BinanceExchangeInfo, BinanceFuturesAccount, BinanceLeverageResponse,
    BinanceOrderResponse, BinanceOrderSide, BinanceOrderStatus, BinanceOrderType, BinancePosition,
    BinanceTickerPrice, BinanceTimeInForce, MAINNET_REST_URL, TESTNET_REST_URL,
};

const EXCHANGE: &str = "binance";

/// Precision rules for one symbol, from `exchangeInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRules {
    /// Decimal places allowed in prices
    pub price_precision: u32,
    /// Decimal places allowed in quantities
    pub quantity_precision: u32,
}

/// What a failed request was about, used to fill in error details.
#[derive(Debug, Default, Clone, Copy)]
struct ErrorContext<'a> {
    symbol: Option<&'a Symbol>,
    order_id: Option<&'a OrderId>,
    leverage: Option<Leverage>,
}

/// Binance futures gateway.
///
/// # Example
///
/// ```ignore
/// use tradebot_gateway::binance::BinanceFuturesGateway;
/// use tradebot_core::traits::{Credentials, ExchangeGateway};
///
/// let gateway = BinanceFuturesGateway::new(&Credentials::new("key", "secret"))?;
/// let positions = gateway.positions(None).await?;
/// ```
pub struct BinanceFuturesGateway {
    client: RestClient,
    testnet: bool,
    rules: RwLock<HashMap<Symbol, SymbolRules>>,
}

impl BinanceFuturesGateway {
    /// Returns a REST config builder preset for these credentials, pointing
    /// at testnet or mainnet.
    #[must_use]
    pub fn rest_config(credentials: &Credentials) -> RestConfigBuilder {
        let base_url = if credentials.testnet {
            TESTNET_REST_URL
        } else {
            MAINNET_REST_URL
        };
        RestConfig::builder()
            .base_url(base_url)
            .api_key(credentials.api_key.clone())
            .api_secret(credentials.api_secret())
    }

    /// Creates a gateway with default REST settings.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HTTP client cannot be created.
    pub fn new(credentials: &Credentials) -> Result<Self, NetworkError> {
        Self::with_config(Self::rest_config(credentials).build(), credentials.testnet)
    }

    /// Creates a gateway from an explicit REST config.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HTTP client cannot be created.
    pub fn with_config(config: RestConfig, testnet: bool) -> Result<Self, NetworkError> {
        info!(
            exchange = EXCHANGE,
            base_url = %config.base_url,
            testnet = testnet,
            "Gateway initialized"
        );
        Ok(Self {
            client: RestClient::new(config)?,
            testnet,
            rules: RwLock::new(HashMap::new()),
        })
    }

    /// Returns whether this gateway talks to the testnet.
    #[must_use]
    pub fn is_testnet(&self) -> bool {
        self.testnet
    }

    /// Returns the precision rules for a symbol, fetching `exchangeInfo`
    /// on first use.
    ///
    /// # Errors
    ///
    /// [`ExchangeError::InvalidSymbol`] if the symbol is not listed.
    pub async fn symbol_rules(&self, symbol: &Symbol) -> Result<SymbolRules, GatewayError> {
        if let Some(rules) = self.cached_rules(symbol) {
            return Ok(rules);
        }
        if self.rules.read().is_empty() {
            self.load_rules().await?;
        }
        self.cached_rules(symbol).ok_or_else(|| {
            ExchangeError::InvalidSymbol {
                symbol: symbol.to_string(),
            }
            .into()
        })
    }

    fn cached_rules(&self, symbol: &Symbol) -> Option<SymbolRules> {
        self.rules.read().get(symbol).copied()
    }

    async fn load_rules(&self) -> Result<(), GatewayError> {
        let endpoint = "/fapi/v1/exchangeInfo";
        let response = self.client.get(endpoint).send().await?;
        let body = Self::read_body(response, ErrorContext::default()).await?;
        let info: BinanceExchangeInfo = Self::parse_json(&body, endpoint)?;

        let rules: HashMap<Symbol, SymbolRules> = info
            .symbols
            .into_iter()
            .filter_map(|s| {
                Symbol::new(&s.symbol).ok().map(|symbol| {
                    (
                        symbol,
                        SymbolRules {
                            price_precision: s.price_precision,
                            quantity_precision: s.quantity_precision,
                        },
                    )
                })
            })
            .collect();

        debug!(exchange = EXCHANGE, count = rules.len(), "Trading rules loaded");
        *self.rules.write() = rules;
        Ok(())
    }

    /// Builds the order parameters in wire order, truncating quantity and
    /// prices to the symbol's precision.
    fn order_params(
        request: &OrderRequest,
        rules: SymbolRules,
    ) -> Result<Vec<(String, String)>, ExchangeError> {
        let quantity = request.quantity.truncate(rules.quantity_precision);
        if !quantity.is_positive() {
            return Err(ExchangeError::InvalidParameter {
                param: "quantity".to_string(),
                reason: format!(
                    "{} is zero at {} decimal places",
                    request.quantity, rules.quantity_precision
                ),
            });
        }

        let mut params = vec![
            ("symbol".to_string(), request.symbol.to_string()),
            (
                "side".to_string(),
                Self::to_binance_side(request.side).as_str().to_string(),
            ),
            (
                "type".to_string(),
                Self::to_binance_order_type(request.order_type)
                    .as_str()
                    .to_string(),
            ),
            ("quantity".to_string(), quantity.to_string()),
        ];

        if let Some(price) = request.price {
            let price = Self::truncate_price(price, "price", rules.price_precision)?;
            params.push(("price".to_string(), price.to_string()));
            let tif = request.time_in_force.unwrap_or_default();
            params.push(("timeInForce".to_string(), tif.as_str().to_string()));
        }
        if let Some(stop_price) = request.stop_price {
            let stop_price =
                Self::truncate_price(stop_price, "stopPrice", rules.price_precision)?;
            params.push(("stopPrice".to_string(), stop_price.to_string()));
        }
        if request.reduce_only {
            params.push(("reduceOnly".to_string(), "true".to_string()));
        }
        if let Some(client_order_id) = &request.client_order_id {
            params.push(("newClientOrderId".to_string(), client_order_id.clone()));
        }

        Ok(params)
    }

    /// Truncates a price level; a level below the tick never leaves the process.
    fn truncate_price(price: Price, param: &str, precision: u32) -> Result<Price, ExchangeError> {
        let truncated = price.truncate(precision);
        if truncated.is_positive() {
            Ok(truncated)
        } else {
            Err(ExchangeError::InvalidParameter {
                param: param.to_string(),
                reason: format!("{price} is zero at {precision} decimal places"),
            })
        }
    }

    /// Reads a response body, turning non-success statuses into errors.
    async fn read_body(response: Response, ctx: ErrorContext<'_>) -> Result<String, GatewayError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| NetworkError::Http {
            status_code: status.as_u16(),
            reason: format!("Failed to read response: {e}"),
        })?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(Self::parse_error(status.as_u16(), &body, ctx))
        }
    }

    fn parse_json<T: DeserializeOwned>(body: &str, endpoint: &str) -> Result<T, ExchangeError> {
        serde_json::from_str(body).map_err(|e| ExchangeError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }

    /// Maps a Binance error response to a gateway error.
    fn parse_error(status: u16, body: &str, ctx: ErrorContext<'_>) -> GatewayError {
        let Ok(error) = serde_json::from_str::<BinanceApiError>(body) else {
            return match status {
                401 | 403 => ExchangeError::AuthenticationFailed {
                    reason: body.to_string(),
                }
                .into(),
                418 | 429 => ExchangeError::RateLimited {
                    retry_after_ms: 60_000,
                }
                .into(),
                _ => NetworkError::Http {
                    status_code: status,
                    reason: body.to_string(),
                }
                .into(),
            };
        };

        let invalid_parameter = |param: &str| ExchangeError::InvalidParameter {
            param: param.to_string(),
            reason: error.msg.clone(),
        };

        let mapped = match error.code {
            -1002 | -2014 | -2015 => ExchangeError::AuthenticationFailed {
                reason: error.msg.clone(),
            },
            -1003 | -1015 => ExchangeError::RateLimited {
                retry_after_ms: 60_000,
            },
            -2010 | -2019 => ExchangeError::InsufficientBalance {
                reason: error.msg.clone(),
            },
            -2011 | -2013 => ExchangeError::OrderNotFound {
                order_id: ctx
                    .order_id
                    .map_or_else(|| error.msg.clone(), ToString::to_string),
            },
            -1021 => invalid_parameter("timestamp"),
            -1111 => invalid_parameter("precision"),
            -1013 => invalid_parameter("filter"),
            -4164 => invalid_parameter("notional"),
            -1121 => ExchangeError::InvalidSymbol {
                symbol: ctx
                    .symbol
                    .map_or_else(|| error.msg.clone(), ToString::to_string),
            },
            -4028 => ExchangeError::InvalidLeverage {
                leverage: ctx.leverage.map_or(0, |l| l.as_u8()),
                max_leverage: Leverage::MAX_LEVERAGE,
            },
            -2021 | -2022 => ExchangeError::OrderRejected {
                reason: error.msg.clone(),
                code: Some(error.code),
            },
            code => ExchangeError::Unknown {
                code,
                message: error.msg.clone(),
            },
        };
        mapped.into()
    }

    fn to_binance_side(side: OrderSide) -> BinanceOrderSide {
        match side {
            OrderSide::Buy => BinanceOrderSide::Buy,
            OrderSide::Sell => BinanceOrderSide::Sell,
        }
    }

    fn from_binance_side(side: BinanceOrderSide) -> OrderSide {
        match side {
            BinanceOrderSide::Buy => OrderSide::Buy,
            BinanceOrderSide::Sell => OrderSide::Sell,
        }
    }

    fn to_binance_order_type(order_type: OrderType) -> BinanceOrderType {
        match order_type {
            OrderType::Market => BinanceOrderType::Market,
            OrderType::Limit => BinanceOrderType::Limit,
            OrderType::StopLimit => BinanceOrderType::Stop,
            OrderType::StopMarket => BinanceOrderType::StopMarket,
            OrderType::TakeProfit => BinanceOrderType::TakeProfit,
            OrderType::TakeProfitMarket => BinanceOrderType::TakeProfitMarket,
        }
    }

    fn from_binance_order_type(order_type: BinanceOrderType) -> OrderType {
        match order_type {
            BinanceOrderType::Market => OrderType::Market,
            BinanceOrderType::Limit => OrderType::Limit,
            BinanceOrderType::Stop => OrderType::StopLimit,
            BinanceOrderType::StopMarket | BinanceOrderType::TrailingStopMarket => {
                OrderType::StopMarket
            }
            BinanceOrderType::TakeProfit => OrderType::TakeProfit,
            BinanceOrderType::TakeProfitMarket => OrderType::TakeProfitMarket,
        }
    }

    fn from_binance_status(status: BinanceOrderStatus) -> OrderStatus {
        match status {
            BinanceOrderStatus::New => OrderStatus::New,
            BinanceOrderStatus::PartiallyFilled => OrderStatus::PartiallyFilled,
            BinanceOrderStatus::Filled => OrderStatus::Filled,
            BinanceOrderStatus::Canceled => OrderStatus::Canceled,
            BinanceOrderStatus::Rejected => OrderStatus::Rejected,
            BinanceOrderStatus::Expired | BinanceOrderStatus::ExpiredInMatch => {
                OrderStatus::Expired
            }
        }
    }

    fn from_binance_tif(tif: BinanceTimeInForce) -> TimeInForce {
        match tif {
            BinanceTimeInForce::Gtc | BinanceTimeInForce::Gtd => TimeInForce::Gtc,
            BinanceTimeInForce::Ioc => TimeInForce::Ioc,
            BinanceTimeInForce::Fok => TimeInForce::Fok,
            BinanceTimeInForce::Gtx => TimeInForce::Gtx,
        }
    }

    /// Converts an order response. Zero prices mean "not set".
    fn convert_order(
        resp: BinanceOrderResponse,
        endpoint: &str,
    ) -> Result<OrderResult, ExchangeError> {
        let symbol = Symbol::new(&resp.symbol).map_err(|e| ExchangeError::MalformedResponse {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        let price_of = |value: Option<rust_decimal::Decimal>| {
            value
                .filter(|p| !p.is_zero())
                .and_then(|p| Price::new(p).ok())
        };
        let order_type = Self::from_binance_order_type(resp.order_type);

        Ok(OrderResult {
            order_id: OrderId::from(resp.order_id),
            client_order_id: resp.client_order_id.filter(|id| !id.is_empty()),
            symbol,
            side: Self::from_binance_side(resp.side),
            order_type,
            status: Self::from_binance_status(resp.status),
            quantity: Quantity::new(resp.orig_qty),
            executed_quantity: resp.executed_qty.map_or(Quantity::ZERO, Quantity::new),
            price: price_of(resp.price),
            stop_price: price_of(resp.stop_price),
            avg_price: price_of(resp.avg_price),
            time_in_force: if order_type.requires_price() {
                resp.time_in_force.map(Self::from_binance_tif)
            } else {
                None
            },
            reduce_only: resp.reduce_only,
            update_time: resp
                .update_time
                .and_then(|t| Timestamp::new(t).ok())
                .unwrap_or_else(Timestamp::now),
        })
    }

    /// Converts a position, skipping flat ones.
    fn convert_position(pos: &BinancePosition) -> Option<Position> {
        if pos.position_amt.is_zero() {
            return None;
        }
        let symbol = Symbol::new(&pos.symbol).ok()?;
        let leverage = pos
            .leverage
            .parse::<u8>()
            .ok()
            .and_then(|l| Leverage::new(l).ok())
            .unwrap_or(Leverage::ONE);

        Some(Position {
            symbol,
            side: PositionSide::from_amount(pos.position_amt),
            size: Quantity::new(pos.position_amt).abs(),
            entry_price: Price::new(pos.entry_price).ok()?,
            mark_price: Price::new(pos.mark_price).ok()?,
            liquidation_price: Some(pos.liquidation_price)
                .filter(|p| !p.is_zero())
                .and_then(|p| Price::new(p).ok()),
            unrealized_pnl: pos.un_realized_profit,
            leverage,
            update_time: Timestamp::new(pos.update_time).unwrap_or(Timestamp::ZERO),
        })
    }
}

#[async_trait]
impl ExchangeGateway for BinanceFuturesGateway {
    fn name(&self) -> &str {
        EXCHANGE
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, GatewayError> {
        let endpoint = "/fapi/v1/order";
        let rules = self.symbol_rules(&request.symbol).await?;
        let params = Self::order_params(request, rules)?;

        debug!(exchange = EXCHANGE, order = %request.describe(), "Submitting order");

        let response = self
            .client
            .post(endpoint)
            .queries(params)
            .signed()
            .send()
            .await?;
        let ctx = ErrorContext {
            symbol: Some(&request.symbol),
            ..ErrorContext::default()
        };
        let body = Self::read_body(response, ctx).await?;
        let result = Self::convert_order(Self::parse_json(&body, endpoint)?, endpoint)?;

        info!(
            exchange = EXCHANGE,
            order_id = %result.order_id,
            symbol = %result.symbol,
            side = %result.side,
            order_type = %result.order_type,
            status = %result.status,
            "Order submitted"
        );
        Ok(result)
    }

    async fn cancel_order(
        &self,
        symbol: &Symbol,
        order_id: &OrderId,
    ) -> Result<OrderResult, GatewayError> {
        let endpoint = "/fapi/v1/order";
        let response = self
            .client
            .delete(endpoint)
            .query("symbol", symbol)
            .query("orderId", order_id)
            .signed()
            .send()
            .await?;
        let ctx = ErrorContext {
            symbol: Some(symbol),
            order_id: Some(order_id),
            ..ErrorContext::default()
        };
        let body = Self::read_body(response, ctx).await?;
        let result = Self::convert_order(Self::parse_json(&body, endpoint)?, endpoint)?;

        info!(exchange = EXCHANGE, order_id = %order_id, symbol = %symbol, "Order canceled");
        Ok(result)
    }

    async fn cancel_all_orders(&self, symbol: &Symbol) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete("/fapi/v1/allOpenOrders")
            .query("symbol", symbol)
            .signed()
            .send()
            .await?;
        let ctx = ErrorContext {
            symbol: Some(symbol),
            ..ErrorContext::default()
        };
        Self::read_body(response, ctx).await?;

        info!(exchange = EXCHANGE, symbol = %symbol, "All open orders canceled");
        Ok(())
    }

    async fn order_status(
        &self,
        symbol: &Symbol,
        order_id: &OrderId,
    ) -> Result<OrderResult, GatewayError> {
        let endpoint = "/fapi/v1/order";
        let response = self
            .client
            .get(endpoint)
            .query("symbol", symbol)
            .query("orderId", order_id)
            .signed()
            .send()
            .await?;
        let ctx = ErrorContext {
            symbol: Some(symbol),
            order_id: Some(order_id),
            ..ErrorContext::default()
        };
        let body = Self::read_body(response, ctx).await?;
        Ok(Self::convert_order(
            Self::parse_json(&body, endpoint)?,
            endpoint,
        )?)
    }

    async fn open_orders(&self, symbol: Option<&Symbol>) -> Result<Vec<OrderResult>, GatewayError> {
        let endpoint = "/fapi/v1/openOrders";
        let response = self
            .client
            .get(endpoint)
            .query_opt("symbol", symbol)
            .weight(if symbol.is_some() { 1 } else { 40 })
            .signed()
            .send()
            .await?;
        let ctx = ErrorContext {
            symbol,
            ..ErrorContext::default()
        };
        let body = Self::read_body(response, ctx).await?;
        let orders: Vec<BinanceOrderResponse> = Self::parse_json(&body, endpoint)?;

        let orders = orders
            .into_iter()
            .map(|o| Self::convert_order(o, endpoint))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(exchange = EXCHANGE, count = orders.len(), "Open orders queried");
        Ok(orders)
    }

    async fn positions(&self, symbol: Option<&Symbol>) -> Result<Vec<Position>, GatewayError> {
        let endpoint = "/fapi/v2/positionRisk";
        let response = self
            .client
            .get(endpoint)
            .query_opt("symbol", symbol)
            .weight(5)
            .signed()
            .send()
            .await?;
        let ctx = ErrorContext {
            symbol,
            ..ErrorContext::default()
        };
        let body = Self::read_body(response, ctx).await?;
        let raw: Vec<BinancePosition> = Self::parse_json(&body, endpoint)?;

        let positions: Vec<Position> = raw
            .iter()
            .filter_map(|p| {
                let converted = Self::convert_position(p);
                if converted.is_none() && !p.position_amt.is_zero() {
                    warn!(exchange = EXCHANGE, symbol = %p.symbol, "Skipping unreadable position");
                }
                converted
            })
            .collect();

        debug!(exchange = EXCHANGE, count = positions.len(), "Positions queried");
        Ok(positions)
    }

    async fn account(&self) -> Result<AccountSummary, GatewayError> {
        let endpoint = "/fapi/v2/account";
        let response = self
            .client
            .get(endpoint)
            .weight(5)
            .signed()
            .send()
            .await?;
        let body = Self::read_body(response, ErrorContext::default()).await?;
        let account: BinanceFuturesAccount = Self::parse_json(&body, endpoint)?;

        Ok(AccountSummary {
            total_wallet_balance: account.total_wallet_balance,
            available_balance: account.available_balance,
            total_unrealized_pnl: account.total_unrealized_profit,
            total_margin_balance: account.total_margin_balance,
            assets: account
                .assets
                .into_iter()
                .filter(|a| !a.wallet_balance.is_zero())
                .map(|a| AssetBalance {
                    asset: a.asset,
                    wallet_balance: a.wallet_balance,
                    unrealized_pnl: a.unrealized_profit,
                    available_balance: a.available_balance,
                })
                .collect(),
        })
    }

    async fn price(&self, symbol: &Symbol) -> Result<Price, GatewayError> {
        let endpoint = "/fapi/v1/ticker/price";
        let response = self
            .client
            .get(endpoint)
            .query("symbol", symbol)
            .send()
            .await?;
        let ctx = ErrorContext {
            symbol: Some(symbol),
            ..ErrorContext::default()
        };
        let body = Self::read_body(response, ctx).await?;
        let ticker: BinanceTickerPrice = Self::parse_json(&body, endpoint)?;

        Price::new(ticker.price).map_err(|e| {
            ExchangeError::MalformedResponse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    async fn set_leverage(
        &self,
        symbol: &Symbol,
        leverage: Leverage,
    ) -> Result<Leverage, GatewayError> {
        let endpoint = "/fapi/v1/leverage";
        let response = self
            .client
            .post(endpoint)
            .query("symbol", symbol)
            .query("leverage", leverage.as_u8())
            .signed()
            .send()
            .await?;
        let ctx = ErrorContext {
            symbol: Some(symbol),
            leverage: Some(leverage),
            ..ErrorContext::default()
        };
        let body = Self::read_body(response, ctx).await?;
        let applied: BinanceLeverageResponse = Self::parse_json(&body, endpoint)?;

        let applied = Leverage::new(applied.leverage).map_err(|e| {
            ExchangeError::MalformedResponse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })?;
        info!(exchange = EXCHANGE, symbol = %symbol, leverage = %applied, "Leverage set");
        Ok(applied)
    }
}
