//! In-memory gateway that records every call.
//!
//! Compiled for this crate's tests and, through the `test-util` feature,
//! for downstream crates that drive an [`OrderService`](crate::service::OrderService)
//! without a network.

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use tradebot_core::data::{
    AccountSummary, OrderRequest, OrderResult, OrderStatus, OrderType, Position, PositionSide,
};
use tradebot_core::error::{ExchangeError, GatewayError, NetworkError};
use tradebot_core::traits::ExchangeGateway;
use tradebot_core::types::{Leverage, OrderId, Price, Quantity, Symbol, Timestamp};

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `submit_order`, by order type
    Submit(OrderType),
    /// `cancel_order`
    Cancel(OrderId),
    /// `cancel_all_orders`
    CancelAll(Symbol),
    /// `order_status`
    OrderStatus(OrderId),
    /// `open_orders`
    OpenOrders(Option<Symbol>),
    /// `positions`
    Positions(Option<Symbol>),
    /// `account`
    Account,
    /// `price`
    Price(Symbol),
    /// `set_leverage`
    SetLeverage(Symbol, Leverage),
}

/// Accepts everything unless told otherwise. Order IDs count up from 1000,
/// the price is 96000 and there is one open BTCUSDT long.
pub struct RecordingGateway {
    calls: Mutex<Vec<Call>>,
    requests: Mutex<Vec<OrderRequest>>,
    next_id: AtomicI64,
    rejected_types: Mutex<Vec<OrderType>>,
    fail_cancel: AtomicBool,
}

impl Default for RecordingGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingGateway {
    /// Creates a gateway that accepts every call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1000),
            rejected_types: Mutex::new(Vec::new()),
            fail_cancel: AtomicBool::new(false),
        }
    }

    /// Rejects every submission of `order_type`.
    #[must_use]
    pub fn reject(self, order_type: OrderType) -> Self {
        self.rejected_types.lock().push(order_type);
        self
    }

    /// Makes every cancel fail with a timeout.
    #[must_use]
    pub fn failing_cancel(self) -> Self {
        self.fail_cancel.store(true, Ordering::SeqCst);
        self
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Requests that were accepted, in submission order.
    #[must_use]
    pub fn requests(&self) -> Vec<OrderRequest> {
        self.requests.lock().clone()
    }

    /// Order types of every submission, accepted or not.
    #[must_use]
    pub fn submits(&self) -> Vec<OrderType> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Submit(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// Order IDs of every cancel attempt.
    #[must_use]
    pub fn cancels(&self) -> Vec<OrderId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Cancel(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn result_for(request: &OrderRequest, order_id: OrderId, status: OrderStatus) -> OrderResult {
        OrderResult {
            order_id,
            client_order_id: request.client_order_id.clone(),
            symbol: request.symbol.clone(),
            side: request.side,
            order_type: request.order_type,
            status,
            quantity: request.quantity,
            executed_quantity: Quantity::ZERO,
            price: request.price,
            stop_price: request.stop_price,
            avg_price: None,
            time_in_force: request.time_in_force,
            reduce_only: request.reduce_only,
            update_time: Timestamp::new_unchecked(1_700_000_000_000),
        }
    }

    fn sample_result(symbol: &Symbol, order_id: &OrderId, status: OrderStatus) -> OrderResult {
        OrderResult {
            order_id: order_id.clone(),
            client_order_id: None,
            symbol: symbol.clone(),
            side: tradebot_core::data::OrderSide::Buy,
            order_type: OrderType::Limit,
            status,
            quantity: Quantity::new(dec!(0.001)),
            executed_quantity: Quantity::ZERO,
            price: Some(Price::new_unchecked(dec!(90000))),
            stop_price: None,
            avg_price: None,
            time_in_force: None,
            reduce_only: false,
            update_time: Timestamp::ZERO,
        }
    }
}

#[async_trait]
impl ExchangeGateway for RecordingGateway {
    fn name(&self) -> &str {
        "recording"
    }

    async fn submit_order(&self, request: &OrderRequest) -> Result<OrderResult, GatewayError> {
        self.record(Call::Submit(request.order_type));
        if self.rejected_types.lock().contains(&request.order_type) {
            return Err(ExchangeError::OrderRejected {
                reason: "Order would immediately trigger.".to_string(),
                code: Some(-2021),
            }
            .into());
        }
        self.requests.lock().push(request.clone());
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(Self::result_for(request, OrderId::from(id), OrderStatus::New))
    }

    async fn cancel_order(
        &self,
        symbol: &Symbol,
        order_id: &OrderId,
    ) -> Result<OrderResult, GatewayError> {
        self.record(Call::Cancel(order_id.clone()));
        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(NetworkError::Timeout { timeout_ms: 30_000 }.into());
        }
        Ok(Self::sample_result(symbol, order_id, OrderStatus::Canceled))
    }

    async fn cancel_all_orders(&self, symbol: &Symbol) -> Result<(), GatewayError> {
        self.record(Call::CancelAll(symbol.clone()));
        Ok(())
    }

    async fn order_status(
        &self,
        symbol: &Symbol,
        order_id: &OrderId,
    ) -> Result<OrderResult, GatewayError> {
        self.record(Call::OrderStatus(order_id.clone()));
        Ok(Self::sample_result(symbol, order_id, OrderStatus::New))
    }

    async fn open_orders(&self, symbol: Option<&Symbol>) -> Result<Vec<OrderResult>, GatewayError> {
        self.record(Call::OpenOrders(symbol.cloned()));
        Ok(Vec::new())
    }

    async fn positions(&self, symbol: Option<&Symbol>) -> Result<Vec<Position>, GatewayError> {
        self.record(Call::Positions(symbol.cloned()));
        Ok(vec![Position {
            symbol: Symbol::new_unchecked("BTCUSDT"),
            side: PositionSide::Long,
            size: Quantity::new(dec!(0.01)),
            entry_price: Price::new_unchecked(dec!(95000)),
            mark_price: Price::new_unchecked(dec!(96000)),
            liquidation_price: None,
            unrealized_pnl: dec!(10),
            leverage: Leverage::ONE,
            update_time: Timestamp::ZERO,
        }])
    }

    async fn account(&self) -> Result<AccountSummary, GatewayError> {
        self.record(Call::Account);
        Ok(AccountSummary {
            total_wallet_balance: dec!(1000),
            available_balance: dec!(900),
            total_unrealized_pnl: dec!(10),
            total_margin_balance: dec!(1010),
            assets: Vec::new(),
        })
    }

    async fn price(&self, symbol: &Symbol) -> Result<Price, GatewayError> {
        self.record(Call::Price(symbol.clone()));
        Ok(Price::new_unchecked(dec!(96000)))
    }

    async fn set_leverage(
        &self,
        symbol: &Symbol,
        leverage: Leverage,
    ) -> Result<Leverage, GatewayError> {
        self.record(Call::SetLeverage(symbol.clone(), leverage));
        Ok(leverage)
    }
}
