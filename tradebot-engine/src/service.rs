//! Order service: validate, build, then call the gateway.
//!
//! Every entry point takes raw user input. Validation runs first and a
//! validation failure means the gateway is never called.

use std::sync::Arc;
use tracing::info;

use tradebot_core::data::{AccountSummary, OrderResult, Position};
use tradebot_core::error::{TradeError, ValidationError};
use tradebot_core::traits::ExchangeGateway;
use tradebot_core::types::{Leverage, Price};

use crate::builder::{
    OcoPlan, build_limit, build_market, build_oco, build_stop_limit, build_take_profit,
};
use crate::oco::{OcoCoordinator, OcoOutcome, OcoPlacement};
use crate::validator::{
    validate_leverage, validate_limit, validate_market, validate_oco, validate_order_id,
    validate_stop_limit, validate_symbol, validate_take_profit,
};

/// Order entry and account queries over one gateway.
#[derive(Clone)]
pub struct OrderService {
    gateway: Arc<dyn ExchangeGateway>,
}

impl OrderService {
    /// Creates a service over a gateway.
    #[must_use]
    pub fn new(gateway: Arc<dyn ExchangeGateway>) -> Self {
        Self { gateway }
    }

    /// Returns the underlying gateway.
    #[must_use]
    pub fn gateway(&self) -> &Arc<dyn ExchangeGateway> {
        &self.gateway
    }

    /// Places a market order.
    pub async fn place_market_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
    ) -> Result<OrderResult, TradeError> {
        let request = build_market(&validate_market(symbol, side, quantity)?);
        info!(order = %request.describe(), "Placing market order");
        let result = self.gateway.submit_order(&request).await?;
        info!(order_id = %result.order_id, status = %result.status, "Market order placed");
        Ok(result)
    }

    /// Places a limit order. `time_in_force` defaults to GTC.
    pub async fn place_limit_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        price: &str,
        time_in_force: Option<&str>,
    ) -> Result<OrderResult, TradeError> {
        let request = build_limit(&validate_limit(
            symbol,
            side,
            quantity,
            price,
            time_in_force,
        )?);
        info!(order = %request.describe(), "Placing limit order");
        let result = self.gateway.submit_order(&request).await?;
        info!(order_id = %result.order_id, status = %result.status, "Limit order placed");
        Ok(result)
    }

    /// Places a stop-limit order.
    pub async fn place_stop_limit_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        price: &str,
        stop_price: &str,
        time_in_force: Option<&str>,
    ) -> Result<OrderResult, TradeError> {
        let request = build_stop_limit(&validate_stop_limit(
            symbol,
            side,
            quantity,
            price,
            stop_price,
            time_in_force,
        )?);
        info!(order = %request.describe(), "Placing stop-limit order");
        let result = self.gateway.submit_order(&request).await?;
        info!(order_id = %result.order_id, status = %result.status, "Stop-limit order placed");
        Ok(result)
    }

    /// Places a standalone take-profit order; without `price` it fills at
    /// market once `stop_price` is reached.
    pub async fn place_take_profit_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        price: Option<&str>,
        stop_price: &str,
        time_in_force: Option<&str>,
    ) -> Result<OrderResult, TradeError> {
        let request = build_take_profit(&validate_take_profit(
            symbol,
            side,
            quantity,
            price,
            stop_price,
            time_in_force,
        )?);
        info!(order = %request.describe(), "Placing take-profit order");
        let result = self.gateway.submit_order(&request).await?;
        info!(order_id = %result.order_id, status = %result.status, "Take-profit order placed");
        Ok(result)
    }

    /// Validates OCO input and runs the coordinator, returning the raw
    /// terminal outcome.
    ///
    /// # Errors
    ///
    /// Only validation errors; submission failures are outcomes.
    pub async fn submit_oco(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        take_profit: &str,
        stop_loss: &str,
        stop_loss_limit: Option<&str>,
    ) -> Result<OcoOutcome, ValidationError> {
        let params = validate_oco(
            symbol,
            side,
            quantity,
            take_profit,
            stop_loss,
            stop_loss_limit,
        )?;
        let plan = build_oco(&params, &OcoPlan::new_group_id());
        info!(
            group_id = %plan.group_id,
            stop_loss = %plan.stop_loss.describe(),
            take_profit = %plan.take_profit.describe(),
            "Placing OCO order"
        );
        Ok(OcoCoordinator::new(self.gateway.as_ref())
            .execute(&plan)
            .await)
    }

    /// Places an OCO pair.
    ///
    /// # Errors
    ///
    /// [`TradeError::Validation`] before anything is sent,
    /// [`TradeError::Oco`] when nothing is left live, and
    /// [`TradeError::Orphaned`] when a stop-loss order is left live.
    pub async fn place_oco_order(
        &self,
        symbol: &str,
        side: &str,
        quantity: &str,
        take_profit: &str,
        stop_loss: &str,
        stop_loss_limit: Option<&str>,
    ) -> Result<OcoPlacement, TradeError> {
        self.submit_oco(
            symbol,
            side,
            quantity,
            take_profit,
            stop_loss,
            stop_loss_limit,
        )
        .await?
        .into_result()
    }

    /// Lists open positions, optionally for one symbol.
    pub async fn positions(&self, symbol: Option<&str>) -> Result<Vec<Position>, TradeError> {
        let symbol = symbol.map(validate_symbol).transpose()?;
        Ok(self.gateway.positions(symbol.as_ref()).await?)
    }

    /// Lists open orders, optionally for one symbol.
    pub async fn open_orders(&self, symbol: Option<&str>) -> Result<Vec<OrderResult>, TradeError> {
        let symbol = symbol.map(validate_symbol).transpose()?;
        Ok(self.gateway.open_orders(symbol.as_ref()).await?)
    }

    /// Queries one order.
    pub async fn order_status(
        &self,
        symbol: &str,
        order_id: &str,
    ) -> Result<OrderResult, TradeError> {
        let symbol = validate_symbol(symbol)?;
        let order_id = validate_order_id(order_id)?;
        Ok(self.gateway.order_status(&symbol, &order_id).await?)
    }

    /// Cancels one order.
    pub async fn cancel_order(
        &self,
        symbol: &str,
        order_id: &str,
    ) -> Result<OrderResult, TradeError> {
        let symbol = validate_symbol(symbol)?;
        let order_id = validate_order_id(order_id)?;
        let result = self.gateway.cancel_order(&symbol, &order_id).await?;
        info!(symbol = %symbol, order_id = %order_id, "Order canceled");
        Ok(result)
    }

    /// Cancels every open order on a symbol.
    pub async fn cancel_all_orders(&self, symbol: &str) -> Result<(), TradeError> {
        let symbol = validate_symbol(symbol)?;
        self.gateway.cancel_all_orders(&symbol).await?;
        info!(symbol = %symbol, "All open orders canceled");
        Ok(())
    }

    /// Returns the account summary.
    pub async fn account(&self) -> Result<AccountSummary, TradeError> {
        Ok(self.gateway.account().await?)
    }

    /// Returns the latest price for a symbol.
    pub async fn price(&self, symbol: &str) -> Result<Price, TradeError> {
        let symbol = validate_symbol(symbol)?;
        Ok(self.gateway.price(&symbol).await?)
    }

    /// Sets leverage for a symbol and returns what the exchange applied.
    pub async fn set_leverage(&self, symbol: &str, leverage: &str) -> Result<Leverage, TradeError> {
        let symbol = validate_symbol(symbol)?;
        let leverage = validate_leverage(leverage)?;
        let applied = self.gateway.set_leverage(&symbol, leverage).await?;
        info!(symbol = %symbol, leverage = %applied, "Leverage set");
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oco::OcoPhase;
    use crate::testing::{Call, RecordingGateway};
    use rust_decimal_macros::dec;
    use tradebot_core::data::OrderType;
    use tradebot_core::error::Field;

    fn service() -> (Arc<RecordingGateway>, OrderService) {
        let gateway = Arc::new(RecordingGateway::new());
        let service = OrderService::new(gateway.clone());
        (gateway, service)
    }

    fn validation_field(err: TradeError) -> Field {
        match err {
            TradeError::Validation(e) => e.field(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_market_order_submitted() {
        let (gateway, service) = service();
        let result = service
            .place_market_order("btcusdt", "buy", "0.001")
            .await
            .unwrap();
        assert_eq!(result.symbol.as_str(), "BTCUSDT");
        assert_eq!(gateway.submits(), vec![OrderType::Market]);
    }

    #[tokio::test]
    async fn test_invalid_quantity_never_reaches_gateway() {
        let (gateway, service) = service();

        let err = service
            .place_market_order("BTCUSDT", "BUY", "0")
            .await
            .unwrap_err();
        assert_eq!(validation_field(err), Field::Quantity);

        let err = service
            .place_limit_order("BTCUSDT", "BUY", "-1", "90000", None)
            .await
            .unwrap_err();
        assert_eq!(validation_field(err), Field::Quantity);

        let err = service
            .place_stop_limit_order("BTCUSDT", "SELL", "0", "90000", "91000", None)
            .await
            .unwrap_err();
        assert_eq!(validation_field(err), Field::Quantity);

        let err = service
            .place_take_profit_order("BTCUSDT", "SELL", "-0.5", Some("110000"), "110000", None)
            .await
            .unwrap_err();
        assert_eq!(validation_field(err), Field::Quantity);

        let err = service
            .place_oco_order("BTCUSDT", "SELL", "0", "110000", "95000", None)
            .await
            .unwrap_err();
        assert_eq!(validation_field(err), Field::Quantity);

        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_limit_defaults_to_gtc() {
        let (gateway, service) = service();
        let result = service
            .place_limit_order("ETHUSDT", "SELL", "0.5", "3500", Some(""))
            .await
            .unwrap();
        assert_eq!(
            result.time_in_force,
            Some(tradebot_core::data::TimeInForce::Gtc)
        );
        assert_eq!(gateway.submits(), vec![OrderType::Limit]);
    }

    #[tokio::test]
    async fn test_take_profit_submitted_with_both_prices() {
        let (gateway, service) = service();
        let result = service
            .place_take_profit_order("BTCUSDT", "SELL", "0.001", Some("110000"), "109500", None)
            .await
            .unwrap();
        assert_eq!(result.order_type, OrderType::TakeProfit);
        assert_eq!(result.price.unwrap().as_decimal(), dec!(110000));
        assert_eq!(result.stop_price.unwrap().as_decimal(), dec!(109500));

        service
            .place_take_profit_order("BTCUSDT", "SELL", "0.001", None, "110000", Some("GTC"))
            .await
            .unwrap();
        assert_eq!(
            gateway.submits(),
            vec![OrderType::TakeProfit, OrderType::TakeProfitMarket]
        );
    }

    #[tokio::test]
    async fn test_oco_without_limit_uses_stop_market() {
        let (gateway, service) = service();
        let placement = service
            .place_oco_order("BTCUSDT", "SELL", "0.001", "110000", "95000", Some(" "))
            .await
            .unwrap();
        assert!(placement.group_id.starts_with("oco-"));
        assert_eq!(
            gateway.submits(),
            vec![OrderType::StopMarket, OrderType::TakeProfit]
        );
    }

    #[tokio::test]
    async fn test_submit_oco_reports_phase() {
        let gateway = Arc::new(RecordingGateway::new().reject(OrderType::TakeProfit));
        let service = OrderService::new(gateway.clone());
        let outcome = service
            .submit_oco("BTCUSDT", "BUY", "0.001", "90000", "99000", Some("99500"))
            .await
            .unwrap();
        assert_eq!(outcome.phase(), OcoPhase::RolledBack);
        assert_eq!(gateway.cancels().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_symbol_on_query() {
        let (gateway, service) = service();
        let err = service.positions(Some("BTC")).await.unwrap_err();
        assert_eq!(validation_field(err), Field::Symbol);
        assert!(gateway.calls().is_empty());

        service.positions(None).await.unwrap();
        assert_eq!(gateway.calls(), vec![Call::Positions(None)]);
    }

    #[tokio::test]
    async fn test_leverage_validated() {
        let (gateway, service) = service();
        let err = service.set_leverage("BTCUSDT", "200").await.unwrap_err();
        assert_eq!(validation_field(err), Field::Leverage);

        let applied = service.set_leverage("BTCUSDT", "10").await.unwrap();
        assert_eq!(applied.as_u8(), 10);
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_order_passes_ids() {
        let (gateway, service) = service();
        service.cancel_order("BTCUSDT", "12345").await.unwrap();
        assert_eq!(
            gateway.cancels(),
            vec![tradebot_core::types::OrderId::new("12345").unwrap()]
        );
    }
}
