//! Order entry and order management commands.

use std::io::Write;

use anyhow::Result;
use tradebot_engine::service::OrderService;

use crate::output;

/// Places a market order.
pub async fn market(
    service: &OrderService,
    out: &mut impl Write,
    symbol: &str,
    side: &str,
    quantity: &str,
) -> Result<()> {
    output::info(
        out,
        format!(
            "Placing MARKET {} order for {quantity} {}...",
            side.trim().to_uppercase(),
            symbol.trim().to_uppercase()
        ),
    )?;
    let order = service.place_market_order(symbol, side, quantity).await?;
    output::write_order(out, &order)?;
    output::success(out, "Market order placed!")?;
    Ok(())
}

/// Places a limit order.
pub async fn limit(
    service: &OrderService,
    out: &mut impl Write,
    symbol: &str,
    side: &str,
    quantity: &str,
    price: &str,
    time_in_force: Option<&str>,
) -> Result<()> {
    output::info(
        out,
        format!(
            "Placing LIMIT {} order for {quantity} {} @ {price}...",
            side.trim().to_uppercase(),
            symbol.trim().to_uppercase()
        ),
    )?;
    let order = service
        .place_limit_order(symbol, side, quantity, price, time_in_force)
        .await?;
    output::write_order(out, &order)?;
    output::success(out, "Limit order placed!")?;
    Ok(())
}

/// Places a stop-limit order.
#[allow(clippy::too_many_arguments)]
pub async fn stop_limit(
    service: &OrderService,
    out: &mut impl Write,
    symbol: &str,
    side: &str,
    quantity: &str,
    price: &str,
    stop_price: &str,
    time_in_force: Option<&str>,
) -> Result<()> {
    output::info(
        out,
        format!(
            "Placing STOP-LIMIT {} order for {quantity} {} (trigger {stop_price}, limit {price})...",
            side.trim().to_uppercase(),
            symbol.trim().to_uppercase()
        ),
    )?;
    let order = service
        .place_stop_limit_order(symbol, side, quantity, price, stop_price, time_in_force)
        .await?;
    output::write_order(out, &order)?;
    output::success(out, "Stop-Limit order placed!")?;
    Ok(())
}

/// Places a take-profit order; a market take-profit when `price` is absent.
#[allow(clippy::too_many_arguments)]
pub async fn take_profit(
    service: &OrderService,
    out: &mut impl Write,
    symbol: &str,
    side: &str,
    quantity: &str,
    price: Option<&str>,
    stop_price: &str,
    time_in_force: Option<&str>,
) -> Result<()> {
    let execution = price.map_or_else(|| "market".to_string(), |p| format!("limit {p}"));
    output::info(
        out,
        format!(
            "Placing TAKE-PROFIT {} order for {quantity} {} (trigger {stop_price}, {execution})...",
            side.trim().to_uppercase(),
            symbol.trim().to_uppercase()
        ),
    )?;
    let order = service
        .place_take_profit_order(symbol, side, quantity, price, stop_price, time_in_force)
        .await?;
    output::write_order(out, &order)?;
    output::success(out, "Take-Profit order placed!")?;
    Ok(())
}

/// Places an OCO pair. Failures surface as [`TradeError`] so the caller
/// can tell a clean rollback from an orphaned stop-loss.
///
/// [`TradeError`]: tradebot_core::error::TradeError
#[allow(clippy::too_many_arguments)]
pub async fn oco(
    service: &OrderService,
    out: &mut impl Write,
    symbol: &str,
    side: &str,
    quantity: &str,
    take_profit: &str,
    stop_loss: &str,
    stop_loss_limit: Option<&str>,
) -> Result<()> {
    output::info(
        out,
        format!("Placing OCO order (TP: {take_profit}, SL: {stop_loss})..."),
    )?;
    let placement = service
        .place_oco_order(
            symbol,
            side,
            quantity,
            take_profit,
            stop_loss,
            stop_loss_limit,
        )
        .await?;
    output::write_oco_placement(out, &placement)?;
    output::success(
        out,
        format!("OCO order placed (group {})", placement.group_id),
    )?;
    Ok(())
}

/// Shows one order.
pub async fn status(
    service: &OrderService,
    out: &mut impl Write,
    symbol: &str,
    order_id: &str,
) -> Result<()> {
    let order = service.order_status(symbol, order_id).await?;
    output::write_order(out, &order)?;
    Ok(())
}

/// Cancels one order.
pub async fn cancel(
    service: &OrderService,
    out: &mut impl Write,
    symbol: &str,
    order_id: &str,
) -> Result<()> {
    let order = service.cancel_order(symbol, order_id).await?;
    output::success(out, format!("Order {} cancelled!", order.order_id))?;
    Ok(())
}

/// Cancels every open order on a symbol.
pub async fn cancel_all(service: &OrderService, out: &mut impl Write, symbol: &str) -> Result<()> {
    service.cancel_all_orders(symbol).await?;
    output::success(
        out,
        format!("All orders for {} cancelled!", symbol.trim().to_uppercase()),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tradebot_core::data::{OrderType, TimeInForce};
    use tradebot_engine::testing::{Call, RecordingGateway};

    fn service() -> (Arc<RecordingGateway>, OrderService) {
        let gateway = Arc::new(RecordingGateway::new());
        (gateway.clone(), OrderService::new(gateway))
    }

    #[tokio::test]
    async fn test_limit_passes_time_in_force() {
        let (gateway, service) = service();
        let mut out = Vec::new();
        limit(&service, &mut out, "ETHUSDT", "sell", "0.5", "4000", Some("ioc"))
            .await
            .unwrap();

        let submitted = gateway.requests();
        assert_eq!(submitted[0].order_type, OrderType::Limit);
        assert_eq!(submitted[0].time_in_force, Some(TimeInForce::Ioc));
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("ℹ Placing LIMIT SELL order for 0.5 ETHUSDT @ 4000..."));
    }

    #[tokio::test]
    async fn test_stop_limit_submitted() {
        let (gateway, service) = service();
        let mut out = Vec::new();
        stop_limit(&service, &mut out, "BTCUSDT", "SELL", "0.001", "94500", "95000", None)
            .await
            .unwrap();
        assert_eq!(gateway.submits(), vec![OrderType::StopLimit]);
        assert!(String::from_utf8(out).unwrap().contains("Stop-Limit order placed!"));
    }

    #[tokio::test]
    async fn test_take_profit_submitted() {
        let (gateway, service) = service();
        let mut out = Vec::new();
        take_profit(
            &service,
            &mut out,
            "btcusdt",
            "sell",
            "0.001",
            Some("110000"),
            "109500",
            None,
        )
        .await
        .unwrap();
        take_profit(&service, &mut out, "BTCUSDT", "SELL", "0.001", None, "110000", None)
            .await
            .unwrap();

        assert_eq!(
            gateway.submits(),
            vec![OrderType::TakeProfit, OrderType::TakeProfitMarket]
        );
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with(
            "ℹ Placing TAKE-PROFIT SELL order for 0.001 BTCUSDT (trigger 109500, limit 110000)..."
        ));
        assert!(out.contains("(trigger 110000, market)..."));
        assert!(out.contains("✓ Take-Profit order placed!"));
    }

    #[tokio::test]
    async fn test_rejected_take_profit_quantity_sends_nothing() {
        let (gateway, service) = service();
        let mut out = Vec::new();
        let error = take_profit(
            &service,
            &mut out,
            "BTCUSDT",
            "SELL",
            "0",
            Some("110000"),
            "110000",
            None,
        )
        .await
        .unwrap_err();
        assert!(error.to_string().contains("quantity must be positive"));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_all_confirms_symbol() {
        let (gateway, service) = service();
        let mut out = Vec::new();
        cancel_all(&service, &mut out, "btcusdt").await.unwrap();
        assert_eq!(
            gateway.calls(),
            vec![Call::CancelAll(
                tradebot_core::types::Symbol::new("BTCUSDT").unwrap()
            )]
        );
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "✓ All orders for BTCUSDT cancelled!\n"
        );
    }
}
