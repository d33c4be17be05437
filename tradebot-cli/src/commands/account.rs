//! Account, position and market queries.

use std::io::Write;

use anyhow::Result;
use tradebot_engine::service::OrderService;

use crate::output;

/// Shows open positions.
pub async fn positions(
    service: &OrderService,
    out: &mut impl Write,
    symbol: Option<&str>,
) -> Result<()> {
    let positions = service.positions(symbol).await?;
    output::write_positions(out, &positions)?;
    Ok(())
}

/// Shows open orders.
pub async fn open_orders(
    service: &OrderService,
    out: &mut impl Write,
    symbol: Option<&str>,
) -> Result<()> {
    let orders = service.open_orders(symbol).await?;
    output::write_orders(out, &orders)?;
    Ok(())
}

/// Shows wallet, available and margin balances.
pub async fn summary(service: &OrderService, out: &mut impl Write) -> Result<()> {
    let account = service.account().await?;
    output::write_account(out, &account)?;
    Ok(())
}

/// Shows the latest traded price.
pub async fn price(service: &OrderService, out: &mut impl Write, symbol: &str) -> Result<()> {
    let price = service.price(symbol).await?;
    output::info(
        out,
        format!(
            "{} current price: {}",
            symbol.trim().to_uppercase(),
            output::format_usd(price.as_decimal())
        ),
    )?;
    Ok(())
}

/// Sets leverage and reports what the exchange applied.
pub async fn leverage(
    service: &OrderService,
    out: &mut impl Write,
    symbol: &str,
    leverage: &str,
) -> Result<()> {
    let applied = service.set_leverage(symbol, leverage).await?;
    output::success(
        out,
        format!(
            "Leverage set to {applied} for {}",
            symbol.trim().to_uppercase()
        ),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tradebot_engine::testing::RecordingGateway;

    async fn capture<F, Fut>(f: F) -> String
    where
        F: FnOnce(OrderService, Vec<u8>) -> Fut,
        Fut: std::future::Future<Output = (Result<()>, Vec<u8>)>,
    {
        let service = OrderService::new(Arc::new(RecordingGateway::new()));
        let (result, out) = f(service, Vec::new()).await;
        result.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_positions_and_empty_orders() {
        let out = capture(|service, mut out| async move {
            let result = positions(&service, &mut out, None).await;
            (result, out)
        })
        .await;
        assert!(out.contains("BTCUSDT"));
        assert!(out.contains("$960.00"));

        let out = capture(|service, mut out| async move {
            let result = open_orders(&service, &mut out, Some("BTCUSDT")).await;
            (result, out)
        })
        .await;
        assert_eq!(out, "ℹ No open orders\n");
    }

    #[tokio::test]
    async fn test_account_summary() {
        let out = capture(|service, mut out| async move {
            let result = summary(&service, &mut out).await;
            (result, out)
        })
        .await;
        assert!(out.contains("Account Info:"));
        assert!(out.contains("900.0000 USDT"));
    }

    #[tokio::test]
    async fn test_leverage_reports_applied_value() {
        let out = capture(|service, mut out| async move {
            let result = leverage(&service, &mut out, "ethusdt", "20").await;
            (result, out)
        })
        .await;
        assert_eq!(out, "✓ Leverage set to 20x for ETHUSDT\n");
    }

    #[tokio::test]
    async fn test_out_of_range_leverage_rejected() {
        let gateway = Arc::new(RecordingGateway::new());
        let service = OrderService::new(gateway.clone());
        let mut out = Vec::new();
        let error = leverage(&service, &mut out, "BTCUSDT", "126")
            .await
            .unwrap_err();
        assert!(error.to_string().contains("between 1 and 125"));
        assert!(gateway.calls().is_empty());
    }
}
