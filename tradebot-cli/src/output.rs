//! Terminal rendering for orders, positions and account data.
//!
//! Renderers return `String`s so they can be tested without a terminal;
//! the `write_*` helpers push them to any `io::Write`.

use std::fmt::Display;
use std::io::{self, Write};

use rust_decimal::Decimal;
use tradebot_core::data::{AccountSummary, OrderResult, Position};
use tradebot_core::error::OrphanedOrderError;
use tradebot_core::types::Price;
use tradebot_engine::oco::OcoPlacement;

/// Writes `✓ message`.
pub fn success(out: &mut impl Write, message: impl Display) -> io::Result<()> {
    writeln!(out, "✓ {message}")
}

/// Writes `✗ message`.
pub fn failure(out: &mut impl Write, message: impl Display) -> io::Result<()> {
    writeln!(out, "✗ {message}")
}

/// Writes `⚠ message`.
pub fn warning(out: &mut impl Write, message: impl Display) -> io::Result<()> {
    writeln!(out, "⚠ {message}")
}

/// Writes `ℹ message`.
pub fn info(out: &mut impl Write, message: impl Display) -> io::Result<()> {
    writeln!(out, "ℹ {message}")
}

/// Renders rows inside a rounded box. With `headers`, a rule separates
/// them from the body.
#[must_use]
pub fn render_table(headers: Option<&[&str]>, rows: &[Vec<String>]) -> String {
    let columns = headers
        .map(<[&str]>::len)
        .into_iter()
        .chain(rows.iter().map(Vec::len))
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    let mut widths = vec![0usize; columns];
    let header_cells = headers.map(|h| h.iter().map(|s| (*s).to_string()).collect::<Vec<_>>());
    for row in header_cells.iter().chain(rows.iter()) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let rule = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}\n", segments.join(mid))
    };
    let line = |row: &[String]| {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let cell = row.get(i).map_or("", String::as_str);
                let pad = w - cell.chars().count();
                format!(" {cell}{} ", " ".repeat(pad))
            })
            .collect();
        format!("│{}│\n", cells.join("│"))
    };

    let mut table = rule("╭", "┬", "╮");
    if let Some(header) = &header_cells {
        table.push_str(&line(header.as_slice()));
        table.push_str(&rule("├", "┼", "┤"));
    }
    for row in rows {
        table.push_str(&line(row.as_slice()));
    }
    table.push_str(&rule("╰", "┴", "╯"));
    table
}

fn or_na(price: Option<Price>) -> String {
    price.map_or_else(|| "N/A".to_string(), |p| p.to_string())
}

/// Key/value table for one order.
#[must_use]
pub fn order_table(order: &OrderResult) -> String {
    let rows = vec![
        vec!["Order ID".to_string(), order.order_id.to_string()],
        vec!["Symbol".to_string(), order.symbol.to_string()],
        vec!["Side".to_string(), order.side.to_string()],
        vec!["Type".to_string(), order.order_type.to_string()],
        vec!["Quantity".to_string(), order.quantity.to_string()],
        vec![
            "Price".to_string(),
            order
                .price
                .map_or_else(|| "Market".to_string(), |p| p.to_string()),
        ],
        vec!["Stop Price".to_string(), or_na(order.stop_price)],
        vec!["Status".to_string(), order.status.to_string()],
        vec![
            "Time in Force".to_string(),
            order
                .time_in_force
                .map_or_else(|| "N/A".to_string(), |t| t.to_string()),
        ],
    ];
    render_table(None, &rows)
}

/// Column table of open orders.
#[must_use]
pub fn orders_table(orders: &[OrderResult]) -> String {
    let rows: Vec<Vec<String>> = orders
        .iter()
        .map(|o| {
            vec![
                o.order_id.to_string(),
                o.symbol.to_string(),
                o.side.to_string(),
                o.order_type.to_string(),
                o.quantity.to_string(),
                or_na(o.price),
                or_na(o.stop_price),
                o.status.to_string(),
            ]
        })
        .collect();
    render_table(
        Some(&["ID", "Symbol", "Side", "Type", "Qty", "Price", "Stop", "Status"]),
        &rows,
    )
}

/// Column table of open positions.
#[must_use]
pub fn positions_table(positions: &[Position]) -> String {
    let rows: Vec<Vec<String>> = positions
        .iter()
        .map(|p| {
            vec![
                p.symbol.to_string(),
                p.side.to_string(),
                p.size.to_string(),
                p.entry_price.to_string(),
                p.mark_price.to_string(),
                format_usd(p.notional()),
                format!("{:.4}", p.unrealized_pnl),
                p.leverage.to_string(),
            ]
        })
        .collect();
    render_table(
        Some(&[
            "Symbol",
            "Side",
            "Size",
            "Entry Price",
            "Mark Price",
            "Notional",
            "PnL",
            "Leverage",
        ]),
        &rows,
    )
}

/// Balance summary table.
#[must_use]
pub fn account_table(account: &AccountSummary) -> String {
    let usdt = |value: Decimal| format!("{value:.4} USDT");
    let rows = vec![
        vec![
            "Total Balance".to_string(),
            usdt(account.total_wallet_balance),
        ],
        vec![
            "Available Balance".to_string(),
            usdt(account.available_balance),
        ],
        vec![
            "Unrealized PnL".to_string(),
            usdt(account.total_unrealized_pnl),
        ],
        vec![
            "Margin Balance".to_string(),
            usdt(account.total_margin_balance),
        ],
    ];
    render_table(None, &rows)
}

/// Formats a price as `$67,250.50`.
#[must_use]
pub fn format_usd(value: Decimal) -> String {
    let rounded = format!("{:.2}", value.abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac}")
}

/// Writes a single order with a title.
pub fn write_order(out: &mut impl Write, order: &OrderResult) -> io::Result<()> {
    writeln!(out, "\nOrder Details:")?;
    write!(out, "{}", order_table(order))
}

/// Writes positions, or a notice when there are none.
pub fn write_positions(out: &mut impl Write, positions: &[Position]) -> io::Result<()> {
    if positions.is_empty() {
        return info(out, "No active positions");
    }
    writeln!(out, "\nActive Positions:")?;
    write!(out, "{}", positions_table(positions))
}

/// Writes open orders, or a notice when there are none.
pub fn write_orders(out: &mut impl Write, orders: &[OrderResult]) -> io::Result<()> {
    if orders.is_empty() {
        return info(out, "No open orders");
    }
    writeln!(out, "\nOpen Orders:")?;
    write!(out, "{}", orders_table(orders))
}

/// Writes the account summary.
pub fn write_account(out: &mut impl Write, account: &AccountSummary) -> io::Result<()> {
    writeln!(out, "\nAccount Info:")?;
    write!(out, "{}", account_table(account))
}

/// Writes both legs of a placed OCO pair.
pub fn write_oco_placement(out: &mut impl Write, placement: &OcoPlacement) -> io::Result<()> {
    writeln!(out, "\nStop-Loss Leg:")?;
    write!(out, "{}", order_table(&placement.stop_loss))?;
    writeln!(out, "\nTake-Profit Leg:")?;
    write!(out, "{}", order_table(&placement.take_profit))
}

/// Writes the manual-intervention banner for a live, unmatched stop-loss.
pub fn write_orphaned(out: &mut impl Write, error: &OrphanedOrderError) -> io::Result<()> {
    let banner = "!".repeat(64);
    writeln!(out, "\n{banner}")?;
    warning(
        out,
        format!(
            "ORPHANED ORDER: stop-loss order {} on {} is still LIVE",
            error.order_id, error.symbol
        ),
    )?;
    writeln!(out, "  Take-profit failed:    {}", error.take_profit_error)?;
    writeln!(out, "  Rollback cancel failed: {}", error.cancel_error)?;
    writeln!(
        out,
        "  Cancel it manually:    cancel {} {}",
        error.symbol, error.order_id
    )?;
    writeln!(out, "{banner}")
}
