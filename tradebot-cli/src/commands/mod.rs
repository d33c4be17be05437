//! Commands shared by one-shot invocations and the interactive shell.

pub mod account;
pub mod orders;
pub mod shell;

use std::io::Write;

use anyhow::Result;
use clap::Subcommand;
use tracing::error;
use tradebot_core::error::TradeError;
use tradebot_engine::service::OrderService;

use crate::output;

/// A single operator command.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Action {
    /// Place a market order
    Market {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,
        /// BUY or SELL
        side: String,
        /// Order quantity
        quantity: String,
    },

    /// Place a limit order
    Limit {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,
        /// BUY or SELL
        side: String,
        /// Order quantity
        quantity: String,
        /// Limit price
        price: String,
        /// Time in force (GTC, IOC, FOK, GTX)
        #[arg(long = "tif")]
        time_in_force: Option<String>,
    },

    /// Place a stop-limit order
    Stop {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,
        /// BUY or SELL
        side: String,
        /// Order quantity
        quantity: String,
        /// Limit price (execution)
        price: String,
        /// Stop price (trigger)
        stop_price: String,
        /// Time in force (GTC, IOC, FOK, GTX)
        #[arg(long = "tif")]
        time_in_force: Option<String>,
    },

    /// Place a take-profit order
    Tp {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,
        /// BUY or SELL
        side: String,
        /// Order quantity
        quantity: String,
        /// Take-profit trigger price
        stop_price: String,
        /// Limit price once triggered; take-profit-market when omitted
        #[arg(long)]
        price: Option<String>,
        /// Time in force (GTC, IOC, FOK, GTX)
        #[arg(long = "tif")]
        time_in_force: Option<String>,
    },

    /// Place a take-profit and stop-loss pair (stop-loss first)
    Oco {
        /// Trading pair (e.g., BTCUSDT)
        symbol: String,
        /// Side of both legs, BUY or SELL
        side: String,
        /// Quantity of both legs
        quantity: String,
        /// Take-profit price
        take_profit: String,
        /// Stop-loss trigger price
        stop_loss: String,
        /// Stop-loss limit price; stop-market when omitted
        #[arg(long = "sl-limit")]
        stop_loss_limit: Option<String>,
    },

    /// Show open positions
    Positions {
        /// Filter by symbol
        symbol: Option<String>,
    },

    /// Show open orders
    Orders {
        /// Filter by symbol
        symbol: Option<String>,
    },

    /// Query one order
    Status {
        /// Trading pair
        symbol: String,
        /// Exchange order ID
        order_id: String,
    },

    /// Cancel an order
    Cancel {
        /// Trading pair
        symbol: String,
        /// Exchange order ID
        order_id: String,
    },

    /// Cancel all open orders for a symbol
    CancelAll {
        /// Trading pair
        symbol: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show account balances
    Account,

    /// Show the latest price for a symbol
    Price {
        /// Trading pair
        symbol: String,
    },

    /// Set leverage for a symbol
    Leverage {
        /// Trading pair
        symbol: String,
        /// Leverage (1-125)
        leverage: String,
    },
}

/// Runs one command against the service and renders its result.
///
/// `CancelAll` must already be confirmed; an unconfirmed one is a no-op.
pub async fn execute(service: &OrderService, action: Action, out: &mut impl Write) -> Result<()> {
    match action {
        Action::Market {
            symbol,
            side,
            quantity,
        } => orders::market(service, out, &symbol, &side, &quantity).await,
        Action::Limit {
            symbol,
            side,
            quantity,
            price,
            time_in_force,
        } => {
            orders::limit(
                service,
                out,
                &symbol,
                &side,
                &quantity,
                &price,
                time_in_force.as_deref(),
            )
            .await
        }
        Action::Stop {
            symbol,
            side,
            quantity,
            price,
            stop_price,
            time_in_force,
        } => {
            orders::stop_limit(
                service,
                out,
                &symbol,
                &side,
                &quantity,
                &price,
                &stop_price,
                time_in_force.as_deref(),
            )
            .await
        }
        Action::Tp {
            symbol,
            side,
            quantity,
            stop_price,
            price,
            time_in_force,
        } => {
            orders::take_profit(
                service,
                out,
                &symbol,
                &side,
                &quantity,
                price.as_deref(),
                &stop_price,
                time_in_force.as_deref(),
            )
            .await
        }
        Action::Oco {
            symbol,
            side,
            quantity,
            take_profit,
            stop_loss,
            stop_loss_limit,
        } => {
            orders::oco(
                service,
                out,
                &symbol,
                &side,
                &quantity,
                &take_profit,
                &stop_loss,
                stop_loss_limit.as_deref(),
            )
            .await
        }
        Action::Status { symbol, order_id } => {
            orders::status(service, out, &symbol, &order_id).await
        }
        Action::Cancel { symbol, order_id } => {
            orders::cancel(service, out, &symbol, &order_id).await
        }
        Action::CancelAll { symbol, yes } => {
            if yes {
                orders::cancel_all(service, out, &symbol).await
            } else {
                output::info(out, "Cancelled")?;
                Ok(())
            }
        }
        Action::Positions { symbol } => {
            account::positions(service, out, symbol.as_deref()).await
        }
        Action::Orders { symbol } => account::open_orders(service, out, symbol.as_deref()).await,
        Action::Account => account::summary(service, out).await,
        Action::Price { symbol } => account::price(service, out, &symbol).await,
        Action::Leverage { symbol, leverage } => {
            account::leverage(service, out, &symbol, &leverage).await
        }
    }
}

/// Logs and prints a failed command. Orphaned OCO legs get the
/// manual-cancel banner.
pub fn report_error(out: &mut impl Write, error: &anyhow::Error) -> std::io::Result<()> {
    match error.downcast_ref::<TradeError>() {
        Some(trade) => error!(
            category = trade.category(),
            severity = %trade.severity(),
            error = %trade,
            "Command failed"
        ),
        None => error!(error = %format!("{error:#}"), "Command failed"),
    }
    match error.downcast_ref::<TradeError>() {
        Some(TradeError::Orphaned(orphaned)) => output::write_orphaned(out, orphaned),
        Some(trade) => output::failure(out, trade),
        None => output::failure(out, format!("Error: {error:#}")),
    }
}

/// Process exit code for a failed command.
#[must_use]
pub fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<TradeError>() {
        Some(trade) if trade.is_orphaned() => 2,
        _ => 1,
    }
}
