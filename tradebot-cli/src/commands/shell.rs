//! Interactive `bot > ` shell.
//!
//! Each command prompts for its fields, runs through the same
//! [`execute`] path as one-shot subcommands, and reports failures
//! without ending the session. Ctrl-C at the command prompt ends the
//! session; at a field prompt it abandons the command being entered.

use std::io::Write;

use anyhow::{Result, anyhow};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;
use tradebot_core::config::TradingConfig;
use tradebot_engine::service::OrderService;

use super::{Action, execute, report_error};
use crate::output;

const PROMPT: &str = "bot > ";

const COMMANDS: [(&str, &str); 15] = [
    ("help", "Show available commands"),
    ("market", "Place a market order"),
    ("limit", "Place a limit order"),
    ("stop", "Place a stop-limit order"),
    ("tp", "Place a take-profit order"),
    ("oco", "Place an OCO order (take-profit + stop-loss)"),
    ("positions", "Show current positions"),
    ("orders", "Show open orders"),
    ("status", "Show one order"),
    ("cancel", "Cancel an order"),
    ("cancelall", "Cancel all orders for a symbol"),
    ("account", "Show account info"),
    ("price", "Get current price for a symbol"),
    ("leverage", "Set leverage for a symbol"),
    ("quit", "Exit the bot (also: exit, q)"),
];

/// Ctrl-C while a command's fields were being entered.
#[derive(Debug, Error)]
#[error("Interrupted")]
struct Interrupted;

/// Forwards Ctrl-C presses for the lifetime of the process.
///
/// Presses made while one is still unread are dropped.
#[must_use]
pub fn ctrl_c_interrupts() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(1);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if let Err(TrySendError::Closed(())) = tx.try_send(()) {
                break;
            }
        }
    });
    rx
}

/// Line-oriented operator shell over an [`OrderService`].
pub struct Shell<R, W> {
    service: OrderService,
    defaults: TradingConfig,
    testnet: bool,
    input: R,
    out: W,
    interrupts: mpsc::Receiver<()>,
}

impl<R, W> Shell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    /// Creates a shell reading commands from `input` and writing to `out`.
    /// Each message on `interrupts` counts as one Ctrl-C.
    pub fn new(
        service: OrderService,
        defaults: TradingConfig,
        testnet: bool,
        input: R,
        out: W,
        interrupts: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            service,
            defaults,
            testnet,
            input,
            out,
            interrupts,
        }
    }

    /// Runs until `quit`, end of input, or Ctrl-C.
    pub async fn run(mut self) -> Result<()> {
        self.banner()?;

        loop {
            let Some(line) = self.read_command().await? else {
                break;
            };
            let command = line.trim().to_ascii_lowercase();
            debug!(command = %command, "Shell command");

            match command.as_str() {
                "" => {}
                "quit" | "exit" | "q" => break,
                "help" => self.help()?,
                name => match self.prompt_action(name).await {
                    Ok(Some(action)) => {
                        if let Err(error) = execute(&self.service, action, &mut self.out).await {
                            report_error(&mut self.out, &error)?;
                        }
                    }
                    Ok(None) => output::failure(
                        &mut self.out,
                        format!("Unknown command: {name}. Type 'help' for available commands."),
                    )?,
                    Err(error) if error.is::<Interrupted>() => {
                        writeln!(self.out)?;
                        output::info(&mut self.out, "Cancelled")?;
                    }
                    Err(error) => report_error(&mut self.out, &error)?,
                },
            }
        }

        writeln!(self.out)?;
        output::info(&mut self.out, "Goodbye!")?;
        Ok(())
    }

    fn banner(&mut self) -> Result<()> {
        let network = if self.testnet { "TESTNET" } else { "MAINNET" };
        let rule = "═".repeat(56);
        writeln!(self.out, "╔{rule}╗")?;
        writeln!(self.out, "║{:^56}║", format!("Binance Futures Trading Bot - {network}"))?;
        writeln!(self.out, "╚{rule}╝")?;
        if !self.testnet {
            output::warning(&mut self.out, "Connected to MAINNET: orders use real funds")?;
        }
        output::info(
            &mut self.out,
            "Interactive mode activated. Type 'help' for commands.",
        )?;
        Ok(())
    }

    fn help(&mut self) -> Result<()> {
        writeln!(self.out, "\nAvailable Commands:")?;
        for (name, description) in COMMANDS {
            writeln!(self.out, "  {name:12} - {description}")?;
        }
        Ok(())
    }

    async fn read_command(&mut self) -> Result<Option<String>> {
        write!(self.out, "\n{PROMPT}")?;
        self.out.flush()?;
        tokio::select! {
            biased;
            Some(()) = self.interrupts.recv() => Ok(None),
            line = read_line(&mut self.input) => line,
        }
    }

    async fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let line = tokio::select! {
            biased;
            Some(()) = self.interrupts.recv() => return Err(Interrupted.into()),
            line = read_line(&mut self.input) => line?,
        };
        line.map(|line| line.trim().to_string())
            .ok_or_else(|| anyhow!("Input closed"))
    }

    async fn ask_or(&mut self, prompt: &str, default: &str) -> Result<String> {
        let answer = self.ask(&format!("{prompt} [{default}]: ")).await?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    async fn ask_optional(&mut self, prompt: &str) -> Result<Option<String>> {
        let answer = self.ask(prompt).await?;
        Ok(Some(answer).filter(|a| !a.is_empty()))
    }

    async fn ask_symbol(&mut self) -> Result<String> {
        let default = self.defaults.default_symbol.clone();
        self.ask_or("Symbol (e.g., BTCUSDT)", &default).await
    }

    async fn ask_time_in_force(&mut self) -> Result<Option<String>> {
        let default = self.defaults.default_time_in_force.to_string();
        self.ask_or("Time in force (GTC/IOC/FOK/GTX)", &default)
            .await
            .map(Some)
    }

    /// Collects the fields of `command`, or `None` if it is not a command.
    async fn prompt_action(&mut self, command: &str) -> Result<Option<Action>> {
        let action = match command {
            "market" => Action::Market {
                symbol: self.ask_symbol().await?,
                side: self.ask("Side (BUY/SELL): ").await?,
                quantity: self.ask("Quantity: ").await?,
            },
            "limit" => Action::Limit {
                symbol: self.ask_symbol().await?,
                side: self.ask("Side (BUY/SELL): ").await?,
                quantity: self.ask("Quantity: ").await?,
                price: self.ask("Price: ").await?,
                time_in_force: self.ask_time_in_force().await?,
            },
            "stop" => {
                let symbol = self.ask_symbol().await?;
                let side = self.ask("Side (BUY/SELL): ").await?;
                let quantity = self.ask("Quantity: ").await?;
                let stop_price = self.ask("Stop Price (trigger): ").await?;
                let price = self.ask("Limit Price (execution): ").await?;
                Action::Stop {
                    symbol,
                    side,
                    quantity,
                    price,
                    stop_price,
                    time_in_force: self.ask_time_in_force().await?,
                }
            }
            "tp" => {
                let symbol = self.ask_symbol().await?;
                let side = self.ask("Side (BUY/SELL): ").await?;
                let quantity = self.ask("Quantity: ").await?;
                let stop_price = self.ask("Take-Profit Trigger Price: ").await?;
                let price = self
                    .ask_optional("Limit Price (empty for take-profit-market): ")
                    .await?;
                let time_in_force = match price {
                    Some(_) => self.ask_time_in_force().await?,
                    None => None,
                };
                Action::Tp {
                    symbol,
                    side,
                    quantity,
                    stop_price,
                    price,
                    time_in_force,
                }
            }
            "oco" => Action::Oco {
                symbol: self.ask_symbol().await?,
                side: self.ask("Side (BUY/SELL): ").await?,
                quantity: self.ask("Quantity: ").await?,
                take_profit: self.ask("Take-Profit Price: ").await?,
                stop_loss: self.ask("Stop-Loss Trigger Price: ").await?,
                stop_loss_limit: self
                    .ask_optional("Stop-Loss Limit Price (empty for stop-market): ")
                    .await?,
            },
            "positions" => Action::Positions {
                symbol: self.ask_optional("Symbol (leave empty for all): ").await?,
            },
            "orders" => Action::Orders {
                symbol: self.ask_optional("Symbol (leave empty for all): ").await?,
            },
            "status" => Action::Status {
                symbol: self.ask_symbol().await?,
                order_id: self.ask("Order ID: ").await?,
            },
            "cancel" => Action::Cancel {
                symbol: self.ask_symbol().await?,
                order_id: self.ask("Order ID: ").await?,
            },
            "cancelall" => {
                let symbol = self.ask_symbol().await?;
                let answer = self
                    .ask(&format!(
                        "Cancel ALL orders for {}? (yes/no): ",
                        symbol.to_uppercase()
                    ))
                    .await?;
                Action::CancelAll {
                    symbol,
                    yes: answer.eq_ignore_ascii_case("yes"),
                }
            }
            "account" => Action::Account,
            "price" => Action::Price {
                symbol: self.ask_symbol().await?,
            },
            "leverage" => {
                let symbol = self.ask_symbol().await?;
                let default = self.defaults.default_leverage.to_string();
                Action::Leverage {
                    symbol,
                    leverage: self.ask_or("Leverage (1-125)", &default).await?,
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(action))
    }
}

async fn read_line<R: AsyncBufRead + Unpin>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::io::{AsyncWriteExt, BufReader};
    use tradebot_core::data::{OrderType, TimeInForce};
    use tradebot_engine::testing::{Call, RecordingGateway};

    fn no_interrupts() -> mpsc::Receiver<()> {
        mpsc::channel(1).1
    }

    async fn session(gateway: RecordingGateway, script: &str) -> (String, Arc<RecordingGateway>) {
        let gateway = Arc::new(gateway);
        let mut out = Vec::new();
        Shell::new(
            OrderService::new(gateway.clone()),
            TradingConfig::default(),
            true,
            script.as_bytes(),
            &mut out,
            no_interrupts(),
        )
        .run()
        .await
        .unwrap();
        (String::from_utf8(out).unwrap(), gateway)
    }

    #[tokio::test]
    async fn test_help_and_quit() {
        let (out, _) = session(RecordingGateway::new(), "help\nquit\n").await;
        assert!(out.contains("TESTNET"));
        assert!(out.contains("Available Commands:"));
        assert!(out.contains("cancelall"));
        assert!(out.contains("tp           - Place a take-profit order"));
        assert!(out.ends_with("ℹ Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_market_uses_default_symbol() {
        let (out, gateway) =
            session(RecordingGateway::new(), "market\n\nbuy\n0.001\nexit\n").await;
        let submitted = gateway.requests();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].symbol.as_str(), "BTCUSDT");
        assert_eq!(submitted[0].order_type, OrderType::Market);
        assert!(out.contains("Symbol (e.g., BTCUSDT) [BTCUSDT]: "));
        assert!(out.contains("✓ Market order placed!"));
    }

    #[tokio::test]
    async fn test_limit_defaults_time_in_force() {
        let (_, gateway) = session(
            RecordingGateway::new(),
            "limit\nETHUSDT\nSELL\n0.5\n4000\n\nq\n",
        )
        .await;
        assert_eq!(gateway.requests()[0].time_in_force, Some(TimeInForce::Gtc));
    }

    #[tokio::test]
    async fn test_take_profit_prompts() {
        let script = concat!(
            "tp\nBTCUSDT\nSELL\n0.001\n109500\n110000\nIOC\n",
            "tp\n\nSELL\n0.001\n110000\n\n",
            "quit\n"
        );
        let (out, gateway) = session(RecordingGateway::new(), script).await;
        let submitted = gateway.requests();
        assert_eq!(submitted[0].order_type, OrderType::TakeProfit);
        assert_eq!(submitted[0].time_in_force, Some(TimeInForce::Ioc));
        assert_eq!(submitted[1].order_type, OrderType::TakeProfitMarket);
        assert!(out.contains("Limit Price (empty for take-profit-market): "));
        assert_eq!(out.matches("✓ Take-Profit order placed!").count(), 2);
    }

    #[tokio::test]
    async fn test_failed_command_keeps_session_alive() {
        let script = "market\nBTCUSDT\nHOLD\n1\nprice\nBTCUSDT\nquit\n";
        let (out, _) = session(RecordingGateway::new(), script).await;
        assert!(out.contains("✗ [Validation] Invalid side"));
        assert!(out.contains("BTCUSDT current price: $96,000.00"));
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let (out, _) = session(RecordingGateway::new(), "moon\nquit\n").await;
        assert!(out.contains("✗ Unknown command: moon."));
    }

    #[tokio::test]
    async fn test_cancelall_requires_yes() {
        let (out, gateway) = session(
            RecordingGateway::new(),
            "cancelall\nBTCUSDT\nno\ncancelall\nBTCUSDT\nyes\nquit\n",
        )
        .await;
        let cancel_alls = gateway
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::CancelAll(_)))
            .count();
        assert_eq!(cancel_alls, 1);
        assert!(out.contains("Cancel ALL orders for BTCUSDT? (yes/no): "));
        assert!(out.contains("ℹ Cancelled"));
        assert!(out.contains("✓ All orders for BTCUSDT cancelled!"));
    }

    #[tokio::test]
    async fn test_orphaned_oco_warns() {
        let gateway = RecordingGateway::new()
            .reject(OrderType::TakeProfit)
            .failing_cancel();
        let script = "oco\nBTCUSDT\nSELL\n0.001\n110000\n95000\n94500\nquit\n";
        let (out, gateway) = session(gateway, script).await;
        assert_eq!(
            gateway.submits(),
            vec![OrderType::StopLimit, OrderType::TakeProfit]
        );
        assert!(out.contains("ORPHANED ORDER"));
        assert!(out.ends_with("ℹ Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_end_of_input_exits() {
        let (out, _) = session(RecordingGateway::new(), "market\nBTCUSDT\n").await;
        assert!(out.contains("✗ Error: Input closed"));
        assert!(out.ends_with("ℹ Goodbye!\n"));
    }

    #[tokio::test]
    async fn test_interrupt_at_command_prompt_ends_session() {
        let gateway = Arc::new(RecordingGateway::new());
        let (interrupt, interrupts) = mpsc::channel(1);
        interrupt.try_send(()).unwrap();
        let mut out = Vec::new();
        Shell::new(
            OrderService::new(gateway.clone()),
            TradingConfig::default(),
            true,
            "market\nBTCUSDT\nBUY\n0.001\n".as_bytes(),
            &mut out,
            interrupts,
        )
        .run()
        .await
        .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("Symbol"));
        assert!(out.ends_with("ℹ Goodbye!\n"));
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn test_interrupt_at_field_prompt_abandons_command() {
        let gateway = Arc::new(RecordingGateway::new());
        let (interrupt, interrupts) = mpsc::channel(1);
        let (mut writer, reader) = tokio::io::duplex(256);
        writer.write_all(b"market\n").await.unwrap();

        let mut out = Vec::new();
        let shell = Shell::new(
            OrderService::new(gateway.clone()),
            TradingConfig::default(),
            true,
            BufReader::new(reader),
            &mut out,
            interrupts,
        );
        // Runs once the shell is parked on the symbol prompt.
        let operator = async move {
            interrupt.send(()).await.unwrap();
            writer.write_all(b"price\nBTCUSDT\nquit\n").await.unwrap();
            writer
        };
        let (result, _writer) = tokio::join!(shell.run(), operator);
        result.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Symbol (e.g., BTCUSDT) [BTCUSDT]: \nℹ Cancelled"));
        assert!(out.contains("BTCUSDT current price: $96,000.00"));
        assert!(out.ends_with("ℹ Goodbye!\n"));
        assert_eq!(
            gateway.calls(),
            vec![Call::Price(tradebot_core::types::Symbol::new("BTCUSDT").unwrap())]
        );
    }
}
