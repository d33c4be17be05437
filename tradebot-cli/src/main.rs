//! # Tradebot CLI
//!
//! Command-line interface for placing and managing Binance USDⓈ-M futures
//! orders.
//!
//! Every command is available as a one-shot subcommand; without one, the
//! interactive `bot > ` shell starts.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod commands;
mod output;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{info, warn};

use tradebot_core::config::{BotConfig, LoggingConfig};
use tradebot_core::error::ConfigError;
use tradebot_engine::service::OrderService;
use tradebot_gateway::binance::BinanceFuturesGateway;
use tradebot_telemetry::logging::{FileOutput, LogConfig, LogFormat, init_logging};

use commands::Action;
use commands::shell::{self, Shell};

const TESTNET_SIGNUP_URL: &str = "https://testnet.binancefuture.com/";

/// Tradebot - Binance futures order tool (testnet by default)
#[derive(Parser)]
#[command(name = "tradebot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Binance API key
    #[arg(long, global = true, env = "BINANCE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Binance API secret
    #[arg(long, global = true, env = "BINANCE_API_SECRET", hide_env_values = true)]
    api_secret: Option<String>,

    /// Configuration file path (.yaml, .toml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Trade on mainnet instead of the testnet
    #[arg(long, global = true)]
    mainnet: bool,

    /// Enable verbose (DEBUG) console logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute; the interactive shell when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Order and account commands
    #[command(flatten)]
    Action(Action),

    /// Start the interactive shell
    Shell,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    let log_handle = init_logging(&log_config(&config.logging, cli.verbose)?)
        .context("Failed to initialize logging")?;
    if let Some(path) = log_handle.file_path() {
        info!(path = %path.display(), "Logging to file");
    }

    let credentials = match config.credentials() {
        Ok(credentials) => credentials,
        Err(e @ ConfigError::MissingCredentials { .. }) => {
            let mut err = io::stderr().lock();
            output::failure(&mut err, "Missing API credentials!")?;
            output::info(&mut err, &e)?;
            output::info(&mut err, "Or use --api-key and --api-secret arguments")?;
            output::info(
                &mut err,
                format!("Get your testnet credentials from: {TESTNET_SIGNUP_URL}"),
            )?;
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let mut rest = BinanceFuturesGateway::rest_config(&credentials)
        .recv_window_ms(config.exchange.recv_window_ms)
        .timeout_ms(config.exchange.timeout_ms)
        .max_retries(config.exchange.max_retries);
    if let Some(url) = &config.exchange.base_url {
        rest = rest.base_url(url);
    }
    let gateway = BinanceFuturesGateway::with_config(rest.build(), credentials.testnet)
        .context("Failed to initialize gateway")?;
    if gateway.is_testnet() {
        info!("Connected to Binance futures testnet");
    } else {
        warn!("Connected to Binance futures MAINNET");
    }
    let service = OrderService::new(Arc::new(gateway));

    let code = match cli.command {
        None | Some(Commands::Shell) => {
            Shell::new(
                service,
                config.trading.clone(),
                credentials.testnet,
                BufReader::new(tokio::io::stdin()),
                io::stdout(),
                shell::ctrl_c_interrupts(),
            )
            .run()
            .await?;
            ExitCode::SUCCESS
        }
        Some(Commands::Action(action)) => run_once(&service, action).await?,
    };

    drop(log_handle);
    Ok(code)
}

fn load_config(cli: &Cli) -> Result<BotConfig> {
    let mut config = BotConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(key) = &cli.api_key {
        config.exchange.api_key.clone_from(key);
    }
    if let Some(secret) = &cli.api_secret {
        config.exchange.api_secret.clone_from(secret);
    }
    if cli.mainnet {
        config.exchange.testnet = false;
    }
    Ok(config)
}

fn log_config(logging: &LoggingConfig, verbose: bool) -> Result<LogConfig> {
    let format: LogFormat = logging.format.parse().map_err(|e: String| anyhow!(e))?;
    Ok(LogConfig {
        level: if verbose {
            "debug".to_string()
        } else {
            logging.level.clone()
        },
        format,
        file: logging
            .file_enabled
            .then(|| FileOutput::in_dir(&logging.log_dir)),
        ..LogConfig::default()
    })
}

async fn run_once(service: &OrderService, action: Action) -> Result<ExitCode> {
    let action = match action {
        Action::CancelAll { symbol, yes: false } => {
            let yes = confirm(&format!(
                "Cancel ALL orders for {}? (yes/no): ",
                symbol.trim().to_uppercase()
            ))?;
            Action::CancelAll { symbol, yes }
        }
        other => other,
    };

    let mut out = io::stdout().lock();
    match commands::execute(service, action, &mut out).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            commands::report_error(&mut out, &e)?;
            Ok(ExitCode::from(commands::exit_code(&e)))
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    let mut out = io::stdout().lock();
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
