//! Configuration management.
//!
//! - YAML, TOML and JSON configuration files
//! - Validation with descriptive error messages
//! - Environment variable overrides for credentials and defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use tradebot_core::config::BotConfig;
//!
//! let config = BotConfig::load(Some(Path::new("tradebot.yaml")))?;
//! let credentials = config.credentials()?;
//! ```

mod bot_config;
mod loader;
mod traits;
pub mod validation;

pub use bot_config::{
    BotConfig, ExchangeConfig, LoggingConfig, TradingConfig, API_KEY_VAR, API_SECRET_VAR,
    ENV_PREFIX,
};
pub use loader::{ConfigFormat, ConfigLoader};
pub use traits::Validatable;
pub use validation::{EnvOverride, ValidationContext, ValidationResult, Validator};
