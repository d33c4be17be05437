//! Tradebot configuration structures.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::loader::ConfigLoader;
use super::traits::Validatable;
use super::validation::{EnvOverride, ValidationContext, ValidationResult, Validator};
use crate::data::TimeInForce;
use crate::error::ConfigError;
use crate::traits::Credentials;
use crate::types::Leverage;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "BINANCE_API_KEY";

/// Environment variable holding the API secret.
pub const API_SECRET_VAR: &str = "BINANCE_API_SECRET";

/// Prefix for every other override, e.g. `TRADEBOT_TESTNET`.
pub const ENV_PREFIX: &str = "TRADEBOT";

/// Top-level configuration.
///
/// Every section has defaults, so an empty file (or no file at all) is a
/// valid testnet configuration once credentials come from the environment.
///
/// # Example YAML
///
/// ```yaml
/// exchange:
///   testnet: true
///   recv_window_ms: 5000
/// trading:
///   default_symbol: BTCUSDT
///   default_leverage: 1
/// logging:
///   level: info
///   log_dir: logs
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BotConfig {
    /// Exchange connection settings.
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Trading defaults.
    #[serde(default)]
    pub trading: TradingConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BotConfig {
    /// Loads the configuration file (if any), applies process environment
    /// overrides and validates the result.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or parsed, an
    /// override does not parse, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config: Self = match path {
            Some(path) => ConfigLoader::new().load_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(&EnvOverride::from_process())?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `BINANCE_API_*` and `TRADEBOT_*` overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for an override that does not parse.
    pub fn apply_env_overrides<F>(&mut self, env: &EnvOverride<F>) -> ValidationResult
    where
        F: Fn(&str) -> Option<String>,
    {
        self.exchange.apply_env_overrides(env, ENV_PREFIX)?;
        self.trading
            .apply_env_overrides(env, &format!("{ENV_PREFIX}_DEFAULT"))?;
        self.logging
            .apply_env_overrides(env, &format!("{ENV_PREFIX}_LOG"));
        Ok(())
    }

    /// Returns the API credentials.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredentials` if the key or secret is empty.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let credentials = Credentials::new(&self.exchange.api_key, &self.exchange.api_secret)
            .with_testnet(self.exchange.testnet);
        if credentials.is_complete() {
            Ok(credentials)
        } else {
            Err(ConfigError::MissingCredentials {
                key_var: API_KEY_VAR.to_string(),
                secret_var: API_SECRET_VAR.to_string(),
            })
        }
    }
}

impl Validatable for BotConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let mut ctx = ValidationContext::new();

        ctx.enter("exchange");
        self.exchange.validate_with_context(&mut ctx);
        ctx.exit();

        ctx.enter("trading");
        self.trading.validate_with_context(&mut ctx);
        ctx.exit();

        ctx.enter("logging");
        self.logging.validate_with_context(&mut ctx);
        ctx.exit();

        ctx.into_result()
    }
}

/// Exchange connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// API key. Usually supplied through `BINANCE_API_KEY`.
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// API secret. Never serialized.
    #[serde(default, skip_serializing)]
    pub api_secret: String,

    /// Use the futures testnet.
    #[serde(default = "default_testnet")]
    pub testnet: bool,

    /// Override for the REST base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// `recvWindow` sent with signed requests, in milliseconds.
    #[serde(default = "default_recv_window_ms")]
    pub recv_window_ms: u64,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retry limit for idempotent requests.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_testnet() -> bool {
    true
}

fn default_recv_window_ms() -> u64 {
    5000
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    3
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            testnet: default_testnet(),
            base_url: None,
            recv_window_ms: default_recv_window_ms(),
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl ExchangeConfig {
    fn validate_with_context(&self, ctx: &mut ValidationContext) {
        let mut v = Validator::new(ctx);
        v.in_range("recv_window_ms", &self.recv_window_ms, &1, &60_000)
            .positive("timeout_ms", &self.timeout_ms)
            .in_range("max_retries", &self.max_retries, &0, &10);
        if let Some(url) = &self.base_url {
            v.valid_url("base_url", url);
        }
    }

    fn apply_env_overrides<F>(&mut self, env: &EnvOverride<F>, prefix: &str) -> ValidationResult
    where
        F: Fn(&str) -> Option<String>,
    {
        env.apply_string(API_KEY_VAR, &mut self.api_key);
        env.apply_string(API_SECRET_VAR, &mut self.api_secret);
        env.apply_bool(&format!("{prefix}_TESTNET"), &mut self.testnet)?;
        env.apply_optional_string(&format!("{prefix}_BASE_URL"), &mut self.base_url);
        env.apply_number(&format!("{prefix}_RECV_WINDOW_MS"), &mut self.recv_window_ms)?;
        env.apply_number(&format!("{prefix}_TIMEOUT_MS"), &mut self.timeout_ms)
    }
}

/// Defaults used by the shell and CLI when the operator omits a value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Symbol used when none is given.
    #[serde(default = "default_symbol")]
    pub default_symbol: String,

    /// Leverage shown as the default in prompts.
    #[serde(default = "default_leverage")]
    pub default_leverage: u8,

    /// Time in force for limit and stop-limit orders.
    #[serde(default)]
    pub default_time_in_force: TimeInForce,
}

fn default_symbol() -> String {
    "BTCUSDT".to_string()
}

fn default_leverage() -> u8 {
    1
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            default_symbol: default_symbol(),
            default_leverage: default_leverage(),
            default_time_in_force: TimeInForce::default(),
        }
    }
}

impl TradingConfig {
    fn validate_with_context(&self, ctx: &mut ValidationContext) {
        Validator::new(ctx)
            .require_non_empty("default_symbol", &self.default_symbol)
            .in_range(
                "default_leverage",
                &self.default_leverage,
                &1,
                &Leverage::MAX_LEVERAGE,
            );
    }

    fn apply_env_overrides<F>(&mut self, env: &EnvOverride<F>, prefix: &str) -> ValidationResult
    where
        F: Fn(&str) -> Option<String>,
    {
        env.apply_string(&format!("{prefix}_SYMBOL"), &mut self.default_symbol);
        env.apply_number(&format!("{prefix}_LEVERAGE"), &mut self.default_leverage)
    }
}

/// Logging settings, mapped onto the telemetry crate's `LogConfig` by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Console level filter, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Console format: `pretty`, `compact` or `json`.
    #[serde(default = "default_format")]
    pub format: String,

    /// Write a DEBUG-level log file per session.
    #[serde(default = "default_file_enabled")]
    pub file_enabled: bool,

    /// Directory for session log files.
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

fn default_file_enabled() -> bool {
    true
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            file_enabled: default_file_enabled(),
            log_dir: default_log_dir(),
        }
    }
}

impl LoggingConfig {
    fn validate_with_context(&self, ctx: &mut ValidationContext) {
        Validator::new(ctx)
            .one_of(
                "level",
                &self.level,
                &["trace", "debug", "info", "warn", "error"],
            )
            .one_of("format", &self.format, &["pretty", "compact", "json"])
            .require_non_empty("log_dir", &self.log_dir);
    }

    fn apply_env_overrides<F>(&mut self, env: &EnvOverride<F>, prefix: &str)
    where
        F: Fn(&str) -> Option<String>,
    {
        env.apply_string(&format!("{prefix}_LEVEL"), &mut self.level);
        env.apply_string(&format!("{prefix}_DIR"), &mut self.log_dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> EnvOverride<impl Fn(&str) -> Option<String>> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvOverride::new(move |name: &str| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();
        assert!(config.exchange.testnet);
        assert_eq!(config.exchange.recv_window_ms, 5000);
        assert_eq!(config.trading.default_symbol, "BTCUSDT");
        assert_eq!(config.trading.default_leverage, 1);
        assert_eq!(config.logging.log_dir, "logs");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config: BotConfig = ConfigLoader::new()
            .load_str("{}", ConfigFormat::Yaml)
            .unwrap();
        assert_eq!(config.exchange.timeout_ms, 30_000);
        assert_eq!(config.trading.default_time_in_force, TimeInForce::Gtc);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BotConfig::default();
        config
            .apply_env_overrides(&env(&[
                ("BINANCE_API_KEY", "key123"),
                ("BINANCE_API_SECRET", "secret456"),
                ("TRADEBOT_TESTNET", "false"),
                ("TRADEBOT_DEFAULT_SYMBOL", "ETHUSDT"),
                ("TRADEBOT_DEFAULT_LEVERAGE", "10"),
                ("TRADEBOT_LOG_LEVEL", "debug"),
            ]))
            .unwrap();

        assert!(!config.exchange.testnet);
        assert_eq!(config.trading.default_symbol, "ETHUSDT");
        assert_eq!(config.trading.default_leverage, 10);
        assert_eq!(config.logging.level, "debug");

        let credentials = config.credentials().unwrap();
        assert_eq!(credentials.api_key, "key123");
        assert_eq!(credentials.api_secret(), "secret456");
        assert!(!credentials.testnet);
    }

    #[test]
    fn test_missing_credentials() {
        let mut config = BotConfig::default();
        config
            .apply_env_overrides(&env(&[("BINANCE_API_KEY", "key123")]))
            .unwrap();
        assert!(matches!(
            config.credentials(),
            Err(ConfigError::MissingCredentials { .. })
        ));
    }

    #[test]
    fn test_validation_reports_section() {
        let mut config = BotConfig::default();
        config.trading.default_leverage = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("trading.default_leverage"));
    }

    #[test]
    fn test_validation_collects_all_sections() {
        let mut config = BotConfig::default();
        config.exchange.base_url = Some("ftp://example.com".to_string());
        config.logging.level = "loud".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed { .. })
        ));
    }

    #[test]
    fn test_secret_is_never_serialized() {
        let mut config = BotConfig::default();
        config.exchange.api_secret = "topsecret".to_string();
        let yaml = ConfigLoader::serialize(&config, ConfigFormat::Yaml).unwrap();
        assert!(!yaml.contains("topsecret"));
        assert!(!yaml.contains("api_secret"));
    }
}
