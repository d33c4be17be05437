//! Configuration traits.

use crate::error::ConfigError;

/// Trait for types that can be validated.
///
/// # Example
///
/// ```rust
/// use tradebot_core::config::Validatable;
/// use tradebot_core::error::ConfigError;
///
/// struct RetryConfig {
///     max_retries: u32,
/// }
///
/// impl Validatable for RetryConfig {
///     fn validate(&self) -> Result<(), ConfigError> {
///         if self.max_retries > 10 {
///             return Err(ConfigError::invalid_value("max_retries", "at most 10"));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(RetryConfig { max_retries: 11 }.validate().is_err());
/// ```
pub trait Validatable {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;
}
