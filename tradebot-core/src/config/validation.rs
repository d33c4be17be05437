//! Configuration validation utilities.

use crate::error::ConfigError;

/// Result type for validation operations.
pub type ValidationResult = Result<(), ConfigError>;

/// Collects validation errors while walking nested configuration sections.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    path: Vec<String>,
    errors: Vec<ConfigError>,
}

impl ValidationContext {
    /// Creates a new validation context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a nested section.
    pub fn enter(&mut self, section: impl Into<String>) {
        self.path.push(section.into());
    }

    /// Exits the current section.
    pub fn exit(&mut self) {
        self.path.pop();
    }

    /// Returns the dotted path of the current section.
    #[must_use]
    pub fn current_path(&self) -> String {
        self.path.join(".")
    }

    /// Records an error.
    pub fn add_error(&mut self, error: ConfigError) {
        self.errors.push(error);
    }

    /// Returns true if no errors were recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns every recorded error.
    #[must_use]
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Folds all recorded errors into one `ValidationFailed`, or a single
    /// error unchanged.
    pub fn into_result(mut self) -> ValidationResult {
        match self.errors.len() {
            0 => Ok(()),
            1 => Err(self.errors.remove(0)),
            _ => Err(ConfigError::ValidationFailed {
                reason: self
                    .errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            }),
        }
    }

    /// Creates a missing field error for the current section.
    #[must_use]
    pub fn missing_field(&self, field: impl Into<String>) -> ConfigError {
        let section = if self.path.is_empty() {
            None
        } else {
            Some(self.current_path())
        };
        ConfigError::MissingField {
            field: field.into(),
            section,
        }
    }

    /// Creates an invalid value error qualified with the current section.
    #[must_use]
    pub fn invalid_value(&self, field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
        let field_name = field.into();
        let full_field = if self.path.is_empty() {
            field_name
        } else {
            format!("{}.{}", self.current_path(), field_name)
        };
        ConfigError::InvalidValue {
            field: full_field,
            reason: reason.into(),
        }
    }
}

/// Chainable checks that record into a [`ValidationContext`].
#[derive(Debug)]
pub struct Validator<'a> {
    ctx: &'a mut ValidationContext,
}

impl<'a> Validator<'a> {
    /// Creates a validator over a context.
    pub fn new(ctx: &'a mut ValidationContext) -> Self {
        Self { ctx }
    }

    /// Requires a non-empty (after trimming) string.
    pub fn require_non_empty(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            let error = self.ctx.missing_field(field);
            self.ctx.add_error(error);
        }
        self
    }

    /// Requires `min <= value <= max`.
    pub fn in_range<T: PartialOrd + std::fmt::Display>(
        &mut self,
        field: &str,
        value: &T,
        min: &T,
        max: &T,
    ) -> &mut Self {
        if value < min || value > max {
            let error = self.ctx.invalid_value(
                field,
                format!("Value {value} must be between {min} and {max}"),
            );
            self.ctx.add_error(error);
        }
        self
    }

    /// Requires a value strictly greater than the type's default.
    pub fn positive<T: PartialOrd + Default + std::fmt::Display>(
        &mut self,
        field: &str,
        value: &T,
    ) -> &mut Self {
        if *value <= T::default() {
            let error = self
                .ctx
                .invalid_value(field, format!("Value {value} must be positive"));
            self.ctx.add_error(error);
        }
        self
    }

    /// Requires the value to be one of `allowed` (case-insensitive).
    pub fn one_of(&mut self, field: &str, value: &str, allowed: &[&str]) -> &mut Self {
        if !allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
            let error = self.ctx.invalid_value(
                field,
                format!("'{value}' is not one of: {}", allowed.join(", ")),
            );
            self.ctx.add_error(error);
        }
        self
    }

    /// Requires an `http://` or `https://` URL when the value is non-empty.
    pub fn valid_url(&mut self, field: &str, value: &str) -> &mut Self {
        if !value.is_empty() && !value.starts_with("http://") && !value.starts_with("https://") {
            let error = self
                .ctx
                .invalid_value(field, "Must be a valid URL (http:// or https://)");
            self.ctx.add_error(error);
        }
        self
    }
}

/// Applies environment variable overrides to configuration fields.
///
/// Reads through a lookup function so the process environment can be
/// swapped for a map in tests.
pub struct EnvOverride<F>
where
    F: Fn(&str) -> Option<String>,
{
    lookup: F,
}

impl EnvOverride<fn(&str) -> Option<String>> {
    /// Reads from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            lookup: |name| std::env::var(name).ok(),
        }
    }
}

impl<F> EnvOverride<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Reads through a custom lookup.
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    fn get(&self, var_name: &str) -> Option<String> {
        (self.lookup)(var_name).filter(|v| !v.trim().is_empty())
    }

    /// Overrides a string field.
    pub fn apply_string(&self, var_name: &str, target: &mut String) {
        if let Some(value) = self.get(var_name) {
            *target = value.trim().to_string();
        }
    }

    /// Overrides an optional string field.
    pub fn apply_optional_string(&self, var_name: &str, target: &mut Option<String>) {
        if let Some(value) = self.get(var_name) {
            *target = Some(value.trim().to_string());
        }
    }

    /// Overrides a numeric field.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the variable is set but does
    /// not parse.
    pub fn apply_number<T: std::str::FromStr>(
        &self,
        var_name: &str,
        target: &mut T,
    ) -> ValidationResult {
        if let Some(value) = self.get(var_name) {
            *target = value.trim().parse().map_err(|_| ConfigError::InvalidEnvVar {
                name: var_name.to_string(),
                reason: format!("'{value}' is not a number"),
            })?;
        }
        Ok(())
    }

    /// Overrides a boolean field.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for values other than
    /// true/false, 1/0, yes/no, on/off.
    pub fn apply_bool(&self, var_name: &str, target: &mut bool) -> ValidationResult {
        if let Some(value) = self.get(var_name) {
            *target = match value.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidEnvVar {
                        name: var_name.to_string(),
                        reason: format!("'{value}' is not a boolean"),
                    });
                }
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_validation_context_path() {
        let mut ctx = ValidationContext::new();
        ctx.enter("exchange");
        assert_eq!(ctx.current_path(), "exchange");
        let error = ctx.invalid_value("timeout_ms", "bad");
        assert!(error.to_string().contains("exchange.timeout_ms"));
        ctx.exit();
        assert_eq!(ctx.current_path(), "");
    }

    #[test]
    fn test_into_result_folds_multiple_errors() {
        let mut ctx = ValidationContext::new();
        Validator::new(&mut ctx)
            .require_non_empty("symbol", " ")
            .in_range("leverage", &200_u8, &1, &125);
        assert_eq!(ctx.errors().len(), 2);
        match ctx.into_result() {
            Err(ConfigError::ValidationFailed { reason }) => {
                assert!(reason.contains("symbol"));
                assert!(reason.contains("leverage"));
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_validator_checks() {
        let mut ctx = ValidationContext::new();
        Validator::new(&mut ctx)
            .positive("timeout_ms", &30_000_u64)
            .one_of("level", "DEBUG", &["trace", "debug", "info"])
            .valid_url("base_url", "https://fapi.binance.com");
        assert!(ctx.is_valid());

        Validator::new(&mut ctx).valid_url("base_url", "fapi.binance.com");
        assert!(!ctx.is_valid());
    }

    #[test]
    fn test_env_override_values() {
        let overrides = EnvOverride::new(env(&[
            ("KEY", " abc "),
            ("LEV", "20"),
            ("NET", "no"),
            ("EMPTY", ""),
        ]));
        let mut key = String::new();
        let mut leverage = 1_u8;
        let mut testnet = true;
        let mut url = Some("keep".to_string());

        overrides.apply_string("KEY", &mut key);
        overrides.apply_number("LEV", &mut leverage).unwrap();
        overrides.apply_bool("NET", &mut testnet).unwrap();
        overrides.apply_optional_string("EMPTY", &mut url);

        assert_eq!(key, "abc");
        assert_eq!(leverage, 20);
        assert!(!testnet);
        assert_eq!(url.as_deref(), Some("keep"));
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let overrides = EnvOverride::new(env(&[("LEV", "lots"), ("NET", "maybe")]));
        let mut leverage = 1_u8;
        let mut testnet = true;
        assert!(matches!(
            overrides.apply_number("LEV", &mut leverage),
            Err(ConfigError::InvalidEnvVar { .. })
        ));
        assert!(overrides.apply_bool("NET", &mut testnet).is_err());
        assert_eq!(leverage, 1);
    }
}
