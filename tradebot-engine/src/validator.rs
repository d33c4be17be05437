//! Order parameter validation.
//!
//! Pure functions turning raw operator input into typed parameter sets.
//! Checks run in a fixed order (symbol, side, quantity, prices, time in
//! force) and the first failure is returned. Nothing here touches the
//! network, and the same input always yields the same outcome.
//!
//! Exchange filters (tick size, step size, minimum notional) are not
//! checked locally; the gateway surfaces the exchange's rejection.

use rust_decimal::Decimal;
use std::str::FromStr;

use tradebot_core::data::{OrderSide, TimeInForce};
use tradebot_core::error::{Field, ValidationError};
use tradebot_core::types::{Leverage, OrderId, Price, Quantity, Symbol};

/// Quote assets accepted at the end of a futures symbol.
pub const QUOTE_ASSETS: [&str; 4] = ["USDT", "BUSD", "BTC", "ETH"];

const QUOTE_ASSET_HINT: &str = "USDT, BUSD, BTC, or ETH";

const MIN_SYMBOL_LEN: usize = 5;

/// Validated market order parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketParams {
    /// Contract symbol
    pub symbol: Symbol,
    /// Order side
    pub side: OrderSide,
    /// Order quantity, > 0
    pub quantity: Quantity,
}

/// Validated limit order parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitParams {
    /// Contract symbol
    pub symbol: Symbol,
    /// Order side
    pub side: OrderSide,
    /// Order quantity, > 0
    pub quantity: Quantity,
    /// Limit price, > 0
    pub price: Price,
    /// Time in force
    pub time_in_force: TimeInForce,
}

/// Validated stop-limit order parameters.
///
/// `price` and `stop_price` are independent levels; their relative order
/// is not constrained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopLimitParams {
    /// Contract symbol
    pub symbol: Symbol,
    /// Order side
    pub side: OrderSide,
    /// Order quantity, > 0
    pub quantity: Quantity,
    /// Limit price once triggered, > 0
    pub price: Price,
    /// Trigger price, > 0
    pub stop_price: Price,
    /// Time in force
    pub time_in_force: TimeInForce,
}

/// Validated take-profit order parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeProfitParams {
    /// Contract symbol
    pub symbol: Symbol,
    /// Order side
    pub side: OrderSide,
    /// Order quantity, > 0
    pub quantity: Quantity,
    /// Limit price once triggered; `None` fills at market
    pub price: Option<Price>,
    /// Trigger price, > 0
    pub stop_price: Price,
    /// Time in force, only sent with a limit price
    pub time_in_force: TimeInForce,
}

/// Validated OCO parameters.
///
/// Only the shape is checked. Whether the take-profit lies on the
/// profitable side of the market needs a live price and is left to the
/// operator and the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcoParams {
    /// Contract symbol
    pub symbol: Symbol,
    /// Side of both legs (the side that closes the position)
    pub side: OrderSide,
    /// Quantity of both legs, > 0
    pub quantity: Quantity,
    /// Take-profit level, > 0
    pub take_profit: Price,
    /// Stop-loss trigger, > 0
    pub stop_loss: Price,
    /// Stop-loss limit price; `None` places a stop-market leg
    pub stop_loss_limit: Option<Price>,
}

/// Validates and normalizes a futures symbol.
///
/// # Errors
///
/// `Missing` for empty input, `MalformedSymbol` if it is too short,
/// contains separators, or has an unsupported quote asset.
pub fn validate_symbol(raw: &str) -> Result<Symbol, ValidationError> {
    let normalized = raw.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Err(ValidationError::Missing {
            field: Field::Symbol,
        });
    }
    if normalized.len() < MIN_SYMBOL_LEN {
        return Err(ValidationError::MalformedSymbol {
            value: normalized,
            reason: format!("Must be at least {MIN_SYMBOL_LEN} characters"),
        });
    }
    if !QUOTE_ASSETS.iter().any(|quote| normalized.ends_with(quote)) {
        return Err(ValidationError::MalformedSymbol {
            value: normalized,
            reason: format!("Must end with {QUOTE_ASSET_HINT}"),
        });
    }
    Symbol::new(&normalized).map_err(|_| ValidationError::MalformedSymbol {
        value: normalized,
        reason: "Only letters and digits are allowed".to_string(),
    })
}

/// Validates an order side, case-insensitively.
///
/// # Errors
///
/// `Missing` for empty input, `InvalidEnum` for anything but BUY/SELL.
pub fn validate_side(raw: &str) -> Result<OrderSide, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Missing { field: Field::Side });
    }
    OrderSide::from_str(raw).map_err(|_| ValidationError::InvalidEnum {
        field: Field::Side,
        value: raw.trim().to_ascii_uppercase(),
        expected: "BUY, SELL".to_string(),
    })
}

/// Parses a strictly positive decimal for `field`.
///
/// Accepts plain (`0.001`) and scientific (`1e-3`) notation: an optional
/// sign, digits with at most one `.`, and an optional exponent. Digit
/// separators such as `1_000` are refused. Values needing more than 28
/// decimal places (`1e-40`) cannot be represented and count as not a
/// number.
///
/// # Errors
///
/// `Missing`, `NotANumber` or `NonPositive`, naming `field`.
pub fn parse_positive(raw: &str, field: Field) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    let not_a_number = || ValidationError::NotANumber {
        field,
        value: trimmed.to_string(),
    };
    if !trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
    {
        return Err(not_a_number());
    }
    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| not_a_number())?;
    if value <= Decimal::ZERO {
        return Err(ValidationError::NonPositive { field, value });
    }
    Ok(value.normalize())
}

/// Validates an order quantity.
///
/// # Errors
///
/// See [`parse_positive`].
pub fn validate_quantity(raw: &str) -> Result<Quantity, ValidationError> {
    parse_positive(raw, Field::Quantity).map(Quantity::new)
}

/// Validates a price-like field.
///
/// # Errors
///
/// See [`parse_positive`].
pub fn validate_price(raw: &str, field: Field) -> Result<Price, ValidationError> {
    parse_positive(raw, field).map(Price::new_unchecked)
}

/// Validates a time in force; `None` or blank yields GTC.
///
/// # Errors
///
/// `InvalidEnum` for anything but GTC/IOC/FOK/GTX.
pub fn validate_time_in_force(raw: Option<&str>) -> Result<TimeInForce, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(TimeInForce::default()),
        Some(s) => TimeInForce::from_str(s).map_err(|_| ValidationError::InvalidEnum {
            field: Field::TimeInForce,
            value: s.to_ascii_uppercase(),
            expected: TimeInForce::ALL
                .iter()
                .map(TimeInForce::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Validates a leverage multiplier in `1..=125`.
///
/// # Errors
///
/// `Missing`, `NotANumber` or `OutOfRange`.
pub fn validate_leverage(raw: &str) -> Result<Leverage, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing {
            field: Field::Leverage,
        });
    }
    let value: i64 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
        field: Field::Leverage,
        value: trimmed.to_string(),
    })?;
    u8::try_from(value)
        .ok()
        .and_then(|v| Leverage::new(v).ok())
        .ok_or_else(|| ValidationError::OutOfRange {
            field: Field::Leverage,
            value: trimmed.to_string(),
            min: 1,
            max: i64::from(Leverage::MAX_LEVERAGE),
        })
}

/// Validates an exchange order ID.
///
/// # Errors
///
/// `Missing` for empty input.
pub fn validate_order_id(raw: &str) -> Result<OrderId, ValidationError> {
    OrderId::new(raw).map_err(|_| ValidationError::Missing {
        field: Field::OrderId,
    })
}

/// Validates market order input.
///
/// # Errors
///
/// The first failing check among symbol, side and quantity.
pub fn validate_market(
    symbol: &str,
    side: &str,
    quantity: &str,
) -> Result<MarketParams, ValidationError> {
    Ok(MarketParams {
        symbol: validate_symbol(symbol)?,
        side: validate_side(side)?,
        quantity: validate_quantity(quantity)?,
    })
}

/// Validates limit order input.
///
/// # Errors
///
/// The first failing check among symbol, side, quantity, price and time in force.
pub fn validate_limit(
    symbol: &str,
    side: &str,
    quantity: &str,
    price: &str,
    time_in_force: Option<&str>,
) -> Result<LimitParams, ValidationError> {
    let MarketParams {
        symbol,
        side,
        quantity,
    } = validate_market(symbol, side, quantity)?;
    Ok(LimitParams {
        symbol,
        side,
        quantity,
        price: validate_price(price, Field::Price)?,
        time_in_force: validate_time_in_force(time_in_force)?,
    })
}

/// Validates stop-limit order input.
///
/// # Errors
///
/// The first failing check among symbol, side, quantity, price, stop price
/// and time in force.
pub fn validate_stop_limit(
    symbol: &str,
    side: &str,
    quantity: &str,
    price: &str,
    stop_price: &str,
    time_in_force: Option<&str>,
) -> Result<StopLimitParams, ValidationError> {
    let MarketParams {
        symbol,
        side,
        quantity,
    } = validate_market(symbol, side, quantity)?;
    let price = validate_price(price, Field::Price)?;
    let stop_price = validate_price(stop_price, Field::StopPrice)?;
    Ok(StopLimitParams {
        symbol,
        side,
        quantity,
        price,
        stop_price,
        time_in_force: validate_time_in_force(time_in_force)?,
    })
}

/// Validates take-profit order input.
///
/// A blank `price` is treated as absent.
///
/// # Errors
///
/// The first failing check among symbol, side, quantity, price, stop price
/// and time in force.
pub fn validate_take_profit(
    symbol: &str,
    side: &str,
    quantity: &str,
    price: Option<&str>,
    stop_price: &str,
    time_in_force: Option<&str>,
) -> Result<TakeProfitParams, ValidationError> {
    let MarketParams {
        symbol,
        side,
        quantity,
    } = validate_market(symbol, side, quantity)?;
    let price = price
        .filter(|s| !s.trim().is_empty())
        .map(|s| validate_price(s, Field::Price))
        .transpose()?;
    let stop_price = validate_price(stop_price, Field::StopPrice)?;
    Ok(TakeProfitParams {
        symbol,
        side,
        quantity,
        price,
        stop_price,
        time_in_force: validate_time_in_force(time_in_force)?,
    })
}

/// Validates OCO input for both legs before anything is submitted.
///
/// A blank `stop_loss_limit` is treated as absent.
///
/// # Errors
///
/// The first failing check among symbol, side, quantity, take-profit,
/// stop-loss and stop-loss limit.
pub fn validate_oco(
    symbol: &str,
    side: &str,
    quantity: &str,
    take_profit: &str,
    stop_loss: &str,
    stop_loss_limit: Option<&str>,
) -> Result<OcoParams, ValidationError> {
    let MarketParams {
        symbol,
        side,
        quantity,
    } = validate_market(symbol, side, quantity)?;
    let take_profit = validate_price(take_profit, Field::TakeProfitPrice)?;
    let stop_loss = validate_price(stop_loss, Field::StopLossPrice)?;
    let stop_loss_limit = stop_loss_limit
        .filter(|s| !s.trim().is_empty())
        .map(|s| validate_price(s, Field::StopLossLimitPrice))
        .transpose()?;
    Ok(OcoParams {
        symbol,
        side,
        quantity,
        take_profit,
        stop_loss,
        stop_loss_limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_symbol_normalized() {
        assert_eq!(validate_symbol(" btcusdt ").unwrap().as_str(), "BTCUSDT");
        assert_eq!(validate_symbol("ETHBTC").unwrap().as_str(), "ETHBTC");
    }

    #[test]
    fn test_symbol_rejections() {
        assert_eq!(
            validate_symbol(""),
            Err(ValidationError::Missing {
                field: Field::Symbol
            })
        );
        assert!(matches!(
            validate_symbol("BTC"),
            Err(ValidationError::MalformedSymbol { .. })
        ));
        let err = validate_symbol("BTCXYZ").unwrap_err();
        assert_eq!(
            err.to_string(),
            "[Validation] Invalid symbol: BTCXYZ. Must end with USDT, BUSD, BTC, or ETH"
        );
        assert_eq!(
            validate_symbol("BTC-USDT").unwrap_err().field(),
            Field::Symbol
        );
    }

    #[test]
    fn test_side() {
        assert_eq!(validate_side("buy").unwrap(), OrderSide::Buy);
        assert_eq!(validate_side(" SELL").unwrap(), OrderSide::Sell);
        assert!(matches!(
            validate_side("long"),
            Err(ValidationError::InvalidEnum {
                field: Field::Side,
                ..
            })
        ));
        assert_eq!(
            validate_side(""),
            Err(ValidationError::Missing { field: Field::Side })
        );
    }

    #[test]
    fn test_non_positive_quantity_rejected_for_every_order_type() {
        for qty in ["0", "-0.001", "-5", "0.000"] {
            let errors = [
                validate_market("BTCUSDT", "BUY", qty).unwrap_err(),
                validate_limit("BTCUSDT", "BUY", qty, "90000", None).unwrap_err(),
                validate_stop_limit("BTCUSDT", "SELL", qty, "90000", "91000", None).unwrap_err(),
                validate_take_profit("BTCUSDT", "SELL", qty, Some("110000"), "110000", None)
                    .unwrap_err(),
                validate_oco("BTCUSDT", "SELL", qty, "110000", "95000", Some("94500")).unwrap_err(),
            ];
            for err in errors {
                assert_eq!(err.field(), Field::Quantity, "qty={qty}");
                assert!(matches!(err, ValidationError::NonPositive { .. }));
                assert!(err.to_string().contains("quantity"));
            }
        }
    }

    #[test]
    fn test_quantity_parsing() {
        assert_eq!(validate_quantity("0.001").unwrap().as_decimal(), dec!(0.001));
        assert_eq!(validate_quantity("1e-3").unwrap().as_decimal(), dec!(0.001));
        assert!(matches!(
            validate_quantity("one"),
            Err(ValidationError::NotANumber {
                field: Field::Quantity,
                ..
            })
        ));
        assert_eq!(
            validate_quantity("  "),
            Err(ValidationError::Missing {
                field: Field::Quantity
            })
        );
    }

    #[test]
    fn test_number_grammar() {
        for raw in ["1_000", "0x10", "1,5", "∞", "1e-40"] {
            assert!(
                matches!(
                    validate_quantity(raw),
                    Err(ValidationError::NotANumber {
                        field: Field::Quantity,
                        ..
                    })
                ),
                "raw={raw}"
            );
        }
        assert_eq!(validate_quantity("+2.50").unwrap().as_decimal(), dec!(2.5));
        assert_eq!(validate_quantity("1E2").unwrap().as_decimal(), dec!(100));
    }

    #[test]
    fn test_first_failure_wins() {
        let err = validate_limit("", "HOLD", "-1", "-1", Some("XYZ")).unwrap_err();
        assert_eq!(err.field(), Field::Symbol);
        let err = validate_limit("BTCUSDT", "HOLD", "-1", "-1", Some("XYZ")).unwrap_err();
        assert_eq!(err.field(), Field::Side);
        let err = validate_limit("BTCUSDT", "BUY", "1", "-1", Some("XYZ")).unwrap_err();
        assert_eq!(err.field(), Field::Price);
        let err = validate_limit("BTCUSDT", "BUY", "1", "100", Some("XYZ")).unwrap_err();
        assert_eq!(err.field(), Field::TimeInForce);
    }

    #[test]
    fn test_stop_limit_names_stop_price() {
        let err = validate_stop_limit("BTCUSDT", "SELL", "0.001", "90000", "0", None).unwrap_err();
        assert_eq!(err.field(), Field::StopPrice);
        assert!(err.to_string().contains("stop_price"));
    }

    #[test]
    fn test_stop_limit_levels_are_independent() {
        let above = validate_stop_limit("BTCUSDT", "SELL", "0.001", "90000", "91000", None);
        let below = validate_stop_limit("BTCUSDT", "SELL", "0.001", "91000", "90000", None);
        let equal = validate_stop_limit("BTCUSDT", "SELL", "0.001", "90000", "90000", None);
        assert!(above.is_ok() && below.is_ok() && equal.is_ok());
    }

    #[test]
    fn test_take_profit_fields() {
        let params =
            validate_take_profit("btcusdt", "sell", "0.001", Some("110000"), "109500", Some("ioc"))
                .unwrap();
        assert_eq!(params.price.unwrap().as_decimal(), dec!(110000));
        assert_eq!(params.stop_price.as_decimal(), dec!(109500));
        assert_eq!(params.time_in_force, TimeInForce::Ioc);

        let no_limit =
            validate_take_profit("BTCUSDT", "SELL", "0.001", Some(""), "110000", None).unwrap();
        assert!(no_limit.price.is_none());

        let err = validate_take_profit("BTCUSDT", "SELL", "0.001", Some("-1"), "0", None)
            .unwrap_err();
        assert_eq!(err.field(), Field::Price);
        let err =
            validate_take_profit("BTCUSDT", "SELL", "0.001", None, "0", None).unwrap_err();
        assert_eq!(err.field(), Field::StopPrice);
        let err = validate_take_profit("BTCUSDT", "SELL", "0.001", None, "110000", Some("day"))
            .unwrap_err();
        assert_eq!(err.field(), Field::TimeInForce);
    }

    #[test]
    fn test_oco_fields() {
        let params =
            validate_oco("btcusdt", "sell", "0.001", "110000", "95000", Some("94500")).unwrap();
        assert_eq!(params.take_profit.as_decimal(), dec!(110000));
        assert_eq!(params.stop_loss.as_decimal(), dec!(95000));
        assert_eq!(params.stop_loss_limit.unwrap().as_decimal(), dec!(94500));

        let no_limit = validate_oco("BTCUSDT", "SELL", "0.001", "110000", "95000", Some(" ")).unwrap();
        assert!(no_limit.stop_loss_limit.is_none());

        let err = validate_oco("BTCUSDT", "SELL", "0.001", "0", "95000", None).unwrap_err();
        assert_eq!(err.field(), Field::TakeProfitPrice);
        let err = validate_oco("BTCUSDT", "SELL", "0.001", "110000", "x", None).unwrap_err();
        assert_eq!(err.field(), Field::StopLossPrice);
        let err = validate_oco("BTCUSDT", "SELL", "0.001", "110000", "95000", Some("-1")).unwrap_err();
        assert_eq!(err.field(), Field::StopLossLimitPrice);
    }

    #[test]
    fn test_oco_shape_only() {
        // A take-profit below the stop-loss is accepted; no market data is consulted.
        assert!(validate_oco("BTCUSDT", "SELL", "0.001", "90000", "95000", None).is_ok());
    }

    #[test]
    fn test_time_in_force() {
        assert_eq!(validate_time_in_force(None).unwrap(), TimeInForce::Gtc);
        assert_eq!(validate_time_in_force(Some("ioc")).unwrap(), TimeInForce::Ioc);
        let err = validate_time_in_force(Some("day")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "[Validation] Invalid time_in_force: DAY. Valid options: GTC, IOC, FOK, GTX"
        );
    }

    #[test]
    fn test_leverage() {
        assert_eq!(validate_leverage("20").unwrap().as_u8(), 20);
        assert!(matches!(
            validate_leverage("0"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_leverage("126"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_leverage("-3"),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_leverage("ten"),
            Err(ValidationError::NotANumber { .. })
        ));
    }

    #[test]
    fn test_order_id() {
        assert_eq!(validate_order_id(" 123 ").unwrap().as_str(), "123");
        assert!(validate_order_id("").is_err());
    }

    #[test]
    fn test_validation_is_deterministic() {
        let inputs = [
            ("BTCUSDT", "BUY", "0.001"),
            ("BTCUSDT", "BUY", "0"),
            ("", "SELL", "1"),
            ("ETHUSDT", "hold", "1"),
        ];
        for (symbol, side, qty) in inputs {
            assert_eq!(
                validate_market(symbol, side, qty),
                validate_market(symbol, side, qty)
            );
        }
    }
}
