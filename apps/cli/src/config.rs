//! # CLI Configuration
//!
//! Builds the currency configuration at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`FACTURA_*`)
//! 2. Defaults (`CurrencyConfig::default()`: TND, fr-TN, 19%)
//!
//! The result is immutable and handed to the calculator once.

use factura_core::numeric::parse_leading_decimal;
use factura_core::{CurrencyConfig, Percent};

/// Environment variables read at startup.
pub const ENV_CURRENCY_CODE: &str = "FACTURA_CURRENCY_CODE";
pub const ENV_CURRENCY_SYMBOL: &str = "FACTURA_CURRENCY_SYMBOL";
pub const ENV_LOCALE: &str = "FACTURA_LOCALE";
pub const ENV_GROUP_SEPARATOR: &str = "FACTURA_GROUP_SEPARATOR";
pub const ENV_DECIMAL_SEPARATOR: &str = "FACTURA_DECIMAL_SEPARATOR";
pub const ENV_DEFAULT_TAX_RATE: &str = "FACTURA_DEFAULT_TAX_RATE";

/// Loads the configuration from the process environment.
///
/// ## Environment Variables
/// - `FACTURA_CURRENCY_CODE`: ISO 4217 code (e.g., "EUR")
/// - `FACTURA_CURRENCY_SYMBOL`: suffix printed after amounts (e.g., "€")
/// - `FACTURA_LOCALE`: locale tag, informational
/// - `FACTURA_GROUP_SEPARATOR` / `FACTURA_DECIMAL_SEPARATOR`: one character each
/// - `FACTURA_DEFAULT_TAX_RATE`: percent for new lines (e.g., "7")
pub fn from_env() -> CurrencyConfig {
    from_lookup(|key| std::env::var(key).ok())
}

/// Same as [`from_env`] over an arbitrary key lookup.
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CurrencyConfig {
    let mut config = CurrencyConfig::default();

    if let Some(code) = lookup(ENV_CURRENCY_CODE) {
        config.code = code;
    }

    if let Some(symbol) = lookup(ENV_CURRENCY_SYMBOL) {
        config.symbol = symbol;
    }

    if let Some(locale) = lookup(ENV_LOCALE) {
        config.locale = locale;
    }

    if let Some(sep) = lookup(ENV_GROUP_SEPARATOR) {
        match single_char(&sep) {
            Some(c) => config.group_separator = c,
            None => tracing::warn!(value = %sep, "{} must be one character, ignored", ENV_GROUP_SEPARATOR),
        }
    }

    if let Some(sep) = lookup(ENV_DECIMAL_SEPARATOR) {
        match single_char(&sep) {
            Some(c) => config.decimal_separator = c,
            None => tracing::warn!(value = %sep, "{} must be one character, ignored", ENV_DECIMAL_SEPARATOR),
        }
    }

    if let Some(rate) = lookup(ENV_DEFAULT_TAX_RATE) {
        match parse_leading_decimal(&rate) {
            Some(value) if !value.is_sign_negative() => {
                config.default_tax_rate = Percent::new(value);
            }
            _ => tracing::warn!(value = %rate, "invalid {}, keeping default", ENV_DEFAULT_TAX_RATE),
        }
    }

    tracing::debug!(
        code = %config.code,
        symbol = %config.symbol,
        locale = %config.locale,
        default_tax_rate = %config.default_tax_rate,
        "Currency configuration loaded"
    );

    config
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
