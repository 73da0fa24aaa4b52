//! # Currency Configuration and Formatting
//!
//! Immutable currency settings plus the display helpers built on them.
//!
//! ## Configuration Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  startup: CurrencyConfig::default() or built by the application         │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  TotalsCalculator::new(config)   ← bound once, read-only afterwards     │
//! │      │                                                                  │
//! │      ├──► editors (default tax rate for new rows)                       │
//! │      ├──► document rendering (format_currency)                          │
//! │      └──► reports (format_currency)                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Display Format
//! Default is the Tunisian dinar in `fr-TN`: three fraction digits, a comma
//! as decimal mark, a narrow no-break space (U+202F) between thousands and a
//! ` DT` suffix, e.g. `1 234 567,891 DT`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::DECIMAL_PLACES;
use crate::numeric::{parse_leading_decimal, Numeric};
use crate::types::Percent;

/// Narrow no-break space, the French thousands separator.
pub const NARROW_NBSP: char = '\u{202F}';

/// Standard Tunisian VAT rate, applied to new document lines.
pub const DEFAULT_TAX_RATE_PERCENT: i64 = 19;

// =============================================================================
// Configuration
// =============================================================================

/// Currency and locale settings.
///
/// ## Thread Safety
/// Read-only after construction, so it is shared by reference or clone
/// without locking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CurrencyConfig {
    /// ISO 4217 code.
    pub code: String,

    /// Symbol appended after amounts.
    pub symbol: String,

    /// BCP 47 locale tag the separators below come from.
    pub locale: String,

    /// Thousands separator.
    pub group_separator: char,

    /// Decimal mark.
    pub decimal_separator: char,

    /// Tax rate given to new lines.
    #[ts(type = "string")]
    pub default_tax_rate: Percent,
}

impl Default for CurrencyConfig {
    /// Tunisian dinar, `fr-TN`, 19% VAT.
    fn default() -> Self {
        CurrencyConfig {
            code: "TND".to_string(),
            symbol: "DT".to_string(),
            locale: "fr-TN".to_string(),
            group_separator: NARROW_NBSP,
            decimal_separator: ',',
            default_tax_rate: Percent::from_int(DEFAULT_TAX_RATE_PERCENT),
        }
    }
}

impl CurrencyConfig {
    /// Formats an amount with exactly 3 fraction digits and the currency
    /// suffix.
    ///
    /// Anything that is not a number formats as zero. Never panics.
    ///
    /// ## Example
    /// ```rust
    /// use factura_core::currency::CurrencyConfig;
    ///
    /// let config = CurrencyConfig::default();
    /// assert_eq!(config.format_currency(1234.5), "1\u{202F}234,500 DT");
    /// assert_eq!(config.format_currency(f64::NAN), "0,000 DT");
    /// assert_eq!(config.format_currency("abc"), "0,000 DT");
    /// ```
    pub fn format_currency(&self, amount: impl Numeric) -> String {
        let digits = self.group_digits(amount.or_zero(), DECIMAL_PLACES);
        format!("{} {}", digits, self.symbol)
    }

    /// Formats a number with locale separators and no currency suffix.
    ///
    /// Non-numbers format as a bare `"0"`, whatever `decimals` is.
    ///
    /// ## Example
    /// ```rust
    /// use factura_core::currency::CurrencyConfig;
    ///
    /// let config = CurrencyConfig::default();
    /// assert_eq!(config.format_number(9.5, 1), "9,5");
    /// assert_eq!(config.format_number("x", 3), "0");
    /// ```
    pub fn format_number(&self, amount: impl Numeric, decimals: u32) -> String {
        match amount.as_decimal() {
            Some(value) => self.group_digits(value, decimals),
            None => "0".to_string(),
        }
    }

    /// Reads back an amount produced by [`format_currency`](Self::format_currency).
    ///
    /// Keeps only digits, the decimal mark and `-`, turns the first decimal
    /// mark into a point, then parses. Unparseable text yields zero. Group
    /// separators and the symbol fall away in the filter.
    ///
    /// ## Example
    /// ```rust
    /// use factura_core::currency::CurrencyConfig;
    /// use rust_decimal::Decimal;
    ///
    /// let config = CurrencyConfig::default();
    /// assert_eq!(config.parse_amount("1\u{202F}234,500 DT"), Decimal::new(1_234_500, 3));
    /// assert_eq!(config.parse_amount("n/a"), Decimal::ZERO);
    /// ```
    pub fn parse_amount(&self, formatted: &str) -> Decimal {
        let cleaned: String = formatted
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == self.decimal_separator || *c == '-')
            .collect();
        let normalized = cleaned.replacen(self.decimal_separator, ".", 1);
        parse_leading_decimal(&normalized).unwrap_or(Decimal::ZERO)
    }

    fn group_digits(&self, value: Decimal, decimals: u32) -> String {
        let mut rounded =
            value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        rounded.set_sign_positive(true);
        rounded.rescale(decimals);

        let plain = rounded.to_string();
        let (int_part, frac_part) = match plain.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (plain.as_str(), None),
        };

        let mut out = String::with_capacity(plain.len() + plain.len() / 3 + 2);
        if negative {
            out.push('-');
        }
        let len = int_part.len();
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push(self.group_separator);
            }
            out.push(digit);
        }
        if let Some(frac_part) = frac_part {
            out.push(self.decimal_separator);
            out.push_str(frac_part);
        }
        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_basic() {
        let config = CurrencyConfig::default();
        assert_eq!(config.format_currency(0), "0,000 DT");
        assert_eq!(config.format_currency(238), "238,000 DT");
        assert_eq!(config.format_currency(dec!(214.2)), "214,200 DT");
        assert_eq!(config.format_currency(Money::from_millimes(1)), "0,001 DT");
    }

    #[test]
    fn test_format_currency_grouping() {
        let config = CurrencyConfig::default();
        assert_eq!(config.format_currency(1000), "1\u{202F}000,000 DT");
        assert_eq!(
            config.format_currency(dec!(1234567.891)),
            "1\u{202F}234\u{202F}567,891 DT"
        );
        assert_eq!(config.format_currency(999.9999), "1\u{202F}000,000 DT");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = CurrencyConfig::default();
        assert_eq!(config.format_currency(-1234.5), "-1\u{202F}234,500 DT");
        // Rounds to zero: no sign
        assert_eq!(config.format_currency(dec!(-0.0001)), "0,000 DT");
    }

    #[test]
    fn test_format_currency_invalid_is_zero() {
        let config = CurrencyConfig::default();
        assert_eq!(config.format_currency(f64::NAN), "0,000 DT");
        assert_eq!(config.format_currency("abc"), "0,000 DT");
        assert_eq!(config.format_currency(None::<Decimal>), "0,000 DT");
        assert_eq!(config.format_currency("12.5"), "12,500 DT");
    }

    #[test]
    fn test_format_currency_rounds_half_away() {
        let config = CurrencyConfig::default();
        assert_eq!(config.format_currency(dec!(0.0005)), "0,001 DT");
        assert_eq!(config.format_currency(dec!(2.4444)), "2,444 DT");
    }

    #[test]
    fn test_format_number() {
        let config = CurrencyConfig::default();
        assert_eq!(config.format_number(dec!(1234.5678), 2), "1\u{202F}234,57");
        assert_eq!(config.format_number(42, 0), "42");
        assert_eq!(config.format_number(f64::NAN, 3), "0");
    }

    #[test]
    fn test_custom_locale() {
        let config = CurrencyConfig {
            code: "EUR".to_string(),
            symbol: "€".to_string(),
            locale: "de-DE".to_string(),
            group_separator: '.',
            decimal_separator: ',',
            default_tax_rate: Percent::from_int(19),
        };
        assert_eq!(config.format_currency(1234.5), "1.234,500 €");
    }

    #[test]
    fn test_parse_amount() {
        let config = CurrencyConfig::default();
        assert_eq!(config.parse_amount("214,200 DT"), dec!(214.2));
        assert_eq!(config.parse_amount("-1\u{202F}234,500 DT"), dec!(-1234.5));
        assert_eq!(config.parse_amount(""), Decimal::ZERO);
        assert_eq!(config.parse_amount("DT"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_inverts_format() {
        let config = CurrencyConfig::default();
        for amount in [dec!(0), dec!(0.001), dec!(42.5), dec!(1234567.891), dec!(-88.008)] {
            let formatted = config.format_currency(amount);
            assert_eq!(config.parse_amount(&formatted), amount);
        }
    }
}
