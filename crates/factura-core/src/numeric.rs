//! # Lenient Numeric Input
//!
//! Form fields and stored rows reach the calculator as loosely typed values:
//! JSON numbers, numeric strings, `null`, missing keys, or garbage typed into
//! an input box. The calculator never fails, so every one of these must be
//! turned into a [`Decimal`] up front.
//!
//! ## Coercion Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Input                    │  as_decimal()      │  or_zero()             │
//! │  ─────────────────────────┼────────────────────┼──────────────────────  │
//! │  2.5 (f64)                │  Some(2.5)         │  2.5                   │
//! │  f64::NAN / INFINITY      │  None              │  0                     │
//! │  "12.5"                   │  Some(12.5)        │  12.5                  │
//! │  "  12.5kg"               │  Some(12.5)        │  12.5  (leading prefix)│
//! │  "1e3"                    │  Some(1000)        │  1000                  │
//! │  "abc" / ""               │  None              │  0                     │
//! │  None (Option)            │  None              │  0                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! String parsing takes the longest numeric prefix, the way a browser's
//! `parseFloat` does, so values typed as `"3 pcs"` still count as 3.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserializer;

use crate::money::Money;

// =============================================================================
// Numeric Trait
// =============================================================================

/// A value that can be read as a decimal number, possibly unsuccessfully.
pub trait Numeric {
    /// Returns the decimal value, or `None` when the input is not a number.
    fn as_decimal(&self) -> Option<Decimal>;

    /// Returns the decimal value, treating anything non-numeric as zero.
    fn or_zero(&self) -> Decimal {
        self.as_decimal().unwrap_or(Decimal::ZERO)
    }
}

impl Numeric for Decimal {
    fn as_decimal(&self) -> Option<Decimal> {
        Some(*self)
    }
}

impl Numeric for Money {
    fn as_decimal(&self) -> Option<Decimal> {
        Some(self.to_decimal())
    }
}

impl Numeric for f64 {
    fn as_decimal(&self) -> Option<Decimal> {
        if !self.is_finite() {
            tracing::debug!(value = ?self, "non-finite number coerced to zero");
            return None;
        }
        Decimal::from_f64(*self)
    }
}

impl Numeric for f32 {
    fn as_decimal(&self) -> Option<Decimal> {
        f64::from(*self).as_decimal()
    }
}

macro_rules! impl_numeric_for_int {
    ($($t:ty),*) => {
        $(
            impl Numeric for $t {
                fn as_decimal(&self) -> Option<Decimal> {
                    Some(Decimal::from(*self))
                }
            }
        )*
    };
}

impl_numeric_for_int!(i32, i64, u32, u64);

impl Numeric for str {
    fn as_decimal(&self) -> Option<Decimal> {
        parse_leading_decimal(self)
    }
}

impl Numeric for String {
    fn as_decimal(&self) -> Option<Decimal> {
        parse_leading_decimal(self)
    }
}

impl<T: Numeric + ?Sized> Numeric for &T {
    fn as_decimal(&self) -> Option<Decimal> {
        (**self).as_decimal()
    }
}

impl<T: Numeric> Numeric for Option<T> {
    fn as_decimal(&self) -> Option<Decimal> {
        self.as_ref().and_then(Numeric::as_decimal)
    }
}

// =============================================================================
// String Parsing
// =============================================================================

/// Parses the longest leading decimal number of `input`.
///
/// Leading whitespace is skipped. Accepts an optional sign, digits with an
/// optional fraction, and an optional exponent. Returns `None` if no digit is
/// found before the first non-numeric character.
///
/// ## Example
/// ```rust
/// use factura_core::numeric::parse_leading_decimal;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_leading_decimal("12.50 DT"), Some(Decimal::new(1250, 2)));
/// assert_eq!(parse_leading_decimal("abc"), None);
/// ```
pub fn parse_leading_decimal(input: &str) -> Option<Decimal> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let mut probe = end + 1;
        while probe < bytes.len() && bytes[probe].is_ascii_digit() {
            probe += 1;
        }
        frac_digits = probe - end - 1;
        if int_digits > 0 || frac_digits > 0 {
            end = probe;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    let mantissa_end = end;
    let mut has_exponent = false;
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut probe = end + 1;
        if matches!(bytes.get(probe), Some(b'+') | Some(b'-')) {
            probe += 1;
        }
        let exp_start = probe;
        while probe < bytes.len() && bytes[probe].is_ascii_digit() {
            probe += 1;
        }
        if probe > exp_start {
            end = probe;
            has_exponent = true;
        }
    }

    // Decimal::from_str wants digits on both sides of the point
    let mut mantissa = s[..mantissa_end].trim_end_matches('.').to_string();
    let unsigned = mantissa.trim_start_matches(['+', '-']);
    if unsigned.starts_with('.') {
        let sign_len = mantissa.len() - unsigned.len();
        mantissa.insert(sign_len, '0');
    }
    let mantissa = mantissa.trim_start_matches('+');

    if has_exponent {
        let exponent = &s[mantissa_end + 1..end];
        Decimal::from_scientific(&format!("{mantissa}e{exponent}")).ok()
    } else {
        Decimal::from_str(mantissa).ok()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

/// Deserializes any JSON value into a [`Decimal`], coercing non-numbers to zero.
///
/// Pair with `#[serde(default)]` so missing keys also become zero.
///
/// ## Usage
/// ```rust,ignore
/// #[derive(Deserialize)]
/// struct Row {
///     #[serde(default, deserialize_with = "numeric::lenient")]
///     quantity: Decimal,
/// }
/// ```
pub fn lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientDecimalVisitor)
}

struct LenientDecimalVisitor;

impl<'de> Visitor<'de> for LenientDecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number, a numeric string, or null")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
        Ok(v.or_zero())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
        Ok(v.or_zero())
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Decimal, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Decimal, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Decimal::ZERO)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Decimal, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Decimal::ZERO)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
