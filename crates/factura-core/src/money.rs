//! # Money Module
//!
//! Provides the `Money` type and the `round3` rounding rule.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Thousandths                                      │
//! │    The dinar has 3 minor digits (1 DT = 1000 millimes), so every        │
//! │    amount is an i64 count of thousandths: 238.000 DT = 238000           │
//! │                                                                         │
//! │  Intermediate products (qty × price × rate) use `Decimal` and are       │
//! │  brought back to Money through `round3` at each step.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rounding
//! `round3` rounds half away from zero: 0.0005 → 0.001, -0.0005 → -0.001.
//! It is applied after every combination step, not only at the end, so the
//! same inputs always produce the same thousandths.
//!
//! ## Usage
//! ```rust
//! use factura_core::money::Money;
//!
//! let price = Money::from_millimes(12_500); // 12.500
//! let doubled = price * 2;                  // 25.000
//! assert_eq!(doubled.to_string(), "25.000");
//! ```

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::numeric;
use crate::types::Percent;

/// Number of fraction digits kept for every monetary value.
pub const DECIMAL_PLACES: u32 = 3;

/// Minor units per major unit (`10^DECIMAL_PLACES`).
pub const MINOR_UNITS: i64 = 1000;

/// Rounds a decimal to 3 fraction digits, half away from zero.
///
/// ## Example
/// ```rust
/// use factura_core::money::round3;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round3(Decimal::new(12345, 4)), Decimal::new(1235, 3)); // 1.2345 → 1.235
/// assert_eq!(round3(Decimal::new(-5, 4)), Decimal::new(-1, 3));      // -0.0005 → -0.001
/// ```
#[inline]
pub fn round3(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in thousandths of the currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts above 100% legitimately produce negatives
/// - **Always 3 decimals**: the value can only be built through `round3`
/// - **Serialized as a decimal string** (`"238.000"`), so the storage backend
///   and the web front end receive exactly what was computed
///
/// ## Where Money is Used
/// ```text
/// LineItem (qty × price, discount) ──► line net ──► DocumentTotals.subtotal
///                                                          │
///                                   discount_amount ◄──────┤
///                                   tax_amount ◄───────────┤
///                                   total ◄────────────────┘
///                                      │
///                                      ├──► PaymentSummary.remaining
///                                      └──► RevenueReport
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from thousandths (millimes).
    #[inline]
    pub const fn from_millimes(millimes: i64) -> Self {
        Money(millimes)
    }

    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_UNITS)
    }

    /// Creates a Money value from a decimal, rounding with [`round3`].
    ///
    /// Values beyond the i64 range saturate instead of panicking.
    ///
    /// ## Example
    /// ```rust
    /// use factura_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let amount = Money::from_decimal(Decimal::new(342_0005, 4)); // 342.0005
    /// assert_eq!(amount.millimes(), 342_001);
    /// ```
    pub fn from_decimal(value: Decimal) -> Self {
        let scaled = round3(value).saturating_mul(Decimal::from(MINOR_UNITS));
        match scaled.to_i64() {
            Some(millimes) => Money(millimes),
            None => {
                tracing::warn!(%value, "amount exceeds representable range, saturating");
                if value.is_sign_negative() {
                    Money(i64::MIN)
                } else {
                    Money(i64::MAX)
                }
            }
        }
    }

    /// Returns the value in thousandths.
    #[inline]
    pub const fn millimes(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal with exactly 3 fraction digits.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, DECIMAL_PLACES)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `round3(self × rate / 100)`.
    ///
    /// This is the single rule for turning a percentage into an amount:
    /// per-line discount, per-line tax and the document discount all use it.
    ///
    /// ## Example
    /// ```rust
    /// use factura_core::money::Money;
    /// use factura_core::types::Percent;
    ///
    /// let base = Money::from_major(180);
    /// let tax = base.percentage(Percent::from_int(19));
    /// assert_eq!(tax.to_string(), "34.200");
    /// ```
    pub fn percentage(&self, rate: Percent) -> Money {
        Money::from_decimal(rate.apply(self.to_decimal()))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`-12.500`). Use `CurrencyConfig::format_currency`
/// for anything shown to a user.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.to_decimal())
    }
}

/// Accepts numbers, numeric strings and null; non-numbers become zero.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        numeric::lenient(deserializer).map(Money::from_decimal)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Multiplication by an integer count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
