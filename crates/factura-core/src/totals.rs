//! # Totals Calculator
//!
//! Turns line items into the four document amounts. Invoices and purchase
//! orders both go through these functions; no editor does its own math.
//!
//! ## Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Per line                                                               │
//! │    raw       = quantity × unit_price                                   │
//! │    line net  = round3(raw - round3(raw × discount% / 100))             │
//! │    line tax  = round3(line net × tax% / 100)                           │
//! │                                                                         │
//! │  Per document                                                           │
//! │    subtotal            = round3(Σ line net)                            │
//! │    raw tax             = Σ line tax                                    │
//! │    discount_amount     = round3(subtotal × global% / 100)              │
//! │    discounted subtotal = subtotal - discount_amount                    │
//! │    blended rate        = raw tax / subtotal × 100   (0 if no tax)      │
//! │    tax_amount          = round3(discounted × blended / 100)            │
//! │    total               = round3(discounted + tax_amount)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The tax is NOT the sum of per-line taxes once a document discount is in
//! play: per-line taxes are folded into one blended rate which is then
//! reapplied to the discounted subtotal. A document mixing a 0% line and a
//! 19% line of equal value is taxed at 9.5% overall. Stored documents were
//! computed this way and must keep reproducing the same totals.
//!
//! Every step rounds on its own, so rounding differences across lines add up
//! rather than cancel. That is also part of the contract.
//!
//! ## Failure Model
//! None. Inputs arrive already coerced (see [`crate::numeric`]), division by
//! a zero subtotal is guarded, and arithmetic saturates instead of panicking.

use rust_decimal::Decimal;

use crate::currency::CurrencyConfig;
use crate::money::{round3, Money};
use crate::numeric::Numeric;
use crate::types::{DocumentTotals, LineItem, Percent};

// =============================================================================
// Line Level
// =============================================================================

/// Discounted, pre-tax line amount.
fn line_net(quantity: Decimal, unit_price: Decimal, discount: Percent) -> Decimal {
    let raw = quantity.saturating_mul(unit_price);
    let discount_amount = round3(discount.apply(raw));
    round3(raw.saturating_sub(discount_amount))
}

fn line_tax(net: Decimal, tax_rate: Percent) -> Decimal {
    round3(tax_rate.apply(net))
}

/// Computes a line's discounted amount, before tax.
///
/// Accepts anything [`Numeric`]: decimals, floats, strings typed in a form,
/// options. Non-numbers count as zero. A discount above 100% is not clamped
/// and yields a negative amount.
///
/// ## Example
/// ```rust
/// use factura_core::totals::compute_line_total;
///
/// // 3 × 10.000 with 10% off
/// assert_eq!(compute_line_total(3, 10, 10).to_string(), "27.000");
///
/// // Garbage quantity counts as zero
/// assert!(compute_line_total("abc", 10, 0).is_zero());
/// ```
pub fn compute_line_total(
    quantity: impl Numeric,
    unit_price: impl Numeric,
    discount_percent: impl Numeric,
) -> Money {
    Money::from_decimal(line_net(
        quantity.or_zero(),
        unit_price.or_zero(),
        Percent::new(discount_percent.or_zero()),
    ))
}

/// Computes the tax carried by one line at its own rate, before any
/// document discount.
pub fn compute_line_tax(item: &LineItem) -> Money {
    let net = line_net(item.quantity, item.unit_price, item.discount_percent);
    Money::from_decimal(line_tax(net, item.tax_rate))
}

/// The per-row total displayed in the editors: discounted amount plus the
/// line's own tax.
///
/// Ignores the document discount; only [`compute_document_totals`] knows
/// about that.
pub fn line_total_with_tax(item: &LineItem) -> Money {
    let net = line_net(item.quantity, item.unit_price, item.discount_percent);
    Money::from_decimal(net.saturating_add(line_tax(net, item.tax_rate)))
}

// =============================================================================
// Document Level
// =============================================================================

/// Effective tax percentage of the document before its global discount.
///
/// Zero when no tax was collected or when the subtotal is zero.
pub fn blended_tax_rate(raw_tax: Decimal, subtotal: Decimal) -> Percent {
    if raw_tax <= Decimal::ZERO || subtotal.is_zero() {
        return Percent::zero();
    }

    raw_tax
        .checked_div(subtotal)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(Percent::new)
        .unwrap_or_else(|| {
            tracing::warn!(%raw_tax, %subtotal, "blended tax rate overflowed, using 0%");
            Percent::zero()
        })
}

/// Computes subtotal, document discount, tax and total for a list of lines.
///
/// `global_discount_percent` is the document-level discount; pass `0` when
/// there is none. It accepts any [`Numeric`], with non-numbers meaning 0%.
///
/// ## Example
/// ```rust
/// use factura_core::totals::compute_document_totals;
/// use factura_core::types::{LineItem, Percent};
/// use rust_decimal::Decimal;
///
/// let items = vec![LineItem::new(
///     "Consulting",
///     Decimal::from(2),
///     Decimal::from(100),
///     Percent::from_int(19),
/// )];
///
/// let totals = compute_document_totals(&items, 10);
/// assert_eq!(totals.subtotal.to_string(), "200.000");
/// assert_eq!(totals.discount_amount.to_string(), "20.000");
/// assert_eq!(totals.tax_amount.to_string(), "34.200");
/// assert_eq!(totals.total.to_string(), "214.200");
/// ```
pub fn compute_document_totals(
    items: &[LineItem],
    global_discount_percent: impl Numeric,
) -> DocumentTotals {
    let global_discount = Percent::new(global_discount_percent.or_zero());

    let mut subtotal = Decimal::ZERO;
    let mut raw_tax = Decimal::ZERO;
    for item in items {
        let net = line_net(item.quantity, item.unit_price, item.discount_percent);
        subtotal = subtotal.saturating_add(net);
        raw_tax = raw_tax.saturating_add(line_tax(net, item.tax_rate));
    }
    let subtotal = round3(subtotal);

    let discount_amount = round3(global_discount.apply(subtotal));
    let discounted_subtotal = subtotal.saturating_sub(discount_amount);

    let effective_rate = blended_tax_rate(raw_tax, subtotal);
    let tax_amount = round3(effective_rate.apply(discounted_subtotal));
    let total = round3(discounted_subtotal.saturating_add(tax_amount));

    tracing::trace!(
        lines = items.len(),
        %subtotal,
        %discount_amount,
        %effective_rate,
        %tax_amount,
        %total,
        "document totals computed"
    );

    DocumentTotals {
        subtotal: Money::from_decimal(subtotal),
        discount_amount: Money::from_decimal(discount_amount),
        tax_amount: Money::from_decimal(tax_amount),
        total: Money::from_decimal(total),
    }
}

// =============================================================================
// Calculator Bound to a Configuration
// =============================================================================

/// The totals functions bound to one currency configuration.
///
/// Built once at startup and shared; it holds no mutable state, so one
/// instance can serve every editor and report concurrently.
///
/// ## Usage
/// ```rust
/// use factura_core::currency::CurrencyConfig;
/// use factura_core::totals::TotalsCalculator;
///
/// let calculator = TotalsCalculator::new(CurrencyConfig::default());
/// let line = calculator.blank_line();
/// let totals = calculator.document_totals(&[line], 0);
/// assert_eq!(calculator.format_currency(totals.total), "0,000 DT");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TotalsCalculator {
    config: CurrencyConfig,
}

impl TotalsCalculator {
    /// Binds the calculator to a configuration.
    pub fn new(config: CurrencyConfig) -> Self {
        TotalsCalculator { config }
    }

    /// Returns the bound configuration.
    pub fn config(&self) -> &CurrencyConfig {
        &self.config
    }

    /// See [`compute_line_total`].
    pub fn line_total(
        &self,
        quantity: impl Numeric,
        unit_price: impl Numeric,
        discount_percent: impl Numeric,
    ) -> Money {
        compute_line_total(quantity, unit_price, discount_percent)
    }

    /// See [`compute_document_totals`].
    pub fn document_totals(
        &self,
        items: &[LineItem],
        global_discount_percent: impl Numeric,
    ) -> DocumentTotals {
        compute_document_totals(items, global_discount_percent)
    }

    /// Formats an amount with the bound currency.
    pub fn format_currency(&self, amount: impl Numeric) -> String {
        self.config.format_currency(amount)
    }

    /// A new empty row carrying the configured default tax rate.
    pub fn blank_line(&self) -> LineItem {
        LineItem::blank(self.config.default_tax_rate)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, unit_price: Decimal, tax: Decimal, discount: Decimal) -> LineItem {
        LineItem::new("item", quantity, unit_price, Percent::new(tax))
            .with_discount(Percent::new(discount))
    }

    fn millimes(totals: &DocumentTotals) -> (i64, i64, i64, i64) {
        (
            totals.subtotal.millimes(),
            totals.discount_amount.millimes(),
            totals.tax_amount.millimes(),
            totals.total.millimes(),
        )
    }

    // -------------------------------------------------------------------------
    // Line totals
    // -------------------------------------------------------------------------

    #[test]
    fn test_line_total_without_discount() {
        assert_eq!(compute_line_total(dec!(2), dec!(100), 0).millimes(), 200_000);
    }

    #[test]
    fn test_line_total_rounds_discount_first() {
        // raw 3 × 3.333 = 9.999, 15% = 1.49985 → 1.500, net 8.499
        let total = compute_line_total(dec!(3), dec!(3.333), dec!(15));
        assert_eq!(total.millimes(), 8_499);
    }

    #[test]
    fn test_line_total_rounds_half_away_from_zero() {
        // 0.5 × 0.001 = 0.0005 → 0.001
        assert_eq!(compute_line_total(dec!(0.5), dec!(0.001), 0).millimes(), 1);
    }

    #[test]
    fn test_line_total_discount_over_100_goes_negative() {
        let total = compute_line_total(dec!(1), dec!(100), dec!(150));
        assert_eq!(total.millimes(), -50_000);
    }

    #[test]
    fn test_line_total_invalid_inputs_are_zero() {
        assert!(compute_line_total(f64::NAN, 10, 0).is_zero());
        assert!(compute_line_total(2, "abc", 0).is_zero());
        assert_eq!(compute_line_total(2, 10, "oops").millimes(), 20_000);
        assert_eq!(compute_line_total(2, 10, None::<f64>).millimes(), 20_000);
    }

    #[test]
    fn test_line_total_with_tax() {
        let line = item(dec!(2), dec!(100), dec!(19), dec!(10));
        // net 180.000, tax 34.200
        assert_eq!(line_total_with_tax(&line).millimes(), 214_200);
        assert_eq!(compute_line_tax(&line).millimes(), 34_200);
    }

    // -------------------------------------------------------------------------
    // Document totals
    // -------------------------------------------------------------------------

    #[test]
    fn test_empty_document_is_zero() {
        let totals = compute_document_totals(&[], 0);
        assert_eq!(totals, DocumentTotals::zero());

        let totals = compute_document_totals(&[], 25);
        assert_eq!(totals, DocumentTotals::zero());
    }

    #[test]
    fn test_single_line_no_global_discount() {
        let items = [item(dec!(2), dec!(100.000), dec!(19), dec!(0))];
        let totals = compute_document_totals(&items, 0);
        assert_eq!(millimes(&totals), (200_000, 0, 38_000, 238_000));
    }

    #[test]
    fn test_single_line_with_global_discount() {
        let items = [item(dec!(2), dec!(100.000), dec!(19), dec!(0))];
        let totals = compute_document_totals(&items, 10);
        assert_eq!(millimes(&totals), (200_000, 20_000, 34_200, 214_200));
        assert_eq!(totals.discounted_subtotal().millimes(), 180_000);
    }

    #[test]
    fn test_mixed_rates_use_blended_rate() {
        let items = [
            item(dec!(1), dec!(100), dec!(0), dec!(0)),
            item(dec!(1), dec!(100), dec!(19), dec!(0)),
        ];

        assert_eq!(blended_tax_rate(dec!(19), dec!(200)).value(), dec!(9.5));

        let totals = compute_document_totals(&items, 0);
        assert_eq!(millimes(&totals), (200_000, 0, 19_000, 219_000));

        // With 10% off: 180 × 9.5% = 17.100, applied to the whole base even
        // though half of it came from an untaxed line.
        let totals = compute_document_totals(&items, 10);
        assert_eq!(millimes(&totals), (200_000, 20_000, 17_100, 197_100));
    }

    #[test]
    fn test_blended_rate_differs_from_naive_line_sum() {
        // Three lines of 0.010 at 15%: each line tax 0.0015 rounds up to 0.002
        let items: Vec<LineItem> = (0..3)
            .map(|_| item(dec!(1), dec!(0.010), dec!(15), dec!(0)))
            .collect();

        // raw tax 0.006 on a 0.030 subtotal: the blended rate is 20%, not 15%
        assert_eq!(blended_tax_rate(dec!(0.006), dec!(0.030)).value(), dec!(20));

        let totals = compute_document_totals(&items, 0);
        assert_eq!(millimes(&totals), (30, 0, 6, 36));

        // Σ line × (1 + rate) rounded once would give 0.035
        let naive = round3(
            items
                .iter()
                .map(|i| compute_line_total(i.quantity, i.unit_price, 0).to_decimal() * dec!(1.15))
                .sum::<Decimal>(),
        );
        assert_eq!(naive, dec!(0.035));
        assert_ne!(totals.total.to_decimal(), naive);

        // Half off: tax is 20% of the discounted 0.015, not 15%
        let totals = compute_document_totals(&items, 50);
        assert_eq!(millimes(&totals), (30, 15, 3, 18));
    }

    #[test]
    fn test_rounding_accumulates_per_line() {
        // Each line: 1 × 0.0015 → 0.002 (rounded up individually)
        let items: Vec<LineItem> = (0..10)
            .map(|_| item(dec!(1), dec!(0.0015), dec!(0), dec!(0)))
            .collect();
        let totals = compute_document_totals(&items, 0);
        // 10 × 0.002, not round3(10 × 0.0015) = 0.015
        assert_eq!(totals.subtotal.millimes(), 20);
    }

    #[test]
    fn test_full_global_discount_zeroes_everything() {
        let items = [
            item(dec!(2), dec!(100), dec!(19), dec!(0)),
            item(dec!(5), dec!(12.345), dec!(7), dec!(5)),
        ];
        let totals = compute_document_totals(&items, 100);
        assert_eq!(totals.discount_amount, totals.subtotal);
        assert!(totals.discounted_subtotal().is_zero());
        assert!(totals.tax_amount.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_zero_subtotal_with_tax_does_not_divide_by_zero() {
        // A taxed +100 line and an untaxed -100 line (200% discount):
        // raw tax is 19 but the subtotal is zero
        let items = [
            item(dec!(1), dec!(100), dec!(19), dec!(0)),
            item(dec!(1), dec!(100), dec!(0), dec!(200)),
        ];
        let totals = compute_document_totals(&items, 0);
        assert!(totals.subtotal.is_zero());
        assert!(totals.tax_amount.is_zero());
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_negative_tax_rate_yields_no_blended_tax() {
        let items = [item(dec!(1), dec!(100), dec!(-5), dec!(0))];
        let totals = compute_document_totals(&items, 0);
        assert!(totals.tax_amount.is_zero());
        assert_eq!(totals.total.millimes(), 100_000);
    }

    #[test]
    fn test_invalid_global_discount_is_zero() {
        let items = [item(dec!(2), dec!(100), dec!(19), dec!(0))];
        assert_eq!(
            compute_document_totals(&items, f64::NAN),
            compute_document_totals(&items, 0)
        );
        assert_eq!(
            compute_document_totals(&items, "n/a"),
            compute_document_totals(&items, 0)
        );
    }

    #[test]
    fn test_totals_are_idempotent() {
        let items = [
            item(dec!(1.5), dec!(19.999), dec!(19), dec!(3)),
            item(dec!(7), dec!(0.333), dec!(7), dec!(0)),
        ];
        let first = compute_document_totals(&items, dec!(4.5));
        let second = compute_document_totals(&items, dec!(4.5));
        assert_eq!(first, second);
    }

    #[test]
    fn test_total_invariant_holds() {
        let items = [
            item(dec!(1.5), dec!(19.999), dec!(19), dec!(3)),
            item(dec!(7), dec!(0.333), dec!(7), dec!(0)),
            item(dec!(12), dec!(4.005), dec!(13), dec!(12.5)),
        ];
        for discount in [0, 5, 10, 33, 50, 99, 100] {
            let t = compute_document_totals(&items, discount);
            assert_eq!(t.total, t.subtotal - t.discount_amount + t.tax_amount);
        }
    }

    #[test]
    fn test_calculator_uses_bound_config() {
        let calculator = TotalsCalculator::default();
        assert_eq!(calculator.blank_line().tax_rate, Percent::from_int(19));
        assert_eq!(calculator.line_total(2, 100, 0).millimes(), 200_000);
        assert_eq!(calculator.format_currency(238), "238,000 DT");
    }
}
