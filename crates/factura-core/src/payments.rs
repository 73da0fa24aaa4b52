//! # Payment Tracking
//!
//! Settlement state of an invoice from its recorded payments.
//!
//! ```text
//! invoice total ──────────────┐
//!                             ▼
//! payments ──► Σ amount ──► remaining = total − paid
//!                             │
//!                             ├── > 0  → partially paid / unpaid
//!                             ├── = 0  → settled
//!                             └── < 0  → overpaid
//! ```
//!
//! The stored invoice total is taken as-is; it is never recomputed here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{InvoiceStatus, Payment};

/// Paid and outstanding amounts of one invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentSummary {
    #[ts(type = "string")]
    pub total: Money,
    #[ts(type = "string")]
    pub total_paid: Money,
    #[ts(type = "string")]
    pub remaining: Money,
}

impl PaymentSummary {
    /// Sums the payments against the invoice total.
    ///
    /// ## Example
    /// ```rust
    /// use factura_core::money::Money;
    /// use factura_core::payments::PaymentSummary;
    ///
    /// let summary = PaymentSummary::new(Money::from_major(238), &[]);
    /// assert_eq!(summary.remaining, Money::from_major(238));
    /// ```
    pub fn new(total: Money, payments: &[Payment]) -> Self {
        let total_paid: Money = payments.iter().map(|p| p.amount).sum();
        let remaining = total - total_paid;

        tracing::trace!(
            total = %total,
            paid = %total_paid,
            remaining = %remaining,
            payments = payments.len(),
            "Payment summary"
        );

        PaymentSummary {
            total,
            total_paid,
            remaining,
        }
    }

    /// Nothing left to pay.
    pub fn is_settled(&self) -> bool {
        !self.remaining.is_positive()
    }

    /// More was received than invoiced.
    pub fn is_overpaid(&self) -> bool {
        self.remaining.is_negative()
    }

    /// Status the invoice should move to once payments are recorded.
    ///
    /// Returns `Some(Paid)` when settled; otherwise `None` and the current
    /// status stands. Cancelled invoices never change.
    pub fn suggested_status(&self, current: InvoiceStatus) -> Option<InvoiceStatus> {
        if current == InvoiceStatus::Cancelled || current == InvoiceStatus::Paid {
            return None;
        }
        self.is_settled().then_some(InvoiceStatus::Paid)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
