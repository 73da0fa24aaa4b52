//! # Document Draft
//!
//! The editing model behind both the invoice form and the purchase-order
//! form. It holds the rows being typed and recomputes totals through the
//! shared calculator on every read.
//!
//! ## Draft Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Operations                                     │
//! │                                                                         │
//! │  Form Action              Draft Method              State Change        │
//! │  ───────────              ────────────              ────────────        │
//! │                                                                         │
//! │  Click "Add line" ───────► add_line() ─────────────► lines.push(blank) │
//! │                                                                         │
//! │  Pick a product ─────────► add_product() ──────────► lines.push(snap)  │
//! │                                                                         │
//! │  Edit a cell ────────────► update_line(i, upd) ────► lines[i].field = v│
//! │                                                                         │
//! │  Click remove ───────────► remove_line(i) ─────────► lines.remove(i)   │
//! │                            (refused on the last row)                    │
//! │                                                                         │
//! │  Edit global discount ───► set_global_discount() ──► global_discount   │
//! │                                                                         │
//! │  Render footer ──────────► totals() ───────────────► (read only)       │
//! │                                                                         │
//! │  Click save ─────────────► validate_for_save() ────► (read only)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::numeric::Numeric;
use crate::totals::{compute_document_totals, compute_line_tax, compute_line_total};
use crate::types::{DocumentKind, DocumentTotals, LineItem, Percent, Product};
use crate::validation::{self, ValidationResult};

// =============================================================================
// Line Updates
// =============================================================================

/// Which cell of a row is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    Description,
    Quantity,
    UnitPrice,
    TaxRate,
    DiscountPercent,
}

/// A single-cell edit of a row.
#[derive(Debug, Clone, PartialEq)]
pub enum LineUpdate {
    Description(String),
    Quantity(Decimal),
    UnitPrice(Decimal),
    TaxRate(Percent),
    DiscountPercent(Percent),
}

impl LineUpdate {
    /// Builds an update from the raw text of a form input.
    ///
    /// Numeric cells that do not parse become zero, the same as an empty
    /// input box.
    pub fn from_input(field: LineField, raw: &str) -> Self {
        match field {
            LineField::Description => LineUpdate::Description(raw.to_string()),
            LineField::Quantity => LineUpdate::Quantity(raw.or_zero()),
            LineField::UnitPrice => LineUpdate::UnitPrice(raw.or_zero()),
            LineField::TaxRate => LineUpdate::TaxRate(Percent::new(raw.or_zero())),
            LineField::DiscountPercent => LineUpdate::DiscountPercent(Percent::new(raw.or_zero())),
        }
    }

    fn apply(self, line: &mut LineItem) {
        match self {
            LineUpdate::Description(value) => line.description = value,
            LineUpdate::Quantity(value) => line.quantity = value,
            LineUpdate::UnitPrice(value) => line.unit_price = value,
            LineUpdate::TaxRate(value) => line.tax_rate = value,
            LineUpdate::DiscountPercent(value) => line.discount_percent = value,
        }
    }
}

// =============================================================================
// Line Summary
// =============================================================================

/// Amounts shown next to one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineSummary {
    /// Discounted amount before tax.
    #[ts(type = "string")]
    pub net: Money,
    /// Tax at the row's own rate.
    #[ts(type = "string")]
    pub tax: Money,
    /// `net + tax`.
    #[ts(type = "string")]
    pub gross: Money,
}

impl From<&LineItem> for LineSummary {
    fn from(line: &LineItem) -> Self {
        let net = compute_line_total(line.quantity, line.unit_price, line.discount_percent.value());
        let tax = compute_line_tax(line);
        LineSummary {
            net,
            tax,
            gross: net + tax,
        }
    }
}

// =============================================================================
// Document Draft
// =============================================================================

/// An invoice or purchase order being edited.
///
/// ## Invariants
/// - There is always at least one line
/// - Totals are never cached: [`totals`](Self::totals) recomputes them
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct DocumentDraft {
    pub kind: DocumentKind,

    /// Client id; purchase orders are addressed to a client too.
    pub client_id: Option<String>,

    lines: Vec<LineItem>,

    #[ts(type = "string")]
    global_discount: Percent,

    #[ts(type = "string")]
    default_tax_rate: Percent,
}

impl DocumentDraft {
    /// Creates a draft holding one blank row.
    pub fn new(kind: DocumentKind, default_tax_rate: Percent) -> Self {
        DocumentDraft {
            kind,
            client_id: None,
            lines: vec![LineItem::blank(default_tax_rate)],
            global_discount: Percent::zero(),
            default_tax_rate,
        }
    }

    /// Loads a stored document for editing.
    ///
    /// An empty line list gets one blank row so the invariant holds.
    pub fn from_lines(
        kind: DocumentKind,
        default_tax_rate: Percent,
        lines: Vec<LineItem>,
        global_discount: Percent,
    ) -> Self {
        let mut draft = DocumentDraft {
            kind,
            client_id: None,
            lines,
            global_discount,
            default_tax_rate,
        };
        if draft.lines.is_empty() {
            draft.lines.push(LineItem::blank(default_tax_rate));
        }
        draft
    }

    /// Sets the client.
    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// The rows, in entry order.
    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Number of rows.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Document-level discount.
    pub fn global_discount(&self) -> Percent {
        self.global_discount
    }

    /// Appends a blank row and returns its index.
    pub fn add_line(&mut self) -> usize {
        self.lines.push(LineItem::blank(self.default_tax_rate));
        self.lines.len() - 1
    }

    /// Appends a row filled from a catalog product and returns its index.
    pub fn add_product(&mut self, product: &Product, quantity: Decimal) -> usize {
        self.lines.push(LineItem::from_product(product, quantity));
        self.lines.len() - 1
    }

    /// Edits one cell of a row.
    pub fn update_line(&mut self, index: usize, update: LineUpdate) -> CoreResult<()> {
        let len = self.lines.len();
        let line = self
            .lines
            .get_mut(index)
            .ok_or(CoreError::LineNotFound { index, len })?;
        update.apply(line);
        Ok(())
    }

    /// Removes a row. The last remaining row cannot be removed.
    pub fn remove_line(&mut self, index: usize) -> CoreResult<LineItem> {
        let len = self.lines.len();
        if index >= len {
            return Err(CoreError::LineNotFound { index, len });
        }
        if len == 1 {
            return Err(CoreError::LastLine);
        }
        Ok(self.lines.remove(index))
    }

    /// Sets the document-level discount. Anything non-numeric means 0%.
    pub fn set_global_discount(&mut self, percent: impl Numeric) {
        self.global_discount = Percent::new(percent.or_zero());
    }

    /// Current totals, computed by the shared calculator.
    pub fn totals(&self) -> DocumentTotals {
        compute_document_totals(&self.lines, self.global_discount.value())
    }

    /// Per-row amounts, in row order.
    pub fn line_summaries(&self) -> Vec<LineSummary> {
        self.lines.iter().map(LineSummary::from).collect()
    }

    /// Checks what the form checks before saving.
    ///
    /// ## Rules
    /// - A client must be selected (valid UUID)
    /// - Every row needs a description and in-range numbers
    /// - The global discount must be within 0..=100
    pub fn validate_for_save(&self) -> ValidationResult<()> {
        match self.client_id.as_deref() {
            Some(id) => validation::validate_uuid("client", id)?,
            None => {
                return Err(ValidationError::Required {
                    field: "client".to_string(),
                })
            }
        }

        for line in &self.lines {
            validation::validate_line_item(line)?;
        }

        validation::validate_discount_percent("global_discount", self.global_discount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CLIENT: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn draft(kind: DocumentKind) -> DocumentDraft {
        DocumentDraft::new(kind, Percent::from_int(19)).with_client(CLIENT)
    }

    fn fill(draft: &mut DocumentDraft, index: usize, qty: Decimal, price: Decimal) {
        draft
            .update_line(index, LineUpdate::Description("Service".to_string()))
            .unwrap();
        draft.update_line(index, LineUpdate::Quantity(qty)).unwrap();
        draft.update_line(index, LineUpdate::UnitPrice(price)).unwrap();
    }

    #[test]
    fn test_new_draft_has_one_blank_line() {
        let draft = draft(DocumentKind::Invoice);
        assert_eq!(draft.line_count(), 1);
        assert_eq!(draft.lines()[0].tax_rate, Percent::from_int(19));
        assert_eq!(draft.totals(), DocumentTotals::zero());
    }

    #[test]
    fn test_totals_follow_edits() {
        let mut draft = draft(DocumentKind::Invoice);
        fill(&mut draft, 0, dec!(2), dec!(100));
        assert_eq!(draft.totals().total.millimes(), 238_000);

        draft.set_global_discount(10);
        assert_eq!(draft.totals().total.millimes(), 214_200);

        draft
            .update_line(0, LineUpdate::from_input(LineField::TaxRate, "0"))
            .unwrap();
        assert_eq!(draft.totals().total.millimes(), 180_000);
    }

    #[test]
    fn test_invoice_and_purchase_order_agree() {
        let mut invoice = draft(DocumentKind::Invoice);
        let mut order = draft(DocumentKind::PurchaseOrder);
        for d in [&mut invoice, &mut order] {
            fill(d, 0, dec!(3), dec!(12.345));
            let i = d.add_line();
            fill(d, i, dec!(1.5), dec!(80));
            d.update_line(i, LineUpdate::DiscountPercent(Percent::from_int(5)))
                .unwrap();
            d.set_global_discount(dec!(7.5));
        }
        assert_eq!(invoice.totals(), order.totals());
    }

    #[test]
    fn test_from_input_coerces_garbage() {
        let mut draft = draft(DocumentKind::Invoice);
        draft
            .update_line(0, LineUpdate::from_input(LineField::Quantity, "abc"))
            .unwrap();
        assert_eq!(draft.lines()[0].quantity, Decimal::ZERO);

        draft
            .update_line(0, LineUpdate::from_input(LineField::UnitPrice, "12,5"))
            .unwrap();
        // a comma stops the number, like a browser number input
        assert_eq!(draft.lines()[0].unit_price, dec!(12));
    }

    #[test]
    fn test_update_missing_line() {
        let mut draft = draft(DocumentKind::Invoice);
        let err = draft
            .update_line(3, LineUpdate::Quantity(dec!(1)))
            .unwrap_err();
        assert!(matches!(err, CoreError::LineNotFound { index: 3, len: 1 }));
    }

    #[test]
    fn test_cannot_remove_last_line() {
        let mut draft = draft(DocumentKind::Invoice);
        assert!(matches!(draft.remove_line(0), Err(CoreError::LastLine)));

        draft.add_line();
        assert!(draft.remove_line(1).is_ok());
        assert_eq!(draft.line_count(), 1);
        assert!(matches!(
            draft.remove_line(5),
            Err(CoreError::LineNotFound { index: 5, len: 1 })
        ));
    }

    #[test]
    fn test_add_product_line() {
        let product = Product {
            id: "p-1".to_string(),
            user_id: "u-1".to_string(),
            name: "Licence".to_string(),
            description: None,
            unit_price: Money::from_major(50),
            tax_rate: Percent::from_int(7),
            unit: "unité".to_string(),
            is_active: true,
        };
        let mut draft = draft(DocumentKind::PurchaseOrder);
        fill(&mut draft, 0, dec!(1), dec!(100));
        let index = draft.add_product(&product, dec!(2));
        assert_eq!(index, 1);

        // 100 @19% + 100 @7% → raw tax 26, total 226
        assert_eq!(draft.totals().total.millimes(), 226_000);
    }

    #[test]
    fn test_line_summaries() {
        let mut draft = draft(DocumentKind::Invoice);
        fill(&mut draft, 0, dec!(2), dec!(100));
        draft
            .update_line(0, LineUpdate::DiscountPercent(Percent::from_int(10)))
            .unwrap();

        let summaries = draft.line_summaries();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].net.millimes(), 180_000);
        assert_eq!(summaries[0].tax.millimes(), 34_200);
        assert_eq!(summaries[0].gross.millimes(), 214_200);
    }

    #[test]
    fn test_from_lines_keeps_one_line() {
        let draft = DocumentDraft::from_lines(
            DocumentKind::Invoice,
            Percent::from_int(19),
            Vec::new(),
            Percent::zero(),
        );
        assert_eq!(draft.line_count(), 1);
    }

    #[test]
    fn test_validate_for_save() {
        let mut draft = DocumentDraft::new(DocumentKind::Invoice, Percent::from_int(19));
        assert!(matches!(
            draft.validate_for_save(),
            Err(ValidationError::Required { .. })
        ));

        draft.client_id = Some(CLIENT.to_string());
        // blank description
        assert!(draft.validate_for_save().is_err());

        fill(&mut draft, 0, dec!(1), dec!(10));
        assert!(draft.validate_for_save().is_ok());

        draft.set_global_discount(120);
        assert!(matches!(
            draft.validate_for_save(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_client_id() {
        let mut draft = DocumentDraft::new(DocumentKind::Invoice, Percent::from_int(19))
            .with_client("client-1");
        fill(&mut draft, 0, dec!(1), dec!(10));
        assert!(matches!(
            draft.validate_for_save(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
