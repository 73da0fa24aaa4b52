//! # Domain Types
//!
//! Core domain types shared by the invoice and purchase-order editors, the
//! payment view and the reports.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │ DocumentTotals  │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  description    │   │  subtotal       │   │  invoice_id     │       │
//! │  │  quantity       │   │  discount_amount│   │  amount         │       │
//! │  │  unit_price     │   │  tax_amount     │   │  payment_date   │       │
//! │  │  tax_rate       │   │  total          │   │  payment_method │       │
//! │  │  discount_pct   │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Percent      │   │ InvoiceStatus   │   │ PaymentMethod   │       │
//! │  │  19 = 19%       │   │  brouillon ...  │   │  especes ...    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! Enum variants serialize to the exact strings the storage backend already
//! holds (`"payée"`, `"virement"`, ...), so rows load without a mapping table.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::money::Money;
use crate::numeric;

// =============================================================================
// Percent
// =============================================================================

/// A percentage such as a tax rate or a discount, `19` meaning 19%.
///
/// ## Why Decimal?
/// Rates like 7.5% or 13.33% must survive exactly; `Decimal` keeps the
/// digits that were typed. Nothing is rounded until the rate is applied.
///
/// Deserialization is lenient: a missing, null or non-numeric rate is 0%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a percentage from a decimal (`19.5` = 19.5%).
    #[inline]
    pub const fn new(value: Decimal) -> Self {
        Percent(value)
    }

    /// Creates a whole-number percentage.
    #[inline]
    pub fn from_int(value: i64) -> Self {
        Percent(Decimal::from(value))
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(Decimal::ZERO)
    }

    /// One hundred percent.
    #[inline]
    pub const fn hundred() -> Self {
        Percent(Decimal::ONE_HUNDRED)
    }

    /// Returns the percentage value (`19` for 19%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `amount × self / 100`, unrounded.
    pub fn apply(&self, amount: Decimal) -> Decimal {
        amount.saturating_mul(self.0) / Decimal::ONE_HUNDRED
    }
}

impl From<Decimal> for Percent {
    fn from(value: Decimal) -> Self {
        Percent(value)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        numeric::lenient(deserializer).map(Percent)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One row of an invoice or purchase order.
///
/// ## Defaults
/// Every numeric field defaults to zero when absent, so a partially filled
/// form row still produces totals. `discount_percent` is almost always
/// absent on older rows.
///
/// ## Line Workflow
/// ```text
/// Form row ──► LineItem ──► compute_line_total ──► line net (pre-tax)
///                                    │
///                                    └──► net × tax_rate ──► line tax
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Free-text description printed on the document.
    #[serde(default)]
    pub description: String,

    /// Quantity, may be fractional (hours, kilograms).
    #[serde(default, deserialize_with = "numeric::lenient")]
    #[ts(type = "string")]
    pub quantity: Decimal,

    /// Unit price, excluding tax.
    #[serde(default, deserialize_with = "numeric::lenient")]
    #[ts(type = "string")]
    pub unit_price: Decimal,

    /// Tax rate applied to this line (19 = 19%).
    #[serde(default)]
    #[ts(type = "string")]
    pub tax_rate: Percent,

    /// Line discount applied before tax.
    #[serde(default)]
    #[ts(type = "string")]
    pub discount_percent: Percent,
}

impl LineItem {
    /// Creates a line with no discount.
    pub fn new(
        description: impl Into<String>,
        quantity: Decimal,
        unit_price: Decimal,
        tax_rate: Percent,
    ) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            unit_price,
            tax_rate,
            discount_percent: Percent::zero(),
        }
    }

    /// The empty row an editor starts with: quantity 1, price 0, default tax.
    pub fn blank(default_tax_rate: Percent) -> Self {
        LineItem::new(String::new(), Decimal::ONE, Decimal::ZERO, default_tax_rate)
    }

    /// Creates a line from a catalog product.
    ///
    /// ## Price Freezing
    /// The price and tax rate are copied. Later catalog edits do not change
    /// documents that already use the product.
    pub fn from_product(product: &Product, quantity: Decimal) -> Self {
        LineItem::new(
            product.name.clone(),
            quantity,
            product.unit_price.to_decimal(),
            product.tax_rate,
        )
    }

    /// Sets the line discount.
    pub fn with_discount(mut self, discount_percent: Percent) -> Self {
        self.discount_percent = discount_percent;
        self
    }
}

// =============================================================================
// Document Totals
// =============================================================================

/// The four amounts shown under every invoice and purchase order.
///
/// ## Invariant
/// `total == subtotal - discount_amount + tax_amount`, exactly, because all
/// four are whole thousandths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentTotals {
    /// Sum of discounted line amounts, before the document discount and tax.
    #[ts(type = "string")]
    pub subtotal: Money,

    /// Document-level discount taken off the subtotal.
    #[ts(type = "string")]
    pub discount_amount: Money,

    /// Tax after the document discount.
    #[ts(type = "string")]
    pub tax_amount: Money,

    /// Amount due.
    #[ts(type = "string")]
    pub total: Money,
}

impl DocumentTotals {
    /// All-zero totals (empty document).
    pub const fn zero() -> Self {
        DocumentTotals {
            subtotal: Money::zero(),
            discount_amount: Money::zero(),
            tax_amount: Money::zero(),
            total: Money::zero(),
        }
    }

    /// Subtotal after the document discount, before tax.
    #[inline]
    pub fn discounted_subtotal(&self) -> Money {
        self.subtotal - self.discount_amount
    }
}

// =============================================================================
// Document Kinds and Statuses
// =============================================================================

/// Which editor a document belongs to. Both use the same calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Invoice,
    PurchaseOrder,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Invoice => write!(f, "invoice"),
            DocumentKind::PurchaseOrder => write!(f, "purchase order"),
        }
    }
}

/// The commercial nature of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum InvoiceType {
    /// Regular invoice.
    #[default]
    #[serde(rename = "facture")]
    Invoice,
    /// Quote, not yet binding.
    #[serde(rename = "devis")]
    Quote,
    /// Credit note.
    #[serde(rename = "avoir")]
    CreditNote,
    /// Supplementary invoice.
    #[serde(rename = "complementaire")]
    Supplementary,
}

impl InvoiceType {
    /// Label printed on the document.
    pub const fn label(&self) -> &'static str {
        match self {
            InvoiceType::Invoice => "Facture",
            InvoiceType::Quote => "Devis",
            InvoiceType::CreditNote => "Avoir",
            InvoiceType::Supplementary => "Complémentaire",
        }
    }
}

/// Lifecycle of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum InvoiceStatus {
    #[default]
    #[serde(rename = "brouillon")]
    Draft,
    #[serde(rename = "envoyée")]
    Sent,
    #[serde(rename = "payée")]
    Paid,
    #[serde(rename = "en_retard")]
    Overdue,
    #[serde(rename = "annulée")]
    Cancelled,
}

impl InvoiceStatus {
    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Brouillon",
            InvoiceStatus::Sent => "Envoyée",
            InvoiceStatus::Paid => "Payée",
            InvoiceStatus::Overdue => "En retard",
            InvoiceStatus::Cancelled => "Annulée",
        }
    }

    /// Drafts and sent invoices are still awaiting payment.
    pub const fn is_pending(&self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Sent)
    }
}

/// Lifecycle of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    #[default]
    Draft,
    Sent,
    Confirmed,
    Delivered,
    Cancelled,
}

impl PurchaseOrderStatus {
    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Draft => "Brouillon",
            PurchaseOrderStatus::Sent => "Envoyé",
            PurchaseOrderStatus::Confirmed => "Confirmé",
            PurchaseOrderStatus::Delivered => "Livré",
            PurchaseOrderStatus::Cancelled => "Annulé",
        }
    }
}

// =============================================================================
// Payment
// =============================================================================

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PaymentMethod {
    #[serde(rename = "especes")]
    Cash,
    #[serde(rename = "cheque")]
    Cheque,
    #[default]
    #[serde(rename = "virement")]
    BankTransfer,
    #[serde(rename = "carte")]
    Card,
    #[serde(rename = "prelevement")]
    DirectDebit,
    #[serde(rename = "autre")]
    Other,
}

impl PaymentMethod {
    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Espèces",
            PaymentMethod::Cheque => "Chèque",
            PaymentMethod::BankTransfer => "Virement bancaire",
            PaymentMethod::Card => "Carte bancaire",
            PaymentMethod::DirectDebit => "Prélèvement",
            PaymentMethod::Other => "Autre",
        }
    }
}

/// A payment recorded against an invoice.
/// An invoice can be settled by several partial payments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    #[ts(type = "string")]
    pub amount: Money,
    #[ts(as = "String")]
    pub payment_date: NaiveDate,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Cheque number, transfer reference, etc.
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product that can be dropped onto a document line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub id: String,
    /// Owning user (all backend rows are scoped by user).
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price excluding tax.
    #[ts(type = "string")]
    pub unit_price: Money,
    #[serde(default)]
    #[ts(type = "string")]
    pub tax_rate: Percent,
    /// Unit of measure ("unité", "heure", "kg").
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_unit() -> String {
    "unité".to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_apply() {
        let rate = Percent::new(dec!(19));
        assert_eq!(rate.apply(dec!(200)), dec!(38));
        assert_eq!(Percent::zero().apply(dec!(200)), dec!(0));
        assert_eq!(rate.to_string(), "19%");
        assert_eq!(Percent::new(dec!(7.50)).to_string(), "7.5%");
    }

    #[test]
    fn test_line_item_missing_fields_default_to_zero() {
        let item: LineItem = serde_json::from_str(r#"{"description": "Conseil"}"#).unwrap();
        assert_eq!(item.quantity, Decimal::ZERO);
        assert_eq!(item.unit_price, Decimal::ZERO);
        assert!(item.tax_rate.is_zero());
        assert!(item.discount_percent.is_zero());
    }

    #[test]
    fn test_line_item_lenient_numbers() {
        let item: LineItem = serde_json::from_str(
            r#"{"description": "x", "quantity": "2", "unit_price": 100.5,
                "tax_rate": null, "discount_percent": "abc"}"#,
        )
        .unwrap();
        assert_eq!(item.quantity, dec!(2));
        assert_eq!(item.unit_price, dec!(100.5));
        assert!(item.tax_rate.is_zero());
        assert!(item.discount_percent.is_zero());
    }

    #[test]
    fn test_blank_line() {
        let line = LineItem::blank(Percent::from_int(19));
        assert_eq!(line.quantity, Decimal::ONE);
        assert_eq!(line.unit_price, Decimal::ZERO);
        assert_eq!(line.tax_rate, Percent::from_int(19));
        assert!(line.description.is_empty());
    }

    #[test]
    fn test_line_from_product_freezes_price() {
        let mut product = Product {
            id: "p-1".to_string(),
            user_id: "u-1".to_string(),
            name: "Audit".to_string(),
            description: None,
            unit_price: Money::from_millimes(150_250),
            tax_rate: Percent::from_int(7),
            unit: "heure".to_string(),
            is_active: true,
        };

        let line = LineItem::from_product(&product, dec!(3));
        product.unit_price = Money::from_major(999);

        assert_eq!(line.description, "Audit");
        assert_eq!(line.unit_price, dec!(150.250));
        assert_eq!(line.tax_rate, Percent::from_int(7));
    }

    #[test]
    fn test_status_wire_names() {
        let paid: InvoiceStatus = serde_json::from_str("\"payée\"").unwrap();
        assert_eq!(paid, InvoiceStatus::Paid);
        assert_eq!(
            serde_json::to_string(&InvoiceStatus::Overdue).unwrap(),
            "\"en_retard\""
        );
        assert_eq!(
            serde_json::to_string(&PurchaseOrderStatus::Delivered).unwrap(),
            "\"delivered\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::BankTransfer).unwrap(),
            "\"virement\""
        );
        assert_eq!(
            serde_json::to_string(&DocumentKind::PurchaseOrder).unwrap(),
            "\"purchase_order\""
        );
    }

    #[test]
    fn test_pending_statuses() {
        assert!(InvoiceStatus::Draft.is_pending());
        assert!(InvoiceStatus::Sent.is_pending());
        assert!(!InvoiceStatus::Paid.is_pending());
        assert!(!InvoiceStatus::Overdue.is_pending());
    }

    #[test]
    fn test_totals_discounted_subtotal() {
        let totals = DocumentTotals {
            subtotal: Money::from_major(200),
            discount_amount: Money::from_major(20),
            tax_amount: Money::from_millimes(34_200),
            total: Money::from_millimes(214_200),
        };
        assert_eq!(totals.discounted_subtotal(), Money::from_major(180));
    }
}
