//! # factura-core: Document Totals and Business Rules for Factura
//!
//! Everything Factura computes about an invoice or purchase order lives here:
//! line and document totals, currency display, the line editor, payment
//! balances and revenue reports. All of it is pure and synchronous.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Factura Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Web front end / factura-cli                     │   │
//! │  │   Invoice form ──► PO form ──► Payments ──► Reports ──► PDF    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ factura-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  totals  │ │ currency │ │  draft   │ │ reporting│          │   │
//! │  │   │ line net │ │ format   │ │ add/edit │ │ by month │          │   │
//! │  │   │ blended  │ │ parse    │ │ remove   │ │ by client│          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │   money · numeric · types · payments · validation · error      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NEVER PANICS ON INPUT    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ persisted totals                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              Storage backend (external collaborator)            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` in thousandths, 3-decimal rounding
//! - [`numeric`] - lenient number coercion (garbage becomes zero)
//! - [`types`] - line items, totals, statuses, payments, products
//! - [`totals`] - the line and document totals calculator
//! - [`currency`] - currency config, formatting and parsing
//! - [`draft`] - editable document model shared by invoices and orders
//! - [`payments`] - paid / remaining balance
//! - [`reporting`] - revenue report and dashboard counters
//! - [`validation`] - form rules checked before saving
//! - [`error`] - domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use factura_core::{compute_document_totals, CurrencyConfig, LineItem, Percent};
//! use rust_decimal::Decimal;
//!
//! let items = vec![LineItem::new("Conseil", Decimal::from(2), Decimal::from(100), Percent::from_int(19))];
//! let totals = compute_document_totals(&items, 10);
//!
//! let config = CurrencyConfig::default();
//! assert_eq!(config.format_currency(totals.total), "214,200 DT");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod currency;
pub mod draft;
pub mod error;
pub mod money;
pub mod numeric;
pub mod payments;
pub mod reporting;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use currency::CurrencyConfig;
pub use draft::{DocumentDraft, LineField, LineUpdate};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use numeric::Numeric;
pub use payments::PaymentSummary;
pub use reporting::{DashboardStats, DateRange, InvoiceRecord, RevenueReport};
pub use totals::{compute_document_totals, compute_line_total, TotalsCalculator};
pub use types::*;
