//! # Document Summary
//!
//! Turns a JSON document into the printed summary.
//!
//! ## Input Shape
//! ```json
//! {
//!   "kind": "invoice",
//!   "client_id": "550e8400-e29b-41d4-a716-446655440000",
//!   "global_discount": 10,
//!   "items": [
//!     { "description": "Conseil", "quantity": 2, "unit_price": "100", "tax_rate": 19 }
//!   ],
//!   "payments": []
//! }
//! ```
//! Every numeric field is lenient: strings, nulls and garbage count as zero.

use std::fmt::Write as _;

use factura_core::draft::LineSummary;
use factura_core::numeric;
use factura_core::{
    DocumentDraft, DocumentKind, LineItem, Money, Payment, PaymentSummary, Percent, TotalsCalculator,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::CliResult;

/// A document as read from the input file.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentInput {
    #[serde(default)]
    pub kind: DocumentKind,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "numeric::lenient")]
    pub global_discount: Decimal,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// What the command was asked to do with the document.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Replaces the document's own global discount.
    pub discount_override: Option<Decimal>,
    /// Runs the save checks first and fails on the first problem.
    pub validate: bool,
}

impl DocumentInput {
    pub fn from_json(json: &str) -> CliResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn into_draft(self, calculator: &TotalsCalculator, options: &RenderOptions) -> DocumentDraft {
        let discount = options.discount_override.unwrap_or(self.global_discount);
        let draft = DocumentDraft::from_lines(
            self.kind,
            calculator.config().default_tax_rate,
            self.items,
            Percent::new(discount),
        );
        match self.client_id {
            Some(client_id) => draft.with_client(client_id),
            None => draft,
        }
    }
}

/// Renders the summary text for one document.
pub fn render(
    calculator: &TotalsCalculator,
    mut input: DocumentInput,
    options: &RenderOptions,
) -> CliResult<String> {
    let payments = std::mem::take(&mut input.payments);
    let draft = input.into_draft(calculator, options);

    if options.validate {
        draft.validate_for_save().map_err(factura_core::CoreError::from)?;
    }

    let totals = draft.totals();
    let money = |amount: Money| calculator.format_currency(amount);

    let mut out = String::new();
    let _ = writeln!(out, "Document: {}", draft.kind);
    if let Some(client_id) = &draft.client_id {
        let _ = writeln!(out, "Client:   {}", client_id);
    }
    let _ = writeln!(out);

    for (i, (line, amounts)) in draft.lines().iter().zip(draft.line_summaries()).enumerate() {
        render_line(&mut out, calculator, i + 1, line, &amounts);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{:<20}{:>20}", "Sous-total HT", money(totals.subtotal));
    if !draft.global_discount().is_zero() {
        let label = format!("Remise ({})", draft.global_discount());
        let _ = writeln!(out, "{:<20}{:>20}", label, money(-totals.discount_amount));
    }
    let _ = writeln!(out, "{:<20}{:>20}", "TVA", money(totals.tax_amount));
    let _ = writeln!(out, "{:<20}{:>20}", "Total TTC", money(totals.total));

    if !payments.is_empty() {
        let summary = PaymentSummary::new(totals.total, &payments);
        let _ = writeln!(out, "{:<20}{:>20}", "Payé", money(summary.total_paid));
        let _ = writeln!(out, "{:<20}{:>20}", "Reste à payer", money(summary.remaining));
    }

    tracing::info!(
        kind = %draft.kind,
        lines = draft.line_count(),
        total = %totals.total,
        "Document summarized"
    );

    Ok(out)
}

fn render_line(
    out: &mut String,
    calculator: &TotalsCalculator,
    number: usize,
    line: &LineItem,
    amounts: &LineSummary,
) {
    let config = calculator.config();
    let _ = write!(
        out,
        "{:>3}. {} x {} @ {}",
        number,
        config.format_number(line.quantity, 3),
        calculator.format_currency(line.unit_price),
        line.tax_rate,
    );
    if !line.discount_percent.is_zero() {
        let _ = write!(out, " -{}", line.discount_percent);
    }
    let _ = writeln!(
        out,
        "  {}  =  {}",
        line.description,
        calculator.format_currency(amounts.gross)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use factura_core::CurrencyConfig;

    fn calculator() -> TotalsCalculator {
        TotalsCalculator::new(CurrencyConfig::default())
    }

    const SCENARIO_B: &str = r#"{
        "kind": "invoice",
        "client_id": "550e8400-e29b-41d4-a716-446655440000",
        "global_discount": "10",
        "items": [
            {"description": "Conseil", "quantity": 2, "unit_price": 100, "tax_rate": 19}
        ]
    }"#;

    #[test]
    fn test_render_totals() {
        let input = DocumentInput::from_json(SCENARIO_B).unwrap();
        let text = render(&calculator(), input, &RenderOptions::default()).unwrap();

        assert!(text.contains("Document: invoice"));
        assert!(text.contains("200,000 DT"));
        assert!(text.contains("Remise (10%)"));
        assert!(text.contains("-20,000 DT"));
        assert!(text.contains("34,200 DT"));
        assert!(text.contains("214,200 DT"));
        assert!(!text.contains("Reste à payer"));
    }

    #[test]
    fn test_discount_override() {
        let input = DocumentInput::from_json(SCENARIO_B).unwrap();
        let options = RenderOptions {
            discount_override: Some(Decimal::ZERO),
            validate: false,
        };
        let text = render(&calculator(), input, &options).unwrap();
        assert!(text.contains("238,000 DT"));
        assert!(!text.contains("Remise"));
    }

    #[test]
    fn test_remaining_balance() {
        let json = r#"{
            "kind": "invoice",
            "items": [{"description": "Audit", "quantity": 1, "unit_price": 100, "tax_rate": 19}],
            "payments": [
                {"id": "p1", "invoice_id": "i1", "amount": "100", "payment_date": "2025-04-02"}
            ]
        }"#;
        let input = DocumentInput::from_json(json).unwrap();
        let text = render(&calculator(), input, &RenderOptions::default()).unwrap();
        assert!(text.contains("Payé"));
        assert!(text.contains("19,000 DT"));
    }

    #[test]
    fn test_validate_rejects_missing_client() {
        let json = r#"{"kind": "purchase_order", "items": [{"description": "Papier"}]}"#;
        let input = DocumentInput::from_json(json).unwrap();
        let options = RenderOptions {
            discount_override: None,
            validate: true,
        };
        let err = render(&calculator(), input, &options).unwrap_err();
        assert!(matches!(err, CliError::Core(_)));
    }

    #[test]
    fn test_empty_document_has_one_blank_line() {
        let input = DocumentInput::from_json("{}").unwrap();
        let text = render(&calculator(), input, &RenderOptions::default()).unwrap();
        assert!(text.contains("  1. "));
        assert!(text.contains("0,000 DT"));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            DocumentInput::from_json("{not json"),
            Err(CliError::Json(_))
        ));
    }
}
