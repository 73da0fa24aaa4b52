//! # Revenue Reporting
//!
//! Aggregates over persisted invoices for the dashboard and reports pages.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  InvoiceRecord[] (stored totals)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DateRange::contains(invoice_date)      inclusive on both ends          │
//! │       │                                                                 │
//! │       ├──► totals: revenue, count, paid count, pending revenue         │
//! │       ├──► by_month: BTreeMap<(year, month)> → chronological            │
//! │       └──► by_client: name lookup, unknown clients skipped              │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │            sorted by total desc, share of revenue (1 dp)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Invoice totals are summed as stored. Tax is never re-derived here.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::InvoiceStatus;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

// =============================================================================
// Inputs
// =============================================================================

/// The subset of a stored invoice the reports read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceRecord {
    pub id: String,
    pub client_id: String,
    #[ts(as = "String")]
    pub invoice_date: NaiveDate,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[ts(type = "string")]
    pub total: Money,
}

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    #[ts(as = "String")]
    pub start: NaiveDate,
    #[ts(as = "String")]
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// First day of `today`'s month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        DateRange {
            start: today.with_day(1).unwrap_or(today),
            end: today,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// =============================================================================
// Report Rows
// =============================================================================

/// Revenue of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyRevenue {
    pub year: i32,
    pub month: u32,
    /// Short French label, e.g. `janv. 2025`.
    pub period: String,
    #[ts(type = "string")]
    pub revenue: Money,
    pub invoices: u32,
}

/// Revenue of one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientRevenue {
    pub client_id: String,
    pub name: String,
    #[ts(type = "string")]
    pub total: Money,
    pub invoices: u32,
    /// Share of the report's total revenue, one decimal place.
    #[ts(type = "string")]
    pub share_percent: Decimal,
}

/// Short French month label: `"janv. 2025"`, `"mai 2025"`.
pub fn month_label(year: i32, month: u32) -> String {
    let name = month
        .checked_sub(1)
        .and_then(|i| MONTH_ABBREVIATIONS.get(i as usize))
        .copied()
        .unwrap_or("?");
    format!("{} {}", name, year)
}

fn share_of(part: Money, whole: Money) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.to_decimal()
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(whole.to_decimal()))
        .map(|share| share.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
        .unwrap_or(Decimal::ZERO)
}

// =============================================================================
// Revenue Report
// =============================================================================

/// Reports page aggregate over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RevenueReport {
    #[ts(type = "string")]
    pub total_revenue: Money,
    pub total_invoices: u32,
    pub paid_invoices: u32,
    /// Everything not yet paid, including cancelled and overdue invoices.
    #[ts(type = "string")]
    pub pending_revenue: Money,
    pub by_month: Vec<MonthlyRevenue>,
    pub by_client: Vec<ClientRevenue>,
}

impl RevenueReport {
    /// Builds the report for the invoices dated within `range`.
    ///
    /// `client_names` maps client id to display name; invoices whose
    /// client is absent still count in every figure except `by_client`.
    pub fn build(
        invoices: &[InvoiceRecord],
        range: &DateRange,
        client_names: &HashMap<String, String>,
    ) -> Self {
        let in_range: Vec<&InvoiceRecord> = invoices
            .iter()
            .filter(|inv| range.contains(inv.invoice_date))
            .collect();

        let mut total_revenue = Money::zero();
        let mut pending_revenue = Money::zero();
        let mut paid_invoices = 0u32;
        let mut months: BTreeMap<(i32, u32), (Money, u32)> = BTreeMap::new();
        let mut clients: HashMap<&str, (Money, u32)> = HashMap::new();
        let mut skipped = 0usize;

        for inv in &in_range {
            total_revenue += inv.total;
            if inv.status == InvoiceStatus::Paid {
                paid_invoices += 1;
            } else {
                pending_revenue += inv.total;
            }

            let month = months
                .entry((inv.invoice_date.year(), inv.invoice_date.month()))
                .or_insert((Money::zero(), 0));
            month.0 += inv.total;
            month.1 += 1;

            if client_names.contains_key(&inv.client_id) {
                let client = clients
                    .entry(inv.client_id.as_str())
                    .or_insert((Money::zero(), 0));
                client.0 += inv.total;
                client.1 += 1;
            } else {
                skipped += 1;
            }
        }

        if skipped > 0 {
            tracing::debug!(skipped, "Invoices without a known client left out of by_client");
        }

        let by_month = months
            .into_iter()
            .map(|((year, month), (revenue, count))| MonthlyRevenue {
                year,
                month,
                period: month_label(year, month),
                revenue,
                invoices: count,
            })
            .collect();

        let mut by_client: Vec<ClientRevenue> = clients
            .into_iter()
            .filter_map(|(id, (total, count))| {
                client_names.get(id).map(|name| ClientRevenue {
                    client_id: id.to_string(),
                    name: name.clone(),
                    total,
                    invoices: count,
                    share_percent: share_of(total, total_revenue),
                })
            })
            .collect();
        by_client.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

        tracing::debug!(
            start = %range.start,
            end = %range.end,
            invoices = in_range.len(),
            revenue = %total_revenue,
            "Revenue report built"
        );

        RevenueReport {
            total_revenue,
            total_invoices: in_range.len() as u32,
            paid_invoices,
            pending_revenue,
            by_month,
            by_client,
        }
    }

    /// The `n` biggest clients.
    pub fn top_clients(&self, n: usize) -> &[ClientRevenue] {
        &self.by_client[..n.min(self.by_client.len())]
    }
}

// =============================================================================
// Dashboard
// =============================================================================

/// Headline counters of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardStats {
    #[ts(type = "string")]
    pub total_revenue: Money,
    /// Draft or sent.
    pub pending_invoices: u32,
    pub overdue_invoices: u32,
    pub paid_invoices: u32,
}

impl DashboardStats {
    pub fn from_invoices(invoices: &[InvoiceRecord]) -> Self {
        invoices
            .iter()
            .fold(DashboardStats::default(), |mut stats, inv| {
                stats.total_revenue += inv.total;
                match inv.status {
                    status if status.is_pending() => stats.pending_invoices += 1,
                    InvoiceStatus::Overdue => stats.overdue_invoices += 1,
                    InvoiceStatus::Paid => stats.paid_invoices += 1,
                    _ => {}
                }
                stats
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
