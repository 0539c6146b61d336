//! Change-order financial roll-up.
//!
//! Combines line items, labor, and overhead into a [`FinancialSummary`].
//! Every concern prefers a value the user entered directly over a derived
//! one. The computation is pure and infallible: missing inputs make a
//! figure undefined (`None`), which is excluded from display rather than
//! shown as zero.

use serde::Serialize;

use crate::format;
use crate::line_item::ItemAmounts;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// The cost-related fields of a change order. Any subset may be set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostFields {
    pub cost_impact: Option<f64>,
    pub labor_hours: Option<f64>,
    pub labor_rate: Option<f64>,
    /// Stored as a fraction (`0.15` for 15%).
    pub labor_overhead_pct: Option<f64>,
    pub total_labor_cost: Option<f64>,
    pub total_overhead_cost: Option<f64>,
    pub total_cost: Option<f64>,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Label of the grand-total row.
pub const GRAND_TOTAL_LABEL: &str = "Recorded Total";

/// Derived cost summary for one change order. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub item_count: usize,
    pub line_items_total: f64,
    pub labor_subtotal: Option<f64>,
    pub overhead: Option<f64>,
    pub grand_total: f64,
    /// `false` when the change order carries no financial data at all.
    pub visible: bool,
}

/// One labelled, formatted summary figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    pub amount: f64,
    pub display: String,
}

impl SummaryRow {
    fn new(label: &'static str, amount: f64) -> Self {
        Self {
            label,
            amount,
            display: format::currency_or_absent(Some(amount)),
        }
    }
}

impl FinancialSummary {
    /// Breakdown rows in display order. Undefined figures and an empty
    /// line-item list produce no row. The grand total is not included;
    /// see [`FinancialSummary::grand_total_row`].
    pub fn rows(&self) -> Vec<SummaryRow> {
        let mut rows = Vec::with_capacity(3);
        if self.item_count > 0 {
            rows.push(SummaryRow::new("Line Items", self.line_items_total));
        }
        if let Some(labor) = self.labor_subtotal {
            rows.push(SummaryRow::new("Labor Subtotal", labor));
        }
        if let Some(overhead) = self.overhead {
            rows.push(SummaryRow::new("Overhead", overhead));
        }
        rows
    }

    pub fn grand_total_row(&self) -> SummaryRow {
        SummaryRow::new(GRAND_TOTAL_LABEL, self.grand_total)
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Sum of line totals (stored total, else quantity x unit price).
pub fn line_items_total(items: &[ItemAmounts]) -> f64 {
    items.iter().map(ItemAmounts::line_total).sum()
}

/// Labor subtotal: stored total, else hours x rate when both are known.
pub fn labor_subtotal(fields: &CostFields) -> Option<f64> {
    fields.total_labor_cost.or(match (fields.labor_hours, fields.labor_rate) {
        (Some(hours), Some(rate)) => Some(hours * rate),
        _ => None,
    })
}

/// Overhead: stored total, else subtotal x percentage when both are known.
pub fn overhead(fields: &CostFields, labor_subtotal: Option<f64>) -> Option<f64> {
    fields
        .total_overhead_cost
        .or(match (labor_subtotal, fields.labor_overhead_pct) {
            (Some(subtotal), Some(pct)) => Some(subtotal * pct),
            _ => None,
        })
}

/// Compute the full summary for a change order and its items.
pub fn summarize(fields: &CostFields, items: &[ItemAmounts]) -> FinancialSummary {
    let line_items_total = line_items_total(items);
    let labor_subtotal = labor_subtotal(fields);
    let overhead = overhead(fields, labor_subtotal);

    let grand_total = fields.total_cost.or(fields.cost_impact).unwrap_or_else(|| {
        line_items_total + labor_subtotal.unwrap_or(0.0) + overhead.unwrap_or(0.0)
    });

    let visible = !items.is_empty()
        || labor_subtotal.is_some()
        || overhead.is_some()
        || fields.total_cost.is_some()
        || fields.cost_impact.is_some();

    FinancialSummary {
        item_count: items.len(),
        line_items_total,
        labor_subtotal,
        overhead,
        grand_total,
        visible,
    }
}

/// Whether the separate labor block (hours, rate, overhead %, notes) has
/// anything to show.
pub fn labor_section_visible(fields: &CostFields, labor_notes: Option<&str>) -> bool {
    fields.total_cost.is_some()
        || fields.labor_hours.is_some()
        || fields.labor_rate.is_some()
        || labor_notes.is_some_and(|n| !n.trim().is_empty())
}
