//! Change-order document composition.
//!
//! Sections without data are left out entirely. Labor and summary figures
//! come from [`coflow_core::rollup`], the same calculation the JSON detail
//! endpoint uses.

use chrono::NaiveDate;
use coflow_core::format;
use coflow_core::line_item::ItemAmounts;
use coflow_core::rollup::{self, CostFields};

use crate::layout::{paginate, Align, Block, Column, Table, TextStyle};
use crate::render::render;
use crate::PdfError;

/// One row of the line-items table.
#[derive(Debug, Clone, Default)]
pub struct PdfLineItem {
    pub description: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub total_price: Option<f64>,
}

impl PdfLineItem {
    fn amounts(&self) -> ItemAmounts {
        ItemAmounts::new(self.quantity, self.unit_price, self.total_price)
    }
}

/// Everything printed on a change-order PDF.
#[derive(Debug, Clone, Default)]
pub struct ChangeOrderPdfData {
    pub company_name: String,
    pub co_number: String,
    pub title: String,
    pub project_number: Option<String>,
    pub project_name: String,
    pub description: String,
    pub justification: Option<String>,
    pub additional_info: Option<String>,
    pub delay_notice_ref: Option<String>,
    pub time_impact_days: Option<i32>,
    pub updated_on: Option<NaiveDate>,
    /// Includes `cost_impact`.
    pub costs: CostFields,
    pub labor_notes: Option<String>,
    pub line_items: Vec<PdfLineItem>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn heading(blocks: &mut Vec<Block>, title: &str) {
    blocks.push(Block::Space(14.0));
    blocks.push(Block::text(title.to_uppercase(), TextStyle::HEADING));
    blocks.push(Block::Space(4.0));
}

/// Lay out the document as a flat list of blocks.
pub fn compose(data: &ChangeOrderPdfData) -> Vec<Block> {
    let mut blocks = Vec::new();
    let amounts: Vec<ItemAmounts> = data.line_items.iter().map(PdfLineItem::amounts).collect();
    let summary = rollup::summarize(&data.costs, &amounts);

    // -- header --
    blocks.push(Block::text(data.title.clone(), TextStyle::TITLE));
    blocks.push(Block::text(
        format!("Prepared by {}", data.company_name),
        TextStyle::MUTED,
    ));
    blocks.push(Block::Rule);

    // -- summary --
    heading(&mut blocks, "Summary");
    let co_line = format!("Change Order: {}", data.co_number);
    match present(&data.project_number) {
        Some(number) => blocks.push(Block::row(co_line, format!("Project #{number}"), TextStyle::BODY)),
        None => blocks.push(Block::text(co_line, TextStyle::BODY)),
    }
    blocks.push(Block::text(data.project_name.clone(), TextStyle::BODY));
    if let Some(reference) = present(&data.delay_notice_ref) {
        blocks.push(Block::text(
            format!("Related Delay Notice: {reference}"),
            TextStyle::MUTED,
        ));
    }
    blocks.push(Block::Space(6.0));
    if let Some(cost) = data.costs.cost_impact {
        blocks.push(Block::text(
            format!("Cost Impact: {}", format::currency(cost)),
            TextStyle::BODY,
        ));
    }
    if let Some(days) = data.time_impact_days {
        blocks.push(Block::text(
            format!("Schedule Impact: {days} day(s)"),
            TextStyle::BODY,
        ));
    }
    if let Some(date) = data.updated_on {
        blocks.push(Block::text(
            format!("Updated: {}", date.format("%-m/%-d/%Y")),
            TextStyle::BODY,
        ));
    }

    // -- narrative --
    let description = Some(data.description.clone());
    let narrative: Vec<(&str, TextStyle)> = [
        (present(&description), TextStyle::BODY),
        (present(&data.justification), TextStyle::BODY),
        (present(&data.additional_info), TextStyle::MUTED),
    ]
    .into_iter()
    .filter_map(|(text, style)| text.map(|t| (t, style)))
    .collect();
    if !narrative.is_empty() {
        heading(&mut blocks, "Narrative");
        for (i, (text, style)) in narrative.into_iter().enumerate() {
            if i > 0 {
                blocks.push(Block::Space(8.0));
            }
            blocks.push(Block::text(text, style));
        }
    }

    // -- labor --
    if rollup::labor_section_visible(&data.costs, data.labor_notes.as_deref()) {
        heading(&mut blocks, "Labor & Costs");
        if let Some(hours) = data.costs.labor_hours {
            blocks.push(Block::text(
                format!("Total Man-Hours: {}", format::hours(hours)),
                TextStyle::BODY,
            ));
        }
        if let Some(rate) = data.costs.labor_rate {
            blocks.push(Block::text(
                format!("Hourly Rate: {}", format::currency(rate)),
                TextStyle::BODY,
            ));
        }
        if let Some(pct) = data.costs.labor_overhead_pct {
            blocks.push(Block::text(
                format!("Overhead: {}", format::percent(pct)),
                TextStyle::BODY,
            ));
        }
        if let Some(notes) = present(&data.labor_notes) {
            blocks.push(Block::Space(6.0));
            blocks.push(Block::text(notes, TextStyle::BODY));
        }
        blocks.push(Block::Space(10.0));
        if let Some(subtotal) = summary.labor_subtotal {
            blocks.push(Block::row("Labor Subtotal", format::currency(subtotal), TextStyle::BODY));
        }
        if let Some(overhead) = summary.overhead {
            blocks.push(Block::row("Overhead", format::currency(overhead), TextStyle::BODY));
        }
        blocks.push(Block::row(
            "Total Change Order",
            format::currency(summary.grand_total),
            TextStyle::STRONG,
        ));
    }

    // -- line items --
    if !data.line_items.is_empty() {
        heading(&mut blocks, "Line Items");
        blocks.push(Block::Table(line_item_table(&data.line_items)));
    }

    // -- financial summary --
    if summary.visible {
        heading(&mut blocks, "Financial Summary");
        for row in summary.rows() {
            blocks.push(Block::row(row.label, row.display, TextStyle::BODY));
        }
        let total = summary.grand_total_row();
        blocks.push(Block::row(total.label, total.display, TextStyle::STRONG));
    }

    blocks
}

fn line_item_table(items: &[PdfLineItem]) -> Table {
    let column = |title, weight, align| Column {
        title,
        weight,
        align,
    };
    Table {
        columns: vec![
            column("Description", 3.0, Align::Left),
            column("Qty", 1.0, Align::Right),
            column("Unit", 1.0, Align::Left),
            column("Unit Price", 1.0, Align::Right),
            column("Total", 1.0, Align::Right),
        ],
        rows: items
            .iter()
            .map(|item| {
                vec![
                    item.description.clone(),
                    item.quantity.map(format::quantity).unwrap_or_default(),
                    item.unit.clone().unwrap_or_default(),
                    item.unit_price.map(format::currency).unwrap_or_default(),
                    format::currency_or_absent(Some(item.amounts().line_total())),
                ]
            })
            .collect(),
    }
}

/// Compose, paginate, and serialize a change order.
pub fn render_change_order(data: &ChangeOrderPdfData) -> Result<Vec<u8>, PdfError> {
    let pages = paginate(&compose(data));
    tracing::debug!(co_number = %data.co_number, pages = pages.len(), "Rendering change order PDF");
    render(&pages)
}
