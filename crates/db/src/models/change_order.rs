//! Change-order entity model, list read model, and DTOs.

use coflow_core::rollup::CostFields;
use coflow_core::status::ChangeOrderStatus;
use coflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `change_orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChangeOrder {
    pub id: DbId,
    pub project_id: DbId,
    pub co_number: String,
    pub title: String,
    pub description: String,
    /// "Reasons for changes" narrative.
    pub justification: Option<String>,
    pub additional_info: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ChangeOrderStatus,
    pub cost_impact: Option<f64>,
    pub time_impact_days: Option<i32>,
    pub labor_hours: Option<f64>,
    pub labor_rate: Option<f64>,
    /// Fraction, not percent: `0.15` means 15%.
    pub labor_overhead_pct: Option<f64>,
    pub labor_notes: Option<String>,
    pub total_labor_cost: Option<f64>,
    pub total_overhead_cost: Option<f64>,
    pub total_cost: Option<f64>,
    pub original_image_url: Option<String>,
    pub ocr_text: Option<String>,
    /// Free-text reference to a delay notice; not a foreign key.
    pub delay_notice_ref: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChangeOrder {
    /// The fields the financial roll-up reads.
    pub fn cost_fields(&self) -> CostFields {
        CostFields {
            cost_impact: self.cost_impact,
            labor_hours: self.labor_hours,
            labor_rate: self.labor_rate,
            labor_overhead_pct: self.labor_overhead_pct,
            total_labor_cost: self.total_labor_cost,
            total_overhead_cost: self.total_overhead_cost,
            total_cost: self.total_cost,
        }
    }
}

/// A change order joined with its project's number and name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChangeOrderListing {
    pub id: DbId,
    pub project_id: DbId,
    pub co_number: String,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub status: ChangeOrderStatus,
    pub project_number: String,
    pub project_name: String,
    pub created_at: Timestamp,
}

/// DTO for creating a change order.
#[derive(Debug, Clone, Default)]
pub struct CreateChangeOrder {
    pub project_id: DbId,
    pub co_number: String,
    pub title: String,
    pub description: String,
    pub justification: Option<String>,
    pub additional_info: Option<String>,
    pub status: ChangeOrderStatus,
    pub cost_impact: Option<f64>,
    pub time_impact_days: Option<i32>,
    pub labor_hours: Option<f64>,
    pub labor_rate: Option<f64>,
    pub labor_overhead_pct: Option<f64>,
    pub labor_notes: Option<String>,
    pub total_labor_cost: Option<f64>,
    pub total_overhead_cost: Option<f64>,
    pub total_cost: Option<f64>,
    pub delay_notice_ref: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for patching a change order. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateChangeOrder {
    pub project_id: Option<DbId>,
    pub co_number: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub justification: Option<String>,
    pub additional_info: Option<String>,
    pub status: Option<ChangeOrderStatus>,
    pub cost_impact: Option<f64>,
    pub time_impact_days: Option<i32>,
    pub labor_hours: Option<f64>,
    pub labor_rate: Option<f64>,
    pub labor_overhead_pct: Option<f64>,
    pub labor_notes: Option<String>,
    pub total_labor_cost: Option<f64>,
    pub total_overhead_cost: Option<f64>,
    pub total_cost: Option<f64>,
    pub delay_notice_ref: Option<String>,
}
