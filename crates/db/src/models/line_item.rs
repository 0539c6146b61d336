//! Change-order line item model and DTOs.

use coflow_core::line_item::ItemAmounts;
use coflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `change_order_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChangeOrderItem {
    pub id: DbId,
    pub change_order_id: DbId,
    pub description: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub total_price: Option<f64>,
    pub sort_order: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChangeOrderItem {
    pub fn amounts(&self) -> ItemAmounts {
        ItemAmounts::new(self.quantity, self.unit_price, self.total_price)
    }
}

/// DTO for inserting a line item.
///
/// `total_price` is already back-filled by the caller; `sort_order`
/// defaults to one past the current maximum for the change order.
#[derive(Debug, Clone)]
pub struct CreateLineItem {
    pub change_order_id: DbId,
    pub description: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub total_price: Option<f64>,
    pub sort_order: Option<i32>,
}

/// DTO for patching a line item. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateLineItem {
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub unit_price: Option<f64>,
    pub total_price: Option<f64>,
    pub sort_order: Option<i32>,
}
