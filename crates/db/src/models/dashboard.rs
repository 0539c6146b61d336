//! Dashboard read model.

use serde::Serialize;

use crate::models::change_order::ChangeOrderListing;

/// Headline counts plus the most recent change orders.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub project_count: i64,
    pub change_order_count: i64,
    pub pending_change_order_count: i64,
    pub recent_change_orders: Vec<ChangeOrderListing>,
}
