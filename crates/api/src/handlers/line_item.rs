//! Line-item form actions, nested under a change order.
//!
//! Every action takes the parent change-order id from the path and
//! redirects back to that change order. Totals follow
//! [`coflow_core::line_item`]: inserts always persist a concrete total,
//! updates recompute it only when an amount changes.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::Form;
use coflow_core::coerce::{non_blank, parse_int, parse_number};
use coflow_core::line_item::{self, ItemAmounts};
use coflow_core::types::DbId;
use coflow_core::validation;
use coflow_db::models::line_item::{ChangeOrderItem, CreateLineItem, UpdateLineItem};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::flash::{ActionResult, Flash, OrFlash};
use crate::state::AppState;

/// Submitted line-item fields. Numeric text that does not parse is absent.
#[derive(Debug, Default, Deserialize)]
pub struct LineItemForm {
    pub description: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub unit_price: Option<String>,
    pub total_price: Option<String>,
    pub sort_order: Option<String>,
}

impl LineItemForm {
    fn amounts(&self) -> ItemAmounts {
        ItemAmounts::new(
            parse_number(self.quantity.as_deref()),
            parse_number(self.unit_price.as_deref()),
            parse_number(self.total_price.as_deref()),
        )
    }
}

/// Fetch an item, treating one that belongs to another change order as missing.
async fn owned_item(state: &AppState, co_id: DbId, id: DbId) -> AppResult<ChangeOrderItem> {
    state
        .store
        .get_line_item(id)
        .await?
        .filter(|item| item.change_order_id == co_id)
        .ok_or_else(|| AppError::not_found("Line item", id))
}

/// POST /actions/change-orders/{id}/items
pub async fn add(
    State(state): State<AppState>,
    Path(co_id): Path<DbId>,
    form: Result<Form<LineItemForm>, FormRejection>,
) -> ActionResult {
    let back = format!("/change-orders/{co_id}");
    let Form(form) = form.or_flash(&back)?;
    let description = validation::required_text(form.description.as_deref(), "Description is required")
        .or_flash(&back)?;
    let amounts = form.amounts();

    let input = CreateLineItem {
        change_order_id: co_id,
        description,
        quantity: amounts.quantity,
        unit: non_blank(form.unit.as_deref()),
        unit_price: amounts.unit_price,
        total_price: Some(line_item::total_for_insert(&amounts)),
        sort_order: parse_int(form.sort_order.as_deref()),
    };
    let item = state.store.create_line_item(&input).await.or_flash(&back)?;

    tracing::info!(change_order_id = %co_id, item_id = %item.id, total = ?item.total_price, "Line item added");
    Ok(Flash::success(back, "Line item added"))
}

/// POST /actions/change-orders/{id}/items/{item_id}
pub async fn update(
    State(state): State<AppState>,
    Path((co_id, id)): Path<(DbId, DbId)>,
    form: Result<Form<LineItemForm>, FormRejection>,
) -> ActionResult {
    let back = format!("/change-orders/{co_id}");
    let Form(form) = form.or_flash(&back)?;
    let stored = owned_item(&state, co_id, id).await.or_flash(&back)?;
    let patch = form.amounts();

    let input = UpdateLineItem {
        description: non_blank(form.description.as_deref()),
        quantity: patch.quantity,
        unit: non_blank(form.unit.as_deref()),
        unit_price: patch.unit_price,
        total_price: line_item::total_for_update(&patch, &stored.amounts()),
        sort_order: parse_int(form.sort_order.as_deref()),
    };
    state
        .store
        .update_line_item(id, &input)
        .await
        .or_flash(&back)?
        .ok_or_else(|| AppError::not_found("Line item", id))
        .or_flash(&back)?;

    tracing::info!(change_order_id = %co_id, item_id = %id, "Line item updated");
    Ok(Flash::success(back, "Line item updated"))
}

/// POST /actions/change-orders/{id}/items/{item_id}/delete
pub async fn delete(
    State(state): State<AppState>,
    Path((co_id, id)): Path<(DbId, DbId)>,
) -> ActionResult {
    let back = format!("/change-orders/{co_id}");
    owned_item(&state, co_id, id).await.or_flash(&back)?;
    state.store.delete_line_item(id).await.or_flash(&back)?;

    tracing::info!(change_order_id = %co_id, item_id = %id, "Line item deleted");
    Ok(Flash::success(back, "Line item deleted"))
}
