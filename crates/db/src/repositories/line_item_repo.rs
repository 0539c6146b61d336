//! Repository for the `change_order_items` table.

use coflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::line_item::{ChangeOrderItem, CreateLineItem, UpdateLineItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, change_order_id, description, quantity, unit, unit_price, \
    total_price, sort_order, created_at, updated_at";

/// Provides CRUD operations for change-order line items.
pub struct LineItemRepo;

impl LineItemRepo {
    /// Insert a line item. A missing `sort_order` appends it after the
    /// change order's current last item.
    pub async fn create(
        pool: &PgPool,
        input: &CreateLineItem,
    ) -> Result<ChangeOrderItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO change_order_items
                (change_order_id, description, quantity, unit, unit_price, total_price, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, (
                SELECT COALESCE(MAX(sort_order), 0) + 1
                FROM change_order_items WHERE change_order_id = $1
             )))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChangeOrderItem>(&query)
            .bind(input.change_order_id)
            .bind(&input.description)
            .bind(input.quantity)
            .bind(&input.unit)
            .bind(input.unit_price)
            .bind(input.total_price)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// Find a line item by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ChangeOrderItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM change_order_items WHERE id = $1");
        sqlx::query_as::<_, ChangeOrderItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a change order's items in display order.
    pub async fn list_by_change_order(
        pool: &PgPool,
        change_order_id: DbId,
    ) -> Result<Vec<ChangeOrderItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM change_order_items
             WHERE change_order_id = $1
             ORDER BY sort_order ASC NULLS LAST, created_at, id"
        );
        sqlx::query_as::<_, ChangeOrderItem>(&query)
            .bind(change_order_id)
            .fetch_all(pool)
            .await
    }

    /// Update a line item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLineItem,
    ) -> Result<Option<ChangeOrderItem>, sqlx::Error> {
        let query = format!(
            "UPDATE change_order_items SET
                description = COALESCE($2, description),
                quantity = COALESCE($3, quantity),
                unit = COALESCE($4, unit),
                unit_price = COALESCE($5, unit_price),
                total_price = COALESCE($6, total_price),
                sort_order = COALESCE($7, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChangeOrderItem>(&query)
            .bind(id)
            .bind(&input.description)
            .bind(input.quantity)
            .bind(&input.unit)
            .bind(input.unit_price)
            .bind(input.total_price)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    /// Delete a line item. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM change_order_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
