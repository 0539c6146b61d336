//! Repository for the `change_orders` table.

use coflow_core::status::ChangeOrderStatus;
use coflow_core::types::DbId;
use sqlx::PgPool;

use crate::filters::{contains_pattern, ChangeOrderFilter};
use crate::models::change_order::{
    ChangeOrder, ChangeOrderListing, CreateChangeOrder, UpdateChangeOrder,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, co_number, title, description, justification, \
    additional_info, status, cost_impact, time_impact_days, labor_hours, labor_rate, \
    labor_overhead_pct, labor_notes, total_labor_cost, total_overhead_cost, total_cost, \
    original_image_url, ocr_text, delay_notice_ref, created_by, created_at, updated_at";

/// Columns for [`ChangeOrderListing`], joined against `projects p`.
pub(crate) const LISTING_COLUMNS: &str = "co.id, co.project_id, co.co_number, co.title, \
    co.status, p.project_number, p.name AS project_name, co.created_at";

/// Provides CRUD operations for change orders.
pub struct ChangeOrderRepo;

impl ChangeOrderRepo {
    /// Insert a new change order, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateChangeOrder,
    ) -> Result<ChangeOrder, sqlx::Error> {
        let query = format!(
            "INSERT INTO change_orders (
                project_id, co_number, title, description, justification, additional_info,
                status, cost_impact, time_impact_days, labor_hours, labor_rate,
                labor_overhead_pct, labor_notes, total_labor_cost, total_overhead_cost,
                total_cost, delay_notice_ref, created_by
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChangeOrder>(&query)
            .bind(input.project_id)
            .bind(&input.co_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.justification)
            .bind(&input.additional_info)
            .bind(input.status.as_str())
            .bind(input.cost_impact)
            .bind(input.time_impact_days)
            .bind(input.labor_hours)
            .bind(input.labor_rate)
            .bind(input.labor_overhead_pct)
            .bind(&input.labor_notes)
            .bind(input.total_labor_cost)
            .bind(input.total_overhead_cost)
            .bind(input.total_cost)
            .bind(&input.delay_notice_ref)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a change order by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ChangeOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM change_orders WHERE id = $1");
        sqlx::query_as::<_, ChangeOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List change orders with their project number and name.
    ///
    /// `q` matches CO number, title, or project number case-insensitively.
    pub async fn list(
        pool: &PgPool,
        filter: &ChangeOrderFilter,
    ) -> Result<Vec<ChangeOrderListing>, sqlx::Error> {
        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM change_orders co
             JOIN projects p ON p.id = co.project_id
             WHERE ($1::TEXT IS NULL
                    OR co.co_number ILIKE $1
                    OR co.title ILIKE $1
                    OR p.project_number ILIKE $1)
               AND ($2::TEXT IS NULL OR co.status = $2)
             ORDER BY {} {}, co.id",
            filter.sort.column(),
            filter.dir.sql(),
        );
        sqlx::query_as::<_, ChangeOrderListing>(&query)
            .bind(filter.q.as_deref().map(contains_pattern))
            .bind(filter.status.map(ChangeOrderStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// List all change orders for a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ChangeOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM change_orders
             WHERE project_id = $1
             ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, ChangeOrder>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a change order. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateChangeOrder,
    ) -> Result<Option<ChangeOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE change_orders SET
                project_id = COALESCE($2, project_id),
                co_number = COALESCE($3, co_number),
                title = COALESCE($4, title),
                description = COALESCE($5, description),
                justification = COALESCE($6, justification),
                additional_info = COALESCE($7, additional_info),
                status = COALESCE($8, status),
                cost_impact = COALESCE($9, cost_impact),
                time_impact_days = COALESCE($10, time_impact_days),
                labor_hours = COALESCE($11, labor_hours),
                labor_rate = COALESCE($12, labor_rate),
                labor_overhead_pct = COALESCE($13, labor_overhead_pct),
                labor_notes = COALESCE($14, labor_notes),
                total_labor_cost = COALESCE($15, total_labor_cost),
                total_overhead_cost = COALESCE($16, total_overhead_cost),
                total_cost = COALESCE($17, total_cost),
                delay_notice_ref = COALESCE($18, delay_notice_ref)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChangeOrder>(&query)
            .bind(id)
            .bind(input.project_id)
            .bind(&input.co_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.justification)
            .bind(&input.additional_info)
            .bind(input.status.map(ChangeOrderStatus::as_str))
            .bind(input.cost_impact)
            .bind(input.time_impact_days)
            .bind(input.labor_hours)
            .bind(input.labor_rate)
            .bind(input.labor_overhead_pct)
            .bind(&input.labor_notes)
            .bind(input.total_labor_cost)
            .bind(input.total_overhead_cost)
            .bind(input.total_cost)
            .bind(&input.delay_notice_ref)
            .fetch_optional(pool)
            .await
    }

    /// Set the status only. Returns `None` if the change order is missing.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ChangeOrderStatus,
    ) -> Result<Option<ChangeOrder>, sqlx::Error> {
        let query = format!("UPDATE change_orders SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, ChangeOrder>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Store the uploaded image location and its recognized text.
    pub async fn save_ocr_result(
        pool: &PgPool,
        id: DbId,
        image_url: &str,
        ocr_text: &str,
    ) -> Result<Option<ChangeOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE change_orders SET original_image_url = $2, ocr_text = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChangeOrder>(&query)
            .bind(id)
            .bind(image_url)
            .bind(ocr_text)
            .fetch_optional(pool)
            .await
    }

    /// Delete a change order and its line items. Returns `true` if a row
    /// was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM change_orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
