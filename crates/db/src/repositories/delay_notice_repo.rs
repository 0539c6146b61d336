//! Repository for the `delay_notices` table.

use coflow_core::status::DelayNoticeStatus;
use coflow_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::filters::{contains_pattern, DelayNoticeFilter};
use crate::models::delay_notice::{CreateDelayNotice, DelayNotice};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, description, incident_date, reported_date, \
    time_impact_days_estimate, recipients, status, emailed_at, created_by, created_at, updated_at";

/// Provides create, read, and status operations for delay notices.
pub struct DelayNoticeRepo;

impl DelayNoticeRepo {
    /// Insert a new delay notice in `draft` status.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDelayNotice,
    ) -> Result<DelayNotice, sqlx::Error> {
        let query = format!(
            "INSERT INTO delay_notices (
                project_id, title, description, incident_date, reported_date,
                time_impact_days_estimate, recipients, created_by
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DelayNotice>(&query)
            .bind(input.project_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.incident_date)
            .bind(input.reported_date)
            .bind(input.time_impact_days_estimate)
            .bind(&input.recipients)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a delay notice by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DelayNotice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM delay_notices WHERE id = $1");
        sqlx::query_as::<_, DelayNotice>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List delay notices newest first. `q` matches title or description.
    pub async fn list(
        pool: &PgPool,
        filter: &DelayNoticeFilter,
    ) -> Result<Vec<DelayNotice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM delay_notices
             WHERE ($1::TEXT IS NULL OR title ILIKE $1 OR description ILIKE $1)
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY created_at DESC, id"
        );
        sqlx::query_as::<_, DelayNotice>(&query)
            .bind(filter.q.as_deref().map(contains_pattern))
            .bind(filter.status.map(DelayNoticeStatus::as_str))
            .fetch_all(pool)
            .await
    }

    /// Mark a notice as sent at `at`. Returns `None` if it does not exist.
    pub async fn mark_sent(
        pool: &PgPool,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<DelayNotice>, sqlx::Error> {
        let query = format!(
            "UPDATE delay_notices SET status = $2, emailed_at = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DelayNotice>(&query)
            .bind(id)
            .bind(DelayNoticeStatus::Sent.as_str())
            .bind(at)
            .fetch_optional(pool)
            .await
    }
}
