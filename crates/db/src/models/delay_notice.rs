//! Delay-notice entity model and DTOs.

use chrono::NaiveDate;
use coflow_core::status::DelayNoticeStatus;
use coflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `delay_notices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DelayNotice {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub incident_date: NaiveDate,
    pub reported_date: Option<NaiveDate>,
    pub time_impact_days_estimate: Option<i32>,
    pub recipients: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: DelayNoticeStatus,
    pub emailed_at: Option<Timestamp>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a delay notice. Status always starts as draft.
#[derive(Debug, Clone)]
pub struct CreateDelayNotice {
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    pub incident_date: NaiveDate,
    pub reported_date: Option<NaiveDate>,
    pub time_impact_days_estimate: Option<i32>,
    pub recipients: Vec<String>,
    pub created_by: Option<DbId>,
}
