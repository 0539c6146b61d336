//! Handlers for the `/delay-notices` resource, including email dispatch.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use chrono::Utc;
use coflow_core::error::CoreError;
use coflow_core::types::DbId;
use coflow_core::validation;
use coflow_db::filters::DelayNoticeFilter;
use coflow_db::models::delay_notice::{CreateDelayNotice, DelayNotice};
use coflow_mail::notice::DelayNoticeEmail;
use coflow_mail::MailError;
use serde::Deserialize;

use super::created_by;
use crate::error::{AppError, AppResult};
use crate::flash::{ActionResult, Flash, OrFlash};
use crate::response::DataResponse;
use crate::state::AppState;

/// Submitted delay-notice fields. Every field arrives as optional text.
#[derive(Debug, Default, Deserialize)]
pub struct DelayNoticeForm {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub incident_date: Option<String>,
    pub reported_date: Option<String>,
    pub time_impact_days_estimate: Option<String>,
    /// Comma-separated addresses.
    pub recipients: Option<String>,
    pub created_by: Option<String>,
}

impl DelayNoticeForm {
    fn to_create(&self) -> Result<CreateDelayNotice, CoreError> {
        let project_id =
            validation::required_id(self.project_id.as_deref(), "Invalid project id")?;
        let title = validation::required_text(self.title.as_deref(), "Title is required")?;
        let description =
            validation::required_text(self.description.as_deref(), "Description is required")?;
        let incident_date = validation::required_text(
            self.incident_date.as_deref(),
            "Incident date is required",
        )
        .and_then(|raw| validation::date(&raw, "incident_date"))?;

        Ok(CreateDelayNotice {
            project_id,
            title,
            description,
            incident_date,
            reported_date: validation::optional_date(
                self.reported_date.as_deref(),
                "reported_date",
            )?,
            time_impact_days_estimate: validation::whole_number(
                self.time_impact_days_estimate.as_deref(),
                "time_impact_days_estimate",
            )?,
            recipients: validation::recipients(self.recipients.as_deref())?,
            created_by: created_by(self.created_by.as_deref()),
        })
    }
}

/// Flash text for a failed dispatch. Transport and signing details stay in the log.
fn mail_failure_message(err: &MailError) -> String {
    match err {
        MailError::NotConfigured(_)
        | MailError::NoRecipients
        | MailError::TokenExchange { .. }
        | MailError::SendFailed { .. } => format!("Email failed: {err}"),
        MailError::Signing(_) | MailError::Encoding(_) | MailError::Request(_) => {
            "Email failed: the mail service could not be reached".to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// JSON reads
// ---------------------------------------------------------------------------

/// GET /api/v1/delay-notices
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<DelayNoticeFilter>,
) -> AppResult<Json<DataResponse<Vec<DelayNotice>>>> {
    let notices = state.store.list_delay_notices(&filter).await?;
    Ok(Json(DataResponse { data: notices }))
}

/// GET /api/v1/delay-notices/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DelayNotice>>> {
    let notice = state
        .store
        .get_delay_notice(id)
        .await?
        .ok_or_else(|| AppError::not_found("Delay notice", id))?;
    Ok(Json(DataResponse { data: notice }))
}

// ---------------------------------------------------------------------------
// Form actions
// ---------------------------------------------------------------------------

/// POST /actions/delay-notices
pub async fn create(
    State(state): State<AppState>,
    form: Result<Form<DelayNoticeForm>, FormRejection>,
) -> ActionResult {
    let back = "/delay-notices/new";
    let Form(form) = form.or_flash(back)?;
    let input = form.to_create().or_flash(back)?;
    let notice = state.store.create_delay_notice(&input).await.or_flash(back)?;

    tracing::info!(
        delay_notice_id = %notice.id,
        recipients = notice.recipients.len(),
        "Delay notice created"
    );
    Ok(Flash::success(
        format!("/delay-notices/{}", notice.id),
        "Delay notice created",
    ))
}

/// POST /actions/delay-notices/{id}/mark-sent
///
/// Record a notice as sent without emailing it.
pub async fn mark_sent(State(state): State<AppState>, Path(id): Path<DbId>) -> ActionResult {
    state
        .store
        .mark_delay_notice_sent(id, Utc::now())
        .await
        .or_flash(&format!("/delay-notices/{id}"))?
        .ok_or_else(|| AppError::not_found("Delay notice", id))
        .or_flash("/delay-notices")?;

    tracing::info!(delay_notice_id = %id, "Delay notice marked as sent");
    Ok(Flash::success(format!("/delay-notices/{id}"), "Marked as sent"))
}

/// POST /actions/delay-notices/{id}/send
///
/// Email the notice to its recipients, then mark it sent. The status write
/// happens after delivery; if it fails the email has still gone out and
/// the redirect says so.
pub async fn send(State(state): State<AppState>, Path(id): Path<DbId>) -> ActionResult {
    let back = format!("/delay-notices/{id}");
    let notice = state
        .store
        .get_delay_notice(id)
        .await
        .or_flash(&back)?
        .ok_or_else(|| AppError::not_found("Delay notice", id))
        .or_flash("/delay-notices")?;

    if notice.recipients.is_empty() {
        return Err(Flash::error(back, "No recipients set on notice"));
    }

    let project = state
        .store
        .get_project(notice.project_id)
        .await
        .or_flash(&back)?;

    let email = DelayNoticeEmail {
        project_number: project.as_ref().map(|p| p.project_number.as_str()),
        project_name: project.as_ref().map(|p| p.name.as_str()),
        title: &notice.title,
        description: &notice.description,
        incident_date: notice.incident_date,
        reported_date: notice.reported_date,
        company_name: &state.config.company_name,
    };

    if let Err(err) = state
        .mailer
        .send(&notice.recipients, &email.subject(), &email.html())
        .await
    {
        tracing::error!(delay_notice_id = %id, error = %err, "Delay notice email failed");
        return Err(Flash::error(back, mail_failure_message(&err)));
    }

    match state.store.mark_delay_notice_sent(id, Utc::now()).await {
        Ok(Some(_)) => {
            tracing::info!(delay_notice_id = %id, recipients = notice.recipients.len(), "Delay notice emailed");
            Ok(Flash::success(back, "Delay notice emailed"))
        }
        Ok(None) => {
            tracing::error!(delay_notice_id = %id, "Delay notice vanished after email was sent");
            Err(Flash::error(
                back,
                "Delay notice emailed, but its status could not be updated",
            ))
        }
        Err(err) => {
            tracing::error!(delay_notice_id = %id, error = %err, "Failed to mark emailed delay notice as sent");
            Err(Flash::error(
                back,
                "Delay notice emailed, but its status could not be updated",
            ))
        }
    }
}
