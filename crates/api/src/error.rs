use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use coflow_core::error::CoreError;
use coflow_db::DbError;
use coflow_pdf::PdfError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`DbError`] for storage
/// failures, and adds HTTP-specific variants. Implements [`IntoResponse`]
/// to produce consistent JSON error responses; form actions turn the same
/// values into flash redirects via [`AppError::user_message`].
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `coflow_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A storage error from `coflow_db`.
    #[error(transparent)]
    Db(#[from] DbError),

    /// PDF serialization failed.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// An action body that is not a urlencoded form.
impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for a [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: coflow_core::types::DbId) -> Self {
        AppError::Core(CoreError::NotFound { entity, id })
    }

    /// The message shown to the user. Internal details are logged and
    /// replaced with a generic message.
    pub fn user_message(&self) -> String {
        self.classify().2
    }

    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Storage errors ---
            AppError::Db(err) => classify_db_error(err),

            AppError::Pdf(err) => {
                tracing::error!(error = %err, "PDF rendering failed");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a storage error into an HTTP status, error code, and message.
///
/// - Unique constraint violations map to 409.
/// - A missing parent row maps to 400.
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_db_error(err: &DbError) -> (StatusCode, &'static str, String) {
    match err {
        DbError::UniqueViolation(constraint) => (
            StatusCode::CONFLICT,
            "CONFLICT",
            conflict_message(constraint),
        ),
        DbError::MissingParent(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string()),
        DbError::Sqlx(sqlx::Error::RowNotFound) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        DbError::Sqlx(other) => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_projects_project_number" => "A project with this project number already exists".into(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}
