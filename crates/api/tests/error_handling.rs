//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router is
//! involved. Form actions reuse the same messages through
//! `AppError::user_message`, so those are checked here too.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use coflow_api::error::AppError;
use coflow_core::error::CoreError;
use coflow_db::DbError;
use coflow_pdf::PdfError;
use http_body_util::BodyExt;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// CoreError variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let id = uuid::Uuid::nil();
    let err = AppError::not_found("Change order", id);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(
        json["error"],
        "Change order with id 00000000-0000-0000-0000-000000000000 not found"
    );
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Title is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Title is required");
}

// ---------------------------------------------------------------------------
// DbError variants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_project_number_returns_409() {
    let err = AppError::Db(DbError::UniqueViolation("uq_projects_project_number".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(
        json["error"],
        "A project with this project number already exists"
    );
}

#[tokio::test]
async fn other_unique_violation_names_constraint() {
    let err = AppError::Db(DbError::UniqueViolation("uq_something_else".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        json["error"],
        "Duplicate value violates unique constraint: uq_something_else"
    );
}

#[tokio::test]
async fn missing_parent_returns_400() {
    let err = AppError::Db(DbError::MissingParent("project"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Referenced project does not exist");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let err = AppError::Db(DbError::Sqlx(sqlx::Error::RowNotFound));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn pool_failure_returns_500_and_sanitizes() {
    let err = AppError::Db(DbError::Sqlx(sqlx::Error::PoolTimedOut));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Request and rendering errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn pdf_error_returns_500() {
    let err = AppError::Pdf(PdfError::Save("xref overflow".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Flash messages
// ---------------------------------------------------------------------------

#[test]
fn user_message_matches_json_error() {
    let err = AppError::Db(DbError::MissingParent("change order"));
    assert_eq!(err.user_message(), "Referenced change order does not exist");

    let err = AppError::Pdf(PdfError::Save("trailer offset".into()));
    assert_eq!(err.user_message(), "An internal error occurred");
}
