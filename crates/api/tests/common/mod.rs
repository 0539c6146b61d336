#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use coflow_api::config::ServerConfig;
use coflow_api::router::build_app_router;
use coflow_api::state::AppState;
use coflow_core::types::DbId;
use coflow_db::models::change_order::{ChangeOrder, CreateChangeOrder};
use coflow_db::models::delay_notice::{CreateDelayNotice, DelayNotice};
use coflow_db::models::project::{CreateProject, Project};
use coflow_db::{MemoryStore, Store};
use coflow_mail::{GmailSender, MailConfig};
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        company_name: "ARC Glazing".to_string(),
    }
}

/// The full router plus a handle on its in-memory store for seeding and
/// assertions.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

/// Build the application over an empty `MemoryStore`, with mail left
/// unconfigured.
pub fn build_test_app() -> TestApp {
    build_test_app_with_mail(MailConfig::default())
}

/// Build the application with the given mail settings.
///
/// Uses the same [`build_app_router`] as `main.rs`, so the middleware
/// stack (CORS, request ID, timeout, tracing, panic recovery) is exercised.
pub fn build_test_app_with_mail(mail: MailConfig) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        store: store.clone(),
        config: Arc::new(test_config()),
        mailer: Arc::new(GmailSender::new(mail)),
    };
    TestApp {
        router: build_app_router(state),
        store,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: &TestApp, uri: &str) -> Response {
    app.router
        .clone()
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Submit a urlencoded form, the way a browser posts an action.
pub async fn post_form(app: &TestApp, uri: &str, fields: &[(&str, &str)]) -> Response {
    let body = serde_urlencoded::to_string(fields).unwrap();
    app.router
        .clone()
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// POST an arbitrary body, optionally without any content type.
pub async fn post_raw(
    app: &TestApp,
    uri: &str,
    content_type: Option<&str>,
    body: &str,
) -> Response {
    let mut request = Request::post(uri);
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    app.router
        .clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

// ---------------------------------------------------------------------------
// Flash redirects
// ---------------------------------------------------------------------------

/// A decoded `303` flash redirect.
#[derive(Debug)]
pub struct Redirected {
    pub path: String,
    pub message: String,
    pub kind: String,
}

/// Assert `response` is a flash redirect and decode it.
pub fn redirected(response: &Response) -> Redirected {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    let (path, query) = location.split_once('?').unwrap();
    let params: HashMap<String, String> = serde_urlencoded::from_str(query).unwrap();
    Redirected {
        path: path.to_string(),
        message: params["m"].clone(),
        kind: params["t"].clone(),
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub async fn seed_project(app: &TestApp, number: &str, name: &str) -> Project {
    app.store
        .create_project(&CreateProject {
            project_number: number.to_string(),
            name: name.to_string(),
            client_name: None,
            address: None,
            created_by: None,
        })
        .await
        .unwrap()
}

pub async fn seed_change_order(app: &TestApp, project_id: DbId, co_number: &str) -> ChangeOrder {
    app.store
        .create_change_order(&CreateChangeOrder {
            project_id,
            co_number: co_number.to_string(),
            title: format!("{co_number} title"),
            description: "Scope change".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
}

pub async fn seed_delay_notice(
    app: &TestApp,
    project_id: DbId,
    recipients: &[&str],
) -> DelayNotice {
    app.store
        .create_delay_notice(&CreateDelayNotice {
            project_id,
            title: "Glass delivery late".to_string(),
            description: "Supplier slipped two weeks.\nInstall moves.".to_string(),
            incident_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            reported_date: NaiveDate::from_ymd_opt(2024, 3, 6),
            time_impact_days_estimate: Some(10),
            recipients: recipients.iter().map(|s| s.to_string()).collect(),
            created_by: None,
        })
        .await
        .unwrap()
}
