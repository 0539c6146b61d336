//! Route definitions for the dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/api/v1/dashboard`.
///
/// ```text
/// GET    /                                  -> summary
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard::summary))
}
