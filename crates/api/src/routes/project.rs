//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::project;
use crate::state::AppState;

/// Routes mounted at `/api/v1/projects`.
///
/// ```text
/// GET    /                                  -> list
/// GET    /{id}                              -> get_by_id
/// GET    /{id}/change-orders                -> list_change_orders
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list))
        .route("/{id}", get(project::get_by_id))
        .route("/{id}/change-orders", get(project::list_change_orders))
}

/// Routes mounted at `/actions/projects`.
///
/// ```text
/// POST   /                                  -> create
/// POST   /{id}                              -> update
/// POST   /{id}/delete                       -> delete
/// ```
pub fn action_router() -> Router<AppState> {
    Router::new()
        .route("/", post(project::create))
        .route("/{id}", post(project::update))
        .route("/{id}/delete", post(project::delete))
}
