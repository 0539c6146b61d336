//! Route definitions for the `/delay-notices` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::delay_notice;
use crate::state::AppState;

/// Routes mounted at `/api/v1/delay-notices`.
///
/// ```text
/// GET    /                                  -> list
/// GET    /{id}                              -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(delay_notice::list))
        .route("/{id}", get(delay_notice::get_by_id))
}

/// Routes mounted at `/actions/delay-notices`.
///
/// ```text
/// POST   /                                  -> create
/// POST   /{id}/mark-sent                    -> mark_sent
/// POST   /{id}/send                         -> send
/// ```
pub fn action_router() -> Router<AppState> {
    Router::new()
        .route("/", post(delay_notice::create))
        .route("/{id}/mark-sent", post(delay_notice::mark_sent))
        .route("/{id}/send", post(delay_notice::send))
}
