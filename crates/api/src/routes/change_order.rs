//! Route definitions for the `/change-orders` resource.
//!
//! Line-item actions are nested under `/{id}/items`, where `id` is the
//! parent change order.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{change_order, line_item};
use crate::state::AppState;

/// Routes mounted at `/api/v1/change-orders`.
///
/// ```text
/// GET    /                                  -> list
/// GET    /{id}                              -> get_detail
/// GET    /{id}/pdf                          -> download_pdf
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(change_order::list))
        .route("/{id}", get(change_order::get_detail))
        .route("/{id}/pdf", get(change_order::download_pdf))
}

/// Routes mounted at `/actions/change-orders`.
///
/// ```text
/// POST   /                                  -> create
/// POST   /{id}                              -> update
/// POST   /{id}/status                       -> set_status
/// POST   /{id}/ocr                          -> save_ocr
/// POST   /{id}/delete                       -> delete
///
/// POST   /{id}/items                        -> line_item::add
/// POST   /{id}/items/{item_id}              -> line_item::update
/// POST   /{id}/items/{item_id}/delete       -> line_item::delete
/// ```
pub fn action_router() -> Router<AppState> {
    let item_routes = Router::new()
        .route("/", post(line_item::add))
        .route("/{item_id}", post(line_item::update))
        .route("/{item_id}/delete", post(line_item::delete));

    Router::new()
        .route("/", post(change_order::create))
        .route("/{id}", post(change_order::update))
        .route("/{id}/status", post(change_order::set_status))
        .route("/{id}/ocr", post(change_order::save_ocr))
        .route("/{id}/delete", post(change_order::delete))
        .nest("/{id}/items", item_routes)
}
