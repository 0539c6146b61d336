pub mod change_order;
pub mod dashboard;
pub mod delay_notice;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree. Every response is JSON.
///
/// Route hierarchy:
///
/// ```text
/// /dashboard                          counts + recent change orders
///
/// /projects                           list (?q&sort&dir)
/// /projects/{id}                      get
/// /projects/{id}/change-orders        a project's change orders
///
/// /change-orders                      list (?q&status&sort&dir)
/// /change-orders/{id}                 record + items + summary
/// /change-orders/{id}/pdf             PDF attachment
///
/// /delay-notices                      list (?q&status)
/// /delay-notices/{id}                 get
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dashboard", dashboard::router())
        .nest("/projects", project::router())
        .nest("/change-orders", change_order::router())
        .nest("/delay-notices", delay_notice::router())
}

/// Build the `/actions` route tree.
///
/// Every route is a `POST` taking an `application/x-www-form-urlencoded`
/// body and answering `303 See Other` with `?m=<message>&t=success|error`.
///
/// ```text
/// /projects                                  create
/// /projects/{id}                             update
/// /projects/{id}/delete                      delete
///
/// /change-orders                             create
/// /change-orders/{id}                        update
/// /change-orders/{id}/status                 set status
/// /change-orders/{id}/ocr                    save OCR result
/// /change-orders/{id}/delete                 delete
/// /change-orders/{id}/items                  add line item
/// /change-orders/{id}/items/{item_id}        update line item
/// /change-orders/{id}/items/{item_id}/delete delete line item
///
/// /delay-notices                             create
/// /delay-notices/{id}/mark-sent              mark sent
/// /delay-notices/{id}/send                   email recipients
/// ```
pub fn action_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::action_router())
        .nest("/change-orders", change_order::action_router())
        .nest("/delay-notices", delay_notice::action_router())
}
