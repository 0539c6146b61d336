//! Handler for the dashboard summary.

use axum::extract::State;
use axum::Json;
use coflow_db::models::dashboard::Dashboard;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Number of recent change orders shown on the dashboard.
pub const RECENT_CHANGE_ORDERS: i64 = 5;

/// GET /api/v1/dashboard
///
/// Project, change-order, and pending change-order counts plus the most
/// recent change orders.
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<DataResponse<Dashboard>>> {
    let dashboard = state.store.dashboard(RECENT_CHANGE_ORDERS).await?;
    Ok(Json(DataResponse { data: dashboard }))
}
