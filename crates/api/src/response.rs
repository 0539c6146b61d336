//! Response envelope for the JSON read endpoints.
//!
//! Every `/api/v1` success body is `{ "data": ... }`. Errors use the
//! `{ "error", "code" }` shape from [`crate::error::AppError`]; form
//! actions never return a body at all (see [`crate::flash`]).

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: projects }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
