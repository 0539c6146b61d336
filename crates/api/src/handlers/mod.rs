//! Request handlers, one module per resource.
//!
//! Each module holds the JSON read handlers (`/api/v1/...`) and the form
//! actions (`/actions/...`) for its resource. Form structs take every
//! field as optional text; coercion and validation happen in the handler
//! through `coflow_core::coerce` and `coflow_core::validation`.
//!
//! Actions extract `Result<Form<_>, FormRejection>`, so a body that is not
//! urlencoded still answers with a flash redirect. Deletes ignore an
//! unreadable body since every field is optional.

use coflow_core::types::DbId;
use serde::Deserialize;

pub mod change_order;
pub mod dashboard;
pub mod delay_notice;
pub mod line_item;
pub mod project;

/// Body of the delete actions: an optional place to land afterwards.
#[derive(Debug, Default, Deserialize)]
pub struct RedirectForm {
    pub redirect_to: Option<String>,
}

/// Parse an optional `created_by` reference. Malformed ids are ignored.
fn created_by(raw: Option<&str>) -> Option<DbId> {
    raw.map(str::trim).and_then(|s| DbId::parse_str(s).ok())
}
