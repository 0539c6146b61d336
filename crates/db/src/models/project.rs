//! Project entity model and DTOs.

use coflow_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    /// Unique human-facing code, e.g. `"24-118"`.
    pub project_number: String,
    pub name: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub project_number: String,
    pub name: String,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub created_by: Option<DbId>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub project_number: Option<String>,
    pub name: Option<String>,
    pub client_name: Option<String>,
    pub address: Option<String>,
}
