//! Repository for the `projects` table.

use coflow_core::types::DbId;
use sqlx::PgPool;

use crate::filters::{contains_pattern, ProjectFilter};
use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_number, name, client_name, address, created_by, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (project_number, name, client_name, address, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.project_number)
            .bind(&input.name)
            .bind(&input.client_name)
            .bind(&input.address)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching `filter`.
    ///
    /// `q` matches project number, name, or client name case-insensitively.
    pub async fn list(pool: &PgPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE $1::TEXT IS NULL
                OR project_number ILIKE $1
                OR name ILIKE $1
                OR client_name ILIKE $1
             ORDER BY {} {}, id",
            filter.sort.column(),
            filter.dir.sql(),
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(filter.q.as_deref().map(contains_pattern))
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                project_number = COALESCE($2, project_number),
                name = COALESCE($3, name),
                client_name = COALESCE($4, client_name),
                address = COALESCE($5, address)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.project_number)
            .bind(&input.name)
            .bind(&input.client_name)
            .bind(&input.address)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project and, by cascade, its change orders and delay
    /// notices. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
