//! Handlers for the `/projects` resource.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::{Form, Json};
use coflow_core::coerce::non_blank;
use coflow_core::error::CoreError;
use coflow_core::types::DbId;
use coflow_core::validation;
use coflow_db::filters::ProjectFilter;
use coflow_db::models::change_order::ChangeOrder;
use coflow_db::models::project::{CreateProject, Project, UpdateProject};
use serde::Deserialize;

use super::{created_by, RedirectForm};
use crate::error::{AppError, AppResult};
use crate::flash::{safe_redirect, ActionResult, Flash, OrFlash};
use crate::response::DataResponse;
use crate::state::AppState;

/// Submitted project fields. Every field arrives as optional text.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectForm {
    pub project_number: Option<String>,
    pub name: Option<String>,
    pub client_name: Option<String>,
    pub address: Option<String>,
    pub created_by: Option<String>,
}

impl ProjectForm {
    fn to_create(&self) -> Result<CreateProject, CoreError> {
        Ok(CreateProject {
            project_number: validation::required_text(
                self.project_number.as_deref(),
                "Project number is required",
            )?,
            name: validation::required_text(self.name.as_deref(), "Project name is required")?,
            client_name: non_blank(self.client_name.as_deref()),
            address: non_blank(self.address.as_deref()),
            created_by: created_by(self.created_by.as_deref()),
        })
    }

    /// Blank fields leave the stored value unchanged.
    fn to_update(&self) -> UpdateProject {
        UpdateProject {
            project_number: non_blank(self.project_number.as_deref()),
            name: non_blank(self.name.as_deref()),
            client_name: non_blank(self.client_name.as_deref()),
            address: non_blank(self.address.as_deref()),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON reads
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state.store.list_projects(&filter).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .store
        .get_project(id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    Ok(Json(DataResponse { data: project }))
}

/// GET /api/v1/projects/{id}/change-orders
///
/// The project's change orders, newest first.
pub async fn list_change_orders(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ChangeOrder>>>> {
    state
        .store
        .get_project(id)
        .await?
        .ok_or_else(|| AppError::not_found("Project", id))?;
    let change_orders = state.store.list_project_change_orders(id).await?;
    Ok(Json(DataResponse {
        data: change_orders,
    }))
}

// ---------------------------------------------------------------------------
// Form actions
// ---------------------------------------------------------------------------

/// POST /actions/projects
pub async fn create(
    State(state): State<AppState>,
    form: Result<Form<ProjectForm>, FormRejection>,
) -> ActionResult {
    let back = "/projects/new";
    let Form(form) = form.or_flash(back)?;
    let input = form.to_create().or_flash(back)?;
    let project = state.store.create_project(&input).await.or_flash(back)?;

    tracing::info!(project_id = %project.id, project_number = %project.project_number, "Project created");
    Ok(Flash::success("/projects", "Project created"))
}

/// POST /actions/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    form: Result<Form<ProjectForm>, FormRejection>,
) -> ActionResult {
    let back = format!("/projects/{id}");
    let Form(form) = form.or_flash(&back)?;
    state
        .store
        .update_project(id, &form.to_update())
        .await
        .or_flash(&back)?
        .ok_or_else(|| AppError::not_found("Project", id))
        .or_flash("/projects")?;

    tracing::info!(project_id = %id, "Project updated");
    Ok(Flash::success(back, "Project updated"))
}

/// POST /actions/projects/{id}/delete
///
/// Removes the project together with its change orders, their items, and
/// its delay notices.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    form: Result<Form<RedirectForm>, FormRejection>,
) -> ActionResult {
    let form = form.map(|Form(f)| f).unwrap_or_default();
    let deleted = state.store.delete_project(id).await.or_flash("/projects")?;
    if !deleted {
        return Err(Flash::from_error("/projects", &AppError::not_found("Project", id)));
    }

    tracing::info!(project_id = %id, "Project deleted");
    Ok(Flash::success(
        safe_redirect(form.redirect_to.as_deref(), "/projects"),
        "Project deleted",
    ))
}
