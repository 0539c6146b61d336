//! Handlers for the `/change-orders` resource.
//!
//! The detail endpoint and the PDF both derive their figures from
//! [`coflow_core::rollup::summarize`] over the same record and items.

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Form, Json};
use coflow_core::coerce::{non_blank, parse_number};
use coflow_core::error::CoreError;
use coflow_core::rollup::{self, FinancialSummary, SummaryRow};
use coflow_core::status::ChangeOrderStatus;
use coflow_core::types::DbId;
use coflow_core::validation;
use coflow_db::filters::ChangeOrderFilter;
use coflow_db::models::change_order::{
    ChangeOrder, ChangeOrderListing, CreateChangeOrder, UpdateChangeOrder,
};
use coflow_db::models::line_item::ChangeOrderItem;
use coflow_db::models::project::Project;
use coflow_pdf::{ChangeOrderPdfData, PdfLineItem};
use serde::{Deserialize, Serialize};

use super::{created_by, RedirectForm};
use crate::error::{AppError, AppResult};
use crate::flash::{safe_redirect, ActionResult, Flash, OrFlash};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Submitted change-order fields. Every field arrives as optional text.
#[derive(Debug, Default, Deserialize)]
pub struct ChangeOrderForm {
    pub project_id: Option<String>,
    pub co_number: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub justification: Option<String>,
    pub additional_info: Option<String>,
    pub status: Option<String>,
    pub cost_impact: Option<String>,
    pub time_impact_days: Option<String>,
    pub labor_hours: Option<String>,
    pub labor_rate: Option<String>,
    pub labor_overhead_pct: Option<String>,
    pub labor_notes: Option<String>,
    pub total_labor_cost: Option<String>,
    pub total_overhead_cost: Option<String>,
    pub total_cost: Option<String>,
    pub delay_notice_ref: Option<String>,
    pub created_by: Option<String>,
}

/// The numeric fields after coercion and validation.
struct Figures {
    cost_impact: Option<f64>,
    time_impact_days: Option<i32>,
    labor_hours: Option<f64>,
    labor_rate: Option<f64>,
    labor_overhead_pct: Option<f64>,
    total_labor_cost: Option<f64>,
    total_overhead_cost: Option<f64>,
    total_cost: Option<f64>,
}

fn amount(raw: &Option<String>, field: &str) -> Result<Option<f64>, CoreError> {
    validation::non_negative(parse_number(raw.as_deref()), field)
}

impl ChangeOrderForm {
    fn figures(&self) -> Result<Figures, CoreError> {
        Ok(Figures {
            cost_impact: amount(&self.cost_impact, "cost_impact")?,
            time_impact_days: validation::whole_number(
                self.time_impact_days.as_deref(),
                "time_impact_days",
            )?,
            labor_hours: amount(&self.labor_hours, "labor_hours")?,
            labor_rate: amount(&self.labor_rate, "labor_rate")?,
            labor_overhead_pct: amount(&self.labor_overhead_pct, "labor_overhead_pct")?,
            total_labor_cost: amount(&self.total_labor_cost, "total_labor_cost")?,
            total_overhead_cost: amount(&self.total_overhead_cost, "total_overhead_cost")?,
            total_cost: amount(&self.total_cost, "total_cost")?,
        })
    }

    fn status(&self) -> Result<Option<ChangeOrderStatus>, CoreError> {
        non_blank(self.status.as_deref())
            .map(|s| s.parse())
            .transpose()
    }

    fn to_create(&self) -> Result<CreateChangeOrder, CoreError> {
        let project_id =
            validation::required_id(self.project_id.as_deref(), "Invalid project id")?;
        let co_number =
            validation::required_text(self.co_number.as_deref(), "CO number is required")?;
        let title = validation::required_text(self.title.as_deref(), "Title is required")?;
        let description =
            validation::required_text(self.description.as_deref(), "Description is required")?;
        let status = self.status()?.unwrap_or_default();
        let f = self.figures()?;

        Ok(CreateChangeOrder {
            project_id,
            co_number,
            title,
            description,
            justification: non_blank(self.justification.as_deref()),
            additional_info: non_blank(self.additional_info.as_deref()),
            status,
            cost_impact: f.cost_impact,
            time_impact_days: f.time_impact_days,
            labor_hours: f.labor_hours,
            labor_rate: f.labor_rate,
            labor_overhead_pct: f.labor_overhead_pct,
            labor_notes: non_blank(self.labor_notes.as_deref()),
            total_labor_cost: f.total_labor_cost,
            total_overhead_cost: f.total_overhead_cost,
            total_cost: f.total_cost,
            delay_notice_ref: non_blank(self.delay_notice_ref.as_deref()),
            created_by: created_by(self.created_by.as_deref()),
        })
    }

    /// Blank fields leave the stored value unchanged.
    fn to_update(&self) -> Result<UpdateChangeOrder, CoreError> {
        let project_id = match non_blank(self.project_id.as_deref()) {
            Some(raw) => Some(validation::required_id(Some(&raw), "Invalid project id")?),
            None => None,
        };
        let status = self.status()?;
        let f = self.figures()?;

        Ok(UpdateChangeOrder {
            project_id,
            co_number: non_blank(self.co_number.as_deref()),
            title: non_blank(self.title.as_deref()),
            description: non_blank(self.description.as_deref()),
            justification: non_blank(self.justification.as_deref()),
            additional_info: non_blank(self.additional_info.as_deref()),
            status,
            cost_impact: f.cost_impact,
            time_impact_days: f.time_impact_days,
            labor_hours: f.labor_hours,
            labor_rate: f.labor_rate,
            labor_overhead_pct: f.labor_overhead_pct,
            labor_notes: non_blank(self.labor_notes.as_deref()),
            total_labor_cost: f.total_labor_cost,
            total_overhead_cost: f.total_overhead_cost,
            total_cost: f.total_cost,
            delay_notice_ref: non_blank(self.delay_notice_ref.as_deref()),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatusForm {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OcrForm {
    pub image_url: Option<String>,
    pub ocr_text: Option<String>,
}

// ---------------------------------------------------------------------------
// Detail read model
// ---------------------------------------------------------------------------

/// Roll-up figures plus their display rows.
#[derive(Debug, Serialize)]
pub struct FinancialView {
    #[serde(flatten)]
    pub summary: FinancialSummary,
    pub rows: Vec<SummaryRow>,
    pub grand_total_row: SummaryRow,
}

impl From<FinancialSummary> for FinancialView {
    fn from(summary: FinancialSummary) -> Self {
        Self {
            rows: summary.rows(),
            grand_total_row: summary.grand_total_row(),
            summary,
        }
    }
}

/// A change order with everything its detail page shows.
#[derive(Debug, Serialize)]
pub struct ChangeOrderDetail {
    pub change_order: ChangeOrder,
    pub project: Option<Project>,
    pub items: Vec<ChangeOrderItem>,
    pub summary: FinancialView,
    pub labor_section_visible: bool,
}

struct Loaded {
    change_order: ChangeOrder,
    project: Option<Project>,
    items: Vec<ChangeOrderItem>,
}

async fn load(state: &AppState, id: DbId) -> AppResult<Loaded> {
    let change_order = state
        .store
        .get_change_order(id)
        .await?
        .ok_or_else(|| AppError::not_found("Change order", id))?;
    let project = state.store.get_project(change_order.project_id).await?;
    let items = state.store.list_line_items(id).await?;
    Ok(Loaded {
        change_order,
        project,
        items,
    })
}

impl Loaded {
    fn into_detail(self) -> ChangeOrderDetail {
        let costs = self.change_order.cost_fields();
        let amounts: Vec<_> = self.items.iter().map(ChangeOrderItem::amounts).collect();
        let summary = rollup::summarize(&costs, &amounts);
        let labor_section_visible =
            rollup::labor_section_visible(&costs, self.change_order.labor_notes.as_deref());

        ChangeOrderDetail {
            change_order: self.change_order,
            project: self.project,
            items: self.items,
            summary: summary.into(),
            labor_section_visible,
        }
    }

    fn into_pdf_data(self, company_name: &str) -> ChangeOrderPdfData {
        let co = self.change_order;
        let (project_number, project_name) = match self.project {
            Some(p) => (Some(p.project_number), p.name),
            None => (None, String::new()),
        };

        ChangeOrderPdfData {
            company_name: company_name.to_string(),
            costs: co.cost_fields(),
            co_number: co.co_number,
            title: co.title,
            project_number,
            project_name,
            description: co.description,
            justification: co.justification,
            additional_info: co.additional_info,
            delay_notice_ref: co.delay_notice_ref,
            time_impact_days: co.time_impact_days,
            updated_on: Some(co.updated_at.date_naive()),
            labor_notes: co.labor_notes,
            line_items: self
                .items
                .into_iter()
                .map(|item| PdfLineItem {
                    description: item.description,
                    quantity: item.quantity,
                    unit: item.unit,
                    unit_price: item.unit_price,
                    total_price: item.total_price,
                })
                .collect(),
        }
    }
}

/// `change-order-<number>.pdf`, with anything outside `[A-Za-z0-9_-]`
/// replaced by `-`.
fn pdf_filename(co_number: &str) -> String {
    let safe: String = co_number
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("change-order-{safe}.pdf")
}

// ---------------------------------------------------------------------------
// JSON reads
// ---------------------------------------------------------------------------

/// GET /api/v1/change-orders
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ChangeOrderFilter>,
) -> AppResult<Json<DataResponse<Vec<ChangeOrderListing>>>> {
    let change_orders = state.store.list_change_orders(&filter).await?;
    Ok(Json(DataResponse {
        data: change_orders,
    }))
}

/// GET /api/v1/change-orders/{id}
pub async fn get_detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChangeOrderDetail>>> {
    let detail = load(&state, id).await?.into_detail();
    Ok(Json(DataResponse { data: detail }))
}

/// GET /api/v1/change-orders/{id}/pdf
///
/// Render the change order as a PDF attachment.
pub async fn download_pdf(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let data = load(&state, id)
        .await?
        .into_pdf_data(&state.config.company_name);
    let disposition = format!("attachment; filename=\"{}\"", pdf_filename(&data.co_number));
    let bytes = coflow_pdf::render_change_order(&data)?;

    tracing::info!(change_order_id = %id, bytes = bytes.len(), "Change order PDF rendered");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

// ---------------------------------------------------------------------------
// Form actions
// ---------------------------------------------------------------------------

/// POST /actions/change-orders
pub async fn create(
    State(state): State<AppState>,
    form: Result<Form<ChangeOrderForm>, FormRejection>,
) -> ActionResult {
    let back = "/change-orders/new";
    let Form(form) = form.or_flash(back)?;
    let input = form.to_create().or_flash(back)?;
    let change_order = state.store.create_change_order(&input).await.or_flash(back)?;

    tracing::info!(
        change_order_id = %change_order.id,
        co_number = %change_order.co_number,
        "Change order created"
    );
    Ok(Flash::success(
        format!("/change-orders/{}", change_order.id),
        "Change order created",
    ))
}

/// POST /actions/change-orders/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    form: Result<Form<ChangeOrderForm>, FormRejection>,
) -> ActionResult {
    let back = format!("/change-orders/{id}");
    let Form(form) = form.or_flash(&back)?;
    let input = form.to_update().or_flash(&back)?;
    state
        .store
        .update_change_order(id, &input)
        .await
        .or_flash(&back)?
        .ok_or_else(|| AppError::not_found("Change order", id))
        .or_flash("/change-orders")?;

    tracing::info!(change_order_id = %id, "Change order updated");
    Ok(Flash::success(back, "Change order updated"))
}

/// POST /actions/change-orders/{id}/status
///
/// Any status may follow any other.
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    form: Result<Form<StatusForm>, FormRejection>,
) -> ActionResult {
    let back = format!("/change-orders/{id}");
    let Form(form) = form.or_flash(&back)?;
    let status: ChangeOrderStatus = validation::required_text(
        form.status.as_deref(),
        "Status is required",
    )
    .and_then(|s| s.parse())
    .or_flash(&back)?;

    state
        .store
        .set_change_order_status(id, status)
        .await
        .or_flash(&back)?
        .ok_or_else(|| AppError::not_found("Change order", id))
        .or_flash("/change-orders")?;

    tracing::info!(change_order_id = %id, %status, "Change order status changed");
    Ok(Flash::success(back, format!("Status updated to {status}")))
}

/// POST /actions/change-orders/{id}/ocr
///
/// Store the uploaded scan's URL and its extracted text.
pub async fn save_ocr(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    form: Result<Form<OcrForm>, FormRejection>,
) -> ActionResult {
    let back = format!("/change-orders/{id}");
    let Form(form) = form.or_flash(&back)?;
    let image_url = validation::required_text(form.image_url.as_deref(), "Image URL is required")
        .or_flash(&back)?;
    let ocr_text = form.ocr_text.unwrap_or_default();

    state
        .store
        .save_ocr_result(id, &image_url, &ocr_text)
        .await
        .or_flash(&back)?
        .ok_or_else(|| AppError::not_found("Change order", id))
        .or_flash("/change-orders")?;

    tracing::info!(change_order_id = %id, text_len = ocr_text.len(), "OCR result saved");
    Ok(Flash::success(back, "OCR saved"))
}

/// POST /actions/change-orders/{id}/delete
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    form: Result<Form<RedirectForm>, FormRejection>,
) -> ActionResult {
    let form = form.map(|Form(f)| f).unwrap_or_default();
    let deleted = state
        .store
        .delete_change_order(id)
        .await
        .or_flash("/change-orders")?;
    if !deleted {
        return Err(Flash::from_error(
            "/change-orders",
            &AppError::not_found("Change order", id),
        ));
    }

    tracing::info!(change_order_id = %id, "Change order deleted");
    Ok(Flash::success(
        safe_redirect(form.redirect_to.as_deref(), "/change-orders"),
        "Change order deleted",
    ))
}
