//! In-process [`Store`] used by tests and local demos.
//!
//! Mirrors the PostgreSQL schema's behavior that handlers can observe:
//! the `uq_projects_project_number` constraint, foreign-key checks,
//! cascading deletes, search and sort semantics, and the line-item
//! `sort_order` default.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use coflow_core::status::{ChangeOrderStatus, DelayNoticeStatus};
use coflow_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use crate::filters::{
    contains_ci, ChangeOrderFilter, ChangeOrderSort, DelayNoticeFilter, ProjectFilter,
    ProjectSort, SortDir,
};
use crate::models::change_order::{
    ChangeOrder, ChangeOrderListing, CreateChangeOrder, UpdateChangeOrder,
};
use crate::models::dashboard::Dashboard;
use crate::models::delay_notice::{CreateDelayNotice, DelayNotice};
use crate::models::line_item::{ChangeOrderItem, CreateLineItem, UpdateLineItem};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::store::Store;
use crate::DbError;

const UQ_PROJECT_NUMBER: &str = "uq_projects_project_number";

/// Rows are kept in insertion order, which doubles as the tie-break for
/// equal timestamps.
#[derive(Default)]
struct Tables {
    projects: Vec<Project>,
    change_orders: Vec<ChangeOrder>,
    items: Vec<ChangeOrderItem>,
    notices: Vec<DelayNotice>,
}

impl Tables {
    fn project(&self, id: DbId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn require_project(&self, id: DbId) -> Result<(), DbError> {
        self.project(id)
            .map(|_| ())
            .ok_or(DbError::MissingParent("project"))
    }

    fn project_number_taken(&self, number: &str, except: Option<DbId>) -> bool {
        self.projects
            .iter()
            .any(|p| p.project_number == number && Some(p.id) != except)
    }

    fn listing(&self, co: &ChangeOrder) -> Option<ChangeOrderListing> {
        let project = self.project(co.project_id)?;
        Some(ChangeOrderListing {
            id: co.id,
            project_id: co.project_id,
            co_number: co.co_number.clone(),
            title: co.title.clone(),
            status: co.status,
            project_number: project.project_number.clone(),
            project_name: project.name.clone(),
            created_at: co.created_at,
        })
    }

    fn remove_change_order(&mut self, id: DbId) -> bool {
        let before = self.change_orders.len();
        self.change_orders.retain(|co| co.id != id);
        self.items.retain(|item| item.change_order_id != id);
        self.change_orders.len() != before
    }
}

/// Newest-first ordering that keeps insertion order as the tie-break.
fn newest_first<T>(rows: &mut [T], created_at: impl Fn(&T) -> Timestamp) {
    rows.reverse();
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

fn directed(ordering: Ordering, dir: SortDir) -> Ordering {
    match dir {
        SortDir::Asc => ordering,
        SortDir::Desc => ordering.reverse(),
    }
}

/// A [`Store`] holding every table in memory behind a single lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    // -----------------------------------------------------------------------
    // Projects
    // -----------------------------------------------------------------------

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DbError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Project> = tables
            .projects
            .iter()
            .filter(|p| match filter.q.as_deref() {
                None => true,
                Some(q) => {
                    contains_ci(&p.project_number, q)
                        || contains_ci(&p.name, q)
                        || p.client_name.as_deref().is_some_and(|c| contains_ci(c, q))
                }
            })
            .cloned()
            .collect();

        match filter.sort {
            ProjectSort::CreatedAt => {
                newest_first(&mut rows, |p| p.created_at);
                if filter.dir == SortDir::Asc {
                    rows.reverse();
                }
            }
            ProjectSort::ProjectNumber => rows.sort_by(|a, b| {
                directed(a.project_number.cmp(&b.project_number), filter.dir)
            }),
            ProjectSort::Name => rows.sort_by(|a, b| directed(a.name.cmp(&b.name), filter.dir)),
        }
        Ok(rows)
    }

    async fn get_project(&self, id: DbId) -> Result<Option<Project>, DbError> {
        Ok(self.tables.read().await.project(id).cloned())
    }

    async fn create_project(&self, input: &CreateProject) -> Result<Project, DbError> {
        let mut tables = self.tables.write().await;
        if tables.project_number_taken(&input.project_number, None) {
            return Err(DbError::UniqueViolation(UQ_PROJECT_NUMBER.to_string()));
        }
        let now = Utc::now();
        let project = Project {
            id: DbId::new_v4(),
            project_number: input.project_number.clone(),
            name: input.name.clone(),
            client_name: input.client_name.clone(),
            address: input.address.clone(),
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, DbError> {
        let mut tables = self.tables.write().await;
        if let Some(number) = &input.project_number {
            if tables.project_number_taken(number, Some(id)) {
                return Err(DbError::UniqueViolation(UQ_PROJECT_NUMBER.to_string()));
            }
        }
        let Some(project) = tables.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &input.project_number {
            project.project_number = v.clone();
        }
        if let Some(v) = &input.name {
            project.name = v.clone();
        }
        if input.client_name.is_some() {
            project.client_name = input.client_name.clone();
        }
        if input.address.is_some() {
            project.address = input.address.clone();
        }
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: DbId) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        if tables.projects.len() == before {
            return Ok(false);
        }
        let orphaned: Vec<DbId> = tables
            .change_orders
            .iter()
            .filter(|co| co.project_id == id)
            .map(|co| co.id)
            .collect();
        for co_id in orphaned {
            tables.remove_change_order(co_id);
        }
        tables.notices.retain(|n| n.project_id != id);
        Ok(true)
    }

    async fn list_project_change_orders(
        &self,
        project_id: DbId,
    ) -> Result<Vec<ChangeOrder>, DbError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ChangeOrder> = tables
            .change_orders
            .iter()
            .filter(|co| co.project_id == project_id)
            .cloned()
            .collect();
        newest_first(&mut rows, |co| co.created_at);
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Change orders
    // -----------------------------------------------------------------------

    async fn list_change_orders(
        &self,
        filter: &ChangeOrderFilter,
    ) -> Result<Vec<ChangeOrderListing>, DbError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ChangeOrderListing> = tables
            .change_orders
            .iter()
            .filter_map(|co| tables.listing(co))
            .filter(|row| filter.status.is_none_or(|s| row.status == s))
            .filter(|row| match filter.q.as_deref() {
                None => true,
                Some(q) => {
                    contains_ci(&row.co_number, q)
                        || contains_ci(&row.title, q)
                        || contains_ci(&row.project_number, q)
                }
            })
            .collect();

        match filter.sort {
            ChangeOrderSort::CreatedAt => {
                newest_first(&mut rows, |r| r.created_at);
                if filter.dir == SortDir::Asc {
                    rows.reverse();
                }
            }
            ChangeOrderSort::CoNumber => {
                rows.sort_by(|a, b| directed(a.co_number.cmp(&b.co_number), filter.dir))
            }
            ChangeOrderSort::Status => rows.sort_by(|a, b| {
                directed(a.status.as_str().cmp(b.status.as_str()), filter.dir)
            }),
        }
        Ok(rows)
    }

    async fn get_change_order(&self, id: DbId) -> Result<Option<ChangeOrder>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.change_orders.iter().find(|co| co.id == id).cloned())
    }

    async fn create_change_order(
        &self,
        input: &CreateChangeOrder,
    ) -> Result<ChangeOrder, DbError> {
        let mut tables = self.tables.write().await;
        tables.require_project(input.project_id)?;
        let now = Utc::now();
        let change_order = ChangeOrder {
            id: DbId::new_v4(),
            project_id: input.project_id,
            co_number: input.co_number.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            justification: input.justification.clone(),
            additional_info: input.additional_info.clone(),
            status: input.status,
            cost_impact: input.cost_impact,
            time_impact_days: input.time_impact_days,
            labor_hours: input.labor_hours,
            labor_rate: input.labor_rate,
            labor_overhead_pct: input.labor_overhead_pct,
            labor_notes: input.labor_notes.clone(),
            total_labor_cost: input.total_labor_cost,
            total_overhead_cost: input.total_overhead_cost,
            total_cost: input.total_cost,
            original_image_url: None,
            ocr_text: None,
            delay_notice_ref: input.delay_notice_ref.clone(),
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.change_orders.push(change_order.clone());
        Ok(change_order)
    }

    async fn update_change_order(
        &self,
        id: DbId,
        input: &UpdateChangeOrder,
    ) -> Result<Option<ChangeOrder>, DbError> {
        let mut tables = self.tables.write().await;
        if let Some(project_id) = input.project_id {
            tables.require_project(project_id)?;
        }
        let Some(co) = tables.change_orders.iter_mut().find(|co| co.id == id) else {
            return Ok(None);
        };

        fn patch<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        fn patch_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        patch(&mut co.project_id, &input.project_id);
        patch(&mut co.co_number, &input.co_number);
        patch(&mut co.title, &input.title);
        patch(&mut co.description, &input.description);
        patch_opt(&mut co.justification, &input.justification);
        patch_opt(&mut co.additional_info, &input.additional_info);
        patch(&mut co.status, &input.status);
        patch_opt(&mut co.cost_impact, &input.cost_impact);
        patch_opt(&mut co.time_impact_days, &input.time_impact_days);
        patch_opt(&mut co.labor_hours, &input.labor_hours);
        patch_opt(&mut co.labor_rate, &input.labor_rate);
        patch_opt(&mut co.labor_overhead_pct, &input.labor_overhead_pct);
        patch_opt(&mut co.labor_notes, &input.labor_notes);
        patch_opt(&mut co.total_labor_cost, &input.total_labor_cost);
        patch_opt(&mut co.total_overhead_cost, &input.total_overhead_cost);
        patch_opt(&mut co.total_cost, &input.total_cost);
        patch_opt(&mut co.delay_notice_ref, &input.delay_notice_ref);
        co.updated_at = Utc::now();
        Ok(Some(co.clone()))
    }

    async fn set_change_order_status(
        &self,
        id: DbId,
        status: ChangeOrderStatus,
    ) -> Result<Option<ChangeOrder>, DbError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .change_orders
            .iter_mut()
            .find(|co| co.id == id)
            .map(|co| {
                co.status = status;
                co.updated_at = Utc::now();
                co.clone()
            }))
    }

    async fn save_ocr_result(
        &self,
        id: DbId,
        image_url: &str,
        ocr_text: &str,
    ) -> Result<Option<ChangeOrder>, DbError> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .change_orders
            .iter_mut()
            .find(|co| co.id == id)
            .map(|co| {
                co.original_image_url = Some(image_url.to_string());
                co.ocr_text = Some(ocr_text.to_string());
                co.updated_at = Utc::now();
                co.clone()
            }))
    }

    async fn delete_change_order(&self, id: DbId) -> Result<bool, DbError> {
        Ok(self.tables.write().await.remove_change_order(id))
    }

    // -----------------------------------------------------------------------
    // Line items
    // -----------------------------------------------------------------------

    async fn list_line_items(
        &self,
        change_order_id: DbId,
    ) -> Result<Vec<ChangeOrderItem>, DbError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ChangeOrderItem> = tables
            .items
            .iter()
            .filter(|item| item.change_order_id == change_order_id)
            .cloned()
            .collect();
        // NULLS LAST, then creation order (sort_by is stable).
        rows.sort_by(|a, b| match (a.sort_order, b.sort_order) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Ok(rows)
    }

    async fn get_line_item(&self, id: DbId) -> Result<Option<ChangeOrderItem>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.items.iter().find(|item| item.id == id).cloned())
    }

    async fn create_line_item(&self, input: &CreateLineItem) -> Result<ChangeOrderItem, DbError> {
        let mut tables = self.tables.write().await;
        if !tables
            .change_orders
            .iter()
            .any(|co| co.id == input.change_order_id)
        {
            return Err(DbError::MissingParent("change order"));
        }
        let sort_order = input.sort_order.unwrap_or_else(|| {
            tables
                .items
                .iter()
                .filter(|item| item.change_order_id == input.change_order_id)
                .filter_map(|item| item.sort_order)
                .max()
                .unwrap_or(0)
                + 1
        });
        let now = Utc::now();
        let item = ChangeOrderItem {
            id: DbId::new_v4(),
            change_order_id: input.change_order_id,
            description: input.description.clone(),
            quantity: input.quantity,
            unit: input.unit.clone(),
            unit_price: input.unit_price,
            total_price: input.total_price,
            sort_order: Some(sort_order),
            created_at: now,
            updated_at: now,
        };
        tables.items.push(item.clone());
        Ok(item)
    }

    async fn update_line_item(
        &self,
        id: DbId,
        input: &UpdateLineItem,
    ) -> Result<Option<ChangeOrderItem>, DbError> {
        let mut tables = self.tables.write().await;
        let Some(item) = tables.items.iter_mut().find(|item| item.id == id) else {
            return Ok(None);
        };
        if let Some(v) = &input.description {
            item.description = v.clone();
        }
        item.quantity = input.quantity.or(item.quantity);
        if input.unit.is_some() {
            item.unit = input.unit.clone();
        }
        item.unit_price = input.unit_price.or(item.unit_price);
        item.total_price = input.total_price.or(item.total_price);
        item.sort_order = input.sort_order.or(item.sort_order);
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete_line_item(&self, id: DbId) -> Result<bool, DbError> {
        let mut tables = self.tables.write().await;
        let before = tables.items.len();
        tables.items.retain(|item| item.id != id);
        Ok(tables.items.len() != before)
    }

    // -----------------------------------------------------------------------
    // Delay notices
    // -----------------------------------------------------------------------

    async fn list_delay_notices(
        &self,
        filter: &DelayNoticeFilter,
    ) -> Result<Vec<DelayNotice>, DbError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<DelayNotice> = tables
            .notices
            .iter()
            .filter(|n| filter.status.is_none_or(|s| n.status == s))
            .filter(|n| match filter.q.as_deref() {
                None => true,
                Some(q) => contains_ci(&n.title, q) || contains_ci(&n.description, q),
            })
            .cloned()
            .collect();
        newest_first(&mut rows, |n| n.created_at);
        Ok(rows)
    }

    async fn get_delay_notice(&self, id: DbId) -> Result<Option<DelayNotice>, DbError> {
        let tables = self.tables.read().await;
        Ok(tables.notices.iter().find(|n| n.id == id).cloned())
    }

    async fn create_delay_notice(
        &self,
        input: &CreateDelayNotice,
    ) -> Result<DelayNotice, DbError> {
        let mut tables = self.tables.write().await;
        tables.require_project(input.project_id)?;
        let now = Utc::now();
        let notice = DelayNotice {
            id: DbId::new_v4(),
            project_id: input.project_id,
            title: input.title.clone(),
            description: input.description.clone(),
            incident_date: input.incident_date,
            reported_date: input.reported_date,
            time_impact_days_estimate: input.time_impact_days_estimate,
            recipients: input.recipients.clone(),
            status: DelayNoticeStatus::Draft,
            emailed_at: None,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.notices.push(notice.clone());
        Ok(notice)
    }

    async fn mark_delay_notice_sent(
        &self,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<DelayNotice>, DbError> {
        let mut tables = self.tables.write().await;
        Ok(tables.notices.iter_mut().find(|n| n.id == id).map(|n| {
            n.status = DelayNoticeStatus::Sent;
            n.emailed_at = Some(at);
            n.updated_at = Utc::now();
            n.clone()
        }))
    }

    // -----------------------------------------------------------------------
    // Aggregates
    // -----------------------------------------------------------------------

    async fn dashboard(&self, recent_limit: i64) -> Result<Dashboard, DbError> {
        let tables = self.tables.read().await;
        let mut recent: Vec<ChangeOrderListing> = tables
            .change_orders
            .iter()
            .filter_map(|co| tables.listing(co))
            .collect();
        newest_first(&mut recent, |r| r.created_at);
        recent.truncate(usize::try_from(recent_limit).unwrap_or(0));

        Ok(Dashboard {
            project_count: tables.projects.len() as i64,
            change_order_count: tables.change_orders.len() as i64,
            pending_change_order_count: tables
                .change_orders
                .iter()
                .filter(|co| co.status == ChangeOrderStatus::Pending)
                .count() as i64,
            recent_change_orders: recent,
        })
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
