//! The storage seam used by request handlers.
//!
//! [`PgStore`] delegates to the repositories; [`crate::MemoryStore`] keeps
//! everything in process for tests. Both report constraint violations the
//! same way so handlers map errors identically.

use async_trait::async_trait;
use coflow_core::status::ChangeOrderStatus;
use coflow_core::types::{DbId, Timestamp};

use crate::filters::{ChangeOrderFilter, DelayNoticeFilter, ProjectFilter};
use crate::models::change_order::{
    ChangeOrder, ChangeOrderListing, CreateChangeOrder, UpdateChangeOrder,
};
use crate::models::dashboard::Dashboard;
use crate::models::delay_notice::{CreateDelayNotice, DelayNotice};
use crate::models::line_item::{ChangeOrderItem, CreateLineItem, UpdateLineItem};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::repositories::{
    ChangeOrderRepo, DashboardRepo, DelayNoticeRepo, LineItemRepo, ProjectRepo,
};
use crate::{DbError, DbPool};

/// Persistence operations for every entity.
///
/// Lookups return `Ok(None)` and deletes return `Ok(false)` when the row
/// does not exist; only genuine failures are errors.
#[async_trait]
pub trait Store: Send + Sync {
    // -- projects --

    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DbError>;
    async fn get_project(&self, id: DbId) -> Result<Option<Project>, DbError>;
    async fn create_project(&self, input: &CreateProject) -> Result<Project, DbError>;
    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, DbError>;
    async fn delete_project(&self, id: DbId) -> Result<bool, DbError>;
    async fn list_project_change_orders(&self, project_id: DbId)
        -> Result<Vec<ChangeOrder>, DbError>;

    // -- change orders --

    async fn list_change_orders(
        &self,
        filter: &ChangeOrderFilter,
    ) -> Result<Vec<ChangeOrderListing>, DbError>;
    async fn get_change_order(&self, id: DbId) -> Result<Option<ChangeOrder>, DbError>;
    async fn create_change_order(&self, input: &CreateChangeOrder)
        -> Result<ChangeOrder, DbError>;
    async fn update_change_order(
        &self,
        id: DbId,
        input: &UpdateChangeOrder,
    ) -> Result<Option<ChangeOrder>, DbError>;
    async fn set_change_order_status(
        &self,
        id: DbId,
        status: ChangeOrderStatus,
    ) -> Result<Option<ChangeOrder>, DbError>;
    async fn save_ocr_result(
        &self,
        id: DbId,
        image_url: &str,
        ocr_text: &str,
    ) -> Result<Option<ChangeOrder>, DbError>;
    async fn delete_change_order(&self, id: DbId) -> Result<bool, DbError>;

    // -- line items --

    async fn list_line_items(&self, change_order_id: DbId)
        -> Result<Vec<ChangeOrderItem>, DbError>;
    async fn get_line_item(&self, id: DbId) -> Result<Option<ChangeOrderItem>, DbError>;
    async fn create_line_item(&self, input: &CreateLineItem) -> Result<ChangeOrderItem, DbError>;
    async fn update_line_item(
        &self,
        id: DbId,
        input: &UpdateLineItem,
    ) -> Result<Option<ChangeOrderItem>, DbError>;
    async fn delete_line_item(&self, id: DbId) -> Result<bool, DbError>;

    // -- delay notices --

    async fn list_delay_notices(
        &self,
        filter: &DelayNoticeFilter,
    ) -> Result<Vec<DelayNotice>, DbError>;
    async fn get_delay_notice(&self, id: DbId) -> Result<Option<DelayNotice>, DbError>;
    async fn create_delay_notice(&self, input: &CreateDelayNotice)
        -> Result<DelayNotice, DbError>;
    async fn mark_delay_notice_sent(
        &self,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<DelayNotice>, DbError>;

    // -- aggregates --

    async fn dashboard(&self, recent_limit: i64) -> Result<Dashboard, DbError>;

    /// Verify the backend is reachable.
    async fn ping(&self) -> Result<(), DbError>;
}

/// PostgreSQL-backed [`Store`].
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn list_projects(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DbError> {
        ProjectRepo::list(&self.pool, filter)
            .await
            .map_err(DbError::classify)
    }

    async fn get_project(&self, id: DbId) -> Result<Option<Project>, DbError> {
        ProjectRepo::find_by_id(&self.pool, id)
            .await
            .map_err(DbError::classify)
    }

    async fn create_project(&self, input: &CreateProject) -> Result<Project, DbError> {
        ProjectRepo::create(&self.pool, input)
            .await
            .map_err(DbError::classify)
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, DbError> {
        ProjectRepo::update(&self.pool, id, input)
            .await
            .map_err(DbError::classify)
    }

    async fn delete_project(&self, id: DbId) -> Result<bool, DbError> {
        ProjectRepo::delete(&self.pool, id)
            .await
            .map_err(DbError::classify)
    }

    async fn list_project_change_orders(
        &self,
        project_id: DbId,
    ) -> Result<Vec<ChangeOrder>, DbError> {
        ChangeOrderRepo::list_by_project(&self.pool, project_id)
            .await
            .map_err(DbError::classify)
    }

    async fn list_change_orders(
        &self,
        filter: &ChangeOrderFilter,
    ) -> Result<Vec<ChangeOrderListing>, DbError> {
        ChangeOrderRepo::list(&self.pool, filter)
            .await
            .map_err(DbError::classify)
    }

    async fn get_change_order(&self, id: DbId) -> Result<Option<ChangeOrder>, DbError> {
        ChangeOrderRepo::find_by_id(&self.pool, id)
            .await
            .map_err(DbError::classify)
    }

    async fn create_change_order(
        &self,
        input: &CreateChangeOrder,
    ) -> Result<ChangeOrder, DbError> {
        ChangeOrderRepo::create(&self.pool, input)
            .await
            .map_err(DbError::classify)
    }

    async fn update_change_order(
        &self,
        id: DbId,
        input: &UpdateChangeOrder,
    ) -> Result<Option<ChangeOrder>, DbError> {
        ChangeOrderRepo::update(&self.pool, id, input)
            .await
            .map_err(DbError::classify)
    }

    async fn set_change_order_status(
        &self,
        id: DbId,
        status: ChangeOrderStatus,
    ) -> Result<Option<ChangeOrder>, DbError> {
        ChangeOrderRepo::set_status(&self.pool, id, status)
            .await
            .map_err(DbError::classify)
    }

    async fn save_ocr_result(
        &self,
        id: DbId,
        image_url: &str,
        ocr_text: &str,
    ) -> Result<Option<ChangeOrder>, DbError> {
        ChangeOrderRepo::save_ocr_result(&self.pool, id, image_url, ocr_text)
            .await
            .map_err(DbError::classify)
    }

    async fn delete_change_order(&self, id: DbId) -> Result<bool, DbError> {
        ChangeOrderRepo::delete(&self.pool, id)
            .await
            .map_err(DbError::classify)
    }

    async fn list_line_items(
        &self,
        change_order_id: DbId,
    ) -> Result<Vec<ChangeOrderItem>, DbError> {
        LineItemRepo::list_by_change_order(&self.pool, change_order_id)
            .await
            .map_err(DbError::classify)
    }

    async fn get_line_item(&self, id: DbId) -> Result<Option<ChangeOrderItem>, DbError> {
        LineItemRepo::find_by_id(&self.pool, id)
            .await
            .map_err(DbError::classify)
    }

    async fn create_line_item(&self, input: &CreateLineItem) -> Result<ChangeOrderItem, DbError> {
        LineItemRepo::create(&self.pool, input)
            .await
            .map_err(DbError::classify)
    }

    async fn update_line_item(
        &self,
        id: DbId,
        input: &UpdateLineItem,
    ) -> Result<Option<ChangeOrderItem>, DbError> {
        LineItemRepo::update(&self.pool, id, input)
            .await
            .map_err(DbError::classify)
    }

    async fn delete_line_item(&self, id: DbId) -> Result<bool, DbError> {
        LineItemRepo::delete(&self.pool, id)
            .await
            .map_err(DbError::classify)
    }

    async fn list_delay_notices(
        &self,
        filter: &DelayNoticeFilter,
    ) -> Result<Vec<DelayNotice>, DbError> {
        DelayNoticeRepo::list(&self.pool, filter)
            .await
            .map_err(DbError::classify)
    }

    async fn get_delay_notice(&self, id: DbId) -> Result<Option<DelayNotice>, DbError> {
        DelayNoticeRepo::find_by_id(&self.pool, id)
            .await
            .map_err(DbError::classify)
    }

    async fn create_delay_notice(
        &self,
        input: &CreateDelayNotice,
    ) -> Result<DelayNotice, DbError> {
        DelayNoticeRepo::create(&self.pool, input)
            .await
            .map_err(DbError::classify)
    }

    async fn mark_delay_notice_sent(
        &self,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<DelayNotice>, DbError> {
        DelayNoticeRepo::mark_sent(&self.pool, id, at)
            .await
            .map_err(DbError::classify)
    }

    async fn dashboard(&self, recent_limit: i64) -> Result<Dashboard, DbError> {
        DashboardRepo::load(&self.pool, recent_limit)
            .await
            .map_err(DbError::classify)
    }

    async fn ping(&self) -> Result<(), DbError> {
        crate::health_check(&self.pool)
            .await
            .map_err(DbError::classify)
    }
}
