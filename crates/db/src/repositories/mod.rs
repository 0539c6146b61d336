//! Repository modules, one per table.
//!
//! Each repository is a zero-sized struct with async methods that accept
//! a `&PgPool` and return `Result<T, sqlx::Error>`.

pub mod change_order_repo;
pub mod dashboard_repo;
pub mod delay_notice_repo;
pub mod line_item_repo;
pub mod project_repo;

pub use change_order_repo::ChangeOrderRepo;
pub use dashboard_repo::DashboardRepo;
pub use delay_notice_repo::DelayNoticeRepo;
pub use line_item_repo::LineItemRepo;
pub use project_repo::ProjectRepo;
