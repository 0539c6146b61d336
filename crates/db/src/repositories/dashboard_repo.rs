//! Aggregate reads for the dashboard.

use sqlx::PgPool;

use crate::models::change_order::ChangeOrderListing;
use crate::models::dashboard::Dashboard;
use crate::repositories::change_order_repo::LISTING_COLUMNS;

/// Read-only aggregate queries.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Headline counts and the `recent_limit` newest change orders.
    pub async fn load(pool: &PgPool, recent_limit: i64) -> Result<Dashboard, sqlx::Error> {
        let (project_count, change_order_count, pending_change_order_count): (i64, i64, i64) =
            sqlx::query_as(
                "SELECT
                    (SELECT COUNT(*) FROM projects),
                    (SELECT COUNT(*) FROM change_orders),
                    (SELECT COUNT(*) FROM change_orders WHERE status = 'pending')",
            )
            .fetch_one(pool)
            .await?;

        let query = format!(
            "SELECT {LISTING_COLUMNS}
             FROM change_orders co
             JOIN projects p ON p.id = co.project_id
             ORDER BY co.created_at DESC, co.id
             LIMIT $1"
        );
        let recent_change_orders = sqlx::query_as::<_, ChangeOrderListing>(&query)
            .bind(recent_limit)
            .fetch_all(pool)
            .await?;

        Ok(Dashboard {
            project_count,
            change_order_count,
            pending_change_order_count,
            recent_change_orders,
        })
    }
}
