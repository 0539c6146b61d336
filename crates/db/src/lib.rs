//! Persistence for projects, change orders, line items, and delay notices.
//!
//! Repositories are zero-sized structs with async methods taking `&PgPool`.
//! Request handlers never call them directly: they go through the
//! [`Store`] trait so tests can swap in [`MemoryStore`].

use sqlx::postgres::PgPoolOptions;

pub mod filters;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use memory::MemoryStore;
pub use store::{PgStore, Store};

pub type DbPool = sqlx::PgPool;

/// Errors surfaced by a [`Store`].
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A unique constraint (named `uq_*`) rejected the write.
    #[error("Duplicate value violates unique constraint: {0}")]
    UniqueViolation(String),

    /// The referenced parent row does not exist.
    #[error("Referenced {0} does not exist")]
    MissingParent(&'static str),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Classify a raw sqlx error, pulling out constraint violations the
    /// caller can report meaningfully.
    pub fn classify(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.code().as_deref() {
                // unique_violation
                Some("23505") => {
                    let constraint = db_err.constraint().unwrap_or("unknown");
                    if constraint.starts_with("uq_") {
                        return Self::UniqueViolation(constraint.to_string());
                    }
                }
                // foreign_key_violation
                Some("23503") => {
                    let constraint = db_err.constraint().unwrap_or_default();
                    let parent = if constraint.contains("project") {
                        "project"
                    } else {
                        "change order"
                    };
                    return Self::MissingParent(parent);
                }
                _ => {}
            }
        }
        Self::Sqlx(err)
    }
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify connectivity.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
