use std::sync::Arc;

use coflow_db::Store;
use coflow_mail::GmailSender;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (every field is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend: `PgStore` in production, `MemoryStore` in tests.
    pub store: Arc<dyn Store>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Gmail client. Credentials are checked when a notice is sent, not at startup.
    pub mailer: Arc<GmailSender>,
}
