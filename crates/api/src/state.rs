use std::sync::Arc;

use inutile_events::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and the mailer are handles, the config sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: inutile_db::DbPool,
    /// Server configuration (JWT settings, frontend URL, timeouts).
    pub config: Arc<ServerConfig>,
    /// Outbound transactional email.
    pub mailer: Mailer,
}
