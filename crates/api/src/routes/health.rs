use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use inutile_core::types::Timestamp;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database is unreachable.
    #[schema(value_type = String)]
    pub status: &'static str,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: Timestamp,
    /// Crate version from Cargo.toml.
    #[schema(value_type = String)]
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health -- returns service and database health.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Service and database health",
    responses((status = 200, body = HealthResponse))
)]
pub(crate) async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = inutile_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mount health check routes (root level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
