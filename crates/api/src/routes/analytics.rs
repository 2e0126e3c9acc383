//! Route definitions for `/analytics`. Every route requires the admin role.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`. All accept `?period=`.
///
/// ```text
/// GET    /                 -> get_overview
/// GET    /daily            -> get_daily
/// GET    /top-profiles     -> get_top_profiles (?limit=)
/// GET    /devices          -> get_devices
/// GET    /countries        -> get_countries (?limit=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(analytics::get_overview))
        .route("/daily", get(analytics::get_daily))
        .route("/top-profiles", get(analytics::get_top_profiles))
        .route("/devices", get(analytics::get_devices))
        .route("/countries", get(analytics::get_countries))
}
