//! Read-only aggregation rows for the admin dashboards.

use inutile_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// Row counts of the main tables.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalCounts {
    pub users: i64,
    pub profiles: i64,
    pub cards: i64,
    pub scans: i64,
    pub orders: i64,
}

/// Activity for one calendar day (`YYYY-MM-DD`).
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct DailyActivity {
    pub date: String,
    pub users: i64,
    pub scans: i64,
    pub revenue: f64,
}

/// Scan total of one profile across all of its cards.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileScans {
    #[schema(value_type = i64)]
    pub profile_id: DbId,
    pub slug: String,
    pub display_name: String,
    pub scans: i64,
}

/// Scan count for one raw `User-Agent` value.
#[derive(Debug, Clone, FromRow)]
pub struct UserAgentCount {
    pub user_agent: Option<String>,
    pub count: i64,
}
