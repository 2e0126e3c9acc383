//! Scan ledger model and aggregation rows.

use inutile_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row from the `card_scans` table. Rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardScan {
    #[schema(value_type = i64)]
    pub id: DbId,
    #[schema(value_type = i64)]
    pub card_id: DbId,
    pub serial_number: String,
    #[schema(value_type = Option<i64>)]
    pub user_id: Option<DbId>,
    #[schema(value_type = String, format = DateTime)]
    pub scan_date: Timestamp,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub device: String,
    pub browser: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

/// DTO for appending a scan.
#[derive(Debug, Clone)]
pub struct CreateCardScan {
    pub card_id: DbId,
    pub serial_number: String,
    pub user_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub device: String,
    pub browser: String,
}

/// Scan count for one calendar day (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, ToSchema)]
pub struct DateCount {
    pub date: String,
    pub count: i64,
}

/// Scan count for one card.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SerialCount {
    pub serial_number: String,
    pub count: i64,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_scan: Option<Timestamp>,
}

/// Scan count grouped by a text label (device, country).
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, ToSchema)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}
