//! Order entity model and DTOs.

use inutile_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[schema(value_type = i64)]
    pub id: DbId,
    #[schema(value_type = Option<i64>)]
    pub user_id: Option<DbId>,
    pub customer_name: String,
    pub email: String,
    #[schema(value_type = Vec<String>)]
    pub items: Json<Vec<String>>,
    pub total: f64,
    pub status: String,
    pub card_design: Option<String>,
    pub shipping_address: Option<String>,
    pub tracking_number: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

/// DTO for creating an order.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[schema(value_type = Option<i64>)]
    pub user_id: Option<DbId>,
    pub customer_name: String,
    pub email: String,
    #[serde(default)]
    pub items: Vec<String>,
    pub total: f64,
    pub card_design: Option<String>,
    pub shipping_address: Option<String>,
}
