//! Physical client card (NFC / QR) model and DTOs.

use inutile_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row from the `client_cards` table.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientCard {
    #[schema(value_type = i64)]
    pub id: DbId,
    pub serial_number: String,
    #[schema(value_type = Option<i64>)]
    pub order_id: Option<DbId>,
    #[schema(value_type = Option<i64>)]
    pub user_id: Option<DbId>,
    #[schema(value_type = Option<i64>)]
    pub profile_id: Option<DbId>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub card_type: Option<String>,
    pub design: Option<String>,
    pub status: String,
    pub shipping_address: Option<String>,
    pub tracking_number: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub order_date: Timestamp,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub delivery_date: Option<Timestamp>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub activated_at: Option<Timestamp>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

/// DTO for creating a card. The serial number must already be normalized.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientCard {
    pub serial_number: String,
    #[schema(value_type = Option<i64>)]
    pub order_id: Option<DbId>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub card_type: Option<String>,
    pub design: Option<String>,
    pub shipping_address: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub order_date: Option<Timestamp>,
}

/// Admin patch for tracking and shipping fields, with an optional status.
/// The caller checks the status transition before writing.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientCard {
    pub tracking_number: Option<String>,
    pub shipping_address: Option<String>,
    pub status: Option<String>,
}
