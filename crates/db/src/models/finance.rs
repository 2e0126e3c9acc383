//! Finance models: per-user finance document, bills and physical card orders.

use inutile_core::finance::{PaymentCards, SubscriptionSnapshot};
use inutile_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row from the `user_finances` table. One per user.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserFinance {
    #[schema(value_type = i64)]
    pub id: DbId,
    #[schema(value_type = i64)]
    pub user_id: DbId,
    #[schema(value_type = PaymentCards)]
    pub payment_cards: Json<PaymentCards>,
    #[schema(value_type = Option<SubscriptionSnapshot>)]
    pub subscription: Option<Json<SubscriptionSnapshot>>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

/// A row from the `bills` table.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[schema(value_type = i64)]
    pub id: DbId,
    #[schema(value_type = i64)]
    pub user_id: DbId,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub status: String,
    pub invoice_url: Option<String>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub paid_at: Option<Timestamp>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

/// DTO for recording a bill.
#[derive(Debug, Clone)]
pub struct CreateBill {
    pub user_id: DbId,
    pub amount: f64,
    pub currency: Option<String>,
    pub description: String,
    pub status: Option<String>,
    pub invoice_url: Option<String>,
}

/// A row from the `physical_cards` table.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalCard {
    #[schema(value_type = i64)]
    pub id: DbId,
    #[schema(value_type = i64)]
    pub user_id: DbId,
    #[serde(rename = "type")]
    pub card_type: String,
    pub status: String,
    pub tracking_number: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub ordered_at: Timestamp,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub shipped_at: Option<Timestamp>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub delivered_at: Option<Timestamp>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}
