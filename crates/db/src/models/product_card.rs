//! Catalog product model and DTOs.

use inutile_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row from the `product_cards` table.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    #[schema(value_type = i64)]
    pub id: DbId,
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub image: Option<String>,
    #[serde(rename = "active")]
    pub is_active: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductCard {
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub stock: i32,
    pub image: Option<String>,
    #[serde(rename = "active")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductCard {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub card_type: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub image: Option<String>,
    #[serde(rename = "active")]
    pub is_active: Option<bool>,
}
