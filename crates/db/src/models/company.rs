//! Company entity model and DTOs.

use inutile_core::company::Address;
use inutile_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[schema(value_type = i64)]
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Option<Address>)]
    pub address: Option<Json<Address>>,
    #[schema(value_type = Option<Address>)]
    pub billing_address: Option<Json<Address>>,
    #[schema(value_type = i64)]
    pub admin_user_id: DbId,
    #[schema(value_type = Option<i64>)]
    pub subscription_id: Option<DbId>,
    pub max_employees: i32,
    pub max_cards: i32,
    pub status: String,
    pub notes: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

/// Company row with live employee and card counts, for listings.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyWithCounts {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub company: Company,
    pub employee_count: i64,
    pub card_count: i64,
}

/// Headline numbers for one company.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStats {
    pub total_employees: i64,
    pub active_employees: i64,
    pub total_cards: i64,
    pub active_cards: i64,
    pub profiles_created: i64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompany {
    pub name: String,
    pub slug: String,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub billing_address: Option<Address>,
    #[schema(value_type = i64)]
    pub admin_user_id: DbId,
    #[schema(value_type = Option<i64>)]
    pub subscription_id: Option<DbId>,
    pub max_employees: Option<i32>,
    pub max_cards: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub logo: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub billing_address: Option<Address>,
    #[schema(value_type = Option<i64>)]
    pub subscription_id: Option<DbId>,
    pub max_employees: Option<i32>,
    pub max_cards: Option<i32>,
    pub status: Option<String>,
    pub notes: Option<String>,
}
