//! Profile template model and DTOs.

use inutile_core::profile::Theme;
use inutile_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[schema(value_type = i64)]
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    #[schema(value_type = Theme)]
    pub theme: Json<Theme>,
    pub is_active: bool,
    pub is_premium: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplate {
    pub name: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    pub is_active: Option<bool>,
    pub is_premium: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub theme: Option<Theme>,
    pub is_active: Option<bool>,
    pub is_premium: Option<bool>,
}
