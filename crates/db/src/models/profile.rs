//! Profile entity model and DTOs.

use inutile_core::profile::{ProfileLink, SocialLink, Theme};
use inutile_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[schema(value_type = i64)]
    pub id: DbId,
    #[schema(value_type = i64)]
    pub user_id: DbId,
    pub slug: String,
    pub display_name: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(value_type = Vec<ProfileLink>)]
    pub links: Json<Vec<ProfileLink>>,
    #[schema(value_type = Vec<SocialLink>)]
    pub social_links: Json<Vec<SocialLink>>,
    #[schema(value_type = Theme)]
    pub theme: Json<Theme>,
    pub is_public: bool,
    #[schema(value_type = Option<i64>)]
    pub template_id: Option<DbId>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: Timestamp,
}

/// Profile row with the number of links, for admin listings.
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    #[schema(value_type = i64)]
    pub id: DbId,
    #[schema(value_type = i64)]
    pub user_id: DbId,
    pub slug: String,
    pub display_name: String,
    pub is_public: bool,
    pub links_count: i32,
    pub owner_email: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: Timestamp,
}

/// DTO for patching a profile. `None` keeps the stored value.
///
/// Links, social links and theme are whole replacements here; merging with the
/// previous value happens before the DTO is built.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub links: Option<Vec<ProfileLink>>,
    pub social_links: Option<Vec<SocialLink>>,
    pub theme: Option<Theme>,
    pub is_public: Option<bool>,
    pub template_id: Option<DbId>,
}
