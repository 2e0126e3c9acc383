//! Repository for the `profiles` table.

use inutile_core::profile::{ProfileLink, Theme};
use inutile_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::profile::{Profile, ProfileSummary, UpdateProfile};

pub(crate) const COLUMNS: &str = "id, user_id, slug, display_name, bio, avatar_url, email, phone, \
    links, social_links, theme, is_public, template_id, created_at, updated_at";

/// Provides CRUD operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by slug. Slugs are stored lowercase.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE slug = LOWER($1)");
        sqlx::query_as::<_, Profile>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// The profile owned by a user (the oldest, if several exist).
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles WHERE user_id = $1 ORDER BY id ASC LIMIT 1"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether a slug is taken by a profile other than `exclude_id`.
    pub async fn slug_taken(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM profiles WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2)
             )",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Admin listing with link counts and owner email, newest first.
    pub async fn list_summaries(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProfileSummary>, sqlx::Error> {
        sqlx::query_as::<_, ProfileSummary>(
            "SELECT p.id, p.user_id, p.slug, p.display_name, p.is_public,
                    jsonb_array_length(p.links)::INT4 AS links_count,
                    u.email AS owner_email, p.created_at
             FROM profiles p
             LEFT JOIN users u ON u.id = p.user_id
             ORDER BY p.created_at DESC, p.id DESC
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(pool)
            .await
    }

    /// Update a profile. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                display_name = COALESCE($2, display_name),
                bio = COALESCE($3, bio),
                avatar_url = COALESCE($4, avatar_url),
                email = COALESCE($5, email),
                phone = COALESCE($6, phone),
                links = COALESCE($7, links),
                social_links = COALESCE($8, social_links),
                theme = COALESCE($9, theme),
                is_public = COALESCE($10, is_public),
                template_id = COALESCE($11, template_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.bio)
            .bind(&input.avatar_url)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.links.as_ref().map(Json))
            .bind(input.social_links.as_ref().map(Json))
            .bind(input.theme.as_ref().map(Json))
            .bind(input.is_public)
            .bind(input.template_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the whole link list.
    pub async fn set_links(
        pool: &PgPool,
        id: DbId,
        links: &[ProfileLink],
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("UPDATE profiles SET links = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(Json(links))
            .fetch_optional(pool)
            .await
    }

    pub async fn update_slug(
        pool: &PgPool,
        id: DbId,
        slug: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("UPDATE profiles SET slug = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_public`. Returns `None` if the profile does not exist.
    pub async fn toggle_public(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET is_public = NOT is_public WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Hide every profile of a user. Used when the account is soft-deleted.
    pub async fn hide_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE profiles SET is_public = false WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Copy a template's theme onto a profile and remember which template it was.
    pub async fn apply_template(
        pool: &PgPool,
        id: DbId,
        template_id: DbId,
        theme: &Theme,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET theme = $3, template_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(template_id)
            .bind(Json(theme))
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of profiles belonging to members of a company.
    pub async fn count_by_company(pool: &PgPool, company_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM profiles p
             JOIN users u ON u.id = p.user_id
             WHERE u.company_id = $1",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await
    }
}
