//! Repository for the `templates` table.

use inutile_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::template::{CreateTemplate, Template, UpdateTemplate};

const COLUMNS: &str =
    "id, name, description, thumbnail_url, theme, is_active, is_premium, created_at, updated_at";

pub struct TemplateRepo;

impl TemplateRepo {
    /// Active templates, free ones first, then by name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates WHERE is_active = true
             ORDER BY is_premium ASC, name ASC"
        );
        sqlx::query_as::<_, Template>(&query).fetch_all(pool).await
    }

    /// Every template, newest first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Template>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreateTemplate) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates (name, description, thumbnail_url, theme, is_active, is_premium)
             VALUES ($1, $2, $3, $4, COALESCE($5, true), COALESCE($6, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.thumbnail_url)
            .bind(Json(&input.theme))
            .bind(input.is_active)
            .bind(input.is_premium)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "UPDATE templates SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                thumbnail_url = COALESCE($4, thumbnail_url),
                theme = COALESCE($5, theme),
                is_active = COALESCE($6, is_active),
                is_premium = COALESCE($7, is_premium)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.thumbnail_url)
            .bind(input.theme.as_ref().map(Json))
            .bind(input.is_active)
            .bind(input.is_premium)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
