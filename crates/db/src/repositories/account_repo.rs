//! Multi-table account creation.
//!
//! A new account is a user row, its profile and its finance record. The three
//! inserts run in one transaction so a failure leaves nothing behind.

use inutile_core::profile::Theme;
use inutile_core::slug;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::profile::Profile;
use crate::models::user::{CreateUser, User};
use crate::repositories::{profile_repo, user_repo};

/// Creates users together with their dependent rows.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a user, a profile with the first free slug derived from
    /// `base_slug`, and an empty finance record.
    ///
    /// A concurrent registration with the same email surfaces as a unique
    /// violation on `uq_users_email`.
    pub async fn register(
        pool: &PgPool,
        input: &CreateUser,
        base_slug: &str,
    ) -> Result<(User, Profile), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (email, password_hash, first_name, last_name, phone, role, company_id)
             VALUES (LOWER($1), $2, $3, $4, $5, COALESCE($6, 'user'), $7)
             RETURNING {}",
            user_repo::COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.phone)
            .bind(&input.role)
            .bind(input.company_id)
            .fetch_one(&mut *tx)
            .await?;

        let slug = Self::free_slug(&mut tx, base_slug).await?;
        let display_name = format!("{} {}", user.first_name, user.last_name)
            .trim()
            .to_string();

        let query = format!(
            "INSERT INTO profiles (user_id, slug, display_name, email, phone, theme)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            profile_repo::COLUMNS
        );
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user.id)
            .bind(&slug)
            .bind(&display_name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(Json(Theme::default()))
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO user_finances (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((user, profile))
    }

    /// First candidate slug (`base`, `base1`, `base2`, ...) not used by any profile.
    async fn free_slug(conn: &mut PgConnection, base: &str) -> Result<String, sqlx::Error> {
        let mut attempt = 0;
        loop {
            let candidate = slug::candidate(base, attempt);
            let taken: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE slug = $1)")
                    .bind(&candidate)
                    .fetch_one(&mut *conn)
                    .await?;
            if !taken {
                return Ok(candidate);
            }
            attempt += 1;
        }
    }
}
