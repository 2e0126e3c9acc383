//! Repository for the `physical_cards` table.

use inutile_core::types::DbId;
use sqlx::PgPool;

use crate::models::finance::PhysicalCard;

const COLUMNS: &str = "id, user_id, card_type, status, tracking_number, ordered_at, shipped_at, \
    delivered_at, created_at, updated_at";

pub struct PhysicalCardRepo;

impl PhysicalCardRepo {
    /// Order a card. New orders start in `ordered`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        card_type: &str,
    ) -> Result<PhysicalCard, sqlx::Error> {
        let query = format!(
            "INSERT INTO physical_cards (user_id, card_type) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PhysicalCard>(&query)
            .bind(user_id)
            .bind(card_type)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PhysicalCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM physical_cards WHERE id = $1");
        sqlx::query_as::<_, PhysicalCard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Cards ordered by a user, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PhysicalCard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM physical_cards WHERE user_id = $1
             ORDER BY ordered_at DESC, id DESC"
        );
        sqlx::query_as::<_, PhysicalCard>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Set the status (already transition-checked) and optionally the tracking
    /// number. Entering `shipped` or `delivered` stamps the matching timestamp.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        tracking_number: Option<&str>,
    ) -> Result<Option<PhysicalCard>, sqlx::Error> {
        let query = format!(
            "UPDATE physical_cards SET
                status = $2,
                tracking_number = COALESCE($3, tracking_number),
                shipped_at = CASE WHEN $2 = 'shipped' THEN NOW() ELSE shipped_at END,
                delivered_at = CASE WHEN $2 = 'delivered' THEN NOW() ELSE delivered_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PhysicalCard>(&query)
            .bind(id)
            .bind(status)
            .bind(tracking_number)
            .fetch_optional(pool)
            .await
    }
}
