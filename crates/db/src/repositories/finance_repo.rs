//! Repository for the `user_finances` table.

use inutile_core::finance::{PaymentCards, SubscriptionSnapshot};
use inutile_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::finance::UserFinance;

const COLUMNS: &str = "id, user_id, payment_cards, subscription, created_at, updated_at";

pub struct FinanceRepo;

impl FinanceRepo {
    /// Fetch the finance record of a user, creating an empty one if missing.
    ///
    /// Accounts created outside registration may have no record yet.
    pub async fn get_or_create(pool: &PgPool, user_id: DbId) -> Result<UserFinance, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_finances (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserFinance>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserFinance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_finances WHERE user_id = $1");
        sqlx::query_as::<_, UserFinance>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the saved payment cards of a user.
    pub async fn set_payment_cards(
        pool: &PgPool,
        user_id: DbId,
        cards: &PaymentCards,
    ) -> Result<UserFinance, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_finances (user_id, payment_cards) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET payment_cards = EXCLUDED.payment_cards
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserFinance>(&query)
            .bind(user_id)
            .bind(Json(cards))
            .fetch_one(pool)
            .await
    }

    /// Replace the subscription snapshot of a user.
    pub async fn set_subscription(
        pool: &PgPool,
        user_id: DbId,
        snapshot: &SubscriptionSnapshot,
    ) -> Result<UserFinance, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_finances (user_id, subscription) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET subscription = EXCLUDED.subscription
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserFinance>(&query)
            .bind(user_id)
            .bind(Json(snapshot))
            .fetch_one(pool)
            .await
    }
}
