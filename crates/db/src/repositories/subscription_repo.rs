//! Repository for the `subscriptions` table (plan catalog).

use inutile_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::subscription::{CreatePlan, Plan, PlanWithStats, UpdatePlan};

const COLUMNS: &str = "id, name, slug, description, price, currency, billing_interval, features, \
    max_profiles, max_cards, custom_domain, analytics, priority, is_active, created_at, updated_at";

const S_COLUMNS: &str = "s.id, s.name, s.slug, s.description, s.price, s.currency, \
    s.billing_interval, s.features, s.max_profiles, s.max_cards, s.custom_domain, s.analytics, \
    s.priority, s.is_active, s.created_at, s.updated_at";

pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Plans offered publicly: active ones, highest priority first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Plan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions WHERE is_active = true
             ORDER BY priority DESC, price ASC, id ASC"
        );
        sqlx::query_as::<_, Plan>(&query).fetch_all(pool).await
    }

    /// Every plan with its subscriber counts.
    pub async fn list_with_stats(pool: &PgPool) -> Result<Vec<PlanWithStats>, sqlx::Error> {
        let query = format!(
            "SELECT {S_COLUMNS},
                COUNT(us.id) FILTER (WHERE us.status = 'active') AS active_subscribers,
                COUNT(us.id) AS total_subscribers
             FROM subscriptions s
             LEFT JOIN user_subscriptions us ON us.subscription_id = s.id
             GROUP BY s.id
             ORDER BY s.priority DESC, s.id ASC"
        );
        sqlx::query_as::<_, PlanWithStats>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Plan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM subscriptions WHERE id = $1");
        sqlx::query_as::<_, Plan>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &PgPool, input: &CreatePlan) -> Result<Plan, sqlx::Error> {
        let query = format!(
            "INSERT INTO subscriptions
                (name, slug, description, price, currency, billing_interval, features,
                 max_profiles, max_cards, custom_domain, analytics, priority, is_active)
             VALUES ($1, LOWER($2), $3, $4, COALESCE($5, 'EUR'), COALESCE($6, 'monthly'), $7,
                     COALESCE($8, 1), COALESCE($9, 1), COALESCE($10, false),
                     COALESCE($11, false), COALESCE($12, 0), COALESCE($13, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Plan>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.currency)
            .bind(&input.billing_interval)
            .bind(Json(&input.features))
            .bind(input.max_profiles)
            .bind(input.max_cards)
            .bind(input.custom_domain)
            .bind(input.analytics)
            .bind(input.priority)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePlan,
    ) -> Result<Option<Plan>, sqlx::Error> {
        let query = format!(
            "UPDATE subscriptions SET
                name = COALESCE($2, name),
                slug = COALESCE(LOWER($3), slug),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                currency = COALESCE($6, currency),
                billing_interval = COALESCE($7, billing_interval),
                features = COALESCE($8, features),
                max_profiles = COALESCE($9, max_profiles),
                max_cards = COALESCE($10, max_cards),
                custom_domain = COALESCE($11, custom_domain),
                analytics = COALESCE($12, analytics),
                priority = COALESCE($13, priority),
                is_active = COALESCE($14, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Plan>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.currency)
            .bind(&input.billing_interval)
            .bind(input.features.as_ref().map(Json))
            .bind(input.max_profiles)
            .bind(input.max_cards)
            .bind(input.custom_domain)
            .bind(input.analytics)
            .bind(input.priority)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
