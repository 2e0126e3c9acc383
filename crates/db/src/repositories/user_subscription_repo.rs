//! Repository for the `user_subscriptions` table.

use inutile_core::types::DbId;
use sqlx::PgPool;

use crate::models::subscription::{
    CreateUserSubscription, UpdateUserSubscription, UserSubscription, UserSubscriptionDetail,
};

const COLUMNS: &str = "id, user_id, subscription_id, status, start_date, end_date, cancelled_at, \
    auto_renew, last_payment_date, next_payment_date, payment_method, created_at, updated_at";

/// Detail query: binding columns plus user and plan fields.
const DETAIL_SELECT: &str = "SELECT us.id, us.user_id, us.subscription_id, us.status, \
    us.start_date, us.end_date, us.cancelled_at, us.auto_renew, us.last_payment_date, \
    us.next_payment_date, us.payment_method, us.created_at, us.updated_at, \
    u.email AS user_email, u.first_name AS user_first_name, u.last_name AS user_last_name, \
    s.name AS plan_name, s.price AS plan_price, s.billing_interval AS plan_interval \
    FROM user_subscriptions us \
    JOIN users u ON u.id = us.user_id \
    JOIN subscriptions s ON s.id = us.subscription_id";

pub struct UserSubscriptionRepo;

impl UserSubscriptionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateUserSubscription,
    ) -> Result<UserSubscription, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_subscriptions
                (user_id, subscription_id, start_date, end_date, auto_renew,
                 next_payment_date, payment_method)
             VALUES ($1, $2, COALESCE($3, NOW()), $4, COALESCE($5, true), $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSubscription>(&query)
            .bind(input.user_id)
            .bind(input.subscription_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.auto_renew)
            .bind(input.next_payment_date)
            .bind(&input.payment_method)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserSubscription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_subscriptions WHERE id = $1");
        sqlx::query_as::<_, UserSubscription>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every binding with user and plan details, newest first.
    pub async fn list_detailed(pool: &PgPool) -> Result<Vec<UserSubscriptionDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} ORDER BY us.created_at DESC, us.id DESC");
        sqlx::query_as::<_, UserSubscriptionDetail>(&query)
            .fetch_all(pool)
            .await
    }

    /// Bindings of one plan with user details, newest first.
    pub async fn list_by_plan(
        pool: &PgPool,
        subscription_id: DbId,
    ) -> Result<Vec<UserSubscriptionDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE us.subscription_id = $1 ORDER BY us.created_at DESC, us.id DESC"
        );
        sqlx::query_as::<_, UserSubscriptionDetail>(&query)
            .bind(subscription_id)
            .fetch_all(pool)
            .await
    }

    /// Active bindings with their plan price and interval.
    pub async fn list_active_detailed(
        pool: &PgPool,
    ) -> Result<Vec<UserSubscriptionDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE us.status = 'active' ORDER BY us.id ASC");
        sqlx::query_as::<_, UserSubscriptionDetail>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn count_active_by_plan(
        pool: &PgPool,
        subscription_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM user_subscriptions WHERE subscription_id = $1 AND status = 'active'",
        )
        .bind(subscription_id)
        .fetch_one(pool)
        .await
    }

    /// Patch a binding. Moving to `cancelled` stamps `cancelled_at`; moving
    /// anywhere else clears it.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUserSubscription,
    ) -> Result<Option<UserSubscription>, sqlx::Error> {
        let query = format!(
            "UPDATE user_subscriptions SET
                status = COALESCE($2, status),
                cancelled_at = CASE
                    WHEN $2 = 'cancelled' AND status <> 'cancelled' THEN NOW()
                    WHEN $2 IS NOT NULL AND $2 <> 'cancelled' THEN NULL
                    ELSE cancelled_at END,
                end_date = COALESCE($3, end_date),
                auto_renew = COALESCE($4, auto_renew),
                last_payment_date = COALESCE($5, last_payment_date),
                next_payment_date = COALESCE($6, next_payment_date),
                payment_method = COALESCE($7, payment_method)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSubscription>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(input.end_date)
            .bind(input.auto_renew)
            .bind(input.last_payment_date)
            .bind(input.next_payment_date)
            .bind(&input.payment_method)
            .fetch_optional(pool)
            .await
    }
}
