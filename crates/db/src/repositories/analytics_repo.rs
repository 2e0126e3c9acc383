//! Aggregate queries behind the admin analytics endpoints.
//!
//! Window bounds are half-open: `start <= t < end`.

use inutile_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::analytics::{DailyActivity, ProfileScans, TotalCounts, UserAgentCount};
use crate::models::card_scan::LabelCount;

pub struct AnalyticsRepo;

impl AnalyticsRepo {
    pub async fn totals(pool: &PgPool) -> Result<TotalCounts, sqlx::Error> {
        sqlx::query_as::<_, TotalCounts>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM profiles) AS profiles,
                (SELECT COUNT(*) FROM client_cards) AS cards,
                (SELECT COUNT(*) FROM card_scans) AS scans,
                (SELECT COUNT(*) FROM orders) AS orders",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn users_created(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE created_at >= $1 AND created_at < $2")
            .bind(start)
            .bind(end)
            .fetch_one(pool)
            .await
    }

    pub async fn profiles_created(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM profiles WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
    }

    pub async fn scans(pool: &PgPool, start: Timestamp, end: Timestamp) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM card_scans WHERE scan_date >= $1 AND scan_date < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
    }

    pub async fn orders(pool: &PgPool, start: Timestamp, end: Timestamp) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE created_at >= $1 AND created_at < $2")
            .bind(start)
            .bind(end)
            .fetch_one(pool)
            .await
    }

    /// Sum of completed order totals created in the window.
    pub async fn revenue(pool: &PgPool, start: Timestamp, end: Timestamp) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0)::FLOAT8 FROM orders
             WHERE status = 'completed' AND created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
    }

    /// Users created before `start` who logged in since.
    pub async fn returning_users(pool: &PgPool, start: Timestamp) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM users WHERE created_at < $1 AND last_login_at >= $1",
        )
        .bind(start)
        .fetch_one(pool)
        .await
    }

    /// Users with at least one profile or one card.
    pub async fn engaged_users(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM users u
             WHERE EXISTS (SELECT 1 FROM profiles p WHERE p.user_id = u.id)
                OR EXISTS (SELECT 1 FROM client_cards c WHERE c.user_id = u.id)",
        )
        .fetch_one(pool)
        .await
    }

    /// Distinct users owning at least one activated card.
    pub async fn users_with_activated_cards(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(DISTINCT user_id) FROM client_cards
             WHERE status = 'activated' AND user_id IS NOT NULL",
        )
        .fetch_one(pool)
        .await
    }

    /// Creation time of the first user, if any.
    pub async fn first_user_at(pool: &PgPool) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar("SELECT MIN(created_at) FROM users")
            .fetch_one(pool)
            .await
    }

    /// One row per UTC day for the `days` days ending today, oldest first.
    /// Days without activity are present with zero values.
    pub async fn daily(pool: &PgPool, days: i64) -> Result<Vec<DailyActivity>, sqlx::Error> {
        sqlx::query_as::<_, DailyActivity>(
            "WITH days AS (
                SELECT generate_series(
                    (NOW() AT TIME ZONE 'UTC')::DATE - ($1::INT4 - 1),
                    (NOW() AT TIME ZONE 'UTC')::DATE,
                    INTERVAL '1 day'
                )::DATE AS day
             )
             SELECT TO_CHAR(d.day, 'YYYY-MM-DD') AS date,
                (SELECT COUNT(*) FROM users u
                    WHERE (u.created_at AT TIME ZONE 'UTC')::DATE = d.day) AS users,
                (SELECT COUNT(*) FROM card_scans s
                    WHERE (s.scan_date AT TIME ZONE 'UTC')::DATE = d.day) AS scans,
                (SELECT COALESCE(SUM(o.total), 0)::FLOAT8 FROM orders o
                    WHERE o.status = 'completed'
                      AND (o.created_at AT TIME ZONE 'UTC')::DATE = d.day) AS revenue
             FROM days d
             ORDER BY d.day",
        )
        .bind(days)
        .fetch_all(pool)
        .await
    }

    /// Profiles with the most scans in the window, summed over their cards.
    pub async fn top_profiles(
        pool: &PgPool,
        start: Timestamp,
        limit: i64,
    ) -> Result<Vec<ProfileScans>, sqlx::Error> {
        sqlx::query_as::<_, ProfileScans>(
            "SELECT p.id AS profile_id, p.slug, p.display_name, COUNT(s.id) AS scans
             FROM card_scans s
             JOIN client_cards c ON c.id = s.card_id
             JOIN profiles p ON p.id = c.profile_id
             WHERE s.scan_date >= $1
             GROUP BY p.id, p.slug, p.display_name
             ORDER BY scans DESC, p.id ASC
             LIMIT $2",
        )
        .bind(start)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Scan counts per raw user agent in the window. Bucketing happens in the
    /// caller so the heuristic stays in one place.
    pub async fn user_agents(
        pool: &PgPool,
        start: Timestamp,
    ) -> Result<Vec<UserAgentCount>, sqlx::Error> {
        sqlx::query_as::<_, UserAgentCount>(
            "SELECT user_agent, COUNT(*) AS count FROM card_scans
             WHERE scan_date >= $1
             GROUP BY user_agent",
        )
        .bind(start)
        .fetch_all(pool)
        .await
    }

    /// Scan counts per country code in the window, largest first.
    pub async fn countries(
        pool: &PgPool,
        start: Timestamp,
        limit: i64,
    ) -> Result<Vec<LabelCount>, sqlx::Error> {
        sqlx::query_as::<_, LabelCount>(
            "SELECT UPPER(country) AS label, COUNT(*) AS count FROM card_scans
             WHERE scan_date >= $1 AND country IS NOT NULL AND country <> ''
             GROUP BY UPPER(country)
             ORDER BY count DESC, label ASC
             LIMIT $2",
        )
        .bind(start)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
