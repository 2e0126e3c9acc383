//! Repository for the `bills` table.

use inutile_core::types::DbId;
use sqlx::PgPool;

use crate::models::finance::{Bill, CreateBill};

const COLUMNS: &str = "id, user_id, amount, currency, description, status, invoice_url, \
    paid_at, created_at, updated_at";

pub struct BillRepo;

impl BillRepo {
    /// Record a bill. A bill created as `paid` gets `paid_at = NOW()`.
    pub async fn create(pool: &PgPool, input: &CreateBill) -> Result<Bill, sqlx::Error> {
        let query = format!(
            "INSERT INTO bills (user_id, amount, currency, description, status, invoice_url, paid_at)
             VALUES ($1, $2, COALESCE($3, 'EUR'), $4, COALESCE($5, 'pending'), $6,
                     CASE WHEN $5 = 'paid' THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bill>(&query)
            .bind(input.user_id)
            .bind(input.amount)
            .bind(&input.currency)
            .bind(&input.description)
            .bind(&input.status)
            .bind(&input.invoice_url)
            .fetch_one(pool)
            .await
    }

    /// Bills of a user, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Bill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bills WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Bill>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bills WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
