//! Repository for the `orders` table.

use inutile_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::order::{CreateOrder, Order};

const COLUMNS: &str = "id, user_id, customer_name, email, items, total, status, card_design, \
    shipping_address, tracking_number, created_at, updated_at";

pub struct OrderRepo;

impl OrderRepo {
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders (user_id, customer_name, email, items, total, card_design, shipping_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(input.user_id)
            .bind(&input.customer_name)
            .bind(&input.email)
            .bind(Json(&input.items))
            .bind(input.total)
            .bind(&input.card_design)
            .bind(&input.shipping_address)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All orders, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Order>(&query).fetch_all(pool).await
    }

    /// Set the status (already transition-checked) and optionally the tracking number.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        tracking_number: Option<&str>,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET status = $2, tracking_number = COALESCE($3, tracking_number)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(status)
            .bind(tracking_number)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_status(pool: &PgPool, status: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE status = $1")
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// Sum of `total` over completed orders.
    pub async fn completed_revenue(pool: &PgPool) -> Result<f64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0)::FLOAT8 FROM orders WHERE status = 'completed'",
        )
        .fetch_one(pool)
        .await
    }
}
