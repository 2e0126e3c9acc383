//! Repository for the `product_cards` table (the card catalog).

use inutile_core::types::DbId;
use sqlx::PgPool;

use crate::models::product_card::{CreateProductCard, ProductCard, UpdateProductCard};

const COLUMNS: &str =
    "id, name, card_type, description, price, stock, image, is_active, created_at, updated_at";

pub struct ProductCardRepo;

impl ProductCardRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<ProductCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM product_cards ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, ProductCard>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProductCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM product_cards WHERE id = $1");
        sqlx::query_as::<_, ProductCard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        input: &CreateProductCard,
    ) -> Result<ProductCard, sqlx::Error> {
        let query = format!(
            "INSERT INTO product_cards (name, card_type, description, price, stock, image, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, true))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductCard>(&query)
            .bind(&input.name)
            .bind(&input.card_type)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(&input.image)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProductCard,
    ) -> Result<Option<ProductCard>, sqlx::Error> {
        let query = format!(
            "UPDATE product_cards SET
                name = COALESCE($2, name),
                card_type = COALESCE($3, card_type),
                description = COALESCE($4, description),
                price = COALESCE($5, price),
                stock = COALESCE($6, stock),
                image = COALESCE($7, image),
                is_active = COALESCE($8, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductCard>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.card_type)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.stock)
            .bind(&input.image)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Flip `is_active`.
    pub async fn toggle_active(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductCard>, sqlx::Error> {
        let query = format!(
            "UPDATE product_cards SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductCard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM product_cards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Active products with `stock < threshold`, lowest stock first.
    pub async fn low_stock(pool: &PgPool, threshold: i32) -> Result<Vec<ProductCard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM product_cards
             WHERE is_active = true AND stock < $1
             ORDER BY stock ASC, id ASC"
        );
        sqlx::query_as::<_, ProductCard>(&query)
            .bind(threshold)
            .fetch_all(pool)
            .await
    }
}
