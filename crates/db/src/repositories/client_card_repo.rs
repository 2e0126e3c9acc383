//! Repository for the `client_cards` table.
//!
//! Ownership changes (activation, company assignment) are single conditional
//! `UPDATE` statements. A card can therefore never end up bound to two users,
//! whatever the interleaving of concurrent requests.

use inutile_core::types::DbId;
use sqlx::PgPool;

use crate::models::client_card::{ClientCard, CreateClientCard, UpdateClientCard};

const COLUMNS: &str = "id, serial_number, order_id, user_id, profile_id, customer_name, email, \
    card_type, design, status, shipping_address, tracking_number, order_date, delivery_date, \
    activated_at, created_at, updated_at";

pub struct ClientCardRepo;

impl ClientCardRepo {
    /// Insert a card. `order_date` defaults to now.
    pub async fn create(pool: &PgPool, input: &CreateClientCard) -> Result<ClientCard, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_cards
                (serial_number, order_id, customer_name, email, card_type, design,
                 shipping_address, order_date)
             VALUES (UPPER($1), $2, $3, $4, $5, $6, $7, COALESCE($8, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientCard>(&query)
            .bind(&input.serial_number)
            .bind(input.order_id)
            .bind(&input.customer_name)
            .bind(&input.email)
            .bind(&input.card_type)
            .bind(&input.design)
            .bind(&input.shipping_address)
            .bind(input.order_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ClientCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM client_cards WHERE id = $1");
        sqlx::query_as::<_, ClientCard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a card by serial number (case-insensitive; serials are stored uppercase).
    pub async fn find_by_serial(
        pool: &PgPool,
        serial: &str,
    ) -> Result<Option<ClientCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM client_cards WHERE serial_number = UPPER(TRIM($1))");
        sqlx::query_as::<_, ClientCard>(&query)
            .bind(serial)
            .fetch_optional(pool)
            .await
    }

    /// All cards, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ClientCard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM client_cards ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, ClientCard>(&query).fetch_all(pool).await
    }

    pub async fn list_by_order(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<ClientCard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_cards WHERE order_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ClientCard>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// Cards bound to a user, most recently activated first.
    pub async fn list_by_user(pool: &PgPool, user_id: DbId) -> Result<Vec<ClientCard>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_cards WHERE user_id = $1
             ORDER BY activated_at DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, ClientCard>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Patch tracking and shipping fields, and the status when
    /// `input.status` is set (already transition-checked by the caller).
    ///
    /// The write only applies while the card is still in `current_status`,
    /// so a concurrent status change makes this return `None`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateClientCard,
        current_status: &str,
    ) -> Result<Option<ClientCard>, sqlx::Error> {
        let query = format!(
            "UPDATE client_cards SET
                tracking_number = COALESCE($2, tracking_number),
                shipping_address = COALESCE($3, shipping_address),
                status = COALESCE($4, status),
                delivery_date = CASE WHEN $4 = 'delivered' THEN NOW() ELSE delivery_date END,
                activated_at = CASE WHEN $4 = 'activated' THEN NOW() ELSE activated_at END
             WHERE id = $1 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientCard>(&query)
            .bind(id)
            .bind(&input.tracking_number)
            .bind(&input.shipping_address)
            .bind(&input.status)
            .bind(current_status)
            .fetch_optional(pool)
            .await
    }

    /// Set the status (already transition-checked). Entering `delivered` stamps
    /// `delivery_date`; entering `activated` stamps `activated_at`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<ClientCard>, sqlx::Error> {
        let query = format!(
            "UPDATE client_cards SET
                status = $2,
                delivery_date = CASE WHEN $2 = 'delivered' THEN NOW() ELSE delivery_date END,
                activated_at = CASE WHEN $2 = 'activated' THEN NOW() ELSE activated_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientCard>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM client_cards WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bind a card to `user_id` and `profile_id` and mark it activated.
    ///
    /// Succeeds when the card has no owner, whatever its status, or when it
    /// is assigned to the same user but not yet activated. Returns `None`
    /// otherwise (including when the serial does not exist); the caller
    /// distinguishes the two cases with [`ClientCardRepo::find_by_serial`].
    pub async fn activate(
        pool: &PgPool,
        serial: &str,
        user_id: DbId,
        profile_id: DbId,
    ) -> Result<Option<ClientCard>, sqlx::Error> {
        let query = format!(
            "UPDATE client_cards SET
                user_id = $2,
                profile_id = $3,
                status = 'activated',
                activated_at = NOW()
             WHERE serial_number = UPPER(TRIM($1))
               AND (user_id IS NULL OR (user_id = $2 AND status <> 'activated'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientCard>(&query)
            .bind(serial)
            .bind(user_id)
            .bind(profile_id)
            .fetch_optional(pool)
            .await
    }

    /// Assign an unowned card to a company employee and mark it shipped.
    ///
    /// Returns `None` if the card does not exist or already has an owner.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        profile_id: Option<DbId>,
    ) -> Result<Option<ClientCard>, sqlx::Error> {
        let query = format!(
            "UPDATE client_cards SET user_id = $2, profile_id = $3, status = 'shipped'
             WHERE id = $1 AND user_id IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientCard>(&query)
            .bind(id)
            .bind(user_id)
            .bind(profile_id)
            .fetch_optional(pool)
            .await
    }

    /// Release a card held by `user_id` back to the unassigned `ordered` state.
    ///
    /// Returns `None` if the card is not held by that user.
    pub async fn unassign(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<ClientCard>, sqlx::Error> {
        let query = format!(
            "UPDATE client_cards SET
                user_id = NULL,
                profile_id = NULL,
                activated_at = NULL,
                status = 'ordered'
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientCard>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Cards held by members of a company.
    pub async fn count_by_company(pool: &PgPool, company_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM client_cards c
             JOIN users u ON u.id = c.user_id
             WHERE u.company_id = $1",
        )
        .bind(company_id)
        .fetch_one(pool)
        .await
    }
}
