//! Repository for the `card_scans` ledger.

use inutile_core::types::DbId;
use sqlx::PgPool;

use crate::models::card_scan::{CardScan, CreateCardScan, DateCount, LabelCount, SerialCount};

const COLUMNS: &str = "id, card_id, serial_number, user_id, scan_date, ip_address, user_agent, \
    referer, country, city, device, browser, created_at, updated_at";

pub struct CardScanRepo;

impl CardScanRepo {
    /// Append a scan.
    pub async fn create(pool: &PgPool, input: &CreateCardScan) -> Result<CardScan, sqlx::Error> {
        let query = format!(
            "INSERT INTO card_scans
                (card_id, serial_number, user_id, ip_address, user_agent, referer,
                 country, city, device, browser)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CardScan>(&query)
            .bind(input.card_id)
            .bind(&input.serial_number)
            .bind(input.user_id)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(&input.referer)
            .bind(&input.country)
            .bind(&input.city)
            .bind(&input.device)
            .bind(&input.browser)
            .fetch_one(pool)
            .await
    }

    pub async fn count_by_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM card_scans WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    pub async fn count_by_card(pool: &PgPool, card_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM card_scans WHERE card_id = $1")
            .bind(card_id)
            .fetch_one(pool)
            .await
    }

    /// Scan totals per card for a user, busiest card first.
    pub async fn by_card_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SerialCount>, sqlx::Error> {
        sqlx::query_as::<_, SerialCount>(
            "SELECT serial_number, COUNT(*) AS count, MAX(scan_date) AS last_scan
             FROM card_scans WHERE user_id = $1
             GROUP BY serial_number
             ORDER BY count DESC, serial_number ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Daily scan counts for a user over the last `days` days, oldest first.
    /// Days without scans are omitted.
    pub async fn by_date_for_user(
        pool: &PgPool,
        user_id: DbId,
        days: i64,
    ) -> Result<Vec<DateCount>, sqlx::Error> {
        sqlx::query_as::<_, DateCount>(
            "SELECT TO_CHAR(scan_date AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date, COUNT(*) AS count
             FROM card_scans
             WHERE user_id = $1 AND scan_date >= NOW() - make_interval(days => $2::INT4)
             GROUP BY 1 ORDER BY 1",
        )
        .bind(user_id)
        .bind(days)
        .fetch_all(pool)
        .await
    }

    /// Daily scan counts for one card over the last `days` days, oldest first.
    pub async fn by_date_for_card(
        pool: &PgPool,
        card_id: DbId,
        days: i64,
    ) -> Result<Vec<DateCount>, sqlx::Error> {
        sqlx::query_as::<_, DateCount>(
            "SELECT TO_CHAR(scan_date AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date, COUNT(*) AS count
             FROM card_scans
             WHERE card_id = $1 AND scan_date >= NOW() - make_interval(days => $2::INT4)
             GROUP BY 1 ORDER BY 1",
        )
        .bind(card_id)
        .bind(days)
        .fetch_all(pool)
        .await
    }

    /// Scan counts per stored device class for one card.
    pub async fn by_device_for_card(
        pool: &PgPool,
        card_id: DbId,
    ) -> Result<Vec<LabelCount>, sqlx::Error> {
        sqlx::query_as::<_, LabelCount>(
            "SELECT device AS label, COUNT(*) AS count
             FROM card_scans WHERE card_id = $1
             GROUP BY device ORDER BY count DESC, device ASC",
        )
        .bind(card_id)
        .fetch_all(pool)
        .await
    }
}
