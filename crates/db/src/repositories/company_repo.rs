//! Repository for the `companies` table.

use inutile_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::company::{Company, CompanyStats, CompanyWithCounts, CreateCompany, UpdateCompany};

const COLUMNS: &str = "id, name, slug, logo, description, industry, website, email, phone, \
    address, billing_address, admin_user_id, subscription_id, max_employees, max_cards, status, \
    notes, created_at, updated_at";

/// Same columns qualified with the `c` alias for joins.
const C_COLUMNS: &str = "c.id, c.name, c.slug, c.logo, c.description, c.industry, c.website, \
    c.email, c.phone, c.address, c.billing_address, c.admin_user_id, c.subscription_id, \
    c.max_employees, c.max_cards, c.status, c.notes, c.created_at, c.updated_at";

pub struct CompanyRepo;

impl CompanyRepo {
    /// Insert a company and attach its admin user to it, in one transaction.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO companies
                (name, slug, logo, description, industry, website, email, phone, address,
                 billing_address, admin_user_id, subscription_id, max_employees, max_cards, notes)
             VALUES ($1, LOWER($2), $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     COALESCE($13, 10), COALESCE($14, 10), $15)
             RETURNING {COLUMNS}"
        );
        let company = sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.logo)
            .bind(&input.description)
            .bind(&input.industry)
            .bind(&input.website)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.address.as_ref().map(Json))
            .bind(input.billing_address.as_ref().map(Json))
            .bind(input.admin_user_id)
            .bind(input.subscription_id)
            .bind(input.max_employees)
            .bind(input.max_cards)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE users SET company_id = $2 WHERE id = $1")
            .bind(input.admin_user_id)
            .bind(company.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(company)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All companies with member and card counts, newest first.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<CompanyWithCounts>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS},
                (SELECT COUNT(*) FROM users u WHERE u.company_id = c.id) AS employee_count,
                (SELECT COUNT(*) FROM client_cards cc
                    JOIN users u ON u.id = cc.user_id
                    WHERE u.company_id = c.id) AS card_count
             FROM companies c
             ORDER BY c.created_at DESC, c.id DESC"
        );
        sqlx::query_as::<_, CompanyWithCounts>(&query)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCompany,
    ) -> Result<Option<Company>, sqlx::Error> {
        let query = format!(
            "UPDATE companies SET
                name = COALESCE($2, name),
                slug = COALESCE(LOWER($3), slug),
                logo = COALESCE($4, logo),
                description = COALESCE($5, description),
                industry = COALESCE($6, industry),
                website = COALESCE($7, website),
                email = COALESCE($8, email),
                phone = COALESCE($9, phone),
                address = COALESCE($10, address),
                billing_address = COALESCE($11, billing_address),
                subscription_id = COALESCE($12, subscription_id),
                max_employees = COALESCE($13, max_employees),
                max_cards = COALESCE($14, max_cards),
                status = COALESCE($15, status),
                notes = COALESCE($16, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.logo)
            .bind(&input.description)
            .bind(&input.industry)
            .bind(&input.website)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.address.as_ref().map(Json))
            .bind(input.billing_address.as_ref().map(Json))
            .bind(input.subscription_id)
            .bind(input.max_employees)
            .bind(input.max_cards)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Number of members other than the company's own admin user.
    pub async fn count_non_admin_members(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM users u
             JOIN companies c ON c.id = u.company_id
             WHERE c.id = $1 AND u.id <> c.admin_user_id",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete a company. The caller checks that only the admin user is left;
    /// remaining members are detached in the same transaction.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query("UPDATE users SET company_id = NULL WHERE company_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Headline counts for one company.
    pub async fn stats(pool: &PgPool, id: DbId) -> Result<CompanyStats, sqlx::Error> {
        sqlx::query_as::<_, CompanyStats>(
            "SELECT
                (SELECT COUNT(*) FROM users WHERE company_id = $1) AS total_employees,
                (SELECT COUNT(*) FROM users WHERE company_id = $1 AND is_active) AS active_employees,
                (SELECT COUNT(*) FROM client_cards cc JOIN users u ON u.id = cc.user_id
                    WHERE u.company_id = $1) AS total_cards,
                (SELECT COUNT(*) FROM client_cards cc JOIN users u ON u.id = cc.user_id
                    WHERE u.company_id = $1 AND cc.status = 'activated') AS active_cards,
                (SELECT COUNT(*) FROM profiles p JOIN users u ON u.id = p.user_id
                    WHERE u.company_id = $1) AS profiles_created",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
