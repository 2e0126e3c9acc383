//! Handlers for the `/analytics` admin dashboard.
//!
//! Every endpoint accepts `?period=7d|30d|90d|1y|all` (default `30d`). Growth
//! figures compare the period with the window of equal length before it.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use inutile_core::analytics::{
    country_display, growth, percentage, Period, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT,
};
use inutile_core::pagination::clamp_limit;
use inutile_core::subscription::round_cents;
use inutile_core::user_agent::{dashboard_bucket, DEVICE_MOBILE, DEVICE_TABLET};
use inutile_db::models::analytics::{DailyActivity, ProfileScans, TotalCounts};
use inutile_db::repositories::AnalyticsRepo;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppResult, ErrorResponse};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PeriodParams;
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewMetrics {
    pub total_users: i64,
    /// Users with at least one profile or card.
    pub active_users: i64,
    pub new_users: i64,
    pub returning_users: i64,
    pub cards_scanned: i64,
    pub profiles_created: i64,
    pub total_revenue: f64,
    pub conversion_rate: f64,
}

/// Percentage change against the previous window.
#[derive(Debug, Serialize, ToSchema)]
pub struct GrowthMetrics {
    pub users: f64,
    pub scans: f64,
    pub orders: f64,
    pub revenue: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    #[schema(value_type = String)]
    pub period: &'static str,
    pub analytics: OverviewMetrics,
    pub growth_metrics: GrowthMetrics,
    pub total_counts: TotalCounts,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceShare {
    #[schema(value_type = String)]
    pub device: &'static str,
    pub count: i64,
    pub percentage: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CountryShare {
    pub code: String,
    pub country: String,
    #[schema(value_type = String)]
    pub flag: &'static str,
    pub count: i64,
    pub percentage: f64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/analytics
#[utoipa::path(
    get,
    path = "/api/analytics",
    tag = "analytics",
    summary = "Overview, growth and totals",
    params(PeriodParams),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Overview>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_overview(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<Overview>>> {
    let period = params.period()?;
    let now = Utc::now();
    let start = period.start(now);
    let (prev_start, prev_end) = period.previous_window(now);
    let pool = &state.pool;

    let totals = AnalyticsRepo::totals(pool).await?;

    let new_users = AnalyticsRepo::users_created(pool, start, now).await?;
    let scans = AnalyticsRepo::scans(pool, start, now).await?;
    let orders = AnalyticsRepo::orders(pool, start, now).await?;
    let revenue = AnalyticsRepo::revenue(pool, start, now).await?;

    let prev_users = AnalyticsRepo::users_created(pool, prev_start, prev_end).await?;
    let prev_scans = AnalyticsRepo::scans(pool, prev_start, prev_end).await?;
    let prev_orders = AnalyticsRepo::orders(pool, prev_start, prev_end).await?;
    let prev_revenue = AnalyticsRepo::revenue(pool, prev_start, prev_end).await?;

    let converted = AnalyticsRepo::users_with_activated_cards(pool).await?;

    let analytics = OverviewMetrics {
        total_users: totals.users,
        active_users: AnalyticsRepo::engaged_users(pool).await?,
        new_users,
        returning_users: AnalyticsRepo::returning_users(pool, start).await?,
        cards_scanned: scans,
        profiles_created: AnalyticsRepo::profiles_created(pool, start, now).await?,
        total_revenue: round_cents(revenue),
        conversion_rate: percentage(converted, totals.users),
    };

    Ok(Json(ApiResponse::ok(Overview {
        period: period.as_str(),
        analytics,
        growth_metrics: GrowthMetrics {
            users: growth(new_users as f64, prev_users as f64),
            scans: growth(scans as f64, prev_scans as f64),
            orders: growth(orders as f64, prev_orders as f64),
            revenue: growth(revenue, prev_revenue),
        },
        total_counts: totals,
    })))
}

/// GET /api/analytics/daily
///
/// At most 30 days, ending today, with empty days included.
#[utoipa::path(
    get,
    path = "/api/analytics/daily",
    tag = "analytics",
    summary = "Daily users, scans and revenue",
    params(PeriodParams),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<DailyActivity>>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_daily(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<Vec<DailyActivity>>>> {
    let period = params.period()?;
    let oldest = match period {
        Period::All => AnalyticsRepo::first_user_at(&state.pool).await?,
        _ => None,
    };
    let days = period.daily_days(Utc::now(), oldest);

    let mut rows = AnalyticsRepo::daily(&state.pool, days).await?;
    for row in &mut rows {
        row.revenue = round_cents(row.revenue);
    }
    Ok(Json(ApiResponse::ok(rows)))
}

/// GET /api/analytics/top-profiles?limit=5
#[utoipa::path(
    get,
    path = "/api/analytics/top-profiles",
    tag = "analytics",
    summary = "Most scanned profiles",
    params(PeriodParams),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<ProfileScans>>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_top_profiles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<Vec<ProfileScans>>>> {
    let start = params.period()?.start(Utc::now());
    let limit = clamp_limit(params.limit, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT);
    let profiles = AnalyticsRepo::top_profiles(&state.pool, start, limit).await?;
    Ok(Json(ApiResponse::ok(profiles)))
}

/// GET /api/analytics/devices
///
/// Always returns the three buckets, in the order mobile, desktop, tablet.
#[utoipa::path(
    get,
    path = "/api/analytics/devices",
    tag = "analytics",
    summary = "Scan share per device class",
    params(PeriodParams),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<DeviceShare>>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_devices(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<Vec<DeviceShare>>>> {
    let start = params.period()?.start(Utc::now());
    let rows = AnalyticsRepo::user_agents(&state.pool, start).await?;

    let (mut mobile, mut desktop, mut tablet) = (0i64, 0i64, 0i64);
    for row in rows {
        match dashboard_bucket(row.user_agent.as_deref()) {
            DEVICE_MOBILE => mobile += row.count,
            DEVICE_TABLET => tablet += row.count,
            _ => desktop += row.count,
        }
    }
    let total = mobile + desktop + tablet;

    let shares = [
        ("Mobile", mobile),
        ("Desktop", desktop),
        ("Tablet", tablet),
    ]
    .into_iter()
    .map(|(device, count)| DeviceShare {
        device,
        count,
        percentage: percentage(count, total),
    })
    .collect();

    Ok(Json(ApiResponse::ok(shares)))
}

/// GET /api/analytics/countries?limit=5
///
/// Percentages are relative to the countries returned.
#[utoipa::path(
    get,
    path = "/api/analytics/countries",
    tag = "analytics",
    summary = "Scan share per country",
    params(PeriodParams),
    responses(
        (status = 200, description = "Success", body = ApiResponse<Vec<CountryShare>>),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Admin role required", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
pub async fn get_countries(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> AppResult<Json<ApiResponse<Vec<CountryShare>>>> {
    let start = params.period()?.start(Utc::now());
    let limit = clamp_limit(params.limit, DEFAULT_TOP_LIMIT, MAX_TOP_LIMIT);
    let rows = AnalyticsRepo::countries(&state.pool, start, limit).await?;
    let total: i64 = rows.iter().map(|r| r.count).sum();

    let countries = rows
        .into_iter()
        .map(|row| {
            let (country, flag) = country_display(&row.label);
            CountryShare {
                percentage: percentage(row.count, total),
                code: row.label,
                country,
                flag,
                count: row.count,
            }
        })
        .collect();

    Ok(Json(ApiResponse::ok(countries)))
}
