//! HTTP-level integration tests for the admin analytics dashboard.

mod common;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, USER_AGENT};
use axum::http::{Method, Request, StatusCode};
use common::{admin_token, body_json, get_auth, post_json_auth, register, user_token};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn scan(pool: &PgPool, serial: &str, user_agent: &str, country: &str) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/cards/scan")
        .header(CONTENT_TYPE, "application/json")
        .header(USER_AGENT, user_agent)
        .header("cf-ipcountry", country)
        .body(Body::from(json!({ "serialNumber": serial }).to_string()))
        .unwrap();
    let response = common::build_test_app(pool.clone()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// One activated card with three scans: two from phones in France, one from
/// a desktop in Belgium.
async fn seed_scans(pool: &PgPool, admin: &str) {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/admin/client-cards",
        admin,
        json!({ "serialNumber": "IC-2025-555555" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let owner = register(common::build_test_app(pool.clone()), "popular@example.com", "Po", "Pular").await;
    let activated = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/cards/activate",
        owner["token"].as_str().unwrap(),
        json!({ "serialNumber": "IC-2025-555555" }),
    )
    .await;
    assert_eq!(activated.status(), StatusCode::OK);

    let phone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Mobile/15E148";
    let desktop = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";
    scan(pool, "IC-2025-555555", phone, "FR").await;
    scan(pool, "IC-2025-555555", phone, "FR").await;
    scan(pool, "IC-2025-555555", desktop, "BE").await;
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_analytics_admin_only(pool: PgPool) {
    let token = user_token(&pool, "curious@example.com").await;
    let response = get_auth(common::build_test_app(pool), "/api/analytics", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_period_rejected(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let response = get_auth(common::build_test_app(pool), "/api/analytics?period=2w", &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overview_counts(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    seed_scans(&pool, &admin).await;

    let response = get_auth(common::build_test_app(pool), "/api/analytics?period=7d", &admin).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["period"], "7d");
    assert_eq!(data["analytics"]["totalUsers"], 2);
    assert_eq!(data["analytics"]["newUsers"], 2);
    assert_eq!(data["analytics"]["cardsScanned"], 3);
    assert_eq!(data["analytics"]["conversionRate"], 50.0);
    assert!(data["growthMetrics"]["users"].is_number());
    assert!(data["totalCounts"].is_object());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_devices_always_three_buckets(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    seed_scans(&pool, &admin).await;

    let response = get_auth(common::build_test_app(pool), "/api/analytics/devices", &admin).await;

    let json = body_json(response).await;
    let buckets = json["data"].as_array().unwrap();
    let devices: Vec<&str> = buckets.iter().map(|b| b["device"].as_str().unwrap()).collect();
    assert_eq!(devices, ["Mobile", "Desktop", "Tablet"]);
    assert_eq!(buckets[0]["count"], 2);
    assert_eq!(buckets[1]["count"], 1);
    assert_eq!(buckets[2]["count"], 0);
    assert_eq!(buckets[2]["percentage"], 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_countries_and_top_profiles(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    seed_scans(&pool, &admin).await;

    let countries = body_json(
        get_auth(common::build_test_app(pool.clone()), "/api/analytics/countries", &admin).await,
    )
    .await;
    let rows = countries["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["code"], "FR");
    assert_eq!(rows[0]["count"], 2);

    let top = body_json(
        get_auth(common::build_test_app(pool), "/api/analytics/top-profiles?limit=1", &admin).await,
    )
    .await;
    let profiles = top["data"].as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["slug"], "po.pular");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_daily_includes_empty_days(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;

    let response = get_auth(common::build_test_app(pool), "/api/analytics/daily?period=7d", &admin).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 7);
}
