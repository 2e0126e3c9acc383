//! HTTP-level integration tests for the plan catalog, user subscriptions and
//! revenue figures.

mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, delete_auth, get, get_auth, post_json_auth, put_json_auth, register};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_plan(pool: &PgPool, admin: &str, slug: &str, price: f64, interval: &str) -> Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/subscriptions",
        admin,
        json!({
            "name": slug.to_uppercase(),
            "slug": slug,
            "price": price,
            "interval": interval,
            "features": ["analytics"],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn subscribe(pool: &PgPool, admin: &str, user_id: &Value, plan_id: &Value) -> axum::response::Response {
    post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/subscriptions/users",
        admin,
        json!({ "userId": user_id, "subscriptionId": plan_id, "autoRenew": true }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_plans_hide_inactive(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    create_plan(&pool, &admin, "pro", 9.99, "monthly").await;
    let retired = create_plan(&pool, &admin, "legacy", 5.0, "monthly").await;

    let uri = format!("/api/subscriptions/{}", retired["id"]);
    let response = put_json_auth(common::build_test_app(pool.clone()), &uri, &admin, json!({ "isActive": false })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let plans = body_json(get(common::build_test_app(pool), "/api/subscriptions/plans").await).await;
    let slugs: Vec<&str> = plans["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["pro"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_plan_rejects_unknown_interval(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/subscriptions",
        &admin,
        json!({ "name": "Weekly", "slug": "weekly", "price": 1.0, "interval": "weekly" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_plan_slug_conflicts_without_leaking_constraint(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    create_plan(&pool, &admin, "pro", 9.99, "monthly").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/subscriptions",
        &admin,
        json!({ "name": "Pro again", "slug": "pro", "price": 9.99, "interval": "monthly" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "A plan with this slug already exists");
    assert!(!json["error"].as_str().unwrap().contains("uq_"));
}

// ---------------------------------------------------------------------------
// User subscriptions
// ---------------------------------------------------------------------------

/// Subscribing mirrors the plan onto the finance record and bills the first
/// period of a paid plan.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subscribe_syncs_snapshot_and_bills(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let plan = create_plan(&pool, &admin, "pro", 9.99, "monthly").await;
    let user = register(common::build_test_app(pool.clone()), "sub@example.com", "Sub", "Scriber").await;
    let token = user["token"].as_str().unwrap();

    let response = subscribe(&pool, &admin, &user["user"]["id"], &plan["id"]).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let binding = body_json(response).await["data"].clone();
    assert_eq!(binding["status"], "active");
    assert!(binding["endDate"].is_string(), "monthly plans get a period end");

    let snapshot = body_json(get_auth(common::build_test_app(pool.clone()), "/api/finances/subscription", token).await).await;
    assert_eq!(snapshot["data"]["plan"], "PRO");
    assert_eq!(snapshot["data"]["status"], "active");
    assert_eq!(snapshot["data"]["cancelAtPeriodEnd"], false);

    let bills = body_json(get_auth(common::build_test_app(pool), "/api/finances/bills", token).await).await;
    assert_eq!(bills["pagination"]["total"], 1);
    assert_eq!(bills["data"][0]["amount"], 9.99);
    assert_eq!(bills["data"][0]["status"], "pending");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_subscribe_to_inactive_plan_rejected(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let plan = create_plan(&pool, &admin, "gone", 3.0, "monthly").await;
    let uri = format!("/api/subscriptions/{}", plan["id"]);
    put_json_auth(common::build_test_app(pool.clone()), &uri, &admin, json!({ "isActive": false })).await;
    let user = register(common::build_test_app(pool.clone()), "late@example.com", "Too", "Late").await;

    let response = subscribe(&pool, &admin, &user["user"]["id"], &plan["id"]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cancel_subscription_updates_snapshot(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let plan = create_plan(&pool, &admin, "basic", 4.0, "monthly").await;
    let user = register(common::build_test_app(pool.clone()), "cancel@example.com", "Can", "Cel").await;
    let binding = body_json(subscribe(&pool, &admin, &user["user"]["id"], &plan["id"]).await).await["data"].clone();

    let uri = format!("/api/subscriptions/users/{}", binding["id"]);
    let response = put_json_auth(common::build_test_app(pool.clone()), &uri, &admin, json!({ "status": "cancelled" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let snapshot = body_json(
        get_auth(
            common::build_test_app(pool.clone()),
            "/api/finances/subscription",
            user["token"].as_str().unwrap(),
        )
        .await,
    )
    .await;
    assert_eq!(snapshot["data"]["status"], "cancelled");

    let invalid = put_json_auth(common::build_test_app(pool), &uri, &admin, json!({ "status": "sleeping" })).await;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_plan_with_active_subscribers_conflicts(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let plan = create_plan(&pool, &admin, "busy", 10.0, "monthly").await;
    let user = register(common::build_test_app(pool.clone()), "busy@example.com", "Bu", "Sy").await;
    subscribe(&pool, &admin, &user["user"]["id"], &plan["id"]).await;

    let uri = format!("/api/subscriptions/{}", plan["id"]);
    let response = delete_auth(common::build_test_app(pool), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

/// Yearly plans count a twelfth of their price towards MRR; lifetime plans
/// count nothing.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_revenue_overview(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let monthly = create_plan(&pool, &admin, "monthly-plan", 10.0, "monthly").await;
    let yearly = create_plan(&pool, &admin, "yearly-plan", 120.0, "yearly").await;
    let lifetime = create_plan(&pool, &admin, "forever", 499.0, "lifetime").await;

    let a = register(common::build_test_app(pool.clone()), "a@example.com", "Ay", "One").await;
    let b = register(common::build_test_app(pool.clone()), "b@example.com", "Bee", "Two").await;
    let c = register(common::build_test_app(pool.clone()), "c@example.com", "Cee", "Three").await;
    subscribe(&pool, &admin, &a["user"]["id"], &monthly["id"]).await;
    subscribe(&pool, &admin, &b["user"]["id"], &yearly["id"]).await;
    subscribe(&pool, &admin, &c["user"]["id"], &lifetime["id"]).await;

    let response = get_auth(common::build_test_app(pool.clone()), "/api/subscriptions/stats/overview", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["mrr"], 20.0);
    assert_eq!(json["data"]["arr"], 240.0);
    assert_eq!(json["data"]["activeSubscriptions"], 3);
    assert_eq!(json["data"]["byPlan"].as_array().unwrap().len(), 3);

    let plans = body_json(get_auth(common::build_test_app(pool), "/api/subscriptions", &admin).await).await;
    let forever = plans["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["slug"] == "forever")
        .unwrap()
        .clone();
    assert_eq!(forever["activeSubscribers"], 1);
    assert_eq!(forever["monthlyRevenue"], 0.0);
    assert_eq!(forever["totalRevenue"], 499.0);
}
