//! HTTP-level integration tests for the admin back office: RBAC, stock,
//! orders, client cards and user management.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, delete_auth, get, get_auth, patch_auth, post_json_auth, put_json_auth,
    register, user_token,
};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_product(pool: &PgPool, admin: &str, name: &str, stock: i32, active: bool) -> Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/admin/products",
        admin,
        json!({ "name": name, "type": "classic", "price": 29.9, "stock": stock, "active": active }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn create_order(pool: &PgPool, admin: &str) -> Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/admin/orders",
        admin,
        json!({
            "customerName": "Jane Doe",
            "email": "jane@example.com",
            "items": ["Classic card"],
            "total": 49.0,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_routes_require_admin_role(pool: PgPool) {
    let anonymous = get(common::build_test_app(pool.clone()), "/api/admin/stats").await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let token = user_token(&pool, "plain@example.com").await;
    let regular = get_auth(common::build_test_app(pool), "/api/admin/stats", &token).await;
    assert_eq!(regular.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(regular).await["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stats_counts(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    create_order(&pool, &admin).await;
    create_product(&pool, &admin, "Scarce", 3, true).await;

    let response = get_auth(common::build_test_app(pool), "/api/admin/stats", &admin).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["pendingOrders"], 1);
    assert_eq!(json["data"]["activeUsers"], 1);
    assert_eq!(json["data"]["lowStock"], 1);
    assert_eq!(json["data"]["lowStockProducts"][0]["name"], "Scarce");
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

/// Only active products under the threshold are listed, lowest stock first.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_low_stock_lists_active_products_ascending(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    create_product(&pool, &admin, "Fifteen", 15, true).await;
    create_product(&pool, &admin, "Five", 5, true).await;
    create_product(&pool, &admin, "Plenty", 50, true).await;
    create_product(&pool, &admin, "Retired", 1, false).await;

    let response = get_auth(common::build_test_app(pool.clone()), "/api/admin/products/low-stock", &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Five", "Fifteen"]);

    let custom = body_json(
        get_auth(common::build_test_app(pool.clone()), "/api/admin/products/low-stock?threshold=10", &admin).await,
    )
    .await;
    assert_eq!(custom["data"].as_array().unwrap().len(), 1);

    let negative = get_auth(common::build_test_app(pool), "/api/admin/products/low-stock?threshold=-1", &admin).await;
    assert_eq!(negative.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_toggle_product_flips_availability(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let product = create_product(&pool, &admin, "Toggled", 10, true).await;
    let uri = format!("/api/admin/products/{}/toggle", product["id"]);

    let response = patch_auth(common::build_test_app(pool), &uri, &admin).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["active"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_product_negative_price_rejected(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/admin/products",
        &admin,
        json!({ "name": "Broken", "type": "classic", "price": -1.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_status_follows_lifecycle(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let order = create_order(&pool, &admin).await;
    assert_eq!(order["status"], "pending");
    let uri = format!("/api/admin/orders/{}/status", order["id"]);

    let skip = put_json_auth(common::build_test_app(pool.clone()), &uri, &admin, json!({ "status": "completed" })).await;
    assert_eq!(skip.status(), StatusCode::BAD_REQUEST);

    let processing = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &admin,
        json!({ "status": "processing", "trackingNumber": "TRK-1" }),
    )
    .await;
    assert_eq!(processing.status(), StatusCode::OK);
    let json = body_json(processing).await;
    assert_eq!(json["data"]["status"], "processing");
    assert_eq!(json["data"]["trackingNumber"], "TRK-1");

    let completed = put_json_auth(common::build_test_app(pool.clone()), &uri, &admin, json!({ "status": "completed" })).await;
    assert_eq!(completed.status(), StatusCode::OK);

    let reopen = put_json_auth(common::build_test_app(pool), &uri, &admin, json!({ "status": "pending" })).await;
    assert_eq!(reopen.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_order_not_found(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let response = get_auth(common::build_test_app(pool), "/api/admin/orders/999999", &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Client cards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_card_serial_is_normalized_and_unique(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;

    let created = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/admin/client-cards",
        &admin,
        json!({ "serialNumber": " ic-2025-000777 " }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let card = body_json(created).await;
    assert_eq!(card["data"]["serialNumber"], "IC-2025-000777");
    assert_eq!(card["data"]["status"], "ordered");

    let duplicate = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/admin/client-cards",
        &admin,
        json!({ "serialNumber": "IC-2025-000777" }),
    )
    .await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let found = get_auth(
        common::build_test_app(pool),
        "/api/admin/client-cards/serial/ic-2025-000777",
        &admin,
    )
    .await;
    assert_eq!(found.status(), StatusCode::OK);
    assert_eq!(body_json(found).await["data"]["id"], card["data"]["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_client_card_status_transition(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let created = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/admin/client-cards",
        &admin,
        json!({ "serialNumber": "IC-2025-000888" }),
    )
    .await;
    let card = body_json(created).await;
    let uri = format!("/api/admin/client-cards/{}/status", card["data"]["id"]);

    let ok = put_json_auth(common::build_test_app(pool.clone()), &uri, &admin, json!({ "status": "manufacturing" })).await;
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(body_json(ok).await["data"]["status"], "manufacturing");

    let unknown = put_json_auth(common::build_test_app(pool), &uri, &admin, json!({ "status": "lost" })).await;
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}

/// A rejected status leaves the tracking details untouched; a valid one is
/// written together with them.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_client_card_is_all_or_nothing(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let created = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/admin/client-cards",
        &admin,
        json!({ "serialNumber": "IC-2025-000999" }),
    )
    .await;
    let card = body_json(created).await["data"].clone();
    let uri = format!("/api/admin/client-cards/{}", card["id"]);

    let rejected = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &admin,
        json!({ "trackingNumber": "TRK-1", "status": "bogus" }),
    )
    .await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let unchanged = body_json(get_auth(common::build_test_app(pool.clone()), &uri, &admin).await).await;
    assert!(unchanged["data"]["trackingNumber"].is_null());
    assert_eq!(unchanged["data"]["status"], "ordered");

    let accepted = put_json_auth(
        common::build_test_app(pool),
        &uri,
        &admin,
        json!({ "trackingNumber": "TRK-2", "status": "delivered" }),
    )
    .await;
    assert_eq!(accepted.status(), StatusCode::OK);
    let json = body_json(accepted).await;
    assert_eq!(json["data"]["trackingNumber"], "TRK-2");
    assert_eq!(json["data"]["status"], "delivered");
    assert!(json["data"]["deliveryDate"].is_string());
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_cannot_delete_self(pool: PgPool) {
    let (admin, admin_id) = admin_token(&pool).await;
    let uri = format!("/api/admin/users/{admin_id}");

    let response = delete_auth(common::build_test_app(pool), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_deletes_user_and_profile(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let victim = register(common::build_test_app(pool.clone()), "bye@example.com", "Bye", "Bye").await;
    let uri = format!("/api/admin/users/{}", victim["user"]["id"]);

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::OK);

    let page = get(common::build_test_app(pool.clone()), "/api/profiles/public/bye.bye").await;
    assert_eq!(page.status(), StatusCode::NOT_FOUND);

    let again = delete_auth(common::build_test_app(pool), &uri, &admin).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_role_validates_value(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let user = register(common::build_test_app(pool.clone()), "role@example.com", "Ro", "Le").await;
    let uri = format!("/api/admin/users/{}/role", user["user"]["id"]);

    let bad = put_json_auth(common::build_test_app(pool.clone()), &uri, &admin, json!({ "role": "superuser" })).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

    let good = put_json_auth(common::build_test_app(pool), &uri, &admin, json!({ "role": "admin" })).await;
    assert_eq!(good.status(), StatusCode::OK);
    assert_eq!(body_json(good).await["data"]["role"], "admin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_profiles_is_paginated(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    register(common::build_test_app(pool.clone()), "p1@example.com", "Pro", "One").await;
    register(common::build_test_app(pool.clone()), "p2@example.com", "Pro", "Two").await;

    let response = get_auth(common::build_test_app(pool), "/api/admin/profiles?page=1&limit=2", &admin).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["pagination"]["total"], 3);
}
