//! HTTP-level integration tests for payment cards, bills and physical cards.

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, delete_auth, get, get_auth, post_json_auth, put_json_auth, user_token,
};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn add_card(pool: &PgPool, token: &str, last4: &str) -> Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/finances/payment-cards",
        token,
        json!({ "last4": last4, "brand": "visa", "expiryMonth": 12, "expiryYear": 2030 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

async fn payment_cards(pool: &PgPool, token: &str) -> Vec<Value> {
    let json = body_json(
        get_auth(common::build_test_app(pool.clone()), "/api/finances/payment-cards", token).await,
    )
    .await;
    json["data"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Overview
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_overview_of_new_account_is_empty(pool: PgPool) {
    let token = user_token(&pool, "fresh@example.com").await;

    let response = get_auth(common::build_test_app(pool), "/api/finances/overview", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["paymentCards"], json!([]));
    assert!(json["data"]["subscription"].is_null());
    assert_eq!(json["data"]["recentBills"], json!([]));
    assert_eq!(json["data"]["physicalCards"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_finances_require_auth(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/finances/overview").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Payment cards
// ---------------------------------------------------------------------------

/// Exactly one saved card is the default at any time.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_single_default_payment_card(pool: PgPool) {
    let token = user_token(&pool, "cards@example.com").await;
    let first = add_card(&pool, &token, "4242").await;
    assert_eq!(first["isDefault"], true);
    let second = add_card(&pool, &token, "1881").await;
    assert_eq!(second["isDefault"], false);

    let uri = format!("/api/finances/payment-cards/{}/default", second["id"].as_str().unwrap());
    let response = put_json_auth(common::build_test_app(pool.clone()), &uri, &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cards = payment_cards(&pool, &token).await;
    let defaults: Vec<&Value> = cards.iter().filter(|c| c["isDefault"] == true).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0]["last4"], "1881");
}

/// Removing the default card promotes the next one.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_default_payment_card_promotes_next(pool: PgPool) {
    let token = user_token(&pool, "promote@example.com").await;
    let first = add_card(&pool, &token, "1111").await;
    add_card(&pool, &token, "2222").await;

    let uri = format!("/api/finances/payment-cards/{}", first["id"].as_str().unwrap());
    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cards = payment_cards(&pool, &token).await;
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["last4"], "2222");
    assert_eq!(cards[0]["isDefault"], true);

    let missing = delete_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_payment_card_rejected(pool: PgPool) {
    let token = user_token(&pool, "invalid@example.com").await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/finances/payment-cards",
        &token,
        json!({ "last4": "42a", "brand": "visa", "expiryMonth": 13, "expiryYear": 2030 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Physical cards
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_physical_card_order_lifecycle(pool: PgPool) {
    let token = user_token(&pool, "physical@example.com").await;
    let (admin, _) = admin_token(&pool).await;

    let bad_type = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/finances/physical-cards",
        &token,
        json!({ "type": "wooden" }),
    )
    .await;
    assert_eq!(bad_type.status(), StatusCode::BAD_REQUEST);

    let ordered = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/finances/physical-cards",
        &token,
        json!({ "type": "Metal" }),
    )
    .await;
    assert_eq!(ordered.status(), StatusCode::CREATED);
    let card = body_json(ordered).await["data"].clone();
    assert_eq!(card["type"], "metal");
    assert_eq!(card["status"], "ordered");

    let uri = format!("/api/finances/physical-cards/{}", card["id"]);
    let by_owner = put_json_auth(common::build_test_app(pool.clone()), &uri, &token, json!({ "status": "shipped" })).await;
    assert_eq!(by_owner.status(), StatusCode::FORBIDDEN);

    let shipped = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &admin,
        json!({ "status": "shipped", "trackingNumber": "TRK-9" }),
    )
    .await;
    assert_eq!(shipped.status(), StatusCode::OK);

    let backwards = put_json_auth(common::build_test_app(pool.clone()), &uri, &admin, json!({ "status": "processing" })).await;
    assert_eq!(backwards.status(), StatusCode::BAD_REQUEST);

    let listed = body_json(get_auth(common::build_test_app(pool), "/api/finances/physical-cards", &token).await).await;
    assert_eq!(listed["data"][0]["status"], "shipped");
}

// ---------------------------------------------------------------------------
// Bills
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bills_are_paginated(pool: PgPool) {
    let token = user_token(&pool, "bills@example.com").await;

    let response = get_auth(common::build_test_app(pool), "/api/finances/bills?page=1&limit=5", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!([]));
    assert_eq!(json["pagination"]["limit"], 5);
    assert_eq!(json["pagination"]["total"], 0);
}
