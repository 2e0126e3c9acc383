//! HTTP-level integration tests for profile templates.

mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, get, get_auth, post_auth, post_json_auth, put_json_auth, user_token};
use serde_json::{json, Value};
use sqlx::PgPool;

fn midnight_theme(button_style: &str) -> Value {
    json!({
        "backgroundColor": "#000033",
        "textColor": "#f0f0f0",
        "buttonColor": "#3344ff",
        "buttonTextColor": "#ffffff",
        "buttonStyle": button_style,
        "fontFamily": "Space Grotesk",
    })
}

async fn create_template(pool: &PgPool, admin: &str, name: &str) -> Value {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/templates",
        admin,
        json!({ "name": name, "theme": midnight_theme("pill") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_apply_template_copies_theme(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let template = create_template(&pool, &admin, "Midnight").await;
    let token = user_token(&pool, "styled@example.com").await;

    let uri = format!("/api/templates/{}/apply", template["id"]);
    let response = post_auth(common::build_test_app(pool), &uri, &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["templateId"], template["id"]);
    assert_eq!(json["data"]["theme"]["buttonStyle"], "pill");
    assert_eq!(json["data"]["theme"]["fontFamily"], "Space Grotesk");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inactive_template_hidden_and_not_applicable(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let template = create_template(&pool, &admin, "Retired").await;
    let uri = format!("/api/templates/{}", template["id"]);
    let response = put_json_auth(common::build_test_app(pool.clone()), &uri, &admin, json!({ "isActive": false })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let public = body_json(get(common::build_test_app(pool.clone()), "/api/templates").await).await;
    assert_eq!(public["data"], json!([]));

    let all = body_json(get_auth(common::build_test_app(pool.clone()), "/api/templates/all", &admin).await).await;
    assert_eq!(all["data"].as_array().unwrap().len(), 1);

    let token = user_token(&pool, "late@example.com").await;
    let apply = post_auth(common::build_test_app(pool), &format!("{uri}/apply"), &token).await;
    assert_eq!(apply.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_template_validates_button_style(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/templates",
        &admin,
        json!({ "name": "Odd", "theme": midnight_theme("hexagon") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_template_management_requires_admin(pool: PgPool) {
    let token = user_token(&pool, "nosy@example.com").await;
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/templates",
        &token,
        json!({ "name": "Mine" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
