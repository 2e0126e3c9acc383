//! Error envelope and authentication failures common to all endpoints.

mod common;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use common::{admin_token, body_json, build_test_app, get, get_auth, user_token};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_error_envelope_shape(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/profiles/public/nobody-here").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(json["error"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_json_rejected(pool: PgPool) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();

    let response = build_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_content_type_rejected_with_envelope(pool: PgPool) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .body(Body::from("{}"))
        .unwrap();

    let response = build_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_huge_page_number_is_an_empty_page(pool: PgPool) {
    let (admin, _) = admin_token(&pool).await;

    let response = get_auth(
        build_test_app(pool),
        "/api/users?page=9223372036854775807&limit=100",
        &admin,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], serde_json::json!([]));
    assert_eq!(json["pagination"]["hasMore"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bearer_prefix_required(pool: PgPool) {
    let token = user_token(&pool, "prefix@example.com").await;
    let request = Request::builder()
        .uri("/api/auth/me")
        .header(AUTHORIZATION, token)
        .body(Body::empty())
        .unwrap();

    let response = build_test_app(pool).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}
