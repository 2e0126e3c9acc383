//! Root-level endpoints and middleware behaviour shared by every route.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, build_test_app, get};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let response = get(build_test_app(pool), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["dbHealthy"], true);
    assert!(json["version"].is_string());
    assert!(json["timestamp"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_responses_carry_request_id(pool: PgPool) {
    let response = get(build_test_app(pool.clone()), "/health").await;
    assert!(response.headers().contains_key("x-request-id"));

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me")
        .body(Body::empty())
        .unwrap();
    let response = build_test_app(pool).oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_is_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_docs_are_served(pool: PgPool) {
    let page = get(build_test_app(pool.clone()), "/docs").await;
    assert_eq!(page.status(), StatusCode::OK);

    let response = get(build_test_app(pool), "/docs/openapi.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["openapi"].as_str().is_some_and(|v| v.starts_with("3.")));
    assert_eq!(json["info"]["title"], "Inutile Cards API");
    assert!(json["paths"]["/api/cards/activate"]["post"]["requestBody"].is_object());
    assert!(json["components"]["securitySchemes"]["bearerAuth"].is_object());
}
