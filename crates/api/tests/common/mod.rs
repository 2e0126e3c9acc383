#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use inutile_api::config::ServerConfig;
use inutile_api::router::build_app_router;
use inutile_api::state::AppState;
use inutile_core::roles::ROLE_ADMIN;
use inutile_db::repositories::UserRepo;
use inutile_events::Mailer;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

/// Password used by every account the helpers register.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Build a test `ServerConfig` with development defaults and a fixed secret.
pub fn test_config() -> ServerConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("HOST", "127.0.0.1"),
        ("PORT", "0"),
        ("FRONTEND_URL", "http://localhost:3000"),
        ("JWT_SECRET", "integration-test-secret"),
    ]);
    ServerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test config is valid")
}

/// Build the full application router, with mail delivery disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: Mailer::disabled(),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).expect("request builds"))
        .await
        .expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Register an account through the API and return the response `data`
/// (`user`, `profile`, `token`).
pub async fn register(app: Router, email: &str, first_name: &str, last_name: &str) -> Value {
    let body = json!({
        "email": email,
        "password": TEST_PASSWORD,
        "firstName": first_name,
        "lastName": last_name,
    });
    let response = post_json(app, "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Register an account and return its session token.
pub async fn user_token(pool: &PgPool, email: &str) -> String {
    let data = register(build_test_app(pool.clone()), email, "Test", "User").await;
    data["token"].as_str().expect("token is a string").to_string()
}

/// Log in and return the session token.
pub async fn login(app: Router, email: &str) -> String {
    let body = json!({ "email": email, "password": TEST_PASSWORD });
    let response = post_json(app, "/api/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["token"]
        .as_str()
        .expect("token is a string")
        .to_string()
}

/// Register an account, promote it to admin and return a token carrying the
/// admin role together with the user id.
pub async fn admin_token(pool: &PgPool) -> (String, i64) {
    let data = register(build_test_app(pool.clone()), "admin@inutile.cards", "Ada", "Admin").await;
    let user_id = data["user"]["id"].as_i64().expect("user id");
    UserRepo::update_role(pool, user_id, ROLE_ADMIN)
        .await
        .expect("role update succeeds");
    let token = login(build_test_app(pool.clone()), "admin@inutile.cards").await;
    (token, user_id)
}
