//! HTTP-level integration tests for public profile pages, slugs and links.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, post_json_auth, put_json_auth, register};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn add_link(pool: &PgPool, token: &str, title: &str, active: bool) -> Value {
    let body = json!({
        "title": title,
        "url": format!("https://example.com/{}", title.to_lowercase()),
        "isActive": active,
    });
    let response =
        post_json_auth(common::build_test_app(pool.clone()), "/api/profiles/me/links", token, body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Public page
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_profile_unknown_slug_not_found(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/profiles/public/no.such.person").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_private_profile_is_forbidden(pool: PgPool) {
    let data = register(common::build_test_app(pool.clone()), "priv@example.com", "Pri", "Vate").await;
    let token = data["token"].as_str().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/profiles/me",
        token,
        json!({ "isPublic": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(common::build_test_app(pool), "/api/profiles/public/pri.vate").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Inactive links are hidden from visitors but kept for the owner.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_profile_shows_only_active_links(pool: PgPool) {
    let data = register(common::build_test_app(pool.clone()), "links@example.com", "Lin", "Ks").await;
    let token = data["token"].as_str().unwrap();
    add_link(&pool, token, "Shown", true).await;
    add_link(&pool, token, "Hidden", false).await;

    let response = get(common::build_test_app(pool.clone()), "/api/profiles/public/lin.ks").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let links = json["data"]["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["title"], "Shown");
    assert_eq!(json["data"]["isAdmin"], false);

    let own = body_json(get_auth(common::build_test_app(pool), "/api/profiles/me", token).await).await;
    assert_eq!(own["data"]["links"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Slugs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_slug_availability(pool: PgPool) {
    register(common::build_test_app(pool.clone()), "slug@example.com", "Slug", "Owner").await;

    let taken = body_json(get(common::build_test_app(pool.clone()), "/api/profiles/check-slug/slug.owner").await).await;
    assert_eq!(taken["data"]["available"], false);

    let free = body_json(get(common::build_test_app(pool.clone()), "/api/profiles/check-slug/Fresh-Name").await).await;
    assert_eq!(free["data"]["available"], true);
    assert_eq!(free["data"]["slug"], "fresh-name");

    let malformed = body_json(get(common::build_test_app(pool), "/api/profiles/check-slug/ab").await).await;
    assert_eq!(malformed["data"]["available"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_slug_conflict(pool: PgPool) {
    register(common::build_test_app(pool.clone()), "first@example.com", "First", "One").await;
    let data = register(common::build_test_app(pool.clone()), "second@example.com", "Second", "Two").await;
    let token = data["token"].as_str().unwrap();

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        "/api/profiles/me/slug",
        token,
        json!({ "slug": "first.one" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = put_json_auth(
        common::build_test_app(pool),
        "/api/profiles/me/slug",
        token,
        json!({ "slug": "My-New-Slug" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["slug"], "my-new-slug");
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// Reordering keeps only the listed links, in the listed order.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reorder_drops_omitted_links(pool: PgPool) {
    let data = register(common::build_test_app(pool.clone()), "order@example.com", "Or", "Der").await;
    let token = data["token"].as_str().unwrap();
    let a = add_link(&pool, token, "Alpha", true).await;
    add_link(&pool, token, "Beta", true).await;
    let c = add_link(&pool, token, "Gamma", true).await;

    let response = put_json_auth(
        common::build_test_app(pool),
        "/api/profiles/me/links/reorder",
        token,
        json!({ "linkIds": [c["id"], a["id"], "unknown-id"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let links = json["data"].as_array().unwrap();
    assert_eq!(links.len(), 2);
    assert_eq!(links[0]["title"], "Gamma");
    assert_eq!(links[0]["order"], 0);
    assert_eq!(links[1]["title"], "Alpha");
    assert_eq!(links[1]["order"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_link(pool: PgPool) {
    let data = register(common::build_test_app(pool.clone()), "edit@example.com", "Ed", "It").await;
    let token = data["token"].as_str().unwrap();
    let link = add_link(&pool, token, "Old", true).await;
    let uri = format!("/api/profiles/me/links/{}", link["id"].as_str().unwrap());

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        token,
        json!({ "title": "New" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["title"], "New");

    let response = delete_auth(common::build_test_app(pool.clone()), &uri, token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = delete_auth(common::build_test_app(pool), &uri, token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_link_with_invalid_url_rejected(pool: PgPool) {
    let data = register(common::build_test_app(pool.clone()), "bad@example.com", "Bad", "Url").await;
    let token = data["token"].as_str().unwrap();

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/profiles/me/links",
        token,
        json!({ "title": "Broken", "url": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
