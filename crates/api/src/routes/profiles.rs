//! Route definitions for `/profiles`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::profiles;
use crate::state::AppState;

/// Routes mounted at `/profiles`.
///
/// ```text
/// GET    /public/{slug}           -> get_public_profile (public)
/// GET    /check-slug/{slug}       -> check_slug (public)
/// GET    /me                      -> get_my_profile
/// PUT    /me                      -> update_my_profile
/// PUT    /me/slug                 -> update_my_slug
/// POST   /me/links                -> add_my_link
/// PUT    /me/links/reorder        -> reorder_my_links
/// PUT    /me/links/{link_id}      -> update_my_link
/// DELETE /me/links/{link_id}      -> delete_my_link
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/public/{slug}", get(profiles::get_public_profile))
        .route("/check-slug/{slug}", get(profiles::check_slug))
        .route(
            "/me",
            get(profiles::get_my_profile).put(profiles::update_my_profile),
        )
        .route("/me/slug", put(profiles::update_my_slug))
        .route("/me/links", post(profiles::add_my_link))
        .route("/me/links/reorder", put(profiles::reorder_my_links))
        .route(
            "/me/links/{link_id}",
            put(profiles::update_my_link).delete(profiles::delete_my_link),
        )
}
