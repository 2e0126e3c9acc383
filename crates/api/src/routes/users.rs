//! Route definitions for `/users`.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /me          -> get_me
/// PUT    /me          -> update_me
/// DELETE /me          -> delete_me (deactivate own account)
/// GET    /            -> list_users (admin)
/// GET    /{id}        -> get_user (admin)
/// PUT    /{id}        -> update_user (admin)
/// DELETE /{id}        -> deactivate_user (admin, soft delete)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(users::get_me)
                .put(users::update_me)
                .delete(users::delete_me),
        )
        .route("/", get(users::list_users))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::deactivate_user),
        )
}
