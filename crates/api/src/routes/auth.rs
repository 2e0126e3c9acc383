//! Route definitions for `/auth`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /register          -> register (public)
/// POST   /login             -> login (public)
/// GET    /me                -> me
/// POST   /forgot-password   -> forgot_password (public)
/// POST   /reset-password    -> reset_password (public)
/// PUT    /change-password   -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/change-password", put(auth::change_password))
}
