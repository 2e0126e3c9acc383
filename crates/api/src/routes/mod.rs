pub mod admin;
pub mod analytics;
pub mod auth;
pub mod cards;
pub mod companies;
pub mod docs;
pub mod finances;
pub mod health;
pub mod profiles;
pub mod subscriptions;
pub mod templates;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/*                  register, login, me, password reset and change
/// /profiles/public/{slug}  public link page (public)
/// /profiles/me/*           own profile, slug and links
/// /cards/*                 setup, redirect and scan (public); activation, own cards, analytics
/// /admin/*                 stats, orders, products, users, profiles, client cards (admin)
/// /users/*                 own account; user management (admin)
/// /companies/*             companies, employees, card assignment (admin)
/// /analytics/*             dashboard metrics (admin)
/// /finances/*              payment cards, plan snapshot, bills, physical cards
/// /subscriptions/plans     plans on offer (public)
/// /subscriptions/*         plans and user subscriptions (admin)
/// /templates/*             profile themes; apply to own profile
/// ```
///
/// The full endpoint list is served at `/docs`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profiles", profiles::router())
        .nest("/cards", cards::router())
        .nest("/admin", admin::router())
        .nest("/users", users::router())
        .nest("/companies", companies::router())
        .nest("/analytics", analytics::router())
        .nest("/finances", finances::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/templates", templates::router())
}
