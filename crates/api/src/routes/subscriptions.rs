//! Route definitions for `/subscriptions`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::subscriptions;
use crate::state::AppState;

/// Routes mounted at `/subscriptions`.
///
/// ```text
/// GET    /plans                -> list_public_plans (public)
/// GET    /                     -> list_plans (admin)
/// POST   /                     -> create_plan (admin)
/// GET    /stats/overview       -> get_revenue_overview (admin)
/// GET    /users/all            -> list_user_subscriptions (admin)
/// POST   /users                -> create_user_subscription (admin)
/// PUT    /users/{id}           -> update_user_subscription (admin)
/// GET    /{id}                 -> get_plan (admin)
/// PUT    /{id}                 -> update_plan (admin)
/// DELETE /{id}                 -> delete_plan (admin)
/// GET    /{id}/subscribers     -> list_plan_subscribers (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(subscriptions::list_public_plans))
        .route(
            "/",
            get(subscriptions::list_plans).post(subscriptions::create_plan),
        )
        .route("/stats/overview", get(subscriptions::get_revenue_overview))
        .route("/users/all", get(subscriptions::list_user_subscriptions))
        .route("/users", post(subscriptions::create_user_subscription))
        .route("/users/{id}", put(subscriptions::update_user_subscription))
        .route(
            "/{id}",
            get(subscriptions::get_plan)
                .put(subscriptions::update_plan)
                .delete(subscriptions::delete_plan),
        )
        .route("/{id}/subscribers", get(subscriptions::list_plan_subscribers))
}
