//! Route definitions for the `/admin` back office. Every route requires the
//! admin role.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /stats                              -> get_stats
///
/// GET    /orders                             -> list_orders
/// POST   /orders                             -> create_order
/// GET    /orders/{id}                        -> get_order
/// DELETE /orders/{id}                        -> delete_order
/// PUT    /orders/{id}/status                 -> update_order_status
///
/// GET    /products                           -> list_products
/// POST   /products                           -> create_product
/// GET    /products/low-stock                 -> list_low_stock
/// PUT    /products/{id}                      -> update_product
/// DELETE /products/{id}                      -> delete_product
/// PATCH  /products/{id}/toggle               -> toggle_product
///
/// GET    /users                              -> list_users
/// PUT    /users/{id}                         -> update_user
/// DELETE /users/{id}                         -> delete_user (hard delete)
/// PUT    /users/{id}/role                    -> update_user_role
///
/// GET    /profiles                           -> list_profiles
/// PUT    /profiles/{id}                      -> update_profile
/// DELETE /profiles/{id}                      -> delete_profile
/// PATCH  /profiles/{id}/toggle-public        -> toggle_profile_public
///
/// GET    /client-cards                       -> list_client_cards
/// POST   /client-cards                       -> create_client_card
/// GET    /client-cards/serial/{serial}       -> get_client_card_by_serial
/// GET    /client-cards/order/{order_id}      -> list_client_cards_by_order
/// GET    /client-cards/{id}                  -> get_client_card
/// PUT    /client-cards/{id}                  -> update_client_card
/// DELETE /client-cards/{id}                  -> delete_client_card
/// PUT    /client-cards/{id}/status           -> update_client_card_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::get_stats))
        // Orders
        .route("/orders", get(admin::list_orders).post(admin::create_order))
        .route(
            "/orders/{id}",
            get(admin::get_order).delete(admin::delete_order),
        )
        .route("/orders/{id}/status", put(admin::update_order_status))
        // Products
        .route(
            "/products",
            get(admin::list_products).post(admin::create_product),
        )
        .route("/products/low-stock", get(admin::list_low_stock))
        .route(
            "/products/{id}",
            put(admin::update_product).delete(admin::delete_product),
        )
        .route("/products/{id}/toggle", patch(admin::toggle_product))
        // Users
        .route("/users", get(admin::list_users))
        .route(
            "/users/{id}",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/users/{id}/role", put(admin::update_user_role))
        // Profiles
        .route("/profiles", get(admin::list_profiles))
        .route(
            "/profiles/{id}",
            put(admin::update_profile).delete(admin::delete_profile),
        )
        .route(
            "/profiles/{id}/toggle-public",
            patch(admin::toggle_profile_public),
        )
        // Client cards
        .route(
            "/client-cards",
            get(admin::list_client_cards).post(admin::create_client_card),
        )
        .route(
            "/client-cards/serial/{serial}",
            get(admin::get_client_card_by_serial),
        )
        .route(
            "/client-cards/order/{order_id}",
            get(admin::list_client_cards_by_order),
        )
        .route(
            "/client-cards/{id}",
            get(admin::get_client_card)
                .put(admin::update_client_card)
                .delete(admin::delete_client_card),
        )
        .route(
            "/client-cards/{id}/status",
            put(admin::update_client_card_status),
        )
}
