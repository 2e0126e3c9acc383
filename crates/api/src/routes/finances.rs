//! Route definitions for `/finances`.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::finances;
use crate::state::AppState;

/// Routes mounted at `/finances`.
///
/// ```text
/// GET    /overview                          -> get_overview
/// GET    /subscription                      -> get_subscription
/// GET    /bills                             -> list_bills (?page=&limit=)
/// GET    /payment-cards                     -> list_payment_cards
/// POST   /payment-cards                     -> add_payment_card
/// DELETE /payment-cards/{card_id}           -> delete_payment_card
/// PUT    /payment-cards/{card_id}/default   -> set_default_payment_card
/// GET    /physical-cards                    -> list_physical_cards
/// POST   /physical-cards                    -> order_physical_card
/// PUT    /physical-cards/{id}               -> update_physical_card (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(finances::get_overview))
        .route("/subscription", get(finances::get_subscription))
        .route("/bills", get(finances::list_bills))
        .route(
            "/payment-cards",
            get(finances::list_payment_cards).post(finances::add_payment_card),
        )
        .route(
            "/payment-cards/{card_id}",
            delete(finances::delete_payment_card),
        )
        .route(
            "/payment-cards/{card_id}/default",
            put(finances::set_default_payment_card),
        )
        .route(
            "/physical-cards",
            get(finances::list_physical_cards).post(finances::order_physical_card),
        )
        .route("/physical-cards/{id}", put(finances::update_physical_card))
}
