//! Route definitions for `/cards`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::cards;
use crate::state::AppState;

/// Routes mounted at `/cards`.
///
/// ```text
/// GET    /setup/{serial}          -> get_card_setup (public)
/// GET    /redirect/{serial}       -> get_card_redirect (public)
/// POST   /scan                    -> record_scan (public)
/// POST   /activate                -> activate_card
/// GET    /my-cards                -> list_my_cards
/// GET    /analytics               -> get_my_scan_analytics
/// GET    /analytics/{card_id}     -> get_card_scan_analytics (owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/setup/{serial}", get(cards::get_card_setup))
        .route("/redirect/{serial}", get(cards::get_card_redirect))
        .route("/scan", post(cards::record_scan))
        .route("/activate", post(cards::activate_card))
        .route("/my-cards", get(cards::list_my_cards))
        .route("/analytics", get(cards::get_my_scan_analytics))
        .route("/analytics/{card_id}", get(cards::get_card_scan_analytics))
}
