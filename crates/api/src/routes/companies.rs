//! Route definitions for `/companies`. Every route requires the admin role.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Routes mounted at `/companies`.
///
/// ```text
/// GET    /                                                  -> list_companies
/// POST   /                                                  -> create_company
/// GET    /{id}                                              -> get_company
/// PUT    /{id}                                              -> update_company
/// DELETE /{id}                                              -> delete_company
/// GET    /{id}/stats                                        -> get_company_stats
/// GET    /{id}/employees                                    -> list_employees
/// POST   /{id}/employees                                    -> add_employee
/// DELETE /{id}/employees/{user_id}                          -> remove_employee
/// POST   /{id}/employees/{user_id}/assign-card/{card_id}    -> assign_card
/// POST   /{id}/employees/{user_id}/unassign-card/{card_id}  -> unassign_card
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(companies::list_companies).post(companies::create_company),
        )
        .route(
            "/{id}",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route("/{id}/stats", get(companies::get_company_stats))
        .route(
            "/{id}/employees",
            get(companies::list_employees).post(companies::add_employee),
        )
        .route(
            "/{id}/employees/{user_id}",
            delete(companies::remove_employee),
        )
        .route(
            "/{id}/employees/{user_id}/assign-card/{card_id}",
            post(companies::assign_card),
        )
        .route(
            "/{id}/employees/{user_id}/unassign-card/{card_id}",
            post(companies::unassign_card),
        )
}
