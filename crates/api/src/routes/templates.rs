//! Route definitions for `/templates`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/templates`.
///
/// ```text
/// GET    /              -> list_templates (public)
/// POST   /              -> create_template (admin)
/// GET    /all           -> list_all_templates (admin)
/// GET    /{id}          -> get_template (public)
/// PUT    /{id}          -> update_template (admin)
/// DELETE /{id}          -> delete_template (admin)
/// POST   /{id}/apply    -> apply_template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route("/all", get(templates::list_all_templates))
        .route(
            "/{id}",
            get(templates::get_template)
                .put(templates::update_template)
                .delete(templates::delete_template),
        )
        .route("/{id}/apply", post(templates::apply_template))
}
