//! Built-in API documentation.
//!
//! `GET /docs/openapi.json` serves the OpenAPI document generated from the
//! `#[utoipa::path]` annotations on the handlers, and `GET /docs` renders the
//! same document as an HTML index.

use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::path::{Operation, PathItem};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{
    admin, analytics, auth, cards, companies, finances, profiles, subscriptions, templates, users,
};
use crate::routes::health;
use crate::state::AppState;

/// Name of the bearer-token security scheme referenced by protected operations.
pub const BEARER_AUTH: &str = "bearerAuth";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inutile Cards API",
        description = "Digital business cards: link pages, NFC/QR cards, scans and billing."
    ),
    paths(
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::forgot_password,
        auth::reset_password,
        auth::change_password,
        // Profiles
        profiles::get_public_profile,
        profiles::check_slug,
        profiles::get_my_profile,
        profiles::update_my_profile,
        profiles::update_my_slug,
        profiles::add_my_link,
        profiles::reorder_my_links,
        profiles::update_my_link,
        profiles::delete_my_link,
        // Cards
        cards::get_card_setup,
        cards::get_card_redirect,
        cards::record_scan,
        cards::activate_card,
        cards::list_my_cards,
        cards::get_my_scan_analytics,
        cards::get_card_scan_analytics,
        // Admin
        admin::get_stats,
        admin::list_orders,
        admin::create_order,
        admin::get_order,
        admin::delete_order,
        admin::update_order_status,
        admin::list_products,
        admin::create_product,
        admin::list_low_stock,
        admin::update_product,
        admin::delete_product,
        admin::toggle_product,
        admin::list_users,
        admin::update_user,
        admin::delete_user,
        admin::update_user_role,
        admin::list_profiles,
        admin::update_profile,
        admin::delete_profile,
        admin::toggle_profile_public,
        admin::list_client_cards,
        admin::create_client_card,
        admin::get_client_card_by_serial,
        admin::list_client_cards_by_order,
        admin::get_client_card,
        admin::update_client_card,
        admin::delete_client_card,
        admin::update_client_card_status,
        // Users
        users::get_me,
        users::update_me,
        users::delete_me,
        users::list_users,
        users::get_user,
        users::update_user,
        users::deactivate_user,
        // Companies
        companies::list_companies,
        companies::create_company,
        companies::get_company,
        companies::update_company,
        companies::delete_company,
        companies::get_company_stats,
        companies::list_employees,
        companies::add_employee,
        companies::remove_employee,
        companies::assign_card,
        companies::unassign_card,
        // Analytics
        analytics::get_overview,
        analytics::get_daily,
        analytics::get_top_profiles,
        analytics::get_devices,
        analytics::get_countries,
        // Finances
        finances::get_overview,
        finances::get_subscription,
        finances::list_bills,
        finances::list_payment_cards,
        finances::add_payment_card,
        finances::delete_payment_card,
        finances::set_default_payment_card,
        finances::list_physical_cards,
        finances::order_physical_card,
        finances::update_physical_card,
        // Subscriptions
        subscriptions::list_public_plans,
        subscriptions::list_plans,
        subscriptions::create_plan,
        subscriptions::get_revenue_overview,
        subscriptions::list_user_subscriptions,
        subscriptions::create_user_subscription,
        subscriptions::update_user_subscription,
        subscriptions::get_plan,
        subscriptions::update_plan,
        subscriptions::delete_plan,
        subscriptions::list_plan_subscribers,
        // Templates
        templates::list_templates,
        templates::create_template,
        templates::list_all_templates,
        templates::get_template,
        templates::update_template,
        templates::delete_template,
        templates::apply_template,
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Service status"),
        (name = "auth", description = "Registration, sessions and passwords"),
        (name = "profiles", description = "Link pages and their links"),
        (name = "cards", description = "Card setup, activation and scans"),
        (name = "admin", description = "Back office"),
        (name = "users", description = "Accounts"),
        (name = "companies", description = "Companies and employees"),
        (name = "analytics", description = "Dashboard metrics"),
        (name = "finances", description = "Payment cards, bills and physical cards"),
        (name = "subscriptions", description = "Plans and user subscriptions"),
        (name = "templates", description = "Profile themes"),
    )
)]
pub struct ApiDoc;

/// Registers the JWT bearer scheme named by [`BEARER_AUTH`].
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER_AUTH,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Build the docs router (root level).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/docs", get(docs_index))
        .route("/docs/openapi.json", get(openapi_json))
}

async fn docs_index() -> Html<String> {
    Html(render_index(&ApiDoc::openapi()))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn operations(item: &PathItem) -> [(&'static str, Option<&Operation>); 5] {
    [
        ("GET", item.get.as_ref()),
        ("POST", item.post.as_ref()),
        ("PUT", item.put.as_ref()),
        ("PATCH", item.patch.as_ref()),
        ("DELETE", item.delete.as_ref()),
    ]
}

/// `public`, `auth` or `admin`, read off the security and 403 response.
fn access_label(op: &Operation) -> &'static str {
    if op.security.is_none() {
        "public"
    } else if op.responses.responses.contains_key("403") {
        "admin"
    } else {
        "auth"
    }
}

fn render_index(doc: &utoipa::openapi::OpenApi) -> String {
    let mut rows = String::new();
    for (path, item) in doc.paths.paths.iter() {
        for (method, op) in operations(item) {
            let Some(op) = op else { continue };
            rows.push_str(&format!(
                "<tr><td class=\"m\">{}</td><td><code>{}</code></td><td>{}</td><td>{}</td></tr>\n",
                method,
                path,
                access_label(op),
                op.summary.as_deref().unwrap_or_default()
            ));
        }
    }
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{title}</title>\
         <style>body{{font-family:sans-serif;margin:2rem}}table{{border-collapse:collapse}}\
         td{{padding:.25rem .75rem;border-bottom:1px solid #ddd}}.m{{font-weight:bold}}</style>\
         </head><body><h1>{title}</h1>\
         <p>Version {version}. Machine-readable document: <a href=\"/docs/openapi.json\">openapi.json</a>.</p>\
         <table><tr><th>Method</th><th>Path</th><th>Access</th><th>Summary</th></tr>\n{rows}</table>\
         </body></html>",
        title = doc.info.title,
        version = doc.info.version,
        rows = rows
    )
}
