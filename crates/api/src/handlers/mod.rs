//! Request handlers, one submodule per resource.
//!
//! Handlers extract the caller ([`crate::middleware::auth::AuthUser`] or
//! [`crate::middleware::rbac::RequireAdmin`]), delegate to the repositories in
//! `inutile_db` and map failures through [`crate::error::AppError`].

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod cards;
pub mod companies;
pub mod finances;
pub mod profiles;
pub mod subscriptions;
pub mod templates;
pub mod users;
