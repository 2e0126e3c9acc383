//! HTTP API for the Inutile Cards platform.
//!
//! Exposes the router builder, configuration, shared state and every handler
//! so that the binary and the integration tests assemble the same application.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
