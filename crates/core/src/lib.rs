//! Domain rules for the Inutile Cards platform.
//!
//! This crate performs no IO. It holds the shared id/timestamp aliases, the
//! domain error type, status constants with their transition tables, and the
//! pure helpers (slugs, user-agent classification, analytics and billing math)
//! used by the repository and API layers.

pub mod analytics;
pub mod card;
pub mod company;
pub mod error;
pub mod finance;
pub mod order;
pub mod pagination;
pub mod profile;
pub mod roles;
pub mod slug;
pub mod subscription;
pub mod types;
pub mod user_agent;
pub mod validation;
