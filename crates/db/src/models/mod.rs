//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod analytics;
pub mod card_scan;
pub mod client_card;
pub mod company;
pub mod finance;
pub mod order;
pub mod product_card;
pub mod profile;
pub mod subscription;
pub mod template;
pub mod user;
