//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- JWT session tokens and password-reset token helpers.

pub mod jwt;
pub mod password;
