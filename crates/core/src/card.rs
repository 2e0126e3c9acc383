//! Physical client card statuses, transition rules and serial numbers.
//!
//! A card moves along a single ordered sequence:
//!
//! ```text
//! ordered -> manufacturing -> shipped -> delivered -> activated
//! ```
//!
//! Admin updates may skip ahead but never move backwards. The only way back
//! to the start is an explicit unassignment, which resets a card to
//! [`STATUS_ORDERED`] through its own repository call.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_ORDERED: &str = "ordered";
pub const STATUS_MANUFACTURING: &str = "manufacturing";
pub const STATUS_SHIPPED: &str = "shipped";
pub const STATUS_DELIVERED: &str = "delivered";
pub const STATUS_ACTIVATED: &str = "activated";

/// All valid card statuses, in lifecycle order.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_ORDERED,
    STATUS_MANUFACTURING,
    STATUS_SHIPPED,
    STATUS_DELIVERED,
    STATUS_ACTIVATED,
];

/// Maximum accepted serial number length.
pub const MAX_SERIAL_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

fn position(status: &str) -> Option<usize> {
    VALID_STATUSES.iter().position(|s| *s == status)
}

/// Returns the statuses a card in `from_status` may move to.
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match position(from_status) {
        Some(idx) => &VALID_STATUSES[idx + 1..],
        None => &[],
    }
}

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid card status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate that a card may move from `current` to `next`.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    validate_status(next)?;
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot move card from '{current}' to '{next}'"
        )))
    }
}

// ---------------------------------------------------------------------------
// Serial numbers
// ---------------------------------------------------------------------------

/// Normalize a user-supplied serial number: trimmed and uppercased.
pub fn normalize_serial(serial: &str) -> String {
    serial.trim().to_uppercase()
}

/// Validate a serial number after normalization.
pub fn validate_serial(serial: &str) -> Result<(), CoreError> {
    let serial = serial.trim();
    if serial.is_empty() {
        return Err(CoreError::Validation("Serial number is required".into()));
    }
    if serial.len() > MAX_SERIAL_LENGTH {
        return Err(CoreError::Validation(format!(
            "Serial number must be at most {MAX_SERIAL_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_moves_are_allowed() {
        assert!(validate_transition(STATUS_ORDERED, STATUS_MANUFACTURING).is_ok());
        assert!(validate_transition(STATUS_ORDERED, STATUS_DELIVERED).is_ok());
        assert!(validate_transition(STATUS_DELIVERED, STATUS_ACTIVATED).is_ok());
    }

    #[test]
    fn backward_and_same_moves_are_rejected() {
        assert!(validate_transition(STATUS_SHIPPED, STATUS_ORDERED).is_err());
        assert!(validate_transition(STATUS_SHIPPED, STATUS_SHIPPED).is_err());
        assert!(validate_transition(STATUS_ACTIVATED, STATUS_DELIVERED).is_err());
    }

    #[test]
    fn activated_is_terminal() {
        assert!(valid_transitions(STATUS_ACTIVATED).is_empty());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(validate_status("pending").is_err());
        assert!(validate_transition(STATUS_ORDERED, "lost").is_err());
    }

    #[test]
    fn serial_is_trimmed_and_uppercased() {
        assert_eq!(normalize_serial("  ic-2025-001234 "), "IC-2025-001234");
    }

    #[test]
    fn empty_serial_is_rejected() {
        assert!(validate_serial("   ").is_err());
        assert!(validate_serial("IC-1").is_ok());
    }
}
