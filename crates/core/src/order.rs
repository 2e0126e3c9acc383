//! Order status constants and transition rules.
//!
//! ```text
//! pending -> processing -> completed
//! pending | processing -> cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal.

use crate::error::CoreError;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_PROCESSING: &str = "processing";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid order statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_PROCESSING,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

/// Returns the statuses an order in `from_status` may move to.
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_PENDING => &[STATUS_PROCESSING, STATUS_CANCELLED],
        STATUS_PROCESSING => &[STATUS_COMPLETED, STATUS_CANCELLED],
        _ => &[],
    }
}

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid order status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate that an order may move from `current` to `next`.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    validate_status(next)?;
    let allowed = valid_transitions(current);
    if allowed.contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition order from '{current}' to '{next}'. Allowed transitions: {allowed:?}"
        )))
    }
}

/// Validate an order total.
pub fn validate_total(total: f64) -> Result<(), String> {
    if total.is_finite() && total >= 0.0 {
        Ok(())
    } else {
        Err("Order total must be a non-negative amount".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_moves_to_processing_or_cancelled() {
        assert!(validate_transition(STATUS_PENDING, STATUS_PROCESSING).is_ok());
        assert!(validate_transition(STATUS_PENDING, STATUS_CANCELLED).is_ok());
        assert!(validate_transition(STATUS_PENDING, STATUS_COMPLETED).is_err());
    }

    #[test]
    fn processing_moves_to_completed_or_cancelled() {
        assert!(validate_transition(STATUS_PROCESSING, STATUS_COMPLETED).is_ok());
        assert!(validate_transition(STATUS_PROCESSING, STATUS_CANCELLED).is_ok());
        assert!(validate_transition(STATUS_PROCESSING, STATUS_PENDING).is_err());
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        assert!(valid_transitions(STATUS_COMPLETED).is_empty());
        assert!(valid_transitions(STATUS_CANCELLED).is_empty());
    }

    #[test]
    fn negative_total_is_rejected() {
        assert!(validate_total(-0.01).is_err());
        assert!(validate_total(f64::NAN).is_err());
        assert!(validate_total(0.0).is_ok());
    }
}
