//! Company status constants, address type and capacity checks.
//!
//! Capacity limits are advisory: they are checked when an employee is added or
//! a card is assigned, and existing assignments are never revisited when a
//! limit is lowered afterwards.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CoreError;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_SUSPENDED: &str = "suspended";
pub const STATUS_INACTIVE: &str = "inactive";

pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_SUSPENDED, STATUS_INACTIVE];

/// Default employee and card limits for a new company.
pub const DEFAULT_MAX_EMPLOYEES: i32 = 10;
pub const DEFAULT_MAX_CARDS: i32 = 10;

/// Postal address of a company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid company status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Reject adding one more employee when the company is already at its limit.
pub fn check_employee_capacity(current: i64, max_employees: i32) -> Result<(), CoreError> {
    if current >= i64::from(max_employees) {
        return Err(CoreError::Conflict(format!(
            "Company has reached its limit of {max_employees} employees"
        )));
    }
    Ok(())
}

/// Reject assigning one more card when the company is already at its limit.
pub fn check_card_capacity(current: i64, max_cards: i32) -> Result<(), CoreError> {
    if current >= i64::from(max_cards) {
        return Err(CoreError::Conflict(format!(
            "Company has reached its limit of {max_cards} cards"
        )));
    }
    Ok(())
}

/// Free employee slots; never negative even if the limit was lowered.
pub fn available_slots(current: i64, max_employees: i32) -> i64 {
    (i64::from(max_employees) - current).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn capacity_allows_until_limit() {
        assert!(check_employee_capacity(9, 10).is_ok());
        assert_matches!(check_employee_capacity(10, 10), Err(CoreError::Conflict(_)));
        assert_matches!(check_card_capacity(3, 3), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn available_slots_never_negative() {
        assert_eq!(available_slots(3, 10), 7);
        assert_eq!(available_slots(12, 10), 0);
    }

    #[test]
    fn status_validation() {
        assert!(validate_status(STATUS_SUSPENDED).is_ok());
        assert!(validate_status("closed").is_err());
    }
}
