//! Subscription plan intervals, user-subscription statuses and revenue math.

use chrono::Months;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Plan intervals
// ---------------------------------------------------------------------------

pub const INTERVAL_MONTHLY: &str = "monthly";
pub const INTERVAL_YEARLY: &str = "yearly";
pub const INTERVAL_LIFETIME: &str = "lifetime";

pub const VALID_INTERVALS: &[&str] = &[INTERVAL_MONTHLY, INTERVAL_YEARLY, INTERVAL_LIFETIME];

/// Default plan currency.
pub const DEFAULT_CURRENCY: &str = "EUR";

pub fn validate_interval(interval: &str) -> Result<(), CoreError> {
    if VALID_INTERVALS.contains(&interval) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid interval '{interval}'. Must be one of: {}",
            VALID_INTERVALS.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// User subscription statuses
// ---------------------------------------------------------------------------

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_PAUSED: &str = "paused";
pub const STATUS_CANCELLED: &str = "cancelled";
pub const STATUS_EXPIRED: &str = "expired";

pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_PAUSED, STATUS_CANCELLED, STATUS_EXPIRED];

/// Returns the statuses a user subscription in `from_status` may move to.
///
/// - `active`    -> `paused`, `cancelled`, `expired`
/// - `paused`    -> `active`, `cancelled`, `expired`
/// - `cancelled` -> `active` (renewal)
/// - `expired`   -> `active` (renewal)
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_ACTIVE => &[STATUS_PAUSED, STATUS_CANCELLED, STATUS_EXPIRED],
        STATUS_PAUSED => &[STATUS_ACTIVE, STATUS_CANCELLED, STATUS_EXPIRED],
        STATUS_CANCELLED | STATUS_EXPIRED => &[STATUS_ACTIVE],
        _ => &[],
    }
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid subscription status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate a user-subscription status change. Re-submitting the current
/// status is a no-op and accepted.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    validate_status(next)?;
    if current == next || valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot transition subscription from '{current}' to '{next}'"
        )))
    }
}

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

/// Monthly-normalized value of a plan price.
///
/// Yearly plans contribute a twelfth of their price; lifetime plans are one-off
/// payments and contribute nothing to recurring revenue.
pub fn monthly_value(price: f64, interval: &str) -> f64 {
    match interval {
        INTERVAL_MONTHLY => price,
        INTERVAL_YEARLY => price / 12.0,
        _ => 0.0,
    }
}

/// Monthly recurring revenue over `(price, interval)` pairs of active bindings.
pub fn mrr<'a, I>(active: I) -> f64
where
    I: IntoIterator<Item = (f64, &'a str)>,
{
    active
        .into_iter()
        .map(|(price, interval)| monthly_value(price, interval))
        .sum()
}

/// Annual recurring revenue derived from MRR.
pub fn arr(mrr: f64) -> f64 {
    mrr * 12.0
}

/// End of the first billing period starting at `start`. Lifetime plans have
/// no period end.
pub fn period_end(start: Timestamp, interval: &str) -> Option<Timestamp> {
    match interval {
        INTERVAL_MONTHLY => start.checked_add_months(Months::new(1)),
        INTERVAL_YEARLY => start.checked_add_months(Months::new(12)),
        _ => None,
    }
}

/// Round a currency amount to cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yearly_plans_are_normalized_to_monthly() {
        let value = mrr([(10.0, INTERVAL_MONTHLY), (120.0, INTERVAL_YEARLY)]);
        assert!((value - 20.0).abs() < f64::EPSILON);
        assert!((arr(value) - 240.0).abs() < f64::EPSILON);
    }

    #[test]
    fn lifetime_plans_add_no_recurring_revenue() {
        assert_eq!(mrr([(499.0, INTERVAL_LIFETIME)]), 0.0);
    }

    #[test]
    fn paused_can_resume_and_cancelled_can_renew() {
        assert!(validate_transition(STATUS_PAUSED, STATUS_ACTIVE).is_ok());
        assert!(validate_transition(STATUS_CANCELLED, STATUS_ACTIVE).is_ok());
        assert!(validate_transition(STATUS_CANCELLED, STATUS_PAUSED).is_err());
        assert!(validate_transition(STATUS_EXPIRED, STATUS_CANCELLED).is_err());
    }

    #[test]
    fn same_status_is_accepted() {
        assert!(validate_transition(STATUS_ACTIVE, STATUS_ACTIVE).is_ok());
    }

    #[test]
    fn unknown_interval_is_rejected() {
        assert!(validate_interval("weekly").is_err());
        assert!(validate_interval(INTERVAL_LIFETIME).is_ok());
    }

    #[test]
    fn period_end_follows_interval() {
        use chrono::{TimeZone, Utc};
        let start = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(
            period_end(start, INTERVAL_MONTHLY),
            Some(Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap())
        );
        assert_eq!(
            period_end(start, INTERVAL_YEARLY),
            Some(Utc.with_ymd_and_hms(2026, 1, 31, 0, 0, 0).unwrap())
        );
        assert_eq!(period_end(start, INTERVAL_LIFETIME), None);
    }

    #[test]
    fn cents_rounding() {
        assert_eq!(round_cents(33.333_333), 33.33);
    }
}
