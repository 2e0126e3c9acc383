//! Payment cards, bills and physical card orders.
//!
//! A user's saved payment cards live in a single list. At most one card is the
//! default; the helpers on [`PaymentCards`] keep that invariant on every
//! mutation so callers never patch the `is_default` flags by hand.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Payment cards
// ---------------------------------------------------------------------------

/// Earliest accepted expiry year for a new payment card.
pub const MIN_EXPIRY_YEAR: i32 = 2024;

/// A saved payment card (only the last four digits are ever stored).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCard {
    pub id: String,
    pub last4: String,
    pub brand: String,
    pub expiry_month: i32,
    pub expiry_year: i32,
    #[serde(default)]
    pub is_default: bool,
}

/// Validate the user-supplied fields of a new payment card.
pub fn validate_payment_card(
    last4: &str,
    brand: &str,
    expiry_month: i32,
    expiry_year: i32,
) -> Result<(), CoreError> {
    if last4.len() != 4 || !last4.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(
            "last4 must be exactly 4 digits".into(),
        ));
    }
    if brand.trim().is_empty() {
        return Err(CoreError::Validation("Card brand is required".into()));
    }
    if !(1..=12).contains(&expiry_month) {
        return Err(CoreError::Validation(
            "expiryMonth must be between 1 and 12".into(),
        ));
    }
    if expiry_year < MIN_EXPIRY_YEAR {
        return Err(CoreError::Validation(format!(
            "expiryYear must be {MIN_EXPIRY_YEAR} or later"
        )));
    }
    Ok(())
}

/// Owned list of payment cards with default-card bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PaymentCards(pub Vec<PaymentCard>);

impl PaymentCards {
    /// Append a card. The first card, or a card flagged default, becomes the
    /// only default.
    pub fn add(&mut self, mut card: PaymentCard) -> &PaymentCard {
        if self.0.is_empty() {
            card.is_default = true;
        }
        if card.is_default {
            for existing in &mut self.0 {
                existing.is_default = false;
            }
        }
        self.0.push(card);
        &self.0[self.0.len() - 1]
    }

    /// Remove a card by id. When the default is removed, the first remaining
    /// card is promoted. Returns `false` if no card has that id.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(idx) = self.0.iter().position(|c| c.id == id) else {
            return false;
        };
        let removed = self.0.remove(idx);
        if removed.is_default {
            if let Some(first) = self.0.first_mut() {
                first.is_default = true;
            }
        }
        true
    }

    /// Make the card with `id` the only default. Returns `false` if absent.
    pub fn set_default(&mut self, id: &str) -> bool {
        if !self.0.iter().any(|c| c.id == id) {
            return false;
        }
        for card in &mut self.0 {
            card.is_default = card.id == id;
        }
        true
    }

    pub fn default_card(&self) -> Option<&PaymentCard> {
        self.0.iter().find(|c| c.is_default)
    }
}

// ---------------------------------------------------------------------------
// Subscription snapshot
// ---------------------------------------------------------------------------

/// Billing-side view of a user's current plan, kept on the finance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSnapshot {
    pub plan: String,
    pub status: String,
    #[schema(value_type = String, format = DateTime)]
    pub current_period_start: Timestamp,
    /// `None` for lifetime plans.
    #[schema(value_type = Option<String>, format = DateTime)]
    pub current_period_end: Option<Timestamp>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
}

// ---------------------------------------------------------------------------
// Bills
// ---------------------------------------------------------------------------

pub const BILL_PENDING: &str = "pending";
pub const BILL_PAID: &str = "paid";
pub const BILL_FAILED: &str = "failed";
pub const BILL_REFUNDED: &str = "refunded";

pub const VALID_BILL_STATUSES: &[&str] = &[BILL_PENDING, BILL_PAID, BILL_FAILED, BILL_REFUNDED];

/// Default page size for the bills listing.
pub const DEFAULT_BILLS_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Physical cards
// ---------------------------------------------------------------------------

pub const CARD_TYPE_CLASSIC: &str = "classic";
pub const CARD_TYPE_PREMIUM: &str = "premium";
pub const CARD_TYPE_METAL: &str = "metal";

pub const VALID_CARD_TYPES: &[&str] = &[CARD_TYPE_CLASSIC, CARD_TYPE_PREMIUM, CARD_TYPE_METAL];

pub const PHYSICAL_ORDERED: &str = "ordered";
pub const PHYSICAL_PROCESSING: &str = "processing";
pub const PHYSICAL_SHIPPED: &str = "shipped";
pub const PHYSICAL_DELIVERED: &str = "delivered";

/// Physical card statuses in lifecycle order.
pub const VALID_PHYSICAL_STATUSES: &[&str] = &[
    PHYSICAL_ORDERED,
    PHYSICAL_PROCESSING,
    PHYSICAL_SHIPPED,
    PHYSICAL_DELIVERED,
];

pub fn validate_card_type(card_type: &str) -> Result<(), CoreError> {
    if VALID_CARD_TYPES.contains(&card_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid card type '{card_type}'. Must be one of: {}",
            VALID_CARD_TYPES.join(", ")
        )))
    }
}

/// Validate a forward-only physical card status change.
pub fn validate_physical_transition(current: &str, next: &str) -> Result<(), CoreError> {
    let from = VALID_PHYSICAL_STATUSES.iter().position(|s| *s == current);
    let to = VALID_PHYSICAL_STATUSES.iter().position(|s| *s == next);
    match (from, to) {
        (_, None) => Err(CoreError::Validation(format!(
            "Invalid physical card status '{next}'. Must be one of: {}",
            VALID_PHYSICAL_STATUSES.join(", ")
        ))),
        (Some(from), Some(to)) if to > from => Ok(()),
        _ => Err(CoreError::Validation(format!(
            "Cannot move physical card from '{current}' to '{next}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, is_default: bool) -> PaymentCard {
        PaymentCard {
            id: id.to_string(),
            last4: "4242".to_string(),
            brand: "visa".to_string(),
            expiry_month: 12,
            expiry_year: 2030,
            is_default,
        }
    }

    #[test]
    fn first_card_becomes_default() {
        let mut cards = PaymentCards::default();
        cards.add(card("a", false));
        assert_eq!(cards.default_card().map(|c| c.id.as_str()), Some("a"));
    }

    #[test]
    fn new_default_clears_previous_default() {
        let mut cards = PaymentCards::default();
        cards.add(card("a", false));
        cards.add(card("b", true));
        let defaults: Vec<_> = cards.0.iter().filter(|c| c.is_default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, "b");
    }

    #[test]
    fn removing_default_promotes_first_remaining() {
        let mut cards = PaymentCards::default();
        cards.add(card("a", false));
        cards.add(card("b", false));
        cards.add(card("c", false));
        assert!(cards.remove("a"));
        assert_eq!(cards.default_card().map(|c| c.id.as_str()), Some("b"));
        assert!(!cards.remove("zzz"));
    }

    #[test]
    fn set_default_is_exclusive() {
        let mut cards = PaymentCards::default();
        cards.add(card("a", false));
        cards.add(card("b", false));
        assert!(cards.set_default("b"));
        assert!(!cards.0[0].is_default);
        assert!(cards.0[1].is_default);
        assert!(!cards.set_default("missing"));
    }

    #[test]
    fn payment_card_validation() {
        assert!(validate_payment_card("4242", "visa", 1, 2024).is_ok());
        assert!(validate_payment_card("42a2", "visa", 1, 2030).is_err());
        assert!(validate_payment_card("424", "visa", 1, 2030).is_err());
        assert!(validate_payment_card("4242", "visa", 13, 2030).is_err());
        assert!(validate_payment_card("4242", "visa", 6, 2023).is_err());
        assert!(validate_payment_card("4242", " ", 6, 2030).is_err());
    }

    #[test]
    fn physical_cards_move_forward_only() {
        assert!(validate_physical_transition(PHYSICAL_ORDERED, PHYSICAL_SHIPPED).is_ok());
        assert!(validate_physical_transition(PHYSICAL_SHIPPED, PHYSICAL_PROCESSING).is_err());
        assert!(validate_physical_transition(PHYSICAL_ORDERED, "lost").is_err());
    }
}
