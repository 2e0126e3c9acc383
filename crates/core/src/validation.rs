//! Conversion of `validator` results into [`CoreError`].

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Run derive-based validation and surface the first failure as a
/// [`CoreError::Validation`].
///
/// Field names are visited in sorted order so the reported message is stable
/// when several fields are invalid.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input
        .validate()
        .map_err(|errors| CoreError::Validation(first_message(&errors)))
}

/// The first human-readable message from a set of validation errors.
pub fn first_message(errors: &ValidationErrors) -> String {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, errs) in fields {
        if let Some(err) = errs.first() {
            return match &err.message {
                Some(msg) => msg.to_string(),
                None => format!("Invalid value for '{field}'"),
            };
        }
    }
    "Invalid request body".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "Invalid email address"))]
        email: String,
        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
    }

    #[test]
    fn valid_input_passes() {
        let input = Signup {
            email: "a@b.co".into(),
            password: "longenough".into(),
        };
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn first_message_is_stable() {
        let input = Signup {
            email: "nope".into(),
            password: "short".into(),
        };
        match validate_input(&input) {
            Err(CoreError::Validation(msg)) => assert_eq!(msg, "Invalid email address"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
