//! Form helpers shared by the public intake and enquiry endpoints.

use validator::{ValidationError, ValidationErrors};

/// The first failing field of a submitted form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

/// Pick the first failing field, in the order the form declares them.
/// `fallback_message` supplies text for rules that carry none.
pub fn first_violation(
    errors: &ValidationErrors,
    order: &[&'static str],
    fallback_message: fn(&str) -> &'static str,
) -> FieldViolation {
    let field_errors = errors.field_errors();

    for field in order {
        if let Some(errs) = field_errors.get(*field) {
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| fallback_message(field).to_string());
            return FieldViolation { field, message };
        }
    }

    FieldViolation {
        field: "form",
        message: "Please check the form and try again.".to_string(),
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trimmed, with blank input treated as absent
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Digits, spaces and `+ - ( ) .`, 4 to 32 characters, at least 4 digits
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let len = phone.chars().count();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.'));
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();

    if (4..=32).contains(&len) && allowed && digits >= 4 {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Please enter a valid phone number".into());
        Err(err)
    }
}
