//! Contact validation for submission payloads.
//!
//! Validation is side-effect-free and re-runnable: a caller may re-validate
//! after the user fixes a field without touching the rest of the attempt.
//! Field checks report the first failing field, not an aggregate.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::Contact;

/// Minimum length for the contact name, after trimming.
pub const MIN_NAME_LENGTH: usize = 3;

/// Required digit count for the mobile number, after stripping non-digits.
pub const MOBILE_DIGITS: usize = 10;

/// A contact field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Name must be at least {MIN_NAME_LENGTH} characters")]
    NameTooShort,

    #[error("Mobile number is required")]
    MobileRequired,

    #[error("Enter valid {MOBILE_DIGITS}-digit mobile number")]
    InvalidMobile,

    #[error("Email is required")]
    EmailRequired,

    #[error("Enter a valid email address")]
    InvalidEmail,
}

impl ValidationError {
    /// The payload field this error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NameRequired | ValidationError::NameTooShort => "name",
            ValidationError::MobileRequired | ValidationError::InvalidMobile => "mobile",
            ValidationError::EmailRequired | ValidationError::InvalidEmail => "email",
        }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern compiles"))
}

/// Validate the contact name: required, at least [`MIN_NAME_LENGTH`] characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if trimmed.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::NameTooShort);
    }
    Ok(())
}

/// Validate the mobile number: exactly [`MOBILE_DIGITS`] digits once
/// separators and other non-digit characters are stripped.
pub fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    let trimmed = mobile.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MobileRequired);
    }
    let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
    if digits != MOBILE_DIGITS {
        return Err(ValidationError::InvalidMobile);
    }
    Ok(())
}

/// Validate the email address against a basic `x@y.z` shape.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !email_pattern().is_match(trimmed) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Validate all contact fields, returning the first failure.
pub fn validate_contact(contact: &Contact) -> Result<(), ValidationError> {
    validate_name(&contact.name)?;
    validate_mobile(&contact.mobile)?;
    validate_email(&contact.email)?;
    Ok(())
}
