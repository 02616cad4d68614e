//! Field checks shared by signup, the registration wizard and contact queries.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::AppError;

pub static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Exactly ten ASCII digits.
pub static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

pub fn require_email(email: &str) -> Result<(), AppError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Please enter a valid email address".to_string(),
        ))
    }
}

pub fn require_phone(phone: &str) -> Result<(), AppError> {
    if is_valid_phone(phone) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Please enter a valid 10-digit phone number".to_string(),
        ))
    }
}

/// Fails with "Please fill in all required fields" when any value is blank.
pub fn require_filled(values: &[&str]) -> Result<(), AppError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        Err(AppError::Validation(
            "Please fill in all required fields".to_string(),
        ))
    } else {
        Ok(())
    }
}
