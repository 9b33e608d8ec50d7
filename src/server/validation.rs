//! Form field validation shared by the routes

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::ApiError;

static EMAIL_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email format pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_FORMAT.is_match(email)
}

/// Trimmed value of a required field, `None` when missing or blank
pub fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Lower-cased, trimmed email that passed the format check
pub fn normalized_email(email: &str) -> Result<String, ApiError> {
    let email = email.trim().to_lowercase();
    if is_valid_email(&email) {
        Ok(email)
    } else {
        Err(ApiError::BadRequest("Invalid email format".to_string()))
    }
}
