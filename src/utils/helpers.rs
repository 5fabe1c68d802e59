//! Helper functions and utilities
//!
//! Small input-normalisation helpers shared by the request schemas and services.

use std::sync::OnceLock;

use regex::Regex;

use crate::utils::errors::{GatherError, Result};

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
            .expect("email pattern is a valid regex")
    })
}

/// Normalize an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check whether a string looks like an email address
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

/// Require a non-blank text field, returning it trimmed
pub fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GatherError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Require a capacity bound of at least one
pub fn require_capacity(value: i32) -> Result<i32> {
    if value < 1 {
        return Err(GatherError::InvalidInput(
            "max_participants must be at least 1".to_string(),
        ));
    }
    Ok(value)
}

/// Trim an optional text field, dropping it when blank
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trim an optional text change; a blank value is kept as `""`, meaning "clear"
pub fn clearable_text(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("  first.last+tag@sub.example.org "));
        assert!(!is_valid_email("no-at-sign.example.com"));
        assert!(!is_valid_email("ana@localhost"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("title", "  Salsa night ").unwrap(), "Salsa night");
        assert!(require_text("title", "   ").is_err());
    }

    #[test]
    fn test_require_capacity() {
        assert_eq!(require_capacity(1).unwrap(), 1);
        assert!(require_capacity(0).is_err());
        assert!(require_capacity(-4).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some("  ".into())), None);
        assert_eq!(optional_text(Some(" bring shoes ".into())), Some("bring shoes".into()));
        assert_eq!(optional_text(None), None);
        assert_eq!(clearable_text(Some("  ".into())), Some(String::new()));
        assert_eq!(clearable_text(None), None);
    }
}
