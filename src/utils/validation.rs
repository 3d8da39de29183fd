//! Validation Utilities
//!
//! Input validation functions for user and product data.

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

/// Validates email address format using a comprehensive regex pattern
pub fn validate_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    regex.is_match(email)
}

/// Normalizes email address to lowercase and removes surrounding whitespace
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validates that a display name contains only allowed characters and length
pub fn validate_name(name: &str) -> bool {
    let trimmed = name.trim();

    // Name must be between 1 and 255 characters
    if trimmed.is_empty() || trimmed.len() > 255 {
        return false;
    }

    // Allow letters, digits, spaces, hyphens, and apostrophes
    static NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = NAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9\s\-']+$").expect("Failed to compile name regex"));

    regex.is_match(trimmed)
}

/// Validates password strength according to security requirements
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 || password.len() > 128 {
        return Err(ValidationError::new(
            "Password must be between 8 and 128 characters",
        ));
    }

    if !password.chars().any(|c| c.is_lowercase()) {
        return Err(ValidationError::new(
            "Password must contain at least one lowercase letter",
        ));
    }

    if !password.chars().any(|c| c.is_uppercase()) {
        return Err(ValidationError::new(
            "Password must contain at least one uppercase letter",
        ));
    }

    if !password.chars().any(|c| c.is_numeric()) {
        return Err(ValidationError::new(
            "Password must contain at least one digit",
        ));
    }

    Ok(())
}

/// Custom validator for email fields using the validator crate
pub fn email_validator(email: &str) -> Result<(), ValidationError> {
    if validate_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_email"))
    }
}

/// Custom validator for name fields using the validator crate
pub fn name_validator(name: &str) -> Result<(), ValidationError> {
    if validate_name(name) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("test.user+tag@domain.co.uk"));
        assert!(!validate_email("invalid.email"));
        assert!(!validate_email("@domain.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  USER@EXAMPLE.COM  "), "user@example.com");
        assert_eq!(normalize_email("Test@Domain.org"), "test@domain.org");
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("John Doe"));
        assert!(validate_name("Mary-Jane O'Connor"));
        assert!(validate_name("Widget 3000"));
        assert!(!validate_name(""));
        assert!(!validate_name("John@Doe"));
        assert!(!validate_name(&"a".repeat(256))); // Too long
    }

    #[test]
    fn test_password_strength_validation() {
        // Valid password
        assert!(validate_password_strength("SecurePass123").is_ok());

        // Too short
        assert!(validate_password_strength("Sp1").is_err());

        // Missing lowercase
        assert!(validate_password_strength("SECUREPASS123").is_err());

        // Missing uppercase
        assert!(validate_password_strength("securepass123").is_err());

        // Missing digit
        assert!(validate_password_strength("SecurePassword").is_err());
    }
}
