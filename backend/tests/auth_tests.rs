//! Authentication and account tests
//!
//! Property-based and unit tests for signup validation, password
//! rules, and profile derivation.

use proptest::prelude::*;

use shared::models::initials;
use shared::validation::{validate_email, validate_password, validate_username};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate valid usernames (3-30 lowercase alphanumeric, underscore, dot)
fn username_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_.]{3,30}"
}

/// Generate valid email addresses
fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{5,10}@[a-z]{3,8}\\.(com|org|net|io)"
}

/// Generate valid passwords (8+ chars)
fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{8,20}"
}

/// Generate plausible human names
fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,12}"
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    /// Every generated username passes validation
    #[test]
    fn test_generated_usernames_are_valid(username in username_strategy()) {
        prop_assert!(validate_username(&username).is_ok());
    }

    /// Every generated email passes validation
    #[test]
    fn test_generated_emails_are_valid(email in email_strategy()) {
        prop_assert!(validate_email(&email).is_ok());
    }

    /// Every generated password passes validation
    #[test]
    fn test_generated_passwords_are_valid(password in password_strategy()) {
        prop_assert!(validate_password(&password).is_ok());
    }

    /// Short passwords never pass
    #[test]
    fn test_short_passwords_rejected(password in "[a-z0-9]{0,7}") {
        prop_assert!(validate_password(&password).is_err());
    }

    /// Initials are always two uppercase characters for non-empty names
    #[test]
    fn test_initials_shape(first in name_strategy(), last in name_strategy()) {
        let value = initials(&first, &last);
        prop_assert_eq!(value.chars().count(), 2);
        prop_assert!(value.chars().all(|c| c.is_uppercase() || !c.is_alphabetic()));
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_uppercase_usernames_rejected() {
    assert!(validate_username("Ada").is_err());
    assert!(validate_username("GRACE").is_err());
}

#[test]
fn test_username_length_bounds() {
    assert!(validate_username("ab").is_err());
    assert!(validate_username("abc").is_ok());
    assert!(validate_username(&"a".repeat(30)).is_ok());
    assert!(validate_username(&"a".repeat(31)).is_err());
}

#[test]
fn test_email_needs_at_and_dot() {
    assert!(validate_email("user@example.com").is_ok());
    assert!(validate_email("userexample.com").is_err());
    assert!(validate_email("user@examplecom").is_err());
    assert!(validate_email("a@b").is_err());
}

#[test]
fn test_initials_fall_back_when_name_missing() {
    assert_eq!(initials("", ""), "NN");
    assert_eq!(initials("Ada", ""), "NN");
}
