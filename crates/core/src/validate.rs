//! Validation for the two account identifier forms.
//!
//! Both checks run before any store access, so malformed input never reaches
//! a query or an SMS dispatch.

use crate::error::AuthError;

/// Minimum username length.
pub const USERNAME_MIN_LEN: usize = 3;
/// Maximum username length.
pub const USERNAME_MAX_LEN: usize = 30;

/// Maximum digits in a mobile number after the `+` prefix.
const MOBILE_MAX_DIGITS: usize = 14;

/// Validate a username: 3-30 characters from `[A-Za-z0-9_]`.
pub fn validate_username(username: &str) -> Result<(), AuthError> {
    if username.len() < USERNAME_MIN_LEN || username.len() > USERNAME_MAX_LEN {
        return Err(AuthError::Validation {
            field: "username",
            message: format!(
                "Username must be {USERNAME_MIN_LEN}-{USERNAME_MAX_LEN} characters long"
            ),
        });
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(AuthError::Validation {
            field: "username",
            message: "Username may only contain letters, digits, and underscores".into(),
        });
    }
    Ok(())
}

/// Validate an E.164 mobile number: `+`, then 1-14 digits, the first of
/// which is `1`-`9`.
pub fn validate_mobile_number(number: &str) -> Result<(), AuthError> {
    let invalid = || AuthError::Validation {
        field: "mobile_number",
        message: "Mobile number must be in E.164 format, e.g. +14155550123".into(),
    };

    let digits = number.strip_prefix('+').ok_or_else(invalid)?;
    if digits.is_empty() || digits.len() > MOBILE_MAX_DIGITS {
        return Err(invalid());
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
        return Err(invalid());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_accepts_valid_forms() {
        for name in ["abc", "alice123", "under_score", "A_1", &"x".repeat(30)] {
            assert!(validate_username(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn test_username_rejects_bad_length() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
    }

    #[test]
    fn test_username_rejects_bad_charset() {
        for name in ["has space", "dash-ed", "dot.ted", "émile", "semi;colon"] {
            let err = validate_username(name).unwrap_err();
            assert_eq!(err.code(), "VALIDATION_ERROR", "{name} should be rejected");
        }
    }

    #[test]
    fn test_mobile_accepts_valid_e164() {
        for number in ["+14155550123", "+442071838750", "+1", "+99999999999999"] {
            assert!(
                validate_mobile_number(number).is_ok(),
                "{number} should be valid"
            );
        }
    }

    #[test]
    fn test_mobile_rejects_invalid_forms() {
        for number in [
            "14155550123",      // missing +
            "+",                // no digits
            "+0123456789",      // leading zero
            "+1415555a123",     // letter
            "+1 415 555 0123",  // spaces
            "+123456789012345", // 15 digits
            "",
        ] {
            assert!(
                validate_mobile_number(number).is_err(),
                "{number:?} should be rejected"
            );
        }
    }
}
