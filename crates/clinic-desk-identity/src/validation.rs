//! Registration input validation.
//!
//! Every rule here runs before any vault or store call, so malformed input
//! never leaves the process as a storage error. Messages are user-facing.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum accepted display-name length.
pub const MIN_NAME_LEN: usize = 3;

/// A rejected registration input, with a message suitable for display.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please fill in all fields")]
    MissingFields,

    #[error("please enter a valid email address")]
    InvalidEmail,

    #[error("passwords do not match")]
    PasswordMismatch,

    #[error("password must be at least {MIN_PASSWORD_LEN} characters long")]
    PasswordTooShort,

    #[error("name must be at least {MIN_NAME_LEN} characters long")]
    NameTooShort,
}

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Check an email address for plausible shape (local@domain.tld).
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Check password length against [`MIN_PASSWORD_LEN`].
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        Err(ValidationError::PasswordTooShort)
    } else {
        Ok(())
    }
}

/// Check display-name length against [`MIN_NAME_LEN`].
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().chars().count() < MIN_NAME_LEN {
        Err(ValidationError::NameTooShort)
    } else {
        Ok(())
    }
}

/// Run the full registration rule set in form order: presence, email shape,
/// confirmation match, password length, name length.
pub fn validate_registration(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    if name.trim().is_empty()
        || email.trim().is_empty()
        || password.is_empty()
        || confirm_password.is_empty()
    {
        return Err(ValidationError::MissingFields);
    }
    validate_email(email)?;
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    validate_password(password)?;
    validate_name(name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_registration() {
        assert!(validate_registration("Asha Rao", "asha@clinic.example", "secret1", "secret1").is_ok());
    }

    #[test]
    fn test_rejects_blank_fields() {
        assert_eq!(
            validate_registration("", "a@b.co", "secret1", "secret1"),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate_registration("Asha", "a@b.co", "", ""),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_rejects_malformed_email() {
        for bad in ["no-at-sign", "two@@at.co", "spaces in@mail.co", "nodot@domain"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{bad}");
        }
        assert!(validate_email("front.desk@clinic.example").is_ok());
    }

    #[test]
    fn test_password_length_boundary() {
        // Five characters is rejected, six is the documented minimum.
        assert_eq!(validate_password("abcde"), Err(ValidationError::PasswordTooShort));
        assert!(validate_password("abcdef").is_ok());
    }

    #[test]
    fn test_name_length_boundary() {
        assert_eq!(validate_name("Jo"), Err(ValidationError::NameTooShort));
        assert!(validate_name("Joe").is_ok());
    }

    #[test]
    fn test_mismatched_confirmation() {
        assert_eq!(
            validate_registration("Asha Rao", "asha@clinic.example", "secret1", "secret2"),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_mismatch_reported_before_length() {
        // Form order: a mismatched pair of short passwords reads as a mismatch.
        assert_eq!(
            validate_registration("Asha Rao", "asha@clinic.example", "abc", "abd"),
            Err(ValidationError::PasswordMismatch)
        );
    }
}
