//! Local form validation. Runs before any request is sent.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;
use crate::types::PasswordChange;

/// Minimum accepted length of a new password, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// `local@domain.tld` shape check. Not RFC 5322.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate an already-trimmed email.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Validate a password change form. Checks run in order and stop at the
/// first failure:
///
/// 1. current password present
/// 2. new password at least [`MIN_PASSWORD_LEN`] characters
/// 3. new password equals confirmation
/// 4. new password differs from current
pub fn validate_password_change(req: &PasswordChange) -> Result<(), ValidationError> {
    if req.current_password.is_empty() {
        return Err(ValidationError::MissingCurrentPassword);
    }
    if req.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if req.new_password != req.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if req.current_password == req.new_password {
        return Err(ValidationError::PasswordUnchanged);
    }
    Ok(())
}
