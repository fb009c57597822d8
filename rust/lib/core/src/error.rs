use thiserror::Error;

// ── Error kinds ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Renderers and logs match on
// these, never on the human-readable alert text.

/// Stable error kind constants.
pub mod error_kind {
    pub const AUTH_EXPIRED: &str = "AUTH_EXPIRED";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const SERVER_REJECTED: &str = "SERVER_REJECTED";
    pub const NETWORK: &str = "NETWORK";
    pub const STORAGE: &str = "STORAGE";
}

/// Friendly texts shown to the user when a request fails.
pub mod messages {
    pub const LOAD_FAILED: &str = "Failed to load profile data";
    pub const UPDATE_FAILED: &str = "Failed to update profile";
    pub const EMAIL_IN_USE: &str = "This email is already in use by another account";
    pub const UPDATE_SUCCEEDED: &str = "Profile updated successfully!";
    pub const PASSWORD_FAILED: &str = "Failed to change password";
    pub const PASSWORD_INCORRECT: &str = "Current password is incorrect";
    pub const PASSWORD_INVALID: &str = "Password validation failed. Please check your inputs.";
    pub const PASSWORD_CHANGED: &str = "Password changed successfully! Redirecting to login...";
    pub const NETWORK: &str = "Network error. Please check your connection and try again.";
    pub const LOGIN_FAILED: &str = "Login failed";
}

// ── ValidationError ─────────────────────────────────────────────────

/// A local input failure. Raised before any network call is made.
///
/// `Display` is the alert text.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Please enter your current password")]
    MissingCurrentPassword,

    #[error("New password must be at least 8 characters long")]
    PasswordTooShort,

    #[error("New password and confirmation password do not match")]
    PasswordMismatch,

    #[error("New password must be different from current password")]
    PasswordUnchanged,
}

// ── ProfileError ────────────────────────────────────────────────────

/// Result of a failed controller command.
///
/// ```text
/// AuthExpired     -> clear token, navigate to login, no alert
/// Validation      -> alert, no request sent
/// ServerRejected  -> alert with mapped or server-provided text
/// Network         -> "check your connection" alert
/// Storage         -> session storage unreadable / unwritable
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// Missing or rejected session token.
    #[error("session expired")]
    AuthExpired,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Non-2xx response. `detail` is the server's string detail, if any.
    #[error("server rejected request (HTTP {status}){}", detail_suffix(.detail))]
    ServerRejected { status: u16, detail: Option<String> },

    /// The request never produced a response (DNS, refused, TLS, ...).
    #[error("network: {0}")]
    Network(String),

    #[error("storage: {0}")]
    Storage(String),
}

impl ProfileError {
    /// Stable, machine-readable error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ProfileError::AuthExpired => error_kind::AUTH_EXPIRED,
            ProfileError::Validation(_) => error_kind::VALIDATION_FAILED,
            ProfileError::ServerRejected { .. } => error_kind::SERVER_REJECTED,
            ProfileError::Network(_) => error_kind::NETWORK,
            ProfileError::Storage(_) => error_kind::STORAGE,
        }
    }

    fn detail(&self) -> Option<&str> {
        match self {
            ProfileError::ServerRejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Alert text for a failed profile update.
    ///
    /// `None` means no alert should be shown (session expiry redirects).
    pub fn update_alert(&self) -> Option<String> {
        match self {
            ProfileError::AuthExpired => None,
            ProfileError::Validation(v) => Some(v.to_string()),
            ProfileError::ServerRejected { status: 400, detail: Some(d) }
                if contains_ignore_case(d, "already") =>
            {
                Some(messages::EMAIL_IN_USE.to_string())
            }
            ProfileError::ServerRejected { .. } => Some(
                self.detail()
                    .map(str::to_string)
                    .unwrap_or_else(|| messages::UPDATE_FAILED.to_string()),
            ),
            ProfileError::Network(_) => Some(messages::NETWORK.to_string()),
            ProfileError::Storage(_) => Some(messages::UPDATE_FAILED.to_string()),
        }
    }

    /// Alert text for a failed password change.
    pub fn password_alert(&self) -> Option<String> {
        match self {
            ProfileError::AuthExpired => None,
            ProfileError::Validation(v) => Some(v.to_string()),
            ProfileError::ServerRejected { status: 400, detail: Some(d) } => {
                if contains_ignore_case(d, "incorrect") {
                    Some(messages::PASSWORD_INCORRECT.to_string())
                } else if contains_ignore_case(d, "match") {
                    Some(ValidationError::PasswordMismatch.to_string())
                } else {
                    Some(d.clone())
                }
            }
            ProfileError::ServerRejected { status: 422, .. } => {
                Some(messages::PASSWORD_INVALID.to_string())
            }
            ProfileError::ServerRejected { .. } => Some(
                self.detail()
                    .map(str::to_string)
                    .unwrap_or_else(|| messages::PASSWORD_FAILED.to_string()),
            ),
            ProfileError::Network(_) => Some(messages::NETWORK.to_string()),
            ProfileError::Storage(_) => Some(messages::PASSWORD_FAILED.to_string()),
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
