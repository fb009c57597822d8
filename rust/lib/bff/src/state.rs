//! View state written by the profile controller.
//!
//! Each type lives at a fixed path in the [`StateStore`](calcdesk_flux::StateStore).
//! Renderers read these and draw; they never compute anything themselves.

use std::time::Duration;

use calcdesk_core::format::{self, UPDATE_COUNT_LABEL};
use calcdesk_core::{Profile, StrengthLevel};
use chrono::{DateTime, Utc};

/// Current route — stored at `app/route`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRoute(pub String);

impl AppRoute {
    pub const PATH: &'static str = "app/route";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Error,
}

/// Transient banner — stored at `app/alert`, removed on dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    /// How long the renderer keeps it on screen.
    pub display_for: Duration,
}

impl Alert {
    pub const PATH: &'static str = "app/alert";
}

/// Rendered profile card — stored at `profile/view`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub username: String,
    pub email: String,
    pub initials: String,
    pub member_since: String,
    pub member_days: i64,
    /// `Some` only when the profile has been edited at least once.
    pub last_updated: Option<String>,
    pub update_count: Option<String>,
}

impl ProfileView {
    pub const PATH: &'static str = "profile/view";

    /// Derive every display field from a fetched profile.
    pub fn from_profile(profile: &Profile, now: &DateTime<Utc>) -> Self {
        Self {
            username: profile.username.clone(),
            email: profile.email.clone(),
            initials: format::initials(&profile.username),
            member_since: format::long_date(&profile.created_at),
            member_days: format::member_days(&profile.created_at, now),
            last_updated: profile.profile_updated_at.as_ref().map(format::long_date),
            update_count: profile
                .profile_updated_at
                .map(|_| UPDATE_COUNT_LABEL.to_string()),
        }
    }
}

/// Number of calculations — stored at `profile/calculations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationCount(pub usize);

impl CalculationCount {
    pub const PATH: &'static str = "profile/calculations";
}

/// Pre-filled edit form — stored at `profile/form`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFormState {
    pub email: String,
    pub bio: String,
}

impl ProfileFormState {
    pub const PATH: &'static str = "profile/form";

    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            email: profile.email.clone(),
            bio: profile.bio.clone().unwrap_or_default(),
        }
    }
}

/// Instruction to empty the password form. Written at `profile/password-form`
/// after a successful change; password text never enters the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordFormCleared;

impl PasswordFormCleared {
    pub const PATH: &'static str = "profile/password-form";
}

/// Strength bar — stored at `profile/password-strength`. `None` hides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrengthIndicator(pub Option<StrengthLevel>);

impl StrengthIndicator {
    pub const PATH: &'static str = "profile/password-strength";
}
