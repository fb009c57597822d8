//! Pure profile-screen logic: wire types, validation, strength scoring,
//! display formatting and the error taxonomy. No I/O.

pub mod config;
pub mod error;
pub mod format;
pub mod strength;
pub mod types;
pub mod validate;

pub use config::ProfileSettings;
pub use error::{ProfileError, ValidationError, error_kind, messages};
pub use strength::StrengthLevel;
pub use types::{AccessToken, Calculation, LoginRequest, PasswordChange, Profile, ProfileUpdate};
