//! Backend-for-frontend for the profile screen.
//!
//! [`ProfileController`] holds the command handlers; [`state`] defines what
//! they write into the view store.

pub mod controller;
pub mod state;

pub use controller::ProfileController;
pub use state::{
    Alert, AlertKind, AppRoute, CalculationCount, PasswordFormCleared, ProfileFormState,
    ProfileView, StrengthIndicator,
};
