use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Controller settings shared by every renderer.
///
/// Loaded from the `[profile]` table of the client config file; every field
/// falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    /// Route navigated to whenever the session ends or is rejected.
    pub login_route: String,

    /// How long an alert stays visible before it is dismissed.
    pub alert_display_ms: u64,

    /// Pause between a successful password change and the forced logout.
    pub logout_delay_ms: u64,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            login_route: "/static/login.html".to_string(),
            alert_display_ms: 5_000,
            logout_delay_ms: 2_000,
        }
    }
}

impl ProfileSettings {
    pub fn alert_display(&self) -> Duration {
        Duration::from_millis(self.alert_display_ms)
    }

    pub fn logout_delay(&self) -> Duration {
        Duration::from_millis(self.logout_delay_ms)
    }
}
