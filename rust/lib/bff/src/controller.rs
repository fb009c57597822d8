//! Profile screen command handlers.
//!
//! Each handler validates locally, talks to the API with an explicit
//! [`Session`], writes the outcome into the view store, and returns a typed
//! result. Nothing here knows how the view is drawn.

use std::sync::Arc;

use calcdesk_client::{ApiError, ProfileApi, Session, SessionStorage};
use calcdesk_core::validate::{validate_email, validate_password_change};
use calcdesk_core::{
    LoginRequest, PasswordChange, Profile, ProfileError, ProfileSettings, ProfileUpdate,
    StrengthLevel, messages, strength,
};
use calcdesk_flux::StateStore;
use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use crate::state::*;

pub struct ProfileController {
    api: Arc<dyn ProfileApi>,
    storage: Arc<dyn SessionStorage>,
    store: Arc<StateStore>,
    settings: ProfileSettings,
    clock: fn() -> DateTime<Utc>,
}

impl ProfileController {
    pub fn new(
        api: Arc<dyn ProfileApi>,
        storage: Arc<dyn SessionStorage>,
        store: Arc<StateStore>,
        settings: ProfileSettings,
    ) -> Self {
        Self {
            api,
            storage,
            store,
            settings,
            clock: Utc::now,
        }
    }

    /// Replace the wall clock used for "member for N days".
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    // ── Session ─────────────────────────────────────────────────────

    /// Authentication gate. Synchronous; runs before any request.
    ///
    /// Without a stored token this navigates to login and fails with
    /// `AuthExpired`. No alert is shown.
    pub fn require_session(&self) -> Result<Session, ProfileError> {
        match Session::load(&*self.storage)? {
            Some(session) => Ok(session),
            None => {
                debug!("no session token, redirecting to login");
                self.navigate(&self.settings.login_route);
                Err(ProfileError::AuthExpired)
            }
        }
    }

    /// `POST /login`; stores the issued token as the new session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ProfileError> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.api.login(&req).await {
            Ok(token) => {
                let session = Session::new(token.access_token);
                session.save(&*self.storage)?;
                info!(email = %req.email, "session created");
                Ok(session)
            }
            Err(e) => {
                warn!(error = %e, "login rejected");
                let err = ProfileError::from(e);
                let message = match &err {
                    ProfileError::Network(_) => messages::NETWORK.to_string(),
                    ProfileError::ServerRejected { detail: Some(d), .. } => d.clone(),
                    _ => messages::LOGIN_FAILED.to_string(),
                };
                self.alert(AlertKind::Error, message);
                Err(err)
            }
        }
    }

    /// Clear the token and go to login. Available at any time.
    pub fn logout(&self) -> Result<(), ProfileError> {
        info!("logout");
        self.end_session()
    }

    fn end_session(&self) -> Result<(), ProfileError> {
        Session::clear(&*self.storage)?;
        self.navigate(&self.settings.login_route);
        Ok(())
    }

    /// A 401 on the profile read means the token is no good: drop it and send
    /// the user to login. Form submissions report a 401 like any other
    /// rejection and keep the session.
    fn reject_session(&self, e: ApiError) -> ProfileError {
        match e {
            ApiError::Server { status: 401, .. } => {
                info!("session rejected by server");
                if let Err(e) = self.end_session() {
                    error!(error = %e, "failed to clear rejected session");
                }
                ProfileError::AuthExpired
            }
            other => other.into(),
        }
    }

    // ── Profile ─────────────────────────────────────────────────────

    /// Page entry point: gate, then load the profile.
    pub async fn open(&self) -> Result<Profile, ProfileError> {
        self.load_profile().await
    }

    pub async fn load_profile(&self) -> Result<Profile, ProfileError> {
        let session = self.require_session()?;
        self.load_profile_as(&session).await
    }

    async fn load_profile_as(&self, session: &Session) -> Result<Profile, ProfileError> {
        let profile = match self.api.get_profile(session).await {
            Ok(p) => p,
            Err(e) => {
                let err = self.reject_session(e);
                if err != ProfileError::AuthExpired {
                    error!(error = %err, "failed to load profile");
                    self.alert(AlertKind::Error, messages::LOAD_FAILED);
                }
                return Err(err);
            }
        };

        let now = (self.clock)();
        self.store
            .set(ProfileView::PATH, ProfileView::from_profile(&profile, &now));
        self.store
            .set(ProfileFormState::PATH, ProfileFormState::from_profile(&profile));
        debug!(username = %profile.username, "profile rendered");

        self.load_calculation_count_as(session).await;
        Ok(profile)
    }

    /// Fetch the calculation count. Failures are logged and leave the
    /// displayed count as it was.
    pub async fn load_calculation_count(&self) -> Option<usize> {
        let session = Session::load(&*self.storage).ok().flatten()?;
        self.load_calculation_count_as(&session).await
    }

    async fn load_calculation_count_as(&self, session: &Session) -> Option<usize> {
        match self.api.list_calculations(session).await {
            Ok(items) => {
                let count = items.len();
                self.store.set(CalculationCount::PATH, CalculationCount(count));
                Some(count)
            }
            Err(e) => {
                warn!(error = %e, "failed to load calculations");
                None
            }
        }
    }

    /// Submit the profile form.
    ///
    /// On success the displayed email is updated from the response, then the
    /// whole profile is reloaded once the update has completed.
    pub async fn update_profile(&self, email: &str, bio: &str) -> Result<Profile, ProfileError> {
        let update = ProfileUpdate::from_form(email, bio);
        if let Err(v) = validate_email(&update.email) {
            return Err(self.fail_update(v.into()));
        }
        let session = self.require_session()?;

        let updated = match self.api.update_profile(&session, &update).await {
            Ok(p) => p,
            Err(e) => return Err(self.fail_update(e.into())),
        };

        if let Some(mut view) = self.store.get_as::<ProfileView>(ProfileView::PATH) {
            view.email = updated.email.clone();
            self.store.set(ProfileView::PATH, view);
        }
        self.alert(AlertKind::Success, messages::UPDATE_SUCCEEDED);
        info!("profile updated");

        if let Err(e) = self.load_profile_as(&session).await {
            warn!(error = %e, "reload after update failed");
        }
        Ok(updated)
    }

    fn fail_update(&self, err: ProfileError) -> ProfileError {
        warn!(kind = err.kind(), error = %err, "profile update failed");
        if let Some(message) = err.update_alert() {
            self.alert(AlertKind::Error, message);
        }
        err
    }

    // ── Password ────────────────────────────────────────────────────

    /// Submit the password form.
    ///
    /// On success the form is cleared and, after `logout_delay`, the session
    /// is destroyed so the user signs in again with the new credentials.
    pub async fn change_password(&self, form: PasswordChange) -> Result<(), ProfileError> {
        if let Err(v) = validate_password_change(&form) {
            return Err(self.fail_password(v.into()));
        }
        let session = self.require_session()?;

        if let Err(e) = self.api.change_password(&session, &form).await {
            return Err(self.fail_password(e.into()));
        }

        info!("password changed");
        self.alert(AlertKind::Success, messages::PASSWORD_CHANGED);
        self.store.set(PasswordFormCleared::PATH, PasswordFormCleared);

        tokio::time::sleep(self.settings.logout_delay()).await;
        self.end_session()
    }

    fn fail_password(&self, err: ProfileError) -> ProfileError {
        warn!(kind = err.kind(), error = %err, "password change failed");
        if let Some(message) = err.password_alert() {
            self.alert(AlertKind::Error, message);
        }
        err
    }

    /// Recompute the strength indicator for the new-password field.
    pub fn password_input(&self, candidate: &str) -> Option<StrengthLevel> {
        let level = strength::indicator(candidate);
        self.store.set(StrengthIndicator::PATH, StrengthIndicator(level));
        level
    }

    // ── View helpers ────────────────────────────────────────────────

    fn navigate(&self, route: &str) {
        self.store.set(AppRoute::PATH, AppRoute(route.to_string()));
    }

    fn alert(&self, kind: AlertKind, message: impl Into<String>) {
        self.store.set(
            Alert::PATH,
            Alert {
                kind,
                message: message.into(),
                display_for: self.settings.alert_display(),
            },
        );
    }

    /// Hide the current alert once its display time has elapsed.
    pub fn dismiss_alert(&self) {
        self.store.remove(Alert::PATH);
    }
}
