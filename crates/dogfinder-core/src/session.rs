//! Session lifetime: login, expiry warning, extension and logout.
//!
//! # Design
//! - The phase is a pure function of `(login_at, now, timing)`; timers only
//!   decide *when* to re-evaluate it.
//! - Auth flags and the user's credentials live in the session store so a
//!   reload keeps the session and an extension can re-authenticate.
//! - Logout always clears local state, whatever the remote call returns.

use dogfinder_api_models::LoginRequest;
use thiserror::Error;

use crate::api::{ApiError, ApiResult, DogApi};
use crate::clock::Clock;
use crate::storage::StorageHandle;

/// Session-storage key for the authenticated flag.
pub const AUTH_FLAG_KEY: &str = "isAuthenticated";
/// Session-storage key for the login timestamp (epoch millis).
pub const LOGIN_TIME_KEY: &str = "loginTime";
/// Session-storage key for the user's name.
pub const USER_NAME_KEY: &str = "userName";
/// Session-storage key for the user's email.
pub const USER_EMAIL_KEY: &str = "userEmail";

/// Session lifetime from login.
pub const SESSION_DURATION_MS: i64 = 60 * 60 * 1000;
/// Trailing window in which the expiry warning shows.
pub const WARNING_WINDOW_MS: i64 = 5 * 60 * 1000;
/// How often the phase is re-evaluated.
pub const POLL_INTERVAL_MS: u32 = 5_000;
/// Countdown refresh period while warning.
pub const COUNTDOWN_TICK_MS: u32 = 1_000;
/// Delay before a forced logout after rejected credentials.
pub const FORCED_LOGOUT_DELAY_MS: u32 = 1_000;

/// Message shown when login fields are blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";

/// Session lifetime parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Lifetime from login in milliseconds.
    pub duration_ms: i64,
    /// Warning window before expiry in milliseconds.
    pub warning_ms: i64,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            duration_ms: SESSION_DURATION_MS,
            warning_ms: WARNING_WINDOW_MS,
        }
    }
}

/// Where a session is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Not logged in.
    Anonymous,
    /// Logged in with more than the warning window left.
    Authenticated,
    /// Logged in, inside the warning window.
    ExpiringWarning,
    /// Lifetime elapsed; a forced logout is due.
    Expired,
}

/// Milliseconds left before expiry (negative once expired).
///
/// Saturates instead of overflowing on corrupt timestamps.
#[must_use]
pub const fn remaining_ms(login_at: i64, now: i64, timing: SessionTiming) -> i64 {
    timing.duration_ms.saturating_sub(now.saturating_sub(login_at))
}

/// Phase of an authenticated session that started at `login_at`.
///
/// A missing timestamp counts as expired.
#[must_use]
pub const fn phase_at(login_at: Option<i64>, now: i64, timing: SessionTiming) -> SessionPhase {
    let Some(login_at) = login_at else {
        return SessionPhase::Expired;
    };
    let remaining = remaining_ms(login_at, now, timing);
    if remaining <= 0 {
        SessionPhase::Expired
    } else if remaining < timing.warning_ms {
        SessionPhase::ExpiringWarning
    } else {
        SessionPhase::Authenticated
    }
}

/// Whole seconds left, rounded up and floored at 0.
#[must_use]
pub fn remaining_secs(login_at: i64, now: i64, timing: SessionTiming) -> u64 {
    let remaining = remaining_ms(login_at, now, timing).max(0);
    u64::try_from(remaining).map_or(0, |ms| ms.div_ceil(1_000))
}

/// Human countdown such as `4 minutes and 1 second`.
#[must_use]
pub fn format_remaining(secs: u64) -> String {
    fn unit(count: u64, name: &str) -> String {
        if count == 1 {
            format!("{count} {name}")
        } else {
            format!("{count} {name}s")
        }
    }
    if secs < 60 {
        return unit(secs, "second");
    }
    let minutes = unit(secs / 60, "minute");
    match secs % 60 {
        0 => minutes,
        rest => format!("{minutes} and {}", unit(rest, "second")),
    }
}

/// Failures of the login flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Name or email was blank.
    #[error("Please fill in all fields")]
    MissingFields,
    /// The service rejected the login.
    #[error("Failed to login. Please check your credentials and try again. ({0})")]
    Api(#[from] ApiError),
}

/// Trim and require both login fields.
///
/// # Errors
///
/// Returns [`SessionError::MissingFields`] when either is blank.
pub fn validate_credentials(name: &str, email: &str) -> Result<LoginRequest, SessionError> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() || email.is_empty() {
        return Err(SessionError::MissingFields);
    }
    Ok(LoginRequest {
        name: name.to_string(),
        email: email.to_string(),
    })
}

/// What a poll tick asks the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Nothing to do.
    Idle,
    /// Show or keep showing the expiry warning.
    Warn {
        /// Seconds left.
        remaining_secs: u64,
    },
    /// The session ran out; log out now.
    Expire,
}

/// Result of an extension attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionOutcome {
    /// Fresh token; the warning is cleared.
    Extended,
    /// Credentials were rejected or missing; log out after
    /// [`FORCED_LOGOUT_DELAY_MS`].
    ReauthRequired,
    /// Any other failure; the warning stays so the user can retry.
    Failed,
}

/// Authentication state bound to the session store.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionController {
    store: StorageHandle,
    timing: SessionTiming,
    authenticated: bool,
    login_at: Option<i64>,
    user: Option<LoginRequest>,
    warning: bool,
}

impl SessionController {
    /// Restore persisted auth state from `store`.
    #[must_use]
    pub fn restore(store: StorageHandle, timing: SessionTiming) -> Self {
        let authenticated = store.read(AUTH_FLAG_KEY).as_deref() == Some("true");
        let login_at = store
            .read(LOGIN_TIME_KEY)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|login_at| *login_at >= 0);
        let user = match (store.read(USER_NAME_KEY), store.read(USER_EMAIL_KEY)) {
            (Some(name), Some(email)) => Some(LoginRequest { name, email }),
            _ => None,
        };
        Self {
            store,
            timing,
            authenticated,
            login_at,
            user,
            warning: false,
        }
    }

    /// Timing in effect.
    #[must_use]
    pub const fn timing(&self) -> SessionTiming {
        self.timing
    }

    /// Whether a user is logged in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Login timestamp in epoch millis.
    #[must_use]
    pub const fn login_at(&self) -> Option<i64> {
        self.login_at
    }

    /// Stored credentials of the logged-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&LoginRequest> {
        self.user.as_ref()
    }

    /// Whether the expiry warning is showing.
    #[must_use]
    pub const fn is_warning(&self) -> bool {
        self.warning
    }

    /// Phase at `now`.
    #[must_use]
    pub const fn phase(&self, now: i64) -> SessionPhase {
        if self.authenticated {
            phase_at(self.login_at, now, self.timing)
        } else {
            SessionPhase::Anonymous
        }
    }

    /// Seconds left at `now`; 0 when logged out.
    #[must_use]
    pub fn remaining_secs(&self, now: i64) -> u64 {
        match (self.authenticated, self.login_at) {
            (true, Some(login_at)) => remaining_secs(login_at, now, self.timing),
            _ => 0,
        }
    }

    /// Record a successful login at `now` and persist it.
    pub fn complete_login(&mut self, credentials: LoginRequest, now: i64) {
        self.store.persist_raw(AUTH_FLAG_KEY, "true");
        self.store.persist_raw(LOGIN_TIME_KEY, &now.to_string());
        self.store.persist_raw(USER_NAME_KEY, &credentials.name);
        self.store.persist_raw(USER_EMAIL_KEY, &credentials.email);
        self.authenticated = true;
        self.login_at = Some(now);
        self.user = Some(credentials);
        self.warning = false;
    }

    /// Re-evaluate the phase at `now`.
    pub fn tick(&mut self, now: i64) -> SessionEvent {
        match self.phase(now) {
            SessionPhase::Anonymous | SessionPhase::Authenticated => {
                self.warning = false;
                SessionEvent::Idle
            }
            SessionPhase::ExpiringWarning => {
                self.warning = true;
                SessionEvent::Warn {
                    remaining_secs: self.remaining_secs(now),
                }
            }
            SessionPhase::Expired => SessionEvent::Expire,
        }
    }

    /// Credentials for a token refresh.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredentials`] when none are stored.
    pub fn refresh_credentials(&self) -> ApiResult<LoginRequest> {
        self.user.clone().ok_or(ApiError::MissingCredentials)
    }

    /// Restart the session clock after a successful refresh.
    pub fn extension_succeeded(&mut self, now: i64) {
        self.store.persist_raw(LOGIN_TIME_KEY, &now.to_string());
        self.login_at = Some(now);
        self.warning = false;
    }

    /// Classify a failed refresh; the warning stays visible either way.
    pub fn extension_failed(&mut self, error: &ApiError) -> ExtensionOutcome {
        tracing::warn!(error = %error, "session extension failed");
        self.warning = true;
        if error.is_credentials_error() {
            ExtensionOutcome::ReauthRequired
        } else {
            ExtensionOutcome::Failed
        }
    }

    /// Drop every session-derived value, locally and in storage.
    pub fn clear(&mut self) {
        for key in [AUTH_FLAG_KEY, LOGIN_TIME_KEY, USER_NAME_KEY, USER_EMAIL_KEY] {
            self.store.remove(key);
        }
        self.authenticated = false;
        self.login_at = None;
        self.user = None;
        self.warning = false;
    }

    /// Validate, call the service and record the login.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingFields`] before any network call, or
    /// the service error after clearing local state.
    pub async fn login(
        &mut self,
        api: &dyn DogApi,
        clock: &dyn Clock,
        name: &str,
        email: &str,
    ) -> Result<(), SessionError> {
        let credentials = validate_credentials(name, email)?;
        match api.login(&credentials).await {
            Ok(()) => {
                let now = clock.now_ms();
                self.complete_login(credentials, now);
                tracing::info!(login_at = now, "session started");
                Ok(())
            }
            Err(err) => {
                self.clear();
                Err(SessionError::Api(err))
            }
        }
    }

    /// Call the service logout and clear local state.
    ///
    /// # Errors
    ///
    /// Returns the remote error; local state is cleared regardless.
    pub async fn logout(&mut self, api: &dyn DogApi) -> ApiResult<()> {
        let result = api.logout().await;
        if let Err(err) = &result {
            tracing::warn!(error = %err, "remote logout failed; clearing local session");
        }
        self.clear();
        result
    }

    /// Refresh the token and restart the session clock.
    pub async fn extend(&mut self, api: &dyn DogApi, clock: &dyn Clock) -> ExtensionOutcome {
        if !self.authenticated {
            return ExtensionOutcome::ReauthRequired;
        }
        let result = match self.refresh_credentials() {
            Ok(credentials) => api.refresh_session(&credentials).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => {
                self.extension_succeeded(clock.now_ms());
                ExtensionOutcome::Extended
            }
            Err(err) => self.extension_failed(&err),
        }
    }
}
