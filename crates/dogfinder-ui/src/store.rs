//! App-wide yewdux store.
//!
//! # Design
//! - One store holds the catalog, the session and transient UI state so
//!   every component reads the same snapshot.
//! - Async work never runs inside a reducer: reducers hand out tickets or
//!   credentials, the caller awaits the service, and a second reducer
//!   records the outcome.

use dogfinder_api_models::Dog;
use dogfinder_core::api::ApiError;
use dogfinder_core::catalog::Catalog;
use dogfinder_core::session::{SessionController, SessionEvent, SessionTiming};
use dogfinder_core::storage::StorageHandle;
use dogfinder_core::view::ViewMode;
use yewdux::store::Store;

use crate::models::{Toast, ToastKind};

/// Toasts kept on screen at once; older ones are dropped first.
pub const MAX_TOASTS: usize = 4;

/// Global application store.
#[derive(Clone, Debug, PartialEq, Store)]
pub struct AppStore {
    /// Search results, favorites and the active mode.
    pub catalog: Catalog,
    /// Login state and expiry tracking.
    pub session: SessionController,
    /// Breed list fetched from the service.
    pub breeds: Vec<String>,
    /// Visible notifications.
    pub toasts: Vec<Toast>,
    /// Dog picked by the last match request.
    pub matched: Option<Dog>,
    /// A match request is in flight.
    pub matching: bool,
    /// A session extension is in flight.
    pub extending: bool,
    /// Seconds left while the expiry warning shows.
    pub countdown: Option<u64>,
    /// A login request is in flight.
    pub login_busy: bool,
    /// Message under the login form.
    pub login_error: Option<String>,
    next_toast_id: u64,
}

impl Default for AppStore {
    fn default() -> Self {
        let (local, session) = default_storage();
        Self::restore(local, session)
    }
}

#[cfg(target_arch = "wasm32")]
fn default_storage() -> (StorageHandle, StorageHandle) {
    crate::app::browser_storage()
}

#[cfg(not(target_arch = "wasm32"))]
fn default_storage() -> (StorageHandle, StorageHandle) {
    (StorageHandle::memory(), StorageHandle::memory())
}

impl AppStore {
    /// Restore state from the durable and session stores.
    #[must_use]
    pub fn restore(local: StorageHandle, session: StorageHandle) -> Self {
        Self {
            catalog: Catalog::restore(local, session.clone()),
            session: SessionController::restore(session, SessionTiming::default()),
            breeds: Vec::new(),
            toasts: Vec::new(),
            matched: None,
            matching: false,
            extending: false,
            countdown: None,
            login_busy: false,
            login_error: None,
            next_toast_id: 0,
        }
    }

    /// Show a toast. Returns its id.
    pub fn push_toast(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_toast_id += 1;
        let id = self.next_toast_id;
        self.toasts.push(Toast {
            id,
            message: message.into(),
            kind,
        });
        if self.toasts.len() > MAX_TOASTS {
            let drain = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(0..drain);
        }
        id
    }

    /// Remove the toast `id`.
    pub fn dismiss_toast(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    /// Number of favorites.
    #[must_use]
    pub fn favorite_count(&self) -> usize {
        self.catalog.favorites().favorites().len()
    }

    /// Breed choices for the filter menu.
    #[must_use]
    pub fn breed_options(&self) -> Vec<String> {
        self.catalog.breed_options(&self.breeds)
    }

    /// Report a failed remote call. Returns whether the session must end.
    pub fn report_api_failure(&mut self, context: &str, error: &ApiError) -> bool {
        if error.is_credentials_error() {
            self.end_session("Your session has expired. Please log in again.");
            return true;
        }
        self.push_toast(ToastKind::Error, format!("{context}: {error}"));
        false
    }

    /// Advance the session state machine and keep the countdown in sync.
    pub fn tick_session(&mut self, now: i64) -> SessionEvent {
        let event = self.session.tick(now);
        self.countdown = match event {
            SessionEvent::Warn { remaining_secs } => Some(remaining_secs),
            SessionEvent::Idle | SessionEvent::Expire => None,
        };
        event
    }

    /// Clear the session and return to search mode. Favorites are kept.
    pub fn end_session(&mut self, message: &str) {
        self.session.clear();
        self.catalog.enter_mode(ViewMode::Search);
        self.matched = None;
        self.matching = false;
        self.extending = false;
        self.countdown = None;
        self.login_busy = false;
        self.push_toast(ToastKind::Info, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dogfinder_api_models::LoginRequest;

    fn dog(id: &str) -> Dog {
        Dog {
            id: id.into(),
            img: String::new(),
            name: format!("Dog {id}"),
            age: 2,
            zip_code: "10001".into(),
            breed: "Pug".into(),
        }
    }

    fn logged_in() -> AppStore {
        let mut store = AppStore::default();
        store.session.complete_login(
            LoginRequest {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
            1_700_000_000_000,
        );
        store
    }

    #[test]
    fn toasts_are_capped_and_dismissable() {
        let mut store = AppStore::default();
        let first = store.push_toast(ToastKind::Info, "one");
        for index in 0..MAX_TOASTS {
            store.push_toast(ToastKind::Success, format!("more {index}"));
        }
        assert_eq!(store.toasts.len(), MAX_TOASTS);
        assert!(store.toasts.iter().all(|toast| toast.id != first));

        let last = store.toasts[MAX_TOASTS - 1].id;
        store.dismiss_toast(last);
        assert_eq!(store.toasts.len(), MAX_TOASTS - 1);
    }

    #[test]
    fn credential_failures_end_the_session_but_keep_favorites() {
        let mut store = logged_in();
        store.catalog.add_favorite(dog("a"));
        assert!(store.catalog.toggle_mode().is_none());

        assert!(store.report_api_failure("Search failed", &ApiError::Unauthorized));
        assert!(!store.session.is_authenticated());
        assert_eq!(store.catalog.mode(), ViewMode::Search);
        assert!(!store.catalog.search().is_searching());
        assert_eq!(store.favorite_count(), 1);
    }

    #[test]
    fn other_failures_only_toast() {
        let mut store = logged_in();
        let ended = store.report_api_failure(
            "Search failed",
            &ApiError::Transport("offline".into()),
        );
        assert!(!ended);
        assert!(store.session.is_authenticated());
        assert_eq!(store.toasts.len(), 1);
        assert_eq!(store.toasts[0].kind, ToastKind::Error);
    }

    #[test]
    fn ticks_drive_the_countdown() {
        let mut store = logged_in();
        let login_at = 1_700_000_000_000;
        assert_eq!(store.tick_session(login_at + 1_000), SessionEvent::Idle);
        assert_eq!(store.countdown, None);

        let event = store.tick_session(login_at + 58 * 60 * 1000);
        assert_eq!(event, SessionEvent::Warn { remaining_secs: 120 });
        assert_eq!(store.countdown, Some(120));
        assert!(store.session.is_warning());

        assert_eq!(store.tick_session(login_at + 60 * 60 * 1000), SessionEvent::Expire);
        assert_eq!(store.countdown, None);
    }

    #[test]
    fn breed_options_switch_with_mode() {
        let mut store = logged_in();
        store.breeds = vec!["Akita".into(), "Pug".into()];
        store.catalog.add_favorite(dog("a"));
        assert_eq!(store.breed_options(), vec!["Akita", "Pug"]);
        assert!(store.catalog.toggle_mode().is_none());
        assert_eq!(store.breed_options(), vec!["Pug"]);
    }
}
