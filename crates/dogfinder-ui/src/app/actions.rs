//! Async flows shared by the pages.
//!
//! Each flow takes what it needs out of the store in one reducer, awaits the
//! service outside the store, then records the outcome in a second reducer.

use dogfinder_core::api::DogApi;
use dogfinder_core::catalog::Catalog;
use dogfinder_core::clock::Clock;
use dogfinder_core::matching::{MatchError, match_candidates, match_message, request_match};
use dogfinder_core::search::{SearchTicket, fetch_results};
use dogfinder_core::session::{
    ExtensionOutcome, FORCED_LOGOUT_DELAY_MS, MISSING_FIELDS_MESSAGE, validate_credentials,
};
use gloo::console;
use gloo_timers::callback::Timeout;
use yewdux::prelude::Dispatch;

use crate::app::api::ApiCtx;
use crate::models::ToastKind;
use crate::store::AppStore;

pub(crate) const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
const LOGGED_OUT: &str = "You have been logged out.";

/// Run the search behind `ticket`, if any.
pub(crate) fn run_ticket(dispatch: &Dispatch<AppStore>, api: &ApiCtx, ticket: Option<SearchTicket>) {
    let Some(ticket) = ticket else {
        return;
    };
    let dispatch = dispatch.clone();
    let client = api.client.clone();
    yew::platform::spawn_local(async move {
        let result = fetch_results(&*client, &ticket.filters).await;
        dispatch.reduce_mut(|store| {
            if let Err(err) = store.catalog.complete_search(&ticket, result) {
                store.report_api_failure("Search failed", &err);
            }
        });
    });
}

/// Apply `change` to the catalog and run the search it issues.
pub(crate) fn update_catalog<F>(dispatch: &Dispatch<AppStore>, api: &ApiCtx, change: F)
where
    F: FnOnce(&mut Catalog) -> Option<SearchTicket>,
{
    let mut ticket = None;
    dispatch.reduce_mut(|store| ticket = change(&mut store.catalog));
    run_ticket(dispatch, api, ticket);
}

/// Fetch the remote breed list.
pub(crate) fn load_breeds(dispatch: &Dispatch<AppStore>, api: &ApiCtx) {
    let dispatch = dispatch.clone();
    let client = api.client.clone();
    yew::platform::spawn_local(async move {
        match client.breeds().await {
            Ok(breeds) => dispatch.reduce_mut(|store| store.breeds = breeds),
            Err(err) => dispatch.reduce_mut(|store| {
                store.report_api_failure("Failed to load breeds", &err);
            }),
        }
    });
}

/// Validate and submit the login form.
pub(crate) fn login(dispatch: &Dispatch<AppStore>, api: &ApiCtx, name: &str, email: &str) {
    let Ok(credentials) = validate_credentials(name, email) else {
        dispatch.reduce_mut(|store| store.login_error = Some(MISSING_FIELDS_MESSAGE.into()));
        return;
    };
    dispatch.reduce_mut(|store| {
        store.login_busy = true;
        store.login_error = None;
    });

    let dispatch = dispatch.clone();
    let client = api.client.clone();
    let clock = api.clock;
    yew::platform::spawn_local(async move {
        let result = client.login(&credentials).await;
        dispatch.reduce_mut(|store| {
            store.login_busy = false;
            match result {
                Ok(()) => {
                    let greeting = format!("Welcome, {}!", credentials.name);
                    store.session.complete_login(credentials, clock.now_ms());
                    store.push_toast(ToastKind::Success, greeting);
                }
                Err(err) => {
                    console::warn!(format!("login failed: {err}"));
                    store.session.clear();
                    store.login_error = Some(format!("Login failed: {err}"));
                }
            }
        });
    });
}

/// Clear local state, then tell the service. A failed remote logout is only logged.
pub(crate) fn logout(dispatch: &Dispatch<AppStore>, api: &ApiCtx, expired: bool) {
    let mut was_authenticated = false;
    dispatch.reduce_mut(|store| {
        was_authenticated = store.session.is_authenticated();
        if was_authenticated {
            store.end_session(if expired { SESSION_EXPIRED } else { LOGGED_OUT });
        }
    });
    if !was_authenticated {
        return;
    }
    let client = api.client.clone();
    yew::platform::spawn_local(async move {
        if let Err(err) = client.logout().await {
            console::warn!(format!("remote logout failed: {err}"));
        }
    });
}

/// Refresh the token, or schedule a forced logout when the credentials are gone.
pub(crate) fn extend_session(dispatch: &Dispatch<AppStore>, api: &ApiCtx) {
    let mut credentials = None;
    dispatch.reduce_mut(|store| {
        if store.extending || !store.session.is_authenticated() {
            return;
        }
        store.extending = true;
        credentials = Some(store.session.refresh_credentials());
    });
    let Some(credentials) = credentials else {
        return;
    };

    let dispatch = dispatch.clone();
    let api = api.clone();
    yew::platform::spawn_local(async move {
        let result = match credentials {
            Ok(credentials) => api.client.refresh_session(&credentials).await,
            Err(err) => Err(err),
        };
        let mut outcome = ExtensionOutcome::Failed;
        dispatch.reduce_mut(|store| {
            store.extending = false;
            outcome = match result {
                Ok(()) => {
                    store.session.extension_succeeded(api.clock.now_ms());
                    store.countdown = None;
                    store.push_toast(ToastKind::Success, "Session extended.");
                    ExtensionOutcome::Extended
                }
                Err(err) => store.session.extension_failed(&err),
            };
            match outcome {
                ExtensionOutcome::Extended => {}
                ExtensionOutcome::ReauthRequired => {
                    store.push_toast(ToastKind::Error, "Your credentials expired. Logging out...");
                }
                ExtensionOutcome::Failed => {
                    store.push_toast(ToastKind::Error, "Failed to extend the session. Try again.");
                }
            }
        });
        if outcome == ExtensionOutcome::ReauthRequired {
            Timeout::new(FORCED_LOGOUT_DELAY_MS, move || logout(&dispatch, &api, true)).forget();
        }
    });
}

/// Submit every favorite for a match.
pub(crate) fn generate_match(dispatch: &Dispatch<AppStore>, api: &ApiCtx) {
    let mut favorites = None;
    dispatch.reduce_mut(|store| {
        if store.matching {
            return;
        }
        let current = store.catalog.favorites().favorites();
        if let Err(err) = match_candidates(current) {
            store.push_toast(ToastKind::Error, err.to_string());
            return;
        }
        favorites = Some(current.clone());
        store.matching = true;
    });
    let Some(favorites) = favorites else {
        return;
    };

    let dispatch = dispatch.clone();
    let client = api.client.clone();
    yew::platform::spawn_local(async move {
        let result = request_match(&*client, &favorites).await;
        dispatch.reduce_mut(|store| {
            store.matching = false;
            match result {
                Ok(dog) => {
                    store.push_toast(ToastKind::Success, match_message(&dog));
                    store.matched = Some(dog);
                }
                Err(MatchError::Api(err)) => {
                    store.report_api_failure("Failed to generate match", &err);
                }
                Err(err) => {
                    store.push_toast(ToastKind::Error, err.to_string());
                }
            }
        });
    });
}
