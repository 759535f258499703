//! Session expiry watcher.

use dogfinder_core::clock::Clock;
use dogfinder_core::session::{COUNTDOWN_TICK_MS, POLL_INTERVAL_MS, SessionEvent};
use gloo_timers::callback::Interval;
use yew::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

use crate::app::actions;
use crate::app::api::ApiCtx;
use crate::store::AppStore;

/// Poll the session while logged in; tick every second once the warning shows.
///
/// The interval is rebuilt whenever the login state or the warning flag
/// flips and dropped on teardown.
#[hook]
pub(crate) fn use_session_watcher(api: ApiCtx) {
    let authenticated = use_selector(|store: &AppStore| store.session.is_authenticated());
    let warning = use_selector(|store: &AppStore| store.session.is_warning());
    let deps = (*authenticated, *warning);

    use_effect_with_deps(
        move |&(authenticated, warning)| {
            let interval = authenticated.then(|| {
                let dispatch = Dispatch::<AppStore>::new();
                check(&dispatch, &api);
                let period = if warning {
                    COUNTDOWN_TICK_MS
                } else {
                    POLL_INTERVAL_MS
                };
                Interval::new(period, move || check(&dispatch, &api))
            });
            move || drop(interval)
        },
        deps,
    );
}

fn check(dispatch: &Dispatch<AppStore>, api: &ApiCtx) {
    let mut event = SessionEvent::Idle;
    let now = api.clock.now_ms();
    dispatch.reduce_mut(|store| event = store.tick_session(now));
    if event == SessionEvent::Expire {
        actions::logout(dispatch, api, true);
    }
}
