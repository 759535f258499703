//! Routed pages.

use dogfinder_api_models::{Dog, SortField};
use dogfinder_core::catalog::Catalog;
use dogfinder_core::search::{FilterChange, SearchTicket};
use dogfinder_core::view::pagination_label;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

use crate::app::actions;
use crate::app::api::ApiCtx;
use crate::app::preferences::API_BASE_URL;
use crate::app::routes::Route;
use crate::app::session::use_session_watcher;
use crate::components::dog_card::DogCard;
use crate::components::filters::FilterBar;
use crate::components::header::SearchHeader;
use crate::components::login::LoginForm;
use crate::components::match_modal::MatchModal;
use crate::components::pagination::Pagination;
use crate::components::session_banner::SessionBanner;
use crate::logic::empty_results_message;
use crate::models::ToastKind;
use crate::store::AppStore;

#[hook]
fn use_api_ctx() -> ApiCtx {
    use_context::<ApiCtx>().unwrap_or_else(|| ApiCtx::new(API_BASE_URL))
}

#[function_component(LoginPage)]
pub(crate) fn login_page() -> Html {
    let api = use_api_ctx();
    let dispatch = Dispatch::<AppStore>::new();
    let authenticated = use_selector(|store: &AppStore| store.session.is_authenticated());
    let busy = use_selector(|store: &AppStore| store.login_busy);
    let error = use_selector(|store: &AppStore| store.login_error.clone());

    if *authenticated {
        return html! { <Redirect<Route> to={Route::Search} /> };
    }

    let on_submit = Callback::from(move |(name, email): (String, String)| {
        actions::login(&dispatch, &api, &name, &email);
    });

    html! { <LoginForm busy={*busy} error={(*error).clone()} {on_submit} /> }
}

#[function_component(SearchPage)]
pub(crate) fn search_page() -> Html {
    let api = use_api_ctx();
    let dispatch = Dispatch::<AppStore>::new();
    use_session_watcher(api.clone());

    let authenticated = use_selector(|store: &AppStore| store.session.is_authenticated());
    let user_name = use_selector(|store: &AppStore| {
        store.session.user().map(|user| user.name.clone())
    });
    let mode = use_selector(|store: &AppStore| store.catalog.mode());
    let filters = use_selector(|store: &AppStore| store.catalog.search().filters().clone());
    let page = use_selector(|store: &AppStore| store.catalog.page());
    let searching = use_selector(|store: &AppStore| store.catalog.search().is_searching());
    let favorite_ids = use_selector(|store: &AppStore| store.catalog.favorites().favorites().ids());
    let breed_options = use_selector(AppStore::breed_options);
    let countdown = use_selector(|store: &AppStore| store.countdown);
    let extending = use_selector(|store: &AppStore| store.extending);
    let matching = use_selector(|store: &AppStore| store.matching);
    let matched = use_selector(|store: &AppStore| store.matched.clone());

    {
        let dispatch = dispatch.clone();
        let api = api.clone();
        use_effect_with_deps(
            move |authenticated| {
                if **authenticated {
                    actions::load_breeds(&dispatch, &api);
                    actions::update_catalog(&dispatch, &api, |catalog| catalog.initial_search());
                }
                || ()
            },
            authenticated.clone(),
        );
    }

    if !*authenticated {
        return html! { <Redirect<Route> to={Route::Login} /> };
    }

    let on_catalog = |change: fn(&mut Catalog) -> Option<SearchTicket>| {
        let dispatch = dispatch.clone();
        let api = api.clone();
        Callback::from(move |()| actions::update_catalog(&dispatch, &api, change))
    };
    let on_change = {
        let dispatch = dispatch.clone();
        let api = api.clone();
        Callback::from(move |change: FilterChange| {
            actions::update_catalog(&dispatch, &api, |catalog| catalog.apply(change));
        })
    };
    let on_sort_field = {
        let dispatch = dispatch.clone();
        let api = api.clone();
        Callback::from(move |field: SortField| {
            actions::update_catalog(&dispatch, &api, |catalog| catalog.set_sort_field(field));
        })
    };
    let on_zip = {
        let dispatch = dispatch.clone();
        let api = api.clone();
        Callback::from(move |zip: Option<String>| {
            actions::update_catalog(&dispatch, &api, |catalog| {
                catalog.set_zip_code(zip.as_deref())
            });
        })
    };
    let on_toggle_favorite = {
        let dispatch = dispatch.clone();
        Callback::from(move |dog: Dog| {
            dispatch.reduce_mut(|store| {
                let name = dog.name.clone();
                if store.catalog.toggle_favorite(dog) {
                    store.push_toast(ToastKind::Success, format!("Added {name} to favorites."));
                } else {
                    store.push_toast(ToastKind::Info, format!("Removed {name} from favorites."));
                }
            });
        })
    };
    let on_match = {
        let dispatch = dispatch.clone();
        let api = api.clone();
        Callback::from(move |()| actions::generate_match(&dispatch, &api))
    };
    let on_logout = {
        let dispatch = dispatch.clone();
        let api = api.clone();
        Callback::from(move |()| actions::logout(&dispatch, &api, false))
    };
    let on_extend = {
        let dispatch = dispatch.clone();
        let api = api.clone();
        Callback::from(move |()| actions::extend_session(&dispatch, &api))
    };
    let on_close_match = {
        let dispatch = dispatch.clone();
        Callback::from(move |()| dispatch.reduce_mut(|store| store.matched = None))
    };

    let mode = *mode;
    let grid = if page.dogs.is_empty() && !*searching {
        html! { <p class="empty muted">{empty_results_message(mode, filters.has_filters())}</p> }
    } else {
        html! {
            <div class={classes!("dog-grid", searching.then_some("loading"))}>
                {for page.dogs.iter().map(|dog| html! {
                    <DogCard
                        key={dog.id.clone()}
                        dog={dog.clone()}
                        favorite={favorite_ids.contains(&dog.id)}
                        on_toggle={on_toggle_favorite.clone()}
                    />
                })}
            </div>
        }
    };

    html! {
        <main class="search-page">
            {if let Some(remaining_secs) = *countdown {
                html! { <SessionBanner {remaining_secs} extending={*extending} {on_extend} /> }
            } else { html! {} }}
            <SearchHeader
                user_name={(*user_name).clone()}
                {mode}
                favorite_count={favorite_ids.len()}
                matching={*matching}
                on_toggle_mode={on_catalog(|catalog| catalog.toggle_mode())}
                {on_match}
                {on_logout}
            />
            <FilterBar
                filters={(*filters).clone()}
                breed_options={(*breed_options).clone()}
                {on_change}
                {on_sort_field}
                on_toggle_sort={on_catalog(|catalog| catalog.toggle_sort())}
                {on_zip}
                on_clear={on_catalog(|catalog| catalog.clear_filters())}
            />
            {grid}
            <Pagination
                label={pagination_label(mode, &page)}
                has_prev={page.has_prev}
                has_next={page.has_next}
                on_prev={on_catalog(|catalog| catalog.prev_page())}
                on_next={on_catalog(|catalog| catalog.next_page())}
            />
            {if let Some(dog) = (*matched).clone() {
                html! { <MatchModal {dog} on_close={on_close_match} /> }
            } else { html! {} }}
        </main>
    }
}

/// Unknown paths go back to the entry page; [`LoginPage`] forwards logged-in users.
#[function_component(NotFoundPage)]
pub(crate) fn not_found_page() -> Html {
    html! { <Redirect<Route> to={Route::Login} /> }
}
