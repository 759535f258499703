use crate::app::api::ApiCtx;
use crate::components::toast::ToastHost;
use crate::store::AppStore;
use pages::{LoginPage, NotFoundPage, SearchPage};
use preferences::API_BASE_URL;
pub(crate) use preferences::browser_storage;
use routes::Route;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{Dispatch, use_selector};

mod actions;
mod api;
mod pages;
mod preferences;
mod routes;
mod session;

#[function_component(DogFinderApp)]
pub(crate) fn dog_finder_app() -> Html {
    let dispatch = Dispatch::<AppStore>::new();
    let api_ctx = use_memo(|_| ApiCtx::new(API_BASE_URL), ());
    let toasts = use_selector(|store: &AppStore| store.toasts.clone());

    let dismiss_toast = Callback::from(move |id: u64| {
        dispatch.reduce_mut(|store| store.dismiss_toast(id));
    });

    html! {
        <ContextProvider<ApiCtx> context={(*api_ctx).clone()}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
                <ToastHost toasts={(*toasts).clone()} on_dismiss={dismiss_toast} />
            </BrowserRouter>
        </ContextProvider<ApiCtx>>
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Login => html! { <LoginPage /> },
        Route::Search => html! { <SearchPage /> },
        Route::NotFound => html! { <NotFoundPage /> },
    }
}

/// Mount the app into `#root`, or the document body when it is missing.
pub fn run_app() {
    console_error_panic_hook::set_once();
    if let Some(root) = gloo::utils::document().get_element_by_id("root") {
        yew::Renderer::<DogFinderApp>::with_root(root).render();
    } else {
        yew::Renderer::<DogFinderApp>::new().render();
    }
}
