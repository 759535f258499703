use dogfinder_core::view::ViewMode;
use yew::prelude::*;

use crate::logic::{match_button_label, mode_toggle_label};

#[derive(Properties, PartialEq)]
pub(crate) struct SearchHeaderProps {
    pub(crate) user_name: Option<String>,
    pub(crate) mode: ViewMode,
    pub(crate) favorite_count: usize,
    pub(crate) matching: bool,
    pub(crate) on_toggle_mode: Callback<()>,
    pub(crate) on_match: Callback<()>,
    pub(crate) on_logout: Callback<()>,
}

#[function_component(SearchHeader)]
pub(crate) fn search_header(props: &SearchHeaderProps) -> Html {
    let emit = |cb: &Callback<()>| {
        let cb = cb.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let title = match props.mode {
        ViewMode::Search => "Find a dog",
        ViewMode::Favorites => "Your favorites",
    };

    html! {
        <header class="search-header">
            <div>
                <h1>{title}</h1>
                {if let Some(name) = &props.user_name {
                    html! { <p class="muted">{format!("Welcome, {name}")}</p> }
                } else { html! {} }}
            </div>
            <nav class="actions">
                <button class="ghost" onclick={emit(&props.on_toggle_mode)}>
                    {mode_toggle_label(props.mode, props.favorite_count)}
                </button>
                <button
                    class="solid"
                    onclick={emit(&props.on_match)}
                    disabled={props.matching || props.favorite_count == 0}
                >
                    {if props.matching { "Matching...".to_string() } else { match_button_label(props.favorite_count) }}
                </button>
                <button class="ghost" onclick={emit(&props.on_logout)}>{"Log out"}</button>
            </nav>
        </header>
    }
}
