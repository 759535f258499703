use yew::prelude::*;

use crate::logic::session_warning_text;

#[derive(Properties, PartialEq)]
pub(crate) struct SessionBannerProps {
    pub(crate) remaining_secs: u64,
    pub(crate) extending: bool,
    pub(crate) on_extend: Callback<()>,
}

/// Expiry warning with an extend action.
#[function_component(SessionBanner)]
pub(crate) fn session_banner(props: &SessionBannerProps) -> Html {
    let on_extend = {
        let cb = props.on_extend.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    html! {
        <div class="session-banner" role="alert">
            <span>{session_warning_text(props.remaining_secs)}</span>
            <button class="solid" onclick={on_extend} disabled={props.extending}>
                {if props.extending { "Extending..." } else { "Extend session" }}
            </button>
        </div>
    }
}
