use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct LoginFormProps {
    pub(crate) busy: bool,
    pub(crate) error: Option<String>,
    /// Emits the raw name and email; validation happens in the caller.
    pub(crate) on_submit: Callback<(String, String)>,
}

#[function_component(LoginForm)]
pub(crate) fn login_form(props: &LoginFormProps) -> Html {
    let name = use_state(String::new);
    let email = use_state(String::new);

    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                name.set(input.value());
            }
        })
    };
    let on_email = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                email.set(input.value());
            }
        })
    };
    let on_submit = {
        let name = name.clone();
        let email = email.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_submit.emit(((*name).clone(), (*email).clone()));
        })
    };

    html! {
        <div class="login-page">
            <form class="card login-card" onsubmit={on_submit}>
                <header>
                    <h1>{"Dog Finder"}</h1>
                    <p class="muted">{"Log in to find your new best friend."}</p>
                </header>
                <label class="stack">
                    <span>{"Name"}</span>
                    <input type="text" value={(*name).clone()} oninput={on_name} disabled={props.busy} />
                </label>
                <label class="stack">
                    <span>{"Email"}</span>
                    <input type="email" value={(*email).clone()} oninput={on_email} disabled={props.busy} />
                </label>
                {if let Some(err) = &props.error {
                    html! { <p class="error-text">{err}</p> }
                } else { html! {} }}
                <button class="solid" type="submit" disabled={props.busy}>
                    {if props.busy { "Logging in..." } else { "Log in" }}
                </button>
            </form>
        </div>
    }
}
