use dogfinder_api_models::Dog;
use dogfinder_core::matching::match_message;
use yew::prelude::*;

use crate::logic::age_badge;

#[derive(Properties, PartialEq)]
pub(crate) struct MatchModalProps {
    pub(crate) dog: Dog,
    pub(crate) on_close: Callback<()>,
}

#[function_component(MatchModal)]
pub(crate) fn match_modal(props: &MatchModalProps) -> Html {
    let dog = &props.dog;
    let on_close = {
        let cb = props.on_close.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    html! {
        <div class="modal-overlay" role="dialog" aria-modal="true">
            <div class="card match-card">
                <header>
                    <h2>{match_message(dog)}</h2>
                </header>
                <img src={dog.img.clone()} alt={dog.name.clone()} />
                <p>{format!("{} \u{00b7} {}", dog.breed, age_badge(dog))}</p>
                <p class="muted">{format!("Zip {}", dog.zip_code)}</p>
                <div class="actions">
                    <button class="solid" onclick={on_close}>{"Close"}</button>
                </div>
            </div>
        </div>
    }
}
