use dogfinder_api_models::Dog;
use yew::prelude::*;

use crate::logic::{age_badge, favorite_toggle};

#[derive(Properties, PartialEq)]
pub(crate) struct DogCardProps {
    pub(crate) dog: Dog,
    pub(crate) favorite: bool,
    pub(crate) on_toggle: Callback<Dog>,
}

#[function_component(DogCard)]
pub(crate) fn dog_card(props: &DogCardProps) -> Html {
    let dog = &props.dog;
    let (glyph, label) = favorite_toggle(props.favorite);
    let on_click = {
        let dog = dog.clone();
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_: MouseEvent| on_toggle.emit(dog.clone()))
    };

    html! {
        <article class={classes!("dog-card", props.favorite.then_some("favorite"))}>
            <img src={dog.img.clone()} alt={dog.name.clone()} loading="lazy" />
            <div class="body">
                <header>
                    <h3>{dog.name.clone()}</h3>
                    <button class="ghost heart" aria-label={label} title={label} onclick={on_click}>{glyph}</button>
                </header>
                <p class="muted">{dog.breed.clone()}</p>
                <div class="badges">
                    <span class="badge">{age_badge(dog)}</span>
                    <span class="badge">{format!("Zip {}", dog.zip_code)}</span>
                </div>
            </div>
        </article>
    }
}
