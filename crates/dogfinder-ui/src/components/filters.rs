//! Breed, age, zip and sort controls.

use dogfinder_api_models::{SearchFilters, SortField};
use dogfinder_core::search::FilterChange;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::logic::{age_input_value, parse_age_input, sort_direction_label, sort_field_options};

/// Page sizes offered in the size menu.
const PAGE_SIZES: [u32; 3] = [12, 24, 48];

#[derive(Properties, PartialEq)]
pub(crate) struct FilterBarProps {
    pub(crate) filters: SearchFilters,
    pub(crate) breed_options: Vec<String>,
    pub(crate) on_change: Callback<FilterChange>,
    pub(crate) on_sort_field: Callback<SortField>,
    pub(crate) on_toggle_sort: Callback<()>,
    pub(crate) on_zip: Callback<Option<String>>,
    pub(crate) on_clear: Callback<()>,
}

#[function_component(FilterBar)]
pub(crate) fn filter_bar(props: &FilterBarProps) -> Html {
    let filters = &props.filters;

    let on_add_breed = {
        let selected = filters.breeds.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let Some(select) = e.target_dyn_into::<HtmlSelectElement>() else {
                return;
            };
            let breed = select.value();
            select.set_value("");
            if breed.is_empty() || selected.contains(&breed) {
                return;
            }
            let mut next = selected.clone();
            next.push(breed);
            on_change.emit(FilterChange::Breeds(next));
        })
    };
    let remove_breed = |breed: &str| {
        let next: Vec<String> = filters
            .breeds
            .iter()
            .filter(|selected| selected.as_str() != breed)
            .cloned()
            .collect();
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(FilterChange::Breeds(next.clone())))
    };

    let age_input = |is_min: bool| {
        let (min, max) = (filters.age_min, filters.age_max);
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let Some(input) = e.target_dyn_into::<HtmlInputElement>() else {
                return;
            };
            let value = parse_age_input(&input.value());
            let change = if is_min {
                FilterChange::AgeRange { min: value, max }
            } else {
                FilterChange::AgeRange { min, max: value }
            };
            on_change.emit(change);
        })
    };

    let on_zip = {
        let on_zip = props.on_zip.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let value = input.value();
                on_zip.emit((!value.trim().is_empty()).then_some(value));
            }
        })
    };
    let on_sort_field = {
        let on_sort_field = props.on_sort_field.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>()
                && let Ok(field) = select.value().parse::<SortField>()
            {
                on_sort_field.emit(field);
            }
        })
    };
    let on_size = {
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>()
                && let Ok(size) = select.value().parse::<u32>()
            {
                on_change.emit(FilterChange::Size(size));
            }
        })
    };
    let on_toggle_sort = {
        let cb = props.on_toggle_sort.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let on_clear = {
        let cb = props.on_clear.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let zip_value = filters
        .zip_codes
        .as_ref()
        .and_then(|zips| zips.first().cloned())
        .unwrap_or_default();

    html! {
        <section class="filter-bar">
            <div class="field">
                <label>{"Breeds"}</label>
                <select onchange={on_add_breed}>
                    <option value="" selected={true}>{"Add a breed..."}</option>
                    {for props.breed_options.iter().filter(|breed| !filters.breeds.contains(*breed)).map(|breed| html! {
                        <option value={breed.clone()}>{breed.clone()}</option>
                    })}
                </select>
                <div class="chips">
                    {for filters.breeds.iter().map(|breed| html! {
                        <span class="chip">
                            {breed.clone()}
                            <button class="ghost" aria-label={format!("Remove {breed}")} onclick={remove_breed(breed)}>{"\u{2715}"}</button>
                        </span>
                    })}
                </div>
            </div>
            <div class="field">
                <label>{"Age"}</label>
                <input type="number" min="0" placeholder="Min" value={age_input_value(filters.age_min)} onchange={age_input(true)} />
                <input type="number" min="0" placeholder="Max" value={age_input_value(filters.age_max)} onchange={age_input(false)} />
            </div>
            <div class="field">
                <label>{"Zip code"}</label>
                <input type="text" inputmode="numeric" placeholder="Any" value={zip_value} onchange={on_zip} />
            </div>
            <div class="field">
                <label>{"Sort by"}</label>
                <select onchange={on_sort_field}>
                    {for sort_field_options(filters).into_iter().map(|(field, label)| html! {
                        <option value={field.as_str()} selected={field == filters.sort.field}>{label}</option>
                    })}
                </select>
                <button class="ghost" onclick={on_toggle_sort}>{sort_direction_label(filters.sort.direction)}</button>
            </div>
            <div class="field">
                <label>{"Per page"}</label>
                <select onchange={on_size}>
                    {for PAGE_SIZES.iter().map(|size| html! {
                        <option value={size.to_string()} selected={*size == filters.page_size()}>{size.to_string()}</option>
                    })}
                </select>
            </div>
            <button class="ghost" onclick={on_clear} disabled={!filters.has_filters()}>{"Clear filters"}</button>
        </section>
    }
}
