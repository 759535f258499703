use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub(crate) struct PaginationProps {
    pub(crate) label: String,
    pub(crate) has_prev: bool,
    pub(crate) has_next: bool,
    pub(crate) on_prev: Callback<()>,
    pub(crate) on_next: Callback<()>,
}

#[function_component(Pagination)]
pub(crate) fn pagination(props: &PaginationProps) -> Html {
    let on_prev = {
        let cb = props.on_prev.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    let on_next = {
        let cb = props.on_next.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    html! {
        <nav class="pagination" aria-label="Pagination">
            <button class="ghost" onclick={on_prev} disabled={!props.has_prev}>{"Previous"}</button>
            <span class="muted">{props.label.clone()}</span>
            <button class="ghost" onclick={on_next} disabled={!props.has_next}>{"Next"}</button>
        </nav>
    }
}
