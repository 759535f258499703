//! Routing definitions for the Dog Finder UI.
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Login,
    #[at("/search")]
    Search,
    #[not_found]
    #[at("/404")]
    NotFound,
}
