pub(crate) mod dog_card;
pub(crate) mod filters;
pub(crate) mod header;
pub(crate) mod login;
pub(crate) mod match_modal;
pub(crate) mod pagination;
pub(crate) mod session_banner;
pub(crate) mod toast;
