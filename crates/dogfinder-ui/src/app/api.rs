//! API client context for sharing a singleton client instance.
//!
//! # Design
//! - Create exactly one API client per app boot.
//! - Authentication rides on the service's cookie, so the client itself is
//!   immutable.

use std::rc::Rc;

use crate::app::preferences::BrowserClock;
use crate::services::api::ApiClient;

/// Shared API client and clock for UI callbacks.
#[derive(Clone)]
pub(crate) struct ApiCtx {
    /// Singleton API client instance.
    pub(crate) client: Rc<ApiClient>,
    /// Wall clock.
    pub(crate) clock: BrowserClock,
}

impl ApiCtx {
    /// Create a new context with the configured base URL.
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Rc::new(ApiClient::new(base_url)),
            clock: BrowserClock,
        }
    }
}

impl PartialEq for ApiCtx {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.client, &other.client)
    }
}
