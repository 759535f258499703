//! Browser storage, clock and environment adapters for the app shell.

use dogfinder_core::clock::Clock;
use dogfinder_core::storage::{KeyValueStore, StorageError, StorageHandle};
use gloo::console;
use gloo::storage::{LocalStorage, SessionStorage, Storage};
use js_sys::Date;

/// Base URL of the adoption service.
pub(crate) const API_BASE_URL: &str = "https://frontend-take-home-service.fetch.com";

/// Which browser storage area backs a [`BrowserStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StorageArea {
    Local,
    Session,
}

/// Raw string access to `localStorage` or `sessionStorage`.
///
/// Values are stored verbatim; JSON encoding happens in the core helpers.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BrowserStore {
    area: StorageArea,
}

impl BrowserStore {
    pub(crate) const fn new(area: StorageArea) -> Self {
        Self { area }
    }

    fn raw(self) -> web_sys::Storage {
        match self.area {
            StorageArea::Local => LocalStorage::raw(),
            StorageArea::Session => SessionStorage::raw(),
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn read(&self, key: &str) -> Option<String> {
        self.raw().get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.raw()
            .set_item(key, value)
            .map_err(|err| StorageError::Write {
                key: key.to_string(),
                detail: format!("{err:?}"),
            })
    }

    fn remove(&self, key: &str) {
        if let Err(err) = self.raw().remove_item(key) {
            console::warn!(format!("failed to remove '{key}': {err:?}"));
        }
    }
}

/// Handles over `localStorage` (filters) and `sessionStorage` (favorites, auth).
pub(crate) fn browser_storage() -> (StorageHandle, StorageHandle) {
    (
        StorageHandle::new(BrowserStore::new(StorageArea::Local)),
        StorageHandle::new(BrowserStore::new(StorageArea::Session)),
    )
}

/// Wall clock backed by `Date.now()`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserClock;

impl Clock for BrowserClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> i64 {
        Date::now() as i64
    }
}
