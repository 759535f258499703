#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::future_not_send)]
//! DOM-free state for the dog adoption search app.
//!
//! # Design
//! - Browser storage, wall-clock time and the remote service are ports
//!   (`KeyValueStore`, `Clock`, `DogApi`) so every state machine here runs
//!   natively under test with in-memory substitutes.
//! - Controllers own their persisted slice and write it back after every
//!   mutation; callers never touch storage keys directly.
//! - Pagination for favorites mode is a pure function of
//!   `(mode, results, favorites, filters)`; see [`view::compose_page`].

pub mod api;
pub mod catalog;
pub mod clock;
pub mod favorites;
pub mod matching;
pub mod search;
pub mod session;
pub mod storage;
pub mod view;

pub use api::{ApiError, ApiResult, DogApi};
pub use catalog::Catalog;
pub use clock::{Clock, ManualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
pub use favorites::{Favorites, FavoritesStore};
pub use matching::MatchError;
pub use search::{SearchController, SearchOutcome, SearchTicket};
pub use session::{SessionController, SessionError, SessionPhase, SessionTiming};
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageHandle};
pub use view::{PageView, ViewMode};
