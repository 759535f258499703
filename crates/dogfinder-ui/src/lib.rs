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
//! Dog Finder web front end.
//!
//! The DOM-free pieces (labels, toasts, the yewdux store) compile everywhere
//! and are unit tested natively; the Yew app, browser adapters and HTTP
//! client only build for wasm32.

pub mod logic;
pub mod models;
pub mod store;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod components;
#[cfg(target_arch = "wasm32")]
mod services;

#[cfg(target_arch = "wasm32")]
pub use app::run_app;
