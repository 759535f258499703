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
#![allow(clippy::redundant_pub_crate, clippy::future_not_send)]

//! Terminal client for the dog adoption search service.
//!
//! Layout:
//! - `cli.rs`: clap definitions and the top-level `run` entrypoint.
//! - `client.rs`: error type and the reqwest-backed `DogApi` adapter.
//! - `state.rs`: JSON state file standing in for browser storage.
//! - `commands/`: one module per command family.
//! - `output.rs`: table and JSON renderers.

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;
pub(crate) mod state;

pub use cli::run;
