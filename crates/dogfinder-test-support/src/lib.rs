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
#![allow(clippy::future_not_send)]

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (dog records), mocks.rs (scripted fake API).

pub mod fixtures;
pub mod mocks;
