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

//! Telemetry primitives shared by the dog finder binaries.
//!
//! Logging is the only concern here: a single `init_logging` entry point plus
//! a span guard that tags every event of one CLI invocation.

pub mod context;
pub mod init;

pub use context::CommandSpanGuard;
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, build_sha, init_logging};
