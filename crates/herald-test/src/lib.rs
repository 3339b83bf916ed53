//! Herald Test - Shared test utilities for Herald.
//!
//! This crate provides recording and failing subscribers plus payload
//! fixtures that can be used across Herald crates as a dev-dependency.
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! herald-test.workspace = true
//! ```
//!
//! Then use in your tests:
//!
//! ```rust
//! use std::sync::Arc;
//! use herald_events::EventRegistry;
//! use herald_test::{CallLog, RecordingSubscriber, build_done_payload};
//!
//! let log = CallLog::new();
//! let registry = EventRegistry::new();
//! registry
//!     .register("build.done", Arc::new(RecordingSubscriber::new("a", &log)), None)
//!     .unwrap();
//!
//! registry.dispatch("build.done", &build_done_payload()).unwrap();
//! assert_eq!(log.entries(), vec!["a:run"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;

/// Install a test-friendly tracing subscriber.
///
/// Output goes through the test harness writer so it is only shown for
/// failing tests. Safe to call from every test; only the first call installs.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
