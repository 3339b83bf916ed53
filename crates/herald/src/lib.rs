//! Herald - synchronous in-process event registry.
//!
//! This crate ties the Herald crates together:
//! - [`herald_events`]: the registry, subscribers and payloads
//! - [`herald_config`]: layered TOML configuration
//! - [`herald_telemetry`]: `tracing` setup
//!
//! Most programs call [`bootstrap`] once at startup and then share the
//! returned registry (or reach it through [`get_instance`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use herald::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let registry = herald::bootstrap(&BootstrapOptions::new().with_logging())?;
//!
//!     registry.register_fn("build.done", "notifier", |data: &EventData| {
//!         tracing::info!(status = ?data.get_str("status"), "build finished");
//!         Ok(())
//!     })?;
//!     registry.dispatch("build.done", &EventData::new().with("status", "ok"))?;
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod bootstrap;

pub use bootstrap::{BootstrapOptions, bootstrap, build_registry, log_config, registry_config};

pub use herald_config as config;
pub use herald_events as events;
pub use herald_telemetry as telemetry;

pub use herald_events::get_instance;
