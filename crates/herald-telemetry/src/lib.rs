//! Herald Telemetry - logging setup for Herald.
//!
//! This crate provides:
//! - [`LogConfig`]: level, directives, [`LogFormat`] and [`LogOutput`]
//! - [`setup_logging`], installing the global `tracing` subscriber
//! - Daily log files through `tracing-appender`
//!
//! # Example
//!
//! ```rust,no_run
//! use herald_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), herald_telemetry::TelemetryError> {
//! let config = LogConfig::new("info")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("herald_events=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    LOG_FILE_PREFIX, LogConfig, LogFormat, LogOutput, setup_default_logging, setup_logging,
};
