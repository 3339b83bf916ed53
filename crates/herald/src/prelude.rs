//! Unified prelude for Herald.
//!
//! Brings the commonly used types of every Herald crate into scope with
//! `use herald::prelude::*;`. For a single crate, use its own prelude
//! (`herald_events::prelude`).

// Startup
pub use crate::{BootstrapOptions, bootstrap, build_registry};

// Events
pub use herald_events::prelude::*;

// Configuration
pub use herald_config::{Config, ConfigError, ResolvedConfig};

// Telemetry
pub use herald_telemetry::{LogConfig, LogFormat, LogOutput, setup_logging};
