#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
//! Layered configuration for Herald.
//!
//! # Usage
//!
//! ```rust,no_run
//! use herald_config::Config;
//!
//! // defaults → ~/.herald/config.toml → explicit file → HERALD_* fallbacks
//! let resolved = Config::load(Some(std::path::Path::new("herald.toml"))).unwrap();
//! println!("failure policy: {}", resolved.config.registry.failure_policy);
//! ```
//!
//! # Configuration Precedence
//!
//! From highest to lowest priority:
//!
//! 1. **Explicit file** passed by the caller
//! 2. **User** (`~/.herald/config.toml`)
//! 3. **Environment variables** (`HERALD_*`), fallback only
//! 4. **Embedded defaults** (`defaults.toml` compiled into binary)
//!
//! This crate has no dependencies on other herald crates. Conversion into
//! registry and logging types happens in the `herald` composition root.

/// Environment variable fallback resolution.
pub mod env;
/// Configuration error types.
pub mod error;
/// Configuration file discovery and loading.
pub mod loader;
/// Layered configuration merging with source tracking.
pub mod merge;
/// Configuration struct definitions.
pub mod types;
/// Configuration validation rules.
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::ResolvedConfig;
pub use merge::ConfigLayer;
pub use types::*;

impl Config {
    /// Load configuration with full precedence chain.
    ///
    /// See [`loader::load`] for the full algorithm.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load(explicit: Option<&std::path::Path>) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, None)
    }

    /// Load configuration with an explicit herald home directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any config file is malformed or the final
    /// configuration fails validation.
    pub fn load_with_home(
        explicit: Option<&std::path::Path>,
        herald_home: &std::path::Path,
    ) -> ConfigResult<ResolvedConfig> {
        loader::load(explicit, Some(herald_home))
    }
}
