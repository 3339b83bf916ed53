//! Errors raised while loading configuration.

use std::io;

use thiserror::Error;

/// Why the configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists (or was named explicitly) but could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        /// File that was being read.
        path: String,
        /// I/O failure.
        #[source]
        source: io::Error,
    },

    /// A config file, the embedded defaults, or the merged result is not
    /// valid TOML for [`Config`](crate::Config).
    #[error("{path} is not a valid herald config: {source}")]
    Parse {
        /// File name, or `<embedded defaults>` / `<merged config>`.
        path: String,
        /// TOML decoder error.
        #[source]
        source: toml::de::Error,
    },

    /// A value parsed but is not acceptable.
    #[error("{field}: {message}")]
    Invalid {
        /// Dotted field path such as `logging.level`, or a file path for
        /// size violations.
        field: String,
        /// What is wrong with it.
        message: String,
    },

    /// No home directory to look for `~/.herald/config.toml` in.
    #[error("no home directory; pass an explicit herald home")]
    NoHome,
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
