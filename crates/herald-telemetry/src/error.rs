//! Logging setup failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why logging could not be set up.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The level or a directive is not valid `EnvFilter` syntax.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// The offending level or directive.
        directive: String,
        /// Parser message.
        message: String,
    },

    /// The format name is not one of `pretty`, `compact`, `json`, `full`.
    #[error("unknown log format '{0}'; expected pretty, compact, json or full")]
    UnknownFormat(String),

    /// The log directory does not exist and could not be created.
    #[error("cannot create log directory {}: {source}", path.display())]
    LogDirectory {
        /// Directory that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Another global `tracing` subscriber is already in place.
    #[error("global tracing subscriber already installed: {0}")]
    AlreadyInstalled(String),
}

/// Result type for logging setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
