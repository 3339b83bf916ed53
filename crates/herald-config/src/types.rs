//! Configuration types for Herald.
//!
//! These types have no dependency on the other herald crates. The
//! composition root converts them into domain types (`RegistryConfig`,
//! `LogConfig`). Every struct implements [`Default`] so that a bare
//! `[section]` header in TOML produces a working configuration.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event registry behaviour.
    pub registry: RegistrySection,
    /// Logging level, format, and per-crate directives.
    pub logging: LoggingSection,
}

// ---------------------------------------------------------------------------
// RegistrySection
// ---------------------------------------------------------------------------

/// Event registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySection {
    /// `"propagate"` (first subscriber failure aborts dispatch and is
    /// returned) or `"isolate"` (failures are logged, delivery continues).
    pub failure_policy: String,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            failure_policy: "propagate".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging and tracing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"` (human-friendly), `"compact"` (one-line),
    /// `"json"` (structured), or `"full"` (verbose).
    pub format: String,
    /// Per-crate tracing directives (e.g. `["herald_events=trace"]`).
    pub directives: Vec<String>,
    /// Destination: `"stderr"`, `"stdout"`, or `"file"` (daily files in
    /// `directory`).
    pub output: String,
    /// Log directory, required when `output = "file"`.
    pub directory: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
            directives: Vec::new(),
            output: "stderr".to_owned(),
            directory: String::new(),
        }
    }
}
