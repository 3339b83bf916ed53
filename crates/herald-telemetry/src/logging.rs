//! `tracing` subscriber setup driven by [`LogConfig`].

use std::path::PathBuf;
use std::str::FromStr;

use tracing_appender::rolling;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, fmt::writer::BoxMakeWriter, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::error::{TelemetryError, TelemetryResult};

/// File name prefix of daily log files (`herald.log.2026-10-16`).
pub const LOG_FILE_PREFIX: &str = "herald.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Line format of emitted events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored, for humans.
    #[default]
    Pretty,
    /// One line per event.
    Compact,
    /// One JSON object per event.
    Json,
    /// The `tracing-subscriber` default format.
    Full,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            "full" => Ok(Self::Full),
            other => Err(TelemetryError::UnknownFormat(other.to_owned())),
        }
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogOutput {
    /// Standard output.
    Stdout,
    /// Standard error.
    #[default]
    Stderr,
    /// Daily files named [`LOG_FILE_PREFIX`]`.<date>` in this directory.
    Directory(PathBuf),
}

impl LogOutput {
    fn is_terminal(&self) -> bool {
        !matches!(self, Self::Directory(_))
    }
}

/// Logging setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Base filter, e.g. `"info"`.
    pub level: String,
    /// Line format.
    pub format: LogFormat,
    /// Destination.
    pub output: LogOutput,
    /// Extra `target=level` directives layered on top of `level`.
    pub directives: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogConfig {
    /// Pretty output to stderr at `level`.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            output: LogOutput::default(),
            directives: Vec::new(),
        }
    }

    /// Set the line format.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the destination.
    #[must_use]
    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Add one directive.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Add several directives.
    #[must_use]
    pub fn with_directives<I, S>(mut self, directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directives.extend(directives.into_iter().map(Into::into));
        self
    }

    fn filter(&self) -> TelemetryResult<EnvFilter> {
        let invalid = |directive: &str, e: &dyn std::error::Error| TelemetryError::InvalidFilter {
            directive: directive.to_owned(),
            message: e.to_string(),
        };

        let mut filter = EnvFilter::try_new(&self.level).map_err(|e| invalid(&self.level, &e))?;
        for directive in &self.directives {
            let parsed = directive.parse().map_err(
                |e: tracing_subscriber::filter::ParseError| invalid(directive, &e),
            )?;
            filter = filter.add_directive(parsed);
        }
        Ok(filter)
    }

    fn writer(&self) -> TelemetryResult<BoxMakeWriter> {
        match &self.output {
            LogOutput::Stdout => Ok(BoxMakeWriter::new(std::io::stdout)),
            LogOutput::Stderr => Ok(BoxMakeWriter::new(std::io::stderr)),
            LogOutput::Directory(dir) => {
                std::fs::create_dir_all(dir).map_err(|source| TelemetryError::LogDirectory {
                    path: dir.clone(),
                    source,
                })?;
                Ok(BoxMakeWriter::new(rolling::daily(dir, LOG_FILE_PREFIX)))
            },
        }
    }

    fn layer(&self) -> TelemetryResult<BoxedLayer> {
        let base = fmt::layer()
            .with_writer(self.writer()?)
            .with_ansi(self.output.is_terminal());

        Ok(match self.format {
            LogFormat::Pretty => base.pretty().boxed(),
            LogFormat::Compact => base.compact().boxed(),
            LogFormat::Json => base.json().boxed(),
            LogFormat::Full => base.boxed(),
        })
    }
}

/// Install the global `tracing` subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for a bad level or directive,
/// [`TelemetryError::LogDirectory`] if the log directory cannot be created,
/// and [`TelemetryError::AlreadyInstalled`] if a global subscriber exists.
pub fn setup_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.filter()?;
    let layer = config.layer()?.with_filter(filter);

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInstalled(e.to_string()))
}

/// [`setup_logging`] with [`LogConfig::default`].
///
/// # Errors
///
/// See [`setup_logging`].
pub fn setup_default_logging() -> TelemetryResult<()> {
    setup_logging(&LogConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.output, LogOutput::Stderr);
        assert!(config.directives.is_empty());
    }

    #[test]
    fn test_builder() {
        let config = LogConfig::new("debug")
            .with_format(LogFormat::Json)
            .with_output(LogOutput::Stdout)
            .with_directive("herald_events=trace")
            .with_directives(["herald_config=warn"]);

        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stdout);
        assert_eq!(
            config.directives,
            vec!["herald_events=trace", "herald_config=warn"]
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("compact".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("full".parse::<LogFormat>().unwrap(), LogFormat::Full);

        let err = "xml".parse::<LogFormat>().unwrap_err();
        assert!(matches!(err, TelemetryError::UnknownFormat(ref f) if f == "xml"));
    }

    #[test]
    fn test_filter_accepts_directives() {
        let config = LogConfig::new("warn").with_directive("herald_events=trace");
        assert!(config.filter().is_ok());
    }

    #[test]
    fn test_filter_names_bad_directive() {
        let config = LogConfig::new("warn").with_directive("[unclosed=trace");
        match config.filter().unwrap_err() {
            TelemetryError::InvalidFilter { directive, .. } => {
                assert_eq!(directive, "[unclosed=trace");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_directory_output_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("a").join("logs");
        let config = LogConfig::default().with_output(LogOutput::Directory(logs.clone()));

        assert!(config.layer().is_ok());
        assert!(logs.is_dir());
        assert!(!config.output.is_terminal());
    }

    #[test]
    fn test_directory_output_blocked_by_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, "not a directory").unwrap();

        let config = LogConfig::default().with_output(LogOutput::Directory(blocker.join("x")));
        assert!(matches!(
            config.writer(),
            Err(TelemetryError::LogDirectory { .. })
        ));
    }

    #[test]
    fn test_second_install_is_refused() {
        // The only test in this crate that installs a global subscriber.
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig::new("warn")
            .with_format(LogFormat::Compact)
            .with_output(LogOutput::Directory(dir.path().to_path_buf()));

        setup_logging(&config).unwrap();
        assert!(matches!(
            setup_logging(&config),
            Err(TelemetryError::AlreadyInstalled(_))
        ));
    }
}
