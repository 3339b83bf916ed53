//! Composition root: configuration in, ready registry out.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use herald_config::{Config, LoggingSection, RegistrySection, ResolvedConfig};
use herald_events::{EventRegistry, FailurePolicy, RegistryConfig};
use herald_telemetry::{LogConfig, LogFormat, LogOutput, setup_logging};
use serde::Deserialize;
use serde::de::IntoDeserializer;
use serde::de::value::{Error as ValueError, StrDeserializer};
use tracing::{debug, info};

/// Inputs to [`bootstrap`].
#[derive(Debug, Clone, Default)]
pub struct BootstrapOptions {
    /// Explicit config file; it must exist when set.
    pub config_path: Option<PathBuf>,
    /// Herald home directory, replacing `~/.herald`.
    pub home: Option<PathBuf>,
    /// Whether to install the global tracing subscriber.
    pub init_logging: bool,
}

impl BootstrapOptions {
    /// Options that load the user config and leave logging alone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load this config file on top of the user config.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Use `home` instead of `~/.herald`.
    #[must_use]
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Install the global tracing subscriber from the `[logging]` section.
    #[must_use]
    pub fn with_logging(mut self) -> Self {
        self.init_logging = true;
        self
    }

    fn load(&self) -> anyhow::Result<ResolvedConfig> {
        let explicit = self.config_path.as_deref();
        let resolved = match self.home.as_deref() {
            Some(home) => Config::load_with_home(explicit, home),
            None => Config::load(explicit),
        };
        resolved.context("failed to load herald configuration")
    }
}

/// Map the `[registry]` section onto a [`RegistryConfig`].
///
/// The policy name is read with [`FailurePolicy`]'s own serde names.
///
/// # Errors
///
/// Returns an error for an unknown failure policy.
pub fn registry_config(section: &RegistrySection) -> anyhow::Result<RegistryConfig> {
    let name: StrDeserializer<'_, ValueError> = section.failure_policy.as_str().into_deserializer();
    let policy = FailurePolicy::deserialize(name).with_context(|| {
        format!(
            "invalid registry.failure_policy '{}'",
            section.failure_policy
        )
    })?;
    Ok(RegistryConfig::new().with_failure_policy(policy))
}

/// Map the `[logging]` section onto a [`LogConfig`].
///
/// # Errors
///
/// Returns an error for an unknown format or output, or file output
/// without a directory.
pub fn log_config(section: &LoggingSection) -> anyhow::Result<LogConfig> {
    let format: LogFormat = section
        .format
        .parse()
        .with_context(|| format!("invalid logging.format '{}'", section.format))?;

    let output = match section.output.as_str() {
        "stderr" => LogOutput::Stderr,
        "stdout" => LogOutput::Stdout,
        "file" if section.directory.trim().is_empty() => {
            bail!("logging.output = \"file\" needs logging.directory")
        },
        "file" => LogOutput::Directory(PathBuf::from(&section.directory)),
        other => bail!("invalid logging.output '{other}'"),
    };

    Ok(LogConfig::new(&section.level)
        .with_format(format)
        .with_output(output)
        .with_directives(section.directives.iter().cloned()))
}

/// Build a standalone registry from configuration without touching the
/// process-wide instance.
///
/// # Errors
///
/// Returns an error if configuration fails to load or convert.
pub fn build_registry(options: &BootstrapOptions) -> anyhow::Result<EventRegistry> {
    let resolved = options.load()?;
    log_loaded(&resolved);
    Ok(EventRegistry::with_config(registry_config(
        &resolved.config.registry,
    )?))
}

/// Load configuration, optionally set up logging, and install the
/// process-wide registry.
///
/// # Errors
///
/// Returns an error if configuration fails to load or validate, logging
/// cannot be initialized, or the process-wide registry already exists.
pub fn bootstrap(options: &BootstrapOptions) -> anyhow::Result<Arc<EventRegistry>> {
    let resolved = options.load()?;

    if options.init_logging {
        let logging = log_config(&resolved.config.logging)?;
        setup_logging(&logging).context("failed to initialize logging")?;
    }
    log_loaded(&resolved);

    let config = registry_config(&resolved.config.registry)?;
    let registry = EventRegistry::install(config)
        .context("process-wide event registry was already created")?;

    info!(
        failure_policy = ?registry.config().failure_policy,
        "Event registry ready"
    );
    Ok(registry)
}

fn log_loaded(resolved: &ResolvedConfig) {
    for path in &resolved.loaded_files {
        debug!(%path, "Loaded config file");
    }
    if let Some(layer) = resolved.source_of("registry.failure_policy") {
        debug!(%layer, "registry.failure_policy resolved");
    }
}
