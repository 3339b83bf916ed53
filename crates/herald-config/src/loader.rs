//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge `~/.herald/config.toml` (user), if present
//! 3. Merge the explicit config file, if one was given (must exist)
//! 4. Apply `HERALD_*` env var fallbacks for fields no file set
//! 5. Deserialize merged tree → `Config`
//! 6. Validate
//! 7. Return `ResolvedConfig`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_leaves};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// A loaded configuration together with where each field came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final configuration.
    pub config: Config,
    /// Layer that set each leaf field.
    pub field_sources: FieldSources,
    /// Config files that were merged, in merge order.
    pub loaded_files: Vec<String>,
}

impl ResolvedConfig {
    /// The layer that set `field` (dotted path, e.g. `"logging.level"`).
    #[must_use]
    pub fn source_of(&self, field: &str) -> Option<&ConfigLayer> {
        self.field_sources.get(field)
    }
}

/// Load the configuration with layered file precedence.
///
/// `explicit` is an additional config file that must exist (e.g. passed on
/// a command line). `herald_home_override` replaces the `~/.herald`
/// directory used for user-level config discovery.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed, an explicit
/// file cannot be read, or the merged configuration fails validation.
pub fn load(
    explicit: Option<&Path>,
    herald_home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    load_with_env(explicit, herald_home_override, &collect_env_vars())
}

/// Same as [`load`], with the environment supplied by the caller.
///
/// # Errors
///
/// See [`load`].
pub fn load_with_env<S: ::std::hash::BuildHasher>(
    explicit: Option<&Path>,
    herald_home_override: Option<&Path>,
    env_vars: &HashMap<String, String, S>,
) -> ConfigResult<ResolvedConfig> {
    // 1. Parse embedded defaults.
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::Parse {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", &ConfigLayer::Defaults, &mut field_sources);

    // 2. User config.
    let herald_home = match herald_home_override {
        Some(home) => home.to_path_buf(),
        None => home_directory()?.join(".herald"),
    };
    let user_path = herald_home.join("config.toml");
    if let Some(overlay) = try_load_file(&user_path)? {
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::User,
            &mut field_sources,
        );
        loaded_files.push(user_path.display().to_string());
        info!(path = %user_path.display(), "loaded user config");
    }

    // 3. Explicit config.
    if let Some(path) = explicit {
        let overlay = read_toml(path)?;
        let layer = ConfigLayer::Explicit(path.display().to_string());
        deep_merge_tracking(&mut merged, &overlay, "", &layer, &mut field_sources);
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), "loaded config file");
    }

    // 4. Env var fallbacks.
    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    // 5. Deserialize.
    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::Parse {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 6. Validate.
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load a config from a specific file path (no layering).
///
/// Fields absent from the file take their [`Default`] values.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed or
/// validated.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let config: Config = read_toml(path)?
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate::validate(&config)?;
    Ok(config)
}

/// Try to load a file, returning `None` if the file doesn't exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    match read_toml(path) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::Read { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            debug!(path = %path.display(), "config file not found, skipping");
            Ok(None)
        },
        Err(e) => Err(e),
    }
}

/// Read and parse a TOML file with a size cap.
///
/// The size is checked after a single read so there is no window between a
/// stat and the read.
fn read_toml(path: &Path) -> ConfigResult<toml::Value> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        source: e,
    })?;

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })
}

fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHome)
}
