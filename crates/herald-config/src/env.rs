//! Environment variable fallbacks.
//!
//! Env vars are **fallback**, not override: they are only applied to fields
//! that no config file set.

use std::collections::HashMap;

use tracing::debug;

use crate::merge::{ConfigLayer, FieldSources};

/// Prefix shared by every supported variable.
pub const ENV_PREFIX: &str = "HERALD_";

/// Mapping from environment variable name to config field path.
struct EnvMapping {
    var_name: &'static str,
    field_path: &'static str,
}

const ENV_MAPPINGS: &[EnvMapping] = &[
    EnvMapping {
        var_name: "HERALD_FAILURE_POLICY",
        field_path: "registry.failure_policy",
    },
    EnvMapping {
        var_name: "HERALD_LOG_LEVEL",
        field_path: "logging.level",
    },
    EnvMapping {
        var_name: "HERALD_LOG_FORMAT",
        field_path: "logging.format",
    },
    EnvMapping {
        var_name: "HERALD_LOG_OUTPUT",
        field_path: "logging.output",
    },
    EnvMapping {
        var_name: "HERALD_LOG_DIR",
        field_path: "logging.directory",
    },
];

/// Snapshot the `HERALD_*` variables of the current process.
#[must_use]
pub fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .collect()
}

/// Apply environment variable fallbacks to fields that were **not** set by
/// any config file layer.
///
/// Returns the number of env vars applied.
pub fn apply_env_fallbacks<S: ::std::hash::BuildHasher>(
    merged: &mut toml::Value,
    sources: &mut FieldSources,
    env_vars: &HashMap<String, String, S>,
) -> usize {
    let mut count: usize = 0;

    for mapping in ENV_MAPPINGS {
        if sources
            .get(mapping.field_path)
            .is_some_and(|layer| *layer != ConfigLayer::Defaults)
        {
            continue;
        }

        if let Some(val) = env_vars.get(mapping.var_name) {
            debug!(
                var = mapping.var_name,
                field = mapping.field_path,
                "applying env var fallback"
            );

            set_string_field(merged, mapping.field_path, val);
            sources.insert(mapping.field_path.to_owned(), ConfigLayer::Environment);
            count = count.saturating_add(1);
        }
    }

    count
}

/// Set a dotted `section.key` string field, creating the section if needed.
fn set_string_field(root: &mut toml::Value, path: &str, val: &str) {
    let Some((section, key)) = path.split_once('.') else {
        return;
    };
    let Some(root_table) = root.as_table_mut() else {
        return;
    };

    let section = root_table
        .entry(section.to_owned())
        .or_insert(toml::Value::Table(toml::map::Map::new()));

    if let Some(table) = section.as_table_mut() {
        table.insert(key.to_owned(), toml::Value::String(val.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> (toml::Value, FieldSources) {
        let merged: toml::Value =
            toml::from_str("[logging]\nlevel = \"info\"\nformat = \"pretty\"\n").unwrap();
        let mut sources = FieldSources::new();
        sources.insert("logging.level".into(), ConfigLayer::Defaults);
        sources.insert("logging.format".into(), ConfigLayer::Defaults);
        (merged, sources)
    }

    #[test]
    fn test_env_applies_over_defaults() {
        let (mut merged, mut sources) = defaults();
        let env = HashMap::from([("HERALD_LOG_LEVEL".to_owned(), "trace".to_owned())]);

        let applied = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(applied, 1);
        assert_eq!(merged["logging"]["level"].as_str(), Some("trace"));
        assert_eq!(
            sources.get("logging.level"),
            Some(&ConfigLayer::Environment)
        );
    }

    #[test]
    fn test_env_does_not_override_files() {
        let (mut merged, mut sources) = defaults();
        sources.insert("logging.level".into(), ConfigLayer::User);
        let env = HashMap::from([("HERALD_LOG_LEVEL".to_owned(), "trace".to_owned())]);

        let applied = apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(applied, 0);
        assert_eq!(merged["logging"]["level"].as_str(), Some("info"));
    }

    #[test]
    fn test_env_fills_field_absent_from_defaults() {
        let (mut merged, mut sources) = defaults();
        let env = HashMap::from([
            ("HERALD_LOG_OUTPUT".to_owned(), "file".to_owned()),
            ("HERALD_LOG_DIR".to_owned(), "/var/log/herald".to_owned()),
        ]);

        assert_eq!(apply_env_fallbacks(&mut merged, &mut sources, &env), 2);
        assert_eq!(merged["logging"]["output"].as_str(), Some("file"));
        assert_eq!(
            merged["logging"]["directory"].as_str(),
            Some("/var/log/herald")
        );
    }

    #[test]
    fn test_env_creates_missing_section() {
        let (mut merged, mut sources) = defaults();
        let env = HashMap::from([("HERALD_FAILURE_POLICY".to_owned(), "isolate".to_owned())]);

        apply_env_fallbacks(&mut merged, &mut sources, &env);

        assert_eq!(
            merged["registry"]["failure_policy"].as_str(),
            Some("isolate")
        );
    }
}
