//! Process-wide default registry.
//!
//! Components that are wired together explicitly should share an
//! `Arc<EventRegistry>` instead. The global instance exists for code that
//! cannot be handed one.

use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::registry::{EventRegistry, RegistryConfig};

static INSTANCE: OnceLock<Arc<EventRegistry>> = OnceLock::new();

impl EventRegistry {
    /// The process-wide registry, created with the default configuration on
    /// first access.
    ///
    /// Every call returns the same instance.
    #[must_use]
    pub fn get_instance() -> Arc<EventRegistry> {
        Arc::clone(INSTANCE.get_or_init(|| {
            debug!("Creating process-wide event registry");
            Arc::new(EventRegistry::new())
        }))
    }

    /// Create the process-wide registry with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Instantiation`] if the process-wide registry
    /// already exists, whether it was installed or lazily created by
    /// [`EventRegistry::get_instance`]. The existing instance is left
    /// untouched.
    pub fn install(config: RegistryConfig) -> RegistryResult<Arc<EventRegistry>> {
        let mut created = false;
        let instance = INSTANCE.get_or_init(|| {
            created = true;
            debug!(failure_policy = ?config.failure_policy, "Installing process-wide event registry");
            Arc::new(EventRegistry::with_config(config))
        });

        if created {
            Ok(Arc::clone(instance))
        } else {
            Err(RegistryError::Instantiation)
        }
    }
}

/// Shorthand for [`EventRegistry::get_instance`].
#[must_use]
pub fn get_instance() -> Arc<EventRegistry> {
    EventRegistry::get_instance()
}
