//! Prelude module - commonly used types for convenient import.
//!
//! Use `use herald_events::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use herald_events::prelude::*;
//!
//! # fn main() -> RegistryResult<()> {
//! let registry = EventRegistry::new();
//! registry.register_fn("cache.flushed", "audit", |data: &EventData| {
//!     assert!(data.contains_key("entries"));
//!     Ok(())
//! })?;
//! registry.dispatch("cache.flushed", &EventData::new().with("entries", 12))?;
//! # Ok(())
//! # }
//! ```

// Registry
pub use crate::{EventRegistry, FailurePolicy, RegistryConfig, get_instance};

// Payloads
pub use crate::EventData;

// Subscriber system
pub use crate::{FnSubscriber, NotifyMethod, Subscriber, SubscriberEntry, TeardownMethod};

// Errors
pub use crate::{RegistryError, RegistryResult, SubscriberError, SubscriberResult};
