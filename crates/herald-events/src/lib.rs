//! Herald Events - synchronous in-process event registry.
//!
//! This crate provides:
//! - [`EventRegistry`], mapping event names to ordered subscriber lists
//! - The [`Subscriber`] trait and closure-backed [`FnSubscriber`]
//! - [`EventData`] payloads forwarded unchanged to every subscriber
//! - An optional process-wide registry ([`get_instance`])
//!
//! # Semantics
//!
//! - Subscribers are notified synchronously, in registration order.
//! - Dispatching or unregistering an event nobody listens to is a no-op.
//! - Asking who listens to an unknown event
//!   ([`EventRegistry::get_subscribers`]) is an error.
//! - Unregistering removes every subscriber of the event at once, running
//!   each one's teardown.
//! - Callback failures reach the caller unless the registry is configured
//!   with [`FailurePolicy::Isolate`].
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use herald_events::{EventData, EventRegistry, Subscriber, SubscriberResult};
//!
//! struct Announcer;
//!
//! impl Subscriber for Announcer {
//!     fn run(&self, data: &EventData) -> SubscriberResult {
//!         assert_eq!(data.get_str("status"), Some("ok"));
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<(), herald_events::RegistryError> {
//! let registry = EventRegistry::new();
//! registry.register("build.done", Arc::new(Announcer), None)?;
//! registry.dispatch("build.done", &EventData::new().with("status", "ok"))?;
//! registry.unregister("build.done")?;
//! assert!(registry.get_subscribers("build.done").is_err());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod data;
mod error;
mod global;
mod registry;
mod subscriber;

pub use data::EventData;
pub use error::{RegistryError, RegistryResult, SubscriberError, SubscriberResult};
pub use global::get_instance;
pub use registry::{EventRegistry, FailurePolicy, RegistryConfig};
pub use subscriber::{
    DEFAULT_METHOD, FnSubscriber, NotifyFn, NotifyMethod, Subscriber, SubscriberEntry, TeardownFn,
    TeardownMethod,
};
