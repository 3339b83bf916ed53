//! The event registry: registration, dispatch and unregistration.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::data::EventData;
use crate::error::{RegistryError, RegistryResult, SubscriberResult};
use crate::subscriber::{NotifyFn, Subscriber, SubscriberEntry};

/// What the registry does when a subscriber callback fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failing callback and hand its error to the caller.
    /// Panics unwind into the caller.
    #[default]
    Propagate,
    /// Log failing or panicking callbacks and keep going.
    Isolate,
}

/// Registry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Failure handling for notify and teardown callbacks.
    pub failure_policy: FailurePolicy,
}

impl RegistryConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

/// Synchronous registry mapping event names to ordered subscriber lists.
///
/// Subscribers are notified in registration order. Lists are copy-on-write:
/// dispatch works on the list as it was when the dispatch started and never
/// holds a lock while callbacks run, so callbacks may call back into the
/// registry.
#[derive(Default)]
pub struct EventRegistry {
    events: DashMap<String, Arc<Vec<SubscriberEntry>>>,
    config: RegistryConfig,
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("event_count", &self.events.len())
            .field("config", &self.config)
            .finish()
    }
}

impl EventRegistry {
    /// Create an empty registry with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with the given configuration.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            events: DashMap::new(),
            config,
        }
    }

    /// The configuration this registry was built with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register `subscriber` for `event`.
    ///
    /// `method` selects the notify capability (see [`SubscriberEntry::bind`]).
    /// Registering the same subscriber twice yields two entries.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::InvalidEventName`] if `event` is empty.
    /// - [`RegistryError::MissingCapability`] if `method` cannot be resolved;
    ///   nothing is registered in that case.
    pub fn register<S: Subscriber>(
        &self,
        event: &str,
        subscriber: Arc<S>,
        method: Option<&str>,
    ) -> RegistryResult<()> {
        validate_event_name(event)?;
        let entry = SubscriberEntry::bind(subscriber, method)?;
        self.register_entry(event, entry)
    }

    /// Register a bare notify closure for `event`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidEventName`] if `event` is empty.
    pub fn register_fn<F>(&self, event: &str, name: impl Into<String>, notify: F) -> RegistryResult<()>
    where
        F: Fn(&EventData) -> SubscriberResult + Send + Sync + 'static,
    {
        self.register_entry(event, SubscriberEntry::new(name, notify))
    }

    /// Append a prebuilt entry to the list for `event`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidEventName`] if `event` is empty.
    pub fn register_entry(&self, event: &str, entry: SubscriberEntry) -> RegistryResult<()> {
        validate_event_name(event)?;

        debug!(
            event,
            subscriber_name = %entry.name(),
            has_teardown = entry.has_teardown(),
            "Subscriber registered"
        );

        let mut list = self.events.entry(event.to_owned()).or_default();
        Arc::make_mut(list.value_mut()).push(entry);
        Ok(())
    }

    /// Notify every subscriber of `event`, in registration order.
    ///
    /// Unknown events are a no-op.
    ///
    /// # Errors
    ///
    /// With [`FailurePolicy::Propagate`], returns
    /// [`RegistryError::SubscriberFailed`] for the first failing callback;
    /// later subscribers are not notified.
    pub fn dispatch(&self, event: &str, data: &EventData) -> RegistryResult<()> {
        let Some(snapshot) = self.snapshot(event) else {
            trace!(event, "No subscribers for event");
            return Ok(());
        };

        for entry in snapshot.iter() {
            trace!(event, subscriber_name = %entry.name(), "Notifying subscriber");

            match self.config.failure_policy {
                FailurePolicy::Propagate => {
                    entry
                        .notify(data)
                        .map_err(|source| RegistryError::SubscriberFailed {
                            event: event.to_owned(),
                            subscriber: entry.name().to_owned(),
                            source,
                        })?;
                },
                FailurePolicy::Isolate => {
                    run_isolated(event, entry.name(), "notify", || entry.notify(data));
                },
            }
        }

        Ok(())
    }

    /// Run the teardown of every subscriber of `event` in registration
    /// order, then remove the event.
    ///
    /// The event stays registered while teardowns run, so they can still
    /// look it up. Subscribers registered by a teardown (or concurrently)
    /// survive the removal. Unknown events are a no-op.
    ///
    /// # Errors
    ///
    /// With [`FailurePolicy::Propagate`], returns
    /// [`RegistryError::TeardownFailed`] for the first failing teardown. The
    /// remaining teardowns are skipped and the event keeps all of its
    /// subscribers, so `unregister` can be retried.
    pub fn unregister(&self, event: &str) -> RegistryResult<()> {
        let Some(snapshot) = self.snapshot(event) else {
            trace!(event, "Unregister of unknown event ignored");
            return Ok(());
        };

        for entry in snapshot.iter().filter(|entry| entry.has_teardown()) {
            match self.config.failure_policy {
                FailurePolicy::Propagate => {
                    if let Some(Err(source)) = entry.teardown() {
                        warn!(
                            event,
                            subscriber_name = %entry.name(),
                            "Teardown failed, event left registered"
                        );
                        return Err(RegistryError::TeardownFailed {
                            event: event.to_owned(),
                            subscriber: entry.name().to_owned(),
                            source,
                        });
                    }
                },
                FailurePolicy::Isolate => {
                    run_isolated(event, entry.name(), "teardown", || {
                        entry.teardown().unwrap_or(Ok(()))
                    });
                },
            }
        }

        self.detach(event, &snapshot);
        debug!(event, subscriber_count = snapshot.len(), "Event unregistered");
        Ok(())
    }

    /// Notify callbacks currently registered for `event`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if nothing is registered for
    /// `event`.
    pub fn get_subscribers(&self, event: &str) -> RegistryResult<Vec<NotifyFn>> {
        self.snapshot(event)
            .map(|list| list.iter().map(SubscriberEntry::notify_fn).collect())
            .ok_or_else(|| RegistryError::NotFound {
                event: event.to_owned(),
            })
    }

    /// Names of the subscribers registered for `event`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] if nothing is registered for
    /// `event`.
    pub fn subscriber_names(&self, event: &str) -> RegistryResult<Vec<String>> {
        self.snapshot(event)
            .map(|list| list.iter().map(|entry| entry.name().to_owned()).collect())
            .ok_or_else(|| RegistryError::NotFound {
                event: event.to_owned(),
            })
    }

    /// Whether `event` has subscribers.
    #[must_use]
    pub fn contains(&self, event: &str) -> bool {
        self.events.contains_key(event)
    }

    /// Number of subscribers for `event` (0 when unknown).
    #[must_use]
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.events.get(event).map_or(0, |list| list.len())
    }

    /// Names of all events with subscribers, sorted.
    #[must_use]
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.events.iter().map(|e| e.key().clone()).collect();
        names.sort_unstable();
        names
    }

    /// Number of events with subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no event has subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn snapshot(&self, event: &str) -> Option<Arc<Vec<SubscriberEntry>>> {
        self.events.get(event).map(|list| Arc::clone(list.value()))
    }

    /// Drop the torn-down entries of `event`, keeping any added since
    /// `torn_down` was taken.
    fn detach(&self, event: &str, torn_down: &Arc<Vec<SubscriberEntry>>) {
        if self
            .events
            .remove_if(event, |_, list| Arc::ptr_eq(list, torn_down))
            .is_some()
        {
            return;
        }

        if let Some(mut list) = self.events.get_mut(event) {
            Arc::make_mut(list.value_mut())
                .retain(|entry| !torn_down.iter().any(|old| entry.same_as(old)));
        }
        self.events.remove_if(event, |_, list| list.is_empty());
    }
}

fn validate_event_name(event: &str) -> RegistryResult<()> {
    if event.is_empty() {
        return Err(RegistryError::InvalidEventName);
    }
    Ok(())
}

fn run_isolated<F>(event: &str, subscriber: &str, stage: &'static str, call: F)
where
    F: FnOnce() -> SubscriberResult,
{
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => {},
        Ok(Err(error)) => {
            warn!(
                event,
                subscriber_name = subscriber,
                stage,
                error = %error,
                "Subscriber failed"
            );
        },
        Err(payload) => {
            warn!(
                event,
                subscriber_name = subscriber,
                stage,
                panic = panic_message(payload.as_ref()),
                "Subscriber panicked"
            );
        },
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
