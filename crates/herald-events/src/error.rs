//! Error types for the event registry and its subscribers.

use thiserror::Error;

/// Errors returned by [`EventRegistry`](crate::EventRegistry) operations.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The process-wide registry already exists.
    #[error("event registry is a singleton and has already been instantiated")]
    Instantiation,

    /// The requested notify capability is not exposed by the subscriber.
    #[error("subscriber `{subscriber}` has no capability named `{method}`")]
    MissingCapability {
        /// Name of the subscriber being registered.
        subscriber: String,
        /// The capability that could not be resolved.
        method: String,
    },

    /// No subscribers are registered for the event.
    #[error("no subscribers registered for event `{event}`")]
    NotFound {
        /// The event that was queried.
        event: String,
    },

    /// Event names must be non-empty.
    #[error("event name must not be empty")]
    InvalidEventName,

    /// A notify callback failed during dispatch.
    #[error("subscriber `{subscriber}` failed while handling `{event}`: {source}")]
    SubscriberFailed {
        /// The event being dispatched.
        event: String,
        /// Name of the failing subscriber.
        subscriber: String,
        /// The error returned by the callback.
        #[source]
        source: SubscriberError,
    },

    /// A teardown callback failed during unregister.
    #[error("teardown of subscriber `{subscriber}` failed for `{event}`: {source}")]
    TeardownFailed {
        /// The event being unregistered.
        event: String,
        /// Name of the failing subscriber.
        subscriber: String,
        /// The error returned by the callback.
        #[source]
        source: SubscriberError,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use herald_events::RegistryError;
    ///
    /// let err = RegistryError::NotFound { event: "build.done".into() };
    /// assert_eq!(err.as_label(), "registry_not_found");
    /// ```
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Instantiation => "registry_instantiation",
            Self::MissingCapability { .. } => "registry_missing_capability",
            Self::NotFound { .. } => "registry_not_found",
            Self::InvalidEventName => "registry_invalid_event_name",
            Self::SubscriberFailed { .. } => "registry_subscriber_failed",
            Self::TeardownFailed { .. } => "registry_teardown_failed",
        }
    }
}

/// Errors returned by subscriber callbacks.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SubscriberError {
    /// The callback failed with a plain message.
    #[error("{0}")]
    Failed(String),

    /// The event payload could not be decoded into the expected shape.
    #[error("invalid event payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Any other error raised by the subscriber.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl SubscriberError {
    /// Build a [`SubscriberError::Failed`] from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Result type returned by subscriber callbacks.
pub type SubscriberResult = Result<(), SubscriberError>;
