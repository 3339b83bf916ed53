//! Mock subscribers for testing.

use std::sync::{Arc, Mutex};

use herald_events::{
    EventData, NotifyMethod, Subscriber, SubscriberError, SubscriberResult, TeardownMethod,
};

/// Name of the alternative notify capability exposed by [`RecordingSubscriber`].
pub const HANDLE_METHOD: &str = "handle";

/// Shared, ordered log of subscriber calls.
///
/// Several subscribers can write to one log so tests can assert on the
/// interleaving of notifications and teardowns across subscribers.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(entry.into());
        }
    }

    /// Snapshot of all entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Number of entries equal to `entry`.
    #[must_use]
    pub fn count(&self, entry: &str) -> usize {
        self.entries
            .lock()
            .map(|guard| guard.iter().filter(|e| e.as_str() == entry).count())
            .unwrap_or_default()
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|guard| guard.len()).unwrap_or_default()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.clear();
        }
    }
}

/// Subscriber that records every call into a [`CallLog`].
///
/// Entries are `"<name>:run"`, `"<name>:handle"` and `"<name>:teardown"`.
/// Received payloads are kept for inspection.
#[derive(Debug)]
pub struct RecordingSubscriber {
    name: String,
    log: CallLog,
    received: Mutex<Vec<EventData>>,
    with_teardown: bool,
}

impl RecordingSubscriber {
    /// Create a recording subscriber with a teardown capability.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            received: Mutex::new(Vec::new()),
            with_teardown: true,
        }
    }

    /// Drop the teardown capability.
    #[must_use]
    pub fn without_teardown(mut self) -> Self {
        self.with_teardown = false;
        self
    }

    /// Payloads received so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<EventData> {
        self.received
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// The most recent payload.
    #[must_use]
    pub fn last_received(&self) -> Option<EventData> {
        self.received
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }

    fn record(&self, capability: &str, data: &EventData) {
        self.log.record(format!("{}:{capability}", self.name));
        if let Ok(mut guard) = self.received.lock() {
            guard.push(data.clone());
        }
    }

    fn handle(&self, data: &EventData) -> SubscriberResult {
        self.record(HANDLE_METHOD, data);
        Ok(())
    }

    fn cleanup(&self) -> SubscriberResult {
        self.log.record(format!("{}:teardown", self.name));
        Ok(())
    }
}

impl Subscriber for RecordingSubscriber {
    fn run(&self, data: &EventData) -> SubscriberResult {
        self.record("run", data);
        Ok(())
    }

    fn method(&self, name: &str) -> Option<NotifyMethod<Self>> {
        match name {
            HANDLE_METHOD => Some(Self::handle),
            _ => None,
        }
    }

    fn teardown(&self) -> Option<TeardownMethod<Self>> {
        self.with_teardown.then_some(Self::cleanup as TeardownMethod<Self>)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// How a [`FailingSubscriber`] fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Return an error from the callback.
    Error,
    /// Panic inside the callback.
    Panic,
}

/// Subscriber whose notify (and optionally teardown) callback fails.
///
/// Calls are still recorded into the [`CallLog`] before failing, as
/// `"<name>:run"` and `"<name>:teardown"`.
#[derive(Debug)]
pub struct FailingSubscriber {
    name: String,
    log: CallLog,
    mode: FailureMode,
    failing_teardown: bool,
}

impl FailingSubscriber {
    /// Subscriber whose `run` returns an error.
    #[must_use]
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
            mode: FailureMode::Error,
            failing_teardown: false,
        }
    }

    /// Subscriber whose `run` panics.
    #[must_use]
    pub fn panicking(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            mode: FailureMode::Panic,
            ..Self::new(name, log)
        }
    }

    /// Also expose a teardown that fails the same way.
    #[must_use]
    pub fn with_failing_teardown(mut self) -> Self {
        self.failing_teardown = true;
        self
    }

    fn fail(&self, capability: &str) -> SubscriberResult {
        self.log.record(format!("{}:{capability}", self.name));
        match self.mode {
            FailureMode::Error => Err(SubscriberError::Failed(format!(
                "{} failed in {capability}",
                self.name
            ))),
            FailureMode::Panic => panic!("{} panicked in {capability}", self.name),
        }
    }

    fn failing_cleanup(&self) -> SubscriberResult {
        self.fail("teardown")
    }
}

impl Subscriber for FailingSubscriber {
    fn run(&self, _data: &EventData) -> SubscriberResult {
        self.fail("run")
    }

    fn teardown(&self) -> Option<TeardownMethod<Self>> {
        self.failing_teardown
            .then_some(Self::failing_cleanup as TeardownMethod<Self>)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log_is_shared() {
        let log = CallLog::new();
        let other = log.clone();
        log.record("a");
        other.record("b");
        other.record("a");

        assert_eq!(log.entries(), vec!["a", "b", "a"]);
        assert_eq!(log.count("a"), 2);
        assert_eq!(log.len(), 3);

        log.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn test_recording_subscriber_records_calls() {
        let log = CallLog::new();
        let sub = RecordingSubscriber::new("rec", &log);

        sub.run(&EventData::new().with("x", 1)).unwrap();
        let handle = sub.method(HANDLE_METHOD).unwrap();
        handle(&sub, &EventData::new().with("x", 2)).unwrap();
        let teardown = sub.teardown().unwrap();
        teardown(&sub).unwrap();

        assert_eq!(log.entries(), vec!["rec:run", "rec:handle", "rec:teardown"]);
        assert_eq!(sub.received().len(), 2);
        assert_eq!(sub.last_received().unwrap().get_i64("x"), Some(2));
        assert!(sub.method("other").is_none());
    }

    #[test]
    fn test_recording_subscriber_without_teardown() {
        let log = CallLog::new();
        let sub = RecordingSubscriber::new("rec", &log).without_teardown();
        assert!(sub.teardown().is_none());
    }

    #[test]
    fn test_failing_subscriber_errors() {
        let log = CallLog::new();
        let sub = FailingSubscriber::new("bad", &log);

        assert!(sub.run(&EventData::new()).is_err());
        assert!(sub.teardown().is_none());
        assert_eq!(log.entries(), vec!["bad:run"]);
    }

    #[test]
    fn test_failing_teardown() {
        let log = CallLog::new();
        let sub = FailingSubscriber::new("bad", &log).with_failing_teardown();
        let teardown = sub.teardown().unwrap();
        assert!(teardown(&sub).is_err());
    }

    #[test]
    #[should_panic(expected = "boom panicked in run")]
    fn test_panicking_subscriber_panics() {
        let log = CallLog::new();
        let sub = FailingSubscriber::panicking("boom", &log);
        let _ = sub.run(&EventData::new());
    }
}
