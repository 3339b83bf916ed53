//! Test fixtures for event names and payloads.

use std::sync::atomic::{AtomicU64, Ordering};

use herald_events::EventData;
use serde::{Deserialize, Serialize};

static EVENT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Typed payload of the `build.done` event used throughout the tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildDone {
    /// Build outcome.
    pub status: String,
    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

impl Default for BuildDone {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            duration_ms: 1200,
        }
    }
}

/// Create the standard `build.done` payload (`status = "ok"`).
#[must_use]
pub fn build_done_payload() -> EventData {
    EventData::new().with("status", "ok")
}

/// Create a payload with the given integer and string fields (`x`, `y`).
#[must_use]
pub fn xy_payload(x: i64, y: &str) -> EventData {
    EventData::new().with("x", x).with("y", y)
}

/// Create an event name that no other test in the process uses.
///
/// Needed when tests share the process-wide registry.
#[must_use]
pub fn unique_event_name(prefix: &str) -> String {
    let n = EVENT_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}.{n}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_done_payload() {
        assert_eq!(build_done_payload().get_str("status"), Some("ok"));
    }

    #[test]
    fn test_typed_payload_encodes() {
        let data = EventData::encode(&BuildDone::default()).unwrap();
        assert_eq!(data.get_i64("duration_ms"), Some(1200));
        assert_eq!(data.decode::<BuildDone>().unwrap(), BuildDone::default());
    }

    #[test]
    fn test_unique_event_names_differ() {
        let a = unique_event_name("t");
        let b = unique_event_name("t");
        assert_ne!(a, b);
        assert!(a.starts_with("t."));
    }
}
