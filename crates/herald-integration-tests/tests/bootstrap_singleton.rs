//! Process-wide registry installed from configuration.
//!
//! The process-wide instance can be created once per process, so the whole
//! sequence lives in a single test.

use std::sync::Arc;

use herald::{BootstrapOptions, bootstrap, get_instance};
use herald_events::{EventData, EventRegistry, FailurePolicy, RegistryConfig, RegistryError};
use herald_test::{CallLog, RecordingSubscriber};

#[test]
fn bootstrap_installs_process_wide_registry_once() {
    let home = tempfile::tempdir().unwrap();
    let explicit = home.path().join("herald.toml");
    std::fs::write(&explicit, "[registry]\nfailure_policy = \"isolate\"\n").unwrap();

    let options = BootstrapOptions::new()
        .with_home(home.path())
        .with_config_file(&explicit);

    let registry = bootstrap(&options).unwrap();
    assert_eq!(registry.config().failure_policy, FailurePolicy::Isolate);

    // Every accessor hands out the installed instance.
    assert!(Arc::ptr_eq(&registry, &get_instance()));
    assert!(Arc::ptr_eq(&registry, &EventRegistry::get_instance()));

    // A second construction attempt is refused and changes nothing.
    let err = EventRegistry::install(RegistryConfig::new()).unwrap_err();
    assert!(matches!(err, RegistryError::Instantiation));
    assert!(bootstrap(&options).is_err());
    assert_eq!(get_instance().config().failure_policy, FailurePolicy::Isolate);

    // State registered through one handle is visible through another.
    let log = CallLog::new();
    registry
        .register("build.done", Arc::new(RecordingSubscriber::new("a", &log)), None)
        .unwrap();
    get_instance()
        .dispatch("build.done", &EventData::new().with("status", "ok"))
        .unwrap();
    assert_eq!(log.entries(), vec!["a:run"]);

    get_instance().unregister("build.done").unwrap();
    assert!(registry.get_subscribers("build.done").is_err());
}
