//! Registry use from many threads at once.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use herald_events::{EventData, EventRegistry};
use herald_test::{CallLog, RecordingSubscriber};

const THREADS: usize = 8;
const ROUNDS: usize = 50;

#[test]
fn concurrent_registration_keeps_every_subscriber() {
    let registry = Arc::new(EventRegistry::new());
    let log = CallLog::new();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let registry = Arc::clone(&registry);
            let log = log.clone();
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let name = format!("t{t}-{round}");
                    registry
                        .register(
                            "shared.event",
                            Arc::new(RecordingSubscriber::new(name, &log).without_teardown()),
                            None,
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(
        registry.subscriber_count("shared.event"),
        THREADS.saturating_mul(ROUNDS)
    );

    registry.dispatch("shared.event", &EventData::new()).unwrap();
    assert_eq!(log.len(), THREADS.saturating_mul(ROUNDS));
}

#[test]
fn per_thread_order_is_preserved() {
    let registry = Arc::new(EventRegistry::new());
    let log = CallLog::new();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let registry = Arc::clone(&registry);
            let log = log.clone();
            thread::spawn(move || {
                let event = format!("thread.{t}");
                for round in 0..ROUNDS {
                    registry
                        .register(
                            &event,
                            Arc::new(RecordingSubscriber::new(format!("{t}-{round}"), &log)),
                            None,
                        )
                        .unwrap();
                }
                registry.dispatch(&event, &EventData::new()).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for t in 0..THREADS {
        let expected: Vec<String> = (0..ROUNDS).map(|round| format!("{t}-{round}")).collect();
        assert_eq!(
            registry.subscriber_names(&format!("thread.{t}")).unwrap(),
            expected
        );
    }
}

#[test]
fn dispatch_races_with_unregister() {
    let registry = Arc::new(EventRegistry::new());
    let delivered = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&delivered);
    registry
        .register_fn("racy", "counter", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .unwrap();

    let dispatcher = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for _ in 0..ROUNDS {
                registry.dispatch("racy", &EventData::new()).unwrap();
            }
        })
    };
    let remover = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || registry.unregister("racy").unwrap())
    };

    dispatcher.join().unwrap();
    remover.join().unwrap();

    assert!(!registry.contains("racy"));
    assert!(delivered.load(Ordering::SeqCst) <= ROUNDS);
}
