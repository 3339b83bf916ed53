//! Subscriber trait and the erased entries stored by the registry.

use std::fmt;
use std::sync::Arc;

use crate::data::EventData;
use crate::error::{RegistryError, RegistryResult, SubscriberResult};

/// Name of the notify capability bound when no method is requested.
pub const DEFAULT_METHOD: &str = "run";

/// Erased notify callback bound to one subscriber instance.
pub type NotifyFn = Arc<dyn Fn(&EventData) -> SubscriberResult + Send + Sync>;

/// Erased teardown callback bound to one subscriber instance.
pub type TeardownFn = Arc<dyn Fn() -> SubscriberResult + Send + Sync>;

/// A notify capability of subscriber type `S`.
pub type NotifyMethod<S> = fn(&S, &EventData) -> SubscriberResult;

/// A teardown capability of subscriber type `S`.
pub type TeardownMethod<S> = fn(&S) -> SubscriberResult;

/// A component that can be notified of events.
///
/// `run` is the default notify capability. Types that handle events through
/// other methods expose them by name from [`Subscriber::method`] and are
/// registered with that name. Types that hold resources tied to an event
/// expose a cleanup method from [`Subscriber::teardown`]; it is called once
/// when the event is unregistered.
///
/// Capabilities are resolved when the subscriber is registered, not when the
/// event is dispatched.
///
/// ```
/// use herald_events::{EventData, NotifyMethod, Subscriber, SubscriberResult, TeardownMethod};
///
/// struct Deployer;
///
/// impl Deployer {
///     fn handle(&self, _data: &EventData) -> SubscriberResult {
///         Ok(())
///     }
///
///     fn cleanup(&self) -> SubscriberResult {
///         Ok(())
///     }
/// }
///
/// impl Subscriber for Deployer {
///     fn run(&self, data: &EventData) -> SubscriberResult {
///         self.handle(data)
///     }
///
///     fn method(&self, name: &str) -> Option<NotifyMethod<Self>> {
///         match name {
///             "handle" => Some(Self::handle),
///             _ => None,
///         }
///     }
///
///     fn teardown(&self) -> Option<TeardownMethod<Self>> {
///         Some(Self::cleanup)
///     }
/// }
/// ```
pub trait Subscriber: Send + Sync + Sized + 'static {
    /// Default notify capability.
    ///
    /// # Errors
    ///
    /// Errors are returned to the caller of `dispatch` unless the registry
    /// isolates failures.
    fn run(&self, data: &EventData) -> SubscriberResult;

    /// Resolve an alternative notify capability by name.
    ///
    /// Default implementation exposes nothing besides `run`.
    fn method(&self, name: &str) -> Option<NotifyMethod<Self>> {
        let _ = name;
        None
    }

    /// Teardown capability, if the subscriber has one.
    fn teardown(&self) -> Option<TeardownMethod<Self>> {
        None
    }

    /// Name used in logs and errors.
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "anonymous"
    }
}

/// A registered (notify, teardown) pair.
#[derive(Clone)]
pub struct SubscriberEntry {
    name: Arc<str>,
    notify: NotifyFn,
    teardown: Option<TeardownFn>,
}

impl fmt::Debug for SubscriberEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberEntry")
            .field("name", &self.name)
            .field("has_teardown", &self.teardown.is_some())
            .finish_non_exhaustive()
    }
}

impl SubscriberEntry {
    /// Build an entry from a bare notify closure.
    pub fn new<F>(name: impl Into<String>, notify: F) -> Self
    where
        F: Fn(&EventData) -> SubscriberResult + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            notify: Arc::new(notify),
            teardown: None,
        }
    }

    /// Attach a teardown closure.
    #[must_use]
    pub fn with_teardown<F>(mut self, teardown: F) -> Self
    where
        F: Fn() -> SubscriberResult + Send + Sync + 'static,
    {
        self.teardown = Some(Arc::new(teardown));
        self
    }

    /// Bind the capabilities of `subscriber`.
    ///
    /// `method` selects the notify capability; `None` and `"run"` select
    /// [`Subscriber::run`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingCapability`] if `method` names a
    /// capability the subscriber does not expose.
    pub fn bind<S: Subscriber>(subscriber: Arc<S>, method: Option<&str>) -> RegistryResult<Self> {
        let notify: NotifyMethod<S> = match method {
            None | Some(DEFAULT_METHOD) => <S as Subscriber>::run,
            Some(name) => {
                subscriber
                    .method(name)
                    .ok_or_else(|| RegistryError::MissingCapability {
                        subscriber: subscriber.name().to_owned(),
                        method: name.to_owned(),
                    })?
            },
        };

        let teardown = subscriber.teardown().map(|cleanup| {
            let target = Arc::clone(&subscriber);
            Arc::new(move || cleanup(&target)) as TeardownFn
        });

        let name = Arc::from(subscriber.name());
        let target = subscriber;
        Ok(Self {
            name,
            notify: Arc::new(move |data: &EventData| notify(&target, data)),
            teardown,
        })
    }

    /// Subscriber name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a teardown callback is present.
    #[must_use]
    pub fn has_teardown(&self) -> bool {
        self.teardown.is_some()
    }

    /// Shared handle to the notify callback.
    #[must_use]
    pub fn notify_fn(&self) -> NotifyFn {
        Arc::clone(&self.notify)
    }

    /// Whether both entries came from the same registration.
    pub(crate) fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.notify, &other.notify)
    }

    pub(crate) fn notify(&self, data: &EventData) -> SubscriberResult {
        (self.notify)(data)
    }

    /// Runs the teardown callback; `None` when the entry has none.
    pub(crate) fn teardown(&self) -> Option<SubscriberResult> {
        self.teardown.as_ref().map(|teardown| teardown())
    }
}

/// Closure-backed subscriber.
pub struct FnSubscriber<F>
where
    F: Fn(&EventData) -> SubscriberResult + Send + Sync + 'static,
{
    name: String,
    handler: F,
    on_teardown: Option<Box<dyn Fn() -> SubscriberResult + Send + Sync>>,
}

impl<F> FnSubscriber<F>
where
    F: Fn(&EventData) -> SubscriberResult + Send + Sync + 'static,
{
    /// Create a new closure subscriber.
    pub fn new(name: impl Into<String>, handler: F) -> Self {
        Self {
            name: name.into(),
            handler,
            on_teardown: None,
        }
    }

    /// Add a teardown closure.
    #[must_use]
    pub fn with_teardown<T>(mut self, teardown: T) -> Self
    where
        T: Fn() -> SubscriberResult + Send + Sync + 'static,
    {
        self.on_teardown = Some(Box::new(teardown));
        self
    }

    fn run_teardown(&self) -> SubscriberResult {
        match &self.on_teardown {
            Some(teardown) => teardown(),
            None => Ok(()),
        }
    }
}

impl<F> Subscriber for FnSubscriber<F>
where
    F: Fn(&EventData) -> SubscriberResult + Send + Sync + 'static,
{
    fn run(&self, data: &EventData) -> SubscriberResult {
        (self.handler)(data)
    }

    fn teardown(&self) -> Option<TeardownMethod<Self>> {
        self.on_teardown.as_ref().map(|_| Self::run_teardown as TeardownMethod<Self>)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubscriberError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Probe {
        calls: Mutex<Vec<String>>,
    }

    impl Probe {
        fn handle(&self, data: &EventData) -> SubscriberResult {
            let status = data.get_str("status").unwrap_or_default();
            self.calls.lock().unwrap().push(format!("handle:{status}"));
            Ok(())
        }

        fn cleanup(&self) -> SubscriberResult {
            self.calls.lock().unwrap().push("cleanup".into());
            Ok(())
        }
    }

    impl Subscriber for Probe {
        fn run(&self, _data: &EventData) -> SubscriberResult {
            self.calls.lock().unwrap().push("run".into());
            Ok(())
        }

        fn method(&self, name: &str) -> Option<NotifyMethod<Self>> {
            match name {
                "handle" => Some(Self::handle),
                _ => None,
            }
        }

        fn teardown(&self) -> Option<TeardownMethod<Self>> {
            Some(Self::cleanup)
        }

        fn name(&self) -> &str {
            "probe"
        }
    }

    struct Plain;

    impl Subscriber for Plain {
        fn run(&self, _data: &EventData) -> SubscriberResult {
            Err(SubscriberError::msg("plain"))
        }
    }

    #[test]
    fn test_bind_default_method() {
        let probe = Arc::new(Probe::default());
        let entry = SubscriberEntry::bind(Arc::clone(&probe), None).unwrap();

        entry.notify(&EventData::new()).unwrap();
        assert_eq!(*probe.calls.lock().unwrap(), vec!["run"]);
        assert_eq!(entry.name(), "probe");
    }

    #[test]
    fn test_bind_explicit_run_is_default() {
        let probe = Arc::new(Probe::default());
        let entry = SubscriberEntry::bind(Arc::clone(&probe), Some("run")).unwrap();

        entry.notify(&EventData::new()).unwrap();
        assert_eq!(*probe.calls.lock().unwrap(), vec!["run"]);
    }

    #[test]
    fn test_bind_named_method_and_teardown() {
        let probe = Arc::new(Probe::default());
        let entry = SubscriberEntry::bind(Arc::clone(&probe), Some("handle")).unwrap();

        entry
            .notify(&EventData::new().with("status", "ok"))
            .unwrap();
        assert!(entry.has_teardown());
        assert!(entry.teardown().unwrap().is_ok());

        assert_eq!(*probe.calls.lock().unwrap(), vec!["handle:ok", "cleanup"]);
    }

    #[test]
    fn test_bind_missing_method() {
        let err = SubscriberEntry::bind(Arc::new(Probe::default()), Some("nope")).unwrap_err();
        match err {
            RegistryError::MissingCapability { subscriber, method } => {
                assert_eq!(subscriber, "probe");
                assert_eq!(method, "nope");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_plain_subscriber_has_no_teardown() {
        let entry = SubscriberEntry::bind(Arc::new(Plain), None).unwrap();
        assert!(!entry.has_teardown());
        assert!(entry.teardown().is_none());
        assert_eq!(entry.name(), "anonymous");
        assert!(entry.notify(&EventData::new()).is_err());
    }

    #[test]
    fn test_fn_subscriber_teardown_only_when_set() {
        let bare = FnSubscriber::new("bare", |_| Ok(()));
        assert!(bare.teardown().is_none());

        let torn = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&torn);
        let with = FnSubscriber::new("with", |_| Ok(())).with_teardown(move || {
            *flag.lock().unwrap() = true;
            Ok(())
        });

        let entry = SubscriberEntry::bind(Arc::new(with), None).unwrap();
        assert_eq!(entry.name(), "with");
        assert!(entry.teardown().unwrap().is_ok());
        assert!(*torn.lock().unwrap());
    }

    #[test]
    fn test_entry_from_closures() {
        let entry = SubscriberEntry::new("closure", |data| {
            if data.contains_key("fail") {
                Err(SubscriberError::msg("asked to fail"))
            } else {
                Ok(())
            }
        })
        .with_teardown(|| Ok(()));

        assert!(entry.notify(&EventData::new()).is_ok());
        assert!(entry.notify(&EventData::new().with("fail", true)).is_err());
        assert!(entry.has_teardown());
        assert!(format!("{entry:?}").contains("closure"));
    }
}
