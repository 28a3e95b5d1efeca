//! Event mediator — synchronous publish/subscribe keyed by event type.
//!
//! Subscription lists keep registration order and allow duplicates: an
//! observer registered twice for the same type is notified twice, and
//! [`unregister`](EventMediator::unregister) removes one occurrence at a time.
//!
//! [`publish`](EventMediator::publish) copies the subscriber list under the
//! read lock and delivers to the copy after releasing it. Changes made while
//! a publish is in flight, including by the observers being notified, apply
//! from the next publish onwards.
//!
//! Delivery is best-effort: one observer failing never prevents the others
//! from being called. Failures are gathered and returned together as a
//! [`DeliveryError`] once every observer has been tried.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use switchboard_domain::error::{DeliveryError, ObserverFailure, SwitchboardError};
use switchboard_domain::event::Event;
use switchboard_domain::observer::{Observer, same_observer};
use switchboard_domain::outcome::PublishOutcome;

type Subscribers = Vec<Arc<dyn Observer>>;

/// Registry of observers per event type and fan-out point for events.
#[derive(Default)]
pub struct EventMediator {
    observers: RwLock<HashMap<String, Subscribers>>,
}

impl EventMediator {
    /// Create a mediator with no subscriptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `observer` to the subscribers of `event_type`.
    pub fn register(&self, event_type: impl Into<String>, observer: Arc<dyn Observer>) {
        let event_type = event_type.into();
        tracing::info!(
            observer = observer.name(),
            event_type = %event_type,
            "observer registered"
        );
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(event_type)
            .or_default()
            .push(observer);
    }

    /// Remove the first registration of `observer` for `event_type`.
    ///
    /// Returns whether a registration was removed. Unknown event types and
    /// observers that are not subscribed are ignored.
    pub fn unregister(&self, event_type: &str, observer: &Arc<dyn Observer>) -> bool {
        // The removed observer outlives the guard: its name() and Drop run unlocked.
        let removed = {
            let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
            let Some(subscribers) = observers.get_mut(event_type) else {
                return false;
            };
            let Some(position) = subscribers.iter().position(|o| same_observer(o, observer)) else {
                return false;
            };

            let removed = subscribers.remove(position);
            if subscribers.is_empty() {
                observers.remove(event_type);
            }
            removed
        };

        tracing::info!(
            observer = removed.name(),
            event_type,
            "observer unregistered"
        );
        true
    }

    /// Build an [`Event`] and deliver it to the subscribers of `event_type`.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::Delivery`] if at least one observer failed.
    pub fn publish(
        &self,
        event_type: &str,
        payload: serde_json::Value,
    ) -> Result<PublishOutcome, SwitchboardError> {
        self.publish_event(&Event::new(event_type, payload))
    }

    /// Deliver an already-built event to the subscribers of its type.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchboardError::Delivery`] if at least one observer failed.
    #[tracing::instrument(skip_all, fields(event_type = %event.event_type, event_id = %event.id))]
    pub fn publish_event(&self, event: &Event) -> Result<PublishOutcome, SwitchboardError> {
        let snapshot = self.subscribers(&event.event_type);
        if snapshot.is_empty() {
            tracing::warn!("no observers registered for event");
            return Ok(PublishOutcome::NoObservers);
        }

        tracing::info!(observers = snapshot.len(), "notifying observers of event");
        let mut delivered = 0;
        let mut failures = Vec::new();
        for observer in &snapshot {
            match observer.update(event) {
                Ok(()) => delivered += 1,
                Err(error) => {
                    tracing::warn!(observer = observer.name(), %error, "observer failed to handle event");
                    failures.push(ObserverFailure {
                        observer: observer.name().to_string(),
                        error,
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(PublishOutcome::Delivered(delivered))
        } else {
            Err(DeliveryError {
                event_type: event.event_type.clone(),
                delivered,
                failures,
            }
            .into())
        }
    }

    /// Number of registrations for `event_type`, duplicates included.
    #[must_use]
    pub fn observer_count(&self, event_type: &str) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .map_or(0, Vec::len)
    }

    /// Event types with at least one subscriber, sorted.
    #[must_use]
    pub fn event_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        types.sort();
        types
    }

    fn subscribers(&self, event_type: &str) -> Subscribers {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use switchboard_domain::error::ObserverError;

    type Log = Arc<Mutex<Vec<String>>>;

    /// Appends `"<name>:<payload>"` to a log shared across observers.
    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Observer for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn update(&self, event: &Event) -> Result<(), ObserverError> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, event.payload_text()));
            Ok(())
        }
    }

    struct Failing {
        name: &'static str,
        log: Log,
    }

    impl Observer for Failing {
        fn name(&self) -> &str {
            self.name
        }

        fn update(&self, _event: &Event) -> Result<(), ObserverError> {
            self.log.lock().unwrap().push(format!("{}:failed", self.name));
            Err(ObserverError::Unavailable {
                observer: self.name.to_string(),
            })
        }
    }

    fn recorder(name: &'static str, log: &Log) -> Arc<dyn Observer> {
        Arc::new(Recorder {
            name,
            log: Arc::clone(log),
        })
    }

    fn payload(text: &str) -> serde_json::Value {
        serde_json::Value::String(text.to_string())
    }

    #[test]
    fn should_deliver_in_registration_order() {
        let log = Log::default();
        let mediator = EventMediator::new();
        mediator.register("E", recorder("o1", &log));
        mediator.register("E", recorder("o2", &log));
        mediator.register("E", recorder("o3", &log));

        let outcome = mediator.publish("E", payload("x")).unwrap();

        assert_eq!(outcome, PublishOutcome::Delivered(3));
        assert_eq!(*log.lock().unwrap(), vec!["o1:x", "o2:x", "o3:x"]);
    }

    #[test]
    fn should_only_deliver_to_matching_event_type() {
        let log = Log::default();
        let mediator = EventMediator::new();
        mediator.register("TURN_ON", recorder("living", &log));
        mediator.register("TURN_OFF", recorder("bedroom", &log));

        mediator.publish("TURN_OFF", payload("off")).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["bedroom:off"]);
    }

    #[test]
    fn should_skip_unregistered_observer() {
        let log = Log::default();
        let mediator = EventMediator::new();
        let o1 = recorder("o1", &log);
        mediator.register("E", Arc::clone(&o1));
        mediator.register("E", recorder("o2", &log));

        assert!(mediator.unregister("E", &o1));
        let outcome = mediator.publish("E", payload("x")).unwrap();

        assert_eq!(outcome, PublishOutcome::Delivered(1));
        assert_eq!(*log.lock().unwrap(), vec!["o2:x"]);
    }

    #[test]
    fn should_report_no_observers_for_unknown_event_type() {
        let log = Log::default();
        let mediator = EventMediator::new();
        mediator.register("E", recorder("o1", &log));

        let outcome = mediator.publish("NOBODY_HOME", payload("x")).unwrap();

        assert_eq!(outcome, PublishOutcome::NoObservers);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn should_report_no_observers_after_last_unregister() {
        let log = Log::default();
        let mediator = EventMediator::new();
        let only = recorder("only", &log);
        mediator.register("E", Arc::clone(&only));
        mediator.unregister("E", &only);

        assert_eq!(
            mediator.publish("E", payload("x")).unwrap(),
            PublishOutcome::NoObservers
        );
        assert!(mediator.event_types().is_empty());
    }

    #[test]
    fn should_ignore_unregister_of_unknown_observer_or_type() {
        let log = Log::default();
        let mediator = EventMediator::new();
        let registered = recorder("registered", &log);
        let stranger = recorder("registered", &log);
        mediator.register("E", Arc::clone(&registered));

        assert!(!mediator.unregister("E", &stranger));
        assert!(!mediator.unregister("OTHER", &registered));
        assert_eq!(mediator.observer_count("E"), 1);
    }

    #[test]
    fn should_deliver_twice_to_duplicate_registration() {
        let log = Log::default();
        let mediator = EventMediator::new();
        let observer = recorder("dup", &log);
        mediator.register("E", Arc::clone(&observer));
        mediator.register("E", Arc::clone(&observer));

        let outcome = mediator.publish("E", payload("x")).unwrap();

        assert_eq!(outcome, PublishOutcome::Delivered(2));
        assert_eq!(*log.lock().unwrap(), vec!["dup:x", "dup:x"]);
    }

    #[test]
    fn should_remove_one_duplicate_per_unregister() {
        let log = Log::default();
        let mediator = EventMediator::new();
        let observer = recorder("dup", &log);
        mediator.register("E", Arc::clone(&observer));
        mediator.register("E", recorder("other", &log));
        mediator.register("E", Arc::clone(&observer));

        mediator.unregister("E", &observer);
        mediator.publish("E", payload("x")).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["other:x", "dup:x"]);
    }

    #[test]
    fn should_keep_delivering_after_observer_failure() {
        let log = Log::default();
        let mediator = EventMediator::new();
        mediator.register("E", recorder("o1", &log));
        mediator.register(
            "E",
            Arc::new(Failing {
                name: "broken",
                log: Arc::clone(&log),
            }),
        );
        mediator.register("E", recorder("o3", &log));

        let result = mediator.publish("E", payload("x"));

        assert_eq!(*log.lock().unwrap(), vec!["o1:x", "broken:failed", "o3:x"]);
        let SwitchboardError::Delivery(err) = result.unwrap_err() else {
            panic!("expected delivery error");
        };
        assert_eq!(err.event_type, "E");
        assert_eq!(err.delivered, 2);
        assert_eq!(
            err.failures,
            vec![ObserverFailure {
                observer: "broken".to_string(),
                error: ObserverError::Unavailable {
                    observer: "broken".to_string()
                },
            }]
        );
    }

    #[test]
    fn should_collect_every_observer_failure() {
        let log = Log::default();
        let mediator = EventMediator::new();
        for name in ["a", "b"] {
            mediator.register(
                "E",
                Arc::new(Failing {
                    name,
                    log: Arc::clone(&log),
                }),
            );
        }

        let result = mediator.publish("E", payload("x"));

        let SwitchboardError::Delivery(err) = result.unwrap_err() else {
            panic!("expected delivery error");
        };
        assert_eq!(err.delivered, 0);
        assert_eq!(err.attempted(), 2);
        let names: Vec<&str> = err.failures.iter().map(|f| f.observer.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    /// Unregisters itself the first time it is notified.
    struct OneShot {
        mediator: Arc<EventMediator>,
        me: Mutex<Option<Arc<dyn Observer>>>,
        log: Log,
    }

    impl Observer for OneShot {
        fn name(&self) -> &str {
            "one-shot"
        }

        fn update(&self, event: &Event) -> Result<(), ObserverError> {
            self.log.lock().unwrap().push(format!("one-shot:{}", event.payload_text()));
            if let Some(me) = self.me.lock().unwrap().take() {
                self.mediator.unregister(&event.event_type, &me);
            }
            Ok(())
        }
    }

    #[test]
    fn should_tolerate_observer_unregistering_itself_during_publish() {
        let log = Log::default();
        let mediator = Arc::new(EventMediator::new());
        let one_shot = Arc::new(OneShot {
            mediator: Arc::clone(&mediator),
            me: Mutex::new(None),
            log: Arc::clone(&log),
        });
        let as_observer: Arc<dyn Observer> = Arc::clone(&one_shot) as Arc<dyn Observer>;
        *one_shot.me.lock().unwrap() = Some(Arc::clone(&as_observer));

        mediator.register("E", recorder("o1", &log));
        mediator.register("E", as_observer);
        mediator.register("E", recorder("o3", &log));

        let first = mediator.publish("E", payload("1")).unwrap();
        let second = mediator.publish("E", payload("2")).unwrap();

        assert_eq!(first, PublishOutcome::Delivered(3));
        assert_eq!(second, PublishOutcome::Delivered(2));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["o1:1", "one-shot:1", "o3:1", "o1:2", "o3:2"]
        );
    }

    /// Registers a new observer for the same event type on every delivery.
    struct Spawner {
        mediator: Arc<EventMediator>,
        log: Log,
    }

    impl Observer for Spawner {
        fn name(&self) -> &str {
            "spawner"
        }

        fn update(&self, event: &Event) -> Result<(), ObserverError> {
            self.mediator
                .register(event.event_type.clone(), recorder("late", &self.log));
            Ok(())
        }
    }

    #[test]
    fn should_apply_registration_during_publish_from_next_publish() {
        let log = Log::default();
        let mediator = Arc::new(EventMediator::new());
        mediator.register(
            "E",
            Arc::new(Spawner {
                mediator: Arc::clone(&mediator),
                log: Arc::clone(&log),
            }),
        );

        let first = mediator.publish("E", payload("1")).unwrap();
        assert_eq!(first, PublishOutcome::Delivered(1));
        assert!(log.lock().unwrap().is_empty());

        let second = mediator.publish("E", payload("2")).unwrap();
        assert_eq!(second, PublishOutcome::Delivered(2));
        assert_eq!(*log.lock().unwrap(), vec!["late:2"]);
    }

    /// Unregisters another observer the first time it is notified.
    struct Remover {
        mediator: Arc<EventMediator>,
        target: Mutex<Option<Arc<dyn Observer>>>,
        log: Log,
    }

    impl Observer for Remover {
        fn name(&self) -> &str {
            "remover"
        }

        fn update(&self, event: &Event) -> Result<(), ObserverError> {
            self.log.lock().unwrap().push(format!("remover:{}", event.payload_text()));
            if let Some(target) = self.target.lock().unwrap().take() {
                assert!(self.mediator.unregister(&event.event_type, &target));
            }
            Ok(())
        }
    }

    #[test]
    fn should_deliver_current_event_to_observer_removed_by_another() {
        let log = Log::default();
        let mediator = Arc::new(EventMediator::new());
        let victim = recorder("victim", &log);
        mediator.register(
            "E",
            Arc::new(Remover {
                mediator: Arc::clone(&mediator),
                target: Mutex::new(Some(Arc::clone(&victim))),
                log: Arc::clone(&log),
            }),
        );
        mediator.register("E", victim);
        mediator.register("E", recorder("o3", &log));

        let first = mediator.publish("E", payload("1")).unwrap();
        let second = mediator.publish("E", payload("2")).unwrap();

        assert_eq!(first, PublishOutcome::Delivered(3));
        assert_eq!(second, PublishOutcome::Delivered(2));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["remover:1", "victim:1", "o3:1", "remover:2", "o3:2"]
        );
    }

    /// Reads the mediator from `name()`, which loggers call on unregister.
    struct Inspector {
        mediator: Arc<EventMediator>,
    }

    impl Observer for Inspector {
        fn name(&self) -> &str {
            if self.mediator.observer_count("E") > 0 {
                "inspector"
            } else {
                "inspector (detached)"
            }
        }

        fn update(&self, _event: &Event) -> Result<(), ObserverError> {
            Ok(())
        }
    }

    #[test]
    fn should_not_hold_registry_lock_while_logging_unregister() {
        let mediator = Arc::new(EventMediator::new());
        let inspector: Arc<dyn Observer> = Arc::new(Inspector {
            mediator: Arc::clone(&mediator),
        });
        mediator.register("E", Arc::clone(&inspector));

        let (tx, rx) = std::sync::mpsc::channel();
        let worker_mediator = Arc::clone(&mediator);
        std::thread::spawn(move || {
            let subscriber = tracing_subscriber::fmt()
                .with_writer(std::io::sink)
                .finish();
            let removed = tracing::subscriber::with_default(subscriber, || {
                worker_mediator.unregister("E", &inspector)
            });
            tx.send(removed).unwrap();
        });

        let removed = rx
            .recv_timeout(std::time::Duration::from_secs(3))
            .expect("unregister should not block on its own lock");
        assert!(removed);
        assert_eq!(mediator.observer_count("E"), 0);
    }

    #[test]
    fn should_keep_registry_consistent_under_concurrent_mutation() {
        const THREADS: usize = 8;
        const ROUNDS: usize = 50;

        let log = Log::default();
        let mediator = EventMediator::new();
        let anchor = recorder("anchor", &log);
        mediator.register("E", Arc::clone(&anchor));

        std::thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for _ in 0..ROUNDS {
                        let transient: Arc<dyn Observer> = Arc::new(Recorder {
                            name: "transient",
                            log: Log::default(),
                        });
                        mediator.register("E", Arc::clone(&transient));
                        mediator.publish("E", payload("tick")).unwrap();
                        assert!(mediator.unregister("E", &transient));
                    }
                });
            }
        });

        assert_eq!(mediator.observer_count("E"), 1);
        let anchor_deliveries = log
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.as_str() == "anchor:tick")
            .count();
        assert_eq!(anchor_deliveries, THREADS * ROUNDS);
    }
}
