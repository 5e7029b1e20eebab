use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
/// Event bus for pub/sub messaging
///
/// Modules either register a handler for one kind of event, which runs
/// synchronously on the publishing thread, or subscribe to a channel that
/// receives every event.
use std::sync::Arc;

use super::events::{Event, EventKind};

/// Subscriber ID for tracking subscriptions and handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

/// Handler invoked for every event of the kind it was registered for
pub type EventHandler = Arc<dyn Fn(&Event) -> anyhow::Result<()> + Send + Sync>;

/// Event subscriber
struct Subscriber {
    id: SubscriberId,
    sender: Sender<Event>,
}

struct Handler {
    id: SubscriberId,
    kind: EventKind,
    handler: EventHandler,
}

/// Event bus for broadcasting events to subscribers
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    handlers: Arc<RwLock<Vec<Handler>>>,
    next_id: Arc<RwLock<usize>>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(Vec::new())),
            handlers: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(RwLock::new(0)),
        }
    }

    fn allocate_id(&self) -> SubscriberId {
        let mut next_id = self.next_id.write();
        let id = SubscriberId(*next_id);
        *next_id += 1;
        id
    }

    /// Subscribe to events, returns a receiver and subscription ID
    pub fn subscribe(&self) -> (Receiver<Event>, SubscriberId) {
        let (tx, rx) = unbounded();
        let id = self.allocate_id();

        self.subscribers.write().push(Subscriber { id, sender: tx });

        (rx, id)
    }

    /// Register a handler for one kind of event
    pub fn add_handler<F>(&self, kind: EventKind, handler: F) -> SubscriberId
    where
        F: Fn(&Event) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = self.allocate_id();
        self.handlers.write().push(Handler {
            id,
            kind,
            handler: Arc::new(handler),
        });
        id
    }

    /// Unsubscribe a channel subscriber or remove a handler
    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().retain(|s| s.id != id);
        self.handlers.write().retain(|h| h.id != id);
    }

    /// Publish an event to all handlers of its kind and all subscribers.
    ///
    /// Every handler runs even if an earlier one fails; the first failure
    /// is returned.
    pub fn publish(&self, event: Event) -> anyhow::Result<()> {
        let kind = event.kind();

        // Snapshot so handlers may (un)register while running
        let handlers: Vec<EventHandler> = self
            .handlers
            .read()
            .iter()
            .filter(|h| h.kind == kind)
            .map(|h| Arc::clone(&h.handler))
            .collect();

        let mut first_error = None;
        for handler in handlers {
            if let Err(err) = handler(&event) {
                tracing::warn!("{} handler failed: {:#}", kind, err);
                first_error.get_or_insert(err);
            }
        }

        let subscribers = self.subscribers.read();

        // Send to all subscribers (non-blocking)
        for subscriber in subscribers.iter() {
            // If send fails, subscriber channel is closed - that's ok
            let _ = subscriber.sender.try_send(event.clone());
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Get number of active channel subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    /// Get number of handlers registered for a kind of event
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.handlers.read().iter().filter(|h| h.kind == kind).count()
    }

    /// Clear all subscribers and handlers
    pub fn clear(&self) {
        self.subscribers.write().clear();
        self.handlers.write().clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
            handlers: Arc::clone(&self.handlers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn update() -> Event {
        Event::Update { tpf: 1.0 / 60.0 }
    }

    #[test]
    fn test_event_bus_subscribe() {
        let bus = EventBus::new();
        let (_rx, _id) = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_event_bus_unsubscribe() {
        let bus = EventBus::new();
        let (_rx, id) = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.unsubscribe(id);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_bus_publish() {
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();

        bus.publish(update()).unwrap();

        let received = rx.try_recv().unwrap();
        match received {
            Event::Update { .. } => {}
            _ => panic!("Wrong event type received"),
        }
    }

    #[test]
    fn test_event_bus_multiple_subscribers() {
        let bus = EventBus::new();
        let (rx1, _id1) = bus.subscribe();
        let (rx2, _id2) = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(update()).unwrap();

        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }

    #[test]
    fn test_handlers_only_see_their_kind() {
        let bus = EventBus::new();
        let updates = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&updates);
        bus.add_handler(EventKind::Update, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.publish(update()).unwrap();
        bus.publish(Event::Notification {
            message: "hello".to_string(),
        })
        .unwrap();

        assert_eq!(updates.load(Ordering::SeqCst), 1);
        assert_eq!(bus.handler_count(EventKind::Update), 1);
        assert_eq!(bus.handler_count(EventKind::Load), 0);
    }

    #[test]
    fn test_handler_error_is_returned_after_all_run() {
        let bus = EventBus::new();
        let ran = Arc::new(AtomicUsize::new(0));

        bus.add_handler(EventKind::Update, |_| anyhow::bail!("broken"));
        let counter = Arc::clone(&ran);
        bus.add_handler(EventKind::Update, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let err = bus.publish(update()).unwrap_err();
        assert_eq!(err.to_string(), "broken");
        assert_eq!(ran.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_removed_handler_not_called() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let id = bus.add_handler(EventKind::Update, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        bus.unsubscribe(id);
        bus.publish(update()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(bus.handler_count(EventKind::Update), 0);
    }

    #[test]
    fn test_event_bus_clear() {
        let bus = EventBus::new();
        let (_rx1, _id1) = bus.subscribe();
        bus.add_handler(EventKind::Save, |_| Ok(()));

        bus.clear();
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.handler_count(EventKind::Save), 0);
    }

    #[test]
    fn test_event_bus_clone() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let (_rx, _id) = bus1.subscribe();
        assert_eq!(bus1.subscriber_count(), 1);
        assert_eq!(bus2.subscriber_count(), 1); // Shared state
    }
}
