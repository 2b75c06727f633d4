use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// State change of a single record, published after the change is persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordEvent {
    PurchaseChanged { id: String, purchased: bool },
    QuantityChanged { id: String, quantity: f64 },
    Deleted { id: String },
}

impl RecordEvent {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            RecordEvent::PurchaseChanged { id, .. }
            | RecordEvent::QuantityChanged { id, .. }
            | RecordEvent::Deleted { id } => id,
        }
    }
}

/// Something that keeps itself current from record events.
pub trait RecordObserver {
    fn on_record_event(&mut self, event: &RecordEvent);
}

/// Fan-out channel for [`RecordEvent`]s.
///
/// Each subscriber gets its own queue; dropped subscriptions are pruned on the
/// next publish.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<UnboundedSender<RecordEvent>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = unbounded_channel();
        self.subscribers.push(tx);
        Subscription { rx }
    }

    /// Delivers `event` to every live subscription and returns how many got it.
    pub fn publish(&mut self, event: RecordEvent) -> usize {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
        log::debug!(
            "Published {event:?} to {} subscriber(s)",
            self.subscribers.len()
        );
        self.subscribers.len()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving end of an [`EventBus`] subscription.
#[derive(Debug)]
pub struct Subscription {
    rx: UnboundedReceiver<RecordEvent>,
}

impl Subscription {
    /// Takes every event queued so far without waiting.
    pub fn drain(&mut self) -> Vec<RecordEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Applies every queued event to `observer`. Returns how many were applied.
    pub fn deliver_to(&mut self, observer: &mut dyn RecordObserver) -> usize {
        let events = self.drain();
        for event in &events {
            observer.on_record_event(event);
        }
        events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deleted(id: &str) -> RecordEvent {
        RecordEvent::Deleted { id: id.to_string() }
    }

    #[test]
    fn every_subscriber_receives_events_in_order() {
        let mut bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(deleted("a")), 2);
        bus.publish(deleted("b"));

        assert_eq!(first.drain(), vec![deleted("a"), deleted("b")]);
        assert_eq!(second.drain(), vec![deleted("a"), deleted("b")]);
        assert!(first.drain().is_empty());
    }

    #[test]
    fn dropped_subscriptions_are_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());

        assert_eq!(bus.publish(deleted("a")), 1);
        assert_eq!(bus.subscriber_count(), 1);
        drop(keep);
    }

    #[test]
    fn event_exposes_record_id() {
        let event = RecordEvent::QuantityChanged {
            id: "q".to_string(),
            quantity: 2.0,
        };
        assert_eq!(event.id(), "q");
    }
}
