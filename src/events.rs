//! Detachable window event sources.
//!
//! The window loop emits into an [`EventSource`]; consumers hold a
//! [`Subscription`] and drain it between frames. Detaching closes the
//! subscription's channel so nothing accumulates for a consumer that is gone.

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::{FutureExt, StreamExt};

/// Pointer click in window pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub x: f32,
    pub y: f32,
}

/// The window changed size; read the new size from the window itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Fan-out broadcaster for one event type.
pub struct EventSource<E> {
    subscribers: Vec<(SubscriptionId, UnboundedSender<E>)>,
    next_id: u64,
}

impl<E: Clone> EventSource<E> {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self) -> Subscription<E> {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let (sender, receiver) = unbounded();
        self.subscribers.push((id, sender));
        Subscription { id, receiver }
    }

    /// Delivers `event` to every live subscriber, pruning closed ones.
    pub fn emit(&mut self, event: E) {
        self.subscribers
            .retain(|(_, sender)| sender.unbounded_send(event.clone()).is_ok());
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<E: Clone> Default for EventSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Subscription<E> {
    id: SubscriptionId,
    receiver: UnboundedReceiver<E>,
}

impl<E: Clone> Subscription<E> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Everything emitted since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<E> {
        let mut events = Vec::new();
        while let Some(Some(event)) = self.receiver.next().now_or_never() {
            events.push(event);
        }
        events
    }

    pub fn detach(mut self, source: &mut EventSource<E>) {
        source.unsubscribe(self.id);
        self.receiver.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_every_subscriber() {
        let mut source = EventSource::new();
        let mut a = source.subscribe();
        let mut b = source.subscribe();

        source.emit(ClickEvent { x: 1.0, y: 2.0 });
        source.emit(ClickEvent { x: 3.0, y: 4.0 });

        assert_eq!(a.drain().len(), 2);
        let from_b = b.drain();
        assert_eq!(from_b[0], ClickEvent { x: 1.0, y: 2.0 });
        assert!(a.drain().is_empty());
    }

    #[test]
    fn test_detach_stops_delivery() {
        let mut source: EventSource<ResizeEvent> = EventSource::new();
        let first = source.subscribe();
        let mut second = source.subscribe();

        first.detach(&mut source);
        assert_eq!(source.subscriber_count(), 1);

        source.emit(ResizeEvent);
        assert_eq!(second.drain(), vec![ResizeEvent]);
    }

    #[test]
    fn test_dropped_subscription_is_pruned_on_emit() {
        let mut source: EventSource<ResizeEvent> = EventSource::new();
        drop(source.subscribe());
        source.emit(ResizeEvent);
        assert_eq!(source.subscriber_count(), 0);
    }
}
