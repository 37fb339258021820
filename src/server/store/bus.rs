use crate::server::model::event::OrderEvent;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

struct Subscriber {
    hotel_slug: String,
    tx: mpsc::Sender<OrderEvent>,
}

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<u64, Subscriber>>,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, HashMap<u64, Subscriber>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// In-process fan-out of order events. Every subscriber owns a bounded queue
/// registered for exactly one tenant.
#[derive(Clone)]
pub(crate) struct EventBus {
    registry: Arc<Registry>,
    capacity: usize,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            registry: Arc::new(Registry::default()),
            capacity: capacity.max(1),
        }
    }

    /// Register a queue for events of `hotel_slug`. Dropping the returned handle deregisters it.
    pub fn subscribe(&self, hotel_slug: &str) -> Subscription {
        let (tx, rx) = mpsc::channel(self.capacity);
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        self.registry.lock().insert(id, Subscriber { hotel_slug: hotel_slug.to_string(), tx });
        debug!("subscriber {} registered for hotel={}", id, hotel_slug);
        Subscription {
            id,
            rx,
            registry: self.registry.clone(),
        }
    }

    /// Enqueue `event` for every subscriber of its tenant without blocking.
    /// Returns the number of queues the event landed in.
    pub fn publish(&self, event: &OrderEvent) -> usize {
        let mut subscribers = self.registry.lock();
        let mut delivered = 0;
        let mut closed = vec![];
        for (id, subscriber) in subscribers.iter() {
            if subscriber.hotel_slug != event.hotel_slug() {
                continue;
            }
            match subscriber.tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(
                        "subscriber {} of hotel={} is lagging, dropped event for order={}",
                        id,
                        subscriber.hotel_slug,
                        event.order().id
                    );
                }
                Err(TrySendError::Closed(_)) => closed.push(*id),
            }
        }
        for id in closed {
            subscribers.remove(&id);
        }
        delivered
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().len()
    }
}

/// A live registration on the bus.
pub(crate) struct Subscription {
    id: u64,
    rx: mpsc::Receiver<OrderEvent>,
    registry: Arc<Registry>,
}

impl Subscription {
    pub fn poll_recv(&mut self, cx: &mut Context<'_>) -> Poll<Option<OrderEvent>> {
        self.rx.poll_recv(cx)
    }

    #[cfg(test)]
    pub async fn recv(&mut self) -> Option<OrderEvent> {
        self.rx.recv().await
    }

    #[cfg(test)]
    pub fn try_recv(&mut self) -> Option<OrderEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.id);
        debug!("subscriber {} deregistered", self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::model::order::{Order, OrderItem, OrderStatus};
    use chrono::{DateTime, Utc};

    fn event(hotel_slug: &str, order_id: &str) -> OrderEvent {
        OrderEvent::New {
            hotel_slug: hotel_slug.to_string(),
            order: Order {
                id: order_id.to_string(),
                hotel_slug: hotel_slug.to_string(),
                table_id: "T1".to_string(),
                items: vec![OrderItem { menu_item_id: "m1".to_string(), quantity: 1, note: None }],
                status: OrderStatus::New,
                created_at: DateTime::<Utc>::from_timestamp_millis(0).unwrap(),
                customer_rating: None,
            },
        }
    }

    #[tokio::test]
    async fn delivers_only_to_matching_tenant() {
        let bus = EventBus::new(16);
        let mut a = bus.subscribe("a");
        let mut b = bus.subscribe("b");

        for (slug, id) in [("a", "1"), ("b", "2"), ("a", "3"), ("b", "4"), ("b", "5")] {
            bus.publish(&event(slug, id));
        }

        let mut seen_a = vec![];
        while let Some(e) = a.try_recv() {
            assert_eq!(e.hotel_slug(), "a");
            seen_a.push(e.order().id.clone());
        }
        assert_eq!(seen_a, vec!["1", "3"]);

        let mut seen_b = vec![];
        while let Some(e) = b.try_recv() {
            assert_eq!(e.hotel_slug(), "b");
            seen_b.push(e.order().id.clone());
        }
        assert_eq!(seen_b, vec!["2", "4", "5"]);
    }

    #[tokio::test]
    async fn dropped_subscription_is_never_invoked() {
        let bus = EventBus::new(16);
        let sub = bus.subscribe("a");
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(&event("a", "1")), 0);
    }

    #[tokio::test]
    async fn lagging_subscriber_does_not_block_others() {
        let bus = EventBus::new(1);
        let mut slow = bus.subscribe("a");
        let mut fast = bus.subscribe("a");

        assert_eq!(bus.publish(&event("a", "1")), 2);
        assert_eq!(fast.recv().await.unwrap().order().id, "1");
        // slow never drained, so only fast gets the second event
        assert_eq!(bus.publish(&event("a", "2")), 1);
        assert_eq!(fast.recv().await.unwrap().order().id, "2");

        assert_eq!(slow.try_recv().unwrap().order().id, "1");
        assert!(slow.try_recv().is_none());
    }

    #[tokio::test]
    async fn subscriber_without_events_gets_nothing_from_the_past() {
        let bus = EventBus::new(4);
        bus.publish(&event("a", "1"));
        let mut late = bus.subscribe("a");
        assert!(late.try_recv().is_none());
    }
}
