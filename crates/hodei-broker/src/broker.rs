use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use kernel::{ChangeEvent, ChangeKind};
use tokio::sync::{mpsc, Mutex};

const SUBSCRIBER_QUEUE_CAPACITY: usize = 10;
const BROADCAST_QUEUE_CAPACITY: usize = 100;
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct ChangeBrokerConfig {
    pub subscriber_capacity: usize,
    pub broadcast_capacity: usize,
    pub heartbeat_interval: Duration,
}

impl Default for ChangeBrokerConfig {
    fn default() -> Self {
        Self {
            subscriber_capacity: SUBSCRIBER_QUEUE_CAPACITY,
            broadcast_capacity: BROADCAST_QUEUE_CAPACITY,
            heartbeat_interval: HEARTBEAT_INTERVAL,
        }
    }
}

type Subscribers = Arc<Mutex<HashMap<u64, mpsc::Sender<ChangeEvent>>>>;

/// A per-process fan-out broker. Publishing never blocks on a slow
/// subscriber: events are enqueued onto a bounded broadcast queue, and a
/// single coordinator task drains it, `try_send`-ing into each subscriber's
/// own bounded queue. A full subscriber queue drops the event for that
/// subscriber only and logs a line; it never affects other subscribers or
/// the publisher.
pub struct ChangeBroker {
    publish_tx: mpsc::Sender<ChangeEvent>,
    subscribers: Subscribers,
    next_id: AtomicU64,
    subscriber_capacity: usize,
}

impl ChangeBroker {
    pub fn new(config: ChangeBrokerConfig) -> Arc<Self> {
        let (publish_tx, mut publish_rx) = mpsc::channel(config.broadcast_capacity);
        let subscribers: Subscribers = Arc::new(Mutex::new(HashMap::new()));

        let broker = Arc::new(Self {
            publish_tx,
            subscribers: subscribers.clone(),
            next_id: AtomicU64::new(1),
            subscriber_capacity: config.subscriber_capacity,
        });

        tokio::spawn(async move {
            while let Some(event) = publish_rx.recv().await {
                let mut dead = Vec::new();
                let subs = subscribers.lock().await;
                for (id, tx) in subs.iter() {
                    match tx.try_send(event.clone()) {
                        Ok(()) => {}
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            tracing::warn!(subscriber_id = id, "dropping change event: subscriber queue full");
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => {
                            dead.push(*id);
                        }
                    }
                }
                drop(subs);
                if !dead.is_empty() {
                    let mut subs = subscribers.lock().await;
                    for id in dead {
                        subs.remove(&id);
                    }
                }
            }
        });

        let heartbeat_broker = broker.clone();
        let interval = config.heartbeat_interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let _ = heartbeat_broker
                    .publish_tx
                    .send(ChangeEvent::backend(ChangeKind::Heartbeat, "broker"))
                    .await;
            }
        });

        broker
    }

    /// Non-blocking enqueue onto the broadcast queue; if it is full the
    /// event is dropped with a log line, matching the spec's
    /// `Publish` contract.
    pub fn publish(&self, event: ChangeEvent) {
        if let Err(mpsc::error::TrySendError::Full(_)) = self.publish_tx.try_send(event) {
            tracing::warn!("dropping change event: broadcast queue full");
        }
    }

    /// Registers a new bounded subscriber queue and immediately delivers a
    /// synthetic `connected` event.
    pub async fn subscribe(self: &Arc<Self>) -> Subscription {
        let (tx, rx) = mpsc::channel(self.subscriber_capacity);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let _ = tx
            .try_send(ChangeEvent::backend(ChangeKind::Connected, id.to_string()));
        self.subscribers.lock().await.insert(id, tx);
        Subscription {
            id,
            receiver: rx,
            subscribers: self.subscribers.clone(),
        }
    }
}

/// A subscriber's handle; dropping it (or calling `unsubscribe` explicitly)
/// removes and closes its channel.
pub struct Subscription {
    id: u64,
    receiver: mpsc::Receiver<ChangeEvent>,
    subscribers: Subscribers,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        self.receiver.recv().await
    }

    pub async fn unsubscribe(self) {
        self.subscribers.lock().await.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_connected_then_published_events() {
        let broker = ChangeBroker::new(ChangeBrokerConfig::default());
        let mut sub = broker.subscribe().await;

        let first = sub.recv().await.unwrap();
        assert_eq!(first.kind, ChangeKind::Connected);

        broker.publish(ChangeEvent::policy_updated("app-1", "policy-1"));
        let second = sub.recv().await.unwrap();
        assert_eq!(second.kind, ChangeKind::PolicyUpdated);
    }

    #[tokio::test]
    async fn slow_subscriber_drops_events_without_blocking_others() {
        let broker = ChangeBroker::new(ChangeBrokerConfig {
            subscriber_capacity: 1,
            ..ChangeBrokerConfig::default()
        });
        let mut slow = broker.subscribe().await;
        let mut fast = broker.subscribe().await;

        // Drain the `connected` events first.
        slow.recv().await.unwrap();
        fast.recv().await.unwrap();

        for i in 0..5 {
            broker.publish(ChangeEvent::policy_updated("app-1", format!("policy-{i}")));
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        // `fast` has a bigger effective buffer relative to what it drained;
        // both subscribers still work independently — neither blocks the
        // coordinator nor the other subscriber.
        assert!(fast.recv().await.is_some());
        assert!(slow.recv().await.is_some());
    }

    #[tokio::test]
    async fn unsubscribe_removes_the_subscriber() {
        let broker = ChangeBroker::new(ChangeBrokerConfig::default());
        let mut sub = broker.subscribe().await;
        sub.recv().await.unwrap();
        let id = sub.id();
        sub.unsubscribe().await;
        assert!(!broker.subscribers.lock().await.contains_key(&id));
    }
}
