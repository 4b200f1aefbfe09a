//! Notification Hub
//!
//! Tells every connected client that fresh data is available. Each
//! subscriber owns a single-slot mailbox: a broadcast that finds the slot
//! already full is dropped for that subscriber only, so a client learns that
//! something changed, never how many times.
//!
//! `broadcast` never waits on a subscriber. The registry lock is held only
//! while the map is updated or walked, and deposits use `try_send`.

use futures_util::Stream;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info};

/// Unique identifier for a hub subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(pub u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "subscriber-{}", self.0)
    }
}

struct HubInner {
    next_id: AtomicU64,
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<()>>>,
}

impl HubInner {
    fn remove(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().remove(&id).is_some()
    }
}

/// Process-wide registry of refresh subscribers
///
/// Cheap to clone; clones share the same registry. Construct one per process
/// and hand it to whatever accepts connections and whatever detects changes.
#[derive(Clone)]
pub struct NotificationHub {
    inner: Arc<HubInner>,
}

impl NotificationHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                next_id: AtomicU64::new(1),
                subscribers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Register a new subscriber with an empty notification slot
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(1);

        self.inner.subscribers.lock().insert(id, tx);
        debug!("Registered {}", id);

        Subscription {
            id,
            rx,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// Remove a subscriber. Unknown or already removed ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        if self.inner.remove(id) {
            debug!("Unregistered {}", id);
        }
    }

    /// Deposit one notification into every subscriber's slot
    ///
    /// Returns how many subscribers received a fresh notification. Slots
    /// that are already full are left as they are; subscribers whose
    /// receiving side is gone are pruned.
    pub fn broadcast(&self) -> usize {
        let mut delivered = 0;
        let mut subscribers = self.inner.subscribers.lock();

        subscribers.retain(|id, tx| match tx.try_send(()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(())) => true,
            Err(TrySendError::Closed(())) => {
                debug!("Pruning closed {}", id);
                false
            }
        });
        let total = subscribers.len();
        drop(subscribers);

        info!("Refresh broadcast: {} notified, {} registered", delivered, total);
        delivered
    }

    /// Number of currently registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHub")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// One subscriber's handle on its notification slot
///
/// Dropping the handle unsubscribes it, so tearing down a connection is
/// enough to leave the registry.
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<()>,
    hub: Weak<HubInner>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next notification, clearing the slot
    ///
    /// Returns `None` once the subscriber has been removed from the hub or
    /// the hub itself is gone.
    pub async fn recv(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// Take a pending notification without waiting
    pub fn try_recv(&mut self) -> bool {
        self.rx.try_recv().is_ok()
    }

    /// Turn the handle into a stream yielding one item per notification
    pub fn into_stream(self) -> impl Stream<Item = ()> + Send + 'static {
        futures_util::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|()| ((), sub))
        })
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            if hub.remove(self.id) {
                debug!("Unregistered {} on drop", self.id);
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::time::Duration;

    #[test]
    fn test_one_broadcast_one_notification_each() {
        let hub = NotificationHub::new();
        let mut subs: Vec<Subscription> = (0..16).map(|_| hub.subscribe()).collect();

        assert_eq!(hub.broadcast(), 16);

        for sub in subs.iter_mut() {
            assert!(sub.try_recv());
            assert!(!sub.try_recv());
        }
    }

    #[test]
    fn test_second_broadcast_coalesces() {
        let hub = NotificationHub::new();
        let mut sub = hub.subscribe();

        assert_eq!(hub.broadcast(), 1);
        // Slot is full: returns immediately without queueing a second one
        assert_eq!(hub.broadcast(), 0);

        assert!(sub.try_recv());
        assert!(!sub.try_recv());

        // Consumption frees the slot for the next broadcast
        assert_eq!(hub.broadcast(), 1);
        assert!(sub.try_recv());
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let hub = NotificationHub::new();
        let sub = hub.subscribe();
        let id = sub.id();
        assert_eq!(hub.subscriber_count(), 1);

        hub.unsubscribe(id);
        hub.unsubscribe(id);
        hub.unsubscribe(SubscriberId(9_999));
        assert_eq!(hub.subscriber_count(), 0);

        // Dropping after an explicit unsubscribe is also a no-op
        drop(sub);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribed_handle_sees_end_of_stream() {
        let hub = NotificationHub::new();
        let mut sub = hub.subscribe();
        hub.unsubscribe(sub.id());

        assert_eq!(hub.broadcast(), 0);
        assert!(!sub.try_recv());
    }

    #[test]
    fn test_drop_unsubscribes() {
        let hub = NotificationHub::new();
        let a = hub.subscribe();
        let _b = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        drop(a);
        assert_eq!(hub.subscriber_count(), 1);
        assert_eq!(hub.broadcast(), 1);
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        let hub = NotificationHub::new();
        assert_eq!(hub.broadcast(), 0);
    }

    #[tokio::test]
    async fn test_recv_wakes_on_broadcast() {
        let hub = NotificationHub::new();
        let mut sub = hub.subscribe();

        let waiter = tokio::spawn(async move { sub.recv().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        hub.broadcast();

        let got = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("subscriber was not woken")
            .unwrap();
        assert_eq!(got, Some(()));
    }

    #[tokio::test]
    async fn test_stream_yields_per_notification() {
        let hub = NotificationHub::new();
        let mut stream = Box::pin(hub.subscribe().into_stream());

        hub.broadcast();
        hub.broadcast();
        assert_eq!(stream.next().await, Some(()));

        hub.broadcast();
        assert_eq!(stream.next().await, Some(()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_single_broadcast_amid_churn() {
        let hub = NotificationHub::new();
        let mut stable: Vec<Subscription> = (0..64).map(|_| hub.subscribe()).collect();

        let mut churn = Vec::new();
        for _ in 0..8 {
            let hub = hub.clone();
            churn.push(tokio::spawn(async move {
                for _ in 0..200 {
                    let sub = hub.subscribe();
                    tokio::task::yield_now().await;
                    hub.unsubscribe(sub.id());
                }
            }));
        }

        let broadcaster = {
            let hub = hub.clone();
            tokio::spawn(async move { hub.broadcast() })
        };
        let delivered = broadcaster.await.unwrap();
        for task in churn {
            task.await.unwrap();
        }

        assert!(delivered >= stable.len());
        for sub in stable.iter_mut() {
            assert!(sub.try_recv());
            assert!(!sub.try_recv());
        }
        assert_eq!(hub.subscriber_count(), stable.len());
    }
}
