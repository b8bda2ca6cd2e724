//! # In-process event source.
//!
//! [`EventHub`] keeps a per-category list of callbacks and invokes them
//! synchronously from [`EventHub::publish`]. Publishing is safe from any
//! number of threads; callbacks are cloned out of the lock before being
//! invoked, so a callback may itself subscribe or unsubscribe.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::trace;

use super::{Callback, EventSource, SourceEvent, SubscriptionId};
use crate::error::SourceError;

struct Slot<E> {
    id: SubscriptionId,
    callback: Callback<E>,
}

struct Routes<E: SourceEvent> {
    by_category: HashMap<E::Category, Vec<Slot<E>>>,
    by_id: HashMap<SubscriptionId, E::Category>,
}

/// Push-based source backed by an in-memory routing table.
pub struct EventHub<E: SourceEvent> {
    routes: RwLock<Routes<E>>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl<E> EventHub<E>
where
    E: SourceEvent + Clone,
{
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(Routes {
                by_category: HashMap::new(),
                by_id: HashMap::new(),
            }),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Delivers `event` to every callback of its category.
    ///
    /// Returns how many callbacks were invoked.
    pub fn publish(&self, event: E) -> usize {
        let category = event.category();
        let callbacks: Vec<Callback<E>> = self
            .read()
            .by_category
            .get(&category)
            .map(|slots| slots.iter().map(|s| s.callback.clone()).collect())
            .unwrap_or_default();

        trace!(?category, subscribers = callbacks.len(), "publishing event");
        let delivered = callbacks.len();
        for cb in callbacks {
            cb(event.clone());
        }
        delivered
    }

    /// Number of callbacks installed for `category`.
    pub fn subscriber_count(&self, category: E::Category) -> usize {
        self.read()
            .by_category
            .get(&category)
            .map_or(0, |slots| slots.len())
    }

    /// Total number of installed callbacks.
    pub fn total_subscribers(&self) -> usize {
        self.read().by_id.len()
    }

    /// Rejects all further subscriptions. Existing callbacks stay installed.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn read(&self) -> RwLockReadGuard<'_, Routes<E>> {
        self.routes.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Routes<E>> {
        self.routes.write().unwrap_or_else(|p| p.into_inner())
    }
}

impl<E> Default for EventHub<E>
where
    E: SourceEvent + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventSource<E> for EventHub<E>
where
    E: SourceEvent + Clone,
{
    fn subscribe(
        &self,
        category: E::Category,
        callback: Callback<E>,
    ) -> Result<SubscriptionId, SourceError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(SourceError::Closed);
        }
        let id = SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut routes = self.write();
        routes
            .by_category
            .entry(category)
            .or_default()
            .push(Slot { id, callback });
        routes.by_id.insert(id, category);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> Result<(), SourceError> {
        let mut routes = self.write();
        let category = routes
            .by_id
            .remove(&id)
            .ok_or(SourceError::UnknownSubscription { id: id.get() })?;
        if let Some(slots) = routes.by_category.get_mut(&category) {
            slots.retain(|s| s.id != id);
            if slots.is_empty() {
                routes.by_category.remove(&category);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[derive(Clone, Debug)]
    enum Ping {
        A(u32),
        B,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum PingKind {
        A,
        B,
    }

    impl SourceEvent for Ping {
        type Category = PingKind;

        fn category(&self) -> PingKind {
            match self {
                Ping::A(_) => PingKind::A,
                Ping::B => PingKind::B,
            }
        }
    }

    fn counter(hits: &Arc<AtomicUsize>) -> Callback<Ping> {
        let hits = hits.clone();
        Arc::new(move |_ev| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_routes_by_category() {
        let hub = EventHub::<Ping>::new();
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        hub.subscribe(PingKind::A, counter(&a)).unwrap();
        hub.subscribe(PingKind::B, counter(&b)).unwrap();

        assert_eq!(hub.publish(Ping::A(1)), 1);
        assert_eq!(hub.publish(Ping::A(2)), 1);
        assert_eq!(hub.publish(Ping::B), 1);
        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribed_callback_is_not_invoked() {
        let hub = EventHub::<Ping>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let id = hub.subscribe(PingKind::A, counter(&hits)).unwrap();
        hub.unsubscribe(id).unwrap();

        assert_eq!(hub.publish(Ping::A(1)), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(hub.subscriber_count(PingKind::A), 0);
        assert_eq!(
            hub.unsubscribe(id),
            Err(SourceError::UnknownSubscription { id: id.get() })
        );
    }

    #[test]
    fn test_closed_hub_rejects_subscriptions() {
        let hub = EventHub::<Ping>::new();
        hub.close();
        let hits = Arc::new(AtomicUsize::new(0));
        assert_eq!(
            hub.subscribe(PingKind::B, counter(&hits)),
            Err(SourceError::Closed)
        );
    }

    #[test]
    fn test_callback_may_unsubscribe_itself() {
        let hub = Arc::new(EventHub::<Ping>::new());
        let slot = Arc::new(std::sync::Mutex::new(None::<SubscriptionId>));
        let (h, s) = (hub.clone(), slot.clone());
        let id = hub
            .subscribe(
                PingKind::A,
                Arc::new(move |_ev| {
                    if let Some(id) = s.lock().unwrap().take() {
                        h.unsubscribe(id).unwrap();
                    }
                }),
            )
            .unwrap();
        *slot.lock().unwrap() = Some(id);

        assert_eq!(hub.publish(Ping::A(0)), 1);
        assert_eq!(hub.total_subscribers(), 0);
    }
}
