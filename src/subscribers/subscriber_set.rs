//! # Delivery of registry notices to subscribers.
//!
//! The registry listener hands every [`Notice`] (behaviour registered,
//! started, faulted, shutdown progress) to [`SubscriberSet::emit`]. Each
//! subscriber owns a bounded queue drained by its own worker task, so a slow
//! log sink never delays the registry or another subscriber.
//!
//! ```text
//! registry listener
//!   └─► emit(notice) ──try_send──► queue("log")   ──► worker ──► on_notice
//!                    ──try_send──► queue("audit") ──► worker ──► on_notice
//!                          │                                   │
//!               full/closed: SubscriberOverflow      panic: SubscriberPanicked
//!                          └────────────► Bus ◄────────────────┘
//! ```
//!
//! A subscriber sees notices in publication order. A notice that does not
//! fit a queue is dropped for that subscriber alone, and a panic in
//! `on_notice` costs only the notice being handled.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::notify::{Bus, Notice, NoticeKind};
use crate::outcome::Failure;
use crate::subscribers::Subscribe;

struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Notice>>,
}

/// Per-subscriber queues and their workers.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Starts a worker for each of `subs`.
    ///
    /// Overflow and panic reports are published back on `bus`.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Notice>>(sub.queue_capacity().max(1));
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(notice) = rx.recv().await {
                    let fut = sub.on_notice(notice.as_ref());
                    if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
                        let info = Failure::from_panic(panic).reason().to_string();
                        bus_for_worker.publish(Notice::subscriber_panicked(sub.name(), info));
                    }
                }
            });
            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Queues `notice` for every subscriber; never waits.
    ///
    /// A `SubscriberOverflow` notice that itself overflows is dropped silently.
    pub fn emit(&self, notice: Arc<Notice>) {
        let is_overflow = notice.kind == NoticeKind::SubscriberOverflow;

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&notice)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow {
                self.bus
                    .publish(Notice::subscriber_overflow(channel.name, reason));
            }
        }
    }

    /// Closes the queues; returns once every queued notice was handled.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<NoticeKind>>,
    }

    #[async_trait]
    impl Subscribe for Arc<Collect> {
        async fn on_notice(&self, notice: &Notice) {
            self.seen.lock().unwrap().push(notice.kind);
        }

        fn name(&self) -> &'static str {
            "collect"
        }
    }

    struct Explode;

    #[async_trait]
    impl Subscribe for Explode {
        async fn on_notice(&self, _notice: &Notice) {
            panic!("subscriber exploded");
        }

        fn name(&self) -> &'static str {
            "explode"
        }
    }

    #[tokio::test]
    async fn test_delivers_in_order() {
        let collect = Arc::new(Collect::default());
        let set = SubscriberSet::new(vec![Arc::new(collect.clone())], Bus::new(8));

        set.emit(Arc::new(Notice::new(NoticeKind::BehaviourStarting)));
        set.emit(Arc::new(Notice::new(NoticeKind::BehaviourRunning)));
        set.shutdown().await;

        assert_eq!(
            *collect.seen.lock().unwrap(),
            vec![NoticeKind::BehaviourStarting, NoticeKind::BehaviourRunning]
        );
    }

    struct Stall;

    #[async_trait]
    impl Subscribe for Stall {
        async fn on_notice(&self, _notice: &Notice) {
            std::future::pending::<()>().await;
        }

        fn name(&self) -> &'static str {
            "stall"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn test_full_queue_reports_overflow() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Stall)], bus.clone());

        // Worker takes the first notice and stalls; the second fills the queue.
        set.emit(Arc::new(Notice::new(NoticeKind::BehaviourStarting)));
        tokio::task::yield_now().await;
        set.emit(Arc::new(Notice::new(NoticeKind::BehaviourRunning)));
        set.emit(Arc::new(Notice::new(NoticeKind::BehaviourStopping)));

        let notice = rx.recv().await.unwrap();
        assert_eq!(notice.kind, NoticeKind::SubscriberOverflow);
        assert_eq!(notice.behaviour.as_deref(), Some("stall"));
        assert_eq!(notice.reason.as_deref(), Some("full"));
    }

    #[tokio::test]
    async fn test_panic_is_reported_on_bus() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Explode)], bus.clone());

        set.emit(Arc::new(Notice::new(NoticeKind::BehaviourFaulted)));
        let notice = rx.recv().await.unwrap();

        assert_eq!(notice.kind, NoticeKind::SubscriberPanicked);
        assert_eq!(notice.behaviour.as_deref(), Some("explode"));
        assert_eq!(notice.reason.as_deref(), Some("subscriber exploded"));
        set.shutdown().await;
    }
}
