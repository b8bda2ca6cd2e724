//! # Notice bus.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]: many
//! publishers (registry, behaviour watchers, subscriber workers), any number
//! of receivers.
//!
//! ## Rules
//! - `publish()` never blocks.
//! - A single ring buffer of `capacity` notices is shared by all receivers.
//! - Slow receivers observe `RecvError::Lagged(n)` and skip `n` notices.
//! - Notices published while nobody listens are dropped.

use tokio::sync::broadcast;

use super::notice::Notice;

/// Broadcast channel for registry notices. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Notice>,
}

impl Bus {
    /// Creates a bus holding up to `capacity` notices (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Notice>(capacity.max(1));
        Self { tx }
    }

    /// Publishes to every current receiver; dropped if there are none.
    pub fn publish(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }

    /// Creates a receiver that observes notices published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeKind;

    #[tokio::test]
    async fn test_receivers_get_later_notices_only() {
        let bus = Bus::new(4);
        bus.publish(Notice::new(NoticeKind::ShutdownRequested));

        let mut rx = bus.subscribe();
        bus.publish(Notice::new(NoticeKind::AllStoppedWithin));

        let got = rx.recv().await.unwrap();
        assert_eq!(got.kind, NoticeKind::AllStoppedWithin);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_clamped() {
        let bus = Bus::new(0);
        let mut rx = bus.subscribe();
        bus.publish(Notice::new(NoticeKind::GraceExceeded));
        assert_eq!(rx.recv().await.unwrap().kind, NoticeKind::GraceExceeded);
    }
}
