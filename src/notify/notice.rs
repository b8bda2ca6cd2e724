//! # Registry notices.
//!
//! [`NoticeKind`] classifies what the registry and its behaviours report:
//! - **Lifecycle notices**: one per behaviour state transition
//! - **Registration notices**: registered, replaced, skipped during discovery
//! - **Shutdown notices**: shutdown requested, stopped in grace, grace exceeded
//! - **Subscriber notices**: a subscriber panicked or dropped a notice
//!
//! ## Ordering guarantees
//! Every notice carries a process-wide, monotonically increasing `seq`.
//!
//! ## Example
//! ```rust
//! use behaviourd::{Notice, NoticeKind};
//!
//! let n = Notice::new(NoticeKind::BehaviourFaulted)
//!     .with_behaviour("moderation")
//!     .with_reason("store unavailable");
//!
//! assert_eq!(n.kind, NoticeKind::BehaviourFaulted);
//! assert_eq!(n.behaviour.as_deref(), Some("moderation"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use crate::core::BehaviourState;

static NOTICE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of registry notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    // === Subscriber notices ===
    /// A subscriber panicked. `behaviour`: subscriber name, `reason`: panic message.
    SubscriberPanicked,
    /// A subscriber queue was full or closed. `behaviour`: subscriber name.
    SubscriberOverflow,

    // === Shutdown notices ===
    /// Shutdown requested (OS signal observed).
    ShutdownRequested,
    /// Every behaviour stopped within the grace period.
    AllStoppedWithin,
    /// Some behaviours did not stop within the grace period. `reason`: their names.
    GraceExceeded,

    // === Registration notices ===
    /// A behaviour was built and installed.
    BehaviourRegistered,
    /// An existing behaviour of the same type was stopped and replaced.
    BehaviourReplaced,
    /// A non-instantiable descriptor was skipped. `behaviour`: type name.
    RegistrationSkipped,

    // === Lifecycle notices ===
    /// Behaviour entered `Starting`.
    BehaviourStarting,
    /// Behaviour entered `Running`.
    BehaviourRunning,
    /// Behaviour entered `Stopping`.
    BehaviourStopping,
    /// Behaviour entered `Stopped`.
    BehaviourStopped,
    /// Behaviour entered `Faulted`. `reason`: the failure, when known.
    BehaviourFaulted,
}

impl NoticeKind {
    /// Notice published when a behaviour enters `state`; `None` for `Idle`.
    pub fn for_state(state: BehaviourState) -> Option<Self> {
        match state {
            BehaviourState::Idle => None,
            BehaviourState::Starting => Some(Self::BehaviourStarting),
            BehaviourState::Running => Some(Self::BehaviourRunning),
            BehaviourState::Stopping => Some(Self::BehaviourStopping),
            BehaviourState::Stopped => Some(Self::BehaviourStopped),
            BehaviourState::Faulted => Some(Self::BehaviourFaulted),
        }
    }
}

/// Registry notice with optional metadata.
#[derive(Debug, Clone)]
pub struct Notice {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Notice classification.
    pub kind: NoticeKind,
    /// Behaviour (or subscriber / type) name, if applicable.
    pub behaviour: Option<Arc<str>>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
    /// Grace period in milliseconds (shutdown notices).
    pub grace_ms: Option<u32>,
}

impl Notice {
    /// Creates a notice with the current timestamp and next sequence number.
    pub fn new(kind: NoticeKind) -> Self {
        Self {
            seq: NOTICE_SEQ.fetch_add(1, Ordering::Relaxed),
            at: SystemTime::now(),
            kind,
            behaviour: None,
            reason: None,
            grace_ms: None,
        }
    }

    /// Attaches a behaviour name.
    #[inline]
    pub fn with_behaviour(mut self, name: impl Into<Arc<str>>) -> Self {
        self.behaviour = Some(name.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a grace period (stored as milliseconds).
    #[inline]
    pub fn with_grace(mut self, d: Duration) -> Self {
        self.grace_ms = Some(d.as_millis().min(u128::from(u32::MAX)) as u32);
        self
    }

    #[inline]
    pub(crate) fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Notice::new(NoticeKind::SubscriberOverflow)
            .with_behaviour(subscriber)
            .with_reason(reason)
    }

    #[inline]
    pub(crate) fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Notice::new(NoticeKind::SubscriberPanicked)
            .with_behaviour(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Notice::new(NoticeKind::ShutdownRequested);
        let b = Notice::new(NoticeKind::ShutdownRequested);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_state_mapping() {
        assert_eq!(NoticeKind::for_state(BehaviourState::Idle), None);
        assert_eq!(
            NoticeKind::for_state(BehaviourState::Faulted),
            Some(NoticeKind::BehaviourFaulted)
        );
    }

    #[test]
    fn test_grace_is_saturated() {
        let n = Notice::new(NoticeKind::GraceExceeded).with_grace(Duration::from_secs(u64::MAX));
        assert_eq!(n.grace_ms, Some(u32::MAX));
    }
}
