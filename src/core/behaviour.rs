//! # Behaviour abstraction.
//!
//! A [`Behaviour`] is a long-lived worker with an explicit lifecycle:
//!
//! ```text
//! Idle ──start──► Starting ──► Running ──stop / cancel──► Stopping ──► Stopped
//!                    │            │                                      │
//!                    │            └─ reaped failure / loop panic ─► Stopping ──► Faulted
//!                    └─ subscribe error ──────────────────────────────────────► Faulted
//!
//! Stopped / Faulted ──start──► Starting (restart)
//! ```
//!
//! `start` while Starting/Running and `stop` while Idle/Stopped/Faulted are no-ops.

use async_trait::async_trait;
use std::fmt;
use tokio::sync::watch;

use crate::outcome::{Failure, Outcome};

/// Lifecycle state of a behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviourState {
    /// Constructed, never started.
    Idle,
    /// Subscribing to its event source.
    Starting,
    /// Tick loop active; events are being processed.
    Running,
    /// Tearing down subscriptions and the tick loop.
    Stopping,
    /// Stopped cleanly (explicit stop or cancellation).
    Stopped,
    /// Terminated by a handler failure or an internal fault.
    Faulted,
}

impl BehaviourState {
    /// True for states from which `start` will (re)start the behaviour.
    pub fn is_startable(self) -> bool {
        matches!(self, Self::Idle | Self::Stopped | Self::Faulted)
    }

    /// True for `Stopped` and `Faulted`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Faulted)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Faulted => "faulted",
        }
    }
}

impl fmt::Display for BehaviourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// # Long-lived, restartable worker.
///
/// Implemented by [`EventBehaviour`](crate::EventBehaviour); custom
/// implementations can be registered in a
/// [`BehaviourRegistry`](crate::BehaviourRegistry) as well.
///
/// ### Rules
/// - `start` and `stop` are idempotent.
/// - State only changes through `start`, `stop` or the behaviour's own loop.
#[async_trait]
pub trait Behaviour: Send + Sync + 'static {
    /// Stable, human-readable name used in logs and notices.
    fn name(&self) -> &str;

    /// Current lifecycle state.
    fn state(&self) -> BehaviourState;

    /// Receiver that observes every subsequent state change.
    fn watch_state(&self) -> watch::Receiver<BehaviourState>;

    /// Failure that ended the last run, if any.
    fn last_failure(&self) -> Option<Failure>;

    /// True while the behaviour is `Running`.
    fn is_running(&self) -> bool {
        self.state() == BehaviourState::Running
    }

    /// Starts the behaviour. No-op while it is already starting or running.
    async fn start(&self) -> Outcome;

    /// Stops the behaviour. No-op while it is not running.
    async fn stop(&self) -> Outcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startable_states() {
        assert!(BehaviourState::Idle.is_startable());
        assert!(BehaviourState::Stopped.is_startable());
        assert!(BehaviourState::Faulted.is_startable());
        assert!(!BehaviourState::Running.is_startable());
        assert!(!BehaviourState::Starting.is_startable());
        assert!(!BehaviourState::Stopping.is_startable());
    }

    #[test]
    fn test_labels() {
        assert_eq!(BehaviourState::Faulted.to_string(), "faulted");
        assert!(BehaviourState::Faulted.is_terminal());
        assert!(!BehaviourState::Idle.is_terminal());
    }
}
