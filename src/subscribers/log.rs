//! # LogWriter: renders notices through `tracing`.
//!
//! ## Example output
//! ```text
//! INFO  behaviour registered behaviour="audit"
//! INFO  behaviour running behaviour="audit"
//! WARN  behaviour faulted behaviour="moderation" reason="poison message"
//! WARN  grace exceeded grace_ms=10000 stuck="slow"
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::notify::{Notice, NoticeKind};
use crate::subscribers::Subscribe;

/// Notice writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_notice(&self, n: &Notice) {
        let behaviour = n.behaviour.as_deref().unwrap_or("-");
        let reason = n.reason.as_deref().unwrap_or("-");
        match n.kind {
            NoticeKind::BehaviourRegistered => info!(behaviour, "behaviour registered"),
            NoticeKind::BehaviourReplaced => info!(behaviour, "behaviour replaced"),
            NoticeKind::RegistrationSkipped => info!(behaviour, reason, "registration skipped"),
            NoticeKind::BehaviourStarting => info!(behaviour, "behaviour starting"),
            NoticeKind::BehaviourRunning => info!(behaviour, "behaviour running"),
            NoticeKind::BehaviourStopping => info!(behaviour, "behaviour stopping"),
            NoticeKind::BehaviourStopped => info!(behaviour, "behaviour stopped"),
            NoticeKind::BehaviourFaulted => warn!(behaviour, reason, "behaviour faulted"),
            NoticeKind::ShutdownRequested => info!("shutdown requested"),
            NoticeKind::AllStoppedWithin => info!(grace_ms = ?n.grace_ms, "all behaviours stopped within grace"),
            NoticeKind::GraceExceeded => warn!(grace_ms = ?n.grace_ms, stuck = reason, "grace exceeded"),
            NoticeKind::SubscriberOverflow => warn!(subscriber = behaviour, reason, "subscriber overflow"),
            NoticeKind::SubscriberPanicked => warn!(subscriber = behaviour, reason, "subscriber panicked"),
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
