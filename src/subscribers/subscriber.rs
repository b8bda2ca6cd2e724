//! # Notice subscriber trait.
//!
//! [`Subscribe`] is the extension point for observing a registry.
//!
//! Each subscriber gets a dedicated worker task and a bounded queue of its
//! own (capacity via [`Subscribe::queue_capacity`]). Panics are caught and
//! reported as `NoticeKind::SubscriberPanicked`.
//!
//! ## Rules
//! - A slow subscriber only fills its own queue.
//! - On overflow the notice is dropped **for this subscriber only** and
//!   `NoticeKind::SubscriberOverflow` is published.
//! - Notices are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use behaviourd::{Notice, NoticeKind, Subscribe};
//!
//! struct Pager;
//!
//! #[async_trait]
//! impl Subscribe for Pager {
//!     async fn on_notice(&self, n: &Notice) {
//!         if n.kind == NoticeKind::BehaviourFaulted {
//!             // page whoever is on call
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "pager" }
//! }
//! ```

use async_trait::async_trait;

use crate::notify::Notice;

/// Registry notice subscriber.
///
/// Implementations should use async I/O and handle their own errors.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes one notice, on the subscriber's own worker task.
    async fn on_notice(&self, notice: &Notice);

    /// Name used in logs and overflow/panic notices.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Queue capacity for this subscriber (minimum 1). Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
