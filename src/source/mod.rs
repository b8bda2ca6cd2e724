//! External event source boundary.
//!
//! The engine only needs three things from the outside world:
//! - events that know their category ([`SourceEvent`]),
//! - a push-based source that accepts and removes callbacks per category ([`EventSource`]),
//! - a handler that processes one event inside a unit of work ([`EventHandler`]).
//!
//! [`EventHub`] is an in-process source suitable for tests, demos and for
//! bridging a transport client that exposes a plain stream of events.

mod handler;
mod hub;

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::SourceError;

pub use handler::EventHandler;
pub use hub::EventHub;

/// Event delivered by an external source.
pub trait SourceEvent: Send + 'static {
    /// Closed set of categories the source can deliver.
    type Category: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;

    /// Category of this event.
    fn category(&self) -> Self::Category;
}

/// Callback installed on a source; must return without blocking.
pub type Callback<E> = Arc<dyn Fn(E) + Send + Sync + 'static>;

/// Opaque handle identifying one installed callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wraps a raw id allocated by a source.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Push-based event source.
///
/// Callbacks may be invoked from any thread, concurrently. After
/// `unsubscribe` returns, the source must not invoke that callback again.
pub trait EventSource<E: SourceEvent>: Send + Sync + 'static {
    /// Installs `callback` for every event of `category`.
    fn subscribe(
        &self,
        category: E::Category,
        callback: Callback<E>,
    ) -> Result<SubscriptionId, SourceError>;

    /// Removes a previously installed callback.
    fn unsubscribe(&self, id: SubscriptionId) -> Result<(), SourceError>;
}
