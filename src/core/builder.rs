use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

use super::registry::BehaviourRegistry;
use crate::{
    config::Config,
    notify::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for a [`BehaviourRegistry`].
pub struct RegistryBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl RegistryBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets notice subscribers.
    ///
    /// Each subscriber gets its own worker and bounded queue.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the registry and spawns its notice listener.
    ///
    /// Must be called within a tokio runtime.
    pub fn build(self) -> Arc<BehaviourRegistry> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers, bus.clone());
        spawn_listener(&bus, subs);
        Arc::new(BehaviourRegistry::new_internal(self.cfg, bus))
    }
}

/// Forwards bus notices to `subs` until every bus sender is gone.
fn spawn_listener(bus: &Bus, subs: SubscriberSet) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(notice) => subs.emit(Arc::new(notice)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "notice listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
        subs.shutdown().await;
    });
}
