//! # Behaviour registry: one live instance per behaviour type.
//!
//! The registry builds behaviours inside isolated dependency scopes, keeps
//! them in registration order, and drives their lifecycle in bulk.
//!
//! ## Architecture
//! ```text
//! register(descriptor, provider)
//!   ├─► abstract type?  ─► RegistrationSkipped, no-op
//!   ├─► create_scope() ─► descriptor.build(scope)
//!   ├─► same type registered?
//!   │     └─► old.stop() ─► old scope disposed ─► BehaviourReplaced
//!   └─► append entry ─► state watcher ─► BehaviourRegistered
//!
//! state watcher (one per entry):
//!   watch::Receiver<BehaviourState> ─► Notice(BehaviourStarting | Running | ... | Faulted) ─► Bus
//! ```
//!
//! ## Rules
//! - At most one entry per concrete type; registrations are serialized.
//! - A replaced instance is fully stopped and its scope disposed before the
//!   new instance is installed. The new instance is not started.
//! - `start_all` / `stop_all` run sequentially in registration order and
//!   continue past individual failures.
//! - `shutdown` stops every behaviour within `Config::grace` each, disposes
//!   every scope and empties the registry.

use std::any::{TypeId, type_name};
use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, RwLock, broadcast};
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::behaviour::{Behaviour, BehaviourState};
use crate::core::builder::RegistryBuilder;
use crate::core::catalog::{BehaviourCatalog, BehaviourDescriptor, BehaviourFactory};
use crate::core::shutdown;
use crate::error::RegistryError;
use crate::notify::{Bus, Notice, NoticeKind};
use crate::outcome::Failure;
use crate::services::{ServiceProvider, ServiceScope};

struct Entry {
    type_id: TypeId,
    name: String,
    behaviour: Arc<dyn Behaviour>,
    scope: Box<dyn ServiceScope>,
}

/// Registry of behaviours, unique per concrete type.
pub struct BehaviourRegistry {
    cfg: Config,
    bus: Bus,
    entries: RwLock<Vec<Entry>>,
    registration: Mutex<()>,
}

impl BehaviourRegistry {
    /// Starts building a registry.
    pub fn builder(cfg: Config) -> RegistryBuilder {
        RegistryBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: Config, bus: Bus) -> Self {
        Self {
            cfg,
            bus,
            entries: RwLock::new(Vec::new()),
            registration: Mutex::new(()),
        }
    }

    /// Configuration the registry was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Receiver observing every notice published from now on.
    pub fn notices(&self) -> broadcast::Receiver<Notice> {
        self.bus.subscribe()
    }

    /// Registers the behaviour described by `descriptor`.
    ///
    /// Returns `Ok(None)` without doing anything for non-instantiable
    /// descriptors. A behaviour of the same type already registered is
    /// stopped and replaced.
    pub async fn register(
        &self,
        descriptor: &BehaviourDescriptor,
        provider: &dyn ServiceProvider,
    ) -> Result<Option<Arc<dyn Behaviour>>, RegistryError> {
        let Some(build) = descriptor.builder() else {
            debug!(ty = descriptor.type_name(), "skipping non-instantiable behaviour type");
            self.bus.publish(
                Notice::new(NoticeKind::RegistrationSkipped)
                    .with_behaviour(descriptor.type_name())
                    .with_reason("not instantiable"),
            );
            return Ok(None);
        };

        let scope = provider.create_scope()?;
        let behaviour = match build(scope.as_ref()) {
            Ok(b) => b,
            Err(e) => {
                scope.dispose();
                return Err(e.into());
            }
        };
        self.install(descriptor.type_id(), Arc::clone(&behaviour), scope)
            .await;
        Ok(Some(behaviour))
    }

    /// Registers a behaviour of type `T` and returns the typed instance.
    pub async fn register_type<T: BehaviourFactory>(
        &self,
        provider: &dyn ServiceProvider,
    ) -> Result<Arc<T>, RegistryError> {
        let scope = provider.create_scope()?;
        let behaviour = match T::build(scope.as_ref()) {
            Ok(b) => Arc::new(b),
            Err(e) => {
                scope.dispose();
                return Err(e.into());
            }
        };
        self.install(TypeId::of::<T>(), behaviour.clone(), scope)
            .await;
        debug!(ty = type_name::<T>(), "behaviour type registered");
        Ok(behaviour)
    }

    /// Registers every instantiable descriptor of `catalog`, in order.
    ///
    /// Stops at the first construction error. Returns how many behaviours
    /// were registered.
    pub async fn discover(
        &self,
        catalog: &BehaviourCatalog,
        provider: &dyn ServiceProvider,
    ) -> Result<usize, RegistryError> {
        let mut registered = 0;
        for descriptor in catalog {
            if self.register(descriptor, provider).await?.is_some() {
                registered += 1;
            }
        }
        info!(registered, catalog = catalog.len(), "behaviour discovery finished");
        Ok(registered)
    }

    async fn install(
        &self,
        type_id: TypeId,
        behaviour: Arc<dyn Behaviour>,
        scope: Box<dyn ServiceScope>,
    ) {
        let _serial = self.registration.lock().await;

        let previous = {
            let mut entries = self.entries.write().await;
            entries
                .iter()
                .position(|e| e.type_id == type_id)
                .map(|i| entries.remove(i))
        };
        if let Some(old) = previous {
            if let Err(failure) = old.behaviour.stop().await {
                warn!(behaviour = %old.name, reason = %failure, "replaced behaviour failed to stop cleanly");
            }
            old.scope.dispose();
            self.bus
                .publish(Notice::new(NoticeKind::BehaviourReplaced).with_behaviour(old.name.as_str()));
            debug!(behaviour = %old.name, scope = old.scope.id(), "previous instance replaced");
        }

        let name = behaviour.name().to_string();
        self.spawn_state_watcher(&behaviour);
        self.entries.write().await.push(Entry {
            type_id,
            name: name.clone(),
            behaviour,
            scope,
        });
        self.bus
            .publish(Notice::new(NoticeKind::BehaviourRegistered).with_behaviour(name));
    }

    /// Publishes a notice for every state change of `behaviour`.
    ///
    /// Ends once the behaviour is dropped.
    fn spawn_state_watcher(&self, behaviour: &Arc<dyn Behaviour>) {
        let mut rx = behaviour.watch_state();
        let weak: Weak<dyn Behaviour> = Arc::downgrade(behaviour);
        let name: Arc<str> = behaviour.name().into();
        let bus = self.bus.clone();

        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let state = *rx.borrow_and_update();
                let Some(kind) = NoticeKind::for_state(state) else {
                    continue;
                };
                let mut notice = Notice::new(kind).with_behaviour(Arc::clone(&name));
                if state == BehaviourState::Faulted {
                    let failure = weak.upgrade().and_then(|b| b.last_failure());
                    if let Some(failure) = failure {
                        notice = notice.with_reason(failure.reason());
                    }
                }
                bus.publish(notice);
            }
        });
    }

    fn snapshot(entries: &[Entry]) -> Vec<(String, Arc<dyn Behaviour>)> {
        entries
            .iter()
            .map(|e| (e.name.clone(), Arc::clone(&e.behaviour)))
            .collect()
    }

    /// Starts every behaviour sequentially, in registration order.
    pub async fn start_all(&self) -> Result<(), RegistryError> {
        let behaviours = Self::snapshot(&self.entries.read().await);
        let mut failures = Vec::new();
        for (name, behaviour) in behaviours {
            if let Err(failure) = behaviour.start().await {
                warn!(behaviour = %name, reason = %failure, "behaviour failed to start");
                failures.push((name, failure));
            }
        }
        Self::collect(failures)
    }

    /// Stops every behaviour sequentially, in registration order.
    pub async fn stop_all(&self) -> Result<(), RegistryError> {
        let behaviours = Self::snapshot(&self.entries.read().await);
        let mut failures = Vec::new();
        for (name, behaviour) in behaviours {
            if let Err(failure) = behaviour.stop().await {
                warn!(behaviour = %name, reason = %failure, "behaviour failed to stop");
                failures.push((name, failure));
            }
        }
        Self::collect(failures)
    }

    fn collect(failures: Vec<(String, Failure)>) -> Result<(), RegistryError> {
        if failures.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::Lifecycle { failures })
        }
    }

    /// Stops every behaviour (each within `Config::grace`), disposes every
    /// scope and empties the registry.
    ///
    /// Publishes `AllStoppedWithin` or `GraceExceeded`.
    pub async fn shutdown(&self) -> Result<(), RegistryError> {
        let _serial = self.registration.lock().await;
        let entries: Vec<Entry> = self.entries.write().await.drain(..).collect();
        let grace = self.cfg.grace;
        let mut stuck = Vec::new();

        for entry in entries {
            match time::timeout(grace, entry.behaviour.stop()).await {
                Ok(Ok(())) => {}
                Ok(Err(failure)) => {
                    warn!(behaviour = %entry.name, reason = %failure, "behaviour failed to stop");
                }
                Err(_elapsed) => {
                    warn!(behaviour = %entry.name, ?grace, "behaviour did not stop within grace");
                    stuck.push(entry.name.clone());
                }
            }
            entry.scope.dispose();
        }

        if stuck.is_empty() {
            self.bus
                .publish(Notice::new(NoticeKind::AllStoppedWithin).with_grace(grace));
            Ok(())
        } else {
            self.bus.publish(
                Notice::new(NoticeKind::GraceExceeded)
                    .with_grace(grace)
                    .with_reason(stuck.join(", ")),
            );
            Err(RegistryError::GraceExceeded { grace, stuck })
        }
    }

    /// Starts everything, waits for a termination signal, then shuts down.
    ///
    /// Start failures do not prevent the wait; they are returned after a
    /// successful shutdown.
    pub async fn run_until_signal(&self) -> Result<(), RegistryError> {
        let started = self.start_all().await;
        if let Err(e) = &started {
            warn!(error = %e, "some behaviours failed to start");
        }

        match shutdown::wait_for_termination().await {
            Ok(signal) => info!(signal, "termination signal received"),
            Err(e) => warn!(error = %e, "signal listener unavailable; shutting down"),
        }
        self.bus.publish(Notice::new(NoticeKind::ShutdownRequested));

        self.shutdown().await?;
        started
    }

    /// Names in registration order.
    pub async fn names(&self) -> Vec<String> {
        self.entries.read().await.iter().map(|e| e.name.clone()).collect()
    }

    /// `(name, state)` pairs in registration order.
    pub async fn states(&self) -> Vec<(String, BehaviourState)> {
        self.entries
            .read()
            .await
            .iter()
            .map(|e| (e.name.clone(), e.behaviour.state()))
            .collect()
    }

    /// Names of behaviours currently `Faulted`.
    pub async fn faulted(&self) -> Vec<String> {
        self.entries
            .read()
            .await
            .iter()
            .filter(|e| e.behaviour.state() == BehaviourState::Faulted)
            .map(|e| e.name.clone())
            .collect()
    }

    /// First behaviour registered under `name`.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn Behaviour>> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.name == name)
            .map(|e| Arc::clone(&e.behaviour))
    }

    /// Number of registered behaviours.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True if nothing is registered.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
