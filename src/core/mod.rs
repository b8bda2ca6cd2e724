//! Runtime core: execution engine and lifecycle.
//!
//! - [`unit_of_work`]: runs one handler inside its own transaction on its own task;
//! - [`dispatch`]: multi-producer queue of pending executions, reaped one per tick;
//! - [`behaviour`]: the [`Behaviour`] trait and its state machine;
//! - [`lifecycle`]: [`EventBehaviour`], the event-driven behaviour with its tick loop;
//! - [`catalog`]: behaviour descriptors and the discovery container;
//! - [`registry`]: singleton-per-type registry with bulk start/stop and shutdown;
//! - [`builder`]: registry construction and notice fan-out wiring;
//! - [`shutdown`]: OS termination signals.
//!
//! ```text
//! EventSource ──callback──► spawn_unit_of_work ──► Enqueuer ─┐
//!                                                            ▼
//! BehaviourRegistry ──start/stop──► EventBehaviour ──tick──► DispatchQueue::try_reap_one
//!        │                               │
//!        └──── state watcher ◄── watch ──┘──► Notice ──► Bus ──► SubscriberSet
//! ```

mod behaviour;
mod builder;
mod catalog;
mod dispatch;
mod lifecycle;
mod registry;
mod shutdown;
mod unit_of_work;

pub use behaviour::{Behaviour, BehaviourState};
pub use builder::RegistryBuilder;
pub use catalog::{BehaviourCatalog, BehaviourDescriptor, BehaviourFactory, BuildFn};
pub use dispatch::{DispatchQueue, Enqueuer, PendingExecution, Reap};
pub use lifecycle::EventBehaviour;
pub use registry::BehaviourRegistry;
pub use unit_of_work::{
    NoTransactions, Transaction, TransactionSource, UnitOfWork, spawn_unit_of_work,
};
