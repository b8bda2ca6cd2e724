//! # behaviourd
//!
//! **behaviourd** is a framework for long-lived, reactive *behaviours*:
//! background workers that subscribe to a push-based event source, process
//! every event inside its own transaction, and run until stopped.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   external source (gateway client, EventHub, ...)
//!        │ callbacks (any thread, concurrently)
//!        ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ EventBehaviour                                                  │
//! │   callback ──► spawn_unit_of_work(handler, event) ──► Enqueuer  │
//! │                      (own task, own transaction)        │       │
//! │                                                         ▼       │
//! │   tick loop (every 200ms) ──► DispatchQueue::try_reap_one()     │
//! │        ├─ Completed / Rotated / Empty ─► sleep                  │
//! │        └─ Failed(f) ─► unsubscribe ─► Faulted                   │
//! └───────────────────────────────┬─────────────────────────────────┘
//!                                 │ watch::Receiver<BehaviourState>
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ BehaviourRegistry                                               │
//! │   - one entry per behaviour type, each with its ServiceScope    │
//! │   - discover / register / start_all / stop_all / shutdown       │
//! │   - state watchers ──► Notice ──► Bus ──► SubscriberSet         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Idle ──start──► Starting ──► Running ──stop──► Stopping ──► Stopped
//!                    │            └─ failure ──► Stopping ──► Faulted
//!                    └─ subscribe error ─────────────────────► Faulted
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                                   |
//! |-------------------|---------------------------------------------------------------|------------------------------------------------------|
//! | **Unit of work**  | One transaction per handler execution; commit or roll back.   | [`UnitOfWork`], [`TransactionSource`]                |
//! | **Dispatch**      | Non-blocking multi-producer queue, one completion per tick.   | [`DispatchQueue`], [`Enqueuer`], [`Reap`]            |
//! | **Behaviours**    | Restartable workers with an explicit state machine.           | [`Behaviour`], [`EventBehaviour`]                    |
//! | **Registry**      | Discovery, singleton per type, bulk lifecycle, shutdown.      | [`BehaviourRegistry`], [`BehaviourCatalog`]          |
//! | **Sources**       | Push-based event sources and handlers.                        | [`source::EventSource`], [`source::EventHandler`]    |
//! | **Dependencies**  | Isolated, disposable scopes per behaviour.                    | [`ServiceProvider`], [`Services`]                    |
//! | **Notices**       | Lifecycle and shutdown notices for observers.                 | [`Subscribe`], [`Notice`]                            |
//! | **Errors**        | A single failure value plus typed boundary errors.            | [`Failure`], [`RegistryError`]                       |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber rendering notices through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use behaviourd::gateway::{Gateway, GatewayEvent, GatewayHandlers, Message};
//! use behaviourd::source::EventHub;
//! use behaviourd::{Behaviour, BehaviourState, EventBehaviour, Outcome, UnitOfWork};
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl GatewayHandlers for Echo {
//!     async fn message_received(&self, _uow: UnitOfWork, message: Message) -> Outcome {
//!         println!("{}", message.content);
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hub = Arc::new(EventHub::<GatewayEvent>::new());
//!     let echo = EventBehaviour::new("echo", hub.clone(), Gateway::new(Echo));
//!
//!     echo.start().await?;
//!     hub.publish(GatewayEvent::MessageReceived(Message {
//!         id: 1,
//!         channel_id: 10,
//!         author_id: 100,
//!         content: "hello".into(),
//!     }));
//!     echo.stop().await?;
//!
//!     assert_eq!(echo.state(), BehaviourState::Stopped);
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod notify;
mod outcome;
mod services;
mod subscribers;

pub mod gateway;
pub mod source;

// ---- Public re-exports ----

pub use config::{Config, DEFAULT_TICK_INTERVAL};
pub use core::{
    Behaviour, BehaviourCatalog, BehaviourDescriptor, BehaviourFactory, BehaviourRegistry,
    BehaviourState, BuildFn, DispatchQueue, Enqueuer, EventBehaviour, NoTransactions,
    PendingExecution, Reap, RegistryBuilder, Transaction, TransactionSource, UnitOfWork,
    spawn_unit_of_work,
};
pub use error::{
    Cancelled, HandlerPanic, ProviderError, RegistryError, SourceError, TransactionError,
};
pub use notify::{Bus, Notice, NoticeKind};
pub use outcome::{Cause, Failure, Outcome};
pub use services::{Service, ServiceProvider, ServiceScope, Services};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: a built-in subscriber rendering notices through `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
