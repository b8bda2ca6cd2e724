//! Chat-gateway binding.
//!
//! [`GatewayEvent`] models the events a real-time chat gateway pushes
//! (messages, reactions, channels, roles, guilds, members, connection
//! status). A behaviour implements [`GatewayHandlers`], overriding only the
//! categories it cares about, and is wired to a source through [`Gateway`]:
//!
//! ```rust
//! # use std::sync::Arc;
//! # use async_trait::async_trait;
//! use behaviourd::gateway::{Gateway, GatewayEvent, GatewayHandlers};
//! use behaviourd::source::EventHub;
//! use behaviourd::EventBehaviour;
//!
//! struct Quiet;
//! impl GatewayHandlers for Quiet {}
//!
//! let hub = Arc::new(EventHub::<GatewayEvent>::new());
//! let behaviour = EventBehaviour::new("quiet", hub, Gateway::new(Quiet));
//! ```

mod event;
mod handlers;

pub use event::{
    Ban, BulkDelete, Change, Channel, GatewayCategory, GatewayEvent, Guild, Member, Message,
    MessageEdit, MessageRef, Reaction, Role, Snowflake, Typing, User,
};
pub use handlers::{Gateway, GatewayHandlers};
