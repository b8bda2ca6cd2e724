//! # Per-category handler surface for gateway behaviours.
//!
//! Implement [`GatewayHandlers`] and override only the categories you care
//! about; every other method is a no-op success. Wrap the implementation in
//! [`Gateway`] to obtain an [`EventHandler`] for an
//! [`EventBehaviour`](crate::EventBehaviour).
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use behaviourd::gateway::{GatewayCategory, GatewayHandlers, Message};
//! use behaviourd::{Failure, Outcome, UnitOfWork};
//!
//! struct NoSpam;
//!
//! #[async_trait]
//! impl GatewayHandlers for NoSpam {
//!     fn categories(&self) -> Vec<GatewayCategory> {
//!         vec![GatewayCategory::MessageReceived]
//!     }
//!
//!     async fn message_received(&self, _uow: UnitOfWork, message: Message) -> Outcome {
//!         if message.content.contains("buy now") {
//!             return Err(Failure::new("spam detected"));
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use super::event::*;
use crate::core::UnitOfWork;
use crate::outcome::Outcome;
use crate::source::EventHandler;

/// Capability set of a gateway behaviour: one handler per category.
///
/// Every handler defaults to a no-op success; override the ones you need.
#[allow(unused_variables)]
#[async_trait]
pub trait GatewayHandlers: Send + Sync + 'static {
    /// Categories to subscribe to. Defaults to every category.
    fn categories(&self) -> Vec<GatewayCategory> {
        GatewayCategory::ALL.to_vec()
    }

    /// Runs before the behaviour subscribes.
    async fn on_starting(&self) -> Outcome {
        Ok(())
    }

    /// Runs after the behaviour unsubscribed.
    async fn on_stopping(&self) -> Outcome {
        Ok(())
    }

    /// A channel was created.
    async fn channel_created(&self, uow: UnitOfWork, channel: Channel) -> Outcome {
        Ok(())
    }

    /// A channel was deleted.
    async fn channel_deleted(&self, uow: UnitOfWork, channel: Channel) -> Outcome {
        Ok(())
    }

    /// A channel changed.
    async fn channel_updated(&self, uow: UnitOfWork, change: Change<Channel>) -> Outcome {
        Ok(())
    }

    /// A message was posted.
    async fn message_received(&self, uow: UnitOfWork, message: Message) -> Outcome {
        Ok(())
    }

    /// A message was edited.
    async fn message_updated(&self, uow: UnitOfWork, edit: MessageEdit) -> Outcome {
        Ok(())
    }

    /// A single message was deleted.
    async fn message_deleted(&self, uow: UnitOfWork, message: MessageRef) -> Outcome {
        Ok(())
    }

    /// Several messages of one channel were deleted at once.
    async fn messages_bulk_deleted(&self, uow: UnitOfWork, bulk: BulkDelete) -> Outcome {
        Ok(())
    }

    /// A user reacted to a message.
    async fn reaction_added(&self, uow: UnitOfWork, reaction: Reaction) -> Outcome {
        Ok(())
    }

    /// A user removed a reaction.
    async fn reaction_removed(&self, uow: UnitOfWork, reaction: Reaction) -> Outcome {
        Ok(())
    }

    /// Every reaction was removed from a message.
    async fn reactions_cleared(&self, uow: UnitOfWork, message: MessageRef) -> Outcome {
        Ok(())
    }

    /// A role was created.
    async fn role_created(&self, uow: UnitOfWork, role: Role) -> Outcome {
        Ok(())
    }

    /// A role was deleted.
    async fn role_deleted(&self, uow: UnitOfWork, role: Role) -> Outcome {
        Ok(())
    }

    /// A role changed.
    async fn role_updated(&self, uow: UnitOfWork, change: Change<Role>) -> Outcome {
        Ok(())
    }

    /// The client joined a guild.
    async fn guild_joined(&self, uow: UnitOfWork, guild: Guild) -> Outcome {
        Ok(())
    }

    /// The client left or was removed from a guild.
    async fn guild_left(&self, uow: UnitOfWork, guild: Guild) -> Outcome {
        Ok(())
    }

    /// A guild became available after an outage or on connect.
    async fn guild_available(&self, uow: UnitOfWork, guild: Guild) -> Outcome {
        Ok(())
    }

    /// A guild became unavailable.
    async fn guild_unavailable(&self, uow: UnitOfWork, guild: Guild) -> Outcome {
        Ok(())
    }

    /// Guild settings changed.
    async fn guild_updated(&self, uow: UnitOfWork, change: Change<Guild>) -> Outcome {
        Ok(())
    }

    /// A member joined a guild.
    async fn member_joined(&self, uow: UnitOfWork, member: Member) -> Outcome {
        Ok(())
    }

    /// A member left a guild.
    async fn member_left(&self, uow: UnitOfWork, member: Member) -> Outcome {
        Ok(())
    }

    /// A member changed (nickname, roles).
    async fn member_updated(&self, uow: UnitOfWork, change: Change<Member>) -> Outcome {
        Ok(())
    }

    /// A user was banned from a guild.
    async fn user_banned(&self, uow: UnitOfWork, ban: Ban) -> Outcome {
        Ok(())
    }

    /// A user ban was lifted.
    async fn user_unbanned(&self, uow: UnitOfWork, ban: Ban) -> Outcome {
        Ok(())
    }

    /// A user changed (name, avatar).
    async fn user_updated(&self, uow: UnitOfWork, change: Change<User>) -> Outcome {
        Ok(())
    }

    /// A user started typing in a channel.
    async fn typing_started(&self, uow: UnitOfWork, typing: Typing) -> Outcome {
        Ok(())
    }

    /// The gateway connection was established.
    async fn connected(&self, uow: UnitOfWork) -> Outcome {
        Ok(())
    }

    /// The gateway connection was lost.
    async fn disconnected(&self, uow: UnitOfWork, reason: Option<String>) -> Outcome {
        Ok(())
    }

    /// The session is ready; initial state was received.
    async fn ready(&self, uow: UnitOfWork) -> Outcome {
        Ok(())
    }

    /// The measured gateway latency (ms) changed.
    async fn latency_updated(&self, uow: UnitOfWork, change: Change<u32>) -> Outcome {
        Ok(())
    }
}

/// Adapter exposing a [`GatewayHandlers`] implementation as an [`EventHandler`].
pub struct Gateway<B> {
    inner: Arc<B>,
}

impl<B: GatewayHandlers> Gateway<B> {
    /// Wraps `handlers`.
    pub fn new(handlers: B) -> Self {
        Self::from_arc(Arc::new(handlers))
    }

    /// Wraps already shared handlers.
    pub fn from_arc(inner: Arc<B>) -> Self {
        Self { inner }
    }

    /// The wrapped handlers.
    pub fn inner(&self) -> &Arc<B> {
        &self.inner
    }
}

#[async_trait]
impl<B: GatewayHandlers> EventHandler<GatewayEvent> for Gateway<B> {
    fn categories(&self) -> Vec<GatewayCategory> {
        self.inner.categories()
    }

    async fn on_starting(&self) -> Outcome {
        self.inner.on_starting().await
    }

    async fn on_stopping(&self) -> Outcome {
        self.inner.on_stopping().await
    }

    async fn handle(&self, uow: UnitOfWork, event: GatewayEvent) -> Outcome {
        use GatewayEvent as E;
        let h = &self.inner;
        match event {
            E::ChannelCreated(c) => h.channel_created(uow, c).await,
            E::ChannelDeleted(c) => h.channel_deleted(uow, c).await,
            E::ChannelUpdated(c) => h.channel_updated(uow, c).await,
            E::MessageReceived(m) => h.message_received(uow, m).await,
            E::MessageUpdated(m) => h.message_updated(uow, m).await,
            E::MessageDeleted(m) => h.message_deleted(uow, m).await,
            E::MessagesBulkDeleted(b) => h.messages_bulk_deleted(uow, b).await,
            E::ReactionAdded(r) => h.reaction_added(uow, r).await,
            E::ReactionRemoved(r) => h.reaction_removed(uow, r).await,
            E::ReactionsCleared(m) => h.reactions_cleared(uow, m).await,
            E::RoleCreated(r) => h.role_created(uow, r).await,
            E::RoleDeleted(r) => h.role_deleted(uow, r).await,
            E::RoleUpdated(r) => h.role_updated(uow, r).await,
            E::GuildJoined(g) => h.guild_joined(uow, g).await,
            E::GuildLeft(g) => h.guild_left(uow, g).await,
            E::GuildAvailable(g) => h.guild_available(uow, g).await,
            E::GuildUnavailable(g) => h.guild_unavailable(uow, g).await,
            E::GuildUpdated(g) => h.guild_updated(uow, g).await,
            E::MemberJoined(m) => h.member_joined(uow, m).await,
            E::MemberLeft(m) => h.member_left(uow, m).await,
            E::MemberUpdated(m) => h.member_updated(uow, m).await,
            E::UserBanned(b) => h.user_banned(uow, b).await,
            E::UserUnbanned(b) => h.user_unbanned(uow, b).await,
            E::UserUpdated(u) => h.user_updated(uow, u).await,
            E::TypingStarted(t) => h.typing_started(uow, t).await,
            E::Connected => h.connected(uow).await,
            E::Disconnected { reason } => h.disconnected(uow, reason).await,
            E::Ready => h.ready(uow).await,
            E::LatencyUpdated(l) => h.latency_updated(uow, l).await,
        }
    }
}
