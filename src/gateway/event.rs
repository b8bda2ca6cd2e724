//! Gateway event payloads and categories.

use crate::source::SourceEvent;

/// Gateway entity id.
pub type Snowflake = u64;

/// A text or voice channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub guild_id: Option<Snowflake>,
    pub name: String,
}

/// A message as delivered by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
}

/// Reference to a message that may no longer be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub id: Snowflake,
    pub channel_id: Snowflake,
}

/// An edited message; `before` is `None` when it was not cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEdit {
    pub before: Option<Message>,
    pub after: Message,
}

/// Messages removed in one bulk operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDelete {
    pub channel_id: Snowflake,
    pub ids: Vec<Snowflake>,
}

/// A reaction on a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub message: MessageRef,
    pub user_id: Snowflake,
    pub emoji: String,
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub name: String,
}

/// A guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Snowflake,
    pub name: String,
}

/// A user's membership in a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub guild_id: Snowflake,
    pub user: User,
    pub nickname: Option<String>,
}

/// A ban or unban of a user in a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ban {
    pub guild_id: Snowflake,
    pub user: User,
}

/// A user started typing in a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Typing {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
}

/// Before/after pair of an updated entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change<T> {
    pub before: T,
    pub after: T,
}

/// Event pushed by the gateway client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    ChannelCreated(Channel),
    ChannelDeleted(Channel),
    ChannelUpdated(Change<Channel>),
    MessageReceived(Message),
    MessageUpdated(MessageEdit),
    MessageDeleted(MessageRef),
    MessagesBulkDeleted(BulkDelete),
    ReactionAdded(Reaction),
    ReactionRemoved(Reaction),
    ReactionsCleared(MessageRef),
    RoleCreated(Role),
    RoleDeleted(Role),
    RoleUpdated(Change<Role>),
    GuildJoined(Guild),
    GuildLeft(Guild),
    GuildAvailable(Guild),
    GuildUnavailable(Guild),
    GuildUpdated(Change<Guild>),
    MemberJoined(Member),
    MemberLeft(Member),
    MemberUpdated(Change<Member>),
    UserBanned(Ban),
    UserUnbanned(Ban),
    UserUpdated(Change<User>),
    TypingStarted(Typing),
    Connected,
    Disconnected { reason: Option<String> },
    Ready,
    LatencyUpdated(Change<u32>),
}

/// Category of a [`GatewayEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GatewayCategory {
    ChannelCreated,
    ChannelDeleted,
    ChannelUpdated,
    MessageReceived,
    MessageUpdated,
    MessageDeleted,
    MessagesBulkDeleted,
    ReactionAdded,
    ReactionRemoved,
    ReactionsCleared,
    RoleCreated,
    RoleDeleted,
    RoleUpdated,
    GuildJoined,
    GuildLeft,
    GuildAvailable,
    GuildUnavailable,
    GuildUpdated,
    MemberJoined,
    MemberLeft,
    MemberUpdated,
    UserBanned,
    UserUnbanned,
    UserUpdated,
    TypingStarted,
    Connected,
    Disconnected,
    Ready,
    LatencyUpdated,
}

impl GatewayCategory {
    /// Every category, in declaration order.
    pub const ALL: [GatewayCategory; 29] = [
        Self::ChannelCreated,
        Self::ChannelDeleted,
        Self::ChannelUpdated,
        Self::MessageReceived,
        Self::MessageUpdated,
        Self::MessageDeleted,
        Self::MessagesBulkDeleted,
        Self::ReactionAdded,
        Self::ReactionRemoved,
        Self::ReactionsCleared,
        Self::RoleCreated,
        Self::RoleDeleted,
        Self::RoleUpdated,
        Self::GuildJoined,
        Self::GuildLeft,
        Self::GuildAvailable,
        Self::GuildUnavailable,
        Self::GuildUpdated,
        Self::MemberJoined,
        Self::MemberLeft,
        Self::MemberUpdated,
        Self::UserBanned,
        Self::UserUnbanned,
        Self::UserUpdated,
        Self::TypingStarted,
        Self::Connected,
        Self::Disconnected,
        Self::Ready,
        Self::LatencyUpdated,
    ];
}

impl SourceEvent for GatewayEvent {
    type Category = GatewayCategory;

    fn category(&self) -> GatewayCategory {
        use GatewayCategory as C;
        match self {
            Self::ChannelCreated(_) => C::ChannelCreated,
            Self::ChannelDeleted(_) => C::ChannelDeleted,
            Self::ChannelUpdated(_) => C::ChannelUpdated,
            Self::MessageReceived(_) => C::MessageReceived,
            Self::MessageUpdated(_) => C::MessageUpdated,
            Self::MessageDeleted(_) => C::MessageDeleted,
            Self::MessagesBulkDeleted(_) => C::MessagesBulkDeleted,
            Self::ReactionAdded(_) => C::ReactionAdded,
            Self::ReactionRemoved(_) => C::ReactionRemoved,
            Self::ReactionsCleared(_) => C::ReactionsCleared,
            Self::RoleCreated(_) => C::RoleCreated,
            Self::RoleDeleted(_) => C::RoleDeleted,
            Self::RoleUpdated(_) => C::RoleUpdated,
            Self::GuildJoined(_) => C::GuildJoined,
            Self::GuildLeft(_) => C::GuildLeft,
            Self::GuildAvailable(_) => C::GuildAvailable,
            Self::GuildUnavailable(_) => C::GuildUnavailable,
            Self::GuildUpdated(_) => C::GuildUpdated,
            Self::MemberJoined(_) => C::MemberJoined,
            Self::MemberLeft(_) => C::MemberLeft,
            Self::MemberUpdated(_) => C::MemberUpdated,
            Self::UserBanned(_) => C::UserBanned,
            Self::UserUnbanned(_) => C::UserUnbanned,
            Self::UserUpdated(_) => C::UserUpdated,
            Self::TypingStarted(_) => C::TypingStarted,
            Self::Connected => C::Connected,
            Self::Disconnected { .. } => C::Disconnected,
            Self::Ready => C::Ready,
            Self::LatencyUpdated(_) => C::LatencyUpdated,
        }
    }
}
