//! Registry notices: data model and broadcast bus.
//!
//! - [`NoticeKind`], [`Notice`]: what happened, to which behaviour, and why
//! - [`Bus`]: thin wrapper over `tokio::sync::broadcast`
//!
//! Publishers are the registry, its per-behaviour state watchers and the
//! subscriber workers (overflow/panic). The registry fans every notice out to
//! its [`SubscriberSet`](crate::SubscriberSet).

mod bus;
mod notice;

pub use bus::Bus;
pub use notice::{Notice, NoticeKind};
