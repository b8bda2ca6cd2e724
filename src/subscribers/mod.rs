//! # Notice subscribers.
//!
//! ```text
//! registry / state watchers ── publish(Notice) ──► Bus ──► listener ──► SubscriberSet
//!                                                                          ├──► LogWriter
//!                                                                          └──► custom ...
//! ```
//!
//! - [`Subscribe`]: extension point (`on_notice`)
//! - [`SubscriberSet`]: per-subscriber bounded queues with panic isolation
//! - `LogWriter` (feature `logging`): renders notices through `tracing`

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
