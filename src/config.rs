//! # Runtime configuration.
//!
//! Provides [`Config`] centralized settings for behaviours and the registry.
//!
//! Config is used in two ways:
//! 1. **Registry creation**: `BehaviourRegistry::builder(config)`
//! 2. **Behaviour construction**: factories read `tick_interval` when building
//!    an [`EventBehaviour`](crate::EventBehaviour) (usually resolved from the scope).
//!
//! ## Sentinel values
//! - `tick_interval` below 1ms is clamped to 1ms
//! - `bus_capacity = 0` is clamped to 1

use std::time::Duration;

/// Interval between two reap attempts of a running behaviour.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Global configuration for behaviours and their registry.
///
/// ## Field semantics
/// - `tick_interval`: sleep between two `try_reap_one` calls of a behaviour's tick loop
/// - `grace`: maximum wait for one behaviour to stop during registry shutdown
/// - `bus_capacity`: notice bus ring buffer size (min 1; clamped by Bus)
#[derive(Clone, Debug)]
pub struct Config {
    /// Fixed interval of the tick loop.
    ///
    /// Each tick observes at most one finished handler execution, so with `N`
    /// executions outstanding it can take `N` ticks to observe a given one.
    pub tick_interval: Duration,

    /// Maximum time to wait for each behaviour to stop during shutdown.
    ///
    /// Behaviours that do not stop in time are reported in
    /// `RegistryError::GraceExceeded`.
    pub grace: Duration,

    /// Capacity of the notice bus broadcast channel ring buffer.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the tick interval clamped to a minimum of 1ms.
    #[inline]
    pub fn tick_interval_clamped(&self) -> Duration {
        self.tick_interval.max(Duration::from_millis(1))
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `tick_interval = 200ms`
    /// - `grace = 10s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            grace: Duration::from_secs(10),
            bus_capacity: 1024,
        }
    }
}
