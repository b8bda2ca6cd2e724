//! Error types used by the behaviour runtime and its external boundaries.
//!
//! This module defines the typed errors raised outside of handler code:
//!
//! - [`TransactionError`]: failures opening, using or releasing a unit-of-work transaction.
//! - [`SourceError`]: failures subscribing to / unsubscribing from an event source.
//! - [`ProviderError`]: failures creating a dependency scope or resolving a service.
//! - [`RegistryError`]: failures reported by the behaviour registry.
//!
//! Handler-level failures are not errors of this module: they travel as
//! [`Failure`](crate::Failure) values. Every enum here converts into a `Failure`
//! so lifecycle faults surface through the same outcome surface.
//!
//! All enums provide `as_label` for logs/metrics.

use std::time::Duration;
use thiserror::Error;

use crate::outcome::Failure;

/// Marker cause attached to failures produced by cancellation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Cause attached to failures produced by a panicking handler or tick loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("handler panicked: {message}")]
pub struct HandlerPanic {
    /// Panic payload rendered as text.
    pub message: String,
}

/// # Errors produced by unit-of-work transactions.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// The transaction source could not open a new transaction.
    #[error("failed to begin transaction: {reason}")]
    Begin {
        /// Underlying reason.
        reason: String,
    },

    /// Committing the transaction failed; its effects were not applied.
    #[error("failed to commit transaction: {reason}")]
    Commit {
        /// Underlying reason.
        reason: String,
    },

    /// Rolling the transaction back failed.
    #[error("failed to roll back transaction: {reason}")]
    Rollback {
        /// Underlying reason.
        reason: String,
    },

    /// The unit of work was already committed or rolled back.
    #[error("unit of work already released")]
    Closed,

    /// The transaction is not of the requested concrete type.
    #[error("transaction is not a `{expected}`")]
    TypeMismatch {
        /// Requested type name.
        expected: &'static str,
    },
}

impl TransactionError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use behaviourd::TransactionError;
    ///
    /// let err = TransactionError::Closed;
    /// assert_eq!(err.as_label(), "transaction_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TransactionError::Begin { .. } => "transaction_begin",
            TransactionError::Commit { .. } => "transaction_commit",
            TransactionError::Rollback { .. } => "transaction_rollback",
            TransactionError::Closed => "transaction_closed",
            TransactionError::TypeMismatch { .. } => "transaction_type_mismatch",
        }
    }
}

/// # Errors produced by an event source while (un)subscribing callbacks.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The source refused a subscription for this category.
    #[error("subscribe to {category} rejected: {reason}")]
    Subscribe {
        /// Category debug name.
        category: String,
        /// Underlying reason.
        reason: String,
    },

    /// The subscription is unknown to the source.
    #[error("subscription {id} not found")]
    UnknownSubscription {
        /// Raw subscription id.
        id: u64,
    },

    /// The source has been shut down and accepts no more subscriptions.
    #[error("event source closed")]
    Closed,
}

impl SourceError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SourceError::Subscribe { .. } => "source_subscribe",
            SourceError::UnknownSubscription { .. } => "source_unknown_subscription",
            SourceError::Closed => "source_closed",
        }
    }
}

/// # Errors produced by the dependency provider boundary.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// No service of the requested type is registered.
    #[error("no service registered for `{type_name}`")]
    Missing {
        /// Requested type name.
        type_name: &'static str,
    },

    /// The scope was already disposed.
    #[error("service scope already disposed")]
    Disposed,

    /// A service or behaviour constructor failed.
    #[error("failed to construct `{type_name}`: {reason}")]
    Construct {
        /// Type being constructed.
        type_name: &'static str,
        /// Underlying reason.
        reason: String,
    },
}

impl ProviderError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProviderError::Missing { .. } => "provider_missing",
            ProviderError::Disposed => "provider_disposed",
            ProviderError::Construct { .. } => "provider_construct",
        }
    }
}

/// # Errors produced by the behaviour registry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Scope creation or behaviour construction failed; nothing was registered.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// One or more behaviours failed to start or stop.
    #[error("{} behaviour(s) failed: {}", .failures.len(), summarize(.failures))]
    Lifecycle {
        /// `(behaviour name, failure)` in registration order.
        failures: Vec<(String, Failure)>,
    },

    /// Shutdown grace period was exceeded for some behaviours.
    #[error("shutdown timeout {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// Grace applied to each stop.
        grace: Duration,
        /// Names of behaviours that did not stop in time.
        stuck: Vec<String>,
    },
}

impl RegistryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use behaviourd::RegistryError;
    /// use std::time::Duration;
    ///
    /// let err = RegistryError::GraceExceeded { grace: Duration::from_secs(5), stuck: vec![] };
    /// assert_eq!(err.as_label(), "registry_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::Provider(_) => "registry_provider",
            RegistryError::Lifecycle { .. } => "registry_lifecycle",
            RegistryError::GraceExceeded { .. } => "registry_grace_exceeded",
        }
    }
}

fn summarize(failures: &[(String, Failure)]) -> String {
    failures
        .iter()
        .map(|(name, f)| format!("{name}: {}", f.reason()))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<TransactionError> for Failure {
    fn from(err: TransactionError) -> Self {
        Failure::from_error(err)
    }
}

impl From<SourceError> for Failure {
    fn from(err: SourceError) -> Self {
        Failure::from_error(err)
    }
}

impl From<ProviderError> for Failure {
    fn from(err: ProviderError) -> Self {
        Failure::from_error(err)
    }
}
