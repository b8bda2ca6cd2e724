//! # Outcome of every asynchronous engine operation.
//!
//! [`Outcome`] is `Result<(), Failure>`: success carries nothing, failure
//! carries a [`Failure`] with a human-readable reason and an optional cause.
//!
//! ## Rules
//! - A `Failure` always has a non-empty reason (empty input is replaced).
//! - A `Failure` is immutable and cheap to clone (the cause is shared).
//!
//! ## Example
//! ```rust
//! use behaviourd::{Failure, Outcome};
//!
//! fn check(n: u32) -> Outcome {
//!     if n == 0 {
//!         return Err(Failure::new("zero is not allowed"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(1).is_ok());
//! assert_eq!(check(0).unwrap_err().reason(), "zero is not allowed");
//! ```

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::error::{Cancelled, HandlerPanic};

/// Result of a handler execution or lifecycle operation.
pub type Outcome<T = ()> = Result<T, Failure>;

/// Shared, type-erased failure cause.
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

const UNSPECIFIED: &str = "unspecified failure";

/// Failed outcome: a reason and an optional underlying cause.
#[derive(Clone)]
pub struct Failure {
    reason: String,
    cause: Option<Cause>,
}

impl Failure {
    /// Creates a failure with the given reason and no cause.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: non_empty(reason.into()),
            cause: None,
        }
    }

    /// Creates a failure with a reason and an underlying cause.
    pub fn with_cause<E>(reason: impl Into<String>, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            reason: non_empty(reason.into()),
            cause: Some(Arc::new(cause)),
        }
    }

    /// Creates a failure whose reason is the error's message and whose cause is the error.
    pub fn from_error<E>(err: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        let reason = err.to_string();
        Self::with_cause(reason, err)
    }

    /// Failure reported when a wait was interrupted by cancellation.
    pub fn cancelled() -> Self {
        Self::from_error(Cancelled)
    }

    /// Converts a caught panic payload into a failure.
    ///
    /// `&'static str` and `String` payloads keep their message; anything else
    /// becomes `"unknown panic"`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        Self::with_cause(message.clone(), HandlerPanic { message })
    }

    /// Human-readable reason; never empty.
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Underlying cause, if any.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// True if this failure was produced by cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.cause.as_ref().is_some_and(|c| c.is::<Cancelled>())
    }

    /// True if this failure was produced by a caught panic.
    pub fn is_panic(&self) -> bool {
        self.cause.as_ref().is_some_and(|c| c.is::<HandlerPanic>())
    }
}

fn non_empty(reason: String) -> String {
    if reason.trim().is_empty() {
        UNSPECIFIED.to_string()
    } else {
        reason
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("reason", &self.reason)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

impl Error for Failure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransactionError;

    #[test]
    fn test_empty_reason_is_replaced() {
        assert_eq!(Failure::new("").reason(), UNSPECIFIED);
        assert_eq!(Failure::new("   ").reason(), UNSPECIFIED);
        assert_eq!(Failure::new("boom").reason(), "boom");
    }

    #[test]
    fn test_from_error_keeps_cause() {
        let f = Failure::from_error(TransactionError::Closed);
        assert_eq!(f.reason(), "unit of work already released");
        assert!(f.cause().is_some());
        assert!(f.source().is_some());
        assert!(!f.is_cancelled());
    }

    #[test]
    fn test_cancelled_is_detected() {
        let f = Failure::cancelled();
        assert!(f.is_cancelled());
        assert!(!f.is_panic());
        assert_eq!(f.reason(), "operation cancelled");
    }

    #[test]
    fn test_panic_payloads() {
        let f = Failure::from_panic(Box::new("static message"));
        assert_eq!(f.reason(), "static message");
        assert!(f.is_panic());

        let f = Failure::from_panic(Box::new(String::from("owned message")));
        assert_eq!(f.reason(), "owned message");

        let f = Failure::from_panic(Box::new(42u8));
        assert_eq!(f.reason(), "unknown panic");
    }

    #[test]
    fn test_clone_shares_cause() {
        let f = Failure::with_cause("wrapped", TransactionError::Closed);
        let g = f.clone();
        assert_eq!(g.reason(), "wrapped");
        assert_eq!(
            g.cause().map(|c| c.to_string()),
            Some("unit of work already released".to_string())
        );
    }
}
