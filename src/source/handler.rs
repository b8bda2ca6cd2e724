use async_trait::async_trait;

use super::SourceEvent;
use crate::core::UnitOfWork;
use crate::outcome::Outcome;

/// # Processes events for one behaviour.
///
/// `handle` runs on its own task inside a fresh [`UnitOfWork`]; returning
/// `Err` (or panicking) rolls the unit of work back and terminates the
/// owning behaviour once the failure is observed.
///
/// `on_starting` / `on_stopping` run on the lifecycle caller's task, before
/// subscribing and after unsubscribing respectively.
#[async_trait]
pub trait EventHandler<E: SourceEvent>: Send + Sync + 'static {
    /// Categories to subscribe to; one callback is installed per entry.
    fn categories(&self) -> Vec<E::Category>;

    /// Handles one event.
    async fn handle(&self, uow: UnitOfWork, event: E) -> Outcome;

    /// Runs before the behaviour subscribes to its source.
    async fn on_starting(&self) -> Outcome {
        Ok(())
    }

    /// Runs after the behaviour has unsubscribed from its source.
    async fn on_stopping(&self) -> Outcome {
        Ok(())
    }
}
