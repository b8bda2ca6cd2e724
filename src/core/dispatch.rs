//! # Dispatch queue: in-flight handler executions awaiting observation.
//!
//! Producers (event callbacks) push already-running [`PendingExecution`]s
//! through cloneable [`Enqueuer`]s; the single consumer (a behaviour's tick
//! loop) owns the [`DispatchQueue`] and observes at most one completion per
//! [`DispatchQueue::try_reap_one`] call.
//!
//! ## Architecture
//! ```text
//! callback 1 ──┐
//! callback 2 ──┼── Enqueuer::enqueue ──► unbounded mpsc ──┐
//! callback N ──┘     (never blocks)                        ▼
//!                                            tick loop: try_reap_one()
//!                                              ├─ pull arrivals to tail
//!                                              ├─ pop head
//!                                              ├─ finished? ─ Ok  ─► Completed
//!                                              │            └ Err ─► Failed(f)
//!                                              └─ running?  ──────► push tail, Rotated
//! ```
//!
//! ## Rules
//! - `enqueue` is safe from any number of producers and never blocks.
//! - `try_reap_one` never awaits; it only inspects the head.
//! - Each execution is reaped **at most once**; nothing is dropped while the queue lives.
//! - A head that never finishes rotates to the tail, so items behind it still get reaped.
//! - Completion observation is unordered; handler execution is fully concurrent.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::trace;

use crate::outcome::{Failure, Outcome};

/// One running handler execution, owned by the dispatch queue until reaped.
#[derive(Debug)]
pub struct PendingExecution {
    handle: JoinHandle<Outcome>,
}

impl PendingExecution {
    /// Spawns `fut` on the tokio runtime and tracks its outcome.
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(fut),
        }
    }

    /// True once the execution has produced its outcome (or panicked / was aborted).
    pub fn is_complete(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the outcome. Panics and aborts become failures.
    pub async fn join(self) -> Outcome {
        flatten(self.handle.await)
    }

    /// Takes the outcome without waiting; `None` while still running.
    fn try_take(&mut self) -> Option<Outcome> {
        tokio::task::unconstrained(&mut self.handle)
            .now_or_never()
            .map(flatten)
    }
}

fn flatten(res: Result<Outcome, JoinError>) -> Outcome {
    match res {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => Err(Failure::from_panic(e.into_panic())),
        Err(e) => Err(Failure::with_cause("handler execution aborted", e)),
    }
}

/// Result of one reap attempt.
#[derive(Debug, Clone)]
pub enum Reap {
    /// Nothing was queued.
    Empty,
    /// The head had finished successfully and was discarded.
    Completed,
    /// The head was still running and moved to the tail.
    Rotated,
    /// The head had finished with a failure and was discarded.
    Failed(Failure),
}

impl Reap {
    /// Returns the failure if this reap observed one.
    pub fn into_failure(self) -> Option<Failure> {
        match self {
            Reap::Failed(f) => Some(f),
            _ => None,
        }
    }

    /// True for every result other than [`Reap::Failed`].
    pub fn is_idle(&self) -> bool {
        !matches!(self, Reap::Failed(_))
    }
}

/// Producer side of a [`DispatchQueue`].
///
/// Cheap to clone; every clone appends to the same queue.
#[derive(Clone, Debug)]
pub struct Enqueuer {
    tx: mpsc::UnboundedSender<PendingExecution>,
    pending: Arc<AtomicUsize>,
}

impl Enqueuer {
    /// Appends `execution` to the tail of the queue without blocking.
    ///
    /// Returns `false` if the queue was dropped; the execution then keeps
    /// running detached and its outcome is never observed.
    pub fn enqueue(&self, execution: PendingExecution) -> bool {
        self.pending.fetch_add(1, Ordering::AcqRel);
        match self.tx.send(execution) {
            Ok(()) => {
                trace!("execution enqueued");
                true
            }
            Err(_closed) => {
                self.pending.fetch_sub(1, Ordering::AcqRel);
                false
            }
        }
    }
}

/// Consumer side: FIFO of pending executions with round-robin reaping.
#[derive(Debug)]
pub struct DispatchQueue {
    rx: mpsc::UnboundedReceiver<PendingExecution>,
    local: VecDeque<PendingExecution>,
    enqueuer: Enqueuer,
}

impl DispatchQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            rx,
            local: VecDeque::new(),
            enqueuer: Enqueuer {
                tx,
                pending: Arc::new(AtomicUsize::new(0)),
            },
        }
    }

    /// Returns a producer handle for this queue.
    pub fn enqueuer(&self) -> Enqueuer {
        self.enqueuer.clone()
    }

    /// Number of executions enqueued and not yet reaped.
    pub fn len(&self) -> usize {
        self.enqueuer.pending.load(Ordering::Acquire)
    }

    /// True if no execution is waiting to be reaped.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inspects the head of the queue once.
    ///
    /// 1. Empty queue → [`Reap::Empty`].
    /// 2. Head finished with success → discarded, [`Reap::Completed`].
    /// 3. Head finished with failure → discarded, [`Reap::Failed`].
    /// 4. Head still running → re-appended to the tail, [`Reap::Rotated`].
    pub fn try_reap_one(&mut self) -> Reap {
        while let Ok(execution) = self.rx.try_recv() {
            self.local.push_back(execution);
        }

        let Some(mut head) = self.local.pop_front() else {
            return Reap::Empty;
        };

        let outcome = if head.is_complete() {
            head.try_take()
        } else {
            None
        };

        match outcome {
            None => {
                self.local.push_back(head);
                Reap::Rotated
            }
            Some(Ok(())) => {
                self.enqueuer.pending.fetch_sub(1, Ordering::AcqRel);
                Reap::Completed
            }
            Some(Err(failure)) => {
                self.enqueuer.pending.fetch_sub(1, Ordering::AcqRel);
                Reap::Failed(failure)
            }
        }
    }

    /// Drops the queue without observing the remaining executions.
    ///
    /// The executions keep running to completion; their outcomes are lost.
    /// Returns how many were abandoned.
    pub fn abandon(mut self) -> usize {
        self.rx.close();
        while let Ok(execution) = self.rx.try_recv() {
            self.local.push_back(execution);
        }
        self.local.len()
    }
}

impl Default for DispatchQueue {
    fn default() -> Self {
        Self::new()
    }
}
