//! # Unit of work: one handler execution inside its own transaction.
//!
//! [`spawn_unit_of_work`] starts a handler on an independent tokio task,
//! wraps it in a freshly opened [`Transaction`] and converts every exit path
//! into an [`Outcome`].
//!
//! ## Exit paths
//! ```text
//! begin() ── Err ───────────────────────────────► Failure (handler not run)
//!    │
//!    └─ Ok ─► handler(uow)
//!               ├─ Ok(())  ──► commit()   ──► Ok / Failure(commit)
//!               ├─ Err(f)  ──► rollback() ──► Err(f) unchanged
//!               └─ panic   ──► rollback() ──► Failure(panic message)
//! ```
//!
//! ## Rules
//! - Every execution opens a **new** transaction; nothing is inherited from the caller.
//! - The transaction is released exactly once (commit **or** rollback).
//! - Rollback errors are logged and never replace the handler's failure.
//! - Panics never escape the spawned task.

use std::any::{Any, type_name};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{trace, warn};

use crate::core::dispatch::PendingExecution;
use crate::error::TransactionError;
use crate::outcome::{Failure, Outcome};

static UOW_SEQ: AtomicU64 = AtomicU64::new(0);

/// Transaction opened for a single unit of work.
///
/// Resource managers (store connections, outboxes, ...) implement this trait
/// and stage their effects until `commit`. Implementations should also roll
/// back in `Drop` when neither method was called.
#[async_trait]
pub trait Transaction: Any + Send {
    /// Applies all staged effects.
    async fn commit(self: Box<Self>) -> Result<(), TransactionError>;

    /// Discards all staged effects.
    async fn rollback(self: Box<Self>) -> Result<(), TransactionError>;

    /// Upcast used by [`UnitOfWork::with`] to reach the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Opens independent transactions.
#[async_trait]
pub trait TransactionSource: Send + Sync + 'static {
    /// Opens a new transaction, distinct from any other currently open.
    async fn begin(&self) -> Result<Box<dyn Transaction>, TransactionError>;
}

/// Transaction source for behaviours that touch no transactional resource.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTransactions;

struct NoopTransaction;

#[async_trait]
impl Transaction for NoopTransaction {
    async fn commit(self: Box<Self>) -> Result<(), TransactionError> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), TransactionError> {
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[async_trait]
impl TransactionSource for NoTransactions {
    async fn begin(&self) -> Result<Box<dyn Transaction>, TransactionError> {
        Ok(Box::new(NoopTransaction))
    }
}

/// Handle to the transaction of one handler execution.
///
/// Cloning is cheap; all clones refer to the same transaction. Once the
/// execution finishes the transaction is released and [`UnitOfWork::with`]
/// returns [`TransactionError::Closed`].
#[derive(Clone)]
pub struct UnitOfWork {
    id: u64,
    tx: Arc<Mutex<Option<Box<dyn Transaction>>>>,
}

impl UnitOfWork {
    fn new(tx: Box<dyn Transaction>) -> Self {
        Self {
            id: UOW_SEQ.fetch_add(1, Ordering::Relaxed) + 1,
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Process-unique id of this unit of work (starts at 1).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True while the transaction has been neither committed nor rolled back.
    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    /// Runs `f` against the concrete transaction type `T`.
    ///
    /// Fails with [`TransactionError::Closed`] after release, or
    /// [`TransactionError::TypeMismatch`] if the transaction is not a `T`.
    pub fn with<T, R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, TransactionError>
    where
        T: Transaction,
    {
        let mut guard = self.lock();
        let tx = guard.as_mut().ok_or(TransactionError::Closed)?;
        let concrete = tx
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or(TransactionError::TypeMismatch {
                expected: type_name::<T>(),
            })?;
        Ok(f(concrete))
    }

    fn take(&self) -> Option<Box<dyn Transaction>> {
        self.lock().take()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Box<dyn Transaction>>> {
        self.tx.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn commit(&self) -> Outcome {
        match self.take() {
            Some(tx) => tx.commit().await.map_err(Failure::from),
            None => Err(TransactionError::Closed.into()),
        }
    }

    async fn rollback(&self) {
        if let Some(tx) = self.take() {
            if let Err(e) = tx.rollback().await {
                warn!(uow = self.id, error = %e, "rollback failed");
            }
        }
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("id", &self.id)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Runs `handler` inside a new transaction on an independent task.
///
/// Returns immediately; the returned [`PendingExecution`] completes with the
/// execution's [`Outcome`].
pub fn spawn_unit_of_work<F, Fut>(
    transactions: Arc<dyn TransactionSource>,
    handler: F,
) -> PendingExecution
where
    F: FnOnce(UnitOfWork) -> Fut + Send + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    PendingExecution::spawn(run_unit_of_work(transactions, handler))
}

/// Executes one unit of work on the current task.
pub(crate) async fn run_unit_of_work<F, Fut>(
    transactions: Arc<dyn TransactionSource>,
    handler: F,
) -> Outcome
where
    F: FnOnce(UnitOfWork) -> Fut + Send + 'static,
    Fut: Future<Output = Outcome> + Send + 'static,
{
    let tx = match transactions.begin().await {
        Ok(tx) => tx,
        Err(e) => return Err(e.into()),
    };
    let uow = UnitOfWork::new(tx);
    trace!(uow = uow.id(), "unit of work started");

    // The handler is built inside the guarded future so a panic while
    // constructing it is contained as well.
    let handle = uow.clone();
    let guarded = AssertUnwindSafe(async move { handler(handle).await }).catch_unwind();

    match guarded.await {
        Ok(Ok(())) => uow.commit().await,
        Ok(Err(failure)) => {
            uow.rollback().await;
            Err(failure)
        }
        Err(panic) => {
            uow.rollback().await;
            Err(Failure::from_panic(panic))
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    /// Transaction source recording how each transaction was released.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub(crate) begun: AtomicUsize,
        pub(crate) committed: Arc<Mutex<Vec<String>>>,
        pub(crate) rolled_back: AtomicUsize,
        pub(crate) fail_begin: bool,
        pub(crate) fail_commit: bool,
    }

    pub(crate) struct Staged {
        pub(crate) writes: Vec<String>,
        committed: Arc<Mutex<Vec<String>>>,
        rolled_back: Arc<AtomicUsize>,
        fail_commit: bool,
    }

    #[async_trait]
    impl Transaction for Staged {
        async fn commit(self: Box<Self>) -> Result<(), TransactionError> {
            if self.fail_commit {
                return Err(TransactionError::Commit {
                    reason: "disk full".into(),
                });
            }
            self.committed.lock().unwrap().extend(self.writes);
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<(), TransactionError> {
            self.rolled_back.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    /// Wraps a [`Recorder`] and hands out [`Staged`] transactions.
    pub(crate) struct RecordingSource {
        pub(crate) recorder: Arc<Recorder>,
        rolled_back: Arc<AtomicUsize>,
    }

    impl RecordingSource {
        pub(crate) fn new(recorder: Recorder) -> Self {
            Self {
                recorder: Arc::new(recorder),
                rolled_back: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub(crate) fn committed(&self) -> Vec<String> {
            self.recorder.committed.lock().unwrap().clone()
        }

        pub(crate) fn rollbacks(&self) -> usize {
            self.rolled_back.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TransactionSource for RecordingSource {
        async fn begin(&self) -> Result<Box<dyn Transaction>, TransactionError> {
            if self.recorder.fail_begin {
                return Err(TransactionError::Begin {
                    reason: "pool exhausted".into(),
                });
            }
            self.recorder.begun.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(Staged {
                writes: Vec::new(),
                committed: self.recorder.committed.clone(),
                rolled_back: self.rolled_back.clone(),
                fail_commit: self.recorder.fail_commit,
            }))
        }
    }

    fn write(uow: &UnitOfWork, value: &str) -> Outcome {
        uow.with(|tx: &mut Staged| tx.writes.push(value.to_string()))
            .map_err(Failure::from)
    }

    #[tokio::test]
    async fn test_success_commits_staged_writes() {
        let src = Arc::new(RecordingSource::new(Recorder::default()));
        let res = run_unit_of_work(src.clone(), |uow| async move {
            write(&uow, "a")?;
            write(&uow, "b")?;
            Ok(())
        })
        .await;

        assert!(res.is_ok());
        assert_eq!(src.committed(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(src.rollbacks(), 0);
    }

    #[tokio::test]
    async fn test_failure_rolls_back_and_is_returned_unchanged() {
        let src = Arc::new(RecordingSource::new(Recorder::default()));
        let res = run_unit_of_work(src.clone(), |uow| async move {
            write(&uow, "half")?;
            Err(Failure::new("validation failed"))
        })
        .await;

        assert_eq!(res.unwrap_err().reason(), "validation failed");
        assert!(src.committed().is_empty());
        assert_eq!(src.rollbacks(), 1);
    }

    #[tokio::test]
    async fn test_panic_is_contained_and_rolled_back() {
        let src = Arc::new(RecordingSource::new(Recorder::default()));
        let res = run_unit_of_work(src.clone(), |uow| async move {
            write(&uow, "never")?;
            panic!("handler exploded");
        })
        .await;

        let failure = res.unwrap_err();
        assert_eq!(failure.reason(), "handler exploded");
        assert!(failure.is_panic());
        assert!(src.committed().is_empty());
        assert_eq!(src.rollbacks(), 1);
    }

    #[tokio::test]
    async fn test_begin_failure_skips_handler() {
        let src = Arc::new(RecordingSource::new(Recorder {
            fail_begin: true,
            ..Recorder::default()
        }));
        let ran = Arc::new(AtomicUsize::new(0));
        let ran2 = ran.clone();
        let res = run_unit_of_work(src, move |_uow| async move {
            ran2.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(res.unwrap_err().reason().contains("pool exhausted"));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_commit_failure_surfaces() {
        let src = Arc::new(RecordingSource::new(Recorder {
            fail_commit: true,
            ..Recorder::default()
        }));
        let res = run_unit_of_work(src.clone(), |uow| async move { write(&uow, "x") }).await;

        assert!(res.unwrap_err().reason().contains("disk full"));
        assert!(src.committed().is_empty());
    }

    #[tokio::test]
    async fn test_each_execution_gets_its_own_transaction() {
        let src = Arc::new(RecordingSource::new(Recorder::default()));
        let a = run_unit_of_work(src.clone(), |uow| async move { write(&uow, "a") });
        let b = run_unit_of_work(src.clone(), |uow| async move {
            write(&uow, "b")?;
            Err(Failure::new("b failed"))
        });
        let (ra, rb) = tokio::join!(a, b);

        assert!(ra.is_ok());
        assert!(rb.is_err());
        assert_eq!(src.recorder.begun.load(Ordering::SeqCst), 2);
        assert_eq!(src.committed(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_leaked_handle_is_closed_after_release() {
        let leaked = Arc::new(Mutex::new(None));
        let slot = leaked.clone();
        let res = run_unit_of_work(Arc::new(NoTransactions), move |uow| async move {
            *slot.lock().unwrap() = Some(uow);
            Ok(())
        })
        .await;
        assert!(res.is_ok());

        let uow = leaked.lock().unwrap().take().unwrap();
        assert!(!uow.is_open());
        let err = uow.with(|_tx: &mut NoopTransaction| ()).unwrap_err();
        assert_eq!(err, TransactionError::Closed);
    }

    #[tokio::test]
    async fn test_type_mismatch() {
        let res = run_unit_of_work(Arc::new(NoTransactions), |uow| async move {
            match uow.with(|_tx: &mut Staged| ()) {
                Err(TransactionError::TypeMismatch { .. }) => Ok(()),
                other => Err(Failure::new(format!("unexpected: {other:?}"))),
            }
        })
        .await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn test_spawned_execution_runs_independently() {
        let exec = spawn_unit_of_work(Arc::new(NoTransactions), |_uow| async { Ok(()) });
        let res = exec.join().await;
        assert!(res.is_ok());
    }
}
