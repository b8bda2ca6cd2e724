//! # EventBehaviour: event-driven behaviour with a tick loop.
//!
//! Bridges a push-based [`EventSource`] to transactional handler executions.
//! Every event becomes a [`spawn_unit_of_work`] execution that is pushed into
//! the behaviour's [`DispatchQueue`]; a tick loop reaps at most one finished
//! execution per tick and terminates the behaviour on the first failure it
//! observes.
//!
//! ## Architecture
//! ```text
//! source ──callback──► spawn_unit_of_work ──► Enqueuer ──► DispatchQueue
//!                                                              │
//! tick loop (every tick_interval):                             ▼
//!   ├─► try_reap_one()
//!   │     ├─ Failed(f) ─► Stopping ─► unsubscribe ─► on_stopping ─► Faulted
//!   │     └─ otherwise ─► sleep(tick_interval) (cancellable)
//!   └─► cancelled ─► exit (stop owns teardown, or parent cancel → Stopped)
//! ```
//!
//! ## Rules
//! - `start` and `stop` are serialized per behaviour.
//! - Teardown runs exactly once per run: whoever takes the run slot owns it.
//! - Executions still queued at teardown are abandoned: they finish, but
//!   their outcomes are never observed.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::{runtime, select, time};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::DEFAULT_TICK_INTERVAL;
use crate::core::behaviour::{Behaviour, BehaviourState};
use crate::core::dispatch::{DispatchQueue, Reap};
use crate::core::unit_of_work::{NoTransactions, TransactionSource, spawn_unit_of_work};
use crate::outcome::{Failure, Outcome};
use crate::source::{Callback, EventHandler, EventSource, SourceEvent, SubscriptionId};

/// Active run of a behaviour: subscriptions plus its tick loop.
struct Run {
    token: CancellationToken,
    subscriptions: Vec<SubscriptionId>,
    ticker: Option<JoinHandle<()>>,
}

/// State reachable from the tick loop.
struct Shared<E: SourceEvent> {
    name: String,
    source: Arc<dyn EventSource<E>>,
    handler: Arc<dyn EventHandler<E>>,
    state: watch::Sender<BehaviourState>,
    last_failure: Mutex<Option<Failure>>,
    run: Mutex<Option<Run>>,
}

impl<E: SourceEvent> Shared<E> {
    fn set_state(&self, next: BehaviourState) {
        let prev = self.state.send_replace(next);
        if prev != next {
            debug!(behaviour = %self.name, from = %prev, to = %next, "state changed");
        }
    }

    fn record_failure(&self, failure: Failure) {
        *lock(&self.last_failure) = Some(failure);
    }

    /// Claims teardown of the active run and enters `Stopping`.
    ///
    /// The state changes under the run lock, so a caller that finds no run
    /// always observes `Stopping` or a terminal state.
    fn begin_teardown(&self) -> Option<Run> {
        let mut slot = lock(&self.run);
        let run = slot.take()?;
        self.set_state(BehaviourState::Stopping);
        Some(run)
    }

    /// Waits until an ongoing teardown owned by the tick loop settles.
    async fn settled(&self) {
        if *self.state.borrow() == BehaviourState::Stopping {
            let mut rx = self.state.subscribe();
            let _ = rx.wait_for(|s| s.is_terminal()).await;
        }
    }

    /// Removes every subscription; returns the first failure, if any.
    fn unsubscribe_all(&self, subscriptions: Vec<SubscriptionId>) -> Outcome {
        let mut first = None;
        for id in subscriptions {
            if let Err(e) = self.source.unsubscribe(id) {
                warn!(behaviour = %self.name, subscription = %id, error = %e, "unsubscribe failed");
                first.get_or_insert(Failure::from(e));
            }
        }
        first.map_or(Ok(()), Err)
    }

    async fn on_stopping(&self) -> Outcome {
        let hook = AssertUnwindSafe(self.handler.on_stopping()).catch_unwind().await;
        hook.unwrap_or_else(|panic| Err(Failure::from_panic(panic)))
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

/// # Behaviour driven by an external event source.
///
/// Built from a name, a source and an [`EventHandler`]:
///
/// ```rust
/// # use std::sync::Arc;
/// # use async_trait::async_trait;
/// # use behaviourd::source::{EventHandler, EventHub, EventSource, SourceEvent};
/// # use behaviourd::{EventBehaviour, Outcome, UnitOfWork};
/// # #[derive(Clone)] struct Tick;
/// # impl SourceEvent for Tick { type Category = (); fn category(&self) {} }
/// # struct Count;
/// # #[async_trait]
/// # impl EventHandler<Tick> for Count {
/// #     fn categories(&self) -> Vec<()> { vec![()] }
/// #     async fn handle(&self, _uow: UnitOfWork, _ev: Tick) -> Outcome { Ok(()) }
/// # }
/// let hub = Arc::new(EventHub::<Tick>::new());
/// let behaviour = EventBehaviour::new("counter", hub.clone(), Count)
///     .with_tick_interval(std::time::Duration::from_millis(50));
/// ```
///
/// ### Transitions
/// - `start`: Idle/Stopped/Faulted → Starting → Running (or Faulted on error).
/// - `stop`: Running → Stopping → Stopped.
/// - reaped failure or tick loop panic: Running → Stopping → Faulted.
/// - parent token cancelled: Running → Stopping → Stopped.
pub struct EventBehaviour<E: SourceEvent> {
    shared: Arc<Shared<E>>,
    transactions: Arc<dyn TransactionSource>,
    tick_interval: Duration,
    parent: CancellationToken,
    lifecycle: tokio::sync::Mutex<()>,
}

impl<E: SourceEvent> EventBehaviour<E> {
    /// Creates an idle behaviour without transactions, ticking every 200ms.
    pub fn new<S, H>(name: impl Into<String>, source: Arc<S>, handler: H) -> Self
    where
        S: EventSource<E>,
        H: EventHandler<E>,
    {
        Self::from_parts(name, source, Arc::new(handler))
    }

    /// Creates an idle behaviour from already shared parts.
    pub fn from_parts(
        name: impl Into<String>,
        source: Arc<dyn EventSource<E>>,
        handler: Arc<dyn EventHandler<E>>,
    ) -> Self {
        let (state, _) = watch::channel(BehaviourState::Idle);
        Self {
            shared: Arc::new(Shared {
                name: name.into(),
                source,
                handler,
                state,
                last_failure: Mutex::new(None),
                run: Mutex::new(None),
            }),
            transactions: Arc::new(NoTransactions),
            tick_interval: DEFAULT_TICK_INTERVAL,
            parent: CancellationToken::new(),
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }

    /// Opens every unit of work from `transactions`.
    pub fn with_transactions(mut self, transactions: Arc<dyn TransactionSource>) -> Self {
        self.transactions = transactions;
        self
    }

    /// Sets the tick interval (minimum 1ms).
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Ties every run to `parent`: cancelling it stops the behaviour.
    pub fn with_parent_token(mut self, parent: CancellationToken) -> Self {
        self.parent = parent;
        self
    }

    /// Configured tick interval.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    fn fault(&self, failure: Failure) -> Outcome {
        warn!(behaviour = %self.shared.name, reason = %failure, "behaviour failed to start");
        self.shared.record_failure(failure.clone());
        self.shared.set_state(BehaviourState::Faulted);
        Err(failure)
    }

    fn subscribe_all(&self, queue: &DispatchQueue) -> Result<Vec<SubscriptionId>, Failure> {
        let shared = &self.shared;
        // Callbacks may fire on threads outside the runtime.
        let rt = runtime::Handle::current();
        let mut seen = HashSet::new();
        let mut subscriptions = Vec::new();

        for category in shared.handler.categories() {
            if !seen.insert(category) {
                continue;
            }
            let callback: Callback<E> = {
                let enqueuer = queue.enqueuer();
                let handler = Arc::clone(&shared.handler);
                let transactions = Arc::clone(&self.transactions);
                let rt = rt.clone();
                Arc::new(move |event: E| {
                    let _guard = rt.enter();
                    let handler = Arc::clone(&handler);
                    let execution = spawn_unit_of_work(Arc::clone(&transactions), move |uow| {
                        async move { handler.handle(uow, event).await }
                    });
                    if !enqueuer.enqueue(execution) {
                        trace!("event arrived after teardown; outcome dropped");
                    }
                })
            };

            match shared.source.subscribe(category, callback) {
                Ok(id) => {
                    trace!(behaviour = %shared.name, ?category, subscription = %id, "subscribed");
                    subscriptions.push(id);
                }
                Err(e) => {
                    let _ = shared.unsubscribe_all(subscriptions);
                    return Err(Failure::from(e));
                }
            }
        }
        Ok(subscriptions)
    }
}

#[async_trait]
impl<E: SourceEvent> Behaviour for EventBehaviour<E> {
    fn name(&self) -> &str {
        &self.shared.name
    }

    fn state(&self) -> BehaviourState {
        *self.shared.state.borrow()
    }

    fn watch_state(&self) -> watch::Receiver<BehaviourState> {
        self.shared.state.subscribe()
    }

    fn last_failure(&self) -> Option<Failure> {
        lock(&self.shared.last_failure).clone()
    }

    async fn start(&self) -> Outcome {
        let _serial = self.lifecycle.lock().await;
        self.shared.settled().await;
        if !self.state().is_startable() {
            return Ok(());
        }

        let shared = &self.shared;
        shared.set_state(BehaviourState::Starting);
        *lock(&shared.last_failure) = None;

        let hook = AssertUnwindSafe(shared.handler.on_starting())
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(Failure::from_panic(panic)));
        if let Err(failure) = hook {
            return self.fault(failure);
        }

        let queue = DispatchQueue::new();
        let subscriptions = match self.subscribe_all(&queue) {
            Ok(subs) => subs,
            Err(failure) => return self.fault(failure),
        };

        let token = self.parent.child_token();
        let count = subscriptions.len();
        *lock(&shared.run) = Some(Run {
            token: token.clone(),
            subscriptions,
            ticker: None,
        });
        shared.set_state(BehaviourState::Running);

        let ticker = tokio::spawn(tick_loop(
            Arc::clone(shared),
            queue,
            token,
            self.tick_interval,
        ));
        if let Some(run) = lock(&shared.run).as_mut() {
            run.ticker = Some(ticker);
        }

        info!(behaviour = %shared.name, subscriptions = count, "behaviour running");
        Ok(())
    }

    async fn stop(&self) -> Outcome {
        let _serial = self.lifecycle.lock().await;
        let shared = &self.shared;

        let Some(mut run) = shared.begin_teardown() else {
            shared.settled().await;
            return Ok(());
        };

        let unsubscribed = shared.unsubscribe_all(std::mem::take(&mut run.subscriptions));

        run.token.cancel();
        if let Some(ticker) = run.ticker.take() {
            if let Err(e) = ticker.await {
                warn!(behaviour = %shared.name, error = %e, "tick loop ended abnormally");
            }
        }

        let hook = shared.on_stopping().await;
        shared.set_state(BehaviourState::Stopped);
        info!(behaviour = %shared.name, "behaviour stopped");
        unsubscribed.and(hook)
    }
}

/// Reaps one execution per tick until a failure is observed or `token` is cancelled.
async fn run_ticks(
    queue: &mut DispatchQueue,
    token: &CancellationToken,
    interval: Duration,
) -> Failure {
    loop {
        match queue.try_reap_one() {
            Reap::Failed(failure) => return failure,
            Reap::Completed => trace!(pending = queue.len(), "execution reaped"),
            Reap::Rotated => trace!(pending = queue.len(), "head still running; rotated"),
            Reap::Empty => {}
        }

        select! {
            _ = time::sleep(interval) => {}
            _ = token.cancelled() => return Failure::cancelled(),
        }
    }
}

fn abandon(name: &str, queue: DispatchQueue) {
    let abandoned = queue.abandon();
    if abandoned > 0 {
        debug!(behaviour = %name, abandoned, "unreaped executions abandoned");
    }
}

async fn tick_loop<E: SourceEvent>(
    shared: Arc<Shared<E>>,
    mut queue: DispatchQueue,
    token: CancellationToken,
    interval: Duration,
) {
    let ended = AssertUnwindSafe(run_ticks(&mut queue, &token, interval))
        .catch_unwind()
        .await
        .unwrap_or_else(Failure::from_panic);

    let Some(run) = shared.begin_teardown() else {
        // stop() owns the teardown.
        abandon(&shared.name, queue);
        if !ended.is_cancelled() {
            warn!(behaviour = %shared.name, reason = %ended, "failure observed during stop");
        }
        return;
    };

    let terminal = if ended.is_cancelled() {
        info!(behaviour = %shared.name, "behaviour cancelled");
        BehaviourState::Stopped
    } else {
        warn!(behaviour = %shared.name, reason = %ended, "behaviour faulted");
        BehaviourState::Faulted
    };

    run.token.cancel();
    let _ = shared.unsubscribe_all(run.subscriptions);
    abandon(&shared.name, queue);
    if let Err(e) = shared.on_stopping().await {
        warn!(behaviour = %shared.name, reason = %e, "on_stopping failed");
    }
    shared.record_failure(ended);
    shared.set_state(terminal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::unit_of_work::tests::{Recorder, RecordingSource, Staged};
    use crate::core::UnitOfWork;
    use crate::error::SourceError;
    use crate::source::EventHub;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug)]
    enum Ping {
        Num(u32),
        Other,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum PingKind {
        Num,
        Other,
    }

    impl SourceEvent for Ping {
        type Category = PingKind;

        fn category(&self) -> PingKind {
            match self {
                Ping::Num(_) => PingKind::Num,
                Ping::Other => PingKind::Other,
            }
        }
    }

    /// Fails on 13, panics on 66, records everything else.
    #[derive(Default)]
    struct Probe {
        seen: Mutex<Vec<u32>>,
        stopping: AtomicUsize,
        fail_starting: bool,
        slow_stopping: bool,
    }

    #[async_trait]
    impl EventHandler<Ping> for Probe {
        fn categories(&self) -> Vec<PingKind> {
            vec![PingKind::Num, PingKind::Other, PingKind::Num]
        }

        async fn handle(&self, uow: UnitOfWork, event: Ping) -> Outcome {
            let Ping::Num(n) = event else {
                return Ok(());
            };
            match n {
                13 => Err(Failure::new("unlucky")),
                66 => panic!("handler exploded"),
                _ => {
                    let _ = uow.with::<Staged, _>(|tx| tx.writes.push(format!("n={n}")));
                    self.seen.lock().unwrap().push(n);
                    Ok(())
                }
            }
        }

        async fn on_starting(&self) -> Outcome {
            if self.fail_starting {
                return Err(Failure::new("not ready"));
            }
            Ok(())
        }

        async fn on_stopping(&self) -> Outcome {
            if self.slow_stopping {
                time::sleep(Duration::from_secs(1)).await;
            }
            self.stopping.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn setup(probe: Probe) -> (Arc<EventHub<Ping>>, Arc<Probe>, EventBehaviour<Ping>) {
        let hub = Arc::new(EventHub::<Ping>::new());
        let probe = Arc::new(probe);
        let behaviour = EventBehaviour::from_parts("probe", hub.clone(), probe.clone());
        (hub, probe, behaviour)
    }

    async fn settle(behaviour: &EventBehaviour<Ping>, want: BehaviourState) {
        let mut rx = behaviour.watch_state();
        time::timeout(Duration::from_secs(5), rx.wait_for(|s| *s == want))
            .await
            .expect("state not reached")
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_subscribes_and_stop_unsubscribes() {
        let (hub, probe, behaviour) = setup(Probe::default());

        behaviour.start().await.unwrap();
        assert_eq!(behaviour.state(), BehaviourState::Running);
        assert_eq!(hub.subscriber_count(PingKind::Num), 1);
        assert_eq!(hub.subscriber_count(PingKind::Other), 1);

        behaviour.stop().await.unwrap();
        assert_eq!(behaviour.state(), BehaviourState::Stopped);
        assert_eq!(hub.total_subscribers(), 0);
        assert_eq!(probe.stopping.load(Ordering::SeqCst), 1);
        assert!(behaviour.last_failure().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stop_are_idempotent() {
        let (hub, probe, behaviour) = setup(Probe::default());

        behaviour.stop().await.unwrap();
        assert_eq!(behaviour.state(), BehaviourState::Idle);

        behaviour.start().await.unwrap();
        behaviour.start().await.unwrap();
        assert_eq!(hub.total_subscribers(), 2);

        behaviour.stop().await.unwrap();
        behaviour.stop().await.unwrap();
        assert_eq!(behaviour.state(), BehaviourState::Stopped);
        assert_eq!(probe.stopping.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_events_keep_running() {
        let (hub, probe, behaviour) = setup(Probe::default());
        behaviour.start().await.unwrap();

        for n in 1..=3 {
            hub.publish(Ping::Num(n));
        }
        hub.publish(Ping::Other);
        time::sleep(Duration::from_secs(2)).await;

        assert_eq!(behaviour.state(), BehaviourState::Running);
        let mut seen = probe.seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3]);
        behaviour.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaped_failure_faults_behaviour() {
        let (hub, probe, behaviour) = setup(Probe::default());
        behaviour.start().await.unwrap();

        hub.publish(Ping::Num(1));
        hub.publish(Ping::Num(13));
        settle(&behaviour, BehaviourState::Faulted).await;

        assert_eq!(behaviour.last_failure().unwrap().reason(), "unlucky");
        assert_eq!(hub.total_subscribers(), 0);
        assert_eq!(probe.stopping.load(Ordering::SeqCst), 1);

        // Already terminal: stop is a no-op.
        behaviour.stop().await.unwrap();
        assert_eq!(behaviour.state(), BehaviourState::Faulted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_handler_panic_faults_behaviour() {
        let (hub, _probe, behaviour) = setup(Probe::default());
        behaviour.start().await.unwrap();

        hub.publish(Ping::Num(66));
        settle(&behaviour, BehaviourState::Faulted).await;

        let failure = behaviour.last_failure().unwrap();
        assert!(failure.is_panic());
        assert!(failure.reason().contains("handler exploded"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_fault() {
        let (hub, probe, behaviour) = setup(Probe::default());
        behaviour.start().await.unwrap();
        hub.publish(Ping::Num(13));
        settle(&behaviour, BehaviourState::Faulted).await;

        behaviour.start().await.unwrap();
        assert_eq!(behaviour.state(), BehaviourState::Running);
        assert!(behaviour.last_failure().is_none());

        hub.publish(Ping::Num(7));
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*probe.seen.lock().unwrap(), vec![7]);
        behaviour.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_during_fault_teardown_restarts() {
        let (hub, probe, behaviour) = setup(Probe {
            slow_stopping: true,
            ..Probe::default()
        });
        behaviour.start().await.unwrap();
        hub.publish(Ping::Num(13));
        settle(&behaviour, BehaviourState::Stopping).await;

        // Teardown unsubscribes before the slow hook runs.
        assert_eq!(hub.total_subscribers(), 0);
        assert_eq!(hub.publish(Ping::Num(5)), 0);

        behaviour.start().await.unwrap();
        assert_eq!(behaviour.state(), BehaviourState::Running);
        assert_eq!(probe.stopping.load(Ordering::SeqCst), 1);
        assert_eq!(hub.total_subscribers(), 2);
        assert!(behaviour.last_failure().is_none());

        hub.publish(Ping::Num(8));
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*probe.seen.lock().unwrap(), vec![8]);
        behaviour.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_fault_teardown_waits_for_it() {
        let (hub, probe, behaviour) = setup(Probe {
            slow_stopping: true,
            ..Probe::default()
        });
        behaviour.start().await.unwrap();
        hub.publish(Ping::Num(13));
        settle(&behaviour, BehaviourState::Stopping).await;

        behaviour.stop().await.unwrap();
        assert_eq!(behaviour.state(), BehaviourState::Faulted);
        assert_eq!(probe.stopping.load(Ordering::SeqCst), 1);
        assert_eq!(behaviour.last_failure().unwrap().reason(), "unlucky");
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_cancellation_stops_behaviour() {
        let parent = CancellationToken::new();
        let hub = Arc::new(EventHub::<Ping>::new());
        let behaviour =
            EventBehaviour::new("child", hub.clone(), Probe::default()).with_parent_token(parent.clone());
        behaviour.start().await.unwrap();

        parent.cancel();
        settle(&behaviour, BehaviourState::Stopped).await;

        assert!(behaviour.last_failure().unwrap().is_cancelled());
        assert_eq!(hub.total_subscribers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_failure_faults_without_leaking() {
        let (hub, _probe, behaviour) = setup(Probe::default());
        hub.close();

        let err = behaviour.start().await.unwrap_err();
        assert_eq!(err.reason(), SourceError::Closed.to_string());
        assert_eq!(behaviour.state(), BehaviourState::Faulted);
        assert_eq!(hub.total_subscribers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_on_starting_failure_faults() {
        let (hub, _probe, behaviour) = setup(Probe {
            fail_starting: true,
            ..Probe::default()
        });

        assert!(behaviour.start().await.is_err());
        assert_eq!(behaviour.state(), BehaviourState::Faulted);
        assert_eq!(hub.total_subscribers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_commit_in_own_transactions() {
        let source = Arc::new(RecordingSource::new(Recorder::default()));
        let hub = Arc::new(EventHub::<Ping>::new());
        let behaviour = EventBehaviour::new("tx", hub.clone(), Probe::default())
            .with_transactions(source.clone())
            .with_tick_interval(Duration::from_millis(10));
        behaviour.start().await.unwrap();

        hub.publish(Ping::Num(1));
        hub.publish(Ping::Num(2));
        time::sleep(Duration::from_secs(1)).await;

        let mut committed = source.committed();
        committed.sort();
        assert_eq!(committed, vec!["n=1".to_string(), "n=2".to_string()]);
        assert_eq!(source.recorder.begun.load(Ordering::SeqCst), 2);
        behaviour.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_event_is_rolled_back() {
        let source = Arc::new(RecordingSource::new(Recorder::default()));
        let hub = Arc::new(EventHub::<Ping>::new());
        let behaviour =
            EventBehaviour::new("tx", hub.clone(), Probe::default()).with_transactions(source.clone());
        behaviour.start().await.unwrap();

        hub.publish(Ping::Num(13));
        settle(&behaviour, BehaviourState::Faulted).await;

        assert!(source.committed().is_empty());
        assert_eq!(source.rollbacks(), 1);
    }

    #[test]
    fn test_tick_interval_is_clamped() {
        let hub = Arc::new(EventHub::<Ping>::new());
        let behaviour =
            EventBehaviour::new("fast", hub, Probe::default()).with_tick_interval(Duration::ZERO);
        assert_eq!(behaviour.tick_interval(), Duration::from_millis(1));
    }
}
