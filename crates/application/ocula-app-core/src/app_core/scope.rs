use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, watch};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use tokio_util::task::TaskTracker;
use tracing::trace;

/// Handle a controller uses to read and replace its state, publish effects
/// and run background work. Cheap to clone; all clones share one
/// cancellation scope.
pub struct Scope<S, F> {
    name: &'static str,
    state: Arc<watch::Sender<S>>,
    effects: Arc<Mutex<Vec<mpsc::UnboundedSender<F>>>>,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl<S, F> Clone for Scope<S, F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: self.state.clone(),
            effects: self.effects.clone(),
            cancel: self.cancel.clone(),
            tasks: self.tasks.clone(),
        }
    }
}

impl<S, F> Scope<S, F>
where
    S: Clone + Send + Sync + 'static,
    F: Clone + Send + 'static,
{
    pub(crate) fn new(name: &'static str, initial: S) -> Self {
        let (state, _rx) = watch::channel(initial);
        Self {
            name,
            state: Arc::new(state),
            effects: Arc::default(),
            cancel: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    /// Replaces the current state with `reducer(current)` and notifies
    /// observers. The read and the write happen under one lock, so two
    /// updates racing from background tasks never lose each other's changes.
    /// No-op once the scope is cancelled.
    pub fn update_state(&self, reducer: impl FnOnce(S) -> S) {
        if self.cancel.is_cancelled() {
            trace!(controller = self.name, "state update after teardown ignored");
            return;
        }
        self.state.send_modify(|current| {
            let next = reducer(current.clone());
            *current = next;
        });
    }

    /// Publishes `effect` to the subscribers attached right now. Each one
    /// has its own unbounded queue, so a slow subscriber never loses effects.
    /// With nobody listening the effect is dropped. No-op once the scope is
    /// cancelled.
    pub fn send_effect(&self, effect: F) {
        if self.cancel.is_cancelled() {
            trace!(controller = self.name, "effect after teardown ignored");
            return;
        }
        let mut subscribers = self
            .effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(effect.clone()).is_ok());
        if subscribers.is_empty() {
            trace!(controller = self.name, "effect dropped: no subscribers");
        }
    }

    /// Runs `fut` on the runtime until it finishes or the scope is cancelled.
    pub fn spawn<Fut>(&self, fut: Fut)
    where
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.cancel.clone();
        self.tasks.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = fut => {}
            }
        });
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }

    pub(crate) fn subscribe_state(&self) -> watch::Receiver<S> {
        self.state.subscribe()
    }

    pub(crate) fn subscribe_effects(&self) -> mpsc::UnboundedReceiver<F> {
        let (tx, rx) = mpsc::unbounded_channel();
        // A receiver taken after teardown is closed straight away.
        if !self.cancel.is_cancelled() {
            self.effects
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(tx);
        }
        rx
    }

    /// Cancels the scope and closes every effect receiver.
    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
        self.tasks.close();
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub(crate) async fn wait_for_tasks(&self) {
        self.tasks.close();
        self.tasks.wait().await;
    }
}
