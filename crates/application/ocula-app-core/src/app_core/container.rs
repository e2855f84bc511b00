use std::any::Any;
use std::panic::AssertUnwindSafe;

use anyhow::{anyhow, Context};
use futures::FutureExt;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::{UnboundedReceiverStream, WatchStream};
use tracing::{debug, info_span, warn, Instrument};

use super::controller::{Controller, HandlerError};
use super::scope::Scope;

/// Runs one [`Controller`] on its own task and exposes its state and effects.
///
/// Events are queued without blocking and handled strictly one at a time in
/// dispatch order. Dropping the container tears the controller down.
pub struct StateContainer<C: Controller> {
    scope: Scope<C::State, C::Effect>,
    events: mpsc::UnboundedSender<Envelope<C::Event>>,
    worker: Option<JoinHandle<()>>,
}

enum Envelope<E> {
    Event(E),
    /// Answered once everything queued ahead of it has been handled.
    Flush(oneshot::Sender<()>),
}

impl<C: Controller> StateContainer<C> {
    /// Must be called from within a tokio runtime.
    pub fn spawn(controller: C) -> Self {
        let scope = Scope::new(C::NAME, C::State::default());
        let (events, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(
            run_controller(controller, rx, scope.clone())
                .instrument(info_span!("controller", name = C::NAME)),
        );
        Self {
            scope,
            events,
            worker: Some(worker),
        }
    }

    /// Queues `event` and returns immediately.
    pub fn handle_event(&self, event: C::Event) {
        if self.scope.is_cancelled() {
            debug!(controller = C::NAME, ?event, "controller torn down; event dropped");
            return;
        }
        if let Err(mpsc::error::SendError(Envelope::Event(event))) =
            self.events.send(Envelope::Event(event))
        {
            debug!(controller = C::NAME, ?event, "controller stopped; event dropped");
        }
    }

    /// Resolves once every event queued before this call has been handled,
    /// whether or not handling published anything. Work started through
    /// [`Scope::spawn`] is not waited for.
    pub async fn flush(&self) -> anyhow::Result<()> {
        let (done, rx) = oneshot::channel();
        self.events
            .send(Envelope::Flush(done))
            .map_err(|_| anyhow!("{} stopped", C::NAME))?;
        rx.await
            .with_context(|| format!("{} stopped before draining its queue", C::NAME))
    }

    pub fn state(&self) -> C::State {
        self.scope.state()
    }

    /// Latest-value receiver; `borrow()` is the current state right away.
    pub fn subscribe_state(&self) -> watch::Receiver<C::State> {
        self.scope.subscribe_state()
    }

    /// Yields the current state first, then every later state.
    pub fn state_stream(&self) -> WatchStream<C::State> {
        WatchStream::new(self.scope.subscribe_state())
    }

    /// Receives every effect emitted after this call, in emission order.
    /// The receiver closes when the controller is torn down.
    pub fn subscribe_effects(&self) -> mpsc::UnboundedReceiver<C::Effect> {
        self.scope.subscribe_effects()
    }

    /// Stream form of [`subscribe_effects`](Self::subscribe_effects).
    pub fn effect_stream(&self) -> UnboundedReceiverStream<C::Effect> {
        UnboundedReceiverStream::new(self.scope.subscribe_effects())
    }

    /// Resolves with the first state matching `pred`, checking the current one first.
    pub async fn wait_for(
        &self,
        mut pred: impl FnMut(&C::State) -> bool,
    ) -> anyhow::Result<C::State> {
        let mut rx = self.subscribe_state();
        let state = rx
            .wait_for(|s| pred(s))
            .await
            .with_context(|| format!("{} stopped before reaching the state", C::NAME))?;
        Ok(state.clone())
    }

    pub fn is_shut_down(&self) -> bool {
        self.scope.is_cancelled()
    }

    /// Cancels queued and in-flight work. No state or effect is published afterwards.
    pub fn shutdown(&self) {
        if !self.scope.is_cancelled() {
            debug!(controller = C::NAME, "tearing down controller");
        }
        self.scope.cancel();
    }

    /// Like [`shutdown`](Self::shutdown), then waits for the controller task
    /// and its background work to finish.
    pub async fn shutdown_and_wait(mut self) {
        self.shutdown();
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                warn!(controller = C::NAME, error = %e, "controller task ended abnormally");
            }
        }
        self.scope.wait_for_tasks().await;
    }
}

impl<C: Controller> Drop for StateContainer<C> {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

async fn run_controller<C: Controller>(
    mut controller: C,
    mut events: mpsc::UnboundedReceiver<Envelope<C::Event>>,
    scope: Scope<C::State, C::Effect>,
) {
    loop {
        let envelope = tokio::select! {
            biased;
            _ = scope.cancelled() => break,
            next = events.recv() => match next {
                Some(envelope) => envelope,
                None => break,
            },
        };
        let event = match envelope {
            Envelope::Event(event) => event,
            Envelope::Flush(done) => {
                // The waiter may have given up already.
                let _ = done.send(());
                continue;
            }
        };

        let label = format!("{event:?}");
        debug!(event = %label, "handling event");

        let outcome = tokio::select! {
            biased;
            _ = scope.cancelled() => break,
            res = AssertUnwindSafe(controller.on_event(event, &scope)).catch_unwind() => res,
        };

        let error = match outcome {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => HandlerError::Failed(e),
            Err(payload) => HandlerError::Panicked(panic_message(payload.as_ref())),
        };

        let handled = std::panic::catch_unwind(AssertUnwindSafe(|| {
            controller.on_error(&label, error, &scope)
        }));
        if handled.is_err() {
            warn!(event = %label, "error hook panicked");
        }
        scope.update_state(C::recover);
    }
    debug!("controller stopped");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
