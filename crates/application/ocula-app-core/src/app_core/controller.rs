use std::fmt::Debug;

use tracing::error;

use super::scope::Scope;

/// Failure raised while handling one event. The container catches it and
/// hands it to [`Controller::on_error`]; it never leaves the controller task.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("{0:#}")]
    Failed(anyhow::Error),
    #[error("handler panicked: {0}")]
    Panicked(String),
}

/// One screen's coordinator: folds events into state and emits one-shot effects.
///
/// `on_event` calls for a given instance never overlap. The container awaits
/// each call to completion before taking the next event off the queue.
#[async_trait::async_trait]
pub trait Controller: Send + 'static {
    type State: Clone + Default + Debug + Send + Sync + 'static;
    type Event: Debug + Send + 'static;
    type Effect: Clone + Debug + Send + 'static;

    const NAME: &'static str;

    async fn on_event(
        &mut self,
        event: Self::Event,
        scope: &Scope<Self::State, Self::Effect>,
    ) -> anyhow::Result<()>;

    /// Called with the debug text of the event whose handler failed.
    /// The default logs and swallows so later events still run.
    fn on_error(
        &mut self,
        event: &str,
        error: HandlerError,
        _scope: &Scope<Self::State, Self::Effect>,
    ) {
        error!(controller = Self::NAME, %event, %error, "event handler failed");
    }

    /// Applied to the state after every failed or panicked event, once
    /// `on_error` has run. Clear in-progress flags here so a failure never
    /// leaves the screen stuck loading.
    fn recover(state: Self::State) -> Self::State {
        state
    }
}
