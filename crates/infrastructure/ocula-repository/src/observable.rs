use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Latest-value collection shared between a repository and its observers.
///
/// Every mutation builds a new `Vec` from the current one and swaps the `Arc`
/// inside the watch lock. Readers always hold a complete snapshot and every
/// change, including a nested field change, wakes subscribers.
#[derive(Debug)]
pub struct ObservableList<T> {
    tx: watch::Sender<Arc<Vec<T>>>,
}

impl<T> ObservableList<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(items: Vec<T>) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(items));
        Self { tx }
    }

    pub fn observe(&self) -> watch::Receiver<Arc<Vec<T>>> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Arc<Vec<T>> {
        self.tx.borrow().clone()
    }

    /// Pure query over the current snapshot.
    pub fn query<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let snapshot = self.snapshot();
        f(&snapshot)
    }

    /// Applies `f` to a copy of the current collection. On `Ok` the copy
    /// replaces the published collection; on `Err` nothing changes and no
    /// subscriber is notified.
    pub fn try_update<R, E>(&self, f: impl FnOnce(&mut Vec<T>) -> Result<R, E>) -> Result<R, E> {
        let mut outcome = None;
        self.tx.send_if_modified(|current| {
            let mut next = current.as_ref().clone();
            let res = f(&mut next);
            let changed = res.is_ok();
            if changed {
                *current = Arc::new(next);
            }
            outcome = Some(res);
            changed
        });
        outcome.unwrap_or_else(|| unreachable!("send_if_modified always runs its closure"))
    }

    pub fn push(&self, item: T) {
        let _ = self.try_update(|items| {
            items.push(item);
            Ok::<_, std::convert::Infallible>(())
        });
    }
}

/// Artificial delay standing in for a network round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency(Duration);

impl Latency {
    pub const NONE: Latency = Latency(Duration::ZERO);

    pub fn new(d: Duration) -> Self {
        Self(ocula_config::clamp_latency(d))
    }

    pub fn duration(self) -> Duration {
        self.0
    }

    pub async fn simulate(self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::new(ocula_config::DEFAULT_SIMULATED_LATENCY)
    }
}
