use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use ocula_app_core::{Controller, Scope, StateContainer};
use tokio::sync::mpsc::error::TryRecvError;
use tokio_stream::StreamExt;

#[derive(Debug, Clone, Default, PartialEq)]
struct CounterState {
    value: i64,
    seen: Vec<u32>,
    busy: bool,
}

#[derive(Debug)]
enum CounterEvent {
    Add(i64),
    Record(u32),
    Emit(u32),
    Burst(u32),
    Noop,
    SlowAdd(i64),
    BumpLater(i64),
    Fail,
    Panic,
    BusyThenFail,
    BusyThenPanic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CounterEffect {
    Emitted(u32),
}

struct Counter;

#[async_trait::async_trait]
impl Controller for Counter {
    type State = CounterState;
    type Event = CounterEvent;
    type Effect = CounterEffect;

    const NAME: &'static str = "counter";

    async fn on_event(
        &mut self,
        event: CounterEvent,
        scope: &Scope<CounterState, CounterEffect>,
    ) -> anyhow::Result<()> {
        match event {
            CounterEvent::Add(n) => scope.update_state(|s| CounterState {
                value: s.value + n,
                ..s
            }),
            CounterEvent::Record(i) => scope.update_state(|mut s| {
                s.seen.push(i);
                s
            }),
            CounterEvent::Emit(i) => scope.send_effect(CounterEffect::Emitted(i)),
            CounterEvent::Burst(n) => {
                for i in 0..n {
                    scope.send_effect(CounterEffect::Emitted(i));
                }
            }
            CounterEvent::Noop => {}
            CounterEvent::SlowAdd(n) => {
                tokio::time::sleep(Duration::from_millis(50)).await;
                scope.update_state(|s| CounterState {
                    value: s.value + n,
                    ..s
                });
            }
            CounterEvent::BumpLater(n) => {
                let bg = scope.clone();
                scope.spawn(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    bg.update_state(|s| CounterState {
                        value: s.value + n,
                        ..s
                    });
                });
            }
            CounterEvent::Fail => bail!("boom"),
            CounterEvent::Panic => panic!("handler blew up"),
            CounterEvent::BusyThenFail => {
                scope.update_state(|s| CounterState {
                    busy: true,
                    value: s.value + 1,
                    ..s
                });
                bail!("failed mid-flight");
            }
            CounterEvent::BusyThenPanic => {
                scope.update_state(|s| CounterState { busy: true, ..s });
                panic!("panicked mid-flight");
            }
        }
        Ok(())
    }

    fn recover(state: CounterState) -> CounterState {
        CounterState {
            busy: false,
            ..state
        }
    }
}

#[tokio::test]
async fn events_are_handled_in_dispatch_order() {
    let c = StateContainer::spawn(Counter);
    for i in 0..100 {
        c.handle_event(CounterEvent::Record(i));
    }
    let s = c.wait_for(|s| s.seen.len() == 100).await.unwrap();
    assert_eq!(s.seen, (0..100).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_dispatch_and_background_work_lose_no_updates() {
    let c = Arc::new(StateContainer::spawn(Counter));

    let mut senders = Vec::new();
    for _ in 0..4 {
        let c = c.clone();
        senders.push(tokio::spawn(async move {
            for _ in 0..250 {
                c.handle_event(CounterEvent::Add(1));
                tokio::task::yield_now().await;
            }
        }));
    }
    for _ in 0..10 {
        c.handle_event(CounterEvent::BumpLater(100));
    }
    for s in senders {
        s.await.unwrap();
    }

    let s = tokio::time::timeout(Duration::from_secs(5), c.wait_for(|s| s.value == 2000))
        .await
        .expect("timed out")
        .unwrap();
    assert_eq!(s.value, 2000);
}

#[tokio::test]
async fn effects_are_not_replayed_to_late_subscribers() {
    let c = StateContainer::spawn(Counter);

    // Nobody listening: dropped.
    c.handle_event(CounterEvent::Emit(0));
    c.handle_event(CounterEvent::Record(0));
    c.wait_for(|s| s.seen.len() == 1).await.unwrap();

    let mut early = c.subscribe_effects();
    c.handle_event(CounterEvent::Emit(1));
    assert_eq!(early.recv().await.unwrap(), CounterEffect::Emitted(1));

    let mut late = c.subscribe_effects();
    c.handle_event(CounterEvent::Emit(2));
    assert_eq!(late.recv().await.unwrap(), CounterEffect::Emitted(2));
    assert_eq!(early.recv().await.unwrap(), CounterEffect::Emitted(2));

    assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    assert!(matches!(early.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn failing_and_panicking_handlers_do_not_stop_the_loop() {
    let c = StateContainer::spawn(Counter);
    c.handle_event(CounterEvent::Add(1));
    c.handle_event(CounterEvent::Fail);
    c.handle_event(CounterEvent::Panic);
    c.handle_event(CounterEvent::Add(4));

    let s = c.wait_for(|s| s.value == 5).await.unwrap();
    assert_eq!(s.value, 5);
    assert!(!c.is_shut_down());
}

#[tokio::test(start_paused = true)]
async fn teardown_stops_state_and_effect_emission() {
    let c = StateContainer::spawn(Counter);
    let mut effects = c.subscribe_effects();
    let mut states = c.subscribe_state();

    c.handle_event(CounterEvent::BumpLater(10));
    c.handle_event(CounterEvent::SlowAdd(1));
    tokio::task::yield_now().await;
    c.shutdown();
    assert!(c.is_shut_down());

    c.handle_event(CounterEvent::Add(100));
    c.handle_event(CounterEvent::Emit(7));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(c.state(), CounterState::default());
    assert!(!states.has_changed().unwrap());
    assert!(matches!(effects.try_recv(), Err(TryRecvError::Disconnected)));

    c.shutdown_and_wait().await;
}

#[tokio::test]
async fn state_stream_starts_with_the_current_value() {
    let c = StateContainer::spawn(Counter);
    c.handle_event(CounterEvent::Add(3));
    c.wait_for(|s| s.value == 3).await.unwrap();

    let mut stream = c.state_stream();
    assert_eq!(stream.next().await.unwrap().value, 3);

    c.handle_event(CounterEvent::Add(2));
    assert_eq!(stream.next().await.unwrap().value, 5);
}

#[tokio::test]
async fn effect_stream_delivers_in_emission_order() {
    let c = StateContainer::spawn(Counter);
    let mut stream = Box::pin(c.effect_stream());
    for i in 1..=3 {
        c.handle_event(CounterEvent::Emit(i));
    }
    for i in 1..=3 {
        assert_eq!(stream.next().await.unwrap(), CounterEffect::Emitted(i));
    }
}

#[tokio::test]
async fn bursts_reach_every_subscriber_without_loss() {
    let c = StateContainer::spawn(Counter);
    let mut first = c.subscribe_effects();
    let mut second = c.subscribe_effects();

    c.handle_event(CounterEvent::Burst(1000));
    c.flush().await.unwrap();

    for rx in [&mut first, &mut second] {
        for i in 0..1000 {
            assert_eq!(rx.try_recv().unwrap(), CounterEffect::Emitted(i));
        }
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }
}

#[tokio::test]
async fn dropped_subscribers_do_not_block_the_rest() {
    let c = StateContainer::spawn(Counter);
    let gone = c.subscribe_effects();
    let mut kept = c.subscribe_effects();
    drop(gone);

    c.handle_event(CounterEvent::Emit(9));
    assert_eq!(kept.recv().await.unwrap(), CounterEffect::Emitted(9));
}

#[tokio::test]
async fn failures_run_the_recover_hook() {
    let c = StateContainer::spawn(Counter);

    c.handle_event(CounterEvent::BusyThenFail);
    c.flush().await.unwrap();
    let s = c.state();
    assert!(!s.busy);
    assert_eq!(s.value, 1);

    c.handle_event(CounterEvent::BusyThenPanic);
    c.flush().await.unwrap();
    assert!(!c.state().busy);
}

#[tokio::test]
async fn flush_returns_after_events_that_publish_nothing() {
    let c = StateContainer::spawn(Counter);
    let mut states = c.subscribe_state();

    c.handle_event(CounterEvent::Noop);
    tokio::time::timeout(Duration::from_secs(1), c.flush())
        .await
        .expect("flush never resolved")
        .unwrap();
    assert!(!states.has_changed().unwrap());

    c.handle_event(CounterEvent::SlowAdd(2));
    c.flush().await.unwrap();
    assert_eq!(c.state().value, 2);
}

#[tokio::test]
async fn flush_fails_once_torn_down() {
    let c = StateContainer::spawn(Counter);
    c.shutdown();
    assert!(c.flush().await.is_err());
}
