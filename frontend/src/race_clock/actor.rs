//! Tick loop that owns a [`ClockState`] for the overlay's mounted lifetime.

use super::{ClockState, ClockView, RaceProps};
use crate::dataflow::{Relay, relay};
use futures::{Stream, StreamExt, select};
use gloo_timers::future::IntervalStream;
use std::sync::Arc;
use zoon::{Mutable, Signal, SignalExt, Task, TaskHandle};

/// Running overlay clock.
///
/// New props are pushed through `props_changed_relay`; the interval timer is
/// cleared when the clock is dropped.
#[derive(Clone)]
pub struct RaceClock {
    state: Mutable<ClockState>,
    pub props_changed_relay: Relay<RaceProps>,
    _task: Arc<TaskHandle>,
}

impl RaceClock {
    pub fn start(initial_props: RaceProps, tick_interval_ms: u32) -> Self {
        let (props_changed_relay, props_changed_stream) = relay::<RaceProps>();
        let state = Mutable::new(ClockState::from_props(&initial_props, browser_now_ms()));
        let ticks = IntervalStream::new(tick_interval_ms).map(|_| browser_now_ms());

        let task = Task::start_droppable(drive_clock(
            state.clone(),
            initial_props,
            props_changed_stream,
            ticks,
        ));

        Self {
            state,
            props_changed_relay,
            _task: Arc::new(task),
        }
    }

    pub fn state_signal(&self) -> impl Signal<Item = ClockState> + use<> {
        self.state.signal()
    }

    pub fn view_signal(&self) -> impl Signal<Item = ClockView> + use<> {
        self.state.signal().map(|state| state.display())
    }
}

fn browser_now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Apply prop changes and ticks to `state` until the tick stream ends.
///
/// Ticks carry the current wall-clock time in milliseconds.
pub async fn drive_clock(
    state: Mutable<ClockState>,
    initial_props: RaceProps,
    props_changed_stream: impl Stream<Item = RaceProps> + Unpin,
    ticks: impl Stream<Item = u64> + Unpin,
) {
    let mut current_props = initial_props;
    let mut props_changed_stream = props_changed_stream.fuse();
    let mut ticks = ticks.fuse();

    loop {
        select! {
            props = props_changed_stream.next() => {
                if let Some(props) = props {
                    state.lock_mut().sync_props(Some(&current_props), &props);
                    current_props = props;
                }
            }
            now_ms = ticks.next() => {
                match now_ms {
                    Some(now_ms) => state.lock_mut().tick(now_ms),
                    None => break,
                }
            }
            complete => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::eventually;
    use fleet_shared::{Lap, RaceStatus};
    use futures::channel::mpsc;

    #[tokio::test]
    async fn drive_clock_applies_ticks_and_prop_changes() {
        let initial = RaceProps {
            status: RaceStatus::InProgress,
            time_left_ms: 10_000,
            ..Default::default()
        };
        let state = Mutable::new(ClockState::from_props(&initial, 0));
        let (props_sender, props_stream) = mpsc::unbounded();
        let (tick_sender, tick_stream) = mpsc::unbounded();
        let driver = tokio::spawn(drive_clock(
            state.clone(),
            initial.clone(),
            props_stream,
            tick_stream,
        ));

        tick_sender.unbounded_send(500).unwrap();
        eventually("first tick", || state.get().last_tick_ms == 500).await;
        assert_eq!(state.get().remaining_time_ms, 9_500);

        props_sender
            .unbounded_send(RaceProps {
                laps: vec![Lap {
                    lap_id: 1,
                    time: 7_000,
                    is_valid: true,
                    ..Default::default()
                }],
                current_lap_ms: 0,
                status: RaceStatus::Finished,
                ..initial.clone()
            })
            .unwrap();
        eventually("new props", || state.get().status == RaceStatus::Finished).await;
        tick_sender.unbounded_send(5_000).unwrap();
        eventually("second tick", || state.get().last_tick_ms == 5_000).await;

        let snapshot = state.get();
        assert_eq!(snapshot.best_lap_ms, 7_000);
        assert_eq!(snapshot.remaining_time_ms, 9_500);
        assert_eq!(snapshot.last_tick_ms, 5_000);

        drop(tick_sender);
        driver.await.unwrap();
    }
}
