//! Race overlay clock
//!
//! Authoritative race values arrive only when something happens on track:
//! a lap is recorded, the status changes, the timer service reports the time
//! left. Between those updates a fixed-rate tick advances the current lap and
//! counts the remaining time down so the overlay reads as a running clock.
//!
//! Props flow one way. Each counter is reset from its prop only when that
//! prop changes; local ticking never writes back.

use fleet_shared::{AverageLap, Lap, RaceStatus};
use std::fmt;

pub mod actor;
pub mod laps;

pub use actor::{RaceClock, drive_clock};

/// Latest authoritative values for the race on track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RaceProps {
    pub laps: Vec<Lap>,
    /// Server-computed averages; when empty and `average_window` is set,
    /// averages are computed from `laps`.
    pub average_laps: Vec<AverageLap>,
    pub average_window: Option<usize>,
    pub status: RaceStatus,
    pub time_left_ms: u64,
    pub current_lap_ms: u64,
}

impl RaceProps {
    fn averages(&self) -> Vec<AverageLap> {
        match (self.average_laps.is_empty(), self.average_window) {
            (true, Some(window)) => laps::rolling_averages(&self.laps, window),
            _ => self.average_laps.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClockState {
    pub best_lap_ms: u64,
    /// `None` while no averaging window has been completed (DNF).
    pub best_avg: Option<AverageLap>,
    pub current_lap_ms: u64,
    pub remaining_time_ms: u64,
    pub last_tick_ms: u64,
    pub status: RaceStatus,
}

impl ClockState {
    pub fn from_props(props: &RaceProps, now_ms: u64) -> Self {
        let mut state = Self {
            last_tick_ms: now_ms,
            ..Self::default()
        };
        state.sync_props(None, props);
        state
    }

    /// Reset the counters whose props differ from `previous`.
    pub fn sync_props(&mut self, previous: Option<&RaceProps>, props: &RaceProps) {
        let changed = |same: fn(&RaceProps, &RaceProps) -> bool| {
            previous.is_none_or(|previous| !same(previous, props))
        };

        if changed(|a, b| a.laps == b.laps) {
            self.best_lap_ms = laps::fastest_valid_lap(&props.laps).map_or(0, |lap| lap.time);
        }
        if changed(|a, b| {
            a.average_laps == b.average_laps && a.average_window == b.average_window && a.laps == b.laps
        }) {
            self.best_avg = laps::fastest_average(&props.averages()).copied();
        }
        if changed(|a, b| a.time_left_ms == b.time_left_ms) {
            self.remaining_time_ms = props.time_left_ms;
        }
        if changed(|a, b| a.current_lap_ms == b.current_lap_ms) {
            self.current_lap_ms = props.current_lap_ms;
        }
        self.status = props.status;
    }

    /// Advance by the real time since the previous tick.
    ///
    /// The reference timestamp always moves to `now_ms`; the counters only
    /// move while the race is in progress, so resuming a paused race never
    /// applies the paused interval. Both counters floor at zero, and a clock
    /// running backwards counts as no elapsed time.
    pub fn tick(&mut self, now_ms: u64) {
        let elapsed = now_ms.saturating_sub(self.last_tick_ms);
        self.last_tick_ms = now_ms;
        if self.status != RaceStatus::InProgress {
            return;
        }
        self.current_lap_ms = self.current_lap_ms.saturating_add(elapsed);
        self.remaining_time_ms = self.remaining_time_ms.saturating_sub(elapsed);
    }

    pub fn display(&self) -> ClockView {
        ClockView {
            remaining: ClockDisplay::from_ms(self.remaining_time_ms),
            current_lap: ClockDisplay::from_ms(self.current_lap_ms),
            best_lap: ClockDisplay::from_ms(self.best_lap_ms),
            best_avg: self.best_avg.map(|average| BestAverage {
                time: ClockDisplay::from_ms(average.avg_time),
                start_lap_id: average.start_lap_id,
                end_lap_id: average.end_lap_id,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockDisplay {
    pub minutes: u64,
    pub seconds: u64,
    pub millis: u64,
}

impl ClockDisplay {
    pub fn from_ms(ms: u64) -> Self {
        Self {
            minutes: ms / 60_000,
            seconds: ms / 1000 % 60,
            millis: ms % 1000,
        }
    }
}

impl fmt::Display for ClockDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}.{:03}", self.minutes, self.seconds, self.millis)
    }
}

/// Fastest averaging window with the laps it spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestAverage {
    pub time: ClockDisplay,
    pub start_lap_id: u32,
    pub end_lap_id: u32,
}

/// Everything the overlay renders, derived fresh from the raw counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockView {
    pub remaining: ClockDisplay,
    pub current_lap: ClockDisplay,
    pub best_lap: ClockDisplay,
    pub best_avg: Option<BestAverage>,
}
