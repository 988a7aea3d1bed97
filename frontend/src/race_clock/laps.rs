use fleet_shared::{AverageLap, Lap};

/// Fastest valid lap; the earliest one wins a tie.
///
/// Invalid laps are skipped even when they are numerically faster.
pub fn fastest_valid_lap(laps: &[Lap]) -> Option<&Lap> {
    laps.iter().filter(|lap| lap.is_valid).min_by_key(|lap| lap.time)
}

/// Fastest rolling-average window; `None` means no window was completed (DNF).
pub fn fastest_average(averages: &[AverageLap]) -> Option<&AverageLap> {
    averages.iter().min_by_key(|average| average.avg_time)
}

/// Averages over every run of `window` consecutive valid laps.
pub fn rolling_averages(laps: &[Lap], window: usize) -> Vec<AverageLap> {
    if window == 0 {
        return Vec::new();
    }
    laps.windows(window)
        .filter(|run| run.iter().all(|lap| lap.is_valid))
        .filter_map(|run| {
            let (first, last) = (run.first()?, run.last()?);
            let total: u64 = run.iter().map(|lap| lap.time).sum();
            Some(AverageLap {
                start_lap_id: first.lap_id,
                end_lap_id: last.lap_id,
                avg_time: total / window as u64,
            })
        })
        .collect()
}
