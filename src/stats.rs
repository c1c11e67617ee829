//! Running streak statistics.

use crate::models::{ProgressUnit, Stats, Streak};

/// The running part of one daily entry, as needed for statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningDay {
    /// Length and unit of the track run that day; `None` when there was no run.
    pub track: Option<(f64, ProgressUnit)>,
    pub progress: Option<String>,
}

impl RunningDay {
    /// Distance covered: the reported partial kilometres on `km` tracks,
    /// otherwise the full track length. A `km` run without progress counts 0.
    fn distance(&self, length: f64, unit: ProgressUnit) -> f64 {
        match (unit, self.progress.as_deref()) {
            (ProgressUnit::Km, Some("full")) => length,
            (ProgressUnit::Km, Some(progress)) => progress.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Unparseable running progress {:?}, counting 0 km", progress);
                0.0
            }),
            (ProgressUnit::Km, None) => 0.0,
            _ => length,
        }
    }
}

/// Compute streaks over days ordered by date ascending.
///
/// A day without a track closes the current streak. The best streak is the
/// longest by day count; ties keep the earlier one.
pub fn collect_stats(days: &[RunningDay]) -> Stats {
    let mut current = Streak::default();
    let mut best = Streak::default();
    let mut total = Streak::default();

    for day in days {
        match day.track {
            None => {
                if current.count > best.count {
                    best = current;
                }
                current = Streak::default();
            }
            Some((length, unit)) => {
                let distance = day.distance(length, unit);
                current.count += 1;
                current.distance += distance;
                total.count += 1;
                total.distance += distance;
            }
        }
    }

    if current.count > best.count {
        best = current;
    }

    Stats {
        best_running_streak: rounded(best),
        current_running_streak: rounded(current),
        total: rounded(total),
    }
}

fn rounded(streak: Streak) -> Streak {
    Streak {
        count: streak.count,
        distance: (streak.distance * 10.0).round() / 10.0,
    }
}
