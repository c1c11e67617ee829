use std::collections::BTreeMap;

use super::catalog::ExecutionKind;
use super::codec::{parse_holds, parse_reps};
use crate::models::DatedWorkoutResult;

/// Per-exercise progression, keyed by `exercise/execution`.
pub type WorkoutsSummary = BTreeMap<String, Vec<i64>>;

/// Reduce a date-ordered workout history into one numeric series per exercise.
///
/// Each result contributes one value in input order: the rounded mean for
/// multi-set kinds, the raw number for max kinds. Results with an unknown
/// execution kind or an undecodable volume contribute nothing.
pub fn summarize(results: &[DatedWorkoutResult]) -> WorkoutsSummary {
    let mut summary = WorkoutsSummary::new();

    for dated in results {
        let result = &dated.result;
        let Some(kind) = ExecutionKind::from_str(&result.execution) else {
            tracing::warn!(
                "Skipping {}/{} on {}: unknown execution kind",
                result.exercise,
                result.execution,
                dated.date
            );
            continue;
        };

        let Some(value) = progression_value(kind, &result.volume) else {
            tracing::warn!(
                "Skipping {}/{} on {}: undecodable volume {:?}",
                result.exercise,
                result.execution,
                dated.date,
                result.volume
            );
            continue;
        };

        summary
            .entry(format!("{}/{}", result.exercise, result.execution))
            .or_default()
            .push(value);
    }

    summary
}

/// The single number charted for one stored volume.
///
/// A max volume too large for `i64` yields `None`. Oversized segments of a
/// multi-set volume are dropped by the lenient codec before averaging.
pub fn progression_value(kind: ExecutionKind, volume: &str) -> Option<i64> {
    match kind {
        ExecutionKind::Set3x => rounded_mean(&parse_reps(volume)),
        ExecutionKind::Hold3x => rounded_mean(&parse_holds(volume)),
        ExecutionKind::MaxSet => volume.trim().parse().ok(),
        ExecutionKind::MaxHold => volume.trim().trim_end_matches('s').parse().ok(),
    }
}

/// Arithmetic mean rounded half away from zero; `None` for no values.
///
/// Summed in `i128`, so values near the `i64` limits cannot overflow.
fn rounded_mean(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let sum: i128 = values.iter().map(|&v| i128::from(v)).sum();
    let len = values.len() as i128;
    let half_up = (2 * sum.abs() + len) / (2 * len);
    let mean = if sum < 0 { -half_up } else { half_up };
    i64::try_from(mean).ok()
}
