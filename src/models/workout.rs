use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One recorded exercise result, stored exactly as it was submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkoutResult {
    pub exercise: String,
    pub execution: String,
    /// Compact volume string, e.g. `22+22+22` or `45s`.
    pub volume: String,
}

/// A workout result together with the day it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatedWorkoutResult {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub result: WorkoutResult,
}

/// Catalog listing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseName {
    /// `<exercise>/<execution>`, e.g. `squats/set3x`.
    pub name: String,
}
