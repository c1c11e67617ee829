use thiserror::Error;

use super::catalog::Catalog;

/// A problem with a single `"<exercise>/<execution> <volume>"` string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkoutResultError {
    #[error("Invalid workout result format: {0}")]
    InvalidFormat(String),

    #[error("Unknown exercise/execution: {0}")]
    UnknownExercise(String),

    #[error("Invalid volume format for {key}: {volume}")]
    InvalidVolume { key: String, volume: String },
}

/// A workout result string split into its stored columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedWorkoutResult<'a> {
    pub exercise: &'a str,
    pub execution: &'a str,
    pub volume: &'a str,
}

/// Split `squats/set3x 22+22+22` into exercise, execution and volume.
///
/// Returns `None` when there is no space or the key has no `/`.
pub fn split_workout_result(result: &str) -> Option<ParsedWorkoutResult<'_>> {
    let (key, volume) = result.split_once(' ')?;
    let (exercise, execution) = key.split_once('/')?;
    Some(ParsedWorkoutResult {
        exercise,
        execution,
        volume,
    })
}

impl Catalog {
    /// Check every result string against the catalog.
    ///
    /// All problems are collected in input order; validation never stops at
    /// the first failing string.
    pub fn validate_workout<S: AsRef<str>>(
        &self,
        results: &[S],
    ) -> Result<(), Vec<WorkoutResultError>> {
        let errors: Vec<WorkoutResultError> = results
            .iter()
            .filter_map(|result| self.check_result(result.as_ref()).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check_result(&self, result: &str) -> Result<(), WorkoutResultError> {
        let (key, volume) = result
            .split_once(' ')
            .ok_or_else(|| WorkoutResultError::InvalidFormat(result.to_string()))?;

        let exercise = self
            .get(key)
            .ok_or_else(|| WorkoutResultError::UnknownExercise(key.to_string()))?;

        if !exercise.accepts(volume) {
            return Err(WorkoutResultError::InvalidVolume {
                key: key.to_string(),
                volume: volume.to_string(),
            });
        }

        Ok(())
    }
}
