//! Request and response types for MCP tools.

use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================
// Request Types
// ============================================================

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListExercisesRequest {
    #[schemars(
        description = "Only list exercises with this execution kind: 'set3x', 'hold3x', 'maxset', or 'maxhold'"
    )]
    pub execution: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ValidateWorkoutRequest {
    #[schemars(
        description = "Workout results, each '<exercise>/<execution> <volume>', e.g. 'squats/set3x 22+22+22' or 'frontPlank/maxhold 60s'"
    )]
    pub results: Vec<String>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct WorkoutsSummaryRequest {
    #[schemars(
        description = "Only include this exercise, either a bare name like 'squats' or a full key like 'squats/set3x'"
    )]
    pub exercise: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetDailyEntryRequest {
    #[schemars(description = "Date as YYYY-MM-DD, or 'today'")]
    pub date: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetWeekRequest {
    #[schemars(description = "ISO week as YYYY-WW, e.g. '2026-07'")]
    pub week: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RecordDailyEntryRequest {
    #[schemars(
        description = "Compact YAML entry. Keys: date, run ('<schedule> <trackId> <progress> <performance>'), workout ('<schedule> <routine>'), results (list of workout results), weight, lastMeal, stretching, stairs, diary"
    )]
    pub yaml: String,
}

// ============================================================
// Response Types
// ============================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseInfo {
    pub name: String,
    pub exercise: String,
    pub execution: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExerciseListResponse {
    pub exercises: Vec<ExerciseInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub valid: bool,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordEntryResponse {
    pub date: String,
    pub report: Vec<String>,
}
