use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::track::Track;
use super::workout::WorkoutResult;

/// A calendar day's fitness record.
///
/// `week`, `year`, `month` and `day` are derived from `date` when the entry
/// is recorded and stored alongside it so that weeks can be queried directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub date: NaiveDate,
    /// ISO week as `YYYY-WW`.
    pub week: String,
    pub year: i32,
    /// Three-letter lowercase month, `jan`..`dec`.
    pub month: String,
    /// Three-letter lowercase weekday, `mon`..`sun`.
    pub day: String,
    pub running: Running,
    pub workout: Workout,
    pub weight: Option<f64>,
    pub last_meal: Option<String>,
    pub stretching: Option<String>,
    pub stairs: Option<String>,
    pub diary: Option<String>,
}

/// How an activity came to happen on a given day.
///
/// - `Regular`: part of the plan
/// - `Adhoc`: done outside the plan
/// - `Legacy`: imported from before schedules were tracked
/// - `Void`: nothing done
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    Regular,
    Adhoc,
    Legacy,
    Void,
}

impl Schedule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Adhoc => "adhoc",
            Self::Legacy => "legacy",
            Self::Void => "void",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(Self::Regular),
            "adhoc" => Some(Self::Adhoc),
            "legacy" => Some(Self::Legacy),
            "void" => Some(Self::Void),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Running {
    pub schedule: Schedule,
    pub track: Option<Track>,
    /// `full` or a partial amount in the track's progress unit.
    pub progress: Option<String>,
    pub performance: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workout {
    pub schedule: Schedule,
    pub routine: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<WorkoutResult>,
}

/// Input for recording a new daily entry. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DailyEntryInput {
    /// Defaults to today.
    pub date: Option<NaiveDate>,
    pub running: Option<RunningInput>,
    pub workout: Option<WorkoutInput>,
    pub weight: Option<f64>,
    pub last_meal: Option<String>,
    pub stretching: Option<String>,
    pub stairs: Option<String>,
    pub diary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RunningInput {
    pub schedule: Schedule,
    pub track_id: Option<String>,
    pub progress: Option<String>,
    /// Self-assessed effort, 0 to 4.
    pub performance: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutInput {
    pub schedule: Schedule,
    pub routine: Option<String>,
    /// Format: `"exercise/execution volume"`, e.g. `"squats/set3x 22+22+22"`.
    #[serde(default)]
    pub results: Vec<String>,
}

/// Partial update of a daily entry.
///
/// A missing field leaves the column untouched; an explicit `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntryUpdate {
    #[serde(default, deserialize_with = "present")]
    pub weight: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    pub last_meal: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub stretching: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub stairs: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub diary: Option<Option<String>>,
}

impl DailyEntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.weight.is_none()
            && self.last_meal.is_none()
            && self.stretching.is_none()
            && self.stairs.is_none()
            && self.diary.is_none()
    }
}

/// Marks a field as present, keeping `null` distinguishable from absent.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of the diary update endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryInput {
    pub diary: String,
}

/// Compact daily entry as written by hand in YAML.
///
/// ```yaml
/// date: 2026-01-15
/// run: regular park-loop full 3
/// workout: regular strength-a
/// results:
///   - squats/set3x 22+22+22
///   - frontPlank/maxhold 60s
/// weight: 75.5
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DailyYamlInput {
    pub date: Option<NaiveDate>,
    /// `"<schedule> <trackId> <progress> <performance>"`.
    pub run: Option<String>,
    /// `"<schedule> <routine>"`.
    pub workout: Option<String>,
    pub results: Option<Vec<String>>,
    pub weight: Option<f64>,
    pub last_meal: Option<String>,
    pub stretching: Option<String>,
    pub stairs: Option<String>,
    pub diary: Option<String>,
}

/// A daily entry row ready to be written, with defaults applied and the
/// calendar fields derived from `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDailyEntry {
    pub date: NaiveDate,
    pub week: String,
    pub year: i32,
    pub month: String,
    pub day: String,
    pub track_id: Option<String>,
    pub running_schedule: Schedule,
    pub running_progress: Option<String>,
    pub running_performance: Option<i64>,
    pub workout_schedule: Schedule,
    pub workout_routine: String,
    pub weight: Option<f64>,
    pub last_meal: Option<String>,
    pub stretching: Option<String>,
    pub stairs: Option<String>,
    pub diary: Option<String>,
}
