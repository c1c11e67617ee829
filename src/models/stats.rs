use serde::{Deserialize, Serialize};

/// A run of consecutive days with a track recorded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Streak {
    pub count: u32,
    pub distance: f64,
}

/// Running statistics across the whole history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub best_running_streak: Streak,
    pub current_running_streak: Streak,
    pub total: Streak,
}
