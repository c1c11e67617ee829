//! Domain models for fitlog.
//!
//! # Core Concepts
//!
//! - [`DailyEntry`]: one calendar day's record. Owns the day's running, workout,
//!   weight, last meal, stretching, stairs and diary notes.
//! - [`WorkoutResult`]: a single exercise result belonging to a daily entry,
//!   stored as the raw compact volume string it was submitted with.
//! - [`Track`]: a running route referenced by daily entries.
//! - [`Stats`]: running streaks derived from the entry history.
//! - [`Meal`]: a bundled meal with computed calories.

mod entry;
mod meal;
mod stats;
mod track;
mod workout;

pub use entry::*;
pub use meal::*;
pub use stats::*;
pub use track::*;
pub use workout::*;
