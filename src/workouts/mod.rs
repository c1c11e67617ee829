//! Workout volumes: the exercise catalog, volume decoding, batch validation
//! and progression summaries.
//!
//! A workout result is written as `"<exercise>/<execution> <volume>"`, for
//! example `squats/set3x 22+22+22`. The execution kind fixes the grammar of
//! the volume; see [`ExecutionKind`].

mod catalog;
mod codec;
mod summary;
mod validator;

pub use catalog::*;
pub use codec::*;
pub use summary::*;
pub use validator::*;
