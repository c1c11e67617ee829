//! Decoding of compact volume strings into numbers.
//!
//! Both decoders are lenient: a segment that does not parse is dropped and
//! decoding continues with the next one. Historical rows predate the
//! grammars and may carry irregular segments.

use std::sync::LazyLock;

use regex::Regex;

static HOLD_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)s$").expect("hold segment regex must compile"));

/// Decode `22+20+18` into `[22, 20, 18]`.
pub fn parse_reps(text: &str) -> Vec<i64> {
    text.split('+')
        .filter_map(|segment| segment.trim().parse::<i64>().ok())
        .collect()
}

/// Decode `30s+25s+20s` into `[30, 25, 20]`.
pub fn parse_holds(text: &str) -> Vec<i64> {
    text.split('+')
        .filter_map(|segment| {
            HOLD_SEGMENT
                .captures(segment.trim())
                .and_then(|caps| caps.get(1))
                .and_then(|seconds| seconds.as_str().parse::<i64>().ok())
        })
        .collect()
}
