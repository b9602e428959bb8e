//! Timestamp correspondence between two pose streams.

mod nearest;

pub use nearest::{MatchPolicy, MatchedPair, NearestTimeMatcher};
