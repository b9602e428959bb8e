//! Evaluation Layer - residual statistics for completed alignments

mod accuracy;

pub use accuracy::{AlignmentStats, ErrorStats};
