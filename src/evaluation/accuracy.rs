//! Residual statistics over matched trajectory pairs.
//!
//! Summarizes how well the winning offset lines the two trajectories up:
//! translation residuals between matched poses and the leftover timestamp
//! differences. The summaries are plain per-series statistics, suitable both
//! for terminal output and for serialization alongside the search result.

use serde::{Deserialize, Serialize};

use crate::algorithms::matching::MatchedPair;

/// Summary statistics over one residual series.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorStats {
    /// Root mean square error
    pub rmse: f64,

    /// Mean error
    pub mean: f64,

    /// Standard deviation
    pub std: f64,

    /// Minimum error
    pub min: f64,

    /// Maximum error
    pub max: f64,

    /// Median error
    pub median: f64,

    /// Number of samples
    pub count: usize,
}

impl ErrorStats {
    /// Compute statistics from a residual series.
    ///
    /// An empty series yields the all-zero default.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let count = values.len();
        let n = count as f64;

        let sum: f64 = values.iter().sum();
        let mean = sum / n;

        let sum_sq: f64 = values.iter().map(|v| v * v).sum();
        let rmse = (sum_sq / n).sqrt();

        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let median = if count.is_multiple_of(2) {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Self {
            rmse,
            mean,
            std,
            min,
            max,
            median,
            count,
        }
    }

    /// Format as a single-line summary.
    pub fn summary(&self) -> String {
        format!(
            "rmse: {:.4}, mean: {:.4}, median: {:.4}, std: {:.4}, min: {:.4}, max: {:.4}",
            self.rmse, self.mean, self.median, self.std, self.min, self.max
        )
    }
}

/// Residual statistics for one alignment outcome.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlignmentStats {
    /// Translation residual statistics (meters)
    pub translation: ErrorStats,

    /// Timestamp residual statistics (seconds)
    pub time_delta: ErrorStats,

    /// Number of matched pairs
    pub count: usize,
}

impl AlignmentStats {
    /// Compute residual statistics over matched pairs.
    ///
    /// Translation residuals are the Euclidean distances between the matched
    /// positions; timestamp residuals are the per-pair nearest-match
    /// differences. No matches yield the all-zero default.
    pub fn from_matches(matches: &[MatchedPair]) -> Self {
        if matches.is_empty() {
            return Self::default();
        }

        let translation_errors: Vec<f64> = matches
            .iter()
            .map(|m| m.reference.pose.translation_distance(&m.candidate.pose))
            .collect();
        let time_errors: Vec<f64> = matches.iter().map(|m| m.time_delta).collect();

        Self {
            translation: ErrorStats::from_values(&translation_errors),
            time_delta: ErrorStats::from_values(&time_errors),
            count: matches.len(),
        }
    }

    /// Print the residual block.
    pub fn print(&self) {
        println!("=== Alignment Residuals ===");
        println!("Matched pairs: {}", self.count);
        println!(
            "Translation RMSE: {:.6} m (mean: {:.6}, std: {:.6})",
            self.translation.rmse, self.translation.mean, self.translation.std
        );
        println!(
            "Time RMSE:        {:.6} s (mean: {:.6}, std: {:.6})",
            self.time_delta.rmse, self.time_delta.mean, self.time_delta.std
        );
    }
}
