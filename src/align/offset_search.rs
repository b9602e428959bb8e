//! Clock-offset search between two independently timestamped trajectories.
//!
//! The search sweeps a grid of candidate offsets. Each candidate shifts the
//! target clock, resamples the shifted target at the reference timestamps and
//! counts how many reference records find a nearest resampled record within
//! the matching tolerance. The candidate with the highest count wins; on a
//! tie the earliest candidate in sweep order is kept, so results do not
//! depend on evaluation order and the parallel sweep is bit-identical to the
//! serial one.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::algorithms::interpolation::resample_shifted_into;
use crate::algorithms::matching::{MatchPolicy, MatchedPair, NearestTimeMatcher};
use crate::core::types::{PoseRecord, Trajectory};
use crate::error::{Error, Result};

/// Parameters of the offset sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Lowest candidate offset (inclusive), in seconds
    pub offset_min: f64,
    /// Highest candidate offset (inclusive when the grid reaches it), in seconds
    pub offset_max: f64,
    /// Grid spacing, in seconds
    pub step: f64,
    /// Matching tolerance, in seconds
    pub max_time_diff: f64,
    /// How matched target records may be claimed
    pub policy: MatchPolicy,
    /// Score candidates across the rayon thread pool
    pub use_parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            offset_min: -3000.0, // seconds
            offset_max: 3000.0,  // seconds
            step: 1.0,           // seconds
            max_time_diff: 0.5,  // seconds
            policy: MatchPolicy::Greedy,
            use_parallel: false,
        }
    }
}

impl SearchConfig {
    /// Hard ceiling on the candidate grid size accepted by
    /// [`SearchConfig::validate`].
    pub const MAX_CANDIDATES: usize = 10_000_000;

    /// Check the parameters for a usable sweep.
    pub fn validate(&self) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "offset step must be positive, got {}",
                self.step
            )));
        }
        if !self.offset_min.is_finite()
            || !self.offset_max.is_finite()
            || self.offset_min > self.offset_max
        {
            return Err(Error::InvalidParameter(format!(
                "offset range [{}, {}] is not ascending",
                self.offset_min, self.offset_max
            )));
        }
        if !self.max_time_diff.is_finite() || self.max_time_diff < 0.0 {
            return Err(Error::InvalidParameter(format!(
                "matching tolerance must be non-negative, got {}",
                self.max_time_diff
            )));
        }
        if (self.offset_max - self.offset_min) / self.step >= Self::MAX_CANDIDATES as f64 {
            return Err(Error::InvalidParameter(format!(
                "offset grid would exceed {} candidates",
                Self::MAX_CANDIDATES
            )));
        }
        Ok(())
    }

    /// Number of candidate offsets on the grid.
    #[inline]
    pub fn candidate_count(&self) -> usize {
        // The epsilon absorbs quotient rounding so a span that is an exact
        // multiple of the step still reaches offset_max; a non-divisible
        // span never overshoots it.
        let steps = ((self.offset_max - self.offset_min) / self.step + 1e-9).floor();
        (steps as usize).saturating_add(1)
    }

    /// The `index`-th candidate offset.
    ///
    /// Candidates come from one multiplication per index, not a running sum,
    /// so long sweeps do not accumulate rounding error.
    #[inline]
    pub fn candidate_at(&self, index: usize) -> f64 {
        self.offset_min + index as f64 * self.step
    }
}

/// Match count recorded for one candidate offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetCandidate {
    /// Candidate offset in seconds
    pub offset: f64,
    /// Matches scored at this offset
    pub match_count: usize,
}

/// Outcome of a completed sweep.
///
/// A sweep where no candidate matched anything is still a valid outcome;
/// check [`SearchResult::has_matches`] before trusting `best_offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Winning offset in seconds; adding it to the target clock aligns the
    /// target with the reference
    pub best_offset: f64,
    /// Matches scored by the winning offset
    pub best_match_count: usize,
    /// Correspondences at the winning offset, in reference order
    pub best_matches: Vec<MatchedPair>,
    /// Per-candidate counts in sweep order
    pub trace: Vec<OffsetCandidate>,
}

impl SearchResult {
    /// Whether any candidate produced at least one match.
    #[inline]
    pub fn has_matches(&self) -> bool {
        self.best_match_count > 0
    }

    /// Reference-side records of the matched pairs.
    pub fn aligned_reference(&self) -> Vec<PoseRecord> {
        self.best_matches.iter().map(|m| m.reference).collect()
    }

    /// Target-side records of the matched pairs, on the shifted clock.
    pub fn aligned_target(&self) -> Vec<PoseRecord> {
        self.best_matches.iter().map(|m| m.candidate).collect()
    }
}

/// Offset sweep engine.
///
/// Owns the matcher and resampling buffer so repeated searches reuse their
/// allocations.
#[derive(Debug)]
pub struct OffsetSearch {
    config: SearchConfig,
    matcher: NearestTimeMatcher,
    resampled: Vec<PoseRecord>,
}

impl OffsetSearch {
    /// Create an engine after validating the configuration.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            matcher: NearestTimeMatcher::new(config.policy),
            resampled: Vec::new(),
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Sweep the offset grid and return the best alignment of `target`
    /// against `reference`.
    ///
    /// The sweep stores only per-candidate counts; the winning offset is
    /// evaluated once more at the end to recover its correspondences.
    pub fn search(&mut self, reference: &Trajectory, target: &Trajectory) -> Result<SearchResult> {
        if reference.is_empty() {
            return Err(Error::EmptyTrajectory("reference"));
        }
        if target.is_empty() {
            return Err(Error::EmptyTrajectory("target"));
        }

        let query_times = reference.timestamps();
        let counts = if self.config.use_parallel {
            self.sweep_parallel(&query_times, reference, target)
        } else {
            self.sweep_serial(&query_times, reference, target)
        };

        // Strictly-greater wins, so a tie keeps the earliest candidate.
        let mut best_index = 0;
        for (index, &count) in counts.iter().enumerate().skip(1) {
            if count > counts[best_index] {
                best_index = index;
                log::debug!(
                    "New best offset {:+.3} s with {} matches",
                    self.config.candidate_at(index),
                    count
                );
            }
        }
        let best_offset = self.config.candidate_at(best_index);
        if counts[best_index] == 0 {
            log::warn!(
                "No candidate offset matched anything within {:.3} s",
                self.config.max_time_diff
            );
        }

        let trace: Vec<OffsetCandidate> = counts
            .iter()
            .enumerate()
            .map(|(index, &match_count)| OffsetCandidate {
                offset: self.config.candidate_at(index),
                match_count,
            })
            .collect();

        resample_shifted_into(target, best_offset, &query_times, &mut self.resampled);
        let best_matches = self
            .matcher
            .align(reference.records(), &self.resampled, self.config.max_time_diff);

        log::info!(
            "Offset sweep: {} candidates in [{:.3}, {:.3}] s, best {:+.3} s with {} matches",
            trace.len(),
            self.config.offset_min,
            self.config.offset_max,
            best_offset,
            best_matches.len()
        );

        Ok(SearchResult {
            best_offset,
            best_match_count: counts[best_index],
            best_matches,
            trace,
        })
    }

    fn sweep_serial(
        &mut self,
        query_times: &[f64],
        reference: &Trajectory,
        target: &Trajectory,
    ) -> Vec<usize> {
        let config = self.config;
        let matcher = &mut self.matcher;
        let mut resampled = std::mem::take(&mut self.resampled);
        let counts = (0..config.candidate_count())
            .map(|index| {
                resample_shifted_into(
                    target,
                    config.candidate_at(index),
                    query_times,
                    &mut resampled,
                );
                matcher.match_count(reference.records(), &resampled, config.max_time_diff)
            })
            .collect();
        self.resampled = resampled;
        counts
    }

    fn sweep_parallel(
        &self,
        query_times: &[f64],
        reference: &Trajectory,
        target: &Trajectory,
    ) -> Vec<usize> {
        let config = self.config;
        (0..config.candidate_count())
            .into_par_iter()
            .map_init(
                || (NearestTimeMatcher::new(config.policy), Vec::new()),
                |(matcher, resampled), index| {
                    resample_shifted_into(
                        target,
                        config.candidate_at(index),
                        query_times,
                        resampled,
                    );
                    matcher.match_count(reference.records(), resampled, config.max_time_diff)
                },
            )
            .collect()
    }
}

/// One-shot sweep with the given configuration.
pub fn search_offset(
    reference: &Trajectory,
    target: &Trajectory,
    config: SearchConfig,
) -> Result<SearchResult> {
    OffsetSearch::new(config)?.search(reference, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Pose;
    use approx::assert_relative_eq;

    fn trajectory(stamps: &[f64]) -> Trajectory {
        let records = stamps
            .iter()
            .map(|&t| PoseRecord::new(t, Pose::from_position(t.sin(), t.cos(), 0.1 * t)))
            .collect();
        Trajectory::from_records(records)
    }

    fn wave_trajectory(start: f64, end: f64, step: f64) -> Trajectory {
        let count = ((end - start) / step).round() as usize;
        let stamps: Vec<f64> = (0..=count).map(|i| start + i as f64 * step).collect();
        trajectory(&stamps)
    }

    #[test]
    fn test_sweep_scores_every_candidate() {
        let reference = trajectory(&[0.0, 1.0, 2.0]);
        let target = reference.shifted(0.5);
        let config = SearchConfig {
            offset_min: -1.0,
            offset_max: 1.0,
            step: 0.5,
            max_time_diff: 0.1,
            ..SearchConfig::default()
        };

        let result = search_offset(&reference, &target, config).unwrap();

        let offsets: Vec<f64> = result.trace.iter().map(|c| c.offset).collect();
        let counts: Vec<usize> = result.trace.iter().map(|c| c.match_count).collect();
        for (got, want) in offsets.iter().zip([-1.0, -0.5, 0.0, 0.5, 1.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
        assert_eq!(counts, vec![2, 3, 2, 2, 1]);
        assert_relative_eq!(result.best_offset, -0.5, epsilon = 1e-9);
        assert_eq!(result.best_match_count, 3);
        assert_eq!(result.best_matches.len(), 3);
        assert!(result.has_matches());
        assert_eq!(result.aligned_reference().len(), result.aligned_target().len());
    }

    #[test]
    fn test_identical_clocks_score_best_at_zero() {
        let reference = wave_trajectory(0.0, 10.0, 1.0);
        let config = SearchConfig {
            offset_min: -2.0,
            offset_max: 2.0,
            step: 0.5,
            max_time_diff: 0.1,
            ..SearchConfig::default()
        };

        let result = search_offset(&reference, &reference.clone(), config).unwrap();

        assert_relative_eq!(result.best_offset, 0.0, epsilon = 1e-9);
        assert_eq!(result.best_match_count, reference.len());
    }

    #[test]
    fn test_recovers_known_clock_shift() {
        let reference = wave_trajectory(0.0, 20.0, 0.25);
        let target = reference.shifted(7.5);
        let config = SearchConfig {
            offset_min: -10.0,
            offset_max: 10.0,
            step: 0.25,
            max_time_diff: 0.1,
            ..SearchConfig::default()
        };

        let result = search_offset(&reference, &target, config).unwrap();

        assert_relative_eq!(result.best_offset, -7.5, epsilon = 1e-9);
        assert_eq!(result.best_match_count, reference.len());
        for pair in &result.best_matches {
            assert!(pair.time_delta <= config.max_time_diff);
        }
    }

    #[test]
    fn test_exact_overlay_matches_all_with_zero_tolerance() {
        let reference = trajectory(&[0.0, 1.0, 2.0, 3.0]);
        let config = SearchConfig {
            offset_min: 0.0,
            offset_max: 0.0,
            step: 1.0,
            max_time_diff: 0.0,
            ..SearchConfig::default()
        };

        let result = search_offset(&reference, &reference.clone(), config).unwrap();

        assert_eq!(result.trace.len(), 1);
        assert_eq!(result.best_match_count, reference.len());
        assert!(result.best_matches.iter().all(|m| m.time_delta == 0.0));
    }

    #[test]
    fn test_tied_candidates_keep_earliest_offset() {
        let reference = trajectory(&[0.0, 1.0, 2.0]);
        let config = SearchConfig {
            offset_min: -1.0,
            offset_max: 1.0,
            step: 2.0,
            max_time_diff: 0.1,
            ..SearchConfig::default()
        };

        // Both candidates score two matches; the sweep must keep -1.0.
        let result = search_offset(&reference, &reference.clone(), config).unwrap();

        assert_eq!(result.trace.len(), 2);
        assert_eq!(result.trace[0].match_count, result.trace[1].match_count);
        assert_relative_eq!(result.best_offset, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_disjoint_trajectories_yield_zero_matches() {
        let reference = trajectory(&[0.0, 1.0, 2.0]);
        let target = trajectory(&[1000.0, 1001.0]);
        let config = SearchConfig {
            offset_min: -1.0,
            offset_max: 1.0,
            step: 1.0,
            max_time_diff: 0.1,
            ..SearchConfig::default()
        };

        let result = search_offset(&reference, &target, config).unwrap();

        assert!(!result.has_matches());
        assert_eq!(result.best_match_count, 0);
        assert!(result.best_matches.is_empty());
        assert_eq!(result.trace.len(), 3);
        assert!(result.trace.iter().all(|c| c.match_count == 0));
        // The best offset falls back to the first candidate.
        assert_relative_eq!(result.best_offset, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_parallel_sweep_matches_serial() {
        let reference = wave_trajectory(0.0, 30.0, 0.25);
        let target = reference.shifted(3.75);
        let serial_config = SearchConfig {
            offset_min: -5.0,
            offset_max: 5.0,
            step: 0.25,
            max_time_diff: 0.1,
            ..SearchConfig::default()
        };
        let parallel_config = SearchConfig {
            use_parallel: true,
            ..serial_config
        };

        let serial = search_offset(&reference, &target, serial_config).unwrap();
        let parallel = search_offset(&reference, &target, parallel_config).unwrap();

        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_one_to_one_policy_scores_fewer_matches() {
        let reference = trajectory(&[0.0, 0.05]);
        let target = trajectory(&[0.0]);
        let base = SearchConfig {
            offset_min: 0.0,
            offset_max: 0.0,
            step: 1.0,
            max_time_diff: 0.1,
            ..SearchConfig::default()
        };
        let one_to_one = SearchConfig {
            policy: MatchPolicy::OneToOne,
            ..base
        };

        let greedy = search_offset(&reference, &target, base).unwrap();
        let exclusive = search_offset(&reference, &target, one_to_one).unwrap();

        assert_eq!(greedy.best_match_count, 2);
        assert_eq!(exclusive.best_match_count, 1);
    }

    #[test]
    fn test_empty_trajectory_is_rejected() {
        let empty = Trajectory::default();
        let some = trajectory(&[0.0, 1.0]);
        let mut engine = OffsetSearch::new(SearchConfig::default()).unwrap();

        assert!(matches!(
            engine.search(&empty, &some),
            Err(Error::EmptyTrajectory("reference"))
        ));
        assert!(matches!(
            engine.search(&some, &empty),
            Err(Error::EmptyTrajectory("target"))
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let bad_step = SearchConfig {
            step: 0.0,
            ..SearchConfig::default()
        };
        let bad_range = SearchConfig {
            offset_min: 5.0,
            offset_max: -5.0,
            ..SearchConfig::default()
        };
        let bad_tolerance = SearchConfig {
            max_time_diff: -0.5,
            ..SearchConfig::default()
        };

        for config in [bad_step, bad_range, bad_tolerance] {
            assert!(matches!(
                OffsetSearch::new(config),
                Err(Error::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        // A positive finite step can still imply more candidates than the
        // sweep could ever enumerate.
        let config = SearchConfig {
            step: 1e-16,
            ..SearchConfig::default()
        };

        assert!(config.candidate_count() >= SearchConfig::MAX_CANDIDATES);
        assert!(config.validate().is_err());
        assert!(matches!(
            OffsetSearch::new(config),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_candidate_grid_covers_the_range() {
        let config = SearchConfig::default();
        assert_eq!(config.candidate_count(), 6001);
        assert_relative_eq!(config.candidate_at(0), -3000.0);
        assert_relative_eq!(config.candidate_at(6000), 3000.0);

        let fractional = SearchConfig {
            offset_min: 0.0,
            offset_max: 1.0,
            step: 0.3,
            ..SearchConfig::default()
        };
        assert_eq!(fractional.candidate_count(), 4);
        let last = fractional.candidate_at(fractional.candidate_count() - 1);
        assert!(last <= fractional.offset_max);
        assert_relative_eq!(last, 0.9, epsilon = 1e-9);
    }
}
