//! Nearest-timestamp correspondence search.
//!
//! For every reference record the matcher scans all candidate timestamps for
//! the smallest absolute difference and keeps the pair when that difference
//! passes the tolerance gate. The scan is O(|reference| × |candidate|), which
//! is the dominant cost inside the offset sweep, so the candidate timestamp
//! buffer lives in the matcher and is reused across calls instead of being
//! rebuilt from scratch on every invocation.

use serde::{Deserialize, Serialize};

use crate::core::types::PoseRecord;

/// How reference records may claim candidate records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPolicy {
    /// Every reference record matches independently; several reference
    /// records may claim the same candidate record.
    #[default]
    Greedy,
    /// First match wins. Once a candidate record is claimed, a later
    /// reference record whose nearest candidate is already taken is dropped;
    /// it is not handed its second-nearest candidate.
    OneToOne,
}

/// One reference/candidate correspondence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// The reference record
    pub reference: PoseRecord,
    /// The matched candidate record
    pub candidate: PoseRecord,
    /// Absolute timestamp difference in seconds
    pub time_delta: f64,
}

/// Nearest-timestamp matcher with reusable scratch buffers.
#[derive(Debug, Default)]
pub struct NearestTimeMatcher {
    policy: MatchPolicy,
    /// Candidate timestamps, refilled (not re-allocated) per call
    times: Vec<f64>,
    /// Claim marks for one-to-one matching, indexed like `times`
    claimed: Vec<bool>,
}

impl NearestTimeMatcher {
    /// Create a matcher with the given claim policy.
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            times: Vec::new(),
            claimed: Vec::new(),
        }
    }

    /// The configured claim policy.
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Pair every reference record with its nearest candidate record within
    /// `max_time_diff` seconds.
    ///
    /// Reference records whose nearest candidate sits outside the tolerance
    /// produce no pair; ties on the time difference keep the earliest
    /// candidate index. Either input being empty yields an empty result.
    /// Pairs come out in reference order.
    pub fn align(
        &mut self,
        reference: &[PoseRecord],
        candidate: &[PoseRecord],
        max_time_diff: f64,
    ) -> Vec<MatchedPair> {
        let mut pairs = Vec::new();
        self.scan(reference, candidate, max_time_diff, |reference, candidate, time_delta| {
            pairs.push(MatchedPair {
                reference,
                candidate,
                time_delta,
            });
        });
        pairs
    }

    /// Number of pairs [`NearestTimeMatcher::align`] would produce, without
    /// building them.
    ///
    /// The offset sweep only needs counts, so this path avoids allocating a
    /// pair vector for every candidate offset.
    pub fn match_count(
        &mut self,
        reference: &[PoseRecord],
        candidate: &[PoseRecord],
        max_time_diff: f64,
    ) -> usize {
        let mut count = 0;
        self.scan(reference, candidate, max_time_diff, |_, _, _| count += 1);
        count
    }

    /// Shared scan loop driving both entry points.
    fn scan<F>(
        &mut self,
        reference: &[PoseRecord],
        candidate: &[PoseRecord],
        max_time_diff: f64,
        mut emit: F,
    ) where
        F: FnMut(PoseRecord, PoseRecord, f64),
    {
        if reference.is_empty() || candidate.is_empty() {
            return;
        }

        self.times.clear();
        self.times.extend(candidate.iter().map(|r| r.timestamp));
        let one_to_one = self.policy == MatchPolicy::OneToOne;
        if one_to_one {
            self.claimed.clear();
            self.claimed.resize(self.times.len(), false);
        }

        for ref_record in reference {
            let mut best_index = 0;
            let mut best_diff = (self.times[0] - ref_record.timestamp).abs();
            for (index, &t) in self.times.iter().enumerate().skip(1) {
                let diff = (t - ref_record.timestamp).abs();
                if diff < best_diff {
                    best_diff = diff;
                    best_index = index;
                }
            }

            if one_to_one && self.claimed[best_index] {
                continue;
            }
            if best_diff <= max_time_diff {
                if one_to_one {
                    self.claimed[best_index] = true;
                }
                emit(*ref_record, candidate[best_index], best_diff);
            }
        }
    }
}
