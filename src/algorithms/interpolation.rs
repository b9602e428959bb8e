//! Linear resampling of a trajectory onto arbitrary query timestamps.
//!
//! Each query is answered by blending the two records bracketing it in time.
//! All 7 pose components are blended linearly; the orientation part gets the
//! same treatment as the translation part, so no spherical interpolation
//! happens and blended quaternions are generally not unit norm. Queries
//! outside the trajectory's time span produce no output record.

use crate::core::types::{Pose, PoseRecord, Trajectory};

/// Resample `trajectory` at the given query timestamps.
///
/// Equivalent to [`resample_shifted`] with a zero shift.
pub fn resample(trajectory: &Trajectory, query_times: &[f64]) -> Vec<PoseRecord> {
    resample_shifted(trajectory, 0.0, query_times)
}

/// Resample a logically shifted trajectory at the given query timestamps.
///
/// The trajectory is treated as if every timestamp were increased by
/// `time_shift`; no shifted copy is materialized. Queries are answered in
/// the order given and are not required to be sorted. A query outside the
/// closed interval spanned by the shifted trajectory is dropped, so the
/// output may be shorter than `query_times`. Output records carry the query
/// timestamp. An empty trajectory yields an empty output.
pub fn resample_shifted(
    trajectory: &Trajectory,
    time_shift: f64,
    query_times: &[f64],
) -> Vec<PoseRecord> {
    let mut out = Vec::new();
    resample_shifted_into(trajectory, time_shift, query_times, &mut out);
    out
}

/// [`resample_shifted`] writing into a caller-owned buffer.
///
/// Clears `out` first. The offset sweep evaluates thousands of candidate
/// shifts against the same query set and reuses one buffer across all of
/// them.
pub fn resample_shifted_into(
    trajectory: &Trajectory,
    time_shift: f64,
    query_times: &[f64],
    out: &mut Vec<PoseRecord>,
) {
    out.clear();
    let records = trajectory.records();
    let (first, last) = match (records.first(), records.last()) {
        (Some(f), Some(l)) => (f.timestamp + time_shift, l.timestamp + time_shift),
        _ => return,
    };

    for &t in query_times {
        if t < first || t > last {
            continue;
        }
        // Bracket on the unshifted time axis.
        let local = t - time_shift;
        let upper = records.partition_point(|r| r.timestamp <= local);
        // Rounding of the shifted bounds can land an in-range query a hair
        // outside the record span; clamp to the end records.
        let (i1, i2) = if upper == 0 {
            (0, 0)
        } else if upper == records.len() {
            (records.len() - 1, records.len() - 1)
        } else {
            (upper - 1, upper)
        };

        let (t1, t2) = (records[i1].timestamp, records[i2].timestamp);
        // Duplicate timestamps bracket the query: pick the left record
        // instead of dividing by zero.
        let alpha = if t2 > t1 { (local - t1) / (t2 - t1) } else { 0.0 };
        let pose = Pose::lerp(&records[i1].pose, &records[i2].pose, alpha);
        out.push(PoseRecord::new(t, pose));
    }
}
