//! Timestamped pose records and time-ordered trajectories.

use serde::{Deserialize, Serialize};

use super::pose::Pose;

/// A pose observed at an instant.
///
/// Timestamps are floating-point seconds on an arbitrary epoch; negative
/// values are valid. Records are immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseRecord {
    /// Observation time in seconds
    pub timestamp: f64,
    /// The observed pose
    pub pose: Pose,
}

impl PoseRecord {
    /// Create a new record.
    #[inline]
    pub fn new(timestamp: f64, pose: Pose) -> Self {
        Self { timestamp, pose }
    }

    /// Copy of this record with `offset` added to the timestamp.
    #[inline]
    pub fn shifted(&self, offset: f64) -> Self {
        Self::new(self.timestamp + offset, self.pose)
    }
}

/// A time-ordered sequence of pose records.
///
/// Records are sorted ascending by timestamp at construction and every
/// transform preserves that order. Duplicate timestamps are allowed and are
/// never deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    records: Vec<PoseRecord>,
}

impl Trajectory {
    /// Build a trajectory, sorting records ascending by timestamp.
    ///
    /// The sort is stable, so records sharing a timestamp keep their input
    /// order.
    pub fn from_records(mut records: Vec<PoseRecord>) -> Self {
        records.sort_by(|a, b| {
            a.timestamp
                .partial_cmp(&b.timestamp)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { records }
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the trajectory holds no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The sorted records.
    #[inline]
    pub fn records(&self) -> &[PoseRecord] {
        &self.records
    }

    /// Iterator over the sorted records.
    pub fn iter(&self) -> std::slice::Iter<'_, PoseRecord> {
        self.records.iter()
    }

    /// Timestamp of the first record.
    pub fn start_time(&self) -> Option<f64> {
        self.records.first().map(|r| r.timestamp)
    }

    /// Timestamp of the last record.
    pub fn end_time(&self) -> Option<f64> {
        self.records.last().map(|r| r.timestamp)
    }

    /// Time span between the first and last record, 0 when fewer than two
    /// records exist.
    pub fn duration(&self) -> f64 {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => end - start,
            _ => 0.0,
        }
    }

    /// Timestamps of all records, in record order.
    pub fn timestamps(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.timestamp).collect()
    }

    /// New trajectory with `offset` added to every timestamp.
    ///
    /// A constant shift preserves record order, so the result needs no
    /// re-sort. The original is untouched.
    pub fn shifted(&self, offset: f64) -> Trajectory {
        Trajectory {
            records: self.records.iter().map(|r| r.shifted(offset)).collect(),
        }
    }

    /// New trajectory with timestamps re-expressed relative to the first
    /// record, which becomes t = 0.
    ///
    /// An empty trajectory rebases to an empty trajectory.
    pub fn rebased(&self) -> Trajectory {
        match self.start_time() {
            Some(base) => self.shifted(-base),
            None => Trajectory::default(),
        }
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a PoseRecord;
    type IntoIter = std::slice::Iter<'a, PoseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(t: f64, x: f64) -> PoseRecord {
        PoseRecord::new(t, Pose::from_position(x, 0.0, 0.0))
    }

    #[test]
    fn test_from_records_sorts_ascending() {
        let traj = Trajectory::from_records(vec![
            record(2.0, 2.0),
            record(0.0, 0.0),
            record(1.0, 1.0),
        ]);
        let stamps = traj.timestamps();
        assert_eq!(stamps, vec![0.0, 1.0, 2.0]);
        assert_eq!(traj.records()[1].pose.x, 1.0);
    }

    #[test]
    fn test_duplicate_timestamps_keep_input_order() {
        let traj = Trajectory::from_records(vec![
            record(1.0, 10.0),
            record(0.5, 5.0),
            record(1.0, 20.0),
        ]);
        assert_eq!(traj.len(), 3);
        // Stable sort: the x = 10 record stays ahead of the x = 20 record.
        assert_eq!(traj.records()[1].pose.x, 10.0);
        assert_eq!(traj.records()[2].pose.x, 20.0);
    }

    #[test]
    fn test_shifted_adds_offset_and_preserves_original() {
        let traj = Trajectory::from_records(vec![record(0.0, 0.0), record(1.0, 1.0)]);
        let shifted = traj.shifted(2.5);
        assert_eq!(shifted.timestamps(), vec![2.5, 3.5]);
        assert_eq!(traj.timestamps(), vec![0.0, 1.0]);
        // Poses travel unchanged.
        assert_eq!(shifted.records()[1].pose, traj.records()[1].pose);
    }

    #[test]
    fn test_negative_shift() {
        let traj = Trajectory::from_records(vec![record(1.0, 0.0)]);
        assert_eq!(traj.shifted(-3.0).timestamps(), vec![-2.0]);
    }

    #[test]
    fn test_rebased_starts_at_zero() {
        let traj = Trajectory::from_records(vec![record(100.25, 0.0), record(101.75, 1.0)]);
        let rebased = traj.rebased();
        assert_relative_eq!(rebased.start_time().unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(rebased.end_time().unwrap(), 1.5, epsilon = 1e-12);
        assert!(Trajectory::default().rebased().is_empty());
    }

    #[test]
    fn test_span_accessors() {
        let traj = Trajectory::from_records(vec![record(3.0, 0.0), record(1.0, 0.0)]);
        assert_eq!(traj.start_time(), Some(1.0));
        assert_eq!(traj.end_time(), Some(3.0));
        assert_relative_eq!(traj.duration(), 2.0, epsilon = 1e-12);

        let empty = Trajectory::default();
        assert_eq!(empty.start_time(), None);
        assert_eq!(empty.duration(), 0.0);
        assert!(empty.is_empty());
    }
}
