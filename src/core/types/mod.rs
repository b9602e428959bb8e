//! Core data types for trajectory alignment.
//!
//! - [`Pose`]: 6-DoF pose as 7 raw components
//! - [`PoseRecord`]: a pose observed at an instant
//! - [`Trajectory`]: time-ordered pose sequence

mod pose;
mod trajectory;

pub use pose::Pose;
pub use trajectory::{PoseRecord, Trajectory};
