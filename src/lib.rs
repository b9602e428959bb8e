//! SamayaAlign - Clock offset recovery for 6-DoF pose trajectories
//!
//! Two trajectory recordings of the same motion rarely share a clock: the
//! ground-truth rig and the estimator each stamp poses with their own time
//! base. This crate finds the scalar offset between the two clocks by
//! sweeping candidate offsets and scoring each one by how many poses the
//! shifted target can explain.
//!
//! # Architecture
//!
//! The crate is organized into 5 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      bin/                           │  ← Executables
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      io/                            │  ← File formats
//! │                   (TUM codec)                       │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              align/      evaluation/                │  ← Orchestration
//! │        (offset sweep)  (residual stats)             │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                  algorithms/                        │  ← Core algorithms
//! │            (interpolation, matching)                │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     core/                           │  ← Foundation
//! │                    (types)                          │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Pipeline
//!
//! 1. Load both trajectories from TUM files; records sort by timestamp.
//! 2. For every candidate offset on the configured grid, shift the target
//!    clock, resample the shifted target at the reference timestamps and
//!    count the reference records that find a nearest resampled pose within
//!    the matching tolerance.
//! 3. Keep the candidate with the highest count (earliest wins a tie) and
//!    re-evaluate it once to recover the matched pairs.
//! 4. Summarize the leftover translation and timestamp residuals.
//!
//! # Example
//!
//! ```no_run
//! use samaya_align::{load_trajectory, search_offset, SearchConfig};
//!
//! fn main() -> samaya_align::Result<()> {
//!     let reference = load_trajectory("groundtruth.txt")?;
//!     let target = load_trajectory("estimated.txt")?;
//!
//!     let config = SearchConfig {
//!         offset_min: -30.0,
//!         offset_max: 30.0,
//!         step: 0.5,
//!         ..SearchConfig::default()
//!     };
//!     let result = search_offset(&reference, &target, config)?;
//!     println!(
//!         "clock offset: {:+.2} s ({} matches)",
//!         result.best_offset, result.best_match_count
//!     );
//!     Ok(())
//! }
//! ```

// ============================================================================
// Error handling
// ============================================================================
pub mod error;

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Algorithms (depends on core)
// ============================================================================
pub mod algorithms;

// ============================================================================
// Layer 3: Offset search (depends on core, algorithms)
// ============================================================================
pub mod align;

// ============================================================================
// Layer 4: Evaluation (depends on core, algorithms)
// ============================================================================
pub mod evaluation;

// ============================================================================
// Layer 5: I/O (depends on core)
// ============================================================================
pub mod io;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

// Errors
pub use crate::error::{Error, Result};

// Core types
pub use crate::core::types::{Pose, PoseRecord, Trajectory};

// Algorithms - Interpolation
pub use crate::algorithms::interpolation::{resample, resample_shifted, resample_shifted_into};

// Algorithms - Matching
pub use crate::algorithms::matching::{MatchPolicy, MatchedPair, NearestTimeMatcher};

// Offset search
pub use crate::align::{OffsetCandidate, OffsetSearch, SearchConfig, SearchResult, search_offset};

// Evaluation
pub use crate::evaluation::{AlignmentStats, ErrorStats};

// I/O
pub use crate::io::{
    load_trajectory, read_trajectory, save_records, save_trajectory, write_records,
};
