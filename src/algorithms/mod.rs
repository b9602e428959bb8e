//! Algorithms Layer - trajectory resampling and correspondence search
//!
//! Pure functions and small stateful helpers over the core types. Nothing in
//! this layer touches the filesystem or knows about the offset sweep; the
//! align layer composes these pieces into the full search.

pub mod interpolation;
pub mod matching;
