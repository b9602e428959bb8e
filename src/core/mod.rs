//! Core foundation layer.
//!
//! Bottom layer of the alignment stack with no internal dependencies.
//! All other layers depend on core.

pub mod types;
