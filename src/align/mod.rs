//! Align Layer - sweep of candidate clock offsets
//!
//! Composes resampling and matching into the full offset search.

mod offset_search;

pub use offset_search::{OffsetCandidate, OffsetSearch, SearchConfig, SearchResult, search_offset};
