//! IO Layer - trajectory file formats

mod tum;

pub use tum::{load_trajectory, read_trajectory, save_records, save_trajectory, write_records};
