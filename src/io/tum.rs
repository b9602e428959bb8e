//! TUM trajectory file reading and writing.
//!
//! The TUM format is one record per line, eight whitespace-separated fields:
//!
//! ```text
//! timestamp x y z qx qy qz qw
//! ```
//!
//! Lines that are blank, start with `#` or carry the wrong number of fields
//! are skipped; a line with eight fields where one is not a number is a
//! format error. Loaded records are sorted by timestamp, never deduplicated.
//! Values are written with six decimal places.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::core::types::{Pose, PoseRecord, Trajectory};
use crate::error::{Error, Result};

/// Fields per TUM record: timestamp plus seven pose components.
const TOKENS_PER_RECORD: usize = 8;

/// Load a TUM trajectory file.
pub fn load_trajectory(path: impl AsRef<Path>) -> Result<Trajectory> {
    let file = File::open(path.as_ref())?;
    let trajectory = read_trajectory(BufReader::new(file))?;
    log::info!(
        "Loaded {} poses from {}",
        trajectory.len(),
        path.as_ref().display()
    );
    Ok(trajectory)
}

/// Parse TUM records from any buffered reader.
pub fn read_trajectory<R: BufRead>(reader: R) -> Result<Trajectory> {
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        if tokens.len() != TOKENS_PER_RECORD {
            log::debug!(
                "Skipping line {}: expected {} fields, found {}",
                index + 1,
                TOKENS_PER_RECORD,
                tokens.len()
            );
            continue;
        }

        let mut values = [0.0f64; TOKENS_PER_RECORD];
        for (value, token) in values.iter_mut().zip(tokens.iter()) {
            *value = token.parse().map_err(|_| Error::Format {
                line: index + 1,
                token: (*token).to_string(),
            })?;
        }
        records.push(PoseRecord::new(
            values[0],
            Pose::new(
                values[1], values[2], values[3], values[4], values[5], values[6], values[7],
            ),
        ));
    }

    Ok(Trajectory::from_records(records))
}

/// Write a trajectory to a TUM file.
pub fn save_trajectory(path: impl AsRef<Path>, trajectory: &Trajectory) -> Result<()> {
    save_records(path, trajectory.records())
}

/// Write pose records to a TUM file.
pub fn save_records(path: impl AsRef<Path>, records: &[PoseRecord]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, records)?;
    writer.flush()?;
    log::info!("Wrote {} poses to {}", records.len(), path.as_ref().display());
    Ok(())
}

/// Write pose records to any writer, one TUM line per record.
pub fn write_records<W: Write>(writer: &mut W, records: &[PoseRecord]) -> Result<()> {
    for record in records {
        let p = &record.pose;
        writeln!(
            writer,
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
            record.timestamp, p.x, p.y, p.z, p.qx, p.qy, p.qz, p.qw
        )?;
    }
    Ok(())
}
