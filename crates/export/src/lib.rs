//! Export helpers for stored maneuver chains: a JSON library file and a flat CSV table.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),
    #[error("malformed chain file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod chains {
    use std::fs::File;
    use std::io::{BufReader, Read, Write};
    use std::path::Path;

    use karto_maneuver::StoredManeuvers;
    use serde::{Deserialize, Serialize};
    use serde_json::to_writer_pretty;

    use super::{ExportError, writer_for_path};

    /// Bumped when the layout of [`ChainFile`] changes.
    pub const FORMAT_VERSION: u32 = 1;

    /// On-disk library of stored plans. Each burn is a `[radial, normal, prograde, ut]` array.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct ChainFile {
        pub version: u32,
        /// Vessel the plans were stored for.
        pub vessel: String,
        /// Clock at save time (s).
        pub saved_at_ut: f64,
        pub chains: StoredManeuvers,
    }

    impl ChainFile {
        pub fn new(vessel: impl Into<String>, saved_at_ut: f64, chains: StoredManeuvers) -> Self {
            Self {
                version: FORMAT_VERSION,
                vessel: vessel.into(),
                saved_at_ut,
                chains,
            }
        }
    }

    pub fn write_chains(writer: &mut dyn Write, file: &ChainFile) -> Result<(), ExportError> {
        to_writer_pretty(&mut *writer, file)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_chains<R: Read>(reader: R) -> Result<ChainFile, ExportError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn save_chains(path: &Path, file: &ChainFile) -> Result<(), ExportError> {
        let mut writer = writer_for_path(path)?;
        write_chains(writer.as_mut(), file)
    }

    pub fn load_chains(path: &Path) -> Result<ChainFile, ExportError> {
        read_chains(BufReader::new(File::open(path)?))
    }
}

pub mod table {
    use std::io::Write;

    use karto_maneuver::StoredManeuvers;
    use serde::Serialize;

    use super::ExportError;

    /// One burn of one stored chain, flattened for spreadsheets.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct BurnRow {
        pub chain: usize,
        pub burn: usize,
        pub radial_m_s: f64,
        pub normal_m_s: f64,
        pub prograde_m_s: f64,
        pub ut: f64,
        pub magnitude_m_s: f64,
    }

    pub fn rows(stored: &StoredManeuvers) -> Vec<BurnRow> {
        stored
            .iter()
            .enumerate()
            .flat_map(|(chain, plan)| {
                plan.burns().iter().enumerate().map(move |(burn, b)| BurnRow {
                    chain,
                    burn,
                    radial_m_s: b.delta_v.radial,
                    normal_m_s: b.delta_v.normal,
                    prograde_m_s: b.delta_v.prograde,
                    ut: b.ut,
                    magnitude_m_s: b.magnitude(),
                })
            })
            .collect()
    }

    /// Write every burn of `stored` as CSV, header first. Nothing is written for an empty library.
    pub fn write_table(writer: &mut dyn Write, stored: &StoredManeuvers) -> Result<usize, ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        let rows = rows(stored);
        for row in &rows {
            csv.serialize(row)?;
        }
        csv.flush()?;
        Ok(rows.len())
    }
}
