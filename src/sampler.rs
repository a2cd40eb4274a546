//! Offline sampling stage: reduce the full application table to a small,
//! reproducible `clients.csv` the dashboard can load instantly.
//!
//! The source export is large (hundreds of thousands of rows, 122 columns)
//! and full of gaps. This stage keeps only the columns the scorer needs,
//! drops rows that are incomplete or carry out-of-domain values, draws a
//! seeded fixed-size sample, and writes it atomically. Same source, same
//! size, same seed: byte-for-byte the same output.

use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config;
use crate::error::{Result, ScorecardError};
use crate::models::client::ClientRecord;

// ---------------------------------------------------------------------------
// SampleConfig
// ---------------------------------------------------------------------------

/// Where to read, where to write, how many rows, and which seed.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Source CSV with the full application table (`.gz` handled
    /// transparently).
    pub source: PathBuf,
    /// Destination for the sampled table.
    pub out: PathBuf,
    /// Number of rows to draw.
    pub size: usize,
    /// RNG seed; reruns with the same seed reproduce the same sample.
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(config::DEFAULT_SOURCE_FILE),
            out: PathBuf::from(config::DEFAULT_CLIENTS_FILE),
            size: config::DEFAULT_SAMPLE_SIZE,
            seed: config::DEFAULT_SAMPLE_SEED,
        }
    }
}

/// Row counts from one sampling run, for logging and operator feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSummary {
    /// Data rows read from the source.
    pub rows_read: usize,
    /// Rows dropped because a required cell was empty.
    pub rows_missing: usize,
    /// Rows dropped because a value was out of domain (positive day offset,
    /// negative amount, non-finite number).
    pub rows_invalid: usize,
    /// Rows written to the output table (always the requested size).
    pub rows_written: usize,
}

// ---------------------------------------------------------------------------
// Sampling pipeline
// ---------------------------------------------------------------------------

/// Positions of the required columns within the source header.
struct ColumnIndices {
    id: usize,
    features: [usize; 8],
}

impl ColumnIndices {
    /// Resolve every required column against the header, by name. Column
    /// order in the source does not matter; any missing column aborts before
    /// a single row is read.
    fn resolve(source: &Path, headers: &csv::StringRecord) -> Result<Self> {
        let mut index_of: HashMap<&str, usize> = HashMap::new();
        let mut missing = Vec::new();
        for name in config::required_columns() {
            match headers.iter().position(|h| h == name) {
                Some(i) => {
                    index_of.insert(name, i);
                }
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            return Err(ScorecardError::Data(format!(
                "{}: missing required columns: {}",
                source.display(),
                missing.join(", ")
            )));
        }

        let mut features = [0usize; 8];
        for (slot, name) in features.iter_mut().zip(config::FEATURE_COLUMNS) {
            *slot = index_of[name];
        }
        Ok(Self {
            id: index_of[config::ID_COLUMN],
            features,
        })
    }
}

fn parse_number(raw: &str, column: &str, row: usize) -> Result<f64> {
    raw.parse::<f64>().map_err(|_| {
        ScorecardError::Data(format!(
            "row {}: column {} holds '{}', expected a number",
            row, column, raw
        ))
    })
}

/// Read the source table and return every complete, in-domain row, plus the
/// counts of what was dropped along the way.
///
/// An empty required cell drops the row (that is what "incomplete" means in
/// the source export). A non-empty cell that fails to parse is a different
/// matter: the file does not mean what we think it means, so the run aborts.
fn read_valid_rows(config: &SampleConfig) -> Result<(Vec<ClientRecord>, usize, usize, usize)> {
    let file = fs::File::open(&config.source).map_err(|e| {
        ScorecardError::Data(format!("cannot open {}: {}", config.source.display(), e))
    })?;
    let reader: Box<dyn Read> =
        if config.source.extension().and_then(|e| e.to_str()) == Some("gz") {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| {
            ScorecardError::Data(format!("{}: {}", config.source.display(), e))
        })?
        .clone();
    let columns = ColumnIndices::resolve(&config.source, &headers)?;

    let mut valid = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_missing = 0usize;
    let mut rows_invalid = 0usize;

    for (index, row) in csv_reader.records().enumerate() {
        let row = row.map_err(|e| {
            ScorecardError::Data(format!("{} row {}: {}", config.source.display(), index + 1, e))
        })?;
        rows_read += 1;

        let mut cells = Vec::with_capacity(9);
        let mut complete = true;
        for &i in std::iter::once(&columns.id).chain(columns.features.iter()) {
            match row.get(i).map(str::trim) {
                Some(cell) if !cell.is_empty() => cells.push(cell),
                _ => {
                    complete = false;
                    break;
                }
            }
        }
        if !complete {
            rows_missing += 1;
            continue;
        }

        let id = cells[0].parse::<i64>().map_err(|_| {
            ScorecardError::Data(format!(
                "row {}: column {} holds '{}', expected an integer id",
                index + 1,
                config::ID_COLUMN,
                cells[0]
            ))
        })?;
        let mut numbers = [0f64; 8];
        for (slot, (cell, name)) in numbers
            .iter_mut()
            .zip(cells[1..].iter().zip(config::FEATURE_COLUMNS))
        {
            *slot = parse_number(cell, name, index + 1)?;
        }

        let record = ClientRecord {
            id,
            income_total: numbers[0],
            credit_amount: numbers[1],
            annuity_amount: numbers[2],
            family_members: numbers[3],
            days_birth: numbers[4],
            days_employed: numbers[5],
            days_registration: numbers[6],
            days_id_publish: numbers[7],
        };
        if let Err(e) = record.validate() {
            // Out-of-domain values (for instance the sentinel positive
            // DAYS_EMPLOYED some source rows carry) are treated like gaps.
            debug!(row = index + 1, reason = %e, "dropping out-of-domain row");
            rows_invalid += 1;
            continue;
        }
        valid.push(record);
    }

    Ok((valid, rows_read, rows_missing, rows_invalid))
}

/// Draw the seeded sample and write the output table.
///
/// Nothing is written until the sample is fully drawn, and the output lands
/// via a temp file renamed into place, so a failed run never leaves a
/// partial or truncated `clients.csv` behind.
pub fn sample_clients(config: &SampleConfig) -> Result<SampleSummary> {
    let (valid, rows_read, rows_missing, rows_invalid) = read_valid_rows(config)?;
    debug!(
        rows_read,
        rows_missing,
        rows_invalid,
        available = valid.len(),
        "filtered source rows"
    );

    if valid.len() < config.size {
        return Err(ScorecardError::InsufficientRows {
            requested: config.size,
            available: valid.len(),
        });
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let chosen = rand::seq::index::sample(&mut rng, valid.len(), config.size);

    write_atomic(&config.out, |writer| {
        for i in chosen.iter() {
            writer.serialize(&valid[i]).map_err(|e| {
                ScorecardError::Data(format!("cannot write {}: {}", config.out.display(), e))
            })?;
        }
        Ok(())
    })?;

    info!(
        rows = config.size,
        out = %config.out.display(),
        seed = config.seed,
        "wrote sampled client table"
    );
    Ok(SampleSummary {
        rows_read,
        rows_missing,
        rows_invalid,
        rows_written: config.size,
    })
}

// ---------------------------------------------------------------------------
// Atomic write
// ---------------------------------------------------------------------------

/// Serialize CSV rows to a temp file and rename it over the destination on
/// success. On any error the temp file is removed and the destination is
/// left exactly as it was.
fn write_atomic(
    dest: &Path,
    fill: impl FnOnce(&mut csv::Writer<fs::File>) -> Result<()>,
) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_dest = dest.with_extension(format!(
        "{}.tmp",
        dest.extension().and_then(|e| e.to_str()).unwrap_or("")
    ));

    let result = (|| -> Result<()> {
        let mut writer = csv::Writer::from_path(&tmp_dest).map_err(|e| {
            ScorecardError::Data(format!("cannot write {}: {}", tmp_dest.display(), e))
        })?;
        fill(&mut writer)?;
        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_dest, dest)?;
        Ok(())
    })();

    if result.is_err() {
        // Clean up partial temp file on any error
        let _ = fs::remove_file(&tmp_dest);
    }

    result
}
