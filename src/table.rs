//! Load-once, read-only access to the sampled client table.
//!
//! The dashboard reads `clients.csv` exactly once at startup and serves every
//! lookup from memory after that. Nothing here mutates the table; reloading
//! means building a new [`ClientTable`].

use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use flate2::read::GzDecoder;

use crate::error::{Result, ScorecardError};
use crate::models::client::ClientRecord;

// ---------------------------------------------------------------------------
// CompareField
// ---------------------------------------------------------------------------

/// The client fields the comparison view can put on a histogram axis.
///
/// Day-offset columns are deliberately absent: comparing raw negative day
/// counts across the population reads poorly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareField {
    IncomeTotal,
    CreditAmount,
    AnnuityAmount,
    FamilyMembers,
}

impl CompareField {
    pub const ALL: [CompareField; 4] = [
        CompareField::IncomeTotal,
        CompareField::CreditAmount,
        CompareField::AnnuityAmount,
        CompareField::FamilyMembers,
    ];

    /// Upstream column name, as it appears in the CSV header.
    pub fn column(&self) -> &'static str {
        match self {
            CompareField::IncomeTotal => "AMT_INCOME_TOTAL",
            CompareField::CreditAmount => "AMT_CREDIT",
            CompareField::AnnuityAmount => "AMT_ANNUITY",
            CompareField::FamilyMembers => "CNT_FAM_MEMBERS",
        }
    }

    /// Human-readable label for report headings.
    pub fn label(&self) -> &'static str {
        match self {
            CompareField::IncomeTotal => "total income",
            CompareField::CreditAmount => "credit amount",
            CompareField::AnnuityAmount => "annuity amount",
            CompareField::FamilyMembers => "family members",
        }
    }

    pub fn extract(&self, record: &ClientRecord) -> f64 {
        match self {
            CompareField::IncomeTotal => record.income_total,
            CompareField::CreditAmount => record.credit_amount,
            CompareField::AnnuityAmount => record.annuity_amount,
            CompareField::FamilyMembers => record.family_members,
        }
    }
}

impl FromStr for CompareField {
    type Err = ScorecardError;

    /// Accepts either the upstream column name (`AMT_CREDIT`) or a short
    /// alias (`credit`), case-insensitively.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AMT_INCOME_TOTAL" | "INCOME" => Ok(CompareField::IncomeTotal),
            "AMT_CREDIT" | "CREDIT" => Ok(CompareField::CreditAmount),
            "AMT_ANNUITY" | "ANNUITY" => Ok(CompareField::AnnuityAmount),
            "CNT_FAM_MEMBERS" | "FAMILY" => Ok(CompareField::FamilyMembers),
            _ => Err(ScorecardError::InvalidArgument(format!(
                "unknown comparison field '{}' (expected one of: {})",
                s,
                CompareField::ALL
                    .iter()
                    .map(|f| f.column())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ClientTable
// ---------------------------------------------------------------------------

/// An immutable, fully validated in-memory copy of the sampled client table.
#[derive(Debug)]
pub struct ClientTable {
    records: Vec<ClientRecord>,
    by_id: HashMap<i64, usize>,
}

impl ClientTable {
    /// Read and validate a client table from a CSV file (`.gz` handled
    /// transparently).
    ///
    /// Every row must deserialize cleanly and pass [`ClientRecord::validate`];
    /// ids must be unique. Sampled tables satisfy all of this by
    /// construction, so a failure here means the file was edited or is not a
    /// sampler output at all, and loading stops with a data error rather
    /// than serving a partial table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|e| {
            ScorecardError::Data(format!("cannot open {}: {}", path.display(), e))
        })?;

        let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        let mut by_id = HashMap::new();

        for (index, row) in csv_reader.deserialize::<ClientRecord>().enumerate() {
            let record = row.map_err(|e| {
                ScorecardError::Data(format!(
                    "{} row {}: {}",
                    path.display(),
                    index + 1,
                    e
                ))
            })?;
            record.validate()?;
            if by_id.insert(record.id, records.len()).is_some() {
                return Err(ScorecardError::Data(format!(
                    "{}: duplicate client id {}",
                    path.display(),
                    record.id
                )));
            }
            records.push(record);
        }

        Ok(Self { records, by_id })
    }

    /// Build a table directly from records, validating each. Used by tests
    /// and by callers that already hold sampled rows in memory.
    pub fn from_records(records: Vec<ClientRecord>) -> Result<Self> {
        let mut by_id = HashMap::new();
        for (index, record) in records.iter().enumerate() {
            record.validate()?;
            if by_id.insert(record.id, index).is_some() {
                return Err(ScorecardError::Data(format!(
                    "duplicate client id {}",
                    record.id
                )));
            }
        }
        Ok(Self { records, by_id })
    }

    /// Look up a client by id.
    pub fn get(&self, id: i64) -> Option<&ClientRecord> {
        self.by_id.get(&id).map(|&i| &self.records[i])
    }

    /// All client ids, in table order.
    pub fn ids(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.id).collect()
    }

    /// Iterate over all records, in table order.
    pub fn iter(&self) -> impl Iterator<Item = &ClientRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ClientRecord] {
        &self.records
    }

    /// One value per client for the given comparison field, in table order.
    pub fn values(&self, field: CompareField) -> Vec<f64> {
        self.records.iter().map(|r| field.extract(r)).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
