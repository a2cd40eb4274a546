//! Credit scorecard SDK.
//!
//! Provides a high-level client for a credit-scoring dashboard: an offline
//! sampler that reduces the full application export to a small reproducible
//! client table, a load-once in-memory view of that table, a blocking client
//! for the remote scoring endpoint, and a rendering layer that turns raw
//! scores into verdicts, threshold-sensitivity annotations, and population
//! comparisons.
//!
//! # Quick start
//!
//! ```no_run
//! use scorecard_sdk::ScorecardSdk;
//!
//! let sdk = ScorecardSdk::builder().build().unwrap();
//!
//! // Score one sampled client
//! let view = sdk.predict_client(100002).unwrap();
//! println!("{} ({})", view.verdict.label, view.probability_pct);
//!
//! // Compare that client's income against the sampled population
//! let hist = sdk.compare(100002, scorecard_sdk::CompareField::IncomeTotal, 30).unwrap();
//! for line in hist.to_text(40) {
//!     println!("{line}");
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod sampler;
pub mod scoring;
pub mod table;

pub use error::{Result, ScorecardError};
pub use models::client::ClientRecord;
pub use models::features::{FeatureVector, SimulationInput};
pub use models::score::ScoreResult;
pub use render::{DecisionPolicy, DecisionView, Histogram};
pub use sampler::{sample_clients, SampleConfig, SampleSummary};
pub use scoring::ScoringClient;
pub use table::{ClientTable, CompareField};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// ScorecardSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`ScorecardSdk`] instance.
///
/// Use [`ScorecardSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](ScorecardSdkBuilder::build) to create the SDK.
pub struct ScorecardSdkBuilder {
    clients_path: PathBuf,
    endpoint: String,
    timeout: Duration,
    policy: DecisionPolicy,
}

impl Default for ScorecardSdkBuilder {
    fn default() -> Self {
        Self {
            clients_path: PathBuf::from(config::DEFAULT_CLIENTS_FILE),
            endpoint: config::DEFAULT_ENDPOINT.to_string(),
            timeout: config::DEFAULT_HTTP_TIMEOUT,
            policy: DecisionPolicy::default(),
        }
    }
}

impl ScorecardSdkBuilder {
    /// Set the path of the sampled client table.
    ///
    /// Defaults to `clients.csv` in the working directory, which is where
    /// the sampler writes it.
    pub fn clients_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.clients_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the scoring endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the HTTP request timeout for scoring calls.
    ///
    /// Defaults to 10 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the decision policy (labels, default threshold, caution
    /// margin).
    pub fn policy(mut self, policy: DecisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the SDK, loading and validating the client table.
    ///
    /// The table is read exactly once, here; every later lookup is served
    /// from memory. No scoring request is sent until a predict method is
    /// called.
    pub fn build(self) -> Result<ScorecardSdk> {
        let table = ClientTable::load(&self.clients_path)?;
        let scoring = ScoringClient::new(self.endpoint, self.timeout)?;
        Ok(ScorecardSdk {
            table,
            scoring,
            policy: self.policy,
        })
    }
}

// ---------------------------------------------------------------------------
// ScorecardSdk
// ---------------------------------------------------------------------------

/// The main entry point for the scorecard SDK.
///
/// Owns the loaded [`ClientTable`], the [`ScoringClient`], and the
/// [`DecisionPolicy`] used to interpret scores.
///
/// Created via [`ScorecardSdk::builder()`].
pub struct ScorecardSdk {
    table: ClientTable,
    scoring: ScoringClient,
    policy: DecisionPolicy,
}

impl ScorecardSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> ScorecardSdkBuilder {
        ScorecardSdkBuilder::default()
    }

    /// Access the loaded client table.
    pub fn table(&self) -> &ClientTable {
        &self.table
    }

    /// Access the scoring client directly, for callers that assemble their
    /// own feature vectors or batches.
    pub fn scoring(&self) -> &ScoringClient {
        &self.scoring
    }

    /// The decision policy scores are interpreted under.
    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Score a sampled client by id and interpret the result.
    pub fn predict_client(&self, id: i64) -> Result<DecisionView> {
        let record = self
            .table
            .get(id)
            .ok_or_else(|| ScorecardError::NotFound(format!("no client with id {id}")))?;
        let result = self.scoring.score(&FeatureVector::from_record(record))?;
        Ok(self.policy.render(&result))
    }

    /// Score a hand-edited profile (the simulation view).
    ///
    /// The day fields in `input` use the positive "days ago" convention;
    /// conversion to the wire's negative offsets happens exactly once, in
    /// [`SimulationInput::to_features`].
    pub fn predict_profile(&self, input: &SimulationInput) -> Result<DecisionView> {
        let result = self.scoring.score(&input.to_features()?)?;
        Ok(self.policy.render(&result))
    }

    /// Histogram of `field` across the sampled population, with the given
    /// client's bin marked.
    pub fn compare(&self, id: i64, field: CompareField, bins: usize) -> Result<Histogram> {
        let record = self
            .table
            .get(id)
            .ok_or_else(|| ScorecardError::NotFound(format!("no client with id {id}")))?;
        render::histogram(&self.table.values(field), bins, Some(field.extract(record)))
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for ScorecardSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScorecardSdk(clients={}, endpoint={})",
            self.table.len(),
            self.scoring.endpoint()
        )
    }
}
