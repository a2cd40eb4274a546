//! Wire types for the scoring endpoint and the per-client result the rest of
//! the crate consumes.
//!
//! The endpoint speaks a batch protocol: one request carries a list of
//! feature vectors, and every response field is a list aligned with it by
//! position. [`PredictResponse::into_results`] is the one place that
//! alignment is checked and unzipped into per-client [`ScoreResult`] values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScorecardError};
use crate::models::features::FeatureVector;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Body of a `POST /predict` request: `{"features": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRequest {
    pub features: Vec<FeatureVector>,
}

impl ScoreRequest {
    pub fn new(features: Vec<FeatureVector>) -> Self {
        Self { features }
    }

    pub fn single(features: FeatureVector) -> Self {
        Self {
            features: vec![features],
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// Successful response body, exactly as the endpoint shapes it. `decision`
/// and `probability` are positionally aligned with the request; `threshold`
/// is a single value shared by the whole batch; `shap_values` carries one
/// per-feature attribution map per client when the endpoint computes them.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub decision: Vec<String>,
    pub probability: Vec<f64>,
    pub threshold: Option<f64>,
    pub shap_values: Option<Vec<HashMap<String, f64>>>,
}

/// Error body some non-2xx responses carry: `{"error": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// ---------------------------------------------------------------------------
// ScoreResult
// ---------------------------------------------------------------------------

/// The score for one client, unzipped out of a batch response.
///
/// `probability` is the model's risk estimate in `[0, 1]`. `threshold` stays
/// optional here; the rendering layer supplies the documented default when
/// the endpoint omits it. `attribution` maps feature names to signed SHAP
/// contributions when the endpoint returned them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub decision: String,
    pub probability: f64,
    pub threshold: Option<f64>,
    pub attribution: Option<HashMap<String, f64>>,
}

impl PredictResponse {
    /// Split the batch response into one [`ScoreResult`] per requested
    /// client, by position.
    ///
    /// Every parallel list must match `expected` exactly. A response where
    /// they disagree cannot be attributed to clients safely, so the whole
    /// batch is rejected as a protocol violation rather than truncated or
    /// padded.
    pub fn into_results(self, expected: usize) -> Result<Vec<ScoreResult>> {
        if self.decision.len() != expected {
            return Err(ScorecardError::Protocol(format!(
                "response carries {} decisions for {} requested clients",
                self.decision.len(),
                expected
            )));
        }
        if self.probability.len() != expected {
            return Err(ScorecardError::Protocol(format!(
                "response carries {} probabilities for {} requested clients",
                self.probability.len(),
                expected
            )));
        }
        if let Some(shap) = &self.shap_values {
            if shap.len() != expected {
                return Err(ScorecardError::Protocol(format!(
                    "response carries {} attribution maps for {} requested clients",
                    shap.len(),
                    expected
                )));
            }
        }

        let threshold = self.threshold;
        let mut attributions: Vec<Option<HashMap<String, f64>>> = match self.shap_values {
            Some(maps) => maps.into_iter().map(Some).collect(),
            None => vec![None; expected],
        };

        Ok(self
            .decision
            .into_iter()
            .zip(self.probability)
            .zip(attributions.drain(..))
            .map(|((decision, probability), attribution)| ScoreResult {
                decision,
                probability,
                threshold,
                attribution,
            })
            .collect())
    }
}
