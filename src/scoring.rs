//! Blocking HTTP client for the remote scoring endpoint.
//!
//! One `POST` per call, no retries: a scoring request is cheap to re-issue
//! and the caller is an interactive surface, so failures surface immediately
//! with a classified error instead of being papered over. The classification
//! the rest of the crate relies on:
//!
//! * could not reach the endpoint or timed out: [`ScorecardError::Transport`]
//! * endpoint answered with a non-2xx status: [`ScorecardError::Service`]
//! * endpoint answered 2xx but the body is not the documented shape:
//!   [`ScorecardError::Protocol`]

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{Result, ScorecardError};
use crate::models::features::FeatureVector;
use crate::models::score::{ErrorBody, PredictResponse, ScoreRequest, ScoreResult};

/// Client for the scoring endpoint. Build once, reuse for every request; the
/// underlying connection pool is managed by `reqwest`.
pub struct ScoringClient {
    endpoint: String,
    client: Client,
}

impl ScoringClient {
    /// Create a client for `endpoint` with the given request timeout.
    ///
    /// The timeout covers the whole request: connecting, sending, and
    /// reading the response. The hosted model can be slow to answer from a
    /// cold start, which is why the crate-wide default is a generous
    /// [`config::DEFAULT_HTTP_TIMEOUT`](crate::config::DEFAULT_HTTP_TIMEOUT).
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ScorecardError::Transport)?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Score a single feature vector.
    pub fn score(&self, features: &FeatureVector) -> Result<ScoreResult> {
        let mut results = self.score_batch(std::slice::from_ref(features))?;
        results.pop().ok_or_else(|| {
            ScorecardError::Protocol("empty result set for a single-client request".to_string())
        })
    }

    /// Score a batch of feature vectors in one request.
    ///
    /// Results come back aligned with the input, one per vector. An empty
    /// batch short-circuits to an empty result without touching the network.
    pub fn score_batch(&self, features: &[FeatureVector]) -> Result<Vec<ScoreResult>> {
        if features.is_empty() {
            return Ok(Vec::new());
        }

        let request = ScoreRequest::new(features.to_vec());
        debug!(endpoint = %self.endpoint, clients = features.len(), "scoring request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(ScorecardError::Transport)?;

        let status = response.status();
        let body = response.text().map_err(ScorecardError::Transport)?;

        if !status.is_success() {
            // Failure bodies usually carry {"error": "..."}; fall back to the
            // raw body, then to the status line, so the message is never empty.
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => parsed.error,
                Err(_) if !body.trim().is_empty() => body.trim().to_string(),
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("no detail provided")
                    .to_string(),
            };
            return Err(ScorecardError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: PredictResponse = serde_json::from_str(&body).map_err(|e| {
            ScorecardError::Protocol(format!("success response is not the expected shape: {}", e))
        })?;
        parsed.into_results(features.len())
    }
}
