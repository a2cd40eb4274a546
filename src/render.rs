//! Turn raw scores into presentation-ready values: verdict classification,
//! percent formatting, threshold sensitivity, sorted attribution, and the
//! population histogram used by the comparison view.
//!
//! Everything here is pure computation over a [`ScoreResult`]; nothing
//! touches the network or the filesystem. The structured [`DecisionView`] is
//! the contract between scoring and whatever surface displays it.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config;
use crate::error::{Result, ScorecardError};
use crate::models::score::ScoreResult;

// ---------------------------------------------------------------------------
// DecisionPolicy
// ---------------------------------------------------------------------------

/// The distance-to-threshold comparison is exclusive at its edge, but f64
/// subtraction puts mathematically-equal distances a hair under the margin
/// (0.70 - 0.65 computes just below 0.05). The tolerance keeps those
/// exact-margin distances out of the caution band.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// How to interpret a [`ScoreResult`]: which label counts as an approval,
/// what threshold to assume when the endpoint omits one, and how close to
/// the threshold a probability must be before the view carries a caution.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionPolicy {
    /// The one label rendered as an approval. Anything else is not one.
    pub accept_label: String,
    /// The label the endpoint uses for a refusal; any other non-accept label
    /// is flagged as unexpected.
    pub refuse_label: String,
    /// Threshold assumed when a response carries none.
    pub default_threshold: f64,
    /// Half-width of the caution band around the threshold.
    pub caution_margin: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            accept_label: config::ACCEPT_LABEL.to_string(),
            refuse_label: config::REFUSE_LABEL.to_string(),
            default_threshold: config::DEFAULT_THRESHOLD,
            caution_margin: config::DEFAULT_CAUTION_MARGIN,
        }
    }
}

impl DecisionPolicy {
    /// Interpret one score under this policy.
    pub fn render(&self, result: &ScoreResult) -> DecisionView {
        let tone = if result.decision == self.accept_label {
            Tone::Positive
        } else {
            // A label we do not recognize is never rendered as an approval.
            Tone::Negative
        };
        let unexpected =
            result.decision != self.accept_label && result.decision != self.refuse_label;

        let threshold = result.threshold.unwrap_or(self.default_threshold);
        let delta = (result.probability - threshold).abs();
        let status = if self.near_boundary(delta) {
            ThresholdStatus::NearBoundary
        } else {
            ThresholdStatus::Comfortable
        };

        DecisionView {
            verdict: Verdict {
                label: result.decision.clone(),
                tone,
                unexpected,
            },
            probability: result.probability,
            probability_pct: format_probability(result.probability),
            sensitivity: ThresholdSensitivity {
                threshold,
                delta,
                status,
            },
            attribution: result.attribution.as_ref().map(attribution_bars),
        }
    }

    fn near_boundary(&self, delta: f64) -> bool {
        delta + BOUNDARY_TOLERANCE < self.caution_margin
    }
}

/// Probability as the dashboard prints it: two decimals, percent sign.
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

// ---------------------------------------------------------------------------
// DecisionView
// ---------------------------------------------------------------------------

/// Whether a verdict is shown as good or bad news.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
}

/// The classified decision label.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// The label exactly as the endpoint sent it.
    pub label: String,
    pub tone: Tone,
    /// True when the label matches neither the accept nor the refuse label;
    /// the view still renders (negatively), but the surface should say the
    /// response was not one of the known outcomes.
    pub unexpected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdStatus {
    /// Within the caution band; a small input change could flip the decision.
    NearBoundary,
    /// Far enough from the threshold that the decision is stable.
    Comfortable,
}

/// How far the probability sits from the decision threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSensitivity {
    /// The threshold actually applied (from the response, or the policy
    /// default).
    pub threshold: f64,
    /// Absolute distance between probability and threshold.
    pub delta: f64,
    pub status: ThresholdStatus,
}

impl ThresholdSensitivity {
    /// One-line annotation for the probability readout.
    pub fn message(&self) -> String {
        let threshold_pct = format_probability(self.threshold);
        let delta_points = self.delta * 100.0;
        match self.status {
            ThresholdStatus::NearBoundary => format!(
                "only {:.2} points from the {} threshold: near the boundary, could flip with a small change in inputs",
                delta_points, threshold_pct
            ),
            ThresholdStatus::Comfortable => format!(
                "{:.2} points from the {} threshold: comfortably far from the boundary",
                delta_points, threshold_pct
            ),
        }
    }
}

/// One feature's contribution to the score.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionBar {
    pub feature: String,
    pub value: f64,
}

/// A [`ScoreResult`] interpreted under a [`DecisionPolicy`], ready to print.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionView {
    pub verdict: Verdict,
    pub probability: f64,
    /// `probability` formatted as `NN.NN%`.
    pub probability_pct: String,
    pub sensitivity: ThresholdSensitivity,
    /// Per-feature contributions sorted ascending by value (strongest
    /// negative first), ties broken by feature name. `None` when the
    /// endpoint sent no attribution.
    pub attribution: Option<Vec<AttributionBar>>,
}

fn attribution_bars(map: &HashMap<String, f64>) -> Vec<AttributionBar> {
    let mut bars: Vec<AttributionBar> = map
        .iter()
        .map(|(feature, &value)| AttributionBar {
            feature: feature.clone(),
            value,
        })
        .collect();
    bars.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.feature.cmp(&b.feature))
    });
    bars
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width binning of a population series, with an optional marked bin
/// for "this client sits here".
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` edges; bin `i` covers `[edges[i], edges[i + 1])`, the last
    /// bin including its upper edge.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// Index of the bin containing the marker value, if one was given.
    pub marked: Option<usize>,
}

/// Bin `values` into `bins` equal-width buckets spanning the observed range.
///
/// `marker` (the selected client's value, typically) selects the bin it
/// falls into; values outside the observed range clamp to the edge bins.
pub fn histogram(values: &[f64], bins: usize, marker: Option<f64>) -> Result<Histogram> {
    if values.is_empty() {
        return Err(ScorecardError::InvalidArgument(
            "cannot bin an empty series".to_string(),
        ));
    }
    if bins == 0 {
        return Err(ScorecardError::InvalidArgument(
            "bin count must be at least 1".to_string(),
        ));
    }

    // min/max folds skip NaN, so screen for it explicitly.
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ScorecardError::InvalidArgument(
            "series contains non-finite values".to_string(),
        ));
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    // A flat series still gets a well-formed single-width axis.
    let width = if max > min { (max - min) / bins as f64 } else { 1.0 };
    let bin_index = |value: f64| -> usize {
        let clamped = value.clamp(min, max);
        (((clamped - min) / width) as usize).min(bins - 1)
    };

    let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for &value in values {
        counts[bin_index(value)] += 1;
    }

    Ok(Histogram {
        edges,
        counts,
        marked: marker.map(bin_index),
    })
}

impl Histogram {
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Render one text line per bin, bars scaled to `max_width` characters.
    pub fn to_text(&self, max_width: usize) -> Vec<String> {
        let max_count = self.counts.iter().max().copied().unwrap_or(0);
        let mut lines = Vec::with_capacity(self.counts.len());
        for (i, &count) in self.counts.iter().enumerate() {
            let bar_len = if max_count == 0 || max_width == 0 {
                0
            } else {
                (count * max_width) / max_count
            };
            let mut line = format!(
                "[{:>12.1}, {:>12.1}) {} ({})",
                self.edges[i],
                self.edges[i + 1],
                "#".repeat(bar_len),
                count
            );
            if self.marked == Some(i) {
                line.push_str("  <- client");
            }
            lines.push(line);
        }
        lines
    }
}
