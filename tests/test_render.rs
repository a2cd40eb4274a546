//! Decision rendering tests: verdict classification, percent formatting,
//! threshold sensitivity, attribution ordering, and population histograms.

use std::collections::HashMap;

use scorecard_sdk::render::{histogram, ThresholdStatus, Tone};
use scorecard_sdk::{DecisionPolicy, ScorecardError, ScoreResult};

fn result(decision: &str, probability: f64, threshold: Option<f64>) -> ScoreResult {
    ScoreResult {
        decision: decision.to_string(),
        probability,
        threshold,
        attribution: None,
    }
}

// ---------------------------------------------------------------------------
// verdict classification
// ---------------------------------------------------------------------------

#[test]
fn accept_label_renders_positive() {
    let view = DecisionPolicy::default().render(&result("Crédit accordé", 0.9, Some(0.65)));
    assert_eq!(view.verdict.tone, Tone::Positive);
    assert!(!view.verdict.unexpected);
    assert_eq!(view.verdict.label, "Crédit accordé");
}

#[test]
fn refuse_label_renders_negative() {
    let view = DecisionPolicy::default().render(&result("Crédit refusé", 0.3, Some(0.65)));
    assert_eq!(view.verdict.tone, Tone::Negative);
    assert!(!view.verdict.unexpected);
}

#[test]
fn unknown_label_is_negative_and_flagged() {
    let view = DecisionPolicy::default().render(&result("Peut-être", 0.9, Some(0.65)));
    assert_eq!(view.verdict.tone, Tone::Negative);
    assert!(view.verdict.unexpected);
    assert_eq!(view.verdict.label, "Peut-être");
}

// ---------------------------------------------------------------------------
// probability formatting
// ---------------------------------------------------------------------------

#[test]
fn probability_formats_to_two_decimals() {
    let policy = DecisionPolicy::default();
    assert_eq!(
        policy.render(&result("Crédit accordé", 0.9, None)).probability_pct,
        "90.00%"
    );
    assert_eq!(
        policy.render(&result("Crédit refusé", 0.643, None)).probability_pct,
        "64.30%"
    );
    assert_eq!(
        policy.render(&result("Crédit refusé", 0.0, None)).probability_pct,
        "0.00%"
    );
    assert_eq!(
        policy.render(&result("Crédit accordé", 1.0, None)).probability_pct,
        "100.00%"
    );
}

// ---------------------------------------------------------------------------
// threshold sensitivity
// ---------------------------------------------------------------------------

#[test]
fn near_threshold_carries_a_caution() {
    let view = DecisionPolicy::default().render(&result("Crédit accordé", 0.68, Some(0.65)));
    assert_eq!(view.sensitivity.status, ThresholdStatus::NearBoundary);
    assert!(view
        .sensitivity
        .message()
        .contains("near the boundary, could flip"));
}

#[test]
fn exact_margin_distance_is_not_flagged() {
    let policy = DecisionPolicy::default();

    // 0.70 sits exactly 0.05 from 0.65; the band is exclusive at its edge
    let above = policy.render(&result("Crédit accordé", 0.70, Some(0.65)));
    assert_eq!(above.sensitivity.status, ThresholdStatus::Comfortable);
    assert!(above
        .sensitivity
        .message()
        .contains("comfortably far from the boundary"));

    let below = policy.render(&result("Crédit refusé", 0.60, Some(0.65)));
    assert_eq!(below.sensitivity.status, ThresholdStatus::Comfortable);
}

#[test]
fn below_threshold_inside_the_band_is_flagged() {
    let view = DecisionPolicy::default().render(&result("Crédit refusé", 0.62, Some(0.65)));
    assert_eq!(view.sensitivity.status, ThresholdStatus::NearBoundary);
}

#[test]
fn default_threshold_applies_when_the_response_omits_it() {
    let view = DecisionPolicy::default().render(&result("Crédit accordé", 0.68, None));
    assert_eq!(view.sensitivity.threshold, 0.65);
    assert_eq!(view.sensitivity.status, ThresholdStatus::NearBoundary);
}

#[test]
fn response_threshold_overrides_the_default() {
    let view = DecisionPolicy::default().render(&result("Crédit accordé", 0.52, Some(0.5)));
    assert_eq!(view.sensitivity.threshold, 0.5);
    assert_eq!(view.sensitivity.status, ThresholdStatus::NearBoundary);
}

#[test]
fn custom_policy_changes_labels_and_margin() {
    let policy = DecisionPolicy {
        accept_label: "approved".to_string(),
        refuse_label: "declined".to_string(),
        default_threshold: 0.5,
        caution_margin: 0.1,
    };

    let view = policy.render(&result("approved", 0.70, Some(0.65)));
    assert_eq!(view.verdict.tone, Tone::Positive);
    assert!(!view.verdict.unexpected);
    assert_eq!(view.sensitivity.status, ThresholdStatus::NearBoundary);

    let wide = policy.render(&result("approved", 0.75, Some(0.65)));
    assert_eq!(wide.sensitivity.status, ThresholdStatus::Comfortable);
}

// ---------------------------------------------------------------------------
// attribution
// ---------------------------------------------------------------------------

#[test]
fn attribution_sorts_ascending_with_name_ties() {
    let mut map = HashMap::new();
    map.insert("B_FEATURE".to_string(), 0.2);
    map.insert("A_FEATURE".to_string(), 0.2);
    map.insert("C_FEATURE".to_string(), -0.5);

    let mut scored = result("Crédit accordé", 0.9, Some(0.65));
    scored.attribution = Some(map);

    let view = DecisionPolicy::default().render(&scored);
    let bars = view.attribution.unwrap();
    let order: Vec<&str> = bars.iter().map(|b| b.feature.as_str()).collect();
    assert_eq!(order, vec!["C_FEATURE", "A_FEATURE", "B_FEATURE"]);
    assert_eq!(bars[0].value, -0.5);
}

#[test]
fn missing_attribution_stays_absent() {
    let view = DecisionPolicy::default().render(&result("Crédit accordé", 0.9, Some(0.65)));
    assert!(view.attribution.is_none());
}

// ---------------------------------------------------------------------------
// histogram
// ---------------------------------------------------------------------------

#[test]
fn histogram_counts_and_marks_the_client_bin() {
    let values = [1.0, 2.0, 2.0, 3.0, 9.0];
    let hist = histogram(&values, 3, Some(2.0)).unwrap();

    assert_eq!(hist.bins(), 3);
    assert_eq!(hist.counts, vec![4, 0, 1]);
    assert_eq!(hist.marked, Some(0));
    assert_eq!(hist.counts.iter().sum::<usize>(), values.len());
}

#[test]
fn histogram_last_bin_includes_the_maximum() {
    let values = [1.0, 2.0, 2.0, 3.0, 9.0];
    let hist = histogram(&values, 3, Some(9.0)).unwrap();
    assert_eq!(hist.marked, Some(2));
    assert_eq!(hist.counts[2], 1);
}

#[test]
fn histogram_handles_a_flat_series() {
    let values = [5.0; 8];
    let hist = histogram(&values, 4, Some(5.0)).unwrap();
    assert_eq!(hist.counts[0], 8);
    assert_eq!(hist.marked, Some(0));
    assert_eq!(hist.edges.len(), 5);
}

#[test]
fn histogram_rejects_empty_series_and_zero_bins() {
    assert!(matches!(
        histogram(&[], 3, None).unwrap_err(),
        ScorecardError::InvalidArgument(_)
    ));
    assert!(matches!(
        histogram(&[1.0], 0, None).unwrap_err(),
        ScorecardError::InvalidArgument(_)
    ));
}

#[test]
fn histogram_text_scales_bars_and_marks_the_client() {
    let values = [1.0, 2.0, 2.0, 3.0, 9.0];
    let hist = histogram(&values, 3, Some(2.0)).unwrap();

    let lines = hist.to_text(10);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(&"#".repeat(10)), "line: {}", lines[0]);
    assert!(lines[0].contains("(4)"));
    assert!(lines[0].contains("<- client"));
    assert!(!lines[1].contains('#'));
    assert!(!lines[2].contains("<- client"));
}
