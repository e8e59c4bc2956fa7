//! Adaptation Step
//!
//! Runs on every Nth recorded outcome. Weight deltas come from per-factor
//! performance over the recent window, recency-weighted; thresholds move
//! with the false-positive rate of recent HIGH predictions. Everything is
//! bounded: deltas clamped, weights clamped and renormalized, thresholds
//! clamped. No batch retraining, no persistence.

use chrono::{DateTime, Utc};

use crate::constants::{
    FACTOR_ACTIVATION, FP_RATE_LOWER_BELOW, FP_RATE_RAISE_ABOVE, LEARNING_RATE,
    MAX_WEIGHT_DELTA, RECENCY_DECAY_PER_DAY, TARGET_PERFORMANCE, THRESHOLD_LOWER_STEP,
    THRESHOLD_RAISE_STEP,
};
use crate::scoring::tables::WeightSet;
use crate::scoring::types::{Factor, RiskLevel};
use super::types::GradedOutcome;

// ============================================================================
// WEIGHT ADAPTATION
// ============================================================================

/// Apply bounded weight deltas from per-factor performance, then restore
/// the WeightSet invariants.
pub fn adapt_weights(weights: &mut WeightSet, window: &[&GradedOutcome], now: DateTime<Utc>) {
    for factor in Factor::ALL {
        let Some(performance) = factor_performance(window, factor, now) else {
            continue;
        };
        let delta = (LEARNING_RATE * (performance - TARGET_PERFORMANCE))
            .clamp(-MAX_WEIGHT_DELTA, MAX_WEIGHT_DELTA);
        if let Some(w) = weights.weights.get_mut(&factor) {
            *w += delta;
        }
        log::debug!(
            "factor {} performance {:.3} -> delta {:+.4}",
            factor,
            performance,
            delta
        );
    }
    weights.clamp_and_normalize();
}

/// Recency-weighted fraction of outcomes where the factor's raw score
/// agreed with the ground truth: score >= activation iff actual != LOW.
/// None when the factor never appears in the window.
pub fn factor_performance(
    window: &[&GradedOutcome],
    factor: Factor,
    now: DateTime<Utc>,
) -> Option<f64> {
    let mut weighted_correct = 0.0;
    let mut weight_total = 0.0;

    for outcome in window {
        let Some(&score) = outcome.factor_scores.get(&factor) else {
            continue;
        };
        let age_days = (now - outcome.graded_at).num_seconds().max(0) as f64 / 86_400.0;
        let recency = RECENCY_DECAY_PER_DAY.powf(age_days);

        let predicted_risky = score >= FACTOR_ACTIVATION;
        let actually_risky = outcome.actual_level != RiskLevel::Low;
        if predicted_risky == actually_risky {
            weighted_correct += recency;
        }
        weight_total += recency;
    }

    (weight_total > 0.0).then(|| weighted_correct / weight_total)
}

// ============================================================================
// THRESHOLD ADAPTATION
// ============================================================================

/// Move both thresholds with the false-positive rate among recent HIGH
/// (or CRITICAL) predictions: too many false alarms raise them, a very
/// clean record lowers them. No-op when the window has no HIGH predictions.
pub fn adapt_thresholds(weights: &mut WeightSet, window: &[&GradedOutcome]) {
    let high_predictions: Vec<_> = window
        .iter()
        .filter(|o| o.predicted_level.predicts_incident())
        .collect();
    if high_predictions.is_empty() {
        return;
    }

    let false_positives = high_predictions
        .iter()
        .filter(|o| !o.actual_level.predicts_incident())
        .count();
    let fp_rate = false_positives as f64 / high_predictions.len() as f64;

    if fp_rate > FP_RATE_RAISE_ABOVE {
        weights.shift_thresholds(THRESHOLD_RAISE_STEP);
        log::info!(
            "false-positive rate {:.2} - raising thresholds to {:.2}/{:.2}",
            fp_rate,
            weights.low_to_medium,
            weights.medium_to_high
        );
    } else if fp_rate < FP_RATE_LOWER_BELOW {
        weights.shift_thresholds(-THRESHOLD_LOWER_STEP);
        log::info!(
            "false-positive rate {:.2} - lowering thresholds to {:.2}/{:.2}",
            fp_rate,
            weights.low_to_medium,
            weights.medium_to_high
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn graded(
        predicted: RiskLevel,
        actual: RiskLevel,
        weather_score: f64,
        graded_at: DateTime<Utc>,
    ) -> GradedOutcome {
        GradedOutcome {
            prediction_id: Uuid::new_v4(),
            predicted_level: predicted,
            actual_level: actual,
            incident_occurred: actual.predicts_incident(),
            accuracy: 0.5,
            factor_scores: BTreeMap::from([(Factor::Weather, weather_score)]),
            predicted_at: graded_at,
            graded_at,
        }
    }

    #[test]
    fn test_factor_performance_all_correct() {
        let now = Utc::now();
        let outcomes = vec![
            graded(RiskLevel::High, RiskLevel::High, 7.0, now),
            graded(RiskLevel::Low, RiskLevel::Low, 1.0, now),
        ];
        let refs: Vec<_> = outcomes.iter().collect();
        let perf = factor_performance(&refs, Factor::Weather, now).unwrap();
        assert!((perf - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_factor_performance_recency_weighting() {
        let now = Utc::now();
        let old = now - chrono::Duration::days(10);
        // Old outcome correct, fresh outcome wrong: performance below 0.5
        let outcomes = vec![
            graded(RiskLevel::High, RiskLevel::High, 7.0, old),
            graded(RiskLevel::High, RiskLevel::Low, 7.0, now),
        ];
        let refs: Vec<_> = outcomes.iter().collect();
        let perf = factor_performance(&refs, Factor::Weather, now).unwrap();
        assert!(perf < 0.5, "got {}", perf);
    }

    #[test]
    fn test_factor_performance_none_without_data() {
        let now = Utc::now();
        let outcomes = vec![graded(RiskLevel::Low, RiskLevel::Low, 1.0, now)];
        let refs: Vec<_> = outcomes.iter().collect();
        assert!(factor_performance(&refs, Factor::Crowd, now).is_none());
    }

    #[test]
    fn test_adapt_weights_keeps_invariants() {
        let now = Utc::now();
        let outcomes: Vec<_> = (0..10)
            .map(|_| graded(RiskLevel::High, RiskLevel::High, 8.0, now))
            .collect();
        let refs: Vec<_> = outcomes.iter().collect();
        let mut weights = WeightSet::default();
        adapt_weights(&mut weights, &refs, now);
        assert!((weights.weight_sum() - 1.0).abs() < 1e-9);
        for &w in weights.weights.values() {
            assert!(w > 0.0);
        }
    }

    #[test]
    fn test_high_fp_rate_raises_thresholds() {
        let now = Utc::now();
        let outcomes: Vec<_> = (0..5)
            .map(|_| graded(RiskLevel::High, RiskLevel::Low, 7.0, now))
            .collect();
        let refs: Vec<_> = outcomes.iter().collect();
        let mut weights = WeightSet::default();
        let (before_low, before_high) = (weights.low_to_medium, weights.medium_to_high);
        adapt_thresholds(&mut weights, &refs);
        assert!(weights.low_to_medium > before_low);
        assert!(weights.medium_to_high > before_high);
    }

    #[test]
    fn test_low_fp_rate_lowers_thresholds() {
        let now = Utc::now();
        let outcomes: Vec<_> = (0..5)
            .map(|_| graded(RiskLevel::High, RiskLevel::High, 7.0, now))
            .collect();
        let refs: Vec<_> = outcomes.iter().collect();
        let mut weights = WeightSet::default();
        let before = weights.low_to_medium;
        adapt_thresholds(&mut weights, &refs);
        assert!(weights.low_to_medium < before);
    }

    #[test]
    fn test_no_high_predictions_is_a_noop() {
        let now = Utc::now();
        let outcomes: Vec<_> = (0..5)
            .map(|_| graded(RiskLevel::Low, RiskLevel::Low, 1.0, now))
            .collect();
        let refs: Vec<_> = outcomes.iter().collect();
        let mut weights = WeightSet::default();
        let before = weights.clone();
        adapt_thresholds(&mut weights, &refs);
        assert_eq!(weights, before);
    }
}
