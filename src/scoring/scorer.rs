//! Risk Scorer
//!
//! Only the scoring logic - no types, no tables.
//! Input: ConditionVector + WeightSet
//! Output: RiskAssessment
//!
//! Deterministic and explainable: every contribution is recorded in
//! `factor_scores` so the breakdown analyzer can decompose the result.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::constants::{CRITICAL_FACTOR_SEVERITY, DEFAULT_CONFIDENCE};
use super::recommend::recommendations;
use super::tables::{
    crowd_severity, location_severity, temperature_severity, time_severity,
    visibility_severity, weather_severity, WeightSet,
};
use super::types::{ConditionVector, Factor, FactorScore, RiskAssessment, RiskLevel};

// ============================================================================
// MAIN SCORING FUNCTION
// ============================================================================

/// Score a condition vector with the default confidence.
pub fn score(conditions: &ConditionVector, weights: &WeightSet) -> RiskAssessment {
    score_with_confidence(conditions, weights, DEFAULT_CONFIDENCE)
}

/// Score with an externally supplied confidence (the engine passes the
/// learner's recent accuracy once enough outcomes exist).
///
/// Never fails for a valid ConditionVector: unknown categories resolved
/// upstream, missing weights read as 0.
pub fn score_with_confidence(
    conditions: &ConditionVector,
    weights: &WeightSet,
    confidence: f64,
) -> RiskAssessment {
    let raw = raw_factor_scores(conditions);

    let mut factor_scores = BTreeMap::new();
    let mut weighted_sum = 0.0;
    for (factor, severity) in &raw {
        let weight = weights.weight(*factor);
        weighted_sum += severity * weight;
        factor_scores.insert(
            *factor,
            FactorScore {
                score: *severity,
                weight,
            },
        );
    }

    // One decimal, like every score the app surfaces
    let risk_score = (weighted_sum * 10.0).round() / 10.0;

    // Threshold mapping, then the hard ceiling: a single extreme factor
    // (hurricane/tornado class) forces CRITICAL and is never adapted away.
    let mut risk_level = level_for_score(risk_score, weights);
    if raw.values().any(|&s| s >= CRITICAL_FACTOR_SEVERITY) {
        risk_level = RiskLevel::Critical;
    }

    let recommendations = recommendations(risk_level, &factor_scores);

    log::debug!(
        "scored {:.1} -> {} (confidence {:.2})",
        risk_score,
        risk_level,
        confidence
    );

    RiskAssessment {
        risk_score,
        risk_level,
        factor_scores,
        confidence: confidence.clamp(0.0, 1.0),
        recommendations,
        timestamp: Utc::now(),
    }
}

/// Raw severity per factor, straight from the tables.
pub fn raw_factor_scores(conditions: &ConditionVector) -> BTreeMap<Factor, f64> {
    BTreeMap::from([
        (Factor::Weather, weather_severity(conditions.weather)),
        (Factor::Time, time_severity(conditions.time_of_day)),
        (Factor::Crowd, crowd_severity(conditions.crowd_density)),
        (Factor::Visibility, visibility_severity(conditions.visibility)),
        (Factor::Temperature, temperature_severity(conditions.temperature)),
        (Factor::Location, location_severity(conditions.location)),
    ])
}

/// score < low_to_medium => LOW; < medium_to_high => MEDIUM; else HIGH.
/// CRITICAL only ever comes from the extreme-factor override.
fn level_for_score(score: f64, weights: &WeightSet) -> RiskLevel {
    if score < weights.low_to_medium {
        RiskLevel::Low
    } else if score < weights.medium_to_high {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::types::{CrowdDensity, LocationKind, TimeOfDay, Visibility, Weather};

    fn mild_conditions() -> ConditionVector {
        ConditionVector {
            weather: Weather::Clear,
            time_of_day: TimeOfDay::Afternoon,
            crowd_density: CrowdDensity::Light,
            visibility: Visibility::Fraction(0.9),
            temperature: Some(20.0),
            location: LocationKind::Unknown,
        }
    }

    #[test]
    fn test_mild_conditions_are_low() {
        let assessment = score(&mild_conditions(), &WeightSet::default());
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert!(
            assessment.risk_score < 2.0,
            "expected < 2.0, got {}",
            assessment.risk_score
        );
    }

    #[test]
    fn test_severe_conditions_are_high_or_critical() {
        let conditions = ConditionVector {
            weather: Weather::Thunderstorm,
            time_of_day: TimeOfDay::LateNight,
            crowd_density: CrowdDensity::Overcrowded,
            visibility: Visibility::Fraction(0.2),
            temperature: None,
            location: LocationKind::Unknown,
        };
        let assessment = score(&conditions, &WeightSet::default());
        assert!(assessment.risk_score >= 5.0);
        assert!(matches!(
            assessment.risk_level,
            RiskLevel::High | RiskLevel::Critical
        ));
        assert!(assessment.recommendations.iter().any(|r| r.contains("shelter")));
        assert!(assessment
            .recommendations
            .iter()
            .any(|r| r.contains("exit routes")));
    }

    #[test]
    fn test_single_extreme_factor_forces_critical() {
        let mut conditions = mild_conditions();
        conditions.weather = Weather::Tornado;
        let assessment = score(&conditions, &WeightSet::default());
        assert_eq!(assessment.risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_monotonic_in_weather_severity() {
        let ladder = [
            Weather::Clear,
            Weather::Cloudy,
            Weather::Rain,
            Weather::Thunderstorm,
        ];
        let weights = WeightSet::default();
        let mut last = -1.0;
        for weather in ladder {
            let mut conditions = mild_conditions();
            conditions.weather = weather;
            let assessment = score(&conditions, &weights);
            assert!(
                assessment.risk_score >= last,
                "{:?} decreased the score",
                weather
            );
            last = assessment.risk_score;
        }
    }

    #[test]
    fn test_threshold_boundaries_exact() {
        // Build a weight set whose thresholds we control, then probe the
        // mapping directly.
        let mut weights = WeightSet::default();
        weights.low_to_medium = 3.0;
        weights.medium_to_high = 5.0;
        assert_eq!(level_for_score(2.9, &weights), RiskLevel::Low);
        assert_eq!(level_for_score(3.0, &weights), RiskLevel::Medium);
        assert_eq!(level_for_score(4.9, &weights), RiskLevel::Medium);
        assert_eq!(level_for_score(5.0, &weights), RiskLevel::High);
    }

    #[test]
    fn test_missing_weight_reads_as_zero() {
        let mut weights = WeightSet::default();
        weights.weights.remove(&Factor::Weather);
        let mut conditions = mild_conditions();
        conditions.weather = Weather::Thunderstorm;
        let assessment = score(&conditions, &weights);
        // Thunderstorm contributes nothing without a weight
        assert_eq!(assessment.factor_scores[&Factor::Weather].weight, 0.0);
    }

    #[test]
    fn test_score_rounded_to_one_decimal() {
        let assessment = score(&mild_conditions(), &WeightSet::default());
        let scaled = assessment.risk_score * 10.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}
