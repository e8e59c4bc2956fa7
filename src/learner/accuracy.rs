//! Accuracy Grading
//!
//! Scores one (prediction, outcome) pair in [0, 1]:
//!   0.6  exact risk-level match, decaying 0.3 per level of ordinal distance
//!   0.3  binary incident agreement (predicted HIGH+ vs incident occurred)
//!   0.1  scaled by the reported environmental accuracy

use crate::scoring::types::RiskLevel;
use super::types::OutcomeReport;

const LEVEL_WEIGHT: f64 = 0.6;
const LEVEL_DECAY: f64 = 0.3;
const INCIDENT_WEIGHT: f64 = 0.3;
const ENVIRONMENT_WEIGHT: f64 = 0.1;

pub fn grade(predicted: RiskLevel, outcome: &OutcomeReport) -> f64 {
    let distance = predicted
        .ordinal()
        .abs_diff(outcome.actual_risk_level.ordinal()) as f64;
    let level_component = (LEVEL_WEIGHT - LEVEL_DECAY * distance).max(0.0);

    let incident_component = if predicted.predicts_incident() == outcome.incident_occurred {
        INCIDENT_WEIGHT
    } else {
        0.0
    };

    let environment_component =
        ENVIRONMENT_WEIGHT * outcome.environmental_accuracy.clamp(0.0, 1.0);

    (level_component + incident_component + environment_component).clamp(0.0, 1.0)
}
