//! Learner Types
//!
//! Records flowing through the outcome-feedback loop. No logic here.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::tables::WeightSet;
use crate::scoring::types::{Factor, RiskAssessment, RiskLevel};

// ============================================================================
// PREDICTION RECORD
// ============================================================================

/// A stored assessment plus the weight set that produced it. Created at
/// scoring time, "awaiting outcome" until matched with an OutcomeReport,
/// then ages out of the bounded history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub assessment: RiskAssessment,
    pub weights: WeightSet,
    pub recorded_at: DateTime<Utc>,
}

// ============================================================================
// OUTCOME REPORT (external write path)
// ============================================================================

/// Ground-truth observation recorded after the fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeReport {
    pub actual_risk_level: RiskLevel,
    pub incident_occurred: bool,
    /// Severity of the incident if one occurred (0-10).
    #[serde(default)]
    pub incident_severity: Option<f64>,
    /// Free-form user feedback, kept for audit only.
    #[serde(default)]
    pub user_feedback: Option<String>,
    /// How accurately the environmental inputs matched reality, [0, 1].
    #[serde(default = "default_environmental_accuracy")]
    pub environmental_accuracy: f64,
}

fn default_environmental_accuracy() -> f64 {
    1.0
}

// ============================================================================
// GRADED OUTCOME
// ============================================================================

/// The (prediction, outcome) pair after grading. What adaptation reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedOutcome {
    pub prediction_id: Uuid,
    pub predicted_level: RiskLevel,
    pub actual_level: RiskLevel,
    pub incident_occurred: bool,
    /// Accuracy score in [0, 1] for this pair.
    pub accuracy: f64,
    /// Raw factor scores from the prediction, for per-factor performance.
    pub factor_scores: BTreeMap<Factor, f64>,
    pub predicted_at: DateTime<Utc>,
    pub graded_at: DateTime<Utc>,
}

// ============================================================================
// RESULTS & STATS
// ============================================================================

/// What `record_outcome` hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeResult {
    pub accuracy: f64,
    /// True when this outcome triggered an adaptation batch.
    pub adapted: bool,
    /// The weight set after adaptation, when one ran.
    pub new_weights: Option<WeightSet>,
}

/// Learner snapshot for status reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerStats {
    pub pending_predictions: usize,
    /// Lifetime count, monotonic; the outcome buffer itself is bounded.
    pub outcomes_recorded: u64,
    pub adaptation_count: u64,
    pub recent_accuracy: Option<f64>,
    pub last_adaptation: Option<DateTime<Utc>>,
}
