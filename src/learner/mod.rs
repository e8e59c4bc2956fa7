//! Adaptive Weight Learner
//!
//! Online, incremental, bounded learning over discrete batches: every
//! prediction is recorded, ground-truth outcomes are graded against it,
//! and every Nth outcome triggers one adaptation pass over the recent
//! window. The learner is the only writer of the WeightSet.
//!
//! ## Structure
//! - `types`: PredictionRecord, OutcomeReport, GradedOutcome, stats
//! - `accuracy`: grading one (prediction, outcome) pair
//! - `adapt`: weight and threshold adjustment rules

pub mod accuracy;
pub mod adapt;
pub mod types;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::constants::{
    ADAPTATION_THRESHOLD, MIN_OUTCOMES_FOR_CONFIDENCE, OUTCOME_HISTORY_CAP,
    PREDICTION_HISTORY_CAP,
};
use crate::error::{EngineError, EngineResult};
use crate::history::BoundedHistory;
use crate::scoring::tables::WeightSet;
use crate::scoring::types::RiskAssessment;

pub use types::{GradedOutcome, LearnerStats, OutcomeReport, OutcomeResult, PredictionRecord};

// ============================================================================
// LEARNER
// ============================================================================

#[derive(Debug)]
pub struct WeightLearner {
    predictions: BoundedHistory<PredictionRecord>,
    outcomes: BoundedHistory<GradedOutcome>,
    /// Lifetime outcome count. The bounded buffer's len() freezes at
    /// capacity, so the adaptation cadence is keyed to this instead.
    outcomes_total: u64,
    adaptation_threshold: usize,
    adaptation_count: u64,
    last_adaptation: Option<DateTime<Utc>>,
}

impl WeightLearner {
    pub fn new() -> Self {
        Self::with_threshold(ADAPTATION_THRESHOLD)
    }

    pub fn with_threshold(adaptation_threshold: usize) -> Self {
        assert!(adaptation_threshold > 0);
        Self {
            predictions: BoundedHistory::new(PREDICTION_HISTORY_CAP),
            outcomes: BoundedHistory::new(OUTCOME_HISTORY_CAP),
            outcomes_total: 0,
            adaptation_threshold,
            adaptation_count: 0,
            last_adaptation: None,
        }
    }

    /// Store an assessment as a prediction awaiting its outcome.
    pub fn record_prediction(&mut self, assessment: &RiskAssessment, weights: &WeightSet) -> Uuid {
        let id = Uuid::new_v4();
        self.predictions.push(PredictionRecord {
            id,
            assessment: assessment.clone(),
            weights: weights.clone(),
            recorded_at: Utc::now(),
        });
        id
    }

    /// The only external write path into the learner. Grades the outcome
    /// against the stored prediction and, on every Nth outcome, runs one
    /// adaptation pass mutating `weights` in place.
    ///
    /// Unknown ids are an expected race (the prediction may have aged out
    /// of the bounded history) and come back as an error result.
    pub fn record_outcome(
        &mut self,
        weights: &mut WeightSet,
        prediction_id: Uuid,
        report: &OutcomeReport,
    ) -> EngineResult<OutcomeResult> {
        let prediction = self
            .predictions
            .find(|p| p.id == prediction_id)
            .ok_or_else(|| EngineError::UnknownPrediction(prediction_id.to_string()))?;

        let predicted_level = prediction.assessment.risk_level;
        let accuracy = accuracy::grade(predicted_level, report);
        let now = Utc::now();

        self.outcomes.push(GradedOutcome {
            prediction_id,
            predicted_level,
            actual_level: report.actual_risk_level,
            incident_occurred: report.incident_occurred,
            accuracy,
            factor_scores: prediction
                .assessment
                .factor_scores
                .iter()
                .map(|(f, fs)| (*f, fs.score))
                .collect(),
            predicted_at: prediction.recorded_at,
            graded_at: now,
        });

        log::debug!(
            "outcome for {}: predicted {} actual {} accuracy {:.2}",
            prediction_id,
            predicted_level,
            report.actual_risk_level,
            accuracy
        );

        // Adaptation fires exactly on every Nth outcome, never off-cycle.
        self.outcomes_total += 1;
        let adapted = self.outcomes_total % self.adaptation_threshold as u64 == 0;
        let new_weights = if adapted {
            let window: Vec<&GradedOutcome> = self
                .outcomes
                .recent(2 * self.adaptation_threshold)
                .collect();
            adapt::adapt_weights(weights, &window, now);
            adapt::adapt_thresholds(weights, &window);
            self.adaptation_count += 1;
            self.last_adaptation = Some(now);
            log::info!(
                "adaptation #{} after {} outcomes",
                self.adaptation_count,
                self.outcomes_total
            );
            Some(weights.clone())
        } else {
            None
        };

        Ok(OutcomeResult {
            accuracy,
            adapted,
            new_weights,
        })
    }

    /// Mean accuracy over the recent window, once enough outcomes exist.
    /// Feeds the scorer's confidence.
    pub fn recent_accuracy(&self) -> Option<f64> {
        if self.outcomes.len() < MIN_OUTCOMES_FOR_CONFIDENCE {
            return None;
        }
        let window: Vec<_> = self.outcomes.recent(2 * self.adaptation_threshold).collect();
        let sum: f64 = window.iter().map(|o| o.accuracy).sum();
        Some(sum / window.len() as f64)
    }

    /// Lifetime outcome count, not the (bounded) buffer fill.
    pub fn outcomes_recorded(&self) -> u64 {
        self.outcomes_total
    }

    pub fn stats(&self) -> LearnerStats {
        LearnerStats {
            pending_predictions: self.predictions.len(),
            outcomes_recorded: self.outcomes_total,
            adaptation_count: self.adaptation_count,
            recent_accuracy: self.recent_accuracy(),
            last_adaptation: self.last_adaptation,
        }
    }
}

impl Default for WeightLearner {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
