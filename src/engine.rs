//! Risk Engine
//!
//! The context object that owns all mutable state: the WeightSet (written
//! only by the learner), the state controller (sole writer of the current
//! state), the scheduler and the current assessment. No process-wide
//! globals; build as many independent engines as you need.
//!
//! Ordering guarantee: `assess` records the prediction and runs the state
//! controller's transition check before returning, so assessment ->
//! transition is atomic per cycle.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::breakdown::{self, RiskBreakdown};
use crate::error::EngineResult;
use crate::history::HistoryStatus;
use crate::learner::{LearnerStats, OutcomeReport, OutcomeResult, WeightLearner};
use crate::normalize::normalize;
use crate::scheduler::Scheduler;
use crate::scoring::tables::WeightSet;
use crate::scoring::types::{ConditionVector, RiskAssessment};
use crate::scoring::score_with_confidence;
use crate::sim::{simulate, SimulationParams, SimulationResult};
use crate::state::{AppState, BehaviorProfile, StateController, TransitionListener};

// ============================================================================
// RESULTS
// ============================================================================

/// One full scoring cycle: the assessment, the prediction id to grade it
/// with later, and what the state machine did about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleResult {
    pub prediction_id: Uuid,
    pub assessment: RiskAssessment,
    pub state: AppState,
    /// Set when this assessment caused a transition.
    pub state_changed: Option<AppState>,
}

/// What happened during a clock advance
#[derive(Debug, Clone)]
pub struct TickReport {
    /// Polling ticks that fired while advancing.
    pub polls_fired: usize,
    /// The reassessment run on the last polling tick, if conditions were
    /// available.
    pub reassessed: Option<CycleResult>,
}

/// Serializable engine snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub state: AppState,
    pub profile: BehaviorProfile,
    pub weights: WeightSet,
    pub learner: LearnerStats,
    pub current_risk: Option<RiskAssessment>,
    pub transition_history: HistoryStatus,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct RiskEngine {
    weights: WeightSet,
    learner: WeightLearner,
    scheduler: Scheduler,
    controller: StateController,
    current: Option<RiskAssessment>,
    latest_conditions: Option<ConditionVector>,
}

impl RiskEngine {
    pub fn new() -> Self {
        let mut scheduler = Scheduler::new();
        let controller = StateController::new(&mut scheduler);
        Self {
            weights: WeightSet::default(),
            learner: WeightLearner::new(),
            scheduler,
            controller,
            current: None,
            latest_conditions: None,
        }
    }

    // ========================================================================
    // SCORING CYCLE
    // ========================================================================

    /// Normalize raw upstream JSON and run a full scoring cycle.
    pub fn assess_raw(&mut self, raw: &Value) -> EngineResult<CycleResult> {
        let conditions = normalize(raw)?;
        Ok(self.assess(&conditions))
    }

    /// Run a full cycle: score, record the prediction, drive the state
    /// machine. Never fails for a valid ConditionVector.
    pub fn assess(&mut self, conditions: &ConditionVector) -> CycleResult {
        let confidence = self
            .learner
            .recent_accuracy()
            .unwrap_or(crate::constants::DEFAULT_CONFIDENCE);
        let assessment = score_with_confidence(conditions, &self.weights, confidence);

        let prediction_id = self.learner.record_prediction(&assessment, &self.weights);

        // Transition check completes before this cycle returns.
        let state_changed = self
            .controller
            .process_risk_assessment(&mut self.scheduler, &assessment);

        self.current = Some(assessment.clone());
        self.latest_conditions = Some(conditions.clone());

        CycleResult {
            prediction_id,
            assessment,
            state: self.controller.current(),
            state_changed,
        }
    }

    /// The outcome-feedback write path. May mutate the WeightSet when the
    /// adaptation batch triggers.
    pub fn record_outcome(
        &mut self,
        prediction_id: Uuid,
        report: &OutcomeReport,
    ) -> EngineResult<OutcomeResult> {
        self.learner
            .record_outcome(&mut self.weights, prediction_id, report)
    }

    /// Decompose the current assessment, if one exists.
    pub fn breakdown(&self) -> Option<RiskBreakdown> {
        self.current.as_ref().map(breakdown::analyze)
    }

    pub fn simulate(&self, params: &SimulationParams) -> EngineResult<SimulationResult> {
        simulate(params, &self.weights)
    }

    // ========================================================================
    // CLOCK & STATE
    // ========================================================================

    /// Advance the virtual clock. Controller firings are routed first;
    /// if a polling tick fired and conditions have been seen, one
    /// reassessment cycle runs after the advance completes.
    pub fn tick(&mut self, delta_ms: u64) -> TickReport {
        let firings = self.scheduler.advance(delta_ms);
        let mut polls_fired = 0;
        for firing in firings {
            if self.controller.handle_firing(&mut self.scheduler, firing.id)
                && self.controller.polling_task() == Some(firing.id)
            {
                polls_fired += 1;
            }
        }

        let reassessed = if polls_fired > 0 {
            self.latest_conditions.clone().map(|c| self.assess(&c))
        } else {
            None
        };

        TickReport {
            polls_fired,
            reassessed,
        }
    }

    pub fn state(&self) -> AppState {
        self.controller.current()
    }

    pub fn current_assessment(&self) -> Option<&RiskAssessment> {
        self.current.as_ref()
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn add_state_listener(&mut self, listener: TransitionListener) {
        self.controller.add_listener(listener);
    }

    pub fn handle_emergency(&mut self, reason: &str) -> bool {
        self.controller.handle_emergency(&mut self.scheduler, reason)
    }

    pub fn handle_recovery(&mut self, reason: &str) -> bool {
        self.controller.handle_recovery(&mut self.scheduler, reason)
    }

    /// Cancel all engine timers (teardown).
    pub fn stop(&mut self) {
        self.controller.stop(&mut self.scheduler);
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            state: self.controller.current(),
            profile: self.controller.current_profile(),
            weights: self.weights.clone(),
            learner: self.learner.stats(),
            current_risk: self.current.clone(),
            transition_history: HistoryStatus {
                current_size: self.controller.transition_history().count(),
                capacity: crate::constants::TRANSITION_HISTORY_CAP,
                fill_percent: self.controller.transition_history().count() as f64
                    / crate::constants::TRANSITION_HISTORY_CAP as f64
                    * 100.0,
            },
        }
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::constants::INIT_TO_MONITORING_DELAY_MS;
    use crate::scoring::types::{CrowdDensity, RiskLevel, TimeOfDay, Visibility, Weather};

    fn ready_engine() -> RiskEngine {
        let mut engine = RiskEngine::new();
        engine.tick(INIT_TO_MONITORING_DELAY_MS);
        assert_eq!(engine.state(), AppState::Monitoring);
        engine
    }

    fn calm() -> ConditionVector {
        ConditionVector {
            weather: Weather::Clear,
            time_of_day: TimeOfDay::Afternoon,
            crowd_density: CrowdDensity::Light,
            visibility: Visibility::Fraction(0.9),
            temperature: Some(20.0),
            ..ConditionVector::default()
        }
    }

    fn stormy() -> ConditionVector {
        ConditionVector {
            weather: Weather::Thunderstorm,
            time_of_day: TimeOfDay::LateNight,
            crowd_density: CrowdDensity::Overcrowded,
            visibility: Visibility::Fraction(0.2),
            temperature: None,
            ..ConditionVector::default()
        }
    }

    #[test]
    fn test_calm_cycle_ends_low_risk() {
        let mut engine = ready_engine();
        let cycle = engine.assess(&calm());
        assert_eq!(cycle.assessment.risk_level, RiskLevel::Low);
        assert!(cycle.assessment.risk_score < 2.0);
        assert_eq!(cycle.state, AppState::LowRisk);
        assert_eq!(cycle.state_changed, Some(AppState::LowRisk));
    }

    #[test]
    fn test_stormy_cycle_escalates() {
        let mut engine = ready_engine();
        let cycle = engine.assess(&stormy());
        assert!(cycle.assessment.risk_score >= 5.0);
        assert!(matches!(
            cycle.state,
            AppState::HighRisk | AppState::CriticalRisk
        ));
    }

    #[test]
    fn test_assess_raw_validates_input() {
        let mut engine = ready_engine();
        assert!(engine.assess_raw(&json!({ "weather": "clear" })).is_err());
        let cycle = engine
            .assess_raw(&json!({
                "weather": "clear sky",
                "time": "afternoon",
                "location": "city park"
            }))
            .unwrap();
        assert_eq!(cycle.assessment.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_outcome_feedback_adapts_weights() {
        let mut engine = ready_engine();
        let default_thresholds = (
            engine.weights().low_to_medium,
            engine.weights().medium_to_high,
        );

        // Five HIGH predictions that were all wrong: thresholds must rise.
        for _ in 0..5 {
            let cycle = engine.assess(&stormy());
            assert!(cycle.assessment.risk_level.predicts_incident());
            engine
                .record_outcome(
                    cycle.prediction_id,
                    &OutcomeReport {
                        actual_risk_level: RiskLevel::Low,
                        incident_occurred: false,
                        incident_severity: None,
                        user_feedback: None,
                        environmental_accuracy: 1.0,
                    },
                )
                .unwrap();
        }

        assert!(engine.weights().low_to_medium > default_thresholds.0);
        assert!(engine.weights().medium_to_high > default_thresholds.1);
        assert!((engine.weights().weight_sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_tracks_accuracy_after_three_outcomes() {
        let mut engine = ready_engine();
        // Default confidence before any feedback
        let cycle = engine.assess(&calm());
        assert!((cycle.assessment.confidence - 0.7).abs() < 1e-9);

        for _ in 0..3 {
            let cycle = engine.assess(&calm());
            engine
                .record_outcome(
                    cycle.prediction_id,
                    &OutcomeReport {
                        actual_risk_level: RiskLevel::Low,
                        incident_occurred: false,
                        incident_severity: None,
                        user_feedback: None,
                        environmental_accuracy: 1.0,
                    },
                )
                .unwrap();
        }

        let cycle = engine.assess(&calm());
        // Perfect history: confidence above the fixed default
        assert!(cycle.assessment.confidence > 0.9);
    }

    #[test]
    fn test_polling_tick_reassesses() {
        let mut engine = ready_engine();
        engine.assess(&calm());
        assert_eq!(engine.state(), AppState::LowRisk);

        // LOW_RISK polls every 120s
        let report = engine.tick(120_000);
        assert!(report.polls_fired >= 1);
        let cycle = report.reassessed.unwrap();
        assert_eq!(cycle.assessment.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_status_snapshot_serializes() {
        let mut engine = ready_engine();
        engine.assess(&calm());
        let status = engine.status();
        assert_eq!(status.state, AppState::LowRisk);
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "LOW_RISK");
        assert!(json["weights"]["weights"]["weather"].as_f64().is_some());
    }

    #[test]
    fn test_independent_engines_do_not_share_state() {
        let mut a = ready_engine();
        let b = ready_engine();
        a.assess(&stormy());
        assert_ne!(a.state(), AppState::Monitoring);
        assert_eq!(b.state(), AppState::Monitoring);
    }

    #[test]
    fn test_stop_tears_down_timers() {
        let mut engine = ready_engine();
        engine.assess(&calm());
        engine.stop();
        let report = engine.tick(600_000);
        assert_eq!(report.polls_fired, 0);
        assert!(report.reassessed.is_none());
    }
}
