//! State Controller
//!
//! Owns the current state and the only mutation path into it. Applies
//! behavior profiles on entry: the previous state's polling task is
//! cancelled before the next one starts, so there is never more than one
//! polling loop for this concern. Listeners are notified after every
//! applied transition; auto actions ride along on the transition record
//! for external collaborators to execute.

use chrono::Utc;

use crate::constants::{INIT_TO_MONITORING_DELAY_MS, TRANSITION_HISTORY_CAP};
use crate::history::BoundedHistory;
use crate::scheduler::{Scheduler, TaskId};
use crate::scoring::types::{RiskAssessment, RiskLevel};
use super::transitions::{is_allowed, profile};
use super::types::{AppState, BehaviorProfile, StateTransition};

/// Called after every applied transition.
pub type TransitionListener = Box<dyn Fn(&StateTransition, &BehaviorProfile) + Send>;

/// Score at or above which a HIGH assessment escalates straight to
/// CRITICAL_RISK.
const CRITICAL_SCORE_ESCALATION: f64 = 8.0;

pub struct StateController {
    current: AppState,
    history: BoundedHistory<StateTransition>,
    polling_task: Option<TaskId>,
    init_task: Option<TaskId>,
    listeners: Vec<TransitionListener>,
}

impl StateController {
    /// Starts in INITIALIZING with the auto-advance to MONITORING already
    /// scheduled.
    pub fn new(scheduler: &mut Scheduler) -> Self {
        let init_task = scheduler.schedule_once("state:init", INIT_TO_MONITORING_DELAY_MS);
        Self {
            current: AppState::Initializing,
            history: BoundedHistory::new(TRANSITION_HISTORY_CAP),
            polling_task: None,
            init_task: Some(init_task),
            listeners: Vec::new(),
        }
    }

    pub fn current(&self) -> AppState {
        self.current
    }

    pub fn current_profile(&self) -> BehaviorProfile {
        profile(self.current)
    }

    pub fn add_listener(&mut self, listener: TransitionListener) {
        self.listeners.push(listener);
    }

    pub fn transition_history(&self) -> impl Iterator<Item = &StateTransition> {
        self.history.iter()
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Attempt a transition. Rejected targets leave the state unchanged
    /// and return false.
    pub fn transition(
        &mut self,
        scheduler: &mut Scheduler,
        target: AppState,
        context: &str,
    ) -> bool {
        if !is_allowed(self.current, target) {
            log::debug!(
                "transition {} -> {} rejected ({})",
                self.current,
                target,
                context
            );
            return false;
        }
        self.apply(scheduler, target, context);
        true
    }

    /// Map an assessment's risk level onto a target state and transition
    /// if it differs from the current state. This is the sole automatic
    /// driver of the FSM. Returns the new state when a transition applied.
    pub fn process_risk_assessment(
        &mut self,
        scheduler: &mut Scheduler,
        assessment: &RiskAssessment,
    ) -> Option<AppState> {
        let target = match assessment.risk_level {
            RiskLevel::Low => AppState::LowRisk,
            RiskLevel::Medium => AppState::MediumRisk,
            RiskLevel::High if assessment.risk_score >= CRITICAL_SCORE_ESCALATION => {
                AppState::CriticalRisk
            }
            RiskLevel::High => AppState::HighRisk,
            RiskLevel::Critical => AppState::CriticalRisk,
        };
        if target == self.current {
            return None;
        }
        self.transition(scheduler, target, "risk_assessment")
            .then_some(target)
    }

    /// Manual override into EMERGENCY_MODE. Only reachable from HIGH_RISK
    /// and CRITICAL_RISK per the transition table.
    pub fn handle_emergency(&mut self, scheduler: &mut Scheduler, reason: &str) -> bool {
        let applied = self.transition(scheduler, AppState::EmergencyMode, reason);
        if !applied {
            log::warn!(
                "emergency rejected from {} ({})",
                self.current,
                reason
            );
        }
        applied
    }

    /// Manual override out of emergency/critical into RECOVERY.
    pub fn handle_recovery(&mut self, scheduler: &mut Scheduler, reason: &str) -> bool {
        self.transition(scheduler, AppState::Recovery, reason)
    }

    // ========================================================================
    // TIMER WIRING
    // ========================================================================

    /// Route a scheduler firing to this controller. Returns true when the
    /// firing was ours: either the INITIALIZING auto-advance or a polling
    /// tick (the engine runs an assessment cycle on polling ticks).
    pub fn handle_firing(&mut self, scheduler: &mut Scheduler, task: TaskId) -> bool {
        if self.init_task == Some(task) {
            self.init_task = None;
            self.transition(scheduler, AppState::Monitoring, "startup_complete");
            return true;
        }
        self.polling_task == Some(task)
    }

    pub fn polling_task(&self) -> Option<TaskId> {
        self.polling_task
    }

    /// Stop the controller's polling loop (shutdown path).
    pub fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(task) = self.polling_task.take() {
            scheduler.cancel(task);
        }
        if let Some(task) = self.init_task.take() {
            scheduler.cancel(task);
        }
    }

    // ========================================================================
    // INTERNAL
    // ========================================================================

    fn apply(&mut self, scheduler: &mut Scheduler, target: AppState, context: &str) {
        // Exit: cancel the old timer before the new state's timer starts.
        if let Some(task) = self.polling_task.take() {
            scheduler.cancel(task);
        }

        let transition = StateTransition {
            from: self.current,
            to: target,
            context: context.to_string(),
            at: Utc::now(),
        };
        log::info!("state {} -> {} ({})", transition.from, transition.to, context);

        self.current = target;
        self.history.push(transition.clone());

        // Enter: apply the behavior profile.
        let new_profile = profile(target);
        if new_profile.polling_interval_ms > 0 {
            self.polling_task = Some(
                scheduler.schedule_repeating("state:poll", new_profile.polling_interval_ms),
            );
        }
        for action in &new_profile.auto_actions {
            log::info!("auto action on entering {}: {:?}", target, action);
        }
        for listener in &self.listeners {
            listener(&transition, &new_profile);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::scoring::tables::WeightSet;
    use crate::scoring::types::{ConditionVector, CrowdDensity, TimeOfDay, Visibility, Weather};
    use crate::scoring::score;

    fn setup() -> (Scheduler, StateController) {
        let mut scheduler = Scheduler::new();
        let controller = StateController::new(&mut scheduler);
        (scheduler, controller)
    }

    fn monitoring() -> (Scheduler, StateController) {
        let (mut scheduler, mut controller) = setup();
        for firing in scheduler.advance(INIT_TO_MONITORING_DELAY_MS) {
            controller.handle_firing(&mut scheduler, firing.id);
        }
        (scheduler, controller)
    }

    fn assessment_for(level: RiskLevel) -> RiskAssessment {
        let conditions = match level {
            RiskLevel::Low => ConditionVector::default(),
            RiskLevel::Medium => ConditionVector {
                weather: Weather::Rain,
                time_of_day: TimeOfDay::Night,
                crowd_density: CrowdDensity::Heavy,
                ..ConditionVector::default()
            },
            _ => ConditionVector {
                weather: Weather::Thunderstorm,
                time_of_day: TimeOfDay::LateNight,
                crowd_density: CrowdDensity::Overcrowded,
                visibility: Visibility::Fraction(0.2),
                ..ConditionVector::default()
            },
        };
        score(&conditions, &WeightSet::default())
    }

    #[test]
    fn test_starts_initializing_then_auto_monitors() {
        let (mut scheduler, mut controller) = setup();
        assert_eq!(controller.current(), AppState::Initializing);
        for firing in scheduler.advance(INIT_TO_MONITORING_DELAY_MS) {
            controller.handle_firing(&mut scheduler, firing.id);
        }
        assert_eq!(controller.current(), AppState::Monitoring);
    }

    #[test]
    fn test_disallowed_transition_returns_false_and_keeps_state() {
        let (mut scheduler, mut controller) = monitoring();
        assert!(!controller.transition(&mut scheduler, AppState::EmergencyMode, "test"));
        assert_eq!(controller.current(), AppState::Monitoring);
    }

    #[test]
    fn test_risk_assessment_drives_state() {
        let (mut scheduler, mut controller) = monitoring();
        let applied =
            controller.process_risk_assessment(&mut scheduler, &assessment_for(RiskLevel::Low));
        assert_eq!(applied, Some(AppState::LowRisk));
        assert_eq!(controller.current(), AppState::LowRisk);

        // Same level again: no-op
        let applied =
            controller.process_risk_assessment(&mut scheduler, &assessment_for(RiskLevel::Low));
        assert_eq!(applied, None);
    }

    #[test]
    fn test_high_score_escalates_to_critical() {
        let (mut scheduler, mut controller) = monitoring();
        let mut assessment = assessment_for(RiskLevel::High);
        assessment.risk_score = 8.4;
        let applied = controller.process_risk_assessment(&mut scheduler, &assessment);
        assert_eq!(applied, Some(AppState::CriticalRisk));
    }

    #[test]
    fn test_polling_task_swapped_not_stacked() {
        let (mut scheduler, mut controller) = monitoring();
        let monitoring_task = controller.polling_task().unwrap();

        controller.process_risk_assessment(&mut scheduler, &assessment_for(RiskLevel::Medium));
        let medium_task = controller.polling_task().unwrap();

        assert_ne!(monitoring_task, medium_task);
        assert!(!scheduler.is_scheduled(monitoring_task));
        assert!(scheduler.is_scheduled(medium_task));
        // Exactly one polling loop alive
        assert_eq!(scheduler.task_count(), 1);
    }

    #[test]
    fn test_emergency_only_from_high_or_critical() {
        let (mut scheduler, mut controller) = monitoring();
        assert!(!controller.handle_emergency(&mut scheduler, "panic_button"));

        controller.process_risk_assessment(&mut scheduler, &assessment_for(RiskLevel::High));
        assert!(controller.handle_emergency(&mut scheduler, "panic_button"));
        assert_eq!(controller.current(), AppState::EmergencyMode);

        assert!(controller.handle_recovery(&mut scheduler, "all_clear"));
        assert_eq!(controller.current(), AppState::Recovery);
    }

    #[test]
    fn test_listeners_notified_with_profile() {
        let (mut scheduler, mut controller) = monitoring();
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        controller.add_listener(Box::new(move |transition, profile| {
            assert_eq!(transition.to, AppState::MediumRisk);
            assert_eq!(profile.polling_interval_ms, 60_000);
            seen.fetch_add(1, Ordering::SeqCst);
        }));
        controller.process_risk_assessment(&mut scheduler, &assessment_for(RiskLevel::Medium));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_transition_history_recorded() {
        let (mut scheduler, mut controller) = monitoring();
        controller.process_risk_assessment(&mut scheduler, &assessment_for(RiskLevel::Low));
        let transitions: Vec<_> = controller.transition_history().collect();
        assert_eq!(transitions.len(), 2); // init->monitoring, monitoring->low
        assert_eq!(transitions[1].to, AppState::LowRisk);
    }

    #[test]
    fn test_stop_cancels_polling() {
        let (mut scheduler, mut controller) = monitoring();
        assert_eq!(scheduler.task_count(), 1);
        controller.stop(&mut scheduler);
        assert_eq!(scheduler.task_count(), 0);
    }
}
