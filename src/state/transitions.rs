//! Transition Table & Behavior Profiles
//!
//! The static FSM definition: which transitions each state allows and
//! what behavior profile applies while in it. Emergency handling is
//! reachable from HIGH_RISK and CRITICAL_RISK only.

use super::types::{AlertLevel, AppState, AutoAction, BehaviorProfile, UserAction};

/// Allowed target states from a given state.
pub fn allowed_transitions(state: AppState) -> &'static [AppState] {
    use AppState::*;
    match state {
        Initializing => &[Monitoring, Maintenance, Error],
        Monitoring => &[LowRisk, MediumRisk, HighRisk, CriticalRisk, Maintenance, Error],
        LowRisk => &[Monitoring, MediumRisk, HighRisk, CriticalRisk, Error],
        MediumRisk => &[Monitoring, LowRisk, HighRisk, CriticalRisk, Error],
        HighRisk => &[Monitoring, LowRisk, MediumRisk, CriticalRisk, EmergencyMode, Error],
        CriticalRisk => &[MediumRisk, HighRisk, EmergencyMode, Recovery, Error],
        EmergencyMode => &[Recovery, CriticalRisk, Error],
        Recovery => &[Monitoring, LowRisk, MediumRisk, Error],
        Maintenance => &[Monitoring, Initializing, Error],
        Error => &[Initializing, Monitoring, Maintenance],
    }
}

pub fn is_allowed(from: AppState, to: AppState) -> bool {
    allowed_transitions(from).contains(&to)
}

/// Behavior profile for a state.
pub fn profile(state: AppState) -> BehaviorProfile {
    use UserAction::*;
    match state {
        AppState::Initializing => BehaviorProfile {
            polling_interval_ms: 0,
            alert_level: AlertLevel::None,
            enabled_actions: vec![],
            auto_actions: vec![],
        },
        AppState::Monitoring => BehaviorProfile {
            polling_interval_ms: 60_000,
            alert_level: AlertLevel::None,
            enabled_actions: vec![CheckIn, Report],
            auto_actions: vec![],
        },
        AppState::LowRisk => BehaviorProfile {
            polling_interval_ms: 120_000,
            alert_level: AlertLevel::Info,
            enabled_actions: vec![CheckIn, Report],
            auto_actions: vec![],
        },
        AppState::MediumRisk => BehaviorProfile {
            polling_interval_ms: 60_000,
            alert_level: AlertLevel::Advisory,
            enabled_actions: vec![CheckIn, Report, ShareLocation],
            auto_actions: vec![],
        },
        AppState::HighRisk => BehaviorProfile {
            polling_interval_ms: 30_000,
            alert_level: AlertLevel::Warning,
            enabled_actions: vec![CheckIn, Report, ShareLocation, CallContact],
            auto_actions: vec![],
        },
        AppState::CriticalRisk => BehaviorProfile {
            polling_interval_ms: 10_000,
            alert_level: AlertLevel::Urgent,
            enabled_actions: vec![Report, ShareLocation, CallContact, Sos],
            auto_actions: vec![AutoAction::NotifyContacts],
        },
        AppState::EmergencyMode => BehaviorProfile {
            polling_interval_ms: 5_000,
            alert_level: AlertLevel::Emergency,
            enabled_actions: vec![Sos],
            auto_actions: vec![AutoAction::BroadcastLocation],
        },
        AppState::Recovery => BehaviorProfile {
            polling_interval_ms: 30_000,
            alert_level: AlertLevel::Advisory,
            enabled_actions: vec![CheckIn, Report],
            auto_actions: vec![],
        },
        AppState::Maintenance => BehaviorProfile {
            polling_interval_ms: 300_000,
            alert_level: AlertLevel::None,
            enabled_actions: vec![],
            auto_actions: vec![],
        },
        AppState::Error => BehaviorProfile {
            polling_interval_ms: 0,
            alert_level: AlertLevel::None,
            enabled_actions: vec![],
            auto_actions: vec![],
        },
    }
}
