//! State Machine Types
//!
//! States, behavior profiles and transition records. No logic here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// STATES
// ============================================================================

/// Application behavior states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppState {
    Initializing,
    Monitoring,
    LowRisk,
    MediumRisk,
    HighRisk,
    CriticalRisk,
    EmergencyMode,
    Recovery,
    Maintenance,
    Error,
}

impl AppState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppState::Initializing => "INITIALIZING",
            AppState::Monitoring => "MONITORING",
            AppState::LowRisk => "LOW_RISK",
            AppState::MediumRisk => "MEDIUM_RISK",
            AppState::HighRisk => "HIGH_RISK",
            AppState::CriticalRisk => "CRITICAL_RISK",
            AppState::EmergencyMode => "EMERGENCY_MODE",
            AppState::Recovery => "RECOVERY",
            AppState::Maintenance => "MAINTENANCE",
            AppState::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ALERTS & ACTIONS
// ============================================================================

/// Notification urgency attached to a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    None,
    Info,
    Advisory,
    Warning,
    Urgent,
    Emergency,
}

/// User actions a state enables in the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    CheckIn,
    Report,
    ShareLocation,
    CallContact,
    Sos,
}

/// Side effects fired on state entry, delegated to external collaborators
/// through the transition listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoAction {
    BroadcastLocation,
    NotifyContacts,
}

// ============================================================================
// BEHAVIOR PROFILE
// ============================================================================

/// What the application does while in a state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorProfile {
    /// 0 = no polling loop for this state.
    pub polling_interval_ms: u64,
    pub alert_level: AlertLevel,
    pub enabled_actions: Vec<UserAction>,
    pub auto_actions: Vec<AutoAction>,
}

// ============================================================================
// TRANSITION RECORD
// ============================================================================

/// One applied transition, as seen by listeners and the history buffer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: AppState,
    pub to: AppState,
    /// Why the transition happened ("risk_assessment", "emergency", ...).
    pub context: String,
    pub at: DateTime<Utc>,
}
