//! State Module
//!
//! Finite state machine mapping risk levels (plus emergency/recovery
//! overrides) onto application behavior profiles.
//!
//! ## Structure
//! - `types`: states, profiles, transition records
//! - `transitions`: static transition table + per-state profiles
//! - `controller`: the single writer of the current state

pub mod controller;
pub mod transitions;
pub mod types;

// Re-export main types for convenience
pub use controller::{StateController, TransitionListener};
pub use transitions::{allowed_transitions, is_allowed, profile};
pub use types::{AlertLevel, AppState, AutoAction, BehaviorProfile, StateTransition, UserAction};
