//! Central Configuration Constants
//!
//! Single source of truth for engine-wide defaults.
//! To retune the scoring pipeline, edit this file first.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "SafeRoute";

/// Severity scale ceiling for every factor score (0.0 - 10.0)
pub const SEVERITY_SCALE: f64 = 10.0;

/// Any single factor at or above this severity forces CRITICAL,
/// regardless of the weighted score or adaptive thresholds.
pub const CRITICAL_FACTOR_SEVERITY: f64 = 9.0;

/// Default score -> level thresholds
pub const DEFAULT_LOW_TO_MEDIUM: f64 = 3.0;
pub const DEFAULT_MEDIUM_TO_HIGH: f64 = 5.0;

/// Hard bounds for the adaptive thresholds
pub const THRESHOLD_MIN: f64 = 1.0;
pub const THRESHOLD_MAX: f64 = 6.0;

/// Hard bounds for a single factor weight
pub const WEIGHT_MIN: f64 = 0.05;
pub const WEIGHT_MAX: f64 = 0.5;

/// Confidence reported before enough outcomes exist to measure accuracy
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

/// Outcomes required before confidence tracks measured accuracy
pub const MIN_OUTCOMES_FOR_CONFIDENCE: usize = 3;

/// Adaptation fires on every Nth recorded outcome
pub const ADAPTATION_THRESHOLD: usize = 5;

/// Learner tuning
pub const LEARNING_RATE: f64 = 0.05;
pub const TARGET_PERFORMANCE: f64 = 0.7;
pub const MAX_WEIGHT_DELTA: f64 = 0.1;
pub const RECENCY_DECAY_PER_DAY: f64 = 0.9;

/// False-positive rate band for threshold adaptation
pub const FP_RATE_RAISE_ABOVE: f64 = 0.3;
pub const FP_RATE_LOWER_BELOW: f64 = 0.1;
pub const THRESHOLD_RAISE_STEP: f64 = 0.25;
pub const THRESHOLD_LOWER_STEP: f64 = 0.15;

/// A factor counts as "predicted risky" at or above this raw score
pub const FACTOR_ACTIVATION: f64 = 3.0;

/// Bounded in-memory history capacities
pub const PREDICTION_HISTORY_CAP: usize = 100;
pub const OUTCOME_HISTORY_CAP: usize = 100;
pub const TRANSITION_HISTORY_CAP: usize = 50;

/// INITIALIZING auto-advances to MONITORING after this delay (ms)
pub const INIT_TO_MONITORING_DELAY_MS: u64 = 1_500;

/// Simulation parameter bounds
pub const SIM_MAX_HOURS: f64 = 48.0;
pub const SIM_MAX_INTERVAL_MINUTES: u32 = 240;
