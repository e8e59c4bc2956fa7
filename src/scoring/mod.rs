//! Scoring Module
//!
//! Turns a normalized ConditionVector into a RiskAssessment: table lookup
//! per factor, weighted sum, threshold mapping, recommendations.
//!
//! ## Structure
//! - `types`: Core types (ConditionVector, RiskLevel, RiskAssessment, etc.)
//! - `tables`: Severity tables and the WeightSet
//! - `scorer`: Weighted aggregation + level mapping
//! - `recommend`: Deterministic recommendation rules

pub mod recommend;
pub mod scorer;
pub mod tables;
pub mod types;

// Re-export main types for convenience
pub use tables::WeightSet;
pub use types::{
    ConditionVector, CrowdDensity, Factor, FactorScore, LocationKind, RiskAssessment,
    RiskLevel, TimeOfDay, Visibility, VisibilityLabel, Weather,
};

pub use scorer::{raw_factor_scores, score, score_with_confidence};
