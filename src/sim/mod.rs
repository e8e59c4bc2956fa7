//! Simulation Module
//!
//! What-if projection of risk over synthetic future conditions.
//!
//! ## Structure
//! - `evolve`: per-field evolution models (weather walk, crowd cycle,
//!   temperature sinusoid, time bucket)
//! - `engine`: the simulate loop, validation and trajectory summary

pub mod engine;
pub mod evolve;

// Re-export main types for convenience
pub use engine::{
    simulate, LevelTransition, PredictionPoint, SimulationParams, SimulationResult,
    TrajectoryTrend,
};
pub use evolve::{CrowdTrend, TrendParams, WeatherTrend};
