//! SafeRoute Core - Environmental Risk Assessment
//!
//! Multi-factor weighted risk scoring over live location, weather and
//! crowd-density signals: normalization into a canonical condition
//! vector, weighted aggregation into a discrete risk level,
//! confidence-weighted online adaptation of the weights from observed
//! outcomes, and a state machine mapping risk onto application behavior.
//!
//! The [`engine::RiskEngine`] is the entry point; everything else hangs
//! off it.

pub mod api;
pub mod breakdown;
pub mod constants;
pub mod engine;
pub mod error;
pub mod history;
pub mod learner;
pub mod normalize;
pub mod scheduler;
pub mod scoring;
pub mod sim;
pub mod state;

pub use engine::{CycleResult, EngineStatus, RiskEngine, TickReport};
pub use error::{EngineError, EngineResult};
pub use learner::{OutcomeReport, OutcomeResult};
pub use scoring::{ConditionVector, RiskAssessment, RiskLevel, WeightSet};
pub use sim::{SimulationParams, SimulationResult};
pub use state::AppState;
