//! Error handling
//!
//! One taxonomy for the whole engine. Validation failures are the only
//! errors surfaced for malformed input; unknown categorical values never
//! error (they resolve to neutral defaults in the scoring tables).

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing required input (missing location/weather/time
    /// context, simulation horizon out of bounds). Never silently defaulted.
    #[error("validation error: {0}")]
    Validation(String),

    /// recordOutcome referenced a prediction id that is not in the bounded
    /// history. Expected race: the record may simply have aged out.
    ///
    /// Rejected state transitions are not an error; they leave the state
    /// unchanged and return false from the controller.
    #[error("unknown prediction id: {0}")]
    UnknownPrediction(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EngineError::Validation(msg.into())
    }

    /// Short machine-readable tag for the JSON facade.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation_error",
            EngineError::UnknownPrediction(_) => "unknown_prediction",
        }
    }
}
