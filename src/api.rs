//! JSON Facade - API for a presentation layer
//!
//! Thin wrappers over the engine that never panic and never propagate an
//! error object upward: failures come back as
//! `{"success": false, "error": ..., "fallback": ...}` so a UI can always
//! render something.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::engine::RiskEngine;
use crate::error::EngineError;
use crate::learner::OutcomeReport;
use crate::sim::SimulationParams;

// ============================================================================
// ENVELOPES
// ============================================================================

fn ok(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

fn fail(err: &EngineError, fallback: Value) -> Value {
    json!({
        "success": false,
        "error": { "kind": err.kind(), "message": err.to_string() },
        "fallback": fallback,
    })
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Normalize + score raw upstream JSON. Fallback is the current
/// assessment, if any, so the UI keeps showing the last good result.
pub fn assess_json(engine: &mut RiskEngine, raw: &Value) -> Value {
    let fallback = engine
        .current_assessment()
        .map(|a| serde_json::to_value(a).unwrap_or(Value::Null))
        .unwrap_or(Value::Null);
    match engine.assess_raw(raw) {
        Ok(cycle) => ok(serde_json::to_value(&cycle).unwrap_or(Value::Null)),
        Err(err) => {
            log::warn!("assess failed: {}", err);
            fail(&err, fallback)
        }
    }
}

/// Run a what-if simulation. Fallback is an empty trajectory.
pub fn simulate_json(engine: &RiskEngine, params: &Value) -> Value {
    let params: SimulationParams = match serde_json::from_value(params.clone()) {
        Ok(p) => p,
        Err(e) => {
            let err = EngineError::validation(format!("bad simulation parameters: {}", e));
            log::warn!("{}", err);
            return fail(&err, json!({ "points": [] }));
        }
    };
    match engine.simulate(&params) {
        Ok(result) => ok(serde_json::to_value(&result).unwrap_or(Value::Null)),
        Err(err) => {
            log::warn!("simulate failed: {}", err);
            fail(&err, json!({ "points": [] }))
        }
    }
}

/// Record a ground-truth outcome for an earlier prediction.
pub fn record_outcome_json(engine: &mut RiskEngine, prediction_id: &str, report: &Value) -> Value {
    let id = match Uuid::parse_str(prediction_id) {
        Ok(id) => id,
        Err(_) => {
            let err = EngineError::validation(format!("bad prediction id: {}", prediction_id));
            return fail(&err, Value::Null);
        }
    };
    let report: OutcomeReport = match serde_json::from_value(report.clone()) {
        Ok(r) => r,
        Err(e) => {
            let err = EngineError::validation(format!("bad outcome report: {}", e));
            return fail(&err, Value::Null);
        }
    };
    match engine.record_outcome(id, &report) {
        Ok(result) => ok(serde_json::to_value(&result).unwrap_or(Value::Null)),
        Err(err) => fail(&err, Value::Null),
    }
}

/// Current engine snapshot for dashboards.
pub fn status_json(engine: &RiskEngine) -> Value {
    ok(serde_json::to_value(engine.status()).unwrap_or(Value::Null))
}

// ============================================================================
// TESTS
// ============================================================================
