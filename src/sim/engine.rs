//! What-If Engine
//!
//! Replays the risk scorer over a synthetic time series of evolving
//! conditions to project a risk trajectory. Validation is strict (bad
//! horizons are the caller's problem); everything downstream of valid
//! parameters is best-effort like the scorer itself.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::constants::{SIM_MAX_HOURS, SIM_MAX_INTERVAL_MINUTES};
use crate::error::{EngineError, EngineResult};
use crate::scoring::tables::WeightSet;
use crate::scoring::types::{ConditionVector, RiskLevel};
use crate::scoring::score_with_confidence;
use super::evolve::{crowd_at, step_weather, temperature_at, time_bucket_at, TrendParams};

// ============================================================================
// PARAMETERS & OUTPUT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationParams {
    pub initial: ConditionVector,
    #[serde(default)]
    pub trends: TrendParams,
    pub hours_ahead: f64,
    pub interval_minutes: u32,
}

/// One projected point on the trajectory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub minutes_ahead: u64,
    pub conditions: ConditionVector,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    /// Decays with the projection horizon, floored at 0.3.
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryTrend {
    Rising,
    Falling,
    Stable,
}

/// A projected risk-level change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTransition {
    pub minutes_ahead: u64,
    pub from: RiskLevel,
    pub to: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub points: Vec<PredictionPoint>,
    pub trend: TrajectoryTrend,
    pub peak_minutes: u64,
    pub peak_score: f64,
    pub peak_level: RiskLevel,
    /// Population stdev of the projected scores.
    pub volatility: f64,
    pub level_transitions: Vec<LevelTransition>,
}

// ============================================================================
// SIMULATION
// ============================================================================

/// First-vs-last comparisons inside this band count as stable.
const TREND_DEAD_BAND: f64 = 0.5;

pub fn simulate(params: &SimulationParams, weights: &WeightSet) -> EngineResult<SimulationResult> {
    validate(params)?;

    let mut rng = match params.trends.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let total_minutes = (params.hours_ahead * 60.0).round() as u64;
    let interval = params.interval_minutes as u64;

    let mut conditions = params.initial.clone();
    let mut points = Vec::with_capacity((total_minutes / interval + 1) as usize);

    let mut t = 0u64;
    while t <= total_minutes {
        let hours_elapsed = t as f64 / 60.0;
        let hour_of_day = (params.trends.start_hour as f64 + hours_elapsed) % 24.0;

        if t > 0 {
            conditions.weather = step_weather(&mut rng, conditions.weather, params.trends.weather);
            conditions.crowd_density = crowd_at(
                params.trends.crowd,
                params.initial.crowd_density,
                hour_of_day,
                hours_elapsed,
            );
            conditions.temperature =
                Some(temperature_at(&params.trends, hour_of_day, hours_elapsed));
            conditions.time_of_day = time_bucket_at(params.trends.start_hour, hours_elapsed);
        }

        let confidence = (0.95 - 0.05 * hours_elapsed).max(0.3);
        let assessment = score_with_confidence(&conditions, weights, confidence);

        points.push(PredictionPoint {
            minutes_ahead: t,
            conditions: conditions.clone(),
            risk_score: assessment.risk_score,
            risk_level: assessment.risk_level,
            confidence,
        });

        t += interval;
    }

    log::debug!(
        "simulated {} points over {:.1}h at {}min steps",
        points.len(),
        params.hours_ahead,
        params.interval_minutes
    );

    Ok(summarize(points))
}

fn validate(params: &SimulationParams) -> EngineResult<()> {
    if !(params.hours_ahead > 0.0 && params.hours_ahead <= SIM_MAX_HOURS) {
        return Err(EngineError::validation(format!(
            "hours_ahead must be in (0, {}], got {}",
            SIM_MAX_HOURS, params.hours_ahead
        )));
    }
    if params.interval_minutes == 0 || params.interval_minutes > SIM_MAX_INTERVAL_MINUTES {
        return Err(EngineError::validation(format!(
            "interval_minutes must be in (0, {}], got {}",
            SIM_MAX_INTERVAL_MINUTES, params.interval_minutes
        )));
    }
    Ok(())
}

// ============================================================================
// TRAJECTORY SUMMARY
// ============================================================================

fn summarize(points: Vec<PredictionPoint>) -> SimulationResult {
    let first = points.first().map_or(0.0, |p| p.risk_score);
    let last = points.last().map_or(0.0, |p| p.risk_score);
    let trend = if last - first > TREND_DEAD_BAND {
        TrajectoryTrend::Rising
    } else if first - last > TREND_DEAD_BAND {
        TrajectoryTrend::Falling
    } else {
        TrajectoryTrend::Stable
    };

    let peak = points
        .iter()
        .max_by(|a, b| {
            a.risk_score
                .partial_cmp(&b.risk_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("simulation always produces at least one point");
    let (peak_minutes, peak_score, peak_level) =
        (peak.minutes_ahead, peak.risk_score, peak.risk_level);

    let n = points.len() as f64;
    let mean = points.iter().map(|p| p.risk_score).sum::<f64>() / n;
    let variance = points
        .iter()
        .map(|p| (p.risk_score - mean).powi(2))
        .sum::<f64>()
        / n;
    let volatility = variance.sqrt();

    let level_transitions = points
        .windows(2)
        .filter(|w| w[0].risk_level != w[1].risk_level)
        .map(|w| LevelTransition {
            minutes_ahead: w[1].minutes_ahead,
            from: w[0].risk_level,
            to: w[1].risk_level,
        })
        .collect();

    SimulationResult {
        points,
        trend,
        peak_minutes,
        peak_score,
        peak_level,
        volatility,
        level_transitions,
    }
}

// ============================================================================
// TESTS
// ============================================================================
