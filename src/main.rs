//! SafeRoute Core - Demo Entry Point
//!
//! Wires one engine through a full cycle: normalize raw signals, score,
//! explain, drive the state machine, then project the next six hours.
//! A presentation layer would consume the same JSON this binary logs.

use serde_json::json;

use saferoute_core::api;
use saferoute_core::constants::{APP_NAME, APP_VERSION, INIT_TO_MONITORING_DELAY_MS};
use saferoute_core::engine::RiskEngine;
use saferoute_core::sim::{SimulationParams, TrendParams, WeatherTrend};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}...", APP_NAME, APP_VERSION);

    let mut engine = RiskEngine::new();

    // Let INITIALIZING auto-advance to MONITORING
    engine.tick(INIT_TO_MONITORING_DELAY_MS);
    log::info!("engine ready in state {}", engine.state());

    // One scoring cycle from raw upstream-style JSON
    let raw = json!({
        "weather": { "condition": "light rain", "temperature": 14.0, "visibility": 6000 },
        "time": "evening",
        "location": "downtown transit station",
        "crowd": 18
    });
    let result = api::assess_json(&mut engine, &raw);
    log::info!("assessment: {}", result);

    if let Some(breakdown) = engine.breakdown() {
        for c in &breakdown.contributions {
            log::info!(
                "  #{} {} {:.1}% ({})",
                c.rank,
                c.factor,
                c.percentage,
                c.tier
            );
        }
        for i in &breakdown.interactions {
            log::info!("  interaction: {} x{:.1}", i.name, i.multiplier);
        }
    }

    // Project the next six hours under deteriorating weather
    let params = SimulationParams {
        initial: saferoute_core::normalize::normalize(&raw).unwrap_or_default(),
        trends: TrendParams {
            weather: WeatherTrend::Deteriorating,
            start_hour: 18,
            ..TrendParams::default()
        },
        hours_ahead: 6.0,
        interval_minutes: 30,
    };
    match engine.simulate(&params) {
        Ok(projection) => {
            log::info!(
                "projection: trend {:?}, peak {:.1} ({}) at +{}min, volatility {:.2}",
                projection.trend,
                projection.peak_score,
                projection.peak_level,
                projection.peak_minutes,
                projection.volatility
            );
        }
        Err(e) => log::error!("simulation failed: {}", e),
    }

    log::info!("final status: {}", api::status_json(&engine));
    engine.stop();
}
