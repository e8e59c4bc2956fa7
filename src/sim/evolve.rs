//! Condition Evolution Models
//!
//! How each field of the ConditionVector moves through simulated time:
//! weather walks a severity ladder with a configured bias, crowd follows a
//! peak-hour cycle or a monotonic drift, temperature is a daily sinusoid
//! plus a linear trend, and the time bucket tracks the wall clock.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::scoring::tables::weather_severity;
use crate::scoring::types::{CrowdDensity, TimeOfDay, Weather};

// ============================================================================
// TREND PARAMETERS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherTrend {
    Improving,
    Deteriorating,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrowdTrend {
    /// Keyed to peak-hour proximity (08:00 and 18:00).
    Cyclical,
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendParams {
    pub weather: WeatherTrend,
    pub crowd: CrowdTrend,
    /// Degrees Celsius drift per simulated hour.
    pub temperature_trend_per_hour: f64,
    /// Midline of the daily temperature cycle.
    pub base_temperature: f64,
    /// Half the day/night swing.
    pub daily_amplitude: f64,
    /// Wall-clock hour at t=0.
    pub start_hour: u32,
    /// Fixed seed for reproducible runs; None draws from entropy.
    pub seed: Option<u64>,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            weather: WeatherTrend::Stable,
            crowd: CrowdTrend::Cyclical,
            temperature_trend_per_hour: 0.0,
            base_temperature: 18.0,
            daily_amplitude: 6.0,
            start_hour: 12,
            seed: None,
        }
    }
}

// ============================================================================
// WEATHER WALK
// ============================================================================

/// Severity-ordered ladder the random walk moves over. Snow, blizzard and
/// hurricane class events are not reachable by drift; an initial condition
/// off the ladder re-enters the walk at the severity-nearest rung on its
/// first step.
const WEATHER_LADDER: [Weather; 7] = [
    Weather::Clear,
    Weather::Cloudy,
    Weather::Drizzle,
    Weather::Rain,
    Weather::Fog,
    Weather::Hail,
    Weather::Thunderstorm,
];

/// One biased step of the weather walk.
pub fn step_weather<R: Rng>(rng: &mut R, current: Weather, trend: WeatherTrend) -> Weather {
    let position = WEATHER_LADDER
        .iter()
        .position(|&w| w == current)
        .unwrap_or_else(|| nearest_rung(current));

    // (worsen, hold) probabilities; improve takes the rest
    let (worsen, hold) = match trend {
        WeatherTrend::Deteriorating => (0.45, 0.35),
        WeatherTrend::Improving => (0.20, 0.35),
        WeatherTrend::Stable => (0.15, 0.70),
    };

    let roll: f64 = rng.gen();
    let next = if roll < worsen {
        (position + 1).min(WEATHER_LADDER.len() - 1)
    } else if roll < worsen + hold {
        position
    } else {
        position.saturating_sub(1)
    };
    WEATHER_LADDER[next]
}

/// Ladder rung with the smallest severity distance to an off-ladder
/// condition (snow -> fog, blizzard and worse -> thunderstorm).
fn nearest_rung(weather: Weather) -> usize {
    let severity = weather_severity(weather);
    WEATHER_LADDER
        .iter()
        .enumerate()
        .min_by(|(_, &a), (_, &b)| {
            (weather_severity(a) - severity)
                .abs()
                .partial_cmp(&(weather_severity(b) - severity).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(WEATHER_LADDER.len() - 1)
}

// ============================================================================
// CROWD MODEL
// ============================================================================

const CROWD_LADDER: [CrowdDensity; 5] = [
    CrowdDensity::Empty,
    CrowdDensity::Light,
    CrowdDensity::Moderate,
    CrowdDensity::Heavy,
    CrowdDensity::Overcrowded,
];

/// Crowd density at a simulated instant.
pub fn crowd_at(
    trend: CrowdTrend,
    initial: CrowdDensity,
    hour_of_day: f64,
    hours_elapsed: f64,
) -> CrowdDensity {
    let start = CROWD_LADDER.iter().position(|&c| c == initial).unwrap_or(1);
    let index = match trend {
        CrowdTrend::Cyclical => {
            // Distance to the nearest peak hour (08:00 / 18:00), wrapped
            let d_morning = cyclic_distance(hour_of_day, 8.0);
            let d_evening = cyclic_distance(hour_of_day, 18.0);
            let proximity = d_morning.min(d_evening); // 0 = at peak, 12 = furthest
            if proximity < 1.5 {
                4
            } else if proximity < 3.0 {
                3
            } else if proximity < 5.0 {
                2
            } else {
                1
            }
        }
        // One ladder step per 3 simulated hours
        CrowdTrend::Increasing => start + (hours_elapsed / 3.0) as usize,
        CrowdTrend::Decreasing => start.saturating_sub((hours_elapsed / 3.0) as usize),
    };
    CROWD_LADDER[index.min(CROWD_LADDER.len() - 1)]
}

fn cyclic_distance(hour: f64, peak: f64) -> f64 {
    let d = (hour - peak).abs() % 24.0;
    d.min(24.0 - d)
}

// ============================================================================
// TEMPERATURE & TIME
// ============================================================================

/// Daily sinusoid (warmest at 15:00) plus the configured linear trend.
pub fn temperature_at(params: &TrendParams, hour_of_day: f64, hours_elapsed: f64) -> f64 {
    let phase = (hour_of_day - 9.0) / 24.0 * std::f64::consts::TAU;
    params.base_temperature
        + params.daily_amplitude * phase.sin()
        + params.temperature_trend_per_hour * hours_elapsed
}

pub fn time_bucket_at(start_hour: u32, hours_elapsed: f64) -> TimeOfDay {
    let hour = (start_hour as f64 + hours_elapsed) % 24.0;
    TimeOfDay::from_hour(hour as u32)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_weather_walk_stays_on_ladder() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut weather = Weather::Rain;
        for _ in 0..200 {
            weather = step_weather(&mut rng, weather, WeatherTrend::Stable);
            assert!(WEATHER_LADDER.contains(&weather));
        }
    }

    #[test]
    fn test_deteriorating_bias_worsens_on_average() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut worse = 0;
        for _ in 0..500 {
            let next = step_weather(&mut rng, Weather::Drizzle, WeatherTrend::Deteriorating);
            if next == Weather::Rain {
                worse += 1;
            }
        }
        // Worsen probability 0.45, improve 0.20: worsening must dominate
        assert!(worse > 150, "only {} worsening steps", worse);
    }

    #[test]
    fn test_off_ladder_weather_reenters_at_nearest_severity() {
        // Snow (severity 5) steps from the fog rung, not the ladder top
        assert_eq!(nearest_rung(Weather::Snow), 4);
        // Blizzard and worse step from the thunderstorm rung
        assert_eq!(nearest_rung(Weather::Blizzard), WEATHER_LADDER.len() - 1);
        assert_eq!(nearest_rung(Weather::Tornado), WEATHER_LADDER.len() - 1);

        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let next = step_weather(&mut rng, Weather::Snow, WeatherTrend::Stable);
            assert!(
                matches!(next, Weather::Rain | Weather::Fog | Weather::Hail),
                "snow stepped to {:?}",
                next
            );
        }
        let next = step_weather(&mut rng, Weather::Tornado, WeatherTrend::Improving);
        assert!(WEATHER_LADDER.contains(&next));
    }

    #[test]
    fn test_cyclical_crowd_peaks_at_rush_hour() {
        let at_peak = crowd_at(CrowdTrend::Cyclical, CrowdDensity::Light, 18.0, 0.0);
        let off_peak = crowd_at(CrowdTrend::Cyclical, CrowdDensity::Light, 3.0, 0.0);
        assert_eq!(at_peak, CrowdDensity::Overcrowded);
        assert_eq!(off_peak, CrowdDensity::Light);
    }

    #[test]
    fn test_monotonic_crowd_trends() {
        let later = crowd_at(CrowdTrend::Increasing, CrowdDensity::Light, 12.0, 6.0);
        assert_eq!(later, CrowdDensity::Heavy);
        let fewer = crowd_at(CrowdTrend::Decreasing, CrowdDensity::Heavy, 12.0, 6.0);
        assert_eq!(fewer, CrowdDensity::Light);
    }

    #[test]
    fn test_temperature_warmest_mid_afternoon() {
        let params = TrendParams::default();
        let warm = temperature_at(&params, 15.0, 0.0);
        let cold = temperature_at(&params, 3.0, 0.0);
        assert!(warm > cold);
        assert!((warm - (params.base_temperature + params.daily_amplitude)).abs() < 1e-9);
    }

    #[test]
    fn test_time_bucket_wraps_midnight() {
        assert_eq!(time_bucket_at(22, 4.0), TimeOfDay::LateNight);
        assert_eq!(time_bucket_at(12, 0.0), TimeOfDay::Afternoon);
    }
}
