//! Scoring Tables & Weights
//!
//! Severity mappings for every categorical value, plus the WeightSet the
//! learner adapts. No scoring logic here - only data and its invariants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOW_TO_MEDIUM, DEFAULT_MEDIUM_TO_HIGH, SEVERITY_SCALE, THRESHOLD_MAX, THRESHOLD_MIN,
    WEIGHT_MAX, WEIGHT_MIN,
};
use super::types::{CrowdDensity, Factor, LocationKind, TimeOfDay, Visibility, Weather};

// ============================================================================
// SEVERITY TABLES (0.0 - 10.0)
// ============================================================================

pub fn weather_severity(weather: Weather) -> f64 {
    match weather {
        Weather::Clear => 1.0,
        Weather::Cloudy => 2.0,
        Weather::Drizzle => 3.0,
        Weather::Rain => 4.0,
        Weather::Snow => 5.0,
        Weather::Fog => 5.0,
        Weather::Hail => 6.0,
        Weather::Thunderstorm => 7.0,
        Weather::Blizzard => 8.0,
        Weather::Hurricane => 10.0,
        Weather::Tornado => 10.0,
    }
}

pub fn time_severity(time: TimeOfDay) -> f64 {
    match time {
        TimeOfDay::Afternoon => 1.0,
        TimeOfDay::Morning => 2.0,
        TimeOfDay::EarlyMorning => 3.0,
        TimeOfDay::Evening => 3.0,
        TimeOfDay::Night => 5.0,
        TimeOfDay::LateNight => 7.0,
    }
}

pub fn crowd_severity(crowd: CrowdDensity) -> f64 {
    match crowd {
        CrowdDensity::Light => 1.0,
        CrowdDensity::Moderate => 2.0,
        // Empty streets carry their own risk: no witnesses, no help nearby.
        CrowdDensity::Empty => 3.0,
        CrowdDensity::Heavy => 4.0,
        CrowdDensity::Overcrowded => 6.0,
    }
}

/// Higher visibility means lower risk, so the fraction is inverted.
pub fn visibility_severity(visibility: Visibility) -> f64 {
    (1.0 - visibility.as_fraction()) * SEVERITY_SCALE
}

/// Severity by Celsius band; comfortable range scores lowest.
pub fn temperature_severity(celsius: Option<f64>) -> f64 {
    let Some(t) = celsius else {
        return 1.0; // no reading: neutral
    };
    if t < -10.0 {
        6.0
    } else if t < 0.0 {
        4.0
    } else if t < 10.0 {
        2.0
    } else if t < 30.0 {
        1.0
    } else if t < 35.0 {
        3.0
    } else if t < 40.0 {
        5.0
    } else {
        7.0
    }
}

pub fn location_severity(location: LocationKind) -> f64 {
    match location {
        LocationKind::Home => 1.0,
        LocationKind::Residential => 2.0,
        LocationKind::Unknown => 2.0, // neutral
        LocationKind::Commercial => 3.0,
        LocationKind::Park => 3.0,
        LocationKind::TransitHub => 3.0,
        LocationKind::Industrial => 4.0,
        LocationKind::NightlifeDistrict => 5.0,
        LocationKind::Remote => 5.0,
    }
}

// ============================================================================
// WEIGHT SET
// ============================================================================

/// Per-factor weights plus the two adaptive risk-level thresholds.
///
/// Invariants, restored by [`WeightSet::clamp_and_normalize`] after every
/// adjustment: weights sum to 1.0, each weight in [0.05, 0.5], thresholds
/// in [1.0, 6.0].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    pub weights: BTreeMap<Factor, f64>,
    pub low_to_medium: f64,
    pub medium_to_high: f64,
}

impl Default for WeightSet {
    fn default() -> Self {
        let weights = BTreeMap::from([
            (Factor::Weather, 0.25),
            (Factor::Time, 0.15),
            (Factor::Crowd, 0.20),
            (Factor::Visibility, 0.15),
            (Factor::Temperature, 0.10),
            (Factor::Location, 0.15),
        ]);
        Self {
            weights,
            low_to_medium: DEFAULT_LOW_TO_MEDIUM,
            medium_to_high: DEFAULT_MEDIUM_TO_HIGH,
        }
    }
}

impl WeightSet {
    /// Missing factors read as 0 so the scorer degrades instead of failing.
    pub fn weight(&self, factor: Factor) -> f64 {
        self.weights.get(&factor).copied().unwrap_or(0.0)
    }

    pub fn weight_sum(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Re-establish the invariants: clamp each weight into bounds, then
    /// renormalize to sum 1.0, then clamp both thresholds into bounds.
    pub fn clamp_and_normalize(&mut self) {
        for w in self.weights.values_mut() {
            *w = w.clamp(WEIGHT_MIN, WEIGHT_MAX);
        }
        let sum = self.weight_sum();
        if sum > 0.0 {
            for w in self.weights.values_mut() {
                *w /= sum;
            }
        }
        self.low_to_medium = self.low_to_medium.clamp(THRESHOLD_MIN, THRESHOLD_MAX);
        self.medium_to_high = self.medium_to_high.clamp(THRESHOLD_MIN, THRESHOLD_MAX);
        // Keep the band ordered even if adaptation pushed them together.
        if self.medium_to_high < self.low_to_medium {
            self.medium_to_high = self.low_to_medium;
        }
    }

    /// Nudge thresholds by `delta` (positive = fewer HIGH predictions),
    /// staying inside bounds.
    pub fn shift_thresholds(&mut self, delta: f64) {
        self.low_to_medium = (self.low_to_medium + delta).clamp(THRESHOLD_MIN, THRESHOLD_MAX);
        self.medium_to_high = (self.medium_to_high + delta).clamp(THRESHOLD_MIN, THRESHOLD_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_one() {
        let ws = WeightSet::default();
        assert!((ws.weight_sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_weather_severity_is_ordered() {
        let ordered = [
            Weather::Clear,
            Weather::Cloudy,
            Weather::Drizzle,
            Weather::Rain,
            Weather::Fog,
            Weather::Hail,
            Weather::Thunderstorm,
            Weather::Blizzard,
            Weather::Tornado,
        ];
        for pair in ordered.windows(2) {
            assert!(
                weather_severity(pair[0]) <= weather_severity(pair[1]),
                "{:?} should not outrank {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_visibility_inversion() {
        assert!((visibility_severity(Visibility::Fraction(0.9)) - 1.0).abs() < 1e-9);
        assert!((visibility_severity(Visibility::Fraction(0.2)) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_bands() {
        assert_eq!(temperature_severity(Some(20.0)), 1.0);
        assert_eq!(temperature_severity(Some(-15.0)), 6.0);
        assert_eq!(temperature_severity(Some(42.0)), 7.0);
        assert_eq!(temperature_severity(None), 1.0);
    }

    #[test]
    fn test_clamp_and_normalize_restores_invariants() {
        let mut ws = WeightSet::default();
        ws.weights.insert(Factor::Weather, 0.9);
        ws.weights.insert(Factor::Time, 0.01);
        ws.low_to_medium = 0.2;
        ws.medium_to_high = 9.0;
        ws.clamp_and_normalize();

        assert!((ws.weight_sum() - 1.0).abs() < 1e-9);
        assert!(ws.low_to_medium >= THRESHOLD_MIN);
        assert!(ws.medium_to_high <= THRESHOLD_MAX);
        assert!(ws.low_to_medium <= ws.medium_to_high);
    }

    #[test]
    fn test_shift_thresholds_bounded() {
        let mut ws = WeightSet::default();
        ws.shift_thresholds(10.0);
        assert_eq!(ws.low_to_medium, THRESHOLD_MAX);
        assert_eq!(ws.medium_to_high, THRESHOLD_MAX);
        ws.shift_thresholds(-10.0);
        assert_eq!(ws.low_to_medium, THRESHOLD_MIN);
        assert_eq!(ws.medium_to_high, THRESHOLD_MIN);
    }
}
