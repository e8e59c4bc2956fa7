//! Normalizer
//!
//! Converts loosely-typed upstream input (free text, weather snapshots,
//! place counts) into the canonical ConditionVector. Unknown categorical
//! values degrade to neutral defaults; the only hard failure is missing
//! required context (location, weather, time), which is the caller's
//! problem to fix.
//!
//! ## Structure
//! - `keywords`: ordered first-match-wins pattern tables per field

pub mod keywords;

use serde_json::Value;

use crate::error::{EngineError, EngineResult};
use crate::scoring::types::{
    ConditionVector, CrowdDensity, LocationKind, TimeOfDay, Visibility, Weather,
};
use keywords::{
    match_keyword, CROWD_KEYWORDS, LOCATION_KEYWORDS, TIME_KEYWORDS, VISIBILITY_KEYWORDS,
    WEATHER_KEYWORDS,
};

// ============================================================================
// MAIN ENTRY
// ============================================================================

/// Normalize a raw JSON snapshot into a ConditionVector.
///
/// Expected top-level fields: `weather` (string or snapshot object),
/// `location` (string or object), and a time context (`time`, `hour` or
/// `timestamp`). `crowd`, `visibility` and `temperature` are optional.
/// Missing required fields fail with a validation error; everything else
/// falls back to field defaults.
pub fn normalize(raw: &Value) -> EngineResult<ConditionVector> {
    let obj = raw
        .as_object()
        .ok_or_else(|| EngineError::validation("input must be a JSON object"))?;

    let weather_value = obj
        .get("weather")
        .ok_or_else(|| EngineError::validation("missing required field: weather"))?;
    let location_value = obj
        .get("location")
        .ok_or_else(|| EngineError::validation("missing required field: location"))?;
    let time_value = obj
        .get("time")
        .or_else(|| obj.get("hour"))
        .or_else(|| obj.get("timestamp"))
        .ok_or_else(|| EngineError::validation("missing required field: time/hour/timestamp"))?;

    let weather = parse_weather(weather_value);
    let time_of_day = parse_time(time_value);
    let location = parse_location(location_value);

    // Optional fields, with snapshot-object fallbacks for weather data
    let crowd_density = obj
        .get("crowd")
        .or_else(|| obj.get("crowd_density"))
        .map(parse_crowd)
        .unwrap_or(CrowdDensity::Light);

    let visibility = obj
        .get("visibility")
        .or_else(|| weather_value.get("visibility"))
        .and_then(parse_visibility)
        .unwrap_or(Visibility::Fraction(0.8));

    let temperature = obj
        .get("temperature")
        .or_else(|| weather_value.get("temperature"))
        .and_then(Value::as_f64);

    Ok(ConditionVector {
        weather,
        time_of_day,
        crowd_density,
        visibility,
        temperature,
        location,
    })
}

// ============================================================================
// PER-FIELD PARSERS
// ============================================================================

fn parse_weather(value: &Value) -> Weather {
    let text = match value {
        Value::String(s) => s.as_str(),
        // Weather snapshot object: { "condition": "...", ... }
        Value::Object(map) => map
            .get("condition")
            .and_then(Value::as_str)
            .unwrap_or_default(),
        _ => "",
    };
    match_keyword(text, &WEATHER_KEYWORDS).unwrap_or_else(|| {
        if !text.is_empty() {
            log::debug!("unknown weather '{}', defaulting to clear", text);
        }
        Weather::Clear
    })
}

fn parse_time(value: &Value) -> TimeOfDay {
    match value {
        Value::String(s) => match_keyword(s, &TIME_KEYWORDS).unwrap_or(TimeOfDay::Morning),
        Value::Number(_) => {
            let n = value.as_f64().unwrap_or(0.0);
            if n >= 0.0 && n < 24.0 {
                TimeOfDay::from_hour(n as u32)
            } else {
                // Epoch timestamp (seconds or millis): reduce to hour-of-day
                let secs = if n > 1e12 { n / 1000.0 } else { n };
                TimeOfDay::from_hour(((secs / 3600.0) % 24.0) as u32)
            }
        }
        _ => TimeOfDay::Morning,
    }
}

fn parse_crowd(value: &Value) -> CrowdDensity {
    match value {
        Value::String(s) => match_keyword(s, &CROWD_KEYWORDS).unwrap_or(CrowdDensity::Light),
        // Place snapshot: nearby place count
        Value::Number(_) => {
            let count = value.as_f64().unwrap_or(0.0);
            if count <= 0.0 {
                CrowdDensity::Empty
            } else if count < 5.0 {
                CrowdDensity::Light
            } else if count < 15.0 {
                CrowdDensity::Moderate
            } else if count < 30.0 {
                CrowdDensity::Heavy
            } else {
                CrowdDensity::Overcrowded
            }
        }
        Value::Object(map) => map
            .get("density")
            .or_else(|| map.get("nearby_count"))
            .map(parse_crowd)
            .unwrap_or(CrowdDensity::Light),
        _ => CrowdDensity::Light,
    }
}

fn parse_visibility(value: &Value) -> Option<Visibility> {
    match value {
        Value::Number(_) => {
            let v = value.as_f64()?;
            // Meters from a weather API, or a fraction already
            let fraction = if v > 1.0 { (v / 10_000.0).min(1.0) } else { v };
            Some(Visibility::Fraction(fraction.clamp(0.0, 1.0)))
        }
        Value::String(s) => match_keyword(s, &VISIBILITY_KEYWORDS).map(Visibility::Label),
        _ => None,
    }
}

fn parse_location(value: &Value) -> LocationKind {
    let text = match value {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map
            .get("descriptor")
            .or_else(|| map.get("name"))
            .or_else(|| map.get("type"))
            .and_then(Value::as_str)
            .unwrap_or_default(),
        _ => "",
    };
    match_keyword(text, &LOCATION_KEYWORDS).unwrap_or(LocationKind::Unknown)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_free_text_input() {
        let raw = json!({
            "weather": "heavy rain tonight",
            "time": "late night",
            "location": "downtown, near the market",
            "crowd": "packed sidewalks"
        });
        let cv = normalize(&raw).unwrap();
        assert_eq!(cv.weather, Weather::Rain);
        assert_eq!(cv.time_of_day, TimeOfDay::LateNight);
        assert_eq!(cv.location, LocationKind::Commercial);
        assert_eq!(cv.crowd_density, CrowdDensity::Overcrowded);
    }

    #[test]
    fn test_weather_snapshot_object() {
        let raw = json!({
            "weather": { "condition": "Thunderstorm", "temperature": 17.5, "visibility": 2000 },
            "location": "residential street",
            "hour": 22
        });
        let cv = normalize(&raw).unwrap();
        assert_eq!(cv.weather, Weather::Thunderstorm);
        assert_eq!(cv.temperature, Some(17.5));
        assert_eq!(cv.time_of_day, TimeOfDay::Night);
        // 2000 m -> 0.2 fraction
        assert!((cv.visibility.as_fraction() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_missing_required_fields_fail() {
        let err = normalize(&json!({ "weather": "clear", "time": "noon" })).unwrap_err();
        assert!(err.to_string().contains("location"));

        let err = normalize(&json!({ "location": "home", "time": "noon" })).unwrap_err();
        assert!(err.to_string().contains("weather"));

        let err = normalize(&json!({ "weather": "clear", "location": "home" })).unwrap_err();
        assert!(err.to_string().contains("time"));
    }

    #[test]
    fn test_unknown_values_use_defaults_not_errors() {
        let raw = json!({
            "weather": "xyzzy",
            "time": "sometime",
            "location": "??",
        });
        let cv = normalize(&raw).unwrap();
        assert_eq!(cv.weather, Weather::Clear);
        assert_eq!(cv.time_of_day, TimeOfDay::Morning);
        assert_eq!(cv.location, LocationKind::Unknown);
        assert_eq!(cv.crowd_density, CrowdDensity::Light);
    }

    #[test]
    fn test_numeric_crowd_buckets() {
        let make = |count: i64| {
            normalize(&json!({
                "weather": "clear", "time": 12, "location": "park", "crowd": count
            }))
            .unwrap()
            .crowd_density
        };
        assert_eq!(make(0), CrowdDensity::Empty);
        assert_eq!(make(3), CrowdDensity::Light);
        assert_eq!(make(10), CrowdDensity::Moderate);
        assert_eq!(make(20), CrowdDensity::Heavy);
        assert_eq!(make(50), CrowdDensity::Overcrowded);
    }

    #[test]
    fn test_non_object_input_fails() {
        assert!(normalize(&json!("just a string")).is_err());
        assert!(normalize(&json!(42)).is_err());
    }
}
