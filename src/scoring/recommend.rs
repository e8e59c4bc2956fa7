//! Recommendation Rules
//!
//! Deterministic rule table: one general line per risk level, then
//! factor-specific additions whenever that factor's raw score crosses its
//! trigger. Duplicates suppressed, insertion order otherwise preserved.

use std::collections::BTreeMap;

use super::types::{Factor, FactorScore, RiskLevel};

/// Per-factor trigger thresholds (raw 0-10 score)
const WEATHER_TRIGGER: f64 = 5.0;
const TIME_TRIGGER: f64 = 5.0;
const CROWD_TRIGGER: f64 = 3.0;
const VISIBILITY_TRIGGER: f64 = 5.0;
const TEMPERATURE_TRIGGER: f64 = 4.0;
const LOCATION_TRIGGER: f64 = 4.0;

pub fn recommendations(
    risk_level: RiskLevel,
    factor_scores: &BTreeMap<Factor, FactorScore>,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    // Level-general advice first
    out.push(general_advice(risk_level).to_string());

    // Factor-specific additions, in the fixed factor order
    let score = |f: Factor| factor_scores.get(&f).map_or(0.0, |fs| fs.score);

    if score(Factor::Weather) >= WEATHER_TRIGGER {
        out.push("Severe weather: seek shelter indoors and avoid exposed routes".to_string());
    }
    if score(Factor::Time) >= TIME_TRIGGER {
        out.push("Late hours: stay in well-trafficked areas and share your route".to_string());
    }
    if score(Factor::Crowd) >= CROWD_TRIGGER {
        out.push("Avoid overcrowded areas and keep exit routes in sight".to_string());
    }
    if score(Factor::Visibility) >= VISIBILITY_TRIGGER {
        out.push("Low visibility: prefer well-lit routes and move slowly".to_string());
    }
    if score(Factor::Temperature) >= TEMPERATURE_TRIGGER {
        out.push("Temperature extremes: limit time outdoors and dress accordingly".to_string());
    }
    if score(Factor::Location) >= LOCATION_TRIGGER {
        out.push("Unfamiliar or isolated area: stay alert and keep your phone charged".to_string());
    }

    dedup_preserving_order(out)
}

fn general_advice(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Conditions look safe; keep normal awareness",
        RiskLevel::Medium => "Stay aware of your surroundings and check conditions periodically",
        RiskLevel::High => "Elevated risk: avoid unnecessary travel and tell someone where you are",
        RiskLevel::Critical => {
            "Critical conditions: move to safety now and contact emergency services if needed"
        }
    }
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(entries: &[(Factor, f64)]) -> BTreeMap<Factor, FactorScore> {
        entries
            .iter()
            .map(|&(f, s)| (f, FactorScore { score: s, weight: 0.15 }))
            .collect()
    }

    #[test]
    fn test_general_advice_always_first() {
        let out = recommendations(RiskLevel::Low, &scores(&[]));
        assert_eq!(out.len(), 1);
        assert!(out[0].contains("safe"));
    }

    #[test]
    fn test_factor_triggers() {
        let out = recommendations(
            RiskLevel::High,
            &scores(&[(Factor::Weather, 7.0), (Factor::Crowd, 6.0)]),
        );
        assert!(out.iter().any(|r| r.contains("shelter")));
        assert!(out.iter().any(|r| r.contains("exit routes")));
        // Below-trigger factors add nothing
        assert!(!out.iter().any(|r| r.contains("well-lit")));
    }

    #[test]
    fn test_no_duplicates() {
        let out = recommendations(RiskLevel::High, &scores(&[(Factor::Weather, 9.0)]));
        let unique: std::collections::HashSet<_> = out.iter().collect();
        assert_eq!(unique.len(), out.len());
    }
}
