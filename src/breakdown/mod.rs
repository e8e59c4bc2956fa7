//! Breakdown Analyzer
//!
//! Decomposes a risk score into percentage contributions per factor for
//! explainability, ranks them, and flags static amplifying interactions.
//! Pure function of (assessment); idempotent, and stable under any
//! permutation of factor insertion order because ranking is re-derived
//! from the percentages.
//!
//! ## Structure
//! - `types`: contribution, tier and interaction types

pub mod types;

use crate::scoring::types::{Factor, RiskAssessment};

pub use types::{FactorContribution, ImpactTier, InteractionFlag, RiskBreakdown};

// ============================================================================
// INTERACTION RULES (static, not learned)
// ============================================================================

struct InteractionRule {
    name: &'static str,
    factors: (Factor, Factor),
    thresholds: (f64, f64),
    multiplier: f64,
    description: &'static str,
}

const INTERACTION_RULES: [InteractionRule; 3] = [
    InteractionRule {
        name: "weather_visibility",
        factors: (Factor::Weather, Factor::Visibility),
        thresholds: (3.0, 2.0),
        multiplier: 1.3,
        description: "Bad weather compounds low visibility",
    },
    InteractionRule {
        name: "crowd_night",
        factors: (Factor::Crowd, Factor::Time),
        thresholds: (3.0, 4.0),
        multiplier: 1.2,
        description: "Dense crowds are harder to read late at night",
    },
    InteractionRule {
        name: "exposure",
        factors: (Factor::Weather, Factor::Temperature),
        thresholds: (3.0, 3.0),
        multiplier: 1.2,
        description: "Severe weather and temperature extremes compound exposure",
    },
];

// ============================================================================
// ANALYZER
// ============================================================================

/// Decompose an assessment into ranked per-factor contributions.
pub fn analyze(assessment: &RiskAssessment) -> RiskBreakdown {
    let weighted_total: f64 = assessment
        .factor_scores
        .values()
        .map(|fs| fs.weighted())
        .sum();

    let mut contributions: Vec<FactorContribution> = assessment
        .factor_scores
        .iter()
        .map(|(factor, fs)| {
            let weighted = fs.weighted();
            let percentage = if weighted_total > 0.0 {
                weighted / weighted_total * 100.0
            } else {
                0.0
            };
            FactorContribution {
                factor: *factor,
                score: fs.score,
                weight: fs.weight,
                weighted,
                percentage,
                tier: ImpactTier::from_percentage(percentage),
                rank: 0, // assigned after sorting
            }
        })
        .collect();

    // Rank by percentage descending; factor name breaks ties so the order
    // never depends on insertion order.
    contributions.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.factor.as_str().cmp(b.factor.as_str()))
    });
    for (i, c) in contributions.iter_mut().enumerate() {
        c.rank = i + 1;
    }

    let interactions = detect_interactions(assessment);

    RiskBreakdown {
        contributions,
        interactions,
        weighted_total,
    }
}

fn detect_interactions(assessment: &RiskAssessment) -> Vec<InteractionFlag> {
    INTERACTION_RULES
        .iter()
        .filter(|rule| {
            assessment.factor_score(rule.factors.0) > rule.thresholds.0
                && assessment.factor_score(rule.factors.1) > rule.thresholds.1
        })
        .map(|rule| InteractionFlag {
            name: rule.name.to_string(),
            factors: rule.factors,
            multiplier: rule.multiplier,
            description: rule.description.to_string(),
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================
