//! Breakdown Types

use serde::{Deserialize, Serialize};

use crate::scoring::types::Factor;

// ============================================================================
// IMPACT TIERS
// ============================================================================

/// How much of the total risk a single factor carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ImpactTier {
    Critical,
    High,
    Medium,
    Low,
    Minimal,
}

impl ImpactTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactTier::Critical => "CRITICAL",
            ImpactTier::High => "HIGH",
            ImpactTier::Medium => "MEDIUM",
            ImpactTier::Low => "LOW",
            ImpactTier::Minimal => "MINIMAL",
        }
    }

    /// Tier for a percentage-of-total contribution.
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 40.0 {
            ImpactTier::Critical
        } else if pct >= 25.0 {
            ImpactTier::High
        } else if pct >= 15.0 {
            ImpactTier::Medium
        } else if pct >= 5.0 {
            ImpactTier::Low
        } else {
            ImpactTier::Minimal
        }
    }
}

impl std::fmt::Display for ImpactTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CONTRIBUTIONS
// ============================================================================

/// One factor's share of the weighted total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorContribution {
    pub factor: Factor,
    /// Raw severity (0-10).
    pub score: f64,
    /// Weight in effect for this assessment.
    pub weight: f64,
    /// score * weight.
    pub weighted: f64,
    /// Share of the weighted total, 0-100.
    pub percentage: f64,
    pub tier: ImpactTier,
    /// 1 = largest contributor.
    pub rank: usize,
}

/// A fixed pairwise amplifying interaction that fired
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionFlag {
    pub name: String,
    pub factors: (Factor, Factor),
    pub multiplier: f64,
    pub description: String,
}

/// Full decomposition of one assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskBreakdown {
    /// Ranked descending by percentage.
    pub contributions: Vec<FactorContribution>,
    pub interactions: Vec<InteractionFlag>,
    pub weighted_total: f64,
}

impl RiskBreakdown {
    /// The single largest contributor, if any factor contributed at all.
    pub fn dominant(&self) -> Option<&FactorContribution> {
        self.contributions.first()
    }
}
