//! Scoring Types
//!
//! Core types for risk assessment. No logic here - only data structures.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Discrete risk categories derived from the continuous risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        }
    }

    /// Ordinal position on the LOW..CRITICAL ladder, used for accuracy
    /// distance in the learner.
    pub fn ordinal(&self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
            RiskLevel::Critical => 3,
        }
    }

    /// Binary "incident predicted" view used when grading outcomes.
    pub fn predicts_incident(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// FACTORS
// ============================================================================

/// The six environmental factors every assessment is built from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Weather,
    Time,
    Crowd,
    Visibility,
    Temperature,
    Location,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::Weather,
        Factor::Time,
        Factor::Crowd,
        Factor::Visibility,
        Factor::Temperature,
        Factor::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Weather => "weather",
            Factor::Time => "time",
            Factor::Crowd => "crowd",
            Factor::Visibility => "visibility",
            Factor::Temperature => "temperature",
            Factor::Location => "location",
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CATEGORICAL VALUES
// ============================================================================

/// Weather condition, ordered roughly by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weather {
    Clear,
    Cloudy,
    Drizzle,
    Rain,
    Snow,
    Fog,
    Hail,
    Thunderstorm,
    Blizzard,
    Hurricane,
    Tornado,
}

impl Weather {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Clear => "clear",
            Weather::Cloudy => "cloudy",
            Weather::Drizzle => "drizzle",
            Weather::Rain => "rain",
            Weather::Snow => "snow",
            Weather::Fog => "fog",
            Weather::Hail => "hail",
            Weather::Thunderstorm => "thunderstorm",
            Weather::Blizzard => "blizzard",
            Weather::Hurricane => "hurricane",
            Weather::Tornado => "tornado",
        }
    }
}

/// Time-of-day bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
    Night,
    LateNight,
}

impl TimeOfDay {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::EarlyMorning => "early_morning",
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
            TimeOfDay::LateNight => "late_night",
        }
    }

    /// Bucket for an hour on the 24h clock.
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            5..=7 => TimeOfDay::EarlyMorning,
            8..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            21..=23 => TimeOfDay::Night,
            _ => TimeOfDay::LateNight, // 0..=4
        }
    }
}

/// Crowd density label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrowdDensity {
    Empty,
    Light,
    Moderate,
    Heavy,
    Overcrowded,
}

impl CrowdDensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrowdDensity::Empty => "empty",
            CrowdDensity::Light => "light",
            CrowdDensity::Moderate => "moderate",
            CrowdDensity::Heavy => "heavy",
            CrowdDensity::Overcrowded => "overcrowded",
        }
    }
}

/// Location descriptor, reduced to a coarse kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Home,
    Residential,
    Commercial,
    Park,
    TransitHub,
    Industrial,
    NightlifeDistrict,
    Remote,
    Unknown,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Home => "home",
            LocationKind::Residential => "residential",
            LocationKind::Commercial => "commercial",
            LocationKind::Park => "park",
            LocationKind::TransitHub => "transit_hub",
            LocationKind::Industrial => "industrial",
            LocationKind::NightlifeDistrict => "nightlife_district",
            LocationKind::Remote => "remote",
            LocationKind::Unknown => "unknown",
        }
    }
}

/// Visibility: a continuous fraction when the sensor provides one, a label
/// otherwise. Unknown falls back to the neutral default in the tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Visibility {
    /// Fraction in [0, 1]; higher means clearer.
    Fraction(f64),
    Label(VisibilityLabel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityLabel {
    Excellent,
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

impl VisibilityLabel {
    /// Equivalent fraction for a label.
    pub fn as_fraction(&self) -> f64 {
        match self {
            VisibilityLabel::Excellent => 0.9,
            VisibilityLabel::Good => 0.75,
            VisibilityLabel::Moderate => 0.5,
            VisibilityLabel::Poor => 0.3,
            VisibilityLabel::VeryPoor => 0.1,
        }
    }
}

impl Visibility {
    pub fn as_fraction(&self) -> f64 {
        match self {
            Visibility::Fraction(v) => v.clamp(0.0, 1.0),
            Visibility::Label(label) => label.as_fraction(),
        }
    }
}

// ============================================================================
// CONDITION VECTOR
// ============================================================================

/// Canonical snapshot of the environment at a point in time.
///
/// Every field resolves to a score through the scoring tables; unknown or
/// missing values fall back to neutral defaults, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionVector {
    pub weather: Weather,
    pub time_of_day: TimeOfDay,
    pub crowd_density: CrowdDensity,
    pub visibility: Visibility,
    /// Degrees Celsius; None when no reading is available.
    pub temperature: Option<f64>,
    pub location: LocationKind,
}

impl Default for ConditionVector {
    fn default() -> Self {
        Self {
            weather: Weather::Clear,
            time_of_day: TimeOfDay::Morning,
            crowd_density: CrowdDensity::Light,
            visibility: Visibility::Fraction(0.8),
            temperature: None,
            location: LocationKind::Unknown,
        }
    }
}

// ============================================================================
// FACTOR SCORE
// ============================================================================

/// Severity for one factor plus the weight applied to it.
/// Immutable once computed for a given conditions + weights pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    /// Raw severity on the 0-10 scale.
    pub score: f64,
    /// Weight in effect when this assessment was produced.
    pub weight: f64,
}

impl FactorScore {
    pub fn weighted(&self) -> f64 {
        self.score * self.weight
    }
}

// ============================================================================
// RISK ASSESSMENT
// ============================================================================

/// Aggregate scoring result. Created fresh every cycle, never mutated -
/// superseded by the next cycle's assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub factor_scores: BTreeMap<Factor, FactorScore>,
    /// Confidence in [0, 1], derived from recent learner accuracy.
    pub confidence: f64,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl RiskAssessment {
    pub fn factor_score(&self, factor: Factor) -> f64 {
        self.factor_scores.get(&factor).map_or(0.0, |fs| fs.score)
    }
}
