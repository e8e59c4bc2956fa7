//! Keyword Tables
//!
//! Ordered (pattern, category) tables per field. Matching is
//! case-insensitive substring search, first match wins, so specific
//! patterns ("tornado", "late night") must come before generic ones
//! ("rain", "night"). The order here IS the priority list.

use once_cell::sync::Lazy;

use crate::scoring::types::{
    CrowdDensity, LocationKind, TimeOfDay, VisibilityLabel, Weather,
};

pub static WEATHER_KEYWORDS: Lazy<Vec<(&'static str, Weather)>> = Lazy::new(|| {
    vec![
        ("tornado", Weather::Tornado),
        ("hurricane", Weather::Hurricane),
        ("cyclone", Weather::Hurricane),
        ("blizzard", Weather::Blizzard),
        ("thunderstorm", Weather::Thunderstorm),
        ("thunder", Weather::Thunderstorm),
        ("lightning", Weather::Thunderstorm),
        ("storm", Weather::Thunderstorm),
        ("hail", Weather::Hail),
        ("snow", Weather::Snow),
        ("fog", Weather::Fog),
        ("mist", Weather::Fog),
        ("haze", Weather::Fog),
        ("drizzle", Weather::Drizzle),
        ("shower", Weather::Rain),
        ("rain", Weather::Rain),
        ("overcast", Weather::Cloudy),
        ("cloud", Weather::Cloudy),
        ("sunny", Weather::Clear),
        ("clear", Weather::Clear),
    ]
});

pub static TIME_KEYWORDS: Lazy<Vec<(&'static str, TimeOfDay)>> = Lazy::new(|| {
    vec![
        ("late night", TimeOfDay::LateNight),
        ("late_night", TimeOfDay::LateNight),
        ("midnight", TimeOfDay::LateNight),
        ("early morning", TimeOfDay::EarlyMorning),
        ("early_morning", TimeOfDay::EarlyMorning),
        ("dawn", TimeOfDay::EarlyMorning),
        ("morning", TimeOfDay::Morning),
        ("noon", TimeOfDay::Afternoon),
        ("afternoon", TimeOfDay::Afternoon),
        ("dusk", TimeOfDay::Evening),
        ("evening", TimeOfDay::Evening),
        ("night", TimeOfDay::Night),
    ]
});

pub static CROWD_KEYWORDS: Lazy<Vec<(&'static str, CrowdDensity)>> = Lazy::new(|| {
    vec![
        ("overcrowded", CrowdDensity::Overcrowded),
        ("packed", CrowdDensity::Overcrowded),
        ("jammed", CrowdDensity::Overcrowded),
        ("crowded", CrowdDensity::Heavy),
        ("heavy", CrowdDensity::Heavy),
        ("busy", CrowdDensity::Heavy),
        ("moderate", CrowdDensity::Moderate),
        ("light", CrowdDensity::Light),
        ("quiet", CrowdDensity::Light),
        ("sparse", CrowdDensity::Light),
        ("empty", CrowdDensity::Empty),
        ("deserted", CrowdDensity::Empty),
    ]
});

pub static VISIBILITY_KEYWORDS: Lazy<Vec<(&'static str, VisibilityLabel)>> = Lazy::new(|| {
    vec![
        ("very poor", VisibilityLabel::VeryPoor),
        ("very_poor", VisibilityLabel::VeryPoor),
        ("excellent", VisibilityLabel::Excellent),
        ("poor", VisibilityLabel::Poor),
        ("moderate", VisibilityLabel::Moderate),
        ("good", VisibilityLabel::Good),
    ]
});

pub static LOCATION_KEYWORDS: Lazy<Vec<(&'static str, LocationKind)>> = Lazy::new(|| {
    vec![
        ("nightlife", LocationKind::NightlifeDistrict),
        ("bar district", LocationKind::NightlifeDistrict),
        ("club", LocationKind::NightlifeDistrict),
        ("transit", LocationKind::TransitHub),
        ("station", LocationKind::TransitHub),
        ("terminal", LocationKind::TransitHub),
        ("airport", LocationKind::TransitHub),
        ("industrial", LocationKind::Industrial),
        ("warehouse", LocationKind::Industrial),
        ("downtown", LocationKind::Commercial),
        ("commercial", LocationKind::Commercial),
        ("shopping", LocationKind::Commercial),
        ("mall", LocationKind::Commercial),
        ("market", LocationKind::Commercial),
        ("park", LocationKind::Park),
        ("trail", LocationKind::Park),
        ("remote", LocationKind::Remote),
        ("isolated", LocationKind::Remote),
        ("rural", LocationKind::Remote),
        ("residential", LocationKind::Residential),
        ("suburb", LocationKind::Residential),
        ("neighborhood", LocationKind::Residential),
        ("home", LocationKind::Home),
        ("house", LocationKind::Home),
        ("apartment", LocationKind::Home),
    ]
});

/// First-match-wins lookup over an ordered keyword table.
pub fn match_keyword<T: Copy>(text: &str, table: &[(&str, T)]) -> Option<T> {
    let lower = text.to_lowercase();
    table
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, value)| *value)
}
