//! Flood and fire risk classification over an elevation field.
//!
//! Both classifiers map one [`GridPoint`] to one [`RiskPoint`] and keep the
//! input order. Thresholds are strict lower bounds, so every score in
//! `[0, 1]` lands in exactly one level.

use std::fmt;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::Serialize;

use crate::terrain::GridPoint;

pub const DEFAULT_RAINFALL_FACTOR: f64 = 1.2;
pub const DEFAULT_TEMPERATURE_FACTOR: f64 = 1.1;
/// Elevation at which flood risk reaches zero, in meters.
pub const FLOOD_ZERO_ELEVATION: f64 = 200.0;
/// Elevation that maps to a fire base score of 1 before the temperature factor.
pub const FIRE_FULL_ELEVATION: f64 = 300.0;
pub const FIRE_NOISE_STD_DEV: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Circle marker and legend colors, serialized as CSS color names. Risk
/// levels use the warm tiers; elevation samples are drawn in blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Green,
    Orange,
    Red,
    DarkRed,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub color: MarkerColor,
}

pub fn flood_score(elevation: f64, rainfall_factor: f64) -> f64 {
    let base = (1.0 - elevation / FLOOD_ZERO_ELEVATION).max(0.0);
    (base * rainfall_factor).min(1.0)
}

pub fn flood_level(score: f64) -> (RiskLevel, MarkerColor) {
    if score > 0.7 {
        (RiskLevel::High, MarkerColor::Red)
    } else if score > 0.4 {
        (RiskLevel::Medium, MarkerColor::Orange)
    } else {
        (RiskLevel::Low, MarkerColor::Green)
    }
}

/// Fire score for one elevation given an already drawn noise term.
pub fn fire_score(elevation: f64, temperature_factor: f64, noise: f64) -> f64 {
    let base = (elevation / FIRE_FULL_ELEVATION) * temperature_factor;
    (base + noise).clamp(0.0, 1.0)
}

pub fn fire_level(score: f64) -> (RiskLevel, MarkerColor) {
    if score > 0.7 {
        (RiskLevel::Extreme, MarkerColor::DarkRed)
    } else if score > 0.5 {
        (RiskLevel::High, MarkerColor::Red)
    } else if score > 0.3 {
        (RiskLevel::Moderate, MarkerColor::Orange)
    } else {
        (RiskLevel::Low, MarkerColor::Green)
    }
}

fn risk_point(point: &GridPoint, score: f64, (level, color): (RiskLevel, MarkerColor)) -> RiskPoint {
    RiskPoint {
        latitude: point.latitude,
        longitude: point.longitude,
        risk_score: score,
        risk_level: level,
        color,
    }
}

/// Lower ground floods first.
pub fn analyze_flood_risk(grid: &[GridPoint], rainfall_factor: f64) -> Vec<RiskPoint> {
    grid.iter()
        .map(|point| {
            let score = flood_score(point.elevation, rainfall_factor);
            risk_point(point, score, flood_level(score))
        })
        .collect()
}

/// Higher ground burns hotter, jittered by N(0, 0.1).
pub fn analyze_fire_danger<R: Rng + ?Sized>(
    grid: &[GridPoint],
    temperature_factor: f64,
    rng: &mut R,
) -> Vec<RiskPoint> {
    grid.iter()
        .map(|point| {
            let jitter: f64 = StandardNormal.sample(rng);
            let score = fire_score(
                point.elevation,
                temperature_factor,
                jitter * FIRE_NOISE_STD_DEV,
            );
            risk_point(point, score, fire_level(score))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_thresholds_are_strict() {
        assert_eq!(flood_level(0.7).0, RiskLevel::Medium);
        assert_eq!(flood_level(0.4).0, RiskLevel::Low);
        assert_eq!(flood_level(0.71).1, MarkerColor::Red);
    }

    #[test]
    fn fire_thresholds_are_strict() {
        assert_eq!(fire_level(0.7).0, RiskLevel::High);
        assert_eq!(fire_level(0.5).0, RiskLevel::Moderate);
        assert_eq!(fire_level(0.3).0, RiskLevel::Low);
        assert_eq!(fire_level(1.0).1, MarkerColor::DarkRed);
    }

    #[test]
    fn flood_score_is_clamped() {
        assert_eq!(flood_score(0.0, 5.0), 1.0);
        assert_eq!(flood_score(1_000.0, 5.0), 0.0);
    }

    #[test]
    fn fire_noise_cannot_escape_unit_range() {
        assert_eq!(fire_score(0.0, 1.0, -0.5), 0.0);
        assert_eq!(fire_score(300.0, 1.0, 0.5), 1.0);
    }

    #[test]
    fn colors_serialize_as_css_names() {
        let json = serde_json::to_string(&MarkerColor::DarkRed).unwrap();
        assert_eq!(json, "\"darkred\"");
        let json = serde_json::to_string(&MarkerColor::Blue).unwrap();
        assert_eq!(json, "\"blue\"");
    }
}
