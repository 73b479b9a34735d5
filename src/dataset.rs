use serde::Serialize;

use crate::{
    risk::{RiskLevel, RiskPoint},
    terrain::GridPoint,
};

/// Area credited to each sample in the statistics panel, in sq km.
pub const AREA_PER_POINT_SQ_KM: f64 = 0.01;
/// Shown as-is in the accuracy card.
pub const REPORTED_ACCURACY_PERCENT: u8 = 96;

/// Whatever the current map displays.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
pub enum Dataset {
    Elevation(Vec<GridPoint>),
    Flood(Vec<RiskPoint>),
    Fire(Vec<RiskPoint>),
}

impl Dataset {
    pub fn point_count(&self) -> usize {
        match self {
            Dataset::Elevation(points) => points.len(),
            Dataset::Flood(points) | Dataset::Fire(points) => points.len(),
        }
    }

    /// Label used in legends: "Elevation", "Flood" or "Fire".
    pub fn title(&self) -> &'static str {
        match self {
            Dataset::Elevation(_) => "Elevation",
            Dataset::Flood(_) => "Flood",
            Dataset::Fire(_) => "Fire",
        }
    }

    pub fn statistics(&self) -> MapStatistics {
        let data_points = self.point_count();
        let mut stats = MapStatistics {
            area_covered_sq_km: data_points as f64 * AREA_PER_POINT_SQ_KM,
            data_points,
            min_elevation: None,
            max_elevation: None,
            high_risk_percent: None,
            accuracy_percent: REPORTED_ACCURACY_PERCENT,
        };
        match self {
            Dataset::Elevation(points) => {
                let (min, max) = elevation_range(points.iter().map(|p| p.elevation));
                stats.min_elevation = min;
                stats.max_elevation = max;
            }
            Dataset::Flood(points) | Dataset::Fire(points) => {
                stats.high_risk_percent = Some(high_risk_percent(points));
            }
        }
        stats
    }
}

/// Contents of the results tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapStatistics {
    pub area_covered_sq_km: f64,
    pub data_points: usize,
    pub min_elevation: Option<f64>,
    pub max_elevation: Option<f64>,
    pub high_risk_percent: Option<f64>,
    pub accuracy_percent: u8,
}

pub fn elevation_range(values: impl IntoIterator<Item = f64>) -> (Option<f64>, Option<f64>) {
    values.into_iter().fold((None, None), |(min, max), value| {
        (
            Some(min.map_or(value, |m: f64| m.min(value))),
            Some(max.map_or(value, |m: f64| m.max(value))),
        )
    })
}

/// Share of points labelled exactly `High`. Fire's `Extreme` tier is not
/// counted.
pub fn high_risk_percent(points: &[RiskPoint]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    let high = points
        .iter()
        .filter(|point| point.risk_level == RiskLevel::High)
        .count();
    high as f64 / points.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::MarkerColor;

    fn risk(level: RiskLevel) -> RiskPoint {
        RiskPoint {
            latitude: 0.0,
            longitude: 0.0,
            risk_score: 0.5,
            risk_level: level,
            color: MarkerColor::Red,
        }
    }

    #[test]
    fn high_share_ignores_extreme() {
        let points = vec![
            risk(RiskLevel::High),
            risk(RiskLevel::Extreme),
            risk(RiskLevel::Low),
            risk(RiskLevel::High),
        ];
        assert_eq!(high_risk_percent(&points), 50.0);
        assert_eq!(high_risk_percent(&[]), 0.0);
    }

    #[test]
    fn elevation_stats_cover_range() {
        let dataset = Dataset::Elevation(vec![
            GridPoint {
                latitude: 1.0,
                longitude: 2.0,
                elevation: 12.5,
            },
            GridPoint {
                latitude: 1.0,
                longitude: 2.1,
                elevation: 3.0,
            },
        ]);
        let stats = dataset.statistics();
        assert_eq!(stats.data_points, 2);
        assert_eq!(stats.min_elevation, Some(3.0));
        assert_eq!(stats.max_elevation, Some(12.5));
        assert_eq!(stats.high_risk_percent, None);
        assert!((stats.area_covered_sq_km - 0.02).abs() < 1e-12);
        assert_eq!(stats.accuracy_percent, 96);
    }

    #[test]
    fn dataset_serializes_with_kind_tag() {
        let json = serde_json::to_value(Dataset::Flood(vec![risk(RiskLevel::Low)])).unwrap();
        assert_eq!(json["kind"], "flood");
        assert_eq!(json["points"][0]["risk_level"], "Low");
    }
}
