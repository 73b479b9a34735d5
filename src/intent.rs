use std::fmt;

use serde::Serialize;

use crate::places::{self, PlacePoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Elevation,
    Flood,
    Fire,
    Population,
    Agricultural,
}

impl AnalysisKind {
    /// Keyword dispatch, tested in order: flood, fire, population, farming.
    pub fn detect(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("flood") {
            AnalysisKind::Flood
        } else if text.contains("fire") {
            AnalysisKind::Fire
        } else if text.contains("population") {
            AnalysisKind::Population
        } else if text.contains("farm") || text.contains("agricultur") {
            AnalysisKind::Agricultural
        } else {
            AnalysisKind::Elevation
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisKind::Elevation => "elevation",
            AnalysisKind::Flood => "flood",
            AnalysisKind::Fire => "fire",
            AnalysisKind::Population => "population",
            AnalysisKind::Agricultural => "agricultural",
        }
    }

    /// Whether a dedicated generator exists. Kinds without one are served
    /// with elevation data.
    pub fn has_generator(self) -> bool {
        matches!(
            self,
            AnalysisKind::Elevation | AnalysisKind::Flood | AnalysisKind::Fire
        )
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRequest {
    pub raw_text: String,
    pub place: PlacePoint,
    pub kind: AnalysisKind,
}

impl AnalysisRequest {
    pub fn parse(text: &str) -> Self {
        Self {
            raw_text: text.to_string(),
            place: places::resolve(text),
            kind: AnalysisKind::detect(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_takes_priority_over_fire() {
        assert_eq!(
            AnalysisKind::detect("flood and fire outlook"),
            AnalysisKind::Flood
        );
    }

    #[test]
    fn unknown_requests_fall_back_to_elevation() {
        assert_eq!(
            AnalysisKind::detect("Show me elevation data for a sample area"),
            AnalysisKind::Elevation
        );
        assert_eq!(AnalysisKind::detect("hello"), AnalysisKind::Elevation);
    }

    #[test]
    fn farming_requests_are_agricultural() {
        let request = AnalysisRequest::parse("Find best farming areas in Punjab with soil data");
        assert_eq!(request.kind, AnalysisKind::Agricultural);
        assert_eq!(request.place.name, "Punjab");
        assert!(!request.kind.has_generator());
    }
}
