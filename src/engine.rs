use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    config::AnalysisSettings,
    dataset::{Dataset, MapStatistics},
    intent::{AnalysisKind, AnalysisRequest},
    map::{self, MapDocument},
    risk,
    rng::{RngManager, Stream},
    terrain,
};

/// Runs one request through resolve, generate and classify.
pub struct AnalysisEngine {
    settings: AnalysisSettings,
    rng: RngManager,
}

impl AnalysisEngine {
    pub fn new(settings: AnalysisSettings) -> Self {
        let rng = RngManager::from_optional_seed(settings.seed);
        tracing::debug!(seed = rng.seed(), "analysis engine seeded");
        Self { settings, rng }
    }

    pub fn analyze(&mut self, text: &str) -> Analysis {
        let request = AnalysisRequest::parse(text);
        let place = request.place;
        let grid = terrain::generate(
            place.latitude,
            place.longitude,
            self.rng.stream(Stream::Terrain),
        );

        let dataset = match request.kind {
            AnalysisKind::Flood => Dataset::Flood(risk::analyze_flood_risk(
                &grid,
                self.settings.rainfall_factor,
            )),
            AnalysisKind::Fire => Dataset::Fire(risk::analyze_fire_danger(
                &grid,
                self.settings.temperature_factor,
                self.rng.stream(Stream::Fire),
            )),
            AnalysisKind::Elevation | AnalysisKind::Population | AnalysisKind::Agricultural => {
                Dataset::Elevation(grid)
            }
        };

        tracing::info!(
            kind = %request.kind,
            place = place.name,
            points = dataset.point_count(),
            "analysis generated"
        );
        if !request.kind.has_generator() {
            tracing::warn!(kind = %request.kind, "no generator for kind, serving elevation");
        }

        Analysis {
            request,
            dataset,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub request: AnalysisRequest,
    pub dataset: Dataset,
    pub created_at: DateTime<Utc>,
}

impl Analysis {
    pub fn center(&self) -> (f64, f64) {
        (self.request.place.latitude, self.request.place.longitude)
    }

    pub fn map(&self) -> MapDocument {
        let (lat, lon) = self.center();
        map::render(&self.dataset, lat, lon)
    }

    pub fn statistics(&self) -> MapStatistics {
        self.dataset.statistics()
    }

    /// The assistant's chat reply for this analysis.
    pub fn reply(&self) -> String {
        let place = self.request.place.name;
        let kind = self.request.kind;
        if kind.has_generator() {
            format!(
                "Perfect! I'll create a {kind} analysis map for {place}. \
                 Let me process the satellite data and generate your custom map."
            )
        } else {
            format!(
                "I don't have a {kind} data layer yet, so here is an elevation \
                 analysis map for {place} instead."
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> AnalysisEngine {
        AnalysisEngine::new(AnalysisSettings {
            seed: Some(seed),
            ..AnalysisSettings::default()
        })
    }

    #[test]
    fn flood_request_yields_flood_dataset() {
        let mut engine = seeded(1);
        let analysis = engine.analyze("Show me flood risk areas in Kerala with rainfall data");
        assert!(matches!(analysis.dataset, Dataset::Flood(_)));
        assert_eq!(analysis.center(), (10.8505, 76.2711));
        assert!(analysis.reply().contains("flood analysis map for Kerala"));
    }

    #[test]
    fn population_is_flagged_and_served_as_elevation() {
        let mut engine = seeded(2);
        let analysis = engine.analyze("Map population density in Mumbai city");
        assert_eq!(analysis.request.kind, AnalysisKind::Population);
        assert!(matches!(analysis.dataset, Dataset::Elevation(_)));
        assert!(analysis.reply().contains("don't have a population data layer"));
        assert_eq!(analysis.map().legend.title, "Elevation Analysis");
    }

    #[test]
    fn fire_noise_does_not_disturb_terrain() {
        let mut a = seeded(5);
        let mut b = seeded(5);
        let _ = a.analyze("fire in california");
        let _ = b.analyze("elevation in california");
        let next_a = a.analyze("elevation near delhi");
        let next_b = b.analyze("elevation near delhi");
        let (Dataset::Elevation(pa), Dataset::Elevation(pb)) = (&next_a.dataset, &next_b.dataset)
        else {
            panic!("expected elevation datasets");
        };
        assert_eq!(pa, pb);
    }
}
