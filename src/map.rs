//! Map documents: a base map, overlay layers and a legend.
//!
//! A [`MapDocument`] is plain data. The dashboard script draws it with
//! Leaflet, and [`MapDocument::to_html`] wraps it into a standalone page for
//! downloads and the `analyze` command.

use anyhow::Result;
use serde::Serialize;

use crate::{
    dataset::Dataset,
    risk::{MarkerColor, RiskPoint},
};

pub const DEFAULT_ZOOM: u8 = 12;
pub const HEAT_RADIUS: u32 = 15;
pub const HEAT_BLUR: u32 = 25;
pub const ELEVATION_MARKER_RADIUS: u32 = 3;
pub const RISK_MARKER_RADIUS: u32 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct MapDocument {
    pub title: String,
    pub center: [f64; 2],
    pub zoom: u8,
    pub layers: Vec<Layer>,
    pub legend: Legend,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Heat {
        /// `[lat, lon, weight]` triples.
        points: Vec<[f64; 3]>,
        radius: u32,
        blur: u32,
    },
    Markers { markers: Vec<CircleMarker> },
}

impl Layer {
    pub fn markers(&self) -> &[CircleMarker] {
        match self {
            Layer::Markers { markers } => markers,
            Layer::Heat { .. } => &[],
        }
    }

    pub fn heat_points(&self) -> &[[f64; 3]] {
        match self {
            Layer::Heat { points, .. } => points,
            Layer::Markers { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CircleMarker {
    pub location: [f64; 2],
    pub radius: u32,
    pub color: MarkerColor,
    pub fill: bool,
    pub weight: u32,
    pub popup: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub color: MarkerColor,
    pub label: &'static str,
}

impl Legend {
    fn for_dataset(dataset: &Dataset) -> Self {
        let mut entries = Vec::with_capacity(4);
        if matches!(dataset, Dataset::Fire(_)) {
            entries.push(LegendEntry {
                color: MarkerColor::DarkRed,
                label: "Extreme Risk",
            });
        }
        entries.extend([
            LegendEntry {
                color: MarkerColor::Red,
                label: "High Risk",
            },
            LegendEntry {
                color: MarkerColor::Orange,
                label: "Medium Risk",
            },
            LegendEntry {
                color: MarkerColor::Green,
                label: "Low Risk",
            },
        ]);
        Self {
            title: format!("{} Analysis", dataset.title()),
            entries,
        }
    }
}

/// Build the map for `dataset` centered on `(center_lat, center_lon)`.
pub fn render(dataset: &Dataset, center_lat: f64, center_lon: f64) -> MapDocument {
    let layers = match dataset {
        Dataset::Elevation(points) => {
            let heat = Layer::Heat {
                points: points
                    .iter()
                    .map(|p| [p.latitude, p.longitude, p.elevation])
                    .collect(),
                radius: HEAT_RADIUS,
                blur: HEAT_BLUR,
            };
            let markers = points
                .iter()
                .map(|p| CircleMarker {
                    location: [p.latitude, p.longitude],
                    radius: ELEVATION_MARKER_RADIUS,
                    color: MarkerColor::Blue,
                    fill: true,
                    weight: 1,
                    popup: format!("Elevation: {:.1}m", p.elevation),
                })
                .collect();
            vec![heat, Layer::Markers { markers }]
        }
        Dataset::Flood(points) => vec![risk_markers(points, "Risk")],
        Dataset::Fire(points) => vec![risk_markers(points, "Danger")],
    };

    MapDocument {
        title: format!("{} Analysis", dataset.title()),
        center: [center_lat, center_lon],
        zoom: DEFAULT_ZOOM,
        layers,
        legend: Legend::for_dataset(dataset),
    }
}

fn risk_markers(points: &[RiskPoint], label: &str) -> Layer {
    let markers = points
        .iter()
        .map(|p| CircleMarker {
            location: [p.latitude, p.longitude],
            radius: RISK_MARKER_RADIUS,
            color: p.color,
            fill: true,
            weight: 2,
            popup: format!("{label}: {}<br>Score: {:.2}", p.risk_level, p.risk_score),
        })
        .collect();
    Layer::Markers { markers }
}

impl MapDocument {
    pub fn markers(&self) -> impl Iterator<Item = &CircleMarker> {
        self.layers.iter().flat_map(Layer::markers)
    }

    pub fn heat_points(&self) -> impl Iterator<Item = &[f64; 3]> {
        self.layers.iter().flat_map(Layer::heat_points)
    }

    /// Standalone Leaflet page embedding this document.
    pub fn to_html(&self) -> Result<String> {
        let json = serde_json::to_string(self)?.replace("</", "<\\/");
        Ok(MAP_PAGE_TEMPLATE
            .replace("{{TITLE}}", &html_escape(&self.title))
            .replace("{{DOCUMENT}}", &json))
    }
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const MAP_PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<script src="https://unpkg.com/leaflet.heat@0.2.0/dist/leaflet-heat.js"></script>
<style>
  html, body, #map { height: 100%; margin: 0; }
  .legend { position: fixed; bottom: 50px; right: 50px; width: 150px; background: white;
            border: 2px solid grey; z-index: 9999; font-size: 14px; padding: 10px; }
  .legend h4 { margin: 0 0 6px 0; }
  .legend p { margin: 2px 0; }
  .dot { display: inline-block; width: 10px; height: 10px; border-radius: 50%; margin-right: 6px; }
</style>
</head>
<body>
<div id="map"></div>
<script>
const doc = {{DOCUMENT}};
const map = L.map('map').setView(doc.center, doc.zoom);
L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
  attribution: '&copy; OpenStreetMap contributors'
}).addTo(map);
for (const layer of doc.layers) {
  if (layer.type === 'heat') {
    L.heatLayer(layer.points, { radius: layer.radius, blur: layer.blur }).addTo(map);
  } else {
    for (const m of layer.markers) {
      L.circleMarker(m.location, { radius: m.radius, color: m.color, fill: m.fill, weight: m.weight })
        .bindPopup(m.popup).addTo(map);
    }
  }
}
const legend = document.createElement('div');
legend.className = 'legend';
const heading = document.createElement('h4');
heading.textContent = doc.legend.title;
legend.appendChild(heading);
for (const entry of doc.legend.entries) {
  const row = document.createElement('p');
  const dot = document.createElement('span');
  dot.className = 'dot';
  dot.style.background = entry.color;
  row.appendChild(dot);
  row.appendChild(document.createTextNode(entry.label));
  legend.appendChild(row);
}
document.body.appendChild(legend);
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::RiskLevel;
    use crate::terrain::GridPoint;

    fn flood_point(score: f64) -> RiskPoint {
        RiskPoint {
            latitude: 10.0,
            longitude: 76.0,
            risk_score: score,
            risk_level: RiskLevel::High,
            color: MarkerColor::Red,
        }
    }

    #[test]
    fn flood_popup_uses_two_decimals() {
        let doc = render(&Dataset::Flood(vec![flood_point(0.8765)]), 10.0, 76.0);
        let marker = doc.markers().next().unwrap();
        assert_eq!(marker.popup, "Risk: High<br>Score: 0.88");
        assert_eq!(marker.radius, RISK_MARKER_RADIUS);
        assert_eq!(doc.legend.title, "Flood Analysis");
        assert_eq!(doc.legend.entries.len(), 3);
    }

    #[test]
    fn fire_legend_has_four_tiers() {
        let doc = render(&Dataset::Fire(vec![flood_point(0.9)]), 0.0, 0.0);
        assert_eq!(doc.legend.entries.len(), 4);
        assert_eq!(doc.legend.entries[0].color, MarkerColor::DarkRed);
        assert!(doc.markers().next().unwrap().popup.starts_with("Danger: "));
    }

    #[test]
    fn elevation_gets_heat_and_markers() {
        let points = vec![GridPoint {
            latitude: 1.0,
            longitude: 2.0,
            elevation: 123.456,
        }];
        let doc = render(&Dataset::Elevation(points), 1.0, 2.0);
        assert_eq!(doc.layers.len(), 2);
        assert_eq!(doc.heat_points().count(), 1);
        assert_eq!(doc.markers().next().unwrap().popup, "Elevation: 123.5m");
        assert_eq!(doc.zoom, 12);
    }

    #[test]
    fn html_page_embeds_the_document() {
        let doc = render(&Dataset::Flood(vec![flood_point(0.5)]), 10.0, 76.0);
        let html = doc.to_html().unwrap();
        assert!(html.contains("<title>Flood Analysis</title>"));
        assert!(html.contains("\"legend\""));
        assert!(html.contains("Score: 0.50"));
        assert!(!html.contains("{{DOCUMENT}}"));
    }
}
