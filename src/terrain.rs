//! Synthetic elevation field around a center point.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::Serialize;

/// Samples per axis.
pub const GRID_SIZE: usize = 50;
/// Total samples per field.
pub const GRID_POINTS: usize = GRID_SIZE * GRID_SIZE;
/// Half the side of the sampled box, in degrees.
pub const HALF_SPAN_DEG: f64 = 0.1;
/// Standard deviation of the elevation noise, in meters.
pub const ELEVATION_NOISE_STD_DEV: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// `count` evenly spaced values from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Noise-free elevation for grid cell `(row, col)`.
pub fn base_elevation(row: usize, col: usize) -> f64 {
    100.0 + 50.0 * (row as f64 / 10.0).sin() + 30.0 * (col as f64 / 8.0).cos()
}

/// Generate the 50×50 field around `(center_lat, center_lon)` in
/// latitude-major order.
pub fn generate<R: Rng + ?Sized>(center_lat: f64, center_lon: f64, rng: &mut R) -> Vec<GridPoint> {
    let lats = linspace(center_lat - HALF_SPAN_DEG, center_lat + HALF_SPAN_DEG, GRID_SIZE);
    let lons = linspace(center_lon - HALF_SPAN_DEG, center_lon + HALF_SPAN_DEG, GRID_SIZE);

    let mut points = Vec::with_capacity(GRID_POINTS);
    for (row, &latitude) in lats.iter().enumerate() {
        for (col, &longitude) in lons.iter().enumerate() {
            let noise: f64 = StandardNormal.sample(rng);
            let elevation = (base_elevation(row, col) + noise * ELEVATION_NOISE_STD_DEV).max(0.0);
            points.push(GridPoint {
                latitude,
                longitude,
                elevation,
            });
        }
    }
    points
}
