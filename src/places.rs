//! Keyword location resolver.
//!
//! Free text is matched against a fixed, ordered table of place names. The
//! first entry with a pattern contained in the lowercased text wins, so the
//! order of [`PLACES`] is part of the observable behavior: "navi mumbai"
//! resolves to Mumbai because "mumbai" is tested first, and "prayagraj"
//! resolves to Agra because it contains "agra".

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacePoint {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl PlacePoint {
    const fn new(name: &'static str, latitude: f64, longitude: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
        }
    }
}

/// Geographic center of India, used when nothing in the text matches.
pub const DEFAULT_PLACE: PlacePoint = PlacePoint::new("India", 20.5937, 78.9629);

/// Lowercase patterns paired with the place they select, in priority order.
pub const PLACES: &[(&[&str], PlacePoint)] = &[
    (&["kerala"], PlacePoint::new("Kerala", 10.8505, 76.2711)),
    (&["california"], PlacePoint::new("California", 36.7783, -119.4179)),
    (&["mumbai"], PlacePoint::new("Mumbai", 19.0760, 72.8777)),
    (&["punjab"], PlacePoint::new("Punjab", 31.1471, 75.3412)),
    (&["delhi"], PlacePoint::new("Delhi", 28.7041, 77.1025)),
    (
        &["bangalore", "bengaluru"],
        PlacePoint::new("Bengaluru", 12.9716, 77.5946),
    ),
    (&["chennai"], PlacePoint::new("Chennai", 13.0827, 80.2707)),
    (&["hyderabad"], PlacePoint::new("Hyderabad", 17.3850, 78.4867)),
    (&["kolkata"], PlacePoint::new("Kolkata", 22.5726, 88.3639)),
    (&["ahmedabad"], PlacePoint::new("Ahmedabad", 23.0225, 72.5714)),
    (&["pune"], PlacePoint::new("Pune", 18.5204, 73.8567)),
    (&["jaipur"], PlacePoint::new("Jaipur", 26.9124, 75.7873)),
    (&["lucknow"], PlacePoint::new("Lucknow", 26.8467, 80.9462)),
    (&["kanpur"], PlacePoint::new("Kanpur", 26.4499, 80.3319)),
    (&["nagpur"], PlacePoint::new("Nagpur", 21.1458, 79.0882)),
    (&["indore"], PlacePoint::new("Indore", 22.7196, 75.8577)),
    (&["thane"], PlacePoint::new("Thane", 19.2183, 72.9781)),
    (&["bhopal"], PlacePoint::new("Bhopal", 23.2599, 77.4126)),
    (
        &["visakhapatnam"],
        PlacePoint::new("Visakhapatnam", 17.6868, 83.2185),
    ),
    (&["patna"], PlacePoint::new("Patna", 25.5941, 85.1376)),
    (&["vadodara"], PlacePoint::new("Vadodara", 22.3072, 73.1812)),
    (&["ludhiana"], PlacePoint::new("Ludhiana", 30.9010, 75.8573)),
    (&["rajkot"], PlacePoint::new("Rajkot", 22.3039, 70.8022)),
    (&["agra"], PlacePoint::new("Agra", 27.1767, 78.0081)),
    (&["siliguri"], PlacePoint::new("Siliguri", 26.7271, 88.3953)),
    (&["nashik"], PlacePoint::new("Nashik", 19.9975, 73.7898)),
    (&["faridabad"], PlacePoint::new("Faridabad", 28.4089, 77.3178)),
    (&["meerut"], PlacePoint::new("Meerut", 28.9845, 77.7064)),
    (&["kalyan"], PlacePoint::new("Kalyan", 19.2437, 73.1355)),
    (&["vasai"], PlacePoint::new("Vasai", 19.4912, 72.8054)),
    (&["varanasi"], PlacePoint::new("Varanasi", 25.3176, 82.9739)),
    (&["srinagar"], PlacePoint::new("Srinagar", 34.0837, 74.7973)),
    (&["aurangabad"], PlacePoint::new("Aurangabad", 19.8762, 75.3433)),
    (&["dhanbad"], PlacePoint::new("Dhanbad", 23.7957, 86.4304)),
    (&["amritsar"], PlacePoint::new("Amritsar", 31.6340, 74.8723)),
    (&["navi mumbai"], PlacePoint::new("Navi Mumbai", 19.0330, 73.0297)),
    (
        &["allahabad", "prayagraj"],
        PlacePoint::new("Prayagraj", 25.4358, 81.8463),
    ),
    (&["ranchi"], PlacePoint::new("Ranchi", 23.3441, 85.3096)),
    (&["howrah"], PlacePoint::new("Howrah", 22.5958, 88.2636)),
    (&["coimbatore"], PlacePoint::new("Coimbatore", 11.0168, 76.9558)),
    (&["jabalpur"], PlacePoint::new("Jabalpur", 23.1815, 79.9864)),
    (&["gwalior"], PlacePoint::new("Gwalior", 26.2183, 78.1828)),
    (&["vijayawada"], PlacePoint::new("Vijayawada", 16.5062, 80.6480)),
    (&["jodhpur"], PlacePoint::new("Jodhpur", 26.2389, 73.0243)),
    (&["madurai"], PlacePoint::new("Madurai", 9.9252, 78.1198)),
    (&["raipur"], PlacePoint::new("Raipur", 21.2514, 81.6296)),
    (&["kota"], PlacePoint::new("Kota", 25.2138, 75.8648)),
    (&["chandigarh"], PlacePoint::new("Chandigarh", 30.7333, 76.7794)),
    (&["guwahati"], PlacePoint::new("Guwahati", 26.1445, 91.7362)),
];

/// Resolve free text to a place. Never fails; unmatched text yields
/// [`DEFAULT_PLACE`].
pub fn resolve(text: &str) -> PlacePoint {
    let text = text.to_lowercase();
    PLACES
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|pattern| text.contains(pattern)))
        .map(|(_, place)| *place)
        .unwrap_or(DEFAULT_PLACE)
}
