use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadType {
    Highway,
    Arterial,
    Local,
    Residential,
}

impl RoadType {
    pub const ALL: [RoadType; 4] = [
        RoadType::Highway,
        RoadType::Arterial,
        RoadType::Local,
        RoadType::Residential,
    ];

    /// Congestion multiplier applied by the synthetic contract before
    /// clamping: highways congest hardest, residential streets least.
    pub fn congestion_bias(self) -> f64 {
        match self {
            RoadType::Highway => 1.2,
            RoadType::Arterial => 1.0,
            RoadType::Local => 0.8,
            RoadType::Residential => 0.5,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentKind {
    #[default]
    None,
    Accident,
    Construction,
    Weather,
    Event,
}

impl IncidentKind {
    pub fn is_active(self) -> bool {
        self != IncidentKind::None
    }
}

/// One traffic observation. Produced upstream, immutable once here; the
/// engine only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficPoint {
    pub id: u64,
    pub lat: f64,
    pub lng: f64,
    /// Normalized traffic density: 0 = free flow, 1 = standstill.
    pub congestion: f64,
    /// km/h.
    pub speed: f64,
    pub timestamp_ms: u64,
    pub road_type: RoadType,
    #[serde(default)]
    pub incident: IncidentKind,
    /// Vehicles per hour.
    pub volume: u32,
    /// Sensor confidence, 0–1.
    pub quality: f64,
    pub emissions: f64,
    pub noise_level: f64,
}

impl TrafficPoint {
    pub fn geo(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// A record whose numeric fields are not all finite would project to NaN
    /// screen coordinates and silently corrupt the frame.
    pub fn is_well_formed(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && self.congestion.is_finite()
            && self.speed.is_finite()
            && self.quality.is_finite()
            && self.emissions.is_finite()
            && self.noise_level.is_finite()
    }
}

/// Drops malformed records, preserving the order of the rest. Runs once per
/// ingest, before any projection work.
pub fn sanitize(points: &[TrafficPoint]) -> Vec<TrafficPoint> {
    points
        .iter()
        .filter(|p| p.is_well_formed())
        .cloned()
        .collect()
}

#[cfg(test)]
pub(crate) fn test_point(id: u64, congestion: f64) -> TrafficPoint {
    TrafficPoint {
        id,
        lat: 40.71 + id as f64 * 1e-3,
        lng: -74.00 - id as f64 * 1e-3,
        congestion,
        speed: 80.0 - congestion * 60.0,
        timestamp_ms: 1_700_000_000_000,
        road_type: RoadType::Arterial,
        incident: IncidentKind::None,
        volume: 500,
        quality: 0.9,
        emissions: 40.0,
        noise_level: 55.0,
    }
}

#[cfg(test)]
mod tests {
    use super::{IncidentKind, RoadType, sanitize, test_point};

    #[test]
    fn serde_round_trip_uses_camel_case() {
        let p = test_point(7, 0.4);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"roadType\":\"arterial\""));
        assert!(json.contains("\"noiseLevel\""));
        let back: super::TrafficPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn incident_defaults_to_none_when_absent() {
        let json = r#"{
            "id": 1, "lat": 40.0, "lng": -74.0, "congestion": 0.2,
            "speed": 55.0, "timestampMs": 0, "roadType": "highway",
            "volume": 100, "quality": 1.0, "emissions": 0.0, "noiseLevel": 40.0
        }"#;
        let p: super::TrafficPoint = serde_json::from_str(json).unwrap();
        assert_eq!(p.incident, IncidentKind::None);
        assert!(!p.incident.is_active());
    }

    #[test]
    fn sanitize_drops_non_finite_and_keeps_order() {
        let mut bad = test_point(1, 0.5);
        bad.lat = f64::NAN;
        let mut also_bad = test_point(3, 0.5);
        also_bad.speed = f64::INFINITY;

        let input = vec![test_point(0, 0.1), bad, test_point(2, 0.9), also_bad];
        let clean = sanitize(&input);
        let ids: Vec<_> = clean.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 2]);
    }

    #[test]
    fn highway_congests_more_than_residential() {
        assert!(RoadType::Highway.congestion_bias() > RoadType::Residential.congestion_bias());
    }
}
