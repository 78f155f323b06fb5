//! Explicit synthetic-data contract.
//!
//! The upstream "analytics" and "prediction" producers are fabrications, so
//! this module pins down exactly what they fabricate instead of scattering
//! random draws through the codebase:
//!
//! - Identical [`SyntheticConfig`] values produce identical records.
//! - Points scatter uniformly within ±`spread_deg` of `center`.
//! - Congestion is a base draw in [0, 0.6) scaled by the road type's bias,
//!   plus up to 0.4 noise, clamped to [0, 1].
//! - Speed falls as congestion rises: 80 − congestion·60 km/h with up to
//!   20 km/h of jitter, floored at 10.
//! - Roughly one point in ten carries an incident.
//! - Hourly predictions follow a daily curve with morning and evening
//!   peaks; confidence decays with the forecast horizon.
//! - Route candidates trade distance against congestion exposure; the
//!   cheapest candidate per kind wins.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use foundation::math::GeoPoint;

use crate::point::{IncidentKind, RoadType, TrafficPoint};
use crate::prediction::Prediction;
use crate::route::{Route, RouteKind, Waypoint};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub point_count: usize,
    pub center_lat: f64,
    pub center_lng: f64,
    /// Half-width of the uniform scatter around the center, in degrees.
    pub spread_deg: f64,
    /// Wall-clock anchor for timestamps, injected so generation stays
    /// replayable.
    pub now_ms: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 0x7ea1,
            point_count: 150,
            center_lat: 40.7128,
            center_lng: -74.0060,
            spread_deg: 0.05,
            now_ms: 1_700_000_000_000,
        }
    }
}

impl SyntheticConfig {
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center_lat, self.center_lng)
    }
}

const INCIDENT_KINDS: [IncidentKind; 4] = [
    IncidentKind::Accident,
    IncidentKind::Construction,
    IncidentKind::Weather,
    IncidentKind::Event,
];

pub fn traffic_points(config: &SyntheticConfig) -> Vec<TrafficPoint> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    (0..config.point_count)
        .map(|i| {
            let lat = config.center_lat + rng.gen_range(-config.spread_deg..=config.spread_deg);
            let lng = config.center_lng + rng.gen_range(-config.spread_deg..=config.spread_deg);
            let road_type = RoadType::ALL[rng.gen_range(0..RoadType::ALL.len())];
            let congestion = (rng.gen_range(0.0..0.6) * road_type.congestion_bias()
                + rng.gen_range(0.0..0.4))
            .min(1.0);
            let speed = (80.0 - congestion * 60.0 + rng.gen_range(0.0..20.0)).max(10.0);
            let incident = if rng.gen_bool(0.1) {
                INCIDENT_KINDS[rng.gen_range(0..INCIDENT_KINDS.len())]
            } else {
                IncidentKind::None
            };

            TrafficPoint {
                id: i as u64,
                lat,
                lng,
                congestion,
                speed,
                timestamp_ms: config.now_ms.saturating_sub(rng.gen_range(0..3_600_000)),
                road_type,
                incident,
                volume: rng.gen_range(200..1700),
                quality: rng.gen_range(0.7..1.0),
                emissions: congestion * rng.gen_range(0.0..100.0),
                noise_level: 40.0 + congestion * rng.gen_range(0.0..80.0),
            }
        })
        .collect()
}

/// Forecast for one hour offset. Hash-indexed rather than drawn from a
/// sequential stream, so a horizon can be produced item-by-item in any
/// chunking without changing the values.
pub fn prediction_at(config: &SyntheticConfig, hour_offset: u32) -> Prediction {
    let hour_of_day = ((config.now_ms / 3_600_000 + hour_offset as u64) % 24) as u32;
    let base = match hour_of_day {
        7..=9 => 0.72,
        16..=19 => 0.78,
        0..=5 => 0.15,
        _ => 0.40,
    };
    let noise = 0.15 * unit_hash(config.seed, 0xf0_7e_ca_57, hour_offset as u64);
    Prediction {
        hour_offset,
        predicted_congestion: (base + noise).clamp(0.0, 1.0),
        confidence: (0.95 - 0.03 * hour_offset as f64).max(0.3),
    }
}

pub fn predictions(config: &SyntheticConfig, horizon_hours: u32) -> Vec<Prediction> {
    (0..horizon_hours)
        .map(|hour| prediction_at(config, hour))
        .collect()
}

/// One seeded route candidate. `slot` distinguishes candidates of the same
/// kind; the search keeps whichever scores best for its kind.
pub fn route_candidate(config: &SyntheticConfig, kind: RouteKind, slot: u32) -> Route {
    let kind_index: u64 = match kind {
        RouteKind::Fastest => 0,
        RouteKind::Eco => 1,
        RouteKind::Scenic => 2,
    };
    let mut rng =
        ChaCha8Rng::seed_from_u64(config.seed ^ (kind_index << 32) ^ (slot as u64 + 1));

    let waypoint_count = rng.gen_range(4..=8);
    let heading = rng.gen_range(0.0..std::f64::consts::TAU);
    let reach_deg = config.spread_deg * rng.gen_range(0.6..1.4);

    let waypoints: Vec<Waypoint> = (0..waypoint_count)
        .map(|i| {
            let t = i as f64 / (waypoint_count - 1) as f64;
            let wobble = config.spread_deg * 0.1;
            Waypoint {
                lat: config.center_lat
                    + heading.sin() * reach_deg * t
                    + rng.gen_range(-wobble..=wobble),
                lng: config.center_lng
                    + heading.cos() * reach_deg * t
                    + rng.gen_range(-wobble..=wobble),
                local_congestion: rng.gen_range(0.0..1.0),
            }
        })
        .collect();

    let distance_km = polyline_km(&waypoints);
    let avg_congestion =
        waypoints.iter().map(|w| w.local_congestion).sum::<f64>() / waypoints.len() as f64;
    let avg_speed_kmh = 50.0 * (1.0 - 0.5 * avg_congestion);
    let duration_min = distance_km / avg_speed_kmh * 60.0;

    let base_reliability = match kind {
        RouteKind::Fastest => 0.92,
        RouteKind::Eco => 0.85,
        RouteKind::Scenic => 0.78,
    };

    Route {
        id: (kind_index << 8) | slot as u64,
        name: route_name(kind),
        kind,
        waypoints,
        distance_km,
        duration_min,
        reliability: (base_reliability - 0.1 * avg_congestion).clamp(0.0, 1.0),
    }
}

/// Score a candidate for its kind; lower is better.
pub fn route_cost(route: &Route) -> f64 {
    let avg_congestion = if route.waypoints.is_empty() {
        0.0
    } else {
        route.waypoints.iter().map(|w| w.local_congestion).sum::<f64>()
            / route.waypoints.len() as f64
    };
    match route.kind {
        RouteKind::Fastest => route.duration_min,
        RouteKind::Eco => route.distance_km * (1.0 + avg_congestion),
        // Scenic prefers long, quiet detours.
        RouteKind::Scenic => avg_congestion * 10.0 - route.distance_km,
    }
}

fn route_name(kind: RouteKind) -> String {
    match kind {
        RouteKind::Fastest => "Express corridor",
        RouteKind::Eco => "Low-emission corridor",
        RouteKind::Scenic => "Riverside loop",
    }
    .to_string()
}

fn polyline_km(waypoints: &[Waypoint]) -> f64 {
    const KM_PER_DEGREE: f64 = 111.0;
    waypoints
        .windows(2)
        .map(|pair| {
            let dlat = pair[1].lat - pair[0].lat;
            let dlng = pair[1].lng - pair[0].lng;
            (dlat * dlat + dlng * dlng).sqrt() * KM_PER_DEGREE
        })
        .sum()
}

/// SplitMix64-style unit draw in [0, 1), indexed by (seed, stream, k).
fn unit_hash(seed: u64, stream: u64, k: u64) -> f64 {
    let mut z = seed
        .wrapping_add(stream.wrapping_mul(0x9e37_79b9_7f4a_7c15))
        .wrapping_add(k.wrapping_mul(0xbf58_476d_1ce4_e5b9));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64
}
