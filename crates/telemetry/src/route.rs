use serde::{Deserialize, Serialize};

use foundation::math::GeoPoint;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    #[default]
    Fastest,
    Eco,
    Scenic,
}

impl RouteKind {
    pub const ALL: [RouteKind; 3] = [RouteKind::Fastest, RouteKind::Eco, RouteKind::Scenic];
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    pub local_congestion: f64,
}

impl Waypoint {
    pub fn geo(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// A candidate route. At most one is selected at a time; the dashboard owns
/// it and the engine treats it as read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: u64,
    pub name: String,
    pub kind: RouteKind,
    pub waypoints: Vec<Waypoint>,
    pub distance_km: f64,
    pub duration_min: f64,
    /// On-time likelihood, 0–1.
    pub reliability: f64,
}

impl Route {
    /// A polyline needs at least two points.
    pub fn is_drawable(&self) -> bool {
        self.waypoints.len() >= 2
    }
}
