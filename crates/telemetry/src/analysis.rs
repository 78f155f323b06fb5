//! Synthetic analysis producers, expressed as chunked tasks.
//!
//! The dashboard used to duplicate the "process a slice, bump a progress
//! bar, publish a result" control flow in every producer. Each producer is
//! now a [`ChunkedTask`] run by `runtime::idle::IdleScheduler`, so the only
//! thing defined here is the work itself.

use serde::Serialize;

use runtime::idle::ChunkedTask;

use crate::point::TrafficPoint;
use crate::prediction::Prediction;
use crate::route::{Route, RouteKind};
use crate::synthetic::{self, SyntheticConfig};

/// A high-congestion cluster worth calling out on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotspot {
    pub lat: f64,
    pub lng: f64,
    pub severity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSummary {
    pub total_points: usize,
    pub avg_congestion: f64,
    pub avg_speed: f64,
    pub total_volume: u64,
    pub incident_count: usize,
    /// Up to five worst offenders (congestion > 0.7), most severe first.
    pub hotspots: Vec<Hotspot>,
}

/// Aggregates a point set a bounded slice at a time.
pub struct SummaryTask {
    points: Vec<TrafficPoint>,
    cursor: usize,
    congestion_sum: f64,
    speed_sum: f64,
    volume_sum: u64,
    incident_count: usize,
    hot: Vec<Hotspot>,
}

const HOTSPOT_THRESHOLD: f64 = 0.7;
const HOTSPOT_LIMIT: usize = 5;

impl SummaryTask {
    pub fn new(points: Vec<TrafficPoint>) -> Self {
        Self {
            points,
            cursor: 0,
            congestion_sum: 0.0,
            speed_sum: 0.0,
            volume_sum: 0,
            incident_count: 0,
            hot: Vec::new(),
        }
    }
}

impl ChunkedTask for SummaryTask {
    type Output = TrafficSummary;

    fn total_items(&self) -> usize {
        self.points.len()
    }

    fn process(&mut self, max_items: usize) -> usize {
        let end = (self.cursor + max_items).min(self.points.len());
        for point in &self.points[self.cursor..end] {
            self.congestion_sum += point.congestion;
            self.speed_sum += point.speed;
            self.volume_sum += u64::from(point.volume);
            if point.incident.is_active() {
                self.incident_count += 1;
            }
            if point.congestion > HOTSPOT_THRESHOLD {
                self.hot.push(Hotspot {
                    lat: point.lat,
                    lng: point.lng,
                    severity: point.congestion,
                });
            }
        }
        let processed = end - self.cursor;
        self.cursor = end;
        processed
    }

    fn finish(mut self) -> TrafficSummary {
        let n = self.points.len();
        self.hot
            .sort_by(|a, b| b.severity.total_cmp(&a.severity));
        self.hot.truncate(HOTSPOT_LIMIT);

        let (avg_congestion, avg_speed) = if n == 0 {
            (0.0, 0.0)
        } else {
            (self.congestion_sum / n as f64, self.speed_sum / n as f64)
        };

        TrafficSummary {
            total_points: n,
            avg_congestion,
            avg_speed,
            total_volume: self.volume_sum,
            incident_count: self.incident_count,
            hotspots: self.hot,
        }
    }
}

/// Produces the hourly forecast horizon one hour per item.
pub struct ForecastTask {
    config: SyntheticConfig,
    horizon_hours: u32,
    out: Vec<Prediction>,
}

impl ForecastTask {
    pub fn new(config: SyntheticConfig, horizon_hours: u32) -> Self {
        Self {
            config,
            horizon_hours,
            out: Vec::new(),
        }
    }
}

impl ChunkedTask for ForecastTask {
    type Output = Vec<Prediction>;

    fn total_items(&self) -> usize {
        self.horizon_hours as usize
    }

    fn process(&mut self, max_items: usize) -> usize {
        let start = self.out.len() as u32;
        let end = (start as usize)
            .saturating_add(max_items)
            .min(self.horizon_hours as usize) as u32;
        for hour in start..end {
            self.out.push(synthetic::prediction_at(&self.config, hour));
        }
        (end - start) as usize
    }

    fn finish(self) -> Vec<Prediction> {
        self.out
    }
}

/// Evaluates seeded route candidates, one per item, keeping the cheapest
/// per kind. Yields the winners ordered fastest, eco, scenic.
pub struct RouteSearchTask {
    config: SyntheticConfig,
    slots_per_kind: u32,
    cursor: u32,
    best: Vec<Option<(f64, Route)>>,
}

impl RouteSearchTask {
    pub fn new(config: SyntheticConfig, slots_per_kind: u32) -> Self {
        Self {
            config,
            slots_per_kind,
            cursor: 0,
            best: vec![None; RouteKind::ALL.len()],
        }
    }
}

impl ChunkedTask for RouteSearchTask {
    type Output = Vec<Route>;

    fn total_items(&self) -> usize {
        RouteKind::ALL.len() * self.slots_per_kind as usize
    }

    fn process(&mut self, max_items: usize) -> usize {
        let total = self.total_items() as u32;
        let step = max_items.min(total as usize) as u32;
        let end = self.cursor.saturating_add(step).min(total);
        let start = self.cursor;
        for item in start..end {
            let kind_index = (item / self.slots_per_kind) as usize;
            let slot = item % self.slots_per_kind;
            let kind = RouteKind::ALL[kind_index];
            let candidate = synthetic::route_candidate(&self.config, kind, slot);
            let cost = synthetic::route_cost(&candidate);
            let keep = match &self.best[kind_index] {
                None => true,
                Some((best_cost, _)) => cost < *best_cost,
            };
            if keep {
                self.best[kind_index] = Some((cost, candidate));
            }
        }
        self.cursor = end;
        (end - start) as usize
    }

    fn finish(self) -> Vec<Route> {
        self.best
            .into_iter()
            .flatten()
            .map(|(_, route)| route)
            .collect()
    }
}
