use serde::{Deserialize, Serialize};

use crate::point::{RoadType, TrafficPoint};

/// Congestion bands as the dashboard's filter panel exposes them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CongestionBand {
    #[default]
    All,
    /// congestion ≤ 0.3
    Low,
    /// 0.3 < congestion ≤ 0.7
    Medium,
    /// congestion > 0.7
    High,
}

impl CongestionBand {
    pub fn admits(self, congestion: f64) -> bool {
        match self {
            CongestionBand::All => true,
            CongestionBand::Low => congestion <= 0.3,
            CongestionBand::Medium => congestion > 0.3 && congestion <= 0.7,
            CongestionBand::High => congestion > 0.7,
        }
    }
}

/// User filter criteria for the frame-local subset. Applying a filter never
/// mutates the source records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    /// `None` admits every road type.
    pub road_type: Option<RoadType>,
    pub congestion: CongestionBand,
    /// Inclusive km/h bounds; `None` admits every speed.
    pub speed_range: Option<(f64, f64)>,
    pub show_incidents: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            road_type: None,
            congestion: CongestionBand::All,
            speed_range: None,
            show_incidents: true,
        }
    }
}

impl FilterCriteria {
    pub fn admits(&self, point: &TrafficPoint) -> bool {
        if let Some(road_type) = self.road_type
            && point.road_type != road_type
        {
            return false;
        }
        if !self.congestion.admits(point.congestion) {
            return false;
        }
        if let Some((min_kmh, max_kmh)) = self.speed_range
            && (point.speed < min_kmh || point.speed > max_kmh)
        {
            return false;
        }
        if !self.show_incidents && point.incident.is_active() {
            return false;
        }
        true
    }

    /// The frame-local subset, relative order preserved.
    pub fn apply(&self, points: &[TrafficPoint]) -> Vec<TrafficPoint> {
        points
            .iter()
            .filter(|p| self.admits(p))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{CongestionBand, FilterCriteria};
    use crate::point::{IncidentKind, RoadType, test_point};

    #[test]
    fn road_type_filter_keeps_only_highways_in_order() {
        let mut points = vec![
            test_point(0, 0.2),
            test_point(1, 0.4),
            test_point(2, 0.6),
            test_point(3, 0.8),
        ];
        points[0].road_type = RoadType::Highway;
        points[1].road_type = RoadType::Local;
        points[3].road_type = RoadType::Highway;

        let criteria = FilterCriteria {
            road_type: Some(RoadType::Highway),
            ..FilterCriteria::default()
        };
        let kept = criteria.apply(&points);
        let ids: Vec<_> = kept.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 3]);
        assert!(kept.iter().all(|p| p.road_type == RoadType::Highway));
    }

    #[test]
    fn congestion_bands_partition_the_unit_interval() {
        for (band, inside, outside) in [
            (CongestionBand::Low, 0.3, 0.31),
            (CongestionBand::Medium, 0.7, 0.3),
            (CongestionBand::High, 0.71, 0.7),
        ] {
            assert!(band.admits(inside), "{band:?} should admit {inside}");
            assert!(!band.admits(outside), "{band:?} should reject {outside}");
        }
        assert!(CongestionBand::All.admits(0.0));
        assert!(CongestionBand::All.admits(1.0));
    }

    #[test]
    fn speed_range_bounds_are_inclusive() {
        let criteria = FilterCriteria {
            speed_range: Some((30.0, 60.0)),
            ..FilterCriteria::default()
        };
        let mut slow = test_point(0, 0.5);
        slow.speed = 29.9;
        let mut edge = test_point(1, 0.5);
        edge.speed = 30.0;

        assert!(!criteria.admits(&slow));
        assert!(criteria.admits(&edge));
    }

    #[test]
    fn hiding_incidents_drops_active_ones_only() {
        let criteria = FilterCriteria {
            show_incidents: false,
            ..FilterCriteria::default()
        };
        let clear = test_point(0, 0.5);
        let mut blocked = test_point(1, 0.5);
        blocked.incident = IncidentKind::Accident;

        assert!(criteria.admits(&clear));
        assert!(!criteria.admits(&blocked));
    }

    #[test]
    fn default_criteria_admit_everything() {
        let p = test_point(0, 0.99);
        assert!(FilterCriteria::default().admits(&p));
    }
}
