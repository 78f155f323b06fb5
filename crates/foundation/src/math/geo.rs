/// Geographic position in degrees (latitude/longitude, altitude ignored).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub lat_deg: f64,
    pub lng_deg: f64,
}

impl GeoPoint {
    pub const ORIGIN: GeoPoint = GeoPoint {
        lat_deg: 0.0,
        lng_deg: 0.0,
    };

    pub fn new(lat_deg: f64, lng_deg: f64) -> Self {
        Self { lat_deg, lng_deg }
    }

    /// Non-finite coordinates would poison every projection downstream,
    /// so callers filter on this before projecting.
    pub fn is_finite(self) -> bool {
        self.lat_deg.is_finite() && self.lng_deg.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;

    #[test]
    fn finite_check() {
        assert!(GeoPoint::new(40.7, -74.0).is_finite());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_finite());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_finite());
    }
}
