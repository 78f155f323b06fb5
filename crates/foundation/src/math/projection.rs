use super::geo::GeoPoint;
use super::vec::Vec2;

/// Pixels per degree at zoom 1.
///
/// Chosen so a metropolitan-scale point cloud (±0.03° ≈ ±3 km around the
/// origin) fills a typical viewport at zoom 1: 0.03° × 8000 = 240 px.
pub const PIXELS_PER_DEGREE: f64 = 8000.0;

/// Linear geo→screen projection under the current view.
///
/// Deliberately not a true map projection: the data is synthetic and locally
/// flat, so a linear approximation around the origin is sufficient. North is
/// up, so screen y decreases as latitude increases.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenProjector {
    /// Canvas center in pixels.
    pub center: Vec2,
    /// Reference origin, typically the user location.
    pub origin: GeoPoint,
    pub zoom: f64,
    pub pan: Vec2,
}

impl ScreenProjector {
    pub fn new(center: Vec2, origin: GeoPoint, zoom: f64, pan: Vec2) -> Self {
        Self {
            center,
            origin,
            zoom,
            pan,
        }
    }

    pub fn project(&self, geo: GeoPoint) -> Vec2 {
        let s = PIXELS_PER_DEGREE * self.zoom;
        Vec2::new(
            self.center.x + (geo.lng_deg - self.origin.lng_deg) * s + self.pan.x,
            self.center.y - (geo.lat_deg - self.origin.lat_deg) * s + self.pan.y,
        )
    }

    /// Algebraic inverse of [`ScreenProjector::project`]; the hook for
    /// hit-testing screen positions back to geographic space.
    pub fn unproject(&self, screen: Vec2) -> GeoPoint {
        let s = PIXELS_PER_DEGREE * self.zoom;
        GeoPoint::new(
            self.origin.lat_deg - (screen.y - self.center.y - self.pan.y) / s,
            self.origin.lng_deg + (screen.x - self.center.x - self.pan.x) / s,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoPoint, ScreenProjector, Vec2};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn origin_projects_to_center_plus_pan() {
        let origin = GeoPoint::new(40.7128, -74.0060);
        for zoom in [0.5, 1.0, 2.7, 3.0] {
            for pan in [Vec2::ZERO, Vec2::new(120.0, -35.5)] {
                let proj = ScreenProjector::new(Vec2::new(400.0, 300.0), origin, zoom, pan);
                let p = proj.project(origin);
                assert_eq!(p, Vec2::new(400.0 + pan.x, 300.0 + pan.y));
            }
        }
    }

    #[test]
    fn north_is_up_east_is_right() {
        let origin = GeoPoint::ORIGIN;
        let proj = ScreenProjector::new(Vec2::new(100.0, 100.0), origin, 1.0, Vec2::ZERO);

        let north = proj.project(GeoPoint::new(0.01, 0.0));
        assert!(north.y < 100.0);
        let east = proj.project(GeoPoint::new(0.0, 0.01));
        assert!(east.x > 100.0);
    }

    #[test]
    fn unproject_inverts_project() {
        let proj = ScreenProjector::new(
            Vec2::new(512.0, 384.0),
            GeoPoint::new(40.7128, -74.0060),
            2.0,
            Vec2::new(-80.0, 42.0),
        );
        let geo = GeoPoint::new(40.7301, -74.0211);
        let rt = proj.unproject(proj.project(geo));
        assert_close(rt.lat_deg, geo.lat_deg, 1e-12);
        assert_close(rt.lng_deg, geo.lng_deg, 1e-12);
    }

    #[test]
    fn zoom_scales_displacement_linearly() {
        let origin = GeoPoint::ORIGIN;
        let center = Vec2::new(0.0, 0.0);
        let at = |zoom: f64| {
            ScreenProjector::new(center, origin, zoom, Vec2::ZERO)
                .project(GeoPoint::new(0.0, 0.01))
                .x
        };
        assert_close(at(2.0), 2.0 * at(1.0), 1e-9);
    }
}
