use foundation::math::{GeoPoint, ScreenProjector, Vec2};

pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 3.0;

/// Zoom and pan of the drawing surface.
///
/// Invariant: `zoom` is always inside `[ZOOM_MIN, ZOOM_MAX]`; every mutator
/// clamps. `pan` is unconstrained; the user may scroll the content fully
/// off-canvas and back.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportState {
    zoom: f64,
    pub pan: Vec2,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.set_zoom(self.zoom * factor);
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan = self.pan + delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The projector for this view over a surface centered at `center`,
    /// referenced to `origin` (the user location, or (0,0) when unknown).
    pub fn projector(&self, center: Vec2, origin: Option<GeoPoint>) -> ScreenProjector {
        ScreenProjector::new(
            center,
            origin.unwrap_or(GeoPoint::ORIGIN),
            self.zoom,
            self.pan,
        )
    }
}
