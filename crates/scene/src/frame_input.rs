use foundation::math::{GeoPoint, ScreenProjector, Vec2};
use telemetry::network::NetworkInfo;
use telemetry::point::TrafficPoint;
use telemetry::prediction::Prediction;
use telemetry::route::Route;

use crate::view_mode::ViewMode;
use crate::viewport::ViewportState;

/// Everything one frame of rendering reads, assembled before the paint so
/// the painter sees a consistent snapshot (pan/zoom never change mid-frame).
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub mode: ViewMode,
    pub width: f64,
    pub height: f64,
    /// Animation clock in seconds; drives pulses, dashes and flow arrows.
    pub time_s: f64,
    pub viewport: ViewportState,
    /// Sanitized, filtered subset for this frame.
    pub points: Vec<TrafficPoint>,
    pub selected_route: Option<Route>,
    pub predictions: Vec<Prediction>,
    pub user_location: Option<GeoPoint>,
    pub network: Option<NetworkInfo>,
}

impl RenderFrame {
    /// A surface with no area cannot be painted; the frame is skipped and
    /// retried on the next tick.
    pub fn is_renderable(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn projector(&self) -> ScreenProjector {
        self.viewport.projector(self.center(), self.user_location)
    }
}
