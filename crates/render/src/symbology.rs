//! Color and sizing rules for the traffic layers.

use telemetry::point::IncidentKind;
use telemetry::prefs::Theme;

use crate::command::Color;

/// Speed at which the ring around a point closes into a full turn.
pub const SPEED_RING_FULL_KMH: f64 = 60.0;

/// Hue ramp for congestion: 0 maps to green (120°), 1 to red (0°),
/// monotonically decreasing in between.
pub fn congestion_hue_deg(congestion: f64) -> f64 {
    (1.0 - congestion.clamp(0.0, 1.0)) * 120.0
}

pub fn congestion_color(congestion: f64) -> Color {
    Color::hsl(congestion_hue_deg(congestion), 0.7, 0.5)
}

/// Darker variant used for the speed ring so it reads against the disc.
pub fn congestion_ring_color(congestion: f64) -> Color {
    Color::hsl(congestion_hue_deg(congestion), 0.7, 0.3)
}

/// Disc radius in pixels before the pulse modulation.
pub fn point_radius(congestion: f64) -> f64 {
    3.0 + congestion.clamp(0.0, 1.0) * 7.0
}

/// Gentle per-point size oscillation; the index term staggers phases so the
/// field shimmers instead of breathing in lockstep.
pub fn point_pulse(time_s: f64, index: usize) -> f64 {
    (time_s * 2.0 + index as f64 * 0.1).sin() * 0.2 + 0.8
}

pub fn incident_glyph(kind: IncidentKind) -> Option<&'static str> {
    match kind {
        IncidentKind::None => None,
        IncidentKind::Accident => Some("\u{26a0}"),
        IncidentKind::Construction => Some("\u{1f6a7}"),
        IncidentKind::Weather => Some("\u{1f327}"),
        IncidentKind::Event => Some("\u{2691}"),
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ThemePalette {
    pub background_top: Color,
    pub background_bottom: Color,
    pub grid: Color,
    pub flow_arrow: Color,
    pub route: Color,
    pub user_ring: Color,
    pub user_core: Color,
    pub prediction: Color,
    pub glyph: Color,
    pub badge_backdrop: Color,
    pub badge_text: Color,
}

pub fn palette_for(theme: Theme) -> ThemePalette {
    match theme {
        Theme::Light => ThemePalette {
            background_top: Color::rgb(0xf8, 0xfa, 0xfc),
            background_bottom: Color::rgb(0xe2, 0xe8, 0xf0),
            grid: Color::rgba(148, 163, 184, 77),
            flow_arrow: Color::rgba(59, 130, 246, 153),
            route: Color::rgb(0x8b, 0x5c, 0xf6),
            user_ring: Color::rgb(59, 130, 246),
            user_core: Color::rgb(0x1d, 0x4e, 0xd8),
            prediction: Color::rgb(0x93, 0x33, 0xea),
            glyph: Color::rgb(51, 65, 85),
            badge_backdrop: Color::rgba(0, 0, 0, 204),
            badge_text: Color::WHITE,
        },
        Theme::Dark => ThemePalette {
            background_top: Color::rgb(0x02, 0x06, 0x17),
            background_bottom: Color::rgb(0x0f, 0x17, 0x2a),
            grid: Color::rgba(71, 85, 105, 77),
            flow_arrow: Color::rgba(96, 165, 250, 153),
            route: Color::rgb(0xa7, 0x8b, 0xfa),
            user_ring: Color::rgb(96, 165, 250),
            user_core: Color::rgb(0x3b, 0x82, 0xf6),
            prediction: Color::rgb(0xc0, 0x84, 0xfc),
            glyph: Color::rgb(226, 232, 240),
            badge_backdrop: Color::rgba(15, 23, 42, 217),
            badge_text: Color::WHITE,
        },
    }
}
