//! Full-frame painter.
//!
//! Rendering is not incremental: every call clears and repaints the whole
//! surface. At a few hundred points the full redraw is cheaper than any
//! diffing scheme would be; a damage-region system only becomes worth it if
//! profiling ever shows redraw cost dominating at much larger point counts.

use std::f64::consts::{PI, TAU};

use foundation::math::Vec2;
use scene::frame_input::RenderFrame;
use scene::view_mode::ViewMode;
use scene::visibility;
use telemetry::network::{NetworkClass, NetworkInfo};
use telemetry::prefs::Theme;
use telemetry::route::Route;

use crate::command::{Color, DashPattern, DrawCommand};
use crate::heatmap::{self, HeatmapField, SAMPLE_STRIDE_PX};
use crate::symbology::{self, ThemePalette};

const GRID_BASE_SPACING_PX: f64 = 40.0;
const FLOW_ARROW_EVERY: usize = 5;
const FLOW_ARROW_LEN_PX: f64 = 15.0;
const FLOW_ARROW_HEAD_PX: f64 = 5.0;
const ROUTE_DASH_PX: f64 = 10.0;
const ROUTE_FLOW_PX_PER_S: f64 = 20.0;
const USER_RING_RADIUS_PX: f64 = 25.0;
const PREDICTION_ORBIT_PX: f64 = 100.0;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct RenderStats {
    pub points_drawn: usize,
    pub points_culled: usize,
}

#[derive(Debug, Default)]
pub struct RenderOutput {
    pub commands: Vec<DrawCommand>,
    pub stats: RenderStats,
}

pub struct SceneRenderer {
    palette: ThemePalette,
}

impl SceneRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            palette: symbology::palette_for(theme),
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.palette = symbology::palette_for(theme);
    }

    /// Paints one frame. An unrenderable surface yields an empty command
    /// list; the caller just retries next tick.
    pub fn render(&self, frame: &RenderFrame) -> RenderOutput {
        let mut out = RenderOutput::default();
        if !frame.is_renderable() {
            return out;
        }

        out.commands.push(DrawCommand::BackgroundGradient {
            from: self.palette.background_top,
            to: self.palette.background_bottom,
        });

        match frame.mode {
            ViewMode::Points => {
                self.draw_grid(frame, &mut out.commands);
                self.draw_points(frame, &mut out);
            }
            ViewMode::Heatmap => self.draw_heatmap(frame, &mut out.commands),
            ViewMode::Predictions => self.draw_predictions(frame, &mut out.commands),
        }

        if let Some(route) = &frame.selected_route
            && route.is_drawable()
        {
            self.draw_route(frame, route, &mut out.commands);
        }
        if let Some(network) = frame.network {
            self.draw_network_badge(frame, network, &mut out.commands);
        }
        // The user marker goes down last so nothing paints over it.
        if frame.user_location.is_some() {
            self.draw_user_marker(frame, &mut out.commands);
        }

        out
    }

    /// Grid spacing follows zoom and its phase follows pan, so the lines
    /// appear to scroll with the content.
    fn draw_grid(&self, frame: &RenderFrame, cmds: &mut Vec<DrawCommand>) {
        let spacing = GRID_BASE_SPACING_PX * frame.viewport.zoom();
        let pan = frame.viewport.pan;

        let mut x = pan.x.rem_euclid(spacing);
        while x <= frame.width {
            cmds.push(DrawCommand::Line {
                from: Vec2::new(x, 0.0),
                to: Vec2::new(x, frame.height),
                color: self.palette.grid,
                width: 1.0,
            });
            x += spacing;
        }

        let mut y = pan.y.rem_euclid(spacing);
        while y <= frame.height {
            cmds.push(DrawCommand::Line {
                from: Vec2::new(0.0, y),
                to: Vec2::new(frame.width, y),
                color: self.palette.grid,
                width: 1.0,
            });
            y += spacing;
        }
    }

    fn draw_points(&self, frame: &RenderFrame, out: &mut RenderOutput) {
        let proj = frame.projector();

        for (index, point) in frame.points.iter().enumerate() {
            let pos = proj.project(point.geo());
            if !visibility::is_worth_drawing(frame.width, frame.height, pos) {
                out.stats.points_culled += 1;
                continue;
            }
            out.stats.points_drawn += 1;

            let radius = symbology::point_radius(point.congestion)
                * symbology::point_pulse(frame.time_s, index);
            let fill = symbology::congestion_color(point.congestion);

            out.commands.push(DrawCommand::Glow {
                center: pos,
                radius: radius * 2.0,
                color: fill.with_alpha(204),
            });
            out.commands.push(DrawCommand::Disc {
                center: pos,
                radius,
                color: fill,
            });

            // Speed ring: a full turn means free-flow speed or better.
            let sweep = (point.speed / symbology::SPEED_RING_FULL_KMH).min(1.0) * TAU;
            out.commands.push(DrawCommand::Arc {
                center: pos,
                radius: radius + 3.0,
                sweep_rad: sweep,
                color: symbology::congestion_ring_color(point.congestion),
                width: 2.0,
            });

            if let Some(glyph) = symbology::incident_glyph(point.incident) {
                out.commands.push(DrawCommand::Label {
                    pos: Vec2::new(pos.x, pos.y - radius - 8.0),
                    text: glyph.to_string(),
                    color: self.palette.glyph,
                    size_px: 16.0,
                });
            }

            if index % FLOW_ARROW_EVERY == 0 {
                self.draw_flow_arrow(frame.time_s, index, pos, &mut out.commands);
            }
        }
    }

    /// Decorative motion only: the angle cycles with time and index, it is
    /// not derived from any real direction data.
    fn draw_flow_arrow(&self, time_s: f64, index: usize, pos: Vec2, cmds: &mut Vec<DrawCommand>) {
        let angle = (time_s + index as f64) % TAU;
        let dir = Vec2::new(angle.cos(), angle.sin());
        let tip = pos + dir.scale(FLOW_ARROW_LEN_PX);

        cmds.push(DrawCommand::Line {
            from: pos,
            to: tip,
            color: self.palette.flow_arrow,
            width: 2.0,
        });
        for head_angle in [angle + 0.8 * PI, angle - 0.8 * PI] {
            let head = Vec2::new(head_angle.cos(), head_angle.sin()).scale(FLOW_ARROW_HEAD_PX);
            cmds.push(DrawCommand::Line {
                from: tip,
                to: tip + head,
                color: self.palette.flow_arrow,
                width: 2.0,
            });
        }
    }

    fn draw_heatmap(&self, frame: &RenderFrame, cmds: &mut Vec<DrawCommand>) {
        let proj = frame.projector();
        let sources: Vec<(Vec2, f64)> = frame
            .points
            .iter()
            .map(|p| (proj.project(p.geo()), p.congestion))
            .collect();

        let field = HeatmapField::build(&sources, frame.width, frame.height);
        let block = Vec2::new(SAMPLE_STRIDE_PX as f64, SAMPLE_STRIDE_PX as f64);
        for (min, intensity) in field.samples() {
            cmds.push(DrawCommand::FillRect {
                min,
                size: block,
                color: heatmap::heat_color(intensity),
            });
        }
    }

    /// Predictions orbit the viewport center: angle by index, radius by
    /// predicted congestion, disc size and opacity by confidence.
    fn draw_predictions(&self, frame: &RenderFrame, cmds: &mut Vec<DrawCommand>) {
        if frame.predictions.is_empty() {
            return;
        }
        let center = frame.center();
        let len = frame.predictions.len();

        for (index, prediction) in frame.predictions.iter().enumerate() {
            let angle = index as f64 / len as f64 * TAU;
            let orbit = PREDICTION_ORBIT_PX + prediction.predicted_congestion * 50.0;
            let pos = center + Vec2::new(angle.cos(), angle.sin()).scale(orbit);

            let alpha = (prediction.confidence * 0.3 * 255.0).round() as u8;
            cmds.push(DrawCommand::Disc {
                center: pos,
                radius: 30.0 + prediction.confidence * 20.0,
                color: self.palette.prediction.with_alpha(alpha),
            });
            cmds.push(DrawCommand::Label {
                pos: Vec2::new(pos.x, pos.y + 4.0),
                text: format!("{}%", (prediction.predicted_congestion * 100.0).round()),
                color: self.palette.prediction,
                size_px: 12.0,
            });
        }
    }

    fn draw_route(&self, frame: &RenderFrame, route: &Route, cmds: &mut Vec<DrawCommand>) {
        let proj = frame.projector();
        let points: Vec<Vec2> = route.waypoints.iter().map(|w| proj.project(w.geo())).collect();

        cmds.push(DrawCommand::Polyline {
            points,
            color: self.palette.route,
            width: 4.0,
            dash: Some(DashPattern {
                on_px: ROUTE_DASH_PX,
                off_px: ROUTE_DASH_PX,
                offset_px: (frame.time_s * ROUTE_FLOW_PX_PER_S) % (2.0 * ROUTE_DASH_PX),
            }),
        });
    }

    /// Heartbeat at the surface center, independent of data updates.
    fn draw_user_marker(&self, frame: &RenderFrame, cmds: &mut Vec<DrawCommand>) {
        let center = frame.center();
        let pulse = (frame.time_s * 3.0).sin() * 0.3 + 0.7;

        cmds.push(DrawCommand::Arc {
            center,
            radius: USER_RING_RADIUS_PX * pulse,
            sweep_rad: TAU,
            color: self
                .palette
                .user_ring
                .with_alpha((pulse * 0.5 * 255.0).round() as u8),
            width: 3.0,
        });
        cmds.push(DrawCommand::Glow {
            center,
            radius: 12.0,
            color: self.palette.user_ring,
        });
        cmds.push(DrawCommand::Disc {
            center,
            radius: 12.0,
            color: self.palette.user_core,
        });
        cmds.push(DrawCommand::Disc {
            center,
            radius: 4.0,
            color: Color::WHITE,
        });
    }

    fn draw_network_badge(
        &self,
        frame: &RenderFrame,
        network: NetworkInfo,
        cmds: &mut Vec<DrawCommand>,
    ) {
        let anchor = Vec2::new(frame.width - 100.0, 20.0);

        cmds.push(DrawCommand::BadgeRect {
            min: anchor - Vec2::new(10.0, 5.0),
            size: Vec2::new(90.0, 40.0),
            corner_radius: 8.0,
            color: self.palette.badge_backdrop,
        });
        cmds.push(DrawCommand::Label {
            pos: Vec2::new(anchor.x, anchor.y + 12.0),
            text: network.effective_class.label().to_string(),
            color: self.palette.badge_text,
            size_px: 14.0,
        });

        let lit_color = match network.effective_class {
            NetworkClass::FourG => Color::rgb(34, 197, 94),
            NetworkClass::ThreeG => Color::rgb(234, 179, 8),
            _ => Color::rgb(239, 68, 68),
        };
        let strength = network.effective_class.signal_strength();
        for bar in 0u8..4 {
            let height = 15.0 / 4.0 * f64::from(bar + 1);
            let color = if bar < strength {
                lit_color
            } else {
                Color::WHITE.with_alpha(77)
            };
            cmds.push(DrawCommand::FillRect {
                min: Vec2::new(anchor.x + f64::from(bar) * 5.0, anchor.y + 25.0 - height),
                size: Vec2::new(3.0, height),
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{RenderOutput, SceneRenderer};
    use crate::command::DrawCommand;
    use foundation::math::GeoPoint;
    use scene::frame_input::RenderFrame;
    use scene::view_mode::ViewMode;
    use scene::viewport::ViewportState;
    use telemetry::network::{NetworkClass, NetworkInfo};
    use telemetry::point::{IncidentKind, RoadType, TrafficPoint};
    use telemetry::prefs::Theme;
    use telemetry::synthetic::{self, SyntheticConfig};

    fn point(id: u64, lat: f64, lng: f64, congestion: f64) -> TrafficPoint {
        TrafficPoint {
            id,
            lat,
            lng,
            congestion,
            speed: 50.0,
            timestamp_ms: 0,
            road_type: RoadType::Arterial,
            incident: IncidentKind::None,
            volume: 100,
            quality: 1.0,
            emissions: 10.0,
            noise_level: 50.0,
        }
    }

    fn base_frame(mode: ViewMode) -> RenderFrame {
        RenderFrame {
            mode,
            width: 800.0,
            height: 600.0,
            time_s: 1.25,
            viewport: ViewportState::new(),
            points: Vec::new(),
            selected_route: None,
            predictions: Vec::new(),
            user_location: Some(GeoPoint::new(40.7128, -74.0060)),
            network: None,
        }
    }

    fn render(frame: &RenderFrame) -> RenderOutput {
        SceneRenderer::new(Theme::Light).render(frame)
    }

    #[test]
    fn unrenderable_surface_yields_no_commands() {
        let mut frame = base_frame(ViewMode::Points);
        frame.width = 0.0;
        let out = render(&frame);
        assert!(out.commands.is_empty());
    }

    #[test]
    fn every_frame_starts_with_the_background() {
        let frame = base_frame(ViewMode::Points);
        let out = render(&frame);
        assert!(matches!(
            out.commands.first(),
            Some(DrawCommand::BackgroundGradient { .. })
        ));
    }

    #[test]
    fn offscreen_points_are_culled_before_drawing() {
        let origin = GeoPoint::new(40.7128, -74.0060);
        let mut frame = base_frame(ViewMode::Points);
        frame.points = vec![
            point(0, origin.lat_deg, origin.lng_deg, 0.5),
            // A degree away projects thousands of pixels offscreen.
            point(1, origin.lat_deg + 1.0, origin.lng_deg, 0.5),
        ];
        let out = render(&frame);
        assert_eq!(out.stats.points_drawn, 1);
        assert_eq!(out.stats.points_culled, 1);
    }

    #[test]
    fn visible_point_gets_glow_disc_and_speed_ring() {
        let origin = GeoPoint::new(40.7128, -74.0060);
        let mut frame = base_frame(ViewMode::Points);
        frame.points = vec![point(0, origin.lat_deg, origin.lng_deg, 0.8)];
        // No user marker so the point's shapes are unambiguous.
        frame.user_location = Some(origin);

        let out = render(&frame);
        let glows = out
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Glow { .. }))
            .count();
        let arcs = out
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Arc { .. }))
            .count();
        // One glow for the point, one for the user marker core; one arc for
        // the speed ring, one for the marker's pulse ring.
        assert_eq!(glows, 2);
        assert_eq!(arcs, 2);
    }

    #[test]
    fn incident_points_get_a_glyph_label() {
        let origin = GeoPoint::new(40.7128, -74.0060);
        let mut frame = base_frame(ViewMode::Points);
        let mut p = point(0, origin.lat_deg, origin.lng_deg, 0.5);
        p.incident = IncidentKind::Construction;
        frame.points = vec![p];

        let out = render(&frame);
        assert!(out
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Label { .. })));
    }

    #[test]
    fn every_fifth_point_gets_a_flow_arrow() {
        let origin = GeoPoint::new(40.7128, -74.0060);
        let mut frame = base_frame(ViewMode::Points);
        frame.user_location = Some(origin);
        // Six co-located points: indices 0 and 5 carry arrows (3 lines each).
        frame.points = (0..6)
            .map(|i| point(i, origin.lat_deg, origin.lng_deg, 0.2))
            .collect();

        let grid_only = {
            let mut f = frame.clone();
            f.points.clear();
            render(&f)
                .commands
                .iter()
                .filter(|c| matches!(c, DrawCommand::Line { .. }))
                .count()
        };
        let with_points = render(&frame)
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(with_points - grid_only, 6);
    }

    #[test]
    fn heatmap_mode_paints_blocks_not_discs() {
        let mut frame = base_frame(ViewMode::Heatmap);
        frame.user_location = None;
        frame.points = vec![point(0, 0.0, 0.0, 1.0)];

        let out = render(&frame);
        assert!(out
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::FillRect { .. })));
        assert!(!out
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Glow { .. })));
    }

    #[test]
    fn prediction_mode_draws_one_disc_and_label_each() {
        let mut frame = base_frame(ViewMode::Predictions);
        frame.user_location = None;
        frame.predictions = synthetic::predictions(&SyntheticConfig::default(), 6);

        let out = render(&frame);
        let discs = out
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
            .count();
        let labels: Vec<_> = out
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(discs, 6);
        assert_eq!(labels.len(), 6);
        assert!(labels.iter().all(|t| t.ends_with('%')));
    }

    #[test]
    fn selected_route_renders_one_animated_polyline() {
        let config = SyntheticConfig::default();
        let mut frame = base_frame(ViewMode::Points);
        frame.selected_route = Some(synthetic::route_candidate(
            &config,
            telemetry::route::RouteKind::Fastest,
            0,
        ));

        let polylines: Vec<_> = render(&frame)
            .commands
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Polyline { dash, .. } => Some(dash),
                _ => None,
            })
            .collect();
        assert_eq!(polylines.len(), 1);
        assert!(polylines[0].is_some());
    }

    #[test]
    fn user_marker_is_painted_last() {
        let frame = base_frame(ViewMode::Points);
        let out = render(&frame);
        match out.commands.last() {
            Some(DrawCommand::Disc { radius, color, .. }) => {
                assert_eq!(*radius, 4.0);
                assert_eq!(*color, crate::command::Color::WHITE);
            }
            other => panic!("expected the marker core last, got {other:?}"),
        }
    }

    #[test]
    fn network_badge_lights_bars_by_class() {
        let mut frame = base_frame(ViewMode::Points);
        frame.user_location = None;
        frame.network = Some(NetworkInfo {
            effective_class: NetworkClass::ThreeG,
            downlink_mbps: 4.0,
            rtt_ms: 120.0,
            save_data: false,
        });

        let out = render(&frame);
        assert!(out
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::BadgeRect { .. })));
        let bars: Vec<_> = out
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillRect { .. }))
            .collect();
        assert_eq!(bars.len(), 4);
    }

    #[test]
    fn dark_theme_changes_the_background() {
        let frame = base_frame(ViewMode::Points);
        let light = SceneRenderer::new(Theme::Light).render(&frame);
        let dark = SceneRenderer::new(Theme::Dark).render(&frame);
        assert_ne!(light.commands.first(), dark.commands.first());
    }
}
