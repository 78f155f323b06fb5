//! Replays a draw-command list onto a 2D canvas context.
//!
//! This is the only place that touches the drawing surface; everything
//! upstream works in terms of [`DrawCommand`]s.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use foundation::math::Vec2;
use render::command::{DashPattern, DrawCommand};

pub fn execute(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    commands: &[DrawCommand],
) -> Result<(), JsValue> {
    for command in commands {
        match command {
            DrawCommand::BackgroundGradient { from, to } => {
                let gradient = ctx.create_linear_gradient(0.0, 0.0, width, height);
                gradient.add_color_stop(0.0, &from.css())?;
                gradient.add_color_stop(1.0, &to.css())?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.fill_rect(0.0, 0.0, width, height);
            }
            DrawCommand::Line {
                from,
                to,
                color,
                width: line_width,
            } => {
                ctx.set_stroke_style_str(&color.css());
                ctx.set_line_width(*line_width);
                ctx.begin_path();
                ctx.move_to(from.x, from.y);
                ctx.line_to(to.x, to.y);
                ctx.stroke();
            }
            DrawCommand::Disc {
                center,
                radius,
                color,
            } => {
                ctx.set_fill_style_str(&color.css());
                ctx.begin_path();
                ctx.arc(center.x, center.y, radius.max(0.0), 0.0, TAU)?;
                ctx.fill();
            }
            DrawCommand::Glow {
                center,
                radius,
                color,
            } => {
                let radius = radius.max(0.1);
                let gradient = ctx.create_radial_gradient(
                    center.x, center.y, 0.0, center.x, center.y, radius,
                )?;
                gradient.add_color_stop(0.0, &color.css())?;
                gradient.add_color_stop(1.0, &color.with_alpha(0).css())?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.begin_path();
                ctx.arc(center.x, center.y, radius, 0.0, TAU)?;
                ctx.fill();
            }
            DrawCommand::Arc {
                center,
                radius,
                sweep_rad,
                color,
                width: line_width,
            } => {
                ctx.set_stroke_style_str(&color.css());
                ctx.set_line_width(*line_width);
                ctx.begin_path();
                ctx.arc(center.x, center.y, radius.max(0.0), 0.0, *sweep_rad)?;
                ctx.stroke();
            }
            DrawCommand::Polyline {
                points,
                color,
                width: line_width,
                dash,
            } => {
                if points.len() < 2 {
                    continue;
                }
                if let Some(pattern) = dash {
                    apply_dash(ctx, pattern)?;
                }
                ctx.set_stroke_style_str(&color.css());
                ctx.set_line_width(*line_width);
                ctx.set_line_cap("round");
                ctx.set_line_join("round");
                ctx.begin_path();
                ctx.move_to(points[0].x, points[0].y);
                for p in &points[1..] {
                    ctx.line_to(p.x, p.y);
                }
                ctx.stroke();
                if dash.is_some() {
                    ctx.set_line_dash(&js_sys::Array::new())?;
                    ctx.set_line_dash_offset(0.0);
                }
            }
            DrawCommand::FillRect { min, size, color } => {
                ctx.set_fill_style_str(&color.css());
                ctx.fill_rect(min.x, min.y, size.x, size.y);
            }
            DrawCommand::BadgeRect {
                min,
                size,
                corner_radius,
                color,
            } => {
                ctx.set_fill_style_str(&color.css());
                rounded_rect_path(ctx, *min, *size, *corner_radius)?;
                ctx.fill();
            }
            DrawCommand::Label {
                pos,
                text,
                color,
                size_px,
            } => {
                ctx.set_fill_style_str(&color.css());
                ctx.set_font(&format!("{size_px}px sans-serif"));
                ctx.set_text_align("center");
                ctx.fill_text(text, pos.x, pos.y)?;
            }
        }
    }
    Ok(())
}

fn apply_dash(ctx: &CanvasRenderingContext2d, pattern: &DashPattern) -> Result<(), JsValue> {
    let segments = js_sys::Array::of2(
        &JsValue::from_f64(pattern.on_px),
        &JsValue::from_f64(pattern.off_px),
    );
    ctx.set_line_dash(&segments)?;
    ctx.set_line_dash_offset(pattern.offset_px);
    Ok(())
}

fn rounded_rect_path(
    ctx: &CanvasRenderingContext2d,
    min: Vec2,
    size: Vec2,
    radius: f64,
) -> Result<(), JsValue> {
    let r = radius.min(size.x / 2.0).min(size.y / 2.0).max(0.0);
    let (x0, y0) = (min.x, min.y);
    let (x1, y1) = (min.x + size.x, min.y + size.y);

    ctx.begin_path();
    ctx.move_to(x0 + r, y0);
    ctx.arc_to(x1, y0, x1, y1, r)?;
    ctx.arc_to(x1, y1, x0, y1, r)?;
    ctx.arc_to(x0, y1, x0, y0, r)?;
    ctx.arc_to(x0, y0, x1, y0, r)?;
    ctx.close_path();
    Ok(())
}
