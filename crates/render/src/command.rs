use foundation::math::Vec2;

/// 8-bit RGBA color.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// HSL constructor; hue in degrees, saturation/lightness in 0–1.
    pub fn hsl(hue_deg: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue_deg.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let (r1, g1, b1) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Color::rgb(to_byte(r1), to_byte(g1), to_byte(b1))
    }

    /// CSS color string for a 2D canvas context.
    pub fn css(self) -> String {
        format!(
            "rgba({},{},{},{:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f64 / 255.0
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DashPattern {
    pub on_px: f64,
    pub off_px: f64,
    /// Advancing this over time makes the dashes appear to flow.
    pub offset_px: f64,
}

/// One paint instruction. The renderer emits an ordered list of these per
/// frame; executors (2D canvas, headless inspection) replay them in order.
/// Later commands paint over earlier ones.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Full-surface linear gradient, top-left toward bottom-right.
    BackgroundGradient { from: Color, to: Color },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f64,
    },
    Disc {
        center: Vec2,
        radius: f64,
        color: Color,
    },
    /// Radial gradient from `color` at the center to transparent at the rim.
    Glow {
        center: Vec2,
        radius: f64,
        color: Color,
    },
    /// Circular stroke from angle 0, sweeping clockwise.
    Arc {
        center: Vec2,
        radius: f64,
        sweep_rad: f64,
        color: Color,
        width: f64,
    },
    Polyline {
        points: Vec<Vec2>,
        color: Color,
        width: f64,
        dash: Option<DashPattern>,
    },
    FillRect {
        min: Vec2,
        size: Vec2,
        color: Color,
    },
    /// Rounded-corner backdrop for overlay widgets.
    BadgeRect {
        min: Vec2,
        size: Vec2,
        corner_radius: f64,
        color: Color,
    },
    Label {
        pos: Vec2,
        text: String,
        color: Color,
        size_px: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn hsl_hits_the_primary_hues() {
        assert_eq!(Color::hsl(0.0, 1.0, 0.5), Color::rgb(255, 0, 0));
        assert_eq!(Color::hsl(120.0, 1.0, 0.5), Color::rgb(0, 255, 0));
        assert_eq!(Color::hsl(240.0, 1.0, 0.5), Color::rgb(0, 0, 255));
    }

    #[test]
    fn css_formats_alpha_as_unit_float() {
        assert_eq!(Color::rgb(255, 0, 0).css(), "rgba(255,0,0,1.000)");
        assert_eq!(
            Color::rgba(0, 0, 0, 128).css(),
            format!("rgba(0,0,0,{:.3})", 128.0 / 255.0)
        );
    }

    #[test]
    fn with_alpha_preserves_channels() {
        let c = Color::rgb(10, 20, 30).with_alpha(99);
        assert_eq!((c.r, c.g, c.b, c.a), (10, 20, 30, 99));
    }
}
