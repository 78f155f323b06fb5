//! Scalar density field over screen space.
//!
//! Each source contributes `weight · max(0, 1 − d/R)` and the sum clamps to
//! [0, 1]. Sampling runs on a coarse stride and the painter block-fills one
//! stride-sized rectangle per sample, which upsamples implicitly.
//!
//! The build is O(samples × sources). That is fine for hundreds of points
//! on a screen-sized canvas and is a known ceiling, not a bug: past that,
//! swap in a precomputed density grid or a spatial index.

use foundation::math::Vec2;

use crate::command::Color;

/// Falloff radius of one source, in pixels.
pub const INFLUENCE_RADIUS_PX: f64 = 50.0;

/// Sample every Nth pixel in both axes.
pub const SAMPLE_STRIDE_PX: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapField {
    cols: usize,
    rows: usize,
    intensities: Vec<f64>,
}

impl HeatmapField {
    /// Builds the field for a `width` × `height` surface from screen-space
    /// sources `(position, weight)`.
    pub fn build(sources: &[(Vec2, f64)], width: f64, height: f64) -> Self {
        let cols = (width.max(0.0) as usize).div_ceil(SAMPLE_STRIDE_PX);
        let rows = (height.max(0.0) as usize).div_ceil(SAMPLE_STRIDE_PX);
        let mut intensities = vec![0.0; cols * rows];

        for row in 0..rows {
            for col in 0..cols {
                let sample = Vec2::new(
                    (col * SAMPLE_STRIDE_PX) as f64,
                    (row * SAMPLE_STRIDE_PX) as f64,
                );
                let mut sum = 0.0;
                for (pos, weight) in sources {
                    let d = sample.distance(*pos);
                    let falloff = 1.0 - d / INFLUENCE_RADIUS_PX;
                    if falloff > 0.0 {
                        sum += weight * falloff;
                    }
                }
                intensities[row * cols + col] = sum.min(1.0);
            }
        }

        Self {
            cols,
            rows,
            intensities,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Intensity of the sample nearest to pixel `(x, y)`.
    pub fn intensity_at_px(&self, x: f64, y: f64) -> f64 {
        if self.cols == 0 || self.rows == 0 {
            return 0.0;
        }
        let col = ((x / SAMPLE_STRIDE_PX as f64).round() as usize).min(self.cols - 1);
        let row = ((y / SAMPLE_STRIDE_PX as f64).round() as usize).min(self.rows - 1);
        self.intensities[row * self.cols + col]
    }

    /// Iterates non-empty samples as `(top-left pixel, intensity)`.
    pub fn samples(&self) -> impl Iterator<Item = (Vec2, f64)> + '_ {
        self.intensities
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .map(|(i, v)| {
                let col = i % self.cols;
                let row = i / self.cols;
                (
                    Vec2::new(
                        (col * SAMPLE_STRIDE_PX) as f64,
                        (row * SAMPLE_STRIDE_PX) as f64,
                    ),
                    *v,
                )
            })
    }
}

/// Three-stop gradient: transparent green → yellow → red, alpha rising with
/// intensity, linear between stops.
pub fn heat_color(intensity: f64) -> Color {
    const STOPS: [(f64, [f64; 4]); 3] = [
        (0.0, [0.0, 255.0, 0.0, 0.0]),
        (0.5, [255.0, 255.0, 0.0, 100.0]),
        (1.0, [255.0, 0.0, 0.0, 150.0]),
    ];

    let t = intensity.clamp(0.0, 1.0);
    let (lo, hi) = if t <= STOPS[1].0 {
        (STOPS[0], STOPS[1])
    } else {
        (STOPS[1], STOPS[2])
    };
    let f = if hi.0 == lo.0 {
        0.0
    } else {
        (t - lo.0) / (hi.0 - lo.0)
    };
    let mix = |a: f64, b: f64| (a + (b - a) * f).round() as u8;
    Color::rgba(
        mix(lo.1[0], hi.1[0]),
        mix(lo.1[1], hi.1[1]),
        mix(lo.1[2], hi.1[2]),
        mix(lo.1[3], hi.1[3]),
    )
}

#[cfg(test)]
mod tests {
    use super::{HeatmapField, INFLUENCE_RADIUS_PX, SAMPLE_STRIDE_PX, heat_color};
    use foundation::math::Vec2;

    #[test]
    fn adding_a_source_at_a_pixel_never_decreases_it() {
        let there = Vec2::new(40.0, 40.0);
        let base = vec![(Vec2::new(10.0, 10.0), 0.6)];
        let before = HeatmapField::build(&base, 100.0, 100.0);

        let mut more = base.clone();
        more.push((there, 0.4));
        let after = HeatmapField::build(&more, 100.0, 100.0);

        assert!(after.intensity_at_px(there.x, there.y) >= before.intensity_at_px(there.x, there.y));
        // And everywhere else too: contributions are non-negative.
        for row in 0..before.rows() {
            for col in 0..before.cols() {
                let (x, y) = (
                    (col * SAMPLE_STRIDE_PX) as f64,
                    (row * SAMPLE_STRIDE_PX) as f64,
                );
                assert!(after.intensity_at_px(x, y) >= before.intensity_at_px(x, y));
            }
        }
    }

    #[test]
    fn intensity_clamps_at_one() {
        let stack: Vec<_> = (0..10).map(|_| (Vec2::new(20.0, 20.0), 1.0)).collect();
        let field = HeatmapField::build(&stack, 40.0, 40.0);
        assert_eq!(field.intensity_at_px(20.0, 20.0), 1.0);
    }

    #[test]
    fn influence_ends_at_the_radius() {
        let field = HeatmapField::build(&[(Vec2::new(0.0, 0.0), 1.0)], 200.0, 10.0);
        assert!(field.intensity_at_px(INFLUENCE_RADIUS_PX + 2.0, 0.0) == 0.0);
        assert!(field.intensity_at_px(10.0, 0.0) > 0.0);
    }

    #[test]
    fn heat_color_stops_and_alpha_ramp() {
        assert_eq!(heat_color(0.0).a, 0);
        let mid = heat_color(0.5);
        assert_eq!((mid.r, mid.g, mid.b, mid.a), (255, 255, 0, 100));
        let hot = heat_color(1.0);
        assert_eq!((hot.r, hot.g, hot.b, hot.a), (255, 0, 0, 150));
        // Alpha grows with intensity.
        assert!(heat_color(0.25).a < heat_color(0.75).a);
    }

    #[test]
    fn samples_skip_empty_cells() {
        let field = HeatmapField::build(&[(Vec2::new(0.0, 0.0), 1.0)], 300.0, 300.0);
        let count = field.samples().count();
        assert!(count > 0);
        assert!(count < field.cols() * field.rows());
    }
}
