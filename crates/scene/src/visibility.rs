use foundation::bounds::Aabb2;
use foundation::math::Vec2;

/// How far past the canvas edge a point may project and still be drawn.
/// Glows and incident glyphs extend past their anchor, so culling exactly
/// at the edge would pop them at the borders.
pub const CULL_MARGIN_PX: f64 = 50.0;

/// Coarse pre-draw cull. Purely a cost saver: a false positive just wastes
/// a few draw commands, never corrupts the frame.
pub fn is_worth_drawing(width: f64, height: f64, screen_pos: Vec2) -> bool {
    Aabb2::of_surface(width, height)
        .expanded(CULL_MARGIN_PX)
        .contains(screen_pos)
}

#[cfg(test)]
mod tests {
    use super::is_worth_drawing;
    use foundation::math::Vec2;

    #[test]
    fn keeps_points_on_and_near_the_surface() {
        assert!(is_worth_drawing(800.0, 600.0, Vec2::new(400.0, 300.0)));
        assert!(is_worth_drawing(800.0, 600.0, Vec2::new(-49.0, 0.0)));
        assert!(is_worth_drawing(800.0, 600.0, Vec2::new(849.0, 649.0)));
    }

    #[test]
    fn culls_far_offscreen_points() {
        assert!(!is_worth_drawing(800.0, 600.0, Vec2::new(-51.0, 300.0)));
        assert!(!is_worth_drawing(800.0, 600.0, Vec2::new(400.0, 651.0)));
    }
}
