use crate::math::Vec2;

/// Axis-aligned bounding box in screen pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb2 { min, max }
    }

    /// The rectangle covering a `width` × `height` surface anchored at (0,0).
    pub fn of_surface(width: f64, height: f64) -> Self {
        Aabb2::new(Vec2::ZERO, Vec2::new(width, height))
    }

    /// Grows the box by `margin` on every side. A negative margin shrinks it.
    pub fn expanded(self, margin: f64) -> Self {
        Aabb2::new(
            Vec2::new(self.min.x - margin, self.min.y - margin),
            Vec2::new(self.max.x + margin, self.max.y + margin),
        )
    }

    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn contains_edges_inclusive() {
        let b = Aabb2::of_surface(100.0, 50.0);
        assert!(b.contains(Vec2::ZERO));
        assert!(b.contains(Vec2::new(100.0, 50.0)));
        assert!(!b.contains(Vec2::new(100.1, 25.0)));
    }

    #[test]
    fn expanded_admits_near_misses() {
        let b = Aabb2::of_surface(100.0, 50.0).expanded(50.0);
        assert!(b.contains(Vec2::new(-49.0, 25.0)));
        assert!(b.contains(Vec2::new(149.0, 99.0)));
        assert!(!b.contains(Vec2::new(-51.0, 25.0)));
    }
}
