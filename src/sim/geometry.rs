//! Axis-aligned rectangles in play-area pixel space
//!
//! The play area's top-left corner is the origin. The bin and every item are
//! expressed in the same space so hit tests are plain comparisons.

use glam::Vec2;
use rand::Rng;

/// An axis-aligned rectangle (`min` is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Rectangle from a top-left corner and a size
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(x + width, y + height))
    }

    /// Square of side `size` centered on `center`
    pub fn from_center_size(center: Vec2, size: f32) -> Self {
        let half = Vec2::splat(size / 2.0);
        Self::new(center - half, center + half)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Point containment, edges inclusive
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Overlap test, touching edges count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Shrink on every side; collapses to the center when too small
    pub fn inset(&self, margin: f32) -> Rect {
        let min = self.min + Vec2::splat(margin);
        let max = self.max - Vec2::splat(margin);
        let c = self.center();
        Rect {
            min: Vec2::new(min.x.min(c.x), min.y.min(c.y)),
            max: Vec2::new(max.x.max(c.x), max.y.max(c.y)),
        }
    }

    /// Nearest point inside the rectangle
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }

    /// Uniformly random point inside the rectangle
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            random_between(rng, self.min.x, self.max.x),
            random_between(rng, self.min.y, self.max.y),
        )
    }

    /// Sub-rectangle given as fractions of this one (0..1 on each axis)
    pub fn fraction(&self, from: Vec2, to: Vec2) -> Rect {
        let size = self.max - self.min;
        Rect::new(self.min + size * from, self.min + size * to)
    }

    /// Translate into a frame whose origin sits at `origin`
    pub fn relative_to(&self, origin: Vec2) -> Rect {
        Rect {
            min: self.min - origin,
            max: self.max - origin,
        }
    }
}

/// `rng.random_range(lo..hi)` that tolerates an empty range
pub fn random_between<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Random unit vector
pub fn random_direction<R: Rng>(rng: &mut R) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_contains_is_edge_inclusive() {
        let r = Rect::from_origin_size(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(r.contains(Vec2::new(110.0, 70.0)));
        assert!(!r.contains(Vec2::new(110.1, 70.0)));
        assert!(!r.contains(Vec2::new(9.9, 30.0)));
    }

    #[test]
    fn test_intersects() {
        let a = Rect::from_origin_size(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_center_size(Vec2::new(14.0, 5.0), 10.0);
        let c = Rect::from_origin_size(30.0, 30.0, 5.0, 5.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_inset_collapses_to_center() {
        let r = Rect::from_origin_size(0.0, 0.0, 10.0, 100.0);
        let inner = r.inset(8.0);
        assert_eq!(inner.min.x, 5.0);
        assert_eq!(inner.max.x, 5.0);
        assert_eq!(inner.min.y, 8.0);
        assert_eq!(inner.max.y, 92.0);
    }

    #[test]
    fn test_random_point_inside() {
        let mut rng = Pcg32::seed_from_u64(7);
        let r = Rect::from_origin_size(5.0, 5.0, 40.0, 20.0);
        for _ in 0..200 {
            assert!(r.contains(r.random_point(&mut rng)));
        }
        let degenerate = Rect::from_origin_size(3.0, 4.0, 0.0, 0.0);
        assert_eq!(degenerate.random_point(&mut rng), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_relative_to() {
        let bin = Rect::from_origin_size(300.0, 400.0, 50.0, 60.0);
        let local = bin.relative_to(Vec2::new(100.0, 100.0));
        assert_eq!(local.min, Vec2::new(200.0, 300.0));
        assert_eq!(local.width(), 50.0);
    }
}
