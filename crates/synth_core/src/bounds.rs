//! Axis-aligned bounding box implementation using glam
//!
//! Coordinates follow the page convention: x grows to the right and y grows
//! downward, so `top` is the minimum y and `bottom` the maximum y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box represented by minimum and maximum points
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// The minimum point (top-left)
    pub min: Vec2,
    /// The maximum point (bottom-right)
    pub max: Vec2,
}

impl Bounds {
    /// Creates a new bounds from minimum and maximum points
    ///
    /// Note: This doesn't validate that min is actually less than max.
    /// Use `from_corners` if you need automatic ordering.
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates bounds from center point and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Creates bounds from two corner points, automatically ordering them
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest bounds containing every point, `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = Vec2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |bounds, p| Self {
            min: bounds.min.min(p),
            max: bounds.max.max(p),
        }))
    }

    pub fn left(&self) -> f32 {
        self.min.x
    }

    pub fn right(&self) -> f32 {
        self.max.x
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Tests if this bounds intersects with another
    ///
    /// Two bounds intersect if they overlap in both X and Y axes;
    /// touching edges do not count.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// The smallest bounds that contains both input bounds
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let bounds = Bounds::new(Vec2::new(1.0, 2.0), Vec2::new(4.0, 6.0));

        assert_eq!(bounds.left(), 1.0);
        assert_eq!(bounds.top(), 2.0);
        assert_eq!(bounds.right(), 4.0);
        assert_eq!(bounds.bottom(), 6.0);
        assert_eq!(bounds.center(), Vec2::new(2.5, 4.0));
    }

    #[test]
    fn test_from_points() {
        assert!(Bounds::from_points(Vec::new()).is_none());

        let bounds = Bounds::from_points([
            Vec2::new(2.0, -1.0),
            Vec2::new(-3.0, 4.0),
            Vec2::new(0.5, 0.5),
        ])
        .unwrap();
        assert_eq!(bounds, Bounds::new(Vec2::new(-3.0, -1.0), Vec2::new(2.0, 4.0)));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Bounds::new(Vec2::ZERO, Vec2::new(1.0, 1.0));
        let b = Bounds::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        let c = Bounds::new(Vec2::new(0.5, 0.5), Vec2::new(2.0, 2.0));

        assert!(!a.intersects(&b));
        assert!(a.intersects(&c));
        assert_eq!(a.union(&b).width(), 2.0);
    }
}
