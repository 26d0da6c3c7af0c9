//! Closed polygons used as glyph regions and contours.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;

/// A closed polygon given by its vertices; the last vertex connects back to
/// the first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Four-vertex polygon tracing the bounds clockwise from the top-left
    pub fn rectangle(bounds: Bounds) -> Self {
        Self::new(vec![
            bounds.min,
            Vec2::new(bounds.max.x, bounds.min.y),
            bounds.max,
            Vec2::new(bounds.min.x, bounds.max.y),
        ])
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the vertices, `None` for an empty polygon
    pub fn bbox(&self) -> Option<Bounds> {
        Bounds::from_points(self.points.iter().copied())
    }
}
