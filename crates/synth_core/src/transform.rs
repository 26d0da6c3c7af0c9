//! 2D affine transformation between nested coordinate frames
//!
//! Every affine space in a scene carries one of these, mapping the space's
//! local coordinates into its parent's coordinates. Unlike a pure
//! translate+scale canvas transform, glyphs may be rotated or sheared by
//! augmentation, so this wraps a full [`glam::Affine2`].

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

use crate::polygon::Polygon;

/// A 2D affine transformation (linear map followed by a translation).
///
/// Composition is associative but not commutative. [`Transform::then`]
/// reads left to right: `a.then(&b)` applies `a` first, then `b`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    affine: Affine2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Creates an identity transform
    pub fn identity() -> Self {
        Self {
            affine: Affine2::IDENTITY,
        }
    }

    /// Creates a transform with only translation
    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            affine: Affine2::from_translation(Vec2::new(x, y)),
        }
    }

    /// Creates a transform with only (possibly non-uniform) scaling
    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            affine: Affine2::from_scale(Vec2::new(sx, sy)),
        }
    }

    /// Creates a counter-clockwise rotation by `angle` radians
    pub fn rotation(angle: f32) -> Self {
        Self {
            affine: Affine2::from_angle(angle),
        }
    }

    pub fn affine(&self) -> Affine2 {
        self.affine
    }

    /// The translation component, i.e. where the local origin lands
    pub fn offset(&self) -> Vec2 {
        self.affine.translation
    }

    /// Applies this transformation to a point
    pub fn apply(&self, point: Vec2) -> Vec2 {
        self.affine.transform_point2(point)
    }

    /// Applies this transformation to a vector (direction/size).
    /// Vectors are not affected by translation.
    pub fn apply_vector(&self, vector: Vec2) -> Vec2 {
        self.affine.transform_vector2(vector)
    }

    /// Applies this transformation to every vertex of a polygon
    pub fn apply_to_polygon(&self, polygon: &Polygon) -> Polygon {
        Polygon::new(polygon.points().iter().map(|p| self.apply(*p)).collect())
    }

    /// Composes two transformations: first applies self, then other
    pub fn then(&self, other: &Transform) -> Transform {
        Transform {
            affine: other.affine * self.affine,
        }
    }

    /// Returns the inverse transformation
    pub fn inverse(&self) -> Transform {
        Transform {
            affine: self.affine.inverse(),
        }
    }

    /// Approximate equality, for comparing composed float transforms
    pub fn abs_diff_eq(&self, other: &Transform, max_abs_diff: f32) -> bool {
        self.affine.abs_diff_eq(other.affine, max_abs_diff)
    }
}
