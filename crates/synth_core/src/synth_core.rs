//! # Geometry primitives shared by the scene graph and the layout engine
//!
//! This crate provides the small set of 2D types everything else is built
//! from: affine transforms, axis-aligned bounds, polygons, and the jitter
//! helper used to keep synthesized layouts from looking mechanical.

pub mod bounds;
pub mod polygon;
pub mod random;
pub mod transform;

pub use bounds::Bounds;
pub use glam::Vec2;
pub use polygon::Polygon;
pub use random::random_between;
pub use transform::Transform;
