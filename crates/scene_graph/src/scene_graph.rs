//! # Notation Scene Graph
//!
//! The scene graph represents a synthesized page of music notation. It holds
//! every object of the page in one arena and relates them in two ways:
//!
//! - **Links**: typed, named references between objects (a notehead's notes,
//!   an accidental's notehead). Links are indexed in both directions, so the
//!   owners of an object are found without scanning the scene.
//! - **Affine spaces**: a strict tree of 2D coordinate frames. Glyphs,
//!   sprites and staves each live in a space, and transforms compose along
//!   the parent chain.
//!
//! ## Key Concepts
//!
//! - **Relationship queries**: [`Scene::many_of`], [`Scene::of_or_none`] and
//!   [`Scene::of`] resolve the owners of an object through a link field
//! - **Glyphs**: one [`Glyph`] record whose [`GlyphKind`] says whether it is
//!   plain, a line, or composed from sub-glyphs
//! - **Roles**: visual roles such as [`visual::Notehead`] decorate glyphs and
//!   link them back to the semantic score
//! - **Placement**: [`collect_placements`] flattens a finished page for
//!   renderers

pub mod error;
pub mod glyph;
pub mod labels;
pub mod link;
pub mod placement;
pub mod scene;
pub mod semantic;
pub mod space;
pub mod sprite;
pub mod visual;

pub use error::SceneError;
pub use glyph::{glyph_bbox_in_space, glyph_contours, glyph_debug_overlay, glyph_local_bbox, Glyph, GlyphKind, Region};
pub use labels::{SmuflLabel, SynthLabel};
pub use link::{Field, Inlink, LinkKey};
pub use placement::{collect_placements, PlacedGlyph, PlacedSprite, Placements};
pub use scene::{Handle, ObjectId, Scene, SceneObject};
pub use space::{walk_space, AffineSpace, SpaceMember, SpaceVisitor};
pub use sprite::{Bitmap, Sprite};
