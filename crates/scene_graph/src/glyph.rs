//! # Glyphs
//!
//! A [`Glyph`] is a placed visual symbol. It owns an affine space (its local
//! frame), the sprites drawn in that space, and a labeled region outlining
//! the symbol. Variants differ only in a small payload carried by
//! [`GlyphKind`]:
//!
//! - **Plain**: a symbol drawn as a whole (notehead, accidental, rest).
//! - **Line**: a symbol stretched between two points, like a stem or a
//!   ledger line. The points are in the glyph's own space.
//! - **Composed**: a symbol assembled from sub-glyphs whose spaces are nested
//!   under the composed glyph's space. Its sprite list is the union of the
//!   sub-glyph sprites once [`Scene::aggregate_sprites`] has been called.
//!
//! Role objects such as `Notehead` or `Stem` link to a glyph instead of
//! extending it.

use glam::Vec2;
use synth_core::{Bounds, Polygon, Transform};

use crate::error::SceneError;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::sprite::{Bitmap, Sprite};
use crate::space::AffineSpace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GlyphKind {
    Plain,
    Line { start: Vec2, end: Vec2 },
    Composed,
}

impl GlyphKind {
    pub fn name(&self) -> &'static str {
        match self {
            GlyphKind::Plain => "plain",
            GlyphKind::Line { .. } => "line",
            GlyphKind::Composed => "composed",
        }
    }
}

/// A labeled outline in glyph-space coordinates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Region {
    pub label: String,
    pub polygon: Polygon,
}

#[derive(Debug, Clone)]
pub struct Glyph {
    /// Classification label, e.g. `smufl::noteheadBlack`
    pub label: String,
    pub region: Region,
    pub kind: GlyphKind,
}

impl SceneObject for Glyph {
    const TYPE_NAME: &'static str = "Glyph";
}

impl Glyph {
    /// The glyph's own local frame
    pub const SPACE: Field<Glyph, AffineSpace> = Field::new("space");
    pub const SPRITES: Field<Glyph, Sprite> = Field::new("sprites");
    /// Parts of a composed glyph
    pub const SUB_GLYPHS: Field<Glyph, Glyph> = Field::new("sub_glyphs");

    pub fn is_composed(&self) -> bool {
        matches!(self.kind, GlyphKind::Composed)
    }

    /// End points of a line glyph
    pub fn line_points(&self) -> Option<(Vec2, Vec2)> {
        match self.kind {
            GlyphKind::Line { start, end } => Some((start, end)),
            _ => None,
        }
    }
}

impl Scene {
    /// Creates a glyph together with its own space, optionally nested under
    /// `parent`. The region starts empty and shares the glyph's label.
    pub fn create_glyph(
        &mut self,
        label: impl Into<String>,
        kind: GlyphKind,
        parent: Option<Handle<AffineSpace>>,
    ) -> Result<Handle<Glyph>, SceneError> {
        let label = label.into();
        let space = self.create_space(parent)?;
        let glyph = self.insert(Glyph {
            region: Region {
                label: label.clone(),
                polygon: Polygon::default(),
            },
            label,
            kind,
        });
        self.set_link(glyph, Glyph::SPACE, Some(space))?;
        Ok(glyph)
    }

    pub fn glyph_space(&self, glyph: Handle<Glyph>) -> Result<Handle<AffineSpace>, SceneError> {
        self.required_link(glyph, Glyph::SPACE)
    }

    pub fn glyph_sprites(&self, glyph: Handle<Glyph>) -> Vec<Handle<Sprite>> {
        self.links(glyph, Glyph::SPRITES)
    }

    pub fn sub_glyphs(&self, glyph: Handle<Glyph>) -> Vec<Handle<Glyph>> {
        self.links(glyph, Glyph::SUB_GLYPHS)
    }

    /// Draws a bitmap into the glyph's space and appends it to its sprites
    pub fn add_sprite(
        &mut self,
        glyph: Handle<Glyph>,
        bitmap: Bitmap,
        transform: Transform,
    ) -> Result<Handle<Sprite>, SceneError> {
        let space = self.glyph_space(glyph)?;
        let sprite = self.create_sprite(space, bitmap, transform)?;
        self.push_link(glyph, Glyph::SPRITES, sprite)?;
        Ok(sprite)
    }

    /// Makes `sub_glyph` part of a composed glyph, nesting its space under
    /// the composed glyph's space
    pub fn add_sub_glyph(&mut self, composed: Handle<Glyph>, sub_glyph: Handle<Glyph>) -> Result<(), SceneError> {
        self.ensure_composed(composed)?;
        let composed_space = self.glyph_space(composed)?;
        let sub_space = self.glyph_space(sub_glyph)?;

        self.set_parent_space(sub_space, Some(composed_space))?;
        self.push_link(composed, Glyph::SUB_GLYPHS, sub_glyph)
    }

    /// Sets the sprites of a composed glyph to the sub-glyph sprites,
    /// concatenated in sub-glyph order
    pub fn aggregate_sprites(&mut self, composed: Handle<Glyph>) -> Result<(), SceneError> {
        self.ensure_composed(composed)?;
        let sprites: Vec<Handle<Sprite>> = self
            .sub_glyphs(composed)
            .into_iter()
            .flat_map(|sub_glyph| self.glyph_sprites(sub_glyph))
            .collect();
        self.set_links(composed, Glyph::SPRITES, sprites)
    }

    /// Takes the glyph out of the visual hierarchy and out of the notation.
    /// Its space becomes a root, it is no longer part of any composed glyph,
    /// its roles no longer point at the notes, chords or glyphs they stood
    /// for, and no augmentation dot counts it as an owner.
    pub fn detach_glyph(&mut self, glyph: Handle<Glyph>) -> Result<(), SceneError> {
        let space = self.glyph_space(glyph)?;
        self.set_parent_space(space, None)?;
        for composed in self.many_of(glyph, Glyph::SUB_GLYPHS)? {
            while self.remove_link(composed, Glyph::SUB_GLYPHS, glyph) {}
        }
        crate::visual::detach_roles(self, glyph)
    }

    fn ensure_composed(&self, glyph: Handle<Glyph>) -> Result<(), SceneError> {
        if self.try_get(glyph)?.is_composed() {
            Ok(())
        } else {
            Err(SceneError::GlyphKindMismatch {
                id: glyph.id(),
                expected: GlyphKind::Composed.name(),
            })
        }
    }
}

/// Outlines of a glyph in its own space.
///
/// Plain and line glyphs contribute their region; a composed glyph adds the
/// contours of every sub-glyph, transformed into the composed glyph's space.
pub fn glyph_contours(scene: &Scene, glyph: Handle<Glyph>) -> Result<Vec<Polygon>, SceneError> {
    let record = scene.try_get(glyph)?;
    let mut contours = Vec::new();
    if !record.region.polygon.is_empty() {
        contours.push(record.region.polygon.clone());
    }

    if let GlyphKind::Composed = record.kind {
        let space = scene.glyph_space(glyph)?;
        for sub_glyph in scene.sub_glyphs(glyph) {
            let transform = scene.transform_from(space, scene.glyph_space(sub_glyph)?)?;
            for contour in glyph_contours(scene, sub_glyph)? {
                contours.push(transform.apply_to_polygon(&contour));
            }
        }
    }

    Ok(contours)
}

/// Thickness of a line glyph's debug marker, in space units
const DEBUG_LINE_THICKNESS: f32 = 0.2;

/// Draws full-ink boxes over a glyph for visual inspection.
///
/// A plain glyph gets a box over its region, a line glyph a thin box along
/// its segment, and a composed glyph a box over its own region (if it has
/// one) followed by the overlay of every sub-glyph. The sprites live in the
/// glyph spaces but are not added to the glyphs' sprite lists.
pub fn glyph_debug_overlay(scene: &mut Scene, glyph: Handle<Glyph>) -> Result<Vec<Handle<Sprite>>, SceneError> {
    let space = scene.glyph_space(glyph)?;
    let record = scene.try_get(glyph)?;
    let region_bbox = record.region.polygon.bbox();
    let kind = record.kind;

    let mut overlay = Vec::new();
    match kind {
        GlyphKind::Plain => {
            let bounds = region_bbox.unwrap_or(Bounds::new(Vec2::ZERO, Vec2::ZERO));
            overlay.push(overlay_box(scene, space, bounds)?);
        }
        GlyphKind::Line { start, end } => {
            let direction = end - start;
            let transform = Transform::translation(0.0, -0.5)
                .then(&Transform::scale(direction.length(), DEBUG_LINE_THICKNESS))
                .then(&Transform::rotation(direction.y.atan2(direction.x)))
                .then(&Transform::translation(start.x, start.y));
            overlay.push(scene.create_sprite(space, Bitmap::filled(1, 1), transform)?);
        }
        GlyphKind::Composed => {
            if let Some(bounds) = region_bbox {
                overlay.push(overlay_box(scene, space, bounds)?);
            }
            for sub_glyph in scene.sub_glyphs(glyph) {
                overlay.extend(glyph_debug_overlay(scene, sub_glyph)?);
            }
        }
    }
    Ok(overlay)
}

fn overlay_box(scene: &mut Scene, space: Handle<AffineSpace>, bounds: Bounds) -> Result<Handle<Sprite>, SceneError> {
    let transform = Transform::scale(bounds.width(), bounds.height())
        .then(&Transform::translation(bounds.min.x, bounds.min.y));
    scene.create_sprite(space, Bitmap::filled(1, 1), transform)
}

/// Bounding box of a glyph expressed in `space`, which must be the glyph's
/// own space or one of its ancestors.
///
/// Uses the contours when there are any, otherwise the sprites, otherwise
/// the end points of a line glyph. A glyph with none of these collapses to
/// its origin.
pub fn glyph_bbox_in_space(
    scene: &Scene,
    glyph: Handle<Glyph>,
    space: Handle<AffineSpace>,
) -> Result<Bounds, SceneError> {
    let own_space = scene.glyph_space(glyph)?;
    let to_space = scene.transform_from(space, own_space)?;

    let contours = glyph_contours(scene, glyph)?;
    let contour_points = contours
        .iter()
        .flat_map(|contour| contour.points())
        .map(|p| to_space.apply(*p));
    if let Some(bounds) = Bounds::from_points(contour_points) {
        return Ok(bounds);
    }

    let mut sprite_bounds: Option<Bounds> = None;
    for sprite in scene.glyph_sprites(glyph) {
        let bounds = scene.sprite_bounds_in(space, sprite)?;
        sprite_bounds = Some(match sprite_bounds {
            Some(acc) => acc.union(&bounds),
            None => bounds,
        });
    }
    if let Some(bounds) = sprite_bounds {
        return Ok(bounds);
    }

    let record = scene.try_get(glyph)?;
    let points = match record.line_points() {
        Some((start, end)) => vec![to_space.apply(start), to_space.apply(end)],
        None => vec![to_space.apply(Vec2::ZERO)],
    };
    Ok(Bounds::from_points(points).unwrap_or(Bounds::new(Vec2::ZERO, Vec2::ZERO)))
}

/// Bounding box of a glyph in its own space
pub fn glyph_local_bbox(scene: &Scene, glyph: Handle<Glyph>) -> Result<Bounds, SceneError> {
    glyph_bbox_in_space(scene, glyph, scene.glyph_space(glyph)?)
}
