//! Flattened placement output for renderers and dataset exporters.
//!
//! Walks a finished space tree and reports every glyph and sprite with its
//! geometry resolved into the root space.

use serde::Serialize;
use synth_core::{Bounds, Transform};

use crate::error::SceneError;
use crate::glyph::{glyph_bbox_in_space, Glyph};
use crate::scene::{Handle, ObjectId, Scene};
use crate::space::{walk_space, AffineSpace, SpaceVisitor};
use crate::sprite::Sprite;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedGlyph {
    pub id: u64,
    pub label: String,
    pub bbox: Bounds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedSprite {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    /// Maps bitmap pixels into root space
    pub transform: Transform,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Placements {
    pub glyphs: Vec<PlacedGlyph>,
    pub sprites: Vec<PlacedSprite>,
}

struct PlacementCollector {
    root: Handle<AffineSpace>,
    /// Current space to root
    to_root: Transform,
    placements: Placements,
}

impl SpaceVisitor for PlacementCollector {
    fn create_sub_visitor(&self, scene: &Scene, sub_space: Handle<AffineSpace>) -> Self {
        let edge = scene.get(sub_space).map(|s| s.transform).unwrap_or_default();
        PlacementCollector {
            root: self.root,
            to_root: edge.then(&self.to_root),
            placements: Placements::default(),
        }
    }

    fn accept_sub_visitor(&mut self, _scene: &Scene, sub_visitor: Self) {
        self.placements.glyphs.extend(sub_visitor.placements.glyphs);
        self.placements.sprites.extend(sub_visitor.placements.sprites);
    }

    fn visit_object(&mut self, scene: &Scene, object: ObjectId) -> Result<(), SceneError> {
        if let Some(glyph) = scene.downcast::<Glyph>(object) {
            let record = scene.try_get(glyph)?;
            self.placements.glyphs.push(PlacedGlyph {
                id: object.as_u64(),
                label: record.label.clone(),
                bbox: glyph_bbox_in_space(scene, glyph, self.root)?,
            });
        } else if let Some(sprite) = scene.downcast::<Sprite>(object) {
            let record = scene.try_get(sprite)?;
            self.placements.sprites.push(PlacedSprite {
                id: object.as_u64(),
                width: record.bitmap.width(),
                height: record.bitmap.height(),
                transform: record.transform.then(&self.to_root),
            });
        }
        Ok(())
    }
}

/// Every glyph and sprite under `root`, in hierarchy order
pub fn collect_placements(scene: &Scene, root: Handle<AffineSpace>) -> Result<Placements, SceneError> {
    let mut collector = PlacementCollector {
        root,
        to_root: Transform::identity(),
        placements: Placements::default(),
    };
    walk_space(scene, root, &mut collector)?;
    Ok(collector.placements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphKind;
    use crate::sprite::Bitmap;
    use glam::Vec2;

    #[test]
    fn test_collects_nested_glyphs_in_root_space() {
        let mut scene = Scene::new();
        let page = scene.create_space(None).unwrap();
        let staff = scene.create_space(Some(page)).unwrap();
        scene.set_transform(staff, Transform::translation(0.0, 20.0)).unwrap();

        let glyph = scene.create_glyph("smufl::noteheadBlack", GlyphKind::Plain, Some(staff)).unwrap();
        let glyph_space = scene.glyph_space(glyph).unwrap();
        scene.set_transform(glyph_space, Transform::translation(5.0, 0.0)).unwrap();
        scene
            .add_sprite(glyph, Bitmap::filled(2, 2), Transform::scale(0.5, 0.5))
            .unwrap();

        let placements = collect_placements(&scene, page).unwrap();

        assert_eq!(placements.glyphs.len(), 1);
        assert_eq!(placements.glyphs[0].label, "smufl::noteheadBlack");
        assert_eq!(
            placements.glyphs[0].bbox,
            Bounds::new(Vec2::new(5.0, 20.0), Vec2::new(6.0, 21.0))
        );
        assert_eq!(placements.sprites.len(), 1);
        assert_eq!(placements.sprites[0].transform.apply(Vec2::new(2.0, 2.0)), Vec2::new(6.0, 21.0));
    }

    #[test]
    fn test_detached_glyphs_are_not_collected() {
        let mut scene = Scene::new();
        let page = scene.create_space(None).unwrap();
        let glyph = scene.create_glyph("a", GlyphKind::Plain, Some(page)).unwrap();
        scene.detach_glyph(glyph).unwrap();

        let placements = collect_placements(&scene, page).unwrap();
        assert!(placements.glyphs.is_empty());
        assert!(serde_json::to_string(&placements).unwrap().contains("\"glyphs\":[]"));
    }
}
