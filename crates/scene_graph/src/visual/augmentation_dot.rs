use crate::error::SceneError;
use crate::glyph::Glyph;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::visual::GlyphRole;

#[derive(Debug, Clone)]
pub struct AugmentationDot {
    /// Which dot of its owner this is, counting from 1
    pub augmentation_dot_index: u32,
    pub pitch_position: i32,
}

impl SceneObject for AugmentationDot {
    const TYPE_NAME: &'static str = "AugmentationDot";
}

impl GlyphRole for AugmentationDot {
    const GLYPH: Field<Self, Glyph> = Field::new("glyph");

    fn clear_owner_links(scene: &mut Scene, role: Handle<Self>) {
        scene.clear_links(role, Self::OWNERS);
    }
}

impl AugmentationDot {
    /// Glyphs (noteheads or rests) the dot belongs to. Dots in dense chords
    /// may be shared by several noteheads.
    pub const OWNERS: Field<AugmentationDot, Glyph> = Field::new("owners");

    pub fn owners(scene: &Scene, dot: Handle<AugmentationDot>) -> Vec<Handle<Glyph>> {
        scene.links(dot, Self::OWNERS)
    }

    pub fn many_of_owner(scene: &Scene, owner: Handle<Glyph>) -> Result<Vec<Handle<AugmentationDot>>, SceneError> {
        scene.many_of(owner, Self::OWNERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphKind;

    #[test]
    fn test_shared_dot_has_many_owners() {
        let mut scene = Scene::new();
        let first = scene.create_glyph("smufl::noteheadBlack", GlyphKind::Plain, None).unwrap();
        let second = scene.create_glyph("smufl::noteheadBlack", GlyphKind::Plain, None).unwrap();
        let dot_glyph = scene.create_glyph("smufl::augmentationDot", GlyphKind::Plain, None).unwrap();

        let dot = AugmentationDot::attach(
            &mut scene,
            AugmentationDot {
                augmentation_dot_index: 1,
                pitch_position: 1,
            },
            dot_glyph,
        )
        .unwrap();
        scene.push_link(dot, AugmentationDot::OWNERS, first).unwrap();
        scene.push_link(dot, AugmentationDot::OWNERS, second).unwrap();

        assert_eq!(AugmentationDot::owners(&scene, dot), vec![first, second]);
        assert_eq!(AugmentationDot::many_of_owner(&scene, second).unwrap(), vec![dot]);
    }
}
