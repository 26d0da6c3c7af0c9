use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::glyph::Glyph;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::semantic::{Clef, Durable};
use crate::visual::staff::StaffVisual;
use crate::visual::GlyphRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteheadSide {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Notehead {
    /// Pitch position on the stafflines
    pub pitch_position: i32,
    pub clef: Clef,
    /// Side an up-pointing stem attaches to. `None` means such a stem must
    /// never be attached.
    pub up_stem_attachment_side: Option<NoteheadSide>,
    pub down_stem_attachment_side: Option<NoteheadSide>,
}

impl SceneObject for Notehead {
    const TYPE_NAME: &'static str = "Notehead";
}

impl GlyphRole for Notehead {
    const GLYPH: Field<Self, Glyph> = Field::new("glyph");

    fn clear_owner_links(scene: &mut Scene, role: Handle<Self>) {
        scene.clear_links(role, Self::NOTES);
    }
}

impl Notehead {
    /// Notes represented by this notehead (typically just one)
    pub const NOTES: Field<Notehead, Durable> = Field::new("notes");
    pub const STAFFLINES: Field<Notehead, StaffVisual> = Field::new("stafflines");

    pub fn new(pitch_position: i32, clef: Clef) -> Self {
        Self {
            pitch_position,
            clef,
            up_stem_attachment_side: Some(NoteheadSide::Right),
            down_stem_attachment_side: Some(NoteheadSide::Left),
        }
    }

    /// Horizontal side a stem in the given direction attaches to
    pub fn stem_side(&self, stem_up: bool) -> Option<NoteheadSide> {
        if stem_up {
            self.up_stem_attachment_side
        } else {
            self.down_stem_attachment_side
        }
    }

    pub fn of_note(scene: &Scene, note: Handle<Durable>) -> Result<Option<Handle<Notehead>>, SceneError> {
        scene.of_or_none(note, Self::NOTES)
    }

    pub fn stafflines(scene: &Scene, notehead: Handle<Notehead>) -> Result<Handle<StaffVisual>, SceneError> {
        scene.required_link(notehead, Self::STAFFLINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphKind;
    use crate::semantic::{Pitch, Step, TypeDuration};
    use crate::visual::{Accidental, AugmentationDot};

    #[test]
    fn test_notehead_links() {
        let mut scene = Scene::new();
        let note = scene.insert(Durable::note(TypeDuration::Quarter, Pitch::new(Step::B, 4)));
        let other = scene.insert(Durable::note(TypeDuration::Quarter, Pitch::new(Step::C, 5)));
        let glyph = scene.create_glyph("smufl::noteheadBlack", GlyphKind::Plain, None).unwrap();

        let notehead = Notehead::attach(&mut scene, Notehead::new(0, Clef::TREBLE), glyph).unwrap();
        scene.push_link(notehead, Notehead::NOTES, note).unwrap();

        assert_eq!(Notehead::of_note(&scene, note).unwrap(), Some(notehead));
        assert_eq!(Notehead::of_note(&scene, other).unwrap(), None);
        assert_eq!(Notehead::of_glyph(&scene, glyph).unwrap(), Some(notehead));
        assert_eq!(Notehead::glyph(&scene, notehead).unwrap(), glyph);
        assert!(Notehead::stafflines(&scene, notehead).is_err());
    }

    #[test]
    fn test_default_stem_sides() {
        let notehead = Notehead::new(3, Clef::BASS);
        assert_eq!(notehead.stem_side(true), Some(NoteheadSide::Right));
        assert_eq!(notehead.stem_side(false), Some(NoteheadSide::Left));
    }

    #[test]
    fn test_detached_notehead_glyph_leaves_the_notation() {
        let mut scene = Scene::new();
        let note = scene.insert(Durable::note(TypeDuration::Quarter, Pitch::new(Step::G, 4)));
        let glyph = scene.create_glyph("smufl::noteheadBlack", GlyphKind::Plain, None).unwrap();
        let notehead = Notehead::attach(&mut scene, Notehead::new(-2, Clef::TREBLE), glyph).unwrap();
        scene.push_link(notehead, Notehead::NOTES, note).unwrap();

        let sharp_glyph = scene.create_glyph("smufl::accidentalSharp", GlyphKind::Plain, None).unwrap();
        let sharp = Accidental::attach(&mut scene, Accidental, sharp_glyph).unwrap();
        scene.set_link(sharp, Accidental::NOTEHEAD, Some(notehead)).unwrap();

        let dot_glyph = scene.create_glyph("smufl::augmentationDot", GlyphKind::Plain, None).unwrap();
        let dot = AugmentationDot::attach(
            &mut scene,
            AugmentationDot {
                augmentation_dot_index: 1,
                pitch_position: -1,
            },
            dot_glyph,
        )
        .unwrap();
        scene.push_link(dot, AugmentationDot::OWNERS, glyph).unwrap();

        scene.detach_glyph(glyph).unwrap();

        assert_eq!(Notehead::of_note(&scene, note).unwrap(), None);
        assert!(AugmentationDot::many_of_owner(&scene, glyph).unwrap().is_empty());
        assert!(AugmentationDot::owners(&scene, dot).is_empty());
        // the role keeps its glyph, and roles of other glyphs keep their links
        assert_eq!(Notehead::of_glyph(&scene, glyph).unwrap(), Some(notehead));
        assert_eq!(Accidental::notehead(&scene, sharp).unwrap(), notehead);

        scene.detach_glyph(sharp_glyph).unwrap();
        assert_eq!(Accidental::of_notehead(&scene, notehead).unwrap(), None);
    }
}
