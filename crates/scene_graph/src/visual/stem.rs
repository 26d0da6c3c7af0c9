use glam::Vec2;

use crate::error::SceneError;
use crate::glyph::Glyph;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::semantic::Chord;
use crate::visual::GlyphRole;

/// Stem of a chord, drawn as a line glyph from base to tip
#[derive(Debug, Clone, Default)]
pub struct Stem;

impl SceneObject for Stem {
    const TYPE_NAME: &'static str = "Stem";
}

impl GlyphRole for Stem {
    const GLYPH: Field<Self, Glyph> = Field::new("glyph");

    fn clear_owner_links(scene: &mut Scene, role: Handle<Self>) {
        scene.clear_links(role, Self::CHORD);
    }
}

impl Stem {
    pub const CHORD: Field<Stem, Chord> = Field::new("chord");

    pub fn of_chord(scene: &Scene, chord: Handle<Chord>) -> Result<Option<Handle<Stem>>, SceneError> {
        scene.of_or_none(chord, Self::CHORD)
    }

    /// Base of the stem, in glyph space coordinates
    pub fn base(scene: &Scene, stem: Handle<Stem>) -> Result<Vec2, SceneError> {
        Ok(Self::line(scene, stem)?.0)
    }

    /// Tip of the stem, in glyph space coordinates
    pub fn tip(scene: &Scene, stem: Handle<Stem>) -> Result<Vec2, SceneError> {
        Ok(Self::line(scene, stem)?.1)
    }

    fn line(scene: &Scene, stem: Handle<Stem>) -> Result<(Vec2, Vec2), SceneError> {
        let glyph = Self::glyph(scene, stem)?;
        scene
            .try_get(glyph)?
            .line_points()
            .ok_or(SceneError::GlyphKindMismatch {
                id: glyph.id(),
                expected: "line",
            })
    }
}

/// Flag attached to the tip of a stem. A flag split into isolated strokes
/// uses a composed glyph.
#[derive(Debug, Clone, Default)]
pub struct Flag;

impl SceneObject for Flag {
    const TYPE_NAME: &'static str = "Flag";
}

impl GlyphRole for Flag {
    const GLYPH: Field<Self, Glyph> = Field::new("glyph");

    fn clear_owner_links(scene: &mut Scene, role: Handle<Self>) {
        scene.clear_links(role, Self::STEM);
    }
}

impl Flag {
    pub const STEM: Field<Flag, Stem> = Field::new("stem");

    pub fn of_stem(scene: &Scene, stem: Handle<Stem>) -> Result<Option<Handle<Flag>>, SceneError> {
        scene.of_or_none(stem, Self::STEM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphKind;

    #[test]
    fn test_stem_points_come_from_line_glyph() {
        let mut scene = Scene::new();
        let chord = scene.insert(Chord);
        let glyph = scene
            .create_glyph(
                "smufl::stem",
                GlyphKind::Line {
                    start: Vec2::new(0.0, 0.0),
                    end: Vec2::new(0.0, -7.0),
                },
                None,
            )
            .unwrap();
        let stem = Stem::attach(&mut scene, Stem, glyph).unwrap();
        scene.set_link(stem, Stem::CHORD, Some(chord)).unwrap();

        assert_eq!(Stem::of_chord(&scene, chord).unwrap(), Some(stem));
        assert_eq!(Stem::base(&scene, stem).unwrap(), Vec2::ZERO);
        assert_eq!(Stem::tip(&scene, stem).unwrap(), Vec2::new(0.0, -7.0));
    }

    #[test]
    fn test_plain_glyph_stem_is_rejected() {
        let mut scene = Scene::new();
        let glyph = scene.create_glyph("smufl::stem", GlyphKind::Plain, None).unwrap();
        let stem = Stem::attach(&mut scene, Stem, glyph).unwrap();

        assert!(matches!(
            Stem::tip(&scene, stem),
            Err(SceneError::GlyphKindMismatch { expected: "line", .. })
        ));
    }
}
