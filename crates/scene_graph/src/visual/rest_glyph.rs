use crate::error::SceneError;
use crate::glyph::Glyph;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::semantic::{Clef, Durable, Pitch, TypeDuration};
use crate::visual::staff::StaffVisual;
use crate::visual::GlyphRole;

#[derive(Debug, Clone)]
pub struct RestGlyph {
    /// Pitch position of the glyph origin: the line a whole rest hangs
    /// from, the line a half rest sits on, the center otherwise
    pub pitch_position: i32,
    pub clef: Clef,
}

impl SceneObject for RestGlyph {
    const TYPE_NAME: &'static str = "RestGlyph";
}

impl GlyphRole for RestGlyph {
    const GLYPH: Field<Self, Glyph> = Field::new("glyph");

    fn clear_owner_links(scene: &mut Scene, role: Handle<Self>) {
        scene.clear_links(role, Self::REST);
    }
}

impl RestGlyph {
    pub const REST: Field<RestGlyph, Durable> = Field::new("rest");
    pub const STAFFLINES: Field<RestGlyph, StaffVisual> = Field::new("stafflines");

    pub fn rest(scene: &Scene, rest_glyph: Handle<RestGlyph>) -> Result<Handle<Durable>, SceneError> {
        scene.required_link(rest_glyph, Self::REST)
    }

    pub fn stafflines(scene: &Scene, rest_glyph: Handle<RestGlyph>) -> Result<Handle<StaffVisual>, SceneError> {
        scene.required_link(rest_glyph, Self::STAFFLINES)
    }

    pub fn of_rest(scene: &Scene, rest: Handle<Durable>) -> Result<Option<Handle<RestGlyph>>, SceneError> {
        scene.of_or_none(rest, Self::REST)
    }

    /// Where a rest goes when the score doesn't say: the middle staff line
    pub fn default_display_pitch(clef: &Clef, _type_duration: TypeDuration) -> Pitch {
        clef.pitch_at(0)
    }

    /// Pitch position of the glyph origin for a rest displayed at
    /// `display_pitch`. A whole rest hangs from the line above its
    /// display position.
    pub fn display_pitch_to_glyph_pitch_position(clef: &Clef, display_pitch: &Pitch, type_duration: TypeDuration) -> i32 {
        let pitch_position = clef.pitch_position(display_pitch);
        match type_duration {
            TypeDuration::Whole => pitch_position + 2,
            _ => pitch_position,
        }
    }
}
