use crate::error::SceneError;
use crate::glyph::Glyph;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::visual::notehead::Notehead;
use crate::visual::GlyphRole;

/// Accidental glyph placed in front of a notehead
#[derive(Debug, Clone, Default)]
pub struct Accidental;

impl SceneObject for Accidental {
    const TYPE_NAME: &'static str = "Accidental";
}

impl GlyphRole for Accidental {
    const GLYPH: Field<Self, Glyph> = Field::new("glyph");

    fn clear_owner_links(scene: &mut Scene, role: Handle<Self>) {
        scene.clear_links(role, Self::NOTEHEAD);
    }
}

impl Accidental {
    pub const NOTEHEAD: Field<Accidental, Notehead> = Field::new("notehead");

    pub fn notehead(scene: &Scene, accidental: Handle<Accidental>) -> Result<Handle<Notehead>, SceneError> {
        scene.required_link(accidental, Self::NOTEHEAD)
    }

    pub fn of_notehead(scene: &Scene, notehead: Handle<Notehead>) -> Result<Option<Handle<Accidental>>, SceneError> {
        scene.of_or_none(notehead, Self::NOTEHEAD)
    }
}
