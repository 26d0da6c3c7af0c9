use crate::error::SceneError;
use crate::glyph::Glyph;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::visual::notehead::Notehead;
use crate::visual::rest_glyph::RestGlyph;
use crate::visual::GlyphRole;

/// Short line extending the staff for a notehead or rest outside it
#[derive(Debug, Clone, Default)]
pub struct LedgerLine {
    /// Staff position the line sits on, always even
    pub pitch_position: i32,
}

impl SceneObject for LedgerLine {
    const TYPE_NAME: &'static str = "LedgerLine";
}

impl GlyphRole for LedgerLine {
    const GLYPH: Field<Self, Glyph> = Field::new("glyph");

    fn clear_owner_links(scene: &mut Scene, role: Handle<Self>) {
        scene.clear_links(role, Self::AFFECTED_NOTEHEADS);
        scene.clear_links(role, Self::AFFECTED_REST);
    }
}

impl LedgerLine {
    pub const AFFECTED_NOTEHEADS: Field<LedgerLine, Notehead> = Field::new("affected_noteheads");
    pub const AFFECTED_REST: Field<LedgerLine, RestGlyph> = Field::new("affected_rest");

    pub fn affected_noteheads(scene: &Scene, ledger_line: Handle<LedgerLine>) -> Vec<Handle<Notehead>> {
        scene.links(ledger_line, Self::AFFECTED_NOTEHEADS)
    }

    /// Ledger lines crossing or supporting a notehead
    pub fn many_of_notehead(scene: &Scene, notehead: Handle<Notehead>) -> Result<Vec<Handle<LedgerLine>>, SceneError> {
        scene.many_of(notehead, Self::AFFECTED_NOTEHEADS)
    }

    pub fn of_rest(scene: &Scene, rest_glyph: Handle<RestGlyph>) -> Result<Option<Handle<LedgerLine>>, SceneError> {
        scene.of_or_none(rest_glyph, Self::AFFECTED_REST)
    }

    /// Staff positions that need a ledger line for something drawn at
    /// `pitch_position`, nearest to the staff first. Lines sit on even
    /// positions beyond the outer staff lines at -4 and 4.
    pub fn positions_for(pitch_position: i32) -> Vec<i32> {
        if pitch_position >= 6 {
            (6..=pitch_position).step_by(2).collect()
        } else if pitch_position <= -6 {
            (pitch_position..=-6)
                .rev()
                .filter(|p| p % 2 == 0)
                .collect()
        } else {
            Vec::new()
        }
    }
}
