//! Visual roles.
//!
//! A role object gives a glyph its notation meaning (a notehead, a stem, an
//! augmentation dot) and carries the role-specific links back to the
//! semantic score. The glyph itself stays a plain [`Glyph`] record.

pub mod accidental;
pub mod augmentation_dot;
pub mod ledger_line;
pub mod notehead;
pub mod rest_glyph;
pub mod staff;
pub mod stem;

pub use accidental::Accidental;
pub use augmentation_dot::AugmentationDot;
pub use ledger_line::LedgerLine;
pub use notehead::{Notehead, NoteheadSide};
pub use rest_glyph::RestGlyph;
pub use staff::{LinearStaffCoordinateSystem, StaffCoordinateSystem, StaffVisual};
pub use stem::{Flag, Stem};

use crate::error::SceneError;
use crate::glyph::Glyph;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::space::AffineSpace;

/// A scene object that decorates exactly one glyph
pub trait GlyphRole: SceneObject + Sized {
    const GLYPH: Field<Self, Glyph>;

    /// Drops the role's links to the objects it represents
    fn clear_owner_links(scene: &mut Scene, role: Handle<Self>);

    /// Stores the role and links it to its glyph
    fn attach(scene: &mut Scene, role: Self, glyph: Handle<Glyph>) -> Result<Handle<Self>, SceneError> {
        let role = scene.insert(role);
        scene.set_link(role, Self::GLYPH, Some(glyph))?;
        Ok(role)
    }

    fn glyph(scene: &Scene, role: Handle<Self>) -> Result<Handle<Glyph>, SceneError> {
        scene.required_link(role, Self::GLYPH)
    }

    /// The space of the role's glyph
    fn space(scene: &Scene, role: Handle<Self>) -> Result<Handle<AffineSpace>, SceneError> {
        scene.glyph_space(Self::glyph(scene, role)?)
    }

    fn of_glyph(scene: &Scene, glyph: Handle<Glyph>) -> Result<Option<Handle<Self>>, SceneError> {
        scene.of_or_none(glyph, Self::GLYPH)
    }
}

fn detach_role<R: GlyphRole>(scene: &mut Scene, glyph: Handle<Glyph>) -> Result<(), SceneError> {
    for role in scene.many_of(glyph, R::GLYPH)? {
        R::clear_owner_links(scene, role);
    }
    Ok(())
}

/// Unlinks every role of `glyph` from what it represents, and the glyph
/// from every dot that counts it as an owner. The role objects stay linked
/// to the glyph.
pub(crate) fn detach_roles(scene: &mut Scene, glyph: Handle<Glyph>) -> Result<(), SceneError> {
    detach_role::<Notehead>(scene, glyph)?;
    detach_role::<Accidental>(scene, glyph)?;
    detach_role::<AugmentationDot>(scene, glyph)?;
    detach_role::<RestGlyph>(scene, glyph)?;
    detach_role::<Stem>(scene, glyph)?;
    detach_role::<Flag>(scene, glyph)?;
    detach_role::<LedgerLine>(scene, glyph)?;

    for dot in AugmentationDot::many_of_owner(scene, glyph)? {
        while scene.remove_link(dot, AugmentationDot::OWNERS, glyph) {}
    }
    Ok(())
}
