//! # Accidentals
//!
//! Accidentals of a column are stacked leftward from the column origin, one
//! staff at a time. A [`Skyline`] running along the staff's vertical axis
//! records how far left each height is already taken. It starts out with
//! the noteheads and stems of the staff, so an accidental clears everything
//! at its height, and every accidental dropped in raises the skyline for the
//! ones after it.

use rand::RngCore;
use scene_graph::semantic::AccidentalValue;
use scene_graph::visual::{Accidental, GlyphRole, Notehead, StaffVisual, Stem};
use scene_graph::{glyph_local_bbox, Handle, Scene, SmuflLabel};

use crate::column::{glyph_bbox_in_staff, place_glyph, Column, SynthesisContext};
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::skyline::Skyline;

/// Synthesizes the accidental glyph for a notehead, on the notehead's staff
pub fn synthesize_accidental(
    scene: &mut Scene,
    context: &SynthesisContext,
    column: &mut Column,
    notehead: Handle<Notehead>,
    value: AccidentalValue,
    rng: &mut dyn RngCore,
) -> Result<Handle<Accidental>, LayoutError> {
    let staff = Notehead::stafflines(scene, notehead)?;
    let label = SmuflLabel::accidental_from_value(value);
    let glyph = context.glyph_on_staff(scene, label.as_str(), staff, rng)?;

    let accidental = Accidental::attach(scene, Accidental, glyph)?;
    scene.set_link(accidental, Accidental::NOTEHEAD, Some(notehead))?;
    column.add_accidental(scene, accidental)?;
    Ok(accidental)
}

pub(crate) fn place_accidentals(
    scene: &mut Scene,
    column: &Column,
    config: &LayoutConfig,
    rng: &mut dyn RngCore,
) -> Result<(), LayoutError> {
    for &staff in &column.staves {
        place_staff_accidentals(scene, column, staff, config, rng)?;
    }
    Ok(())
}

fn place_staff_accidentals(
    scene: &mut Scene,
    column: &Column,
    staff: Handle<StaffVisual>,
    config: &LayoutConfig,
    rng: &mut dyn RngCore,
) -> Result<(), LayoutError> {
    // (accidental, its notehead's pitch position)
    let mut accidentals = Vec::new();
    for &accidental in &column.accidentals {
        let notehead = Accidental::notehead(scene, accidental)?;
        if Notehead::stafflines(scene, notehead)? == staff {
            accidentals.push((accidental, scene.try_get(notehead)?.pitch_position));
        }
    }
    if accidentals.is_empty() {
        return Ok(());
    }
    // top of the staff first
    accidentals.sort_by(|a, b| b.1.cmp(&a.1));

    let origin_x = scene.try_get(staff)?.origin_x(column.time_position);
    let mut skyline = Skyline::new(0.0);
    for &notehead in &column.noteheads {
        if Notehead::stafflines(scene, notehead)? != staff {
            continue;
        }
        let bbox = glyph_bbox_in_staff(scene, Notehead::glyph(scene, notehead)?, staff)?;
        skyline.overlay_box(bbox.top(), bbox.bottom(), origin_x - bbox.left());
    }
    for &stem in &column.stems {
        let glyph = Stem::glyph(scene, stem)?;
        if column.stafflines_of_glyph(scene, glyph)? != staff {
            continue;
        }
        let bbox = glyph_bbox_in_staff(scene, glyph, staff)?;
        skyline.overlay_box(bbox.top(), bbox.bottom(), origin_x - bbox.left());
    }

    for (accidental, pitch_position) in accidentals {
        let glyph = Accidental::glyph(scene, accidental)?;
        let local = glyph_local_bbox(scene, glyph)?;

        // provisional placement gives the vertical extent on the staff
        let provisional = scene
            .try_get(staff)?
            .coordinate_system
            .get_transform(pitch_position, column.time_position);
        place_glyph(scene, glyph, provisional)?;
        let bbox = glyph_bbox_in_staff(scene, glyph, staff)?;

        let thickness = local.width() + config.accidental_spacing.sample(rng);
        let top = skyline.drop_box(bbox.top(), bbox.bottom(), thickness);

        let transform = scene
            .try_get(staff)?
            .coordinate_system
            .get_transform(pitch_position, column.time_position - top - local.left());
        place_glyph(scene, glyph, transform)?;
        log::trace!(
            "accidental {} at {} lands {:.2} left of the column",
            accidental.id(),
            pitch_position,
            top
        );
    }
    Ok(())
}
