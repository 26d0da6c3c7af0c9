//! Rests and the ledger lines of whole and half rests outside the staff.

use glam::Vec2;
use rand::RngCore;
use scene_graph::semantic::{Durable, TypeDuration};
use scene_graph::visual::{GlyphRole, LedgerLine, RestGlyph};
use scene_graph::{glyph_local_bbox, Handle, Scene, SmuflLabel, SynthLabel};

use crate::column::{place_glyph, Column, SynthesisContext};
use crate::error::LayoutError;

/// Synthesizes the glyph of one rest, resolving its pitch position from the
/// display pitch or, without one, the clef's default
pub fn synthesize_rest(
    scene: &mut Scene,
    context: &SynthesisContext,
    column: &mut Column,
    rest: Handle<Durable>,
    rng: &mut dyn RngCore,
) -> Result<Handle<RestGlyph>, LayoutError> {
    let staff = context.staff_of_durable(scene, rest)?;
    let clef = context.clef_of_durable(scene, rest)?;

    let record = scene.try_get(rest)?;
    if !record.is_rest() {
        return Err(LayoutError::UnexpectedDurable {
            id: rest.id(),
            expected: "rest",
        });
    }
    let type_duration = record.type_duration;
    let display_pitch = record
        .display_pitch()
        .unwrap_or_else(|| RestGlyph::default_display_pitch(&clef, type_duration));
    let pitch_position = RestGlyph::display_pitch_to_glyph_pitch_position(&clef, &display_pitch, type_duration);

    let label = SmuflLabel::rest_from_type_duration(type_duration);
    let glyph = context.glyph_on_staff(scene, label.as_str(), staff, rng)?;
    let rest_glyph = RestGlyph::attach(scene, RestGlyph { pitch_position, clef }, glyph)?;
    scene.set_link(rest_glyph, RestGlyph::REST, Some(rest))?;
    scene.set_link(rest_glyph, RestGlyph::STAFFLINES, Some(staff))?;
    column.add_rest(scene, rest_glyph)?;

    if needs_ledger_line(type_duration, pitch_position) {
        let width = glyph_local_bbox(scene, glyph)?.width() * context.config.ledger_line_width_factor.sample(rng);
        let line = context.line_synthesizer.synthesize_line(
            scene,
            SynthLabel::LedgerLine.as_str(),
            Vec2::new(-width / 2.0, 0.0),
            Vec2::new(width / 2.0, 0.0),
            rng,
        )?;
        // lives in the rest's space and moves with it
        let line_space = scene.glyph_space(line)?;
        let rest_space = scene.glyph_space(glyph)?;
        scene.set_parent_space(line_space, Some(rest_space))?;
        let ledger_line = LedgerLine::attach(scene, LedgerLine { pitch_position }, line)?;
        scene.set_link(ledger_line, LedgerLine::AFFECTED_REST, Some(rest_glyph))?;
        log::trace!("ledger line for rest {} at {}", rest.id(), pitch_position);
    }

    Ok(rest_glyph)
}

/// Whole and half rests hang on or sit on a line; past the staff that line
/// has to be drawn
pub fn needs_ledger_line(type_duration: TypeDuration, pitch_position: i32) -> bool {
    matches!(type_duration, TypeDuration::Whole | TypeDuration::Half) && pitch_position.abs() > 4
}

pub(crate) fn place_rests(scene: &mut Scene, column: &Column) -> Result<(), LayoutError> {
    for &rest_glyph in &column.rest_glyphs {
        let record = scene.try_get(rest_glyph)?;
        let pitch_position = record.pitch_position;
        let staff = RestGlyph::stafflines(scene, rest_glyph)?;
        let transform = scene
            .try_get(staff)?
            .coordinate_system
            .get_transform(pitch_position, column.time_position);
        let glyph = RestGlyph::glyph(scene, rest_glyph)?;
        place_glyph(scene, glyph, transform)?;
    }
    Ok(())
}
