//! Noteheads, stems, flags and the ledger lines of a chord.

use glam::Vec2;
use rand::RngCore;
use scene_graph::semantic::Chord;
use scene_graph::visual::{Flag, GlyphRole, LedgerLine, Notehead, NoteheadSide, StaffVisual, Stem};
use scene_graph::{glyph_local_bbox, Glyph, Handle, Scene, SmuflLabel, SynthLabel};
use synth_core::{Bounds, Transform};

use crate::accidentals::synthesize_accidental;
use crate::column::{place_glyph, Column, SynthesisContext};
use crate::error::LayoutError;

/// Synthesizes the noteheads of a chord, with their accidentals, the stem
/// and flag when the duration has them, and ledger lines for noteheads
/// outside the staff.
pub fn synthesize_chord(
    scene: &mut Scene,
    context: &SynthesisContext,
    column: &mut Column,
    chord: Handle<Chord>,
    rng: &mut dyn RngCore,
) -> Result<(), LayoutError> {
    let notes = scene.links(chord, Chord::NOTES);
    let Some(first) = notes.first().copied() else {
        return Ok(());
    };
    let staff = context.staff_of_durable(scene, first)?;
    let clef = context.clef_of_durable(scene, first)?;
    let type_duration = scene.try_get(first)?.type_duration;
    let staff_root = StaffVisual::space(scene, staff)?;

    let mut noteheads = Vec::with_capacity(notes.len());
    for note in notes {
        let durable = scene.try_get(note)?;
        let pitch = durable.pitch().ok_or(LayoutError::UnexpectedDurable {
            id: note.id(),
            expected: "note",
        })?;
        let accidental = durable.accidental();
        let pitch_position = clef.pitch_position(&pitch);

        let label = SmuflLabel::notehead_from_type_duration(durable.type_duration);
        let glyph = context.glyph_on_staff(scene, label.as_str(), staff, rng)?;
        let notehead = Notehead::attach(scene, Notehead::new(pitch_position, clef), glyph)?;
        scene.push_link(notehead, Notehead::NOTES, note)?;
        scene.set_link(notehead, Notehead::STAFFLINES, Some(staff))?;
        column.add_notehead(scene, notehead)?;

        if let Some(value) = accidental {
            synthesize_accidental(scene, context, column, notehead, value, rng)?;
        }
        noteheads.push((notehead, glyph, pitch_position));
    }

    let staff_space = scene.try_get(staff)?.coordinate_system.staff_space();
    let lowest = noteheads.iter().map(|(_, _, p)| *p).min().unwrap_or(0);
    let highest = noteheads.iter().map(|(_, _, p)| *p).max().unwrap_or(0);

    if type_duration.has_stem() {
        let pitch_positions: Vec<i32> = noteheads.iter().map(|(_, _, p)| *p).collect();
        let stem_up = stem_points_up(&pitch_positions);
        let length = (highest - lowest) as f32 * staff_space / 2.0 + context.config.stem_length * staff_space;
        let tip = Vec2::new(0.0, if stem_up { -length } else { length });

        let stem_glyph = context
            .line_synthesizer
            .synthesize_line(scene, SmuflLabel::Stem.as_str(), Vec2::ZERO, tip, rng)?;
        let stem_space = scene.glyph_space(stem_glyph)?;
        scene.set_parent_space(stem_space, Some(staff_root))?;
        let stem = Stem::attach(scene, Stem, stem_glyph)?;
        scene.set_link(stem, Stem::CHORD, Some(chord))?;
        column.add_stem(scene, stem)?;

        if let Some(label) = SmuflLabel::flag_from_type_duration(type_duration, stem_up) {
            let flag_glyph = context.glyph_synthesizer.synthesize_glyph(scene, label.as_str(), rng)?;
            let flag_space = scene.glyph_space(flag_glyph)?;
            scene.set_parent_space(flag_space, Some(stem_space))?;
            place_glyph(scene, flag_glyph, Transform::translation(tip.x, tip.y))?;

            let flag = Flag::attach(scene, Flag, flag_glyph)?;
            scene.set_link(flag, Flag::STEM, Some(stem))?;
        }
    }

    let notehead_width = noteheads.iter().try_fold(0.0f32, |width, (_, glyph, _)| {
        Ok::<f32, LayoutError>(width.max(glyph_local_bbox(scene, *glyph)?.width()))
    })?;
    let positions = LedgerLine::positions_for(highest.max(0))
        .into_iter()
        .chain(LedgerLine::positions_for(lowest.min(0)));
    for position in positions {
        let affected: Vec<Handle<Notehead>> = noteheads
            .iter()
            .filter(|(_, _, p)| if position > 0 { *p >= position } else { *p <= position })
            .map(|(notehead, _, _)| *notehead)
            .collect();

        let half_width = notehead_width * context.config.ledger_line_width_factor.sample(rng) / 2.0;
        let glyph = context.line_synthesizer.synthesize_line(
            scene,
            SynthLabel::LedgerLine.as_str(),
            Vec2::new(-half_width, 0.0),
            Vec2::new(half_width, 0.0),
            rng,
        )?;
        let glyph_space = scene.glyph_space(glyph)?;
        scene.set_parent_space(glyph_space, Some(staff_root))?;
        let ledger_line = LedgerLine::attach(
            scene,
            LedgerLine {
                pitch_position: position,
            },
            glyph,
        )?;
        scene.set_links(ledger_line, LedgerLine::AFFECTED_NOTEHEADS, affected)?;
        column.add_ledger_line(scene, ledger_line)?;
    }

    log::trace!(
        "synthesized chord {} with {} noteheads between {} and {}",
        chord.id(),
        noteheads.len(),
        lowest,
        highest
    );
    Ok(())
}

/// Stems go down when the noteheads sit above the middle line on average
pub fn stem_points_up(pitch_positions: &[i32]) -> bool {
    pitch_positions.iter().sum::<i32>() < 0
}

/// Horizontal offsets that keep noteheads a second apart from overlapping.
///
/// `pitch_positions` must be sorted ascending. Walking away from the stem
/// base, a notehead one step from a notehead that stayed in place moves to
/// the other side of the stem.
pub fn seconds_offsets(pitch_positions: &[i32], stem_up: bool, notehead_width: f32) -> Vec<f32> {
    let mut offsets = vec![0.0; pitch_positions.len()];
    let order: Vec<usize> = if stem_up {
        (0..pitch_positions.len()).collect()
    } else {
        (0..pitch_positions.len()).rev().collect()
    };

    let mut previous: Option<(i32, bool)> = None;
    for i in order {
        let pitch_position = pitch_positions[i];
        let displaced = matches!(previous, Some((p, false)) if (pitch_position - p).abs() == 1);
        if displaced {
            offsets[i] = if stem_up { notehead_width } else { -notehead_width };
        }
        previous = Some((pitch_position, displaced));
    }
    offsets
}

struct PlacedHead {
    notehead: Handle<Notehead>,
    glyph: Handle<Glyph>,
    pitch_position: i32,
    bbox: Bounds,
    stem_side: [Option<NoteheadSide>; 2],
}

/// Places the column's noteheads chord by chord, then their stems and
/// ledger lines
pub(crate) fn place_noteheads(scene: &mut Scene, column: &Column) -> Result<(), LayoutError> {
    let mut groups: Vec<(Option<Handle<Chord>>, Vec<Handle<Notehead>>)> = Vec::new();
    for &notehead in &column.noteheads {
        let chord = match scene.link(notehead, Notehead::NOTES) {
            Some(note) => Chord::of_note(scene, note)?,
            None => None,
        };
        match groups.iter_mut().find(|(c, _)| c.is_some() && *c == chord) {
            Some((_, members)) => members.push(notehead),
            None => groups.push((chord, vec![notehead])),
        }
    }

    for (chord, noteheads) in groups {
        place_chord(scene, column.time_position, chord, &noteheads)?;
    }
    Ok(())
}

fn place_chord(
    scene: &mut Scene,
    time_position: f32,
    chord: Option<Handle<Chord>>,
    noteheads: &[Handle<Notehead>],
) -> Result<(), LayoutError> {
    let Some(first) = noteheads.first() else {
        return Ok(());
    };
    let staff = Notehead::stafflines(scene, *first)?;

    let mut heads = Vec::with_capacity(noteheads.len());
    for &notehead in noteheads {
        let record = scene.try_get(notehead)?;
        let glyph = Notehead::glyph(scene, notehead)?;
        heads.push(PlacedHead {
            notehead,
            glyph,
            pitch_position: record.pitch_position,
            bbox: glyph_local_bbox(scene, glyph)?,
            stem_side: [record.stem_side(false), record.stem_side(true)],
        });
    }
    heads.sort_by_key(|head| head.pitch_position);

    let stem = match chord {
        Some(chord) => Stem::of_chord(scene, chord)?,
        None => None,
    };
    let pitch_positions: Vec<i32> = heads.iter().map(|head| head.pitch_position).collect();
    let stem_up = match stem {
        Some(stem) => Stem::tip(scene, stem)?.y < Stem::base(scene, stem)?.y,
        None => stem_points_up(&pitch_positions),
    };
    let width = heads.iter().map(|head| head.bbox.width()).fold(0.0, f32::max);
    let offsets = seconds_offsets(&pitch_positions, stem_up, width);

    let mut ledger_lines: Vec<Handle<LedgerLine>> = Vec::new();
    for head in &heads {
        for line in LedgerLine::many_of_notehead(scene, head.notehead)? {
            if !ledger_lines.contains(&line) {
                ledger_lines.push(line);
            }
        }
    }

    let mut placements: Vec<(Handle<Glyph>, Transform)> = Vec::new();
    {
        let coordinate_system = &scene.try_get(staff)?.coordinate_system;
        for (head, offset) in heads.iter().zip(&offsets) {
            let transform = coordinate_system
                .get_transform(head.pitch_position, time_position)
                .then(&Transform::translation(*offset, 0.0));
            placements.push((head.glyph, transform));
        }

        if let Some(stem) = stem {
            let base = if stem_up { heads.first() } else { heads.last() };
            if let Some(base) = base {
                let edge = match base.stem_side[stem_up as usize] {
                    Some(NoteheadSide::Right) => base.bbox.right(),
                    Some(NoteheadSide::Left) => base.bbox.left(),
                    None => 0.0,
                };
                let transform = coordinate_system
                    .get_transform(base.pitch_position, time_position)
                    .then(&Transform::translation(edge, 0.0));
                placements.push((Stem::glyph(scene, stem)?, transform));
            }
        }

        for line in &ledger_lines {
            let affected = LedgerLine::affected_noteheads(scene, *line);
            let shifts: Vec<f32> = heads
                .iter()
                .zip(&offsets)
                .filter(|(head, _)| affected.contains(&head.notehead))
                .map(|(_, offset)| *offset)
                .collect();
            let center = if shifts.is_empty() {
                0.0
            } else {
                shifts.iter().sum::<f32>() / shifts.len() as f32
            };
            let transform = coordinate_system
                .get_transform(scene.try_get(*line)?.pitch_position, time_position)
                .then(&Transform::translation(center, 0.0));
            placements.push((LedgerLine::glyph(scene, *line)?, transform));
        }
    }

    for (glyph, transform) in placements {
        place_glyph(scene, glyph, transform)?;
    }
    log::trace!(
        "placed {} noteheads at {:.2}, stem {}",
        heads.len(),
        time_position,
        if stem_up { "up" } else { "down" }
    );
    Ok(())
}
