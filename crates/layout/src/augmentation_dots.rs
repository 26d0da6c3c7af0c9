//! # Augmentation dots
//!
//! Dots sit in staff spaces, never on lines. A durable on a line gets its
//! dots nudged one position up, or down when the space above already holds
//! dots. When both neighbours are taken the dots go up and are shared: the
//! existing dot gains another owner instead of a second dot being drawn at
//! the same spot.
//!
//! All notehead dots of a staff line up in one vertical column right of the
//! rightmost notehead. Rest dots follow their own rest.

use std::collections::BTreeMap;

use rand::RngCore;
use scene_graph::semantic::Durable;
use scene_graph::visual::{AugmentationDot, GlyphRole, Notehead, RestGlyph, StaffVisual};
use scene_graph::{Glyph, Handle, Scene, SceneObject, SmuflLabel};

use crate::column::{glyph_bbox_in_staff, place_glyph, Column, SynthesisContext};
use crate::config::LayoutConfig;
use crate::error::LayoutError;

/// Synthesizes the dots for the durables of one column.
///
/// Noteheads and rest glyphs must already exist for every durable.
pub fn synthesize_augmentation_dots(
    scene: &mut Scene,
    context: &SynthesisContext,
    column: &mut Column,
    durables: &[Handle<Durable>],
    rng: &mut dyn RngCore,
) -> Result<(), LayoutError> {
    let mut by_staff: BTreeMap<usize, Vec<Handle<Durable>>> = BTreeMap::new();
    for &durable in durables {
        let index = scene.staff_index_of_durable(context.score, durable)?;
        by_staff.entry(index).or_default().push(durable);
    }

    for (index, mut durables) in by_staff {
        let staff = *context.staves.get(index).ok_or(LayoutError::StaffOutOfRange {
            index,
            count: context.staves.len(),
        })?;
        let staff_space = StaffVisual::space(scene, staff)?;

        // high to low, so dots on a chord spread away from each other
        durables.sort_by_cached_key(|durable| {
            std::cmp::Reverse(
                scene
                    .get(*durable)
                    .and_then(|d| d.pitch())
                    .map(|p| p.linear_pitch())
                    .unwrap_or(0),
            )
        });

        let mut created: BTreeMap<i32, Vec<Handle<AugmentationDot>>> = BTreeMap::new();
        let mut handled_noteheads: Vec<Handle<Notehead>> = Vec::new();

        for durable in durables {
            let record = scene.try_get(durable)?;
            let dot_count = record.augmentation_dots;
            let is_note = record.is_note();

            let (owner, pitch_position) = if is_note {
                let notehead = Notehead::of_note(scene, durable)?.ok_or(LayoutError::MissingLink {
                    owner: Durable::TYPE_NAME,
                    id: durable.id(),
                    relation: "notehead",
                })?;
                if handled_noteheads.contains(&notehead) {
                    continue;
                }
                handled_noteheads.push(notehead);
                (
                    Notehead::glyph(scene, notehead)?,
                    scene.try_get(notehead)?.pitch_position,
                )
            } else {
                let rest_glyph = RestGlyph::of_rest(scene, durable)?.ok_or(LayoutError::MissingLink {
                    owner: Durable::TYPE_NAME,
                    id: durable.id(),
                    relation: "rest glyph",
                })?;
                (
                    RestGlyph::glyph(scene, rest_glyph)?,
                    scene.try_get(rest_glyph)?.pitch_position,
                )
            };

            if dot_count == 0 {
                continue;
            }

            let pitch_position = dot_pitch_position(pitch_position, |p| created.contains_key(&p));
            let dots = created.entry(pitch_position).or_default();
            for dot_index in 1..=dot_count {
                if let Some(&dot) = dots.get(dot_index as usize - 1) {
                    log::warn!(
                        "sharing augmentation dot {} at pitch position {} with glyph {}",
                        dot_index,
                        pitch_position,
                        owner.id()
                    );
                    scene.push_link(dot, AugmentationDot::OWNERS, owner)?;
                    continue;
                }

                let glyph = context
                    .glyph_synthesizer
                    .synthesize_glyph(scene, SmuflLabel::AugmentationDot.as_str(), rng)?;
                let glyph_space = scene.glyph_space(glyph)?;
                scene.set_parent_space(glyph_space, Some(staff_space))?;
                let dot = AugmentationDot::attach(
                    scene,
                    AugmentationDot {
                        augmentation_dot_index: dot_index,
                        pitch_position,
                    },
                    glyph,
                )?;
                scene.push_link(dot, AugmentationDot::OWNERS, owner)?;
                dots.push(dot);
                column.add_augmentation_dot(scene, dot)?;
            }
        }
    }
    Ok(())
}

/// Moves a dot off a staff line: up if free, else down if free, else up.
/// Odd positions are spaces and stay.
pub fn dot_pitch_position(pitch_position: i32, taken: impl Fn(i32) -> bool) -> i32 {
    if pitch_position % 2 != 0 {
        pitch_position
    } else if !taken(pitch_position + 1) {
        pitch_position + 1
    } else if !taken(pitch_position - 1) {
        pitch_position - 1
    } else {
        pitch_position + 1
    }
}

pub(crate) fn place_augmentation_dots(
    scene: &mut Scene,
    column: &Column,
    config: &LayoutConfig,
    rng: &mut dyn RngCore,
) -> Result<(), LayoutError> {
    for &staff in &column.staves {
        place_staff_dots(scene, column, staff, config, rng)?;
    }
    Ok(())
}

fn place_staff_dots(
    scene: &mut Scene,
    column: &Column,
    staff: Handle<StaffVisual>,
    config: &LayoutConfig,
    rng: &mut dyn RngCore,
) -> Result<(), LayoutError> {
    let mut notehead_dots: Vec<Handle<AugmentationDot>> = Vec::new();
    let mut rest_dots: Vec<(Handle<AugmentationDot>, Handle<Glyph>)> = Vec::new();
    for &dot in &column.augmentation_dots {
        let Some(owner) = AugmentationDot::owners(scene, dot).first().copied() else {
            continue;
        };
        if column.stafflines_of_glyph(scene, owner)? != staff {
            continue;
        }
        if RestGlyph::of_glyph(scene, owner)?.is_some() {
            rest_dots.push((dot, owner));
        } else {
            notehead_dots.push(dot);
        }
    }
    if notehead_dots.is_empty() && rest_dots.is_empty() {
        return Ok(());
    }

    let origin_x = scene.try_get(staff)?.origin_x(column.time_position);
    let mut noteheads_right_edge = origin_x;
    for &notehead in &column.noteheads {
        if Notehead::stafflines(scene, notehead)? != staff {
            continue;
        }
        let bbox = glyph_bbox_in_staff(scene, Notehead::glyph(scene, notehead)?, staff)?;
        noteheads_right_edge = noteheads_right_edge.max(bbox.right());
    }

    let base_offset = config.dot_base_offset.sample(rng);
    let spacing = config.dot_spacing.sample(rng);

    let mut placements = Vec::with_capacity(notehead_dots.len() + rest_dots.len());
    for dot in notehead_dots {
        let record = scene.try_get(dot)?;
        let x = base_offset + spacing * (record.augmentation_dot_index as f32 - 1.0);
        let time_position = column.time_position + (noteheads_right_edge - origin_x) + x;
        placements.push((dot, record.pitch_position, time_position));
    }
    for (dot, rest) in rest_dots {
        let record = scene.try_get(dot)?;
        let rest_right_edge = glyph_bbox_in_staff(scene, rest, staff)?.right();
        let x = spacing * record.augmentation_dot_index as f32;
        let time_position = column.time_position + (rest_right_edge - origin_x) + x;
        placements.push((dot, record.pitch_position, time_position));
    }

    for (dot, pitch_position, time_position) in placements {
        let transform = scene
            .try_get(staff)?
            .coordinate_system
            .get_transform(pitch_position, time_position);
        let glyph = AugmentationDot::glyph(scene, dot)?;
        place_glyph(scene, glyph, transform)?;
    }
    Ok(())
}
