//! # Staff systems
//!
//! Ties the column modules together: builds the staves of a system on a
//! page, turns every score event into a [`Column`], and packs the columns
//! left to right.

use rand::RngCore;
use scene_graph::semantic::{Chord, Score, ScoreEvent};
use scene_graph::visual::{LinearStaffCoordinateSystem, StaffVisual};
use scene_graph::{AffineSpace, Bitmap, Handle, Scene};
use synth_core::Transform;

use crate::augmentation_dots::synthesize_augmentation_dots;
use crate::column::{Column, SynthesisContext};
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::noteheads::synthesize_chord;
use crate::rests::synthesize_rest;
use crate::synthesizer::{GlyphSynthesizer, LineSynthesizer};

/// Staff line thickness, in staff spaces
const STAFFLINE_THICKNESS: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct StaffSystem {
    /// Root space of the page the system is drawn on
    pub page: Handle<AffineSpace>,
    pub staves: Vec<Handle<StaffVisual>>,
    /// Time position right of the last column
    pub content_width: f32,
}

/// Creates a page with `staff_count` staves stacked from the top margin.
/// Each staff gets five staff line sprites centered on its middle line.
pub fn create_staves(
    scene: &mut Scene,
    config: &LayoutConfig,
    staff_count: usize,
) -> Result<(Handle<AffineSpace>, Vec<Handle<StaffVisual>>), LayoutError> {
    let page = scene.create_space(None)?;
    let mut staves = Vec::with_capacity(staff_count);

    for i in 0..staff_count {
        let staff = scene.create_staff_visual(
            Some(page),
            config.staff_width,
            Box::new(LinearStaffCoordinateSystem::new(config.staff_space)),
        )?;
        let space = StaffVisual::space(scene, staff)?;
        scene.set_transform(
            space,
            Transform::translation(config.margin_left, config.margin_top + i as f32 * config.staff_distance),
        )?;

        let thickness = STAFFLINE_THICKNESS * config.staff_space;
        let pixels = (config.staff_width * 10.0).ceil().max(1.0);
        for line in -2..=2 {
            let y = line as f32 * config.staff_space;
            let transform = Transform::scale(config.staff_width / pixels, thickness)
                .then(&Transform::translation(0.0, y - thickness / 2.0));
            let sprite = scene.create_sprite(space, Bitmap::filled(pixels as u32, 1), transform)?;
            scene.push_link(staff, StaffVisual::SPRITES, sprite)?;
        }
        staves.push(staff);
    }

    log::debug!("created {} staves", staff_count);
    Ok((page, staves))
}

/// Synthesizes every glyph of one score event into a new column.
///
/// Notes without a chord get a chord of their own, so every stem has one.
pub fn synthesize_column(
    scene: &mut Scene,
    context: &SynthesisContext,
    score_event: Handle<ScoreEvent>,
    rng: &mut dyn RngCore,
) -> Result<Column, LayoutError> {
    let mut column = Column::new(context.staves.to_vec());
    let mut durables = Vec::new();
    let mut handled_chords: Vec<Handle<Chord>> = Vec::new();

    for event in scene.events(score_event) {
        for durable in scene.durables(event) {
            durables.push(durable);
            if scene.try_get(durable)?.is_rest() {
                synthesize_rest(scene, context, &mut column, durable, rng)?;
                continue;
            }

            let chord = match Chord::of_note(scene, durable)? {
                Some(chord) => chord,
                None => {
                    let chord = scene.insert(Chord);
                    scene.push_link(chord, Chord::NOTES, durable)?;
                    chord
                }
            };
            if handled_chords.contains(&chord) {
                continue;
            }
            handled_chords.push(chord);
            synthesize_chord(scene, context, &mut column, chord, rng)?;
        }
    }

    synthesize_augmentation_dots(scene, context, &mut column, &durables, rng)?;
    Ok(column)
}

/// Places the columns left to right. Each column is laid out at the running
/// cursor, then shifted so its left edge clears the previous column by a
/// jittered gap. Returns the time position after the last column.
pub fn place_columns(
    scene: &mut Scene,
    columns: &mut [Column],
    config: &LayoutConfig,
    rng: &mut dyn RngCore,
) -> Result<f32, LayoutError> {
    let mut cursor = 0.0;
    for column in columns.iter_mut() {
        if column.is_empty() {
            continue;
        }
        column.time_position = cursor;
        column.position_glyphs(scene, config, rng)?;

        let (left, right) = column.extents(scene)?;
        let gap = config.column_gap.sample(rng);
        column.shift(scene, gap - left)?;
        cursor = column.time_position + right;
    }

    if cursor > config.staff_width {
        log::warn!(
            "columns run to {:.1}, past the staff width of {:.1}",
            cursor,
            config.staff_width
        );
    }
    Ok(cursor)
}

/// Lays out a whole score as one staff system
pub fn synthesize_staff_system(
    scene: &mut Scene,
    score: Handle<Score>,
    glyph_synthesizer: &dyn GlyphSynthesizer,
    line_synthesizer: &dyn LineSynthesizer,
    config: &LayoutConfig,
    rng: &mut dyn RngCore,
) -> Result<StaffSystem, LayoutError> {
    let staff_count = scene.staves(score).len();
    let (page, staves) = create_staves(scene, config, staff_count)?;

    let context = SynthesisContext {
        score,
        staves: &staves,
        glyph_synthesizer,
        line_synthesizer,
        config,
    };
    let mut columns = Vec::new();
    for score_event in scene.score_events(score) {
        columns.push(synthesize_column(scene, &context, score_event, rng)?);
    }
    let content_width = place_columns(scene, &mut columns, config, rng)?;

    log::debug!(
        "laid out {} columns on {} staves, content width {:.1}",
        columns.len(),
        staves.len(),
        content_width
    );
    Ok(StaffSystem {
        page,
        staves,
        content_width,
    })
}
