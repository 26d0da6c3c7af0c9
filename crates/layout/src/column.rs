//! # Columns
//!
//! A column holds every glyph that sits at one time position of the score:
//! noteheads with their stems and flags, accidentals, augmentation dots and
//! rests. Glyphs are synthesized into the column first and placed later,
//! once per column, staff by staff.
//!
//! Placement writes each glyph's space transform through the staff's
//! coordinate system. The column origin is the position of time
//! `time_position` on the staff; accidentals go left of it, dots go right.

use rand::RngCore;
use scene_graph::semantic::{Clef, Durable, Score};
use scene_graph::visual::{
    Accidental, AugmentationDot, Flag, GlyphRole, LedgerLine, Notehead, RestGlyph, StaffVisual, Stem,
};
use scene_graph::{glyph_bbox_in_space, AffineSpace, Glyph, Handle, Scene, SceneObject};
use synth_core::{Bounds, Transform};

use crate::accidentals::place_accidentals;
use crate::augmentation_dots::place_augmentation_dots;
use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::noteheads::place_noteheads;
use crate::rests::place_rests;
use crate::synthesizer::{GlyphSynthesizer, LineSynthesizer};

/// Everything column synthesis needs besides the scene and the generator
pub struct SynthesisContext<'a> {
    pub score: Handle<Score>,
    /// Staff visuals of the system, indexed like the score's staves
    pub staves: &'a [Handle<StaffVisual>],
    pub glyph_synthesizer: &'a dyn GlyphSynthesizer,
    pub line_synthesizer: &'a dyn LineSynthesizer,
    pub config: &'a LayoutConfig,
}

impl SynthesisContext<'_> {
    /// The staff visual a durable is written on
    pub fn staff_of_durable(&self, scene: &Scene, durable: Handle<Durable>) -> Result<Handle<StaffVisual>, LayoutError> {
        let index = scene.staff_index_of_durable(self.score, durable)?;
        self.staves
            .get(index)
            .copied()
            .ok_or(LayoutError::StaffOutOfRange {
                index,
                count: self.staves.len(),
            })
    }

    pub fn clef_of_durable(&self, scene: &Scene, durable: Handle<Durable>) -> Result<Clef, LayoutError> {
        match scene.clef_of_durable(durable)? {
            Some(clef) => Ok(clef),
            None => {
                let staff = scene_graph::semantic::Staff::of_durable(scene, durable)?;
                Err(LayoutError::MissingClef {
                    staff_number: scene.try_get(staff)?.staff_number,
                })
            }
        }
    }

    /// Synthesizes a glyph and parents it under the staff's space
    pub fn glyph_on_staff(
        &self,
        scene: &mut Scene,
        glyph_class: &str,
        staff: Handle<StaffVisual>,
        rng: &mut dyn RngCore,
    ) -> Result<Handle<Glyph>, LayoutError> {
        let glyph = self.glyph_synthesizer.synthesize_glyph(scene, glyph_class, rng)?;
        let staff_space = StaffVisual::space(scene, staff)?;
        let glyph_space = scene.glyph_space(glyph)?;
        scene.set_parent_space(glyph_space, Some(staff_space))?;
        Ok(glyph)
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub time_position: f32,
    /// Staves the column spans
    pub staves: Vec<Handle<StaffVisual>>,
    /// Glyphs placed directly in a staff space; nested glyphs (flags, rest
    /// ledger lines) move with their parents
    pub glyphs: Vec<Handle<Glyph>>,
    pub noteheads: Vec<Handle<Notehead>>,
    pub stems: Vec<Handle<Stem>>,
    pub ledger_lines: Vec<Handle<LedgerLine>>,
    pub accidentals: Vec<Handle<Accidental>>,
    pub augmentation_dots: Vec<Handle<AugmentationDot>>,
    pub rest_glyphs: Vec<Handle<RestGlyph>>,
}

impl Column {
    pub fn new(staves: Vec<Handle<StaffVisual>>) -> Self {
        Self {
            time_position: 0.0,
            staves,
            glyphs: Vec::new(),
            noteheads: Vec::new(),
            stems: Vec::new(),
            ledger_lines: Vec::new(),
            accidentals: Vec::new(),
            augmentation_dots: Vec::new(),
            rest_glyphs: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn add_notehead(&mut self, scene: &Scene, notehead: Handle<Notehead>) -> Result<(), LayoutError> {
        self.glyphs.push(Notehead::glyph(scene, notehead)?);
        self.noteheads.push(notehead);
        Ok(())
    }

    pub fn add_stem(&mut self, scene: &Scene, stem: Handle<Stem>) -> Result<(), LayoutError> {
        self.glyphs.push(Stem::glyph(scene, stem)?);
        self.stems.push(stem);
        Ok(())
    }

    pub fn add_ledger_line(&mut self, scene: &Scene, ledger_line: Handle<LedgerLine>) -> Result<(), LayoutError> {
        self.glyphs.push(LedgerLine::glyph(scene, ledger_line)?);
        self.ledger_lines.push(ledger_line);
        Ok(())
    }

    pub fn add_accidental(&mut self, scene: &Scene, accidental: Handle<Accidental>) -> Result<(), LayoutError> {
        require_link(scene, accidental, Accidental::NOTEHEAD.name(), |s| {
            s.link(accidental, Accidental::NOTEHEAD).is_some()
        })?;
        self.glyphs.push(Accidental::glyph(scene, accidental)?);
        self.accidentals.push(accidental);
        Ok(())
    }

    pub fn add_augmentation_dot(&mut self, scene: &Scene, dot: Handle<AugmentationDot>) -> Result<(), LayoutError> {
        require_link(scene, dot, AugmentationDot::OWNERS.name(), |s| {
            !AugmentationDot::owners(s, dot).is_empty()
        })?;
        self.glyphs.push(AugmentationDot::glyph(scene, dot)?);
        self.augmentation_dots.push(dot);
        Ok(())
    }

    pub fn add_rest(&mut self, scene: &Scene, rest_glyph: Handle<RestGlyph>) -> Result<(), LayoutError> {
        require_link(scene, rest_glyph, RestGlyph::REST.name(), |s| {
            RestGlyph::rest(s, rest_glyph).is_ok()
        })?;
        self.glyphs.push(RestGlyph::glyph(scene, rest_glyph)?);
        self.rest_glyphs.push(rest_glyph);
        Ok(())
    }

    /// The staff a column glyph belongs to.
    ///
    /// Noteheads and rests know their stafflines; anything else is found by
    /// walking up from the glyph's space to the first staff space.
    pub fn stafflines_of_glyph(&self, scene: &Scene, glyph: Handle<Glyph>) -> Result<Handle<StaffVisual>, LayoutError> {
        if let Some(notehead) = Notehead::of_glyph(scene, glyph)? {
            return Ok(Notehead::stafflines(scene, notehead)?);
        }
        if let Some(rest_glyph) = RestGlyph::of_glyph(scene, glyph)? {
            return Ok(RestGlyph::stafflines(scene, rest_glyph)?);
        }

        let mut space = scene.parent_space_of(scene.glyph_space(glyph)?)?;
        let mut steps = 0;
        while let Some(current) = space {
            if let Some(staff) = scene.of_or_none(current, StaffVisual::SPACE)? {
                return Ok(staff);
            }
            if steps > scene.len() {
                break;
            }
            steps += 1;
            space = scene.parent_space_of(current)?;
        }
        Err(LayoutError::MissingLink {
            owner: Glyph::TYPE_NAME,
            id: glyph.id(),
            relation: "stafflines",
        })
    }

    /// Positions every glyph of the column at its `time_position`.
    ///
    /// Noteheads go first since everything else is placed relative to them;
    /// dots go last since they also need the rests.
    pub fn position_glyphs(&self, scene: &mut Scene, config: &LayoutConfig, rng: &mut dyn RngCore) -> Result<(), LayoutError> {
        place_noteheads(scene, self)?;
        place_rests(scene, self)?;
        place_accidentals(scene, self, config, rng)?;
        place_augmentation_dots(scene, self, config, rng)?;
        log::debug!(
            "placed column at {:.2}: {} glyphs over {} staves",
            self.time_position,
            self.glyphs.len(),
            self.staves.len()
        );
        Ok(())
    }

    /// Left and right extent of the column's glyphs relative to the column
    /// origin, over all staves. `(0, 0)` for an empty column.
    pub fn extents(&self, scene: &Scene) -> Result<(f32, f32), LayoutError> {
        let mut left: f32 = 0.0;
        let mut right: f32 = 0.0;
        for glyph in self.drawn_glyphs(scene)? {
            let staff = self.stafflines_of_glyph(scene, glyph)?;
            let bbox = glyph_bbox_in_staff(scene, glyph, staff)?;
            let origin_x = scene.try_get(staff)?.origin_x(self.time_position);
            left = left.min(bbox.left() - origin_x);
            right = right.max(bbox.right() - origin_x);
        }
        Ok((left, right))
    }

    /// Column glyphs plus the glyphs nested under them: flags and the
    /// ledger lines of rests
    fn drawn_glyphs(&self, scene: &Scene) -> Result<Vec<Handle<Glyph>>, LayoutError> {
        let mut glyphs = self.glyphs.clone();
        for &stem in &self.stems {
            if let Some(flag) = Flag::of_stem(scene, stem)? {
                glyphs.push(Flag::glyph(scene, flag)?);
            }
        }
        for &rest_glyph in &self.rest_glyphs {
            if let Some(line) = LedgerLine::of_rest(scene, rest_glyph)? {
                glyphs.push(LedgerLine::glyph(scene, line)?);
            }
        }
        Ok(glyphs)
    }

    /// Moves the whole column by `delta` in time, keeping its layout
    pub fn shift(&mut self, scene: &mut Scene, delta: f32) -> Result<(), LayoutError> {
        for glyph in self.glyphs.clone() {
            let staff = self.stafflines_of_glyph(scene, glyph)?;
            let visual = scene.try_get(staff)?;
            let from = visual.coordinate_system.get_transform(0, self.time_position).offset();
            let to = visual.coordinate_system.get_transform(0, self.time_position + delta).offset();
            let movement = to - from;

            let space = scene.glyph_space(glyph)?;
            let transform = scene.transform_of(space)?;
            scene.set_transform(space, transform.then(&Transform::translation(movement.x, movement.y)))?;
        }
        self.time_position += delta;
        Ok(())
    }
}

/// Glyph bounds in the space of the staff it is placed on
pub fn glyph_bbox_in_staff(
    scene: &Scene,
    glyph: Handle<Glyph>,
    staff: Handle<StaffVisual>,
) -> Result<Bounds, LayoutError> {
    Ok(glyph_bbox_in_space(scene, glyph, StaffVisual::space(scene, staff)?)?)
}

/// Sets a glyph's placement in its parent space
pub fn place_glyph(scene: &mut Scene, glyph: Handle<Glyph>, transform: Transform) -> Result<(), LayoutError> {
    let space: Handle<AffineSpace> = scene.glyph_space(glyph)?;
    scene.set_transform(space, transform)?;
    log::trace!("glyph {} at {:?}", glyph.id(), transform.offset());
    Ok(())
}

fn require_link<T: SceneObject>(
    scene: &Scene,
    owner: Handle<T>,
    relation: &'static str,
    check: impl FnOnce(&Scene) -> bool,
) -> Result<(), LayoutError> {
    if check(scene) {
        Ok(())
    } else {
        Err(LayoutError::MissingLink {
            owner: T::TYPE_NAME,
            id: owner.id(),
            relation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_graph::semantic::TypeDuration;
    use scene_graph::GlyphKind;

    #[test]
    fn test_accidental_without_notehead_is_refused() {
        let mut scene = Scene::new();
        let glyph = scene.create_glyph("smufl::accidentalSharp", GlyphKind::Plain, None).unwrap();
        let accidental = Accidental::attach(&mut scene, Accidental, glyph).unwrap();

        let mut column = Column::new(Vec::new());
        assert!(matches!(
            column.add_accidental(&scene, accidental),
            Err(LayoutError::MissingLink {
                owner: "Accidental",
                relation: "notehead",
                ..
            })
        ));
        assert!(column.is_empty());
        assert!(column.accidentals.is_empty());
    }

    #[test]
    fn test_dot_without_owners_is_refused() {
        let mut scene = Scene::new();
        let glyph = scene.create_glyph("smufl::augmentationDot", GlyphKind::Plain, None).unwrap();
        let dot = AugmentationDot::attach(
            &mut scene,
            AugmentationDot {
                augmentation_dot_index: 1,
                pitch_position: 1,
            },
            glyph,
        )
        .unwrap();

        let mut column = Column::new(Vec::new());
        assert!(matches!(
            column.add_augmentation_dot(&scene, dot),
            Err(LayoutError::MissingLink {
                owner: "AugmentationDot",
                relation: "owners",
                ..
            })
        ));
        assert!(column.augmentation_dots.is_empty());
    }

    #[test]
    fn test_rest_glyph_without_rest_is_refused() {
        let mut scene = Scene::new();
        let glyph = scene.create_glyph("smufl::restQuarter", GlyphKind::Plain, None).unwrap();
        let rest_glyph = RestGlyph::attach(
            &mut scene,
            RestGlyph {
                pitch_position: 0,
                clef: Clef::TREBLE,
            },
            glyph,
        )
        .unwrap();

        let mut column = Column::new(Vec::new());
        assert!(matches!(
            column.add_rest(&scene, rest_glyph),
            Err(LayoutError::MissingLink {
                owner: "RestGlyph",
                relation: "rest",
                ..
            })
        ));

        let rest = scene.insert(Durable::rest(TypeDuration::Quarter));
        scene.set_link(rest_glyph, RestGlyph::REST, Some(rest)).unwrap();
        column.add_rest(&scene, rest_glyph).unwrap();
        assert_eq!(column.glyphs, vec![glyph]);
    }
}
