//! # Glyph synthesis
//!
//! Layout asks a synthesizer for a glyph of some class and gets back a glyph
//! in its own root space, with sprites and a region, ready to be parented
//! under a staff and positioned. Where the glyphs come from (handwritten
//! symbol datasets, fonts) is up to the implementation.
//!
//! [`RectangleSynthesizer`] is the built-in implementation: it draws every
//! class as a solid box of a plausible size. It is what tests and the CLI
//! use, and it keeps the layout geometry meaningful without any assets.

use std::str::FromStr;

use glam::Vec2;
use rand::RngCore;
use scene_graph::{Bitmap, Glyph, GlyphKind, Handle, Scene, SmuflLabel, SynthLabel};
use synth_core::{Bounds, Polygon, Transform};

use crate::config::JitterRange;
use crate::error::SynthesisError;

pub trait GlyphSynthesizer {
    fn synthesize_glyph(
        &self,
        scene: &mut Scene,
        glyph_class: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Handle<Glyph>, SynthesisError>;
}

pub trait LineSynthesizer {
    /// Synthesizes a line glyph between two points of its own space
    fn synthesize_line(
        &self,
        scene: &mut Scene,
        glyph_class: &str,
        start: Vec2,
        end: Vec2,
        rng: &mut dyn RngCore,
    ) -> Result<Handle<Glyph>, SynthesisError>;
}

/// Draws glyphs as filled rectangles sized in staff spaces
#[derive(Debug, Clone)]
pub struct RectangleSynthesizer {
    pub staff_space: f32,
    /// Split flags into isolated strokes held by a composed glyph
    pub composed_flags: bool,
    /// Relative size variation applied to every glyph
    pub size_jitter: JitterRange,
    /// Line thickness, in staff spaces
    pub line_thickness: f32,
    pub pixels_per_unit: f32,
}

impl RectangleSynthesizer {
    pub fn new(staff_space: f32) -> Self {
        Self {
            staff_space,
            composed_flags: false,
            size_jitter: JitterRange::new(0.95, 1.05),
            line_thickness: 0.13,
            pixels_per_unit: 10.0,
        }
    }

    pub fn with_composed_flags(mut self, composed_flags: bool) -> Self {
        self.composed_flags = composed_flags;
        self
    }

    /// Glyph box in staff spaces, relative to the glyph origin
    fn smufl_box(label: SmuflLabel) -> Bounds {
        use SmuflLabel::*;
        let centered = |w: f32, h: f32| Bounds::from_center_size(Vec2::ZERO, Vec2::new(w, h));
        match label {
            NoteheadBlack | NoteheadHalf => centered(1.18, 1.0),
            NoteheadWhole => centered(1.7, 1.0),
            NoteheadDoubleWhole | NoteheadDoubleWholeSquare => centered(2.2, 1.0),
            AugmentationDot => centered(0.4, 0.4),
            Stem => centered(0.13, 3.5),
            AccidentalSharp => centered(1.0, 2.8),
            AccidentalFlat => Bounds::new(Vec2::new(-0.45, -1.75), Vec2::new(0.45, 0.6)),
            AccidentalNatural => centered(0.7, 2.7),
            AccidentalDoubleSharp => centered(1.0, 1.0),
            AccidentalDoubleFlat => Bounds::new(Vec2::new(-0.8, -1.75), Vec2::new(0.8, 0.6)),
            AccidentalTripleSharp | AccidentalTripleFlat | AccidentalNaturalFlat | AccidentalNaturalSharp
            | AccidentalSharpSharp => centered(1.8, 2.6),
            // whole rests hang below their line, half rests sit on it
            RestWhole => Bounds::new(Vec2::new(-0.6, 0.0), Vec2::new(0.6, 0.5)),
            RestHalf => Bounds::new(Vec2::new(-0.6, -0.5), Vec2::new(0.6, 0.0)),
            RestDoubleWhole => Bounds::new(Vec2::new(-0.25, -1.0), Vec2::new(0.25, 0.0)),
            RestLonga | RestMaxima => Bounds::new(Vec2::new(-0.5, -2.0), Vec2::new(0.5, 0.0)),
            RestQuarter => centered(1.1, 3.0),
            Rest8th => centered(1.0, 2.0),
            Rest16th => centered(1.3, 3.0),
            Rest32nd | Rest64th | Rest128th | Rest256th | Rest512th | Rest1024th => centered(1.5, 4.0),
            // flags hang from the stem tip toward the notehead
            Flag8thUp | Flag16thUp | Flag32ndUp | Flag64thUp | Flag128thUp | Flag256thUp | Flag512thUp
            | Flag1024thUp => Bounds::new(Vec2::ZERO, Vec2::new(1.0, 3.0)),
            Flag8thDown | Flag16thDown | Flag32ndDown | Flag64thDown | Flag128thDown | Flag256thDown
            | Flag512thDown | Flag1024thDown => Bounds::new(Vec2::new(0.0, -3.0), Vec2::new(1.0, 0.0)),
        }
    }

    fn stroke_box(label: SynthLabel) -> Option<Bounds> {
        match label {
            SynthLabel::IsolatedFlag8thUp | SynthLabel::IsolatedFlag16thUp => {
                Some(Bounds::new(Vec2::ZERO, Vec2::new(1.0, 1.2)))
            }
            SynthLabel::IsolatedFlag8thDown | SynthLabel::IsolatedFlag16thDown => {
                Some(Bounds::new(Vec2::new(0.0, -1.2), Vec2::new(1.0, 0.0)))
            }
            _ => None,
        }
    }

    fn is_flag(label: SmuflLabel) -> Option<(u32, bool)> {
        let name = label.as_str();
        let up = name.ends_with("Up");
        let count = match label {
            SmuflLabel::Flag8thUp | SmuflLabel::Flag8thDown => 1,
            SmuflLabel::Flag16thUp | SmuflLabel::Flag16thDown => 2,
            SmuflLabel::Flag32ndUp | SmuflLabel::Flag32ndDown => 3,
            SmuflLabel::Flag64thUp | SmuflLabel::Flag64thDown => 4,
            SmuflLabel::Flag128thUp | SmuflLabel::Flag128thDown => 5,
            SmuflLabel::Flag256thUp | SmuflLabel::Flag256thDown => 6,
            SmuflLabel::Flag512thUp | SmuflLabel::Flag512thDown => 7,
            SmuflLabel::Flag1024thUp | SmuflLabel::Flag1024thDown => 8,
            _ => return None,
        };
        Some((count, up))
    }

    /// Creates a plain glyph covering `unit_box` (in staff spaces)
    fn boxed_glyph(
        &self,
        scene: &mut Scene,
        label: &str,
        unit_box: Bounds,
        rng: &mut dyn RngCore,
    ) -> Result<Handle<Glyph>, SynthesisError> {
        let scale = self.staff_space * self.size_jitter.sample(rng);
        let bounds = Bounds::new(unit_box.min * scale, unit_box.max * scale);

        let glyph = scene.create_glyph(label, GlyphKind::Plain, None)?;
        self.fill(scene, glyph, bounds)?;
        Ok(glyph)
    }

    /// Gives the glyph a solid sprite and a rectangular region over `bounds`
    fn fill(&self, scene: &mut Scene, glyph: Handle<Glyph>, bounds: Bounds) -> Result<(), SynthesisError> {
        let width = (bounds.width() * self.pixels_per_unit).ceil().max(1.0);
        let height = (bounds.height() * self.pixels_per_unit).ceil().max(1.0);
        let pixel_to_glyph = Transform::scale(bounds.width() / width, bounds.height() / height)
            .then(&Transform::translation(bounds.min.x, bounds.min.y));
        scene.add_sprite(glyph, Bitmap::filled(width as u32, height as u32), pixel_to_glyph)?;

        if let Some(record) = scene.get_mut(glyph) {
            record.region.polygon = Polygon::rectangle(bounds);
        }
        Ok(())
    }

    /// A flag assembled from one stroke per flag, stacked along the stem
    fn composed_flag(
        &self,
        scene: &mut Scene,
        label: SmuflLabel,
        count: u32,
        up: bool,
        rng: &mut dyn RngCore,
    ) -> Result<Handle<Glyph>, SynthesisError> {
        let stroke = match (count, up) {
            (2, true) => SynthLabel::IsolatedFlag16thUp,
            (2, false) => SynthLabel::IsolatedFlag16thDown,
            (_, true) => SynthLabel::IsolatedFlag8thUp,
            (_, false) => SynthLabel::IsolatedFlag8thDown,
        };
        let stroke_box = Self::stroke_box(stroke).ok_or_else(|| SynthesisError::UnsupportedGlyphClass {
            class: stroke.to_string(),
        })?;

        let composed = scene.create_glyph(label.as_str(), GlyphKind::Composed, None)?;
        let step = 0.8 * self.staff_space;
        for i in 0..count {
            let part = self.boxed_glyph(scene, stroke.as_str(), stroke_box, rng)?;
            scene.add_sub_glyph(composed, part)?;
            // strokes stack away from the tip
            let offset = if up { step * i as f32 } else { -step * i as f32 };
            let part_space = scene.glyph_space(part)?;
            scene.set_transform(part_space, Transform::translation(0.0, offset))?;
        }
        scene.aggregate_sprites(composed)?;
        Ok(composed)
    }
}

impl GlyphSynthesizer for RectangleSynthesizer {
    fn synthesize_glyph(
        &self,
        scene: &mut Scene,
        glyph_class: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Handle<Glyph>, SynthesisError> {
        if let Ok(label) = SmuflLabel::from_str(glyph_class) {
            if let (true, Some((count, up))) = (self.composed_flags, Self::is_flag(label)) {
                return self.composed_flag(scene, label, count, up, rng);
            }
            return self.boxed_glyph(scene, glyph_class, Self::smufl_box(label), rng);
        }

        if let Some(stroke_box) = SynthLabel::from_str(glyph_class).ok().and_then(Self::stroke_box) {
            return self.boxed_glyph(scene, glyph_class, stroke_box, rng);
        }

        Err(SynthesisError::UnsupportedGlyphClass {
            class: glyph_class.to_string(),
        })
    }
}

impl LineSynthesizer for RectangleSynthesizer {
    fn synthesize_line(
        &self,
        scene: &mut Scene,
        glyph_class: &str,
        start: Vec2,
        end: Vec2,
        _rng: &mut dyn RngCore,
    ) -> Result<Handle<Glyph>, SynthesisError> {
        let supported = glyph_class == SmuflLabel::Stem.as_str()
            || matches!(
                SynthLabel::from_str(glyph_class),
                Ok(SynthLabel::LedgerLine | SynthLabel::Beam | SynthLabel::BeamHook | SynthLabel::Slur)
            );
        if !supported {
            return Err(SynthesisError::UnsupportedGlyphClass {
                class: glyph_class.to_string(),
            });
        }

        let glyph = scene.create_glyph(glyph_class, GlyphKind::Line { start, end }, None)?;
        let half = Vec2::splat(self.line_thickness * self.staff_space / 2.0);
        let bounds = Bounds::from_corners(start, end);
        self.fill(scene, glyph, Bounds::new(bounds.min - half, bounds.max + half))?;
        Ok(glyph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use scene_graph::glyph_local_bbox;

    #[test]
    fn test_notehead_is_centered_box() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(1);
        let synthesizer = RectangleSynthesizer::new(2.0);

        let glyph = synthesizer
            .synthesize_glyph(&mut scene, "smufl::noteheadBlack", &mut rng)
            .unwrap();
        let bbox = glyph_local_bbox(&scene, glyph).unwrap();

        assert!((bbox.center() - Vec2::ZERO).length() < 1e-5);
        assert!(bbox.width() > 2.0 && bbox.width() < 2.6);
        assert_eq!(scene.glyph_sprites(glyph).len(), 1);
    }

    #[test]
    fn test_unknown_class_is_rejected() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(1);
        let synthesizer = RectangleSynthesizer::new(1.0);

        assert!(matches!(
            synthesizer.synthesize_glyph(&mut scene, "smufl::gClef", &mut rng),
            Err(SynthesisError::UnsupportedGlyphClass { class }) if class == "smufl::gClef"
        ));
        assert!(synthesizer
            .synthesize_line(&mut scene, "smufl::noteheadBlack", Vec2::ZERO, Vec2::X, &mut rng)
            .is_err());
    }

    #[test]
    fn test_whole_rest_hangs_below_origin() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(5);
        let synthesizer = RectangleSynthesizer::new(1.0);

        let whole = synthesizer.synthesize_glyph(&mut scene, "smufl::restWhole", &mut rng).unwrap();
        let half = synthesizer.synthesize_glyph(&mut scene, "smufl::restHalf", &mut rng).unwrap();

        assert_eq!(glyph_local_bbox(&scene, whole).unwrap().top(), 0.0);
        assert_eq!(glyph_local_bbox(&scene, half).unwrap().bottom(), 0.0);
    }

    #[test]
    fn test_composed_flag_aggregates_strokes() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(9);
        let synthesizer = RectangleSynthesizer::new(1.0).with_composed_flags(true);

        let flag = synthesizer
            .synthesize_glyph(&mut scene, "smufl::flag32ndUp", &mut rng)
            .unwrap();

        assert!(scene.get(flag).unwrap().is_composed());
        let strokes = scene.sub_glyphs(flag);
        assert_eq!(strokes.len(), 3);
        let stroke_sprites: Vec<_> = strokes.iter().flat_map(|s| scene.glyph_sprites(*s)).collect();
        assert_eq!(scene.glyph_sprites(flag), stroke_sprites);
        assert!(glyph_local_bbox(&scene, flag).unwrap().height() > 2.0);
    }

    #[test]
    fn test_line_glyph_keeps_end_points() {
        let mut scene = Scene::new();
        let mut rng = StdRng::seed_from_u64(1);
        let synthesizer = RectangleSynthesizer::new(1.0);
        let start = Vec2::new(-1.0, 0.0);
        let end = Vec2::new(1.0, 0.0);

        let line = synthesizer
            .synthesize_line(&mut scene, "synth::ledgerLine", start, end, &mut rng)
            .unwrap();

        assert_eq!(scene.get(line).unwrap().line_points(), Some((start, end)));
        let bbox = glyph_local_bbox(&scene, line).unwrap();
        assert!(bbox.width() > 2.0);
    }
}
