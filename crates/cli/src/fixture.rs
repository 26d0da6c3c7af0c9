//! JSON score fixtures.
//!
//! A fixture is a flat list of events for a single part. Clefs set on an
//! event stay active for the events after it, like MusicXML attributes.
//!
//! ```json
//! {
//!   "staff_count": 1,
//!   "clefs": { "1": { "sign": "G", "line": 2 } },
//!   "events": [
//!     { "durables": [
//!       { "type": "chord", "staff": 1, "notes": [
//!         { "pitch": { "step": "C", "octave": 5 }, "duration": "quarter", "accidental": "sharp" }
//!       ] }
//!     ] },
//!     { "durables": [ { "type": "rest", "staff": 1, "duration": "half", "dots": 1 } ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use scene_graph::semantic::{AccidentalValue, Clef, Durable, EventAttributes, Pitch, Score, TypeDuration};
use scene_graph::{Handle, Scene};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreFixture {
    pub staff_count: u32,
    /// Clefs active from the first event on, by staff number
    #[serde(default)]
    pub clefs: BTreeMap<u32, Clef>,
    pub events: Vec<EventFixture>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFixture {
    /// Clef changes taking effect at this event
    #[serde(default)]
    pub clefs: BTreeMap<u32, Clef>,
    #[serde(default)]
    pub durables: Vec<DurableFixture>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DurableFixture {
    Chord {
        staff: u32,
        notes: Vec<NoteFixture>,
    },
    Rest {
        staff: u32,
        duration: TypeDuration,
        #[serde(default)]
        dots: u32,
        #[serde(default)]
        display_pitch: Option<Pitch>,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteFixture {
    pub pitch: Pitch,
    pub duration: TypeDuration,
    #[serde(default)]
    pub dots: u32,
    #[serde(default)]
    pub accidental: Option<AccidentalValue>,
}

impl NoteFixture {
    fn to_durable(&self) -> Durable {
        let durable = Durable::note(self.duration, self.pitch).with_dots(self.dots);
        match self.accidental {
            Some(value) => durable.with_accidental(value),
            None => durable,
        }
    }
}

impl ScoreFixture {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse score fixture")
    }

    /// Builds the semantic score in `scene`
    pub fn build(&self, scene: &mut Scene) -> Result<Handle<Score>> {
        let score = scene.create_score(self.staff_count)?;
        let mut clefs = self.clefs.clone();

        for (index, event_fixture) in self.events.iter().enumerate() {
            clefs.extend(event_fixture.clefs.iter().map(|(staff, clef)| (*staff, *clef)));

            let score_event = scene.push_score_event(score)?;
            let event = scene.add_event(
                score_event,
                EventAttributes {
                    clefs: clefs.clone(),
                },
            )?;

            for durable in &event_fixture.durables {
                match durable {
                    DurableFixture::Chord { staff, notes } => {
                        scene
                            .add_chord(score, event, *staff, notes.iter().map(NoteFixture::to_durable))
                            .with_context(|| format!("Failed to add chord to event {index}"))?;
                    }
                    DurableFixture::Rest {
                        staff,
                        duration,
                        dots,
                        display_pitch,
                    } => {
                        let mut rest = Durable::rest(*duration).with_dots(*dots);
                        if let Some(pitch) = display_pitch {
                            rest = rest.with_display_pitch(*pitch);
                        }
                        scene
                            .add_durable(score, event, *staff, rest)
                            .with_context(|| format!("Failed to add rest to event {index}"))?;
                    }
                }
            }
        }

        log::debug!("built score with {} events", self.events.len());
        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_graph::semantic::{Chord, Step};

    const FIXTURE: &str = r#"{
        "staff_count": 2,
        "clefs": { "1": { "sign": "G", "line": 2 }, "2": { "sign": "F", "line": 4 } },
        "events": [
            { "durables": [
                { "type": "chord", "staff": 1, "notes": [
                    { "pitch": { "step": "C", "octave": 5 }, "duration": "quarter", "accidental": "sharp" },
                    { "pitch": { "step": "E", "octave": 5 }, "duration": "quarter", "dots": 1 }
                ] },
                { "type": "rest", "staff": 2, "duration": "half" }
            ] },
            { "clefs": { "2": { "sign": "G", "line": 2 } }, "durables": [
                { "type": "rest", "staff": 2, "duration": "whole", "display_pitch": { "step": "A", "octave": 5 } }
            ] }
        ]
    }"#;

    #[test]
    fn test_build_fixture() {
        let fixture = ScoreFixture::from_json(FIXTURE).unwrap();
        let mut scene = Scene::new();
        let score = fixture.build(&mut scene).unwrap();

        let score_events = scene.score_events(score);
        assert_eq!(score_events.len(), 2);
        assert_eq!(scene.staves(score).len(), 2);

        let first = scene.events(score_events[0])[0];
        let durables = scene.durables(first);
        assert_eq!(durables.len(), 3);
        assert!(Chord::of_note(&scene, durables[0]).unwrap().is_some());
        assert_eq!(scene.get(durables[1]).unwrap().augmentation_dots, 1);
        assert_eq!(scene.staff_index_of_durable(score, durables[2]).unwrap(), 1);
    }

    #[test]
    fn test_clefs_carry_forward() {
        let fixture = ScoreFixture::from_json(FIXTURE).unwrap();
        let mut scene = Scene::new();
        let score = fixture.build(&mut scene).unwrap();

        let second = scene.events(scene.score_events(score)[1])[0];
        let clefs = &scene.get(second).unwrap().attributes.clefs;
        assert_eq!(clefs.get(&1), Some(&Clef::TREBLE));
        assert_eq!(clefs.get(&2), Some(&Clef::TREBLE));

        let rest = scene.durables(second)[0];
        assert_eq!(scene.get(rest).unwrap().display_pitch(), Some(Pitch::new(Step::A, 5)));
    }

    #[test]
    fn test_bundled_fixture_lays_out() {
        use layout::{synthesize_staff_system, LayoutConfig, RectangleSynthesizer};
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let fixture = ScoreFixture::from_json(include_str!("../fixtures/two_staves.json")).unwrap();
        let config = LayoutConfig::from_json(include_str!("../fixtures/config.json")).unwrap();
        let mut scene = Scene::new();
        let score = fixture.build(&mut scene).unwrap();

        let synthesizer = RectangleSynthesizer::new(config.staff_space).with_composed_flags(config.composed_flags);
        let mut rng = StdRng::seed_from_u64(17);
        let system = synthesize_staff_system(&mut scene, score, &synthesizer, &synthesizer, &config, &mut rng).unwrap();

        assert_eq!(system.staves.len(), 2);
        assert!(system.content_width > 0.0);
    }

    #[test]
    fn test_unknown_durable_type_is_rejected() {
        let json = r#"{ "staff_count": 1, "events": [ { "durables": [ { "type": "beam", "staff": 1 } ] } ] }"#;
        assert!(ScoreFixture::from_json(json).is_err());
    }
}
