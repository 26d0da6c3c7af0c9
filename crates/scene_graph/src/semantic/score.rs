//! Score structure: staves, the ordered score events and the durables they
//! contain.
//!
//! A [`ScoreEvent`] is one moment in time across the whole score. It groups
//! the [`Event`]s (one per part/voice context) that start at that moment,
//! and each event lists its durables. Chords group the notes that share a
//! stem.

use std::collections::BTreeMap;

use crate::error::SceneError;
use crate::link::Field;
use crate::scene::{Handle, Scene, SceneObject};
use crate::semantic::durable::Durable;
use crate::semantic::pitch::Clef;

/// Notes sounding together under one stem
#[derive(Debug, Clone, Default)]
pub struct Chord;

impl SceneObject for Chord {
    const TYPE_NAME: &'static str = "Chord";
}

impl Chord {
    pub const NOTES: Field<Chord, Durable> = Field::new("notes");

    pub fn of_note(scene: &Scene, note: Handle<Durable>) -> Result<Option<Handle<Chord>>, SceneError> {
        scene.of_or_none(note, Self::NOTES)
    }
}

/// Attribute context active for an event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventAttributes {
    /// Active clef per staff number
    pub clefs: BTreeMap<u32, Clef>,
}

#[derive(Debug, Clone, Default)]
pub struct Event {
    pub attributes: EventAttributes,
}

impl SceneObject for Event {
    const TYPE_NAME: &'static str = "Event";
}

impl Event {
    pub const DURABLES: Field<Event, Durable> = Field::new("durables");

    pub fn of_durable(scene: &Scene, durable: Handle<Durable>) -> Result<Handle<Event>, SceneError> {
        scene.of(durable, Self::DURABLES)
    }
}

/// A staff within a part, numbered from 1
#[derive(Debug, Clone)]
pub struct Staff {
    pub staff_number: u32,
}

impl SceneObject for Staff {
    const TYPE_NAME: &'static str = "Staff";
}

impl Staff {
    pub const DURABLES: Field<Staff, Durable> = Field::new("durables");

    pub fn of_durable(scene: &Scene, durable: Handle<Durable>) -> Result<Handle<Staff>, SceneError> {
        scene.of(durable, Self::DURABLES)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreEvent;

impl SceneObject for ScoreEvent {
    const TYPE_NAME: &'static str = "ScoreEvent";
}

impl ScoreEvent {
    pub const EVENTS: Field<ScoreEvent, Event> = Field::new("events");
}

#[derive(Debug, Clone, Default)]
pub struct Score;

impl SceneObject for Score {
    const TYPE_NAME: &'static str = "Score";
}

impl Score {
    pub const STAVES: Field<Score, Staff> = Field::new("staves");
    pub const SCORE_EVENTS: Field<Score, ScoreEvent> = Field::new("score_events");
}

impl Scene {
    /// Creates a score with `staff_count` staves numbered from 1
    pub fn create_score(&mut self, staff_count: u32) -> Result<Handle<Score>, SceneError> {
        let score = self.insert(Score);
        for staff_number in 1..=staff_count {
            let staff = self.insert(Staff { staff_number });
            self.push_link(score, Score::STAVES, staff)?;
        }
        Ok(score)
    }

    pub fn staves(&self, score: Handle<Score>) -> Vec<Handle<Staff>> {
        self.links(score, Score::STAVES)
    }

    pub fn score_events(&self, score: Handle<Score>) -> Vec<Handle<ScoreEvent>> {
        self.links(score, Score::SCORE_EVENTS)
    }

    pub fn events(&self, score_event: Handle<ScoreEvent>) -> Vec<Handle<Event>> {
        self.links(score_event, ScoreEvent::EVENTS)
    }

    pub fn durables(&self, event: Handle<Event>) -> Vec<Handle<Durable>> {
        self.links(event, Event::DURABLES)
    }

    /// Appends a new moment in time to the score
    pub fn push_score_event(&mut self, score: Handle<Score>) -> Result<Handle<ScoreEvent>, SceneError> {
        let score_event = self.insert(ScoreEvent);
        self.push_link(score, Score::SCORE_EVENTS, score_event)?;
        Ok(score_event)
    }

    pub fn add_event(
        &mut self,
        score_event: Handle<ScoreEvent>,
        attributes: EventAttributes,
    ) -> Result<Handle<Event>, SceneError> {
        let event = self.insert(Event { attributes });
        self.push_link(score_event, ScoreEvent::EVENTS, event)?;
        Ok(event)
    }

    /// Adds a durable to an event, on the staff with the given number
    pub fn add_durable(
        &mut self,
        score: Handle<Score>,
        event: Handle<Event>,
        staff_number: u32,
        durable: Durable,
    ) -> Result<Handle<Durable>, SceneError> {
        let staff = self.staff_by_number(score, staff_number)?;
        let durable = self.insert(durable);
        self.push_link(event, Event::DURABLES, durable)?;
        self.push_link(staff, Staff::DURABLES, durable)?;
        Ok(durable)
    }

    /// Adds the notes of one chord to an event
    pub fn add_chord(
        &mut self,
        score: Handle<Score>,
        event: Handle<Event>,
        staff_number: u32,
        notes: impl IntoIterator<Item = Durable>,
    ) -> Result<Handle<Chord>, SceneError> {
        let chord = self.insert(Chord);
        for note in notes {
            let note = self.add_durable(score, event, staff_number, note)?;
            self.push_link(chord, Chord::NOTES, note)?;
        }
        Ok(chord)
    }

    pub fn staff_by_number(&self, score: Handle<Score>, staff_number: u32) -> Result<Handle<Staff>, SceneError> {
        self.staves(score)
            .into_iter()
            .find(|staff| self.get(*staff).is_some_and(|s| s.staff_number == staff_number))
            .ok_or(SceneError::NotListed {
                type_name: Staff::TYPE_NAME,
                id: score.id(),
                container: "score staves",
            })
    }

    /// Index of the durable's staff within the score's staves
    pub fn staff_index_of_durable(&self, score: Handle<Score>, durable: Handle<Durable>) -> Result<usize, SceneError> {
        let staff = Staff::of_durable(self, durable)?;
        self.staves(score)
            .iter()
            .position(|s| *s == staff)
            .ok_or(SceneError::NotListed {
                type_name: Staff::TYPE_NAME,
                id: staff.id(),
                container: "score staves",
            })
    }

    /// The clef active for a durable, from its event's attributes
    pub fn clef_of_durable(&self, durable: Handle<Durable>) -> Result<Option<Clef>, SceneError> {
        let event = Event::of_durable(self, durable)?;
        let staff = Staff::of_durable(self, durable)?;
        let staff_number = self.try_get(staff)?.staff_number;
        Ok(self.try_get(event)?.attributes.clefs.get(&staff_number).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::durable::TypeDuration;
    use crate::semantic::pitch::{Pitch, Step};

    #[test]
    fn test_build_two_staff_score() {
        let mut scene = Scene::new();
        let score = scene.create_score(2).unwrap();
        let score_event = scene.push_score_event(score).unwrap();
        let attributes = EventAttributes {
            clefs: BTreeMap::from([(1, Clef::TREBLE), (2, Clef::BASS)]),
        };
        let event = scene.add_event(score_event, attributes).unwrap();

        let chord = scene
            .add_chord(
                score,
                event,
                1,
                [
                    Durable::note(TypeDuration::Quarter, Pitch::new(Step::C, 5)),
                    Durable::note(TypeDuration::Quarter, Pitch::new(Step::E, 5)),
                ],
            )
            .unwrap();
        let rest = scene
            .add_durable(score, event, 2, Durable::rest(TypeDuration::Quarter))
            .unwrap();

        let notes = scene.links(chord, Chord::NOTES);
        assert_eq!(notes.len(), 2);
        assert_eq!(Chord::of_note(&scene, notes[1]).unwrap(), Some(chord));
        assert_eq!(Chord::of_note(&scene, rest).unwrap(), None);

        assert_eq!(scene.durables(event), vec![notes[0], notes[1], rest]);
        assert_eq!(Event::of_durable(&scene, rest).unwrap(), event);
        assert_eq!(scene.staff_index_of_durable(score, notes[0]).unwrap(), 0);
        assert_eq!(scene.staff_index_of_durable(score, rest).unwrap(), 1);
        assert_eq!(scene.clef_of_durable(rest).unwrap(), Some(Clef::BASS));
        assert_eq!(scene.score_events(score), vec![score_event]);
        assert_eq!(scene.events(score_event), vec![event]);
    }

    #[test]
    fn test_unknown_staff_number() {
        let mut scene = Scene::new();
        let score = scene.create_score(1).unwrap();
        let score_event = scene.push_score_event(score).unwrap();
        let event = scene.add_event(score_event, EventAttributes::default()).unwrap();

        assert!(matches!(
            scene.add_durable(score, event, 3, Durable::rest(TypeDuration::Whole)),
            Err(SceneError::NotListed { type_name: "Staff", .. })
        ));
    }

    #[test]
    fn test_missing_clef_is_none() {
        let mut scene = Scene::new();
        let score = scene.create_score(1).unwrap();
        let score_event = scene.push_score_event(score).unwrap();
        let event = scene.add_event(score_event, EventAttributes::default()).unwrap();
        let rest = scene
            .add_durable(score, event, 1, Durable::rest(TypeDuration::Whole))
            .unwrap();

        assert_eq!(scene.clef_of_durable(rest).unwrap(), None);
    }
}
