use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::scene::SceneObject;
use crate::semantic::pitch::Pitch;

/// Notated duration type, as named by MusicXML `<type>`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TypeDuration {
    Maxima,
    Long,
    Breve,
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    HundredTwentyEighth,
    TwoHundredFiftySixth,
    FiveHundredTwelfth,
    ThousandTwentyFourth,
}

impl TypeDuration {
    /// Number of flags (or beams) the duration carries
    pub fn flag_count(self) -> u32 {
        match self {
            TypeDuration::Eighth => 1,
            TypeDuration::Sixteenth => 2,
            TypeDuration::ThirtySecond => 3,
            TypeDuration::SixtyFourth => 4,
            TypeDuration::HundredTwentyEighth => 5,
            TypeDuration::TwoHundredFiftySixth => 6,
            TypeDuration::FiveHundredTwelfth => 7,
            TypeDuration::ThousandTwentyFourth => 8,
            _ => 0,
        }
    }

    /// Whether a notehead of this duration gets a stem
    pub fn has_stem(self) -> bool {
        self >= TypeDuration::Half
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum AccidentalValue {
    Sharp,
    Natural,
    Flat,
    DoubleSharp,
    FlatFlat,
    TripleSharp,
    TripleFlat,
    NaturalSharp,
    NaturalFlat,
    SharpSharp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurableKind {
    Note {
        pitch: Pitch,
        #[serde(default)]
        accidental: Option<AccidentalValue>,
    },
    Rest {
        #[serde(default)]
        display_pitch: Option<Pitch>,
        #[serde(default)]
        measure_rest: bool,
    },
}

/// A note or a rest: anything that occupies time in a voice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Durable {
    pub type_duration: TypeDuration,
    #[serde(default)]
    pub augmentation_dots: u32,
    pub kind: DurableKind,
}

impl SceneObject for Durable {
    const TYPE_NAME: &'static str = "Durable";
}

impl Durable {
    pub fn note(type_duration: TypeDuration, pitch: Pitch) -> Self {
        Self {
            type_duration,
            augmentation_dots: 0,
            kind: DurableKind::Note {
                pitch,
                accidental: None,
            },
        }
    }

    pub fn rest(type_duration: TypeDuration) -> Self {
        Self {
            type_duration,
            augmentation_dots: 0,
            kind: DurableKind::Rest {
                display_pitch: None,
                measure_rest: false,
            },
        }
    }

    pub fn with_dots(mut self, augmentation_dots: u32) -> Self {
        self.augmentation_dots = augmentation_dots;
        self
    }

    pub fn with_accidental(mut self, value: AccidentalValue) -> Self {
        if let DurableKind::Note { accidental, .. } = &mut self.kind {
            *accidental = Some(value);
        }
        self
    }

    pub fn with_display_pitch(mut self, pitch: Pitch) -> Self {
        if let DurableKind::Rest { display_pitch, .. } = &mut self.kind {
            *display_pitch = Some(pitch);
        }
        self
    }

    pub fn is_note(&self) -> bool {
        matches!(self.kind, DurableKind::Note { .. })
    }

    pub fn is_rest(&self) -> bool {
        matches!(self.kind, DurableKind::Rest { .. })
    }

    pub fn pitch(&self) -> Option<Pitch> {
        match self.kind {
            DurableKind::Note { pitch, .. } => Some(pitch),
            DurableKind::Rest { .. } => None,
        }
    }

    pub fn accidental(&self) -> Option<AccidentalValue> {
        match self.kind {
            DurableKind::Note { accidental, .. } => accidental,
            DurableKind::Rest { .. } => None,
        }
    }

    pub fn display_pitch(&self) -> Option<Pitch> {
        match self.kind {
            DurableKind::Rest { display_pitch, .. } => display_pitch,
            DurableKind::Note { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::pitch::Step;
    use std::str::FromStr;

    #[test]
    fn test_duration_names() {
        assert_eq!(TypeDuration::ThirtySecond.to_string(), "thirty_second");
        assert_eq!(TypeDuration::from_str("quarter").unwrap(), TypeDuration::Quarter);
        assert_eq!(AccidentalValue::from_str("double-sharp").unwrap(), AccidentalValue::DoubleSharp);
    }

    #[test]
    fn test_stems_and_flags() {
        assert!(!TypeDuration::Whole.has_stem());
        assert!(TypeDuration::Half.has_stem());
        assert_eq!(TypeDuration::Quarter.flag_count(), 0);
        assert_eq!(TypeDuration::Sixteenth.flag_count(), 2);
    }

    #[test]
    fn test_durable_accessors() {
        let note = Durable::note(TypeDuration::Quarter, Pitch::new(Step::A, 4))
            .with_accidental(AccidentalValue::Sharp)
            .with_dots(1);
        assert_eq!(note.accidental(), Some(AccidentalValue::Sharp));
        assert_eq!(note.augmentation_dots, 1);
        assert!(note.display_pitch().is_none());

        let rest = Durable::rest(TypeDuration::Half).with_accidental(AccidentalValue::Flat);
        assert!(rest.is_rest());
        assert_eq!(rest.accidental(), None);
    }

    #[test]
    fn test_durable_json_shape() {
        let json = r#"{
            "type_duration": "eighth",
            "augmentation_dots": 2,
            "kind": { "rest": { "measure_rest": false } }
        }"#;
        let durable: Durable = serde_json::from_str(json).unwrap();

        assert_eq!(durable.type_duration, TypeDuration::Eighth);
        assert_eq!(durable.augmentation_dots, 2);
        assert_eq!(durable.display_pitch(), None);
    }
}
