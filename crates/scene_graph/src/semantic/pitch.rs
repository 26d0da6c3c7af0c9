use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Diatonic step name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    const ALL: [Step; 7] = [Step::C, Step::D, Step::E, Step::F, Step::G, Step::A, Step::B];

    /// Position within the octave, C = 0
    pub fn index(self) -> i32 {
        self as i32
    }

    fn from_index(index: i32) -> Step {
        Self::ALL[index.rem_euclid(7) as usize]
    }
}

/// A written pitch. `alter` is in semitones and doesn't affect the position
/// on the staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub step: Step,
    pub octave: i32,
    #[serde(default)]
    pub alter: i32,
}

impl Pitch {
    pub fn new(step: Step, octave: i32) -> Self {
        Self { step, octave, alter: 0 }
    }

    /// Number of diatonic steps above C0
    pub fn linear_pitch(&self) -> i32 {
        self.octave * 7 + self.step.index()
    }

    pub fn from_linear_pitch(linear_pitch: i32) -> Self {
        Self::new(Step::from_index(linear_pitch), linear_pitch.div_euclid(7))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum ClefSign {
    G,
    F,
    C,
}

impl ClefSign {
    /// The pitch the clef symbol is centered on
    pub fn reference_pitch(self) -> Pitch {
        match self {
            ClefSign::G => Pitch::new(Step::G, 4),
            ClefSign::F => Pitch::new(Step::F, 3),
            ClefSign::C => Pitch::new(Step::C, 4),
        }
    }
}

/// A clef placed on a staff line, lines counted from the bottom starting at 1.
///
/// Pitch positions count diatonic steps from the middle staff line, so even
/// positions lie on lines and odd positions in spaces; the staff spans
/// positions -4 to 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clef {
    pub sign: ClefSign,
    pub line: i32,
}

impl Clef {
    pub const TREBLE: Clef = Clef {
        sign: ClefSign::G,
        line: 2,
    };

    pub const BASS: Clef = Clef {
        sign: ClefSign::F,
        line: 4,
    };

    pub fn pitch_position(&self, pitch: &Pitch) -> i32 {
        pitch.linear_pitch() - self.sign.reference_pitch().linear_pitch() + (self.line - 3) * 2
    }

    pub fn pitch_at(&self, pitch_position: i32) -> Pitch {
        Pitch::from_linear_pitch(
            pitch_position + self.sign.reference_pitch().linear_pitch() - (self.line - 3) * 2,
        )
    }
}

impl Default for Clef {
    fn default() -> Self {
        Self::TREBLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_treble_clef_positions() {
        let clef = Clef::TREBLE;

        assert_eq!(clef.pitch_position(&Pitch::new(Step::G, 4)), -2);
        assert_eq!(clef.pitch_position(&Pitch::new(Step::B, 4)), 0);
        assert_eq!(clef.pitch_position(&Pitch::new(Step::F, 5)), 4);
        assert_eq!(clef.pitch_position(&Pitch::new(Step::C, 4)), -6);
    }

    #[test]
    fn test_bass_and_alto_clefs() {
        assert_eq!(Clef::BASS.pitch_position(&Pitch::new(Step::D, 3)), 0);
        let alto = Clef {
            sign: ClefSign::C,
            line: 3,
        };
        assert_eq!(alto.pitch_position(&Pitch::new(Step::C, 4)), 0);
    }

    #[test]
    fn test_pitch_at_inverts_pitch_position() {
        for clef in [Clef::TREBLE, Clef::BASS] {
            for position in -12..=12 {
                assert_eq!(clef.pitch_position(&clef.pitch_at(position)), position);
            }
        }
    }

    #[test]
    fn test_linear_pitch_is_monotonic_in_steps() {
        let linear: Vec<i32> = Step::iter().map(|step| Pitch::new(step, 4).linear_pitch()).collect();
        assert!(linear.windows(2).all(|w| w[1] == w[0] + 1));
        assert_eq!(Pitch::from_linear_pitch(-1), Pitch::new(Step::B, -1));
    }
}
