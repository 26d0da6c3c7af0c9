//! Glyph classification labels.
//!
//! [`SmuflLabel`] covers the symbols named by SMuFL; [`SynthLabel`] covers
//! what SMuFL has no name for, such as line glyphs and isolated flag strokes.

use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::semantic::{AccidentalValue, TypeDuration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum SmuflLabel {
    // noteheads
    #[strum(serialize = "smufl::noteheadDoubleWhole")]
    NoteheadDoubleWhole,
    #[strum(serialize = "smufl::noteheadDoubleWholeSquare")]
    NoteheadDoubleWholeSquare,
    #[strum(serialize = "smufl::noteheadWhole")]
    NoteheadWhole,
    #[strum(serialize = "smufl::noteheadHalf")]
    NoteheadHalf,
    #[strum(serialize = "smufl::noteheadBlack")]
    NoteheadBlack,

    #[strum(serialize = "smufl::augmentationDot")]
    AugmentationDot,
    #[strum(serialize = "smufl::stem")]
    Stem,

    // flags
    #[strum(serialize = "smufl::flag8thUp")]
    Flag8thUp,
    #[strum(serialize = "smufl::flag8thDown")]
    Flag8thDown,
    #[strum(serialize = "smufl::flag16thUp")]
    Flag16thUp,
    #[strum(serialize = "smufl::flag16thDown")]
    Flag16thDown,
    #[strum(serialize = "smufl::flag32ndUp")]
    Flag32ndUp,
    #[strum(serialize = "smufl::flag32ndDown")]
    Flag32ndDown,
    #[strum(serialize = "smufl::flag64thUp")]
    Flag64thUp,
    #[strum(serialize = "smufl::flag64thDown")]
    Flag64thDown,
    #[strum(serialize = "smufl::flag128thUp")]
    Flag128thUp,
    #[strum(serialize = "smufl::flag128thDown")]
    Flag128thDown,
    #[strum(serialize = "smufl::flag256thUp")]
    Flag256thUp,
    #[strum(serialize = "smufl::flag256thDown")]
    Flag256thDown,
    #[strum(serialize = "smufl::flag512thUp")]
    Flag512thUp,
    #[strum(serialize = "smufl::flag512thDown")]
    Flag512thDown,
    #[strum(serialize = "smufl::flag1024thUp")]
    Flag1024thUp,
    #[strum(serialize = "smufl::flag1024thDown")]
    Flag1024thDown,

    // accidentals
    #[strum(serialize = "smufl::accidentalFlat")]
    AccidentalFlat,
    #[strum(serialize = "smufl::accidentalNatural")]
    AccidentalNatural,
    #[strum(serialize = "smufl::accidentalSharp")]
    AccidentalSharp,
    #[strum(serialize = "smufl::accidentalDoubleSharp")]
    AccidentalDoubleSharp,
    #[strum(serialize = "smufl::accidentalDoubleFlat")]
    AccidentalDoubleFlat,
    #[strum(serialize = "smufl::accidentalTripleSharp")]
    AccidentalTripleSharp,
    #[strum(serialize = "smufl::accidentalTripleFlat")]
    AccidentalTripleFlat,
    #[strum(serialize = "smufl::accidentalNaturalFlat")]
    AccidentalNaturalFlat,
    #[strum(serialize = "smufl::accidentalNaturalSharp")]
    AccidentalNaturalSharp,
    #[strum(serialize = "smufl::accidentalSharpSharp")]
    AccidentalSharpSharp,

    // rests
    #[strum(serialize = "smufl::restMaxima")]
    RestMaxima,
    #[strum(serialize = "smufl::restLonga")]
    RestLonga,
    #[strum(serialize = "smufl::restDoubleWhole")]
    RestDoubleWhole,
    #[strum(serialize = "smufl::restWhole")]
    RestWhole,
    #[strum(serialize = "smufl::restHalf")]
    RestHalf,
    #[strum(serialize = "smufl::restQuarter")]
    RestQuarter,
    #[strum(serialize = "smufl::rest8th")]
    Rest8th,
    #[strum(serialize = "smufl::rest16th")]
    Rest16th,
    #[strum(serialize = "smufl::rest32nd")]
    Rest32nd,
    #[strum(serialize = "smufl::rest64th")]
    Rest64th,
    #[strum(serialize = "smufl::rest128th")]
    Rest128th,
    #[strum(serialize = "smufl::rest256th")]
    Rest256th,
    #[strum(serialize = "smufl::rest512th")]
    Rest512th,
    #[strum(serialize = "smufl::rest1024th")]
    Rest1024th,
}

impl SmuflLabel {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    pub fn notehead_from_type_duration(duration: TypeDuration) -> Self {
        match duration {
            TypeDuration::Maxima | TypeDuration::Long => SmuflLabel::NoteheadDoubleWholeSquare,
            TypeDuration::Breve => SmuflLabel::NoteheadDoubleWhole,
            TypeDuration::Whole => SmuflLabel::NoteheadWhole,
            TypeDuration::Half => SmuflLabel::NoteheadHalf,
            _ => SmuflLabel::NoteheadBlack,
        }
    }

    pub fn rest_from_type_duration(duration: TypeDuration) -> Self {
        match duration {
            TypeDuration::Maxima => SmuflLabel::RestMaxima,
            TypeDuration::Long => SmuflLabel::RestLonga,
            TypeDuration::Breve => SmuflLabel::RestDoubleWhole,
            TypeDuration::Whole => SmuflLabel::RestWhole,
            TypeDuration::Half => SmuflLabel::RestHalf,
            TypeDuration::Quarter => SmuflLabel::RestQuarter,
            TypeDuration::Eighth => SmuflLabel::Rest8th,
            TypeDuration::Sixteenth => SmuflLabel::Rest16th,
            TypeDuration::ThirtySecond => SmuflLabel::Rest32nd,
            TypeDuration::SixtyFourth => SmuflLabel::Rest64th,
            TypeDuration::HundredTwentyEighth => SmuflLabel::Rest128th,
            TypeDuration::TwoHundredFiftySixth => SmuflLabel::Rest256th,
            TypeDuration::FiveHundredTwelfth => SmuflLabel::Rest512th,
            TypeDuration::ThousandTwentyFourth => SmuflLabel::Rest1024th,
        }
    }

    pub fn accidental_from_value(value: AccidentalValue) -> Self {
        match value {
            AccidentalValue::Sharp => SmuflLabel::AccidentalSharp,
            AccidentalValue::Natural => SmuflLabel::AccidentalNatural,
            AccidentalValue::Flat => SmuflLabel::AccidentalFlat,
            AccidentalValue::DoubleSharp => SmuflLabel::AccidentalDoubleSharp,
            AccidentalValue::FlatFlat => SmuflLabel::AccidentalDoubleFlat,
            AccidentalValue::TripleSharp => SmuflLabel::AccidentalTripleSharp,
            AccidentalValue::TripleFlat => SmuflLabel::AccidentalTripleFlat,
            AccidentalValue::NaturalSharp => SmuflLabel::AccidentalNaturalSharp,
            AccidentalValue::NaturalFlat => SmuflLabel::AccidentalNaturalFlat,
            AccidentalValue::SharpSharp => SmuflLabel::AccidentalSharpSharp,
        }
    }

    /// Flag for a stem pointing up or down; `None` for flagless durations
    pub fn flag_from_type_duration(duration: TypeDuration, stem_up: bool) -> Option<Self> {
        use SmuflLabel::*;
        let (up, down) = match duration {
            TypeDuration::Eighth => (Flag8thUp, Flag8thDown),
            TypeDuration::Sixteenth => (Flag16thUp, Flag16thDown),
            TypeDuration::ThirtySecond => (Flag32ndUp, Flag32ndDown),
            TypeDuration::SixtyFourth => (Flag64thUp, Flag64thDown),
            TypeDuration::HundredTwentyEighth => (Flag128thUp, Flag128thDown),
            TypeDuration::TwoHundredFiftySixth => (Flag256thUp, Flag256thDown),
            TypeDuration::FiveHundredTwelfth => (Flag512thUp, Flag512thDown),
            TypeDuration::ThousandTwentyFourth => (Flag1024thUp, Flag1024thDown),
            _ => return None,
        };
        Some(if stem_up { up } else { down })
    }
}

/// Labels for glyphs SMuFL doesn't name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
pub enum SynthLabel {
    // line glyphs
    #[strum(serialize = "synth::ledgerLine")]
    LedgerLine,
    #[strum(serialize = "synth::beam")]
    Beam,
    #[strum(serialize = "synth::beamHook")]
    BeamHook,
    #[strum(serialize = "synth::slur")]
    Slur,

    // isolated flag strokes, for flags split into parts
    #[strum(serialize = "synth::flag8thUp")]
    IsolatedFlag8thUp,
    #[strum(serialize = "synth::flag8thDown")]
    IsolatedFlag8thDown,
    #[strum(serialize = "synth::flag16thUp")]
    IsolatedFlag16thUp,
    #[strum(serialize = "synth::flag16thDown")]
    IsolatedFlag16thDown,
}

impl SynthLabel {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// The stroke a composed flag is built from. Longer flags repeat the
    /// eighth stroke; the sixteenth stroke is only used for sixteenths.
    pub fn isolated_flag_stroke(duration: TypeDuration, stem_up: bool) -> Option<Self> {
        match (duration, stem_up) {
            (TypeDuration::Sixteenth, true) => Some(SynthLabel::IsolatedFlag16thUp),
            (TypeDuration::Sixteenth, false) => Some(SynthLabel::IsolatedFlag16thDown),
            (d, true) if d.flag_count() > 0 => Some(SynthLabel::IsolatedFlag8thUp),
            (d, false) if d.flag_count() > 0 => Some(SynthLabel::IsolatedFlag8thDown),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_labels_round_trip_through_strings() {
        for label in SmuflLabel::iter() {
            assert!(label.as_str().starts_with("smufl::"));
            assert_eq!(SmuflLabel::from_str(label.as_str()).unwrap(), label);
        }
        for label in SynthLabel::iter() {
            assert!(label.to_string().starts_with("synth::"));
        }
    }

    #[test]
    fn test_lookups() {
        assert_eq!(
            SmuflLabel::notehead_from_type_duration(TypeDuration::Eighth),
            SmuflLabel::NoteheadBlack
        );
        assert_eq!(
            SmuflLabel::rest_from_type_duration(TypeDuration::Whole).as_str(),
            "smufl::restWhole"
        );
        assert_eq!(
            SmuflLabel::flag_from_type_duration(TypeDuration::Sixteenth, false),
            Some(SmuflLabel::Flag16thDown)
        );
        assert_eq!(SmuflLabel::flag_from_type_duration(TypeDuration::Quarter, true), None);
        assert_eq!(
            SynthLabel::isolated_flag_stroke(TypeDuration::ThirtySecond, true),
            Some(SynthLabel::IsolatedFlag8thUp)
        );
    }
}
