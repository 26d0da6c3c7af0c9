//! Layout configuration.
//!
//! All lengths are in page units (millimeters), except where noted in staff
//! spaces. Every randomized distance is a [`JitterRange`] sampled with the
//! caller's generator.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use synth_core::random_between;

use crate::error::LayoutError;

/// Closed range a jittered value is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JitterRange {
    pub min: f32,
    pub max: f32,
}

impl JitterRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut dyn RngCore) -> f32 {
        random_between(self.min, self.max, rng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance between two staff lines
    pub staff_space: f32,
    /// Width of each staff
    pub staff_width: f32,
    /// Vertical distance between the middle lines of adjacent staves
    pub staff_distance: f32,
    /// Top-left corner of the first staff on the page
    pub margin_left: f32,
    pub margin_top: f32,

    /// Gap between an accidental and whatever it is pushed against
    pub accidental_spacing: JitterRange,
    /// Gap between the noteheads of a column and their first dot
    pub dot_base_offset: JitterRange,
    /// Distance between consecutive dots of one owner
    pub dot_spacing: JitterRange,
    /// Ledger line width relative to the glyph it crosses
    pub ledger_line_width_factor: JitterRange,
    /// Horizontal gap between adjacent columns
    pub column_gap: JitterRange,

    /// Stem length beyond the last notehead, in staff spaces
    pub stem_length: f32,
    /// Build flags from isolated strokes instead of one glyph
    pub composed_flags: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            staff_space: 1.75,
            staff_width: 180.0,
            staff_distance: 16.0,
            margin_left: 10.0,
            margin_top: 15.0,
            accidental_spacing: JitterRange::new(0.2, 1.0),
            dot_base_offset: JitterRange::new(1.0, 2.0),
            dot_spacing: JitterRange::new(0.8, 1.6),
            ledger_line_width_factor: JitterRange::new(1.2, 2.5),
            column_gap: JitterRange::new(1.5, 4.0),
            stem_length: 3.5,
            composed_flags: false,
        }
    }
}

impl LayoutConfig {
    /// Parses a config, filling every missing field with its default
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }
}
