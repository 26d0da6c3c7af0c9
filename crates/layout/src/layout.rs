//! # Layout
//!
//! Horizontal layout of synthesized music notation. A score is laid out as
//! a sequence of columns, one per score event. Each column synthesizes its
//! glyphs through a [`GlyphSynthesizer`] and a [`LineSynthesizer`], then
//! places them on the staves:
//!
//! - **Noteheads** at their pitch positions, seconds displaced across the
//!   stem, with stems, flags and ledger lines
//! - **Rests** at their display pitch, with a ledger line for whole and half
//!   rests outside the staff
//! - **Accidentals** stacked leftward with a [`Skyline`] so none overlap
//! - **Augmentation dots** in staff spaces right of the noteheads or rest
//!
//! Finished columns are packed left to right with a jittered gap. Every
//! random choice goes through the caller's generator, so a seeded generator
//! gives a reproducible page.
//!
//! ```ignore
//! let synthesizer = RectangleSynthesizer::new(config.staff_space);
//! let system = synthesize_staff_system(&mut scene, score, &synthesizer, &synthesizer, &config, &mut rng)?;
//! let placements = collect_placements(&scene, system.page)?;
//! ```

pub mod accidentals;
pub mod augmentation_dots;
pub mod column;
pub mod config;
pub mod error;
pub mod noteheads;
pub mod rests;
pub mod skyline;
pub mod synthesizer;
pub mod system;

pub use column::{Column, SynthesisContext};
pub use config::{JitterRange, LayoutConfig};
pub use error::{LayoutError, SynthesisError};
pub use skyline::Skyline;
pub use synthesizer::{GlyphSynthesizer, LineSynthesizer, RectangleSynthesizer};
pub use system::{create_staves, place_columns, synthesize_column, synthesize_staff_system, StaffSystem};
