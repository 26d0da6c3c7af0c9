//! Semantic score objects consumed by layout.
//!
//! These carry only what placement needs: pitches and clefs to derive pitch
//! positions, durations to pick glyph classes, and the links that say which
//! event, staff and chord a durable belongs to.

pub mod durable;
pub mod pitch;
pub mod score;

pub use durable::{AccidentalValue, Durable, DurableKind, TypeDuration};
pub use pitch::{Clef, ClefSign, Pitch, Step};
pub use score::{Chord, Event, EventAttributes, Score, ScoreEvent, Staff};
