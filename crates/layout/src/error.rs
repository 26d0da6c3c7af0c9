use scene_graph::{ObjectId, SceneError};
use thiserror::Error;

/// Failures of the glyph and line synthesizers
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("no synthesizer available for glyph class `{class}`")]
    UnsupportedGlyphClass { class: String },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Everything that aborts a layout call. None of these are recovered from;
/// the input score is expected to be consistent.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// A required semantic owner link is missing, e.g. a note without a
    /// notehead.
    #[error("{owner} {id} has no linked {relation}")]
    MissingLink {
        owner: &'static str,
        id: ObjectId,
        relation: &'static str,
    },

    /// A rest where a note was expected, or the other way round
    #[error("durable {id} is not a {expected}")]
    UnexpectedDurable { id: ObjectId, expected: &'static str },

    #[error("no clef is set for staff {staff_number}")]
    MissingClef { staff_number: u32 },

    #[error("staff index {index} is out of range for a system of {count} staves")]
    StaffOutOfRange { index: usize, count: usize },

    #[error("invalid layout config: {0}")]
    Config(#[from] serde_json::Error),
}
