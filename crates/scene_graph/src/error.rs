use thiserror::Error;

use crate::scene::ObjectId;

/// Failures raised by the scene: relationship cardinality violations,
/// missing subjects, and broken affine-space containment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// A strict query or transform lookup received no subject.
    #[error("`{query}` over `{owner}.{field}` requires a subject, but none was given")]
    NullSubject {
        query: &'static str,
        owner: &'static str,
        field: &'static str,
    },

    /// A query expected at most one or exactly one owner, but the graph
    /// holds a different number.
    #[error("expected {expected} `{owner}` linking the subject via `{owner}.{field}`, found {found}")]
    RelationshipResolution {
        owner: &'static str,
        field: &'static str,
        expected: &'static str,
        found: usize,
    },

    /// A scalar link slot that must be set is empty.
    #[error("`{owner}.{field}` of object {id} is not set")]
    UnsetLink {
        owner: &'static str,
        field: &'static str,
        id: ObjectId,
    },

    /// Walking up from a space never reached the expected ancestor.
    #[error("space {descendant} is not attached under space {ancestor}")]
    NotAttached {
        ancestor: ObjectId,
        descendant: ObjectId,
    },

    /// Re-parenting would make a space its own ancestor, or an existing
    /// parent chain loops.
    #[error("parenting space {child} under space {parent} would create a cycle")]
    SpaceCycle { child: ObjectId, parent: ObjectId },

    /// The handle is stale or points at an object of another type.
    #[error("{type_name} {id} is not present in the scene")]
    MissingObject { type_name: &'static str, id: ObjectId },

    /// A glyph operation needs a different glyph kind.
    #[error("glyph {id} must be a {expected} glyph")]
    GlyphKindMismatch { id: ObjectId, expected: &'static str },

    /// An object is live but not registered with its container.
    #[error("{type_name} {id} is not listed in the {container}")]
    NotListed {
        type_name: &'static str,
        id: ObjectId,
        container: &'static str,
    },
}
