//! Error types for the Glyphboard model.
//!
//! [`ValidationError`] is raised synchronously by constructors and mutators
//! whenever an invariant would be broken. A failed mutation never leaves a
//! partial change behind.

use thiserror::Error;

use crate::element::ElementKind;

/// An invariant of the element, screen or project model was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,

    #[error("`{0}` is not a valid identifier")]
    InvalidIdentifier(String),

    #[error("`{0}` is a reserved word")]
    ReservedWord(String),

    #[error("name `{name}` is already used in {scope}")]
    DuplicateName { name: String, scope: String },

    #[error("no element named `{0}`")]
    UnknownElement(String),

    #[error("no screen named `{0}`")]
    UnknownScreen(String),

    #[error("{kind} must be at least 1x1, got {width}x{height}")]
    NonPositiveSize {
        kind: ElementKind,
        width: i16,
        height: i16,
    },

    #[error("{0} cannot be resized")]
    NotResizable(ElementKind),

    #[error("`{0}` is not a group")]
    NotAGroup(String),

    #[error("a group needs at least one child")]
    EmptyGroup,

    #[error("group children cover no cells, bounds are {width}x{height}")]
    EmptyGroupBounds { width: i16, height: i16 },

    #[error("groups may be nested at most {max} levels deep, got {depth}")]
    NestingTooDeep { depth: usize, max: usize },

    #[error("content lines must not contain newlines")]
    EmbeddedNewline,

    #[error("freehand art may have at most {max} lines, got {count}")]
    TooManyLines { count: usize, max: usize },

    #[error("coordinates leave the 16-bit range")]
    CoordinateOverflow,

    #[error("project name must be a single non-empty line")]
    InvalidProjectName,

    #[error("convention `{field}` has unusable value `{value}`")]
    InvalidConvention { field: &'static str, value: String },
}

/// A named entry does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("asset `{0}` not found")]
pub struct NotFoundError(pub String);

/// Errors raised by the asset library.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid asset library: {0}")]
    Serialization(#[from] serde_json::Error),
}
