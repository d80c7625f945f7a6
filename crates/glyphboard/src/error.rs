//! Error types for Glyphboard operations.
//!
//! [`GlyphboardError`] wraps every failure the facade can report.
//! [`GenerationError`] is raised by code generation before any text is
//! emitted.

use std::{fmt, io};

use thiserror::Error;

use glyphboard_core::error::{AssetError, ValidationError};
use glyphboard_parser::{ParseError, SourceKind};

/// The main error type for Glyphboard operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps both source texts next to the diagnostics, so
/// a reporter can resolve each label against the text its
/// [`SourceKind`] names.
#[derive(Debug, Error)]
pub enum GlyphboardError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, sources: Sources },

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("invalid project snapshot: {0}")]
    Project(#[from] serde_json::Error),
}

impl GlyphboardError {
    /// Create a new `Parse` error with the texts it was raised for.
    pub fn new_parse_error(
        err: ParseError,
        declarations: impl Into<String>,
        implementation: impl Into<String>,
    ) -> Self {
        Self::Parse {
            err,
            sources: Sources {
                declarations: declarations.into(),
                implementation: implementation.into(),
            },
        }
    }
}

/// The pair of generated texts a parse ran over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub declarations: String,
    pub implementation: String,
}

impl Sources {
    /// The text a diagnostic of `kind` points into.
    pub fn get(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Declarations => &self.declarations,
            SourceKind::Implementation => &self.implementation,
        }
    }
}

/// Code generation failed. Nothing is emitted.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Two entries of one screen flatten to the same identifier, e.g. a
    /// top-level `panel_title` and the child `title` of group `panel`.
    #[error("screen `{screen}` has two entries named `{identifier}`")]
    IdentifierCollision { screen: String, identifier: String },

    #[error("failed to format generated source")]
    Format(#[from] fmt::Error),
}
