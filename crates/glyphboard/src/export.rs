//! Export functionality for Glyphboard projects.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! turning a flattened project into target source text. It is the final
//! stage of the generation pipeline.
//!
//! # Pipeline Position
//!
//! ```text
//! Project
//!     ↓ structure
//! ProjectLayout (flat entries, draw sequences)
//!     ↓ export (this module)
//! Generated Sources
//! ```
//!
//! # Available Backends
//!
//! - [`cpp`]: C++ against the `SerialUI` runtime via [`cpp::CppExporter`]

/// C++ export backend.
pub mod cpp;

use crate::{error::GenerationError, structure::ProjectLayout};

/// Abstraction for code generation backends.
///
/// Implementors accumulate the output for a [`ProjectLayout`] and hand it
/// out through a backend-specific accessor (see
/// [`cpp::CppExporter::finish`]).
pub trait Exporter {
    /// Emits the sources for a flattened project.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Format`] if the output cannot be written.
    fn export_layout(&mut self, layout: &ProjectLayout<'_>) -> Result<(), GenerationError>;
}
