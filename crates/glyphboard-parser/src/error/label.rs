//! Spans highlighted by a diagnostic.
//!
//! A diagnostic belongs to one of the two generated texts, but the thing it
//! refers back to may live in the other one: an initializer in the
//! implementation disagrees with a member declared in the header. Such a
//! label names its own [`SourceKind`].

use crate::span::{SourceKind, Span};

/// A message attached to a span of generated source.
///
/// The primary label marks the statement that was skipped or repaired.
/// Secondary labels point at the earlier definition it clashes with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
    source: Option<SourceKind>,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
            source: None,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
            source: None,
        }
    }

    /// Points the label into `source` instead of the diagnostic's own text.
    pub fn in_source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }

    /// The text this label points into, or `None` for the diagnostic's own.
    pub fn source(&self) -> Option<SourceKind> {
        self.source
    }

    /// Whether the label resolves against a text other than `own`.
    pub fn is_foreign_to(&self, own: Option<SourceKind>) -> bool {
        self.source.is_some_and(|source| Some(source) != own)
    }
}
