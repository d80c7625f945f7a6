//! The ParseError type for wrapping fatal parsing diagnostics.

use crate::error::Diagnostic;

/// Error type for the parsing lifecycle.
///
/// Wraps one or more diagnostics, at least one of them an error. Warnings
/// emitted before the failure are kept so they can be shown alongside.
#[derive(Debug, thiserror::Error)]
#[error("{}", summarize(.diagnostics))]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterates over the error-severity diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity().is_error())
    }
}

/// First error, followed by the count of further errors.
fn summarize(diagnostics: &[Diagnostic]) -> String {
    let mut errors = diagnostics.iter().filter(|d| d.severity().is_error());
    let Some(first) = errors.next() else {
        return String::new();
    };
    match errors.count() {
        0 => first.to_string(),
        more => format!("{first} (+{more} more)"),
    }
}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}
