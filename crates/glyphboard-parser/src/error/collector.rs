//! Collector for accumulating diagnostics during parsing.
//!
//! The [`DiagnosticCollector`] lets every phase report as many defects as
//! it finds instead of stopping at the first one.

use log::debug;

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics during a processing phase.
///
/// # Example
///
/// ```text
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(
///     Diagnostic::warning("unknown color `MAUVE`")
///         .with_code(ErrorCode::E302)
///         .with_label(span, "not in the palette")
/// );
///
/// // Ok(warnings) unless an error was emitted
/// let warnings = collector.finish()?;
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        debug!(diagnostic:% = diagnostic; "Diagnostic emitted");
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Moves every diagnostic of `other` into this collector.
    pub fn extend(&mut self, other: DiagnosticCollector) {
        self.has_errors |= other.has_errors;
        self.diagnostics.extend(other.diagnostics);
    }

    /// Returns `true` if an error has been emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Finish collection.
    ///
    /// - If there are errors, returns `Err(ParseError)` with all diagnostics.
    /// - Otherwise returns the warnings in emission order.
    pub fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ErrorCode, span::Span};

    #[test]
    fn test_collector_new_finish_ok() {
        let collector = DiagnosticCollector::new();
        assert!(collector.finish().unwrap().is_empty());
    }

    #[test]
    fn test_collector_emit_warning_finish_ok() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::warning("warning 1"));
        collector.emit(Diagnostic::warning("warning 2"));

        let warnings = collector.finish().unwrap();
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[1].message(), "warning 2");
    }

    #[test]
    fn test_collector_finish_with_errors() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(
            Diagnostic::error("test error")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(10..20), "here"),
        );
        collector.emit(Diagnostic::warning("test warning"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[0].message(), "test error");
    }

    #[test]
    fn test_collector_extend_keeps_errors() {
        let mut first = DiagnosticCollector::new();
        let mut second = DiagnosticCollector::new();
        second.emit(Diagnostic::error("fatal"));

        first.extend(second);
        assert!(first.has_errors());
    }
}
