//! The core diagnostic type for the Glyphboard error system.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, the source text it refers to, labeled spans and help text.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::{SourceKind, Span},
};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// warning[E201]: resource `RES_0_logo_ARR` is not defined
///   --> ui_layout.cpp:12:45
///    |
/// 12 | const UI_Freehand Layout_Main::logo = { 5, 5, RES_0_logo_ARR, 2, UI_Color::WHITE };
///    |                                               ^^^^^^^^^^^^^^ undefined resource
///    |
///    = help: the element is imported with empty art
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    source: Option<SourceKind>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use glyphboard_parser::error::{Diagnostic, ErrorCode};
    /// # use glyphboard_parser::Span;
    ///
    /// let diag = Diagnostic::error("no layout declarations found")
    ///     .with_code(ErrorCode::E100)
    ///     .with_label(Span::new(0..0), "expected a layout struct here");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create a diagnostic for `code` at the severity the code carries.
    pub fn coded(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(Severity::of(code), message).with_code(code)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// The text the labels point into, if known.
    pub fn source(&self) -> Option<SourceKind> {
        self.source
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the source text the labels point into.
    pub fn in_source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Add a secondary label pointing into `source`, which may be the other
    /// text than the one this diagnostic belongs to.
    pub fn with_label_in(
        mut self,
        source: SourceKind,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        self.labels.push(Label::secondary(span, message).in_source(source));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            source: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
