//! Error adapter for converting GlyphboardError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! A [`glyphboard_parser::ParseError`] may carry several diagnostics, each
//! pointing into either the declarations or the implementation text. Each
//! diagnostic is rendered independently against the text it names. Labels
//! pointing into the other text are listed in the help section instead.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, SourceSpan};

use glyphboard::{GlyphboardError, Sources};
use glyphboard_parser::{Diagnostic, Label, Span};

/// Adapter for a single glyphboard diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// The text the diagnostic's labels point into.
    src: &'a str,
    /// Labels that point into the other text, already formatted.
    notes: Vec<String>,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        let notes = foreign_labels(diag)
            .map(|label| match label.source() {
                Some(kind) => format!("{} in the {kind}", label.message()),
                None => label.message().to_string(),
            })
            .collect();
        Self { diag, src, notes }
    }

    /// Adapter resolving the diagnostic against the matching text of `sources`.
    pub fn with_sources(diag: &'a Diagnostic, sources: &'a Sources) -> Self {
        let src = diag.source().map_or("", |kind| sources.get(kind));
        let notes = foreign_labels(diag)
            .filter_map(|label| {
                let kind = label.source()?;
                let line = line_number(sources.get(kind), label.span());
                Some(format!("{} ({kind}, line {line})", label.message()))
            })
            .collect();
        Self { diag, src, notes }
    }
}

fn foreign_labels(diag: &Diagnostic) -> impl Iterator<Item = &Label> {
    diag.labels()
        .iter()
        .filter(move |label| label.is_foreign_to(diag.source()))
}

/// 1-based line of the span start.
fn line_number(text: &str, span: Span) -> usize {
    let end = span.start().min(text.len());
    text.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        if self.diag.severity().is_warning() {
            Some(miette::Severity::Warning)
        } else {
            Some(miette::Severity::Error)
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.notes.is_empty() {
            return self
                .diag
                .help()
                .map(|h| Box::new(h) as Box<dyn fmt::Display>);
        }
        let lines: Vec<&str> = self
            .diag
            .help()
            .into_iter()
            .chain(self.notes.iter().map(String::as_str))
            .collect();
        Some(Box::new(lines.join("\n")))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let own = self.diag.source();
        let labels: Vec<&Label> = self
            .diag
            .labels()
            .iter()
            .filter(|label| !label.is_foreign_to(own))
            .collect();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.into_iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for non-diagnostic [`GlyphboardError`] variants.
pub struct ErrorAdapter<'a>(pub &'a GlyphboardError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            GlyphboardError::Io(_) => "glyphboard::io",
            GlyphboardError::Parse { .. } => return None,
            GlyphboardError::Generation(_) => "glyphboard::generation",
            GlyphboardError::Validation(_) => "glyphboard::validation",
            GlyphboardError::Asset(_) => "glyphboard::asset",
            GlyphboardError::Project(_) => "glyphboard::project",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            GlyphboardError::Generation(_) => "rename the group or the element so the flattened names differ",
            GlyphboardError::Project(_) => "project snapshots are written by `glyphboard import`",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a glyphboard [`Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`GlyphboardError`] into a list of reportable errors.
///
/// For [`GlyphboardError::Parse`], this returns one [`Reportable`] for
/// each diagnostic in the error. For other error variants, this returns a
/// single [`Reportable`].
pub fn to_reportables(err: &GlyphboardError) -> Vec<Reportable<'_>> {
    match err {
        GlyphboardError::Parse {
            err: parse_err,
            sources,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::with_sources(d, sources)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Render a reportable as a graphical miette report.
pub fn render(reportable: &dyn MietteDiagnostic) -> String {
    let mut writer = String::new();
    if GraphicalReportHandler::new()
        .render_report(&mut writer, reportable)
        .is_err()
    {
        // Fall back to the plain message if the fancy renderer gives up.
        return reportable.to_string();
    }
    writer
}
