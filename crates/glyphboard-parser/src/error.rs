//! Error and diagnostic system for the Glyphboard parser.
//!
//! Parsing generated sources is forgiving: most defects are reported as
//! warnings and the affected statement is skipped or filled with defaults.
//! Only a text with no recognisable marker at all is fatal.
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Fatal diagnostics are wrapped in [`ParseError`];
//! warnings are returned alongside the parsed project.
//!
//! # Example
//!
//! ```
//! # use glyphboard_parser::error::{Diagnostic, ErrorCode};
//! # use glyphboard_parser::{SourceKind, Span};
//!
//! let diag = Diagnostic::warning("element `label` is defined twice")
//!     .with_code(ErrorCode::E305)
//!     .in_source(SourceKind::Implementation)
//!     .with_label(Span::new(100..120), "duplicate definition")
//!     .with_secondary_label(Span::new(50..70), "first defined here")
//!     .with_help("the first definition is kept");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
