//! How bad a diagnostic is.

use std::fmt;

use crate::error::ErrorCode;

/// Import either yields a project or it does not; everything in between is
/// a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// One of the texts holds no generated construct. No project is built.
    Error,

    /// The statement was skipped or completed with defaults and the import
    /// went on.
    Warning,
}

impl Severity {
    /// The severity diagnostics with `code` are reported at.
    pub fn of(code: ErrorCode) -> Self {
        match code {
            ErrorCode::E100 | ErrorCode::E101 => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        })
    }
}
