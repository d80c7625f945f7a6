//! Error codes for the Glyphboard diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer defects
//! - `E1xx` - Statement recognition
//! - `E2xx` - Resources
//! - `E3xx` - Element initializers
//! - `E4xx` - Screens and draw calls

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but not closed on the same line.
    E001,

    /// Unexpected character.
    ///
    /// A character that cannot start any token of the generated sources.
    E002,

    /// Invalid escape sequence.
    ///
    /// Valid escapes are `\n`, `\r`, `\t`, `\a`, `\b`, `\f`, `\v`, `\\`,
    /// `\'`, `\"`, `\?`, octal `\NNN` and hexadecimal `\xHH`.
    E003,

    // =========================================================================
    // Statements (E1xx)
    // =========================================================================
    /// No layout declarations found.
    ///
    /// The declarations text has no include guard, runtime include, layout
    /// struct or draw prototype. This is fatal.
    E100,

    /// No layout implementation found.
    ///
    /// The implementation text has no header include, section comment,
    /// resource, initializer or draw function. This is fatal.
    E101,

    /// Unrecognized statement.
    ///
    /// The statement does not match any construct the generator emits and
    /// was skipped.
    E102,

    // =========================================================================
    // Resources (E2xx)
    // =========================================================================
    /// Malformed resource.
    ///
    /// A resource constant does not follow the resource naming scheme.
    E200,

    /// Undefined resource.
    ///
    /// A resource table entry or freehand initializer refers to a constant
    /// that is not defined.
    E201,

    /// Duplicate resource.
    ///
    /// A resource constant is defined more than once.
    E202,

    // =========================================================================
    // Elements (E3xx)
    // =========================================================================
    /// Unknown element type.
    E300,

    /// Missing or mismatched field.
    ///
    /// An initializer field is missing, has the wrong form, or is surplus.
    E301,

    /// Unknown color.
    E302,

    /// Value out of range.
    E303,

    /// Invalid element or screen name.
    E304,

    /// Duplicate element definition.
    E305,

    /// Type disagrees with declaration.
    ///
    /// The initializer's type differs from the type declared in the layout struct.
    E306,

    // =========================================================================
    // Screens (E4xx)
    // =========================================================================
    /// Draw call to an unknown element.
    E400,

    /// Element defined but never drawn.
    E401,

    /// Duplicate draw call.
    E402,

    /// Declared entry without initializer.
    E403,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            // Statements
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            // Resources
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            // Elements
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
            ErrorCode::E305 => "E305",
            ErrorCode::E306 => "E306",
            // Screens
            ErrorCode::E400 => "E400",
            ErrorCode::E401 => "E401",
            ErrorCode::E402 => "E402",
            ErrorCode::E403 => "E403",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            // Statements
            ErrorCode::E100 => "no layout declarations",
            ErrorCode::E101 => "no layout implementation",
            ErrorCode::E102 => "unrecognized statement",
            // Resources
            ErrorCode::E200 => "malformed resource",
            ErrorCode::E201 => "undefined resource",
            ErrorCode::E202 => "duplicate resource",
            // Elements
            ErrorCode::E300 => "unknown element type",
            ErrorCode::E301 => "missing or mismatched field",
            ErrorCode::E302 => "unknown color",
            ErrorCode::E303 => "value out of range",
            ErrorCode::E304 => "invalid name",
            ErrorCode::E305 => "duplicate element",
            ErrorCode::E306 => "type disagrees with declaration",
            // Screens
            ErrorCode::E400 => "draw call to unknown element",
            ErrorCode::E401 => "element never drawn",
            ErrorCode::E402 => "duplicate draw call",
            ErrorCode::E403 => "declared entry without initializer",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
