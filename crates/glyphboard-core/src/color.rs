//! Terminal color palette for Glyphboard layouts
//!
//! This module provides the [`Color`] type, the closed set of ANSI SGR colors
//! understood by the `SerialUI` runtime. Bright, background and bright
//! background variants are distinct members rather than flags, mirroring the
//! `UI_Color` enum of the generated code.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A member of the fixed 32-color palette.
///
/// Each color maps to its ANSI SGR parameter ([`Color::code`]) and to the
/// enumerator name used in generated code ([`Color::name`]).
///
/// # Examples
///
/// ```
/// use glyphboard_core::color::Color;
///
/// let color: Color = "b_red".parse().unwrap();
/// assert_eq!(color, Color::BrightRed);
/// assert_eq!(color.name(), "B_RED");
/// assert_eq!(color.code(), 91);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    #[default]
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
    BgBlack,
    BgRed,
    BgGreen,
    BgYellow,
    BgBlue,
    BgMagenta,
    BgCyan,
    BgWhite,
    BgBrightBlack,
    BgBrightRed,
    BgBrightGreen,
    BgBrightYellow,
    BgBrightBlue,
    BgBrightMagenta,
    BgBrightCyan,
    BgBrightWhite,
}

/// Every palette member, in SGR order within each group.
const ALL: [Color; 32] = [
    Color::Black,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Blue,
    Color::Magenta,
    Color::Cyan,
    Color::White,
    Color::BrightBlack,
    Color::BrightRed,
    Color::BrightGreen,
    Color::BrightYellow,
    Color::BrightBlue,
    Color::BrightMagenta,
    Color::BrightCyan,
    Color::BrightWhite,
    Color::BgBlack,
    Color::BgRed,
    Color::BgGreen,
    Color::BgYellow,
    Color::BgBlue,
    Color::BgMagenta,
    Color::BgCyan,
    Color::BgWhite,
    Color::BgBrightBlack,
    Color::BgBrightRed,
    Color::BgBrightGreen,
    Color::BgBrightYellow,
    Color::BgBrightBlue,
    Color::BgBrightMagenta,
    Color::BgBrightCyan,
    Color::BgBrightWhite,
];

impl Color {
    /// Returns all palette members.
    pub fn all() -> &'static [Color] {
        &ALL
    }

    /// Returns the enumerator name used in generated code (e.g. `BG_B_CYAN`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Black => "BLACK",
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Blue => "BLUE",
            Self::Magenta => "MAGENTA",
            Self::Cyan => "CYAN",
            Self::White => "WHITE",
            Self::BrightBlack => "B_BLACK",
            Self::BrightRed => "B_RED",
            Self::BrightGreen => "B_GREEN",
            Self::BrightYellow => "B_YELLOW",
            Self::BrightBlue => "B_BLUE",
            Self::BrightMagenta => "B_MAGENTA",
            Self::BrightCyan => "B_CYAN",
            Self::BrightWhite => "B_WHITE",
            Self::BgBlack => "BG_BLACK",
            Self::BgRed => "BG_RED",
            Self::BgGreen => "BG_GREEN",
            Self::BgYellow => "BG_YELLOW",
            Self::BgBlue => "BG_BLUE",
            Self::BgMagenta => "BG_MAGENTA",
            Self::BgCyan => "BG_CYAN",
            Self::BgWhite => "BG_WHITE",
            Self::BgBrightBlack => "BG_B_BLACK",
            Self::BgBrightRed => "BG_B_RED",
            Self::BgBrightGreen => "BG_B_GREEN",
            Self::BgBrightYellow => "BG_B_YELLOW",
            Self::BgBrightBlue => "BG_B_BLUE",
            Self::BgBrightMagenta => "BG_B_MAGENTA",
            Self::BgBrightCyan => "BG_B_CYAN",
            Self::BgBrightWhite => "BG_B_WHITE",
        }
    }

    /// Returns the ANSI SGR parameter for this color.
    pub fn code(self) -> u8 {
        // Declaration order matches `ALL`.
        let index = self as u8;
        let (group, offset) = (index / 8, index % 8);
        let base = match group {
            0 => 30,
            1 => 90,
            2 => 40,
            _ => 100,
        };
        base + offset
    }

    /// Inverse of [`Color::code`].
    pub fn from_code(code: u8) -> Option<Self> {
        ALL.iter().copied().find(|color| color.code() == code)
    }

    /// Returns `true` for the background members of the palette.
    pub fn is_background(self) -> bool {
        self.code() >= 40 && !(90..=97).contains(&self.code())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no palette member.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color `{0}`")]
pub struct UnknownColor(pub String);

impl FromStr for Color {
    type Err = UnknownColor;

    /// Parses an enumerator name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL.iter()
            .copied()
            .find(|color| color.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = UnknownColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.name().to_string()
    }
}
