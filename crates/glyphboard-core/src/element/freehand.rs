//! Freehand ASCII art and its content fingerprint.
//!
//! Art lines may embed ANSI escape sequences (`ESC [ ... m` and friends).
//! They are opaque to the model: kept byte for byte, but skipped when
//! measuring how many cells a line covers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    element::{
        ElementKind,
        primitive::{check_lines, clamp},
    },
    error::ValidationError,
    geometry::{Point, Rect, Size},
};

/// Maximum number of art lines; the runtime stores the count in a `uint8_t`.
pub const MAX_FREEHAND_LINES: usize = u8::MAX as usize;

const ESC: char = '\u{1b}';

/// Content fingerprint of a freehand art block.
///
/// Two art blocks have the same key exactly when their line sequences are
/// identical, escape bytes included. The generator shares one emitted
/// resource between all elements with the same key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey([u8; 32]);

impl ResourceKey {
    /// Computes the key of a line sequence.
    ///
    /// Lines are length-prefixed so that `["ab"]` and `["a", "b"]` differ.
    pub fn of(lines: &[String]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(lines.len() as u64).to_le_bytes());
        for line in lines {
            hasher.update(&(line.len() as u64).to_le_bytes());
            hasher.update(line.as_bytes());
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Full hexadecimal digest.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

impl fmt::Display for ResourceKey {
    /// Short form: the first 8 bytes in hex.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceKey({self})")
    }
}

/// A block of art lines drawn from its origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Freehand {
    #[serde(default)]
    x: i16,
    #[serde(default)]
    y: i16,
    #[serde(default, rename = "lines")]
    content: Vec<String>,
}

impl Freehand {
    /// Creates an art block.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmbeddedNewline`] or [`ValidationError::TooManyLines`].
    pub fn new(origin: Point, content: Vec<String>) -> Result<Self, ValidationError> {
        let shape = Self {
            x: origin.x,
            y: origin.y,
            content,
        };
        shape.validate()?;
        Ok(shape)
    }

    /// An art block with no lines, used when the content cannot be recovered.
    pub fn blank(origin: Point) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            content: Vec::new(),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    /// The content fingerprint, derived from the lines on every call.
    pub fn resource_key(&self) -> ResourceKey {
        ResourceKey::of(&self.content)
    }

    /// Replaces the lines.
    ///
    /// # Errors
    ///
    /// Same as [`Freehand::new`]; the art is unchanged on error.
    pub fn set_content(&mut self, content: Vec<String>) -> Result<(), ValidationError> {
        check_content(&content)?;
        self.content = content;
        Ok(())
    }

    pub fn bounds(&self) -> Rect {
        let width = self.content.iter().map(|l| visible_width(l)).max().unwrap_or(0);
        Rect::new(self.origin(), Size::new(clamp(width), clamp(self.content.len())))
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        check_content(&self.content)
    }

    pub(crate) fn translated(&self, dx: i16, dy: i16) -> Option<Self> {
        let origin = self.origin().checked_offset(dx, dy)?;
        Some(Self {
            x: origin.x,
            y: origin.y,
            content: self.content.clone(),
        })
    }

    /// Crops or pads the canvas to `size`.
    ///
    /// Lines are cut at `size.width` visible cells or padded with spaces;
    /// escape sequences after the cut are kept so styling resets survive.
    /// Missing rows are filled with blank lines.
    pub(crate) fn resized(&self, size: Size) -> Result<Self, ValidationError> {
        if !size.is_positive() {
            return Err(ValidationError::NonPositiveSize {
                kind: ElementKind::Freehand,
                width: size.width,
                height: size.height,
            });
        }
        let width = size.width as usize;
        let height = size.height as usize;
        let blank = " ".repeat(width);
        let content = (0..height)
            .map(|row| match self.content.get(row) {
                Some(line) => fit_line(line, width),
                None => blank.clone(),
            })
            .collect();
        Self::new(self.origin(), content)
    }
}

fn check_content(content: &[String]) -> Result<(), ValidationError> {
    check_lines(content)?;
    if content.len() > MAX_FREEHAND_LINES {
        return Err(ValidationError::TooManyLines {
            count: content.len(),
            max: MAX_FREEHAND_LINES,
        });
    }
    Ok(())
}

/// A run of a line: either printable text or one escape sequence.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    Escape(&'a str),
}

/// Splits a line into printable runs and escape sequences.
///
/// A CSI sequence is `ESC [`, parameter bytes `0x30..=0x3F`, intermediate
/// bytes `0x20..=0x2F` and one final byte `0x40..=0x7E`. An `ESC` that does
/// not start a CSI sequence is taken as a one-byte escape on its own.
fn segments(line: &str) -> Vec<Segment<'_>> {
    let bytes = line.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != ESC as u8 {
            i += 1;
            continue;
        }
        if start < i {
            segments.push(Segment::Text(&line[start..i]));
        }
        let mut end = i + 1;
        if bytes.get(end) == Some(&b'[') {
            end += 1;
            while end < bytes.len() && (0x30..=0x3f).contains(&bytes[end]) {
                end += 1;
            }
            while end < bytes.len() && (0x20..=0x2f).contains(&bytes[end]) {
                end += 1;
            }
            if end < bytes.len() && (0x40..=0x7e).contains(&bytes[end]) {
                end += 1;
            }
        }
        segments.push(Segment::Escape(&line[i..end]));
        start = end;
        i = end;
    }
    if start < bytes.len() {
        segments.push(Segment::Text(&line[start..]));
    }
    segments
}

/// Number of cells a line covers once escape sequences are removed.
pub(crate) fn visible_width(line: &str) -> usize {
    segments(line)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => text.chars().count(),
            Segment::Escape(_) => 0,
        })
        .sum()
}

fn fit_line(line: &str, width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut used = 0;
    for segment in segments(line) {
        match segment {
            Segment::Escape(escape) => out.push_str(escape),
            Segment::Text(text) => {
                for ch in text.chars() {
                    if used == width {
                        break;
                    }
                    out.push(ch);
                    used += 1;
                }
            }
        }
    }
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resource_key_is_content_addressed() {
        let a = ResourceKey::of(&lines(&["/\\", "\\/"]));
        let b = ResourceKey::of(&lines(&["/\\", "\\/"]));
        let c = ResourceKey::of(&lines(&["/\\\\/"]));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_resource_key_distinguishes_empty_from_blank_line() {
        assert_ne!(ResourceKey::of(&[]), ResourceKey::of(&lines(&[""])));
    }

    #[test]
    fn test_resource_key_display_is_short_hex() {
        let key = ResourceKey::of(&lines(&["x"]));
        assert_eq!(key.to_string().len(), 16);
        assert!(key.to_hex().starts_with(&key.to_string()));
    }

    #[test]
    fn test_visible_width_skips_escapes() {
        assert_eq!(visible_width("\u{1b}[31mred\u{1b}[0m"), 3);
        assert_eq!(visible_width("plain"), 5);
        assert_eq!(visible_width("\u{1b}x"), 1);
    }

    #[test]
    fn test_bounds_measure_visible_cells() {
        let art = Freehand::new(
            Point::new(1, 2),
            lines(&["\u{1b}[1m***\u{1b}[0m", "*"]),
        )
        .unwrap();
        assert_eq!(art.bounds(), Rect::new(Point::new(1, 2), Size::new(3, 2)));
    }

    #[test]
    fn test_resize_crops_and_keeps_trailing_reset() {
        let art = Freehand::new(Point::new(0, 0), lines(&["\u{1b}[32mabcdef\u{1b}[0m"])).unwrap();
        let resized = art.resized(Size::new(2, 2)).unwrap();
        assert_eq!(
            resized.content(),
            lines(&["\u{1b}[32mab\u{1b}[0m", "  "]).as_slice()
        );
    }

    #[test]
    fn test_resize_rejects_zero_height() {
        let art = Freehand::new(Point::new(0, 0), lines(&["x"])).unwrap();
        assert!(matches!(
            art.resized(Size::new(3, 0)),
            Err(ValidationError::NonPositiveSize { .. })
        ));
    }

    #[test]
    fn test_too_many_lines() {
        let content = vec!["#".to_string(); MAX_FREEHAND_LINES + 1];
        assert!(matches!(
            Freehand::new(Point::new(0, 0), content),
            Err(ValidationError::TooManyLines { count: 256, max: 255 })
        ));
    }

    #[test]
    fn test_serde_uses_lines_field() {
        let art: Freehand = serde_json::from_str(r#"{"x": 2, "y": 1, "lines": ["ab"]}"#).unwrap();
        assert_eq!(art.content(), ["ab".to_string()]);
    }
}
