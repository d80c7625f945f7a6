//! Box, text and line shapes.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    element::{ElementKind, freehand::visible_width},
    error::ValidationError,
    geometry::{Point, Rect, Size},
};

/// A rectangular frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoxShape {
    #[serde(default)]
    x: i16,
    #[serde(default)]
    y: i16,
    #[serde(default = "one")]
    w: i16,
    #[serde(default = "one")]
    h: i16,
}

fn one() -> i16 {
    1
}

impl BoxShape {
    /// Creates a box.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveSize`] if either dimension is below one.
    pub fn new(origin: Point, size: Size) -> Result<Self, ValidationError> {
        let shape = Self {
            x: origin.x,
            y: origin.y,
            w: size.width,
            h: size.height,
        };
        shape.validate()?;
        Ok(shape)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.origin(), self.size())
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.size().is_positive() {
            Ok(())
        } else {
            Err(ValidationError::NonPositiveSize {
                kind: ElementKind::Box,
                width: self.w,
                height: self.h,
            })
        }
    }

    pub(crate) fn translated(&self, dx: i16, dy: i16) -> Option<Self> {
        let origin = self.origin().checked_offset(dx, dy)?;
        Some(Self {
            x: origin.x,
            y: origin.y,
            ..self.clone()
        })
    }

    pub(crate) fn resized(&self, size: Size) -> Result<Self, ValidationError> {
        Self::new(self.origin(), size)
    }
}

/// A block of text drawn line by line from its origin.
///
/// The content may carry a `printf`-style format payload; it is stored and
/// emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextShape {
    #[serde(default)]
    x: i16,
    #[serde(default)]
    y: i16,
    #[serde(default = "single_empty_line", deserialize_with = "lines_or_text")]
    content: Vec<String>,
}

fn single_empty_line() -> Vec<String> {
    vec![String::new()]
}

/// Accepts either a list of lines or a single newline-separated string.
fn lines_or_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Content {
        Lines(Vec<String>),
        Text(String),
    }

    Ok(match Content::deserialize(deserializer)? {
        Content::Lines(lines) => normalize(lines),
        Content::Text(text) => text.split('\n').map(str::to_string).collect(),
    })
}

impl TextShape {
    /// Creates a text block from its lines.
    ///
    /// An empty line list is stored as a single empty line.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmbeddedNewline`] if a line contains `\n`.
    pub fn new(origin: Point, content: Vec<String>) -> Result<Self, ValidationError> {
        let shape = Self {
            x: origin.x,
            y: origin.y,
            content: normalize(content),
        };
        shape.validate()?;
        Ok(shape)
    }

    /// Creates a text block by splitting `text` on newlines.
    pub fn from_text(origin: Point, text: &str) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            content: text.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    /// The content joined with newlines, as the runtime prints it.
    pub fn text(&self) -> String {
        self.content.join("\n")
    }

    /// Replaces the content.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmbeddedNewline`] if a line contains `\n`.
    pub fn set_content(&mut self, content: Vec<String>) -> Result<(), ValidationError> {
        let content = normalize(content);
        check_lines(&content)?;
        self.content = content;
        Ok(())
    }

    pub fn bounds(&self) -> Rect {
        let width = self.content.iter().map(|l| visible_width(l)).max().unwrap_or(0);
        Rect::new(self.origin(), Size::new(clamp(width), clamp(self.content.len())))
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        check_lines(&self.content)
    }

    pub(crate) fn translated(&self, dx: i16, dy: i16) -> Option<Self> {
        let origin = self.origin().checked_offset(dx, dy)?;
        Some(Self {
            x: origin.x,
            y: origin.y,
            content: self.content.clone(),
        })
    }
}

fn normalize(content: Vec<String>) -> Vec<String> {
    if content.is_empty() {
        single_empty_line()
    } else {
        content
    }
}

pub(crate) fn check_lines(lines: &[String]) -> Result<(), ValidationError> {
    if lines.iter().any(|line| line.contains('\n')) {
        Err(ValidationError::EmbeddedNewline)
    } else {
        Ok(())
    }
}

pub(crate) fn clamp(value: usize) -> i16 {
    i16::try_from(value).unwrap_or(i16::MAX)
}

/// A straight line between two cells. Equal endpoints draw a single point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineShape {
    #[serde(default)]
    x1: i16,
    #[serde(default)]
    y1: i16,
    #[serde(default)]
    x2: i16,
    #[serde(default)]
    y2: i16,
}

impl LineShape {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn set_start(&mut self, start: Point) {
        self.x1 = start.x;
        self.y1 = start.y;
    }

    pub fn set_end(&mut self, end: Point) {
        self.x2 = end.x;
        self.y2 = end.y;
    }

    pub fn is_point(&self) -> bool {
        self.start() == self.end()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_corners(self.start(), self.end())
    }

    pub(crate) fn translated(&self, dx: i16, dy: i16) -> Option<Self> {
        Some(Self::new(
            self.start().checked_offset(dx, dy)?,
            self.end().checked_offset(dx, dy)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_rejects_non_positive_size() {
        let err = BoxShape::new(Point::new(0, 0), Size::new(0, 3)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NonPositiveSize {
                kind: ElementKind::Box,
                width: 0,
                height: 3
            }
        );
    }

    #[test]
    fn test_text_normalizes_empty_content() {
        let text = TextShape::new(Point::new(1, 1), Vec::new()).unwrap();
        assert_eq!(text.content(), [String::new()]);
    }

    #[test]
    fn test_text_rejects_embedded_newline() {
        let err = TextShape::new(Point::new(0, 0), vec!["a\nb".to_string()]).unwrap_err();
        assert_eq!(err, ValidationError::EmbeddedNewline);
    }

    #[test]
    fn test_text_bounds_use_widest_line() {
        let text = TextShape::from_text(Point::new(2, 3), "Hi\nthere");
        assert_eq!(text.bounds(), Rect::new(Point::new(2, 3), Size::new(5, 2)));
    }

    #[test]
    fn test_degenerate_line_is_a_point() {
        let line = LineShape::new(Point::new(4, 4), Point::new(4, 4));
        assert!(line.is_point());
        assert_eq!(line.bounds().size(), Size::new(1, 1));
    }

    #[test]
    fn test_legacy_text_content_string() {
        let text: TextShape = serde_json::from_str(r#"{"x": 1, "content": "a\nb"}"#).unwrap();
        assert_eq!(text.content(), ["a".to_string(), "b".to_string()]);
        assert_eq!(text.origin(), Point::new(1, 0));
    }

    #[test]
    fn test_text_snapshot_with_no_lines_loads_one_empty_line() {
        let text: TextShape = serde_json::from_str(r#"{"x": 0, "y": 0, "content": []}"#).unwrap();
        assert_eq!(text, TextShape::new(Point::new(0, 0), Vec::new()).unwrap());
        assert_eq!(text.content(), [String::new()]);
    }

    #[test]
    fn test_box_missing_size_defaults_to_one() {
        let shape: BoxShape = serde_json::from_str(r#"{"x": 3, "y": 4}"#).unwrap();
        assert_eq!(shape.size(), Size::new(1, 1));
    }
}
