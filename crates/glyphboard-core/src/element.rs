//! Layout elements.
//!
//! An [`Element`] pairs the attributes every element carries (name, layer,
//! color) with a [`Shape`], the closed set of drawable variants. Shapes keep
//! their fields private so their invariants hold after every mutation.

mod freehand;
mod meta;
mod primitive;

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

pub use freehand::{Freehand, MAX_FREEHAND_LINES, ResourceKey};
pub use meta::{MAX_NESTING_DEPTH, MetaObject};
pub use primitive::{BoxShape, LineShape, TextShape};

use crate::{
    color::Color,
    error::ValidationError,
    geometry::{Point, Rect, Size},
    identifier,
};

/// The variant tag of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Box,
    Text,
    Line,
    Freehand,
    MetaObject,
}

impl ElementKind {
    /// Lowercase name, also the prefix of automatic element names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Text => "text",
            Self::Line => "line",
            Self::Freehand => "freehand",
            Self::MetaObject => "metaobject",
        }
    }

    /// Suffix of the runtime struct (`UI_Box`, ...). Groups have none since
    /// they are flattened away before emission.
    pub fn type_suffix(self) -> Option<&'static str> {
        match self {
            Self::Box => Some("Box"),
            Self::Text => Some("Text"),
            Self::Line => Some("Line"),
            Self::Freehand => Some("Freehand"),
            Self::MetaObject => None,
        }
    }

    /// Inverse of [`ElementKind::type_suffix`].
    pub fn from_type_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "Box" => Some(Self::Box),
            "Text" => Some(Self::Text),
            "Line" => Some(Self::Line),
            "Freehand" => Some(Self::Freehand),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geometry and content of an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Shape {
    Box(BoxShape),
    Text(TextShape),
    Line(LineShape),
    Freehand(Freehand),
    Meta(MetaObject),
}

impl Shape {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Box(_) => ElementKind::Box,
            Self::Text(_) => ElementKind::Text,
            Self::Line(_) => ElementKind::Line,
            Self::Freehand(_) => ElementKind::Freehand,
            Self::Meta(_) => ElementKind::MetaObject,
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Self::Box(shape) => shape.bounds(),
            Self::Text(shape) => shape.bounds(),
            Self::Line(shape) => shape.bounds(),
            Self::Freehand(shape) => shape.bounds(),
            Self::Meta(group) => group.bounds(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Box(shape) => shape.validate(),
            Self::Text(shape) => shape.validate(),
            Self::Freehand(shape) => shape.validate(),
            // Lines have no invariant; groups are checked on construction.
            Self::Line(_) | Self::Meta(_) => Ok(()),
        }
    }

    fn translated(&self, dx: i16, dy: i16) -> Result<Self, ValidationError> {
        let shape = match self {
            Self::Box(shape) => shape.translated(dx, dy).map(Self::Box),
            Self::Text(shape) => shape.translated(dx, dy).map(Self::Text),
            Self::Line(shape) => shape.translated(dx, dy).map(Self::Line),
            Self::Freehand(shape) => shape.translated(dx, dy).map(Self::Freehand),
            Self::Meta(group) => return group.translated(dx, dy).map(Self::Meta),
        };
        shape.ok_or(ValidationError::CoordinateOverflow)
    }
}

impl From<BoxShape> for Shape {
    fn from(shape: BoxShape) -> Self {
        Self::Box(shape)
    }
}

impl From<TextShape> for Shape {
    fn from(shape: TextShape) -> Self {
        Self::Text(shape)
    }
}

impl From<LineShape> for Shape {
    fn from(shape: LineShape) -> Self {
        Self::Line(shape)
    }
}

impl From<Freehand> for Shape {
    fn from(shape: Freehand) -> Self {
        Self::Freehand(shape)
    }
}

impl From<MetaObject> for Shape {
    fn from(group: MetaObject) -> Self {
        Self::Meta(group)
    }
}

/// A named, layered, colored shape.
///
/// The name is the element's identifier in generated code and the join key
/// when code is parsed back. Lower layers draw first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ElementRecord")]
pub struct Element {
    name: String,
    layer: i32,
    color: Color,
    #[serde(flatten)]
    shape: Shape,
}

/// Serialized form. Unknown colors fall back to white instead of failing
/// the whole snapshot.
#[derive(Deserialize)]
struct ElementRecord {
    name: String,
    #[serde(default)]
    layer: i32,
    #[serde(default)]
    color: Option<String>,
    #[serde(flatten)]
    shape: Shape,
}

impl TryFrom<ElementRecord> for Element {
    type Error = ValidationError;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let color = match record.color {
            None => Color::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(name = record.name.as_str(), color = raw.as_str(); "Unknown color, using WHITE");
                Color::default()
            }),
        };
        Ok(Self::new(record.name, record.shape)?
            .with_layer(record.layer)
            .with_color(color))
    }
}

impl Element {
    /// Creates an element on layer 0 in the default color.
    ///
    /// # Errors
    ///
    /// Fails if `name` is not a valid identifier or the shape breaks one of
    /// its invariants.
    ///
    /// # Examples
    ///
    /// ```
    /// use glyphboard_core::{
    ///     element::{BoxShape, Element},
    ///     geometry::{Point, Size},
    /// };
    ///
    /// let frame = BoxShape::new(Point::new(0, 0), Size::new(20, 10)).unwrap();
    /// let element = Element::new("frame", frame).unwrap();
    /// assert_eq!(element.name(), "frame");
    /// assert_eq!(element.layer(), 0);
    /// ```
    pub fn new(name: impl Into<String>, shape: impl Into<Shape>) -> Result<Self, ValidationError> {
        let name = name.into();
        let shape = shape.into();
        identifier::validate(&name)?;
        shape.validate()?;
        Ok(Self {
            name,
            layer: 0,
            color: Color::default(),
            shape,
        })
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Mutable access to the shape. Shape mutators validate on their own.
    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    pub fn bounds(&self) -> Rect {
        self.shape.bounds()
    }

    pub fn as_meta(&self) -> Option<&MetaObject> {
        match &self.shape {
            Shape::Meta(group) => Some(group),
            _ => None,
        }
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_layer(&mut self, layer: i32) {
        self.layer = layer;
    }

    /// Moves the element by `(dx, dy)` cells. Groups move their children.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CoordinateOverflow`] and leaves the element
    /// in place if any coordinate would leave the `i16` range.
    pub fn translate(&mut self, dx: i16, dy: i16) -> Result<(), ValidationError> {
        self.shape = self.shape.translated(dx, dy)?;
        Ok(())
    }

    /// Moves the element so its bounding box starts at `origin`.
    pub fn move_to(&mut self, origin: Point) -> Result<(), ValidationError> {
        let current = self.bounds().origin();
        let delta = |to: i16, from: i16| {
            i16::try_from(i32::from(to) - i32::from(from))
                .map_err(|_| ValidationError::CoordinateOverflow)
        };
        let dx = delta(origin.x, current.x)?;
        let dy = delta(origin.y, current.y)?;
        self.translate(dx, dy)
    }

    /// Resizes a box, or crops and pads a freehand canvas.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NonPositiveSize`] for a size below 1x1 and
    /// [`ValidationError::NotResizable`] for text, lines and groups. The
    /// element is unchanged on error.
    pub fn resize(&mut self, size: Size) -> Result<(), ValidationError> {
        self.shape = match &self.shape {
            Shape::Box(shape) => Shape::Box(shape.resized(size)?),
            Shape::Freehand(shape) => Shape::Freehand(shape.resized(size)?),
            other => return Err(ValidationError::NotResizable(other.kind())),
        };
        Ok(())
    }

    pub(crate) fn translated(&self, dx: i16, dy: i16) -> Result<Self, ValidationError> {
        Ok(Self {
            shape: self.shape.translated(dx, dy)?,
            ..self.clone()
        })
    }

    /// Renames without validation; callers check the scope.
    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// Orders elements for drawing: ascending layer, equal layers keep their
/// relative order.
pub fn draw_order(elements: &[Element]) -> Vec<&Element> {
    let mut ordered: Vec<&Element> = elements.iter().collect();
    ordered.sort_by_key(|element| element.layer());
    ordered
}
