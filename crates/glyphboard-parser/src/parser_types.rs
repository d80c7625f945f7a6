//! Statement-level syntax of generated layout sources.
//!
//! These types borrow identifiers from the source text. They carry no
//! meaning yet; the [`elaborate`](crate::elaborate) phase turns them into a
//! project.

use crate::span::{SourceKind, Span, Spanned};

/// Comment or preprocessor line the generator emits around the statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// `// Project: <name>`
    ProjectName(String),
    /// Any other comment mentioning the generator signature.
    Banner,
    /// `// RESOURCES`
    ResourcesSection,
    /// `// IMPLEMENTATION`
    ImplementationSection,
    /// `#ifndef <guard>`
    IncludeGuard(String),
    /// `#include "<file>"` or `#include <file>`
    Include(String),
}

/// `static const <type_name> <name>;` inside a layout struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Member<'src> {
    pub type_name: Spanned<&'src str>,
    pub name: Spanned<&'src str>,
}

/// One value in an initializer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<'src> {
    Integer(i64),
    /// One or more adjacent string literals, concatenated.
    Text(String),
    /// `A`, `A::B`, ...
    Path(Vec<&'src str>),
}

impl Field<'_> {
    /// Short name of the field form, for diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Field::Integer(_) => "an integer",
            Field::Text(_) => "a string",
            Field::Path(_) => "a name",
        }
    }
}

/// `<surface>.draw(<scope>::<entry>);` inside a draw function.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall<'src> {
    pub scope: Spanned<&'src str>,
    pub entry: Spanned<&'src str>,
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Item<'src> {
    /// `struct Layout_S { static const UI_Box frame; ... };`
    LayoutStruct {
        name: Spanned<&'src str>,
        members: Vec<Member<'src>>,
    },
    /// `void drawScreen_S(SerialUI& ui);`
    DrawPrototype { name: Spanned<&'src str> },
    /// `const char RES_0_logo_L0[] PROGMEM = "...";`
    LineResource {
        name: Spanned<&'src str>,
        value: Spanned<String>,
    },
    /// `const char* const RES_0_logo_ARR[] PROGMEM = { RES_0_logo_L0, ... };`
    ///
    /// `None` entries are null pointers.
    ResourceTable {
        name: Spanned<&'src str>,
        entries: Vec<Spanned<Option<&'src str>>>,
    },
    /// `const UI_Box Layout_S::frame = { 0, 0, 20, 10, UI_Color::WHITE };`
    Initializer {
        type_name: Spanned<&'src str>,
        scope: Spanned<&'src str>,
        entry: Spanned<&'src str>,
        fields: Vec<Spanned<Field<'src>>>,
    },
    /// `void drawScreen_S(SerialUI& ui) { ui.draw(Layout_S::frame); ... }`
    DrawFunction {
        name: Spanned<&'src str>,
        calls: Vec<DrawCall<'src>>,
        /// Body statements that are not draw calls.
        skipped: Vec<Span>,
    },
}

impl Item<'_> {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Item::LayoutStruct { .. } => "layout struct",
            Item::DrawPrototype { .. } => "draw prototype",
            Item::LineResource { .. } => "line resource",
            Item::ResourceTable { .. } => "resource table",
            Item::Initializer { .. } => "initializer",
            Item::DrawFunction { .. } => "draw function",
        }
    }
}

/// Everything recognized in one source text.
#[derive(Debug, Clone)]
pub struct SourceFile<'src> {
    pub source: SourceKind,
    pub markers: Vec<Spanned<Marker>>,
    pub items: Vec<Spanned<Item<'src>>>,
}

impl SourceFile<'_> {
    /// Returns `true` if nothing at all was recognized.
    pub fn is_unrecognizable(&self) -> bool {
        self.markers.is_empty() && self.items.is_empty()
    }
}
