//! Flattened project structure ready for code generation.
//!
//! Generated sources have no notion of groups: every leaf element becomes
//! one `static const` entry of its screen's layout struct. This module
//! turns the element tree of each screen into that flat form:
//!
//! - **Entries** in source order: depth-first, insertion order, a group
//!   child named `<group>_<child>` ([`FlatScreen::entries`])
//! - **Draw sequence**: ascending layers, each group's children contiguous
//!   and ordered by their own layers ([`FlatScreen::draw_sequence`])
//!
//! Identifier collisions are detected here, before anything is emitted.

use std::collections::HashMap;

use log::{debug, trace};

use glyphboard_core::{
    element::{Element, Shape},
    project::Project,
    screen::Screen,
};

use crate::error::GenerationError;

/// One leaf element under its generated identifier.
#[derive(Debug)]
pub struct FlatEntry<'a> {
    identifier: String,
    element: &'a Element,
}

impl<'a> FlatEntry<'a> {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The leaf element. Never a group.
    pub fn element(&self) -> &'a Element {
        self.element
    }
}

/// A screen with its element tree flattened.
#[derive(Debug)]
pub struct FlatScreen<'a> {
    screen: &'a Screen,
    entries: Vec<FlatEntry<'a>>,
    draw_sequence: Vec<usize>,
}

impl<'a> FlatScreen<'a> {
    /// Flattens `screen`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::IdentifierCollision`] if two entries end up
    /// with the same identifier.
    pub fn from_screen(screen: &'a Screen) -> Result<Self, GenerationError> {
        let mut entries = Vec::new();
        collect_entries(screen.elements(), None, &mut entries);

        let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if index_of.insert(entry.identifier.as_str(), index).is_some() {
                return Err(GenerationError::IdentifierCollision {
                    screen: screen.name().to_string(),
                    identifier: entry.identifier.clone(),
                });
            }
        }

        let mut ordered = Vec::with_capacity(entries.len());
        collect_draw_order(&screen.draw_order(), None, &mut ordered);
        let draw_sequence = ordered
            .iter()
            .filter_map(|identifier| index_of.get(identifier.as_str()).copied())
            .collect();

        trace!(screen = screen.name(), entries = entries.len(); "Screen flattened");
        Ok(Self {
            screen,
            entries,
            draw_sequence,
        })
    }

    pub fn name(&self) -> &'a str {
        self.screen.name()
    }

    /// Entries in source order.
    pub fn entries(&self) -> &[FlatEntry<'a>] {
        &self.entries
    }

    /// Entries in the order the draw function calls them.
    pub fn draw_sequence(&self) -> impl Iterator<Item = &FlatEntry<'a>> {
        self.draw_sequence.iter().map(|&index| &self.entries[index])
    }
}

/// A whole project, flattened screen by screen.
#[derive(Debug)]
pub struct ProjectLayout<'a> {
    project: &'a Project,
    screens: Vec<FlatScreen<'a>>,
}

impl<'a> ProjectLayout<'a> {
    /// Flattens every screen of `project`.
    ///
    /// # Errors
    ///
    /// Returns the first [`GenerationError`] met, in screen order.
    pub fn from_project(project: &'a Project) -> Result<Self, GenerationError> {
        let screens = project
            .screens()
            .iter()
            .map(FlatScreen::from_screen)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(project = project.name(), screens = screens.len(); "Project structure built");
        Ok(Self { project, screens })
    }

    pub fn name(&self) -> &'a str {
        self.project.name()
    }

    pub fn screens(&self) -> &[FlatScreen<'a>] {
        &self.screens
    }
}

fn scoped(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}_{name}"),
        None => name.to_string(),
    }
}

fn collect_entries<'a>(elements: &'a [Element], prefix: Option<&str>, out: &mut Vec<FlatEntry<'a>>) {
    for element in elements {
        let identifier = scoped(prefix, element.name());
        match element.shape() {
            Shape::Meta(group) => collect_entries(group.children(), Some(&identifier), out),
            _ => out.push(FlatEntry {
                identifier,
                element,
            }),
        }
    }
}

fn collect_draw_order(elements: &[&Element], prefix: Option<&str>, out: &mut Vec<String>) {
    for element in elements {
        let identifier = scoped(prefix, element.name());
        match element.shape() {
            Shape::Meta(group) => collect_draw_order(&group.draw_order(), Some(&identifier), out),
            _ => out.push(identifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use glyphboard_core::{
        element::{BoxShape, MetaObject},
        geometry::{Point, Size},
    };

    use super::*;

    fn cell(name: &str, layer: i32) -> Element {
        Element::new(name, BoxShape::new(Point::new(0, 0), Size::new(1, 1)).unwrap())
            .unwrap()
            .with_layer(layer)
    }

    fn group(name: &str, layer: i32, children: Vec<Element>) -> Element {
        Element::new(name, MetaObject::new(children).unwrap())
            .unwrap()
            .with_layer(layer)
    }

    fn identifiers<'e, 'a: 'e>(entries: impl Iterator<Item = &'e FlatEntry<'a>>) -> Vec<&'e str> {
        entries.map(|entry| entry.identifier()).collect()
    }

    #[test]
    fn test_nested_groups_flatten_depth_first() {
        let mut screen = Screen::new("Main").unwrap();
        screen.add(cell("a", 0)).unwrap();
        screen
            .add(group(
                "panel",
                1,
                vec![cell("title", 0), group("row", 1, vec![cell("icon", 0)])],
            ))
            .unwrap();
        screen.add(cell("z", 2)).unwrap();

        let flat = FlatScreen::from_screen(&screen).unwrap();
        assert_eq!(
            identifiers(flat.entries().iter()),
            ["a", "panel_title", "panel_row_icon", "z"]
        );
    }

    #[test]
    fn test_draw_sequence_keeps_groups_contiguous() {
        let mut screen = Screen::new("Main").unwrap();
        screen.add(cell("top", 5)).unwrap();
        screen
            .add(group("g", 1, vec![cell("late", 9), cell("early", -3)]))
            .unwrap();
        screen.add(cell("mid", 2)).unwrap();
        screen.add(cell("tie", 2)).unwrap();

        let flat = FlatScreen::from_screen(&screen).unwrap();
        assert_eq!(
            identifiers(flat.draw_sequence()),
            ["g_early", "g_late", "mid", "tie", "top"]
        );
    }

    #[test]
    fn test_flattened_collision_is_rejected() {
        let mut screen = Screen::new("Main").unwrap();
        screen.add(cell("panel_title", 0)).unwrap();
        screen
            .add(group("panel", 1, vec![cell("title", 0)]))
            .unwrap();

        let err = FlatScreen::from_screen(&screen).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::IdentifierCollision { ref screen, ref identifier }
                if screen == "Main" && identifier == "panel_title"
        ));
    }
}
