//! Screens: named, ordered collections of top-level elements.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    element::{Element, ElementKind, MetaObject, Shape, draw_order},
    error::ValidationError,
    identifier,
};

/// One screen of a layout.
///
/// Element names are unique among the screen's top-level elements. Every
/// mutator either succeeds completely or leaves the screen as it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScreenRecord")]
pub struct Screen {
    name: String,
    elements: Vec<Element>,
}

#[derive(Deserialize)]
struct ScreenRecord {
    name: String,
    #[serde(default)]
    elements: Vec<Element>,
}

impl TryFrom<ScreenRecord> for Screen {
    type Error = ValidationError;

    fn try_from(record: ScreenRecord) -> Result<Self, Self::Error> {
        let mut screen = Screen::new(record.name)?;
        for element in record.elements {
            screen.add(element)?;
        }
        Ok(screen)
    }
}

impl Screen {
    /// Creates an empty screen.
    ///
    /// # Errors
    ///
    /// The name must be a valid identifier; it becomes part of the generated
    /// `Layout_<name>` struct and `drawScreen_<name>` function.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        identifier::validate(&name)?;
        Ok(Self {
            name,
            elements: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level elements in insertion order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.name() == name)
    }

    /// Mutable access to an element. Use [`Screen::rename`] to change its name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Appends an element.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateName`] if the name is taken.
    pub fn add(&mut self, element: Element) -> Result<(), ValidationError> {
        self.check_free(element.name())?;
        debug!(screen = self.name.as_str(), element = element.name(); "Adding element");
        self.elements.push(element);
        Ok(())
    }

    /// Appends a shape under the next automatic name, one layer above the
    /// current top. Returns the chosen name.
    ///
    /// # Examples
    ///
    /// ```
    /// use glyphboard_core::{
    ///     element::BoxShape,
    ///     geometry::{Point, Size},
    ///     screen::Screen,
    /// };
    ///
    /// let mut screen = Screen::new("Main").unwrap();
    /// let shape = BoxShape::new(Point::new(0, 0), Size::new(3, 3)).unwrap();
    /// assert_eq!(screen.add_shape(shape.clone()).unwrap(), "box0");
    /// assert_eq!(screen.add_shape(shape).unwrap(), "box1");
    /// assert_eq!(screen.get("box1").unwrap().layer(), 1);
    /// ```
    pub fn add_shape(&mut self, shape: impl Into<Shape>) -> Result<String, ValidationError> {
        let shape = shape.into();
        let name = self.next_name(shape.kind());
        let element = Element::new(name.clone(), shape)?.with_layer(self.next_layer());
        self.add(element)?;
        Ok(name)
    }

    /// The automatic name the next element of `kind` would get.
    pub fn next_name(&self, kind: ElementKind) -> String {
        identifier::auto_name(kind, self.elements.iter().map(Element::name))
    }

    /// One above the highest layer in use, or 0 for an empty screen.
    pub fn next_layer(&self) -> i32 {
        self.elements
            .iter()
            .map(Element::layer)
            .max()
            .map_or(0, |top| top.saturating_add(1))
    }

    /// Removes and returns an element.
    pub fn remove(&mut self, name: &str) -> Result<Element, ValidationError> {
        let index = self.index_of(name)?;
        debug!(screen = self.name.as_str(), element = name; "Removing element");
        Ok(self.elements.remove(index))
    }

    /// Renames an element.
    ///
    /// # Errors
    ///
    /// Fails if `old` does not exist, `new` is not an identifier, or `new`
    /// is already used by another element.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), ValidationError> {
        let index = self.index_of(old)?;
        identifier::validate(new)?;
        if old != new {
            self.check_free(new)?;
        }
        self.elements[index].set_name(new);
        Ok(())
    }

    /// Elements in draw order: ascending layer, ties in insertion order.
    pub fn draw_order(&self) -> Vec<&Element> {
        draw_order(&self.elements)
    }

    /// Moves the named elements into a new group called `group_name`.
    ///
    /// Children keep their relative order. The group takes the position of
    /// the first child and the lowest layer among them.
    pub fn group(&mut self, names: &[&str], group_name: &str) -> Result<(), ValidationError> {
        identifier::validate(group_name)?;
        if names.is_empty() {
            return Err(ValidationError::EmptyGroup);
        }
        for (i, name) in names.iter().enumerate() {
            self.index_of(name)?;
            if names[..i].contains(name) {
                return Err(ValidationError::DuplicateName {
                    name: name.to_string(),
                    scope: "group".to_string(),
                });
            }
        }
        if !names.contains(&group_name) {
            self.check_free(group_name)?;
        }

        let (members, rest): (Vec<(usize, Element)>, Vec<(usize, Element)>) = self
            .elements
            .iter()
            .cloned()
            .enumerate()
            .partition(|(_, e)| names.contains(&e.name()));
        let position = members.first().map_or(0, |(index, _)| *index);
        let layer = members.iter().map(|(_, e)| e.layer()).min().unwrap_or(0);
        let children: Vec<Element> = members.into_iter().map(|(_, e)| e).collect();
        let group = Element::new(group_name, MetaObject::new(children)?)?.with_layer(layer);

        // Members before `position` do not exist, so the index among the
        // remaining elements equals the number of kept elements before it.
        let insert_at = rest.iter().take_while(|(index, _)| *index < position).count();
        let mut elements: Vec<Element> = rest.into_iter().map(|(_, e)| e).collect();
        elements.insert(insert_at, group);
        self.elements = elements;
        debug!(screen = self.name.as_str(), group = group_name; "Grouped elements");
        Ok(())
    }

    /// Replaces a group by its children at the group's position.
    ///
    /// # Errors
    ///
    /// Fails with [`ValidationError::NotAGroup`] for other elements and with
    /// [`ValidationError::DuplicateName`] if a child name is used by a sibling.
    pub fn ungroup(&mut self, name: &str) -> Result<(), ValidationError> {
        let index = self.index_of(name)?;
        let Some(group) = self.elements[index].as_meta() else {
            return Err(ValidationError::NotAGroup(name.to_string()));
        };
        for child in group.children() {
            let clash = self
                .elements
                .iter()
                .enumerate()
                .any(|(i, e)| i != index && e.name() == child.name());
            if clash {
                return Err(ValidationError::DuplicateName {
                    name: child.name().to_string(),
                    scope: format!("screen `{}`", self.name),
                });
            }
        }

        let children = group.children().to_vec();
        self.elements.splice(index..=index, children);
        debug!(screen = self.name.as_str(), group = name; "Ungrouped element");
        Ok(())
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn index_of(&self, name: &str) -> Result<usize, ValidationError> {
        self.elements
            .iter()
            .position(|e| e.name() == name)
            .ok_or_else(|| ValidationError::UnknownElement(name.to_string()))
    }

    fn check_free(&self, name: &str) -> Result<(), ValidationError> {
        if self.contains(name) {
            Err(ValidationError::DuplicateName {
                name: name.to_string(),
                scope: format!("screen `{}`", self.name),
            })
        } else {
            Ok(())
        }
    }
}
