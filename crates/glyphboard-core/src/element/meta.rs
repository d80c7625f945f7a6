//! Editor-time groups of elements.
//!
//! A [`MetaObject`] exclusively owns its children. Its bounding box is
//! recomputed whenever the child list or a child changes, and every mutation
//! is applied to a copy first so that a rejected change leaves the group
//! untouched.

use serde::{Deserialize, Serialize};

use crate::{
    element::{Element, draw_order},
    error::ValidationError,
    geometry::Rect,
    identifier,
};

/// Maximum nesting depth of groups (a group of leaves has depth 1).
pub const MAX_NESTING_DEPTH: usize = 8;

/// A named group of elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MetaObjectRecord")]
pub struct MetaObject {
    children: Vec<Element>,
    #[serde(skip)]
    bounds: Rect,
}

/// Serialized form. `x`/`y` are accepted for snapshots that stored children
/// relative to the group origin.
#[derive(Deserialize)]
struct MetaObjectRecord {
    #[serde(default)]
    x: i16,
    #[serde(default)]
    y: i16,
    #[serde(default)]
    children: Vec<Element>,
}

impl TryFrom<MetaObjectRecord> for MetaObject {
    type Error = ValidationError;

    fn try_from(record: MetaObjectRecord) -> Result<Self, Self::Error> {
        let children = if record.x == 0 && record.y == 0 {
            record.children
        } else {
            record
                .children
                .iter()
                .map(|child| child.translated(record.x, record.y))
                .collect::<Result<_, _>>()?
        };
        Self::new(children)
    }
}

impl MetaObject {
    /// Groups `children`.
    ///
    /// # Errors
    ///
    /// Fails if the list is empty, if two children share a name, if the
    /// group would nest deeper than [`MAX_NESTING_DEPTH`], or if no child
    /// covers a cell (e.g. only empty text).
    pub fn new(children: Vec<Element>) -> Result<Self, ValidationError> {
        if children.is_empty() {
            return Err(ValidationError::EmptyGroup);
        }
        for (i, child) in children.iter().enumerate() {
            if children[..i].iter().any(|c| c.name() == child.name()) {
                return Err(ValidationError::DuplicateName {
                    name: child.name().to_string(),
                    scope: "group".to_string(),
                });
            }
        }
        let mut group = Self {
            children,
            bounds: Rect::default(),
        };
        let depth = group.depth();
        if depth > MAX_NESTING_DEPTH {
            return Err(ValidationError::NestingTooDeep {
                depth,
                max: MAX_NESTING_DEPTH,
            });
        }
        group.refresh_bounds();
        group.check_bounds()?;
        Ok(group)
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name() == name)
    }

    /// Union of the children's bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Nesting depth: 1 for a group of leaves.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .filter_map(|c| c.as_meta())
            .map(MetaObject::depth)
            .max()
            .unwrap_or(0)
    }

    /// Children in draw order: ascending layer, ties in insertion order.
    pub fn draw_order(&self) -> Vec<&Element> {
        draw_order(&self.children)
    }

    /// Adds a child at the end.
    pub fn push_child(&mut self, child: Element) -> Result<(), ValidationError> {
        let mut children = self.children.clone();
        children.push(child);
        *self = Self::new(children)?;
        Ok(())
    }

    /// Removes and returns a child. The last child cannot be removed.
    pub fn remove_child(&mut self, name: &str) -> Result<Element, ValidationError> {
        let index = self.index_of(name)?;
        if self.children.len() == 1 {
            return Err(ValidationError::EmptyGroup);
        }
        let mut children = self.children.clone();
        let child = children.remove(index);
        *self = Self::new(children)?;
        Ok(child)
    }

    /// Renames a child after checking the new name within the group.
    pub fn rename_child(&mut self, old: &str, new: &str) -> Result<(), ValidationError> {
        let index = self.index_of(old)?;
        identifier::validate(new)?;
        if old != new && self.child(new).is_some() {
            return Err(ValidationError::DuplicateName {
                name: new.to_string(),
                scope: "group".to_string(),
            });
        }
        self.children[index].set_name(new);
        Ok(())
    }

    /// Applies `f` to a copy of the named child and commits it on success.
    ///
    /// Names cannot be changed through this path; use [`MetaObject::rename_child`].
    pub fn update_child<R>(
        &mut self,
        name: &str,
        f: impl FnOnce(&mut Element) -> Result<R, ValidationError>,
    ) -> Result<R, ValidationError> {
        let index = self.index_of(name)?;
        let mut child = self.children[index].clone();
        let result = f(&mut child)?;
        let mut children = self.children.clone();
        children[index] = child;
        *self = Self::new(children)?;
        Ok(result)
    }

    pub(crate) fn translated(&self, dx: i16, dy: i16) -> Result<Self, ValidationError> {
        let children = self
            .children
            .iter()
            .map(|child| child.translated(dx, dy))
            .collect::<Result<Vec<_>, _>>()?;
        let mut group = Self {
            children,
            bounds: Rect::default(),
        };
        group.refresh_bounds();
        Ok(group)
    }

    fn index_of(&self, name: &str) -> Result<usize, ValidationError> {
        self.children
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| ValidationError::UnknownElement(name.to_string()))
    }

    fn check_bounds(&self) -> Result<(), ValidationError> {
        if self.bounds.is_empty() {
            let size = self.bounds.size();
            return Err(ValidationError::EmptyGroupBounds {
                width: size.width,
                height: size.height,
            });
        }
        Ok(())
    }

    fn refresh_bounds(&mut self) {
        self.bounds = self
            .children
            .iter()
            .fold(Rect::default(), |acc, child| acc.union(&child.bounds()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        element::{BoxShape, Shape, TextShape},
        geometry::{Point, Size},
    };

    fn frame(name: &str, x: i16, y: i16) -> Element {
        Element::new(
            name,
            BoxShape::new(Point::new(x, y), Size::new(2, 2)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_bounds_cover_children() {
        let group = MetaObject::new(vec![frame("a", 0, 0), frame("b", 4, 4)]).unwrap();
        assert_eq!(group.bounds(), Rect::new(Point::new(0, 0), Size::new(6, 6)));
    }

    #[test]
    fn test_bounds_follow_child_updates() {
        let mut group = MetaObject::new(vec![frame("a", 0, 0), frame("b", 4, 4)]).unwrap();
        group.update_child("b", |b| b.translate(2, 0)).unwrap();
        assert_eq!(group.bounds().size(), Size::new(8, 6));
    }

    #[test]
    fn test_failed_update_leaves_group_unchanged() {
        let mut group = MetaObject::new(vec![frame("a", 0, 0)]).unwrap();
        let before = group.clone();
        let result = group.update_child("a", |a| a.resize(Size::new(0, 0)));
        assert!(result.is_err());
        assert_eq!(group, before);
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert_eq!(MetaObject::new(Vec::new()), Err(ValidationError::EmptyGroup));
        assert!(matches!(
            MetaObject::new(vec![frame("a", 0, 0), frame("a", 1, 1)]),
            Err(ValidationError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_rejects_children_without_cells() {
        let blank = Element::new("blank", TextShape::from_text(Point::new(3, 3), "")).unwrap();
        assert_eq!(
            MetaObject::new(vec![blank.clone()]),
            Err(ValidationError::EmptyGroupBounds { width: 0, height: 0 })
        );

        let mut group = MetaObject::new(vec![blank, frame("a", 0, 0)]).unwrap();
        assert_eq!(group.bounds(), Rect::new(Point::new(0, 0), Size::new(2, 2)));
        let before = group.clone();
        assert!(group.remove_child("a").is_err());
        assert_eq!(group, before);
    }

    #[test]
    fn test_last_child_cannot_be_removed() {
        let mut group = MetaObject::new(vec![frame("a", 0, 0)]).unwrap();
        assert_eq!(group.remove_child("a"), Err(ValidationError::EmptyGroup));
    }

    #[test]
    fn test_nesting_bound() {
        let mut element = frame("leaf", 0, 0);
        for level in 0..MAX_NESTING_DEPTH {
            let group = MetaObject::new(vec![element]).unwrap();
            element = Element::new(format!("g{level}"), Shape::Meta(group)).unwrap();
        }
        assert!(matches!(
            MetaObject::new(vec![element]),
            Err(ValidationError::NestingTooDeep { depth: 9, max: 8 })
        ));
    }

    #[test]
    fn test_relative_snapshot_children_are_made_absolute() {
        let json = r#"{"x": 10, "y": 5, "children": [
            {"name": "a", "type": "BOX", "x": 1, "y": 1, "w": 2, "h": 2}
        ]}"#;
        let group: MetaObject = serde_json::from_str(json).unwrap();
        assert_eq!(group.bounds().origin(), Point::new(11, 6));
    }
}
