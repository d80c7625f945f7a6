//! A library of reusable element templates.
//!
//! The library is independent of any project. Templates are stored and
//! handed out as copies, so editing an instance never changes the template
//! and vice versa. Asset names form one namespace shared by all element
//! kinds.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    element::Element,
    error::{AssetError, NotFoundError, ValidationError},
    identifier,
    screen::Screen,
};

/// Name to template mapping, kept sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetLibrary {
    assets: BTreeMap<String, Element>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Stores a copy of `element` under `name`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] for a blank name.
    pub fn save(&mut self, name: &str, element: &Element) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let replaced = self.assets.insert(name.to_string(), element.clone()).is_some();
        debug!(asset = name, replaced; "Saved asset");
        Ok(())
    }

    /// Returns an independent copy of the template.
    pub fn load(&self, name: &str) -> Result<Element, NotFoundError> {
        self.assets
            .get(name)
            .cloned()
            .ok_or_else(|| NotFoundError(name.to_string()))
    }

    /// Asset names in ascending order.
    pub fn list(&self) -> Vec<&str> {
        self.assets.keys().map(String::as_str).collect()
    }

    /// Removes a template and returns it.
    pub fn delete(&mut self, name: &str) -> Result<Element, NotFoundError> {
        let element = self
            .assets
            .remove(name)
            .ok_or_else(|| NotFoundError(name.to_string()))?;
        debug!(asset = name; "Deleted asset");
        Ok(element)
    }

    /// Places a copy of a template on `screen` and returns the name it got.
    ///
    /// Without an explicit `name` the template's own element name is used
    /// if free, otherwise `<template>_<n>` with the smallest free `n >= 1`.
    /// The copy goes on top of the screen's current layers.
    ///
    /// # Examples
    ///
    /// ```
    /// use glyphboard_core::{
    ///     asset::AssetLibrary,
    ///     element::{BoxShape, Element},
    ///     geometry::{Point, Size},
    ///     screen::Screen,
    /// };
    ///
    /// let mut library = AssetLibrary::new();
    /// let frame = BoxShape::new(Point::new(0, 0), Size::new(10, 4)).unwrap();
    /// library.save("card", &Element::new("card", frame).unwrap()).unwrap();
    ///
    /// let mut screen = Screen::new("Main").unwrap();
    /// assert_eq!(library.instantiate("card", &mut screen, None).unwrap(), "card");
    /// assert_eq!(library.instantiate("card", &mut screen, None).unwrap(), "card_1");
    /// ```
    pub fn instantiate(
        &self,
        name: &str,
        screen: &mut Screen,
        instance_name: Option<&str>,
    ) -> Result<String, AssetError> {
        let mut element = self.load(name)?;
        let instance_name = match instance_name {
            Some(given) => {
                identifier::validate(given)?;
                given.to_string()
            }
            None => {
                let taken: Vec<&str> = screen.elements().iter().map(Element::name).collect();
                identifier::unique_with_suffix(element.name(), taken.iter().copied())
            }
        };
        element.set_name(&instance_name);
        element.set_layer(screen.next_layer());
        screen.add(element)?;
        debug!(asset = name, element = instance_name.as_str(); "Instantiated asset");
        Ok(instance_name)
    }

    /// Serializes the library as a JSON object keyed by asset name.
    pub fn to_json(&self) -> Result<String, AssetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        let library: Self = serde_json::from_str(json)?;
        if library.assets.keys().any(|name| name.trim().is_empty()) {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(library)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Color,
        element::{LineShape, TextShape},
        geometry::Point,
    };

    fn label() -> Element {
        Element::new("label", TextShape::from_text(Point::new(1, 1), "Hello")).unwrap()
    }

    #[test]
    fn test_load_returns_independent_copy() {
        let mut library = AssetLibrary::new();
        library.save("greeting", &label()).unwrap();
        let mut copy = library.load("greeting").unwrap();
        copy.set_color(Color::Red);
        assert_eq!(library.load("greeting").unwrap().color(), Color::White);
    }

    #[test]
    fn test_save_overwrites() {
        let mut library = AssetLibrary::new();
        library.save("x", &label()).unwrap();
        let line = Element::new("rule", LineShape::new(Point::new(0, 0), Point::new(5, 0))).unwrap();
        library.save("x", &line).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.load("x").unwrap().name(), "rule");
    }

    #[test]
    fn test_list_is_sorted_and_global() {
        let mut library = AssetLibrary::new();
        library.save("zeta", &label()).unwrap();
        library.save("alpha", &label()).unwrap();
        library.save("mid", &label()).unwrap();
        assert_eq!(library.list(), ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_missing_asset() {
        let mut library = AssetLibrary::new();
        assert_eq!(library.load("ghost"), Err(NotFoundError("ghost".to_string())));
        assert_eq!(library.delete("ghost"), Err(NotFoundError("ghost".to_string())));
    }

    #[test]
    fn test_instantiate_with_explicit_name() {
        let mut library = AssetLibrary::new();
        library.save("greeting", &label()).unwrap();
        let mut screen = Screen::new("Main").unwrap();
        let name = library.instantiate("greeting", &mut screen, Some("title")).unwrap();
        assert_eq!(name, "title");
        assert!(screen.get("title").is_some());
        assert!(matches!(
            library.instantiate("greeting", &mut screen, Some("title")),
            Err(AssetError::Validation(ValidationError::DuplicateName { .. }))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let mut library = AssetLibrary::new();
        library.save("greeting", &label()).unwrap();
        let json = library.to_json().unwrap();
        assert_eq!(AssetLibrary::from_json(&json).unwrap(), library);
    }
}
