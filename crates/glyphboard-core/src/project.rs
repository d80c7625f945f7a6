//! Projects: named, ordered collections of screens.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{error::ValidationError, identifier, screen::Screen};

/// Name given to projects whose name cannot be recovered.
pub const DEFAULT_PROJECT_NAME: &str = "Untitled";

/// A layout project.
///
/// Screen names are unique within the project. The project name is free
/// text but must fit on a single line, since it is written into a comment
/// banner of the generated sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProjectRecord")]
pub struct Project {
    name: String,
    screens: Vec<Screen>,
}

#[derive(Deserialize)]
struct ProjectRecord {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    screens: Vec<Screen>,
}

fn default_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

impl TryFrom<ProjectRecord> for Project {
    type Error = ValidationError;

    fn try_from(record: ProjectRecord) -> Result<Self, Self::Error> {
        let mut project = Project::new(record.name)?;
        for screen in record.screens {
            project.add_screen(screen)?;
        }
        Ok(project)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: default_name(),
            screens: Vec::new(),
        }
    }
}

impl Project {
    /// Creates an empty project.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidProjectName`] for a blank name or
    /// one spanning several lines.
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        check_project_name(&name)?;
        Ok(Self {
            name,
            screens: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        check_project_name(&name)?;
        self.name = name;
        Ok(())
    }

    /// Screens in insertion order.
    pub fn screens(&self) -> &[Screen] {
        &self.screens
    }

    pub fn screen(&self, name: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.name() == name)
    }

    pub fn screen_mut(&mut self, name: &str) -> Option<&mut Screen> {
        self.screens.iter_mut().find(|s| s.name() == name)
    }

    /// Appends a screen.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateName`] if the name is taken.
    pub fn add_screen(&mut self, screen: Screen) -> Result<(), ValidationError> {
        self.check_free(screen.name())?;
        debug!(project = self.name.as_str(), screen = screen.name(); "Adding screen");
        self.screens.push(screen);
        Ok(())
    }

    /// Appends an empty screen and returns it for editing.
    pub fn new_screen(&mut self, name: &str) -> Result<&mut Screen, ValidationError> {
        self.add_screen(Screen::new(name)?)?;
        let index = self.screens.len() - 1;
        Ok(&mut self.screens[index])
    }

    /// Removes a screen together with all of its elements.
    pub fn remove_screen(&mut self, name: &str) -> Result<Screen, ValidationError> {
        let index = self.index_of(name)?;
        debug!(project = self.name.as_str(), screen = name; "Removing screen");
        Ok(self.screens.remove(index))
    }

    pub fn rename_screen(&mut self, old: &str, new: &str) -> Result<(), ValidationError> {
        let index = self.index_of(old)?;
        identifier::validate(new)?;
        if old != new {
            self.check_free(new)?;
        }
        self.screens[index].set_name(new);
        Ok(())
    }

    /// Serializes the project as a pretty-printed JSON snapshot.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Loads a JSON snapshot, validating every invariant on the way in.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn index_of(&self, name: &str) -> Result<usize, ValidationError> {
        self.screens
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| ValidationError::UnknownScreen(name.to_string()))
    }

    fn check_free(&self, name: &str) -> Result<(), ValidationError> {
        if self.screen(name).is_some() {
            Err(ValidationError::DuplicateName {
                name: name.to_string(),
                scope: format!("project `{}`", self.name),
            })
        } else {
            Ok(())
        }
    }
}

fn check_project_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() || name.contains(['\n', '\r']) {
        Err(ValidationError::InvalidProjectName)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_names_are_unique() {
        let mut project = Project::new("Demo").unwrap();
        project.new_screen("Main").unwrap();
        assert!(matches!(
            project.new_screen("Main"),
            Err(ValidationError::DuplicateName { .. })
        ));
        assert_eq!(project.screens().len(), 1);
    }

    #[test]
    fn test_rename_screen() {
        let mut project = Project::new("Demo").unwrap();
        project.new_screen("Main").unwrap();
        project.new_screen("Settings").unwrap();
        assert!(project.rename_screen("Main", "Settings").is_err());
        project.rename_screen("Main", "Home").unwrap();
        assert!(project.screen("Home").is_some());
        assert!(project.screen("Main").is_none());
    }

    #[test]
    fn test_remove_unknown_screen() {
        let mut project = Project::new("Demo").unwrap();
        assert_eq!(
            project.remove_screen("Nope"),
            Err(ValidationError::UnknownScreen("Nope".to_string()))
        );
    }

    #[test]
    fn test_project_name_must_be_single_line() {
        assert_eq!(Project::new("  "), Err(ValidationError::InvalidProjectName));
        assert_eq!(Project::new("a\nb"), Err(ValidationError::InvalidProjectName));
        assert!(Project::new("Weather station v2").is_ok());
    }

    #[test]
    fn test_snapshot_without_name_uses_default() {
        let project = Project::from_json(r#"{"screens": [{"name": "Main"}]}"#).unwrap();
        assert_eq!(project.name(), DEFAULT_PROJECT_NAME);
        assert!(project.screen("Main").unwrap().is_empty());
    }
}
