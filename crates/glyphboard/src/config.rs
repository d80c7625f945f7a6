//! Configuration types for Glyphboard code generation and import.
//!
//! All types implement [`serde::Deserialize`] so the CLI can load them from a
//! TOML file. Every field has a default, so a partial file (or none) works.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining naming conventions and project settings.
//! - [`ProjectConfig`] - Settings applied to projects without an explicit name.
//!
//! # Example
//!
//! ```
//! # use glyphboard::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.conventions().layout_prefix(), "Layout_");
//! assert_eq!(config.project().default_name(), "Untitled");
//! ```

use serde::Deserialize;

use glyphboard_core::{conventions::Conventions, project::DEFAULT_PROJECT_NAME};
use glyphboard_parser::ParseConfig;

/// Top-level application configuration.
///
/// The [`Conventions`] are shared by both directions of translation, so
/// sources generated with a custom prefix import back with the same config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Identifier prefixes and header names of the generated sources.
    #[serde(default)]
    conventions: Conventions,

    /// Project settings section.
    #[serde(default)]
    project: ProjectConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`].
    ///
    /// # Arguments
    ///
    /// * `conventions` - Naming used in generated sources.
    /// * `project` - Project defaults.
    pub fn new(conventions: Conventions, project: ProjectConfig) -> Self {
        Self {
            conventions,
            project,
        }
    }

    /// Returns the naming conventions.
    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Returns the project settings.
    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    /// The parser settings matching this configuration.
    pub fn parse_config(&self) -> ParseConfig {
        ParseConfig::new(self.conventions.clone(), self.project.default_name())
    }
}

/// Settings applied to projects.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Name given to an imported project whose sources carry no banner.
    #[serde(default = "default_project_name")]
    default_name: String,
}

impl ProjectConfig {
    pub fn new(default_name: impl Into<String>) -> Self {
        Self {
            default_name: default_name.into(),
        }
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROJECT_NAME)
    }
}

fn default_project_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [conventions]
            layout_prefix = "Screen_"

            [project]
            "#,
        )
        .unwrap();
        assert_eq!(config.conventions().layout_prefix(), "Screen_");
        assert_eq!(config.conventions().draw_prefix(), "drawScreen_");
        assert_eq!(config.project().default_name(), "Untitled");
    }

    #[test]
    fn test_config_with_unusable_prefix_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
            [conventions]
            type_prefix = "UI::"
            "#,
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("convention `type_prefix`"), "{err}");
    }

    #[test]
    fn test_parse_config_carries_settings() {
        let config = AppConfig::new(Conventions::default(), ProjectConfig::new("Panel"));
        let parse_config = config.parse_config();
        assert_eq!(parse_config.default_project_name, "Panel");
        assert_eq!(parse_config.conventions, Conventions::default());
    }
}
