//! Names shared by the code generator and the code parser.
//!
//! Generated sources address everything through a handful of fixed
//! prefixes and header names. Keeping them in one value means both
//! directions of translation agree on them, including when they are
//! overridden from configuration.

use serde::{Deserialize, Serialize};

use crate::{color::Color, element::ElementKind, error::ValidationError, identifier};

/// Suffix of a resource's per-line string constants: `RES_x_L0`, `RES_x_L1`, ...
pub const RESOURCE_LINE_SUFFIX: &str = "_L";
/// Suffix of a resource's line table.
pub const RESOURCE_TABLE_SUFFIX: &str = "_ARR";

/// Identifier prefixes and header names of the generated sources.
///
/// Every value is checked on load, so a configuration file cannot make the
/// generator write C++ that does not compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConventionsRecord")]
pub struct Conventions {
    header_file: String,
    runtime_header: String,
    include_guard: String,
    layout_prefix: String,
    draw_prefix: String,
    resource_prefix: String,
    type_prefix: String,
    color_enum: String,
    surface_type: String,
    surface_param: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            header_file: "ui_layout.h".to_string(),
            runtime_header: "SerialUI.h".to_string(),
            include_guard: "UI_LAYOUT_H".to_string(),
            layout_prefix: "Layout_".to_string(),
            draw_prefix: "drawScreen_".to_string(),
            resource_prefix: "RES_".to_string(),
            type_prefix: "UI_".to_string(),
            color_enum: "UI_Color".to_string(),
            surface_type: "SerialUI".to_string(),
            surface_param: "ui".to_string(),
        }
    }
}

/// Serialized form; missing keys keep their defaults.
#[derive(Deserialize)]
#[serde(default)]
struct ConventionsRecord {
    header_file: String,
    runtime_header: String,
    include_guard: String,
    layout_prefix: String,
    draw_prefix: String,
    resource_prefix: String,
    type_prefix: String,
    color_enum: String,
    surface_type: String,
    surface_param: String,
}

impl Default for ConventionsRecord {
    fn default() -> Self {
        let Conventions {
            header_file,
            runtime_header,
            include_guard,
            layout_prefix,
            draw_prefix,
            resource_prefix,
            type_prefix,
            color_enum,
            surface_type,
            surface_param,
        } = Conventions::default();
        Self {
            header_file,
            runtime_header,
            include_guard,
            layout_prefix,
            draw_prefix,
            resource_prefix,
            type_prefix,
            color_enum,
            surface_type,
            surface_param,
        }
    }
}

impl TryFrom<ConventionsRecord> for Conventions {
    type Error = ValidationError;

    fn try_from(record: ConventionsRecord) -> Result<Self, Self::Error> {
        let conventions = Self {
            header_file: record.header_file,
            runtime_header: record.runtime_header,
            include_guard: record.include_guard,
            layout_prefix: record.layout_prefix,
            draw_prefix: record.draw_prefix,
            resource_prefix: record.resource_prefix,
            type_prefix: record.type_prefix,
            color_enum: record.color_enum,
            surface_type: record.surface_type,
            surface_param: record.surface_param,
        };
        conventions.validate()?;
        Ok(conventions)
    }
}

impl Conventions {
    /// Checks that every name can be spliced into generated C++.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidConvention`] naming the first
    /// unusable field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let identifiers = [
            ("include_guard", &self.include_guard),
            ("color_enum", &self.color_enum),
            ("surface_type", &self.surface_type),
            ("surface_param", &self.surface_param),
        ];
        for (field, value) in identifiers {
            if !identifier::is_valid(value) {
                return Err(invalid(field, value));
            }
        }

        let prefixes = [
            ("layout_prefix", &self.layout_prefix),
            ("draw_prefix", &self.draw_prefix),
            ("resource_prefix", &self.resource_prefix),
            ("type_prefix", &self.type_prefix),
        ];
        for (field, value) in prefixes {
            if !is_identifier_prefix(value) {
                return Err(invalid(field, value));
            }
        }

        let headers = [
            ("header_file", &self.header_file),
            ("runtime_header", &self.runtime_header),
        ];
        for (field, value) in headers {
            let unusable = |c: char| c == '"' || c == '<' || c == '>' || c.is_control();
            if value.trim().is_empty() || value.contains(unusable) {
                return Err(invalid(field, value));
            }
        }
        Ok(())
    }

    /// File name the implementation includes, `ui_layout.h` by default.
    pub fn header_file(&self) -> &str {
        &self.header_file
    }

    /// Runtime header the declarations include.
    pub fn runtime_header(&self) -> &str {
        &self.runtime_header
    }

    pub fn include_guard(&self) -> &str {
        &self.include_guard
    }

    pub fn layout_prefix(&self) -> &str {
        &self.layout_prefix
    }

    pub fn draw_prefix(&self) -> &str {
        &self.draw_prefix
    }

    pub fn resource_prefix(&self) -> &str {
        &self.resource_prefix
    }

    pub fn color_enum(&self) -> &str {
        &self.color_enum
    }

    pub fn surface_type(&self) -> &str {
        &self.surface_type
    }

    pub fn surface_param(&self) -> &str {
        &self.surface_param
    }

    /// `Layout_<screen>`.
    pub fn layout_struct(&self, screen: &str) -> String {
        format!("{}{screen}", self.layout_prefix)
    }

    /// `drawScreen_<screen>`.
    pub fn draw_function(&self, screen: &str) -> String {
        format!("{}{screen}", self.draw_prefix)
    }

    /// Runtime struct of an element kind, e.g. `UI_Box`.
    pub fn type_name(&self, kind: ElementKind) -> Option<String> {
        kind.type_suffix()
            .map(|suffix| format!("{}{suffix}", self.type_prefix))
    }

    /// Inverse of [`Conventions::type_name`].
    pub fn kind_of_type(&self, type_name: &str) -> Option<ElementKind> {
        type_name
            .strip_prefix(self.type_prefix.as_str())
            .and_then(ElementKind::from_type_suffix)
    }

    /// `UI_Color::<NAME>`.
    pub fn color_constant(&self, color: Color) -> String {
        format!("{}::{}", self.color_enum, color.name())
    }

    /// `RES_<ordinal>_<identifier>`, the base name of a shared art resource.
    pub fn resource_base(&self, ordinal: usize, identifier: &str) -> String {
        format!("{}{ordinal}_{identifier}", self.resource_prefix)
    }

    /// Name of the string constant holding line `index` of a resource.
    pub fn resource_line(&self, base: &str, index: usize) -> String {
        format!("{base}{RESOURCE_LINE_SUFFIX}{index}")
    }

    /// Name of the line table of a resource.
    pub fn resource_table(&self, base: &str) -> String {
        format!("{base}{RESOURCE_TABLE_SUFFIX}")
    }

    /// Splits `RES_..._L<i>` into its base and line index.
    pub fn split_resource_line<'a>(&self, name: &'a str) -> Option<(&'a str, usize)> {
        if !name.starts_with(self.resource_prefix.as_str()) {
            return None;
        }
        let (base, index) = name.rsplit_once(RESOURCE_LINE_SUFFIX)?;
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some((base, index.parse().ok()?))
    }

    /// Base name of a `RES_..._ARR` table, if `name` is one.
    pub fn split_resource_table<'a>(&self, name: &'a str) -> Option<&'a str> {
        if !name.starts_with(self.resource_prefix.as_str()) {
            return None;
        }
        name.strip_suffix(RESOURCE_TABLE_SUFFIX)
    }
}

fn invalid(field: &'static str, value: &str) -> ValidationError {
    ValidationError::InvalidConvention {
        field,
        value: value.to_string(),
    }
}

/// A prefix followed by a screen or element name must stay an identifier.
fn is_identifier_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let conventions = Conventions::default();
        assert_eq!(conventions.layout_struct("Main"), "Layout_Main");
        assert_eq!(conventions.draw_function("Main"), "drawScreen_Main");
        assert_eq!(
            conventions.type_name(ElementKind::Freehand).as_deref(),
            Some("UI_Freehand")
        );
        assert_eq!(conventions.type_name(ElementKind::MetaObject), None);
        assert_eq!(conventions.color_constant(Color::BgBlue), "UI_Color::BG_BLUE");
    }

    #[test]
    fn test_resource_names_split_back() {
        let conventions = Conventions::default();
        let base = conventions.resource_base(0, "logo");
        assert_eq!(base, "RES_0_logo");
        let line = conventions.resource_line(&base, 12);
        assert_eq!(conventions.split_resource_line(&line), Some(("RES_0_logo", 12)));
        let table = conventions.resource_table(&base);
        assert_eq!(conventions.split_resource_table(&table), Some("RES_0_logo"));
        assert_eq!(conventions.split_resource_line("RES_0_logo_Lx"), None);
        assert_eq!(conventions.split_resource_table("Layout_Main"), None);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(Conventions::default().validate(), Ok(()));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let conventions: Conventions =
            serde_json::from_str(r#"{"layout_prefix": "Screen_"}"#).unwrap();
        assert_eq!(conventions.layout_struct("Main"), "Screen_Main");
        assert_eq!(conventions.draw_prefix(), "drawScreen_");
    }

    #[test]
    fn test_unusable_values_are_rejected_on_load() {
        let cases = [
            (r#"{"type_prefix": "UI-"}"#, "type_prefix"),
            (r#"{"layout_prefix": ""}"#, "layout_prefix"),
            (r#"{"draw_prefix": "9draw"}"#, "draw_prefix"),
            (r#"{"color_enum": "class"}"#, "color_enum"),
            (r#"{"surface_param": "the ui"}"#, "surface_param"),
            (r#"{"include_guard": "UI.LAYOUT"}"#, "include_guard"),
            (r#"{"header_file": "ui\"layout.h"}"#, "header_file"),
            (r#"{"runtime_header": "  "}"#, "runtime_header"),
        ];
        for (json, field) in cases {
            let err = serde_json::from_str::<Conventions>(json).unwrap_err();
            assert!(
                err.to_string().contains(&format!("convention `{field}`")),
                "{json}: {err}"
            );
        }
    }

    #[test]
    fn test_kind_of_type() {
        let conventions = Conventions::default();
        assert_eq!(conventions.kind_of_type("UI_Line"), Some(ElementKind::Line));
        assert_eq!(conventions.kind_of_type("UI_Widget"), None);
        assert_eq!(conventions.kind_of_type("Box"), None);
    }
}
