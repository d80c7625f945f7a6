//! Glyphboard - Bidirectional compiler for text-mode UI layouts.
//!
//! Turns a [`Project`] of screens and elements into the C++ sources the
//! `SerialUI` runtime is compiled with, and reconstructs a project from such
//! sources. Both directions share one set of naming
//! [`Conventions`](conventions::Conventions) taken from [`AppConfig`].

pub mod config;

mod error;
mod export;
mod structure;

pub use glyphboard_core::{
    asset, color, conventions, element, geometry, identifier, project, screen,
};
pub use glyphboard_parser::{
    Diagnostic, Label, ParseError, ParsedProject, Severity, SourceKind, Span, error::ErrorCode,
};

pub use error::{GenerationError, GlyphboardError, Sources};
pub use export::cpp::GeneratedSources;

use log::{debug, info, trace};

use asset::AssetLibrary;
use config::AppConfig;
use export::{Exporter, cpp::CppExporter};
use project::Project;
use structure::ProjectLayout;

/// Front end for generating and importing Glyphboard layout sources.
///
/// # Examples
///
/// ```rust
/// use glyphboard::{LayoutCompiler, config::AppConfig, project::Project};
///
/// let mut project = Project::new("Demo").expect("valid name");
/// project.new_screen("Main").expect("valid screen");
///
/// let compiler = LayoutCompiler::new(AppConfig::default());
///
/// // Generate the header and source text
/// let sources = compiler.generate(&project).expect("Failed to generate");
/// assert!(sources.declarations.contains("struct Layout_Main"));
///
/// // And read them back
/// let parsed = compiler
///     .parse(&sources.declarations, &sources.implementation)
///     .expect("Failed to parse");
/// assert_eq!(parsed.project, project);
/// ```
#[derive(Debug, Default)]
pub struct LayoutCompiler {
    config: AppConfig,
}

impl LayoutCompiler {
    /// Create a new compiler with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Naming conventions and project defaults
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Generate the declarations header and implementation source of a project.
    ///
    /// Group children are emitted as `<group>_<child>` entries, and identical
    /// freehand art is stored once.
    ///
    /// # Errors
    ///
    /// Returns [`GlyphboardError::Generation`] if flattening makes two entries
    /// of one screen share an identifier.
    pub fn generate(&self, project: &Project) -> Result<GeneratedSources, GlyphboardError> {
        info!(project = project.name(); "Generating sources");

        let layout = ProjectLayout::from_project(project)?;
        debug!(screens = layout.screens().len(); "Project flattened");

        let mut exporter = CppExporter::new(self.config.conventions());
        exporter.export_layout(&layout)?;
        let sources = exporter.finish();

        info!("Sources generated successfully");
        Ok(sources)
    }

    /// Reconstruct a project from previously generated sources.
    ///
    /// Recovered defects are returned in [`ParsedProject::warnings`].
    ///
    /// # Errors
    ///
    /// Returns [`GlyphboardError::Parse`] if either text contains nothing
    /// recognizable. The error keeps both texts for reporting.
    pub fn parse(
        &self,
        declarations: &str,
        implementation: &str,
    ) -> Result<ParsedProject, GlyphboardError> {
        info!("Parsing sources");

        let parsed = glyphboard_parser::parse(declarations, implementation, &self.config.parse_config())
            .map_err(|err| GlyphboardError::new_parse_error(err, declarations, implementation))?;

        debug!(warnings = parsed.warnings.len(); "Sources parsed");
        trace!(project:? = parsed.project; "Parsed project");
        Ok(parsed)
    }

    /// Load a project from a JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GlyphboardError::Project`] if the snapshot is malformed or
    /// breaks a model invariant.
    pub fn load_project(&self, json: &str) -> Result<Project, GlyphboardError> {
        let project = Project::from_json(json)?;
        debug!(project = project.name(), screens = project.screens().len(); "Project loaded");
        Ok(project)
    }

    /// Serialize a project as a JSON snapshot.
    pub fn save_project(&self, project: &Project) -> Result<String, GlyphboardError> {
        Ok(project.to_json()?)
    }

    /// Load an asset library file.
    ///
    /// # Errors
    ///
    /// Returns [`GlyphboardError::Asset`] if the file is not a valid library.
    pub fn load_assets(&self, json: &str) -> Result<AssetLibrary, GlyphboardError> {
        let library = AssetLibrary::from_json(json)?;
        debug!(assets = library.len(); "Asset library loaded");
        Ok(library)
    }
}
