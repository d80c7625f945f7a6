//! C++ export backend.
//!
//! Emits the two texts the `SerialUI` runtime is compiled with: a
//! declarations header and an implementation source. Output depends only on
//! the project and the [`Conventions`], so identical input produces
//! byte-identical text.

mod declarations;
mod implementation;
mod literal;
mod resources;

use std::fmt::Write;

use log::{debug, info};

use glyphboard_core::conventions::Conventions;

use super::Exporter;
use crate::{error::GenerationError, structure::ProjectLayout};

pub use literal::quoted;
pub use resources::ResourcePool;

/// First line of every generated file.
pub const BANNER: &str = "// Generated by glyphboard. Do not edit by hand.";

const INDENT: &str = "    ";

/// The generated header and source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedSources {
    /// Layout structs and draw prototypes (`ui_layout.h`).
    pub declarations: String,
    /// Resources, initializers and draw functions.
    pub implementation: String,
}

/// Exporter producing [`GeneratedSources`].
#[derive(Debug)]
pub struct CppExporter<'c> {
    conventions: &'c Conventions,
    sources: GeneratedSources,
}

impl<'c> CppExporter<'c> {
    pub fn new(conventions: &'c Conventions) -> Self {
        Self {
            conventions,
            sources: GeneratedSources::default(),
        }
    }

    /// Consumes the exporter and returns what it emitted.
    pub fn finish(self) -> GeneratedSources {
        self.sources
    }
}

impl Exporter for CppExporter<'_> {
    fn export_layout(&mut self, layout: &ProjectLayout<'_>) -> Result<(), GenerationError> {
        info!(project = layout.name(); "Emitting C++ sources");
        let resources = ResourcePool::collect(layout, self.conventions);

        let mut declarations = String::new();
        declarations::write_declarations(&mut declarations, layout, self.conventions)?;

        let mut implementation = String::new();
        implementation::write_implementation(&mut implementation, layout, &resources, self.conventions)?;

        debug!(
            declarations_len = declarations.len(),
            implementation_len = implementation.len(),
            resources = resources.resources().len();
            "C++ sources emitted",
        );
        self.sources = GeneratedSources {
            declarations,
            implementation,
        };
        Ok(())
    }
}

fn write_banner(out: &mut String, project: &str) -> Result<(), GenerationError> {
    writeln!(out, "{BANNER}")?;
    writeln!(out, "// Project: {project}")?;
    Ok(())
}
