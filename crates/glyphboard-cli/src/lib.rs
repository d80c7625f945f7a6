//! Glyphboard CLI library
//!
//! This module contains the core CLI logic for the Glyphboard layout
//! compiler: reading inputs, running one translation and writing results.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{fs, path::Path};

use log::{info, warn};

use glyphboard::{GlyphboardError, LayoutCompiler, Sources};

use error_adapter::{DiagnosticAdapter, render};

/// Run the Glyphboard CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `GlyphboardError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed project snapshots or asset libraries
/// - Identifier collisions during generation
/// - Sources without any generated construct
pub fn run(args: &Args) -> Result<(), GlyphboardError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let compiler = LayoutCompiler::new(app_config);

    match &args.command {
        Command::Generate { input, out_dir } => generate(&compiler, input, out_dir),
        Command::Import {
            declarations,
            implementation,
            output,
        } => import(&compiler, declarations, implementation, output),
        Command::Assets { library } => list_assets(&compiler, library),
    }
}

fn generate(compiler: &LayoutCompiler, input: &str, out_dir: &str) -> Result<(), GlyphboardError> {
    info!(input_path = input, out_dir = out_dir; "Generating layout sources");

    let project = compiler.load_project(&fs::read_to_string(input)?)?;
    let sources = compiler.generate(&project)?;

    let header_file = compiler.config().conventions().header_file();
    let header_path = Path::new(out_dir).join(header_file);
    let source_path = header_path.with_extension("cpp");

    fs::create_dir_all(out_dir)?;
    fs::write(&header_path, &sources.declarations)?;
    fs::write(&source_path, &sources.implementation)?;

    info!(
        header = header_path.display().to_string(),
        source = source_path.display().to_string();
        "Layout sources written",
    );
    Ok(())
}

fn import(
    compiler: &LayoutCompiler,
    declarations_path: &str,
    implementation_path: &str,
    output: &str,
) -> Result<(), GlyphboardError> {
    info!(
        declarations_path = declarations_path,
        implementation_path = implementation_path,
        output_path = output;
        "Importing layout sources",
    );

    let sources = Sources {
        declarations: fs::read_to_string(declarations_path)?,
        implementation: fs::read_to_string(implementation_path)?,
    };
    let parsed = compiler.parse(&sources.declarations, &sources.implementation)?;

    for warning in &parsed.warnings {
        warn!("{}", render(&DiagnosticAdapter::with_sources(warning, &sources)));
    }

    fs::write(output, compiler.save_project(&parsed.project)?)?;

    info!(
        project = parsed.project.name(),
        screens = parsed.project.screens().len(),
        warnings = parsed.warnings.len();
        "Project snapshot written",
    );
    Ok(())
}

fn list_assets(compiler: &LayoutCompiler, library_path: &str) -> Result<(), GlyphboardError> {
    let library = compiler.load_assets(&fs::read_to_string(library_path)?)?;
    info!(library_path = library_path, assets = library.len(); "Asset library loaded");

    for name in library.list() {
        let asset = library.load(name).map_err(|err| GlyphboardError::Asset(err.into()))?;
        let bounds = asset.bounds();
        println!(
            "{name}\t{}\t{}x{}",
            asset.kind(),
            bounds.size().width,
            bounds.size().height
        );
    }
    Ok(())
}
