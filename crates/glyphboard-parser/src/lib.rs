//! # Glyphboard Parser
//!
//! Reconstructs a [`Project`] from the two texts the Glyphboard code
//! generator emits: the declarations header (layout structs and draw
//! prototypes) and the implementation source (resources, initializers and
//! draw functions).
//!
//! Parsing is forgiving. A damaged statement, an unknown color or a missing
//! resource costs only the affected piece and is reported as a warning in
//! [`ParsedProject::warnings`]. Only a text without any recognizable
//! generated construct fails with a [`ParseError`].
//!
//! ## Usage
//!
//! ```
//! # use glyphboard_parser::{parse, ParseConfig, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let declarations = r#"
//!         #ifndef UI_LAYOUT_H
//!         #define UI_LAYOUT_H
//!         #include "SerialUI.h"
//!         struct Layout_Main {
//!             static const UI_Box frame;
//!         };
//!         void drawScreen_Main(SerialUI& ui);
//!         #endif
//!     "#;
//!     let implementation = r#"
//!         #include "ui_layout.h"
//!         // IMPLEMENTATION
//!         const UI_Box Layout_Main::frame = { 0, 0, 20, 10, UI_Color::WHITE };
//!         void drawScreen_Main(SerialUI& ui) {
//!             ui.draw(Layout_Main::frame);
//!         }
//!     "#;
//!
//!     let parsed = parse(declarations, implementation, &ParseConfig::default())?;
//!     assert_eq!(parsed.project.screens()[0].elements()[0].name(), "frame");
//!     Ok(())
//! }
//! ```

mod elaborate;
pub mod error;
mod lexer;
mod parser;
#[cfg(test)]
mod parser_tests;
mod parser_types;
mod span;
mod tokens;

pub use elaborate::ParseConfig;
pub use error::{Diagnostic, Label, ParseError, Severity};
pub use span::{SourceKind, Span};

use log::{debug, info};

use glyphboard_core::project::Project;

use elaborate::Builder;

/// A project recovered from generated sources, with the defects met on the way.
#[derive(Debug, Clone)]
pub struct ParsedProject {
    pub project: Project,
    /// Recovered defects in the order they were found.
    pub warnings: Vec<Diagnostic>,
}

/// Parse generated declarations and implementation back into a project.
///
/// The pipeline:
///
/// 1. **Tokenize** both texts; lexical defects become warnings
/// 2. **Parse** statements; unrecognized ones are skipped with a warning
/// 3. **Elaborate** resources, elements and screens into a [`Project`]
///
/// # Errors
///
/// Returns a [`ParseError`] if either text contains no generated construct
/// at all. Its diagnostics carry the [`SourceKind`] they point into.
pub fn parse(
    declarations: &str,
    implementation: &str,
    config: &ParseConfig,
) -> Result<ParsedProject, ParseError> {
    info!(
        declarations_len = declarations.len(),
        implementation_len = implementation.len();
        "Parsing generated sources",
    );

    // Step 1: Tokenize
    let (declaration_tokens, mut diagnostics) = lexer::tokenize(declarations, SourceKind::Declarations);
    let (implementation_tokens, implementation_diagnostics) =
        lexer::tokenize(implementation, SourceKind::Implementation);
    diagnostics.extend(implementation_diagnostics);
    debug!(
        declaration_tokens = declaration_tokens.len(),
        implementation_tokens = implementation_tokens.len();
        "Tokenized",
    );

    // Step 2: Parse
    let declaration_file =
        parser::parse_source(&declaration_tokens, SourceKind::Declarations, &mut diagnostics);
    let implementation_file =
        parser::parse_source(&implementation_tokens, SourceKind::Implementation, &mut diagnostics);

    // Step 3: Elaborate
    let builder = Builder::new(config, diagnostics);
    let (project, warnings) = builder.build(&declaration_file, &implementation_file)?;
    Ok(ParsedProject { project, warnings })
}
