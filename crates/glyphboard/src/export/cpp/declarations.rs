//! The declarations header: one layout struct and one draw prototype per screen.

use std::fmt::Write;

use glyphboard_core::conventions::Conventions;

use super::{INDENT, write_banner};
use crate::{error::GenerationError, structure::ProjectLayout};

pub fn write_declarations(
    out: &mut String,
    layout: &ProjectLayout<'_>,
    conventions: &Conventions,
) -> Result<(), GenerationError> {
    write_banner(out, layout.name())?;
    writeln!(out, "#ifndef {}", conventions.include_guard())?;
    writeln!(out, "#define {}", conventions.include_guard())?;
    writeln!(out)?;
    writeln!(out, "#include \"{}\"", conventions.runtime_header())?;

    for screen in layout.screens() {
        writeln!(out)?;
        writeln!(out, "struct {} {{", conventions.layout_struct(screen.name()))?;
        for entry in screen.entries() {
            // Flattened entries are never groups, which have no runtime type.
            let Some(type_name) = conventions.type_name(entry.element().kind()) else {
                continue;
            };
            writeln!(out, "{INDENT}static const {type_name} {};", entry.identifier())?;
        }
        writeln!(out, "}};")?;
        writeln!(out)?;
        writeln!(
            out,
            "void {}({}& {});",
            conventions.draw_function(screen.name()),
            conventions.surface_type(),
            conventions.surface_param(),
        )?;
    }

    writeln!(out)?;
    writeln!(out, "#endif")?;
    Ok(())
}
