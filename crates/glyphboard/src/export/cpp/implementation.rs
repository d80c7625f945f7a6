//! The implementation source: resources, initializers and draw functions.

use std::fmt::Write;

use log::trace;

use glyphboard_core::{conventions::Conventions, element::Shape};

use super::{
    INDENT, write_banner,
    literal::quoted,
    resources::{Resource, ResourcePool},
};
use crate::{
    error::GenerationError,
    structure::{FlatEntry, FlatScreen, ProjectLayout},
};

pub fn write_implementation(
    out: &mut String,
    layout: &ProjectLayout<'_>,
    resources: &ResourcePool<'_>,
    conventions: &Conventions,
) -> Result<(), GenerationError> {
    write_banner(out, layout.name())?;
    writeln!(out, "#include \"{}\"", conventions.header_file())?;
    writeln!(out)?;

    writeln!(out, "// RESOURCES")?;
    for resource in resources.resources() {
        write_resource(out, resource, conventions)?;
    }
    writeln!(out)?;

    writeln!(out, "// IMPLEMENTATION")?;
    for screen in layout.screens() {
        write_screen(out, screen, resources, conventions)?;
    }
    Ok(())
}

fn write_resource(
    out: &mut String,
    resource: &Resource<'_>,
    conventions: &Conventions,
) -> Result<(), GenerationError> {
    let base = resource.base();
    let mut names = Vec::with_capacity(resource.lines().len());
    for (index, line) in resource.lines().iter().enumerate() {
        let name = conventions.resource_line(base, index);
        writeln!(out, "const char {name}[] PROGMEM = {};", quoted(line))?;
        names.push(name);
    }

    let entries = if names.is_empty() {
        "nullptr".to_string()
    } else {
        names.join(", ")
    };
    writeln!(
        out,
        "const char* const {}[] PROGMEM = {{ {entries} }};",
        conventions.resource_table(base)
    )?;
    Ok(())
}

fn write_screen(
    out: &mut String,
    screen: &FlatScreen<'_>,
    resources: &ResourcePool<'_>,
    conventions: &Conventions,
) -> Result<(), GenerationError> {
    let layout_struct = conventions.layout_struct(screen.name());
    for entry in screen.entries() {
        write_initializer(out, &layout_struct, entry, resources, conventions)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "void {}({}& {}) {{",
        conventions.draw_function(screen.name()),
        conventions.surface_type(),
        conventions.surface_param(),
    )?;
    for entry in screen.draw_sequence() {
        writeln!(
            out,
            "{INDENT}{}.draw({layout_struct}::{});",
            conventions.surface_param(),
            entry.identifier()
        )?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;
    trace!(screen = screen.name(); "Screen emitted");
    Ok(())
}

fn write_initializer(
    out: &mut String,
    layout_struct: &str,
    entry: &FlatEntry<'_>,
    resources: &ResourcePool<'_>,
    conventions: &Conventions,
) -> Result<(), GenerationError> {
    let element = entry.element();
    let Some(type_name) = conventions.type_name(element.kind()) else {
        return Ok(());
    };
    let color = conventions.color_constant(element.color());

    let fields = match element.shape() {
        Shape::Box(shape) => {
            let (origin, size) = (shape.origin(), shape.size());
            format!("{}, {}, {}, {}", origin.x, origin.y, size.width, size.height)
        }
        Shape::Text(shape) => {
            let origin = shape.origin();
            format!("{}, {}, {}", origin.x, origin.y, quoted(&shape.text()))
        }
        Shape::Line(shape) => {
            let (start, end) = (shape.start(), shape.end());
            format!("{}, {}, {}, {}", start.x, start.y, end.x, end.y)
        }
        Shape::Freehand(art) => {
            let origin = art.origin();
            let table = resources
                .get(art)
                .map(|resource| conventions.resource_table(resource.base()))
                .unwrap_or_else(|| "nullptr".to_string());
            format!("{}, {}, {table}, {}", origin.x, origin.y, art.content().len())
        }
        Shape::Meta(_) => return Ok(()),
    };

    writeln!(
        out,
        "const {type_name} {layout_struct}::{} = {{ {fields}, {color} }};",
        entry.identifier()
    )?;
    Ok(())
}
