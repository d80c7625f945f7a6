//! Elaboration phase.
//!
//! Turns the statements recognized in the declarations and implementation
//! texts into a [`Project`]. Every defect found on the way is reported as a
//! warning and the affected piece falls back to a default or is left out;
//! only texts without any recognizable construct are fatal.
//!
//! The work is done in three passes:
//!
//! 1. **Resources**: line constants and their tables become art blocks.
//! 2. **Elements**: each initializer becomes an [`Element`].
//! 3. **Screens**: the draw calls of each draw function decide which
//!    elements a screen holds and their layers. Elements keep the order of
//!    their initializers.

use std::collections::{HashMap, hash_map::Entry};

use log::{debug, info, trace};

use glyphboard_core::{
    color::Color,
    conventions::Conventions,
    element::{BoxShape, Element, ElementKind, Freehand, LineShape, MAX_FREEHAND_LINES, Shape, TextShape},
    geometry::{Point, Size},
    identifier,
    project::{DEFAULT_PROJECT_NAME, Project},
    screen::Screen,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types::{Field, Item, Marker, SourceFile},
    span::{SourceKind, Span, Spanned},
};

/// Configuration for reconstructing a project from generated sources.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Identifier prefixes and header names the sources were generated with.
    pub conventions: Conventions,
    /// Project name used when the sources carry no `// Project:` banner.
    pub default_project_name: String,
}

impl ParseConfig {
    pub fn new(conventions: Conventions, default_project_name: impl Into<String>) -> Self {
        Self {
            conventions,
            default_project_name: default_project_name.into(),
        }
    }
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self::new(Conventions::default(), DEFAULT_PROJECT_NAME)
    }
}

/// A name together with where it was found.
#[derive(Debug, Clone, Copy)]
struct Origin<'src> {
    name: &'src str,
    span: Span,
    source: SourceKind,
}

/// A `static const` member of a layout struct.
#[derive(Debug, Clone, Copy)]
struct Declared<'src> {
    screen: &'src str,
    entry: Origin<'src>,
    type_name: &'src str,
}

/// An element whose screen membership is not decided yet.
#[derive(Debug)]
struct Pending<'src> {
    screen: &'src str,
    element: Element,
    origin: Origin<'src>,
}

pub(crate) struct Builder<'a> {
    cfg: &'a ParseConfig,
    diagnostics: DiagnosticCollector,
}

impl<'a> Builder<'a> {
    /// Creates a builder continuing the diagnostics of the earlier phases.
    pub fn new(cfg: &'a ParseConfig, diagnostics: DiagnosticCollector) -> Self {
        Self { cfg, diagnostics }
    }

    // ============================================================================
    // Main Entry Methods
    // ============================================================================

    /// Reconstructs the project.
    ///
    /// Returns the project with all warnings in emission order, or a
    /// [`ParseError`] if either text holds nothing recognizable.
    pub fn build<'src>(
        mut self,
        declarations: &SourceFile<'src>,
        implementation: &SourceFile<'src>,
    ) -> Result<(Project, Vec<Diagnostic>), ParseError> {
        info!("Reconstructing project");

        self.check_recognizable(
            declarations,
            ErrorCode::E100,
            "no layout declarations found",
            "expected the generated header with layout structs and draw prototypes",
        );
        self.check_recognizable(
            implementation,
            ErrorCode::E101,
            "no layout implementation found",
            "expected the generated source with resources, initializers and draw functions",
        );

        let files = [declarations, implementation];
        let project = self.reconstruct(files);
        let warnings = self.diagnostics.finish()?;

        info!(
            project = project.name(),
            screens = project.screens().len(),
            warnings = warnings.len();
            "Project reconstructed",
        );
        Ok((project, warnings))
    }

    fn check_recognizable(
        &mut self,
        file: &SourceFile<'_>,
        code: ErrorCode,
        message: &str,
        help: &str,
    ) {
        if file.is_unrecognizable() {
            self.diagnostics.emit(
                Diagnostic::coded(code, message)
                    .in_source(file.source)
                    .with_label(Span::new(0..0), "no generated construct in this text")
                    .with_help(help),
            );
        }
    }

    fn reconstruct<'src>(&mut self, files: [&SourceFile<'src>; 2]) -> Project {
        let screen_order = self.screen_order(files);
        trace!(screen_order:?; "Screen order");

        debug!("Pass 1: resources");
        let tables = self.collect_resources(files);

        debug!("Pass 2: elements");
        let declared = self.collect_declarations(files);
        let pending = self.collect_elements(files, &declared, &tables);

        debug!("Pass 3: screens");
        let screens = self.assemble_screens(files, &screen_order, pending);

        let mut project = self.project_shell(files);
        for screen in screens {
            let name = screen.name().to_string();
            if let Err(err) = project.add_screen(screen) {
                debug!(screen = name.as_str(), err:%; "Screen dropped");
            }
        }
        project
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    fn conventions(&self) -> &Conventions {
        &self.cfg.conventions
    }

    fn warn(
        &self,
        code: ErrorCode,
        message: String,
        span: Span,
        source: SourceKind,
        label: &str,
    ) -> Diagnostic {
        Diagnostic::coded(code, message)
            .in_source(source)
            .with_label(span, label.to_string())
    }

    /// Screen named by `name` after removing `prefix`.
    fn screen_of<'src>(name: &'src str, prefix: &str) -> Option<&'src str> {
        name.strip_prefix(prefix).filter(|screen| !screen.is_empty())
    }

    /// Screens in order of first appearance, declarations first.
    fn screen_order<'src>(&self, files: [&SourceFile<'src>; 2]) -> Vec<Origin<'src>> {
        let layout_prefix = self.conventions().layout_prefix();
        let draw_prefix = self.conventions().draw_prefix();

        let mut order: Vec<Origin<'src>> = Vec::new();
        for file in files {
            for item in &file.items {
                let screen = match item.inner() {
                    Item::LayoutStruct { name, .. } => Self::screen_of(*name.inner(), layout_prefix)
                        .map(|screen| (screen, name.span())),
                    Item::Initializer { scope, .. } => Self::screen_of(*scope.inner(), layout_prefix)
                        .map(|screen| (screen, scope.span())),
                    Item::DrawPrototype { name } | Item::DrawFunction { name, .. } => {
                        Self::screen_of(*name.inner(), draw_prefix).map(|screen| (screen, name.span()))
                    }
                    Item::LineResource { .. } | Item::ResourceTable { .. } => None,
                };
                if let Some((screen, span)) = screen {
                    if !order.iter().any(|known| known.name == screen) {
                        order.push(Origin {
                            name: screen,
                            span,
                            source: file.source,
                        });
                    }
                }
            }
        }
        order
    }

    // ============================================================================
    // Pass 1: Resources
    // ============================================================================

    /// Maps each resource table name to its art lines.
    fn collect_resources<'src>(
        &mut self,
        files: [&SourceFile<'src>; 2],
    ) -> HashMap<&'src str, Spanned<Vec<String>>> {
        let mut lines: HashMap<&'src str, (Spanned<String>, SourceKind)> = HashMap::new();
        for file in files {
            for item in &file.items {
                let Item::LineResource { name, value } = item.inner() else {
                    continue;
                };
                if self.conventions().split_resource_line(name).is_none() {
                    let diag = self
                        .warn(
                            ErrorCode::E200,
                            format!("malformed resource `{}`", name.inner()),
                            name.span(),
                            file.source,
                            "not a resource line name",
                        )
                        .with_help(format!(
                            "line constants are named `{}`",
                            self.conventions()
                                .resource_line(&self.conventions().resource_base(0, "element"), 0)
                        ));
                    self.diagnostics.emit(diag);
                    continue;
                }
                match lines.entry(*name.inner()) {
                    Entry::Occupied(first) => {
                        let diag = self
                            .warn(
                                ErrorCode::E202,
                                format!("resource `{}` is defined twice", name.inner()),
                                name.span(),
                                file.source,
                                "duplicate ignored",
                            )
                            .with_label_in(first.get().1, first.get().0.span(), "first defined here");
                        self.diagnostics.emit(diag);
                    }
                    Entry::Vacant(slot) => {
                        slot.insert((value.clone(), file.source));
                    }
                }
            }
        }

        let mut tables: HashMap<&'src str, Spanned<Vec<String>>> = HashMap::new();
        let mut table_sources: HashMap<&'src str, SourceKind> = HashMap::new();
        for file in files {
            for item in &file.items {
                let Item::ResourceTable { name, entries } = item.inner() else {
                    continue;
                };
                if self.conventions().split_resource_table(name).is_none() {
                    let diag = self.warn(
                        ErrorCode::E200,
                        format!("malformed resource table `{}`", name.inner()),
                        name.span(),
                        file.source,
                        "not a resource table name",
                    );
                    self.diagnostics.emit(diag);
                    continue;
                }
                if let (Some(first), Some(&first_source)) =
                    (tables.get(name.inner()), table_sources.get(name.inner()))
                {
                    let diag = self
                        .warn(
                            ErrorCode::E202,
                            format!("resource table `{}` is defined twice", name.inner()),
                            name.span(),
                            file.source,
                            "duplicate ignored",
                        )
                        .with_label_in(first_source, first.span(), "first defined here");
                    self.diagnostics.emit(diag);
                    continue;
                }

                let mut content = Vec::with_capacity(entries.len());
                for entry in entries {
                    let Some(line_name) = entry.inner() else {
                        continue;
                    };
                    match lines.get(line_name) {
                        Some((line, _)) => content.push(line.inner().clone()),
                        None => {
                            let diag = self
                                .warn(
                                    ErrorCode::E201,
                                    format!("resource line `{line_name}` is not defined"),
                                    entry.span(),
                                    file.source,
                                    "undefined resource",
                                )
                                .with_help("the line is imported empty");
                            self.diagnostics.emit(diag);
                            content.push(String::new());
                        }
                    }
                }
                trace!(table = *name.inner(), lines = content.len(); "Resource table");
                tables.insert(*name.inner(), Spanned::new(content, name.span()));
                table_sources.insert(*name.inner(), file.source);
            }
        }

        debug!(lines = lines.len(), tables = tables.len(); "Resources collected");
        tables
    }

    // ============================================================================
    // Pass 2: Elements
    // ============================================================================

    /// Collects the layout struct members, keyed by screen and entry.
    fn collect_declarations<'src>(
        &mut self,
        files: [&SourceFile<'src>; 2],
    ) -> Vec<Declared<'src>> {
        let mut declared: Vec<Declared<'src>> = Vec::new();
        for file in files {
            for item in &file.items {
                let Item::LayoutStruct { name, members } = item.inner() else {
                    continue;
                };
                let Some(screen) = Self::screen_of(*name.inner(), self.conventions().layout_prefix())
                else {
                    let diag = self
                        .warn(
                            ErrorCode::E304,
                            format!("struct `{}` is not a layout struct", name.inner()),
                            name.span(),
                            file.source,
                            "ignored",
                        )
                        .with_help(format!(
                            "layout structs are named `{}`",
                            self.conventions().layout_struct("<screen>")
                        ));
                    self.diagnostics.emit(diag);
                    continue;
                };
                for member in members {
                    let first = declared
                        .iter()
                        .find(|d| d.screen == screen && d.entry.name == *member.name.inner())
                        .map(|d| d.entry);
                    if let Some(first) = first {
                        let diag = self
                            .warn(
                                ErrorCode::E305,
                                format!("`{}` is declared twice in `{}`", member.name.inner(), name.inner()),
                                member.name.span(),
                                file.source,
                                "duplicate ignored",
                            )
                            .with_label_in(first.source, first.span, "first declared here");
                        self.diagnostics.emit(diag);
                        continue;
                    }
                    declared.push(Declared {
                        screen,
                        entry: Origin {
                            name: *member.name.inner(),
                            span: member.name.span(),
                            source: file.source,
                        },
                        type_name: *member.type_name.inner(),
                    });
                }
            }
        }
        declared
    }

    /// Builds one element per initializer, in source order.
    fn collect_elements<'src>(
        &mut self,
        files: [&SourceFile<'src>; 2],
        declared: &[Declared<'src>],
        tables: &HashMap<&'src str, Spanned<Vec<String>>>,
    ) -> Vec<Pending<'src>> {
        let mut pending: Vec<Pending<'src>> = Vec::new();
        for file in files {
            for item in &file.items {
                let Item::Initializer {
                    type_name,
                    scope,
                    entry,
                    fields,
                } = item.inner()
                else {
                    continue;
                };
                let source = file.source;

                let Some(screen) = Self::screen_of(*scope.inner(), self.conventions().layout_prefix())
                else {
                    let diag = self
                        .warn(
                            ErrorCode::E304,
                            format!("`{}` is not a layout struct", scope.inner()),
                            scope.span(),
                            source,
                            "initializer skipped",
                        )
                        .with_help(format!(
                            "entries are addressed as `{}::<name>`",
                            self.conventions().layout_struct("<screen>")
                        ));
                    self.diagnostics.emit(diag);
                    continue;
                };

                if let Err(err) = identifier::validate(entry) {
                    let diag = self.warn(
                        ErrorCode::E304,
                        format!("invalid element name: {err}"),
                        entry.span(),
                        source,
                        "initializer skipped",
                    );
                    self.diagnostics.emit(diag);
                    continue;
                }

                let duplicate = pending
                    .iter()
                    .find(|p| p.screen == screen && p.origin.name == *entry.inner())
                    .map(|p| p.origin);
                if let Some(first) = duplicate {
                    let diag = self
                        .warn(
                            ErrorCode::E305,
                            format!("`{}::{}` is defined twice", scope.inner(), entry.inner()),
                            entry.span(),
                            source,
                            "duplicate ignored",
                        )
                        .with_label_in(first.source, first.span, "first defined here");
                    self.diagnostics.emit(diag);
                    continue;
                }

                let declaration = declared
                    .iter()
                    .find(|d| d.screen == screen && d.entry.name == *entry.inner());
                if let Some(declaration) = declaration {
                    if declaration.type_name != *type_name.inner() {
                        let diag = self
                            .warn(
                                ErrorCode::E306,
                                format!(
                                    "`{}` is declared as `{}` but initialized as `{}`",
                                    entry.inner(),
                                    declaration.type_name,
                                    type_name.inner()
                                ),
                                type_name.span(),
                                source,
                                "initializer type used",
                            )
                            .with_label_in(
                                declaration.entry.source,
                                declaration.entry.span,
                                "declared here",
                            );
                        self.diagnostics.emit(diag);
                    }
                }

                let Some(kind) = self.element_kind(type_name, fields, source) else {
                    continue;
                };

                let origin = Origin {
                    name: *entry.inner(),
                    span: entry.span(),
                    source,
                };
                if let Some(element) = self.build_element(kind, origin, item.span(), fields, tables) {
                    trace!(screen, element:?; "Element built");
                    pending.push(Pending {
                        screen,
                        element,
                        origin,
                    });
                }
            }
        }

        for declaration in declared {
            let defined = pending
                .iter()
                .any(|p| p.screen == declaration.screen && p.origin.name == declaration.entry.name);
            if !defined {
                let diag = self.warn(
                    ErrorCode::E403,
                    format!(
                        "`{}` of screen `{}` is declared but never initialized",
                        declaration.entry.name, declaration.screen
                    ),
                    declaration.entry.span,
                    declaration.entry.source,
                    "no initializer",
                );
                self.diagnostics.emit(diag);
            }
        }

        debug!(elements = pending.len(); "Elements collected");
        pending
    }

    /// Element kind of an initializer, from its type or else from its fields.
    fn element_kind(
        &mut self,
        type_name: &Spanned<&str>,
        fields: &[Spanned<Field<'_>>],
        source: SourceKind,
    ) -> Option<ElementKind> {
        if let Some(kind) = self.conventions().kind_of_type(type_name) {
            return Some(kind);
        }

        let known = [ElementKind::Box, ElementKind::Text, ElementKind::Line, ElementKind::Freehand]
            .into_iter()
            .filter_map(|kind| self.conventions().type_name(kind))
            .collect::<Vec<_>>()
            .join(", ");
        let inferred = infer_kind(fields);
        let message = match inferred {
            Some(kind) => format!("unknown element type `{}`, read as {}", type_name.inner(), kind),
            None => format!("unknown element type `{}`", type_name.inner()),
        };
        let label = if inferred.is_some() { "inferred from the fields" } else { "initializer skipped" };
        let diag = self
            .warn(ErrorCode::E300, message, type_name.span(), source, label)
            .with_help(format!("known types are {known}"));
        self.diagnostics.emit(diag);
        inferred
    }

    fn build_element(
        &mut self,
        kind: ElementKind,
        origin: Origin<'_>,
        item_span: Span,
        fields: &[Spanned<Field<'_>>],
        tables: &HashMap<&str, Spanned<Vec<String>>>,
    ) -> Option<Element> {
        let color_enum = self.conventions().color_enum().to_string();
        let mut reader = FieldReader {
            fields,
            entry: origin.name,
            item_span,
            source: origin.source,
            color_enum: &color_enum,
            diagnostics: &mut self.diagnostics,
        };

        let (shape, color, arity): (Shape, Color, usize) = match kind {
            ElementKind::Box => {
                let origin = Point::new(reader.coordinate(0, "x"), reader.coordinate(1, "y"));
                let size = Size::new(reader.size(2, "width"), reader.size(3, "height"));
                let color = reader.color(4);
                (BoxShape::new(origin, size).map(Shape::from).ok()?, color, 5)
            }
            ElementKind::Text => {
                let origin = Point::new(reader.coordinate(0, "x"), reader.coordinate(1, "y"));
                let text = reader.text(2, "content");
                let color = reader.color(3);
                (TextShape::from_text(origin, &text).into(), color, 4)
            }
            ElementKind::Line => {
                let start = Point::new(reader.coordinate(0, "x1"), reader.coordinate(1, "y1"));
                let end = Point::new(reader.coordinate(2, "x2"), reader.coordinate(3, "y2"));
                let color = reader.color(4);
                (LineShape::new(start, end).into(), color, 5)
            }
            ElementKind::Freehand => {
                let origin = Point::new(reader.coordinate(0, "x"), reader.coordinate(1, "y"));
                let content = reader.art(2, 3, tables);
                let color = reader.color(4);
                let shape = match content {
                    Some(content) => Freehand::new(origin, content).ok()?,
                    None => Freehand::blank(origin),
                };
                (shape.into(), color, 5)
            }
            ElementKind::MetaObject => return None,
        };
        reader.check_surplus(arity);

        match Element::new(origin.name, shape) {
            Ok(element) => Some(element.with_color(color)),
            Err(err) => {
                let diag = self.warn(
                    ErrorCode::E303,
                    format!("`{}` cannot be imported: {err}", origin.name),
                    origin.span,
                    origin.source,
                    "initializer skipped",
                );
                self.diagnostics.emit(diag);
                None
            }
        }
    }

    // ============================================================================
    // Pass 3: Screens
    // ============================================================================

    fn assemble_screens<'src>(
        &mut self,
        files: [&SourceFile<'src>; 2],
        order: &[Origin<'src>],
        pending: Vec<Pending<'src>>,
    ) -> Vec<Screen> {
        let draw_prefix = self.conventions().draw_prefix().to_string();

        let mut drawn = vec![false; pending.len()];
        let mut sequences: HashMap<&'src str, Vec<usize>> = HashMap::new();
        let mut functions: HashMap<&'src str, (Span, SourceKind)> = HashMap::new();

        for file in files {
            for item in &file.items {
                let Item::DrawFunction { name, calls, .. } = item.inner() else {
                    continue;
                };
                let source = file.source;
                let Some(screen) = Self::screen_of(*name.inner(), &draw_prefix) else {
                    let diag = self
                        .warn(
                            ErrorCode::E304,
                            format!("`{}` is not a draw function", name.inner()),
                            name.span(),
                            source,
                            "ignored",
                        )
                        .with_help(format!(
                            "draw functions are named `{}`",
                            self.conventions().draw_function("<screen>")
                        ));
                    self.diagnostics.emit(diag);
                    continue;
                };
                if let Some(&(first_span, first_source)) = functions.get(screen) {
                    let diag = self
                        .warn(
                            ErrorCode::E402,
                            format!("screen `{screen}` has two draw functions"),
                            name.span(),
                            source,
                            "duplicate ignored",
                        )
                        .with_label_in(first_source, first_span, "first defined here");
                    self.diagnostics.emit(diag);
                    continue;
                }
                functions.insert(screen, (name.span(), source));

                let expected_scope = self.conventions().layout_struct(screen);
                let sequence = sequences.entry(screen).or_default();
                for call in calls {
                    let call_span = call.scope.span().union(call.entry.span());
                    if *call.scope.inner() != expected_scope {
                        let diag = self
                            .warn(
                                ErrorCode::E400,
                                format!(
                                    "`{}` draws `{}::{}` of another layout struct",
                                    name.inner(),
                                    call.scope.inner(),
                                    call.entry.inner()
                                ),
                                call_span,
                                source,
                                "draw call ignored",
                            )
                            .with_help(format!("`{}` draws entries of `{expected_scope}`", name.inner()));
                        self.diagnostics.emit(diag);
                        continue;
                    }
                    let found = pending
                        .iter()
                        .position(|p| p.screen == screen && p.origin.name == *call.entry.inner());
                    let Some(index) = found else {
                        let diag = self.warn(
                            ErrorCode::E400,
                            format!("`{}::{}` is not defined", call.scope.inner(), call.entry.inner()),
                            call_span,
                            source,
                            "draw call ignored",
                        );
                        self.diagnostics.emit(diag);
                        continue;
                    };
                    if drawn[index] {
                        let diag = self.warn(
                            ErrorCode::E402,
                            format!("`{}::{}` is drawn twice", call.scope.inner(), call.entry.inner()),
                            call_span,
                            source,
                            "draw call ignored",
                        );
                        self.diagnostics.emit(diag);
                        continue;
                    }
                    drawn[index] = true;
                    sequence.push(index);
                }
            }
        }

        let mut slots: Vec<Option<Pending<'src>>> = pending.into_iter().map(Some).collect();
        for (slot, was_drawn) in slots.iter_mut().zip(&drawn) {
            if *was_drawn {
                continue;
            }
            if let Some(p) = slot.take() {
                let diag = self
                    .warn(
                        ErrorCode::E401,
                        format!("`{}` of screen `{}` is never drawn", p.origin.name, p.screen),
                        p.origin.span,
                        p.origin.source,
                        "element excluded",
                    )
                    .with_help(format!(
                        "add `{}.draw({}::{});` to `{}`",
                        self.conventions().surface_param(),
                        self.conventions().layout_struct(p.screen),
                        p.origin.name,
                        self.conventions().draw_function(p.screen)
                    ));
                self.diagnostics.emit(diag);
            }
        }

        let mut screens = Vec::with_capacity(order.len());
        for origin in order {
            let mut screen = match Screen::new(origin.name) {
                Ok(screen) => screen,
                Err(err) => {
                    let diag = self.warn(
                        ErrorCode::E304,
                        format!("invalid screen name: {err}"),
                        origin.span,
                        origin.source,
                        "screen skipped",
                    );
                    self.diagnostics.emit(diag);
                    continue;
                }
            };

            // Initializers keep insertion order; the draw sequence gives layers.
            let sequence = sequences.remove(origin.name).unwrap_or_default();
            let mut layers: HashMap<usize, i32> = HashMap::with_capacity(sequence.len());
            for (layer, index) in sequence.into_iter().enumerate() {
                layers.insert(index, i32::try_from(layer).unwrap_or(i32::MAX));
            }
            for (index, slot) in slots.iter_mut().enumerate() {
                let Some(&layer) = layers.get(&index) else {
                    continue;
                };
                let Some(p) = slot.take() else {
                    continue;
                };
                if let Err(err) = screen.add(p.element.with_layer(layer)) {
                    let diag = self.warn(
                        ErrorCode::E305,
                        format!("`{}` cannot be added: {err}", p.origin.name),
                        p.origin.span,
                        p.origin.source,
                        "element excluded",
                    );
                    self.diagnostics.emit(diag);
                }
            }
            debug!(screen = screen.name(), elements = screen.elements().len(); "Screen assembled");
            screens.push(screen);
        }
        screens
    }

    /// Empty project named by the `// Project:` banner.
    fn project_shell(&mut self, files: [&SourceFile<'_>; 2]) -> Project {
        let banner = files.iter().find_map(|file| {
            file.markers.iter().find_map(|marker| match marker.inner() {
                Marker::ProjectName(name) => Some((name.clone(), marker.span(), file.source)),
                _ => None,
            })
        });

        if let Some((name, span, source)) = banner {
            match Project::new(name) {
                Ok(project) => return project,
                Err(err) => {
                    let diag = self.warn(
                        ErrorCode::E304,
                        format!("invalid project name: {err}"),
                        span,
                        source,
                        "default name used",
                    );
                    self.diagnostics.emit(diag);
                }
            }
        }

        Project::new(self.cfg.default_project_name.as_str()).unwrap_or_else(|err| {
            debug!(err:%; "Configured default project name rejected");
            Project::default()
        })
    }
}

/// Guesses the element kind from the forms of the initializer fields.
///
/// Four numbers are read as a box; a line has the same shape.
fn infer_kind(fields: &[Spanned<Field<'_>>]) -> Option<ElementKind> {
    let forms: Vec<&Field<'_>> = fields.iter().map(|f| f.inner()).collect();
    match forms.as_slice() {
        [Field::Integer(_), Field::Integer(_), Field::Text(_), ..] => Some(ElementKind::Text),
        [Field::Integer(_), Field::Integer(_), Field::Path(_), Field::Integer(_), ..] => {
            Some(ElementKind::Freehand)
        }
        [
            Field::Integer(_),
            Field::Integer(_),
            Field::Integer(_),
            Field::Integer(_),
            ..,
        ] => Some(ElementKind::Box),
        _ => None,
    }
}

/// Reads positional initializer fields, warning about each defect.
struct FieldReader<'f, 'src, 'd> {
    fields: &'f [Spanned<Field<'src>>],
    entry: &'f str,
    item_span: Span,
    source: SourceKind,
    color_enum: &'f str,
    diagnostics: &'d mut DiagnosticCollector,
}

impl<'f, 'src> FieldReader<'f, 'src, '_> {
    fn warn(&mut self, code: ErrorCode, message: String, span: Span, label: &str) {
        self.diagnostics.emit(
            Diagnostic::coded(code, message)
                .in_source(self.source)
                .with_label(span, label.to_string()),
        );
    }

    fn get(&mut self, index: usize, label: &str) -> Option<&'f Spanned<Field<'src>>> {
        let field = self.fields.get(index);
        if field.is_none() {
            self.warn(
                ErrorCode::E301,
                format!("`{}` is missing field `{label}`", self.entry),
                self.item_span,
                "default used",
            );
        }
        field
    }

    fn integer(&mut self, index: usize, label: &str) -> Option<(i64, Span)> {
        let field = self.get(index, label)?;
        match field.inner() {
            Field::Integer(value) => Some((*value, field.span())),
            other => {
                self.warn(
                    ErrorCode::E301,
                    format!(
                        "field `{label}` of `{}` should be a number, found {}",
                        self.entry,
                        other.describe()
                    ),
                    field.span(),
                    "default used",
                );
                None
            }
        }
    }

    fn coordinate(&mut self, index: usize, label: &str) -> i16 {
        let Some((value, span)) = self.integer(index, label) else {
            return 0;
        };
        match i16::try_from(value) {
            Ok(value) => value,
            Err(_) => {
                self.warn(
                    ErrorCode::E303,
                    format!("field `{label}` of `{}` is out of range: {value}", self.entry),
                    span,
                    "clamped",
                );
                if value < 0 { i16::MIN } else { i16::MAX }
            }
        }
    }

    fn size(&mut self, index: usize, label: &str) -> i16 {
        let Some((value, span)) = self.integer(index, label) else {
            return 1;
        };
        match i16::try_from(value) {
            Ok(value) if value >= 1 => value,
            _ => {
                self.warn(
                    ErrorCode::E303,
                    format!("field `{label}` of `{}` is out of range: {value}", self.entry),
                    span,
                    "default used",
                );
                if value > i64::from(i16::MAX) { i16::MAX } else { 1 }
            }
        }
    }

    fn text(&mut self, index: usize, label: &str) -> String {
        let Some(field) = self.get(index, label) else {
            return String::new();
        };
        match field.inner() {
            Field::Text(text) => text.clone(),
            other => {
                self.warn(
                    ErrorCode::E301,
                    format!(
                        "field `{label}` of `{}` should be a string, found {}",
                        self.entry,
                        other.describe()
                    ),
                    field.span(),
                    "empty content used",
                );
                String::new()
            }
        }
    }

    /// Reads a palette color given by name (`UI_Color::RED`, `RED`) or ANSI code.
    fn color(&mut self, index: usize) -> Color {
        let Some(field) = self.get(index, "color") else {
            return Color::default();
        };
        let (parsed, shown) = match field.inner() {
            Field::Path(parts) => {
                let name = parts.last().copied().unwrap_or_default();
                let qualified_elsewhere = parts.len() > 2
                    || (parts.len() == 2 && parts.first().is_some_and(|enum_name| *enum_name != self.color_enum));
                let parsed = if qualified_elsewhere { None } else { name.parse::<Color>().ok() };
                (parsed, parts.join("::"))
            }
            Field::Integer(code) => (
                u8::try_from(*code).ok().and_then(Color::from_code),
                code.to_string(),
            ),
            Field::Text(_) => {
                self.warn(
                    ErrorCode::E301,
                    format!("color of `{}` should be a palette name, found a string", self.entry),
                    field.span(),
                    "WHITE used",
                );
                return Color::default();
            }
        };
        parsed.unwrap_or_else(|| {
            self.warn(
                ErrorCode::E302,
                format!("unknown color `{shown}` for `{}`", self.entry),
                field.span(),
                "WHITE used",
            );
            Color::default()
        })
    }

    /// Reads the art table reference and line count of a freehand element.
    ///
    /// `None` means the art cannot be recovered and a blank block is used.
    fn art(
        &mut self,
        table_index: usize,
        count_index: usize,
        tables: &HashMap<&str, Spanned<Vec<String>>>,
    ) -> Option<Vec<String>> {
        let field = self.get(table_index, "resource")?;
        let mut lines = match field.inner() {
            Field::Integer(0) => Vec::new(),
            Field::Path(parts) if matches!(parts.as_slice(), ["nullptr" | "NULL"]) => Vec::new(),
            Field::Path(parts) if parts.len() == 1 => {
                let Some(table) = tables.get(parts[0]) else {
                    self.warn(
                        ErrorCode::E201,
                        format!("resource `{}` used by `{}` is not defined", parts[0], self.entry),
                        field.span(),
                        "undefined resource",
                    );
                    return None;
                };
                table.inner().clone()
            }
            other => {
                self.warn(
                    ErrorCode::E301,
                    format!(
                        "resource of `{}` should be a table name, found {}",
                        self.entry,
                        other.describe()
                    ),
                    field.span(),
                    "empty art used",
                );
                return None;
            }
        };

        if let Some((count, span)) = self.integer(count_index, "line count") {
            match usize::try_from(count) {
                Ok(count) if count <= lines.len() => lines.truncate(count),
                _ => self.warn(
                    ErrorCode::E303,
                    format!(
                        "line count {count} of `{}` does not match its {} resource lines",
                        self.entry,
                        lines.len()
                    ),
                    span,
                    "resource length used",
                ),
            }
        }

        if lines.iter().any(|line| line.contains('\n')) {
            self.warn(
                ErrorCode::E301,
                format!("art line of `{}` contains a newline", self.entry),
                field.span(),
                "split into separate lines",
            );
            lines = lines
                .iter()
                .flat_map(|line| line.split('\n'))
                .map(str::to_string)
                .collect();
        }

        if lines.len() > MAX_FREEHAND_LINES {
            self.warn(
                ErrorCode::E303,
                format!(
                    "art of `{}` has {} lines, at most {MAX_FREEHAND_LINES} are kept",
                    self.entry,
                    lines.len()
                ),
                field.span(),
                "truncated",
            );
            lines.truncate(MAX_FREEHAND_LINES);
        }
        Some(lines)
    }

    fn check_surplus(&mut self, arity: usize) {
        if let Some(extra) = self.fields.get(arity) {
            let span = self
                .fields
                .last()
                .map_or(extra.span(), |last| extra.span().union(last.span()));
            self.warn(
                ErrorCode::E301,
                format!(
                    "`{}` has {} fields, expected {arity}",
                    self.entry,
                    self.fields.len()
                ),
                span,
                "ignored",
            );
        }
    }
}
