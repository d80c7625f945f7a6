//! Property tests for generating sources and parsing them back.

use glyphboard::{
    GeneratedSources, LayoutCompiler,
    color::Color,
    element::{BoxShape, Freehand, LineShape, Shape, TextShape},
    geometry::{Point, Size},
    project::Project,
    screen::Screen,
};
use proptest::prelude::*;

// ===================
// Strategies
// ===================

fn point_strategy() -> impl Strategy<Value = Point> {
    (any::<i16>(), any::<i16>()).prop_map(|(x, y)| Point::new(x, y))
}

/// Printable ASCII plus the bytes that need escaping.
fn line_strategy() -> impl Strategy<Value = String> {
    "[ -~\u{1b}\t\r]{0,10}"
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    prop_oneof![
        (point_strategy(), 1i16..=i16::MAX, 1i16..=i16::MAX).prop_map(|(origin, w, h)| {
            Shape::from(BoxShape::new(origin, Size::new(w, h)).expect("positive size"))
        }),
        (point_strategy(), prop::collection::vec(line_strategy(), 1..4)).prop_map(
            |(origin, lines)| Shape::from(TextShape::new(origin, lines).expect("no newlines"))
        ),
        (point_strategy(), point_strategy())
            .prop_map(|(start, end)| Shape::from(LineShape::new(start, end))),
        (point_strategy(), prop::collection::vec(line_strategy(), 0..4)).prop_map(
            |(origin, lines)| Shape::from(Freehand::new(origin, lines).expect("valid art"))
        ),
    ]
}

/// Elements as (shape, layer, color index).
fn screen_strategy() -> impl Strategy<Value = Vec<(Shape, i32, usize)>> {
    prop::collection::vec((shape_strategy(), -4i32..4, 0..Color::all().len()), 0..8)
}

fn project_strategy() -> impl Strategy<Value = Project> {
    (
        "[A-Z][A-Za-z0-9 ]{0,15}",
        prop::collection::vec(screen_strategy(), 0..4),
    )
        .prop_map(|(name, screens)| {
            let mut project = Project::new(name).expect("valid project name");
            for (index, elements) in screens.into_iter().enumerate() {
                let screen = project
                    .new_screen(&format!("S{index}"))
                    .expect("unique screen name");
                for (shape, layer, color) in elements {
                    let name = screen.add_shape(shape).expect("auto-named add succeeds");
                    let element = screen.get_mut(&name).expect("just added");
                    element.set_layer(layer);
                    element.set_color(Color::all()[color]);
                }
            }
            project
        })
}

/// What a code round trip yields: insertion order kept, layers replaced by
/// draw positions.
fn normalized(project: &Project) -> Project {
    let mut expected = Project::new(project.name()).expect("valid project name");
    for screen in project.screens() {
        let draw_order = screen.draw_order();
        let mut copy = Screen::new(screen.name()).expect("valid screen name");
        for element in screen.elements() {
            let position = draw_order
                .iter()
                .position(|drawn| drawn.name() == element.name())
                .expect("every element is drawn");
            let layer = i32::try_from(position).expect("few elements");
            copy.add(element.clone().with_layer(layer))
                .expect("unique names");
        }
        expected.add_screen(copy).expect("unique screen names");
    }
    expected
}

fn round_trip(compiler: &LayoutCompiler, sources: &GeneratedSources) -> Result<Project, TestCaseError> {
    let parsed = compiler
        .parse(&sources.declarations, &sources.implementation)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
    prop_assert!(parsed.warnings.is_empty(), "unexpected warnings: {:?}", parsed.warnings);
    Ok(parsed.project)
}

// ===================
// Property Test Functions
// ===================

/// Parsing generated sources recovers the project, insertion order included,
/// up to layer normalization.
fn check_parse_inverts_generate(project: Project) -> Result<(), TestCaseError> {
    let compiler = LayoutCompiler::default();
    let sources = compiler.generate(&project).expect("flat projects always generate");
    let recovered = round_trip(&compiler, &sources)?;
    prop_assert_eq!(recovered, normalized(&project));
    Ok(())
}

/// Generation is deterministic, and a second round trip changes nothing.
fn check_generation_reaches_fixed_point(project: Project) -> Result<(), TestCaseError> {
    let compiler = LayoutCompiler::default();
    let first = compiler.generate(&project).expect("flat projects always generate");
    prop_assert_eq!(&first, &compiler.generate(&project).expect("generates again"));

    let second = compiler
        .generate(&round_trip(&compiler, &first)?)
        .expect("recovered project generates");
    let third = compiler
        .generate(&round_trip(&compiler, &second)?)
        .expect("recovered project generates");
    prop_assert_eq!(second, third);
    Ok(())
}

/// Every distinct piece of art is emitted exactly once.
fn check_resources_are_deduplicated(project: Project) -> Result<(), TestCaseError> {
    let mut distinct = Vec::new();
    for screen in project.screens() {
        for element in screen.elements() {
            if let Shape::Freehand(art) = element.shape() {
                if !distinct.contains(&art.resource_key()) {
                    distinct.push(art.resource_key());
                }
            }
        }
    }

    let sources = LayoutCompiler::default()
        .generate(&project)
        .expect("flat projects always generate");
    let tables = sources
        .implementation
        .lines()
        .filter(|line| line.starts_with("const char* const RES_"))
        .count();
    prop_assert_eq!(tables, distinct.len());
    Ok(())
}

// ===================
// Proptest Wrappers
// ===================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn parse_inverts_generate(project in project_strategy()) {
        check_parse_inverts_generate(project)?;
    }

    #[test]
    fn generation_reaches_fixed_point(project in project_strategy()) {
        check_generation_reaches_fixed_point(project)?;
    }

    #[test]
    fn resources_are_deduplicated(project in project_strategy()) {
        check_resources_are_deduplicated(project)?;
    }
}
