use glyphboard_core::{color::Color, element::Shape};

use crate::{
    error::{DiagnosticCollector, ErrorCode},
    lexer::tokenize,
    parse,
    parser::parse_source,
    parser_types::{Field, Item, Marker, SourceFile},
    span::SourceKind,
    ParseConfig,
};

const DECLARATIONS: &str = r#"// Generated by glyphboard. Do not edit by hand.
// Project: Demo
#ifndef UI_LAYOUT_H
#define UI_LAYOUT_H

#include "SerialUI.h"

struct Layout_Main {
    static const UI_Box frame;
    static const UI_Text label;
    static const UI_Freehand logo;
};

void drawScreen_Main(SerialUI& ui);

#endif
"#;

const IMPLEMENTATION: &str = r#"// Generated by glyphboard. Do not edit by hand.
// Project: Demo
#include "ui_layout.h"

// RESOURCES
const char RES_0_logo_L0[] PROGMEM = "/\\";
const char RES_0_logo_L1[] PROGMEM = "\\/";
const char* const RES_0_logo_ARR[] PROGMEM = { RES_0_logo_L0, RES_0_logo_L1 };

// IMPLEMENTATION
const UI_Box Layout_Main::frame = { 0, 0, 20, 10, UI_Color::WHITE };
const UI_Text Layout_Main::label = { 2, 1, "Hi\nthere", UI_Color::RED };
const UI_Freehand Layout_Main::logo = { 5, 5, RES_0_logo_ARR, 2, UI_Color::GREEN };

void drawScreen_Main(SerialUI& ui) {
    ui.draw(Layout_Main::frame);
    ui.draw(Layout_Main::label);
    ui.draw(Layout_Main::logo);
}
"#;

fn with_source<R>(text: &str, source: SourceKind, f: impl FnOnce(&SourceFile<'_>, DiagnosticCollector) -> R) -> R {
    let (tokens, mut diagnostics) = tokenize(text, source);
    let file = parse_source(&tokens, source, &mut diagnostics);
    f(&file, diagnostics)
}

fn warning_codes(text_decl: &str, text_impl: &str) -> Vec<ErrorCode> {
    let parsed = parse(text_decl, text_impl, &ParseConfig::default()).expect("parse failed");
    parsed.warnings.iter().filter_map(|w| w.code()).collect()
}

// ============================================================================
// Statement recognition
// ============================================================================

#[test]
fn test_declaration_markers_and_items() {
    with_source(DECLARATIONS, SourceKind::Declarations, |file, diagnostics| {
        assert!(diagnostics.finish().unwrap().is_empty());

        let markers: Vec<&Marker> = file.markers.iter().map(|m| m.inner()).collect();
        assert!(markers.contains(&&Marker::ProjectName("Demo".to_string())));
        assert!(markers.contains(&&Marker::IncludeGuard("UI_LAYOUT_H".to_string())));
        assert!(markers.contains(&&Marker::Include("SerialUI.h".to_string())));
        assert!(markers.contains(&&Marker::Banner));

        assert_eq!(file.items.len(), 2);
        let Item::LayoutStruct { name, members } = file.items[0].inner() else {
            panic!("expected layout struct, got {:?}", file.items[0]);
        };
        assert_eq!(*name.inner(), "Layout_Main");
        let names: Vec<&str> = members.iter().map(|m| *m.name.inner()).collect();
        assert_eq!(names, ["frame", "label", "logo"]);
        assert_eq!(*members[2].type_name.inner(), "UI_Freehand");

        assert!(matches!(
            file.items[1].inner(),
            Item::DrawPrototype { name } if *name.inner() == "drawScreen_Main"
        ));
    });
}

#[test]
fn test_implementation_items() {
    with_source(IMPLEMENTATION, SourceKind::Implementation, |file, diagnostics| {
        assert!(diagnostics.finish().unwrap().is_empty());

        let kinds: Vec<&str> = file.items.iter().map(|i| i.kind_name()).collect();
        assert_eq!(
            kinds,
            [
                "line resource",
                "line resource",
                "resource table",
                "initializer",
                "initializer",
                "initializer",
                "draw function",
            ]
        );

        let Item::LineResource { value, .. } = file.items[0].inner() else {
            panic!("expected line resource");
        };
        assert_eq!(value.inner(), "/\\");

        let Item::Initializer { fields, .. } = file.items[4].inner() else {
            panic!("expected initializer");
        };
        let fields: Vec<&Field<'_>> = fields.iter().map(|f| f.inner()).collect();
        assert_eq!(
            fields,
            [
                &Field::Integer(2),
                &Field::Integer(1),
                &Field::Text("Hi\nthere".to_string()),
                &Field::Path(vec!["UI_Color", "RED"]),
            ]
        );

        let Item::DrawFunction { calls, skipped, .. } = file.items[6].inner() else {
            panic!("expected draw function");
        };
        let entries: Vec<&str> = calls.iter().map(|c| *c.entry.inner()).collect();
        assert_eq!(entries, ["frame", "label", "logo"]);
        assert!(skipped.is_empty());
    });
}

#[test]
fn test_adjacent_strings_concatenate() {
    let text = r#"const char RES_0_a_L0[] PROGMEM = "ab" "cd";"#;
    with_source(text, SourceKind::Implementation, |file, _| {
        let Item::LineResource { value, .. } = file.items[0].inner() else {
            panic!("expected line resource");
        };
        assert_eq!(value.inner(), "abcd");
    });
}

#[test]
fn test_empty_table_with_null_entry() {
    let text = "const char* const RES_0_blank_ARR[] PROGMEM = { nullptr };";
    with_source(text, SourceKind::Implementation, |file, _| {
        let Item::ResourceTable { entries, .. } = file.items[0].inner() else {
            panic!("expected resource table");
        };
        assert_eq!(entries.len(), 1);
        assert!(entries[0].inner().is_none());
    });
}

#[test]
fn test_unrecognized_statement_is_skipped_with_warning() {
    let text = "int counter = 0;\nconst UI_Box Layout_Main::frame = { 0, 0, 1, 1, UI_Color::WHITE };";
    with_source(text, SourceKind::Implementation, |file, diagnostics| {
        assert_eq!(file.items.len(), 1);
        let warnings = diagnostics.finish().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E102));
        assert_eq!(warnings[0].source(), Some(SourceKind::Implementation));
    });
}

#[test]
fn test_malformed_initializer_reports_expectation() {
    let text = "const UI_Box Layout_Main::frame = { 0, 0, 1, 1 ;";
    with_source(text, SourceKind::Implementation, |file, diagnostics| {
        assert!(file.items.is_empty());
        let warnings = diagnostics.finish().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E102));
        assert!(warnings[0].help().is_some());
    });
}

#[test]
fn test_lexer_defect_poisons_only_its_statement() {
    let text = concat!(
        "const char RES_0_a_L0[] PROGMEM = \"bad\\q\";\n",
        "const char RES_0_a_L1[] PROGMEM = \"fine\";\n",
    );
    with_source(text, SourceKind::Implementation, |file, diagnostics| {
        assert_eq!(file.items.len(), 1);
        let warnings = diagnostics.finish().unwrap();
        // Only the lexer's warning; the poisoned statement is skipped silently.
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E003));
    });
}

#[test]
fn test_foreign_statement_in_draw_function() {
    let text = "void drawScreen_Main(SerialUI& ui) {\n    ui.clear();\n    ui.draw(Layout_Main::frame);\n}\n";
    with_source(text, SourceKind::Implementation, |file, diagnostics| {
        let Item::DrawFunction { calls, skipped, .. } = file.items[0].inner() else {
            panic!("expected draw function");
        };
        assert_eq!(calls.len(), 1);
        assert_eq!(skipped.len(), 1);
        let warnings = diagnostics.finish().unwrap();
        assert_eq!(warnings[0].code(), Some(ErrorCode::E102));
    });
}

// ============================================================================
// Elaboration
// ============================================================================

#[test]
fn test_parse_reconstructs_project() {
    let parsed = parse(DECLARATIONS, IMPLEMENTATION, &ParseConfig::default()).unwrap();
    assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);

    let project = parsed.project;
    assert_eq!(project.name(), "Demo");
    assert_eq!(project.screens().len(), 1);

    let screen = &project.screens()[0];
    assert_eq!(screen.name(), "Main");
    let names: Vec<&str> = screen.elements().iter().map(|e| e.name()).collect();
    assert_eq!(names, ["frame", "label", "logo"]);
    let layers: Vec<i32> = screen.elements().iter().map(|e| e.layer()).collect();
    assert_eq!(layers, [0, 1, 2]);

    let label = screen.get("label").unwrap();
    assert_eq!(label.color(), Color::Red);
    let Shape::Text(text) = label.shape() else {
        panic!("expected text");
    };
    assert_eq!(text.content(), ["Hi", "there"]);

    let Shape::Freehand(art) = screen.get("logo").unwrap().shape() else {
        panic!("expected freehand");
    };
    assert_eq!(art.content(), ["/\\", "\\/"]);
}

#[test]
fn test_missing_markers_are_fatal() {
    let err = parse("", IMPLEMENTATION, &ParseConfig::default()).unwrap_err();
    let codes: Vec<_> = err.errors().filter_map(|d| d.code()).collect();
    assert_eq!(codes, [ErrorCode::E100]);

    let err = parse(DECLARATIONS, "just prose, nothing generated", &ParseConfig::default())
        .unwrap_err();
    let codes: Vec<_> = err.errors().filter_map(|d| d.code()).collect();
    assert_eq!(codes, [ErrorCode::E101]);
}

#[test]
fn test_default_project_name_from_config() {
    let declarations = DECLARATIONS.replace("// Project: Demo\n", "");
    let implementation = IMPLEMENTATION.replace("// Project: Demo\n", "");
    let config = ParseConfig {
        default_project_name: "Recovered".to_string(),
        ..ParseConfig::default()
    };
    let parsed = parse(&declarations, &implementation, &config).unwrap();
    assert_eq!(parsed.project.name(), "Recovered");
}

#[test]
fn test_missing_and_mismatched_fields_take_defaults() {
    let implementation = IMPLEMENTATION.replace(
        "{ 0, 0, 20, 10, UI_Color::WHITE }",
        "{ 3, \"oops\", 0 }",
    );
    let parsed = parse(DECLARATIONS, &implementation, &ParseConfig::default()).unwrap();
    let frame = parsed.project.screens()[0].get("frame").unwrap();
    let Shape::Box(shape) = frame.shape() else {
        panic!("expected box");
    };
    assert_eq!(shape.origin().x, 3);
    assert_eq!(shape.origin().y, 0);
    assert_eq!(shape.size().width, 1);
    assert_eq!(shape.size().height, 1);
    assert_eq!(frame.color(), Color::White);

    let codes: Vec<_> = parsed.warnings.iter().filter_map(|w| w.code()).collect();
    // y mismatched, width out of range, height and color missing
    assert_eq!(
        codes,
        [ErrorCode::E301, ErrorCode::E303, ErrorCode::E301, ErrorCode::E301]
    );
}

#[test]
fn test_unknown_color_falls_back_to_white() {
    let implementation = IMPLEMENTATION.replace("UI_Color::RED", "UI_Color::MAUVE");
    let parsed = parse(DECLARATIONS, &implementation, &ParseConfig::default()).unwrap();
    let label = parsed.project.screens()[0].get("label").unwrap();
    assert_eq!(label.color(), Color::White);
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.warnings[0].code(), Some(ErrorCode::E302));
}

#[test]
fn test_numeric_color_code_is_accepted() {
    let implementation = IMPLEMENTATION.replace("UI_Color::RED", "91");
    let parsed = parse(DECLARATIONS, &implementation, &ParseConfig::default()).unwrap();
    let label = parsed.project.screens()[0].get("label").unwrap();
    assert_eq!(label.color(), Color::BrightRed);
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_undefined_resource_gives_blank_art() {
    let implementation = IMPLEMENTATION.replace(
        "{ 5, 5, RES_0_logo_ARR, 2, UI_Color::GREEN }",
        "{ 5, 5, RES_9_ghost_ARR, 2, UI_Color::GREEN }",
    );
    let parsed = parse(DECLARATIONS, &implementation, &ParseConfig::default()).unwrap();
    let Shape::Freehand(art) = parsed.project.screens()[0].get("logo").unwrap().shape() else {
        panic!("expected freehand");
    };
    assert!(art.content().is_empty());
    assert_eq!(
        parsed.warnings.iter().filter_map(|w| w.code()).collect::<Vec<_>>(),
        [ErrorCode::E201]
    );
}

#[test]
fn test_missing_resource_line_is_empty() {
    let implementation = IMPLEMENTATION.replace("const char RES_0_logo_L1[] PROGMEM = \"\\\\/\";\n", "");
    let parsed = parse(DECLARATIONS, &implementation, &ParseConfig::default()).unwrap();
    let Shape::Freehand(art) = parsed.project.screens()[0].get("logo").unwrap().shape() else {
        panic!("expected freehand");
    };
    assert_eq!(art.content(), ["/\\", ""]);
    assert_eq!(parsed.warnings[0].code(), Some(ErrorCode::E201));
}

#[test]
fn test_line_count_truncates_table() {
    let implementation = IMPLEMENTATION.replace("RES_0_logo_ARR, 2,", "RES_0_logo_ARR, 1,");
    let parsed = parse(DECLARATIONS, &implementation, &ParseConfig::default()).unwrap();
    let Shape::Freehand(art) = parsed.project.screens()[0].get("logo").unwrap().shape() else {
        panic!("expected freehand");
    };
    assert_eq!(art.content(), ["/\\"]);
    assert!(parsed.warnings.is_empty());
}

#[test]
fn test_element_never_drawn_is_excluded() {
    let implementation = IMPLEMENTATION.replace("    ui.draw(Layout_Main::label);\n", "");
    let parsed = parse(DECLARATIONS, &implementation, &ParseConfig::default()).unwrap();
    let screen = &parsed.project.screens()[0];
    assert!(screen.get("label").is_none());
    assert_eq!(screen.get("logo").unwrap().layer(), 1);
    assert_eq!(
        parsed.warnings.iter().filter_map(|w| w.code()).collect::<Vec<_>>(),
        [ErrorCode::E401]
    );
}

#[test]
fn test_draw_call_problems() {
    let implementation = IMPLEMENTATION.replace(
        "    ui.draw(Layout_Main::logo);\n",
        "    ui.draw(Layout_Main::logo);\n    ui.draw(Layout_Main::frame);\n    ui.draw(Layout_Main::ghost);\n    ui.draw(Layout_Other::frame);\n",
    );
    assert_eq!(
        warning_codes(DECLARATIONS, &implementation),
        [ErrorCode::E402, ErrorCode::E400, ErrorCode::E400]
    );
}

#[test]
fn test_duplicate_definitions_keep_first() {
    let implementation = IMPLEMENTATION.replace(
        "const UI_Box Layout_Main::frame = { 0, 0, 20, 10, UI_Color::WHITE };",
        "const UI_Box Layout_Main::frame = { 0, 0, 20, 10, UI_Color::WHITE };\nconst UI_Box Layout_Main::frame = { 9, 9, 1, 1, UI_Color::RED };",
    );
    let parsed = parse(DECLARATIONS, &implementation, &ParseConfig::default()).unwrap();
    let frame = parsed.project.screens()[0].get("frame").unwrap();
    assert_eq!(frame.color(), Color::White);
    assert_eq!(parsed.warnings[0].code(), Some(ErrorCode::E305));
}

#[test]
fn test_type_disagreement_and_missing_initializer() {
    let declarations = DECLARATIONS.replace(
        "    static const UI_Box frame;\n",
        "    static const UI_Line frame;\n    static const UI_Box spare;\n",
    );
    assert_eq!(
        warning_codes(&declarations, IMPLEMENTATION),
        [ErrorCode::E306, ErrorCode::E403]
    );
}

#[test]
fn test_unknown_type_is_inferred_from_fields() {
    let implementation = IMPLEMENTATION.replace("const UI_Box Layout_Main::frame", "const UI_Panel Layout_Main::frame");
    let declarations = DECLARATIONS.replace("static const UI_Box frame;", "static const UI_Panel frame;");
    let parsed = parse(&declarations, &implementation, &ParseConfig::default()).unwrap();
    let frame = parsed.project.screens()[0].get("frame").unwrap();
    assert!(matches!(frame.shape(), Shape::Box(_)));
    assert_eq!(parsed.warnings[0].code(), Some(ErrorCode::E300));
}

#[test]
fn test_screen_order_follows_declarations() {
    let declarations = DECLARATIONS.replace(
        "void drawScreen_Main(SerialUI& ui);",
        "void drawScreen_Settings(SerialUI& ui);\nvoid drawScreen_Main(SerialUI& ui);",
    );
    let implementation = format!(
        "{IMPLEMENTATION}\nvoid drawScreen_Extra(SerialUI& ui) {{\n}}\nvoid drawScreen_Settings(SerialUI& ui) {{\n}}\n"
    );
    let parsed = parse(&declarations, &implementation, &ParseConfig::default()).unwrap();
    let names: Vec<&str> = parsed.project.screens().iter().map(|s| s.name()).collect();
    assert_eq!(names, ["Main", "Settings", "Extra"]);
}

#[test]
fn test_elements_keep_initializer_order_and_take_draw_layers() {
    let implementation = IMPLEMENTATION.replace(
        "    ui.draw(Layout_Main::frame);\n    ui.draw(Layout_Main::label);\n    ui.draw(Layout_Main::logo);\n",
        "    ui.draw(Layout_Main::logo);\n    ui.draw(Layout_Main::frame);\n    ui.draw(Layout_Main::label);\n",
    );
    let parsed = parse(DECLARATIONS, &implementation, &ParseConfig::default()).unwrap();
    assert!(parsed.warnings.is_empty(), "{:?}", parsed.warnings);

    let screen = &parsed.project.screens()[0];
    let order: Vec<(&str, i32)> = screen.elements().iter().map(|e| (e.name(), e.layer())).collect();
    assert_eq!(order, [("frame", 1), ("label", 2), ("logo", 0)]);
    let drawn: Vec<&str> = screen.draw_order().iter().map(|e| e.name()).collect();
    assert_eq!(drawn, ["logo", "frame", "label"]);
}

#[test]
fn test_declared_here_label_points_into_declarations() {
    let declarations = DECLARATIONS.replace("static const UI_Box frame;", "static const UI_Line frame;");
    let parsed = parse(&declarations, IMPLEMENTATION, &ParseConfig::default()).unwrap();
    let mismatch = &parsed.warnings[0];
    assert_eq!(mismatch.code(), Some(ErrorCode::E306));
    assert_eq!(mismatch.source(), Some(SourceKind::Implementation));

    let declared = &mismatch.labels()[1];
    assert_eq!(declared.source(), Some(SourceKind::Declarations));
    let span = declared.span();
    assert_eq!(&declarations[span.start()..span.end()], "frame");
}
