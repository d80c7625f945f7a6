//! Statement parser for generated layout sources.
//!
//! Comments and preprocessor lines are collected as [`Marker`]s. The
//! remaining tokens are split into statements at `;` or at a closing brace on
//! the outermost level, and each statement is parsed on its own. A statement
//! that does not parse is skipped with an E102 warning, so one damaged line
//! never hides the rest of the file. The public entry point is
//! [`parse_source`].

use log::{debug, trace};
use winnow::{
    Parser as _,
    combinator::{alt, opt, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    parser_types::{DrawCall, Field, Item, Marker, Member, SourceFile},
    span::{SourceKind, Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what was expected when parsing failed
    Label(&'static str),
}

type Input<'t, 'src> = TokenSlice<'t, PositionedToken<'src>>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;

// ============================================================================
// Token Helpers
// ============================================================================

/// Parse one punctuation token, returning its span.
fn punct(input: &mut Input<'_, '_>, expected: Token<'static>, label: &'static str) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'_>| (token.token == expected).then_some(token.span))
        .context(Context::Label(label))
        .parse_next(input)
}

/// Parse an identifier with the exact text `word`.
fn keyword(input: &mut Input<'_, '_>, word: &'static str) -> IResult<Span> {
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::Identifier(name) if name == word => Some(token.span),
        _ => None,
    })
    .context(Context::Label(word))
    .parse_next(input)
}

fn identifier<'src>(input: &mut Input<'_, 'src>) -> IResult<Spanned<&'src str>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Identifier(name) => Some(Spanned::new(name, token.span)),
        _ => None,
    })
    .context(Context::Label("an identifier"))
    .parse_next(input)
}

fn comma(input: &mut Input<'_, '_>) -> IResult<Span> {
    punct(input, Token::Comma, "`,`")
}

fn double_colon(input: &mut Input<'_, '_>) -> IResult<Span> {
    punct(input, Token::DoubleColon, "`::`")
}

fn semicolon(input: &mut Input<'_, '_>) -> IResult<Span> {
    punct(input, Token::Semicolon, "`;`")
}

/// Parse one or more adjacent string literals, concatenated.
fn string_literals(input: &mut Input<'_, '_>) -> IResult<Spanned<String>> {
    let pieces: Vec<Spanned<String>> = repeat(
        1..,
        any.verify_map(|token: &PositionedToken<'_>| match &token.token {
            Token::StringLiteral(text) => Some(Spanned::new(text.clone(), token.span)),
            _ => None,
        }),
    )
    .context(Context::Label("a string literal"))
    .parse_next(input)?;

    let span = pieces
        .iter()
        .map(Spanned::span)
        .reduce(|a, b| a.union(b))
        .unwrap_or_default();
    let text = pieces.into_iter().map(Spanned::into_inner).collect();
    Ok(Spanned::new(text, span))
}

/// Parse `[]`.
fn empty_brackets(input: &mut Input<'_, '_>) -> IResult<()> {
    punct(input, Token::LeftBracket, "`[`")?;
    punct(input, Token::RightBracket, "`]`")?;
    Ok(())
}

/// Parse a parenthesized parameter list without looking at its contents.
fn parameter_list(input: &mut Input<'_, '_>) -> IResult<()> {
    punct(input, Token::LeftParen, "`(`")?;
    let () = repeat(
        0..,
        any.verify(|token: &PositionedToken<'_>| {
            !matches!(
                token.token,
                Token::RightParen | Token::LeftBrace | Token::Semicolon
            )
        }),
    )
    .parse_next(input)?;
    punct(input, Token::RightParen, "`)`")?;
    Ok(())
}

// ============================================================================
// Declarations
// ============================================================================

/// Parse `static const <type> <name>;`
fn member<'src>(input: &mut Input<'_, 'src>) -> IResult<Member<'src>> {
    keyword(input, "static")?;
    keyword(input, "const")?;
    let type_name = identifier(input)?;
    let name = identifier(input)?;
    semicolon(input)?;
    Ok(Member { type_name, name })
}

/// Parse `struct <name> { <member>* };`
fn layout_struct<'src>(input: &mut Input<'_, 'src>) -> IResult<Item<'src>> {
    keyword(input, "struct")?;
    let name = identifier(input)?;
    punct(input, Token::LeftBrace, "`{`")?;
    let members: Vec<Member<'src>> = repeat(0.., member).parse_next(input)?;
    punct(input, Token::RightBrace, "`}`")?;
    semicolon(input)?;
    Ok(Item::LayoutStruct { name, members })
}

/// Parse `void <name>(...);`
fn draw_prototype<'src>(input: &mut Input<'_, 'src>) -> IResult<Item<'src>> {
    keyword(input, "void")?;
    let name = identifier(input)?;
    parameter_list(input)?;
    semicolon(input)?;
    Ok(Item::DrawPrototype { name })
}

// ============================================================================
// Resources
// ============================================================================

/// Parse `const char <name>[] PROGMEM = "..." "...";`
fn line_resource<'src>(input: &mut Input<'_, 'src>) -> IResult<Item<'src>> {
    keyword(input, "const")?;
    keyword(input, "char")?;
    let name = identifier(input)?;
    empty_brackets(input)?;
    opt(|i: &mut Input<'_, 'src>| keyword(i, "PROGMEM")).parse_next(input)?;
    punct(input, Token::Equals, "`=`")?;
    let value = string_literals(input)?;
    semicolon(input)?;
    Ok(Item::LineResource { name, value })
}

/// Parse a table entry: a line constant or a null pointer.
fn table_entry<'src>(input: &mut Input<'_, 'src>) -> IResult<Spanned<Option<&'src str>>> {
    any.verify_map(|token: &PositionedToken<'src>| match token.token {
        Token::Identifier("nullptr" | "NULL") | Token::Integer(0) => {
            Some(Spanned::new(None, token.span))
        }
        Token::Identifier(name) => Some(Spanned::new(Some(name), token.span)),
        _ => None,
    })
    .context(Context::Label("a resource line or `nullptr`"))
    .parse_next(input)
}

/// Parse `const char* const <name>[] PROGMEM = { <entry>, ... };`
fn resource_table<'src>(input: &mut Input<'_, 'src>) -> IResult<Item<'src>> {
    keyword(input, "const")?;
    keyword(input, "char")?;
    punct(input, Token::Star, "`*`")?;
    keyword(input, "const")?;
    let name = identifier(input)?;
    empty_brackets(input)?;
    opt(|i: &mut Input<'_, 'src>| keyword(i, "PROGMEM")).parse_next(input)?;
    punct(input, Token::Equals, "`=`")?;
    punct(input, Token::LeftBrace, "`{`")?;
    let entries: Vec<Spanned<Option<&'src str>>> =
        separated(0.., table_entry, comma).parse_next(input)?;
    opt(comma).parse_next(input)?;
    punct(input, Token::RightBrace, "`}`")?;
    semicolon(input)?;
    Ok(Item::ResourceTable { name, entries })
}

// ============================================================================
// Initializers
// ============================================================================

fn integer_field<'src>(input: &mut Input<'_, 'src>) -> IResult<Spanned<Field<'src>>> {
    any.verify_map(|token: &PositionedToken<'_>| match token.token {
        Token::Integer(value) => Some(Spanned::new(Field::Integer(value), token.span)),
        _ => None,
    })
    .parse_next(input)
}

fn text_field<'src>(input: &mut Input<'_, 'src>) -> IResult<Spanned<Field<'src>>> {
    string_literals.map(|text| text.map(Field::Text)).parse_next(input)
}

/// Parse `A` or `A::B::...`.
fn path_field<'src>(input: &mut Input<'_, 'src>) -> IResult<Spanned<Field<'src>>> {
    let first = identifier(input)?;
    let mut span = first.span();
    let mut parts = vec![first.into_inner()];
    while opt(double_colon).parse_next(input)?.is_some() {
        let next = identifier(input)?;
        span = span.union(next.span());
        parts.push(next.into_inner());
    }
    Ok(Spanned::new(Field::Path(parts), span))
}

fn field<'src>(input: &mut Input<'_, 'src>) -> IResult<Spanned<Field<'src>>> {
    alt((integer_field, text_field, path_field))
        .context(Context::Label("a number, string or name"))
        .parse_next(input)
}

/// Parse `const <type> <scope>::<entry> = { <field>, ... };`
fn initializer<'src>(input: &mut Input<'_, 'src>) -> IResult<Item<'src>> {
    keyword(input, "const")?;
    let type_name = identifier(input)?;
    let scope = identifier(input)?;
    double_colon(input)?;
    let entry = identifier(input)?;
    punct(input, Token::Equals, "`=`")?;
    punct(input, Token::LeftBrace, "`{`")?;
    let fields: Vec<Spanned<Field<'src>>> = separated(0.., field, comma).parse_next(input)?;
    opt(comma).parse_next(input)?;
    punct(input, Token::RightBrace, "`}`")?;
    semicolon(input)?;
    Ok(Item::Initializer {
        type_name,
        scope,
        entry,
        fields,
    })
}

// ============================================================================
// Draw Functions
// ============================================================================

enum BodyStatement<'src> {
    Draw(DrawCall<'src>),
    Skipped(Span),
    Empty,
}

/// Parse `<surface>.draw(<scope>::<entry>);`
fn draw_call<'src>(input: &mut Input<'_, 'src>) -> IResult<BodyStatement<'src>> {
    identifier(input)?;
    punct(input, Token::Dot, "`.`")?;
    keyword(input, "draw")?;
    punct(input, Token::LeftParen, "`(`")?;
    let scope = identifier(input)?;
    double_colon(input)?;
    let entry = identifier(input)?;
    punct(input, Token::RightParen, "`)`")?;
    semicolon(input)?;
    Ok(BodyStatement::Draw(DrawCall { scope, entry }))
}

fn empty_statement<'src>(input: &mut Input<'_, 'src>) -> IResult<BodyStatement<'src>> {
    semicolon(input)?;
    Ok(BodyStatement::Empty)
}

/// Consume any other statement up to its `;` or the end of the body.
fn other_statement<'src>(input: &mut Input<'_, 'src>) -> IResult<BodyStatement<'src>> {
    let spans: Vec<Span> = repeat(
        1..,
        any.verify_map(|token: &PositionedToken<'_>| {
            (!matches!(token.token, Token::Semicolon | Token::RightBrace)).then_some(token.span)
        }),
    )
    .parse_next(input)?;
    let end = opt(semicolon).parse_next(input)?;

    let span = spans
        .into_iter()
        .chain(end)
        .reduce(|a, b| a.union(b))
        .unwrap_or_default();
    Ok(BodyStatement::Skipped(span))
}

/// Parse `void <name>(...) { <statement>* }`
fn draw_function<'src>(input: &mut Input<'_, 'src>) -> IResult<Item<'src>> {
    keyword(input, "void")?;
    let name = identifier(input)?;
    parameter_list(input)?;
    punct(input, Token::LeftBrace, "`{`")?;
    let body: Vec<BodyStatement<'src>> =
        repeat(0.., alt((draw_call, empty_statement, other_statement))).parse_next(input)?;
    punct(input, Token::RightBrace, "`}`")?;
    opt(semicolon).parse_next(input)?;

    let mut calls = Vec::new();
    let mut skipped = Vec::new();
    for statement in body {
        match statement {
            BodyStatement::Draw(call) => calls.push(call),
            BodyStatement::Skipped(span) => skipped.push(span),
            BodyStatement::Empty => {}
        }
    }
    Ok(Item::DrawFunction {
        name,
        calls,
        skipped,
    })
}

// ============================================================================
// Statements
// ============================================================================

/// Statement shapes, told apart by their leading tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatementKind {
    LayoutStruct,
    DrawPrototype,
    DrawFunction,
    LineResource,
    ResourceTable,
    Initializer,
}

impl StatementKind {
    fn describe(self) -> &'static str {
        match self {
            StatementKind::LayoutStruct => "layout struct",
            StatementKind::DrawPrototype => "draw prototype",
            StatementKind::DrawFunction => "draw function",
            StatementKind::LineResource => "line resource",
            StatementKind::ResourceTable => "resource table",
            StatementKind::Initializer => "initializer",
        }
    }
}

fn classify(statement: &[PositionedToken<'_>]) -> Option<StatementKind> {
    let word = |index: usize| match statement.get(index).map(|t| &t.token) {
        Some(Token::Identifier(name)) => Some(*name),
        _ => None,
    };
    let has_body = statement.iter().any(|t| t.token == Token::LeftBrace);

    match (word(0), word(1)) {
        (Some("struct"), _) => Some(StatementKind::LayoutStruct),
        (Some("void"), _) if has_body => Some(StatementKind::DrawFunction),
        (Some("void"), _) => Some(StatementKind::DrawPrototype),
        (Some("const"), Some("char"))
            if statement.get(2).map(|t| &t.token) == Some(&Token::Star) =>
        {
            Some(StatementKind::ResourceTable)
        }
        (Some("const"), Some("char")) => Some(StatementKind::LineResource),
        (Some("const"), Some(_)) => Some(StatementKind::Initializer),
        _ => None,
    }
}

/// Index one past the statement starting at `start`.
///
/// A statement ends at a `;` outside braces, or at the brace closing its
/// outermost block (taking one following `;` along). Once an invalid token
/// is seen outside braces the statement also ends at the next line start,
/// since the invalid token may have swallowed its `;`.
fn statement_end(tokens: &[PositionedToken<'_>], line_starts: &[bool], start: usize) -> usize {
    let mut depth = 0usize;
    let mut poisoned = false;
    for (index, token) in tokens.iter().enumerate().skip(start) {
        if poisoned && depth == 0 && line_starts.get(index).copied().unwrap_or(false) {
            return index;
        }
        match token.token {
            Token::Invalid if depth == 0 => poisoned = true,
            Token::LeftBrace => depth += 1,
            Token::RightBrace => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let trailing_semicolon = tokens
                        .get(index + 1)
                        .is_some_and(|next| next.token == Token::Semicolon);
                    return index + 1 + usize::from(trailing_semicolon);
                }
            }
            Token::Semicolon if depth == 0 => return index + 1,
            _ => {}
        }
    }
    tokens.len()
}

fn statement_span(statement: &[PositionedToken<'_>]) -> Span {
    match (statement.first(), statement.last()) {
        (Some(first), Some(last)) => first.span.union(last.span),
        _ => Span::default(),
    }
}

/// Parse one complete statement.
fn parse_statement<'src>(
    statement: &[PositionedToken<'src>],
    source: SourceKind,
) -> Result<Item<'src>, Diagnostic> {
    let span = statement_span(statement);
    let Some(kind) = classify(statement) else {
        return Err(Diagnostic::warning("unrecognized statement")
            .with_code(ErrorCode::E102)
            .in_source(source)
            .with_label(span, "skipped")
            .with_help("expected a layout struct, draw function, resource or initializer"));
    };

    let mut input = TokenSlice::new(statement);
    let result = match kind {
        StatementKind::LayoutStruct => layout_struct(&mut input),
        StatementKind::DrawPrototype => draw_prototype(&mut input),
        StatementKind::DrawFunction => draw_function(&mut input),
        StatementKind::LineResource => line_resource(&mut input),
        StatementKind::ResourceTable => resource_table(&mut input),
        StatementKind::Initializer => initializer(&mut input),
    };
    let result = result.and_then(|item| {
        if input.eof_offset() == 0 {
            Ok(item)
        } else {
            let mut e = ContextError::new();
            e.push(Context::Label("end of statement"));
            Err(ErrMode::Backtrack(e))
        }
    });

    result.map_err(|error| {
        let failed_at = statement.len() - input.eof_offset();
        convert_error(error, statement, failed_at, kind, source)
    })
}

/// Convert a winnow error into an E102 warning for the whole statement.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    statement: &[PositionedToken<'_>],
    failed_at: usize,
    kind: StatementKind,
    source: SourceKind,
) -> Diagnostic {
    let expected = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => {
            e.context().next().map(|Context::Label(label)| *label)
        }
        ErrMode::Incomplete(_) => None,
    };

    let mut diag = Diagnostic::warning(format!("malformed {}", kind.describe()))
        .with_code(ErrorCode::E102)
        .in_source(source)
        .with_label(statement_span(statement), "skipped");
    if let Some(expected) = expected {
        if let Some(token) = statement.get(failed_at) {
            diag = diag.with_secondary_label(token.span, format!("expected {expected}"));
        }
        diag = diag.with_help(format!("expected {expected}"));
    }
    diag
}

fn comment_marker(text: &str) -> Option<Marker> {
    let trimmed = text.trim();
    if let Some(rest) = text.trim_start().strip_prefix("Project:") {
        let name = rest.strip_prefix(' ').unwrap_or(rest).trim_end_matches('\r');
        return Some(Marker::ProjectName(name.to_string()));
    }
    match trimmed {
        "RESOURCES" => Some(Marker::ResourcesSection),
        "IMPLEMENTATION" => Some(Marker::ImplementationSection),
        _ if trimmed.starts_with("Generated by glyphboard") => Some(Marker::Banner),
        _ => None,
    }
}

fn directive_marker(text: &str) -> Option<Marker> {
    let text = text.trim();
    let (directive, argument) = text.split_once(char::is_whitespace)?;
    let argument = argument.trim();
    match directive {
        "ifndef" => Some(Marker::IncludeGuard(argument.to_string())),
        "include" => Some(Marker::Include(
            argument
                .trim_matches(|c| matches!(c, '"' | '<' | '>'))
                .to_string(),
        )),
        _ => None,
    }
}

/// Recognize the markers and statements of one source text.
///
/// Statements that fail to parse are reported to `diagnostics` as E102
/// warnings, except those containing a [`Token::Invalid`], which the lexer
/// already reported.
pub(crate) fn parse_source<'src>(
    tokens: &[PositionedToken<'src>],
    source: SourceKind,
    diagnostics: &mut DiagnosticCollector,
) -> SourceFile<'src> {
    let mut markers = Vec::new();
    let mut significant = Vec::new();
    let mut line_starts = Vec::new();
    let mut at_line_start = true;
    for token in tokens {
        let marker = match &token.token {
            Token::Newline => {
                at_line_start = true;
                None
            }
            Token::LineComment(text) => comment_marker(text),
            Token::Directive(text) => directive_marker(text),
            other if other.is_trivia() => None,
            _ => {
                significant.push(token.clone());
                line_starts.push(at_line_start);
                at_line_start = false;
                None
            }
        };
        if let Some(marker) = marker {
            trace!(marker:?; "Marker found");
            markers.push(Spanned::new(marker, token.span));
        }
    }

    let invalid: Vec<Span> = significant
        .iter()
        .filter(|t| t.token == Token::Invalid)
        .map(|t| t.span)
        .collect();
    let overlaps_invalid = |span: Span| {
        invalid
            .iter()
            .any(|bad| bad.start() < span.end() && span.start() < bad.end())
    };

    let mut items = Vec::new();
    let mut start = 0;
    while start < significant.len() {
        let end = statement_end(&significant, &line_starts, start);
        let statement = &significant[start..end];
        let span = statement_span(statement);

        match parse_statement(statement, source) {
            Ok(item) => {
                if let Item::DrawFunction { skipped, .. } = &item {
                    for skipped_span in skipped.iter().copied().filter(|s| !overlaps_invalid(*s)) {
                        diagnostics.emit(
                            Diagnostic::warning("unrecognized statement in draw function")
                                .with_code(ErrorCode::E102)
                                .in_source(source)
                                .with_label(skipped_span, "skipped")
                                .with_help("only draw calls are kept"),
                        );
                    }
                }
                trace!(kind = item.kind_name(), start = span.start(); "Statement parsed");
                items.push(Spanned::new(item, span));
            }
            Err(_) if overlaps_invalid(span) => {
                debug!(start = span.start(); "Skipping statement with invalid token");
            }
            Err(diagnostic) => diagnostics.emit(diagnostic),
        }
        start = end;
    }

    debug!(
        source:% = source,
        markers = markers.len(),
        items = items.len();
        "Source parsed",
    );
    SourceFile {
        source,
        markers,
        items,
    }
}
