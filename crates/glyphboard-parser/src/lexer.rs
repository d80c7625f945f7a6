//! Lexical analyzer for generated layout sources.
//!
//! The lexer converts source text into a stream of [`Token`]s. It never
//! fails: text that cannot be lexed is reported as a warning and replaced
//! by a [`Token::Invalid`] so that only the statement around it is lost.
//!
//! The public entry point is [`tokenize`].

use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{none_of, one_of, rest, take_until, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    span::{SourceKind, Span},
    tokens::{PositionedToken, Token},
};

/// Rich diagnostic information for lexer defects.
///
/// Attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The defect span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

/// One unit of string content: a source character or an escaped byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Piece {
    Char(char),
    Byte(u8),
}

/// Parse a single-character escape after the backslash.
fn simple_escape(input: &mut Input<'_>) -> IResult<Piece> {
    one_of(['n', 'r', 't', 'a', 'b', 'f', 'v', '\\', '\'', '"', '?'])
        .map(|c| {
            Piece::Byte(match c {
                'n' => b'\n',
                'r' => b'\r',
                't' => b'\t',
                'a' => 0x07,
                'b' => 0x08,
                'f' => 0x0c,
                'v' => 0x0b,
                other => other as u8,
            })
        })
        .parse_next(input)
}

/// Parse `\xHH` after the backslash. One or two hex digits.
fn hex_escape(input: &mut Input<'_>) -> IResult<Piece> {
    preceded('x', take_while(1..=2, |c: char| c.is_ascii_hexdigit()))
        .verify_map(|digits: &str| u8::from_str_radix(digits, 16).ok())
        .map(Piece::Byte)
        .parse_next(input)
}

/// Parse `\NNN` after the backslash. One to three octal digits, at most `\377`.
fn octal_escape(input: &mut Input<'_>) -> IResult<Piece> {
    take_while(1..=3, |c: char| ('0'..='7').contains(&c))
        .verify_map(|digits: &str| u8::from_str_radix(digits, 8).ok())
        .map(Piece::Byte)
        .parse_next(input)
}

/// Parse an escape sequence in a string starting with backslash.
fn string_escape(input: &mut Input<'_>) -> IResult<Piece> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    match alt((simple_escape, hex_escape, octal_escape)).parse_next(input) {
        Ok(piece) => Ok(piece),
        Err(ErrMode::Backtrack(_)) => Err(ErrMode::Cut(ContextError::new().add_context(
            input,
            &input.checkpoint(),
            LexerDiagnostic {
                code: ErrorCode::E003,
                message: "invalid escape sequence",
                help: Some(
                    "valid escapes: `\\n`, `\\r`, `\\t`, `\\a`, `\\b`, `\\f`, `\\v`, `\\\\`, `\\'`, `\\\"`, `\\?`, `\\NNN`, `\\xHH`",
                ),
                start: escape_start,
            },
        ))),
        Err(e) => Err(e),
    }
}

/// Parse a double-quoted C string literal.
///
/// Escapes produce raw bytes, so octal or hex escapes of a multi-byte
/// UTF-8 sequence reassemble into the original character.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let string_char = none_of(['"', '\\', '\n', '\r']).map(Piece::Char);

    let string_content =
        repeat(0.., alt((string_escape, string_char))).fold(Vec::new, |mut bytes, piece| {
            match piece {
                Piece::Char(c) => {
                    let mut buf = [0; 4];
                    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
                Piece::Byte(b) => bytes.push(b),
            }
            bytes
        });

    let start_pos = input.current_token_start();

    '"'.parse_next(input)?;

    cut_err(terminated(string_content, '"'))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add closing `\"` before the end of the line"),
            start: start_pos,
        })
        .parse_next(input)
        .map(|bytes: Vec<u8>| Token::StringLiteral(String::from_utf8_lossy(&bytes).into_owned()))
}

/// Parse a decimal integer with an optional minus sign.
fn integer<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    (
        opt('-'),
        digit1,
        peek(not(one_of(|c: char| c.is_ascii_alphanumeric() || c == '_'))),
    )
        .take()
        .map(|text: &str| {
            let saturated = if text.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            };
            Token::Integer(text.parse().unwrap_or(saturated))
        })
        .parse_next(input)
}

/// Parse line comment starting with '//'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse a block comment. An unterminated one runs to the end of the text.
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded("/*", alt((terminated(take_until(0.., "*/"), "*/"), rest)))
        .map(Token::BlockComment)
        .parse_next(input)
}

/// Parse a preprocessor line starting with '#'
fn directive<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded('#', take_while(0.., |c| c != '\n'))
        .map(Token::Directive)
        .parse_next(input)
}

/// Parse identifiers and keywords
fn identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '_')
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse punctuation (multi-character first)
fn punctuation<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        "::".value(Token::DoubleColon),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        ';'.value(Token::Semicolon),
        ','.value(Token::Comma),
        '='.value(Token::Equals),
        '.'.value(Token::Dot),
        '*'.value(Token::Star),
        '&'.value(Token::Ampersand),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, carriage returns but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse newline
fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,   // Must come before block comments
        block_comment,
        directive,
        string_literal,
        integer,        // Must come before identifier
        identifier,
        punctuation,
        newline,        // Must come before whitespace
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    source: SourceKind,
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new(source: SourceKind) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, replacing defects by [`Token::Invalid`].
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            let start = input.current_token_start();
            let checkpoint = input.checkpoint();
            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(e) => {
                    let error_pos = input.current_token_start().max(start);
                    let diagnostic = self.convert_err_mode(e, start, error_pos);
                    self.diagnostics.emit(diagnostic);

                    input.reset(&checkpoint);
                    Self::skip_invalid(&mut input);
                    let end = input.current_token_start();
                    self.tokens
                        .push(PositionedToken::new(Token::Invalid, Span::new(start..end)));
                }
            }
        }
    }

    /// Skips the text of a defective token.
    ///
    /// A broken string literal is skipped up to its closing quote or the end
    /// of the line, whichever comes first; anything else loses one character.
    fn skip_invalid(input: &mut Input<'a>) {
        if input.next_token() != Some('"') {
            return;
        }
        let mut escaped = false;
        loop {
            let checkpoint = input.checkpoint();
            match input.next_token() {
                None => return,
                Some('\n') => {
                    input.reset(&checkpoint);
                    return;
                }
                Some('"') if !escaped => return,
                Some('\\') if !escaped => escaped = true,
                Some(_) => escaped = false,
            }
        }
    }

    /// Convert an ErrMode to a warning.
    ///
    /// Uses the innermost `LexerDiagnostic` context when present and falls
    /// back to E002 (unexpected character).
    fn convert_err_mode(
        &self,
        err: ErrMode<ContextError<LexerDiagnostic>>,
        token_start: usize,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos.max(*start + 1));
            let mut diag = Diagnostic::warning(*message)
                .with_code(*code)
                .in_source(self.source)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(token_start..token_start + 1);
        Diagnostic::warning("unexpected character")
            .with_code(ErrorCode::E002)
            .in_source(self.source)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Tokenize one source text.
///
/// Always produces a token stream; lexical defects are returned as warnings
/// in the collector.
pub fn tokenize(input: &str, source: SourceKind) -> (Vec<PositionedToken<'_>>, DiagnosticCollector) {
    let mut lexer = Lexer::new(source);
    lexer.tokenize(LocatingSlice::new(input));
    (lexer.tokens, lexer.diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_single_token(input: &str, expected: Token<'_>) {
        let mut located_input = LocatingSlice::new(input);
        let result = positioned_token(&mut located_input);
        assert!(result.is_ok(), "Failed to parse: {}", input);
        let positioned = result.unwrap();
        assert_eq!(positioned.token, expected);
    }

    fn significant(input: &str) -> Vec<Token<'_>> {
        let (tokens, diagnostics) = tokenize(input, SourceKind::Implementation);
        assert!(diagnostics.finish().unwrap().is_empty());
        tokens
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect()
    }

    #[test]
    fn test_identifiers_and_integers() {
        test_single_token("Layout_Main", Token::Identifier("Layout_Main"));
        test_single_token("_x1", Token::Identifier("_x1"));
        test_single_token("42", Token::Integer(42));
        test_single_token("-7", Token::Integer(-7));
    }

    #[test]
    fn test_integer_overflow_saturates() {
        test_single_token("99999999999999999999", Token::Integer(i64::MAX));
    }

    #[test]
    fn test_punctuation() {
        test_single_token("::", Token::DoubleColon);
        test_single_token("{", Token::LeftBrace);
        test_single_token("&", Token::Ampersand);
        test_single_token("*", Token::Star);
    }

    #[test]
    fn test_comments_and_directives() {
        test_single_token("// Project: Demo", Token::LineComment(" Project: Demo"));
        test_single_token("/* note */", Token::BlockComment(" note "));
        test_single_token("/* open", Token::BlockComment(" open"));
        test_single_token("#ifndef UI_LAYOUT_H", Token::Directive("ifndef UI_LAYOUT_H"));
    }

    #[test]
    fn test_string_escapes() {
        test_single_token(
            r#""a\"b\\c\n""#,
            Token::StringLiteral("a\"b\\c\n".to_string()),
        );
        test_single_token(
            r#""\033[31mred\033[0m""#,
            Token::StringLiteral("\u{1b}[31mred\u{1b}[0m".to_string()),
        );
        test_single_token(r#""\x1b""#, Token::StringLiteral("\u{1b}".to_string()));
        test_single_token(r#""\0""#, Token::StringLiteral("\0".to_string()));
    }

    #[test]
    fn test_octal_escapes_reassemble_utf8() {
        test_single_token(r#""\342\226\210""#, Token::StringLiteral("█".to_string()));
    }

    #[test]
    fn test_statement_tokens() {
        let tokens = significant("const UI_Box Layout_Main::frame = { 0, -1, 20, 10, UI_Color::WHITE };");
        assert_eq!(
            tokens,
            vec![
                Token::Identifier("const"),
                Token::Identifier("UI_Box"),
                Token::Identifier("Layout_Main"),
                Token::DoubleColon,
                Token::Identifier("frame"),
                Token::Equals,
                Token::LeftBrace,
                Token::Integer(0),
                Token::Comma,
                Token::Integer(-1),
                Token::Comma,
                Token::Integer(20),
                Token::Comma,
                Token::Integer(10),
                Token::Comma,
                Token::Identifier("UI_Color"),
                Token::DoubleColon,
                Token::Identifier("WHITE"),
                Token::RightBrace,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_unterminated_string_recovers_at_line_end() {
        let (tokens, diagnostics) = tokenize("x = \"open\ny;", SourceKind::Implementation);
        let warnings = diagnostics.finish().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E001));
        assert!(warnings[0].severity().is_warning());

        let kinds: Vec<Token<'_>> = tokens
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect();
        assert_eq!(
            kinds,
            vec![
                Token::Identifier("x"),
                Token::Equals,
                Token::Invalid,
                Token::Identifier("y"),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_invalid_escape_skips_whole_string() {
        let (tokens, diagnostics) = tokenize(r#""bad\q" ok"#, SourceKind::Declarations);
        let warnings = diagnostics.finish().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code(), Some(ErrorCode::E003));
        assert_eq!(warnings[0].source(), Some(SourceKind::Declarations));

        assert_eq!(tokens[0].token, Token::Invalid);
        assert_eq!(tokens[0].span, Span::new(0..7));
        assert_eq!(tokens.last().unwrap().token, Token::Identifier("ok"));
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, diagnostics) = tokenize("a @ b", SourceKind::Implementation);
        let warnings = diagnostics.finish().unwrap();
        assert_eq!(warnings[0].code(), Some(ErrorCode::E002));
        assert_eq!(tokens[2].token, Token::Invalid);
        assert_eq!(tokens[2].span, Span::new(2..3));
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    // ===================
    // Property Test Functions
    // ===================

    /// Identifiers tokenize to a single token spanning the input.
    fn check_identifier_is_one_token(id: &str) -> Result<(), TestCaseError> {
        let (tokens, diagnostics) = tokenize(id, SourceKind::Declarations);
        prop_assert!(!diagnostics.has_errors());
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0].token, &Token::Identifier(id));
        Ok(())
    }

    /// Printable ASCII survives a trip through a string literal.
    fn check_printable_string(text: &str) -> Result<(), TestCaseError> {
        let escaped: String = text
            .chars()
            .flat_map(|c| match c {
                '"' => vec!['\\', '"'],
                '\\' => vec!['\\', '\\'],
                other => vec![other],
            })
            .collect();
        let literal = format!("\"{escaped}\"");
        let (tokens, _) = tokenize(&literal, SourceKind::Implementation);
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0].token, &Token::StringLiteral(text.to_string()));
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn identifier_is_one_token(id in "[A-Za-z_][A-Za-z0-9_]{0,20}") {
            check_identifier_is_one_token(&id)?;
        }

        #[test]
        fn printable_string(text in "[ -~]{0,40}") {
            check_printable_string(&text)?;
        }
    }
}
