//! Token definitions for generated layout sources.
//!
//! The token set covers the C++ subset the generator emits: identifiers,
//! integers, string literals, a little punctuation, comments and
//! preprocessor lines.

use std::fmt;

use crate::span::Span;

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    /// Identifier or keyword (`struct`, `const`, `UI_Box`, ...).
    Identifier(&'src str),
    /// Decimal integer, possibly negative. Saturates on overflow.
    Integer(i64),
    /// String literal with escapes resolved.
    StringLiteral(String),

    /// `// ...`, text after the slashes.
    LineComment(&'src str),
    /// `/* ... */`, text between the delimiters.
    BlockComment(&'src str),
    /// `#...` up to the end of the line, text after the hash.
    Directive(&'src str),

    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Equals,
    DoubleColon,
    Dot,
    Star,
    Ampersand,

    Whitespace,
    Newline,

    /// Source text that could not be lexed. A diagnostic has already been
    /// emitted for it; statements containing it are skipped silently.
    Invalid,
}

impl Token<'_> {
    /// Returns `true` for tokens the statement parser never looks at.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace
                | Token::Newline
                | Token::LineComment(_)
                | Token::BlockComment(_)
                | Token::Directive(_)
        )
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "{name}"),
            Token::Integer(value) => write!(f, "{value}"),
            Token::StringLiteral(value) => write!(f, "{value:?}"),
            Token::LineComment(_) | Token::BlockComment(_) => write!(f, "comment"),
            Token::Directive(text) => write!(f, "#{text}"),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::LeftBracket => write!(f, "["),
            Token::RightBracket => write!(f, "]"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
            Token::Equals => write!(f, "="),
            Token::DoubleColon => write!(f, "::"),
            Token::Dot => write!(f, "."),
            Token::Star => write!(f, "*"),
            Token::Ampersand => write!(f, "&"),
            Token::Whitespace => write!(f, "whitespace"),
            Token::Newline => write!(f, "newline"),
            Token::Invalid => write!(f, "invalid token"),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span) -> Self {
        Self { token, span }
    }
}
