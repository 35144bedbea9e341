//! The scanner: source text to a token stream plus lexical diagnostics.
//!
//! `scan` is single-pass with the lookahead `logos` needs to disambiguate
//! multi-character operators and to keep scanning numerics, strings and
//! comments past their first character. It never raises — every
//! malformation becomes a [`Diagnostic`](crate::diagnostics::Diagnostic)
//! plus, where feasible, a synthesized token so downstream stages still see
//! a token in that position.

mod raw;

pub mod keywords;

#[cfg(test)]
mod tests;

use sql_core::{LineIndex, Position};

use crate::diagnostics::{Diagnostics, Stage};
use crate::syntax::SyntaxKind;
use raw::{NumberShape, Raw, StringScan};

/// Category of a scanned token. Mirrors the data model in the system
/// overview: scanner output is classified into exactly these ten kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TokenKind {
    Keyword,
    Identifier,
    String,
    Integer,
    Float,
    Operator,
    Comparison,
    Delimiter,
    Dot,
    Eof,
}

impl TokenKind {
    /// The rowan tree kind a parser leaf wraps this token in.
    pub fn syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Keyword => SyntaxKind::Keyword,
            TokenKind::Identifier => SyntaxKind::Identifier,
            TokenKind::String => SyntaxKind::StringLit,
            TokenKind::Integer => SyntaxKind::IntegerLit,
            TokenKind::Float => SyntaxKind::FloatLit,
            TokenKind::Operator => SyntaxKind::Operator,
            TokenKind::Comparison => SyntaxKind::Comparison,
            TokenKind::Delimiter => SyntaxKind::Delimiter,
            TokenKind::Dot => SyntaxKind::Dot,
            TokenKind::Eof => SyntaxKind::Eof,
        }
    }
}

/// A token's normalized value, per the data model: keywords carry their
/// upper-cased spelling, strings their escape-resolved content, numerics
/// their parsed magnitude. Everything else carries no value beyond its
/// lexeme.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Value {
    None,
    Text(String),
    Integer(i64),
    Float(f64),
}

/// A lexical atom: a classified slice of source text with a normalized
/// value and a position. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The original text, case-preserved.
    pub lexeme: String,
    pub value: Value,
    pub position: Position,
    /// Byte range in the source, kept so the parser can report spans
    /// without re-deriving them from `position` and `lexeme.len()`.
    #[serde(skip)]
    pub span: std::ops::Range<u32>,
}

impl Token {
    fn new(
        kind: TokenKind,
        lexeme: String,
        value: Value,
        position: Position,
        span: std::ops::Range<u32>,
    ) -> Self {
        Self {
            kind,
            lexeme,
            value,
            position,
            span,
        }
    }
}

/// Scan `source` into a token stream and its lexical diagnostics.
///
/// Restartable but typically called once per compilation unit. The stream
/// is always terminated by exactly one [`TokenKind::Eof`] token.
pub fn scan(source: &str) -> (Vec<Token>, Diagnostics) {
    let line_index = LineIndex::new(source);
    let mut diagnostics = Diagnostics::new();
    let mut tokens = Vec::new();

    let mut lexer = Raw::lexer(source);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let position = line_index.position(span.start as u32);

        let raw = match result {
            Ok(raw) => raw,
            Err(()) => {
                let bad = source[span.clone()].chars().next().unwrap_or('\u{FFFD}');
                diagnostics
                    .error(Stage::Lex, format!("invalid character '{bad}'"), position)
                    .span(span.start as u32..span.end as u32)
                    .emit();
                continue;
            }
        };

        let lexeme = lexer.slice().to_string();
        let span = span.start as u32..span.end as u32;

        match raw {
            Raw::Whitespace | Raw::Newline => {}
            Raw::LineComment => {}
            Raw::HashComment(unterminated) => {
                if unterminated {
                    diagnostics
                        .error(Stage::Lex, "unclosed comment", position)
                        .span(span.clone())
                        .emit();
                }
            }
            Raw::Word(text) => {
                let upper = text.to_ascii_uppercase();
                if keywords::is_keyword(&upper) {
                    tokens.push(Token::new(
                        TokenKind::Keyword,
                        lexeme,
                        Value::Text(upper),
                        position,
                        span,
                    ));
                } else {
                    tokens.push(Token::new(
                        TokenKind::Identifier,
                        lexeme,
                        Value::None,
                        position,
                        span,
                    ));
                }
            }
            Raw::Number(shape) => match shape {
                NumberShape::Integer(n) => {
                    tokens.push(Token::new(
                        TokenKind::Integer,
                        lexeme,
                        Value::Integer(n),
                        position,
                        span,
                    ));
                }
                NumberShape::Float(n) => {
                    tokens.push(Token::new(
                        TokenKind::Float,
                        lexeme,
                        Value::Float(n),
                        position,
                        span,
                    ));
                }
                NumberShape::MultipleDecimalPoints => {
                    diagnostics
                        .error(
                            Stage::Lex,
                            "invalid number: multiple decimal points",
                            position,
                        )
                        .span(span.clone())
                        .emit();
                    // Recover with the leading digits as a best-effort INTEGER.
                    let leading: String =
                        lexeme.chars().take_while(|c| c.is_ascii_digit()).collect();
                    let value = leading.parse().unwrap_or(0);
                    tokens.push(Token::new(
                        TokenKind::Integer,
                        lexeme,
                        Value::Integer(value),
                        position,
                        span,
                    ));
                }
            },
            Raw::Str(scan) => match scan {
                StringScan::Closed(content) => {
                    tokens.push(Token::new(
                        TokenKind::String,
                        lexeme,
                        Value::Text(content),
                        position,
                        span,
                    ));
                }
                StringScan::Unclosed(content) => {
                    diagnostics
                        .error(Stage::Lex, "unclosed string literal", position)
                        .span(span.clone())
                        .emit();
                    tokens.push(Token::new(
                        TokenKind::String,
                        lexeme,
                        Value::Text(content),
                        position,
                        span,
                    ));
                }
            },
            Raw::Comma | Raw::LParen | Raw::RParen | Raw::Semi => {
                tokens.push(Token::new(
                    TokenKind::Delimiter,
                    lexeme,
                    Value::None,
                    position,
                    span,
                ));
            }
            Raw::Dot => {
                tokens.push(Token::new(TokenKind::Dot, lexeme, Value::None, position, span));
            }
            Raw::Plus | Raw::Minus | Raw::Star | Raw::Slash | Raw::Percent | Raw::Concat => {
                tokens.push(Token::new(
                    TokenKind::Operator,
                    lexeme,
                    Value::None,
                    position,
                    span,
                ));
            }
            Raw::Le | Raw::Ge | Raw::Ne | Raw::Lt | Raw::Gt | Raw::Eq => {
                tokens.push(Token::new(
                    TokenKind::Comparison,
                    lexeme,
                    Value::None,
                    position,
                    span,
                ));
            }
            Raw::Shl | Raw::Shr => {
                tokens.push(Token::new(
                    TokenKind::Operator,
                    lexeme,
                    Value::None,
                    position,
                    span,
                ));
            }
            Raw::Bang => {
                diagnostics
                    .error(Stage::Lex, "invalid character '!'", position)
                    .span(span.clone())
                    .emit();
            }
        }
    }

    let eof_pos = line_index.position(source.len() as u32);
    let eof_span = source.len() as u32..source.len() as u32;
    tokens.push(Token::new(
        TokenKind::Eof,
        String::new(),
        Value::None,
        eof_pos,
        eof_span,
    ));

    (tokens, diagnostics)
}
