//! The `logos`-derived token classifier underneath [`super::scan`].
//!
//! `logos` handles the fixed-shape tokens (punctuators, operators,
//! keywords-as-identifiers) directly; numbers, strings and `##` comments
//! need more than one character of lookahead to resolve, so those variants
//! carry a callback that keeps consuming from `lexer.remainder()` after the
//! initial match.

use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Raw<'src> {
    #[regex(r"[ \t]+")]
    Whitespace,
    #[token("\r\n")]
    #[token("\n")]
    Newline,

    #[regex(r"--[^\n]*")]
    LineComment,
    /// `true` when the comment ran off the end of the source without a
    /// terminating newline.
    #[regex(r"##", hash_comment)]
    HashComment(bool),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice())]
    Word(&'src str),

    #[regex(r"[0-9]+", scan_number)]
    Number(NumberShape),

    #[token("'", scan_string)]
    Str(StringScan),

    #[token(",")]
    Comma,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("||")]
    Concat,

    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<>")]
    #[token("!=")]
    Ne,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    /// A lone `!`, which is not a valid operator on its own.
    #[token("!")]
    Bang,
}

/// What a scanned numeric literal turned out to be, once the full run of
/// digits/dots/exponent has been consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberShape {
    Integer(i64),
    Float(f64),
    /// More than one `.` in the literal, e.g. `1.2.5`.
    MultipleDecimalPoints,
}

/// The resolved content of a string literal, with `''` already folded to a
/// single `'`.
#[derive(Debug, Clone, PartialEq)]
pub enum StringScan {
    Closed(String),
    /// Ran into a newline or EOF before the closing quote; holds whatever
    /// content had been resolved so far.
    Unclosed(String),
}

fn count_leading_digits(s: &str) -> usize {
    s.as_bytes().iter().take_while(|b| b.is_ascii_digit()).count()
}

fn scan_number(lex: &mut Lexer<Raw>) -> NumberShape {
    let mut dot_count = 0usize;
    let mut has_exp = false;

    loop {
        let rem = lex.remainder();
        let mut chars = rem.chars();
        match chars.next() {
            Some('.') if chars.next().is_some_and(|c| c.is_ascii_digit()) => {
                dot_count += 1;
                lex.bump(1);
                let n = count_leading_digits(lex.remainder());
                lex.bump(n);
            }
            _ => break,
        }
    }

    {
        let rem = lex.remainder();
        let mut chars = rem.chars();
        if matches!(chars.next(), Some('e') | Some('E')) {
            let mut consumed = 1;
            let mut peek = chars.clone();
            if matches!(peek.next(), Some('+') | Some('-')) {
                consumed += 1;
                peek = peek.clone();
            }
            let digits = peek.take_while(|c| c.is_ascii_digit()).count();
            if digits > 0 {
                has_exp = true;
                lex.bump(consumed + digits);
            }
        }
    }

    let text = lex.slice();
    if dot_count > 1 {
        NumberShape::MultipleDecimalPoints
    } else if dot_count == 1 || has_exp {
        NumberShape::Float(text.parse().unwrap_or(0.0))
    } else {
        NumberShape::Integer(text.parse().unwrap_or(0))
    }
}

fn scan_string(lex: &mut Lexer<Raw>) -> StringScan {
    let mut content = String::new();
    loop {
        let rem = lex.remainder();
        let mut chars = rem.chars();
        match chars.next() {
            None => return StringScan::Unclosed(content),
            Some('\'') => {
                if chars.next() == Some('\'') {
                    content.push('\'');
                    lex.bump(2);
                } else {
                    lex.bump(1);
                    return StringScan::Closed(content);
                }
            }
            Some('\n') => return StringScan::Unclosed(content),
            Some(c) => {
                content.push(c);
                lex.bump(c.len_utf8());
            }
        }
    }
}

fn hash_comment(lex: &mut Lexer<Raw>) -> bool {
    loop {
        let rem = lex.remainder();
        match rem.chars().next() {
            None => return true,
            Some('\n') => return false,
            Some(c) => lex.bump(c.len_utf8()),
        }
    }
}
