//! Parser state machine: token access, tree construction via Rowan, and
//! panic-mode error recovery.
//!
//! The scanner never emits trivia tokens (comments and whitespace are
//! discarded during scanning, not retained), so unlike a source-preserving
//! CST parser this one has no trivia-buffering step: every token in
//! `self.tokens` becomes exactly one leaf in the tree.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};

use sql_core::Position;

use crate::diagnostics::{Diagnostics, Stage};
use crate::lexer::{Token, TokenKind};
use crate::syntax::SyntaxKind;

#[cfg(debug_assertions)]
const DEFAULT_FUEL: u32 = 256;

/// Statement-start keywords: both the FIRST set for `Statement` and the
/// panic-mode recovery set (along with `;`).
pub(super) const STMT_START_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "ALTER", "DROP",
];

/// Result of parsing: the green tree plus every syntax diagnostic raised
/// along the way. The tree is always complete — a statement that could
/// not be parsed is still present, as an `ErrorNode` wrapping whatever was
/// consumed while recovering.
pub struct Parse {
    pub green: GreenNode,
    pub diagnostics: Diagnostics,
}

pub struct Parser<'t> {
    pub(super) tokens: &'t [Token],
    /// Current position in `tokens`. Monotonically increases.
    pub(super) pos: usize,
    pub(super) builder: GreenNodeBuilder<'static>,
    pub(super) diagnostics: Diagnostics,
    pub(super) depth: u32,
    pub(super) last_error_pos: Option<Position>,
    #[cfg(debug_assertions)]
    pub(super) fuel: std::cell::Cell<u32>,
}

/// Recursion depth limit; a statement nested this deep is almost
/// certainly a pathological input rather than real SQL, and every
/// recursive grammar function checks it before descending further.
pub(super) const MAX_DEPTH: u32 = 128;

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            depth: 0,
            last_error_pos: None,
            #[cfg(debug_assertions)]
            fuel: std::cell::Cell::new(DEFAULT_FUEL),
        }
    }

    pub fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            diagnostics: self.diagnostics,
        }
    }

    fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.pos).filter(|t| t.kind != TokenKind::Eof)
    }

    pub(super) fn current(&self) -> SyntaxKind {
        #[cfg(debug_assertions)]
        {
            if self.fuel.get() == 0 {
                panic!("parser is stuck: no progress made in {DEFAULT_FUEL} iterations");
            }
            self.fuel.set(self.fuel.get() - 1);
        }
        self.tokens
            .get(self.pos)
            .map_or(SyntaxKind::Eof, |t| t.kind.syntax_kind())
    }

    pub(super) fn nth(&self, lookahead: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + lookahead)
            .map_or(SyntaxKind::Eof, |t| t.kind.syntax_kind())
    }

    pub(super) fn eof(&self) -> bool {
        self.current() == SyntaxKind::Eof
    }

    pub(super) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Does the current token's upper-cased lexeme equal `kw`? Only
    /// meaningful when paired with a `Keyword`/`Identifier` check, since
    /// keyword text comparisons are how the parser distinguishes e.g.
    /// `SELECT` from `FROM` — both collapse to `SyntaxKind::Keyword`.
    pub(super) fn at_keyword(&self, kw: &str) -> bool {
        self.current_token()
            .is_some_and(|t| t.kind == TokenKind::Keyword && t.lexeme.eq_ignore_ascii_case(kw))
    }

    pub(super) fn at_any_keyword(&self, kws: &[&str]) -> bool {
        kws.iter().any(|kw| self.at_keyword(kw))
    }

    pub(super) fn nth_keyword(&self, lookahead: usize, kw: &str) -> bool {
        self.tokens
            .get(self.pos + lookahead)
            .is_some_and(|t| t.kind == TokenKind::Keyword && t.lexeme.eq_ignore_ascii_case(kw))
    }

    pub(super) fn current_position(&self) -> Position {
        self.tokens
            .get(self.pos)
            .map(|t| t.position)
            .unwrap_or_else(|| self.tokens.last().map(|t| t.position).unwrap_or(Position::new(1, 1)))
    }

    pub(super) fn current_span(&self) -> std::ops::Range<u32> {
        self.tokens
            .get(self.pos)
            .map(|t| t.span.clone())
            .unwrap_or_else(|| {
                let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
                end..end
            })
    }

    pub(super) fn current_lexeme(&self) -> &str {
        self.current_token().map(|t| t.lexeme.as_str()).unwrap_or("end of input")
    }

    /// Start a node.
    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    /// Wrap previously-parsed content retroactively (e.g. wrapping a
    /// `Primary` and what followed it into a `FunctionCall` once `(` is
    /// seen, or a bare expression into `Comparison_` once an operator is
    /// seen).
    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.builder.checkpoint()
    }

    /// Consume the current token into the tree.
    pub(super) fn bump(&mut self) {
        assert!(!self.eof(), "bump called at EOF");
        #[cfg(debug_assertions)]
        self.fuel.set(DEFAULT_FUEL);
        let token = &self.tokens[self.pos];
        self.builder.token(token.kind.syntax_kind().into(), &token.lexeme);
        self.pos += 1;
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Expect a specific keyword. On mismatch: emits a diagnostic (with
    /// `expected`/`found`) but does not consume, so the caller can still
    /// attempt recovery.
    pub(super) fn expect_keyword(&mut self, kw: &str) -> bool {
        if self.eat_keyword(kw) {
            return true;
        }
        self.error_expected_found(kw, self.current_lexeme().to_string());
        false
    }

    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_expected_found(what, self.current_lexeme().to_string());
        false
    }

    /// Expect a specific `Delimiter` lexeme (`(`, `)`, `,`, `;`). Delimiters
    /// share one `SyntaxKind`, so unlike keywords they're matched on text
    /// without needing a distinct token kind per punctuator.
    pub(super) fn expect_delimiter(&mut self, text: &str) -> bool {
        if self.at(SyntaxKind::Delimiter) && self.current_lexeme() == text {
            self.bump();
            return true;
        }
        self.error_expected_found(&format!("'{text}'"), self.current_lexeme().to_string());
        false
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        let pos = self.current_position();
        if self.last_error_pos == Some(pos) {
            return;
        }
        self.last_error_pos = Some(pos);
        self.diagnostics
            .error(Stage::Syn, message, pos)
            .span(self.current_span())
            .emit();
    }

    pub(super) fn error_expected_found(&mut self, expected: &str, found: String) {
        let pos = self.current_position();
        if self.last_error_pos == Some(pos) {
            return;
        }
        self.last_error_pos = Some(pos);
        self.diagnostics
            .error(Stage::Syn, format!("Expected {expected} but found {found}"), pos)
            .span(self.current_span())
            .expected_found(expected, found)
            .emit();
    }

    pub(super) fn error_with_suggestion(&mut self, message: impl Into<String>, suggestion: impl Into<String>) {
        let pos = self.current_position();
        self.diagnostics
            .error(Stage::Syn, message, pos)
            .span(self.current_span())
            .suggestion(suggestion)
            .emit();
    }

    /// Panic-mode recovery: consume tokens into an `ErrorNode` until the
    /// next `;` or statement-start keyword (exclusive — the sentinel
    /// itself is left for the caller). A leading `;` is consumed by the
    /// caller after this returns, not here.
    pub(super) fn synchronize(&mut self) {
        if self.eof() || self.at_statement_boundary() {
            return;
        }
        self.start_node(SyntaxKind::ErrorNode);
        while !self.eof() && !self.at_statement_boundary() {
            self.bump();
        }
        self.finish_node();
    }

    pub(super) fn at_statement_boundary(&self) -> bool {
        self.at(SyntaxKind::Delimiter) && self.current_lexeme() == ";"
            || self.at_any_keyword(STMT_START_KEYWORDS)
    }

    /// Guards recursive grammar functions against pathological nesting
    /// (e.g. thousands of nested parens). Returns `false` and emits a
    /// diagnostic once, without consuming input, if the limit is hit.
    pub(super) fn enter(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            self.error("expression nested too deeply");
            return false;
        }
        self.depth += 1;
        true
    }

    pub(super) fn exit(&mut self) {
        self.depth -= 1;
    }
}
