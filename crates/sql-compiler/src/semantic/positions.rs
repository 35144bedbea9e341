//! Recovers source positions for nodes in the parsed tree.
//!
//! The scanner discards whitespace and comments before the parser ever
//! sees a token (per `lexer::scan`'s contract), so the Rowan tree the
//! parser builds only contains non-trivia token text; its internal
//! `TextRange` offsets are relative to that trimmed token stream, not to
//! byte offsets in the original source. The data model still wants every
//! diagnostic (including the semantic stage's) to report a real 1-based
//! line/column, so this builds a one-time lookup from each leaf token's
//! tree-relative range back to the [`Token`] the scanner produced for it
//! — the two sequences are in lockstep, since `Parser::bump` pushes
//! exactly one tree leaf per consumed token, in order, and both exclude
//! the trailing EOF.

use std::collections::HashMap;

use rowan::TextRange;

use sql_core::Position;

use crate::lexer::{Token, TokenKind};
use crate::syntax::SyntaxNode;

pub struct PositionMap {
    by_range: HashMap<TextRange, (Position, std::ops::Range<u32>)>,
}

impl PositionMap {
    pub fn build(tree: &SyntaxNode, tokens: &[Token]) -> Self {
        let leaves = tree
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() != crate::syntax::SyntaxKind::Eof);
        let originals = tokens.iter().filter(|t| t.kind != TokenKind::Eof);

        let mut by_range = HashMap::new();
        for (leaf, original) in leaves.zip(originals) {
            by_range.insert(leaf.text_range(), (original.position, original.span.clone()));
        }
        Self { by_range }
    }

    /// Position of a node's first terminal, per the data model
    /// ("`position` (inherited from its first terminal)").
    pub fn node_position(&self, node: &SyntaxNode) -> Position {
        node.first_token()
            .and_then(|t| self.by_range.get(&t.text_range()))
            .map(|(pos, _)| *pos)
            .unwrap_or(Position::new(1, 1))
    }

    pub fn node_span(&self, node: &SyntaxNode) -> std::ops::Range<u32> {
        node.first_token()
            .and_then(|t| self.by_range.get(&t.text_range()))
            .map(|(_, span)| span.clone())
            .unwrap_or(0..0)
    }

    pub fn token_position(&self, token: &crate::syntax::SyntaxToken) -> Position {
        self.by_range.get(&token.text_range()).map(|(pos, _)| *pos).unwrap_or(Position::new(1, 1))
    }

    pub fn token_span(&self, token: &crate::syntax::SyntaxToken) -> std::ops::Range<u32> {
        self.by_range.get(&token.text_range()).map(|(_, span)| span.clone()).unwrap_or(0..0)
    }
}
