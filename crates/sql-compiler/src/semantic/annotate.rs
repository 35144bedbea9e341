//! The annotated tree, modeled as a parallel structure rather than a
//! mutation of the (structurally immutable) Rowan parse tree: a side
//! table from an expression node's text range to its inferred [`Type`].
//!
//! Keying on `TextRange` rather than `SyntaxNode` directly sidesteps any
//! question of node identity across clones of the same tree and is all
//! the analyzer needs — within one parse, a node's span uniquely
//! identifies it.

use std::collections::HashMap;

use rowan::TextRange;

use crate::syntax::SyntaxNode;

use super::types::Type;

#[derive(Debug, Clone, Default)]
pub struct Annotations {
    types: HashMap<TextRange, Type>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `ty` for `node`'s type slot. Per §4.3, each expression node
    /// gains its inferred type exactly once; a second call for the same
    /// node overwrites rather than panics, since re-running the analyzer
    /// on the same tree (the idempotence property in §8) must produce the
    /// same result, not an error.
    pub fn set(&mut self, node: &SyntaxNode, ty: Type) {
        self.types.insert(node.text_range(), ty);
    }

    pub fn get(&self, node: &SyntaxNode) -> Type {
        self.types.get(&node.text_range()).copied().unwrap_or(Type::Unknown)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
