//! Parse-tree representation: a rowan green/red tree tagged with
//! [`kind::SyntaxKind`].
//!
//! A single node type with a `rule` tag and a children vector (rather than
//! one Rust type per grammar production) keeps the tree homogeneous: the
//! parser can wrap, checkpoint and re-parent nodes cheaply, and the `type`
//! slot the semantic stage writes lives one level up, in the typed `ast`
//! wrappers, so the raw tree stays immutable after parsing.

pub mod kind;

pub use kind::{SqlLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
