//! Syntax kinds for the SQL parse tree.
//!
//! This module defines every token and node kind that can appear in the
//! tree.
//!
//! ## Architecture
//!
//! `SyntaxKind` has a dual role:
//! - Token kinds (terminals): produced by the scanner, wrapped by the
//!   parser into `Terminal` leaves that point back at the originating token.
//! - Node kinds (non-terminals): created by the parser, one per grammar
//!   production (`SelectStmt`, `Comparison`, `ColumnRef`, ...).
//!
//! Rowan requires a `Language` trait implementation to convert between our
//! `SyntaxKind` and its internal `rowan::SyntaxKind` (a newtype over `u16`).
//! That's what `SqlLang` provides.

#![allow(dead_code)]

use rowan::Language;

/// All kinds of tokens and nodes in the parse tree.
///
/// Variants are ordered: tokens first, then nodes, then the `__LAST`
/// sentinel used for bounds checking in `kind_from_raw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // =========================
    // Tokens (terminal symbols)
    // =========================
    Keyword = 0,
    Identifier,
    StringLit,
    IntegerLit,
    FloatLit,
    /// `+ - * / %`
    Operator,
    /// `< > = <= >= <> != ||`
    Comparison,
    /// `, ( ) ;`
    Delimiter,
    Dot,
    Eof,

    // Trivia tokens
    Whitespace,
    LineComment,
    BlockComment,

    /// Garbage consumed by error recovery.
    Error,

    // ================================
    // Nodes (non-terminal symbols)
    // ================================
    /// Root node: a sequence of statements.
    Program,
    SelectStmt,
    InsertStmt,
    UpdateStmt,
    DeleteStmt,
    CreateTableStmt,
    CreateViewStmt,
    CreateIndexStmt,
    AlterTableStmt,
    DropStmt,

    SelectList,
    FromClause,
    TableRef,
    Join,
    WhereClause,
    GroupByClause,
    HavingClause,
    OrderByClause,
    SortItem,
    LimitClause,

    ColumnDefList,
    ColumnDef,
    ConstraintList,
    Constraint,
    ColumnList,
    ValueList,
    AssignList,
    Assign,

    OrCondition,
    AndCondition,
    NotCondition,
    Comparison_,
    Between,
    In,
    Like,
    IsNull,
    ParenCondition,

    AddExpr,
    MulExpr,
    UnaryExpr,
    ParenExpr,
    ColumnRef,
    FunctionCall,
    ArgList,
    Literal,

    /// A single lexical token wrapped as a tree leaf.
    Terminal,
    /// A recovered subtree: carries the diagnostic and any partial children.
    ErrorNode,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Returns `true` if this is a trivia token (whitespace or comment).
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | LineComment | BlockComment)
    }

    /// Returns `true` if this kind represents a lexical token rather than a
    /// grammar-rule node.
    #[inline]
    pub fn is_token(self) -> bool {
        (self as u16) <= (Error as u16)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for parameterizing Rowan's tree types.
///
/// Zero-sized, uninhabited: used purely as a type-level marker so Rowan can
/// associate syntax trees with our `SyntaxKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SqlLang {}

impl Language for SqlLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: bounds-checked above, and SyntaxKind is repr(u16).
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<SqlLang>;
pub type SyntaxToken = rowan::SyntaxToken<SqlLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;
