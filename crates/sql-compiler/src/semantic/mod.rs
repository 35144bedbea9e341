//! The semantic analysis stage: walks the parsed `Program`, validating
//! each statement against the running [`SymbolTable`] (§4.3 rules 1, 2, 4,
//! 6, 7) and inferring expression/condition types along the way (rules 3,
//! 5), writing diagnostics and type annotations as it goes.
//!
//! Unlike the scanner and parser, this stage is stateful across
//! statements within one `Program`: a `CREATE TABLE` earlier in the
//! source makes that table visible to a `SELECT` later in the same
//! source, and the caller can thread the same [`SymbolTable`] across
//! repeated calls to [`analyze`] to model a session of incremental DDL
//! (§8's supplementary `CompileUnit`).

pub mod annotate;
pub mod ddl;
pub mod dml;
pub mod expr;
pub mod positions;
pub mod scope;
pub mod symbol_table;
pub mod types;

use crate::diagnostics::Diagnostics;
use crate::lexer::Token;
use crate::parser::ast::{Program, Stmt};
use crate::syntax::SyntaxNode;

pub use annotate::Annotations;
pub use positions::PositionMap;
pub use symbol_table::SymbolTable;
pub use types::Type;

/// The result of one [`analyze`] call: the diagnostics raised and the type
/// annotations recorded for the tree that was analyzed. The [`SymbolTable`]
/// itself is not part of this struct — it's threaded in and back out by
/// the caller, since it outlives any one statement batch.
pub struct Analysis {
    pub diagnostics: Diagnostics,
    pub annotations: Annotations,
}

/// Analyzes every statement in `tree` in source order, mutating `symbols`
/// as `CREATE`/`ALTER`/`DROP` statements are encountered so that later
/// statements in the same tree see earlier ones' effects. `tokens` must be
/// the token stream `tree` was parsed from (used to recover positions via
/// [`PositionMap`]).
pub fn analyze(tree: &SyntaxNode, tokens: &[Token], symbols: &mut SymbolTable) -> Analysis {
    let Some(program) = Program::cast(tree.clone()) else {
        return Analysis { diagnostics: Diagnostics::new(), annotations: Annotations::new() };
    };

    let positions = PositionMap::build(tree, tokens);
    let mut diagnostics = Diagnostics::new();
    let mut annotations = Annotations::new();

    for stmt in program.statements() {
        analyze_statement(&stmt, symbols, &positions, &mut diagnostics, &mut annotations);
    }

    Analysis { diagnostics, annotations }
}

fn analyze_statement(
    stmt: &Stmt,
    symbols: &mut SymbolTable,
    positions: &PositionMap,
    diagnostics: &mut Diagnostics,
    annotations: &mut Annotations,
) {
    match stmt {
        Stmt::CreateTable(create) => {
            let mut cx = ddl::Cx { symbols, positions, diagnostics, annotations };
            ddl::create_table(create, &mut cx);
        }
        Stmt::CreateView(create) => {
            let mut cx = ddl::Cx { symbols, positions, diagnostics, annotations };
            ddl::create_view(create, &mut cx);
        }
        Stmt::CreateIndex(create) => {
            let mut cx = ddl::Cx { symbols, positions, diagnostics, annotations };
            ddl::create_index(create, &mut cx);
        }
        Stmt::AlterTable(alter) => {
            let mut cx = ddl::Cx { symbols, positions, diagnostics, annotations };
            ddl::alter_table(alter, &mut cx);
        }
        Stmt::Drop(drop) => {
            let mut cx = ddl::Cx { symbols, positions, diagnostics, annotations };
            ddl::drop_object(drop, &mut cx);
        }
        Stmt::Select(_) | Stmt::Insert(_) | Stmt::Update(_) | Stmt::Delete(_) => {
            let mut cx = dml::Cx { symbols, positions, diagnostics, annotations };
            dml::analyze_stmt(stmt, &mut cx);
        }
        Stmt::Error(_) => {
            // Already reported by the parser's panic-mode recovery (§7:
            // one diagnostic per root cause, not one per stage).
        }
    }
}
