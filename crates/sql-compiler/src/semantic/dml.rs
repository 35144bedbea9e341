//! DML validation: reference resolution (§4.3 rule 2), INSERT/UPDATE
//! assignability (rule 4), and GROUP BY/aggregate validation (rule 6).
//! `SELECT`'s own handler also backs `CREATE VIEW` (rule 7), which needs
//! the projection's column names and inferred types to build the view's
//! `TableDescriptor`.
//!
//! None of these statement kinds mutate the symbol table, so [`Cx`] holds
//! it by shared reference — unlike [`super::ddl::Cx`], which does.

use crate::diagnostics::{Diagnostics, Stage};
use crate::parser::ast::{self, Condition, DeleteStmt, Expr, FunctionCall, InsertStmt, SelectItem, SelectStmt, Stmt, UpdateStmt};
use crate::syntax::SyntaxNode;

use super::annotate::Annotations;
use super::expr::{self, Resolver};
use super::positions::PositionMap;
use super::scope::Scope;
use super::symbol_table::SymbolTable;
use super::types::Type;

pub struct Cx<'a> {
    pub symbols: &'a SymbolTable,
    pub positions: &'a PositionMap,
    pub diagnostics: &'a mut Diagnostics,
    pub annotations: &'a mut Annotations,
}

impl<'a> Cx<'a> {
    fn error(&mut self, message: impl Into<String>, node: &SyntaxNode) {
        let pos = self.positions.node_position(node);
        self.diagnostics.error(Stage::Sem, message, pos).emit();
    }

    /// Runs `f` with an [`expr::Cx`] borrowing this context's annotations
    /// and diagnostics, resolving `ColumnRef`s through `resolver`.
    fn with_expr_cx<R>(
        &mut self,
        resolver: &Resolver,
        f: impl FnOnce(&mut expr::Cx, &dyn Fn(&SyntaxNode) -> sql_core::Position) -> R,
    ) -> R {
        let positions = self.positions;
        let mut inner =
            expr::Cx { resolver, annotations: &mut *self.annotations, diagnostics: &mut *self.diagnostics };
        f(&mut inner, &|n| (positions.node_position(n), positions.node_span(n)))
    }

    fn scope_for(&self, table_name: &str) -> Scope<'a> {
        let mut scope = Scope::new(self.symbols);
        scope.bind(table_name, None);
        scope
    }
}

/// Binds every table named in a `FROM` clause (primary table + joins) into
/// a fresh [`Scope`], reporting unknown tables/aliases. A table that fails
/// to bind is simply absent from scope — later `ColumnRef`s against it
/// surface as `UnknownTable`, not a second diagnostic here.
fn build_scope<'a>(select: &SelectStmt, cx: &mut Cx<'a>) -> Scope<'a> {
    let mut scope = Scope::new(cx.symbols);
    let Some(from) = select.from_clause() else { return scope };
    for table_ref in from.all_table_refs() {
        let Some(name_tok) = table_ref.table_name() else { continue };
        let alias = table_ref.alias().map(|t| t.text().to_string());
        if !scope.bind(name_tok.text(), alias.as_deref()) {
            cx.error(format!("unknown table '{}'", name_tok.text()), table_ref.as_cst());
        }
    }
    scope
}

/// Validates one `SELECT` (including a view's defining query) and returns
/// its projection as `(column_name, type)` pairs, in select-list order —
/// the shape `ddl::create_view` needs to build a `TableDescriptor`.
pub fn select_stmt(select: &SelectStmt, cx: &mut Cx) -> Vec<(Option<String>, Type)> {
    let scope = build_scope(select, cx);
    let resolver = Resolver::Scope(&scope);

    let mut projection = Vec::new();
    if let Some(list) = select.select_list() {
        for item in list.items() {
            match item {
                SelectItem::Star => {
                    for name in scope.table_names() {
                        if let Some(table) = cx.symbols.get(name) {
                            for column in &table.columns {
                                projection.push((Some(column.name.clone()), column.declared_type));
                            }
                        }
                    }
                }
                SelectItem::Expr { expr, alias } => {
                    let ty = cx.with_expr_cx(&resolver, |ecx, pos_of| expr::infer_expr(&expr, ecx, pos_of));
                    let name = alias.map(|t| t.text().to_string()).or_else(|| projection_name(&expr));
                    projection.push((name, ty));
                }
            }
        }
    }

    if let Some(where_clause) = select.where_clause() {
        if let Some(cond) = where_clause.condition() {
            reject_aggregates_in(&cond, cx);
            cx.with_expr_cx(&resolver, |ecx, pos_of| expr::infer_condition(&cond, ecx, pos_of));
        }
    }

    let group_by_exprs = select.group_by_clause().map(|g| g.columns()).unwrap_or_default();
    for expr in &group_by_exprs {
        cx.with_expr_cx(&resolver, |ecx, pos_of| expr::infer_expr(expr, ecx, pos_of));
    }

    if let Some(having) = select.having_clause() {
        if let Some(cond) = having.condition() {
            cx.with_expr_cx(&resolver, |ecx, pos_of| expr::infer_condition(&cond, ecx, pos_of));
        }
    }

    // Rule 6: every non-aggregated projection expression must appear in
    // GROUP BY once the query aggregates at all (has a GROUP BY clause, or
    // any aggregate function in its select list).
    let aggregates_present = select.select_list().is_some_and(|l| l.items().iter().any(is_aggregate_item));
    if aggregates_present || !group_by_exprs.is_empty() {
        if let Some(list) = select.select_list() {
            for item in list.items() {
                let SelectItem::Expr { expr, .. } = item else { continue };
                if is_aggregate_expr(&expr) {
                    continue;
                }
                if !group_by_exprs.iter().any(|g| exprs_equivalent(g, &expr)) {
                    cx.error(
                        format!(
                            "column '{}' must appear in GROUP BY or be used in an aggregate function",
                            expr.as_cst().text()
                        ),
                        expr.as_cst(),
                    );
                }
            }
        }
    }

    if let Some(order_by) = select.order_by_clause() {
        for item in order_by.items() {
            if let Some(expr) = item.expr() {
                cx.with_expr_cx(&resolver, |ecx, pos_of| expr::infer_expr(&expr, ecx, pos_of));
            }
        }
    }

    projection
}

fn is_aggregate_item(item: &SelectItem) -> bool {
    matches!(item, SelectItem::Expr { expr, .. } if is_aggregate_expr(expr))
}

fn is_aggregate_expr(expr: &Expr) -> bool {
    matches!(expr, Expr::FunctionCall(fc) if is_aggregate_call(fc))
}

fn is_aggregate_call(fc: &FunctionCall) -> bool {
    fc.name()
        .is_some_and(|t| matches!(t.text().to_ascii_uppercase().as_str(), "COUNT" | "SUM" | "AVG" | "MIN" | "MAX"))
}

/// Two select-list/group-by expressions are "the same grouping key" when
/// their source text matches — the grammar doesn't carry enough semantic
/// identity (e.g. column resolution) to compare structurally, and SQL's
/// own rule is lexical agreement modulo whitespace, which source-text
/// comparison already gives us since the scanner discards trivia.
fn exprs_equivalent(a: &Expr, b: &Expr) -> bool {
    a.as_cst().text().to_string() == b.as_cst().text().to_string()
}

/// Rule 6: aggregate functions are disallowed in `WHERE` (they belong in
/// `HAVING`, after grouping).
fn reject_aggregates_in(cond: &Condition, cx: &mut Cx) {
    for node in cond.as_cst().descendants() {
        let Some(fc) = ast::FunctionCall::cast(node.clone()) else { continue };
        if is_aggregate_call(&fc) {
            cx.error("aggregate functions are not allowed in WHERE", &node);
        }
    }
}

fn projection_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::ColumnRef(cr) => cr.column().map(|t| t.text().to_string()),
        _ => None,
    }
}

pub fn insert_stmt(stmt: &InsertStmt, cx: &mut Cx) {
    let Some(table_tok) = stmt.table_name() else { return };
    let table_name = table_tok.text().to_string();
    let Some(table) = cx.symbols.get(&table_name) else {
        cx.error(format!("unknown table '{table_name}'"), stmt.as_cst());
        return;
    };

    // Column list, explicit or (absent) the table's declared order — rule
    // 4's arity check is against whichever list applies.
    let target_columns: Vec<(String, Type, bool)> = match stmt.columns() {
        Some(explicit) => {
            let mut resolved = Vec::with_capacity(explicit.len());
            let mut ok = true;
            for tok in &explicit {
                match table.column(tok.text()) {
                    Some(col) => resolved.push((col.name.clone(), col.declared_type, col.is_not_null())),
                    None => {
                        cx.error(format!("unknown column '{}' in table '{table_name}'", tok.text()), stmt.as_cst());
                        ok = false;
                    }
                }
            }
            if !ok {
                return;
            }
            resolved
        }
        None => table.columns.iter().map(|c| (c.name.clone(), c.declared_type, c.is_not_null())).collect(),
    };

    for row in stmt.rows() {
        let values = row.values();
        if values.len() != target_columns.len() {
            cx.error(
                format!("expected {} values, found {}", target_columns.len(), values.len()),
                row.as_cst(),
            );
            continue;
        }
        for (value, (col_name, declared_type, not_null)) in values.iter().zip(target_columns.iter()) {
            let ty = cx.with_expr_cx(&Resolver::None, |ecx, pos_of| expr::infer_expr(value, ecx, pos_of));
            if ty == Type::Unknown {
                continue;
            }
            if ty == Type::Null && *not_null {
                cx.error(format!("column '{col_name}' does not accept NULL"), value.as_cst());
            } else if !ty.assignable_to(*declared_type) {
                cx.error(
                    format!("type mismatch: cannot assign {ty} to column '{col_name}' of type {declared_type}"),
                    value.as_cst(),
                );
            }
        }
    }
}

pub fn update_stmt(stmt: &UpdateStmt, cx: &mut Cx) {
    let Some(table_tok) = stmt.table_name() else { return };
    let table_name = table_tok.text().to_string();
    if !cx.symbols.contains(&table_name) {
        cx.error(format!("unknown table '{table_name}'"), stmt.as_cst());
        return;
    }

    for assign in stmt.assigns() {
        let Some(col_tok) = assign.column() else { continue };
        let Some(value) = assign.value() else { continue };
        let ty = cx.with_expr_cx(&Resolver::None, |ecx, pos_of| expr::infer_expr(&value, ecx, pos_of));
        let Some(table) = cx.symbols.get(&table_name) else { continue };
        let Some(column) = table.column(col_tok.text()) else {
            cx.error(format!("unknown column '{}' in table '{table_name}'", col_tok.text()), assign.as_cst());
            continue;
        };
        if ty == Type::Unknown {
            continue;
        }
        if ty == Type::Null && column.is_not_null() {
            cx.error(format!("column '{}' does not accept NULL", column.name), value.as_cst());
        } else if !ty.assignable_to(column.declared_type) {
            cx.error(
                format!("type mismatch: cannot assign {ty} to column '{}' of type {}", column.name, column.declared_type),
                value.as_cst(),
            );
        }
    }

    if let Some(where_clause) = stmt.where_clause() {
        if let Some(cond) = where_clause.condition() {
            let scope = cx.scope_for(&table_name);
            let resolver = Resolver::Scope(&scope);
            cx.with_expr_cx(&resolver, |ecx, pos_of| expr::infer_condition(&cond, ecx, pos_of));
        }
    }
}

pub fn delete_stmt(stmt: &DeleteStmt, cx: &mut Cx) {
    let Some(table_tok) = stmt.table_name() else { return };
    let table_name = table_tok.text().to_string();
    if !cx.symbols.contains(&table_name) {
        cx.error(format!("unknown table '{table_name}'"), stmt.as_cst());
        return;
    }

    if let Some(where_clause) = stmt.where_clause() {
        if let Some(cond) = where_clause.condition() {
            let scope = cx.scope_for(&table_name);
            let resolver = Resolver::Scope(&scope);
            cx.with_expr_cx(&resolver, |ecx, pos_of| expr::infer_condition(&cond, ecx, pos_of));
        }
    }
}

/// Dispatches a single statement to its validator. `CreateTable`,
/// `CreateView`, `CreateIndex`, `AlterTable` and `Drop` are handled by
/// [`super::ddl`]; this only covers the four data-manipulation kinds plus
/// the no-op `Error` (already reported by the parser).
pub fn analyze_stmt(stmt: &Stmt, cx: &mut Cx) {
    match stmt {
        Stmt::Select(select) => {
            select_stmt(select, cx);
        }
        Stmt::Insert(insert) => insert_stmt(insert, cx),
        Stmt::Update(update) => update_stmt(update, cx),
        Stmt::Delete(delete) => delete_stmt(delete, cx),
        Stmt::CreateTable(_)
        | Stmt::CreateView(_)
        | Stmt::CreateIndex(_)
        | Stmt::AlterTable(_)
        | Stmt::Drop(_)
        | Stmt::Error(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::compile;
    use crate::diagnostics::Stage;

    #[test]
    fn select_from_unknown_table_is_rejected() {
        let unit = compile("SELECT 1 FROM ghosts;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unknown table"));
    }

    #[test]
    fn unqualified_column_shared_by_two_tables_is_ambiguous() {
        let unit = compile("CREATE TABLE a (id INTEGER); CREATE TABLE b (id INTEGER); SELECT id FROM a, b;");
        let sem: Vec<_> = unit.diagnostics.iter().filter(|d| d.stage == Stage::Sem).collect();
        assert_eq!(sem.len(), 1);
        assert!(sem[0].message.contains("ambiguous"));
    }

    #[test]
    fn qualified_column_resolves_the_ambiguity() {
        let unit = compile("CREATE TABLE a (id INTEGER); CREATE TABLE b (id INTEGER); SELECT a.id FROM a, b;");
        assert!(unit.is_success(), "{:?}", unit.diagnostics.iter().collect::<Vec<_>>());
    }

    #[test]
    fn unknown_column_reference_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER); SELECT missing FROM t;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unknown column"));
    }

    #[test]
    fn insert_arity_mismatch_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER, b INTEGER); INSERT INTO t VALUES (1);");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("expected 2 values, found 1"));
    }

    #[test]
    fn insert_null_into_not_null_column_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER NOT NULL); INSERT INTO t VALUES (NULL);");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("does not accept NULL"));
    }

    #[test]
    fn insert_with_explicit_unknown_column_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER); INSERT INTO t (missing) VALUES (1);");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unknown column"));
    }

    #[test]
    fn update_of_unknown_column_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER); UPDATE t SET missing = 1;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unknown column"));
    }

    #[test]
    fn delete_from_unknown_table_is_rejected() {
        let unit = compile("DELETE FROM ghosts;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unknown table"));
    }

    #[test]
    fn non_aggregated_column_missing_from_group_by_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER, b INTEGER); SELECT a, b FROM t GROUP BY a;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("must appear in GROUP BY"));
    }

    #[test]
    fn aggregate_alongside_its_group_by_key_is_accepted() {
        let unit = compile("CREATE TABLE t (a INTEGER, b INTEGER); SELECT a, COUNT(b) FROM t GROUP BY a;");
        assert!(unit.is_success(), "{:?}", unit.diagnostics.iter().collect::<Vec<_>>());
    }

    #[test]
    fn aggregate_function_in_where_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER); SELECT a FROM t WHERE COUNT(a) > 1;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("not allowed in WHERE"));
    }
}
