//! DDL validation (§4.3 rule 1): `CREATE TABLE`/`VIEW`/`INDEX`, `ALTER
//! TABLE`, `DROP`. Each handler mutates the symbol table only after its
//! own validation passes, so a rejected statement never partially
//! updates it.

use crate::diagnostics::{Diagnostics, Stage};
use crate::parser::ast::{AlterTableStmt, ConstraintKind, CreateIndexStmt, CreateTableStmt, CreateViewStmt, DropStmt};
use crate::syntax::SyntaxNode;

use super::annotate::Annotations;
use super::expr::{self, Resolver};
use super::positions::PositionMap;
use super::symbol_table::{ColumnDescriptor, Constraint, SymbolTable, TableDescriptor};
use super::types::Type;

pub struct Cx<'a> {
    pub symbols: &'a mut SymbolTable,
    pub positions: &'a PositionMap,
    pub diagnostics: &'a mut Diagnostics,
    pub annotations: &'a mut Annotations,
}

impl Cx<'_> {
    fn error(&mut self, message: impl Into<String>, node: &SyntaxNode) {
        let pos = self.positions.node_position(node);
        self.diagnostics.error(Stage::Sem, message, pos).emit();
    }

    fn pos_of(&self, node: &SyntaxNode) -> sql_core::Position {
        self.positions.node_position(node)
    }
}

/// Builds descriptors for a `ColumnDefList`, checking for duplicate names
/// and unknown data-type keywords (invariant: "column names are unique
/// within a table"). Does not touch the symbol table.
fn build_columns(defs: &[crate::parser::ast::ColumnDef], cx: &mut Cx) -> Vec<ColumnDescriptor> {
    let mut columns = Vec::with_capacity(defs.len());
    for (ordinal, def) in defs.iter().enumerate() {
        let Some(name_tok) = def.name() else { continue };
        let name = name_tok.text().to_string();
        if columns.iter().any(|c: &ColumnDescriptor| c.name.eq_ignore_ascii_case(&name)) {
            cx.error(format!("duplicate column '{name}'"), def.as_cst());
            continue;
        }
        let declared_type = match def.type_keyword() {
            Some(tok) => match Type::from_keyword(&tok.text().to_ascii_uppercase()) {
                Some(ty) => ty,
                None => {
                    cx.error(format!("unknown data type '{}'", tok.text()), def.as_cst());
                    Type::Unknown
                }
            },
            None => Type::Unknown,
        };
        let constraints = build_constraints(def, cx);
        columns.push(ColumnDescriptor { name, declared_type, constraints, ordinal });
    }
    columns
}

fn build_constraints(def: &crate::parser::ast::ColumnDef, cx: &mut Cx) -> Vec<Constraint> {
    let mut out = Vec::new();
    for constraint in def.constraints() {
        let Some(kind) = constraint.kind() else { continue };
        match kind {
            ConstraintKind::PrimaryKey => out.push(Constraint::PrimaryKey),
            ConstraintKind::NotNull => out.push(Constraint::NotNull),
            ConstraintKind::Unique => out.push(Constraint::Unique),
            ConstraintKind::Default(expr) => {
                let positions = &*cx.positions;
                let mut inner = expr::Cx {
                    resolver: &Resolver::None,
                    annotations: &mut *cx.annotations,
                    diagnostics: &mut *cx.diagnostics,
                };
                expr::infer_expr(&expr, &mut inner, &|n| (positions.node_position(n), positions.node_span(n)));
                out.push(Constraint::Default(expr.as_cst().text().to_string()));
            }
            ConstraintKind::Check(cond) => {
                let positions = &*cx.positions;
                let mut inner = expr::Cx {
                    resolver: &Resolver::None,
                    annotations: &mut *cx.annotations,
                    diagnostics: &mut *cx.diagnostics,
                };
                expr::infer_condition(&cond, &mut inner, &|n| (positions.node_position(n), positions.node_span(n)));
                out.push(Constraint::Check(cond.as_cst().text().to_string()));
            }
            ConstraintKind::ForeignKey { table, column } => out.push(Constraint::ForeignKey {
                table: table.text().to_string(),
                column: column.map(|t| t.text().to_string()),
            }),
        }
    }
    out
}

pub fn create_table(stmt: &CreateTableStmt, cx: &mut Cx) {
    let Some(name_tok) = stmt.table_name() else { return };
    let name = name_tok.text().to_string();
    let columns = build_columns(&stmt.columns(), cx);
    if cx.symbols.contains(&name) {
        cx.error(format!("table '{name}' already exists"), stmt.as_cst());
        return;
    }
    let declared_at = cx.pos_of(stmt.as_cst());
    cx.symbols.insert(TableDescriptor { name, columns, declared_at });
}

pub fn create_view(stmt: &CreateViewStmt, cx: &mut Cx) {
    let Some(name_tok) = stmt.view_name() else { return };
    let name = name_tok.text().to_string();

    let Some(select) = stmt.select() else { return };
    // The defining SELECT is validated with the same rules as any other
    // SELECT (reference resolution, WHERE/HAVING typing, GROUP BY) before
    // its projection becomes the view's column list (§4.3 rule 7). This
    // shared borrow of `symbols` ends with `dml_cx`, before the mutable
    // `contains`/`insert` calls below.
    let projection = {
        let mut dml_cx = super::dml::Cx {
            symbols: &*cx.symbols,
            positions: cx.positions,
            diagnostics: &mut *cx.diagnostics,
            annotations: &mut *cx.annotations,
        };
        super::dml::select_stmt(&select, &mut dml_cx)
    };

    if cx.symbols.contains(&name) {
        cx.error(format!("table '{name}' already exists"), stmt.as_cst());
        return;
    }

    let columns = projection
        .into_iter()
        .enumerate()
        .map(|(ordinal, (col_name, ty))| ColumnDescriptor {
            name: col_name.unwrap_or_else(|| format!("column_{}", ordinal + 1)),
            declared_type: ty,
            constraints: Vec::new(),
            ordinal,
        })
        .collect();

    let declared_at = cx.pos_of(stmt.as_cst());
    cx.symbols.insert(TableDescriptor { name, columns, declared_at });
}

pub fn create_index(stmt: &CreateIndexStmt, cx: &mut Cx) {
    let Some(table_tok) = stmt.table_name() else { return };
    let table_name = table_tok.text().to_string();
    let Some(table) = cx.symbols.get(&table_name) else {
        cx.error(format!("unknown table '{table_name}'"), stmt.as_cst());
        return;
    };
    let unknown: Vec<String> =
        stmt.columns().into_iter().filter(|c| !table.has_column(c.text())).map(|c| c.text().to_string()).collect();
    for col_name in unknown {
        cx.error(format!("unknown column '{col_name}' in table '{table_name}'"), stmt.as_cst());
    }
}

pub fn alter_table(stmt: &AlterTableStmt, cx: &mut Cx) {
    let Some(table_tok) = stmt.table_name() else { return };
    let table_name = table_tok.text().to_string();
    if !cx.symbols.contains(&table_name) {
        cx.error(format!("unknown table '{table_name}'"), stmt.as_cst());
        return;
    }

    if stmt.is_add() {
        let Some(def) = stmt.add_column() else { return };
        let Some(new_name) = def.name() else { return };
        let new_name = new_name.text().to_string();
        let already_exists = cx.symbols.get(&table_name).is_some_and(|t| t.has_column(&new_name));
        if already_exists {
            cx.error(format!("column '{new_name}' already exists in table '{table_name}'"), stmt.as_cst());
            return;
        }
        let columns = build_columns(std::slice::from_ref(&def), cx);
        let Some(column) = columns.into_iter().next() else { return };
        if let Some(table) = cx.symbols.get_mut(&table_name) {
            let ordinal = table.columns.len();
            let mut column = column;
            column.ordinal = ordinal;
            table.columns.push(column);
        }
    } else if stmt.is_drop() {
        let Some(col_tok) = stmt.drop_column_name() else { return };
        let col_name = col_tok.text().to_string();
        let has_column = cx.symbols.get(&table_name).is_some_and(|t| t.has_column(&col_name));
        if !has_column {
            cx.error(format!("unknown column '{col_name}' in table '{table_name}'"), stmt.as_cst());
            return;
        }
        let Some(table) = cx.symbols.get_mut(&table_name) else { return };
        table.columns.retain(|c| !c.name.eq_ignore_ascii_case(&col_name));
        for (ordinal, column) in table.columns.iter_mut().enumerate() {
            column.ordinal = ordinal;
        }
    }
}

pub fn drop_object(stmt: &DropStmt, cx: &mut Cx) {
    let Some(name_tok) = stmt.object_name() else { return };
    let name = name_tok.text().to_string();
    if !cx.symbols.remove(&name) {
        cx.error(format!("unknown table '{name}'"), stmt.as_cst());
    }
}

#[cfg(test)]
mod tests {
    use crate::compile;

    #[test]
    fn redeclaring_a_table_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER); CREATE TABLE t (b INTEGER);");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("already exists"));
        assert_eq!(unit.symbol_table.len(), 1);
    }

    #[test]
    fn duplicate_column_in_create_table_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER, a VARCHAR(10));");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("duplicate column"));
    }

    #[test]
    fn unknown_data_type_is_rejected() {
        let unit = compile("CREATE TABLE t (a FROBNICATE);");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unknown data type"));
    }

    #[test]
    fn drop_of_unknown_table_is_rejected() {
        let unit = compile("DROP TABLE ghosts;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unknown table"));
    }

    #[test]
    fn alter_table_on_unknown_table_is_rejected() {
        let unit = compile("ALTER TABLE ghosts ADD COLUMN a INTEGER;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unknown table"));
    }

    #[test]
    fn alter_table_add_duplicate_column_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER); ALTER TABLE t ADD COLUMN a INTEGER;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("already exists"));
    }

    #[test]
    fn alter_table_drop_unknown_column_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER); ALTER TABLE t DROP COLUMN b;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unknown column"));
    }

    #[test]
    fn alter_table_add_then_drop_reorders_ordinals() {
        let unit = compile(
            "CREATE TABLE t (a INTEGER); ALTER TABLE t ADD COLUMN b INTEGER; ALTER TABLE t DROP COLUMN a;",
        );
        assert!(unit.is_success(), "{:?}", unit.diagnostics.iter().collect::<Vec<_>>());
        let table = unit.symbol_table.get("t").unwrap();
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].name, "b");
        assert_eq!(table.columns[0].ordinal, 0);
    }

    #[test]
    fn create_index_on_unknown_column_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER); CREATE INDEX idx ON t (missing);");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unknown column"));
    }

    #[test]
    fn create_view_derives_columns_from_its_select() {
        let unit = compile("CREATE TABLE t (a INTEGER, b VARCHAR(10)); CREATE VIEW v AS SELECT a, b FROM t;");
        assert!(unit.is_success(), "{:?}", unit.diagnostics.iter().collect::<Vec<_>>());
        let view = unit.symbol_table.get("v").unwrap();
        assert_eq!(view.columns.len(), 2);
        assert_eq!(view.columns[0].name, "a");
        assert_eq!(view.columns[0].declared_type, super::Type::Integer);
        assert_eq!(view.columns[1].declared_type, super::Type::Text);
    }
}
