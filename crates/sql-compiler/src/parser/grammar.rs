//! Recursive-descent grammar, one function per production.
//!
//! Binary-operator productions (`OrCondition`, `AddExpr`, ...) use the
//! standard precedence-climbing shape: parse one operand of the next
//! tighter production, then loop consuming `(op, operand)` pairs,
//! wrapping the whole run in a single node via [`Parser::checkpoint`] so
//! e.g. `a + b + c` nests as one flat `AddExpr` rather than a right- or
//! left-leaning chain of them.

use super::core::Parser;
use crate::syntax::SyntaxKind;

const COMPARISON_OPS: &[&str] = &["<", ">", "=", "<=", ">=", "<>", "!="];

pub fn parse_program(p: &mut Parser) {
    p.start_node(SyntaxKind::Program);
    while !p.eof() {
        parse_statement(p);
    }
    p.finish_node();
}

fn parse_statement(p: &mut Parser) {
    if p.at_keyword("SELECT") {
        parse_select_stmt(p);
    } else if p.at_keyword("INSERT") {
        parse_insert_stmt(p);
    } else if p.at_keyword("UPDATE") {
        parse_update_stmt(p);
    } else if p.at_keyword("DELETE") {
        parse_delete_stmt(p);
    } else if p.at_keyword("CREATE") {
        parse_create_stmt(p);
    } else if p.at_keyword("ALTER") {
        parse_alter_table_stmt(p);
    } else if p.at_keyword("DROP") {
        parse_drop_stmt(p);
    } else {
        let found = p.current_lexeme().to_string();
        let upper = found.to_ascii_uppercase();
        if let Some(suggestion) = crate::lexer::keywords::suggest_keyword(&upper) {
            p.error_with_suggestion(
                format!("unknown statement '{found}'"),
                format!("did you mean '{suggestion}'?"),
            );
        } else {
            p.error(format!("unknown statement '{found}'"));
        }
        p.synchronize();
    }
    eat_semicolon(p);
}

fn eat_semicolon(p: &mut Parser) {
    if p.at(SyntaxKind::Delimiter) && p.current_lexeme() == ";" {
        p.bump();
    } else if !p.eof() {
        p.error("expected ';'");
    }
}

// ---------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------

fn parse_select_stmt(p: &mut Parser) {
    p.start_node(SyntaxKind::SelectStmt);
    p.expect_keyword("SELECT");
    p.eat_keyword("DISTINCT");
    parse_select_list(p);

    if p.at_keyword("FROM") {
        parse_from_clause(p);
    } else if !p.at_statement_boundary() && !p.eof() {
        // §4.2's specific recovery policy: name the clause keyword that
        // follows the missing FROM, not just "expected FROM clause".
        p.error(format!("Missing FROM clause before {}", p.current_lexeme().to_ascii_uppercase()));
    }

    if p.at_keyword("WHERE") {
        parse_where_clause(p);
    }
    if p.at_keyword("GROUP") {
        parse_group_by_clause(p);
    }
    if p.at_keyword("HAVING") {
        parse_having_clause(p);
    }
    if p.at_keyword("ORDER") {
        parse_order_by_clause(p);
    }
    if p.at_keyword("LIMIT") {
        parse_limit_clause(p);
    }
    p.finish_node();
}

fn parse_select_list(p: &mut Parser) {
    p.start_node(SyntaxKind::SelectList);
    loop {
        if p.at(SyntaxKind::Operator) && p.current_lexeme() == "*" {
            p.bump();
        } else {
            parse_expression(p);
            if p.eat_keyword("AS") {
                p.expect(SyntaxKind::Identifier, "alias");
            } else if p.at(SyntaxKind::Identifier) {
                // bare alias, no AS
                p.bump();
            }
        }
        if !eat_comma(p) {
            break;
        }
    }
    p.finish_node();
}

fn eat_comma(p: &mut Parser) -> bool {
    if p.at(SyntaxKind::Delimiter) && p.current_lexeme() == "," {
        p.bump();
        true
    } else {
        false
    }
}

fn parse_from_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::FromClause);
    p.expect_keyword("FROM");
    parse_table_ref(p);
    loop {
        if p.at_any_keyword(&["JOIN", "INNER", "LEFT", "RIGHT", "FULL", "CROSS"]) {
            parse_join(p);
        } else if eat_comma(p) {
            parse_table_ref(p);
        } else {
            break;
        }
    }
    p.finish_node();
}

fn parse_table_ref(p: &mut Parser) {
    p.start_node(SyntaxKind::TableRef);
    p.expect(SyntaxKind::Identifier, "table name");
    if p.eat_keyword("AS") {
        p.expect(SyntaxKind::Identifier, "table alias");
    } else if p.at(SyntaxKind::Identifier) && !p.at_any_keyword(super::core::STMT_START_KEYWORDS) {
        p.bump();
    }
    p.finish_node();
}

fn parse_join(p: &mut Parser) {
    p.start_node(SyntaxKind::Join);
    for kw in ["INNER", "LEFT", "RIGHT", "FULL", "CROSS"] {
        if p.eat_keyword(kw) {
            break;
        }
    }
    p.expect_keyword("JOIN");
    parse_table_ref(p);
    if p.expect_keyword("ON") {
        parse_or_condition(p);
    }
    p.finish_node();
}

fn parse_where_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::WhereClause);
    p.expect_keyword("WHERE");
    parse_or_condition(p);
    p.finish_node();
}

fn parse_group_by_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::GroupByClause);
    p.expect_keyword("GROUP");
    p.expect_keyword("BY");
    loop {
        parse_expression(p);
        if !eat_comma(p) {
            break;
        }
    }
    p.finish_node();
}

fn parse_having_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::HavingClause);
    p.expect_keyword("HAVING");
    parse_or_condition(p);
    p.finish_node();
}

fn parse_order_by_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::OrderByClause);
    p.expect_keyword("ORDER");
    p.expect_keyword("BY");
    loop {
        p.start_node(SyntaxKind::SortItem);
        parse_expression(p);
        if !p.eat_keyword("ASC") {
            p.eat_keyword("DESC");
        }
        p.finish_node();
        if !eat_comma(p) {
            break;
        }
    }
    p.finish_node();
}

fn parse_limit_clause(p: &mut Parser) {
    p.start_node(SyntaxKind::LimitClause);
    p.expect_keyword("LIMIT");
    p.expect(SyntaxKind::IntegerLit, "integer literal");
    p.finish_node();
}

// ---------------------------------------------------------------------
// INSERT / UPDATE / DELETE
// ---------------------------------------------------------------------

fn parse_insert_stmt(p: &mut Parser) {
    p.start_node(SyntaxKind::InsertStmt);
    p.expect_keyword("INSERT");
    p.expect_keyword("INTO");
    p.expect(SyntaxKind::Identifier, "table name");

    if p.at(SyntaxKind::Delimiter) && p.current_lexeme() == "(" {
        p.bump();
        parse_column_list(p);
        p.expect_delimiter(")");
    }

    if p.expect_keyword("VALUES") {
        loop {
            p.expect_delimiter("(");
            parse_value_list(p);
            p.expect_delimiter(")");
            if !eat_comma(p) {
                break;
            }
        }
    }
    p.finish_node();
}

fn parse_column_list(p: &mut Parser) {
    p.start_node(SyntaxKind::ColumnList);
    loop {
        p.expect(SyntaxKind::Identifier, "column name");
        if !eat_comma(p) {
            break;
        }
    }
    p.finish_node();
}

fn parse_value_list(p: &mut Parser) {
    p.start_node(SyntaxKind::ValueList);
    loop {
        parse_expression(p);
        if !eat_comma(p) {
            break;
        }
    }
    p.finish_node();
}

fn parse_update_stmt(p: &mut Parser) {
    p.start_node(SyntaxKind::UpdateStmt);
    p.expect_keyword("UPDATE");
    p.expect(SyntaxKind::Identifier, "table name");
    if p.expect_keyword("SET") {
        parse_assign_list(p);
    }
    if p.at_keyword("WHERE") {
        parse_where_clause(p);
    }
    p.finish_node();
}

fn parse_assign_list(p: &mut Parser) {
    p.start_node(SyntaxKind::AssignList);
    loop {
        p.start_node(SyntaxKind::Assign);
        p.expect(SyntaxKind::Identifier, "column name");
        p.expect(SyntaxKind::Comparison, "'='");
        parse_expression(p);
        p.finish_node();
        if !eat_comma(p) {
            break;
        }
    }
    p.finish_node();
}

fn parse_delete_stmt(p: &mut Parser) {
    p.start_node(SyntaxKind::DeleteStmt);
    p.expect_keyword("DELETE");
    p.expect_keyword("FROM");
    p.expect(SyntaxKind::Identifier, "table name");
    if p.at_keyword("WHERE") {
        parse_where_clause(p);
    }
    p.finish_node();
}

// ---------------------------------------------------------------------
// DDL: CREATE / ALTER / DROP
// ---------------------------------------------------------------------

fn parse_create_stmt(p: &mut Parser) {
    if p.nth_keyword(1, "TABLE") {
        parse_create_table_stmt(p);
    } else if p.nth_keyword(1, "VIEW") {
        parse_create_view_stmt(p);
    } else if p.nth_keyword(1, "INDEX") {
        parse_create_index_stmt(p);
    } else {
        p.error("expected TABLE, VIEW or INDEX after CREATE");
        p.synchronize();
    }
}

fn parse_create_table_stmt(p: &mut Parser) {
    p.start_node(SyntaxKind::CreateTableStmt);
    p.expect_keyword("CREATE");
    p.expect_keyword("TABLE");
    p.expect(SyntaxKind::Identifier, "table name");
    p.expect_delimiter("(");
    parse_column_def_list(p);
    p.expect_delimiter(")");
    p.finish_node();
}

fn parse_column_def_list(p: &mut Parser) {
    p.start_node(SyntaxKind::ColumnDefList);
    loop {
        parse_column_def(p);
        if !eat_comma(p) {
            break;
        }
    }
    p.finish_node();
}

fn parse_column_def(p: &mut Parser) {
    p.start_node(SyntaxKind::ColumnDef);
    p.expect(SyntaxKind::Identifier, "column name");
    expect_type_keyword(p);
    if has_constraint_start(p) {
        parse_constraint_list(p);
    }
    p.finish_node();
}

const TYPE_KEYWORDS: &[&str] = &[
    "INTEGER", "INT", "FLOAT", "DOUBLE", "REAL", "TEXT", "VARCHAR", "CHAR", "BOOLEAN", "DATE",
];

fn expect_type_keyword(p: &mut Parser) {
    if p.at_any_keyword(TYPE_KEYWORDS) {
        p.bump();
        // VARCHAR(n) / CHAR(n) precision.
        if p.at(SyntaxKind::Delimiter) && p.current_lexeme() == "(" {
            p.bump();
            p.expect(SyntaxKind::IntegerLit, "length");
            p.expect_delimiter(")");
        }
    } else {
        p.error_expected_found("a data type", p.current_lexeme().to_string());
    }
}

fn has_constraint_start(p: &mut Parser) -> bool {
    p.at_any_keyword(&["PRIMARY", "NOT", "UNIQUE", "DEFAULT", "CHECK", "FOREIGN"])
}

fn parse_constraint_list(p: &mut Parser) {
    p.start_node(SyntaxKind::ConstraintList);
    while has_constraint_start(p) {
        parse_constraint(p);
    }
    p.finish_node();
}

fn parse_constraint(p: &mut Parser) {
    p.start_node(SyntaxKind::Constraint);
    if p.eat_keyword("PRIMARY") {
        p.expect_keyword("KEY");
    } else if p.eat_keyword("NOT") {
        p.expect_keyword("NULL");
    } else if p.eat_keyword("UNIQUE") {
        // nothing further
    } else if p.eat_keyword("DEFAULT") {
        parse_expression(p);
    } else if p.eat_keyword("CHECK") {
        p.expect_delimiter("(");
        parse_or_condition(p);
        p.expect_delimiter(")");
    } else if p.eat_keyword("FOREIGN") {
        p.expect_keyword("KEY");
        if p.expect_keyword("REFERENCES") {
            p.expect(SyntaxKind::Identifier, "referenced table");
            if p.at(SyntaxKind::Delimiter) && p.current_lexeme() == "(" {
                p.bump();
                p.expect(SyntaxKind::Identifier, "referenced column");
                p.expect_delimiter(")");
            }
        }
    } else {
        p.error("expected a constraint");
    }
    p.finish_node();
}

fn parse_create_view_stmt(p: &mut Parser) {
    p.start_node(SyntaxKind::CreateViewStmt);
    p.expect_keyword("CREATE");
    p.expect_keyword("VIEW");
    p.expect(SyntaxKind::Identifier, "view name");
    if p.expect_keyword("AS") && p.at_keyword("SELECT") {
        parse_select_stmt(p);
    }
    p.finish_node();
}

fn parse_create_index_stmt(p: &mut Parser) {
    p.start_node(SyntaxKind::CreateIndexStmt);
    p.expect_keyword("CREATE");
    p.expect_keyword("INDEX");
    p.expect(SyntaxKind::Identifier, "index name");
    p.expect_keyword("ON");
    p.expect(SyntaxKind::Identifier, "table name");
    p.expect_delimiter("(");
    parse_column_list(p);
    p.expect_delimiter(")");
    p.finish_node();
}

fn parse_alter_table_stmt(p: &mut Parser) {
    p.start_node(SyntaxKind::AlterTableStmt);
    p.expect_keyword("ALTER");
    p.expect_keyword("TABLE");
    p.expect(SyntaxKind::Identifier, "table name");
    if p.eat_keyword("ADD") {
        p.eat_keyword("COLUMN");
        parse_column_def(p);
    } else if p.eat_keyword("DROP") {
        p.expect_keyword("COLUMN");
        p.expect(SyntaxKind::Identifier, "column name");
    } else {
        p.error("expected ADD or DROP after ALTER TABLE <name>");
    }
    p.finish_node();
}

fn parse_drop_stmt(p: &mut Parser) {
    p.start_node(SyntaxKind::DropStmt);
    p.expect_keyword("DROP");
    if !p.eat_keyword("TABLE") && !p.eat_keyword("VIEW") && !p.eat_keyword("INDEX") {
        p.error("expected TABLE, VIEW or INDEX after DROP");
    }
    p.expect(SyntaxKind::Identifier, "object name");
    p.finish_node();
}

// ---------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------

fn parse_or_condition(p: &mut Parser) {
    if !p.enter() {
        return;
    }
    let checkpoint = p.checkpoint();
    parse_and_condition(p);
    let mut count = 0;
    while p.eat_keyword("OR") {
        parse_and_condition(p);
        count += 1;
    }
    if count > 0 {
        p.start_node_at(checkpoint, SyntaxKind::OrCondition);
        p.finish_node();
    }
    p.exit();
}

fn parse_and_condition(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    parse_not_condition(p);
    let mut count = 0;
    while p.eat_keyword("AND") {
        parse_not_condition(p);
        count += 1;
    }
    if count > 0 {
        p.start_node_at(checkpoint, SyntaxKind::AndCondition);
        p.finish_node();
    }
}

fn parse_not_condition(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    let negated = p.eat_keyword("NOT");
    parse_primary_condition(p);
    if negated {
        p.start_node_at(checkpoint, SyntaxKind::NotCondition);
        p.finish_node();
    }
}

fn parse_primary_condition(p: &mut Parser) {
    if p.at(SyntaxKind::Delimiter) && p.current_lexeme() == "(" {
        p.start_node(SyntaxKind::ParenCondition);
        p.bump();
        parse_or_condition(p);
        p.expect_delimiter(")");
        p.finish_node();
        return;
    }

    let checkpoint = p.checkpoint();
    let diagnostics_before = p.diagnostics.len();
    parse_expression(p);
    let expr_parsed_cleanly = p.diagnostics.len() == diagnostics_before;

    if p.at(SyntaxKind::Comparison) && COMPARISON_OPS.contains(&p.current_lexeme()) {
        p.bump();
        parse_expression(p);
        p.start_node_at(checkpoint, SyntaxKind::Comparison_);
        p.finish_node();
    } else if p.at_keyword("BETWEEN") {
        p.bump();
        parse_expression(p);
        p.expect_keyword("AND");
        parse_expression(p);
        p.start_node_at(checkpoint, SyntaxKind::Between);
        p.finish_node();
    } else if p.at_keyword("NOT") && (p.nth_keyword(1, "IN") || p.nth_keyword(1, "LIKE") || p.nth_keyword(1, "BETWEEN")) {
        p.bump(); // NOT
        if p.eat_keyword("IN") {
            p.expect_delimiter("(");
            parse_value_list(p);
            p.expect_delimiter(")");
            p.start_node_at(checkpoint, SyntaxKind::In);
        } else if p.eat_keyword("LIKE") {
            p.expect(SyntaxKind::StringLit, "string pattern");
            p.start_node_at(checkpoint, SyntaxKind::Like);
        } else if p.eat_keyword("BETWEEN") {
            parse_expression(p);
            p.expect_keyword("AND");
            parse_expression(p);
            p.start_node_at(checkpoint, SyntaxKind::Between);
        }
        p.finish_node();
    } else if p.at_keyword("IN") {
        p.bump();
        p.expect_delimiter("(");
        parse_value_list(p);
        p.expect_delimiter(")");
        p.start_node_at(checkpoint, SyntaxKind::In);
        p.finish_node();
    } else if p.at_keyword("LIKE") {
        p.bump();
        p.expect(SyntaxKind::StringLit, "string pattern");
        p.start_node_at(checkpoint, SyntaxKind::Like);
        p.finish_node();
    } else if p.at_keyword("IS") {
        p.bump();
        p.eat_keyword("NOT");
        p.expect_keyword("NULL");
        p.start_node_at(checkpoint, SyntaxKind::IsNull);
        p.finish_node();
    } else if !expr_parsed_cleanly {
        p.error_expected_found("a comparison, BETWEEN, IN, LIKE or IS NULL", p.current_lexeme().to_string());
    }
    // Else: no comparison/BETWEEN/IN/LIKE/IS NULL follows a cleanly-parsed
    // expression — §4.2's bare-expression demotion. The un-wrapped node
    // from `checkpoint` stands as-is and `Condition::cast` falls back to
    // `Condition::Bare` for it.
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

pub(super) fn parse_expression(p: &mut Parser) {
    parse_add_expr(p);
}

fn parse_add_expr(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    parse_mul_expr(p);
    let mut count = 0;
    while p.at(SyntaxKind::Operator) && matches!(p.current_lexeme(), "+" | "-" | "||") {
        p.bump();
        parse_mul_expr(p);
        count += 1;
    }
    if count > 0 {
        p.start_node_at(checkpoint, SyntaxKind::AddExpr);
        p.finish_node();
    }
}

fn parse_mul_expr(p: &mut Parser) {
    let checkpoint = p.checkpoint();
    parse_unary_expr(p);
    let mut count = 0;
    while p.at(SyntaxKind::Operator) && matches!(p.current_lexeme(), "*" | "/" | "%") {
        p.bump();
        parse_unary_expr(p);
        count += 1;
    }
    if count > 0 {
        p.start_node_at(checkpoint, SyntaxKind::MulExpr);
        p.finish_node();
    }
}

fn parse_unary_expr(p: &mut Parser) {
    if p.at(SyntaxKind::Operator) && p.current_lexeme() == "-" {
        let checkpoint = p.checkpoint();
        p.bump();
        parse_unary_expr(p);
        p.start_node_at(checkpoint, SyntaxKind::UnaryExpr);
        p.finish_node();
    } else {
        parse_primary(p);
    }
}

fn parse_primary(p: &mut Parser) {
    if !p.enter() {
        return;
    }
    if p.at(SyntaxKind::Delimiter) && p.current_lexeme() == "(" {
        p.start_node(SyntaxKind::ParenExpr);
        p.bump();
        parse_expression(p);
        p.expect_delimiter(")");
        p.finish_node();
    } else if p.at(SyntaxKind::Identifier) {
        let checkpoint = p.checkpoint();
        p.bump();
        if p.at(SyntaxKind::Dot) {
            p.bump();
            p.expect(SyntaxKind::Identifier, "column name");
        }
        if p.at(SyntaxKind::Delimiter) && p.current_lexeme() == "(" {
            p.bump();
            p.eat_keyword("DISTINCT");
            p.start_node(SyntaxKind::ArgList);
            if !(p.at(SyntaxKind::Delimiter) && p.current_lexeme() == ")") {
                loop {
                    if p.at(SyntaxKind::Operator) && p.current_lexeme() == "*" {
                        p.bump();
                    } else {
                        parse_expression(p);
                    }
                    if !eat_comma(p) {
                        break;
                    }
                }
            }
            p.finish_node();
            p.expect_delimiter(")");
            p.start_node_at(checkpoint, SyntaxKind::FunctionCall);
            p.finish_node();
        } else {
            p.start_node_at(checkpoint, SyntaxKind::ColumnRef);
            p.finish_node();
        }
    } else if p.at_any_keyword(&["COUNT", "SUM", "AVG", "MIN", "MAX"]) {
        let checkpoint = p.checkpoint();
        p.bump();
        p.expect_delimiter("(");
        p.eat_keyword("DISTINCT");
        p.start_node(SyntaxKind::ArgList);
        if p.at(SyntaxKind::Operator) && p.current_lexeme() == "*" {
            p.bump();
        } else if !(p.at(SyntaxKind::Delimiter) && p.current_lexeme() == ")") {
            parse_expression(p);
        }
        p.finish_node();
        p.expect_delimiter(")");
        p.start_node_at(checkpoint, SyntaxKind::FunctionCall);
        p.finish_node();
    } else if p.at(SyntaxKind::StringLit) || p.at(SyntaxKind::IntegerLit) || p.at(SyntaxKind::FloatLit) {
        p.start_node(SyntaxKind::Literal);
        p.bump();
        p.finish_node();
    } else if p.at_any_keyword(&["TRUE", "FALSE", "NULL"]) {
        p.start_node(SyntaxKind::Literal);
        p.bump();
        p.finish_node();
    } else {
        p.error_expected_found("an expression", p.current_lexeme().to_string());
    }
    p.exit();
}
