use indoc::indoc;

use super::ast::{self, Condition, Expr, SelectItem, Stmt};
use super::parse;
use crate::lexer::scan;
use crate::syntax::SyntaxKind;

fn parse_one(src: &str) -> (ast::Program, crate::diagnostics::Diagnostics) {
    let (tokens, lex_diags) = scan(src);
    assert!(lex_diags.is_empty(), "{lex_diags:?}");
    let (tree, diags) = parse(&tokens);
    (ast::Program::cast(tree).expect("root is always Program"), diags)
}

#[test]
fn select_star_from_table() {
    let (program, diags) = parse_one("SELECT * FROM users;");
    assert!(diags.is_empty(), "{diags:?}");
    let stmts: Vec<_> = program.statements().collect();
    assert_eq!(stmts.len(), 1);
    let Stmt::Select(select) = &stmts[0] else { panic!("expected SelectStmt") };
    let items = select.select_list().unwrap().items();
    assert_eq!(items.len(), 1);
    assert!(matches!(items[0], SelectItem::Star));
    let from = select.from_clause().unwrap();
    assert_eq!(from.primary_table().unwrap().table_name().unwrap().text(), "users");
}

#[test]
fn select_with_alias_and_where() {
    let (program, diags) = parse_one("SELECT id, name AS n FROM users u WHERE u.id = 1;");
    assert!(diags.is_empty(), "{diags:?}");
    let Stmt::Select(select) = program.statements().next().unwrap() else { panic!() };
    let items = select.select_list().unwrap().items();
    assert_eq!(items.len(), 2);
    let SelectItem::Expr { alias, .. } = &items[1] else { panic!() };
    assert_eq!(alias.as_ref().unwrap().text(), "n");

    let table = select.from_clause().unwrap().primary_table().unwrap();
    assert_eq!(table.table_name().unwrap().text(), "users");
    assert_eq!(table.alias().unwrap().text(), "u");

    let cond = select.where_clause().unwrap().condition().unwrap();
    let Condition::Comparison(cmp) = cond else { panic!("expected Comparison") };
    assert_eq!(cmp.operator().unwrap().text(), "=");
}

#[test]
fn join_on_condition() {
    let (program, diags) =
        parse_one("SELECT * FROM orders o INNER JOIN users u ON o.user_id = u.id;");
    assert!(diags.is_empty(), "{diags:?}");
    let Stmt::Select(select) = program.statements().next().unwrap() else { panic!() };
    let from = select.from_clause().unwrap();
    let joins: Vec<_> = from.joins().collect();
    assert_eq!(joins.len(), 1);
    assert!(joins[0].condition().is_some());
    assert_eq!(from.all_table_refs().len(), 2);
}

#[test]
fn arithmetic_precedence_shapes_the_tree() {
    let (program, diags) = parse_one("SELECT price * 1 + tax FROM items;");
    assert!(diags.is_empty(), "{diags:?}");
    let Stmt::Select(select) = program.statements().next().unwrap() else { panic!() };
    let items = select.select_list().unwrap().items();
    let SelectItem::Expr { expr, .. } = &items[0] else { panic!() };
    let Expr::Add(add) = expr else { panic!("expected AddExpr at the top") };
    let operands: Vec<_> = add.operands().collect();
    assert_eq!(operands.len(), 2);
    assert!(matches!(operands[0], Expr::Mul(_)));
    assert!(matches!(operands[1], Expr::ColumnRef(_)));
}

#[test]
fn between_and_is_a_delimiter_not_a_boolean_and() {
    let (program, diags) = parse_one("SELECT * FROM t WHERE a BETWEEN 1 AND 10;");
    assert!(diags.is_empty(), "{diags:?}");
    let Stmt::Select(select) = program.statements().next().unwrap() else { panic!() };
    let cond = select.where_clause().unwrap().condition().unwrap();
    assert!(matches!(cond, Condition::Between(_)));
}

#[test]
fn not_null_check_is_fused() {
    let (program, diags) = parse_one("SELECT * FROM t WHERE a IS NOT NULL;");
    assert!(diags.is_empty(), "{diags:?}");
    let Stmt::Select(select) = program.statements().next().unwrap() else { panic!() };
    let cond = select.where_clause().unwrap().condition().unwrap();
    let Condition::IsNull(isnull) = cond else { panic!() };
    assert!(isnull.negated());
}

#[test]
fn missing_from_clause_recovers_and_keeps_parsing_later_clauses() {
    let (program, diags) = parse_one("SELECT * WHERE id = 10; DROP TABLE Users;");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.iter().next().unwrap().message, "Missing FROM clause before WHERE");
    let stmts: Vec<_> = program.statements().collect();
    assert_eq!(stmts.len(), 2);
    assert!(matches!(stmts[0], Stmt::Select(_)));
    assert!(matches!(stmts[1], Stmt::Drop(_)));
}

#[test]
fn unknown_statement_start_recovers_at_next_statement() {
    let (tokens, _) = scan("SLECT id FROM users; DROP TABLE t;");
    let (tree, diags) = parse(&tokens);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.iter().next().unwrap().message, "unknown statement 'SLECT'");
    let program = ast::Program::cast(tree).unwrap();
    let stmts: Vec<_> = program.statements().collect();
    assert_eq!(stmts.len(), 2);
    assert!(matches!(stmts[0], Stmt::Error(_)));
    assert!(matches!(stmts[1], Stmt::Drop(_)));
}

#[test]
fn create_table_with_constraints() {
    let (program, diags) = parse_one(
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name VARCHAR(50) NOT NULL, age INTEGER);",
    );
    assert!(diags.is_empty(), "{diags:?}");
    let Stmt::CreateTable(create) = program.statements().next().unwrap() else { panic!() };
    assert_eq!(create.table_name().unwrap().text(), "users");
    let columns = create.columns();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].name().unwrap().text(), "id");
    assert_eq!(columns[0].type_keyword().unwrap().text(), "INTEGER");
    assert_eq!(columns[1].length(), Some(50));
}

#[test]
fn insert_with_explicit_columns_and_multiple_rows() {
    let (program, diags) =
        parse_one("INSERT INTO t (a, b) VALUES (1, 'x'), (2, 'y');");
    assert!(diags.is_empty(), "{diags:?}");
    let Stmt::Insert(insert) = program.statements().next().unwrap() else { panic!() };
    assert_eq!(insert.table_name().unwrap().text(), "t");
    assert_eq!(insert.columns().unwrap().len(), 2);
    assert_eq!(insert.rows().count(), 2);
}

#[test]
fn trailing_statement_without_semicolon_is_accepted() {
    let (tokens, _) = scan("SELECT 1 FROM t");
    let (tree, diags) = parse(&tokens);
    assert!(diags.is_empty(), "{diags:?}");
    let program = ast::Program::cast(tree).unwrap();
    assert_eq!(program.statements().count(), 1);
}

#[test]
fn bare_column_is_accepted_as_a_condition_without_diagnostics() {
    let (program, diags) = parse_one("SELECT * FROM t WHERE is_active;");
    assert!(diags.is_empty(), "{diags:?}");
    let Stmt::Select(select) = program.statements().next().unwrap() else { panic!() };
    let cond = select.where_clause().unwrap().condition().unwrap();
    assert!(matches!(cond, Condition::Bare(_)));
}

#[test]
fn negated_bare_column_is_a_not_condition_wrapping_a_bare_expression() {
    let (program, diags) = parse_one("SELECT * FROM t WHERE NOT active;");
    assert!(diags.is_empty(), "{diags:?}");
    let Stmt::Select(select) = program.statements().next().unwrap() else { panic!() };
    let cond = select.where_clause().unwrap().condition().unwrap();
    let Condition::Not(not_cond) = cond else { panic!("expected NotCondition") };
    assert!(matches!(not_cond.operand(), Some(Condition::Bare(_))));
}

#[test]
fn join_on_a_bare_boolean_column_needs_no_comparison() {
    let (program, diags) = parse_one(indoc! {"
        SELECT *
        FROM orders o
        INNER JOIN users u ON active;
    "});
    assert!(diags.is_empty(), "{diags:?}");
    let Stmt::Select(select) = program.statements().next().unwrap() else { panic!() };
    let joins: Vec<_> = select.from_clause().unwrap().joins().collect();
    assert_eq!(joins.len(), 1);
    assert!(matches!(joins[0].condition(), Some(Condition::Bare(_))));
}

#[test]
fn check_constraint_on_a_bare_boolean_column_needs_no_comparison() {
    let (program, diags) = parse_one("CREATE TABLE t (active BOOLEAN CHECK (active));");
    assert!(diags.is_empty(), "{diags:?}");
    assert!(matches!(program.statements().next().unwrap(), Stmt::CreateTable(_)));
}

#[test]
fn in_order_terminal_leaves_match_token_stream_on_clean_input() {
    let src = "SELECT a, b FROM t WHERE a = 1;";
    let (tokens, _) = scan(src);
    let (tree, diags) = parse(&tokens);
    assert!(diags.is_empty());
    let leaves: Vec<String> = tree
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() != SyntaxKind::Eof)
        .map(|t| t.text().to_string())
        .collect();
    let expected: Vec<String> = tokens
        .iter()
        .filter(|t| t.kind != crate::lexer::TokenKind::Eof)
        .map(|t| t.lexeme.clone())
        .collect();
    assert_eq!(leaves, expected);
}
