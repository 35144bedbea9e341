//! Typed AST wrappers over the Rowan concrete syntax tree.
//!
//! Each struct wraps a `SyntaxNode`; `cast` is infallible for a matching
//! `SyntaxKind`, validation of *content* (arity, required children) happens
//! in the semantic analyzer, not here. Productions that flatten when they
//! have a single operand (see `parser::grammar`'s precedence-climbing
//! comment) surface as an `Expr`/`Condition` enum so callers don't need to
//! know whether e.g. `a + b` produced an `AddExpr` node or collapsed
//! straight to its one operand.

use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Program, Program);
ast_node!(SelectStmt, SelectStmt);
ast_node!(InsertStmt, InsertStmt);
ast_node!(UpdateStmt, UpdateStmt);
ast_node!(DeleteStmt, DeleteStmt);
ast_node!(CreateTableStmt, CreateTableStmt);
ast_node!(CreateViewStmt, CreateViewStmt);
ast_node!(CreateIndexStmt, CreateIndexStmt);
ast_node!(AlterTableStmt, AlterTableStmt);
ast_node!(DropStmt, DropStmt);

ast_node!(SelectList, SelectList);
ast_node!(FromClause, FromClause);
ast_node!(TableRef, TableRef);
ast_node!(Join, Join);
ast_node!(WhereClause, WhereClause);
ast_node!(GroupByClause, GroupByClause);
ast_node!(HavingClause, HavingClause);
ast_node!(OrderByClause, OrderByClause);
ast_node!(SortItem, SortItem);
ast_node!(LimitClause, LimitClause);

ast_node!(ColumnDefList, ColumnDefList);
ast_node!(ColumnDef, ColumnDef);
ast_node!(ConstraintList, ConstraintList);
ast_node!(Constraint, Constraint);
ast_node!(ColumnList, ColumnList);
ast_node!(ValueList, ValueList);
ast_node!(AssignList, AssignList);
ast_node!(Assign, Assign);

ast_node!(OrCondition, OrCondition);
ast_node!(AndCondition, AndCondition);
ast_node!(NotCondition, NotCondition);
ast_node!(ComparisonCond, Comparison_);
ast_node!(Between, Between);
ast_node!(InCond, In);
ast_node!(Like, Like);
ast_node!(IsNull, IsNull);
ast_node!(ParenCondition, ParenCondition);

ast_node!(AddExpr, AddExpr);
ast_node!(MulExpr, MulExpr);
ast_node!(UnaryExpr, UnaryExpr);
ast_node!(ParenExpr, ParenExpr);
ast_node!(ColumnRef, ColumnRef);
ast_node!(FunctionCall, FunctionCall);
ast_node!(ArgList, ArgList);
ast_node!(Literal, Literal);
ast_node!(ErrorNode, ErrorNode);

// ---------------------------------------------------------------------
// Small token-scanning helpers shared by the accessors below.
// ---------------------------------------------------------------------

fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens().filter_map(|it| it.into_token())
}

fn tokens_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = SyntaxToken> + '_ {
    tokens(node).filter(move |t| t.kind() == kind)
}

fn first_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    tokens_of_kind(node, kind).next()
}

fn keyword(node: &SyntaxNode, kw: &str) -> Option<SyntaxToken> {
    tokens_of_kind(node, SyntaxKind::Keyword).find(|t| t.text().eq_ignore_ascii_case(kw))
}

fn has_keyword(node: &SyntaxNode, kw: &str) -> bool {
    keyword(node, kw).is_some()
}

fn identifiers(node: &SyntaxNode) -> Vec<SyntaxToken> {
    tokens_of_kind(node, SyntaxKind::Identifier).collect()
}

// ---------------------------------------------------------------------
// Statement dispatch
// ---------------------------------------------------------------------

/// Any accepted statement, or an `ErrorNode` left over from panic-mode
/// recovery.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    Select(SelectStmt),
    Insert(InsertStmt),
    Update(UpdateStmt),
    Delete(DeleteStmt),
    CreateTable(CreateTableStmt),
    CreateView(CreateViewStmt),
    CreateIndex(CreateIndexStmt),
    AlterTable(AlterTableStmt),
    Drop(DropStmt),
    Error(ErrorNode),
}

impl Stmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::SelectStmt => SelectStmt::cast(node).map(Stmt::Select),
            SyntaxKind::InsertStmt => InsertStmt::cast(node).map(Stmt::Insert),
            SyntaxKind::UpdateStmt => UpdateStmt::cast(node).map(Stmt::Update),
            SyntaxKind::DeleteStmt => DeleteStmt::cast(node).map(Stmt::Delete),
            SyntaxKind::CreateTableStmt => CreateTableStmt::cast(node).map(Stmt::CreateTable),
            SyntaxKind::CreateViewStmt => CreateViewStmt::cast(node).map(Stmt::CreateView),
            SyntaxKind::CreateIndexStmt => CreateIndexStmt::cast(node).map(Stmt::CreateIndex),
            SyntaxKind::AlterTableStmt => AlterTableStmt::cast(node).map(Stmt::AlterTable),
            SyntaxKind::DropStmt => DropStmt::cast(node).map(Stmt::Drop),
            SyntaxKind::ErrorNode => ErrorNode::cast(node).map(Stmt::Error),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Stmt::Select(n) => n.as_cst(),
            Stmt::Insert(n) => n.as_cst(),
            Stmt::Update(n) => n.as_cst(),
            Stmt::Delete(n) => n.as_cst(),
            Stmt::CreateTable(n) => n.as_cst(),
            Stmt::CreateView(n) => n.as_cst(),
            Stmt::CreateIndex(n) => n.as_cst(),
            Stmt::AlterTable(n) => n.as_cst(),
            Stmt::Drop(n) => n.as_cst(),
            Stmt::Error(n) => n.as_cst(),
        }
    }
}

impl Program {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.0.children().filter_map(Stmt::cast)
    }
}

// ---------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------

/// Any expression production. Flattens the same way the grammar's
/// precedence-climbing loops do: `a + 1` is an `AddExpr`, but a bare `a`
/// collapses straight to `ColumnRef`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Add(AddExpr),
    Mul(MulExpr),
    Unary(UnaryExpr),
    Paren(ParenExpr),
    ColumnRef(ColumnRef),
    FunctionCall(FunctionCall),
    Literal(Literal),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::AddExpr => AddExpr::cast(node).map(Expr::Add),
            SyntaxKind::MulExpr => MulExpr::cast(node).map(Expr::Mul),
            SyntaxKind::UnaryExpr => UnaryExpr::cast(node).map(Expr::Unary),
            SyntaxKind::ParenExpr => ParenExpr::cast(node).map(Expr::Paren),
            SyntaxKind::ColumnRef => ColumnRef::cast(node).map(Expr::ColumnRef),
            SyntaxKind::FunctionCall => FunctionCall::cast(node).map(Expr::FunctionCall),
            SyntaxKind::Literal => Literal::cast(node).map(Expr::Literal),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Expr::Add(n) => n.as_cst(),
            Expr::Mul(n) => n.as_cst(),
            Expr::Unary(n) => n.as_cst(),
            Expr::Paren(n) => n.as_cst(),
            Expr::ColumnRef(n) => n.as_cst(),
            Expr::FunctionCall(n) => n.as_cst(),
            Expr::Literal(n) => n.as_cst(),
        }
    }
}

impl AddExpr {
    /// Operands in left-to-right order; `a + b - c` yields three.
    pub fn operands(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }

    /// `+`/`-`/`||` operator lexemes, one fewer than `operands()`.
    pub fn operators(&self) -> Vec<String> {
        tokens_of_kind(&self.0, SyntaxKind::Operator).map(|t| t.text().to_string()).collect()
    }
}

impl MulExpr {
    pub fn operands(&self) -> impl Iterator<Item = Expr> + '_ {
        self.0.children().filter_map(Expr::cast)
    }

    pub fn operators(&self) -> Vec<String> {
        tokens_of_kind(&self.0, SyntaxKind::Operator).map(|t| t.text().to_string()).collect()
    }
}

impl UnaryExpr {
    /// Always `-`; the grammar only builds `UnaryExpr` for unary minus.
    pub fn operand(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl ColumnRef {
    /// `Some(table)` only for a qualified reference (`a.c`).
    pub fn qualifier(&self) -> Option<SyntaxToken> {
        has_dot(&self.0).then(|| identifiers(&self.0).first().cloned()).flatten()
    }

    pub fn column(&self) -> Option<SyntaxToken> {
        let idents = identifiers(&self.0);
        if has_dot(&self.0) {
            idents.into_iter().nth(1)
        } else {
            idents.into_iter().next()
        }
    }
}

fn has_dot(node: &SyntaxNode) -> bool {
    node.children_with_tokens().any(|it| it.kind() == SyntaxKind::Dot)
}

/// What a function call's argument list actually holds.
pub enum Args {
    /// `COUNT(*)`.
    Star,
    List(Vec<Expr>),
}

impl FunctionCall {
    /// The function name: either a plain identifier or an aggregate
    /// keyword (`COUNT`, `SUM`, ...).
    pub fn name(&self) -> Option<SyntaxToken> {
        tokens(&self.0)
            .find(|t| matches!(t.kind(), SyntaxKind::Identifier | SyntaxKind::Keyword))
    }

    pub fn distinct(&self) -> bool {
        has_keyword(&self.0, "DISTINCT")
    }

    pub fn args(&self) -> Args {
        let Some(list) = self.0.children().find_map(ArgList::cast) else {
            return Args::List(Vec::new());
        };
        if list.0.children_with_tokens().any(|it| {
            it.as_token().is_some_and(|t| t.kind() == SyntaxKind::Operator && t.text() == "*")
        }) {
            Args::Star
        } else {
            Args::List(list.0.children().filter_map(Expr::cast).collect())
        }
    }
}

impl Literal {
    pub fn token(&self) -> Option<SyntaxToken> {
        tokens(&self.0).next()
    }
}

// ---------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------

/// Any condition production, including the "bare expression as condition"
/// fallback (e.g. `NOT active`, a boolean column by itself).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    Or(OrCondition),
    And(AndCondition),
    Not(NotCondition),
    Comparison(ComparisonCond),
    Between(Between),
    In(InCond),
    Like(Like),
    IsNull(IsNull),
    Paren(ParenCondition),
    Bare(Expr),
}

impl Condition {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::OrCondition => OrCondition::cast(node).map(Condition::Or),
            SyntaxKind::AndCondition => AndCondition::cast(node).map(Condition::And),
            SyntaxKind::NotCondition => NotCondition::cast(node).map(Condition::Not),
            SyntaxKind::Comparison_ => ComparisonCond::cast(node).map(Condition::Comparison),
            SyntaxKind::Between => Between::cast(node).map(Condition::Between),
            SyntaxKind::In => InCond::cast(node).map(Condition::In),
            SyntaxKind::Like => Like::cast(node).map(Condition::Like),
            SyntaxKind::IsNull => IsNull::cast(node).map(Condition::IsNull),
            SyntaxKind::ParenCondition => ParenCondition::cast(node).map(Condition::Paren),
            _ => Expr::cast(node).map(Condition::Bare),
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Condition::Or(n) => n.as_cst(),
            Condition::And(n) => n.as_cst(),
            Condition::Not(n) => n.as_cst(),
            Condition::Comparison(n) => n.as_cst(),
            Condition::Between(n) => n.as_cst(),
            Condition::In(n) => n.as_cst(),
            Condition::Like(n) => n.as_cst(),
            Condition::IsNull(n) => n.as_cst(),
            Condition::Paren(n) => n.as_cst(),
            Condition::Bare(e) => e.as_cst(),
        }
    }
}

impl OrCondition {
    pub fn operands(&self) -> impl Iterator<Item = Condition> + '_ {
        self.0.children().filter_map(Condition::cast)
    }
}

impl AndCondition {
    pub fn operands(&self) -> impl Iterator<Item = Condition> + '_ {
        self.0.children().filter_map(Condition::cast)
    }
}

impl NotCondition {
    pub fn operand(&self) -> Option<Condition> {
        self.0.children().find_map(Condition::cast)
    }
}

impl ComparisonCond {
    pub fn left(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).next()
    }

    pub fn right(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::Comparison)
    }
}

impl Between {
    pub fn negated(&self) -> bool {
        has_keyword(&self.0, "NOT")
    }

    pub fn target(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).next()
    }

    pub fn low(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn high(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(2)
    }
}

impl InCond {
    pub fn negated(&self) -> bool {
        has_keyword(&self.0, "NOT")
    }

    pub fn target(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn values(&self) -> Vec<Expr> {
        self.0
            .children()
            .find_map(ValueList::cast)
            .map(|l| l.0.children().filter_map(Expr::cast).collect())
            .unwrap_or_default()
    }
}

impl Like {
    pub fn negated(&self) -> bool {
        has_keyword(&self.0, "NOT")
    }

    pub fn target(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn pattern(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::StringLit)
    }
}

impl IsNull {
    pub fn negated(&self) -> bool {
        has_keyword(&self.0, "NOT")
    }

    pub fn target(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl ParenCondition {
    pub fn inner(&self) -> Option<Condition> {
        self.0.children().find_map(Condition::cast)
    }
}

// ---------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------

/// One entry in a `SelectList`: `*`, or an expression with an optional
/// (possibly bare, no `AS`) alias. The grammar doesn't wrap each item in
/// its own node, so this is reconstructed by scanning the list's children
/// in source order.
pub enum SelectItem {
    Star,
    Expr { expr: Expr, alias: Option<SyntaxToken> },
}

impl SelectStmt {
    pub fn distinct(&self) -> bool {
        has_keyword(&self.0, "DISTINCT")
    }

    pub fn select_list(&self) -> Option<SelectList> {
        self.0.children().find_map(SelectList::cast)
    }

    pub fn from_clause(&self) -> Option<FromClause> {
        self.0.children().find_map(FromClause::cast)
    }

    pub fn where_clause(&self) -> Option<WhereClause> {
        self.0.children().find_map(WhereClause::cast)
    }

    pub fn group_by_clause(&self) -> Option<GroupByClause> {
        self.0.children().find_map(GroupByClause::cast)
    }

    pub fn having_clause(&self) -> Option<HavingClause> {
        self.0.children().find_map(HavingClause::cast)
    }

    pub fn order_by_clause(&self) -> Option<OrderByClause> {
        self.0.children().find_map(OrderByClause::cast)
    }

    pub fn limit_clause(&self) -> Option<LimitClause> {
        self.0.children().find_map(LimitClause::cast)
    }
}

impl SelectList {
    pub fn items(&self) -> Vec<SelectItem> {
        use rowan::NodeOrToken;

        let mut items = Vec::new();
        let mut pending_alias_for: Option<usize> = None;
        for element in self.0.children_with_tokens() {
            match element {
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::Operator && t.text() == "*" => {
                    items.push(SelectItem::Star);
                    pending_alias_for = None;
                }
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::Identifier => {
                    if let Some(idx) = pending_alias_for {
                        if let SelectItem::Expr { alias, .. } = &mut items[idx] {
                            *alias = Some(t);
                        }
                        pending_alias_for = None;
                    }
                }
                NodeOrToken::Token(t) if t.kind() == SyntaxKind::Keyword && t.text().eq_ignore_ascii_case("AS") => {
                    // alias identifier follows next
                }
                NodeOrToken::Node(n) => {
                    if let Some(expr) = Expr::cast(n) {
                        items.push(SelectItem::Expr { expr, alias: None });
                        pending_alias_for = Some(items.len() - 1);
                    }
                }
                _ => {}
            }
        }
        items
    }
}

impl FromClause {
    /// The first (non-joined, non-comma) table in the clause.
    pub fn primary_table(&self) -> Option<TableRef> {
        self.0.children().find_map(TableRef::cast)
    }

    pub fn joins(&self) -> impl Iterator<Item = Join> + '_ {
        self.0.children().filter_map(Join::cast)
    }

    /// Every table visible in this `FROM` clause: the primary table, any
    /// comma-joined tables, and every `JOIN`'s table — the full set
    /// `Comparison`/`ColumnRef` resolution treats as one scope.
    pub fn all_table_refs(&self) -> Vec<TableRef> {
        let mut refs: Vec<TableRef> = self.0.children().filter_map(TableRef::cast).collect();
        for join in self.joins() {
            refs.extend(join.table_ref());
        }
        refs
    }
}

impl TableRef {
    pub fn table_name(&self) -> Option<SyntaxToken> {
        identifiers(&self.0).into_iter().next()
    }

    pub fn alias(&self) -> Option<SyntaxToken> {
        identifiers(&self.0).into_iter().nth(1)
    }
}

impl Join {
    pub fn table_ref(&self) -> Option<TableRef> {
        self.0.children().find_map(TableRef::cast)
    }

    pub fn condition(&self) -> Option<Condition> {
        self.0.children().find_map(Condition::cast)
    }
}

impl WhereClause {
    pub fn condition(&self) -> Option<Condition> {
        self.0.children().find_map(Condition::cast)
    }
}

impl HavingClause {
    pub fn condition(&self) -> Option<Condition> {
        self.0.children().find_map(Condition::cast)
    }
}

impl GroupByClause {
    pub fn columns(&self) -> Vec<Expr> {
        self.0.children().filter_map(Expr::cast).collect()
    }
}

impl OrderByClause {
    pub fn items(&self) -> impl Iterator<Item = SortItem> + '_ {
        self.0.children().filter_map(SortItem::cast)
    }
}

impl SortItem {
    pub fn expr(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn descending(&self) -> bool {
        has_keyword(&self.0, "DESC")
    }
}

impl LimitClause {
    pub fn limit(&self) -> Option<i64> {
        first_of_kind(&self.0, SyntaxKind::IntegerLit).and_then(|t| t.text().parse().ok())
    }
}

// ---------------------------------------------------------------------
// INSERT / UPDATE / DELETE
// ---------------------------------------------------------------------

impl InsertStmt {
    pub fn table_name(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::Identifier)
    }

    pub fn columns(&self) -> Option<Vec<SyntaxToken>> {
        self.0
            .children()
            .find_map(ColumnList::cast)
            .map(|l| identifiers(&l.0))
    }

    /// One entry per `VALUES (...)` group.
    pub fn rows(&self) -> impl Iterator<Item = ValueList> + '_ {
        self.0.children().filter_map(ValueList::cast)
    }
}

impl ValueList {
    pub fn values(&self) -> Vec<Expr> {
        self.0.children().filter_map(Expr::cast).collect()
    }
}

impl UpdateStmt {
    pub fn table_name(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::Identifier)
    }

    pub fn assigns(&self) -> Vec<Assign> {
        self.0
            .children()
            .find_map(AssignList::cast)
            .map(|l| l.0.children().filter_map(Assign::cast).collect())
            .unwrap_or_default()
    }

    pub fn where_clause(&self) -> Option<WhereClause> {
        self.0.children().find_map(WhereClause::cast)
    }
}

impl Assign {
    pub fn column(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::Identifier)
    }

    pub fn value(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

impl DeleteStmt {
    pub fn table_name(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::Identifier)
    }

    pub fn where_clause(&self) -> Option<WhereClause> {
        self.0.children().find_map(WhereClause::cast)
    }
}

// ---------------------------------------------------------------------
// DDL
// ---------------------------------------------------------------------

impl CreateTableStmt {
    pub fn table_name(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::Identifier)
    }

    pub fn columns(&self) -> Vec<ColumnDef> {
        self.0
            .children()
            .find_map(ColumnDefList::cast)
            .map(|l| l.0.children().filter_map(ColumnDef::cast).collect())
            .unwrap_or_default()
    }
}

impl ColumnDef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::Identifier)
    }

    /// The data-type keyword (`INTEGER`, `VARCHAR`, ...), upper-cased.
    pub fn type_keyword(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::Keyword)
    }

    /// `VARCHAR(n)` / `CHAR(n)` precision, if given.
    pub fn length(&self) -> Option<i64> {
        first_of_kind(&self.0, SyntaxKind::IntegerLit).and_then(|t| t.text().parse().ok())
    }

    pub fn constraints(&self) -> Vec<Constraint> {
        self.0
            .children()
            .find_map(ConstraintList::cast)
            .map(|l| l.0.children().filter_map(Constraint::cast).collect())
            .unwrap_or_default()
    }
}

/// What kind of column constraint a `Constraint` node holds, with its
/// payload already extracted.
pub enum ConstraintKind {
    PrimaryKey,
    NotNull,
    Unique,
    Default(Expr),
    Check(Condition),
    ForeignKey { table: SyntaxToken, column: Option<SyntaxToken> },
}

impl Constraint {
    pub fn kind(&self) -> Option<ConstraintKind> {
        if has_keyword(&self.0, "PRIMARY") {
            Some(ConstraintKind::PrimaryKey)
        } else if has_keyword(&self.0, "UNIQUE") {
            Some(ConstraintKind::Unique)
        } else if has_keyword(&self.0, "DEFAULT") {
            self.0.children().find_map(Expr::cast).map(ConstraintKind::Default)
        } else if has_keyword(&self.0, "CHECK") {
            self.0.children().find_map(Condition::cast).map(ConstraintKind::Check)
        } else if has_keyword(&self.0, "FOREIGN") {
            let idents = identifiers(&self.0);
            idents.first().cloned().map(|table| ConstraintKind::ForeignKey {
                table,
                column: idents.get(1).cloned(),
            })
        } else if has_keyword(&self.0, "NOT") {
            Some(ConstraintKind::NotNull)
        } else {
            None
        }
    }
}

impl CreateViewStmt {
    pub fn view_name(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::Identifier)
    }

    pub fn select(&self) -> Option<SelectStmt> {
        self.0.children().find_map(SelectStmt::cast)
    }
}

impl CreateIndexStmt {
    pub fn index_name(&self) -> Option<SyntaxToken> {
        identifiers(&self.0).into_iter().next()
    }

    pub fn table_name(&self) -> Option<SyntaxToken> {
        identifiers(&self.0).into_iter().nth(1)
    }

    pub fn columns(&self) -> Vec<SyntaxToken> {
        self.0
            .children()
            .find_map(ColumnList::cast)
            .map(|l| identifiers(&l.0))
            .unwrap_or_default()
    }
}

impl AlterTableStmt {
    pub fn table_name(&self) -> Option<SyntaxToken> {
        identifiers(&self.0).into_iter().next()
    }

    pub fn is_add(&self) -> bool {
        has_keyword(&self.0, "ADD")
    }

    pub fn is_drop(&self) -> bool {
        has_keyword(&self.0, "DROP")
    }

    pub fn add_column(&self) -> Option<ColumnDef> {
        self.0.children().find_map(ColumnDef::cast)
    }

    pub fn drop_column_name(&self) -> Option<SyntaxToken> {
        identifiers(&self.0).into_iter().nth(1)
    }
}

impl DropStmt {
    /// `TABLE` / `VIEW` / `INDEX`, whichever followed `DROP`.
    pub fn object_kind(&self) -> Option<SyntaxToken> {
        tokens_of_kind(&self.0, SyntaxKind::Keyword)
            .find(|t| matches!(t.text().to_ascii_uppercase().as_str(), "TABLE" | "VIEW" | "INDEX"))
    }

    pub fn object_name(&self) -> Option<SyntaxToken> {
        first_of_kind(&self.0, SyntaxKind::Identifier)
    }
}
