//! Type inference over expressions and conditions (§4.3 rules 3 and 5).
//!
//! Every expression and condition node gets its inferred type written
//! into the shared [`Annotations`] side table exactly once, even when
//! inference fails — a failed node's slot is [`Type::Unknown`], which is
//! how downstream operators avoid cascading a single root cause into a
//! flood of derivative diagnostics (§7).

use sql_core::Position;

use crate::diagnostics::{Diagnostics, Stage};
use crate::parser::ast::{Condition, Expr};
use crate::syntax::SyntaxKind;

use super::annotate::Annotations;
use super::scope::{Resolution, Scope};
use super::types::Type;

/// Where a bare (unqualified) or qualified `ColumnRef` resolves against.
/// `None` is used for contexts with no `FROM`-clause scope at all (a
/// `CREATE TABLE`'s `DEFAULT`/`CHECK` expression, or a `SELECT` whose
/// `FROM` clause itself failed to parse).
pub enum Resolver<'a> {
    Scope(&'a Scope<'a>),
    None,
}

/// A node-to-location resolver, backed by [`super::positions::PositionMap`]
/// at call sites; threaded through by reference so inference never needs
/// its own copy of the token stream. Yields both the 1-based line/column
/// (for `Diagnostic::Display`) and the byte span (for snippet rendering).
pub type PosOf<'p> = &'p dyn Fn(&crate::syntax::SyntaxNode) -> (Position, std::ops::Range<u32>);

pub struct Cx<'a, 'r> {
    pub resolver: &'r Resolver<'a>,
    pub annotations: &'r mut Annotations,
    pub diagnostics: &'r mut Diagnostics,
}

impl<'a, 'r> Cx<'a, 'r> {
    fn error(&mut self, message: impl Into<String>, loc: (Position, std::ops::Range<u32>)) {
        self.diagnostics.error(Stage::Sem, message, loc.0).span(loc.1).emit();
    }

    /// Division-by-zero is the one rule-3 fault that is non-fatal (§4.3:
    /// "a WARNING (non-fatal)"); everything else this module reports is
    /// an error.
    fn warn(&mut self, message: impl Into<String>, loc: (Position, std::ops::Range<u32>)) {
        self.diagnostics.warning(Stage::Sem, message, loc.0).span(loc.1).emit();
    }
}

/// Infers `expr`'s type, annotating it and every sub-expression along the
/// way. `pos_of` resolves a node to its source position for diagnostics
/// (backed by [`super::positions::PositionMap`] at call sites).
pub fn infer_expr(expr: &Expr, cx: &mut Cx, pos_of: PosOf) -> Type {
    let ty = infer_expr_inner(expr, cx, pos_of);
    cx.annotations.set(expr.as_cst(), ty);
    ty
}

fn infer_expr_inner(expr: &Expr, cx: &mut Cx, pos_of: PosOf) -> Type {
    match expr {
        Expr::Literal(lit) => {
            let Some(token) = lit.token() else { return Type::Unknown };
            match token.kind() {
                SyntaxKind::IntegerLit => Type::Integer,
                SyntaxKind::FloatLit => Type::Float,
                SyntaxKind::StringLit => Type::Text,
                SyntaxKind::Keyword => match token.text().to_ascii_uppercase().as_str() {
                    "TRUE" | "FALSE" => Type::Boolean,
                    "NULL" => Type::Null,
                    _ => Type::Unknown,
                },
                _ => Type::Unknown,
            }
        }
        Expr::ColumnRef(cr) => {
            let Some(column) = cr.column() else { return Type::Unknown };
            let pos = pos_of(expr.as_cst());
            match &cx.resolver {
                Resolver::None => Type::Unknown,
                Resolver::Scope(scope) => {
                    let resolution = match cr.qualifier() {
                        Some(q) => scope.resolve_qualified(q.text(), column.text()),
                        None => scope.resolve_unqualified(column.text()),
                    };
                    match resolution {
                        Resolution::Found { column, .. } => column.declared_type,
                        Resolution::UnknownTable => {
                            let q = cr.qualifier().map(|t| t.text().to_string()).unwrap_or_default();
                            cx.error(format!("unknown table or alias '{q}'"), pos);
                            Type::Unknown
                        }
                        Resolution::UnknownColumn => {
                            cx.error(format!("unknown column '{}'", column.text()), pos);
                            Type::Unknown
                        }
                        Resolution::Ambiguous => {
                            cx.error(format!("ambiguous column reference '{}'", column.text()), pos);
                            Type::Unknown
                        }
                    }
                }
            }
        }
        Expr::FunctionCall(fc) => {
            use crate::parser::ast::Args;
            let args: Vec<Type> = match fc.args() {
                Args::Star => Vec::new(),
                Args::List(exprs) => exprs.iter().map(|e| infer_expr(e, cx, pos_of)).collect(),
            };
            let name = fc.name().map(|t| t.text().to_ascii_uppercase()).unwrap_or_default();
            match name.as_str() {
                "COUNT" => Type::Integer,
                "SUM" => args.first().copied().filter(|t| t.is_numeric() || *t == Type::Unknown).unwrap_or(Type::Unknown),
                "AVG" => {
                    if args.first().is_some_and(|t| t.is_numeric() || *t == Type::Unknown) {
                        Type::Float
                    } else {
                        Type::Unknown
                    }
                }
                "MIN" | "MAX" => args.first().copied().unwrap_or(Type::Unknown),
                _ => Type::Unknown,
            }
        }
        Expr::Unary(u) => {
            let Some(operand) = u.operand() else { return Type::Unknown };
            let ty = infer_expr(&operand, cx, pos_of);
            if ty == Type::Unknown {
                Type::Unknown
            } else if ty.is_numeric() {
                ty
            } else {
                cx.error("unary '-' requires a numeric operand", pos_of(expr.as_cst()));
                Type::Unknown
            }
        }
        Expr::Paren(p) => {
            p.inner().map(|inner| infer_expr(&inner, cx, pos_of)).unwrap_or(Type::Unknown)
        }
        Expr::Add(add) => {
            let operands: Vec<Expr> = add.operands().collect();
            let ops = add.operators();
            fold_add_chain(&operands, &ops, cx, pos_of, expr.as_cst())
        }
        Expr::Mul(mul) => {
            let operands: Vec<Expr> = mul.operands().collect();
            let ops = mul.operators();
            fold_mul_chain(&operands, &ops, cx, pos_of, expr.as_cst())
        }
    }
}

fn fold_add_chain(
    operands: &[Expr],
    ops: &[String],
    cx: &mut Cx,
    pos_of: PosOf,
    whole: &crate::syntax::SyntaxNode,
) -> Type {
    let Some(first) = operands.first() else { return Type::Unknown };
    let mut acc = infer_expr(first, cx, pos_of);
    for (op, rhs) in ops.iter().zip(operands.iter().skip(1)) {
        let rhs_ty = infer_expr(rhs, cx, pos_of);
        acc = if acc == Type::Unknown || rhs_ty == Type::Unknown {
            Type::Unknown
        } else if op == "||" {
            if acc.comparable_with(Type::Text) && rhs_ty.comparable_with(Type::Text) {
                if acc == Type::Null || rhs_ty == Type::Null { Type::Null } else { Type::Text }
            } else {
                cx.error("string concatenation requires TEXT operands", pos_of(whole));
                Type::Unknown
            }
        } else if acc.is_numeric() && rhs_ty.is_numeric() {
            acc.arithmetic_result(rhs_ty)
        } else {
            cx.error(
                format!("arithmetic '{op}' requires numeric operands, found {acc} and {rhs_ty}"),
                pos_of(whole),
            );
            Type::Unknown
        };
    }
    acc
}

fn fold_mul_chain(
    operands: &[Expr],
    ops: &[String],
    cx: &mut Cx,
    pos_of: PosOf,
    whole: &crate::syntax::SyntaxNode,
) -> Type {
    let Some(first) = operands.first() else { return Type::Unknown };
    let mut acc = infer_expr(first, cx, pos_of);
    for (op, rhs) in ops.iter().zip(operands.iter().skip(1)) {
        let rhs_ty = infer_expr(rhs, cx, pos_of);
        if (op == "/" || op == "%") && is_zero_literal(rhs) {
            cx.warn("division by zero", pos_of(rhs.as_cst()));
        }
        acc = if acc == Type::Unknown || rhs_ty == Type::Unknown {
            Type::Unknown
        } else if acc.is_numeric() && rhs_ty.is_numeric() {
            acc.arithmetic_result(rhs_ty)
        } else {
            cx.error(
                format!("arithmetic '{op}' requires numeric operands, found {acc} and {rhs_ty}"),
                pos_of(whole),
            );
            Type::Unknown
        };
    }
    acc
}

fn is_zero_literal(expr: &Expr) -> bool {
    let Expr::Literal(lit) = expr else { return false };
    let Some(token) = lit.token() else { return false };
    match token.kind() {
        SyntaxKind::IntegerLit => token.text().parse::<i64>() == Ok(0),
        SyntaxKind::FloatLit => token.text().parse::<f64>().is_ok_and(|v| v == 0.0),
        _ => false,
    }
}

/// Infers `cond`'s type — always [`Type::Boolean`] once resolved, since a
/// condition is itself a boolean-valued production — annotating every
/// sub-expression and sub-condition along the way. Per rule 3, each
/// connective validates its operands are boolean-compatible but still
/// yields `BOOLEAN` even when an operand wasn't, so one bad leaf doesn't
/// block evaluation of its siblings.
pub fn infer_condition(cond: &Condition, cx: &mut Cx, pos_of: PosOf) -> Type {
    let ty = infer_condition_inner(cond, cx, pos_of);
    cx.annotations.set(cond.as_cst(), ty);
    ty
}

fn infer_condition_inner(cond: &Condition, cx: &mut Cx, pos_of: PosOf) -> Type {
    match cond {
        Condition::Or(or) => {
            for operand in or.operands() {
                infer_condition(&operand, cx, pos_of);
            }
            Type::Boolean
        }
        Condition::And(and) => {
            for operand in and.operands() {
                infer_condition(&operand, cx, pos_of);
            }
            Type::Boolean
        }
        Condition::Not(not) => {
            if let Some(operand) = not.operand() {
                infer_condition(&operand, cx, pos_of);
            }
            Type::Boolean
        }
        Condition::Paren(p) => {
            p.inner().map(|inner| infer_condition(&inner, cx, pos_of));
            Type::Boolean
        }
        Condition::Comparison(cmp) => {
            let left = cmp.left().map(|e| infer_expr(&e, cx, pos_of));
            let right = cmp.right().map(|e| infer_expr(&e, cx, pos_of));
            if let (Some(l), Some(r)) = (left, right) {
                if l != Type::Unknown && r != Type::Unknown && !l.comparable_with(r) {
                    cx.error(format!("type mismatch: cannot compare {l} and {r}"), pos_of(cond.as_cst()));
                }
            }
            Type::Boolean
        }
        Condition::Between(between) => {
            let target = between.target().map(|e| infer_expr(&e, cx, pos_of));
            let low = between.low().map(|e| infer_expr(&e, cx, pos_of));
            let high = between.high().map(|e| infer_expr(&e, cx, pos_of));
            if let (Some(t), Some(l), Some(h)) = (target, low, high) {
                let unknown = t == Type::Unknown || l == Type::Unknown || h == Type::Unknown;
                if !unknown && (!t.comparable_with(l) || !t.comparable_with(h)) {
                    cx.error("BETWEEN operands must be mutually comparable", pos_of(cond.as_cst()));
                }
            }
            Type::Boolean
        }
        Condition::In(inc) => {
            let target = inc.target().map(|e| infer_expr(&e, cx, pos_of));
            let values: Vec<Type> = inc.values().iter().map(|e| infer_expr(e, cx, pos_of)).collect();
            if let Some(t) = target {
                if t != Type::Unknown {
                    for v in &values {
                        if *v != Type::Unknown && !t.comparable_with(*v) {
                            cx.error(format!("type mismatch: cannot compare {t} and {v} in IN list"), pos_of(cond.as_cst()));
                            break;
                        }
                    }
                }
            }
            Type::Boolean
        }
        Condition::Like(like) => {
            let target = like.target().map(|e| infer_expr(&e, cx, pos_of));
            if let Some(t) = target {
                if t != Type::Unknown && !t.comparable_with(Type::Text) {
                    cx.error(format!("LIKE requires a TEXT operand, found {t}"), pos_of(cond.as_cst()));
                }
            }
            Type::Boolean
        }
        Condition::IsNull(is_null) => {
            if let Some(target) = is_null.target() {
                infer_expr(&target, cx, pos_of);
            }
            Type::Boolean
        }
        Condition::Bare(expr) => {
            let ty = infer_expr(expr, cx, pos_of);
            if ty != Type::Unknown && !ty.is_boolean_compatible() {
                cx.error(format!("expected a BOOLEAN-compatible expression, found {ty}"), pos_of(cond.as_cst()));
            }
            Type::Boolean
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::compile;
    use crate::diagnostics::{Severity, Stage};

    #[test]
    fn mixing_integer_and_float_widens_to_float_without_diagnostics() {
        let unit = compile("CREATE TABLE t (a INTEGER); INSERT INTO t VALUES (1); SELECT a + 1.5 FROM t;");
        assert!(unit.is_success(), "{:?}", unit.diagnostics.iter().collect::<Vec<_>>());
    }

    #[test]
    fn string_concatenation_requires_text_operands() {
        let unit = compile("CREATE TABLE t (a INTEGER); SELECT a || 'x' FROM t;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("string concatenation"));
    }

    #[test]
    fn string_concatenation_of_two_texts_is_accepted() {
        let unit = compile("SELECT 'a' || 'b';");
        assert!(unit.is_success(), "{:?}", unit.diagnostics.iter().collect::<Vec<_>>());
    }

    #[test]
    fn division_by_a_zero_literal_is_a_warning_not_an_error() {
        let unit = compile("SELECT 1 / 0;");
        assert_eq!(unit.diagnostics.len(), 1);
        let d = unit.diagnostics.iter().next().unwrap();
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.stage, Stage::Sem);
        assert!(d.message.contains("division by zero"));
    }

    #[test]
    fn comparing_incomparable_types_is_rejected() {
        let unit = compile("CREATE TABLE t (a INTEGER); SELECT a FROM t WHERE a = 'x';");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("cannot compare"));
    }

    #[test]
    fn unary_minus_on_a_non_numeric_operand_is_rejected() {
        let unit = compile("SELECT -'x';");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("unary '-' requires a numeric operand"));
    }

    #[test]
    fn like_requires_a_text_operand() {
        let unit = compile("CREATE TABLE t (a INTEGER); SELECT a FROM t WHERE a LIKE 'x';");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("LIKE requires a TEXT operand"));
    }

    #[test]
    fn between_requires_mutually_comparable_operands() {
        let unit = compile("CREATE TABLE t (a INTEGER); SELECT a FROM t WHERE a BETWEEN 'a' AND 'z';");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("BETWEEN operands must be mutually comparable"));
    }

    #[test]
    fn bare_boolean_column_is_accepted_as_a_where_condition() {
        let unit = compile("CREATE TABLE t (active BOOLEAN); SELECT * FROM t WHERE active;");
        assert!(unit.is_success(), "{:?}", unit.diagnostics.iter().collect::<Vec<_>>());
    }

    #[test]
    fn bare_condition_on_a_non_boolean_column_is_rejected() {
        let unit = compile("CREATE TABLE t (name TEXT); SELECT * FROM t WHERE name;");
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics.iter().next().unwrap().message.contains("expected a BOOLEAN-compatible expression"));
    }
}

