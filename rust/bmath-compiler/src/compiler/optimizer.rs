//! Parse-time optimizer.
//!
//! The parser hands every freshly built node to [`Optimizer::fold`]; when
//! a rewrite applies, the folded node replaces the original. Arithmetic
//! errors hit during folding (division by zero between literals, complex
//! modulo) are raised immediately as parse errors carrying the position of
//! the folded node — the same error kind the interpreter would raise, just
//! earlier.

use bmath_core::ast::{BinOp, BinaryExpr, CondBranch, Expr, ExprKind, IfExpr};
use bmath_core::error::EvalError;
use bmath_core::number::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptLevel {
    /// No rewrites at all
    None,
    /// Constant folding only
    Basic,
    /// Everything: folding, boolean/comparison/type-check simplification,
    /// dead-branch elimination, group unwrapping
    #[default]
    Full,
}

impl OptLevel {
    pub fn parse(s: &str) -> Option<OptLevel> {
        match s {
            "none" => Some(OptLevel::None),
            "basic" => Some(OptLevel::Basic),
            "full" => Some(OptLevel::Full),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Optimizer {
    level: OptLevel,
    /// Set by the formatter pipeline: parens must survive so the printed
    /// source keeps them.
    preserve_groups: bool,
}

impl Optimizer {
    pub fn new(level: OptLevel) -> Self {
        Self {
            level,
            preserve_groups: false,
        }
    }

    pub fn preserving_groups(level: OptLevel) -> Self {
        Self {
            level,
            preserve_groups: true,
        }
    }

    pub fn fold(&self, expr: Expr) -> Result<Expr, EvalError> {
        if self.level == OptLevel::None {
            return Ok(expr);
        }
        let position = expr.position;
        match expr.kind {
            ExprKind::Group(inner) => {
                if self.level == OptLevel::Full && !self.preserve_groups {
                    Ok(*inner)
                } else {
                    Ok(Expr::new(ExprKind::Group(inner), position))
                }
            }
            ExprKind::Neg(operand) => match operand.kind {
                ExprKind::Number(n) => Ok(Expr::number(n.neg(), position)),
                _ => Ok(Expr::new(ExprKind::Neg(operand), position)),
            },
            ExprKind::Not(operand) => {
                if self.level == OptLevel::Full {
                    if let ExprKind::Bool(b) = operand.kind {
                        return Ok(Expr::boolean(!b, position));
                    }
                }
                Ok(Expr::new(ExprKind::Not(operand), position))
            }
            ExprKind::Binary(binary) => self.fold_binary(binary, position),
            ExprKind::If(if_expr) => {
                if self.level == OptLevel::Full {
                    self.fold_if(if_expr, position)
                } else {
                    Ok(Expr::new(ExprKind::If(if_expr), position))
                }
            }
            kind => Ok(Expr::new(kind, position)),
        }
    }

    fn fold_binary(
        &self,
        binary: BinaryExpr,
        position: bmath_core::position::Position,
    ) -> Result<Expr, EvalError> {
        let op = binary.op;

        if op.is_arithmetic() {
            if let (ExprKind::Number(a), ExprKind::Number(b)) =
                (&binary.left.kind, &binary.right.kind)
            {
                return fold_arithmetic(op, *a, *b, position);
            }
            return Ok(Expr::new(ExprKind::Binary(binary), position));
        }

        if self.level != OptLevel::Full {
            return Ok(Expr::new(ExprKind::Binary(binary), position));
        }

        if op.is_comparison() {
            if let (ExprKind::Number(a), ExprKind::Number(b)) =
                (&binary.left.kind, &binary.right.kind)
            {
                if !a.is_complex() && !b.is_complex() {
                    let result = match op {
                        BinOp::Eq => a.equals(*b),
                        BinOp::Ne => !a.equals(*b),
                        // compare() cannot fail: both sides are non-complex.
                        BinOp::Lt => a.compare(*b)?.is_lt(),
                        BinOp::Le => a.compare(*b)?.is_le(),
                        BinOp::Gt => a.compare(*b)?.is_gt(),
                        BinOp::Ge => a.compare(*b)?.is_ge(),
                        _ => unreachable!(),
                    };
                    return Ok(Expr::boolean(result, position));
                }
            }
            return Ok(Expr::new(ExprKind::Binary(binary), position));
        }

        match op {
            BinOp::And => match (&binary.left.kind, &binary.right.kind) {
                (ExprKind::Bool(false), _) => Ok(Expr::boolean(false, position)),
                (ExprKind::Bool(a), ExprKind::Bool(b)) => Ok(Expr::boolean(*a && *b, position)),
                _ => Ok(Expr::new(ExprKind::Binary(binary), position)),
            },
            BinOp::Or => match (&binary.left.kind, &binary.right.kind) {
                (ExprKind::Bool(true), _) => Ok(Expr::boolean(true, position)),
                (ExprKind::Bool(a), ExprKind::Bool(b)) => Ok(Expr::boolean(*a || *b, position)),
                _ => Ok(Expr::new(ExprKind::Binary(binary), position)),
            },
            BinOp::Is => match &binary.right.kind {
                ExprKind::TypeLit(t) if t.is_any() => Ok(Expr::boolean(true, position)),
                _ => Ok(Expr::new(ExprKind::Binary(binary), position)),
            },
            _ => Ok(Expr::new(ExprKind::Binary(binary), position)),
        }
    }

    fn fold_if(
        &self,
        if_expr: IfExpr,
        position: bmath_core::position::Position,
    ) -> Result<Expr, EvalError> {
        let mut kept: Vec<CondBranch> = Vec::new();
        let mut else_branch = if_expr.else_branch;
        for branch in if_expr.branches {
            match branch.cond.kind {
                ExprKind::Bool(false) => {}
                ExprKind::Bool(true) => {
                    // Everything after a constant-true branch is unreachable.
                    else_branch = Box::new(branch.then);
                    break;
                }
                _ => kept.push(branch),
            }
        }
        if kept.is_empty() {
            Ok(*else_branch)
        } else {
            Ok(Expr::new(
                ExprKind::If(IfExpr {
                    branches: kept,
                    else_branch,
                }),
                position,
            ))
        }
    }
}

fn fold_arithmetic(
    op: BinOp,
    a: Number,
    b: Number,
    position: bmath_core::position::Position,
) -> Result<Expr, EvalError> {
    let result = match op {
        BinOp::Add => Ok(a.add(b)),
        BinOp::Sub => Ok(a.sub(b)),
        BinOp::Mul => Ok(a.mul(b)),
        BinOp::Div => a.div(b),
        BinOp::Mod => a.rem(b),
        BinOp::Pow => Ok(a.pow(b)),
        _ => unreachable!(),
    };
    match result {
        Ok(n) => Ok(Expr::number(n, position)),
        Err(mut err) => {
            err.push_position(position);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer::Lexer;
    use crate::compiler::parser::Parser;
    use bmath_core::error::ErrorKind;

    fn parse_with(src: &str, level: OptLevel) -> Result<Expr, EvalError> {
        let mut lexer = Lexer::new(src);
        let tokens = lexer.next_expression()?.expect("no expression");
        Parser::parse(tokens, Optimizer::new(level))
    }

    fn parse_full(src: &str) -> Expr {
        parse_with(src, OptLevel::Full).unwrap()
    }

    #[test]
    fn test_constant_folding() {
        assert_eq!(parse_full("2 + 3 * 4").kind, ExprKind::Number(Number::Int(14)));
        assert_eq!(parse_full("-(2 + 3)").kind, ExprKind::Number(Number::Int(-5)));
        assert_eq!(parse_full("2 ^ 10").kind, ExprKind::Number(Number::Int(1024)));
    }

    #[test]
    fn test_folding_respects_levels() {
        let basic = parse_with("2 + 3", OptLevel::Basic).unwrap();
        assert_eq!(basic.kind, ExprKind::Number(Number::Int(5)));
        let none = parse_with("2 + 3", OptLevel::None).unwrap();
        assert!(matches!(none.kind, ExprKind::Binary(_)));
        // Boolean simplification is Full-only.
        let basic = parse_with("!true", OptLevel::Basic).unwrap();
        assert!(matches!(basic.kind, ExprKind::Not(_)));
    }

    #[test]
    fn test_division_by_zero_is_a_parse_error() {
        let err = parse_with("1 / 0", OptLevel::Full).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ZeroDivision);
        assert!(err.origin().is_some());
    }

    #[test]
    fn test_complex_modulo_is_a_parse_error() {
        let err = parse_with("2i % 2", OptLevel::Full).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ComplexModulus);
    }

    #[test]
    fn test_boolean_simplification() {
        assert_eq!(parse_full("!true").kind, ExprKind::Bool(false));
        assert_eq!(parse_full("true & false").kind, ExprKind::Bool(false));
        assert_eq!(parse_full("false | true").kind, ExprKind::Bool(true));
        // The deciding operand short-circuits even with a dynamic right side.
        assert_eq!(parse_full("false & x").kind, ExprKind::Bool(false));
        assert_eq!(parse_full("true | x").kind, ExprKind::Bool(true));
    }

    #[test]
    fn test_comparison_simplification() {
        assert_eq!(parse_full("1 < 2").kind, ExprKind::Bool(true));
        assert_eq!(parse_full("2 == 2.0").kind, ExprKind::Bool(true));
        // Complex literals never fold through comparison.
        assert!(matches!(parse_full("2i == 2i").kind, ExprKind::Binary(_)));
    }

    #[test]
    fn test_type_check_simplification() {
        assert_eq!(parse_full("x is Any").kind, ExprKind::Bool(true));
        assert!(matches!(parse_full("x is Number").kind, ExprKind::Binary(_)));
    }

    #[test]
    fn test_dead_branch_elimination() {
        // First constant-true branch replaces the whole conditional.
        let e = parse_full("if(1 < 0) 10 elif(2 == 2) 20 else 30");
        assert_eq!(e.kind, ExprKind::Number(Number::Int(20)));
        // Dynamic branches survive, constant-false ones drop.
        let e = parse_full("if(x) 1 elif(false) 2 else 3");
        match e.kind {
            ExprKind::If(if_expr) => assert_eq!(if_expr.branches.len(), 1),
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_group_removal() {
        assert_eq!(parse_full("(((7)))").kind, ExprKind::Number(Number::Int(7)));
        let mut lexer = Lexer::new("(x)");
        let tokens = lexer.next_expression().unwrap().unwrap();
        let kept = Parser::parse(tokens, Optimizer::preserving_groups(OptLevel::Full)).unwrap();
        assert!(matches!(kept.kind, ExprKind::Group(_)));
    }
}
