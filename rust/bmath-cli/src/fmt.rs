//! Source formatter.
//!
//! Parses with optimization off (a formatter must not rewrite `2 + 3` to
//! `5`) and prints a canonical rendition: one expression per line, single
//! spaces around binary operators, parens kept where the source had them
//! and added back wherever precedence demands them.

use std::path::Path;
use std::process::ExitCode;

use bmath_compiler::{Lexer, OptLevel, Optimizer, Parser};
use bmath_core::ast::{BinOp, Expr, ExprKind};
use bmath_core::error::EvalError;

use crate::{diagnostics, red};

pub fn run(path: &Path, output: Option<&Path>) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{} cannot read {}: {}", red("error:"), path.display(), err);
            return ExitCode::FAILURE;
        }
    };
    match format_source(&source) {
        Ok(formatted) => match output {
            Some(out_path) => {
                if let Err(err) = std::fs::write(out_path, formatted) {
                    eprintln!(
                        "{} cannot write {}: {}",
                        red("error:"),
                        out_path.display(),
                        err
                    );
                    return ExitCode::FAILURE;
                }
                ExitCode::SUCCESS
            }
            None => {
                print!("{}", formatted);
                ExitCode::SUCCESS
            }
        },
        Err(err) => {
            diagnostics::report(&err, Some(&source));
            ExitCode::FAILURE
        }
    }
}

pub fn format_source(source: &str) -> Result<String, EvalError> {
    let mut lexer = Lexer::with_comments(source);
    let optimizer = Optimizer::new(OptLevel::None);
    let mut items: Vec<(u32, String)> = Vec::new();
    while let Some(tokens) = lexer.next_expression()? {
        let line = tokens
            .first()
            .map(|t| t.position.line)
            .unwrap_or(1);
        let expr = Parser::parse(tokens, optimizer)?;
        items.push((line, render(&expr)));
    }
    let comments = lexer.take_comments();

    let mut out = String::new();
    let mut next_comment = 0;
    for (line, text) in &items {
        while next_comment < comments.len() && comments[next_comment].position.line < *line {
            if let bmath_compiler::TokenKind::Comment(c) = &comments[next_comment].kind {
                out.push_str(&format!("#{}\n", c));
            }
            next_comment += 1;
        }
        out.push_str(text);
        // A comment that started on the expression's first line trails it.
        if next_comment < comments.len() && comments[next_comment].position.line == *line {
            if let bmath_compiler::TokenKind::Comment(c) = &comments[next_comment].kind {
                out.push_str(&format!(" #{}", c));
            }
            next_comment += 1;
        }
        out.push('\n');
    }
    while next_comment < comments.len() {
        if let bmath_compiler::TokenKind::Comment(c) = &comments[next_comment].kind {
            out.push_str(&format!("#{}\n", c));
        }
        next_comment += 1;
    }
    Ok(out)
}

// Precedence mirror of the parser table, for minimal re-parenthesization.
fn op_prec(op: BinOp) -> u8 {
    match op {
        BinOp::Pow => 60,
        BinOp::Mul | BinOp::Div | BinOp::Mod => 50,
        BinOp::Add | BinOp::Sub => 40,
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 30,
        BinOp::Eq | BinOp::Ne | BinOp::Is => 25,
        BinOp::And => 20,
        BinOp::Or => 15,
    }
}

const PREC_UNARY: u8 = 55;
const PREC_ASSIGN: u8 = 5;
/// `if` and function literals swallow everything to their right, so they
/// need parens in any operand position.
const PREC_OPEN_ENDED: u8 = 2;
const PREC_ATOM: u8 = 100;

fn expr_prec(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Binary(b) => op_prec(b.op),
        ExprKind::Neg(_) | ExprKind::Not(_) => PREC_UNARY,
        ExprKind::Assign(_) => PREC_ASSIGN,
        ExprKind::If(_) | ExprKind::FuncDef(_) => PREC_OPEN_ENDED,
        ExprKind::Number(n) => {
            // A full complex renders as `a+bi`, itself a sum.
            if let bmath_core::number::Number::Complex(c) = n {
                if c.re != 0.0 {
                    return 40;
                }
            }
            PREC_ATOM
        }
        _ => PREC_ATOM,
    }
}

pub fn render(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr, 0);
    out
}

fn write_expr(out: &mut String, expr: &Expr, min_prec: u8) {
    let needs_parens = expr_prec(expr) < min_prec;
    if needs_parens {
        out.push('(');
    }
    write_bare(out, expr);
    if needs_parens {
        out.push(')');
    }
}

fn write_bare(out: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::Number(n) => out.push_str(&n.to_string()),
        ExprKind::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ExprKind::TypeLit(t) => out.push_str(&t.to_string()),
        ExprKind::Ident(name) => out.push_str(name),
        ExprKind::Group(inner) => {
            out.push('(');
            write_expr(out, inner, 0);
            out.push(')');
        }
        ExprKind::Neg(operand) => {
            out.push('-');
            write_expr(out, operand, PREC_UNARY);
        }
        ExprKind::Not(operand) => {
            out.push('!');
            write_expr(out, operand, PREC_UNARY);
        }
        ExprKind::Binary(b) => {
            let p = op_prec(b.op);
            // Power is right-associative, the rest left.
            let (left_min, right_min) = if b.op == BinOp::Pow {
                (p + 1, p)
            } else {
                (p, p + 1)
            };
            write_expr(out, &b.left, left_min);
            out.push_str(&format!(" {} ", b.op));
            write_expr(out, &b.right, right_min);
        }
        ExprKind::Vector(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, item, 0);
            }
            out.push(']');
        }
        ExprKind::Assign(assign) => {
            if assign.is_local {
                out.push_str("local ");
            }
            out.push_str(&assign.name);
            if let Some(ty) = &assign.ty {
                out.push_str(&format!(": {}", ty));
            }
            // The value is the rightmost component; nothing can swallow it.
            out.push_str(" = ");
            write_expr(out, &assign.value, 0);
        }
        ExprKind::FuncDef(def) => {
            out.push('|');
            for (i, param) in def.params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&param.name);
                if !param.ty.is_any() {
                    out.push_str(&format!(": {}", param.ty));
                }
            }
            out.push_str("| ");
            if !def.return_type.is_any() {
                out.push_str(&format!("=> {} ", def.return_type));
            }
            write_expr(out, &def.body, 0);
        }
        ExprKind::FuncCall(call) => {
            write_expr(out, &call.callee, PREC_ATOM);
            out.push('(');
            for (i, arg) in call.args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, arg, 0);
            }
            out.push(')');
        }
        ExprKind::Block(exprs) => {
            out.push_str("{\n");
            for e in exprs {
                for line in render(e).lines() {
                    out.push_str("  ");
                    out.push_str(line);
                    out.push('\n');
                }
            }
            out.push('}');
        }
        ExprKind::If(if_expr) => {
            for (i, branch) in if_expr.branches.iter().enumerate() {
                out.push_str(if i == 0 { "if(" } else { " elif(" });
                write_expr(out, &branch.cond, 0);
                out.push_str(") ");
                write_expr(out, &branch.then, 0);
            }
            out.push_str(" else ");
            write_expr(out, &if_expr.else_branch, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(src: &str) -> String {
        format_source(src).unwrap()
    }

    #[test]
    fn test_canonical_spacing() {
        assert_eq!(roundtrip("1+2*3"), "1 + 2 * 3\n");
    }

    #[test]
    fn test_groups_survive() {
        assert_eq!(roundtrip("(1+2)*3"), "(1 + 2) * 3\n");
        assert_eq!(roundtrip("((x))"), "((x))\n");
    }

    #[test]
    fn test_constants_are_not_folded() {
        assert_eq!(roundtrip("2 + 3"), "2 + 3\n");
    }

    #[test]
    fn test_function_literals() {
        assert_eq!(roundtrip("f = |x| x*x"), "f = |x| x * x\n");
        assert_eq!(
            roundtrip("g = |x: Integer| => Real x / 2"),
            "g = |x: Integer| => Real x / 2\n"
        );
    }

    #[test]
    fn test_block_layout() {
        assert_eq!(roundtrip("{a = 1\n a}"), "{\n  a = 1\n  a\n}\n");
    }

    #[test]
    fn test_if_layout() {
        assert_eq!(
            roundtrip("if(a) 1 elif(b) 2 else 3"),
            "if(a) 1 elif(b) 2 else 3\n"
        );
    }

    #[test]
    fn test_comments_are_preserved() {
        assert_eq!(roundtrip("# leading\n1 + 2 # trailing\n"), "# leading\n1 + 2 # trailing\n");
    }

    #[test]
    fn test_chain_renders_as_call() {
        assert_eq!(roundtrip("x -> f(2)"), "f(x, 2)\n");
    }

    #[test]
    fn test_formatted_source_reparses() {
        let sources = [
            "f = |n| if(n<=1) 1 else n*fact(n-1)",
            "collect(map([1,2,3], |x| x+1))",
            "{a = 1\n b = 2\n a + b}",
            "-(2 ^ 2) + 1",
            "2 ^ (-x) ^ 2",
        ];
        for src in sources {
            let once = format_source(src).unwrap();
            let twice = format_source(&once).unwrap();
            assert_eq!(once, twice, "formatting must be a fixed point for {src}");
        }
    }
}
