//! S-expression dump of the AST, for tooling and debugging. The pretty
//! form indents one child per line once a node has nested structure; the
//! compact form is one line per top-level expression. Parses with groups
//! preserved so the dump reflects the parenthesization of the source.

use std::path::Path;
use std::process::ExitCode;

use bmath_compiler::{Lexer, OptLevel, Optimizer, Parser};
use bmath_core::ast::{Expr, ExprKind};
use bmath_core::error::EvalError;

use crate::{diagnostics, red};

pub fn run(path: &Path, level: OptLevel, compact: bool) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{} cannot read {}: {}", red("error:"), path.display(), err);
            return ExitCode::FAILURE;
        }
    };
    match dump_source(&source, level, compact) {
        Ok(dump) => {
            print!("{}", dump);
            ExitCode::SUCCESS
        }
        Err(err) => {
            diagnostics::report(&err, Some(&source));
            ExitCode::FAILURE
        }
    }
}

pub fn dump_source(source: &str, level: OptLevel, compact: bool) -> Result<String, EvalError> {
    let optimizer = Optimizer::preserving_groups(level);
    let mut lexer = Lexer::new(source);
    let mut out = String::new();
    while let Some(tokens) = lexer.next_expression()? {
        let expr = Parser::parse(tokens, optimizer)?;
        let sexp = to_sexp(&expr);
        if compact {
            out.push_str(&sexp.compact());
        } else {
            sexp.write_pretty(&mut out, 0);
        }
        out.push('\n');
    }
    Ok(out)
}

enum Sexp {
    Atom(String),
    List(Vec<Sexp>),
}

impl Sexp {
    fn atom(s: impl Into<String>) -> Sexp {
        Sexp::Atom(s.into())
    }

    fn compact(&self) -> String {
        match self {
            Sexp::Atom(s) => s.clone(),
            Sexp::List(items) => {
                let parts: Vec<_> = items.iter().map(|i| i.compact()).collect();
                format!("({})", parts.join(" "))
            }
        }
    }

    fn is_flat(&self) -> bool {
        match self {
            Sexp::Atom(_) => true,
            Sexp::List(items) => items.iter().all(|i| matches!(i, Sexp::Atom(_))),
        }
    }

    fn write_pretty(&self, out: &mut String, indent: usize) {
        match self {
            Sexp::Atom(s) => out.push_str(s),
            Sexp::List(items) => {
                if self.is_flat() {
                    out.push_str(&self.compact());
                    return;
                }
                out.push('(');
                for (i, item) in items.iter().enumerate() {
                    if i == 0 {
                        item.write_pretty(out, indent + 1);
                    } else {
                        out.push('\n');
                        out.push_str(&"  ".repeat(indent + 1));
                        item.write_pretty(out, indent + 1);
                    }
                }
                out.push(')');
            }
        }
    }
}

fn to_sexp(expr: &Expr) -> Sexp {
    match &expr.kind {
        ExprKind::Number(n) => Sexp::atom(n.to_string()),
        ExprKind::Bool(b) => Sexp::atom(b.to_string()),
        ExprKind::TypeLit(t) => Sexp::atom(t.to_string()),
        ExprKind::Ident(name) => Sexp::atom(name.as_str()),
        ExprKind::Group(inner) => Sexp::List(vec![Sexp::atom("group"), to_sexp(inner)]),
        ExprKind::Neg(operand) => Sexp::List(vec![Sexp::atom("neg"), to_sexp(operand)]),
        ExprKind::Not(operand) => Sexp::List(vec![Sexp::atom("not"), to_sexp(operand)]),
        ExprKind::Binary(b) => Sexp::List(vec![
            Sexp::atom(b.op.to_string()),
            to_sexp(&b.left),
            to_sexp(&b.right),
        ]),
        ExprKind::Vector(items) => {
            let mut list = vec![Sexp::atom("vector")];
            list.extend(items.iter().map(to_sexp));
            Sexp::List(list)
        }
        ExprKind::Assign(assign) => {
            let head = if assign.is_local { "local" } else { "assign" };
            let mut list = vec![Sexp::atom(head), Sexp::atom(assign.name.as_str())];
            if let Some(ty) = &assign.ty {
                list.push(Sexp::atom(format!(":{}", ty)));
            }
            list.push(to_sexp(&assign.value));
            Sexp::List(list)
        }
        ExprKind::FuncDef(def) => {
            let params = def
                .params
                .iter()
                .map(|p| {
                    if p.ty.is_any() {
                        Sexp::atom(p.name.as_str())
                    } else {
                        Sexp::atom(format!("{}:{}", p.name, p.ty))
                    }
                })
                .collect();
            let mut list = vec![Sexp::atom("lambda"), Sexp::List(params)];
            if !def.return_type.is_any() {
                list.push(Sexp::atom(format!("=>{}", def.return_type)));
            }
            list.push(to_sexp(&def.body));
            Sexp::List(list)
        }
        ExprKind::FuncCall(call) => {
            let mut list = vec![Sexp::atom("call"), to_sexp(&call.callee)];
            list.extend(call.args.iter().map(to_sexp));
            Sexp::List(list)
        }
        ExprKind::Block(exprs) => {
            let mut list = vec![Sexp::atom("block")];
            list.extend(exprs.iter().map(to_sexp));
            Sexp::List(list)
        }
        ExprKind::If(if_expr) => {
            let mut list = vec![Sexp::atom("if")];
            for branch in &if_expr.branches {
                list.push(Sexp::List(vec![
                    to_sexp(&branch.cond),
                    to_sexp(&branch.then),
                ]));
            }
            list.push(Sexp::List(vec![
                Sexp::atom("else"),
                to_sexp(&if_expr.else_branch),
            ]));
            Sexp::List(list)
        }
    }
}
