//! BMath Compiler
//!
//! Front end of the language: tokenization, Pratt parsing, and the
//! parse-time optimizer. Source text goes in, optimized [`Expr`] trees
//! come out; evaluation lives in `bmath-rt`.

pub mod compiler;

pub use compiler::lexer::Lexer;
pub use compiler::optimizer::{OptLevel, Optimizer};
pub use compiler::parser::Parser;
pub use compiler::tokens::{Token, TokenKind};

use bmath_core::ast::Expr;
use bmath_core::error::EvalError;

/// Lex and parse every top-level expression in a source string.
/// Convenience entry for tools and tests; the engine drives the lexer
/// incrementally instead.
pub fn parse_source(source: &str, level: OptLevel) -> Result<Vec<Expr>, EvalError> {
    let optimizer = Optimizer::new(level);
    let mut lexer = Lexer::new(source);
    let mut exprs = Vec::new();
    while let Some(tokens) = lexer.next_expression()? {
        exprs.push(Parser::parse(tokens, optimizer)?);
    }
    Ok(exprs)
}
