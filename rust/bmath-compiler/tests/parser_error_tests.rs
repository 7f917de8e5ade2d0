//! Malformed input coverage: which error kind fires, and where.

use bmath_compiler::{Lexer, OptLevel, Optimizer, Parser};
use bmath_core::error::{ErrorKind, EvalError};

fn parse_err(src: &str) -> EvalError {
    let mut lexer = Lexer::new(src);
    match lexer.next_expression() {
        Err(err) => err,
        Ok(Some(tokens)) => {
            Parser::parse(tokens, Optimizer::new(OptLevel::Full)).unwrap_err()
        }
        Ok(None) => panic!("no expression in {:?}", src),
    }
}

#[test]
fn test_missing_operand() {
    let err = parse_err("1 +");
    assert_eq!(err.kind, ErrorKind::MissingToken);
}

#[test]
fn test_missing_closing_tokens_inside_one_line() {
    // Unclosed openers on a single line surface as incomplete input.
    assert_eq!(parse_err("f(1, 2").kind, ErrorKind::IncompleteInput);
    assert_eq!(parse_err("[1, 2").kind, ErrorKind::IncompleteInput);
    assert_eq!(parse_err("(1 + 2").kind, ErrorKind::IncompleteInput);
}

#[test]
fn test_function_literal_errors() {
    // Parameter list never closed.
    assert_eq!(parse_err("|x").kind, ErrorKind::MissingToken);
    // Parameters must be plain names.
    assert_eq!(parse_err("|1| 2").kind, ErrorKind::MissingToken);
    // Unknown annotation type.
    assert_eq!(parse_err("|x: Foo| x").kind, ErrorKind::InvalidExpression);
}

#[test]
fn test_local_requires_a_name_and_value() {
    assert_eq!(parse_err("local 5 = 1").kind, ErrorKind::MissingToken);
    assert_eq!(parse_err("local x").kind, ErrorKind::MissingToken);
    assert_eq!(parse_err("local x: Wat = 1").kind, ErrorKind::InvalidExpression);
}

#[test]
fn test_if_branch_errors() {
    // Condition parens are required.
    assert_eq!(parse_err("if true 1 else 2").kind, ErrorKind::MissingToken);
    // A dangling else has nothing to parse.
    assert_eq!(parse_err("if(true) 1 else").kind, ErrorKind::MissingToken);
    // elif after the else is just a stray token.
    assert_eq!(
        parse_err("if(true) 1 else 2 elif(false) 3 else 4").kind,
        ErrorKind::UnexpectedToken
    );
}

#[test]
fn test_assignment_targets() {
    assert_eq!(parse_err("1 = 2").kind, ErrorKind::InvalidExpression);
    assert_eq!(parse_err("f() = 2").kind, ErrorKind::InvalidExpression);
    // Builtin type names are literals, not assignable names.
    assert_eq!(parse_err("Real = 2").kind, ErrorKind::InvalidExpression);
}

#[test]
fn test_trailing_garbage() {
    assert_eq!(parse_err("1 2").kind, ErrorKind::UnexpectedToken);
    assert_eq!(parse_err("(1) (2) extra").kind, ErrorKind::UnexpectedToken);
}

#[test]
fn test_operators_that_cannot_start_an_expression() {
    assert_eq!(parse_err("* 2").kind, ErrorKind::UnexpectedToken);
    assert_eq!(parse_err("^ 2").kind, ErrorKind::UnexpectedToken);
}

#[test]
fn test_error_positions_are_precise() {
    let err = parse_err("1 +");
    assert_eq!(err.origin().unwrap().line, 1);
    let err = parse_err("x = = 2");
    assert_eq!(err.origin().unwrap().column, 5);
}
