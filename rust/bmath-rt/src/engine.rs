//! The engine drives a source string through lex → parse → optimize →
//! eval, one top-level expression at a time, yielding a [`LabeledValue`]
//! per expression. An `IncompleteInput` error passes through unwrapped so
//! a REPL driver can append the next input line and run again.

use bmath_compiler::compiler::lexer::Lexer;
use bmath_compiler::compiler::optimizer::{OptLevel, Optimizer};
use bmath_compiler::compiler::parser::Parser;
use bmath_core::error::EvalError;
use bmath_core::values::LabeledValue;

use crate::interpreter::Interpreter;

pub struct Engine {
    interpreter: Interpreter,
    opt_level: OptLevel,
}

impl Engine {
    pub fn new(opt_level: OptLevel) -> Self {
        Self {
            interpreter: Interpreter::new(),
            opt_level,
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Evaluate every top-level expression in `source`. The iterator stops
    /// after the first error; the interpreter state keeps whatever
    /// bindings were made before it.
    pub fn run<'a>(&'a mut self, source: &str) -> Run<'a> {
        Run {
            interpreter: &self.interpreter,
            lexer: Lexer::new(source),
            optimizer: Optimizer::new(self.opt_level),
            failed: false,
        }
    }
}

pub struct Run<'a> {
    interpreter: &'a Interpreter,
    lexer: Lexer,
    optimizer: Optimizer,
    failed: bool,
}

impl Iterator for Run<'_> {
    type Item = Result<LabeledValue, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.lexer.next_expression() {
            Ok(None) => None,
            Ok(Some(tokens)) => {
                let result = Parser::parse(tokens, self.optimizer)
                    .and_then(|expr| self.interpreter.eval(&expr));
                if result.is_err() {
                    self.failed = true;
                }
                Some(result)
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmath_core::error::ErrorKind;

    #[test]
    fn test_run_yields_one_result_per_expression() {
        let mut engine = Engine::new(OptLevel::Full);
        let results: Vec<_> = engine.run("1 + 1\n2 * 3\n").collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().value.to_string(), "2");
        assert_eq!(results[1].as_ref().unwrap().value.to_string(), "6");
    }

    #[test]
    fn test_assignments_are_labeled_and_persist() {
        let mut engine = Engine::new(OptLevel::Full);
        let results: Vec<_> = engine.run("x = 5").collect();
        assert_eq!(results[0].as_ref().unwrap().label, "x");
        let results: Vec<_> = engine.run("x * 2").collect();
        assert_eq!(results[0].as_ref().unwrap().value.to_string(), "10");
    }

    #[test]
    fn test_incomplete_input_passes_through() {
        let mut engine = Engine::new(OptLevel::Full);
        let results: Vec<_> = engine.run("{").collect();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].as_ref().unwrap_err().kind,
            ErrorKind::IncompleteInput
        );
        // The REPL driver appends the rest and runs again.
        let results: Vec<_> = engine.run("{\n1+1}").collect();
        assert_eq!(results[0].as_ref().unwrap().value.to_string(), "2");
    }

    #[test]
    fn test_iteration_stops_after_an_error() {
        let mut engine = Engine::new(OptLevel::Full);
        let results: Vec<_> = engine.run("nope\n1 + 1\n").collect();
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].as_ref().unwrap_err().kind,
            ErrorKind::UndefinedVariable
        );
    }
}
