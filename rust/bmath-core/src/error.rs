//! Error taxonomy shared by the lexer, parser, and interpreter.
//!
//! A single [`EvalError`] flows through every phase so that positions can
//! accumulate as evaluation unwinds: the lexer or parser seeds the stack
//! with the offending token's position, and the interpreter pushes the
//! position of each enclosing expression, producing an innermost-first
//! trace by the time the error reaches the driver.

use crate::position::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every way a BMath program can fail, parse-time and runtime alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    // Lexer / parser
    IncompleteInput,
    UnexpectedToken,
    MissingToken,
    InvalidExpression,
    InvalidNumberFormat,
    UnexpectedCharacter,
    // Runtime
    ZeroDivision,
    UnsupportedType,
    InvalidArgument,
    SequenceExhausted,
    UndefinedVariable,
    ReservedName,
    ComplexModulus,
    ComplexComparison,
    ComplexCeilFloorRound,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::IncompleteInput => "IncompleteInput",
            ErrorKind::UnexpectedToken => "UnexpectedToken",
            ErrorKind::MissingToken => "MissingToken",
            ErrorKind::InvalidExpression => "InvalidExpression",
            ErrorKind::InvalidNumberFormat => "InvalidNumberFormat",
            ErrorKind::UnexpectedCharacter => "UnexpectedCharacter",
            ErrorKind::ZeroDivision => "ZeroDivision",
            ErrorKind::UnsupportedType => "UnsupportedType",
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::SequenceExhausted => "SequenceExhausted",
            ErrorKind::UndefinedVariable => "UndefinedVariable",
            ErrorKind::ReservedName => "ReservedName",
            ErrorKind::ComplexModulus => "ComplexModulus",
            ErrorKind::ComplexComparison => "ComplexComparison",
            ErrorKind::ComplexCeilFloorRound => "ComplexCeilFloorRound",
        }
    }

    /// Raised before any evaluation happened.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::IncompleteInput
                | ErrorKind::UnexpectedToken
                | ErrorKind::MissingToken
                | ErrorKind::InvalidExpression
                | ErrorKind::InvalidNumberFormat
                | ErrorKind::UnexpectedCharacter
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            ErrorKind::ZeroDivision
                | ErrorKind::ComplexModulus
                | ErrorKind::ComplexComparison
                | ErrorKind::ComplexCeilFloorRound
        )
    }

    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            ErrorKind::UnsupportedType
                | ErrorKind::InvalidArgument
                | ErrorKind::SequenceExhausted
        )
    }

    pub fn is_environment_error(&self) -> bool {
        matches!(self, ErrorKind::UndefinedVariable | ErrorKind::ReservedName)
    }
}

/// A failure with its positional trace, innermost position first.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("[{}] {message}", .kind.name())]
pub struct EvalError {
    pub kind: ErrorKind,
    pub message: String,
    pub stack: Vec<Position>,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stack: Vec::new(),
        }
    }

    pub fn at(kind: ErrorKind, message: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            message: message.into(),
            stack: vec![position],
        }
    }

    /// Record the position of an enclosing expression while unwinding.
    pub fn push_position(&mut self, position: Position) {
        self.stack.push(position);
    }

    /// The innermost position, when any was recorded.
    pub fn origin(&self) -> Option<Position> {
        self.stack.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_name() {
        let err = EvalError::new(ErrorKind::ZeroDivision, "division by zero");
        assert_eq!(err.to_string(), "[ZeroDivision] division by zero");
    }

    #[test]
    fn test_stack_is_innermost_first() {
        let mut err = EvalError::at(ErrorKind::UndefinedVariable, "no 'x'", Position::new(3, 7));
        err.push_position(Position::new(3, 1));
        err.push_position(Position::new(1, 1));
        assert_eq!(err.origin(), Some(Position::new(3, 7)));
        assert_eq!(err.stack.len(), 3);
    }

    #[test]
    fn test_kind_groups() {
        assert!(ErrorKind::IncompleteInput.is_parse_error());
        assert!(ErrorKind::ZeroDivision.is_arithmetic());
        assert!(ErrorKind::SequenceExhausted.is_type_error());
        assert!(ErrorKind::ReservedName.is_environment_error());
        assert!(!ErrorKind::UnsupportedType.is_arithmetic());
    }
}
