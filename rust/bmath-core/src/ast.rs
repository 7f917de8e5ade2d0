//! The expression tree produced by the parser and walked by the
//! interpreter. Every node carries the source [`Position`] of its first
//! token.

use crate::number::Number;
use crate::position::Position;
use crate::types::Type;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub position: Position,
}

impl Expr {
    pub fn new(kind: ExprKind, position: Position) -> Self {
        Self { kind, position }
    }

    pub fn number(n: Number, position: Position) -> Self {
        Self::new(ExprKind::Number(n), position)
    }

    pub fn boolean(b: bool, position: Position) -> Self {
        Self::new(ExprKind::Bool(b), position)
    }

    /// True for nodes the optimizer treats as compile-time constants.
    pub fn is_literal(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Number(_) | ExprKind::Bool(_) | ExprKind::TypeLit(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    /// Numeric literal (or a number folded at parse time)
    Number(Number),
    /// Boolean literal
    Bool(bool),
    /// Builtin type name used as a value: `Real`, `Any`, ...
    TypeLit(Type),
    /// Parenthesized expression; unwrapped by the optimizer unless a
    /// formatter needs the parens preserved
    Group(Box<Expr>),
    /// Unary negation: `-x`
    Neg(Box<Expr>),
    /// Logical not: `!x`
    Not(Box<Expr>),
    /// Binary operator application
    Binary(BinaryExpr),
    /// Vector literal: `[a, b, c]`
    Vector(Vec<Expr>),
    /// Variable reference
    Ident(String),
    /// `name = value` or `local name: T = value`
    Assign(AssignExpr),
    /// Function literal: `|a, b: Integer| => Real body`
    FuncDef(FuncDef),
    /// Call: `f(a, b)`; the callee is an arbitrary expression
    FuncCall(FuncCall),
    /// `{ e1 \n e2 \n ... }` with its own scope
    Block(Vec<Expr>),
    /// `if(c1) t1 elif(c2) t2 else e` — the else branch is mandatory
    If(IfExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    /// Type membership test: `x is Number`
    Is,
}

impl BinOp {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod | BinOp::Pow
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Is => "is",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignExpr {
    pub name: String,
    pub value: Box<Expr>,
    pub is_local: bool,
    /// Advisory annotation from `local name: T = ...`
    pub ty: Option<Type>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    /// Defaults to `Any` when the parameter carries no annotation.
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDef {
    pub params: Vec<Param>,
    pub body: Box<Expr>,
    pub return_type: Type,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncCall {
    pub callee: Box<Expr>,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondBranch {
    pub cond: Expr,
    pub then: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExpr {
    pub branches: Vec<CondBranch>,
    pub else_branch: Box<Expr>,
}
