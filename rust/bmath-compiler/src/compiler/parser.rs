//! Pratt parser for BMath.
//!
//! Dispatch is table-driven: one [`Rule`] per token kind in a fixed array
//! indexed by [`TokenTag`], each entry holding a precedence plus optional
//! prefix and infix handlers. The table is a compile-time constant, so the
//! hot path is two array loads per token. Each call to [`Parser::parse`]
//! consumes exactly one expression's tokens; anything left over is an
//! `UnexpectedToken` error.

use crate::compiler::optimizer::Optimizer;
use crate::compiler::tokens::{Token, TokenKind, TokenTag, TOKEN_TAG_COUNT};
use bmath_core::ast::{
    AssignExpr, BinOp, BinaryExpr, CondBranch, Expr, ExprKind, FuncCall, FuncDef, IfExpr, Param,
};
use bmath_core::error::{ErrorKind, EvalError};
use bmath_core::number::Number;
use bmath_core::position::Position;
use bmath_core::types::Type;

// Precedence levels, higher binds tighter.
const PREC_ASSIGN: u8 = 5;
const PREC_OR: u8 = 15;
const PREC_AND: u8 = 20;
const PREC_EQUALITY: u8 = 25;
const PREC_ORDER: u8 = 30;
const PREC_TERM: u8 = 40;
const PREC_FACTOR: u8 = 50;
const PREC_UNARY: u8 = 55;
const PREC_POW: u8 = 60;
const PREC_CHAIN: u8 = 75;
const PREC_CALL: u8 = 80;

type PrefixFn = fn(&mut Parser, Token) -> Result<Expr, EvalError>;
type InfixFn = fn(&mut Parser, Expr, Token) -> Result<Expr, EvalError>;

#[derive(Clone, Copy)]
struct Rule {
    precedence: u8,
    prefix: Option<PrefixFn>,
    infix: Option<InfixFn>,
}

const NO_RULE: Rule = Rule {
    precedence: 0,
    prefix: None,
    infix: None,
};

const fn prefix(f: PrefixFn) -> Rule {
    Rule {
        precedence: 0,
        prefix: Some(f),
        infix: None,
    }
}

const fn infix(precedence: u8, f: InfixFn) -> Rule {
    Rule {
        precedence,
        prefix: None,
        infix: Some(f),
    }
}

const fn both(precedence: u8, p: PrefixFn, i: InfixFn) -> Rule {
    Rule {
        precedence,
        prefix: Some(p),
        infix: Some(i),
    }
}

const fn build_rules() -> [Rule; TOKEN_TAG_COUNT] {
    let mut t = [NO_RULE; TOKEN_TAG_COUNT];
    t[TokenTag::Int as usize] = prefix(Parser::parse_number);
    t[TokenTag::Real as usize] = prefix(Parser::parse_number);
    t[TokenTag::Imaginary as usize] = prefix(Parser::parse_number);
    t[TokenTag::True as usize] = prefix(Parser::parse_bool);
    t[TokenTag::False as usize] = prefix(Parser::parse_bool);
    t[TokenTag::Ident as usize] = prefix(Parser::parse_ident);
    t[TokenTag::If as usize] = prefix(Parser::parse_if);
    t[TokenTag::Local as usize] = prefix(Parser::parse_local);
    t[TokenTag::LParen as usize] = both(PREC_CALL, Parser::parse_group, Parser::parse_call);
    t[TokenTag::LBracket as usize] = prefix(Parser::parse_vector);
    t[TokenTag::LBrace as usize] = prefix(Parser::parse_block);
    t[TokenTag::Minus as usize] = both(PREC_TERM, Parser::parse_neg, Parser::parse_binary);
    t[TokenTag::Bang as usize] = prefix(Parser::parse_not);
    t[TokenTag::Pipe as usize] = both(PREC_OR, Parser::parse_func_literal, Parser::parse_binary);
    t[TokenTag::Plus as usize] = infix(PREC_TERM, Parser::parse_binary);
    t[TokenTag::Star as usize] = infix(PREC_FACTOR, Parser::parse_binary);
    t[TokenTag::Slash as usize] = infix(PREC_FACTOR, Parser::parse_binary);
    t[TokenTag::Percent as usize] = infix(PREC_FACTOR, Parser::parse_binary);
    t[TokenTag::Caret as usize] = infix(PREC_POW, Parser::parse_binary);
    t[TokenTag::Lt as usize] = infix(PREC_ORDER, Parser::parse_binary);
    t[TokenTag::LtEq as usize] = infix(PREC_ORDER, Parser::parse_binary);
    t[TokenTag::Gt as usize] = infix(PREC_ORDER, Parser::parse_binary);
    t[TokenTag::GtEq as usize] = infix(PREC_ORDER, Parser::parse_binary);
    t[TokenTag::Eq as usize] = infix(PREC_EQUALITY, Parser::parse_binary);
    t[TokenTag::NotEq as usize] = infix(PREC_EQUALITY, Parser::parse_binary);
    t[TokenTag::Is as usize] = infix(PREC_EQUALITY, Parser::parse_binary);
    t[TokenTag::Amp as usize] = infix(PREC_AND, Parser::parse_binary);
    t[TokenTag::Arrow as usize] = infix(PREC_CHAIN, Parser::parse_chain);
    t[TokenTag::Assign as usize] = infix(PREC_ASSIGN, Parser::parse_assign);
    t
}

static RULES: [Rule; TOKEN_TAG_COUNT] = build_rules();

fn rule_for(kind: &TokenKind) -> Rule {
    RULES[kind.tag() as usize]
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    last_position: Position,
    optimizer: Optimizer,
}

impl Parser {
    /// Parse one expression from the given token slice (as produced by
    /// `Lexer::next_expression`).
    pub fn parse(tokens: Vec<Token>, optimizer: Optimizer) -> Result<Expr, EvalError> {
        let last_position = tokens
            .last()
            .map(|t| t.position)
            .unwrap_or_else(Position::start);
        let mut parser = Parser {
            tokens,
            pos: 0,
            last_position,
            optimizer,
        };
        parser.skip_newlines();
        let expr = parser.parse_expr(0)?;
        parser.skip_newlines();
        if let Some(token) = parser.peek() {
            return Err(EvalError::at(
                ErrorKind::UnexpectedToken,
                format!("unexpected token '{}'", token.kind),
                token.position,
            ));
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned()?;
        self.pos += 1;
        self.last_position = token.position;
        Some(token)
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek_kind(), Some(TokenKind::Newline)) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<Token, EvalError> {
        match self.peek() {
            Some(token) if token.kind == *expected => Ok(self.advance().unwrap()),
            Some(token) => Err(EvalError::at(
                ErrorKind::MissingToken,
                format!("expected '{}', found '{}'", expected, token.kind),
                token.position,
            )),
            None => Err(EvalError::at(
                ErrorKind::MissingToken,
                format!("expected '{}', found end of input", expected),
                self.last_position,
            )),
        }
    }

    fn parse_expr(&mut self, min_prec: u8) -> Result<Expr, EvalError> {
        let token = self.advance().ok_or_else(|| {
            EvalError::at(
                ErrorKind::MissingToken,
                "expected an expression",
                self.last_position,
            )
        })?;
        let rule = rule_for(&token.kind);
        let prefix = rule.prefix.ok_or_else(|| {
            EvalError::at(
                ErrorKind::UnexpectedToken,
                format!("'{}' cannot start an expression", token.kind),
                token.position,
            )
        })?;
        let mut left = prefix(self, token)?;

        loop {
            let Some(next) = self.peek() else { break };
            let rule = rule_for(&next.kind);
            let Some(infix) = rule.infix else { break };
            if rule.precedence <= min_prec {
                break;
            }
            let token = self.advance().unwrap();
            left = infix(self, left, token)?;
        }
        Ok(left)
    }

    // ── Prefix handlers ──

    fn parse_number(&mut self, token: Token) -> Result<Expr, EvalError> {
        let n = match token.kind {
            TokenKind::Int(v) => Number::Int(v),
            TokenKind::Real(v) => Number::Real(v),
            TokenKind::Imaginary(v) => Number::complex(0.0, v),
            _ => unreachable!(),
        };
        Ok(Expr::number(n, token.position))
    }

    fn parse_bool(&mut self, token: Token) -> Result<Expr, EvalError> {
        Ok(Expr::boolean(token.kind == TokenKind::True, token.position))
    }

    fn parse_ident(&mut self, token: Token) -> Result<Expr, EvalError> {
        let TokenKind::Ident(name) = token.kind else {
            unreachable!()
        };
        let kind = match Type::from_name(&name) {
            Some(ty) => ExprKind::TypeLit(ty),
            None => ExprKind::Ident(name),
        };
        Ok(Expr::new(kind, token.position))
    }

    fn parse_group(&mut self, token: Token) -> Result<Expr, EvalError> {
        self.skip_newlines();
        let inner = self.parse_expr(0)?;
        self.skip_newlines();
        self.expect(&TokenKind::RParen)?;
        self.optimizer
            .fold(Expr::new(ExprKind::Group(Box::new(inner)), token.position))
    }

    fn parse_vector(&mut self, token: Token) -> Result<Expr, EvalError> {
        let mut items = Vec::new();
        self.skip_newlines();
        if matches!(self.peek_kind(), Some(TokenKind::RBracket)) {
            self.advance();
            return Ok(Expr::new(ExprKind::Vector(items), token.position));
        }
        loop {
            items.push(self.parse_expr(0)?);
            self.skip_newlines();
            match self.peek_kind() {
                Some(TokenKind::Comma) => {
                    self.advance();
                    self.skip_newlines();
                }
                Some(TokenKind::RBracket) => {
                    self.advance();
                    break;
                }
                _ => {
                    self.expect(&TokenKind::RBracket)?;
                }
            }
        }
        Ok(Expr::new(ExprKind::Vector(items), token.position))
    }

    fn parse_block(&mut self, token: Token) -> Result<Expr, EvalError> {
        let mut exprs = Vec::new();
        self.skip_newlines();
        if matches!(self.peek_kind(), Some(TokenKind::RBrace)) {
            let brace = self.advance().unwrap();
            return Err(EvalError::at(
                ErrorKind::InvalidExpression,
                "a block must contain at least one expression",
                brace.position,
            ));
        }
        loop {
            exprs.push(self.parse_expr(0)?);
            match self.peek_kind() {
                Some(TokenKind::RBrace) => {
                    self.advance();
                    break;
                }
                Some(TokenKind::Newline) => {
                    self.skip_newlines();
                    if matches!(self.peek_kind(), Some(TokenKind::RBrace)) {
                        self.advance();
                        break;
                    }
                }
                _ => {
                    self.expect(&TokenKind::RBrace)?;
                }
            }
        }
        Ok(Expr::new(ExprKind::Block(exprs), token.position))
    }

    fn parse_func_literal(&mut self, token: Token) -> Result<Expr, EvalError> {
        let mut params = Vec::new();
        if matches!(self.peek_kind(), Some(TokenKind::Pipe)) {
            self.advance();
        } else {
            loop {
                let name = self.expect_ident("parameter name")?;
                let ty = if matches!(self.peek_kind(), Some(TokenKind::Colon)) {
                    self.advance();
                    self.expect_type_name()?
                } else {
                    Type::any()
                };
                params.push(Param { name, ty });
                match self.peek_kind() {
                    Some(TokenKind::Comma) => {
                        self.advance();
                    }
                    Some(TokenKind::Pipe) => {
                        self.advance();
                        break;
                    }
                    _ => {
                        self.expect(&TokenKind::Pipe)?;
                    }
                }
            }
        }
        let return_type = if matches!(self.peek_kind(), Some(TokenKind::FatArrow)) {
            self.advance();
            self.expect_type_name()?
        } else {
            Type::any()
        };
        let body = self.parse_expr(0)?;
        Ok(Expr::new(
            ExprKind::FuncDef(FuncDef {
                params,
                body: Box::new(body),
                return_type,
            }),
            token.position,
        ))
    }

    fn parse_if(&mut self, token: Token) -> Result<Expr, EvalError> {
        let mut branches = Vec::new();
        branches.push(self.parse_cond_branch()?);
        loop {
            self.skip_newlines();
            match self.peek_kind() {
                Some(TokenKind::Elif) => {
                    self.advance();
                    branches.push(self.parse_cond_branch()?);
                }
                Some(TokenKind::Else) => {
                    self.advance();
                    self.skip_newlines();
                    let else_branch = self.parse_expr(0)?;
                    return self.optimizer.fold(Expr::new(
                        ExprKind::If(IfExpr {
                            branches,
                            else_branch: Box::new(else_branch),
                        }),
                        token.position,
                    ));
                }
                _ => {
                    return Err(EvalError::at(
                        ErrorKind::MissingToken,
                        "expected 'elif' or 'else'; the else branch is mandatory",
                        self.peek()
                            .map(|t| t.position)
                            .unwrap_or(self.last_position),
                    ))
                }
            }
        }
    }

    fn parse_cond_branch(&mut self) -> Result<CondBranch, EvalError> {
        self.skip_newlines();
        self.expect(&TokenKind::LParen)?;
        self.skip_newlines();
        let cond = self.parse_expr(0)?;
        self.skip_newlines();
        self.expect(&TokenKind::RParen)?;
        self.skip_newlines();
        let then = self.parse_expr(0)?;
        Ok(CondBranch { cond, then })
    }

    fn parse_neg(&mut self, token: Token) -> Result<Expr, EvalError> {
        let operand = self.parse_expr(PREC_UNARY)?;
        self.optimizer
            .fold(Expr::new(ExprKind::Neg(Box::new(operand)), token.position))
    }

    fn parse_not(&mut self, token: Token) -> Result<Expr, EvalError> {
        let operand = self.parse_expr(PREC_UNARY)?;
        self.optimizer
            .fold(Expr::new(ExprKind::Not(Box::new(operand)), token.position))
    }

    fn parse_local(&mut self, token: Token) -> Result<Expr, EvalError> {
        let name = self.expect_ident("variable name after 'local'")?;
        let ty = if matches!(self.peek_kind(), Some(TokenKind::Colon)) {
            self.advance();
            Some(self.expect_type_name()?)
        } else {
            None
        };
        self.expect(&TokenKind::Assign)?;
        self.skip_newlines();
        let value = self.parse_expr(PREC_ASSIGN - 1)?;
        Ok(Expr::new(
            ExprKind::Assign(AssignExpr {
                name,
                value: Box::new(value),
                is_local: true,
                ty,
            }),
            token.position,
        ))
    }

    // ── Infix handlers ──

    fn parse_binary(&mut self, left: Expr, token: Token) -> Result<Expr, EvalError> {
        let op = match token.kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::Percent => BinOp::Mod,
            TokenKind::Caret => BinOp::Pow,
            TokenKind::Eq => BinOp::Eq,
            TokenKind::NotEq => BinOp::Ne,
            TokenKind::Lt => BinOp::Lt,
            TokenKind::LtEq => BinOp::Le,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::GtEq => BinOp::Ge,
            TokenKind::Amp => BinOp::And,
            TokenKind::Pipe => BinOp::Or,
            TokenKind::Is => BinOp::Is,
            _ => unreachable!(),
        };
        let precedence = rule_for(&token.kind).precedence;
        // Power is right-associative; everything else is left-associative.
        let min_prec = if op == BinOp::Pow {
            precedence - 1
        } else {
            precedence
        };
        self.skip_newlines();
        let right = self.parse_expr(min_prec)?;
        self.optimizer.fold(Expr::new(
            ExprKind::Binary(BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
            }),
            token.position,
        ))
    }

    fn parse_call(&mut self, left: Expr, token: Token) -> Result<Expr, EvalError> {
        let mut args = Vec::new();
        self.skip_newlines();
        if matches!(self.peek_kind(), Some(TokenKind::RParen)) {
            self.advance();
        } else {
            loop {
                args.push(self.parse_expr(0)?);
                self.skip_newlines();
                match self.peek_kind() {
                    Some(TokenKind::Comma) => {
                        self.advance();
                        self.skip_newlines();
                    }
                    Some(TokenKind::RParen) => {
                        self.advance();
                        break;
                    }
                    _ => {
                        self.expect(&TokenKind::RParen)?;
                    }
                }
            }
        }
        Ok(Expr::new(
            ExprKind::FuncCall(FuncCall {
                callee: Box::new(left),
                args,
            }),
            token.position,
        ))
    }

    /// `x -> f(a)` calls `f(x, a)`; `x -> g` calls `g(x)`.
    fn parse_chain(&mut self, left: Expr, token: Token) -> Result<Expr, EvalError> {
        let right = self.parse_expr(PREC_CHAIN)?;
        let call = match right.kind {
            ExprKind::FuncCall(FuncCall { callee, mut args }) => {
                args.insert(0, left);
                FuncCall { callee, args }
            }
            _ => FuncCall {
                callee: Box::new(right),
                args: vec![left],
            },
        };
        Ok(Expr::new(ExprKind::FuncCall(call), token.position))
    }

    fn parse_assign(&mut self, left: Expr, token: Token) -> Result<Expr, EvalError> {
        let ExprKind::Ident(name) = left.kind else {
            return Err(EvalError::at(
                ErrorKind::InvalidExpression,
                "only a name can be assigned to",
                left.position,
            ));
        };
        self.skip_newlines();
        let value = self.parse_expr(PREC_ASSIGN - 1)?;
        Ok(Expr::new(
            ExprKind::Assign(AssignExpr {
                name,
                value: Box::new(value),
                is_local: false,
                ty: None,
            }),
            left.position,
        ))
    }

    // ── Small helpers ──

    fn expect_ident(&mut self, what: &str) -> Result<String, EvalError> {
        match self.peek_kind() {
            Some(TokenKind::Ident(_)) => {
                let token = self.advance().unwrap();
                match token.kind {
                    TokenKind::Ident(name) => Ok(name),
                    _ => unreachable!(),
                }
            }
            _ => Err(EvalError::at(
                ErrorKind::MissingToken,
                format!("expected {}", what),
                self.peek()
                    .map(|t| t.position)
                    .unwrap_or(self.last_position),
            )),
        }
    }

    fn expect_type_name(&mut self) -> Result<Type, EvalError> {
        let position = self
            .peek()
            .map(|t| t.position)
            .unwrap_or(self.last_position);
        let name = self.expect_ident("a type name")?;
        Type::from_name(&name).ok_or_else(|| {
            EvalError::at(
                ErrorKind::InvalidExpression,
                format!("unknown type '{}'", name),
                position,
            )
        })
    }
}
