//! Bracket-aware lexer for BMath source code.
//!
//! The lexer tracks every open `(`, `{`, `[`, and `if` with its position.
//! A line break inside an open construct becomes a [`TokenKind::Newline`];
//! at top level it becomes [`TokenKind::EndOfExpression`], which is what
//! lets the engine evaluate a script expression by expression and lets the
//! REPL detect that more input is needed: reaching end of input with the
//! stack non-empty raises `IncompleteInput` positioned at the earliest
//! unmatched opener.

use crate::compiler::tokens::{Token, TokenKind};
use bmath_core::error::{ErrorKind, EvalError};
use bmath_core::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    Paren,
    Brace,
    Bracket,
    If,
}

impl Opener {
    fn describe(&self) -> &'static str {
        match self {
            Opener::Paren => "'('",
            Opener::Brace => "'{'",
            Opener::Bracket => "'['",
            Opener::If => "'if'",
        }
    }
}

pub struct Lexer {
    source: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
    open_stack: Vec<(Opener, Position)>,
    keep_comments: bool,
    comments: Vec<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            open_stack: Vec::new(),
            keep_comments: false,
            comments: Vec::new(),
        }
    }

    /// Keep `#` comments (for the formatter); the interpreter pipeline
    /// discards them.
    pub fn with_comments(source: &str) -> Self {
        let mut lexer = Self::new(source);
        lexer.keep_comments = true;
        lexer
    }

    /// Comments collected so far, in source order.
    pub fn take_comments(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.comments)
    }

    fn current(&self) -> Option<char> {
        self.source.get(self.pos).copied()
    }

    fn peek(&self) -> Option<char> {
        self.source.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Collect the tokens of the next top-level expression, skipping blank
    /// lines. Returns None at clean end of input.
    pub fn next_expression(&mut self) -> Result<Option<Vec<Token>>, EvalError> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token()? {
                Some(token) => {
                    if token.kind == TokenKind::EndOfExpression {
                        if tokens.is_empty() {
                            continue;
                        }
                        return Ok(Some(tokens));
                    }
                    tokens.push(token);
                }
                None => {
                    if let Some((opener, position)) = self.open_stack.first() {
                        return Err(EvalError::at(
                            ErrorKind::IncompleteInput,
                            format!("unclosed {}", opener.describe()),
                            *position,
                        ));
                    }
                    if tokens.is_empty() {
                        return Ok(None);
                    }
                    return Ok(Some(tokens));
                }
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, EvalError> {
        loop {
            let Some(ch) = self.current() else {
                return Ok(None);
            };
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\\' => {
                    let position = self.position();
                    self.advance();
                    while self.current() == Some('\r') {
                        self.advance();
                    }
                    if !self.eat('\n') {
                        return Err(EvalError::at(
                            ErrorKind::IncompleteInput,
                            "'\\' must be followed by a line break",
                            position,
                        ));
                    }
                }
                '#' => {
                    let position = self.position();
                    self.advance();
                    let mut text = String::new();
                    while let Some(c) = self.current() {
                        if c == '\n' {
                            break;
                        }
                        text.push(c);
                        self.advance();
                    }
                    if self.keep_comments {
                        self.comments
                            .push(Token::new(TokenKind::Comment(text), position));
                    }
                }
                '\n' => {
                    let position = self.position();
                    self.advance();
                    let kind = if self.open_stack.is_empty() {
                        TokenKind::EndOfExpression
                    } else {
                        TokenKind::Newline
                    };
                    return Ok(Some(Token::new(kind, position)));
                }
                c if c.is_ascii_digit() => return self.read_number().map(Some),
                '.' if matches!(self.peek(), Some(d) if d.is_ascii_digit()) => {
                    return self.read_number().map(Some)
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    return Ok(Some(self.read_identifier()))
                }
                _ => return self.read_operator().map(Some),
            }
        }
    }

    fn read_number(&mut self) -> Result<Token, EvalError> {
        let position = self.position();
        let mut text = String::new();
        let mut is_real = false;

        while matches!(self.current(), Some(c) if c.is_ascii_digit()) {
            text.push(self.advance().unwrap());
        }
        if self.current() == Some('.') {
            if !matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                return Err(self.number_error(position, "expected a digit after '.'"));
            }
            is_real = true;
            text.push(self.advance().unwrap());
            while matches!(self.current(), Some(c) if c.is_ascii_digit()) {
                text.push(self.advance().unwrap());
            }
        }
        if matches!(self.current(), Some('e' | 'E')) {
            is_real = true;
            text.push(self.advance().unwrap());
            if matches!(self.current(), Some('+' | '-')) {
                text.push(self.advance().unwrap());
            }
            if !matches!(self.current(), Some(c) if c.is_ascii_digit()) {
                return Err(self.number_error(position, "expected a digit in the exponent"));
            }
            while matches!(self.current(), Some(c) if c.is_ascii_digit()) {
                text.push(self.advance().unwrap());
            }
        }
        // A second dot (as in 1.2.3) has no meaning here.
        if self.current() == Some('.') {
            return Err(self.number_error(position, "unexpected '.' after number"));
        }

        if matches!(self.current(), Some('i' | 'I')) {
            self.advance();
            let value: f64 = text
                .parse()
                .map_err(|_| self.number_error(position, "malformed imaginary literal"))?;
            return Ok(Token::new(TokenKind::Imaginary(value), position));
        }
        if is_real {
            let value: f64 = text
                .parse()
                .map_err(|_| self.number_error(position, "malformed number literal"))?;
            Ok(Token::new(TokenKind::Real(value), position))
        } else {
            let value: i64 = text
                .parse()
                .map_err(|_| self.number_error(position, "integer literal out of range"))?;
            Ok(Token::new(TokenKind::Int(value), position))
        }
    }

    fn number_error(&self, position: Position, message: &str) -> EvalError {
        EvalError::at(ErrorKind::InvalidNumberFormat, message, position)
    }

    fn read_identifier(&mut self) -> Token {
        let position = self.position();
        let mut id = String::new();
        while matches!(self.current(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            id.push(self.advance().unwrap());
        }
        let kind = match id.as_str() {
            "if" => {
                self.open_stack.push((Opener::If, position));
                TokenKind::If
            }
            "elif" => TokenKind::Elif,
            "else" => {
                // The final branch closes the `if` for continuation purposes.
                if matches!(self.open_stack.last(), Some((Opener::If, _))) {
                    self.open_stack.pop();
                }
                TokenKind::Else
            }
            "local" => TokenKind::Local,
            "is" => TokenKind::Is,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Ident(id),
        };
        Token::new(kind, position)
    }

    fn read_operator(&mut self) -> Result<Token, EvalError> {
        let position = self.position();
        let ch = self.advance().unwrap();
        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => {
                if self.eat('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            '%' => TokenKind::Percent,
            '=' => {
                if self.eat('=') {
                    TokenKind::Eq
                } else if self.eat('>') {
                    TokenKind::FatArrow
                } else {
                    TokenKind::Assign
                }
            }
            '!' => {
                if self.eat('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Bang
                }
            }
            '<' => {
                if self.eat('=') {
                    TokenKind::LtEq
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                if self.eat('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }
            '&' => TokenKind::Amp,
            '|' => TokenKind::Pipe,
            '(' => {
                self.open_stack.push((Opener::Paren, position));
                TokenKind::LParen
            }
            '{' => {
                self.open_stack.push((Opener::Brace, position));
                TokenKind::LBrace
            }
            '[' => {
                self.open_stack.push((Opener::Bracket, position));
                TokenKind::LBracket
            }
            ')' => {
                self.close(Opener::Paren, position, ')')?;
                TokenKind::RParen
            }
            '}' => {
                self.close(Opener::Brace, position, '}')?;
                TokenKind::RBrace
            }
            ']' => {
                self.close(Opener::Bracket, position, ']')?;
                TokenKind::RBracket
            }
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            other => {
                return Err(EvalError::at(
                    ErrorKind::UnexpectedCharacter,
                    format!("unexpected character '{}'", other),
                    position,
                ))
            }
        };
        Ok(Token::new(kind, position))
    }

    fn close(&mut self, expected: Opener, position: Position, ch: char) -> Result<(), EvalError> {
        match self.open_stack.last() {
            Some((opener, _)) if *opener == expected => {
                self.open_stack.pop();
                Ok(())
            }
            _ => Err(EvalError::at(
                ErrorKind::UnexpectedCharacter,
                format!("unmatched '{}'", ch),
                position,
            )),
        }
    }
}
