use bmath_core::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token types for the BMath language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Real(f64),
    /// Pure-imaginary literal: `2i`, `1.5I`
    Imaginary(f64),
    True,
    False,

    // Identifiers and keywords
    Ident(String),
    If,
    Elif,
    Else,
    Local,
    Is,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,   // ^
    Percent, // %
    Assign,  // =
    Eq,      // ==
    NotEq,   // !=
    Lt,      // <
    LtEq,    // <=
    Gt,      // >
    GtEq,    // >=
    Amp,     // & logical and
    Pipe,    // | logical or, and function-literal delimiter
    Bang,    // !
    Arrow,   // -> chain
    FatArrow, // => return-type marker

    // Delimiters
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,

    // Structure
    /// Line break inside an open bracket or `if`; expressions continue
    Newline,
    /// Line break at top level; terminates the current expression
    EndOfExpression,
    /// `# ...` — only produced when the lexer keeps comments for tools
    Comment(String),
}

/// Dense index for the Pratt dispatch table; one slot per token kind,
/// payloads ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenTag {
    Int,
    Real,
    Imaginary,
    True,
    False,
    Ident,
    If,
    Elif,
    Else,
    Local,
    Is,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,
    Assign,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Amp,
    Pipe,
    Bang,
    Arrow,
    FatArrow,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Newline,
    EndOfExpression,
    Comment,
}

pub const TOKEN_TAG_COUNT: usize = TokenTag::Comment as usize + 1;

impl TokenKind {
    pub fn tag(&self) -> TokenTag {
        match self {
            TokenKind::Int(_) => TokenTag::Int,
            TokenKind::Real(_) => TokenTag::Real,
            TokenKind::Imaginary(_) => TokenTag::Imaginary,
            TokenKind::True => TokenTag::True,
            TokenKind::False => TokenTag::False,
            TokenKind::Ident(_) => TokenTag::Ident,
            TokenKind::If => TokenTag::If,
            TokenKind::Elif => TokenTag::Elif,
            TokenKind::Else => TokenTag::Else,
            TokenKind::Local => TokenTag::Local,
            TokenKind::Is => TokenTag::Is,
            TokenKind::Plus => TokenTag::Plus,
            TokenKind::Minus => TokenTag::Minus,
            TokenKind::Star => TokenTag::Star,
            TokenKind::Slash => TokenTag::Slash,
            TokenKind::Caret => TokenTag::Caret,
            TokenKind::Percent => TokenTag::Percent,
            TokenKind::Assign => TokenTag::Assign,
            TokenKind::Eq => TokenTag::Eq,
            TokenKind::NotEq => TokenTag::NotEq,
            TokenKind::Lt => TokenTag::Lt,
            TokenKind::LtEq => TokenTag::LtEq,
            TokenKind::Gt => TokenTag::Gt,
            TokenKind::GtEq => TokenTag::GtEq,
            TokenKind::Amp => TokenTag::Amp,
            TokenKind::Pipe => TokenTag::Pipe,
            TokenKind::Bang => TokenTag::Bang,
            TokenKind::Arrow => TokenTag::Arrow,
            TokenKind::FatArrow => TokenTag::FatArrow,
            TokenKind::LParen => TokenTag::LParen,
            TokenKind::RParen => TokenTag::RParen,
            TokenKind::LBrace => TokenTag::LBrace,
            TokenKind::RBrace => TokenTag::RBrace,
            TokenKind::LBracket => TokenTag::LBracket,
            TokenKind::RBracket => TokenTag::RBracket,
            TokenKind::Comma => TokenTag::Comma,
            TokenKind::Colon => TokenTag::Colon,
            TokenKind::Newline => TokenTag::Newline,
            TokenKind::EndOfExpression => TokenTag::EndOfExpression,
            TokenKind::Comment(_) => TokenTag::Comment,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "{}", n),
            TokenKind::Real(r) => write!(f, "{}", r),
            TokenKind::Imaginary(v) => write!(f, "{}i", v),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::Ident(s) => write!(f, "{}", s),
            TokenKind::If => write!(f, "if"),
            TokenKind::Elif => write!(f, "elif"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::Local => write!(f, "local"),
            TokenKind::Is => write!(f, "is"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Caret => write!(f, "^"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Assign => write!(f, "="),
            TokenKind::Eq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::Amp => write!(f, "&"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Bang => write!(f, "!"),
            TokenKind::Arrow => write!(f, "->"),
            TokenKind::FatArrow => write!(f, "=>"),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::EndOfExpression => write!(f, "end of expression"),
            TokenKind::Comment(s) => write!(f, "#{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self { kind, position }
    }
}
