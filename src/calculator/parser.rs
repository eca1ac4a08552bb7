//! Tokenizer and recursive-descent parser for canonical expressions.
//!
//! The grammar is the arithmetic subset of a conventional expression
//! language:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := factor (('*' | '/') factor)*
//! factor  := ('+' | '-') factor | power
//! power   := primary ('**' factor)?
//! primary := NUMBER | NAME '(' args ')' | '(' expr ')'
//! ```
//!
//! `**` is right-associative and binds tighter than a sign on its left, so
//! `-2**2` is `-(2**2)`.

use super::ast::{BinaryOp, Expr, Function, UnaryOp};
use super::error::CalcError;
use std::fmt;

/// Maximum node count of a parsed expression, as measured by
/// [`Expr::node_count`].
pub const MAX_NODES: usize = 500;

/// Maximum nesting of groups, signs and powers while parsing.
pub const MAX_NESTING: usize = 200;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Name(name) => write!(f, "{}", name),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::DoubleStar => write!(f, "**"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '+' => Token::Plus,
            '-' => Token::Minus,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            '*' => {
                if chars.next_if(|&(_, c)| c == '*').is_some() {
                    Token::DoubleStar
                } else {
                    Token::Star
                }
            }
            '0'..='9' | '.' => {
                let mut end = start + c.len_utf8();
                let mut seen_dot = c == '.';
                while let Some((i, c)) =
                    chars.next_if(move |&(_, c)| c.is_ascii_digit() || (c == '.' && !seen_dot))
                {
                    seen_dot |= c == '.';
                    end = i + c.len_utf8();
                }
                let literal = &input[start..end];
                if literal == "." {
                    return Err(CalcError::syntax("invalid syntax: '.'"));
                }
                let value = literal
                    .parse::<f64>()
                    .map_err(|e| CalcError::syntax(format!("invalid number '{}': {}", literal, e)))?;
                Token::Number(value)
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some((i, c)) =
                    chars.next_if(|&(_, c)| c.is_alphanumeric() || c == '_')
                {
                    end = i + c.len_utf8();
                }
                Token::Name(input[start..end].to_string())
            }
            other => {
                return Err(CalcError::syntax(format!(
                    "invalid character '{}'",
                    other
                )));
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}

/// Parse a canonical expression into a syntax tree.
///
/// Fails with [`CalcError::TooComplex`] as soon as the tree would exceed
/// [`MAX_NODES`], so oversized trees are never built.
pub fn parse(input: &str) -> Result<Expr, CalcError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CalcError::syntax("empty expression"));
    }

    let mut parser = Parser::new(tokens);
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(CalcError::syntax(format!("unexpected '{}'", token))),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    nesting: usize,
    nodes: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            nesting: 0,
            // The expression root.
            nodes: 1,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), CalcError> {
        if self.eat(expected) {
            return Ok(());
        }
        Err(match self.peek() {
            Some(found) => CalcError::syntax(format!("expected '{}', found '{}'", expected, found)),
            None => CalcError::syntax(format!("expected '{}' at end of input", expected)),
        })
    }

    /// Account for the nodes `expr` adds to the tree.
    fn node(&mut self, expr: Expr) -> Result<Expr, CalcError> {
        self.nodes += expr.own_weight();
        if self.nodes > MAX_NODES {
            return Err(CalcError::TooComplex { max: MAX_NODES });
        }
        Ok(expr)
    }

    fn expr(&mut self) -> Result<Expr, CalcError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.term()?;
            left = self.node(Expr::binary(op, left, right))?;
        }
    }

    fn term(&mut self) -> Result<Expr, CalcError> {
        let mut left = self.factor()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.factor()?;
            left = self.node(Expr::binary(op, left, right))?;
        }
    }

    fn factor(&mut self) -> Result<Expr, CalcError> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(CalcError::syntax("too many nested parentheses"));
        }

        let result = match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.factor()
                    .and_then(|operand| self.node(Expr::unary(UnaryOp::Pos, operand)))
            }
            Some(Token::Minus) => {
                self.pos += 1;
                self.factor()
                    .and_then(|operand| self.node(Expr::unary(UnaryOp::Neg, operand)))
            }
            _ => self.power(),
        };

        self.nesting -= 1;
        result
    }

    fn power(&mut self) -> Result<Expr, CalcError> {
        let base = self.primary()?;
        if !self.eat(&Token::DoubleStar) {
            return Ok(base);
        }
        let exponent = self.factor()?;
        self.node(Expr::binary(BinaryOp::Pow, base, exponent))
    }

    fn primary(&mut self) -> Result<Expr, CalcError> {
        match self.advance() {
            Some(Token::Number(value)) => self.node(Expr::Number(value)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Name(name)) => self.call(name),
            Some(token) => Err(CalcError::syntax(format!("unexpected '{}'", token))),
            None => Err(CalcError::syntax("unexpected end of input")),
        }
    }

    fn call(&mut self, name: String) -> Result<Expr, CalcError> {
        if !self.eat(&Token::LParen) {
            return Err(CalcError::syntax("Unsafe syntax detected"));
        }

        let mut arguments = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                arguments.push(self.expr()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(&Token::RParen)?;
                break;
            }
        }

        let function = Function::from_name(&name)
            .ok_or_else(|| CalcError::syntax(format!("Unknown function: {}", name)))?;
        let argument = match <[Expr; 1]>::try_from(arguments) {
            Ok([argument]) => argument,
            Err(_) => return Err(CalcError::syntax("One argument required")),
        };
        self.node(Expr::call(function, argument))
    }
}
