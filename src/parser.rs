use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    ast::{BinaryOperator, Constant, Expr, Token, TokenKind, UnaryOperator},
    lexer::{LexError, Lexer, Position},
};

/// Errors raised while turning expression text into an [`Expr`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text could not be split into tokens
    #[error("Lexical error: {0}")]
    Lex(#[from] LexError),

    /// The tokens do not match any production at `position`
    #[error("Syntax error at {position}: expected {expected}, found {found}")]
    Syntax {
        expected: &'static str,
        found: String,
        position: Position,
    },

    /// A numeric literal that does not fit a decimal
    #[error(
        "Invalid number '{literal}' at {position}: the numeric literal does not fit a decimal"
    )]
    InvalidNumber { literal: String, position: Position },

    /// The expression nests deeper than [`MAX_DEPTH`]
    #[error("Expression at {position} nests deeper than {limit} levels")]
    TooDeep { limit: usize, position: Position },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::Syntax { position, .. }
            | ParseError::InvalidNumber { position, .. }
            | ParseError::TooDeep { position, .. } => *position,
        }
    }
}

/// Deepest tree the parser builds. Each term of an `and`/`or` chain and
/// each comparison in a chain adds a level, as do `not` and `is null`.
/// Parentheses may also nest at most this deep.
pub const MAX_DEPTH: usize = 256;

/// Parses a `WHERE` expression.
///
/// # Examples
///
/// ```
/// use sqlexpr::{parse_where, Expr};
///
/// let expr = parse_where("One = 1 and Two is null").unwrap();
/// assert!(expr.is_connective());
/// ```
pub fn parse_where(text: &str) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(Lexer::new(text))?;
    parser.parse()
}

/// Recursive descent parser for `WHERE` expressions.
///
/// Each layer binds looser than the one it calls:
/// connectives → comparison → operand → factor → item.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token<'src>>,
    current: usize,
    /// Height of the expression most recently returned by a parse layer
    height: usize,
    /// Open parentheses around the current token
    nesting: usize,
}

impl<'src> Parser<'src> {
    pub fn new(lexer: Lexer<'src>) -> Result<Self, ParseError> {
        let source = lexer.source();
        let tokens = lexer.collect::<Result<Vec<_>, _>>()?;
        trace!(count = tokens.len(), "tokenized expression");

        Ok(Parser {
            source,
            tokens,
            current: 0,
            height: 0,
            nesting: 0,
        })
    }

    fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.current + offset).map(|t| t.kind)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind(0) == Some(kind)
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.current).copied();
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    fn error(&self, expected: &'static str) -> ParseError {
        match self.tokens.get(self.current) {
            Some(token) => ParseError::Syntax {
                expected,
                found: format!("`{}`", token.text),
                position: token.position,
            },
            None => ParseError::Syntax {
                expected,
                found: "end of input".to_string(),
                position: Position::locate(self.source, self.source.len()),
            },
        }
    }

    fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
    ) -> Result<Token<'src>, ParseError> {
        if self.check(kind) {
            // check() guarantees a token is present
            self.advance().ok_or_else(|| self.error(expected))
        } else {
            Err(self.error(expected))
        }
    }

    /// Height of a node over a child of height `child`.
    fn deeper(&self, child: usize) -> Result<usize, ParseError> {
        if child >= MAX_DEPTH {
            return Err(self.too_deep());
        }
        Ok(child + 1)
    }

    fn too_deep(&self) -> ParseError {
        let position = match self.tokens.get(self.current.saturating_sub(1)) {
            Some(token) => token.position,
            None => Position::locate(self.source, self.source.len()),
        };
        ParseError::TooDeep {
            limit: MAX_DEPTH,
            position,
        }
    }

    /// Parses one complete expression; trailing tokens are an error.
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if self.current < self.tokens.len() {
            return Err(self.error("end of input"));
        }

        debug!(expression = %expr, "parsed where expression");
        Ok(expr)
    }

    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_connectives()
    }

    /// `and` and `or` share one precedence level and fold left to right.
    fn parse_connectives(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        let mut height = self.height;

        loop {
            let op = match self.peek_kind(0) {
                Some(TokenKind::And) => BinaryOperator::And,
                Some(TokenKind::Or) => BinaryOperator::Or,
                _ => break,
            };

            self.advance();
            let right = self.parse_comparison()?;
            height = self.deeper(height.max(self.height))?;
            left = Expr::binary(op, left, right);
        }

        self.height = height;
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_operand()?;
        let mut height = self.height;

        while let Some(op) = self.comparison_operator() {
            let right = self.parse_operand()?;
            height = self.deeper(height.max(self.height))?;
            left = Expr::binary(op, left, right);
        }

        self.height = height;
        Ok(left)
    }

    /// Consumes a comparison operator if one is next. Two-keyword forms are
    /// tried first; a lone `not` is left in place.
    fn comparison_operator(&mut self) -> Option<BinaryOperator> {
        let (op, width) = match self.peek_kind(0)? {
            TokenKind::Not => match self.peek_kind(1)? {
                TokenKind::Like => (BinaryOperator::NotLike, 2),
                TokenKind::In => (BinaryOperator::NotIn, 2),
                _ => return None,
            },
            TokenKind::Like => (BinaryOperator::Like, 1),
            TokenKind::In => (BinaryOperator::In, 1),
            TokenKind::LessOrEqual => (BinaryOperator::LessOrEqual, 1),
            TokenKind::NotEqual => (BinaryOperator::NotEqual, 1),
            TokenKind::LessThan => (BinaryOperator::LessThan, 1),
            TokenKind::GreaterOrEqual => (BinaryOperator::GreaterOrEqual, 1),
            TokenKind::GreaterThan => (BinaryOperator::GreaterThan, 1),
            TokenKind::Equal => (BinaryOperator::Equal, 1),
            _ => return None,
        };

        self.current += width;
        Some(op)
    }

    /// `[not] factor [is null | is not null]`
    fn parse_operand(&mut self) -> Result<Expr, ParseError> {
        let operand = if self.check(TokenKind::Not) {
            self.advance();
            let factor = self.parse_factor()?;
            self.height = self.deeper(self.height)?;
            Expr::unary(UnaryOperator::Not, factor)
        } else {
            self.parse_factor()?
        };

        if !self.check(TokenKind::Is) {
            return Ok(operand);
        }
        self.advance(); // consume `is`

        self.height = self.deeper(self.height)?;
        if self.check(TokenKind::Null) {
            self.advance();
            return Ok(Expr::unary(UnaryOperator::IsNull, operand));
        }

        if self.check(TokenKind::Not) {
            self.advance();
            self.expect(TokenKind::Null, "`null`")?;
            return Ok(Expr::unary(UnaryOperator::IsNotNull, operand));
        }

        Err(self.error("`null` or `not null`"))
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::LParen) {
            self.advance();
            if self.nesting >= MAX_DEPTH {
                return Err(self.too_deep());
            }
            self.nesting += 1;
            let expr = self.parse_expression()?;
            self.nesting -= 1;
            self.expect(TokenKind::RParen, "`)`")?;
            return Ok(expr);
        }

        let item = self.parse_item()?;
        self.height = 1;
        Ok(item)
    }

    /// Literal, property, or bracketed literal array.
    fn parse_item(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind(0) {
            Some(TokenKind::Identifier) => {
                let token = self.advance().ok_or_else(|| self.error("property"))?;
                Ok(Expr::Property(token.text.to_string()))
            }
            Some(TokenKind::LBracket) => {
                self.advance();
                self.parse_array()
            }
            _ => match self.parse_literal("expression")? {
                Some(constant) => Ok(Expr::Constant(constant)),
                None => Err(self.error("expression")),
            },
        }
    }

    /// At least one literal, comma separated, closed by `]`.
    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        let mut elements = Vec::new();

        loop {
            match self.parse_literal("literal")? {
                Some(constant) => elements.push(constant),
                None => return Err(self.error("literal")),
            }

            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }

        self.expect(TokenKind::RBracket, "`,` or `]`")?;
        Ok(Expr::Array(elements))
    }

    /// Parses a literal if one is next; `Ok(None)` leaves the token in place.
    fn parse_literal(&mut self, expected: &'static str) -> Result<Option<Constant>, ParseError> {
        let constant = match self.peek_kind(0) {
            Some(TokenKind::String) => {
                let token = self.advance().ok_or_else(|| self.error(expected))?;
                Constant::Str(unquote(token.text))
            }
            Some(TokenKind::Number) => {
                let token = self.advance().ok_or_else(|| self.error(expected))?;
                let number = Decimal::from_str_exact(token.text).map_err(|_| {
                    ParseError::InvalidNumber {
                        literal: token.text.to_string(),
                        position: token.position,
                    }
                })?;
                Constant::Number(number)
            }
            Some(TokenKind::True) => {
                self.advance();
                Constant::Bool(true)
            }
            Some(TokenKind::False) => {
                self.advance();
                Constant::Bool(false)
            }
            Some(TokenKind::Null) => {
                self.advance();
                Constant::Null
            }
            _ => return Ok(None),
        };
        Ok(Some(constant))
    }
}

/// Strips the surrounding quotes and collapses `''` escapes.
fn unquote(text: &str) -> String {
    let inner = text
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(text);
    inner.replace("''", "'")
}
