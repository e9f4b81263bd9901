use std::fmt;

use thiserror::Error;

use crate::ast::{Token, TokenKind};

/// Location in the source text. `offset` is a byte offset, `line` and
/// `column` are 1-based and count characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Resolves a byte offset into `input` to a line and column.
    pub fn locate(input: &str, offset: usize) -> Self {
        let offset = offset.min(input.len());
        let before = input.get(..offset).unwrap_or(input);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;

        Position {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at {position}")]
    UnexpectedCharacter { ch: char, position: Position },

    #[error("Unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    #[error("Malformed number at {position}: expected {expected}")]
    MalformedNumber {
        expected: &'static str,
        position: Position,
    },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::MalformedNumber { position, .. } => *position,
        }
    }
}

/// Splits `WHERE` expression text into tokens, lazily and in source order.
///
/// The lexer is an iterator; it stops after the first error.
pub struct Lexer<'src> {
    input: &'src str,
    position: usize,
    line: usize,
    column: usize,
    failed: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Lexer {
            input,
            position: 0,
            line: 1,
            column: 1,
            failed: false,
        }
    }

    /// Tokenizes the whole input.
    pub fn tokenize(input: &'src str) -> Result<Vec<Token<'src>>, LexError> {
        Lexer::new(input).collect()
    }

    pub fn source(&self) -> &'src str {
        self.input
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input[self.position..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    /// Position of the current character.
    fn here(&self) -> Position {
        Position {
            offset: self.position,
            line: self.line,
            column: self.column,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn token(&self, kind: TokenKind, start: Position) -> Token<'src> {
        Token {
            kind,
            text: &self.input[start.offset..self.position],
            position: start,
        }
    }

    fn read_identifier(&mut self) -> Token<'src> {
        let start = self.here();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.input[start.offset..self.position];
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Identifier);
        self.token(kind, start)
    }

    /// Reads a quoted string. The token keeps the quotes and the doubled
    /// `''` escapes; the parser unescapes.
    fn read_string(&mut self) -> Result<Token<'src>, LexError> {
        let start = self.here();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == '\'' {
                if self.current_char() == Some('\'') {
                    self.advance();
                } else {
                    return Ok(self.token(TokenKind::String, start));
                }
            }
        }

        Err(LexError::UnterminatedString {
            position: start,
        })
    }

    fn read_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn read_number(&mut self) -> Result<Token<'src>, LexError> {
        let start = self.here();
        self.read_digits();

        if self.current_char() == Some('.') {
            self.advance();
            if self.read_digits() == 0 {
                return Err(LexError::MalformedNumber {
                    expected: "digit",
                    position: self.here(),
                });
            }
        }

        // The literal has to be followed by whitespace, an operator or the end
        match self.current_char() {
            None => {}
            Some(ch) if ch.is_ascii_whitespace() || TokenKind::single_char(ch).is_some() => {}
            Some(_) => {
                return Err(LexError::MalformedNumber {
                    expected: "digit",
                    position: self.here(),
                });
            }
        }

        Ok(self.token(TokenKind::Number, start))
    }

    fn read_operator(&mut self, ch: char) -> Result<Token<'src>, LexError> {
        let start = self.here();

        let compound = match (ch, self.peek_char(1)) {
            ('<', Some('=')) => Some(TokenKind::LessOrEqual),
            ('<', Some('>')) => Some(TokenKind::NotEqual),
            ('>', Some('=')) => Some(TokenKind::GreaterOrEqual),
            _ => None,
        };

        if let Some(kind) = compound {
            self.advance();
            self.advance();
            return Ok(self.token(kind, start));
        }

        match TokenKind::single_char(ch) {
            Some(kind) => {
                self.advance();
                Ok(self.token(kind, start))
            }
            None => Err(LexError::UnexpectedCharacter {
                ch,
                position: start,
            }),
        }
    }

    /// Produces the next token, or `None` at the end of the input.
    pub fn next_token(&mut self) -> Option<Result<Token<'src>, LexError>> {
        if self.failed {
            return None;
        }

        self.skip_whitespace();

        let ch = self.current_char()?;
        let result = match ch {
            '\'' => self.read_string(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_alphabetic() || c == '_' => Ok(self.read_identifier()),
            c => self.read_operator(c),
        };

        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Result<Token<'src>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
fn kinds(input: &str) -> Vec<TokenKind> {
    Lexer::tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn test_keywords() {
    assert_eq!(
        kinds("and OR Is IN like NOT true False null CI"),
        vec![
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Is,
            TokenKind::In,
            TokenKind::Like,
            TokenKind::Not,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::Ci,
        ]
    );
}

#[test]
fn test_comparison() {
    assert_eq!(
        kinds("One<=2"),
        vec![TokenKind::Identifier, TokenKind::LessOrEqual, TokenKind::Number]
    );
}

#[test]
fn test_position_tracking() {
    let tokens = Lexer::tokenize("A = 1\n  and B = 'x'").unwrap();
    let and = tokens[3];
    assert_eq!(and.kind, TokenKind::And);
    assert_eq!(and.position.line, 2);
    assert_eq!(and.position.column, 3);
    assert_eq!(and.position.offset, 8);
}
