use std::fmt;

use crate::lexer::Position;

/// A classified slice of the source text.
///
/// Tokens borrow from the expression being parsed, so they only live as long
/// as a single parse call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    /// The exact source text of the token, quotes included for strings.
    pub text: &'src str,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals and names
    /// Field name
    ///
    /// Must start with a letter or underscore, followed by letters, digits, or underscores.
    ///
    /// # Examples
    /// ```text
    /// OrderNo
    /// order_date
    /// _internal
    /// ```
    Identifier,

    /// Single-quoted string, `''` escapes a quote
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// 'O''Brien'
    /// ```
    String,

    /// Unsigned number with an optional fractional part
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 4533.10
    /// ```
    Number,

    // Delimiters
    Comma,
    LBracket,
    RBracket,
    LParen,
    RParen,

    // Operators
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
    Equal,
    NotEqual,

    // Keywords, matched case-insensitively
    And,
    Is,
    Like,
    Not,
    Or,
    True,
    False,
    Null,
    In,
    /// Reserved, no production accepts it
    Ci,
}

impl TokenKind {
    /// Looks up a keyword, ignoring case.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        const KEYWORDS: [(&str, TokenKind); 10] = [
            ("and", TokenKind::And),
            ("is", TokenKind::Is),
            ("in", TokenKind::In),
            ("like", TokenKind::Like),
            ("not", TokenKind::Not),
            ("or", TokenKind::Or),
            ("true", TokenKind::True),
            ("false", TokenKind::False),
            ("null", TokenKind::Null),
            ("ci", TokenKind::Ci),
        ];

        KEYWORDS
            .iter()
            .find(|(text, _)| text.eq_ignore_ascii_case(ident))
            .map(|(_, kind)| *kind)
    }

    /// Single-character operators and punctuation. These also terminate a
    /// numeric literal.
    pub fn single_char(ch: char) -> Option<TokenKind> {
        match ch {
            '<' => Some(TokenKind::LessThan),
            '>' => Some(TokenKind::GreaterThan),
            '=' => Some(TokenKind::Equal),
            ',' => Some(TokenKind::Comma),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::String => write!(f, "string"),
            TokenKind::Number => write!(f, "number"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::LBracket => write!(f, "`[`"),
            TokenKind::RBracket => write!(f, "`]`"),
            TokenKind::LParen => write!(f, "`(`"),
            TokenKind::RParen => write!(f, "`)`"),
            TokenKind::LessThan => write!(f, "`<`"),
            TokenKind::LessOrEqual => write!(f, "`<=`"),
            TokenKind::GreaterThan => write!(f, "`>`"),
            TokenKind::GreaterOrEqual => write!(f, "`>=`"),
            TokenKind::Equal => write!(f, "`=`"),
            TokenKind::NotEqual => write!(f, "`<>`"),
            TokenKind::And => write!(f, "`and`"),
            TokenKind::Is => write!(f, "`is`"),
            TokenKind::Like => write!(f, "`like`"),
            TokenKind::Not => write!(f, "`not`"),
            TokenKind::Or => write!(f, "`or`"),
            TokenKind::True => write!(f, "`true`"),
            TokenKind::False => write!(f, "`false`"),
            TokenKind::Null => write!(f, "`null`"),
            TokenKind::In => write!(f, "`in`"),
            TokenKind::Ci => write!(f, "`ci`"),
        }
    }
}
