//! The `ORDER BY` grammar: a comma separated list of `property [asc|desc]`.
//!
//! ```text
//! OrderNo asc, OrderDate desc, Charge
//! ```
//!
//! An empty clause is accepted and renders as the empty string.

use tracing::debug;

use crate::{
    ast::{OrderByClause, OrderByTerm, SortDirection},
    lexer::{LexError, Position},
    parser::ParseError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Identifier,
    Comma,
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy)]
struct Token<'src> {
    kind: Kind,
    text: &'src str,
    offset: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>, LexError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        if ch.is_ascii_whitespace() {
            continue;
        }

        if ch == ',' {
            tokens.push(Token {
                kind: Kind::Comma,
                text: &input[start..start + 1],
                offset: start,
            });
            continue;
        }

        if !(ch.is_alphabetic() || ch == '_') {
            return Err(LexError::UnexpectedCharacter {
                ch,
                position: Position::locate(input, start),
            });
        }

        let mut end = start + ch.len_utf8();
        while let Some(&(i, c)) = chars.peek() {
            if !(c.is_alphanumeric() || c == '_') {
                break;
            }
            end = i + c.len_utf8();
            chars.next();
        }

        let text = &input[start..end];
        let kind = if text.eq_ignore_ascii_case("asc") {
            Kind::Asc
        } else if text.eq_ignore_ascii_case("desc") {
            Kind::Desc
        } else {
            Kind::Identifier
        };
        tokens.push(Token {
            kind,
            text,
            offset: start,
        });
    }

    Ok(tokens)
}

/// Parses an `ORDER BY` clause.
///
/// # Examples
///
/// ```
/// use sqlexpr::{parse_order_by, SortDirection};
///
/// let clause = parse_order_by("OrderNo, OrderDate DESC").unwrap();
/// assert_eq!(clause.terms.len(), 2);
/// assert_eq!(clause.terms[1].direction, SortDirection::Descending);
/// ```
pub fn parse_order_by(text: &str) -> Result<OrderByClause, ParseError> {
    let tokens = tokenize(text)?;
    let mut tokens = tokens.iter().peekable();
    let mut terms = Vec::new();

    let error = |expected: &'static str, token: Option<&Token<'_>>| match token {
        Some(token) => ParseError::Syntax {
            expected,
            found: format!("`{}`", token.text),
            position: Position::locate(text, token.offset),
        },
        None => ParseError::Syntax {
            expected,
            found: "end of input".to_string(),
            position: Position::locate(text, text.len()),
        },
    };

    if tokens.peek().is_none() {
        return Ok(OrderByClause::default());
    }

    loop {
        let property = match tokens.next() {
            Some(token) if token.kind == Kind::Identifier => token.text.to_string(),
            other => return Err(error("property", other)),
        };

        let direction = match tokens.peek().map(|t| t.kind) {
            Some(Kind::Asc) => {
                tokens.next();
                SortDirection::Ascending
            }
            Some(Kind::Desc) => {
                tokens.next();
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        terms.push(OrderByTerm {
            property,
            direction,
        });

        match tokens.next() {
            None => break,
            Some(token) if token.kind == Kind::Comma => {}
            other => return Err(error("`,` or end of input", other)),
        }
    }

    debug!(terms = terms.len(), "parsed order by clause");
    Ok(OrderByClause { terms })
}

/// Renders a clause as SQL, mapping every property name through `mapper`.
/// Ascending terms carry no suffix.
pub fn compile_to_string<F, E>(clause: &OrderByClause, mut mapper: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<String, E>,
{
    let terms = clause
        .terms
        .iter()
        .map(|term| {
            let property = mapper(&term.property)?;
            Ok(match term.direction {
                SortDirection::Ascending => property,
                SortDirection::Descending => format!("{property} desc"),
            })
        })
        .collect::<Result<Vec<_>, E>>()?;

    Ok(terms.join(", "))
}
