use std::fmt;

use rust_decimal::Decimal;

use crate::{
    ast::{BinaryOperator, UnaryOperator},
    escape::{escape_string_content, is_valid_identifier},
};

/// Abstract Syntax Tree node representing a parsed `WHERE` expression.
///
/// The tree is immutable once the parser hands it out and holds no shared
/// state, so the same tree can be compiled any number of times by either
/// backend, from any thread.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Unresolved field reference, case preserved as written
    ///
    /// # Example
    /// ```text
    /// OrderDate
    /// ```
    Property(String),

    /// Literal value
    Constant(Constant),

    /// Bracketed literal list, only valid as the right operand of `in` / `not in`
    ///
    /// # Example
    /// ```text
    /// ['C', 'P']
    /// ```
    Array(Vec<Constant>),

    /// Call of a single-operand operator
    ///
    /// # Examples
    /// ```text
    /// not Active
    /// OrderDate is null
    /// ```
    Unary {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    /// Call of a two-operand operator
    ///
    /// # Examples
    /// ```text
    /// One = 1
    /// Status in ['C', 'P']
    /// A = 1 and B = 2
    /// ```
    Binary {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Literal value. Numbers keep their decimal precision (and scale) until a
/// backend decides how to convert them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Null,
    Bool(bool),
    Number(Decimal),
    Str(String),
}

impl Expr {
    pub fn property(name: impl Into<String>) -> Self {
        Expr::Property(name.into())
    }

    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// True for `and` / `or` calls.
    pub fn is_connective(&self) -> bool {
        matches!(self, Expr::Binary { op, .. } if op.is_connective())
    }

    /// Short name of the node shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Property(_) => "property",
            Expr::Constant(_) => "constant",
            Expr::Array(_) => "array",
            Expr::Unary { .. } | Expr::Binary { .. } => "call",
        }
    }
}

impl Constant {
    pub fn type_name(&self) -> &'static str {
        match self {
            Constant::Null => "null",
            Constant::Bool(_) => "boolean",
            Constant::Number(_) => "number",
            Constant::Str(_) => "string",
        }
    }
}

impl From<bool> for Constant {
    fn from(b: bool) -> Self {
        Constant::Bool(b)
    }
}

impl From<Decimal> for Constant {
    fn from(d: Decimal) -> Self {
        Constant::Number(d)
    }
}

impl From<i64> for Constant {
    fn from(n: i64) -> Self {
        Constant::Number(Decimal::from(n))
    }
}

impl From<&str> for Constant {
    fn from(s: &str) -> Self {
        Constant::Str(s.to_string())
    }
}

impl From<String> for Constant {
    fn from(s: String) -> Self {
        Constant::Str(s)
    }
}

impl From<Constant> for Expr {
    fn from(c: Constant) -> Self {
        Expr::Constant(c)
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Null => write!(f, "null"),
            Constant::Bool(b) => write!(f, "{}", b),
            Constant::Number(n) => write!(f, "{}", n),
            Constant::Str(s) => write!(f, "'{}'", escape_string_content(s)),
        }
    }
}

/// Debug rendering in call notation, e.g. `And(Equal(One, 1), IsNull(Two))`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Property(name) if is_valid_identifier(name) => write!(f, "{}", name),
            Expr::Property(name) => {
                write!(f, "@Properties['{}']", escape_string_content(name))
            }
            Expr::Constant(c) => write!(f, "{}", c),
            Expr::Array(elements) => {
                let items: Vec<String> = elements.iter().map(|e| e.to_string()).collect();
                write!(f, "({})", items.join(", "))
            }
            Expr::Unary { op, operand } => write!(f, "{}({})", op, operand),
            Expr::Binary { op, left, right } => write!(f, "{}({}, {})", op, left, right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_call_notation() {
        let expr = Expr::binary(
            BinaryOperator::And,
            Expr::binary(
                BinaryOperator::Equal,
                Expr::property("One"),
                Constant::from(1i64).into(),
            ),
            Expr::unary(UnaryOperator::IsNull, Expr::property("Two")),
        );
        assert_eq!(expr.to_string(), "And(Equal(One, 1), IsNull(Two))");
    }

    #[test]
    fn test_display_escapes_odd_property_names() {
        let expr = Expr::property("Order No's");
        assert_eq!(expr.to_string(), "@Properties['Order No''s']");
    }

    #[test]
    fn test_display_array() {
        let expr = Expr::Array(vec![Constant::from("C"), Constant::Null]);
        assert_eq!(expr.to_string(), "('C', null)");
    }
}
