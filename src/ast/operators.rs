use std::fmt;

/// Two-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    // Comparison
    /// Equal (`=`)
    Equal,
    /// Not equal (`<>`)
    NotEqual,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessOrEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterOrEqual,

    // Logical
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,

    // Pattern and membership
    /// Pattern match (`like`)
    Like,
    /// Negated pattern match (`not like`)
    NotLike,
    /// Membership in a literal array (`in`)
    In,
    /// Negated membership (`not in`)
    NotIn,
}

impl BinaryOperator {
    /// `and` / `or`, the operators whose nested uses get parenthesised in SQL.
    pub fn is_connective(self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::LessThan
                | BinaryOperator::LessOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterOrEqual
        )
    }

    /// SQL spelling of the operator.
    pub fn sql(self) -> &'static str {
        match self {
            BinaryOperator::Equal => "=",
            BinaryOperator::NotEqual => "<>",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterOrEqual => ">=",
            BinaryOperator::And => "and",
            BinaryOperator::Or => "or",
            BinaryOperator::Like => "like",
            BinaryOperator::NotLike => "not like",
            BinaryOperator::In => "in",
            BinaryOperator::NotIn => "not in",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryOperator::Equal => "Equal",
            BinaryOperator::NotEqual => "NotEqual",
            BinaryOperator::LessThan => "LessThan",
            BinaryOperator::LessOrEqual => "LessOrEqual",
            BinaryOperator::GreaterThan => "GreaterThan",
            BinaryOperator::GreaterOrEqual => "GreaterOrEqual",
            BinaryOperator::And => "And",
            BinaryOperator::Or => "Or",
            BinaryOperator::Like => "Like",
            BinaryOperator::NotLike => "NotLike",
            BinaryOperator::In => "In",
            BinaryOperator::NotIn => "NotIn",
        };
        f.write_str(name)
    }
}

/// Single-operand operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    /// Logical negation (`not`)
    Not,
    /// `is null`
    IsNull,
    /// `is not null`
    IsNotNull,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Not => write!(f, "Not"),
            UnaryOperator::IsNull => write!(f, "IsNull"),
            UnaryOperator::IsNotNull => write!(f, "IsNotNull"),
        }
    }
}
