//! Renders `WHERE` expressions as SQL text.
//!
//! Property names go through a caller-supplied mapper, so the same tree can
//! target any table naming scheme. Literals are written as they were parsed:
//! string contents are not re-escaped.
//!
//! # Examples
//!
//! ```
//! use sqlexpr::{compile_to_string, parse_where, CompileError};
//!
//! let expr = parse_where("Status in ['C', 'P'] and Charge > 10.50").unwrap();
//! let sql = compile_to_string(&expr, |name| {
//!     Ok::<_, CompileError>(format!("\"Orders\".\"{name}\""))
//! })
//! .unwrap();
//!
//! assert_eq!(sql, "\"Orders\".\"Status\" in ('C','P') and \"Orders\".\"Charge\" > 10.50");
//! ```

use std::marker::PhantomData;

use tracing::debug;

use crate::{
    ast::{BinaryOperator, Constant, Expr, UnaryOperator},
    error::CompileError,
};

/// Compiles `expr` to SQL, mapping every property name through `mapper`.
///
/// Errors returned by the mapper are passed through unchanged.
pub fn compile_to_string<F, E>(expr: &Expr, mapper: F) -> Result<String, E>
where
    F: FnMut(&str) -> Result<String, E>,
    E: From<CompileError>,
{
    let sql = SqlWriter::new(mapper).write(expr)?;
    debug!(sql = %sql, "compiled where expression");
    Ok(sql)
}

pub struct SqlWriter<F, E> {
    mapper: F,
    _error: PhantomData<fn() -> E>,
}

impl<F, E> SqlWriter<F, E>
where
    F: FnMut(&str) -> Result<String, E>,
    E: From<CompileError>,
{
    pub fn new(mapper: F) -> Self {
        SqlWriter {
            mapper,
            _error: PhantomData,
        }
    }

    pub fn write(&mut self, expr: &Expr) -> Result<String, E> {
        match expr {
            Expr::Property(name) => (self.mapper)(name),
            Expr::Constant(constant) => Ok(write_constant(constant)),
            Expr::Array(elements) => {
                let items: Vec<String> = elements.iter().map(write_constant).collect();
                Ok(format!("({})", items.join(",")))
            }
            Expr::Unary { op, operand } => self.write_unary(*op, operand),
            Expr::Binary { op, left, right } => self.write_binary(*op, left, right),
        }
    }

    fn write_unary(&mut self, op: UnaryOperator, operand: &Expr) -> Result<String, E> {
        let operand = self.write_nested(operand)?;
        Ok(match op {
            UnaryOperator::Not => format!("not {operand}"),
            UnaryOperator::IsNull => format!("{operand} is null"),
            UnaryOperator::IsNotNull => format!("{operand} is not null"),
        })
    }

    fn write_binary(&mut self, op: BinaryOperator, left: &Expr, right: &Expr) -> Result<String, E> {
        if op.is_connective() {
            // Nested connectives keep their grouping, since `and` and `or`
            // bind equally.
            let left = self.write_grouped(left, Expr::is_connective)?;
            let right = self.write_grouped(right, Expr::is_connective)?;
            return Ok(format!("{left} {} {right}", op.sql()));
        }

        if matches!(op, BinaryOperator::In | BinaryOperator::NotIn)
            && !matches!(right, Expr::Array(_))
        {
            return Err(CompileError::mismatch(format!(
                "`{}` needs an array on the right, found {}",
                op.sql(),
                right.kind_name()
            ))
            .into());
        }

        let left = self.write_nested(left)?;
        let right = self.write_nested(right)?;
        Ok(format!("{left} {} {right}", op.sql()))
    }

    /// Operands of comparisons and unary operators; a nested binary call is
    /// parenthesized.
    fn write_nested(&mut self, expr: &Expr) -> Result<String, E> {
        self.write_grouped(expr, |e| matches!(e, Expr::Binary { .. }))
    }

    fn write_grouped(&mut self, expr: &Expr, group: fn(&Expr) -> bool) -> Result<String, E> {
        let text = self.write(expr)?;
        Ok(if group(expr) { format!("({text})") } else { text })
    }
}

fn write_constant(constant: &Constant) -> String {
    match constant {
        Constant::Null => "null".to_string(),
        Constant::Bool(true) => "1".to_string(),
        Constant::Bool(false) => "0".to_string(),
        Constant::Number(n) => n.to_string(),
        Constant::Str(s) => format!("'{s}'"),
    }
}
