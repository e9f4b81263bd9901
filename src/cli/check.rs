//! Translate and validate expressions

use super::CliError;
use crate::{compile_to_string, order_by, parse_order_by, parse_where, schema::eq_ignore_case};

/// Options for the where command
#[derive(Debug, Clone, Default)]
pub struct WhereOptions {
    pub expression: String,
    /// Table that qualifies every column
    pub table: Option<String>,
    /// Allowed property names; any property is accepted when absent
    pub fields: Option<Vec<String>>,
}

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub expression: String,
    /// Print the parsed tree
    pub ast: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq, Eq)]
pub enum CheckResult {
    Valid,
    /// Parsed tree in call notation
    Tree(String),
}

/// Compiles a `WHERE` expression to SQL.
pub fn execute_where(options: &WhereOptions) -> Result<String, CliError> {
    let expr = parse_where(&options.expression)?;

    let mapper = |name: &str| -> Result<String, CliError> {
        let column = match &options.fields {
            Some(fields) => fields
                .iter()
                .find(|field| eq_ignore_case(field, name))
                .map(String::as_str)
                .ok_or_else(|| CliError::UnknownProperty(name.to_string()))?,
            None => name,
        };
        Ok(quote_column(options.table.as_deref(), column))
    };

    compile_to_string(&expr, mapper)
}

/// Compiles an `ORDER BY` clause to SQL.
pub fn execute_order_by(expression: &str, table: Option<&str>) -> Result<String, CliError> {
    let clause = parse_order_by(expression)?;
    order_by::compile_to_string(&clause, |name| {
        Ok::<_, CliError>(quote_column(table, name))
    })
}

/// Parses an expression without compiling it.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expr = parse_where(&options.expression)?;

    if options.ast {
        Ok(CheckResult::Tree(expr.to_string()))
    } else {
        Ok(CheckResult::Valid)
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_column(table: Option<&str>, name: &str) -> String {
    match table {
        Some(table) => format!("{}.{}", quote_identifier(table), quote_identifier(name)),
        None => quote_identifier(name),
    }
}
