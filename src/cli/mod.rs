//! CLI support for sqlexpr
//!
//! The command implementations return plain values so they can be driven
//! from other tools as well as from the `sqlexpr` binary.

mod check;
mod docs;
mod filter;

pub use check::{
    CheckOptions, CheckResult, WhereOptions, execute_check, execute_order_by, execute_where,
};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use filter::{FilterOptions, execute_filter, parse_field_spec};

use std::io;

use thiserror::Error;

use crate::{CompileError, ParseError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    /// A property outside the `--fields` list
    #[error("Unknown property '{0}'")]
    UnknownProperty(String),

    #[error("Invalid field spec '{0}'. Expected Name:type, Name:type? or Name:enum(A|B)")]
    InvalidFieldSpec(String),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input must be a JSON object or an array of objects")]
    NotObjects,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe JSON to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'sqlexpr docs' to see available categories.")]
    UnknownCategory(String),
}
