pub mod ast;
pub mod error;
pub mod escape;
pub mod json;
pub mod lexer;
pub mod order_by;
pub mod parser;
pub mod predicate;
pub mod schema;
pub mod sql;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{
    BinaryOperator, Constant, Expr, OrderByClause, OrderByTerm, SortDirection, Token, TokenKind,
    UnaryOperator,
};
pub use error::{CompileError, Error, ErrorKind};
pub use json::JsonRow;
pub use lexer::{LexError, Lexer, Position};
pub use order_by::parse_order_by;
pub use parser::{MAX_DEPTH, ParseError, Parser, parse_where};
pub use predicate::{Filter, Predicate, compile_to_predicate, compile_with_schema};
pub use schema::{Field, FieldSource, FieldType, Record, Schema};
pub use sql::compile_to_string;
pub use value::Value;
