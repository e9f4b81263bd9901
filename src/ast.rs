//! # Abstract Syntax Tree
//!
//! The tree shared by the parser and both compiler backends.
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - `WHERE` expression nodes and literal constants
//! - **[operators]** - Unary and binary operators
//! - **[order_by]** - The much smaller `ORDER BY` clause tree
//!
//! ## Precedence
//!
//! From lowest to highest:
//!
//! ```text
//! and, or                       equal precedence, folded left to right
//! like, not like, in, not in,
//! <=, <>, <, >=, >, =           folded left to right
//! not <factor> [is [not] null]
//! ( expression ) | literal | property | [literal, ...]
//! ```
//!
//! `and` and `or` share a level, so `A or B and C` is `(A or B) and C`.
//! This is the language's rule, not standard SQL's, and the string compiler
//! keeps the grouping explicit with parentheses.
//!
//! ## Examples
//!
//! ```text
//! OrderNo = '12345'
//! Status not in ['C', 'P']
//! OrderDate is null or (OrderDate >= '2021-01-01' and OrderDate <= '2022-01-01')
//! Three like 'three%'
//! ```
pub mod expressions;
pub mod operators;
pub mod order_by;
pub mod tokens;

pub use expressions::{Constant, Expr};
pub use operators::{BinaryOperator, UnaryOperator};
pub use order_by::{OrderByClause, OrderByTerm, SortDirection};
pub use tokens::{Token, TokenKind};
