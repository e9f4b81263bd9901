//! Compiles expressions into predicates over records.
//!
//! Property names are resolved against a [`Schema`] once, constants are
//! coerced to the type of the field they are compared with, and the result
//! is a small tree of lowered nodes that is evaluated per record.

use std::{borrow::Cow, cmp::Ordering, fmt, marker::PhantomData};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use tracing::debug;

use crate::{
    ast::{BinaryOperator, Constant, Expr, UnaryOperator},
    error::CompileError,
    schema::{Field, FieldSource, FieldType, Record, Schema},
    value::Value,
};

/// Compiles `expr` into a predicate over the record type `T`.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use sqlexpr::{compile_to_predicate, parse_where, FieldSource, FieldType, Record, Schema, Value};
///
/// struct Item {
///     qty: i32,
/// }
///
/// static ITEM: LazyLock<Schema> = LazyLock::new(|| Schema::new().field("Qty", FieldType::Int32));
///
/// impl FieldSource for Item {
///     fn value(&self, _index: usize) -> Value {
///         Value::from(self.qty)
///     }
/// }
///
/// impl Record for Item {
///     fn schema() -> &'static Schema {
///         &ITEM
///     }
/// }
///
/// let expr = parse_where("qty >= 2").unwrap();
/// let predicate = compile_to_predicate::<Item>(&expr).unwrap();
/// assert!(predicate.matches(&Item { qty: 3 }));
/// assert!(!predicate.matches(&Item { qty: 1 }));
/// ```
pub fn compile_to_predicate<T: Record>(expr: &Expr) -> Result<Predicate<T>, CompileError> {
    let filter = compile_with_schema(expr, T::schema())?;
    debug!(record = std::any::type_name::<T>(), "compiled predicate");

    Ok(Predicate {
        filter,
        _record: PhantomData,
    })
}

/// Compiles `expr` against a schema known only at runtime.
pub fn compile_with_schema(expr: &Expr, schema: &Schema) -> Result<Filter, CompileError> {
    let root = Compiler { schema }.compile(expr)?;
    Ok(Filter { root })
}

/// A compiled filter for rows described by the schema it was compiled with.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    root: Node,
}

impl Filter {
    pub fn matches<S: FieldSource + ?Sized>(&self, row: &S) -> bool {
        self.root.eval(row)
    }
}

/// A compiled filter bound to a record type.
pub struct Predicate<T> {
    filter: Filter,
    _record: PhantomData<fn(&T)>,
}

impl<T: Record> Predicate<T> {
    pub fn matches(&self, record: &T) -> bool {
        self.filter.matches(record)
    }

    /// Turns the predicate into a closure, e.g. for `Iterator::filter`.
    pub fn into_fn(self) -> impl Fn(&T) -> bool {
        move |record| self.filter.matches(record)
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

impl<T> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Predicate {
            filter: self.filter.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("record", &std::any::type_name::<T>())
            .field("filter", &self.filter)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    fn from_operator(op: BinaryOperator) -> Option<Self> {
        let cmp = match op {
            BinaryOperator::Equal => Comparison::Equal,
            BinaryOperator::NotEqual => Comparison::NotEqual,
            BinaryOperator::LessThan => Comparison::Less,
            BinaryOperator::LessOrEqual => Comparison::LessOrEqual,
            BinaryOperator::GreaterThan => Comparison::Greater,
            BinaryOperator::GreaterOrEqual => Comparison::GreaterOrEqual,
            _ => return None,
        };
        Some(cmp)
    }

    fn is_ordering(self) -> bool {
        !matches!(self, Comparison::Equal | Comparison::NotEqual)
    }

    fn test(self, left: &Value, right: &Value) -> bool {
        let ordering = || left.compare(right);
        match self {
            Comparison::Equal => left.sql_eq(right),
            Comparison::NotEqual => !left.sql_eq(right),
            Comparison::Less => ordering() == Some(Ordering::Less),
            Comparison::LessOrEqual => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
            Comparison::Greater => ordering() == Some(Ordering::Greater),
            Comparison::GreaterOrEqual => {
                matches!(ordering(), Some(Ordering::Greater | Ordering::Equal))
            }
        }
    }
}

/// Shape a `like` pattern is lowered to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Equals(String),
    StartsWith(String),
    EndsWith(String),
    Contains(String),
}

impl Pattern {
    /// Only the first and last characters are inspected. `None` means the
    /// pattern matches everything.
    fn lower(pattern: &str) -> Option<Pattern> {
        if pattern == "%" {
            return None;
        }

        let lowered = match (pattern.strip_prefix('%'), pattern.strip_suffix('%')) {
            (Some(rest), Some(_)) => {
                Pattern::Contains(rest.strip_suffix('%').unwrap_or(rest).to_string())
            }
            (Some(rest), None) => Pattern::EndsWith(rest.to_string()),
            (None, Some(rest)) => Pattern::StartsWith(rest.to_string()),
            (None, None) => Pattern::Equals(pattern.to_string()),
        };
        Some(lowered)
    }

    fn test(&self, text: &str) -> bool {
        match self {
            Pattern::Equals(p) => text == p,
            Pattern::StartsWith(p) => text.starts_with(p.as_str()),
            Pattern::EndsWith(p) => text.ends_with(p.as_str()),
            Pattern::Contains(p) => text.contains(p.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Field(usize),
    Value(Value),
    Test(Box<Node>),
}

impl Operand {
    fn resolve<S: FieldSource + ?Sized>(&self, row: &S) -> Cow<'_, Value> {
        match self {
            Operand::Field(index) => Cow::Owned(row.value(*index)),
            Operand::Value(value) => Cow::Borrowed(value),
            Operand::Test(node) => Cow::Owned(Value::Boolean(node.eval(row))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Literal(bool),
    /// Boolean field used as a condition; null reads as false
    Field(usize),
    Compare {
        cmp: Comparison,
        left: Operand,
        right: Operand,
    },
    Like {
        field: usize,
        pattern: Pattern,
    },
    In {
        field: usize,
        values: Vec<Value>,
    },
    Not(Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
}

impl Node {
    fn eval<S: FieldSource + ?Sized>(&self, row: &S) -> bool {
        match self {
            Node::Literal(b) => *b,
            Node::Field(index) => row.value(*index).as_bool().unwrap_or(false),
            Node::Compare { cmp, left, right } => {
                cmp.test(&left.resolve(row), &right.resolve(row))
            }
            Node::Like { field, pattern } => match row.value(*field) {
                Value::String(text) => pattern.test(&text),
                _ => false,
            },
            Node::In { field, values } => {
                let value = row.value(*field);
                values.iter().any(|v| v.sql_eq(&value))
            }
            Node::Not(inner) => !inner.eval(row),
            Node::And(left, right) => left.eval(row) && right.eval(row),
            Node::Or(left, right) => left.eval(row) || right.eval(row),
        }
    }

    fn negate(node: Node) -> Node {
        match node {
            Node::Literal(b) => Node::Literal(!b),
            other => Node::Not(Box::new(other)),
        }
    }
}

/// A comparison operand after name resolution.
enum Term<'a> {
    Field(usize, &'a Field),
    Constant(&'a Constant),
    Test(Node),
}

struct Compiler<'s> {
    schema: &'s Schema,
}

impl<'s> Compiler<'s> {
    fn resolve(&self, name: &str) -> Result<(usize, &'s Field), CompileError> {
        self.schema
            .resolve(name)
            .ok_or_else(|| CompileError::unknown_field(name))
    }

    fn compile(&self, expr: &Expr) -> Result<Node, CompileError> {
        match expr {
            Expr::Property(name) => {
                let (index, field) = self.resolve(name)?;
                if field.ty != FieldType::Bool {
                    return Err(CompileError::mismatch(format!(
                        "field '{}' of type {} is not a condition",
                        field.name, field.ty
                    )));
                }
                Ok(Node::Field(index))
            }
            Expr::Constant(Constant::Bool(b)) => Ok(Node::Literal(*b)),
            Expr::Constant(c) => Err(CompileError::mismatch(format!(
                "{} constant {} is not a condition",
                c.type_name(),
                c
            ))),
            Expr::Array(_) => Err(CompileError::mismatch("an array is not a condition")),
            Expr::Unary { op, operand } => self.compile_unary(*op, operand),
            Expr::Binary { op, left, right } => self.compile_binary(*op, left, right),
        }
    }

    fn compile_unary(&self, op: UnaryOperator, operand: &Expr) -> Result<Node, CompileError> {
        match op {
            UnaryOperator::Not => Ok(Node::negate(self.compile(operand)?)),
            UnaryOperator::IsNull | UnaryOperator::IsNotNull => {
                let Expr::Property(name) = operand else {
                    return Err(CompileError::mismatch(format!(
                        "`{op}` needs a field operand, found {}",
                        operand.kind_name()
                    )));
                };

                let (index, field) = self.resolve(name)?;
                let is_null = op == UnaryOperator::IsNull;
                if !field.admits_null() {
                    return Ok(Node::Literal(!is_null));
                }

                Ok(Node::Compare {
                    cmp: if is_null {
                        Comparison::Equal
                    } else {
                        Comparison::NotEqual
                    },
                    left: Operand::Field(index),
                    right: Operand::Value(Value::Null),
                })
            }
        }
    }

    fn compile_binary(
        &self,
        op: BinaryOperator,
        left: &Expr,
        right: &Expr,
    ) -> Result<Node, CompileError> {
        match op {
            BinaryOperator::And => Ok(Node::And(
                Box::new(self.compile(left)?),
                Box::new(self.compile(right)?),
            )),
            BinaryOperator::Or => Ok(Node::Or(
                Box::new(self.compile(left)?),
                Box::new(self.compile(right)?),
            )),
            BinaryOperator::Like => self.compile_like(left, right),
            BinaryOperator::NotLike => Ok(Node::negate(self.compile_like(left, right)?)),
            BinaryOperator::In => self.compile_in(left, right),
            BinaryOperator::NotIn => Ok(Node::negate(self.compile_in(left, right)?)),
            _ => {
                let cmp = Comparison::from_operator(op).ok_or_else(|| {
                    CompileError::mismatch(format!("`{op}` is not a comparison"))
                })?;
                self.compile_comparison(cmp, left, right)
            }
        }
    }

    fn term<'e>(&self, expr: &'e Expr) -> Result<Term<'e>, CompileError>
    where
        's: 'e,
    {
        match expr {
            Expr::Property(name) => {
                let (index, field) = self.resolve(name)?;
                Ok(Term::Field(index, field))
            }
            Expr::Constant(c) => Ok(Term::Constant(c)),
            Expr::Array(_) => Err(CompileError::mismatch(
                "an array can only appear on the right of `in`",
            )),
            Expr::Unary { .. } | Expr::Binary { .. } => Ok(Term::Test(self.compile(expr)?)),
        }
    }

    fn compile_comparison(
        &self,
        cmp: Comparison,
        left: &Expr,
        right: &Expr,
    ) -> Result<Node, CompileError> {
        let (left, right) = match (self.term(left)?, self.term(right)?) {
            (Term::Field(index, field), Term::Constant(c)) => {
                check_ordering(cmp, &field.ty)?;
                (Operand::Field(index), Operand::Value(coerce(c, field)?))
            }
            (Term::Constant(c), Term::Field(index, field)) => {
                check_ordering(cmp, &field.ty)?;
                (Operand::Value(coerce(c, field)?), Operand::Field(index))
            }
            (Term::Field(a, fa), Term::Field(b, fb)) => {
                if !fa.ty.is_comparable_with(&fb.ty) {
                    return Err(CompileError::mismatch(format!(
                        "cannot compare {} field '{}' with {} field '{}'",
                        fa.ty, fa.name, fb.ty, fb.name
                    )));
                }
                check_ordering(cmp, &fa.ty)?;
                (Operand::Field(a), Operand::Field(b))
            }
            (Term::Constant(a), Term::Constant(b)) => {
                let (a, b) = (constant_value(a), constant_value(b));
                if !(a.is_null() || b.is_null() || a.type_name() == b.type_name()) {
                    return Err(CompileError::mismatch(format!(
                        "cannot compare {} constant with {} constant",
                        a.type_name(),
                        b.type_name()
                    )));
                }
                if matches!(a, Value::Boolean(_)) {
                    check_ordering(cmp, &FieldType::Bool)?;
                }
                return Ok(Node::Literal(cmp.test(&a, &b)));
            }
            (Term::Test(node), other) => {
                check_ordering(cmp, &FieldType::Bool)?;
                (Operand::Test(Box::new(node)), self.boolean_operand(other)?)
            }
            (other, Term::Test(node)) => {
                check_ordering(cmp, &FieldType::Bool)?;
                (self.boolean_operand(other)?, Operand::Test(Box::new(node)))
            }
        };

        Ok(Node::Compare { cmp, left, right })
    }

    /// The counterpart of a nested condition in a comparison.
    fn boolean_operand(&self, term: Term<'_>) -> Result<Operand, CompileError> {
        match term {
            Term::Test(node) => Ok(Operand::Test(Box::new(node))),
            Term::Constant(Constant::Bool(b)) => Ok(Operand::Value(Value::Boolean(*b))),
            Term::Constant(Constant::Number(n)) if bit(n).is_some() => {
                Ok(Operand::Value(Value::Boolean(*n == Decimal::ONE)))
            }
            Term::Field(index, field) if field.ty == FieldType::Bool => Ok(Operand::Field(index)),
            Term::Field(_, field) => Err(CompileError::mismatch(format!(
                "cannot compare a condition with {} field '{}'",
                field.ty, field.name
            ))),
            Term::Constant(c) => Err(CompileError::mismatch(format!(
                "cannot compare a condition with {} constant {}",
                c.type_name(),
                c
            ))),
        }
    }

    fn compile_like(&self, left: &Expr, right: &Expr) -> Result<Node, CompileError> {
        let field = match left {
            Expr::Property(name) => Some(self.resolve(name)?),
            _ => None,
        };

        let (index, field, pattern) = match (field, right) {
            (Some((index, field)), Expr::Constant(Constant::Str(pattern)))
                if field.ty == FieldType::String =>
            {
                (index, field, pattern)
            }
            _ => {
                return Err(CompileError::mismatch(format!(
                    "`like` needs a string field and a string pattern, found {} and {}",
                    left.kind_name(),
                    right
                )));
            }
        };

        let lowered = Pattern::lower(pattern);
        debug!(field = %field.name, pattern = %pattern, lowered = ?lowered, "lowered like pattern");

        Ok(match lowered {
            Some(pattern) => Node::Like {
                field: index,
                pattern,
            },
            None => Node::Literal(true),
        })
    }

    fn compile_in(&self, left: &Expr, right: &Expr) -> Result<Node, CompileError> {
        let Expr::Property(name) = left else {
            return Err(CompileError::mismatch(format!(
                "`in` needs a field on the left, found {}",
                left.kind_name()
            )));
        };
        let Expr::Array(elements) = right else {
            return Err(CompileError::mismatch(format!(
                "`in` needs an array on the right, found {}",
                right.kind_name()
            )));
        };

        let (index, field) = self.resolve(name)?;
        if elements.is_empty() {
            return Ok(Node::Literal(false));
        }

        let values = elements
            .iter()
            .map(|c| coerce(c, field))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Node::In {
            field: index,
            values,
        })
    }
}

fn check_ordering(cmp: Comparison, ty: &FieldType) -> Result<(), CompileError> {
    if cmp.is_ordering() && *ty == FieldType::Bool {
        return Err(CompileError::mismatch("booleans cannot be ordered"));
    }
    Ok(())
}

/// Value of a constant compared without a field to coerce it to.
fn constant_value(c: &Constant) -> Value {
    match c {
        Constant::Null => Value::Null,
        Constant::Bool(b) => Value::Boolean(*b),
        Constant::Number(n) => Value::Decimal(*n),
        Constant::Str(s) => Value::String(s.clone()),
    }
}

/// `0` and `1` stand for booleans.
fn bit(n: &Decimal) -> Option<bool> {
    if *n == Decimal::ZERO {
        Some(false)
    } else if *n == Decimal::ONE {
        Some(true)
    } else {
        None
    }
}

/// Converts a constant to the type of the field it is compared with.
fn coerce(constant: &Constant, field: &Field) -> Result<Value, CompileError> {
    let value = match (constant, &field.ty) {
        (Constant::Null, _) if field.admits_null() => Some(Value::Null),
        (Constant::Bool(b), FieldType::Bool) => Some(Value::Boolean(*b)),
        (Constant::Number(n), FieldType::Bool) => bit(n).map(Value::Boolean),
        (Constant::Number(n), ty) if ty.is_integer() => coerce_integer(*n, ty),
        (Constant::Number(n), FieldType::Float32) => n.to_f32().map(|f| Value::Float(f64::from(f))),
        (Constant::Number(n), FieldType::Float64) => n.to_f64().map(Value::Float),
        (Constant::Number(n), FieldType::Decimal) => Some(Value::Decimal(*n)),
        (Constant::Str(s), ty) => Value::parse(ty, s),
        _ => None,
    };

    value.ok_or_else(|| {
        CompileError::mismatch(format!(
            "cannot compare {} field '{}' with {} constant {}",
            field.ty,
            field.name,
            constant.type_name(),
            constant
        ))
    })
}

fn coerce_integer(n: Decimal, ty: &FieldType) -> Option<Value> {
    let (min, max) = ty.integer_range()?;
    if !n.fract().is_zero() {
        return None;
    }
    let n = n.to_i128()?;
    (min..=max).contains(&n).then_some(Value::Integer(n))
}
