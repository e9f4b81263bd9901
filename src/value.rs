use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use uuid::Uuid;

use crate::schema::FieldType;

const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M", "%I:%M%p", "%I:%M %p", "%I:%M:%S%p"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A field value read from a record, or a literal after it has been coerced
/// to a field's type.
///
/// # Examples
///
/// ```
/// use sqlexpr::Value;
///
/// let amount = Value::from(34_i32);
/// let missing = Value::from(None::<i32>);
/// let name = Value::from("three");
///
/// assert!(missing.is_null());
/// assert_eq!(amount, Value::Integer(34));
/// assert_eq!(name.type_name(), "string");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,

    Boolean(bool),

    /// Any integer width, signed or unsigned
    Integer(i128),

    Float(f64),

    Decimal(Decimal),

    String(String),

    Date(NaiveDate),

    Time(NaiveTime),

    DateTime(NaiveDateTime),

    Uuid(Uuid),

    /// Ordinal of an enumeration member, in declaration order
    Enum(usize),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Decimal(_) => "decimal",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::DateTime(_) => "datetime",
            Value::Uuid(_) => "uuid",
            Value::Enum(_) => "enum",
        }
    }

    /// Boolean view for predicate positions; null reads as false.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Null => Some(false),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Parses text into a value of a textual field type: booleans, dates,
    /// times, date-times, UUIDs, enumeration members and strings. Numeric
    /// types are not parsed from text.
    pub fn parse(ty: &FieldType, text: &str) -> Option<Value> {
        let value = match ty {
            FieldType::String => Value::String(text.to_string()),
            FieldType::Bool if text.eq_ignore_ascii_case("true") => Value::Boolean(true),
            FieldType::Bool if text.eq_ignore_ascii_case("false") => Value::Boolean(false),
            FieldType::Date => Value::Date(NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?),
            FieldType::Time => Value::Time(parse_time(text)?),
            FieldType::DateTime => Value::DateTime(parse_datetime(text)?),
            FieldType::Uuid => Value::Uuid(Uuid::parse_str(text).ok()?),
            FieldType::Enum(_) => Value::Enum(ty.enum_ordinal(text)?),
            _ => return None,
        };
        Some(value)
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_) | Value::Decimal(_))
    }

    /// SQL-style equality: null equals null and nothing else.
    pub fn sql_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Null, _) | (_, Value::Null) => false,
            _ => self.compare(other) == Some(Ordering::Equal),
        }
    }

    /// Orders two non-null values of compatible types. Integers, floats and
    /// decimals compare numerically with each other.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        use Value::*;
        match (self, other) {
            (Null, _) | (_, Null) => None,
            (Boolean(a), Boolean(b)) => Some(a.cmp(b)),
            (String(a), String(b)) => Some(a.cmp(b)),
            (Date(a), Date(b)) => Some(a.cmp(b)),
            (Time(a), Time(b)) => Some(a.cmp(b)),
            (DateTime(a), DateTime(b)) => Some(a.cmp(b)),
            (Uuid(a), Uuid(b)) => Some(a.cmp(b)),
            (Enum(a), Enum(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => compare_numbers(a, b),
            _ => None,
        }
    }
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

fn compare_numbers(a: &Value, b: &Value) -> Option<Ordering> {
    use Value::*;
    match (a, b) {
        (Integer(a), Integer(b)) => Some(a.cmp(b)),
        (Decimal(a), Decimal(b)) => Some(a.cmp(b)),
        (Float(a), Float(b)) => a.partial_cmp(b),
        (Integer(a), Decimal(b)) => match rust_decimal::Decimal::from_i128(*a) {
            Some(a) => Some(a.cmp(b)),
            None => (*a as f64).partial_cmp(&b.to_f64()?),
        },
        (Integer(a), Float(b)) => (*a as f64).partial_cmp(b),
        (Decimal(a), Float(b)) => a.to_f64()?.partial_cmp(b),
        (a, b) => compare_numbers(b, a).map(Ordering::reverse),
    }
}

macro_rules! integer_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::Integer(i128::from(n))
                }
            }
        )*
    };
}

integer_from!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Uuid> for Value {
    fn from(id: Uuid) -> Self {
        Value::Uuid(id)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}
