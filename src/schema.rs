//! Field descriptors for the predicate compiler.
//!
//! A [`Schema`] lists the fields a record exposes, in a fixed order, with
//! their types and nullability. The predicate compiler resolves property
//! names against it (ignoring case) and reads values back by position.
//!
//! # Examples
//!
//! ```
//! use std::sync::LazyLock;
//! use sqlexpr::{FieldSource, FieldType, Record, Schema, Value};
//!
//! struct Order {
//!     order_no: String,
//!     charge: i32,
//!     note: Option<String>,
//! }
//!
//! static ORDER: LazyLock<Schema> = LazyLock::new(|| {
//!     Schema::new()
//!         .field("OrderNo", FieldType::String)
//!         .field("Charge", FieldType::Int32)
//!         .nullable_field("Note", FieldType::String)
//! });
//!
//! impl FieldSource for Order {
//!     fn value(&self, index: usize) -> Value {
//!         match index {
//!             0 => Value::from(&self.order_no),
//!             1 => Value::from(self.charge),
//!             2 => Value::from(self.note.clone()),
//!             _ => Value::Null,
//!         }
//!     }
//! }
//!
//! impl Record for Order {
//!     fn schema() -> &'static Schema {
//!         &ORDER
//!     }
//! }
//!
//! assert_eq!(Order::schema().resolve("charge").map(|(i, _)| i), Some(1));
//! ```

use std::{borrow::Cow, fmt};

use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Decimal,
    String,
    /// Calendar date without a time zone
    Date,
    /// Time of day
    Time,
    /// Date and time without a time zone
    DateTime,
    Uuid,
    /// Enumeration with its member names in declaration order
    Enum(Vec<Cow<'static, str>>),
}

impl FieldType {
    /// Builds an enumeration type from member names.
    pub fn enumeration<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        FieldType::Enum(members.into_iter().map(Into::into).collect())
    }

    /// Inclusive range of an integer type.
    pub fn integer_range(&self) -> Option<(i128, i128)> {
        let range = match self {
            FieldType::Int8 => (i8::MIN.into(), i8::MAX.into()),
            FieldType::Int16 => (i16::MIN.into(), i16::MAX.into()),
            FieldType::Int32 => (i32::MIN.into(), i32::MAX.into()),
            FieldType::Int64 => (i64::MIN.into(), i64::MAX.into()),
            FieldType::UInt8 => (0, u8::MAX.into()),
            FieldType::UInt16 => (0, u16::MAX.into()),
            FieldType::UInt32 => (0, u32::MAX.into()),
            FieldType::UInt64 => (0, u64::MAX.into()),
            _ => return None,
        };
        Some(range)
    }

    pub fn is_integer(&self) -> bool {
        self.integer_range().is_some()
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer()
            || matches!(
                self,
                FieldType::Float32 | FieldType::Float64 | FieldType::Decimal
            )
    }

    /// Whether values of the two types can be compared with each other.
    pub fn is_comparable_with(&self, other: &FieldType) -> bool {
        (self.is_numeric() && other.is_numeric()) || self == other
    }

    /// Looks up an enumeration member, ignoring case.
    pub fn enum_ordinal(&self, name: &str) -> Option<usize> {
        match self {
            FieldType::Enum(members) => members.iter().position(|m| eq_ignore_case(m, name)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Bool => write!(f, "bool"),
            FieldType::Int8 => write!(f, "i8"),
            FieldType::Int16 => write!(f, "i16"),
            FieldType::Int32 => write!(f, "i32"),
            FieldType::Int64 => write!(f, "i64"),
            FieldType::UInt8 => write!(f, "u8"),
            FieldType::UInt16 => write!(f, "u16"),
            FieldType::UInt32 => write!(f, "u32"),
            FieldType::UInt64 => write!(f, "u64"),
            FieldType::Float32 => write!(f, "f32"),
            FieldType::Float64 => write!(f, "f64"),
            FieldType::Decimal => write!(f, "decimal"),
            FieldType::String => write!(f, "string"),
            FieldType::Date => write!(f, "date"),
            FieldType::Time => write!(f, "time"),
            FieldType::DateTime => write!(f, "datetime"),
            FieldType::Uuid => write!(f, "uuid"),
            FieldType::Enum(members) => write!(f, "enum({})", members.join("|")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: Cow<'static, str>,
    pub ty: FieldType,
    pub nullable: bool,
}

impl Field {
    /// Whether `is null` can ever be true for this field. Strings always
    /// can, other types only when declared nullable.
    pub fn admits_null(&self) -> bool {
        self.nullable || self.ty == FieldType::String
    }
}

/// Ordered field list of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a non-nullable field.
    pub fn field(self, name: impl Into<Cow<'static, str>>, ty: FieldType) -> Self {
        self.push(name, ty, false)
    }

    /// Appends a nullable field.
    pub fn nullable_field(self, name: impl Into<Cow<'static, str>>, ty: FieldType) -> Self {
        self.push(name, ty, true)
    }

    fn push(mut self, name: impl Into<Cow<'static, str>>, ty: FieldType, nullable: bool) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty,
            nullable,
        });
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Finds a field by name, ignoring case. Returns its position and
    /// descriptor.
    pub fn resolve(&self, name: &str) -> Option<(usize, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| eq_ignore_case(&field.name, name))
    }
}

impl FromIterator<Field> for Schema {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Schema {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Anything that can hand out field values by schema position.
pub trait FieldSource {
    /// Value of the field at `index` in the schema the predicate was compiled
    /// against.
    fn value(&self, index: usize) -> Value;
}

/// A record type with a statically known schema.
pub trait Record: FieldSource {
    fn schema() -> &'static Schema;
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
