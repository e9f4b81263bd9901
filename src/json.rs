//! Rows backed by JSON objects.
//!
//! [`JsonRow`] lets a compiled [`Filter`](crate::Filter) run over
//! `serde_json` objects, reading each field through the schema the filter
//! was compiled against. Values that do not fit the field's type read as
//! null.

use rust_decimal::{Decimal, prelude::FromPrimitive};
use serde_json::{Map, Value as Json};

use crate::{
    schema::{FieldSource, FieldType, Schema, eq_ignore_case},
    value::Value,
};

pub struct JsonRow<'a> {
    schema: &'a Schema,
    object: &'a Map<String, Json>,
}

impl<'a> JsonRow<'a> {
    pub fn new(schema: &'a Schema, object: &'a Map<String, Json>) -> Self {
        JsonRow { schema, object }
    }

    /// Looks up a member by exact name first, then ignoring case.
    fn member(&self, name: &str) -> Option<&'a Json> {
        self.object.get(name).or_else(|| {
            self.object
                .iter()
                .find(|(key, _)| eq_ignore_case(key, name))
                .map(|(_, value)| value)
        })
    }
}

impl FieldSource for JsonRow<'_> {
    fn value(&self, index: usize) -> Value {
        self.schema
            .fields()
            .get(index)
            .and_then(|field| self.member(&field.name).map(|json| to_value(json, &field.ty)))
            .unwrap_or(Value::Null)
    }
}

/// Converts a JSON value to the runtime value of a field type.
pub fn to_value(json: &Json, ty: &FieldType) -> Value {
    let value = match json {
        Json::Bool(b) if *ty == FieldType::Bool => Some(Value::Boolean(*b)),
        Json::Number(n) => number_value(n, ty),
        Json::String(s) => Value::parse(ty, s),
        _ => None,
    };
    value.unwrap_or(Value::Null)
}

fn number_value(n: &serde_json::Number, ty: &FieldType) -> Option<Value> {
    match ty {
        FieldType::Bool => match n.as_u64()? {
            0 => Some(Value::Boolean(false)),
            1 => Some(Value::Boolean(true)),
            _ => None,
        },
        // Stored at f32 precision, the same rounding a filter literal gets
        FieldType::Float32 => n.as_f64().map(|f| Value::Float(f64::from(f as f32))),
        FieldType::Float64 => n.as_f64().map(Value::Float),
        FieldType::Decimal => Decimal::from_str_exact(&n.to_string())
            .ok()
            .or_else(|| n.as_f64().and_then(Decimal::from_f64))
            .map(Value::Decimal),
        ty => {
            let (min, max) = ty.integer_range()?;
            let n = n
                .as_i64()
                .map(i128::from)
                .or_else(|| n.as_u64().map(i128::from))?;
            (min..=max).contains(&n).then_some(Value::Integer(n))
        }
    }
}
