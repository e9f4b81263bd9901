//! Run expressions against JSON rows

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value as Json;
use tracing::debug;

use super::CliError;
use crate::{Field, FieldType, JsonRow, Schema, compile_with_schema, parse_where};

static FIELD_SPEC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([\p{Alphabetic}_][\p{Alphabetic}\p{Nd}_]*)\s*:\s*([A-Za-z0-9]+)(?:\(([^)]*)\))?\s*(\?)?\s*$")
        .expect("field spec pattern is valid")
});

/// Options for the filter command
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub expression: String,
    /// Field specs such as `One:i32`, `Two:i32?` or `Status:enum(Active|Closed)`
    pub fields: Vec<String>,
    /// JSON object or array of objects
    pub input: Option<String>,
}

/// Parses a `Name:type[?]` field spec.
pub fn parse_field_spec(spec: &str) -> Result<Field, CliError> {
    let invalid = || CliError::InvalidFieldSpec(spec.to_string());
    let captures = FIELD_SPEC.captures(spec).ok_or_else(invalid)?;

    let name = captures[1].to_string();
    let members = captures.get(3).map(|m| m.as_str());
    let ty = field_type(&captures[2], members).ok_or_else(invalid)?;

    Ok(Field {
        name: name.into(),
        ty,
        nullable: captures.get(4).is_some(),
    })
}

fn field_type(name: &str, members: Option<&str>) -> Option<FieldType> {
    let ty = match (name.to_ascii_lowercase().as_str(), members) {
        ("enum", Some(members)) => {
            FieldType::enumeration(members.split('|').map(|m| m.trim().to_string()))
        }
        (_, Some(_)) => return None,
        ("bool" | "boolean", None) => FieldType::Bool,
        ("i8", None) => FieldType::Int8,
        ("i16", None) => FieldType::Int16,
        ("i32" | "int", None) => FieldType::Int32,
        ("i64" | "long", None) => FieldType::Int64,
        ("u8", None) => FieldType::UInt8,
        ("u16", None) => FieldType::UInt16,
        ("u32", None) => FieldType::UInt32,
        ("u64", None) => FieldType::UInt64,
        ("f32" | "float", None) => FieldType::Float32,
        ("f64" | "double", None) => FieldType::Float64,
        ("decimal", None) => FieldType::Decimal,
        ("string" | "str", None) => FieldType::String,
        ("date", None) => FieldType::Date,
        ("time", None) => FieldType::Time,
        ("datetime", None) => FieldType::DateTime,
        ("uuid", None) => FieldType::Uuid,
        _ => return None,
    };
    Some(ty)
}

/// Keeps the input rows that match the expression. A single object yields
/// an array of zero or one rows.
pub fn execute_filter(options: &FilterOptions) -> Result<Json, CliError> {
    let schema = options
        .fields
        .iter()
        .map(|spec| parse_field_spec(spec))
        .collect::<Result<Schema, _>>()?;

    let expr = parse_where(&options.expression)?;
    let filter = compile_with_schema(&expr, &schema)?;

    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let rows = match serde_json::from_str(input)? {
        Json::Array(rows) => rows,
        row @ Json::Object(_) => vec![row],
        _ => return Err(CliError::NotObjects),
    };

    let total = rows.len();
    let mut matched = Vec::new();
    for row in rows {
        let object = row.as_object().ok_or(CliError::NotObjects)?;
        if filter.matches(&JsonRow::new(&schema, object)) {
            matched.push(row);
        }
    }

    debug!(total, matched = matched.len(), "filtered rows");
    Ok(Json::Array(matched))
}
