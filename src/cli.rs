//! Command-line field syntax.
//!
//! The `tuplespace` binary takes tuple and template fields as plain arguments:
//!
//! - `kind:value` is a literal, e.g. `int:42`, `str:a`, `bool:true`.
//! - `?kind` is an output slot, e.g. `?int`.
//!
//! Supported kinds are `bool`, `int`, `uint`, `float`, `char`, `str` and
//! `bytes` (the UTF-8 bytes of the value). Custom field types cannot be
//! written on the command line.
//!
//! # Example
//! ```rust
//! use tuplespace::{FieldKind, TemplateField, Value, cli::parse_field};
//!
//! assert_eq!(parse_field("int:42").unwrap(), TemplateField::Literal(Value::Int(42)));
//! assert_eq!(parse_field("?str").unwrap(), TemplateField::Slot(FieldKind::Str));
//! ```
use thiserror::Error;

use crate::{
    template::{Template, TemplateField},
    tuple::Tuple,
    value::{FieldKind, Value},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("field '{0}' is missing a kind. Example: int:42")]
    MissingKind(String),

    #[error("unknown field kind '{0}'")]
    UnknownKind(String),

    #[error("invalid {kind} value '{value}'")]
    InvalidValue { kind: String, value: String },

    #[error("output slot '{0}' is not allowed in a tuple")]
    SlotInTuple(String),
}

fn parse_kind(kind: &str) -> Result<FieldKind, FieldParseError> {
    match kind.to_lowercase().as_str() {
        "bool" => Ok(FieldKind::Bool),
        "int" => Ok(FieldKind::Int),
        "uint" => Ok(FieldKind::Uint),
        "float" => Ok(FieldKind::Float),
        "char" => Ok(FieldKind::Char),
        "str" => Ok(FieldKind::Str),
        "bytes" => Ok(FieldKind::Bytes),
        _ => Err(FieldParseError::UnknownKind(kind.to_string())),
    }
}

/// Parses a `kind:value` literal.
pub fn parse_literal(s: &str) -> Result<Value, FieldParseError> {
    let s = s.trim();
    if s.starts_with('?') {
        return Err(FieldParseError::SlotInTuple(s.to_string()));
    }
    let (kind, raw) = s
        .split_once(':')
        .ok_or_else(|| FieldParseError::MissingKind(s.to_string()))?;

    let invalid = || FieldParseError::InvalidValue {
        kind: kind.to_string(),
        value: raw.to_string(),
    };

    Ok(match parse_kind(kind)? {
        FieldKind::Bool => Value::Bool(raw.parse().map_err(|_| invalid())?),
        FieldKind::Int => Value::Int(raw.parse().map_err(|_| invalid())?),
        FieldKind::Uint => Value::Uint(raw.parse().map_err(|_| invalid())?),
        FieldKind::Float => Value::Float(raw.parse().map_err(|_| invalid())?),
        FieldKind::Char => Value::Char(raw.parse().map_err(|_| invalid())?),
        FieldKind::Str => Value::Str(raw.to_string()),
        FieldKind::Bytes => Value::Bytes(raw.as_bytes().to_vec()),
        FieldKind::Custom(_) => return Err(invalid()),
    })
}

/// Parses a literal or a `?kind` output slot.
pub fn parse_field(s: &str) -> Result<TemplateField, FieldParseError> {
    match s.trim().strip_prefix('?') {
        Some(kind) => Ok(TemplateField::Slot(parse_kind(kind)?)),
        None => parse_literal(s).map(TemplateField::Literal),
    }
}

pub fn parse_tuple<S: AsRef<str>>(fields: &[S]) -> Result<Tuple, FieldParseError> {
    fields.iter().map(|f| parse_literal(f.as_ref())).collect()
}

pub fn parse_template<S: AsRef<str>>(fields: &[S]) -> Result<Template, FieldParseError> {
    fields.iter().map(|f| parse_field(f.as_ref())).collect()
}
