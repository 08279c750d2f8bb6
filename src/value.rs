//! Typed field values.
//!
//! Every field that travels inside a [`Tuple`](crate::Tuple) or a
//! [`Template`](crate::Template) is a [`Value`]. The set of built-in kinds is
//! closed; anything else a caller wants to exchange is carried as a
//! [`Value::Custom`] whose payload is the wire encoding of the caller's type,
//! tagged with the name the type was registered under (see
//! [`registry`](crate::registry)).
//!
//! The [`FieldKind`] of a value is what survives a wire round trip, so a
//! decoded value can always be read back as the type it was built from.
//!
//! # Example
//! ```rust
//! use tuplespace::{FieldKind, FieldType, Value};
//!
//! let value = Value::from("a");
//! assert_eq!(value.kind(), FieldKind::Str);
//! assert_eq!(String::from_value(&value).unwrap(), "a");
//! ```
use std::fmt;

use bincode::{Decode, Encode};
use thiserror::Error;

use crate::{
    error::EncodeError,
    protocol::{decode_field, encode_field},
    registry,
};

/// Errors raised when a value is read back as a concrete type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error("expected a {expected} field, found {found}")]
    KindMismatch { expected: FieldKind, found: FieldKind },

    #[error("field {position} is out of range for {len} fields")]
    OutOfRange { position: usize, len: usize },

    #[error("expected {expected} fields, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    #[error("{value} does not fit the requested {kind} type")]
    Overflow { kind: FieldKind, value: String },

    #[error("failed to decode custom field '{type_name}': {reason}")]
    Custom { type_name: String, reason: String },
}

/// Runtime type identity of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Encode, Decode)]
pub enum FieldKind {
    Bool,
    Int,
    Uint,
    Float,
    Char,
    Str,
    Bytes,
    /// Caller-defined type, identified by its registered name.
    Custom(String),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Int => write!(f, "int"),
            FieldKind::Uint => write!(f, "uint"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::Char => write!(f, "char"),
            FieldKind::Str => write!(f, "str"),
            FieldKind::Bytes => write!(f, "bytes"),
            FieldKind::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// A single typed field.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Str(String),
    Bytes(Vec<u8>),
    Custom { type_name: String, data: Vec<u8> },
}

impl Value {
    /// Registers `T` and wraps its wire encoding as a custom field.
    pub fn custom<T: CustomField>(value: &T) -> Result<Self, EncodeError> {
        registry::register::<T>()?;
        Ok(Value::Custom {
            type_name: T::TYPE_NAME.to_string(),
            data: encode_field(value)?,
        })
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Value::Bool(_) => FieldKind::Bool,
            Value::Int(_) => FieldKind::Int,
            Value::Uint(_) => FieldKind::Uint,
            Value::Float(_) => FieldKind::Float,
            Value::Char(_) => FieldKind::Char,
            Value::Str(_) => FieldKind::Str,
            Value::Bytes(_) => FieldKind::Bytes,
            Value::Custom { type_name, .. } => FieldKind::Custom(type_name.clone()),
        }
    }

    fn mismatch(&self, expected: FieldKind) -> ValueError {
        ValueError::KindMismatch {
            expected,
            found: self.kind(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Uint(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Char(v) => write!(f, "{v:?}"),
            Value::Str(v) => write!(f, "{v:?}"),
            Value::Bytes(v) => write!(f, "{v:?}"),
            Value::Custom { type_name, data } => write!(f, "{type_name}<{} bytes>", data.len()),
        }
    }
}

/// Rust types that can be read out of (and declared as slots for) a field.
pub trait FieldType: Sized {
    fn kind() -> FieldKind;

    fn from_value(value: &Value) -> Result<Self, ValueError>;
}

/// Caller-defined field types.
///
/// The name is what identifies the type on the wire, so it has to be the same
/// in every process exchanging the type and unique within one process.
pub trait CustomField: Encode + Decode<()> + 'static {
    const TYPE_NAME: &'static str;
}

/// Reads a [`CustomField`] back out of a [`Value::Custom`].
#[derive(Debug, Clone, PartialEq)]
pub struct Custom<T>(pub T);

impl<T: CustomField> FieldType for Custom<T> {
    fn kind() -> FieldKind {
        FieldKind::Custom(T::TYPE_NAME.to_string())
    }

    fn from_value(value: &Value) -> Result<Self, ValueError> {
        match value {
            Value::Custom { type_name, data } if type_name == T::TYPE_NAME => decode_field(data)
                .map(Custom)
                .map_err(|e| ValueError::Custom {
                    type_name: type_name.clone(),
                    reason: e.to_string(),
                }),
            other => Err(other.mismatch(Self::kind())),
        }
    }
}

macro_rules! builtin_field {
    ($ty:ty, $variant:ident, $kind:ident) => {
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::$variant(value.into())
            }
        }

        impl FieldType for $ty {
            fn kind() -> FieldKind {
                FieldKind::$kind
            }

            fn from_value(value: &Value) -> Result<Self, ValueError> {
                match value {
                    Value::$variant(v) => {
                        <$ty>::try_from(v.clone()).map_err(|_| ValueError::Overflow {
                            kind: FieldKind::$kind,
                            value: value.to_string(),
                        })
                    }
                    other => Err(other.mismatch(FieldKind::$kind)),
                }
            }
        }
    };
}

builtin_field!(bool, Bool, Bool);
builtin_field!(i64, Int, Int);
builtin_field!(i32, Int, Int);
builtin_field!(u64, Uint, Uint);
builtin_field!(u32, Uint, Uint);
builtin_field!(f64, Float, Float);
builtin_field!(char, Char, Char);
builtin_field!(String, Str, Str);
builtin_field!(Vec<u8>, Bytes, Bytes);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}
