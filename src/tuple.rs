//! Tuples: ordered, immutable sequences of typed fields.
use std::fmt;

use bincode::{Decode, Encode};

use crate::value::{FieldType, Value, ValueError};

/// An ordered, immutable sequence of [`Value`]s. Identity is positional.
#[derive(Debug, Clone, Default, PartialEq, Encode, Decode)]
pub struct Tuple {
    fields: Vec<Value>,
}

impl Tuple {
    pub fn new(fields: Vec<Value>) -> Self {
        Self { fields }
    }

    pub fn builder() -> TupleBuilder {
        TupleBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Value> {
        self.fields.get(position)
    }

    /// Reads the field at `position` as `T`.
    pub fn field<T: FieldType>(&self, position: usize) -> Result<T, ValueError> {
        let value = self.get(position).ok_or(ValueError::OutOfRange {
            position,
            len: self.len(),
        })?;
        T::from_value(value)
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter()
    }
}

impl From<Vec<Value>> for Tuple {
    fn from(fields: Vec<Value>) -> Self {
        Self::new(fields)
    }
}

impl FromIterator<Value> for Tuple {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        write!(f, ")")
    }
}

/// Incremental [`Tuple`] construction from literal values.
#[derive(Debug, Default)]
pub struct TupleBuilder {
    fields: Vec<Value>,
}

impl TupleBuilder {
    pub fn field(mut self, value: impl Into<Value>) -> Self {
        self.fields.push(value.into());
        self
    }

    pub fn build(self) -> Tuple {
        Tuple::new(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_tuple() {
        let tuple = Tuple::builder().field(42i64).field("a").build();

        assert_eq!(tuple.len(), 2);
        assert_eq!(tuple.field::<i64>(0).unwrap(), 42);
        assert_eq!(tuple.field::<String>(1).unwrap(), "a");
        assert_eq!(tuple.to_string(), "(42, \"a\")");
    }

    #[test]
    fn field_out_of_range() {
        let tuple = Tuple::builder().field(true).build();

        assert_eq!(
            tuple.field::<bool>(3),
            Err(ValueError::OutOfRange {
                position: 3,
                len: 1
            })
        );
    }

    #[test]
    fn empty_tuple() {
        let tuple = Tuple::default();
        assert!(tuple.is_empty());
        assert_eq!(tuple.to_string(), "()");
    }
}
