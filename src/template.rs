//! Templates: per-position match constraints and output slots.
//!
//! A [`Template`] is what retrieval operations send to a node. Each position
//! is either a [`TemplateField::Literal`], which the node matches exactly, or a
//! [`TemplateField::Slot`], a typed wildcard whose matched value is handed back
//! to the caller through [`Bindings`](crate::binder::Bindings).
//!
//! # Example
//! ```rust
//! use tuplespace::{FieldKind, Template, TemplateField};
//!
//! let template = Template::builder().slot::<i64>().literal("a").build();
//!
//! assert_eq!(template.fields()[0], TemplateField::Slot(FieldKind::Int));
//! assert_eq!(template.slots().count(), 1);
//! ```
use bincode::{Decode, Encode};

use crate::{
    tuple::Tuple,
    value::{FieldKind, FieldType, Value},
};

#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub enum TemplateField {
    /// Matches a field with exactly this value and kind.
    Literal(Value),
    /// Matches any field of this kind and binds it.
    Slot(FieldKind),
}

impl TemplateField {
    pub fn kind(&self) -> FieldKind {
        match self {
            TemplateField::Literal(value) => value.kind(),
            TemplateField::Slot(kind) => kind.clone(),
        }
    }

    pub fn is_slot(&self) -> bool {
        matches!(self, TemplateField::Slot(_))
    }
}

impl From<Value> for TemplateField {
    fn from(value: Value) -> Self {
        TemplateField::Literal(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Encode, Decode)]
pub struct Template {
    fields: Vec<TemplateField>,
}

impl Template {
    pub fn new(fields: Vec<TemplateField>) -> Self {
        Self { fields }
    }

    pub fn builder() -> TemplateBuilder {
        TemplateBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[TemplateField] {
        &self.fields
    }

    /// Positions and kinds of the output slots, in order.
    pub fn slots(&self) -> impl Iterator<Item = (usize, &FieldKind)> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(i, field)| match field {
                TemplateField::Slot(kind) => Some((i, kind)),
                TemplateField::Literal(_) => None,
            })
    }
}

/// A fully literal template matching exactly `tuple`.
impl From<&Tuple> for Template {
    fn from(tuple: &Tuple) -> Self {
        tuple.iter().cloned().map(TemplateField::Literal).collect()
    }
}

impl FromIterator<TemplateField> for Template {
    fn from_iter<I: IntoIterator<Item = TemplateField>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Debug, Default)]
pub struct TemplateBuilder {
    fields: Vec<TemplateField>,
}

impl TemplateBuilder {
    pub fn literal(mut self, value: impl Into<Value>) -> Self {
        self.fields.push(TemplateField::Literal(value.into()));
        self
    }

    /// Adds an output slot receiving a `T`.
    pub fn slot<T: FieldType>(self) -> Self {
        self.slot_of(T::kind())
    }

    pub fn slot_of(mut self, kind: FieldKind) -> Self {
        self.fields.push(TemplateField::Slot(kind));
        self
    }

    pub fn build(self) -> Template {
        Template::new(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use crate::value::Custom;

    use super::*;

    #[derive(Debug, Encode, Decode)]
    struct Job(u32);

    impl crate::value::CustomField for Job {
        const TYPE_NAME: &'static str = "template_tests::Job";
    }

    #[test]
    fn build_template() {
        let template = Template::builder()
            .slot::<i64>()
            .literal("a")
            .slot::<Custom<Job>>()
            .build();

        assert_eq!(
            template.fields(),
            &[
                TemplateField::Slot(FieldKind::Int),
                TemplateField::Literal(Value::from("a")),
                TemplateField::Slot(FieldKind::Custom("template_tests::Job".into())),
            ]
        );
        assert_eq!(
            template.slots().map(|(i, _)| i).collect::<Vec<_>>(),
            vec![0, 2]
        );
    }

    #[test]
    fn literal_template_from_tuple() {
        let tuple = Tuple::builder().field(42i64).field("a").build();
        let template = Template::from(&tuple);

        assert_eq!(template.len(), 2);
        assert!(template.fields().iter().all(|f| !f.is_slot()));
        assert_eq!(template.fields()[1].kind(), FieldKind::Str);
    }
}
