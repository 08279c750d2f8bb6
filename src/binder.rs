//! Output binding.
//!
//! After a retrieval the node hands back a whole [`Tuple`]. [`bind`] pulls out
//! the values sitting at the template's slot positions so the caller can take
//! them by slot order ([`Bindings::get`]) or write them positionally into its
//! own locations ([`Bindings::apply`]). Literal positions are never touched.
use crate::{
    template::{Template, TemplateField},
    tuple::Tuple,
    value::{FieldType, Value, ValueError},
};

/// Values bound to a template's output slots, in slot order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    bound: Vec<(usize, Value)>,
}

impl Bindings {
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    /// Tuple position of the `slot`-th output slot.
    pub fn position(&self, slot: usize) -> Option<usize> {
        self.bound.get(slot).map(|(position, _)| *position)
    }

    pub fn value(&self, slot: usize) -> Option<&Value> {
        self.bound.get(slot).map(|(_, value)| value)
    }

    /// Reads the `slot`-th bound value as `T`.
    pub fn get<T: FieldType>(&self, slot: usize) -> Result<T, ValueError> {
        let value = self.value(slot).ok_or(ValueError::OutOfRange {
            position: slot,
            len: self.len(),
        })?;
        T::from_value(value)
    }

    /// `(position, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Value)> {
        self.bound.iter().map(|(position, value)| (*position, value))
    }

    /// Overwrites `locations[i]` for every slot position `i`.
    ///
    /// `locations` is indexed like the template the bindings came from; every
    /// other entry is left as it was.
    pub fn apply(&self, locations: &mut [Value]) -> Result<(), ValueError> {
        let len = locations.len();
        for (position, value) in &self.bound {
            let location = locations
                .get_mut(*position)
                .ok_or(ValueError::OutOfRange {
                    position: *position,
                    len,
                })?;
            *location = value.clone();
        }
        Ok(())
    }
}

/// A retrieved tuple together with the values bound to its template's slots.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub tuple: Tuple,
    pub bindings: Bindings,
}

/// Binds `tuple` against `template`.
///
/// The tuple must have the template's arity and carry a field of the slot's
/// kind at every slot position. Literal positions are not compared; matching
/// is the node's job.
pub fn bind(tuple: &Tuple, template: &Template) -> Result<Bindings, ValueError> {
    if tuple.len() != template.len() {
        return Err(ValueError::ArityMismatch {
            expected: template.len(),
            found: tuple.len(),
        });
    }

    let mut bound = Vec::new();
    for (position, (field, value)) in template.fields().iter().zip(tuple.iter()).enumerate() {
        if let TemplateField::Slot(kind) = field {
            if value.kind() != *kind {
                return Err(ValueError::KindMismatch {
                    expected: kind.clone(),
                    found: value.kind(),
                });
            }
            bound.push((position, value.clone()));
        }
    }

    Ok(Bindings { bound })
}
