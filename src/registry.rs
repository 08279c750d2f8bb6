//! Process-wide registry of caller-defined field types.
//!
//! Built-in [`FieldKind`]s are always known. A [`CustomField`] type has to be
//! registered before a value of it can be encoded into a request or accepted
//! from a response; [`Value::custom`](crate::Value::custom) does this on first
//! use, and [`register`] can be called up front when a process only ever
//! receives the type.
//!
//! Registration is idempotent for the same Rust type. Registering a second,
//! different type under an already-taken name is rejected.
use std::{
    any::{TypeId, type_name},
    collections::HashMap,
    sync::{LazyLock, PoisonError, RwLock},
};

use log::debug;

use crate::{
    error::EncodeError,
    value::{CustomField, FieldKind},
};

#[derive(Debug)]
struct Entry {
    type_id: TypeId,
    rust_name: &'static str,
}

static REGISTRY: LazyLock<RwLock<HashMap<String, Entry>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Registers `T` under [`CustomField::TYPE_NAME`].
pub fn register<T: CustomField>() -> Result<(), EncodeError> {
    let name = T::TYPE_NAME;
    let type_id = TypeId::of::<T>();

    {
        let types = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = types.get(name) {
            return check(name, entry, type_id);
        }
    }

    let mut types = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    match types.get(name) {
        Some(entry) => check(name, entry, type_id),
        None => {
            debug!("registering field type '{name}' ({})", type_name::<T>());
            types.insert(
                name.to_string(),
                Entry {
                    type_id,
                    rust_name: type_name::<T>(),
                },
            );
            Ok(())
        }
    }
}

fn check(name: &str, entry: &Entry, type_id: TypeId) -> Result<(), EncodeError> {
    if entry.type_id == type_id {
        Ok(())
    } else {
        Err(EncodeError::TypeConflict {
            name: name.to_string(),
            registered: entry.rust_name,
        })
    }
}

/// Whether a custom type name is known to this process.
pub fn is_registered(name: &str) -> bool {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(name)
}

/// Whether values of `kind` can be encoded and decoded by this process.
pub fn is_known(kind: &FieldKind) -> bool {
    match kind {
        FieldKind::Custom(name) => is_registered(name),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use bincode::{Decode, Encode};

    use super::*;

    #[derive(Debug, Encode, Decode)]
    struct Celsius(f64);

    impl CustomField for Celsius {
        const TYPE_NAME: &'static str = "registry_tests::Temperature";
    }

    #[derive(Debug, Encode, Decode)]
    struct Fahrenheit(f64);

    impl CustomField for Fahrenheit {
        const TYPE_NAME: &'static str = "registry_tests::Temperature";
    }

    #[test]
    fn builtin_kinds_are_known() {
        assert!(is_known(&FieldKind::Int));
        assert!(is_known(&FieldKind::Bytes));
        assert!(!is_known(&FieldKind::Custom("registry_tests::Unknown".into())));
    }

    #[test]
    fn register_conflicting_names() {
        register::<Celsius>().unwrap();
        register::<Celsius>().unwrap();

        let err = register::<Fahrenheit>().unwrap_err();
        assert!(matches!(err, EncodeError::TypeConflict { .. }));
        assert!(is_registered("registry_tests::Temperature"));
    }

    macro_rules! concurrent_types {
        ($($name:ident),*) => {
            $(
                #[derive(Debug, Encode, Decode)]
                struct $name(u8);

                impl CustomField for $name {
                    const TYPE_NAME: &'static str = concat!("registry_tests::", stringify!($name));
                }
            )*
        };
    }

    concurrent_types!(A, B, C, D, E, F, G, H);

    #[test]
    fn concurrent_registration() {
        let handles = vec![
            thread::spawn(|| register::<A>()),
            thread::spawn(|| register::<B>()),
            thread::spawn(|| register::<C>()),
            thread::spawn(|| register::<D>()),
            thread::spawn(|| register::<E>()),
            thread::spawn(|| register::<F>()),
            thread::spawn(|| register::<G>()),
            thread::spawn(|| register::<H>()),
            thread::spawn(|| register::<A>()),
            thread::spawn(|| register::<H>()),
        ];

        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        for name in ["A", "B", "C", "D", "E", "F", "G", "H"] {
            assert!(is_registered(&format!("registry_tests::{name}")));
        }
    }
}
