pub mod binder;
pub mod cli;
pub mod client;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod template;
pub mod tuple;
pub mod value;

#[cfg(test)]
mod testing;

pub use binder::{Bindings, Match, bind};
pub use client::RemoteSpace;
pub use connection::{ClientConfig, PointToPoint};
pub use error::{ConnectionError, DecodeError, EncodeError, Error, Result};
pub use template::{Template, TemplateField};
pub use tuple::Tuple;
pub use value::{Custom, CustomField, FieldKind, FieldType, Value, ValueError};
