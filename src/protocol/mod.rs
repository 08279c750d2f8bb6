//! Client-node communication protocol.
//!
//! This module defines how a remote tuple space call is put on the wire: the
//! request envelope, the response shapes, and the transport that reads and
//! writes them over a byte stream.
//!
//! # Overview
//!
//! Every call is one exchange on its own stream. The client writes exactly one
//! [`Request`] and then reads at most one response, whose shape is a pure
//! function of the request's [`Operation`]:
//!
//! | Operation                       | Response                   |
//! |---------------------------------|----------------------------|
//! | `Insert`                        | `bool`                     |
//! | `InsertAsync`                   | nothing                    |
//! | `BlockingGet`, `BlockingQuery`  | `Tuple`                    |
//! | `TryGet`, `TryQuery`            | `(bool, Tuple)`            |
//! | `GetAll`, `QueryAll`            | `Vec<Tuple>`               |
//!
//! # Binary Format
//!
//! Messages are encoded with `bincode`:
//!
//! - All integers are big-endian with fixed-width encoding.
//! - Enums carry a discriminant, so every field keeps its [`FieldKind`](crate::FieldKind).
//! - Sequences carry their length, so a reader consumes exactly one message
//!   without any extra framing.
//! - Decoding is bounded by [`MAX_MESSAGE_SIZE`].
//!
//! # Key Components
//!
//! - [`Request`]: Operation tag plus tuple, template or empty payload.
//! - [`Response`]: Decoded result of one of the response shapes.
//! - [`ProtocolTransport`]: Reads and writes messages over any `Read + Write` stream.
//!
//! # See Also
//!
//! - [`registry`](crate::registry): Custom field types a transport accepts.
mod request;
mod response;
mod transport;

pub use request::{Operation, Payload, Request};
pub use response::{Response, ResponseShape};
pub use transport::{MAX_MESSAGE_SIZE, ProtocolTransport};

pub(crate) use transport::{decode_field, encode_field};
