//! Error types for remote tuple space calls.
//!
//! A call fails in exactly one of three ways: the stream could not be opened or
//! broke ([`ConnectionError`]), the request could not be represented on the
//! wire ([`EncodeError`]), or the response could not be understood
//! ([`DecodeError`]). "No matching tuple" is never an error; it is reported
//! through the operation's normal return value.
//!
//! A stream that ends before the first response byte is
//! [`ConnectionError::Closed`]. One that ends after part of a response was
//! read is [`DecodeError::Truncated`]; the bytes that did arrive are fine, so
//! this is still a connection problem and retrying is up to the caller.
use std::io;

use thiserror::Error;

use crate::value::ValueError;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("invalid node descriptor '{address}': {reason}")]
    InvalidDescriptor { address: String, reason: String },

    #[error("node '{address}' is unreachable: {source}")]
    Unreachable {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("connection closed by remote before a response was received")]
    Closed,

    #[error("stream IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("field type '{0}' has not been registered")]
    UnregisteredType(String),

    #[error("field type name '{name}' is already registered to {registered}")]
    TypeConflict {
        name: String,
        registered: &'static str,
    },

    #[error("message of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("failed to encode message: {0}")]
    Serialize(#[from] bincode::error::EncodeError),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed response: {0}")]
    Malformed(#[from] bincode::error::DecodeError),

    /// The stream ended partway through a response. Reported as a decode
    /// failure since part of the message was consumed, but the cause is the
    /// connection, not the data.
    #[error("response truncated after {read} bytes")]
    Truncated { read: usize },

    #[error("response carries unregistered field type '{0}'")]
    UnregisteredType(String),

    #[error("response does not fit the request template: {0}")]
    TemplateMismatch(#[from] ValueError),
}

/// Failure of a single remote call.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;
