use std::io::{Read, Write};

use crate::{error::Result, tuple::Tuple};

use super::ProtocolTransport;

/// What a node sends back, as a function of the request's operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// A single boolean.
    Ack,
    /// No response is read.
    Nothing,
    /// A single tuple.
    Tuple,
    /// A `(bool, Tuple)` pair; the tuple is a placeholder when the flag is
    /// false.
    Flagged,
    /// A possibly empty list of tuples.
    TupleList,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Ack(bool),
    Sent,
    Tuple(Tuple),
    Flagged(Option<Tuple>),
    Tuples(Vec<Tuple>),
}

impl Response {
    /// Reads the response of the given shape from `transport`.
    pub fn read<T: Read + Write>(
        transport: &mut ProtocolTransport<T>,
        shape: ResponseShape,
    ) -> Result<Self> {
        Ok(match shape {
            ResponseShape::Ack => Response::Ack(transport.read_ack()?),
            ResponseShape::Nothing => Response::Sent,
            ResponseShape::Tuple => Response::Tuple(transport.read_tuple()?),
            ResponseShape::Flagged => Response::Flagged(transport.read_flagged()?),
            ResponseShape::TupleList => Response::Tuples(transport.read_tuples()?),
        })
    }

    pub fn shape(&self) -> ResponseShape {
        match self {
            Response::Ack(_) => ResponseShape::Ack,
            Response::Sent => ResponseShape::Nothing,
            Response::Tuple(_) => ResponseShape::Tuple,
            Response::Flagged(_) => ResponseShape::Flagged,
            Response::Tuples(_) => ResponseShape::TupleList,
        }
    }
}
