use std::io::{self, ErrorKind, Read, Write};

use bincode::{
    Decode, Encode,
    config::{BigEndian, Configuration, Fixint, Limit},
    decode_from_slice, decode_from_std_read, encode_to_vec,
};
use log::trace;

use crate::{
    error::{ConnectionError, DecodeError, EncodeError, Error, Result},
    registry,
    tuple::Tuple,
};

use super::{Request, Response};

/// Upper bound on a single message, enforced when writing and when reading.
pub const MAX_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

type WireConfig = Configuration<BigEndian, Fixint, Limit<MAX_MESSAGE_SIZE>>;

fn config() -> WireConfig {
    bincode::config::standard()
        .with_big_endian()
        .with_fixed_int_encoding()
        .with_limit::<MAX_MESSAGE_SIZE>()
}

/// Encodes a caller-defined field payload.
pub(crate) fn encode_field<T: Encode>(value: &T) -> std::result::Result<Vec<u8>, EncodeError> {
    Ok(encode_to_vec(value, config())?)
}

/// Decodes a caller-defined field payload; trailing bytes are rejected.
pub(crate) fn decode_field<T: Decode<()>>(
    bytes: &[u8],
) -> std::result::Result<T, bincode::error::DecodeError> {
    let (value, read) = decode_from_slice(bytes, config())?;
    if read != bytes.len() {
        return Err(bincode::error::DecodeError::OtherString(format!(
            "{} trailing bytes",
            bytes.len() - read
        )));
    }
    Ok(value)
}

/// Reads one logical message per call and writes one per call, over any
/// bidirectional byte stream.
pub struct ProtocolTransport<T: Read + Write> {
    stream: T,
    config: WireConfig,
}

impl<T: Read + Write> ProtocolTransport<T> {
    pub fn new(stream: T) -> Self {
        Self {
            stream,
            config: config(),
        }
    }

    pub fn into_inner(self) -> T {
        self.stream
    }

    pub fn write_request(&mut self, req: &Request) -> Result<()> {
        for kind in req.field_kinds() {
            if !registry::is_known(&kind) {
                return Err(EncodeError::UnregisteredType(kind.to_string()).into());
            }
        }
        trace!("writing {:?} request", req.operation);
        self.write(req)
    }

    pub fn read_request(&mut self) -> Result<Request> {
        self.read()
    }

    /// Writes `resp` in the wire shape of its operation family.
    pub fn write_response(&mut self, resp: &Response) -> Result<()> {
        match resp {
            Response::Ack(ok) => self.write(ok),
            Response::Sent => Ok(()),
            Response::Tuple(tuple) => self.write(tuple),
            Response::Flagged(Some(tuple)) => self.write(&(true, tuple)),
            Response::Flagged(None) => self.write(&(false, Tuple::default())),
            Response::Tuples(tuples) => self.write(tuples),
        }
    }

    pub fn read_ack(&mut self) -> Result<bool> {
        self.read()
    }

    pub fn read_tuple(&mut self) -> Result<Tuple> {
        let tuple: Tuple = self.read()?;
        check_registered(&tuple)?;
        Ok(tuple)
    }

    /// Reads a `(bool, Tuple)` pair; the placeholder tuple of an absent match
    /// is dropped.
    pub fn read_flagged(&mut self) -> Result<Option<Tuple>> {
        let (found, tuple): (bool, Tuple) = self.read()?;
        if !found {
            return Ok(None);
        }
        check_registered(&tuple)?;
        Ok(Some(tuple))
    }

    pub fn read_tuples(&mut self) -> Result<Vec<Tuple>> {
        let tuples: Vec<Tuple> = self.read()?;
        for tuple in &tuples {
            check_registered(tuple)?;
        }
        Ok(tuples)
    }

    fn write<E: Encode>(&mut self, message: &E) -> Result<()> {
        let bytes = encode_to_vec(message, self.config).map_err(EncodeError::from)?;
        if bytes.len() > MAX_MESSAGE_SIZE {
            return Err(EncodeError::TooLarge {
                size: bytes.len(),
                limit: MAX_MESSAGE_SIZE,
            }
            .into());
        }
        self.stream
            .write_all(&bytes)
            .and_then(|_| self.stream.flush())
            .map_err(ConnectionError::Io)?;
        trace!("wrote {} bytes", bytes.len());
        Ok(())
    }

    fn read<D: Decode<()>>(&mut self) -> Result<D> {
        let mut reader = CountingReader {
            inner: &mut self.stream,
            read: 0,
        };
        match decode_from_std_read(&mut reader, self.config) {
            Ok(message) => {
                trace!("read {} bytes", reader.read);
                Ok(message)
            }
            Err(err) => Err(classify(err, reader.read)),
        }
    }
}

fn check_registered(tuple: &Tuple) -> std::result::Result<(), DecodeError> {
    for value in tuple.iter() {
        let kind = value.kind();
        if !registry::is_known(&kind) {
            return Err(DecodeError::UnregisteredType(kind.to_string()));
        }
    }
    Ok(())
}

/// Separates a stream that ended (or broke) from data that made no sense.
fn classify(err: bincode::error::DecodeError, read: usize) -> Error {
    use bincode::error::DecodeError::Io;

    match err {
        Io { inner, .. } if inner.kind() == ErrorKind::UnexpectedEof && read == 0 => {
            ConnectionError::Closed.into()
        }
        Io { inner, .. } if inner.kind() == ErrorKind::UnexpectedEof => {
            DecodeError::Truncated { read }.into()
        }
        Io { inner, .. } => ConnectionError::Io(inner).into(),
        other => DecodeError::Malformed(other).into(),
    }
}

struct CountingReader<'a, R: Read> {
    inner: &'a mut R,
    read: usize,
}

impl<R: Read> Read for CountingReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.read += n;
        Ok(n)
    }
}
