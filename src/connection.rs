//! Node descriptors and per-call connection establishment.
use std::{
    fmt,
    net::{SocketAddr, TcpStream, ToSocketAddrs},
    time::Duration,
};

use log::{debug, warn};

use crate::error::ConnectionError;

/// Address of a remote tuple space node.
///
/// Resolution of names to descriptors belongs to the node directory; this
/// type only carries the result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointToPoint {
    name: String,
    address: String,
}

impl PointToPoint {
    pub fn new(name: impl Into<String>, host: &str, port: u16) -> Self {
        let address = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]:{port}")
        } else {
            format!("{host}:{port}")
        };
        Self {
            name: name.into(),
            address,
        }
    }

    /// Descriptor for a `host:port` address, named after the address.
    pub fn from_address(address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            name: address.clone(),
            address,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn resolve(&self) -> Result<Vec<SocketAddr>, ConnectionError> {
        let invalid = |reason: String| ConnectionError::InvalidDescriptor {
            address: self.address.clone(),
            reason,
        };

        let addrs = self
            .address
            .to_socket_addrs()
            .map_err(|e| invalid(e.to_string()))?
            .collect::<Vec<_>>();
        if addrs.is_empty() {
            return Err(invalid("address resolved to nothing".into()));
        }
        Ok(addrs)
    }
}

impl fmt::Display for PointToPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.address {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{}@{}", self.name, self.address)
        }
    }
}

/// Client connection settings.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Bound on dialing only; blocking retrievals are never timed out.
    pub connect_timeout: Option<Duration>,
    pub nodelay: bool,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }
}

/// Opens the one stream a call uses. Dropping the stream closes it.
pub fn open(node: &PointToPoint, config: &ClientConfig) -> Result<TcpStream, ConnectionError> {
    let mut last_err = None;

    for addr in node.resolve()? {
        let attempt = match config.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => {
                stream.set_nodelay(config.nodelay)?;
                debug!("connected to {node} via {addr}");
                return Ok(stream);
            }
            Err(e) => {
                warn!("failed to connect to {node} via {addr}: {e}");
                last_err = Some(e);
            }
        }
    }

    Err(ConnectionError::Unreachable {
        address: node.address.clone(),
        source: last_err
            .unwrap_or_else(|| std::io::Error::other("no address to connect to")),
    })
}
