//! Remote tuple space operations.
//!
//! [`RemoteSpace`] turns each call into exactly one exchange with the node:
//! open a stream, write one request, read at most one response, close. Nothing
//! is pooled or cached between calls, so a `RemoteSpace` can be shared freely
//! across threads.
//!
//! # Example
//! ```rust,no_run
//! use tuplespace::{PointToPoint, RemoteSpace, Template, Tuple};
//!
//! let space = RemoteSpace::new(PointToPoint::new("jobs", "127.0.0.1", 9000));
//!
//! space.insert(Tuple::builder().field(42i64).field("a").build()).unwrap();
//!
//! let template = Template::builder().slot::<i64>().literal("a").build();
//! let found = space.get(template).unwrap();
//! assert_eq!(found.bindings.get::<i64>(0).unwrap(), 42);
//! ```
use std::net::TcpStream;

use log::{debug, warn};

use crate::{
    binder::{Match, bind},
    connection::{self, ClientConfig, PointToPoint},
    error::{DecodeError, Result},
    protocol::{ProtocolTransport, Request, Response},
    template::Template,
    tuple::Tuple,
};

#[derive(Debug, Clone)]
pub struct RemoteSpace {
    node: PointToPoint,
    config: ClientConfig,
}

impl RemoteSpace {
    pub fn new(node: PointToPoint) -> Self {
        Self::with_config(node, ClientConfig::default())
    }

    pub fn with_config(node: PointToPoint, config: ClientConfig) -> Self {
        Self { node, config }
    }

    pub fn node(&self) -> &PointToPoint {
        &self.node
    }

    /// Inserts `tuple` and waits for the node's acknowledgement.
    pub fn insert(&self, tuple: Tuple) -> Result<bool> {
        self.exchange(&Request::insert(tuple), |t| t.read_ack())
    }

    /// Inserts `tuple` without waiting for any acknowledgement.
    ///
    /// Returns once the request is flushed; nothing is known about when, or
    /// whether, the node applies it.
    pub fn insert_async(&self, tuple: Tuple) -> Result<()> {
        self.exchange(&Request::insert_async(tuple), |_| Ok(()))
    }

    /// Removes a tuple matching `template`, blocking until one exists.
    pub fn get(&self, template: Template) -> Result<Match> {
        self.blocking(Request::blocking_get, template)
    }

    /// Reads a tuple matching `template`, blocking until one exists.
    pub fn query(&self, template: Template) -> Result<Match> {
        self.blocking(Request::blocking_query, template)
    }

    /// Removes a tuple matching `template` if there is one.
    pub fn try_get(&self, template: Template) -> Result<Option<Match>> {
        self.attempt(Request::try_get, template)
    }

    /// Reads a tuple matching `template` if there is one.
    pub fn try_query(&self, template: Template) -> Result<Option<Match>> {
        self.attempt(Request::try_query, template)
    }

    /// Removes and returns every tuple in the space.
    pub fn get_all(&self) -> Result<Vec<Tuple>> {
        self.exchange(&Request::get_all(), |t| t.read_tuples())
    }

    /// Returns every tuple in the space.
    pub fn query_all(&self) -> Result<Vec<Tuple>> {
        self.exchange(&Request::query_all(), |t| t.read_tuples())
    }

    /// Sends a raw request and reads whatever its operation answers with.
    pub fn execute(&self, req: &Request) -> Result<Response> {
        let shape = req.operation.response_shape();
        self.exchange(req, |t| Response::read(t, shape))
    }

    fn blocking(&self, request: fn(Template) -> Request, template: Template) -> Result<Match> {
        let req = request(template.clone());
        let tuple = self.exchange(&req, |t| t.read_tuple())?;
        matched(tuple, &template)
    }

    fn attempt(
        &self,
        request: fn(Template) -> Request,
        template: Template,
    ) -> Result<Option<Match>> {
        let req = request(template.clone());
        match self.exchange(&req, |t| t.read_flagged())? {
            Some(tuple) => matched(tuple, &template).map(Some),
            None => Ok(None),
        }
    }

    fn exchange<R>(
        &self,
        req: &Request,
        read: impl FnOnce(&mut ProtocolTransport<TcpStream>) -> Result<R>,
    ) -> Result<R> {
        let res = self.call(req, read);
        match &res {
            Ok(_) => debug!("{:?} on {} completed", req.operation, self.node),
            Err(e) => warn!("{:?} on {} failed: {e}", req.operation, self.node),
        }
        res
    }

    // The stream is dropped, and so closed, on every path out of here.
    fn call<R>(
        &self,
        req: &Request,
        read: impl FnOnce(&mut ProtocolTransport<TcpStream>) -> Result<R>,
    ) -> Result<R> {
        let stream = connection::open(&self.node, &self.config)?;
        let mut transport = ProtocolTransport::new(stream);
        transport.write_request(req)?;
        read(&mut transport)
    }
}

fn matched(tuple: Tuple, template: &Template) -> Result<Match> {
    let bindings = bind(&tuple, template).map_err(DecodeError::from)?;
    Ok(Match { tuple, bindings })
}
