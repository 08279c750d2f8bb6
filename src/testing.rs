//! Loopback nodes for exercising the client against a real socket.
use std::{
    net::{TcpListener, TcpStream},
    thread::{self, JoinHandle},
};

use log::{info, warn};

use crate::{
    binder::bind,
    connection::PointToPoint,
    protocol::{Operation, Payload, ProtocolTransport, Request, Response},
    template::{Template, TemplateField},
    tuple::Tuple,
};

/// A node that serves a fixed number of connections on its own thread.
pub(crate) struct ScriptedNode {
    node: PointToPoint,
    handle: JoinHandle<()>,
}

impl ScriptedNode {
    fn spawn<F>(connections: usize, mut handler: F) -> Self
    where
        F: FnMut(Request, &mut ProtocolTransport<TcpStream>) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        let addr = listener.local_addr().expect("listener address");
        info!("scripted node listening at {addr}");

        let handle = thread::spawn(move || {
            for stream in listener.incoming().take(connections) {
                let mut transport = match stream {
                    Ok(stream) => ProtocolTransport::new(stream),
                    Err(e) => {
                        warn!("broken connection: {e:?}");
                        continue;
                    }
                };
                match transport.read_request() {
                    Ok(req) => handler(req, &mut transport),
                    Err(e) => warn!("no request received: {e}"),
                }
            }
        });

        Self {
            node: PointToPoint::new("scripted", "127.0.0.1", addr.port()),
            handle,
        }
    }

    /// Answers one request with whatever `respond` returns.
    pub(crate) fn respond<F>(respond: F) -> Self
    where
        F: FnOnce(Request) -> Response + Send + 'static,
    {
        let mut respond = Some(respond);
        Self::spawn(1, move |req, transport| {
            if let Some(respond) = respond.take() {
                let expected = req.operation.response_shape();
                let resp = respond(req);
                assert_eq!(resp.shape(), expected, "scripted response of the wrong shape");
                transport
                    .write_response(&resp)
                    .expect("write scripted response");
            }
        })
    }

    /// Reads one request, hands it to `inspect` and closes without replying.
    pub(crate) fn silent<F>(inspect: F) -> Self
    where
        F: FnOnce(Request) + Send + 'static,
    {
        let mut inspect = Some(inspect);
        Self::spawn(1, move |req, _| {
            if let Some(inspect) = inspect.take() {
                inspect(req)
            }
        })
    }

    /// Keeps tuples in memory and serves `connections` calls. A blocking
    /// retrieval with nothing to return fails the test instead of waiting.
    pub(crate) fn cooperative(connections: usize) -> Self {
        let mut space: Vec<Tuple> = Vec::new();

        Self::spawn(connections, move |req, transport| {
            let resp = match (req.operation, req.payload) {
                (Operation::Insert, Payload::Tuple(tuple)) => {
                    space.push(tuple);
                    Response::Ack(true)
                }
                (Operation::InsertAsync, Payload::Tuple(tuple)) => {
                    space.push(tuple);
                    Response::Sent
                }
                (op @ (Operation::BlockingGet | Operation::BlockingQuery), Payload::Template(t)) => {
                    match take(&mut space, &t, op.is_destructive()) {
                        Some(tuple) => Response::Tuple(tuple),
                        None => panic!("{op:?} would block on an empty scripted node"),
                    }
                }
                (op @ (Operation::TryGet | Operation::TryQuery), Payload::Template(t)) => {
                    Response::Flagged(take(&mut space, &t, op.is_destructive()))
                }
                (Operation::GetAll, Payload::Empty) => Response::Tuples(space.drain(..).collect()),
                (Operation::QueryAll, Payload::Empty) => Response::Tuples(space.clone()),
                (op, payload) => panic!("unexpected {op:?} request with {payload:?}"),
            };
            transport
                .write_response(&resp)
                .expect("write cooperative response");
        })
    }

    pub(crate) fn descriptor(&self) -> PointToPoint {
        self.node.clone()
    }

    /// Waits for every scripted connection, re-raising handler panics.
    pub(crate) fn join(self) {
        if let Err(panic) = self.handle.join() {
            std::panic::resume_unwind(panic);
        }
    }
}

fn take(space: &mut Vec<Tuple>, template: &Template, remove: bool) -> Option<Tuple> {
    let position = space.iter().position(|tuple| fits(tuple, template))?;
    if remove {
        Some(space.remove(position))
    } else {
        Some(space[position].clone())
    }
}

fn fits(tuple: &Tuple, template: &Template) -> bool {
    bind(tuple, template).is_ok()
        && template
            .fields()
            .iter()
            .zip(tuple.iter())
            .all(|(field, value)| match field {
                TemplateField::Literal(literal) => literal == value,
                TemplateField::Slot(_) => true,
            })
}
