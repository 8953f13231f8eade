//! Cooperative HTTP/1.1 responder.
//!
//! [`HttpConfigServer::poll`] is called once per tick from the network phase
//! of the control loop.  It accepts every pending connection, then steps each
//! open connection through a two-state lifecycle:
//!
//! ```text
//!  accept ──▶ AwaitingRequest ──(first packet)──▶ Sending ──(acked ≥ total)──▶ closed
//!                   │                                │
//!                   └──────────(peer close)──────────┴──▶ closed
//! ```
//!
//! One request per connection; bytes after the first packet are ignored.
//! Bytes taken by the socket layer count as acknowledged.
//!
//! There are no timeouts.  A peer that connects and never sends, or never
//! drains its receive window, keeps its slot open indefinitely.

use log::{debug, warn};

use super::RequestHandler;
use super::routes;
use super::transport::{Connection, Listener, Recv};
use crate::app::ports::NetworkPort;

/// Largest request prefix examined.  Routes and queries fit well inside.
const REQUEST_BUF: usize = 1024;

enum Phase {
    AwaitingRequest,
    Sending { response: Vec<u8>, total: usize, acked: usize },
    Finished,
}

/// Transient per-socket record.
pub struct HttpConnection<C> {
    id: u32,
    conn: C,
    phase: Phase,
}

impl<C: Connection> HttpConnection<C> {
    fn new(id: u32, conn: C) -> Self {
        Self {
            id,
            conn,
            phase: Phase::AwaitingRequest,
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    fn step<H, R>(&mut self, handler: &mut H, respond: &mut R)
    where
        H: RequestHandler,
        R: FnMut(&[u8], &mut H) -> Option<Vec<u8>>,
    {
        let mut buf = [0u8; REQUEST_BUF];
        match self.conn.recv(&mut buf) {
            Ok(Recv::Closed) => {
                debug!("http[{}]: peer closed", self.id);
                self.phase = Phase::Finished;
                return;
            }
            Ok(Recv::Data(n)) if matches!(self.phase, Phase::AwaitingRequest) => {
                self.phase = match respond(&buf[..n], handler) {
                    Some(response) => {
                        let total = response.len();
                        Phase::Sending {
                            response,
                            total,
                            acked: 0,
                        }
                    }
                    None => {
                        warn!("http[{}]: out of memory, dropping request", self.id);
                        Phase::Finished
                    }
                };
            }
            Ok(Recv::Data(_) | Recv::Pending) => {}
            Err(e) => {
                warn!("http[{}]: {}", self.id, e);
                self.phase = Phase::Finished;
                return;
            }
        }

        if let Phase::Sending {
            response,
            total,
            acked,
        } = &mut self.phase
        {
            while *acked < *total {
                match self.conn.send(&response[*acked..]) {
                    Ok(0) => break,
                    Ok(n) => *acked += n,
                    Err(e) => {
                        warn!("http[{}]: {}", self.id, e);
                        self.phase = Phase::Finished;
                        return;
                    }
                }
            }
            if *acked >= *total {
                debug!("http[{}]: sent {} bytes, closing", self.id, total);
                self.phase = Phase::Finished;
            }
        }
    }
}

/// Single listening socket plus the set of live connections.
pub struct HttpConfigServer<L: Listener> {
    listener: L,
    connections: Vec<HttpConnection<L::Conn>>,
    next_id: u32,
}

impl<L: Listener> HttpConfigServer<L> {
    pub fn new(listener: L) -> Self {
        Self {
            listener,
            connections: Vec::new(),
            next_id: 0,
        }
    }

    /// Connections currently holding a record.
    pub fn open_connections(&self) -> usize {
        self.connections.len()
    }

    /// Accept, receive, respond and reap.  Never blocks.
    pub fn poll<H: RequestHandler>(&mut self, handler: &mut H) {
        self.poll_with(handler, |request, h| routes::respond(request, h));
    }

    /// [`poll`](Self::poll) with the response builder supplied by the caller.
    /// A builder returning `None` closes the connection without a reply.
    fn poll_with<H, R>(&mut self, handler: &mut H, mut respond: R)
    where
        H: RequestHandler,
        R: FnMut(&[u8], &mut H) -> Option<Vec<u8>>,
    {
        loop {
            match self.listener.accept() {
                Ok(Some(conn)) => {
                    self.next_id = self.next_id.wrapping_add(1);
                    if self.connections.try_reserve(1).is_err() {
                        // Dropping `conn` closes it.
                        warn!("http[{}]: out of memory, refusing connection", self.next_id);
                        continue;
                    }
                    self.connections.push(HttpConnection::new(self.next_id, conn));
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("http: accept failed: {}", e);
                    break;
                }
            }
        }

        for c in &mut self.connections {
            c.step(handler, &mut respond);
        }
        self.connections.retain(|c| !c.is_finished());
    }
}

impl<L: Listener> NetworkPort for HttpConfigServer<L> {
    fn service(&mut self, handler: &mut impl RequestHandler) {
        self.poll(handler);
    }
}
