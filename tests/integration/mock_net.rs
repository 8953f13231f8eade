//! In-memory TCP transport for driving the HTTP responder deterministically.
//!
//! Each accepted connection shares a [`PeerState`] with the test's
//! [`MemClient`] handle, so a test can script inbound packets, throttle or
//! stall the send window, close from the peer side, and check whether the
//! server released its end.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use weatherstation::net::transport::{Connection, Listener, Recv, TransportError};

#[derive(Debug)]
struct PeerState {
    inbound: VecDeque<Vec<u8>>,
    peer_closed: bool,
    outbound: Vec<u8>,
    /// Largest chunk the "stack" takes per send call.
    window: usize,
    /// Send returns 0 while set.
    stalled: bool,
    /// Server dropped its end.
    released: bool,
}

impl Default for PeerState {
    fn default() -> Self {
        Self {
            inbound: VecDeque::new(),
            peer_closed: false,
            outbound: Vec::new(),
            window: usize::MAX,
            stalled: false,
            released: false,
        }
    }
}

pub struct MemConnection {
    state: Rc<RefCell<PeerState>>,
}

impl Connection for MemConnection {
    fn recv(&mut self, buf: &mut [u8]) -> Result<Recv, TransportError> {
        let mut s = self.state.borrow_mut();
        if let Some(chunk) = s.inbound.pop_front() {
            let n = chunk.len().min(buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            return Ok(Recv::Data(n));
        }
        if s.peer_closed {
            Ok(Recv::Closed)
        } else {
            Ok(Recv::Pending)
        }
    }

    fn send(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        let mut s = self.state.borrow_mut();
        if s.stalled {
            return Ok(0);
        }
        let n = data.len().min(s.window);
        s.outbound.extend_from_slice(&data[..n]);
        Ok(n)
    }
}

impl Drop for MemConnection {
    fn drop(&mut self) {
        self.state.borrow_mut().released = true;
    }
}

/// Test-side handle to one connection.
#[derive(Clone)]
pub struct MemClient {
    state: Rc<RefCell<PeerState>>,
}

#[allow(dead_code)]
impl MemClient {
    pub fn send(&self, bytes: &[u8]) {
        self.state.borrow_mut().inbound.push_back(bytes.to_vec());
    }

    pub fn close(&self) {
        self.state.borrow_mut().peer_closed = true;
    }

    pub fn set_window(&self, window: usize) {
        self.state.borrow_mut().window = window;
    }

    pub fn set_stalled(&self, stalled: bool) {
        self.state.borrow_mut().stalled = stalled;
    }

    pub fn released(&self) -> bool {
        self.state.borrow().released
    }

    pub fn received(&self) -> Vec<u8> {
        self.state.borrow().outbound.clone()
    }

    pub fn response(&self) -> String {
        String::from_utf8_lossy(&self.received()).into_owned()
    }

    /// Body after the blank line.
    pub fn body(&self) -> String {
        let r = self.response();
        r.split_once("\r\n\r\n").map(|(_, b)| b.to_string()).unwrap_or_default()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        let r = self.response();
        let (head, _) = r.split_once("\r\n\r\n")?;
        head.lines()
            .find_map(|l| l.strip_prefix(name)?.strip_prefix(": ").map(str::to_string))
    }
}

/// Listener whose backlog the test fills with [`MemListener::connect`].
#[derive(Clone, Default)]
pub struct MemListener {
    backlog: Rc<RefCell<VecDeque<MemConnection>>>,
}

impl MemListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self) -> MemClient {
        let state = Rc::new(RefCell::new(PeerState::default()));
        self.backlog.borrow_mut().push_back(MemConnection {
            state: Rc::clone(&state),
        });
        MemClient { state }
    }

    /// Connect and immediately send one request line.
    pub fn request(&self, line: &str) -> MemClient {
        let c = self.connect();
        c.send(format!("{line} HTTP/1.1\r\nHost: station\r\n\r\n").as_bytes());
        c
    }
}

impl Listener for MemListener {
    type Conn = MemConnection;

    fn accept(&mut self) -> Result<Option<MemConnection>, TransportError> {
        Ok(self.backlog.borrow_mut().pop_front())
    }
}
