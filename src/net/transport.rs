//! Non-blocking TCP transport.
//!
//! The HTTP responder is written against two small traits so it can be
//! driven by `std::net` on the device (ESP-IDF provides a BSD socket layer
//! over lwIP) and by in-memory fakes in tests.

use core::fmt;
use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, TcpListener, TcpStream};

use log::info;

use crate::error::NetError;

/// Outcome of one receive attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recv {
    /// `n` bytes were copied into the buffer.
    Data(usize),
    /// The peer closed its side (zero-length read).
    Closed,
    /// Nothing available yet.
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    Io(io::ErrorKind),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "socket error: {kind}"),
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(e: io::Error) -> Self {
        Self::Io(e.kind())
    }
}

pub trait Connection {
    fn recv(&mut self, buf: &mut [u8]) -> Result<Recv, TransportError>;

    /// Returns the number of bytes the stack took; `0` means "try again".
    fn send(&mut self, data: &[u8]) -> Result<usize, TransportError>;
}

pub trait Listener {
    type Conn: Connection;

    /// Next pending connection, or `None` when the backlog is empty.
    fn accept(&mut self) -> Result<Option<Self::Conn>, TransportError>;
}

// ── std::net implementation ───────────────────────────────────

pub struct TcpConnection {
    stream: TcpStream,
}

impl Connection for TcpConnection {
    fn recv(&mut self, buf: &mut [u8]) -> Result<Recv, TransportError> {
        match self.stream.read(buf) {
            Ok(0) => Ok(Recv::Closed),
            Ok(n) => Ok(Recv::Data(n)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(Recv::Pending),
            Err(e) => Err(e.into()),
        }
    }

    fn send(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        match self.stream.write(data) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct TcpServerSocket {
    listener: TcpListener,
}

impl TcpServerSocket {
    /// Bind `0.0.0.0:port` in non-blocking mode.
    pub fn bind(port: u16) -> Result<Self, NetError> {
        let addr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, port));
        let listener = TcpListener::bind(addr).map_err(|_| NetError::BindFailed)?;
        listener
            .set_nonblocking(true)
            .map_err(|_| NetError::BindFailed)?;
        info!("http: listening on {}", addr);
        Ok(Self { listener })
    }

    pub fn local_port(&self) -> Option<u16> {
        self.listener.local_addr().ok().map(|a| a.port())
    }
}

impl Listener for TcpServerSocket {
    type Conn = TcpConnection;

    fn accept(&mut self) -> Result<Option<TcpConnection>, TransportError> {
        match self.listener.accept() {
            Ok((stream, peer)) => {
                stream.set_nonblocking(true)?;
                log::debug!("http: accepted {}", peer);
                Ok(Some(TcpConnection { stream }))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn empty_backlog_is_none() {
        let mut server = TcpServerSocket::bind(0).unwrap();
        assert!(server.accept().unwrap().is_none());
    }

    #[test]
    fn loopback_exchange() {
        let mut server = TcpServerSocket::bind(0).unwrap();
        let port = server.local_port().unwrap();
        let mut client = TcpStream::connect(("127.0.0.1", port)).unwrap();
        client.write_all(b"ping").unwrap();

        let mut conn = None;
        for _ in 0..100 {
            conn = server.accept().unwrap();
            if conn.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        let mut conn = conn.expect("connection accepted");

        let mut buf = [0u8; 16];
        let mut got = Recv::Pending;
        for _ in 0..100 {
            got = conn.recv(&mut buf).unwrap();
            if got != Recv::Pending {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(got, Recv::Data(4));
        assert_eq!(&buf[..4], b"ping");

        drop(client);
        let mut closed = false;
        for _ in 0..100 {
            if conn.recv(&mut buf).unwrap() == Recv::Closed {
                closed = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(closed);
    }
}
