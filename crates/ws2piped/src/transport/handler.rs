//! Connection handling abstractions for the listener.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream};

/// Accepted TCP stream together with its peer address.
#[derive(Debug)]
pub(crate) struct ConnectionStream {
    stream: TcpStream,
    peer: SocketAddr,
}

impl ConnectionStream {
    pub(crate) fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }

    /// Address of the connected client.
    pub(crate) fn peer(&self) -> SocketAddr {
        self.peer
    }
}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

/// Handles accepted connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Handles a single connection until the client goes away.
    /// Implementations should avoid panicking.
    fn handle(&self, stream: ConnectionStream);
}
