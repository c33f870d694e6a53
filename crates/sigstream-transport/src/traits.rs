use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use crate::error::Result;

/// A connected streaming-port connection; implements Read + Write.
///
/// Reads may return fewer bytes than requested; the frame reader above
/// accumulates until a full header or payload is assembled.
pub struct SignalStream {
    inner: SignalStreamInner,
}

enum SignalStreamInner {
    Tcp(TcpStream),
}

impl Read for SignalStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            SignalStreamInner::Tcp(stream) => stream.read(buf),
        }
    }
}

impl Write for SignalStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            SignalStreamInner::Tcp(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            SignalStreamInner::Tcp(stream) => stream.flush(),
        }
    }
}

impl From<TcpStream> for SignalStream {
    fn from(stream: TcpStream) -> Self {
        Self::from_tcp(stream)
    }
}

impl SignalStream {
    /// Wrap an already-connected TCP stream.
    pub fn from_tcp(stream: TcpStream) -> Self {
        Self {
            inner: SignalStreamInner::Tcp(stream),
        }
    }

    /// Bound each individual read wait. `None` blocks indefinitely.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        match &self.inner {
            SignalStreamInner::Tcp(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
        }
    }

    /// Address of the producer on the other end.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        match &self.inner {
            SignalStreamInner::Tcp(stream) => stream.peer_addr().map_err(Into::into),
        }
    }

    /// Shut down both directions.
    pub fn shutdown(&self) -> Result<()> {
        match &self.inner {
            SignalStreamInner::Tcp(stream) => stream.shutdown(Shutdown::Both).map_err(Into::into),
        }
    }
}

impl std::fmt::Debug for SignalStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            SignalStreamInner::Tcp(stream) => f
                .debug_struct("SignalStream")
                .field("type", &"tcp")
                .field("peer", &stream.peer_addr().ok())
                .finish(),
        }
    }
}
