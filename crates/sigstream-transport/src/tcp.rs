use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::SignalStream;

/// Connect to a producer's streaming port.
///
/// `addr` is anything `ToSocketAddrs` accepts as a string (`host:port`).
/// Each resolved address is tried in order; the last failure is reported
/// when none succeed. `timeout` bounds each individual connect attempt.
pub fn connect(addr: &str, timeout: Option<Duration>) -> Result<SignalStream> {
    let candidates = resolve(addr)?;

    let mut last_err = None;
    for candidate in candidates {
        debug!(%candidate, "attempting stream connection");
        let attempt = match timeout {
            Some(timeout) => TcpStream::connect_timeout(&candidate, timeout),
            None => TcpStream::connect(candidate),
        };
        match attempt {
            Ok(stream) => {
                stream.set_nodelay(true)?;
                info!(peer = %candidate, "stream connected");
                return Ok(SignalStream::from_tcp(stream));
            }
            Err(err) => {
                debug!(%candidate, error = %err, "connect attempt failed");
                last_err = Some(err);
            }
        }
    }

    match last_err {
        Some(source) => Err(TransportError::Connect {
            addr: addr.to_string(),
            source,
        }),
        None => Err(TransportError::NoAddress(addr.to_string())),
    }
}

/// Connect to a producer's streaming port on a tokio runtime.
#[cfg(feature = "async")]
pub async fn connect_async(addr: &str) -> Result<tokio::net::TcpStream> {
    let stream = tokio::net::TcpStream::connect(addr)
        .await
        .map_err(|source| TransportError::Connect {
            addr: addr.to_string(),
            source,
        })?;
    stream.set_nodelay(true)?;
    info!(peer = addr, "stream connected");
    Ok(stream)
}

fn resolve(addr: &str) -> Result<Vec<SocketAddr>> {
    let resolved: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|source| TransportError::Resolve {
            addr: addr.to_string(),
            source,
        })?
        .collect();

    if resolved.is_empty() {
        return Err(TransportError::NoAddress(addr.to_string()));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn connect_and_read_from_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(b"sig").unwrap();
        });

        let mut stream = connect(&addr, Some(Duration::from_secs(2))).unwrap();
        assert_eq!(stream.peer_addr().unwrap().to_string(), addr);
        let mut buf = [0u8; 3];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"sig");

        server.join().unwrap();
    }

    #[test]
    fn connect_refused_reports_address() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = connect(&addr, Some(Duration::from_millis(500))).unwrap_err();
        match err {
            TransportError::Connect { addr: reported, .. } => assert_eq!(reported, addr),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unresolvable_address_is_resolve_error() {
        let err = connect("not-a-socket-address", None).unwrap_err();
        assert!(matches!(err, TransportError::Resolve { .. }));
    }

    #[test]
    fn read_timeout_surfaces_as_io_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let server = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            std::thread::sleep(Duration::from_millis(200));
            drop(stream);
        });

        let mut stream = connect(&addr, None).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_millis(20)))
            .unwrap();
        let mut buf = [0u8; 1];
        let err = stream.read(&mut buf).unwrap_err();
        assert!(matches!(
            err.kind(),
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
        ));

        server.join().unwrap();
    }
}
