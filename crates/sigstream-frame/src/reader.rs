use std::io::{ErrorKind, Read};

use bytes::{Bytes, BytesMut};
use sigstream_transport::SignalStream;
use tracing::trace;

use crate::codec::{FrameConfig, RawFrame};
use crate::error::{FrameError, ReadStage, Result};
use crate::header::{decode_header, FrameHeader, HEADER_SIZE};

/// Reads complete frames from any `Read` stream.
///
/// Alternates strictly between assembling a 28-byte header and assembling
/// exactly `data_length` payload bytes. Short reads are accumulated
/// internally; callers always get whole frames and the stream is left at the
/// start of the next header.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
    stage: ReadStage,
    frames_read: u64,
    bytes_read: u64,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            config,
            stage: ReadStage::Header,
            frames_read: 0,
            bytes_read: 0,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// End-of-stream anywhere inside a frame, including before its first
    /// header byte, is [`FrameError::ConnectionClosed`].
    pub fn read_frame(&mut self) -> Result<RawFrame> {
        let header = self.read_header()?;
        let payload = self.read_payload(&header)?;
        self.frames_read += 1;
        Ok(RawFrame { header, payload })
    }

    fn read_header(&mut self) -> Result<FrameHeader> {
        self.stage = ReadStage::Header;
        let mut buf = [0u8; HEADER_SIZE];
        self.fill(&mut buf)?;
        let header = decode_header(&buf)?;
        trace!(
            message_type = header.message_type,
            data_length = header.data_length,
            "frame header"
        );
        self.stage = ReadStage::Payload;
        Ok(header)
    }

    fn read_payload(&mut self, header: &FrameHeader) -> Result<Bytes> {
        let len = header.payload_len();
        if len > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: len,
                max: self.config.max_payload_size,
            });
        }

        let mut buf = BytesMut::zeroed(len);
        self.fill(&mut buf)?;
        self.stage = ReadStage::Header;
        Ok(buf.freeze())
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(FrameError::ConnectionClosed {
                        stage: self.stage,
                        needed: buf.len(),
                        received: filled,
                    })
                }
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        self.bytes_read += filled as u64;
        Ok(())
    }

    /// Which half of a frame the next read will assemble.
    pub fn stage(&self) -> ReadStage {
        self.stage
    }

    /// Number of complete frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /// Number of bytes consumed from the stream so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Update maximum payload size for subsequent frames.
    pub fn set_max_payload_size(&mut self, max_payload_size: usize) {
        self.config.max_payload_size = max_payload_size;
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameReader<SignalStream> {
    /// Create a frame reader for `SignalStream` and apply read timeout from config.
    pub fn with_config_stream(inner: SignalStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

fn transport_to_frame_error(err: sigstream_transport::TransportError) -> FrameError {
    match err {
        sigstream_transport::TransportError::Io(io) => FrameError::Io(io),
        sigstream_transport::TransportError::Resolve { source, .. }
        | sigstream_transport::TransportError::Connect { source, .. } => FrameError::Io(source),
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bytes::BytesMut;

    use super::*;
    use crate::codec::{encode_frame, encode_header};
    use crate::header::MessageType;
    use crate::payload::SignalDataBuilder;

    fn wire(frames: &[(MessageType, &[u8])]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        for (kind, payload) in frames {
            encode_frame(&FrameHeader::new(*kind, 0), payload, &mut buf).unwrap();
        }
        buf.to_vec()
    }

    #[test]
    fn read_single_frame() {
        let payload = SignalDataBuilder::new(1).sample(1).build();
        let bytes = wire(&[(MessageType::SignalData, &payload)]);

        let mut reader = FrameReader::new(Cursor::new(bytes));
        let frame = reader.read_frame().unwrap();

        assert_eq!(frame.kind(), MessageType::SignalData);
        assert_eq!(frame.payload, payload);
        assert_eq!(reader.frames_read(), 1);
        assert_eq!(reader.bytes_read(), (HEADER_SIZE + payload.len()) as u64);
        assert_eq!(reader.stage(), ReadStage::Header);
    }

    #[test]
    fn read_multiple_frames_back_to_back() {
        let bytes = wire(&[
            (MessageType::SignalData, b"one-----"),
            (MessageType::Other(255), b"xyz"),
            (MessageType::Interpretation, b""),
        ]);

        let mut reader = FrameReader::new(Cursor::new(bytes));

        let f1 = reader.read_frame().unwrap();
        let f2 = reader.read_frame().unwrap();
        let f3 = reader.read_frame().unwrap();

        assert_eq!((f1.kind(), f1.payload.as_ref()), (MessageType::SignalData, b"one-----".as_ref()));
        assert_eq!((f2.kind(), f2.payload.as_ref()), (MessageType::Other(255), b"xyz".as_ref()));
        assert_eq!(f3.kind(), MessageType::Interpretation);
        assert!(f3.payload.is_empty());
    }

    #[test]
    fn partial_read_handling() {
        let bytes = wire(&[(MessageType::Other(3), b"slow")]);

        let byte_reader = ByteByByteReader { bytes, pos: 0 };
        let mut reader = FrameReader::new(byte_reader);

        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.kind(), MessageType::Other(3));
        assert_eq!(frame.payload.as_ref(), b"slow");
    }

    #[test]
    fn read_frame_with_large_payload() {
        let payload = vec![0xAB; 64 * 1024];
        let bytes = wire(&[(MessageType::Other(9), &payload)]);

        let mut reader = FrameReader::new(Cursor::new(bytes));
        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.payload.as_ref(), payload.as_slice());
    }

    #[test]
    fn empty_stream_is_closed_during_header() {
        let mut reader = FrameReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(
            err,
            FrameError::ConnectionClosed {
                stage: ReadStage::Header,
                needed: HEADER_SIZE,
                received: 0
            }
        ));
    }

    #[test]
    fn connection_closed_mid_header() {
        let bytes = wire(&[(MessageType::SignalData, b"abc")]);
        let mut reader = FrameReader::new(Cursor::new(bytes[..10].to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(
            err,
            FrameError::ConnectionClosed {
                stage: ReadStage::Header,
                received: 10,
                ..
            }
        ));
    }

    #[test]
    fn connection_closed_mid_payload() {
        let mut partial = BytesMut::new();
        encode_header(&FrameHeader::new(MessageType::SignalData, 16), &mut partial);
        partial.extend_from_slice(b"only-part");

        let mut reader = FrameReader::new(Cursor::new(partial.to_vec()));
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(
            err,
            FrameError::ConnectionClosed {
                stage: ReadStage::Payload,
                needed: 16,
                received: 9
            }
        ));
    }

    #[test]
    fn oversized_frame_in_stream() {
        let mut bytes = BytesMut::new();
        encode_header(&FrameHeader::new(MessageType::SignalData, 1024), &mut bytes);

        let cfg = FrameConfig {
            max_payload_size: 16,
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config(Cursor::new(bytes.to_vec()), cfg);
        let err = reader.read_frame().unwrap_err();
        assert!(matches!(
            err,
            FrameError::PayloadTooLarge {
                size: 1024,
                max: 16
            }
        ));
    }

    #[test]
    fn interrupted_read_retries() {
        let bytes = wire(&[(MessageType::Other(8), b"ok")]);
        let reader = FailFirstThenData {
            kind: ErrorKind::Interrupted,
            failed: false,
            bytes,
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        let frame = framed.read_frame().unwrap();
        assert_eq!(frame.payload.as_ref(), b"ok");
    }

    #[test]
    fn timeout_propagates_io_error() {
        let bytes = wire(&[(MessageType::SignalData, b"ok")]);
        let reader = FailFirstThenData {
            kind: ErrorKind::WouldBlock,
            failed: false,
            bytes,
            pos: 0,
        };
        let mut framed = FrameReader::new(reader);
        let err = framed.read_frame().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::WouldBlock));
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = FrameReader::new(cursor);

        reader.set_max_payload_size(8);
        assert_eq!(reader.config().max_payload_size, 8);
        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    #[test]
    fn reads_over_tcp_loopback() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let bytes = wire(&[(MessageType::SignalData, b"tcp-payload")]);

        let producer = std::thread::spawn(move || {
            use std::io::Write;
            let (mut stream, _) = listener.accept().unwrap();
            for chunk in bytes.chunks(5) {
                stream.write_all(chunk).unwrap();
                stream.flush().unwrap();
            }
        });

        let stream = sigstream_transport::connect(&addr, None).unwrap();
        let cfg = FrameConfig {
            read_timeout: Some(std::time::Duration::from_secs(5)),
            ..FrameConfig::default()
        };
        let mut reader = FrameReader::with_config_stream(stream, cfg).unwrap();
        let frame = reader.read_frame().unwrap();
        assert_eq!(frame.payload.as_ref(), b"tcp-payload");

        producer.join().unwrap();
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct FailFirstThenData {
        kind: ErrorKind,
        failed: bool,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for FailFirstThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(std::io::Error::from(self.kind));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }
}
