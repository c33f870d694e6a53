use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, RawFrame};
use crate::error::{FrameError, Result};
use crate::header::{FrameHeader, MessageType};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete frames to any `Write` stream.
///
/// This is the producer side of the protocol: used by synthetic producers,
/// replay tooling, and tests.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    frames_written: u64,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            frames_written: 0,
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &RawFrame) -> Result<()> {
        self.write_with_header(&frame.header, frame.payload.as_ref())
    }

    /// Encode and send a payload with a default header for `message_type`.
    pub fn send(&mut self, message_type: MessageType, payload: &[u8]) -> Result<()> {
        self.write_with_header(&FrameHeader::new(message_type, 0), payload)
    }

    /// Encode and send a payload using `header` for every field except
    /// `data_length`, which always reflects `payload`.
    pub fn write_with_header(&mut self, header: &FrameHeader, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(header, payload, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => {
                    return Err(FrameError::Io(std::io::Error::from(ErrorKind::WriteZero)));
                }
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.inner.flush()?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
