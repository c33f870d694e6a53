use std::io::ErrorKind;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::{FrameConfig, RawFrame};
use crate::error::{FrameError, ReadStage, Result};
use crate::header::{decode_header, HEADER_SIZE};

/// Async counterpart of [`crate::FrameReader`] for tokio streams.
///
/// Same contract: whole frames only, payloads always fully consumed, EOF
/// inside a frame is fatal. Each awaited read is the only suspension point.
pub struct AsyncFrameReader<T> {
    inner: T,
    config: FrameConfig,
    frames_read: u64,
    bytes_read: u64,
}

impl<T: AsyncRead + Unpin> AsyncFrameReader<T> {
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            config,
            frames_read: 0,
            bytes_read: 0,
        }
    }

    /// Read the next complete frame.
    ///
    /// `config.read_timeout`, when set, bounds each individual read wait.
    pub async fn read_frame(&mut self) -> Result<RawFrame> {
        let mut header_buf = [0u8; HEADER_SIZE];
        self.fill(&mut header_buf, ReadStage::Header).await?;
        let header = decode_header(&header_buf)?;

        let len = header.payload_len();
        if len > self.config.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: len,
                max: self.config.max_payload_size,
            });
        }
        let mut payload = BytesMut::zeroed(len);
        self.fill(&mut payload, ReadStage::Payload).await?;

        self.frames_read += 1;
        Ok(RawFrame {
            header,
            payload: payload.freeze(),
        })
    }

    async fn fill(&mut self, buf: &mut [u8], stage: ReadStage) -> Result<()> {
        let mut filled = 0usize;
        while filled < buf.len() {
            let read = self.inner.read(&mut buf[filled..]);
            let result = match self.config.read_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, read).await {
                    Ok(result) => result,
                    Err(_) => return Err(FrameError::Io(std::io::Error::from(ErrorKind::TimedOut))),
                },
                None => read.await,
            };
            match result {
                Ok(0) => {
                    return Err(FrameError::ConnectionClosed {
                        stage,
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

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}
