use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::header::{FrameHeader, MessageType, HEADER_SIZE};

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// A header plus its fully-read payload.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub header: FrameHeader,
    pub payload: Bytes,
}

impl RawFrame {
    /// Build a frame whose header declares exactly `payload.len()` bytes.
    pub fn new(message_type: MessageType, payload: impl Into<Bytes>) -> Self {
        let payload = payload.into();
        let header = FrameHeader::new(message_type, payload.len() as u32);
        Self { header, payload }
    }

    pub fn kind(&self) -> MessageType {
        self.header.kind()
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a header into its 28-byte wire form.
pub fn encode_header(header: &FrameHeader, dst: &mut BytesMut) {
    dst.reserve(HEADER_SIZE);
    dst.put_slice(&header.magic);
    dst.put_u16_le(header.header_length);
    dst.put_u16_le(header.message_type);
    dst.put_i16_le(header.reserved1);
    dst.put_i32_le(header.reserved2);
    dst.put_u32_le(header.timestamp_family);
    dst.put_u64_le(header.timestamp);
    dst.put_u32_le(header.data_length);
}

/// Encode a header followed by `payload`.
///
/// The header's `data_length` is replaced with the real payload length so the
/// emitted frame is always self-consistent.
pub fn encode_frame(header: &FrameHeader, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    let data_length = u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge {
        size: payload.len(),
        max: u32::MAX as usize,
    })?;
    let header = FrameHeader {
        data_length,
        ..*header
    };
    dst.reserve(HEADER_SIZE + payload.len());
    encode_header(&header, dst);
    dst.put_slice(payload);
    Ok(())
}

/// Configuration for frame reading.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest `data_length` the reader will allocate for. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Bound on each individual read wait.
    pub read_timeout: Option<std::time::Duration>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            read_timeout: None,
        }
    }
}
