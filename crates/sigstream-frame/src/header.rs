use crate::cursor::ByteCursor;
use crate::error::Result;

/// Frame header: fixed 28 bytes, all fields little-endian.
pub const HEADER_SIZE: usize = 28;

/// Sync marker written by [`FrameHeader::new`]. Never validated on decode.
pub const DEFAULT_MAGIC: [u8; 2] = *b"BK";

/// Payload discriminator carried in [`FrameHeader::message_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Multiplexed 24-bit samples for one channel.
    SignalData,
    /// Calibration descriptors (scale interpretation).
    Interpretation,
    /// Anything else. Consumed and discarded by the stream loop.
    Other(u16),
}

impl MessageType {
    pub const SIGNAL_DATA: u16 = 1;
    pub const INTERPRETATION: u16 = 8;

    pub fn code(self) -> u16 {
        match self {
            MessageType::SignalData => Self::SIGNAL_DATA,
            MessageType::Interpretation => Self::INTERPRETATION,
            MessageType::Other(code) => code,
        }
    }
}

impl From<u16> for MessageType {
    fn from(code: u16) -> Self {
        match code {
            Self::SIGNAL_DATA => MessageType::SignalData,
            Self::INTERPRETATION => MessageType::Interpretation,
            other => MessageType::Other(other),
        }
    }
}

/// Decoded frame header.
///
/// Wire layout:
/// ```text
/// offset  size  field
///      0     2  magic
///      2     2  header_length      (u16)
///      4     2  message_type       (u16)
///      6     2  reserved1          (i16)
///      8     4  reserved2          (i32)
///     12     4  timestamp_family   (u32)
///     16     8  timestamp          (u64)
///     24     4  data_length        (u32)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub magic: [u8; 2],
    pub header_length: u16,
    pub message_type: u16,
    pub reserved1: i16,
    pub reserved2: i32,
    pub timestamp_family: u32,
    pub timestamp: u64,
    /// Exact byte length of the payload that follows the header.
    pub data_length: u32,
}

impl FrameHeader {
    /// Header for a frame of `message_type` carrying `data_length` bytes.
    pub fn new(message_type: MessageType, data_length: u32) -> Self {
        Self {
            magic: DEFAULT_MAGIC,
            header_length: HEADER_SIZE as u16,
            message_type: message_type.code(),
            reserved1: 0,
            reserved2: 0,
            timestamp_family: 0,
            timestamp: 0,
            data_length,
        }
    }

    pub fn with_timestamp(mut self, family: u32, timestamp: u64) -> Self {
        self.timestamp_family = family;
        self.timestamp = timestamp;
        self
    }

    pub fn kind(&self) -> MessageType {
        MessageType::from(self.message_type)
    }

    pub fn payload_len(&self) -> usize {
        self.data_length as usize
    }
}

/// Decode the first [`HEADER_SIZE`] bytes of `src` into a header.
///
/// No field is validated: any 28 bytes decode. Fails only when `src` is
/// shorter than a header.
pub fn decode_header(src: &[u8]) -> Result<FrameHeader> {
    let mut cursor = ByteCursor::new(src);
    Ok(FrameHeader {
        magic: cursor.read_array::<2>()?,
        header_length: cursor.read_u16_le()?,
        message_type: cursor.read_u16_le()?,
        reserved1: cursor.read_i16_le()?,
        reserved2: cursor.read_i32_le()?,
        timestamp_family: cursor.read_u32_le()?,
        timestamp: cursor.read_u64_le()?,
        data_length: cursor.read_u32_le()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;

    fn sample_header_bytes() -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..2].copy_from_slice(b"BK");
        bytes[2..4].copy_from_slice(&28u16.to_le_bytes());
        bytes[4..6].copy_from_slice(&1u16.to_le_bytes());
        bytes[6..8].copy_from_slice(&(-3i16).to_le_bytes());
        bytes[8..12].copy_from_slice(&(-70_000i32).to_le_bytes());
        bytes[12..16].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        bytes[16..24].copy_from_slice(&0x0102_0304_0506_0708u64.to_le_bytes());
        bytes[24..28].copy_from_slice(&[10, 0, 0, 0]);
        bytes
    }

    #[test]
    fn decodes_each_field_at_its_offset() {
        let header = decode_header(&sample_header_bytes()).unwrap();

        assert_eq!(header.magic, *b"BK");
        assert_eq!(header.header_length, 28);
        assert_eq!(header.message_type, 1);
        assert_eq!(header.reserved1, -3);
        assert_eq!(header.reserved2, -70_000);
        assert_eq!(header.timestamp_family, 0xDEAD_BEEF);
        assert_eq!(header.timestamp, 0x0102_0304_0506_0708);
        assert_eq!(header.data_length, 10);
        assert_eq!(header.kind(), MessageType::SignalData);
    }

    #[test]
    fn garbage_header_still_decodes() {
        let bytes = [0xFFu8; HEADER_SIZE];
        let header = decode_header(&bytes).unwrap();
        assert_eq!(header.magic, [0xFF, 0xFF]);
        assert_eq!(header.message_type, 0xFFFF);
        assert_eq!(header.data_length, u32::MAX);
        assert_eq!(header.kind(), MessageType::Other(0xFFFF));
    }

    #[test]
    fn short_input_fails() {
        let bytes = sample_header_bytes();
        let err = decode_header(&bytes[..HEADER_SIZE - 1]).unwrap_err();
        assert!(matches!(err, FrameError::Truncated { offset: 24, .. }));
    }

    #[test]
    fn message_type_codes() {
        assert_eq!(MessageType::from(1), MessageType::SignalData);
        assert_eq!(MessageType::from(8), MessageType::Interpretation);
        assert_eq!(MessageType::from(255), MessageType::Other(255));
        assert_eq!(MessageType::Other(255).code(), 255);
        assert_eq!(MessageType::Interpretation.code(), 8);
    }
}
