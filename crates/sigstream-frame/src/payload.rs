//! Payload layouts for the two recognised message types, plus builders that
//! emit them.
//!
//! Signal data (`message_type = 1`):
//! ```text
//! ┌──────────────┬────────────┬────────────┬───────────────┬──────────────────┐
//! │ num_signals  │ reserved   │ signal_id  │ num_values    │ num_values × 3B  │
//! │ (u16 LE)     │ (i16 LE)   │ (u16 LE)   │ (u16 LE)      │ 24-bit LE ints   │
//! └──────────────┴────────────┴────────────┴───────────────┴──────────────────┘
//! ```
//!
//! Interpretation (`message_type = 8`) is a run of descriptors:
//! ```text
//! ┌───────────┬───────────┬──────────┬──────────────┬───────────────┬───────────┐
//! │ signal_id │ desc_type │ reserved │ value_length │ value         │ trailer   │
//! │ (u16 LE)  │ (u16 LE)  │ (i16 LE) │ (u16 LE)     │ align4(len) B │ (4B)      │
//! └───────────┴───────────┴──────────┴──────────────┴───────────────┴───────────┘
//! ```

use bytes::{BufMut, Bytes, BytesMut};

/// Fixed prefix of a signal-data payload.
pub const SIGNAL_DATA_PREFIX_SIZE: usize = 8;

/// Bytes per packed sample.
pub const SAMPLE_WIDTH: usize = 3;

/// Fixed prefix of one calibration descriptor.
pub const DESCRIPTOR_PREFIX_SIZE: usize = 8;

/// Bytes following each descriptor's value.
pub const DESCRIPTOR_TRAILER_SIZE: usize = 4;

/// Descriptor type carrying an `f64` scale factor.
pub const SCALE_FACTOR_DESCRIPTOR: u16 = 2;

/// Round `len` up to the next multiple of four.
pub const fn align4(len: usize) -> usize {
    (len + 3) & !3
}

/// Bytes occupied by a descriptor whose value is `value_length` bytes long.
pub const fn descriptor_stride(value_length: u16) -> usize {
    DESCRIPTOR_PREFIX_SIZE + align4(value_length as usize) + DESCRIPTOR_TRAILER_SIZE
}

/// Builds a signal-data payload for one channel.
#[derive(Debug, Clone)]
pub struct SignalDataBuilder {
    signal_id: u16,
    number_of_signals: u16,
    samples: Vec<i32>,
}

impl SignalDataBuilder {
    pub fn new(signal_id: u16) -> Self {
        Self {
            signal_id,
            number_of_signals: 1,
            samples: Vec::new(),
        }
    }

    pub fn number_of_signals(mut self, count: u16) -> Self {
        self.number_of_signals = count;
        self
    }

    /// Append a sample. Only the low 24 bits are carried on the wire.
    pub fn sample(mut self, value: i32) -> Self {
        self.samples.push(value);
        self
    }

    pub fn samples(mut self, values: impl IntoIterator<Item = i32>) -> Self {
        self.samples.extend(values);
        self
    }

    /// Encode the payload. At most `u16::MAX` samples fit in one payload.
    pub fn build(&self) -> Bytes {
        let count = self.samples.len().min(u16::MAX as usize);
        let mut buf = BytesMut::with_capacity(SIGNAL_DATA_PREFIX_SIZE + count * SAMPLE_WIDTH);
        buf.put_u16_le(self.number_of_signals);
        buf.put_i16_le(0);
        buf.put_u16_le(self.signal_id);
        buf.put_u16_le(count as u16);
        for value in &self.samples[..count] {
            let le = value.to_le_bytes();
            buf.put_slice(&le[..SAMPLE_WIDTH]);
        }
        buf.freeze()
    }
}

/// Builds an interpretation payload out of descriptors.
#[derive(Debug, Clone, Default)]
pub struct CalibrationBuilder {
    buf: BytesMut,
}

impl CalibrationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scale-factor descriptor for `signal_id`.
    pub fn scale_factor(self, signal_id: u16, scale: f64) -> Self {
        self.descriptor(signal_id, SCALE_FACTOR_DESCRIPTOR, &scale.to_le_bytes())
    }

    /// Append an arbitrary descriptor. The value is zero-padded to a 4-byte
    /// boundary and followed by a zeroed trailer.
    pub fn descriptor(mut self, signal_id: u16, descriptor_type: u16, value: &[u8]) -> Self {
        let value_length = value.len().min(u16::MAX as usize) as u16;
        let value = &value[..value_length as usize];
        self.buf.reserve(descriptor_stride(value_length));
        self.buf.put_u16_le(signal_id);
        self.buf.put_u16_le(descriptor_type);
        self.buf.put_i16_le(0);
        self.buf.put_u16_le(value_length);
        self.buf.put_slice(value);
        self.buf.put_bytes(0, align4(value.len()) - value.len());
        self.buf.put_bytes(0, DESCRIPTOR_TRAILER_SIZE);
        self
    }

    pub fn build(&self) -> Bytes {
        self.buf.clone().freeze()
    }
}
