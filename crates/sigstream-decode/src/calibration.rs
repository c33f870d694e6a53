//! Calibration (scale interpretation) payload decoding.
//!
//! A calibration payload is a run of variable-length descriptors. Each one
//! occupies [`descriptor_stride`] bytes whatever its type, so unknown
//! descriptors are stepped over without being interpreted. Only the first
//! scale-factor descriptor in a payload is applied.

use sigstream_frame::{
    descriptor_stride, ByteCursor, FrameError, DESCRIPTOR_PREFIX_SIZE, SCALE_FACTOR_DESCRIPTOR,
};
use tracing::{info, trace};

use crate::channel::ChannelSet;
use crate::error::{DecodeError, Result};

/// One descriptor's fixed prefix, located at `offset` in its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub offset: usize,
    pub signal_id: u16,
    pub descriptor_type: u16,
    pub reserved: i16,
    pub value_length: u16,
}

impl Descriptor {
    pub fn is_scale_factor(&self) -> bool {
        self.descriptor_type == SCALE_FACTOR_DESCRIPTOR
    }

    /// Offset of the next descriptor.
    pub fn next_offset(&self) -> usize {
        self.offset.saturating_add(descriptor_stride(self.value_length))
    }

    /// Read this descriptor's value as a little-endian `f64`.
    pub fn read_f64(&self, payload: &[u8]) -> Result<f64> {
        let mut cursor = ByteCursor::at(payload, self.offset + DESCRIPTOR_PREFIX_SIZE);
        cursor.read_f64_le().map_err(truncated)
    }
}

/// Iterator over the descriptors of a calibration payload.
///
/// Stops once the next descriptor would start at or beyond the end of the
/// payload. A prefix cut short by the payload end yields one error, then
/// the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Descriptors<'a> {
    payload: &'a [u8],
    offset: usize,
    failed: bool,
}

impl<'a> Descriptors<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            offset: 0,
            failed: false,
        }
    }
}

impl Iterator for Descriptors<'_> {
    type Item = Result<Descriptor>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.payload.len() {
            return None;
        }

        match read_prefix(self.payload, self.offset) {
            Ok(descriptor) => {
                self.offset = descriptor.next_offset();
                Some(Ok(descriptor))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(truncated(err)))
            }
        }
    }
}

/// A scale factor applied by [`apply_calibration`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleUpdate {
    pub signal_id: u16,
    pub scale_factor: f64,
}

/// Scan a calibration payload and apply its first scale-factor descriptor.
///
/// Returns `Ok(None)` when the payload carries no scale descriptor; the
/// channel's previous scale factor stays in effect.
pub fn apply_calibration(payload: &[u8], channels: &mut ChannelSet) -> Result<Option<ScaleUpdate>> {
    for descriptor in Descriptors::new(payload) {
        let descriptor = descriptor?;
        if !descriptor.is_scale_factor() {
            trace!(
                offset = descriptor.offset,
                descriptor_type = descriptor.descriptor_type,
                value_length = descriptor.value_length,
                "skipping descriptor"
            );
            continue;
        }

        let scale_factor = descriptor.read_f64(payload)?;
        channels
            .channel_mut(descriptor.signal_id)?
            .set_scale_factor(scale_factor);
        info!(
            signal_id = descriptor.signal_id,
            scale_factor, "scale factor updated"
        );
        return Ok(Some(ScaleUpdate {
            signal_id: descriptor.signal_id,
            scale_factor,
        }));
    }

    trace!(len = payload.len(), "no scale descriptor in calibration payload");
    Ok(None)
}

fn read_prefix(payload: &[u8], offset: usize) -> std::result::Result<Descriptor, FrameError> {
    let mut cursor = ByteCursor::at(payload, offset);
    Ok(Descriptor {
        offset,
        signal_id: cursor.read_u16_le()?,
        descriptor_type: cursor.read_u16_le()?,
        reserved: cursor.read_i16_le()?,
        value_length: cursor.read_u16_le()?,
    })
}

fn truncated(err: FrameError) -> DecodeError {
    match err {
        FrameError::Truncated {
            offset,
            needed,
            available,
        } => DecodeError::TruncatedDescriptor {
            offset,
            needed,
            available,
        },
        other => DecodeError::Frame(other),
    }
}
