//! Signal-data payload decoding.

use sigstream_frame::{ByteCursor, SAMPLE_WIDTH, SIGNAL_DATA_PREFIX_SIZE};
use tracing::debug;

use crate::channel::ChannelSet;
use crate::error::{DecodeError, Result};

/// Fixed prefix of a signal-data payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalDataPrefix {
    pub number_of_signals: u16,
    pub reserved: i16,
    pub signal_id: u16,
    pub number_of_values: u16,
}

impl SignalDataPrefix {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(payload);
        Ok(Self {
            number_of_signals: cursor.read_u16_le()?,
            reserved: cursor.read_i16_le()?,
            signal_id: cursor.read_u16_le()?,
            number_of_values: cursor.read_u16_le()?,
        })
    }

    /// Bytes of packed samples the prefix promises.
    pub fn sample_bytes(&self) -> usize {
        self.number_of_values as usize * SAMPLE_WIDTH
    }
}

/// Sign-extend a little-endian 24-bit two's-complement value to 32 bits.
///
/// The three bytes are placed in the top of a 32-bit word and shifted back
/// down arithmetically, so bit 23 becomes the sign.
pub fn sign_extend_24([low, mid, high]: [u8; 3]) -> i32 {
    let word = (u32::from(high) << 24) | (u32::from(mid) << 16) | (u32::from(low) << 8);
    (word as i32) >> 8
}

/// Decode a signal-data payload and append its samples to the addressed
/// channel.
///
/// The whole payload is validated before any sample is appended: a payload
/// shorter than its declared sample count, or one addressed to a channel
/// outside `channels`, leaves every channel untouched.
pub fn decode_signal_data(payload: &[u8], channels: &mut ChannelSet) -> Result<SignalDataPrefix> {
    let prefix = SignalDataPrefix::decode(payload)?;

    let needed = prefix.sample_bytes();
    let available = payload.len() - SIGNAL_DATA_PREFIX_SIZE;
    if available < needed {
        return Err(DecodeError::TruncatedSamples {
            signal_id: prefix.signal_id,
            declared: prefix.number_of_values,
            needed,
            available,
        });
    }

    let channel = channels.channel_mut(prefix.signal_id)?;
    channel.reserve(prefix.number_of_values as usize);

    let mut cursor = ByteCursor::at(payload, SIGNAL_DATA_PREFIX_SIZE);
    for _ in 0..prefix.number_of_values {
        let packed = cursor.read_array::<SAMPLE_WIDTH>()?;
        channel.push_sample(sign_extend_24(packed));
    }

    debug!(
        signal_id = prefix.signal_id,
        values = prefix.number_of_values,
        received = ?channels.received_counts(),
        "samples received"
    );
    Ok(prefix)
}

#[cfg(test)]
mod tests {
    use sigstream_frame::{FrameError, SignalDataBuilder};

    use super::*;

    fn raw_payload(signal_id: u16, samples: &[[u8; 3]]) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&1u16.to_le_bytes());
        payload.extend_from_slice(&0i16.to_le_bytes());
        payload.extend_from_slice(&signal_id.to_le_bytes());
        payload.extend_from_slice(&(samples.len() as u16).to_le_bytes());
        for sample in samples {
            payload.extend_from_slice(sample);
        }
        payload
    }

    #[test]
    fn sign_extension_limits() {
        assert_eq!(sign_extend_24([0xFF, 0xFF, 0x7F]), 8_388_607);
        assert_eq!(sign_extend_24([0x00, 0x00, 0x80]), -8_388_608);
        assert_eq!(sign_extend_24([0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(sign_extend_24([0x00, 0x00, 0x00]), 0);
        assert_eq!(sign_extend_24([0x01, 0x00, 0x00]), 1);
        assert_eq!(sign_extend_24([0x00, 0x01, 0x00]), 256);
    }

    #[test]
    fn decodes_max_positive_sample_into_channel_two() {
        let payload = raw_payload(2, &[[0xFF, 0xFF, 0x7F]]);
        let mut channels = ChannelSet::new(4);

        let prefix = decode_signal_data(&payload, &mut channels).unwrap();

        assert_eq!(prefix.signal_id, 2);
        assert_eq!(prefix.number_of_values, 1);
        assert_eq!(channels.get(2).unwrap().samples(), &[8_388_607]);
        assert_eq!(channels.received_counts(), vec![0, 1, 0, 0]);
    }

    #[test]
    fn decodes_min_negative_sample() {
        let payload = raw_payload(1, &[[0x00, 0x00, 0x80]]);
        let mut channels = ChannelSet::new(4);

        decode_signal_data(&payload, &mut channels).unwrap();
        assert_eq!(channels.get(1).unwrap().samples(), &[-8_388_608]);
    }

    #[test]
    fn counts_accumulate_in_arrival_order() {
        let mut channels = ChannelSet::new(4);
        let batches: [&[i32]; 3] = [&[1, 2, 3], &[-4], &[5, 6]];
        for batch in batches {
            let payload = SignalDataBuilder::new(3).samples(batch.iter().copied()).build();
            decode_signal_data(&payload, &mut channels).unwrap();
        }

        let channel = channels.get(3).unwrap();
        assert_eq!(channel.received_count(), 6);
        assert_eq!(channel.samples(), &[1, 2, 3, -4, 5, 6]);
    }

    #[test]
    fn zero_values_is_a_no_op() {
        let payload = raw_payload(4, &[]);
        let mut channels = ChannelSet::new(4);
        decode_signal_data(&payload, &mut channels).unwrap();
        assert_eq!(channels.min_received(), 0);
    }

    #[test]
    fn trailing_bytes_after_samples_are_ignored() {
        let mut payload = raw_payload(1, &[[7, 0, 0]]);
        payload.extend_from_slice(&[0xEE, 0xEE]);
        let mut channels = ChannelSet::new(4);

        decode_signal_data(&payload, &mut channels).unwrap();
        assert_eq!(channels.get(1).unwrap().samples(), &[7]);
    }

    #[test]
    fn short_sample_group_is_fatal_and_appends_nothing() {
        let mut payload = raw_payload(1, &[[1, 0, 0], [2, 0, 0]]);
        payload.pop();
        let mut channels = ChannelSet::new(4);

        let err = decode_signal_data(&payload, &mut channels).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedSamples {
                signal_id: 1,
                declared: 2,
                needed: 6,
                available: 5
            }
        ));
        assert_eq!(channels.get(1).unwrap().received_count(), 0);
    }

    #[test]
    fn short_prefix_is_fatal() {
        let mut channels = ChannelSet::new(4);
        let err = decode_signal_data(&[1, 0, 0], &mut channels).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Frame(FrameError::Truncated { .. })
        ));
    }

    #[test]
    fn unknown_channel_is_fatal() {
        let payload = raw_payload(0, &[[1, 0, 0]]);
        let mut channels = ChannelSet::new(4);
        let err = decode_signal_data(&payload, &mut channels).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnknownChannel {
                signal_id: 0,
                channels: 4
            }
        ));
    }
}
