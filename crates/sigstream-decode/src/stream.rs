use std::io::Read;

use serde::Serialize;
use sigstream_frame::{FrameReader, MessageType, RawFrame};
use tracing::{debug, info, trace};

use crate::calibration::apply_calibration;
use crate::channel::{ChannelSet, DEFAULT_CHANNELS};
use crate::error::{DecodeError, Result};
use crate::samples::decode_signal_data;

/// Samples per channel collected when no target is given (4 × 4096-sample chunks).
pub const DEFAULT_TARGET: usize = 4096 * 4;

/// Per-session configuration: one sample target per channel.
///
/// The channel count is `targets.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    pub targets: Vec<usize>,
}

impl StreamConfig {
    /// `channels` channels sharing one target.
    pub fn uniform(channels: usize, target: usize) -> Self {
        Self {
            targets: vec![target; channels],
        }
    }

    /// Distinct target per channel, `targets[i]` for channel `i + 1`.
    pub fn per_channel(targets: Vec<usize>) -> Self {
        Self { targets }
    }

    pub fn channel_count(&self) -> usize {
        self.targets.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(DecodeError::InvalidConfig(
                "at least one channel is required".to_string(),
            ));
        }
        if self.targets.len() > u16::MAX as usize {
            return Err(DecodeError::InvalidConfig(format!(
                "{} channels exceeds the signal id range",
                self.targets.len()
            )));
        }
        Ok(())
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self::uniform(DEFAULT_CHANNELS, DEFAULT_TARGET)
    }
}

/// Frame and byte counts for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    pub frames: u64,
    pub signal_frames: u64,
    pub calibration_frames: u64,
    pub ignored_frames: u64,
    pub bytes: u64,
}

/// Result of a completed session: the channels, moved out of the loop.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOutcome {
    pub channels: ChannelSet,
    pub summary: StreamSummary,
}

/// Drives the read loop: one header, one payload, dispatch, re-check.
///
/// Owns the channel set for its lifetime. Terminates only when every
/// channel has reached its target; the check runs before each frame, so a
/// session whose targets are already met reads nothing.
#[derive(Debug)]
pub struct StreamLoop {
    config: StreamConfig,
    channels: ChannelSet,
    summary: StreamSummary,
}

impl StreamLoop {
    pub fn new(config: StreamConfig) -> Result<Self> {
        config.validate()?;
        let channels = ChannelSet::new(config.channel_count());
        Ok(Self {
            config,
            channels,
            summary: StreamSummary::default(),
        })
    }

    pub fn is_complete(&self) -> bool {
        self.channels.is_complete(&self.config.targets)
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    pub fn summary(&self) -> &StreamSummary {
        &self.summary
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Apply one frame to the channel set.
    ///
    /// Unknown message types are counted and dropped.
    pub fn handle_frame(&mut self, frame: &RawFrame) -> Result<()> {
        self.summary.frames += 1;
        self.summary.bytes += frame.wire_size() as u64;
        debug!(
            message_type = frame.header.message_type,
            data_length = frame.header.data_length,
            "frame"
        );

        match frame.kind() {
            MessageType::SignalData => {
                decode_signal_data(&frame.payload, &mut self.channels)?;
                self.summary.signal_frames += 1;
            }
            MessageType::Interpretation => {
                apply_calibration(&frame.payload, &mut self.channels)?;
                self.summary.calibration_frames += 1;
            }
            MessageType::Other(code) => {
                trace!(message_type = code, len = frame.payload.len(), "ignoring frame");
                self.summary.ignored_frames += 1;
            }
        }
        Ok(())
    }

    /// Read and apply frames until every channel reaches its target.
    pub fn run<R: Read>(mut self, reader: &mut FrameReader<R>) -> Result<DecodeOutcome> {
        while !self.is_complete() {
            let frame = reader.read_frame()?;
            self.handle_frame(&frame)?;
        }
        Ok(self.finish())
    }

    /// Async form of [`StreamLoop::run`].
    #[cfg(feature = "async")]
    pub async fn run_async<R>(
        mut self,
        reader: &mut sigstream_frame::AsyncFrameReader<R>,
    ) -> Result<DecodeOutcome>
    where
        R: tokio::io::AsyncRead + Unpin,
    {
        while !self.is_complete() {
            let frame = reader.read_frame().await?;
            self.handle_frame(&frame)?;
        }
        Ok(self.finish())
    }

    /// Stop the session and hand over the channel set.
    pub fn finish(self) -> DecodeOutcome {
        info!(
            frames = self.summary.frames,
            received = ?self.channels.received_counts(),
            "stream loop finished"
        );
        DecodeOutcome {
            channels: self.channels,
            summary: self.summary,
        }
    }
}

/// Decode frames from `inner` until `config`'s targets are met.
pub fn decode_stream<R: Read>(inner: R, config: StreamConfig) -> Result<DecodeOutcome> {
    let mut reader = FrameReader::new(inner);
    StreamLoop::new(config)?.run(&mut reader)
}
