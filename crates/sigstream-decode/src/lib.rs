//! Calibration and 24-bit sample decoding with per-channel accumulation.
//!
//! This is the session layer of sigstream. A [`StreamLoop`] pulls whole
//! frames from a [`sigstream_frame::FrameReader`], dispatches signal data to
//! the sample decoder and calibration frames to the descriptor scan, and
//! stops once every channel holds its target sample count. The resulting
//! [`ChannelSet`] is then handed to [`export`] by value.

pub mod calibration;
pub mod capture;
pub mod channel;
pub mod error;
pub mod export;
pub mod samples;
pub mod stream;

pub use calibration::{apply_calibration, Descriptor, Descriptors, ScaleUpdate};
#[cfg(feature = "async")]
pub use capture::capture_async;
pub use capture::{capture, CaptureConfig};
pub use channel::{ChannelSet, ChannelState, DEFAULT_CHANNELS, DEFAULT_SCALE_FACTOR};
pub use error::{DecodeError, Result};
pub use export::{channel_reports, physical_value, write_tsv, ChannelReport, POWER2_23};
pub use samples::{decode_signal_data, sign_extend_24, SignalDataPrefix};
pub use stream::{decode_stream, DecodeOutcome, StreamConfig, StreamLoop, StreamSummary, DEFAULT_TARGET};
