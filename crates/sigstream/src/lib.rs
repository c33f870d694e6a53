//! Streaming decoder for multiplexed 24-bit measurement channels.
//!
//! A producer streams fixed-header, length-delimited frames carrying either
//! calibration descriptors or packed 24-bit samples for one channel at a
//! time. sigstream reads those frames from a connected byte stream and
//! accumulates samples per channel until a target count is reached.
//!
//! # Crate Structure
//!
//! - [`transport`]: Connected byte-stream abstraction (TCP)
//! - [`frame`]: Header decoding and whole-frame reading
//! - [`decode`]: Calibration and sample decoding, the stream loop, export

/// Re-export transport types.
pub mod transport {
    pub use sigstream_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use sigstream_frame::*;
}

/// Re-export decode types.
pub mod decode {
    pub use sigstream_decode::*;
}

pub use sigstream_decode::{capture, decode_stream, CaptureConfig, ChannelSet, StreamConfig};
