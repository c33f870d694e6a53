use std::fmt;

/// Which half of a frame was being read when a fault occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStage {
    /// Assembling the fixed 28-byte header.
    Header,
    /// Assembling the `data_length` payload bytes.
    Payload,
}

impl fmt::Display for ReadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadStage::Header => f.write_str("header"),
            ReadStage::Payload => f.write_str("payload"),
        }
    }
}

/// Errors that can occur while reading or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The declared payload exceeds the configured ceiling.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// A fixed-width read ran past the end of the buffer.
    #[error("truncated data at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream ended before a complete header or payload was received.
    #[error("connection closed during {stage} read ({received} of {needed} bytes)")]
    ConnectionClosed {
        stage: ReadStage,
        needed: usize,
        received: usize,
    },
}

pub type Result<T> = std::result::Result<T, FrameError>;
