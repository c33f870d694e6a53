use sigstream_frame::ReadStage;

/// Errors that abort a decode session.
///
/// Every variant is fatal: the protocol has no resync token, so no partial
/// result is returned once one of these is raised.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Transport-level error (connect, resolve, socket options).
    #[error("transport error: {0}")]
    Transport(#[from] sigstream_transport::TransportError),

    /// Frame-level error while assembling a header or payload.
    #[error("frame error: {0}")]
    Frame(#[from] sigstream_frame::FrameError),

    /// A payload addressed a channel outside the configured set.
    #[error("signal id {signal_id} outside configured channels 1..={channels}")]
    UnknownChannel { signal_id: u16, channels: usize },

    /// A signal-data payload declared more samples than it carries.
    #[error(
        "signal data for channel {signal_id} truncated: {declared} samples need {needed} bytes, payload has {available}"
    )]
    TruncatedSamples {
        signal_id: u16,
        declared: u16,
        needed: usize,
        available: usize,
    },

    /// A calibration payload ended inside a descriptor.
    #[error("calibration payload truncated at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedDescriptor {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Session configuration is unusable.
    #[error("invalid stream configuration: {0}")]
    InvalidConfig(String),

    /// Writing exported samples failed.
    #[error("export failed: {0}")]
    Export(#[source] std::io::Error),
}

impl DecodeError {
    /// The frame half being read when the fault occurred, if it was a read fault.
    pub fn read_stage(&self) -> Option<ReadStage> {
        match self {
            DecodeError::Frame(sigstream_frame::FrameError::ConnectionClosed { stage, .. }) => {
                Some(*stage)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
