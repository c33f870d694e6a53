use std::time::Duration;

use sigstream_frame::{FrameConfig, FrameReader};
use tracing::debug;

use crate::error::Result;
use crate::stream::{DecodeOutcome, StreamConfig, StreamLoop};

/// Everything needed to run one session against a live producer.
#[derive(Debug, Clone, Default)]
pub struct CaptureConfig {
    pub stream: StreamConfig,
    pub frame: FrameConfig,
    /// Bound on the connect attempt. `None` uses the OS default.
    pub connect_timeout: Option<Duration>,
}

/// Connect to a producer's streaming port and decode until the targets are met.
///
/// The connection is shut down once the loop stops, successfully or not.
pub fn capture(addr: &str, config: &CaptureConfig) -> Result<DecodeOutcome> {
    let stream_loop = StreamLoop::new(config.stream.clone())?;
    let stream = sigstream_transport::connect(addr, config.connect_timeout)?;
    debug!(peer = ?stream.peer_addr().ok(), "capture session started");
    let mut reader = FrameReader::with_config_stream(stream, config.frame.clone())?;

    let result = stream_loop.run(&mut reader);

    if let Err(err) = reader.get_ref().shutdown() {
        debug!(error = %err, "stream shutdown failed");
    }
    result
}

/// Async form of [`capture`] on a tokio runtime.
#[cfg(feature = "async")]
pub async fn capture_async(addr: &str, config: &CaptureConfig) -> Result<DecodeOutcome> {
    let stream_loop = StreamLoop::new(config.stream.clone())?;
    let connect = sigstream_transport::connect_async(addr);
    let stream = match config.connect_timeout {
        Some(timeout) => tokio::time::timeout(timeout, connect).await.map_err(|_| {
            sigstream_transport::TransportError::Connect {
                addr: addr.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::TimedOut),
            }
        })??,
        None => connect.await?,
    };
    let mut reader = sigstream_frame::AsyncFrameReader::with_config(stream, config.frame.clone());
    stream_loop.run_async(&mut reader).await
}
