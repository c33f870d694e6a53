//! Capture on a tokio runtime and print the first raw samples per channel.
//!
//! Run with:
//!   cargo run --example synthetic-producer -- 127.0.0.1:7070
//!   cargo run --example async-capture --features async -- 127.0.0.1:7070 1024

use std::time::Duration;

use sigstream::decode::{capture_async, CaptureConfig, StreamConfig};
use sigstream::frame::FrameConfig;

const PREVIEW: usize = 8;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:7070".to_string());
    let samples: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(1024);

    let config = CaptureConfig {
        stream: StreamConfig::uniform(4, samples),
        frame: FrameConfig {
            read_timeout: Some(Duration::from_secs(10)),
            ..FrameConfig::default()
        },
        connect_timeout: Some(Duration::from_secs(5)),
    };

    let outcome = capture_async(&addr, &config).await?;
    eprintln!(
        "Read {} frames ({} signal, {} calibration)",
        outcome.summary.frames, outcome.summary.signal_frames, outcome.summary.calibration_frames
    );

    for channel in outcome.channels.into_channels() {
        let (id, scale) = (channel.signal_id(), channel.scale_factor());
        let raw = channel.into_samples();
        let preview = &raw[..raw.len().min(PREVIEW)];
        println!("channel {id} (scale {scale}): {} samples, first {preview:?}", raw.len());
    }
    Ok(())
}
