//! Capture a fixed number of samples and print per-channel statistics.
//!
//! Run with:
//!   cargo run --example synthetic-producer -- 127.0.0.1:7070
//!   cargo run --example capture-summary -- 127.0.0.1:7070 2048

use std::time::Duration;

use sigstream::decode::{channel_reports, CaptureConfig, StreamConfig};
use sigstream::frame::FrameConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:7070".to_string());
    let samples: usize = args.next().map(|s| s.parse()).transpose()?.unwrap_or(2048);

    let config = CaptureConfig {
        stream: StreamConfig::uniform(4, samples),
        frame: FrameConfig {
            read_timeout: Some(Duration::from_secs(10)),
            ..FrameConfig::default()
        },
        connect_timeout: Some(Duration::from_secs(5)),
    };

    let outcome = sigstream::capture(&addr, &config)?;
    eprintln!(
        "Read {} frames ({} bytes)",
        outcome.summary.frames, outcome.summary.bytes
    );
    for report in channel_reports(&outcome.channels) {
        println!(
            "channel {}: {} samples, scale {}, range {:?}..{:?}",
            report.signal_id, report.samples, report.scale_factor, report.min, report.max
        );
    }
    Ok(())
}
