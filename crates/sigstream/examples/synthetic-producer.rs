//! Synthetic producer: serves a sine wave on four channels over TCP.
//!
//! Run with:
//!   cargo run --example synthetic-producer -- 127.0.0.1:7070
//!
//! In another terminal:
//!   cargo run --features cli -- capture 127.0.0.1:7070 --samples 4096 --output out.tsv

use std::net::TcpListener;

use sigstream::frame::{
    CalibrationBuilder, FrameHeader, FrameWriter, MessageType, SignalDataBuilder,
};

const CHUNK: usize = 256;
const AMPLITUDE: f64 = 8_388_607.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1:7070".to_string());
    let listener = TcpListener::bind(&addr)?;
    eprintln!("Serving on {}", listener.local_addr()?);

    let (stream, peer) = listener.accept()?;
    eprintln!("Consumer connected: {peer}");
    let mut writer = FrameWriter::new(stream);

    for signal_id in 1..=4u16 {
        let payload = CalibrationBuilder::new()
            .descriptor(signal_id, 1, b"V\0\0\0")
            .scale_factor(signal_id, f64::from(signal_id) * 2.5)
            .build();
        writer.send(MessageType::Interpretation, &payload)?;
    }

    let mut timestamp = 0u64;
    loop {
        for signal_id in 1..=4u16 {
            let phase = f64::from(signal_id) * 0.25;
            let samples = (0..CHUNK).map(|i| {
                let t = (timestamp as usize + i) as f64 / 512.0;
                (AMPLITUDE * (std::f64::consts::TAU * t + phase).sin()) as i32
            });
            let payload = SignalDataBuilder::new(signal_id)
                .number_of_signals(4)
                .samples(samples)
                .build();
            let header = FrameHeader::new(MessageType::SignalData, 0).with_timestamp(1, timestamp);
            if let Err(e) = writer.write_with_header(&header, &payload) {
                eprintln!("Consumer disconnected: {e}");
                return Ok(());
            }
        }
        // Status frame; consumers ignore it.
        writer.send(MessageType::Other(11), &[0u8; 16])?;
        timestamp += CHUNK as u64;
    }
}
