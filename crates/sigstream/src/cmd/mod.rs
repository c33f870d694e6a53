use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use sigstream_decode::{StreamConfig, DEFAULT_CHANNELS, DEFAULT_TARGET};
use sigstream_frame::{FrameConfig, DEFAULT_MAX_PAYLOAD};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod capture;
pub mod decode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to a producer's streaming port and collect samples.
    Capture(CaptureArgs),
    /// Decode a captured raw byte dump of the stream.
    Decode(DecodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Capture(args) => capture::run(args, format),
        Command::Decode(args) => decode::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Options shared by every command that runs the stream loop.
#[derive(Args, Debug)]
pub struct StreamArgs {
    /// Samples to collect on every channel.
    #[arg(long, short = 'n', default_value_t = DEFAULT_TARGET)]
    pub samples: usize,
    /// Number of channels in the multiplex.
    #[arg(long, default_value_t = DEFAULT_CHANNELS)]
    pub channels: usize,
    /// Distinct per-channel targets (comma-separated); overrides --samples/--channels.
    #[arg(long, value_delimiter = ',', conflicts_with_all = ["samples", "channels"])]
    pub targets: Option<Vec<usize>>,
    /// Largest payload accepted, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD)]
    pub max_payload: usize,
    /// Write physical values as tab-separated columns to this file.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl StreamArgs {
    pub fn stream_config(&self) -> StreamConfig {
        match &self.targets {
            Some(targets) => StreamConfig::per_channel(targets.clone()),
            None => StreamConfig::uniform(self.channels, self.samples),
        }
    }

    pub fn frame_config(&self, read_timeout: Option<Duration>) -> FrameConfig {
        FrameConfig {
            max_payload_size: self.max_payload,
            read_timeout,
        }
    }
}

#[derive(Args, Debug)]
pub struct CaptureArgs {
    /// Producer streaming address (host:port).
    #[arg(env = "SIGSTREAM_ADDR")]
    pub addr: String,
    #[command(flatten)]
    pub stream: StreamArgs,
    /// Connect timeout (e.g. 5s, 500ms).
    #[arg(long, default_value = "5s")]
    pub connect_timeout: String,
    /// Bound on each individual read wait (e.g. 10s). Default: wait forever.
    #[arg(long)]
    pub read_timeout: Option<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// File holding the raw stream bytes.
    pub file: PathBuf,
    #[command(flatten)]
    pub stream: StreamArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
