use sigstream_decode::{capture, CaptureConfig};
use tracing::info;

use crate::cmd::{parse_timeout, CaptureArgs};
use crate::exit::{decode_error, CliResult, SUCCESS};
use crate::output::{print_outcome, OutputFormat};

pub fn run(args: CaptureArgs, format: OutputFormat) -> CliResult<i32> {
    let connect_timeout = parse_timeout(&args.connect_timeout)?;
    let read_timeout = args
        .read_timeout
        .as_deref()
        .map(parse_timeout)
        .transpose()?;

    let config = CaptureConfig {
        stream: args.stream.stream_config(),
        frame: args.stream.frame_config(read_timeout),
        connect_timeout: Some(connect_timeout),
    };
    info!(addr = %args.addr, targets = ?config.stream.targets, "starting capture");

    let outcome = capture(&args.addr, &config).map_err(|err| decode_error("capture failed", err))?;
    let exported = super::decode::export_to_file(&outcome, args.stream.output.as_deref())?;

    print_outcome(&outcome, &args.addr, exported, format)?;
    Ok(SUCCESS)
}
