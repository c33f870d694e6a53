use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use sigstream_decode::{write_tsv, DecodeOutcome, StreamLoop};
use sigstream_frame::FrameReader;
use tracing::info;

use crate::cmd::DecodeArgs;
use crate::exit::{decode_error, io_error, CliResult, SUCCESS};
use crate::output::{print_outcome, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let file = File::open(&args.file)
        .map_err(|err| io_error(&format!("open {} failed", args.file.display()), err))?;

    let config = args.stream.stream_config();
    info!(file = %args.file.display(), targets = ?config.targets, "decoding capture file");

    let mut reader = FrameReader::with_config(BufReader::new(file), args.stream.frame_config(None));
    let outcome = StreamLoop::new(config)
        .and_then(|stream| stream.run(&mut reader))
        .map_err(|err| decode_error("decode failed", err))?;

    let exported = export_to_file(&outcome, args.stream.output.as_deref())?;
    let source = args.file.display().to_string();
    print_outcome(&outcome, &source, exported, format)?;
    Ok(SUCCESS)
}

/// Write the tab-separated export when a path was given.
pub fn export_to_file(outcome: &DecodeOutcome, path: Option<&Path>) -> CliResult<Option<usize>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file = File::create(path)
        .map_err(|err| io_error(&format!("create {} failed", path.display()), err))?;
    let rows = write_tsv(&outcome.channels, BufWriter::new(file))
        .map_err(|err| decode_error("export failed", err))?;
    info!(path = %path.display(), rows, "samples exported");
    Ok(Some(rows))
}
