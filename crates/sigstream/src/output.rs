use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use sigstream_decode::{channel_reports, write_tsv, ChannelReport, DecodeOutcome, StreamSummary};

use crate::exit::{decode_error, CliResult};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    /// Tab-separated physical values, one row per time index.
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct OutcomeOutput<'a> {
    source: &'a str,
    channels: Vec<ChannelReport>,
    summary: StreamSummary,
    exported_rows: Option<usize>,
    timestamp: String,
}

pub fn print_outcome(
    outcome: &DecodeOutcome,
    source: &str,
    exported_rows: Option<usize>,
    format: OutputFormat,
) -> CliResult<()> {
    let reports = channel_reports(&outcome.channels);
    match format {
        OutputFormat::Json => {
            let out = OutcomeOutput {
                source,
                channels: reports,
                summary: outcome.summary,
                exported_rows,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["CHANNEL", "SAMPLES", "SCALE", "MIN", "MAX"]);
            for report in &reports {
                table.add_row(vec![
                    report.signal_id.to_string(),
                    report.samples.to_string(),
                    report.scale_factor.to_string(),
                    format_value(report.min),
                    format_value(report.max),
                ]);
            }
            println!("{table}");
            print_summary_line(source, &outcome.summary, exported_rows);
        }
        OutputFormat::Pretty => {
            for report in &reports {
                println!(
                    "channel={} samples={} scale={} min={} max={}",
                    report.signal_id,
                    report.samples,
                    report.scale_factor,
                    format_value(report.min),
                    format_value(report.max)
                );
            }
            print_summary_line(source, &outcome.summary, exported_rows);
        }
        OutputFormat::Raw => {
            let stdout = std::io::stdout();
            write_tsv(&outcome.channels, stdout.lock())
                .map_err(|err| decode_error("write failed", err))?;
        }
    }
    Ok(())
}

fn print_summary_line(source: &str, summary: &StreamSummary, exported_rows: Option<usize>) {
    println!(
        "source={} frames={} signal={} calibration={} ignored={} bytes={}",
        source,
        summary.frames,
        summary.signal_frames,
        summary.calibration_frames,
        summary.ignored_frames,
        summary.bytes
    );
    if let Some(rows) = exported_rows {
        println!("exported rows={rows}");
    }
}

fn format_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.6}"),
        None => "-".to_string(),
    }
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
