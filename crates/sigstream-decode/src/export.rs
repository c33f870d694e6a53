//! Conversion of raw samples to physical units, and tab-separated export.

use std::io::Write;

use serde::Serialize;
use tracing::debug;

use crate::channel::{ChannelSet, ChannelState};
use crate::error::{DecodeError, Result};

/// Half-scale normalisation for a signed 24-bit quantity (2^23).
pub const POWER2_23: f64 = 8_388_608.0;

/// Physical value of a raw sample: `raw * scale / 2^23`.
pub fn physical_value(raw: i32, scale_factor: f64) -> f64 {
    f64::from(raw) * scale_factor / POWER2_23
}

impl ChannelState {
    /// Samples converted with this channel's scale factor.
    pub fn physical_values(&self) -> impl Iterator<Item = f64> + '_ {
        let scale = self.scale_factor();
        self.samples().iter().map(move |&raw| physical_value(raw, scale))
    }
}

/// Write one row per time index, one tab-separated column per channel,
/// six decimal places.
///
/// Rows stop at the shortest channel so every row is a complete time slice.
/// Returns the number of rows written.
pub fn write_tsv<W: Write>(channels: &ChannelSet, mut out: W) -> Result<usize> {
    let rows = channels.iter().map(ChannelState::received_count).min().unwrap_or(0);
    let mut columns: Vec<_> = channels.iter().map(|c| c.physical_values()).collect();

    let mut line = String::new();
    for _ in 0..rows {
        line.clear();
        for (idx, column) in columns.iter_mut().enumerate() {
            if idx > 0 {
                line.push('\t');
            }
            let value = column.next().unwrap_or_default();
            line.push_str(&format!("{value:.6}"));
        }
        line.push('\n');
        out.write_all(line.as_bytes()).map_err(DecodeError::Export)?;
    }
    out.flush().map_err(DecodeError::Export)?;

    let longest = channels.iter().map(ChannelState::received_count).max().unwrap_or(0);
    if longest > rows {
        debug!(rows, longest, "trailing samples beyond shortest channel not exported");
    }
    Ok(rows)
}

/// Serializable per-channel summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelReport {
    pub signal_id: u16,
    pub samples: usize,
    pub scale_factor: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ChannelReport {
    pub fn from_channel(channel: &ChannelState) -> Self {
        let (min, max) = channel
            .physical_values()
            .fold((None, None), |(min, max): (Option<f64>, Option<f64>), v| {
                (
                    Some(min.map_or(v, |m| m.min(v))),
                    Some(max.map_or(v, |m| m.max(v))),
                )
            });
        Self {
            signal_id: channel.signal_id(),
            samples: channel.received_count(),
            scale_factor: channel.scale_factor(),
            min,
            max,
        }
    }
}

/// One report per channel, in channel order.
pub fn channel_reports(channels: &ChannelSet) -> Vec<ChannelReport> {
    channels.iter().map(ChannelReport::from_channel).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels_with(samples: &[&[i32]], scales: &[f64]) -> ChannelSet {
        let mut set = ChannelSet::new(samples.len());
        for (idx, (values, scale)) in samples.iter().zip(scales).enumerate() {
            let channel = set.channel_mut(idx as u16 + 1).unwrap();
            channel.set_scale_factor(*scale);
            for v in *values {
                channel.push_sample(*v);
            }
        }
        set
    }

    #[test]
    fn physical_value_normalises_half_scale() {
        assert_eq!(physical_value(8_388_608, 1.0), 1.0);
        assert_eq!(physical_value(-8_388_608, 2.0), -2.0);
        assert_eq!(physical_value(4_194_304, 10.0), 5.0);
        assert_eq!(physical_value(0, 123.0), 0.0);
    }

    #[test]
    fn tsv_rows_follow_shortest_channel() {
        let set = channels_with(&[&[4_194_304, 0, 1], &[-8_388_608, 8_388_607]], &[1.0, 2.0]);
        let mut out = Vec::new();

        let rows = write_tsv(&set, &mut out).unwrap();

        assert_eq!(rows, 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["0.500000\t-2.000000", "0.000000\t2.000000"]);
    }

    #[test]
    fn empty_channels_write_nothing() {
        let set = ChannelSet::new(4);
        let mut out = Vec::new();
        assert_eq!(write_tsv(&set, &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }

    #[test]
    fn reports_carry_scale_and_range() {
        let set = channels_with(&[&[-8_388_608, 4_194_304], &[]], &[0.5, 1.0]);
        let reports = channel_reports(&set);

        assert_eq!(reports[0].signal_id, 1);
        assert_eq!(reports[0].samples, 2);
        assert_eq!(reports[0].scale_factor, 0.5);
        assert_eq!(reports[0].min, Some(-0.5));
        assert_eq!(reports[0].max, Some(0.25));
        assert_eq!(reports[1].min, None);

        let json = serde_json::to_value(&reports[0]).unwrap();
        assert_eq!(json["signal_id"], 1);
        assert_eq!(json["samples"], 2);
    }
}
