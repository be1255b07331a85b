//! Command-line inspector for framed assetmap event logs.
//!
//! Reads a log of length-prefixed event records, decodes each one without
//! knowing the asset's concrete key and value types, and prints one line
//! per event in its display form.
//!
//! # Pipeline
//!
//! ```text
//! file --> FrameReader --> decode_event (ErasedResolver) --> asset filter --> stdout
//! ```
//!
//! A broken frame header ends the run with an error, since no later frame
//! can be located. A record that fails to decode is logged and skipped.

mod config;
mod error;
mod render;

use std::io::Write;
use std::path::{Path, PathBuf};

use assetmap_events::{ErasedResolver, MapEvent, UpdatedEvent, decode_event};
use assetmap_types::Payload;
use assetmap_wire::{FrameReader, WireLimits};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::InspectConfig;
use crate::error::InspectError;
use crate::render::{OutputFormat, render};

/// Decode and print a framed assetmap event log.
#[derive(Debug, Parser)]
#[command(name = "assetmap-inspect", version, about)]
struct Args {
    /// Path to the framed event log.
    input: PathBuf,

    /// Path to the YAML configuration file.
    #[arg(long, env = "ASSETMAP_CONFIG", default_value = "assetmap-inspect.yaml")]
    config: PathBuf,

    /// Only print events for this asset.
    #[arg(long)]
    asset: Option<String>,

    /// Output format for decoded events.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Summary {
    printed: usize,
    filtered: usize,
    skipped: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args.config)?;

    // Initialize structured logging; RUST_LOG wins over the config file
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if config.logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!(
        input = %args.input.display(),
        max_frame_bytes = config.wire.max_frame_bytes,
        reject_unknown_fields = config.wire.reject_unknown_fields,
        "assetmap-inspect starting"
    );

    let log = std::fs::read(&args.input).map_err(|source| InspectError::Input {
        path: args.input.clone(),
        source,
    })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = inspect(
        &log,
        &config.wire,
        args.asset.as_deref(),
        args.format,
        &mut out,
    )?;
    out.flush().map_err(InspectError::from)?;

    info!(
        printed = summary.printed,
        filtered = summary.filtered,
        skipped = summary.skipped,
        "log inspected"
    );
    Ok(())
}

/// Load configuration from `path`, or defaults when the file is absent.
fn load_config(path: &Path) -> Result<InspectConfig, InspectError> {
    if path.exists() {
        Ok(InspectConfig::from_file(path)?)
    } else {
        let mut config = InspectConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}

/// Decode every frame of `log` and write the matching events to `out`.
fn inspect<W: Write>(
    log: &[u8],
    limits: &WireLimits,
    asset: Option<&str>,
    format: OutputFormat,
    out: &mut W,
) -> Result<Summary, InspectError> {
    let mut summary = Summary::default();

    for (index, frame) in FrameReader::new(log, limits).enumerate() {
        let record = frame.map_err(|source| InspectError::Frame { index, source })?;

        let event: UpdatedEvent<Payload, Payload> =
            match decode_event(record, &ErasedResolver, limits) {
                Ok(event) => event,
                Err(e) => {
                    warn!(index, field = ?e.field(), error = %e, "skipping undecodable record");
                    summary.skipped = summary.skipped.saturating_add(1);
                    continue;
                }
            };

        if asset.is_some_and(|name| event.asset_name() != name) {
            debug!(index, asset = %event.asset_name(), "filtered");
            summary.filtered = summary.filtered.saturating_add(1);
            continue;
        }

        writeln!(out, "{}", render(&event, format))?;
        summary.printed = summary.printed.saturating_add(1);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::indexing_slicing,
        clippy::arithmetic_side_effects
    )]

    use super::*;
    use assetmap_events::encode_event;
    use assetmap_wire::{WireError, write_frame};
    use bytes::BytesMut;

    fn log_of(events: &[UpdatedEvent<i64, i64>]) -> BytesMut {
        let mut log = BytesMut::new();
        for event in events {
            write_frame(&mut log, &encode_event(event, &WireLimits::default()).unwrap()).unwrap();
        }
        log
    }

    fn run(log: &[u8], asset: Option<&str>) -> (Result<Summary, InspectError>, String) {
        let mut out = Vec::new();
        let result = inspect(log, &WireLimits::default(), asset, OutputFormat::Text, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn prints_one_line_per_event() {
        let log = log_of(&[
            UpdatedEvent::of("trades", 42, Some(100), Some(200), false, true),
            UpdatedEvent::of("orders", 7, None, Some(1), true, true),
        ]);
        let (result, out) = run(&log, None);
        assert_eq!(
            result.unwrap(),
            Summary {
                printed: 2,
                filtered: 0,
                skipped: 0
            }
        );
        assert_eq!(
            out,
            "UpdatedEvent{assetName='trades', key=42, oldValue=100, value=200, isReplicationEvent=false}\n\
             UpdatedEvent{assetName='orders', key=7, oldValue=null, value=1, isReplicationEvent=true}\n"
        );
    }

    #[test]
    fn asset_filter_drops_other_assets() {
        let log = log_of(&[
            UpdatedEvent::of("trades", 1, None, Some(1), false, true),
            UpdatedEvent::of("orders", 2, None, Some(2), false, true),
            UpdatedEvent::of("trades", 3, None, Some(3), false, true),
        ]);
        let (result, out) = run(&log, Some("trades"));
        let summary = result.unwrap();
        assert_eq!(summary.printed, 2);
        assert_eq!(summary.filtered, 1);
        assert!(out.lines().all(|line| line.contains("assetName='trades'")));
    }

    #[test]
    fn undecodable_records_are_skipped() {
        let mut log = log_of(&[UpdatedEvent::of("trades", 1, None, Some(1), false, true)]);
        write_frame(&mut log, &[0xff, 0x00]).unwrap();
        let tail = log_of(&[UpdatedEvent::of("trades", 2, None, Some(2), false, true)]);
        log.extend_from_slice(&tail);

        let (result, out) = run(&log, None);
        let summary = result.unwrap();
        assert_eq!(summary.printed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn torn_tail_is_a_frame_error() {
        let log = log_of(&[
            UpdatedEvent::of("trades", 1, None, Some(1), false, true),
            UpdatedEvent::of("trades", 2, None, Some(2), false, true),
        ]);
        let torn = &log[..log.len() - 1];
        let (result, out) = run(torn, None);
        assert!(matches!(
            result,
            Err(InspectError::Frame {
                index: 1,
                source: WireError::Truncated
            })
        ));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn json_format_prints_one_object_per_line() {
        let log = log_of(&[UpdatedEvent::of("trades", 42, Some(100), Some(200), false, true)]);
        let mut out = Vec::new();
        inspect(&log, &WireLimits::default(), None, OutputFormat::Json, &mut out).unwrap();
        let line: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(line["assetName"], "trades");
        assert_eq!(line["oldValue"], 100);
        assert_eq!(line["hasValueChanged"], true);
    }

    #[test]
    fn empty_log_prints_nothing() {
        let (result, out) = run(&[], None);
        assert_eq!(result.unwrap(), Summary::default());
        assert!(out.is_empty());
    }
}
