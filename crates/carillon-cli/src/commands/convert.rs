//! Convert command implementation
//!
//! Decodes a MIDI performance, encodes the firmware table, and writes the
//! generated C header. Recoverable conditions (missing mapping override,
//! unmapped notes, ignored tempo changes) are reported as warnings and the
//! conversion still completes; only a corrupt table aborts with no artifact
//! written.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use serde::Serialize;

use carillon_core::{
    encode, render_header, resolve_channel_count, ChannelMapping, ConvertWarning, EventCollector,
    MappingSource, StateWidth,
};
use carillon_midi::DecodedPerformance;

use crate::reporting;

/// Machine-readable result of a conversion run.
#[derive(Debug, Serialize)]
pub struct ConvertReport {
    /// Always `true`.
    pub success: bool,
    /// Input MIDI file path.
    pub input: String,
    /// Generated header path.
    pub output: String,
    /// Number of output channels.
    pub channel_count: u8,
    /// Number of emitted events.
    pub event_count: usize,
    /// Number of distinct timestamps (state snapshots).
    pub distinct_timestamps: usize,
    /// C type used for the state column.
    pub state_width: String,
    /// Which policy produced the note-to-pin mapping.
    pub mapping_source: MappingSource,
    /// Non-note events skipped during decoding.
    pub skipped_events: u32,
    /// Generation timestamp embedded in the header.
    pub generated_at: String,
    /// BLAKE3 hash of the rendered header text.
    pub header_hash: String,
    /// Recoverable conditions encountered along the way.
    pub warnings: Vec<String>,
}

/// Run the convert command
///
/// # Arguments
/// * `input` - Path to the MIDI performance file
/// * `output` - Path to write the generated header to
/// * `mapping` - Optional note-to-pin override file (JSON)
/// * `first_tone` - First note of the default contiguous layout
/// * `channels` - Optional channel-count override (default: distinct notes)
/// * `json_output` - Whether to emit machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 1 on any fatal error (no artifact written)
pub fn run(
    input: &str,
    output: &str,
    mapping: Option<&str>,
    first_tone: u8,
    channels: Option<u8>,
    json_output: bool,
) -> Result<ExitCode> {
    match convert(input, output, mapping, first_tone, channels) {
        Ok((report, warnings)) => {
            if json_output {
                reporting::print_json_report(&report);
            } else {
                print_human(&report, &warnings);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) if json_output => {
            reporting::print_json_error(format!("{:#}", err));
            Ok(ExitCode::from(1))
        }
        Err(err) => Err(err),
    }
}

/// The conversion pipeline proper: decode, collect, map, encode, render,
/// write. Returns the report plus the structured warnings for printing.
fn convert(
    input: &str,
    output: &str,
    mapping_path: Option<&str>,
    first_tone: u8,
    channels: Option<u8>,
) -> Result<(ConvertReport, Vec<ConvertWarning>)> {
    let performance = DecodedPerformance::load(input)
        .with_context(|| format!("failed to decode MIDI file: {}", input))?;

    let mut collector = EventCollector::new();
    for event in &performance.events {
        collector.record(
            event.time_ms,
            event.channel,
            event.note,
            event.velocity,
            event.mode,
        );
    }

    let channel_count = resolve_channel_count(collector.distinct_notes(), channels)
        .context("cannot determine the output channel count")?;

    let (mapping, mapping_source, mut warnings) =
        ChannelMapping::load_or_default(mapping_path.map(Path::new), first_tone, channel_count)
            .context("cannot build the note-to-pin mapping")?;

    if performance.skipped_tempo_changes > 0 {
        warnings.push(ConvertWarning::TempoChangeIgnored {
            count: performance.skipped_tempo_changes,
        });
    }

    let outcome = encode(&collector, &mapping);
    warnings.extend(outcome.warnings);

    let generated_at = Local::now().format("%Y%m%d%H%M%S").to_string();
    let header = render_header(&outcome.table, &generated_at)
        .context("refusing to write a corrupt table")?;
    let header_hash = blake3::hash(header.as_bytes()).to_hex().to_string();

    std::fs::write(output, &header)
        .with_context(|| format!("failed to write header to: {}", output))?;

    let report = ConvertReport {
        success: true,
        input: input.to_string(),
        output: output.to_string(),
        channel_count,
        event_count: outcome.table.event_count(),
        distinct_timestamps: outcome.table.distinct_timestamps(),
        state_width: StateWidth::for_channel_count(channel_count)
            .c_type()
            .to_string(),
        mapping_source,
        skipped_events: performance.skipped_events,
        generated_at,
        header_hash,
        warnings: reporting::warning_strings(&warnings),
    };
    Ok((report, warnings))
}

fn print_human(report: &ConvertReport, warnings: &[ConvertWarning]) {
    println!("{} {}", "Converting:".cyan().bold(), report.input);
    println!(
        "{} {} channel(s), {} event(s), {} timestamp(s), state type {}",
        "Encoded:".dimmed(),
        report.channel_count,
        report.event_count,
        report.distinct_timestamps,
        report.state_width
    );
    println!("{} {}", "Mapping:".dimmed(), report.mapping_source);
    if report.skipped_events > 0 {
        println!(
            "{} {} non-note event(s) ignored",
            "Decoded:".dimmed(),
            report.skipped_events
        );
    }

    reporting::print_warnings(warnings);

    println!(
        "\n{} {} ({})",
        "Header written to:".green().bold(),
        report.output,
        &report.header_hash[..16]
    );
}
