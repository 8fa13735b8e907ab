//! Inspect command implementation
//!
//! Decodes and collects a MIDI file without converting it, then prints the
//! timeline diagnostics: event and channel counts, first/last event times,
//! and what the decoder had to skip.

use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use carillon_core::EventCollector;
use carillon_midi::DecodedPerformance;

use crate::reporting;

/// Machine-readable result of an inspect run.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    /// Always `true`.
    pub success: bool,
    /// Input MIDI file path.
    pub input: String,
    /// Total note events recorded.
    pub event_count: usize,
    /// Distinct note numbers (the derived channel count).
    pub distinct_notes: usize,
    /// Distinct source MIDI channels.
    pub distinct_channels: usize,
    /// Timestamp of the earliest event, if any.
    pub first_event_ms: Option<u32>,
    /// Timestamp of the latest event, if any.
    pub last_event_ms: Option<u32>,
    /// SMF ticks per quarter note.
    pub ticks_per_beat: u16,
    /// Tempo used for tick-to-millisecond conversion.
    pub tempo_us_per_beat: u32,
    /// Non-note events skipped during decoding.
    pub skipped_events: u32,
    /// Tempo changes after the first, ignored.
    pub skipped_tempo_changes: u32,
}

/// Run the inspect command
///
/// # Returns
/// Exit code: 0 on success, 1 if the file cannot be decoded
pub fn run(input: &str, json_output: bool) -> Result<ExitCode> {
    match inspect(input) {
        Ok(report) => {
            if json_output {
                reporting::print_json_report(&report);
            } else {
                print_human(&report);
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

fn inspect(input: &str) -> Result<InspectReport> {
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

    Ok(InspectReport {
        success: true,
        input: input.to_string(),
        event_count: collector.event_count(),
        distinct_notes: collector.distinct_notes(),
        distinct_channels: collector.distinct_channels(),
        first_event_ms: collector.first_event_ms(),
        last_event_ms: collector.last_event_ms(),
        ticks_per_beat: performance.ticks_per_beat,
        tempo_us_per_beat: performance.tempo_us_per_beat,
        skipped_events: performance.skipped_events,
        skipped_tempo_changes: performance.skipped_tempo_changes,
    })
}

fn print_human(report: &InspectReport) {
    println!("{} {}", "Inspecting:".cyan().bold(), report.input);
    println!(
        "{} {} event(s), {} distinct note(s) on {} MIDI channel(s)",
        "Timeline:".dimmed(),
        report.event_count,
        report.distinct_notes,
        report.distinct_channels
    );
    match (report.first_event_ms, report.last_event_ms) {
        (Some(first), Some(last)) => {
            println!(
                "{} {} ms to {} ms",
                "Span:".dimmed(),
                first,
                last
            );
        }
        _ => println!("{} no note events", "Span:".dimmed()),
    }
    println!(
        "{} {} ticks/beat at {} us/beat",
        "Timing:".dimmed(),
        report.ticks_per_beat,
        report.tempo_us_per_beat
    );
    if report.skipped_events > 0 {
        println!(
            "{} {} non-note event(s) ignored",
            "Decoded:".dimmed(),
            report.skipped_events
        );
    }
    if report.skipped_tempo_changes > 0 {
        println!(
            "  {} {} tempo change(s) after the first were ignored",
            "!".yellow(),
            report.skipped_tempo_changes
        );
    }
}
