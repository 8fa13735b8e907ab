//! Check-mapping command implementation
//!
//! Validates a note-to-pin override file standalone, with the strictness
//! the converter deliberately relaxes: here every problem is a hard error
//! instead of a fallback to the default layout.

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use carillon_core::{ChannelMapping, OverrideError};

use crate::reporting;

/// One validated mapping entry.
#[derive(Debug, Serialize)]
pub struct MappingEntry {
    /// Source note number.
    pub note: u8,
    /// Output pin index.
    pub pin: u8,
}

/// Machine-readable result of a check-mapping run.
#[derive(Debug, Serialize)]
pub struct CheckMappingReport {
    /// Always `true`.
    pub success: bool,
    /// The checked mapping file path.
    pub mapping: String,
    /// Channel count the pins were validated against.
    pub channel_count: u8,
    /// Validated entries in ascending note order.
    pub entries: Vec<MappingEntry>,
}

/// Run the check-mapping command
///
/// # Returns
/// Exit code: 0 if the file is valid, 1 otherwise
pub fn run(mapping_path: &str, channels: u8, json_output: bool) -> Result<ExitCode> {
    match ChannelMapping::load_override(Path::new(mapping_path), channels) {
        Ok(mapping) => {
            let report = CheckMappingReport {
                success: true,
                mapping: mapping_path.to_string(),
                channel_count: channels,
                entries: mapping
                    .entries()
                    .map(|(note, pin)| MappingEntry { note, pin })
                    .collect(),
            };
            if json_output {
                reporting::print_json_report(&report);
            } else {
                print_human(&report);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            if json_output {
                reporting::print_json_error(&err);
            } else {
                print_problems(mapping_path, &err);
            }
            Ok(ExitCode::from(1))
        }
    }
}

fn print_human(report: &CheckMappingReport) {
    println!("{} {}", "Checking:".cyan().bold(), report.mapping);
    for entry in &report.entries {
        println!("  note {:>3} -> pin {}", entry.note, entry.pin);
    }
    println!(
        "\n{} {} entr{} valid for {} channel(s)",
        "OK".green().bold(),
        report.entries.len(),
        if report.entries.len() == 1 { "y" } else { "ies" },
        report.channel_count
    );
}

fn print_problems(mapping_path: &str, err: &OverrideError) {
    println!("{} {}", "Checking:".cyan().bold(), mapping_path);
    println!("\n{}", "Errors:".red().bold());
    match err {
        OverrideError::Entries { problems } => {
            for problem in problems {
                println!("  {} {}", "x".red(), problem);
            }
        }
        other => println!("  {} {}", "x".red(), other),
    }
    println!("\n{} mapping file is invalid", "FAILED".red().bold());
}
