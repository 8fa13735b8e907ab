//! Carillon CLI - MIDI performance to firmware data-table converter
//!
//! This binary converts recorded MIDI performances into the C header the
//! playback firmware compiles in, and provides diagnostics for the input
//! file and the note-to-pin mapping.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

// Use modules from the library crate
use carillon_cli::commands;

/// Carillon - MIDI to firmware data-table converter
#[derive(Parser)]
#[command(name = "carillon")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a MIDI file into a generated C header
    Convert {
        /// Path to the input MIDI file
        #[arg(short, long)]
        input: String,

        /// Path to write the generated header to
        #[arg(short, long)]
        output: String,

        /// Path to a note-to-pin mapping override file (JSON)
        #[arg(short, long)]
        mapping: Option<String>,

        /// First note of the default contiguous layout
        #[arg(long, default_value_t = carillon_core::DEFAULT_FIRST_TONE)]
        first_tone: u8,

        /// Output channel count (default: number of distinct notes)
        #[arg(long)]
        channels: Option<u8>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Decode a MIDI file and print timeline diagnostics
    Inspect {
        /// Path to the input MIDI file
        #[arg(short, long)]
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Validate a note-to-pin mapping override file
    CheckMapping {
        /// Path to the mapping file (JSON)
        #[arg(short, long)]
        mapping: String,

        /// Channel count to validate pin indices against
        #[arg(short, long)]
        channels: u8,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            mapping,
            first_tone,
            channels,
            json,
        } => commands::convert::run(
            &input,
            &output,
            mapping.as_deref(),
            first_tone,
            channels,
            json,
        ),
        Commands::Inspect { input, json } => commands::inspect::run(&input, json),
        Commands::CheckMapping {
            mapping,
            channels,
            json,
        } => commands::check_mapping::run(&mapping, channels, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_convert() {
        let cli = Cli::try_parse_from([
            "carillon",
            "convert",
            "--input",
            "song.mid",
            "--output",
            "mididata.h",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert {
                input,
                output,
                mapping,
                first_tone,
                channels,
                json,
            } => {
                assert_eq!(input, "song.mid");
                assert_eq!(output, "mididata.h");
                assert!(mapping.is_none());
                assert_eq!(first_tone, 36);
                assert!(channels.is_none());
                assert!(!json);
            }
            _ => panic!("expected convert command"),
        }
    }

    #[test]
    fn test_cli_parses_convert_with_all_options() {
        let cli = Cli::try_parse_from([
            "carillon",
            "convert",
            "--input",
            "song.mid",
            "--output",
            "mididata.h",
            "--mapping",
            "mapping.json",
            "--first-tone",
            "48",
            "--channels",
            "8",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Convert {
                input,
                output,
                mapping,
                first_tone,
                channels,
                json,
            } => {
                assert_eq!(input, "song.mid");
                assert_eq!(output, "mididata.h");
                assert_eq!(mapping.as_deref(), Some("mapping.json"));
                assert_eq!(first_tone, 48);
                assert_eq!(channels, Some(8));
                assert!(json);
            }
            _ => panic!("expected convert command"),
        }
    }

    #[test]
    fn test_cli_requires_input_and_output_for_convert() {
        let err = Cli::try_parse_from(["carillon", "convert", "--input", "song.mid"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("--output"));

        let err = Cli::try_parse_from(["carillon", "convert", "--output", "out.h"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("--input"));
    }

    #[test]
    fn test_cli_parses_inspect() {
        let cli = Cli::try_parse_from(["carillon", "inspect", "--input", "song.mid"]).unwrap();
        match cli.command {
            Commands::Inspect { input, json } => {
                assert_eq!(input, "song.mid");
                assert!(!json);
            }
            _ => panic!("expected inspect command"),
        }
    }

    #[test]
    fn test_cli_parses_inspect_with_json() {
        let cli = Cli::try_parse_from(["carillon", "inspect", "--input", "song.mid", "--json"])
            .unwrap();
        match cli.command {
            Commands::Inspect { input, json } => {
                assert_eq!(input, "song.mid");
                assert!(json);
            }
            _ => panic!("expected inspect command"),
        }
    }

    #[test]
    fn test_cli_parses_check_mapping() {
        let cli = Cli::try_parse_from([
            "carillon",
            "check-mapping",
            "--mapping",
            "mapping.json",
            "--channels",
            "6",
        ])
        .unwrap();
        match cli.command {
            Commands::CheckMapping {
                mapping,
                channels,
                json,
            } => {
                assert_eq!(mapping, "mapping.json");
                assert_eq!(channels, 6);
                assert!(!json);
            }
            _ => panic!("expected check-mapping command"),
        }
    }

    #[test]
    fn test_cli_requires_channels_for_check_mapping() {
        let err = Cli::try_parse_from(["carillon", "check-mapping", "--mapping", "mapping.json"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("--channels"));
    }
}
