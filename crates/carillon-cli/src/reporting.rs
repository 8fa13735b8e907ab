//! Console output helpers shared by all commands.

use colored::Colorize;
use serde::Serialize;

use carillon_core::ConvertWarning;

/// Prints accumulated warnings in the standard `!`-prefixed form.
pub fn print_warnings(warnings: &[ConvertWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n{}", "Warnings:".yellow().bold());
    for warning in warnings {
        println!("  {} {}", "!".yellow(), warning);
    }
}

/// Converts warnings to plain strings for machine-readable reports.
pub fn warning_strings(warnings: &[ConvertWarning]) -> Vec<String> {
    warnings.iter().map(|w| w.to_string()).collect()
}

/// Machine-readable failure envelope for `--json` mode.
#[derive(Debug, Serialize)]
pub struct JsonFailure {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error text.
    pub error: String,
}

/// Prints a failure envelope to stdout.
pub fn print_json_error(error: impl std::fmt::Display) {
    let envelope = JsonFailure {
        success: false,
        error: error.to_string(),
    };
    let json = serde_json::to_string_pretty(&envelope)
        .expect("failure envelope serialization should not fail");
    println!("{}", json);
}

/// Serializes and prints a success report to stdout.
pub fn print_json_report<T: Serialize>(report: &T) {
    let json =
        serde_json::to_string_pretty(report).expect("report serialization should not fail");
    println!("{}", json);
}
