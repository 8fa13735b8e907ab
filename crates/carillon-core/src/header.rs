//! C header rendering for the encoded table.
//!
//! The generated header is the interface to the playback firmware: the
//! four arrays land in flash (`PROGMEM`), the state column uses the
//! narrowest unsigned type that holds one bit per channel, and a mutable
//! `current_event_index` gives the player its cursor.

use std::fmt::Write;

use crate::encode::EncodedTable;
use crate::error::HeaderError;

/// Unsigned integer width of the state column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateWidth {
    /// `uint8_t`, up to 8 channels.
    U8,
    /// `uint16_t`, up to 16 channels.
    U16,
    /// `uint32_t`, up to 32 channels.
    U32,
}

impl StateWidth {
    /// Narrowest width that holds one bit per channel.
    pub fn for_channel_count(channel_count: u8) -> Self {
        if channel_count <= 8 {
            StateWidth::U8
        } else if channel_count <= 16 {
            StateWidth::U16
        } else {
            StateWidth::U32
        }
    }

    /// The C type name to declare the state array with.
    pub fn c_type(&self) -> &'static str {
        match self {
            StateWidth::U8 => "uint8_t",
            StateWidth::U16 => "uint16_t",
            StateWidth::U32 => "uint32_t",
        }
    }
}

impl std::fmt::Display for StateWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.c_type())
    }
}

/// Renders the complete header text.
///
/// Verifies the event-array alignment invariant before emitting anything;
/// a mismatch is the pipeline's single fatal error and yields no output.
/// `generated_at` is a preformatted timestamp so rendering itself stays
/// deterministic.
pub fn render_header(table: &EncodedTable, generated_at: &str) -> Result<String, HeaderError> {
    if table.pins.len() != table.timestamps.len() || table.values.len() != table.timestamps.len() {
        return Err(HeaderError::LengthMismatch {
            timestamps: table.timestamps.len(),
            pins: table.pins.len(),
            values: table.values.len(),
        });
    }

    let width = StateWidth::for_channel_count(table.channel_count);
    let mut out = String::new();

    // The unwraps are fine: writing to a String cannot fail.
    writeln!(out, "// auto-generated by carillon - do not edit").unwrap();
    writeln!(out, "// generation time: {}", generated_at).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "// flash placement for the data tables").unwrap();
    writeln!(out, "#include <avr/pgmspace.h>").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "// number of output channels").unwrap();
    writeln!(out, "const uint8_t channel_cnt = {};", table.channel_count).unwrap();
    writeln!(out, "// number of note events").unwrap();
    writeln!(out, "unsigned long int event_cnt = {};", table.event_count()).unwrap();
    writeln!(out, "// millisecond timestamp of each event").unwrap();
    writeln!(
        out,
        "const PROGMEM unsigned long int event_timestamps[] = {{{}}};",
        join_decimal(&table.timestamps)
    )
    .unwrap();
    writeln!(out, "// velocity (0-127) of each on event, 0 for off, drives PWM").unwrap();
    writeln!(
        out,
        "const PROGMEM uint8_t event_values[] = {{{}}};",
        join_decimal(&table.values)
    )
    .unwrap();
    writeln!(out, "// output pin of each event (not the MIDI channel)").unwrap();
    writeln!(
        out,
        "const PROGMEM uint8_t event_notes[] = {{{}}};",
        join_decimal(&table.pins)
    )
    .unwrap();
    writeln!(out, "// full on/off channel state per distinct timestamp, bit 0 = pin 0").unwrap();
    writeln!(
        out,
        "const PROGMEM {} event_states[] = {{{}}};",
        width.c_type(),
        join_hex(&table.states)
    )
    .unwrap();
    writeln!(out, "// playback cursor, starts at the first event").unwrap();
    writeln!(out, "unsigned long int current_event_index = 0;").unwrap();

    Ok(out)
}

fn join_decimal<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn join_hex(values: &[u32]) -> String {
    values
        .iter()
        .map(|v| format!("{:#x}", v))
        .collect::<Vec<_>>()
        .join(",")
}
