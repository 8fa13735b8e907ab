//! Carillon MIDI - Standard MIDI File decoding for the table converter.
//!
//! Thin adapter over the `midly` parser: it buffers a whole SMF, resolves
//! delta ticks to absolute milliseconds against a single tempo, and hands
//! the core a flat, time-ordered list of note on/off events. Byte-level
//! format concerns stay here; the core never sees a tick or a delta.

pub mod decode;
pub mod error;

pub use decode::{DecodedPerformance, TimedEvent, DEFAULT_TEMPO_US};
pub use error::DecodeError;
