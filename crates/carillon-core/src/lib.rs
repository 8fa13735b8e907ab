//! Carillon core - deterministic MIDI-performance-to-firmware-table encoding.
//!
//! This crate turns a buffered sequence of note on/off events into the
//! compact parallel data tables a multi-channel output device (solenoid
//! strikers, LED arrays) plays back from flash. The pipeline is four
//! stages, each owning one concern:
//!
//! - [`collect`]: bucket raw events into a millisecond timeline
//! - [`mapping`]: resolve note numbers to physical output pins
//! - [`encode`]: walk the timeline once, carrying the channel state
//! - [`header`]: pick the state width and render the C header
//!
//! Data flows strictly in that order; no stage depends on a later one.
//!
//! # Determinism
//!
//! Encoding is a single pass with no I/O: timestamps ascend, events within
//! a timestamp keep their arrival order, and the same input always yields
//! byte-identical arrays. The only non-deterministic input, the generation
//! timestamp, is passed in preformatted by the caller.
//!
//! # Error model
//!
//! Recoverable conditions (missing or invalid mapping override, unmapped
//! notes) become [`ConvertWarning`] values carried in outcomes; the only
//! fatal error is the event-array alignment violation checked at render
//! time ([`HeaderError::LengthMismatch`]).

pub mod collect;
pub mod encode;
pub mod error;
pub mod header;
pub mod mapping;

pub use collect::{EventCollector, NoteMode, RawEvent};
pub use encode::{encode, ChannelState, EncodeOutcome, EncodedTable};
pub use error::{ConvertWarning, HeaderError, MappingError};
pub use header::{render_header, StateWidth};
pub use mapping::{
    resolve_channel_count, ChannelMapping, MappingSource, OverrideError, DEFAULT_FIRST_TONE,
    MAX_CHANNELS,
};

/// Crate version for provenance reporting.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
