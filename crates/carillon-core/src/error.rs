//! Error and warning types for the conversion pipeline.
//!
//! The pipeline distinguishes three outcome classes:
//!
//! - [`ConvertWarning`] — recoverable conditions. The conversion continues
//!   and still produces a complete table; warnings are carried in outcome
//!   values so callers (and tests) can observe every recovery decision.
//! - [`MappingError`] — construction-time failures that make a mapping
//!   impossible to build at all (zero channels, too many channels).
//! - [`HeaderError`] — the single fatal serialization failure: the parallel
//!   event arrays disagree on length. No artifact is written on this path.

use std::path::PathBuf;

use thiserror::Error;

/// A non-fatal condition encountered during conversion.
///
/// Warnings never stop the pipeline; they are accumulated and surfaced to
/// the caller alongside the result they qualify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertWarning {
    /// The requested mapping override file does not exist.
    #[error("mapping file '{path}' not found, using default note layout")]
    MappingFileMissing {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The mapping override file exists but could not be read.
    #[error("mapping file '{path}' could not be read ({detail}), using default note layout")]
    MappingFileUnreadable {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error text.
        detail: String,
    },

    /// The mapping override file was read but rejected by parsing or
    /// validation. The default layout is used instead.
    #[error("mapping file '{path}' is invalid ({detail}), using default note layout")]
    MappingFileInvalid {
        /// Path that was requested.
        path: PathBuf,
        /// What was wrong, one sentence per offending entry.
        detail: String,
    },

    /// A note number had no pin assignment; every occurrence was skipped.
    #[error("no pin mapping for note {note}, skipped {occurrences} event(s)")]
    UnmappedNote {
        /// The unmapped source note number.
        note: u8,
        /// How many events referenced it.
        occurrences: u32,
    },

    /// The input declared tempo changes after the first tempo; they were
    /// ignored because a single tempo converts ticks to milliseconds.
    #[error("{count} tempo change(s) after the first were ignored")]
    TempoChangeIgnored {
        /// Number of ignored tempo events.
        count: u32,
    },
}

/// Failure to construct a channel mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The performance produced no channels to map.
    #[error("no output channels (the input contains no note events)")]
    NoChannels,

    /// More output channels than the state word can hold.
    #[error("{requested} channels requested, at most {max} are supported")]
    TooManyChannels {
        /// The requested channel count.
        requested: usize,
        /// The supported maximum.
        max: u8,
    },

    /// The default layout would run past the last MIDI note number.
    #[error("default layout starting at note {first_tone} with {channel_count} channels exceeds note 127")]
    ToneRangeOverflow {
        /// First note of the contiguous layout.
        first_tone: u8,
        /// Number of consecutive notes to map.
        channel_count: u8,
    },
}

/// Fatal failure while rendering the output table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// The three event-level arrays must be index-aligned; a disagreement
    /// means the table is corrupt and nothing may be emitted.
    #[error(
        "event arrays are not aligned: {timestamps} timestamps, {pins} pins, {values} values"
    )]
    LengthMismatch {
        /// Length of the timestamp array.
        timestamps: usize,
        /// Length of the pin array.
        pins: usize,
        /// Length of the value array.
        values: usize,
    },
}
